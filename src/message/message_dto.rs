use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{
    openapi::RefOr,
    openapi::schema::{
        AllOfBuilder, ObjectBuilder, OneOfBuilder, Ref, Schema, SchemaType,
    },
    ToSchema,
};
use validator::Validate;

use crate::{
    error::{AppError, Result},
    message::message_models::{ConversationSummary, Message},
    user::user_models::{UserPresence, UserSearch},
};

#[derive(Debug, Default, Deserialize)]
pub struct MessageQuery {
    pub username: Option<String>,
    pub other_user: Option<String>,
}

/// What a GET on the messages endpoint asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadRequest {
    Conversations { username: String },
    Thread { username: String, other_user: String },
}

impl TryFrom<MessageQuery> for ReadRequest {
    type Error = AppError;

    fn try_from(query: MessageQuery) -> Result<Self> {
        let username = query
            .username
            .filter(|u| !u.is_empty())
            .ok_or_else(|| AppError::MissingParameter("Username required".to_string()))?;

        Ok(match query.other_user.filter(|o| !o.is_empty()) {
            Some(other_user) => ReadRequest::Thread {
                username,
                other_user,
            },
            None => ReadRequest::Conversations { username },
        })
    }
}

/// Body of a POST on the messages endpoint, discriminated by `action`.
#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum MessageAction {
    Send(SendMessageRequest),
    GetUsers(GetUsersRequest),
}

impl MessageAction {
    /// Parses a raw request body. An empty body counts as `{}`, which has no
    /// action. Unknown or missing actions are reported separately from bodies
    /// that are not JSON objects.
    pub fn parse(body: &[u8]) -> Result<Self> {
        let value: Value = if body.iter().all(u8::is_ascii_whitespace) {
            Value::Object(Default::default())
        } else {
            serde_json::from_slice(body).map_err(|e| AppError::InvalidBody(e.to_string()))?
        };

        let action = match &value {
            Value::Object(fields) => fields.get("action").and_then(Value::as_str),
            _ => return Err(AppError::InvalidBody("expected a JSON object".to_string())),
        };

        if !matches!(action, Some("send" | "get_users")) {
            return Err(AppError::InvalidAction);
        }

        serde_json::from_value(value).map_err(|e| AppError::InvalidBody(e.to_string()))
    }
}

// Written by hand: the body is a oneOf over the request types, each
// extended with its `action` value.
impl<'s> ToSchema<'s> for MessageAction {
    fn schema() -> (&'s str, RefOr<Schema>) {
        let schema = OneOfBuilder::new()
            .item(action_variant("send", "SendMessageRequest"))
            .item(action_variant("get_users", "GetUsersRequest"))
            .build();

        ("MessageAction", RefOr::T(Schema::OneOf(schema)))
    }
}

fn action_variant(action: &'static str, request: &str) -> RefOr<Schema> {
    let tag = ObjectBuilder::new()
        .property(
            "action",
            RefOr::T(Schema::Object(
                ObjectBuilder::new()
                    .schema_type(SchemaType::String)
                    .enum_values(Some([action]))
                    .build(),
            )),
        )
        .required("action")
        .build();

    let variant = AllOfBuilder::new()
        .item(RefOr::Ref(Ref::from_schema_name(request)))
        .item(RefOr::T(Schema::Object(tag)))
        .build();

    RefOr::T(Schema::AllOf(variant))
}

#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
pub struct SendMessageRequest {
    pub sender_username: Option<String>,
    pub recipient_username: Option<String>,
    pub message_text: Option<String>,
}

/// A message ready to insert: every field trimmed and non-empty.
#[derive(Clone, Debug, PartialEq, Eq, Validate)]
pub struct NewMessage {
    #[validate(length(min = 1))]
    pub sender_username: String,
    #[validate(length(min = 1))]
    pub recipient_username: String,
    #[validate(length(min = 1))]
    pub message_text: String,
}

impl TryFrom<SendMessageRequest> for NewMessage {
    type Error = AppError;

    fn try_from(request: SendMessageRequest) -> Result<Self> {
        let message = NewMessage {
            sender_username: trimmed(request.sender_username),
            recipient_username: trimmed(request.recipient_username),
            message_text: trimmed(request.message_text),
        };
        message.validate().map_err(|_| {
            AppError::MissingParameter("Sender, recipient and message_text required".to_string())
        })?;
        Ok(message)
    }
}

#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
pub struct GetUsersRequest {
    pub search: Option<String>,
    pub current_user: Option<String>,
}

impl From<GetUsersRequest> for UserSearch {
    fn from(request: GetUsersRequest) -> Self {
        UserSearch::new(trimmed(request.search), trimmed(request.current_user))
    }
}

fn trimmed(value: Option<String>) -> String {
    value.as_deref().map(str::trim).unwrap_or_default().to_string()
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ConversationListResponse {
    pub messages: Vec<ConversationSummary>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ThreadResponse {
    pub messages: Vec<Message>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SendMessageResponse {
    pub success: bool,
    pub message: Message,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserListResponse {
    pub users: Vec<UserPresence>,
}
