use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::{
    error::{AppError, Result},
    message::message_dto::{
        ConversationListResponse, MessageAction, MessageQuery, NewMessage, ReadRequest,
        SendMessageResponse, ThreadResponse, UserListResponse,
    },
    state::AppState,
    user::UserSearch,
};

/// Answer a CORS preflight request. Never touches the database.
#[utoipa::path(
    options,
    path = "/api/messages",
    tag = "messages",
    responses(
        (status = 200, description = "CORS headers with an empty body")
    )
)]
pub async fn preflight() -> impl IntoResponse {
    (
        StatusCode::OK,
        [
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (header::ACCESS_CONTROL_ALLOW_METHODS, "GET, POST, OPTIONS"),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type, X-Auth-Token"),
            (header::ACCESS_CONTROL_MAX_AGE, "86400"),
        ],
    )
}

/// List conversations for a user, or the thread between two users
#[utoipa::path(
    get,
    path = "/api/messages",
    tag = "messages",
    params(
        ("username" = String, Query, description = "User whose messages are read"),
        ("other_user" = Option<String>, Query, description = "Counterpart; when set, the thread with this user is returned")
    ),
    responses(
        (status = 200, description = "Conversation summaries, or the thread oldest first when other_user is set", body = ThreadResponse),
        (status = 400, description = "Username required")
    )
)]
pub async fn get_messages(
    State(state): State<AppState>,
    query: std::result::Result<Query<MessageQuery>, QueryRejection>,
) -> Result<Response> {
    let Query(query) = query.map_err(|e| AppError::InvalidQuery(e.body_text()))?;

    match ReadRequest::try_from(query)? {
        ReadRequest::Conversations { username } => {
            let messages = state.message_service.get_conversations(&username).await?;
            Ok((StatusCode::OK, Json(ConversationListResponse { messages })).into_response())
        }
        ReadRequest::Thread {
            username,
            other_user,
        } => {
            let messages = state
                .message_service
                .get_thread(&username, &other_user)
                .await?;
            Ok((StatusCode::OK, Json(ThreadResponse { messages })).into_response())
        }
    }
}

/// Send a message (`action = "send"`) or look up users (`action = "get_users"`)
#[utoipa::path(
    post,
    path = "/api/messages",
    tag = "messages",
    request_body(
        content = MessageAction,
        description = "`send` stores a message, `get_users` looks up users"
    ),
    responses(
        (status = 201, description = "Message stored", body = SendMessageResponse),
        (status = 200, description = "Matching users", body = UserListResponse),
        (status = 400, description = "Missing fields, invalid action or malformed body")
    )
)]
pub async fn post_message_action(State(state): State<AppState>, body: Bytes) -> Result<Response> {
    match MessageAction::parse(&body)? {
        MessageAction::Send(request) => {
            let new_message = NewMessage::try_from(request)?;
            let message = state.message_service.send_message(new_message).await?;

            Ok((
                StatusCode::CREATED,
                Json(SendMessageResponse {
                    success: true,
                    message,
                }),
            )
                .into_response())
        }
        MessageAction::GetUsers(request) => {
            let search = UserSearch::from(request);
            let users = state.message_service.get_users(&search).await?;

            Ok((StatusCode::OK, Json(UserListResponse { users })).into_response())
        }
    }
}

pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
