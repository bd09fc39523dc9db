use crate::{
    message::{
        message_dto::{
            ConversationListResponse, GetUsersRequest, MessageAction, SendMessageRequest,
            SendMessageResponse, ThreadResponse, UserListResponse,
        },
        message_handlers, ConversationSummary, Message,
    },
    state::AppState,
    user::UserPresence,
};
use axum::{
    http::{header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue},
    routing::{get, MethodRouter},
    Router,
};
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::message::message_handlers::preflight,
        crate::message::message_handlers::get_messages,
        crate::message::message_handlers::post_message_action,
    ),
    components(
        schemas(
            MessageAction,
            SendMessageRequest,
            GetUsersRequest,
            SendMessageResponse,
            ConversationListResponse,
            ThreadResponse,
            UserListResponse,
            ConversationSummary,
            Message,
            UserPresence,
        )
    ),
    tags(
        (name = "messages", description = "Messages between named users and user lookup. Usernames are not authenticated and `encrypted` is advisory only.")
    )
)]
struct ApiDoc;

fn message_routes() -> MethodRouter<AppState> {
    get(message_handlers::get_messages)
        .post(message_handlers::post_message_action)
        .options(message_handlers::preflight)
        // Without this, HEAD would be served by the GET handler.
        .head(message_handlers::method_not_allowed)
        .fallback(message_handlers::method_not_allowed)
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/", message_routes())
        .route("/api/messages", message_routes())
        .layer(SetResponseHeaderLayer::if_not_present(
            ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
