use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Message {
    pub id: i32,
    pub sender_username: String,
    pub recipient_username: String,
    pub message_text: String,
    /// Always true at creation. No cryptography is applied to `message_text`.
    pub encrypted: bool,
    pub created_at: DateTime<Utc>,
}

/// Latest message exchanged with one counterpart. Computed per request, never stored.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ConversationSummary {
    pub other_user: String,
    pub last_message: String,
    pub last_message_time: DateTime<Utc>,
}
