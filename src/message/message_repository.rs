use crate::{
    error::Result,
    message::{
        message_dto::NewMessage,
        message_models::{ConversationSummary, Message},
    },
};
use sqlx::PgConnection;

/// Queries against `messages`, borrowed from a single request-scoped connection.
pub struct MessageRepository<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> MessageRepository<'c> {
    pub fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }

    pub async fn create(&mut self, message: &NewMessage) -> Result<Message> {
        let message = sqlx::query_as::<_, Message>(
            "INSERT INTO messages (sender_username, recipient_username, message_text, encrypted)
             VALUES ($1, $2, $3, true)
             RETURNING id, sender_username, recipient_username, message_text, encrypted, created_at",
        )
        .bind(&message.sender_username)
        .bind(&message.recipient_username)
        .bind(&message.message_text)
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(message)
    }

    /// Messages between the two users in either direction, oldest first.
    pub async fn find_thread(&mut self, username: &str, other_user: &str) -> Result<Vec<Message>> {
        let messages = sqlx::query_as::<_, Message>(
            "SELECT id, sender_username, recipient_username, message_text, encrypted, created_at
             FROM messages
             WHERE (sender_username = $1 AND recipient_username = $2)
                OR (sender_username = $2 AND recipient_username = $1)
             ORDER BY created_at ASC, id ASC",
        )
        .bind(username)
        .bind(other_user)
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(messages)
    }

    /// One row per counterpart holding the latest message with them, sorted by
    /// counterpart name.
    pub async fn find_conversations(&mut self, username: &str) -> Result<Vec<ConversationSummary>> {
        let conversations = sqlx::query_as::<_, ConversationSummary>(
            "SELECT DISTINCT ON (other_user)
                other_user,
                message_text AS last_message,
                created_at AS last_message_time
             FROM (
                SELECT
                    CASE
                        WHEN sender_username = $1 THEN recipient_username
                        ELSE sender_username
                    END AS other_user,
                    message_text,
                    created_at,
                    id
                FROM messages
                WHERE sender_username = $1 OR recipient_username = $1
             ) conversations
             ORDER BY other_user, created_at DESC, id DESC",
        )
        .bind(username)
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(conversations)
    }
}
