use crate::db::{release, Database};
use crate::error::Result;
use crate::message::message_dto::NewMessage;
use crate::message::message_models::{ConversationSummary, Message};
use crate::message::message_repository::MessageRepository;
use crate::user::{UserPresence, UserRepository, UserSearch};

/// Runs each operation on its own connection. The connection is released
/// before the result is returned, on success and on error alike.
#[derive(Clone)]
pub struct MessageService {
    db: Database,
}

impl MessageService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn send_message(&self, message: NewMessage) -> Result<Message> {
        let mut conn = self.db.connect().await?;
        let result = MessageRepository::new(&mut conn).create(&message).await;
        release(conn).await;

        let message = result?;
        tracing::info!(
            "Message {} stored from {} to {}",
            message.id,
            message.sender_username,
            message.recipient_username
        );
        Ok(message)
    }

    pub async fn get_thread(&self, username: &str, other_user: &str) -> Result<Vec<Message>> {
        let mut conn = self.db.connect().await?;
        let result = MessageRepository::new(&mut conn)
            .find_thread(username, other_user)
            .await;
        release(conn).await;
        result
    }

    pub async fn get_conversations(&self, username: &str) -> Result<Vec<ConversationSummary>> {
        let mut conn = self.db.connect().await?;
        let result = MessageRepository::new(&mut conn)
            .find_conversations(username)
            .await;
        release(conn).await;
        result
    }

    pub async fn get_users(&self, search: &UserSearch) -> Result<Vec<UserPresence>> {
        let mut conn = self.db.connect().await?;
        let result = UserRepository::new(&mut conn).find(search).await;
        release(conn).await;
        result
    }
}
