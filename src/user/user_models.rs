use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Maximum number of users returned by a single lookup.
pub const USER_LIST_LIMIT: i64 = 50;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct UserPresence {
    pub username: String,
    pub last_seen: Option<DateTime<Utc>>,
}

/// Parameters of a user lookup. An empty search term means "list everyone".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSearch {
    term: String,
    current_user: String,
}

impl UserSearch {
    pub fn new(term: impl Into<String>, current_user: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            current_user: current_user.into(),
        }
    }

    pub fn term(&self) -> Option<&str> {
        Some(self.term.as_str()).filter(|t| !t.is_empty())
    }

    pub fn current_user(&self) -> &str {
        &self.current_user
    }

    /// ILIKE pattern matching `term` as a literal substring.
    pub fn like_pattern(&self) -> Option<String> {
        self.term().map(|term| {
            let mut pattern = String::with_capacity(term.len() + 2);
            pattern.push('%');
            for c in term.chars() {
                if matches!(c, '%' | '_' | '\\') {
                    pattern.push('\\');
                }
                pattern.push(c);
            }
            pattern.push('%');
            pattern
        })
    }
}
