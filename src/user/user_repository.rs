use crate::error::Result;
use sqlx::PgConnection;
use super::user_models::{UserPresence, UserSearch, USER_LIST_LIMIT};

/// Read-only access to presence records. Rows are written by another service.
pub struct UserRepository<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> UserRepository<'c> {
    pub fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }

    pub async fn find(&mut self, search: &UserSearch) -> Result<Vec<UserPresence>> {
        match search.like_pattern() {
            Some(pattern) => self.search(&pattern, search.current_user()).await,
            None => self.list_recent(search.current_user()).await,
        }
    }

    async fn search(&mut self, pattern: &str, current_user: &str) -> Result<Vec<UserPresence>> {
        let users = sqlx::query_as::<_, UserPresence>(
            r"SELECT username, last_seen FROM users
             WHERE username ILIKE $1 ESCAPE '\' AND username <> $2
             ORDER BY username
             LIMIT $3",
        )
        .bind(pattern)
        .bind(current_user)
        .bind(USER_LIST_LIMIT)
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(users)
    }

    async fn list_recent(&mut self, current_user: &str) -> Result<Vec<UserPresence>> {
        let users = sqlx::query_as::<_, UserPresence>(
            "SELECT username, last_seen FROM users
             WHERE username <> $1
             ORDER BY last_seen DESC NULLS LAST
             LIMIT $2",
        )
        .bind(current_user)
        .bind(USER_LIST_LIMIT)
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::PgPool;

    async fn seed(pool: &PgPool, users: &[(&str, i64)]) {
        for (username, minutes_ago) in users {
            sqlx::query(
                "INSERT INTO users (username, last_seen)
                 VALUES ($1, NOW() - make_interval(mins => $2::int))",
            )
            .bind(*username)
            .bind(*minutes_ago as i32)
            .execute(pool)
            .await
            .unwrap();
        }
    }

    fn names(users: &[UserPresence]) -> Vec<&str> {
        users.iter().map(|u| u.username.as_str()).collect()
    }

    #[sqlx::test]
    #[ignore = "requires DATABASE_URL"]
    async fn test_search_is_case_insensitive_and_excludes_current_user(pool: PgPool) {
        seed(&pool, &[("Alice", 5), ("malice", 1), ("bob", 2), ("alicia", 3)]).await;
        let mut conn = pool.acquire().await.unwrap();

        let users = UserRepository::new(&mut conn)
            .find(&UserSearch::new("ALI", "alicia"))
            .await
            .unwrap();

        assert_eq!(names(&users), vec!["Alice", "malice"]);
    }

    #[sqlx::test]
    #[ignore = "requires DATABASE_URL"]
    async fn test_search_treats_wildcards_literally(pool: PgPool) {
        seed(&pool, &[("a_b", 1), ("axb", 1)]).await;
        let mut conn = pool.acquire().await.unwrap();

        let users = UserRepository::new(&mut conn)
            .find(&UserSearch::new("_", ""))
            .await
            .unwrap();

        assert_eq!(names(&users), vec!["a_b"]);
    }

    #[sqlx::test]
    #[ignore = "requires DATABASE_URL"]
    async fn test_listing_orders_by_last_seen_and_caps_results(pool: PgPool) {
        let seeded: Vec<(String, i64)> = (0..60).map(|i| (format!("user{:02}", i), i)).collect();
        let seeded: Vec<(&str, i64)> = seeded.iter().map(|(n, m)| (n.as_str(), *m)).collect();
        seed(&pool, &seeded).await;
        let mut conn = pool.acquire().await.unwrap();

        let users = UserRepository::new(&mut conn)
            .find(&UserSearch::new("", "user00"))
            .await
            .unwrap();

        assert_eq!(users.len(), USER_LIST_LIMIT as usize);
        assert_eq!(users[0].username, "user01");
        assert_eq!(users[49].username, "user50");
        assert!(users.iter().all(|u| u.username != "user00"));
    }

    #[sqlx::test]
    #[ignore = "requires DATABASE_URL"]
    async fn test_search_caps_results(pool: PgPool) {
        let seeded: Vec<(String, i64)> = (0..55).map(|i| (format!("member{:02}", i), 1)).collect();
        let seeded: Vec<(&str, i64)> = seeded.iter().map(|(n, m)| (n.as_str(), *m)).collect();
        seed(&pool, &seeded).await;
        let mut conn = pool.acquire().await.unwrap();

        let users = UserRepository::new(&mut conn)
            .find(&UserSearch::new("member", ""))
            .await
            .unwrap();

        assert_eq!(users.len(), 50);
        assert_eq!(users[0].username, "member00");
    }
}
