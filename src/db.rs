use crate::error::Result;
use anyhow::Context;
use sqlx::{
    migrate::Migrator,
    postgres::{PgConnectOptions, PgConnection},
    Connection,
};
use std::{str::FromStr, sync::Arc};

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Handle to the message store. Holds only connect options; there is no
/// pool, each request opens its own connection.
#[derive(Clone)]
pub struct Database {
    options: Arc<PgConnectOptions>,
}

impl Database {
    /// Parses the connection URL up front so a malformed URL fails at startup.
    pub fn from_url(url: &str) -> Result<Self> {
        Ok(Self::from_options(PgConnectOptions::from_str(url)?))
    }

    pub fn from_options(options: PgConnectOptions) -> Self {
        Self {
            options: Arc::new(options),
        }
    }

    pub async fn connect(&self) -> Result<PgConnection> {
        tracing::debug!(
            "Opening connection to {}:{}",
            self.options.get_host(),
            self.options.get_port()
        );
        let conn = PgConnection::connect_with(&self.options).await?;
        Ok(conn)
    }
}

/// Closes a connection gracefully. Callers release on every path; a
/// connection that is dropped instead (e.g. on panic) is closed by its `Drop`.
pub async fn release(conn: PgConnection) {
    if let Err(e) = conn.close().await {
        tracing::warn!("Failed to close database connection cleanly: {:?}", e);
    }
}

/// Applies the embedded migrations. Only called at startup, so failures are
/// reported with context instead of as an HTTP error.
pub async fn run_migrations(db: &Database) -> anyhow::Result<()> {
    let mut conn = db
        .connect()
        .await
        .context("failed to connect for migrations")?;
    let result = MIGRATOR.run(&mut conn).await;
    release(conn).await;
    result.context("failed to apply migrations")?;
    Ok(())
}

/// Replaces the credentials of a connection URL for logging.
pub fn redact_url(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return "<invalid format>".to_string();
    };

    match rest.rsplit_once('@') {
        Some((_, host)) => format!("{}://<hidden>@{}", scheme, host),
        None => format!("{}://{}", scheme, rest),
    }
}
