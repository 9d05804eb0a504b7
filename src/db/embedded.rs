//! Embedded PostgreSQL for the ephemeral database variant.
//!
//! Starts a bundled PostgreSQL server in a temporary directory. The data
//! directory is deleted when the server is stopped, so everything written to
//! an ephemeral database is lost on shutdown. Enabled via the `embedded-db`
//! cargo feature.

use postgresql_embedded::{PostgreSQL, Settings};
use tracing::info;

const DATABASE_NAME: &str = "userd";

/// A running embedded PostgreSQL instance.
pub struct EmbeddedDatabase {
    postgresql: PostgreSQL,
}

impl EmbeddedDatabase {
    /// Download (if needed), initialize and start an embedded server, then
    /// create the application database on it.
    pub async fn start() -> anyhow::Result<Self> {
        let settings = Settings {
            temporary: true,
            ..Settings::default()
        };

        let mut postgresql = PostgreSQL::new(settings);
        postgresql.setup().await?;
        postgresql.start().await?;
        postgresql.create_database(DATABASE_NAME).await?;

        info!("Embedded PostgreSQL started on port {}", postgresql.settings().port);

        Ok(Self { postgresql })
    }

    /// Connection URL for the application database.
    pub fn connection_string(&self) -> String {
        self.postgresql.settings().url(DATABASE_NAME)
    }

    /// Stop the server and remove its temporary data directory.
    pub async fn stop(self) -> anyhow::Result<()> {
        self.postgresql.stop().await?;
        Ok(())
    }
}
