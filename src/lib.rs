//! # userd: a small user-identity API
//!
//! `userd` is an HTTP backend exposing a single authenticated "current user"
//! endpoint over a PostgreSQL-backed user store. It exists mostly for its
//! data-access layer: a repository facade over a shared connection pool with
//! a scoped-transaction primitive that guarantees every unit of work ends in
//! exactly one of commit or rollback, on every exit path including panics.
//!
//! ## Architecture
//!
//! The HTTP layer is built on [Axum](https://github.com/tokio-rs/axum); all
//! persistence goes through SQLx and PostgreSQL. Requests to `/users/me`
//! carry HTTP Basic credentials which the [`auth`] extractor verifies against
//! the stored Argon2 hash via the user repository. Handlers never touch the
//! pool directly: they hold an [`AppState`] whose
//! [`Repositories`](db::handlers::Repositories) facade hands out plain
//! connections for reads and runs transactional units of work through
//! `with_transaction`.
//!
//! The backing store is selected at startup by configuration: an external
//! PostgreSQL server for production, or an ephemeral embedded instance
//! (`embedded-db` feature) whose data is discarded on shutdown. Both are
//! described by a [`db::connect::ConnectionInfo`] descriptor that renders
//! the DSN and reports its dialect.
//!
//! ## Quick start
//!
//! ```no_run
//! use clap::Parser;
//! use userd::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = userd::config::Args::parse();
//!     let config = Config::load(&args)?;
//!     userd::telemetry::init_telemetry()?;
//!
//!     let app = Application::new(config).await?;
//!     app.serve(async {
//!         tokio::signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
//!     })
//!     .await?;
//!     Ok(())
//! }
//! ```
//!
//! Migrations run automatically on startup from the `migrations/` directory.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod telemetry;
pub mod types;

use axum::Router;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tracing::{debug, info};

use crate::config::DatabaseConfig;
use crate::db::connect::ConnectionInfo;
use crate::db::handlers::Repositories;

pub use config::Config;
pub use types::UserId;

/// Application state shared across all request handlers.
///
/// Handlers reach the database exclusively through
/// [`repositories`](AppState::repositories).
#[derive(Clone)]
pub struct AppState {
    pub repositories: Repositories,
    pub config: Config,
}

/// Get the userd database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

/// Main application struct that owns all resources and lifecycle.
///
/// # Lifecycle
///
/// 1. **Create**: [`Application::new`] opens the database (starting the
///    embedded server first when the ephemeral store is configured), runs
///    migrations and builds the router
/// 2. **Serve**: [`Application::serve`] binds to a TCP port and handles
///    requests until the shutdown future resolves
/// 3. **Shutdown**: closes the pool and stops the embedded database if one
///    was started
pub struct Application {
    router: Router,
    config: Config,
    pool: PgPool,
    #[cfg(feature = "embedded-db")]
    embedded_db: Option<db::embedded::EmbeddedDatabase>,
}

impl Application {
    /// Create a new application instance with all resources initialized
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        debug!("Starting userd with configuration: {:#?}", config);

        #[cfg(feature = "embedded-db")]
        let mut embedded_db: Option<db::embedded::EmbeddedDatabase> = None;

        let conn_info = match &config.database {
            DatabaseConfig::Ephemeral { pool } => {
                #[cfg(feature = "embedded-db")]
                {
                    info!("Starting with ephemeral database: data will be lost on shutdown");
                    let started = db::embedded::EmbeddedDatabase::start().await?;
                    let info = ConnectionInfo::ephemeral(started.connection_string(), pool.clone());
                    embedded_db = Some(started);
                    info
                }
                #[cfg(not(feature = "embedded-db"))]
                {
                    let _ = pool;
                    anyhow::bail!(
                        "Ephemeral database is configured but the feature is not enabled. \
                         Rebuild with --features embedded-db to use the embedded database."
                    );
                }
            }
            external @ DatabaseConfig::External { .. } => {
                info!("Using external database");
                ConnectionInfo::from_config(external)?
            }
        };

        let pool = conn_info.connect().await?;
        migrator().run(&pool).await?;

        let state = AppState {
            repositories: Repositories::new(pool.clone()),
            config: config.clone(),
        };
        let router = api::build_router(state)?;

        Ok(Self {
            router,
            config,
            pool,
            #[cfg(feature = "embedded-db")]
            embedded_db,
        })
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!("userd listening on http://{bind_addr}");

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Closing database connections...");
        self.pool.close().await;

        #[cfg(feature = "embedded-db")]
        if let Some(embedded_db) = self.embedded_db {
            info!("Shutting down embedded database...");
            embedded_db.stop().await?;
        }

        Ok(())
    }
}
