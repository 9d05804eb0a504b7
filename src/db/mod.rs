//! Database layer for data persistence and access.
//!
//! This module implements the data access layer using SQLx with PostgreSQL.
//! It follows the Repository pattern to provide clean abstractions over database operations.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐
//! │   Handlers   │  (API request handlers)
//! └──────┬───────┘
//!        │
//!        ↓
//! ┌──────────────┐
//! │ Repositories │  (db::handlers - facade, transaction scope, queries)
//! └──────┬───────┘
//!        │
//!        ↓
//! ┌──────────────┐
//! │    Models    │  (db::models - database records)
//! └──────┬───────┘
//!        │
//!        ↓
//! ┌──────────────┐
//! │  PostgreSQL  │
//! └──────────────┘
//! ```
//!
//! # Modules
//!
//! - [`connect`]: Connection descriptors and pool construction
//! - [`handlers`]: Repository implementations and the transaction scope
//! - [`models`]: Database record structures matching table schemas
//! - [`errors`]: Database-specific error types
//! - [`embedded`]: Embedded PostgreSQL support (optional feature)
//!
//! # Transactions
//!
//! Entity repositories take `&mut PgConnection` so they run identically
//! against a pooled connection or a transaction. Units of work that must be
//! atomic go through [`handlers::Repositories::with_transaction`], which
//! guarantees that exactly one of commit/rollback happens on every exit path:
//!
//! ```ignore
//! let created = repos
//!     .with_transaction(|conn| {
//!         Box::pin(async move {
//!             let mut users = Users::new(conn);
//!             users.create(&request).await
//!         })
//!     })
//!     .await?;
//! ```
//!
//! # Migrations
//!
//! Database migrations are managed by SQLx and located in the `migrations/`
//! directory. The [`crate::migrator`] function provides access to the migrator:
//!
//! ```ignore
//! userd::migrator().run(&pool).await?;
//! ```

pub mod connect;
#[cfg(feature = "embedded-db")]
pub mod embedded;
pub mod errors;
pub mod handlers;
pub mod models;
