//! Base repository trait and the repository facade.
//!
//! A repository is a data access layer for one table, generic over the
//! client-shaped handle `&mut PgConnection` so the same code runs against a
//! pooled connection or a transaction. [`Repositories`] is the single handle
//! the rest of the application holds: it owns the pool and is the only place
//! transactions are opened.

use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use futures::future::BoxFuture;
use sqlx::pool::PoolConnection;
use sqlx::{PgConnection, PgPool, Postgres};
use tracing::{error, instrument};

use crate::db::errors::{DbError, Result};

/// Base repository trait providing common database operations.
///
/// This trait has separate associated types for create requests and responses.
/// It is written out by hand per repository; there is no interface generation.
#[async_trait::async_trait]
pub trait Repository {
    /// The request type for creating entities
    type CreateRequest;

    /// The response/DTO type returned by operations
    type Response;

    /// The identifier type for lookups
    type Id: Send + Sync;

    /// Create a new entity
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response>;

    /// Get an entity by ID
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>>;
}

/// Aggregate handle over the database: the pool, plain connections and the
/// transaction scope.
///
/// Constructed once at startup from the shared [`PgPool`] and cloned into
/// every request task. HTTP handlers never touch the pool directly; they go
/// through this facade.
#[derive(Clone, Debug)]
pub struct Repositories {
    db: PgPool,
}

impl Repositories {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// The raw pool, for cross-cutting needs like migrations and health
    /// checks. Runtime data access goes through [`acquire`](Self::acquire)
    /// or [`with_transaction`](Self::with_transaction) instead.
    pub fn pool(&self) -> &PgPool {
        &self.db
    }

    /// Check out a plain connection for non-transactional work.
    pub async fn acquire(&self) -> Result<PoolConnection<Postgres>> {
        Ok(self.db.acquire().await?)
    }

    /// Run a unit of work in a transaction.
    ///
    /// The closure receives the transaction's connection, the same handle
    /// shape entity repositories are built from, so repository code does not
    /// know whether it runs inside a transaction. Exactly one of
    /// commit/rollback happens per call, on every exit path:
    ///
    /// - closure returns `Ok`: the transaction is committed; a commit failure
    ///   becomes [`DbError::Commit`]
    /// - closure returns `Err`: the transaction is rolled back and the
    ///   closure's error is returned; if the rollback itself fails, both
    ///   errors are retained in [`DbError::RollbackFailed`]
    /// - closure panics: a rollback is attempted and the panic is re-raised
    ///   unchanged
    /// - the future is dropped at an await point (caller cancelled): the
    ///   live transaction is dropped, which queues the rollback
    ///
    /// Usage:
    ///
    /// ```ignore
    /// let user = repos
    ///     .with_transaction(|conn| {
    ///         Box::pin(async move {
    ///             let mut users = Users::new(conn);
    ///             users.create(&request).await
    ///         })
    ///     })
    ///     .await?;
    /// ```
    #[instrument(skip_all)]
    pub async fn with_transaction<T, F>(&self, f: F) -> Result<T>
    where
        F: for<'t> FnOnce(&'t mut PgConnection) -> BoxFuture<'t, Result<T>> + Send,
        T: Send,
    {
        let mut tx = self.db.begin().await?;

        // The unit of work must not unwind through us and leave the
        // transaction dangling: catch the panic, roll back, re-raise.
        let result = match AssertUnwindSafe(f(&mut *tx)).catch_unwind().await {
            Ok(result) => result,
            Err(panic) => {
                if let Err(rollback_err) = tx.rollback().await {
                    error!("rolling back transaction after panic: {rollback_err}");
                }
                std::panic::resume_unwind(panic);
            }
        };

        match result {
            Ok(value) => {
                tx.commit().await.map_err(|source| DbError::Commit { source })?;
                Ok(value)
            }
            Err(err) => match tx.rollback().await {
                Ok(()) => Err(err),
                Err(rollback) => Err(DbError::RollbackFailed {
                    source: Box::new(err),
                    rollback,
                }),
            },
        }
    }
}
