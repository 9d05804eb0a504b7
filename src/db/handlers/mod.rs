//! Repository implementations for database access.
//!
//! Each repository:
//! - Wraps a SQLx connection or transaction (`&mut PgConnection`)
//! - Provides strongly-typed operations for one entity
//! - Returns domain models from [`crate::db::models`]
//!
//! The [`Repositories`] facade is the only entry point the rest of the
//! application uses: it owns the pool, hands out plain connections, and runs
//! transactional units of work via
//! [`Repositories::with_transaction`](repository::Repositories::with_transaction).
//!
//! # Common pattern
//!
//! ```ignore
//! use userd::db::handlers::{Repositories, Repository, Users};
//!
//! async fn example(repos: &Repositories) -> Result<(), Box<dyn std::error::Error>> {
//!     // Plain read on a pooled connection
//!     let mut conn = repos.acquire().await?;
//!     let mut users = Users::new(&mut conn);
//!     if let Some(user) = users.get_by_email("user@example.com").await? {
//!         println!("Found user: {}", user.email);
//!     }
//!     Ok(())
//! }
//! ```

pub mod repository;
pub mod users;

pub use repository::{Repositories, Repository};
pub use users::{AuthError, Users};
