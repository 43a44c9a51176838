//! Scribe DB - Credential and blog stores
//!
//! SQLx-based persistence layer for the Scribe backend. Storage is reached
//! only through the async repository traits in [`repo`], so the services can
//! run against PostgreSQL in production and in-memory stores in tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use scribe_db::{create_pool, run_migrations, Repositories, UserRepository};
//!
//! let pool = create_pool("postgres://localhost/scribe", PoolOptions::default()).await?;
//! run_migrations(&pool).await?;
//! let repos = Repositories::new(pool);
//!
//! let user = repos.users.find_by_email("a@x.com").await?;
//! ```

pub mod error;
#[cfg(feature = "test-utils")]
pub mod memory;
pub mod models;
pub mod pg;
pub mod pool;
pub mod repo;

pub use error::{DbError, DbResult};
pub use models::*;
pub use pg::Repositories;
pub use pool::{create_pool, run_migrations, DbPool, PoolOptions};
pub use repo::*;
