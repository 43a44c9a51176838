//! PostgreSQL repository implementations

mod blog;
mod user;

pub use blog::PgBlogRepository;
pub use user::PgUserRepository;

use crate::DbPool;

/// All repositories bundled together
#[derive(Clone)]
pub struct Repositories {
    pub users: PgUserRepository,
    pub blogs: PgBlogRepository,
}

impl Repositories {
    /// Create all repositories from a database pool
    pub fn new(pool: DbPool) -> Self {
        Self {
            users: PgUserRepository::new(pool.clone()),
            blogs: PgBlogRepository::new(pool),
        }
    }
}
