//! PostgreSQL storage adapter.
//!
//! This module implements the repository traits defined in `todo-core`
//! using PostgreSQL as the backing store.
//!
//! # Architecture
//!
//! - [`Database`] - Connection pool and migrations
//! - [`PgRepositories`] - Composite repository implementing `Repositories` trait
//! - Individual repos: `PgUserRepository`, `PgTodoRepository`
//!
//! # Usage
//!
//! ```ignore
//! let config = DatabaseConfig::for_api(&database_url);
//! let db = Database::connect(&config).await?;
//! db.migrate().await?;
//!
//! let repositories = PgRepositories::new(&db);
//! ```

mod database;
mod helpers;
mod todo_repo;
mod user_repo;

pub use database::{Database, DatabaseConfig};
pub use todo_repo::PgTodoRepository;
pub use user_repo::PgUserRepository;

use todo_core::ports::{Repositories, TodoRepository, UserRepository};

// =============================================================================
// Composite Repository
// =============================================================================

/// Aggregated PostgreSQL repositories implementing the `Repositories` trait.
pub struct PgRepositories {
    users: PgUserRepository,
    todos: PgTodoRepository,
}

impl PgRepositories {
    /// Create a new repository aggregate from a database connection.
    pub fn new(db: &Database) -> Self {
        Self {
            users: PgUserRepository::new(db),
            todos: PgTodoRepository::new(db),
        }
    }
}

impl Repositories for PgRepositories {
    fn users(&self) -> &dyn UserRepository {
        &self.users
    }

    fn todos(&self) -> &dyn TodoRepository {
        &self.todos
    }
}
