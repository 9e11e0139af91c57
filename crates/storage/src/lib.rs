//! Storage layer for the todo API.
//!
//! This crate provides implementations of the repository traits defined in
//! `todo-core`: PostgreSQL for production and an in-memory store for
//! development and tests. Both honour the same keyset contract: rows are
//! ordered by `(sort column, id)` and read strictly after a cursor row.
//!
//! # Usage
//!
//! ```ignore
//! use todo_storage::{Database, DatabaseConfig, PgRepositories};
//!
//! // Connect to the database
//! let config = DatabaseConfig::for_api(&database_url);
//! let db = Database::connect(&config).await?;
//!
//! // Run migrations
//! db.migrate().await?;
//!
//! // Create repositories
//! let repositories = Arc::new(PgRepositories::new(&db));
//! ```

pub mod memory;
pub mod postgres;

pub use memory::{MemoryRepositories, MemoryStore};
pub use postgres::{Database, DatabaseConfig, PgRepositories};
