//! GraphQL API for users and their todos.
//!
//! Exposes the paginated `users` and `todos` connections, a nested
//! `User.todos` connection, and the mutations that create and update
//! records. Repositories and per-field window limits are attached as
//! schema data:
//!
//! ```ignore
//! use std::sync::Arc;
//! use todo_graphql::{build_schema, PaginationConfig};
//! use todo_storage::MemoryRepositories;
//!
//! let schema = build_schema(Arc::new(MemoryRepositories::new()), PaginationConfig::default());
//! ```
//!
//! Errors carry an `extensions.code` of `BAD_USER_INPUT` or
//! `INTERNAL_SERVER_ERROR`.

mod error;
mod schema;
mod server;
mod types;

pub use error::{
    BAD_USER_INPUT, INTERNAL_SERVER_ERROR, connection_error, domain_error, storage_error,
};
pub use schema::{
    MAX_QUERY_COMPLEXITY, MAX_QUERY_DEPTH, MutationRoot, PageInfo, PaginationConfig, QueryRoot,
    build_schema, schema_builder,
};
pub use server::{ServerConfig, serve_with_shutdown};
pub use types::TodoSchema;
