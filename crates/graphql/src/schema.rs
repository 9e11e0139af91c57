//! GraphQL schema definition.
//!
//! Query and mutation roots for users and their todos. Every list field
//! is a Relay connection resolved through
//! [`todo_core::services::resolve_connection`].

use std::sync::Arc;

use async_graphql::{ComplexObject, Context, EmptySubscription, Object, Result, Schema, SchemaBuilder};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use todo_core::error::DomainError;
use todo_core::models::{NewTodo, NewUser};
use todo_core::ports::{ConnectionArgs, Cursor, PageLimits, Repositories, TodoFilter, UserFilter};
use todo_core::services::resolve_connection;

use crate::error::{connection_error, domain_error, storage_error};
use crate::types::TodoSchema;

// -----------------------------------------------------------------------------
// Schema Configuration
// -----------------------------------------------------------------------------

/// Maximum query depth to prevent deeply nested queries (DoS protection).
/// Note: GraphQL introspection requires depth ~13, so we use 15 to allow it.
pub const MAX_QUERY_DEPTH: usize = 15;

/// Maximum query complexity score (DoS protection).
/// Each field has a default complexity of 1, nested objects multiply.
pub const MAX_QUERY_COMPLEXITY: usize = 500;

/// Window limits for each paginated list field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationConfig {
    /// Admin user listing.
    pub users: PageLimits,
    /// Todo listings, top-level and nested under a user.
    pub todos: PageLimits,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            users: PageLimits::new(30, 30, 10),
            todos: PageLimits::new(50, 50, 20),
        }
    }
}

// -----------------------------------------------------------------------------
// Schema Builder
// -----------------------------------------------------------------------------

/// Build the schema with depth and complexity limits.
pub fn build_schema<R: Repositories + 'static>(
    repositories: Arc<R>,
    pagination: PaginationConfig,
) -> TodoSchema {
    schema_builder(repositories, pagination)
        .limit_depth(MAX_QUERY_DEPTH)
        .limit_complexity(MAX_QUERY_COMPLEXITY)
        .finish()
}

/// Create a schema builder with repositories and pagination config attached.
///
/// Remember to call `.limit_depth()` and `.limit_complexity()` before `.finish()`.
pub fn schema_builder<R: Repositories + 'static>(
    repositories: Arc<R>,
    pagination: PaginationConfig,
) -> SchemaBuilder<QueryRoot, MutationRoot, EmptySubscription> {
    let repos: Arc<dyn Repositories> = repositories;
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(repos)
        .data(pagination)
}

// -----------------------------------------------------------------------------
// Query Root
// -----------------------------------------------------------------------------

#[derive(Default)]
pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Get a user by ID.
    async fn user<'ctx>(&self, ctx: &Context<'ctx>, id: Uuid) -> Result<Option<User>> {
        let repos = ctx.data::<Arc<dyn Repositories>>()?;

        let user = repos.users().get_user(id).await.map_err(storage_error)?;
        Ok(user.map(User::from))
    }

    /// List all users (admin listing).
    #[allow(clippy::too_many_arguments)]
    async fn users<'ctx>(
        &self,
        ctx: &Context<'ctx>,
        first: Option<i32>,
        after: Option<String>,
        last: Option<i32>,
        before: Option<String>,
        #[graphql(default)] sort_key: UserSortKey,
        #[graphql(default = true)] reverse: bool,
        role: Option<Role>,
    ) -> Result<UserConnection> {
        let repos = ctx.data::<Arc<dyn Repositories>>()?;
        let config = ctx.data::<PaginationConfig>()?;

        let args = window_args(first, after, last, before, sort_key.into(), reverse);
        let filter = UserFilter {
            role: role.map(Into::into),
        };

        let connection = resolve_connection(repos.users(), args, &config.users, filter)
            .await
            .map_err(connection_error)?;

        Ok(UserConnection::from(connection))
    }

    /// Get a todo by ID.
    async fn todo<'ctx>(&self, ctx: &Context<'ctx>, id: Uuid) -> Result<Option<Todo>> {
        let repos = ctx.data::<Arc<dyn Repositories>>()?;

        let todo = repos.todos().get_todo(id).await.map_err(storage_error)?;
        Ok(todo.map(Todo::from))
    }

    /// List todos, optionally restricted to one user.
    #[allow(clippy::too_many_arguments)]
    async fn todos<'ctx>(
        &self,
        ctx: &Context<'ctx>,
        user_id: Option<Uuid>,
        first: Option<i32>,
        after: Option<String>,
        last: Option<i32>,
        before: Option<String>,
        #[graphql(default)] sort_key: TodoSortKey,
        #[graphql(default = true)] reverse: bool,
        completed: Option<bool>,
    ) -> Result<TodoConnection> {
        let filter = TodoFilter { user_id, completed };
        let args = window_args(first, after, last, before, sort_key.into(), reverse);
        list_todos(ctx, args, filter).await
    }
}

async fn list_todos(
    ctx: &Context<'_>,
    args: ConnectionArgs<todo_core::models::TodoSortKey>,
    filter: TodoFilter,
) -> Result<TodoConnection> {
    let repos = ctx.data::<Arc<dyn Repositories>>()?;
    let config = ctx.data::<PaginationConfig>()?;

    let connection = resolve_connection(repos.todos(), args, &config.todos, filter)
        .await
        .map_err(connection_error)?;

    Ok(TodoConnection::from(connection))
}

// -----------------------------------------------------------------------------
// Mutation Root
// -----------------------------------------------------------------------------

#[derive(Default)]
pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Register a new user.
    async fn create_user<'ctx>(
        &self,
        ctx: &Context<'ctx>,
        email: String,
        name: String,
        #[graphql(default)] role: Role,
    ) -> Result<User> {
        let repos = ctx.data::<Arc<dyn Repositories>>()?;

        let email = validate_text(email, "email", MAX_EMAIL_LENGTH).map_err(domain_error)?;
        if !email.contains('@') {
            return Err(domain_error(DomainError::ValidationError(
                "email must contain '@'".into(),
            )));
        }
        let name = validate_text(name, "name", MAX_NAME_LENGTH).map_err(domain_error)?;

        let user = repos
            .users()
            .create_user(NewUser {
                email,
                name,
                role: role.into(),
            })
            .await
            .map_err(storage_error)?;

        Ok(User::from(user))
    }

    /// Add a todo to a user's list.
    async fn create_todo<'ctx>(
        &self,
        ctx: &Context<'ctx>,
        user_id: Uuid,
        title: String,
    ) -> Result<Todo> {
        let repos = ctx.data::<Arc<dyn Repositories>>()?;

        let title = validate_text(title, "title", MAX_TITLE_LENGTH).map_err(domain_error)?;

        if repos.users().get_user(user_id).await.map_err(storage_error)?.is_none() {
            return Err(domain_error(DomainError::UserNotFound(user_id)));
        }

        let todo = repos
            .todos()
            .create_todo(NewTodo { user_id, title })
            .await
            .map_err(storage_error)?;

        Ok(Todo::from(todo))
    }

    /// Mark a todo as completed or not.
    async fn set_todo_completed<'ctx>(
        &self,
        ctx: &Context<'ctx>,
        id: Uuid,
        completed: bool,
    ) -> Result<Todo> {
        let repos = ctx.data::<Arc<dyn Repositories>>()?;

        let todo = repos
            .todos()
            .set_todo_completed(id, completed)
            .await
            .map_err(storage_error)?
            .ok_or_else(|| domain_error(DomainError::TodoNotFound(id)))?;

        Ok(Todo::from(todo))
    }
}

// -----------------------------------------------------------------------------
// GraphQL Types
// -----------------------------------------------------------------------------

/// Role of a user account.
#[derive(async_graphql::Enum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Role {
    #[default]
    Member,
    Admin,
}

impl From<Role> for todo_core::models::Role {
    fn from(role: Role) -> Self {
        match role {
            Role::Member => Self::Member,
            Role::Admin => Self::Admin,
        }
    }
}

impl From<todo_core::models::Role> for Role {
    fn from(role: todo_core::models::Role) -> Self {
        match role {
            todo_core::models::Role::Member => Self::Member,
            todo_core::models::Role::Admin => Self::Admin,
        }
    }
}

/// Field users are sorted by.
#[derive(async_graphql::Enum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UserSortKey {
    #[default]
    CreatedAt,
    UpdatedAt,
}

impl From<UserSortKey> for todo_core::models::UserSortKey {
    fn from(key: UserSortKey) -> Self {
        match key {
            UserSortKey::CreatedAt => Self::CreatedAt,
            UserSortKey::UpdatedAt => Self::UpdatedAt,
        }
    }
}

/// Field todos are sorted by.
#[derive(async_graphql::Enum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TodoSortKey {
    #[default]
    CreatedAt,
    UpdatedAt,
}

impl From<TodoSortKey> for todo_core::models::TodoSortKey {
    fn from(key: TodoSortKey) -> Self {
        match key {
            TodoSortKey::CreatedAt => Self::CreatedAt,
            TodoSortKey::UpdatedAt => Self::UpdatedAt,
        }
    }
}

/// User type.
#[derive(async_graphql::SimpleObject)]
#[graphql(complex)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<todo_core::models::User> for User {
    fn from(u: todo_core::models::User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            name: u.name,
            role: u.role.into(),
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

#[ComplexObject]
impl User {
    /// This user's todos.
    #[allow(clippy::too_many_arguments)]
    async fn todos<'ctx>(
        &self,
        ctx: &Context<'ctx>,
        first: Option<i32>,
        after: Option<String>,
        last: Option<i32>,
        before: Option<String>,
        #[graphql(default)] sort_key: TodoSortKey,
        #[graphql(default = true)] reverse: bool,
        completed: Option<bool>,
    ) -> Result<TodoConnection> {
        let filter = TodoFilter {
            user_id: Some(self.id),
            completed,
        };
        let args = window_args(first, after, last, before, sort_key.into(), reverse);
        list_todos(ctx, args, filter).await
    }
}

/// Todo type.
#[derive(async_graphql::SimpleObject)]
pub struct Todo {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<todo_core::models::Todo> for Todo {
    fn from(t: todo_core::models::Todo) -> Self {
        Self {
            id: t.id,
            user_id: t.user_id,
            title: t.title,
            completed: t.completed,
            created_at: t.created_at,
            updated_at: t.updated_at,
        }
    }
}

// -----------------------------------------------------------------------------
// Connection Types (Relay-style pagination)
// -----------------------------------------------------------------------------

#[derive(async_graphql::SimpleObject)]
pub struct PageInfo {
    pub has_next_page: bool,
    pub has_previous_page: bool,
    pub start_cursor: Option<String>,
    pub end_cursor: Option<String>,
}

impl From<todo_core::ports::PageInfo> for PageInfo {
    fn from(info: todo_core::ports::PageInfo) -> Self {
        Self {
            has_next_page: info.has_next_page,
            has_previous_page: info.has_previous_page,
            start_cursor: info.start_cursor.map(|c| c.value),
            end_cursor: info.end_cursor.map(|c| c.value),
        }
    }
}

/// Generate Relay-style connection types (Edge + Connection) with From impl.
macro_rules! define_connection {
    ($node:ty, $core_model:ty, $edge:ident, $connection:ident) => {
        #[derive(async_graphql::SimpleObject)]
        pub struct $edge {
            pub node: $node,
            pub cursor: String,
        }

        #[derive(async_graphql::SimpleObject)]
        pub struct $connection {
            pub edges: Vec<$edge>,
            pub page_info: PageInfo,
            pub total_count: i64,
        }

        impl From<todo_core::ports::Connection<$core_model>> for $connection {
            fn from(conn: todo_core::ports::Connection<$core_model>) -> Self {
                Self {
                    edges: conn
                        .edges
                        .into_iter()
                        .map(|e| $edge {
                            node: <$node>::from(e.node),
                            cursor: e.cursor.value,
                        })
                        .collect(),
                    page_info: PageInfo::from(conn.page_info),
                    total_count: conn.total_count,
                }
            }
        }
    };
}

define_connection!(User, todo_core::models::User, UserEdge, UserConnection);
define_connection!(Todo, todo_core::models::Todo, TodoEdge, TodoConnection);

// -----------------------------------------------------------------------------
// Helpers & Validation
// -----------------------------------------------------------------------------

/// Maximum length for email addresses.
const MAX_EMAIL_LENGTH: usize = 254;
/// Maximum length for display names.
const MAX_NAME_LENGTH: usize = 128;
/// Maximum length for todo titles.
const MAX_TITLE_LENGTH: usize = 512;

/// Collect the window arguments of a list field.
fn window_args<K>(
    first: Option<i32>,
    after: Option<String>,
    last: Option<i32>,
    before: Option<String>,
    sort_key: K,
    reverse: bool,
) -> ConnectionArgs<K> {
    ConnectionArgs {
        first,
        after: after.map(Cursor::new),
        last,
        before: before.map(Cursor::new),
        sort_key,
        reverse,
    }
}

/// Trim and bound a free-text input.
fn validate_text(value: String, field_name: &str, max_len: usize) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::ValidationError(format!(
            "{} cannot be empty",
            field_name
        )));
    }
    if trimmed.len() > max_len {
        return Err(DomainError::ValidationError(format!(
            "{} too long: maximum {} characters allowed",
            field_name, max_len
        )));
    }
    Ok(trimmed.to_string())
}
