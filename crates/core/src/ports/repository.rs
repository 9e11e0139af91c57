//! Port traits for data repositories.
//!
//! These traits define the storage interface used by the domain layer.
//! Implementations live in the infrastructure layer (e.g., `todo-storage`).

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::StorageResult;
use crate::models::{NewTodo, NewUser, Role, Todo, User};

use super::page_store::{Filter, PageStore};

// =============================================================================
// Filter Types
// =============================================================================

/// Filter options for user listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    pub role: Option<Role>,
}

impl Filter<User> for UserFilter {
    fn matches(&self, user: &User) -> bool {
        self.role.is_none_or(|role| user.role == role)
    }
}

/// Filter options for todo listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoFilter {
    pub user_id: Option<Uuid>,
    pub completed: Option<bool>,
}

impl TodoFilter {
    /// Todos owned by one user.
    pub fn for_user(user_id: Uuid) -> Self {
        Self {
            user_id: Some(user_id),
            ..Default::default()
        }
    }
}

impl Filter<Todo> for TodoFilter {
    fn matches(&self, todo: &Todo) -> bool {
        self.user_id.is_none_or(|id| todo.user_id == id)
            && self.completed.is_none_or(|c| todo.completed == c)
    }
}

// =============================================================================
// Repository Traits
// =============================================================================

/// Repository for user data.
#[async_trait]
pub trait UserRepository: PageStore<UserFilter, User> {
    /// Get user by ID.
    async fn get_user(&self, id: Uuid) -> StorageResult<Option<User>>;

    /// Insert a new user.
    async fn create_user(&self, user: NewUser) -> StorageResult<User>;
}

/// Repository for todo data.
#[async_trait]
pub trait TodoRepository: PageStore<TodoFilter, Todo> {
    /// Get todo by ID.
    async fn get_todo(&self, id: Uuid) -> StorageResult<Option<Todo>>;

    /// Insert a new todo.
    async fn create_todo(&self, todo: NewTodo) -> StorageResult<Todo>;

    /// Mark a todo completed or not. Returns `None` if it does not exist.
    async fn set_todo_completed(&self, id: Uuid, completed: bool) -> StorageResult<Option<Todo>>;
}

// =============================================================================
// Composite Repository
// =============================================================================

/// Combined repository access for the API layer.
pub trait Repositories: Send + Sync {
    /// Access the user repository.
    fn users(&self) -> &dyn UserRepository;

    /// Access the todo repository.
    fn todos(&self) -> &dyn TodoRepository;
}
