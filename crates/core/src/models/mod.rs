//! Domain models for users and their todos.
//!
//! These models are storage-agnostic and represent the canonical
//! form of data within the domain layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ports::PageItem;

// =============================================================================
// Users
// =============================================================================

/// Role of a user account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Member,
    Admin,
}

impl Role {
    /// Storage representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Admin => "admin",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "member" => Some(Self::Member),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }
}

/// A user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Columns users can be listed by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum UserSortKey {
    #[default]
    CreatedAt,
    UpdatedAt,
}

impl UserSortKey {
    /// Backing column in the `users` table.
    pub fn column(self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
        }
    }
}

impl PageItem for User {
    type Id = Uuid;
    type SortKey = UserSortKey;
    type SortValue = DateTime<Utc>;

    const RESOURCE: &'static str = "users";

    fn id(&self) -> &Uuid {
        &self.id
    }

    fn sort_value(&self, key: UserSortKey) -> DateTime<Utc> {
        match key {
            UserSortKey::CreatedAt => self.created_at,
            UserSortKey::UpdatedAt => self.updated_at,
        }
    }
}

/// Fields needed to create a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub role: Role,
}

// =============================================================================
// Todos
// =============================================================================

/// A todo item owned by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Columns todos can be listed by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TodoSortKey {
    #[default]
    CreatedAt,
    UpdatedAt,
}

impl TodoSortKey {
    /// Backing column in the `todos` table.
    pub fn column(self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
        }
    }
}

impl PageItem for Todo {
    type Id = Uuid;
    type SortKey = TodoSortKey;
    type SortValue = DateTime<Utc>;

    const RESOURCE: &'static str = "todos";

    fn id(&self) -> &Uuid {
        &self.id
    }

    fn sort_value(&self, key: TodoSortKey) -> DateTime<Utc> {
        match key {
            TodoSortKey::CreatedAt => self.created_at,
            TodoSortKey::UpdatedAt => self.updated_at,
        }
    }
}

/// Fields needed to create a todo.
#[derive(Debug, Clone)]
pub struct NewTodo {
    pub user_id: Uuid,
    pub title: String,
}
