//! In-memory storage adapter.
//!
//! Implements the same repository contracts as the PostgreSQL adapter over
//! plain vectors. Used by the `--in-memory` development mode and by tests
//! of the layers above storage.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use todo_core::error::{StorageError, StorageResult};
use todo_core::keyset::{is_after, sort_items};
use todo_core::models::{NewTodo, NewUser, Todo, User};
use todo_core::ports::{
    Filter, OrderDirection, PageItem, PageStore, Repositories, TodoRepository, UserRepository,
};

/// Vector-backed store for one resource.
pub struct MemoryStore<T> {
    rows: RwLock<Vec<T>>,
}

impl<T> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> MemoryStore<T> {
    pub fn new() -> Self {
        Self::with_items(Vec::new())
    }

    pub fn with_items(items: Vec<T>) -> Self {
        Self {
            rows: RwLock::new(items),
        }
    }

    /// Append an item as-is.
    pub async fn insert(&self, item: T) {
        self.rows.write().await.push(item);
    }
}

impl<T: PageItem + Clone> MemoryStore<T> {
    async fn find(&self, id: &T::Id) -> Option<T> {
        self.rows.read().await.iter().find(|r| r.id() == id).cloned()
    }
}

#[async_trait]
impl<F, T> PageStore<F, T> for MemoryStore<T>
where
    F: Filter<T>,
    T: PageItem + Clone,
{
    async fn fetch_ordered(
        &self,
        sort_key: T::SortKey,
        direction: OrderDirection,
        after: Option<&T::Id>,
        limit: usize,
        filter: &F,
    ) -> StorageResult<Vec<T>> {
        let rows = self.rows.read().await;

        // The anchor is looked up regardless of the filter, like the SQL subquery
        let anchor = match after {
            Some(id) => match rows.iter().find(|r| r.id() == id) {
                Some(anchor) => Some(anchor),
                None => return Ok(Vec::new()),
            },
            None => None,
        };

        let mut page: Vec<T> = rows
            .iter()
            .filter(|r| filter.matches(r))
            .filter(|r| anchor.is_none_or(|a| is_after(*r, a, sort_key, direction)))
            .cloned()
            .collect();

        sort_items(&mut page, sort_key, direction);
        page.truncate(limit);
        Ok(page)
    }

    async fn count_matching(&self, filter: &F) -> StorageResult<i64> {
        let rows = self.rows.read().await;
        Ok(rows.iter().filter(|r| filter.matches(r)).count() as i64)
    }
}

#[async_trait]
impl UserRepository for MemoryStore<User> {
    async fn get_user(&self, id: Uuid) -> StorageResult<Option<User>> {
        Ok(self.find(&id).await)
    }

    async fn create_user(&self, user: NewUser) -> StorageResult<User> {
        let mut rows = self.rows.write().await;

        if rows.iter().any(|u| u.email == user.email) {
            return Err(StorageError::ConstraintViolation(format!(
                "email {} is already registered",
                user.email
            )));
        }

        let now = Utc::now();
        let created = User {
            id: Uuid::new_v4(),
            email: user.email,
            name: user.name,
            role: user.role,
            created_at: now,
            updated_at: now,
        };
        rows.push(created.clone());
        Ok(created)
    }
}

#[async_trait]
impl TodoRepository for MemoryStore<Todo> {
    async fn get_todo(&self, id: Uuid) -> StorageResult<Option<Todo>> {
        Ok(self.find(&id).await)
    }

    async fn create_todo(&self, todo: NewTodo) -> StorageResult<Todo> {
        let now = Utc::now();
        let created = Todo {
            id: Uuid::new_v4(),
            user_id: todo.user_id,
            title: todo.title,
            completed: false,
            created_at: now,
            updated_at: now,
        };
        self.insert(created.clone()).await;
        Ok(created)
    }

    async fn set_todo_completed(&self, id: Uuid, completed: bool) -> StorageResult<Option<Todo>> {
        let mut rows = self.rows.write().await;
        Ok(rows.iter_mut().find(|t| t.id == id).map(|todo| {
            todo.completed = completed;
            todo.updated_at = Utc::now();
            todo.clone()
        }))
    }
}

/// In-memory counterpart of `PgRepositories`.
#[derive(Default)]
pub struct MemoryRepositories {
    pub users: MemoryStore<User>,
    pub todos: MemoryStore<Todo>,
}

impl MemoryRepositories {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Repositories for MemoryRepositories {
    fn users(&self) -> &dyn UserRepository {
        &self.users
    }

    fn todos(&self) -> &dyn TodoRepository {
        &self.todos
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration};
    use todo_core::models::{Role, TodoSortKey, UserSortKey};
    use todo_core::ports::{TodoFilter, UserFilter};

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap() + Duration::seconds(secs)
    }

    fn todo(id: u128, user_id: Uuid, created: i64) -> Todo {
        Todo {
            id: Uuid::from_u128(id),
            user_id,
            title: format!("todo {id}"),
            completed: false,
            created_at: at(created),
            updated_at: at(created),
        }
    }

    fn ids(todos: &[Todo]) -> Vec<u128> {
        todos.iter().map(|t| t.id.as_u128()).collect()
    }

    // Test critique: à valeur de tri égale, l'id départage dans les deux sens
    #[tokio::test]
    async fn test_ties_ordered_by_id_in_both_directions() {
        let owner = Uuid::from_u128(1);
        let store = MemoryStore::with_items(vec![todo(3, owner, 0), todo(1, owner, 0), todo(2, owner, 0)]);
        let filter = TodoFilter::default();

        let asc = store
            .fetch_ordered(TodoSortKey::CreatedAt, OrderDirection::Asc, None, 10, &filter)
            .await
            .unwrap();
        let desc = store
            .fetch_ordered(TodoSortKey::CreatedAt, OrderDirection::Desc, None, 10, &filter)
            .await
            .unwrap();

        assert_eq!(ids(&asc), [1, 2, 3]);
        assert_eq!(ids(&desc), [3, 2, 1]);
    }

    #[tokio::test]
    async fn test_reads_strictly_after_cursor() {
        let owner = Uuid::from_u128(1);
        let store = MemoryStore::with_items((1..=5).map(|i| todo(i, owner, i as i64)).collect());
        let filter = TodoFilter::default();
        let cursor = Uuid::from_u128(3);

        let after = store
            .fetch_ordered(TodoSortKey::CreatedAt, OrderDirection::Asc, Some(&cursor), 10, &filter)
            .await
            .unwrap();
        let before = store
            .fetch_ordered(TodoSortKey::CreatedAt, OrderDirection::Desc, Some(&cursor), 1, &filter)
            .await
            .unwrap();

        assert_eq!(ids(&after), [4, 5]);
        assert_eq!(ids(&before), [2]);
    }

    // Test critique: un curseur disparu donne une page vide, pas une erreur
    #[tokio::test]
    async fn test_missing_cursor_yields_empty_page() {
        let owner = Uuid::from_u128(1);
        let store = MemoryStore::with_items(vec![todo(1, owner, 0)]);
        let gone = Uuid::from_u128(42);

        let page = store
            .fetch_ordered(
                TodoSortKey::CreatedAt,
                OrderDirection::Asc,
                Some(&gone),
                10,
                &TodoFilter::default(),
            )
            .await
            .unwrap();
        assert!(page.is_empty());
    }

    #[tokio::test]
    async fn test_cursor_outside_filter_still_anchors() {
        let alice = Uuid::from_u128(1);
        let bob = Uuid::from_u128(2);
        let store = MemoryStore::with_items(vec![
            todo(10, alice, 1),
            todo(11, bob, 2),
            todo(12, alice, 3),
        ]);
        let cursor = Uuid::from_u128(11);

        let page = store
            .fetch_ordered(
                TodoSortKey::CreatedAt,
                OrderDirection::Asc,
                Some(&cursor),
                10,
                &TodoFilter::for_user(alice),
            )
            .await
            .unwrap();
        assert_eq!(ids(&page), [12]);
        assert_eq!(store.count_matching(&TodoFilter::for_user(alice)).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let users = MemoryStore::<User>::new();
        let new_user = NewUser {
            email: "ada@example.com".into(),
            name: "Ada".into(),
            role: Role::Admin,
        };

        users.create_user(new_user.clone()).await.unwrap();
        let err = users.create_user(new_user).await.unwrap_err();
        assert!(matches!(err, StorageError::ConstraintViolation(_)));

        let admins = users
            .fetch_ordered(
                UserSortKey::CreatedAt,
                OrderDirection::Asc,
                None,
                10,
                &UserFilter {
                    role: Some(Role::Admin),
                },
            )
            .await
            .unwrap();
        assert_eq!(admins.len(), 1);
    }

    #[tokio::test]
    async fn test_set_completed_unknown_todo_is_none() {
        let repos = MemoryRepositories::new();
        let result = repos
            .todos()
            .set_todo_completed(Uuid::new_v4(), true)
            .await
            .unwrap();
        assert!(result.is_none());
    }
}
