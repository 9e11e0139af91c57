//! Todo repository implementation for PostgreSQL.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;
use uuid::Uuid;

use todo_core::error::{StorageError, StorageResult};
use todo_core::models::{NewTodo, Todo, TodoSortKey};
use todo_core::ports::{OrderDirection, PageStore, TodoFilter, TodoRepository};

use super::database::Database;
use super::helpers::{map_write_error, push_keyset_window};

const TODO_COLUMNS: &str = "id, user_id, title, completed, created_at, updated_at";

/// PostgreSQL implementation of TodoRepository.
pub struct PgTodoRepository {
    pub(super) pool: PgPool,
}

impl PgTodoRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            pool: db.pool().clone(),
        }
    }
}

fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &TodoFilter) {
    if let Some(user_id) = filter.user_id {
        qb.push(" AND user_id = ");
        qb.push_bind(user_id);
    }
    if let Some(completed) = filter.completed {
        qb.push(" AND completed = ");
        qb.push_bind(completed);
    }
}

#[async_trait]
impl PageStore<TodoFilter, Todo> for PgTodoRepository {
    #[instrument(skip(self, filter), level = "debug")]
    async fn fetch_ordered(
        &self,
        sort_key: TodoSortKey,
        direction: OrderDirection,
        after: Option<&Uuid>,
        limit: usize,
        filter: &TodoFilter,
    ) -> StorageResult<Vec<Todo>> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {TODO_COLUMNS} FROM todos WHERE TRUE"
        ));
        push_filter(&mut qb, filter);
        push_keyset_window(
            &mut qb,
            "todos",
            sort_key.column(),
            direction,
            after.copied(),
            limit,
        );

        let rows: Vec<TodoRow> = qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StorageError::QueryError(e.to_string()))?;

        Ok(rows.into_iter().map(Todo::from).collect())
    }

    async fn count_matching(&self, filter: &TodoFilter) -> StorageResult<i64> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM todos WHERE TRUE");
        push_filter(&mut qb, filter);

        qb.build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StorageError::QueryError(e.to_string()))
    }
}

#[async_trait]
impl TodoRepository for PgTodoRepository {
    async fn get_todo(&self, id: Uuid) -> StorageResult<Option<Todo>> {
        let row = sqlx::query_as::<_, TodoRow>(&format!(
            "SELECT {TODO_COLUMNS} FROM todos WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::QueryError(e.to_string()))?;

        Ok(row.map(Todo::from))
    }

    async fn create_todo(&self, todo: NewTodo) -> StorageResult<Todo> {
        let now = Utc::now();
        let row = sqlx::query_as::<_, TodoRow>(&format!(
            r#"
            INSERT INTO todos (id, user_id, title, completed, created_at, updated_at)
            VALUES ($1, $2, $3, FALSE, $4, $4)
            RETURNING {TODO_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(todo.user_id)
        .bind(&todo.title)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(row.into())
    }

    async fn set_todo_completed(&self, id: Uuid, completed: bool) -> StorageResult<Option<Todo>> {
        let row = sqlx::query_as::<_, TodoRow>(&format!(
            r#"
            UPDATE todos
            SET completed = $2, updated_at = now()
            WHERE id = $1
            RETURNING {TODO_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(completed)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(row.map(Todo::from))
    }
}

/// Database row representation for Todo.
#[derive(sqlx::FromRow)]
struct TodoRow {
    id: Uuid,
    user_id: Uuid,
    title: String,
    completed: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<TodoRow> for Todo {
    fn from(row: TodoRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            completed: row.completed,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
