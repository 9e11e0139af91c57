//! User repository implementation for PostgreSQL.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;
use uuid::Uuid;

use todo_core::error::{StorageError, StorageResult};
use todo_core::models::{NewUser, Role, User, UserSortKey};
use todo_core::ports::{OrderDirection, PageStore, UserFilter, UserRepository};

use super::database::Database;
use super::helpers::{map_write_error, push_keyset_window};

const USER_COLUMNS: &str = "id, email, name, role, created_at, updated_at";

/// PostgreSQL implementation of UserRepository.
pub struct PgUserRepository {
    pub(super) pool: PgPool,
}

impl PgUserRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            pool: db.pool().clone(),
        }
    }
}

/// Append the filter conditions to a statement ending in `WHERE TRUE`.
fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &UserFilter) {
    if let Some(role) = filter.role {
        qb.push(" AND role = ");
        qb.push_bind(role.as_str());
    }
}

#[async_trait]
impl PageStore<UserFilter, User> for PgUserRepository {
    #[instrument(skip(self, filter), level = "debug")]
    async fn fetch_ordered(
        &self,
        sort_key: UserSortKey,
        direction: OrderDirection,
        after: Option<&Uuid>,
        limit: usize,
        filter: &UserFilter,
    ) -> StorageResult<Vec<User>> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {USER_COLUMNS} FROM users WHERE TRUE"
        ));
        push_filter(&mut qb, filter);
        push_keyset_window(
            &mut qb,
            "users",
            sort_key.column(),
            direction,
            after.copied(),
            limit,
        );

        let rows: Vec<UserRow> = qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StorageError::QueryError(e.to_string()))?;

        rows.into_iter().map(UserRow::into_user).collect()
    }

    async fn count_matching(&self, filter: &UserFilter) -> StorageResult<i64> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM users WHERE TRUE");
        push_filter(&mut qb, filter);

        qb.build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StorageError::QueryError(e.to_string()))
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn get_user(&self, id: Uuid) -> StorageResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::QueryError(e.to_string()))?;

        row.map(UserRow::into_user).transpose()
    }

    async fn create_user(&self, user: NewUser) -> StorageResult<User> {
        let now = Utc::now();
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (id, email, name, role, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&user.email)
        .bind(&user.name)
        .bind(user.role.as_str())
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;

        row.into_user()
    }
}

/// Database row representation for User.
#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    name: String,
    role: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> StorageResult<User> {
        let role = Role::parse(&self.role).ok_or_else(|| {
            StorageError::SerializationError(format!("users.role has unknown value {:?}", self.role))
        })?;

        Ok(User {
            id: self.id,
            email: self.email,
            name: self.name,
            role,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
