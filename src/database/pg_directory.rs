use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::database::directory::{DirectoryError, UserDirectory};
use crate::database::manager::DatabaseManager;
use crate::database::models::{Department, NewShadowUser, User};

const USER_COLUMNS: &str =
    "id, username, role, department_id, external_id, is_active, created_at, updated_at";

// Postgres SQLSTATE for unique_violation
const UNIQUE_VIOLATION: &str = "23505";

/// `UserDirectory` backed by the `users` and `departments` tables
#[derive(Clone)]
pub struct PgUserDirectory {
    pool: PgPool,
}

impl PgUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn map_insert_error(err: sqlx::Error, what: &str) -> DirectoryError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
            return DirectoryError::Conflict(what.to_string());
        }
    }
    DirectoryError::Sqlx(err)
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, DirectoryError> {
        let query = format!("SELECT {} FROM users WHERE username = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, DirectoryError> {
        let query = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn backfill_external_id(&self, user_id: Uuid, external_id: &str) -> Result<User, DirectoryError> {
        let result = sqlx::query(
            "UPDATE users SET external_id = $2, updated_at = now()
             WHERE id = $1 AND (external_id IS NULL OR external_id = '')",
        )
        .bind(user_id)
        .bind(external_id)
        .execute(&self.pool)
        .await?;

        debug!("Backfill external id for {}: {} row(s) updated", user_id, result.rows_affected());

        self.find_user_by_id(user_id)
            .await?
            .ok_or_else(|| DirectoryError::NotFound(format!("user {}", user_id)))
    }

    async fn create_shadow_user(
        &self,
        new_user: NewShadowUser,
        sentinel_department: &str,
    ) -> Result<User, DirectoryError> {
        // Dropping the transaction without commit rolls both inserts back
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query("INSERT INTO departments (id, name) VALUES ($1, $2) ON CONFLICT (name) DO NOTHING")
            .bind(Uuid::new_v4())
            .bind(sentinel_department)
            .execute(&mut *tx)
            .await?;

        if inserted.rows_affected() > 0 {
            info!("Created sentinel department '{}'", sentinel_department);
        }

        let department = sqlx::query_as::<_, Department>("SELECT id, name, created_at FROM departments WHERE name = $1")
            .bind(sentinel_department)
            .fetch_one(&mut *tx)
            .await?;

        let query = format!(
            "INSERT INTO users (id, username, role, department_id, external_id, is_active)
             VALUES ($1, $2, $3, $4, $5, true)
             RETURNING {}",
            USER_COLUMNS
        );
        let user = sqlx::query_as::<_, User>(&query)
            .bind(new_user.id)
            .bind(&new_user.username)
            .bind(&new_user.role)
            .bind(department.id)
            .bind(&new_user.external_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| map_insert_error(e, &format!("username '{}'", new_user.username)))?;

        tx.commit().await?;
        Ok(user)
    }

    async fn find_department(&self, id: Uuid) -> Result<Option<Department>, DirectoryError> {
        let department = sqlx::query_as::<_, Department>("SELECT id, name, created_at FROM departments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(department)
    }

    async fn find_department_by_name(&self, name: &str) -> Result<Option<Department>, DirectoryError> {
        let department =
            sqlx::query_as::<_, Department>("SELECT id, name, created_at FROM departments WHERE name = $1")
                .bind(name)
                .fetch_optional(&self.pool)
                .await?;
        Ok(department)
    }

    async fn health_check(&self) -> Result<(), DirectoryError> {
        DatabaseManager::health_check(&self.pool).await?;
        Ok(())
    }
}
