/// User database operations
use async_trait::async_trait;
use error_types::ServiceResult;
use sqlx::PgPool;

use crate::models::{NewUser, User};

/// Storage for user accounts.
///
/// Lookups return `Ok(None)` when nothing matches; `Err` is reserved for
/// storage failures and constraint violations.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> ServiceResult<Option<User>>;

    async fn find_by_username(&self, username: &str) -> ServiceResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> ServiceResult<Option<User>>;

    /// Insert a user. Duplicate username or email is a `Conflict`.
    async fn create(&self, new_user: NewUser) -> ServiceResult<User>;

    /// Replace the password hash. Returns `false` if the user does not exist.
    async fn update_password(&self, id: i64, password_hash: &str) -> ServiceResult<bool>;
}

const USER_COLUMNS: &str = "id, username, email, password_hash, full_name, created_at, updated_at";

/// Postgres-backed [`UserRepository`]
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: i64) -> ServiceResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> ServiceResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> ServiceResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn create(&self, new_user: NewUser) -> ServiceResult<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (username, email, password_hash, full_name, created_at, updated_at)
            VALUES ($1, $2, $3, $4, NOW(), NOW())
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&new_user.username)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .bind(&new_user.full_name)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    async fn update_password(&self, id: i64, password_hash: &str) -> ServiceResult<bool> {
        let result =
            sqlx::query("UPDATE users SET password_hash = $1, updated_at = NOW() WHERE id = $2")
                .bind(password_hash)
                .bind(id)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }
}
