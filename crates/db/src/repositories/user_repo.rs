//! Repository for the `users` table.

use gymplan_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::{Availability, CreateUser, User};

const COLUMNS: &str = "id, username, email, first_name, last_name, password_hash, \
                       is_active, created_at, updated_at";

pub struct UserRepo;

impl UserRepo {
    /// Insert an account. A race on username or email surfaces as a
    /// `uq_users_*` unique violation.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (username, email, first_name, last_name, password_hash)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        ))
        .bind(&input.username)
        .bind(&input.email)
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(&input.password_hash)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Case-sensitive, as usernames are.
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE username = $1"))
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// Check both registration keys in one round trip.
    pub async fn availability(
        pool: &PgPool,
        username: &str,
        email: &str,
    ) -> Result<Availability, sqlx::Error> {
        sqlx::query_as::<_, Availability>(
            "SELECT EXISTS (SELECT 1 FROM users WHERE username = $1) AS username_taken,
                    EXISTS (SELECT 1 FROM users WHERE email = $2) AS email_taken",
        )
        .bind(username)
        .bind(email)
        .fetch_one(pool)
        .await
    }

    /// Delete an account. Plans and sessions cascade.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
