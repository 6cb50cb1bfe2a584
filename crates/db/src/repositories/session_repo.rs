//! Repository for the `user_sessions` table.

use gymplan_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::session::{NewSession, Session};

const COLUMNS: &str = "id, user_id, refresh_token_hash, expires_at, is_revoked, created_at";

/// Condition for a session that can still be exchanged.
const LIVE: &str = "is_revoked = false AND expires_at > NOW()";

pub struct SessionRepo;

impl SessionRepo {
    /// Open a session for a freshly authenticated user.
    pub async fn open(pool: &PgPool, input: &NewSession) -> Result<Session, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let session = Self::insert_inner(&mut tx, input).await?;
        tx.commit().await?;
        Ok(session)
    }

    /// Exchange the live session holding `presented_hash` for a new one
    /// holding `replacement_hash`.
    ///
    /// Revoking the old row and inserting the new one happen in one
    /// transaction. Returns `None` if no live session holds the presented
    /// hash, which includes the loser of two concurrent refreshes with the
    /// same token.
    pub async fn rotate(
        pool: &PgPool,
        presented_hash: &str,
        replacement_hash: &str,
        expires_at: Timestamp,
    ) -> Result<Option<Session>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let revoked: Option<(DbId,)> = sqlx::query_as(&format!(
            "UPDATE user_sessions SET is_revoked = true
             WHERE refresh_token_hash = $1 AND {LIVE}
             RETURNING user_id"
        ))
        .bind(presented_hash)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((user_id,)) = revoked else {
            return Ok(None);
        };

        let replacement = NewSession {
            user_id,
            refresh_token_hash: replacement_hash.to_string(),
            expires_at,
        };
        let session = Self::insert_inner(&mut tx, &replacement).await?;
        tx.commit().await?;
        Ok(Some(session))
    }

    /// Revoke every live session of a user. Returns how many were revoked.
    pub async fn revoke_all_for_user(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(&format!(
            "UPDATE user_sessions SET is_revoked = true WHERE user_id = $1 AND {LIVE}"
        ))
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Delete a user's revoked and expired sessions.
    pub async fn prune_for_user(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM user_sessions
             WHERE user_id = $1 AND (is_revoked OR expires_at <= NOW())",
        )
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    async fn insert_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        input: &NewSession,
    ) -> Result<Session, sqlx::Error> {
        sqlx::query_as::<_, Session>(&format!(
            "INSERT INTO user_sessions (user_id, refresh_token_hash, expires_at)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        ))
        .bind(input.user_id)
        .bind(&input.refresh_token_hash)
        .bind(input.expires_at)
        .fetch_one(&mut **tx)
        .await
    }
}
