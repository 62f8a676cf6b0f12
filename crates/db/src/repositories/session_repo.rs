//! Repository for the `jupyter_sessions` table.

use sqlx::PgPool;

use hubgate_core::types::{DbId, Timestamp};

use crate::models::session::{JupyterSession, SessionWithUser};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, session_token, jupyter_token, \
                        started_at, last_activity, expires_at, is_active";

/// Provides session lifecycle operations.
pub struct SessionRepo;

impl SessionRepo {
    /// Find the active session for a user, if any.
    pub async fn find_active(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<JupyterSession>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM jupyter_sessions
             WHERE user_id = $1 AND is_active = true"
        );
        sqlx::query_as::<_, JupyterSession>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Create the user's active session, or refresh it if one already exists.
    ///
    /// This is a single atomic statement keyed on the partial unique index
    /// `uq_jupyter_sessions_active_user`, so two concurrent starts for the
    /// same user cannot produce two active rows. A refresh keeps the existing
    /// `session_token` and `started_at`, bumps `last_activity`, extends
    /// `expires_at`, and overwrites `jupyter_token` only when a new one is
    /// supplied.
    pub async fn upsert_active(
        pool: &PgPool,
        user_id: DbId,
        session_token: &str,
        jupyter_token: Option<&str>,
        expires_at: Timestamp,
    ) -> Result<JupyterSession, sqlx::Error> {
        let query = format!(
            "INSERT INTO jupyter_sessions
                (user_id, session_token, jupyter_token, expires_at, is_active)
             VALUES ($1, $2, COALESCE($3, ''), $4, true)
             ON CONFLICT (user_id) WHERE is_active
             DO UPDATE SET
                last_activity = NOW(),
                expires_at = EXCLUDED.expires_at,
                jupyter_token = COALESCE($3, jupyter_sessions.jupyter_token)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, JupyterSession>(&query)
            .bind(user_id)
            .bind(session_token)
            .bind(jupyter_token)
            .bind(expires_at)
            .fetch_one(pool)
            .await
    }

    /// Deactivate the user's active session. Returns `true` if a row was
    /// updated, `false` if the user had no active session.
    pub async fn deactivate(pool: &PgPool, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE jupyter_sessions SET is_active = false
             WHERE user_id = $1 AND is_active = true",
        )
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// The JupyterHub access token stored on the user's active session.
    pub async fn active_token(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(
            "SELECT jupyter_token FROM jupyter_sessions
             WHERE user_id = $1 AND is_active = true",
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    /// List all sessions joined with the owning username, newest started first.
    pub async fn list_with_usernames(pool: &PgPool) -> Result<Vec<SessionWithUser>, sqlx::Error> {
        sqlx::query_as::<_, SessionWithUser>(
            "SELECT js.id, js.user_id, u.username, js.session_token, js.jupyter_token,
                    js.started_at, js.last_activity, js.expires_at, js.is_active
             FROM jupyter_sessions js
             JOIN users u ON js.user_id = u.id
             ORDER BY js.started_at DESC",
        )
        .fetch_all(pool)
        .await
    }
}
