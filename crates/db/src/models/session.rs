//! Notebook session model.

use hubgate_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A notebook session row from the `jupyter_sessions` table.
///
/// `session_token` is an opaque token minted locally when the session starts;
/// `jupyter_token` is the access token obtained from JupyterHub and is empty
/// until an SSO login has fetched one.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct JupyterSession {
    pub id: DbId,
    pub user_id: DbId,
    pub session_token: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub jupyter_token: String,
    pub started_at: Timestamp,
    pub last_activity: Timestamp,
    pub expires_at: Timestamp,
    pub is_active: bool,
}

/// A session row joined with the owning user's name, for admin listings.
#[derive(Debug, Clone, FromRow)]
pub struct SessionWithUser {
    pub id: DbId,
    pub user_id: DbId,
    pub username: String,
    pub session_token: String,
    pub jupyter_token: String,
    pub started_at: Timestamp,
    pub last_activity: Timestamp,
    pub expires_at: Timestamp,
    pub is_active: bool,
}

impl SessionWithUser {
    /// Split into the session record and the owning username.
    pub fn into_parts(self) -> (JupyterSession, String) {
        let session = JupyterSession {
            id: self.id,
            user_id: self.user_id,
            session_token: self.session_token,
            jupyter_token: self.jupyter_token,
            started_at: self.started_at,
            last_activity: self.last_activity,
            expires_at: self.expires_at,
            is_active: self.is_active,
        };
        (session, self.username)
    }
}
