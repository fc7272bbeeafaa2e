//! Shared types for the API layer.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::analysis::CompletionClient;
use crate::api::error::ApiError;
use crate::auth::SessionStore;
use crate::config::AppConfig;
use crate::db;

/// Shared context for all API routes and middleware.
#[derive(Clone)]
pub struct ApiContext {
    pub config: Arc<AppConfig>,
    pub completion: Arc<dyn CompletionClient>,
    pub sessions: Arc<Mutex<SessionStore>>,
}

impl ApiContext {
    pub fn new(config: AppConfig, completion: Arc<dyn CompletionClient>) -> Self {
        Self {
            config: Arc::new(config),
            completion,
            sessions: Arc::new(Mutex::new(SessionStore::new())),
        }
    }

    /// Run `f` on the blocking pool with a fresh database connection.
    ///
    /// Completion calls and SQLite access both block, so handlers route
    /// all of their work through here.
    pub async fn blocking<T, F>(&self, f: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection, &dyn CompletionClient) -> Result<T, ApiError> + Send + 'static,
    {
        let db_path = self.config.db_path();
        let completion = Arc::clone(&self.completion);
        tokio::task::spawn_blocking(move || {
            let conn = db::open_database(&db_path)?;
            f(&conn, completion.as_ref())
        })
        .await
        .map_err(|e| ApiError::Internal(format!("blocking task failed: {e}")))?
    }

    pub fn issue_session(&self, owner_key: &str) -> Result<String, ApiError> {
        let mut sessions = self
            .sessions
            .lock()
            .map_err(|_| ApiError::Internal("session lock".into()))?;
        Ok(sessions.issue(owner_key))
    }
}

/// Authenticated caller, injected into request extensions by the auth
/// middleware.
#[derive(Debug, Clone)]
pub struct UserContext {
    pub owner_key: String,
    pub token: String,
}
