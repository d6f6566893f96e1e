use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, warn};

use sermo_db::{CallGuard, Database};

use crate::error::ApiError;
use crate::token::TokenService;

/// Default deadline for a single store call.
pub const DEFAULT_DB_TIMEOUT: Duration = Duration::from_secs(5);

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub tokens: TokenService,
    /// `dev`, `test` or `prod`; shown on the banner routes.
    pub environment: String,
    pub db_timeout: Duration,
}

impl AppStateInner {
    pub fn new(db: Database, tokens: TokenService, environment: impl Into<String>) -> Self {
        Self {
            db,
            tokens,
            environment: environment.into(),
            db_timeout: DEFAULT_DB_TIMEOUT,
        }
    }

    pub fn with_db_timeout(mut self, timeout: Duration) -> Self {
        self.db_timeout = timeout;
        self
    }

    /// Run a blocking store call off the async runtime, bounded by
    /// `db_timeout`. The store's own failure text becomes an
    /// `ApiError::Internal`.
    ///
    /// A call still waiting for the connection when the deadline passes is
    /// cancelled and never runs. One that already reached the connection is
    /// waited for, so a 503 always means nothing was written.
    pub async fn run_db<F, T>(&self, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(&Database) -> anyhow::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let guard = CallGuard::new();
        let db = self.db.guarded(guard.clone());
        let mut task = tokio::task::spawn_blocking(move || f(&db));

        match tokio::time::timeout(self.db_timeout, &mut task).await {
            Ok(joined) => Self::joined(joined),
            Err(_) if guard.cancel() => {
                warn!(timeout_ms = self.db_timeout.as_millis() as u64, "Database call exceeded deadline");
                Err(ApiError::Timeout)
            }
            Err(_) => {
                debug!("Database call passed its deadline while running, waiting for it");
                Self::joined(task.await)
            }
        }
    }

    fn joined<T>(
        joined: Result<anyhow::Result<T>, tokio::task::JoinError>,
    ) -> Result<T, ApiError> {
        match joined {
            Ok(res) => res.map_err(ApiError::from),
            Err(e) => {
                error!("spawn_blocking join error: {}", e);
                Err(ApiError::Internal(e.to_string()))
            }
        }
    }
}
