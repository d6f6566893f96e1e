pub mod migrations;
pub mod models;
pub mod queries;

use anyhow::Result;
use rusqlite::Connection;
use std::path::Path;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex};
use tracing::info;

/// Outcome of a query that targets a single row.
///
/// Failures travel in the surrounding `Result`, so callers branch on three
/// explicit cases instead of inspecting error values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    Found(T),
    NotFound,
}

impl<T> Lookup<T> {
    pub fn found(self) -> Option<T> {
        match self {
            Lookup::Found(val) => Some(val),
            Lookup::NotFound => None,
        }
    }
}

const PENDING: u8 = 0;
const STARTED: u8 = 1;
const CANCELLED: u8 = 2;

/// Shared between one store call and the caller waiting on it. Whichever
/// side claims it first wins: the call reaching the connection, or the
/// caller giving up. A cancelled call never touches the database.
#[derive(Debug, Clone, Default)]
pub struct CallGuard(Arc<AtomicU8>);

impl CallGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Abandon the call. Returns false when it already reached the store, in
    /// which case its outcome stands and must be waited for.
    pub fn cancel(&self) -> bool {
        self.0
            .compare_exchange(PENDING, CANCELLED, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    fn start(&self) -> bool {
        match self
            .0
            .compare_exchange(PENDING, STARTED, Ordering::AcqRel, Ordering::Acquire)
        {
            Ok(_) => true,
            Err(state) => state == STARTED,
        }
    }
}

/// Handle to the relational store shared by every request.
pub struct Database {
    conn: Arc<Mutex<Connection>>,
    guard: Option<CallGuard>,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;

        // WAL mode for concurrent reads
        conn.pragma_update(None, "journal_mode", "WAL")?;

        let db = Self::init(conn)?;
        info!("Database opened at {}", path.display());
        Ok(db)
    }

    /// Private in-memory store, used by tests.
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        // Needed for channels.userid ON DELETE CASCADE
        conn.pragma_update(None, "foreign_keys", "ON")?;

        migrations::run(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            guard: None,
        })
    }

    /// A handle on the same connection whose calls are bound to `guard`.
    pub fn guarded(&self, guard: CallGuard) -> Self {
        Self {
            conn: Arc::clone(&self.conn),
            guard: Some(guard),
        }
    }

    pub fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.conn.lock().map_err(|e| anyhow::anyhow!("DB lock poisoned: {}", e))?;
        if let Some(guard) = &self.guard {
            if !guard.start() {
                anyhow::bail!("store call cancelled");
            }
        }
        f(&conn)
    }
}
