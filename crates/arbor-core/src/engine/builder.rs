//! Builder for creating and configuring Engine instances.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use log::info;
use tokio::task;

use super::Engine;
use crate::{
    db::Database,
    error::{Result, WbsError},
    wbs::{Clock, SystemClock},
};

/// Attempts made at allocating a sibling slot before giving up.
pub const DEFAULT_RETRY_LIMIT: u32 = 3;

/// Builder for creating and configuring Engine instances.
#[derive(Debug, Clone)]
pub struct EngineBuilder {
    database_path: Option<PathBuf>,
    retry_limit: u32,
    clock: Arc<dyn Clock>,
}

impl EngineBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            database_path: None,
            retry_limit: DEFAULT_RETRY_LIMIT,
            clock: Arc::new(SystemClock),
        }
    }

    /// Sets a custom database file path.
    ///
    /// If not specified, uses XDG Base Directory specification:
    /// `$XDG_DATA_HOME/arbor/arbor.db` or `~/.local/share/arbor/arbor.db`
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.database_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Sets how many times a node creation or move is attempted when it
    /// collides with a concurrent writer. Values below 1 are raised to 1.
    pub fn with_retry_limit(mut self, limit: u32) -> Self {
        self.retry_limit = limit.max(1);
        self
    }

    /// Sets the clock used to decide which work is delayed.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Builds the configured engine instance.
    ///
    /// # Errors
    ///
    /// Returns `WbsError::FileSystem` if the database directory cannot be
    /// created.
    /// Returns `WbsError::Database` if database initialization fails
    pub async fn build(self) -> Result<Engine> {
        let db_path = match self.database_path {
            Some(path) => path,
            None => Self::default_database_path()?,
        };

        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| WbsError::FileSystem {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        let db_path_clone = db_path.clone();
        task::spawn_blocking(move || {
            let _db = Database::new(&db_path_clone)?;
            Ok::<(), WbsError>(())
        })
        .await
        .map_err(|e| WbsError::Configuration {
            message: format!("Task join error: {e}"),
        })??;

        info!("using database at {}", db_path.display());

        Ok(Engine::new(db_path, self.retry_limit, self.clock))
    }

    /// Returns the default database path following XDG Base Directory
    /// specification.
    fn default_database_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("arbor")
            .place_data_file("arbor.db")
            .map_err(|e| WbsError::XdgDirectory(e.to_string()))
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
