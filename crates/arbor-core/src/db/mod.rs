//! Database operations and SQLite management for projects, nodes and
//! assignments.
//!
//! Every mutating method runs in a single transaction, so a failed step
//! (including a failed ancestor roll-up) leaves nothing behind. Query
//! helpers take a plain [`Connection`] so they work both on the database and
//! inside an open [`rusqlite::Transaction`].

use std::{path::Path, time::Duration};

use rusqlite::Connection;

use crate::error::{DatabaseResultExt, Result};

pub mod assignment_queries;
pub mod migrations;
pub mod node_queries;
pub mod project_queries;
mod rows;

/// How long a connection waits on another writer before reporting busy.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Database connection and operations handler.
pub struct Database {
    connection: Connection,
}

impl Database {
    /// Creates a new database connection and initializes the schema.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = Connection::open(path).db_context("Failed to open database connection")?;
        connection
            .busy_timeout(BUSY_TIMEOUT)
            .db_context("Failed to set busy timeout")?;

        let db = Self { connection };
        db.initialize_schema()?;
        Ok(db)
    }
}
