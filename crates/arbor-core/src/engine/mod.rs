//! High-level engine API for managing WBS trees.
//!
//! [`Engine`] is the entry point for every front end. Each operation opens
//! its own [`Database`] connection on a blocking thread, so an `Engine` can
//! be cloned and shared freely across tasks; SQLite's locking and the
//! per-operation transactions in [`crate::db`] keep concurrent writers
//! consistent.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │   Front ends    │    │     Engine      │    │    Database     │
//! │  (CLI, MCP)     │───▶│ (params, async, │───▶│ (transactions,  │
//! │                 │    │  clock, retry)  │    │  wbs rules)     │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! ## Submodules
//!
//! - [`builder`]: Factory for [`Engine`] instances with configuration
//! - [`project_ops`]: Project CRUD and statistics
//! - [`node_ops`]: Node creation, edits, moves, deletion and tree reads
//! - [`assignment_ops`]: Person assignments
//!
//! # Usage
//!
//! ```rust,no_run
//! use arbor_core::{
//!     params::{CreateNode, CreateProject, GetTree},
//!     EngineBuilder,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = EngineBuilder::new()
//!     .with_database_path(Some("/tmp/arbor.db"))
//!     .build()
//!     .await?;
//!
//! let project = engine
//!     .create_project(&CreateProject {
//!         name: "Bridge".to_string(),
//!         description: None,
//!     })
//!     .await?;
//!
//! let phase = engine
//!     .create_node(&CreateNode {
//!         project_id: project.id,
//!         level: "L1".to_string(),
//!         name: "Foundations".to_string(),
//!         ..Default::default()
//!     })
//!     .await?;
//! assert_eq!(phase.code, "1");
//!
//! let tree = engine
//!     .get_tree(&GetTree {
//!         project_id: project.id,
//!         flat: false,
//!     })
//!     .await?;
//! println!("{tree}");
//! # Ok(())
//! # }
//! ```

use std::{fmt, path::PathBuf, sync::Arc};

use serde::Serialize;
use tokio::task;

use crate::{
    db::Database,
    error::{Result, WbsError},
    models::{Node, TreeNode},
    wbs::{Clock, DelayEvaluator},
};

pub mod assignment_ops;
pub mod builder;
pub mod node_ops;
pub mod project_ops;

#[cfg(test)]
mod tests;

pub use builder::EngineBuilder;

/// Main engine interface for managing projects, nodes and assignments.
#[derive(Debug, Clone)]
pub struct Engine {
    pub(crate) db_path: PathBuf,
    pub(crate) retry_limit: u32,
    pub(crate) clock: Arc<dyn Clock>,
}

impl Engine {
    pub(crate) fn new(db_path: PathBuf, retry_limit: u32, clock: Arc<dyn Clock>) -> Self {
        Self {
            db_path,
            retry_limit,
            clock,
        }
    }

    /// Path of the SQLite database this engine operates on.
    pub fn database_path(&self) -> &std::path::Path {
        &self.db_path
    }

    /// Delay evaluator pinned to the engine clock's current date.
    pub fn delay_evaluator(&self) -> DelayEvaluator {
        DelayEvaluator::from_clock(self.clock.as_ref())
    }

    /// Runs `op` against a fresh connection on the blocking pool.
    pub(crate) async fn run<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Database) -> Result<T> + Send + 'static,
    {
        let db_path = self.db_path.clone();
        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            op(&mut db)
        })
        .await
        .map_err(|e| WbsError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }
}

/// A project tree, either flat in pre-order or nested.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TreeView {
    Flat(Vec<Node>),
    Nested(Vec<TreeNode>),
}

impl TreeView {
    /// Number of nodes in the view.
    pub fn len(&self) -> usize {
        match self {
            TreeView::Flat(nodes) => nodes.len(),
            TreeView::Nested(forest) => forest.iter().map(TreeNode::size).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Serializes the view as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for TreeView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeView::Flat(nodes) => write!(f, "{}", crate::display::NodeList(nodes)),
            TreeView::Nested(forest) => write!(f, "{}", crate::display::Forest(forest)),
        }
    }
}
