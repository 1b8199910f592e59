//! Core library for Arbor, a work breakdown structure (WBS) engine.
//!
//! A project owns a forest of nodes at most four levels deep (`L1` to
//! `L4`). The engine keeps that tree consistent:
//!
//! - every node sits exactly one level below its parent,
//! - codes such as `2.3.1` are assigned from the parent's code and the
//!   sibling position, and are unique within the project,
//! - a group node's progress is always the rounded mean of its children,
//!   recomputed up the ancestor chain in the same transaction as the
//!   mutation that changed it,
//! - deleting a node removes its subtree and their assignments atomically.
//!
//! # Layout
//!
//! - [`wbs`]: the pure rules (codes, levels, tree assembly, roll-up, delays)
//! - [`db`]: SQLite persistence applying those rules inside transactions
//! - [`engine`]: the async facade used by every front end
//! - [`models`], [`params`]: data and request types
//! - [`display`]: Markdown formatting
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use arbor_core::{
//!     params::{CreateNode, CreateProject, SetProgress},
//!     EngineBuilder,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = EngineBuilder::new()
//!     .with_database_path(Some("arbor.db"))
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
//! let task = engine
//!     .create_node(&CreateNode {
//!         project_id: project.id,
//!         parent_id: Some(phase.id),
//!         level: "L2".to_string(),
//!         name: "Excavation".to_string(),
//!         ..Default::default()
//!     })
//!     .await?;
//!
//! engine
//!     .update_node_progress(&SetProgress {
//!         id: task.id,
//!         progress: 100,
//!     })
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod db;
pub mod display;
pub mod engine;
pub mod error;
pub mod models;
pub mod params;
pub mod wbs;

// Re-export commonly used types
pub use db::Database;
pub use engine::{Engine, EngineBuilder, TreeView};
pub use error::{Result, WbsError};
pub use models::{Assignment, Level, Node, NodeStatus, Project, TreeNode};
