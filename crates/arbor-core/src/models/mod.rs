//! Data models for projects, WBS nodes and assignments.
//!
//! Display implementations for these models live in
//! [`crate::display::models`] so that presentation stays separate from the
//! data structures.
//!
//! # Examples
//!
//! ```rust
//! use arbor_core::models::{Level, Node, NodeStatus};
//! use jiff::Timestamp;
//!
//! let node = Node {
//!     id: 3,
//!     project_id: 1,
//!     parent_id: Some(2),
//!     code: "1.1".to_string(),
//!     name: "Site survey".to_string(),
//!     level: Level::L2,
//!     status: NodeStatus::InProgress,
//!     progress: 40,
//!     order: 0,
//!     weight: 1,
//! #   description: None,
//! #   start_date: None,
//! #   end_date: None,
//! #   created_at: Timestamp::now(),
//! #   updated_at: Timestamp::now(),
//! };
//! assert!(!node.is_root());
//! println!("{node}"); // Shows the code, name and ➤ In Progress
//! ```

pub mod assignment;
pub mod level;
pub mod node;
pub mod project;
pub mod requests;
pub mod statistics;
pub mod status;


pub use assignment::Assignment;
pub use level::Level;
pub use node::{Node, TreeNode};
pub use project::Project;
pub use requests::{NewNodeRequest, UpdateNodeRequest};
pub use statistics::{DelayedNode, ProjectStatistics};
pub use status::NodeStatus;
