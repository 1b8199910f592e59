//! Markdown formatting for models and operation results.
//!
//! Domain models implement [`std::fmt::Display`] directly (see [`models`]);
//! the newtype wrappers here add context-specific formatting for
//! collections, trees and operation outcomes. The CLI renders the Markdown
//! through its terminal renderer and the MCP server returns it verbatim.
//!
//! - [`collections`]: [`Projects`], [`NodeList`], [`Forest`],
//!   [`DelayedNodes`], [`Assignees`]
//! - [`results`]: [`CreateResult`], [`UpdateResult`], [`DeleteResult`]
//! - [`status`]: [`OperationStatus`]
//! - [`datetime`]: [`LocalDateTime`]
//!
//! ```rust
//! use arbor_core::display::OperationStatus;
//!
//! let status = OperationStatus::success("Assigned person 7 to node 3".to_string());
//! assert_eq!(format!("{status}"), "Success: Assigned person 7 to node 3\n");
//! ```

pub mod collections;
pub mod datetime;
pub mod models;
pub mod results;
pub mod status;

pub use collections::{Assignees, DelayedNodes, Forest, NodeList, Projects};
pub use datetime::LocalDateTime;
pub use results::{CreateResult, DeleteResult, UpdateResult};
pub use status::OperationStatus;
