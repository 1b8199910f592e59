//! The WBS hierarchy engine.
//!
//! Pure building blocks with no I/O of their own. The database layer and the
//! [`crate::engine::Engine`] facade compose them:
//!
//! ```text
//! create:  level::validate_level ─▶ code::next_sibling ─▶ insert ─▶ progress::walk_ancestors
//! update:  leaf check ─▶ write ─▶ progress::walk_ancestors
//! read:    bulk read ─▶ tree::assemble / delay::DelayEvaluator
//! ```
//!
//! - [`code`]: sibling code and order allocation
//! - [`level`]: parent/child level rule
//! - [`tree`]: flat list to nested forest
//! - [`progress`]: bottom-up progress and status roll-up
//! - [`delay`]: delayed-leaf classification against an injectable clock

pub mod code;
pub mod delay;
pub mod level;
pub mod progress;
pub mod tree;

pub use code::{next_order, next_sibling, rebase_code, SiblingSlot};
pub use delay::{delay_days, is_delayed, Clock, DelayEvaluator, FixedClock, SystemClock};
pub use level::{expected_level, validate_level};
pub use progress::{derive_status, mean_progress, walk_ancestors, HierarchyStore, Rollup};
pub use tree::{assemble, flatten, leaves};
