//! Node/person assignment entries.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// One `(node, person)` relation entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Assignment {
    pub node_id: u64,
    pub person_id: u64,
    pub assigned_at: Timestamp,
}
