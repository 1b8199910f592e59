//! The fixed set of WBS levels.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Depth of a node in the four-level breakdown tree.
///
/// Roots always sit at [`Level::L1`]; every child sits exactly one level
/// below its parent. [`Level::L4`] nodes can never have children.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    L1,
    L2,
    L3,
    L4,
}

impl Level {
    /// All levels, top to bottom.
    pub const ALL: [Level; 4] = [Level::L1, Level::L2, Level::L3, Level::L4];

    /// Level a root node must have.
    pub const ROOT: Level = Level::L1;

    /// Numeric depth, 1-based.
    pub fn depth(self) -> u8 {
        match self {
            Level::L1 => 1,
            Level::L2 => 2,
            Level::L3 => 3,
            Level::L4 => 4,
        }
    }

    /// Converts a 1-based depth back into a level.
    pub fn from_depth(depth: u8) -> Option<Level> {
        match depth {
            1 => Some(Level::L1),
            2 => Some(Level::L2),
            3 => Some(Level::L3),
            4 => Some(Level::L4),
            _ => None,
        }
    }

    /// The level a direct child of this level must have, if any.
    pub fn child(self) -> Option<Level> {
        match self {
            Level::L1 => Some(Level::L2),
            Level::L2 => Some(Level::L3),
            Level::L3 => Some(Level::L4),
            Level::L4 => None,
        }
    }

    /// The level of this level's parent, `None` for roots.
    pub fn parent(self) -> Option<Level> {
        match self {
            Level::L1 => None,
            Level::L2 => Some(Level::L1),
            Level::L3 => Some(Level::L2),
            Level::L4 => Some(Level::L3),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::L1 => "L1",
            Level::L2 => "L2",
            Level::L3 => "L3",
            Level::L4 => "L4",
        }
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "L1" | "1" => Ok(Level::L1),
            "L2" | "2" => Ok(Level::L2),
            "L3" | "3" => Ok(Level::L3),
            "L4" | "4" => Ok(Level::L4),
            _ => Err(format!("Invalid level: {s}")),
        }
    }
}
