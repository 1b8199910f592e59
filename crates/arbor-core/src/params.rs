//! Parameter structures for Arbor operations
//!
//! These structures are shared by every interface (CLI, MCP) and carry no
//! framework-specific derives beyond serde and the optional JSON schema. Each
//! interface wraps them with its own derives and converts into these types;
//! validation of free-form fields (levels, statuses, dates) happens here so
//! both front ends reject the same inputs with the same messages.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │   CLI Args      │    │   MCP Params    │    │  Core Params    │
//! │  (clap derives) │───▶│ (serde derives) │───▶│ (minimal deps)  │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```

use std::str::FromStr;

use jiff::civil::Date;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    error::{Result, WbsError},
    models::{Level, NodeStatus},
};

/// Generic parameters for operations requiring just an ID.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct Id {
    /// The ID of the resource to operate on
    pub id: u64,
}

/// Parameters for creating a new project.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct CreateProject {
    /// Name of the project (required)
    pub name: String,
    /// Optional detailed description of the project
    pub description: Option<String>,
}

/// Parameters for deleting a project and its whole tree.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct DeleteProject {
    /// ID of the project to delete
    pub id: u64,
    /// Must be true to actually delete
    #[serde(default)]
    pub confirmed: bool,
}

/// Parameters for creating a node.
///
/// Code and sibling order are always assigned by the engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct CreateNode {
    /// ID of the owning project
    pub project_id: u64,
    /// Parent node ID; omit to create a root (level L1)
    #[serde(default)]
    pub parent_id: Option<u64>,
    /// Level of the new node ('L1'..'L4'); must be one below the parent
    pub level: String,
    /// Name of the work item (required)
    pub name: String,
    /// Optional description
    #[serde(default)]
    pub description: Option<String>,
    /// Planned start date (YYYY-MM-DD)
    #[serde(default)]
    pub start_date: Option<String>,
    /// Planned end date (YYYY-MM-DD)
    #[serde(default)]
    pub end_date: Option<String>,
    /// Relative weight, defaults to 1
    #[serde(default)]
    pub weight: Option<u32>,
}

/// Parameters for editing a node.
///
/// `progress` is only accepted on leaves. A `status` of 'cancelled' or
/// 'on_hold' on a group node pins that status against roll-up; any other
/// status on a group node releases the pin.
///
/// Omitted fields keep their current value. There is no way to clear a
/// description or date once it is set; it can only be replaced.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct UpdateNode {
    /// Node ID to update (required)
    pub id: u64,
    /// Updated name
    #[serde(default)]
    pub name: Option<String>,
    /// Updated description
    #[serde(default)]
    pub description: Option<String>,
    /// New status ('pending', 'in_progress', 'completed', 'cancelled', 'on_hold')
    #[serde(default)]
    pub status: Option<String>,
    /// New progress percentage (0-100), leaves only
    #[serde(default)]
    pub progress: Option<u8>,
    /// Updated planned start date (YYYY-MM-DD)
    #[serde(default)]
    pub start_date: Option<String>,
    /// Updated planned end date (YYYY-MM-DD)
    #[serde(default)]
    pub end_date: Option<String>,
    /// Updated relative weight (at least 1)
    #[serde(default)]
    pub weight: Option<u32>,
}

/// Parameters for setting a leaf's progress.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct SetProgress {
    /// Leaf node ID
    pub id: u64,
    /// Completion percentage (0-100)
    pub progress: u8,
}

/// Parameters for moving a node (and its subtree) under another parent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct MoveNode {
    /// Node to move
    pub id: u64,
    /// New parent; must sit at the same level as the current parent
    pub new_parent_id: u64,
}

/// Parameters for reading a project's tree.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct GetTree {
    /// ID of the project
    pub project_id: u64,
    /// Return the flat, code-ordered list instead of the nested forest
    #[serde(default)]
    pub flat: bool,
}

/// Parameters for assigning or unassigning a person.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct Assign {
    /// Node ID
    pub node_id: u64,
    /// Person ID, as issued by the identity service
    pub person_id: u64,
}

/// Parameters for replacing a node's full assignee set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct ReplaceAssignees {
    /// Node ID
    pub node_id: u64,
    /// The complete new set of person IDs (duplicates are ignored)
    #[serde(default)]
    pub person_ids: Vec<u64>,
}

impl CreateNode {
    /// Parse the level and dates, returning `(level, start, end)`.
    ///
    /// ```rust
    /// use arbor_core::{models::Level, params::CreateNode};
    ///
    /// let params = CreateNode {
    ///     project_id: 1,
    ///     level: "l2".to_string(),
    ///     name: "Design".to_string(),
    ///     end_date: Some("2026-03-31".to_string()),
    ///     ..Default::default()
    /// };
    /// let (level, start, end) = params.validate()?;
    /// assert_eq!(level, Level::L2);
    /// assert!(start.is_none());
    /// assert!(end.is_some());
    /// # arbor_core::Result::<()>::Ok(())
    /// ```
    pub fn validate(&self) -> Result<(Level, Option<Date>, Option<Date>)> {
        if self.name.trim().is_empty() {
            return Err(WbsError::invalid_input("name").with_reason("Name must not be empty"));
        }
        let level = Level::from_str(&self.level).map_err(|_| {
            WbsError::invalid_input("level").with_reason(format!(
                "Invalid level: {}. Must be one of 'L1', 'L2', 'L3', 'L4'",
                self.level
            ))
        })?;
        if let Some(weight) = self.weight {
            validate_weight(weight)?;
        }
        let start = parse_date("start_date", self.start_date.as_deref())?;
        let end = parse_date("end_date", self.end_date.as_deref())?;
        validate_date_range(start, end)?;
        Ok((level, start, end))
    }
}

impl UpdateNode {
    /// Parse the status and dates, returning `(status, start, end)`.
    pub fn validate(&self) -> Result<(Option<NodeStatus>, Option<Date>, Option<Date>)> {
        let status = self
            .status
            .as_deref()
            .map(|s| {
                NodeStatus::from_str(s).map_err(|_| {
                    WbsError::invalid_input("status").with_reason(format!(
                        "Invalid status: {s}. Must be 'pending', 'in_progress', 'completed', 'cancelled', or 'on_hold'"
                    ))
                })
            })
            .transpose()?;
        if let Some(progress) = self.progress {
            validate_progress(progress)?;
        }
        if let Some(weight) = self.weight {
            validate_weight(weight)?;
        }
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(WbsError::invalid_input("name").with_reason("Name must not be empty"));
            }
        }
        let start = parse_date("start_date", self.start_date.as_deref())?;
        let end = parse_date("end_date", self.end_date.as_deref())?;
        validate_date_range(start, end)?;
        Ok((status, start, end))
    }
}

/// Rejects progress values outside 0..=100.
pub fn validate_progress(progress: u8) -> Result<()> {
    if progress > 100 {
        return Err(WbsError::invalid_input("progress")
            .with_reason(format!("Progress {progress} is out of range. Must be 0-100")));
    }
    Ok(())
}

fn validate_weight(weight: u32) -> Result<()> {
    if weight == 0 {
        return Err(WbsError::invalid_input("weight").with_reason("Weight must be at least 1"));
    }
    Ok(())
}

fn parse_date(field: &str, value: Option<&str>) -> Result<Option<Date>> {
    value
        .map(|s| {
            s.trim().parse::<Date>().map_err(|e| {
                WbsError::invalid_input(field)
                    .with_reason(format!("Invalid date '{s}': {e}. Expected YYYY-MM-DD"))
            })
        })
        .transpose()
}

/// Rejects a start date that falls after the end date.
pub(crate) fn validate_date_range(start: Option<Date>, end: Option<Date>) -> Result<()> {
    if let (Some(start), Some(end)) = (start, end) {
        if start > end {
            return Err(WbsError::invalid_input("start_date")
                .with_reason(format!("Start date {start} is after end date {end}")));
        }
    }
    Ok(())
}
