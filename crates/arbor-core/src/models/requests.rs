//! Validated request types handed to the database layer.

use jiff::civil::Date;

use super::{Level, NodeStatus};
use crate::params::{CreateNode, UpdateNode};

/// A node ready to be inserted; code and order are assigned on insert.
#[derive(Debug, Clone)]
pub struct NewNodeRequest {
    pub project_id: u64,
    pub parent_id: Option<u64>,
    pub level: Level,
    pub name: String,
    pub description: Option<String>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub weight: u32,
}

impl TryFrom<CreateNode> for NewNodeRequest {
    type Error = crate::WbsError;

    /// Validate and convert [`CreateNode`] parameters.
    ///
    /// ```rust
    /// use arbor_core::{models::{Level, NewNodeRequest}, params::CreateNode};
    ///
    /// let request: NewNodeRequest = CreateNode {
    ///     project_id: 7,
    ///     level: "L1".to_string(),
    ///     name: "Phase 1".to_string(),
    ///     ..Default::default()
    /// }
    /// .try_into()?;
    /// assert_eq!(request.level, Level::L1);
    /// assert_eq!(request.weight, 1);
    /// # arbor_core::Result::<()>::Ok(())
    /// ```
    fn try_from(params: CreateNode) -> Result<Self, Self::Error> {
        let (level, start_date, end_date) = params.validate()?;

        Ok(Self {
            project_id: params.project_id,
            parent_id: params.parent_id,
            level,
            name: params.name.trim().to_string(),
            description: params.description,
            start_date,
            end_date,
            weight: params.weight.unwrap_or(1),
        })
    }
}

/// Partial edit of a node; `None` fields are left unchanged, so an
/// optional field that is already set can be replaced but not cleared.
#[derive(Debug, Default, Clone)]
pub struct UpdateNodeRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<NodeStatus>,
    pub progress: Option<u8>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub weight: Option<u32>,
}

impl UpdateNodeRequest {
    /// Request that only changes progress.
    pub fn progress(progress: u8) -> Self {
        Self {
            progress: Some(progress),
            ..Default::default()
        }
    }

    /// Whether the request changes anything at all.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.progress.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
            && self.weight.is_none()
    }

    /// Whether the request touches anything the roll-up depends on.
    pub fn affects_rollup(&self) -> bool {
        self.status.is_some() || self.progress.is_some()
    }
}

impl TryFrom<UpdateNode> for UpdateNodeRequest {
    type Error = crate::WbsError;

    fn try_from(params: UpdateNode) -> Result<Self, Self::Error> {
        let (status, start_date, end_date) = params.validate()?;

        Ok(Self {
            name: params.name.map(|n| n.trim().to_string()),
            description: params.description,
            status,
            progress: params.progress,
            start_date,
            end_date,
            weight: params.weight,
        })
    }
}
