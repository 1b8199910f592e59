//! MCP tool handlers implementation

use arbor_core::{
    display::{
        Assignees, CreateResult, DelayedNodes, DeleteResult, NodeList, OperationStatus, Projects,
        UpdateResult,
    },
    params as core, Engine,
};
use log::debug;
use rmcp::{
    handler::server::tool::Parameters,
    model::{CallToolResult, Content},
    ErrorData,
};
use schemars::JsonSchema;
use serde::Deserialize;

use super::errors::{not_found, to_mcp_error};

/// Generic MCP wrapper for core parameter types.
///
/// Deserialization and the JSON schema pass straight through to the wrapped
/// core type, so the core crate never depends on rmcp.
#[derive(Debug, Deserialize)]
#[serde(transparent)]
pub struct McpParams<T>(T)
where
    T: JsonSchema;

impl<T> JsonSchema for McpParams<T>
where
    T: JsonSchema,
{
    fn schema_name() -> std::borrow::Cow<'static, str> {
        T::schema_name()
    }

    fn json_schema(g: &mut schemars::SchemaGenerator) -> schemars::Schema {
        T::json_schema(g)
    }
}

impl<T> AsRef<T> for McpParams<T>
where
    T: JsonSchema,
{
    fn as_ref(&self) -> &T {
        &self.0
    }
}

pub type Id = McpParams<core::Id>;
pub type CreateProject = McpParams<core::CreateProject>;
pub type DeleteProject = McpParams<core::DeleteProject>;
pub type CreateNode = McpParams<core::CreateNode>;
pub type UpdateNode = McpParams<core::UpdateNode>;
pub type SetProgress = McpParams<core::SetProgress>;
pub type MoveNode = McpParams<core::MoveNode>;
pub type GetTree = McpParams<core::GetTree>;
pub type Assign = McpParams<core::Assign>;
pub type ReplaceAssignees = McpParams<core::ReplaceAssignees>;

pub type McpResult = Result<CallToolResult, ErrorData>;

fn text(result: impl ToString) -> McpResult {
    Ok(CallToolResult::success(vec![Content::text(
        result.to_string(),
    )]))
}

/// Handler implementations for the MCP server
pub struct McpHandlers {
    engine: Engine,
}

impl McpHandlers {
    pub fn new(engine: Engine) -> Self {
        Self { engine }
    }

    pub async fn create_project(&self, Parameters(params): Parameters<CreateProject>) -> McpResult {
        debug!("create_project: {:?}", params);

        let project = self
            .engine
            .create_project(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to create project", &e))?;

        text(CreateResult::new(project))
    }

    pub async fn list_projects(&self) -> McpResult {
        debug!("list_projects");

        let projects = self
            .engine
            .list_projects()
            .await
            .map_err(|e| to_mcp_error("Failed to list projects", &e))?;

        text(format!("# Projects\n\n{}", Projects(&projects)))
    }

    pub async fn show_project(&self, Parameters(params): Parameters<Id>) -> McpResult {
        debug!("show_project: {:?}", params);

        let id = params.as_ref().id;
        let project = self
            .engine
            .get_project(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to get project", &e))?
            .ok_or_else(|| not_found("Project", id))?;

        text(project)
    }

    pub async fn delete_project(&self, Parameters(params): Parameters<DeleteProject>) -> McpResult {
        debug!("delete_project: {:?}", params);

        let id = params.as_ref().id;
        let deleted = self
            .engine
            .delete_project(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to delete project", &e))?
            .ok_or_else(|| not_found("Project", id))?;

        text(DeleteResult::new(deleted))
    }

    pub async fn project_statistics(&self, Parameters(params): Parameters<Id>) -> McpResult {
        debug!("project_statistics: {:?}", params);

        let stats = self
            .engine
            .project_statistics(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to compute project statistics", &e))?;

        text(stats)
    }

    pub async fn create_node(&self, Parameters(params): Parameters<CreateNode>) -> McpResult {
        debug!("create_node: {:?}", params);

        let node = self
            .engine
            .create_node(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to create node", &e))?;

        text(CreateResult::new(node))
    }

    pub async fn show_node(&self, Parameters(params): Parameters<Id>) -> McpResult {
        debug!("show_node: {:?}", params);

        let id = params.as_ref().id;
        let node = self
            .engine
            .get_node(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to get node", &e))?
            .ok_or_else(|| not_found("Node", id))?;

        text(node)
    }

    pub async fn get_children(&self, Parameters(params): Parameters<Id>) -> McpResult {
        debug!("get_children: {:?}", params);

        let children = self
            .engine
            .get_children(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to list children", &e))?;

        text(NodeList(&children))
    }

    pub async fn update_node(&self, Parameters(params): Parameters<UpdateNode>) -> McpResult {
        debug!("update_node: {:?}", params);

        let node = self
            .engine
            .update_node(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to update node", &e))?;

        text(UpdateResult::new(node))
    }

    pub async fn update_node_progress(
        &self,
        Parameters(params): Parameters<SetProgress>,
    ) -> McpResult {
        debug!("update_node_progress: {:?}", params);

        let progress = params.as_ref().progress;
        let node = self
            .engine
            .update_node_progress(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to set progress", &e))?;

        text(UpdateResult::with_changes(
            node,
            vec![format!("Progress: {progress}%")],
        ))
    }

    pub async fn move_node(&self, Parameters(params): Parameters<MoveNode>) -> McpResult {
        debug!("move_node: {:?}", params);

        let node = self
            .engine
            .move_node(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to move node", &e))?;

        let change = format!("Code: {}", node.code);
        text(UpdateResult::with_changes(node, vec![change]))
    }

    pub async fn delete_node(&self, Parameters(params): Parameters<Id>) -> McpResult {
        debug!("delete_node: {:?}", params);

        let node = self
            .engine
            .delete_node(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to delete node", &e))?;

        text(DeleteResult::new(node))
    }

    pub async fn recompute_progress(&self, Parameters(params): Parameters<Id>) -> McpResult {
        debug!("recompute_progress: {:?}", params);

        let rollups = self
            .engine
            .recompute_progress(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to recompute progress", &e))?;

        text(UpdateResult::new(rollups))
    }

    pub async fn get_tree(&self, Parameters(params): Parameters<GetTree>) -> McpResult {
        debug!("get_tree: {:?}", params);

        let view = self
            .engine
            .get_tree(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to load tree", &e))?;
        let json = view
            .to_json()
            .map_err(|e| to_mcp_error("Failed to serialize tree", &e))?;

        // Markdown outline for reading, JSON for structured follow-ups.
        Ok(CallToolResult::success(vec![
            Content::text(format!(
                "# Project {}\n\n{view}",
                params.as_ref().project_id
            )),
            Content::text(json),
        ]))
    }

    pub async fn assign(&self, Parameters(params): Parameters<Assign>) -> McpResult {
        debug!("assign: {:?}", params);

        let &core::Assign { node_id, person_id } = params.as_ref();
        let added = self
            .engine
            .assign(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to assign person", &e))?;

        text(if added {
            OperationStatus::success(format!("Assigned person {person_id} to node {node_id}"))
        } else {
            OperationStatus::failure(format!(
                "Person {person_id} was already assigned to node {node_id}"
            ))
        })
    }

    pub async fn unassign(&self, Parameters(params): Parameters<Assign>) -> McpResult {
        debug!("unassign: {:?}", params);

        let &core::Assign { node_id, person_id } = params.as_ref();
        let removed = self
            .engine
            .unassign(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to unassign person", &e))?;

        text(if removed {
            OperationStatus::success(format!("Removed person {person_id} from node {node_id}"))
        } else {
            OperationStatus::failure(format!(
                "Person {person_id} was not assigned to node {node_id}"
            ))
        })
    }

    pub async fn replace_assignees(
        &self,
        Parameters(params): Parameters<ReplaceAssignees>,
    ) -> McpResult {
        debug!("replace_assignees: {:?}", params);

        let node_id = params.as_ref().node_id;
        let assignments = self
            .engine
            .replace_assignees(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to replace assignees", &e))?;

        text(Assignees {
            node_id,
            assignments: &assignments,
        })
    }

    pub async fn list_assignees(&self, Parameters(params): Parameters<Id>) -> McpResult {
        debug!("list_assignees: {:?}", params);

        let node_id = params.as_ref().id;
        let assignments = self
            .engine
            .list_assignees(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to list assignees", &e))?;

        text(Assignees {
            node_id,
            assignments: &assignments,
        })
    }

    pub async fn list_delayed(&self, Parameters(params): Parameters<Id>) -> McpResult {
        debug!("list_delayed: {:?}", params);

        let project_id = params.as_ref().id;
        let delayed = self
            .engine
            .list_delayed(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to list delayed work", &e))?;

        text(format!(
            "# Delayed work in project {project_id}\n\n{}",
            DelayedNodes(&delayed)
        ))
    }
}
