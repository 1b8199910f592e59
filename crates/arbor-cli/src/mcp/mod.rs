//! MCP server implementation for Arbor
//!
//! Exposes the engine operations as Model Context Protocol tools over stdio.

use std::future::Future;

use anyhow::Result;
use arbor_core::Engine;
use log::{debug, error, info};
use rmcp::{
    handler::server::{router::tool::ToolRouter, tool::Parameters},
    model::{Implementation, ProtocolVersion, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ServerHandler,
};
use tokio::signal::unix::{signal, SignalKind};

pub mod errors;
pub mod handlers;

pub use handlers::{
    Assign, CreateNode, CreateProject, DeleteProject, GetTree, Id, McpResult, MoveNode,
    ReplaceAssignees, SetProgress, UpdateNode,
};

/// MCP server for Arbor
#[derive(Clone)]
pub struct ArborMcpServer {
    engine: Engine,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl ArborMcpServer {
    pub fn new(engine: Engine) -> Self {
        Self {
            engine,
            tool_router: Self::tool_router(),
        }
    }

    fn handlers(&self) -> handlers::McpHandlers {
        handlers::McpHandlers::new(self.engine.clone())
    }

    #[tool(
        name = "create_project",
        description = "Create a new project, the container for a work breakdown tree. Provide a name (required) and optional description. Returns the project ID used by every node tool."
    )]
    async fn create_project(&self, params: Parameters<CreateProject>) -> McpResult {
        self.handlers().create_project(params).await
    }

    #[tool(
        name = "list_projects",
        description = "List all projects with their IDs, names and last update time."
    )]
    async fn list_projects(&self) -> McpResult {
        self.handlers().list_projects().await
    }

    #[tool(
        name = "show_project",
        description = "Show one project's details by ID."
    )]
    async fn show_project(&self, params: Parameters<Id>) -> McpResult {
        self.handlers().show_project(params).await
    }

    #[tool(
        name = "delete_project",
        description = "Permanently delete a project with every node and assignment in it. Requires confirmed=true; this cannot be undone."
    )]
    async fn delete_project(&self, params: Parameters<DeleteProject>) -> McpResult {
        self.handlers().delete_project(params).await
    }

    #[tool(
        name = "project_statistics",
        description = "Summarize a project: node counts per level, leaf counts per status, overall progress and how many leaves are delayed today."
    )]
    async fn project_statistics(&self, params: Parameters<Id>) -> McpResult {
        self.handlers().project_statistics(params).await
    }

    #[tool(
        name = "create_node",
        description = "Add a work item to a project. Omit parent_id to create a root at level 'L1'; otherwise level must be exactly one below the parent's (max 'L4'). The hierarchical code (e.g. '2.3.1') is assigned automatically. Optional: description, start_date/end_date (YYYY-MM-DD), weight."
    )]
    async fn create_node(&self, params: Parameters<CreateNode>) -> McpResult {
        self.handlers().create_node(params).await
    }

    #[tool(
        name = "show_node",
        description = "Show one node's details: code, level, status, progress, dates and parent."
    )]
    async fn show_node(&self, params: Parameters<Id>) -> McpResult {
        self.handlers().show_node(params).await
    }

    #[tool(
        name = "get_children",
        description = "List the direct children of a node in sibling order."
    )]
    async fn get_children(&self, params: Parameters<Id>) -> McpResult {
        self.handlers().get_children(params).await
    }

    #[tool(
        name = "update_node",
        description = "Edit a node's name, description, dates, weight, status or progress. Progress is only accepted on leaves. Status 'cancelled' or 'on_hold' on a group node pins that status while progress keeps rolling up; any other status releases the pin. Omitted fields are left unchanged; a description or date cannot be cleared once set."
    )]
    async fn update_node(&self, params: Parameters<UpdateNode>) -> McpResult {
        self.handlers().update_node(params).await
    }

    #[tool(
        name = "update_node_progress",
        description = "Set a leaf node's progress (0-100). Rejected for nodes with children, whose progress is the mean of their children. Ancestors are recomputed in the same transaction."
    )]
    async fn update_node_progress(&self, params: Parameters<SetProgress>) -> McpResult {
        self.handlers().update_node_progress(params).await
    }

    #[tool(
        name = "move_node",
        description = "Move a node and its subtree under a new parent at the same level as the current parent. Codes in the subtree are rewritten and both the old and new ancestors are recomputed."
    )]
    async fn move_node(&self, params: Parameters<MoveNode>) -> McpResult {
        self.handlers().move_node(params).await
    }

    #[tool(
        name = "delete_node",
        description = "Delete a node with its whole subtree and their assignments, then recompute the former parent's progress. This cannot be undone."
    )]
    async fn delete_node(&self, params: Parameters<Id>) -> McpResult {
        self.handlers().delete_node(params).await
    }

    #[tool(
        name = "recompute_progress",
        description = "Recompute a node's progress from its children, then every ancestor's. Idempotent; use after bulk changes."
    )]
    async fn recompute_progress(&self, params: Parameters<Id>) -> McpResult {
        self.handlers().recompute_progress(params).await
    }

    #[tool(
        name = "get_tree",
        description = "Read a project's whole tree. flat=false (default) returns the nested forest; flat=true returns nodes in code order. Returns a Markdown outline followed by the JSON form."
    )]
    async fn get_tree(&self, params: Parameters<GetTree>) -> McpResult {
        self.handlers().get_tree(params).await
    }

    #[tool(
        name = "assign",
        description = "Assign a person to a node. Assigning someone already assigned is a no-op."
    )]
    async fn assign(&self, params: Parameters<Assign>) -> McpResult {
        self.handlers().assign(params).await
    }

    #[tool(
        name = "unassign",
        description = "Remove a person from a node. Removing someone not assigned is a no-op."
    )]
    async fn unassign(&self, params: Parameters<Assign>) -> McpResult {
        self.handlers().unassign(params).await
    }

    #[tool(
        name = "replace_assignees",
        description = "Replace the complete set of people assigned to a node in one step. An empty list clears the node."
    )]
    async fn replace_assignees(&self, params: Parameters<ReplaceAssignees>) -> McpResult {
        self.handlers().replace_assignees(params).await
    }

    #[tool(
        name = "list_assignees",
        description = "List the people assigned to a node."
    )]
    async fn list_assignees(&self, params: Parameters<Id>) -> McpResult {
        self.handlers().list_assignees(params).await
    }

    #[tool(
        name = "list_delayed",
        description = "List a project's leaves that are past their end date and not completed, cancelled or on hold, most overdue first."
    )]
    async fn list_delayed(&self, params: Parameters<Id>) -> McpResult {
        self.handlers().list_delayed(params).await
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for ArborMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "arbor".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            instructions: Some(r#"Arbor maintains work breakdown structures (WBS): projects broken down into at most four levels of work items.

## Core Concepts
- **Projects** own a forest of nodes.
- **Nodes** sit at levels L1 (roots) to L4. A child is always exactly one level below its parent.
- **Codes** such as `2.3.1` are assigned automatically and are unique within a project.
- **Progress** is set on leaves only. A node with children always shows the rounded mean of its children's progress.
- **Delayed** leaves are past their end date and not completed, cancelled or on hold.

## Workflow
1. `create_project`, then build the tree top-down with `create_node`.
2. Track work with `update_node_progress` on leaves; ancestors update automatically.
3. Review with `get_tree`, `project_statistics` and `list_delayed`.
4. Staff work with `assign`, `unassign` and `replace_assignees`.

## Tool Categories
- **Projects**: create_project, list_projects, show_project, delete_project, project_statistics
- **Nodes**: create_node, show_node, get_children, update_node, update_node_progress, move_node, delete_node, recompute_progress, get_tree, list_delayed
- **Assignments**: assign, unassign, replace_assignees, list_assignees"#.to_string()),
        }
    }
}

/// Run the MCP server with stdio transport
pub async fn run_stdio_server(server: ArborMcpServer) -> Result<()> {
    use rmcp::{transport::stdio, ServiceExt};

    info!(
        "Starting Arbor MCP server on stdio for {}",
        server.engine.database_path().display()
    );
    debug!(
        "Server created with {} tools",
        server.tool_router.list_all().len()
    );

    let service = server.serve(stdio()).await.inspect_err(|e| {
        error!("serving error: {e:?}");
    })?;

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    tokio::select! {
        result = service.waiting() => {
            match result {
                Ok(_) => info!("MCP server stopped normally"),
                Err(e) => error!("MCP server error: {e:?}"),
            }
        }
        _ = sigint.recv() => {
            info!("Received SIGINT, shutting down gracefully...");
        }
        _ = sigterm.recv() => {
            info!("Received SIGTERM, shutting down gracefully...");
        }
    }

    info!("MCP server shutdown complete");
    Ok(())
}
