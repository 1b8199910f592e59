//! Command-line argument wrappers and the command handler.
//!
//! Core parameter types stay free of clap attributes; each wrapper here adds
//! the flags and help text and converts into its core counterpart:
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params → Engine
//! ```

use anyhow::{Context, Result};
use arbor_core::{
    display::{
        Assignees, CreateResult, DelayedNodes, DeleteResult, NodeList, OperationStatus, Projects,
        UpdateResult,
    },
    params::*,
    Engine,
};
use clap::{Args, Subcommand};

use crate::renderer::TerminalRenderer;

/// Create a new project
#[derive(Args)]
pub struct CreateProjectArgs {
    /// Name of the project
    pub name: String,
    #[arg(short, long, help = "Optional description of the project")]
    pub description: Option<String>,
}

impl From<CreateProjectArgs> for CreateProject {
    fn from(val: CreateProjectArgs) -> Self {
        CreateProject {
            name: val.name,
            description: val.description,
        }
    }
}

/// Delete a project with its whole tree
#[derive(Args)]
pub struct DeleteProjectArgs {
    /// ID of the project to delete
    pub id: u64,
    #[arg(long, help = "Confirm the deletion; nothing is removed without it")]
    pub confirm: bool,
}

impl From<DeleteProjectArgs> for DeleteProject {
    fn from(val: DeleteProjectArgs) -> Self {
        DeleteProject {
            id: val.id,
            confirmed: val.confirm,
        }
    }
}

/// Any command that takes a single ID
#[derive(Args)]
pub struct IdArgs {
    /// ID of the resource
    pub id: u64,
}

impl From<IdArgs> for Id {
    fn from(val: IdArgs) -> Self {
        Id { id: val.id }
    }
}

/// Add a node to a project
#[derive(Args)]
pub struct AddNodeArgs {
    /// ID of the owning project
    pub project_id: u64,
    /// Name of the work item
    pub name: String,
    #[arg(
        short,
        long,
        help = "Parent node ID; omit to create a root node"
    )]
    pub parent: Option<u64>,
    #[arg(
        short,
        long,
        default_value = "L1",
        help = "Level of the new node (L1-L4), one below the parent"
    )]
    pub level: String,
    #[arg(short, long, help = "Optional description")]
    pub description: Option<String>,
    #[arg(long, help = "Planned start date (YYYY-MM-DD)")]
    pub start: Option<String>,
    #[arg(long, help = "Planned end date (YYYY-MM-DD)")]
    pub end: Option<String>,
    #[arg(short, long, help = "Relative weight (defaults to 1)")]
    pub weight: Option<u32>,
}

impl From<AddNodeArgs> for CreateNode {
    fn from(val: AddNodeArgs) -> Self {
        CreateNode {
            project_id: val.project_id,
            parent_id: val.parent,
            level: val.level,
            name: val.name,
            description: val.description,
            start_date: val.start,
            end_date: val.end,
            weight: val.weight,
        }
    }
}

/// Edit a node's fields; options left out keep their current value
#[derive(Args)]
pub struct UpdateNodeArgs {
    /// ID of the node to update
    pub id: u64,
    #[arg(short, long, help = "New name")]
    pub name: Option<String>,
    #[arg(short, long, help = "New description")]
    pub description: Option<String>,
    #[arg(
        short,
        long,
        help = "New status: pending, in_progress, completed, cancelled, on_hold"
    )]
    pub status: Option<String>,
    #[arg(short, long, help = "New progress (0-100), leaves only")]
    pub progress: Option<u8>,
    #[arg(long, help = "New planned start date (YYYY-MM-DD)")]
    pub start: Option<String>,
    #[arg(long, help = "New planned end date (YYYY-MM-DD)")]
    pub end: Option<String>,
    #[arg(short, long, help = "New relative weight")]
    pub weight: Option<u32>,
}

impl From<UpdateNodeArgs> for UpdateNode {
    fn from(val: UpdateNodeArgs) -> Self {
        UpdateNode {
            id: val.id,
            name: val.name,
            description: val.description,
            status: val.status,
            progress: val.progress,
            start_date: val.start,
            end_date: val.end,
            weight: val.weight,
        }
    }
}

/// Set a leaf's progress
#[derive(Args)]
pub struct ProgressArgs {
    /// ID of the leaf node
    pub id: u64,
    /// Completion percentage (0-100)
    pub progress: u8,
}

impl From<ProgressArgs> for SetProgress {
    fn from(val: ProgressArgs) -> Self {
        SetProgress {
            id: val.id,
            progress: val.progress,
        }
    }
}

/// Move a node and its subtree under another parent
#[derive(Args)]
pub struct MoveNodeArgs {
    /// ID of the node to move
    pub id: u64,
    /// ID of the new parent
    pub new_parent_id: u64,
}

impl From<MoveNodeArgs> for MoveNode {
    fn from(val: MoveNodeArgs) -> Self {
        MoveNode {
            id: val.id,
            new_parent_id: val.new_parent_id,
        }
    }
}

/// Show a project's tree
#[derive(Args)]
pub struct TreeArgs {
    /// ID of the project
    pub project_id: u64,
    #[arg(long, help = "List nodes flat in code order instead of nested")]
    pub flat: bool,
    #[arg(long, help = "Print the tree as JSON")]
    pub json: bool,
}

impl From<TreeArgs> for GetTree {
    fn from(val: TreeArgs) -> Self {
        GetTree {
            project_id: val.project_id,
            flat: val.flat,
        }
    }
}

/// Assign or unassign one person
#[derive(Args)]
pub struct AssignArgs {
    /// ID of the node
    pub node_id: u64,
    /// ID of the person
    pub person_id: u64,
}

impl From<AssignArgs> for Assign {
    fn from(val: AssignArgs) -> Self {
        Assign {
            node_id: val.node_id,
            person_id: val.person_id,
        }
    }
}

/// Replace a node's whole assignee set
#[derive(Args)]
pub struct ReplaceAssigneesArgs {
    /// ID of the node
    pub node_id: u64,
    /// The complete new set of person IDs; pass none to clear
    pub person_ids: Vec<u64>,
}

impl From<ReplaceAssigneesArgs> for ReplaceAssignees {
    fn from(val: ReplaceAssigneesArgs) -> Self {
        ReplaceAssignees {
            node_id: val.node_id,
            person_ids: val.person_ids,
        }
    }
}

#[derive(Subcommand)]
pub enum ProjectCommands {
    /// Create a new project
    #[command(alias = "c")]
    Create(CreateProjectArgs),
    /// List all projects
    #[command(alias = "ls")]
    List,
    /// Show project details
    Show(IdArgs),
    /// Delete a project and every node in it
    #[command(alias = "rm")]
    Delete(DeleteProjectArgs),
    /// Show node counts, progress and delays for a project
    Stats(IdArgs),
}

#[derive(Subcommand)]
pub enum NodeCommands {
    /// Add a node to a project
    #[command(alias = "a")]
    Add(AddNodeArgs),
    /// Show node details
    Show(IdArgs),
    /// List the direct children of a node
    Children(IdArgs),
    /// Update node fields
    #[command(alias = "u")]
    Update(UpdateNodeArgs),
    /// Set a leaf's progress
    #[command(alias = "p")]
    Progress(ProgressArgs),
    /// Move a node and its subtree under another parent
    #[command(alias = "mv")]
    Move(MoveNodeArgs),
    /// Delete a node and its subtree
    #[command(alias = "rm")]
    Delete(IdArgs),
    /// Recompute progress for a node and its ancestors
    Recompute(IdArgs),
}

#[derive(Subcommand)]
pub enum AssignCommands {
    /// Assign a person to a node
    Add(AssignArgs),
    /// Remove a person from a node
    #[command(alias = "rm")]
    Remove(AssignArgs),
    /// Replace all assignees of a node
    Replace(ReplaceAssigneesArgs),
    /// List the people assigned to a node
    #[command(alias = "ls")]
    List(IdArgs),
}

/// Runs CLI commands against an engine and renders the Markdown result.
pub struct Cli {
    engine: Engine,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(engine: Engine, renderer: TerminalRenderer) -> Self {
        Self { engine, renderer }
    }

    pub async fn handle_project_command(&self, command: ProjectCommands) -> Result<()> {
        match command {
            ProjectCommands::Create(args) => {
                let project = self
                    .engine
                    .create_project(&args.into())
                    .await
                    .context("Failed to create project")?;
                self.renderer
                    .render(&CreateResult::new(project).to_string())
            }
            ProjectCommands::List => self.list_projects().await,
            ProjectCommands::Show(args) => {
                let id = args.id;
                let project = self
                    .engine
                    .get_project(&args.into())
                    .await
                    .context("Failed to get project")?
                    .with_context(|| format!("Project with ID {id} not found"))?;
                self.renderer.render(&project.to_string())
            }
            ProjectCommands::Delete(args) => {
                let id = args.id;
                let deleted = self
                    .engine
                    .delete_project(&args.into())
                    .await
                    .context("Failed to delete project")?;
                match deleted {
                    Some(project) => self
                        .renderer
                        .render(&DeleteResult::new(project).to_string()),
                    None => self.renderer.render(
                        &OperationStatus::failure(format!("Project with ID {id} not found"))
                            .to_string(),
                    ),
                }
            }
            ProjectCommands::Stats(args) => {
                let stats = self
                    .engine
                    .project_statistics(&args.into())
                    .await
                    .context("Failed to compute project statistics")?;
                self.renderer.render(&stats.to_string())
            }
        }
    }

    pub async fn handle_node_command(&self, command: NodeCommands) -> Result<()> {
        match command {
            NodeCommands::Add(args) => {
                let node = self
                    .engine
                    .create_node(&args.into())
                    .await
                    .context("Failed to add node")?;
                self.renderer.render(&CreateResult::new(node).to_string())
            }
            NodeCommands::Show(args) => {
                let id = args.id;
                let node = self
                    .engine
                    .get_node(&args.into())
                    .await
                    .context("Failed to get node")?
                    .with_context(|| format!("Node with ID {id} not found"))?;
                self.renderer.render(&node.to_string())
            }
            NodeCommands::Children(args) => {
                let children = self
                    .engine
                    .get_children(&args.into())
                    .await
                    .context("Failed to list children")?;
                self.renderer.render(&NodeList(&children).to_string())
            }
            NodeCommands::Update(args) => {
                let params: UpdateNode = args.into();
                let changes = describe_changes(&params);
                let node = self
                    .engine
                    .update_node(&params)
                    .await
                    .context("Failed to update node")?;
                self.renderer
                    .render(&UpdateResult::with_changes(node, changes).to_string())
            }
            NodeCommands::Progress(args) => {
                let progress = args.progress;
                let node = self
                    .engine
                    .update_node_progress(&args.into())
                    .await
                    .context("Failed to set progress")?;
                self.renderer.render(
                    &UpdateResult::with_changes(node, vec![format!("Progress: {progress}%")])
                        .to_string(),
                )
            }
            NodeCommands::Move(args) => {
                let node = self
                    .engine
                    .move_node(&args.into())
                    .await
                    .context("Failed to move node")?;
                let change = format!("Code: {}", node.code);
                self.renderer
                    .render(&UpdateResult::with_changes(node, vec![change]).to_string())
            }
            NodeCommands::Delete(args) => {
                let node = self
                    .engine
                    .delete_node(&args.into())
                    .await
                    .context("Failed to delete node")?;
                self.renderer.render(&DeleteResult::new(node).to_string())
            }
            NodeCommands::Recompute(args) => {
                let rollups = self
                    .engine
                    .recompute_progress(&args.into())
                    .await
                    .context("Failed to recompute progress")?;
                self.renderer.render(&UpdateResult::new(rollups).to_string())
            }
        }
    }

    pub async fn handle_assign_command(&self, command: AssignCommands) -> Result<()> {
        match command {
            AssignCommands::Add(args) => {
                let (node_id, person_id) = (args.node_id, args.person_id);
                let added = self
                    .engine
                    .assign(&args.into())
                    .await
                    .context("Failed to assign person")?;
                let status = if added {
                    OperationStatus::success(format!(
                        "Assigned person {person_id} to node {node_id}"
                    ))
                } else {
                    OperationStatus::failure(format!(
                        "Person {person_id} was already assigned to node {node_id}"
                    ))
                };
                self.renderer.render(&status.to_string())
            }
            AssignCommands::Remove(args) => {
                let (node_id, person_id) = (args.node_id, args.person_id);
                let removed = self
                    .engine
                    .unassign(&args.into())
                    .await
                    .context("Failed to unassign person")?;
                let status = if removed {
                    OperationStatus::success(format!(
                        "Removed person {person_id} from node {node_id}"
                    ))
                } else {
                    OperationStatus::failure(format!(
                        "Person {person_id} was not assigned to node {node_id}"
                    ))
                };
                self.renderer.render(&status.to_string())
            }
            AssignCommands::Replace(args) => {
                let node_id = args.node_id;
                let assignments = self
                    .engine
                    .replace_assignees(&args.into())
                    .await
                    .context("Failed to replace assignees")?;
                self.renderer.render(
                    &Assignees {
                        node_id,
                        assignments: &assignments,
                    }
                    .to_string(),
                )
            }
            AssignCommands::List(args) => {
                let node_id = args.id;
                let assignments = self
                    .engine
                    .list_assignees(&args.into())
                    .await
                    .context("Failed to list assignees")?;
                self.renderer.render(
                    &Assignees {
                        node_id,
                        assignments: &assignments,
                    }
                    .to_string(),
                )
            }
        }
    }

    pub async fn tree(&self, args: TreeArgs) -> Result<()> {
        let (project_id, json) = (args.project_id, args.json);
        let view = self
            .engine
            .get_tree(&args.into())
            .await
            .context("Failed to load tree")?;

        if json {
            // JSON bypasses the Markdown renderer so it can be piped.
            println!("{}", view.to_json()?);
            return Ok(());
        }
        self.renderer
            .render(&format!("# Project {project_id}\n\n{view}"))
    }

    pub async fn delayed(&self, args: IdArgs) -> Result<()> {
        let project_id = args.id;
        let delayed = self
            .engine
            .list_delayed(&args.into())
            .await
            .context("Failed to list delayed work")?;
        self.renderer.render(&format!(
            "# Delayed work in project {project_id}\n\n{}",
            DelayedNodes(&delayed)
        ))
    }

    pub async fn list_projects(&self) -> Result<()> {
        let projects = self
            .engine
            .list_projects()
            .await
            .context("Failed to list projects")?;
        self.renderer
            .render(&format!("# Projects\n\n{}", Projects(&projects)))
    }
}

fn describe_changes(params: &UpdateNode) -> Vec<String> {
    let mut changes = Vec::new();
    if let Some(name) = &params.name {
        changes.push(format!("Name: {name}"));
    }
    if params.description.is_some() {
        changes.push("Description updated".to_string());
    }
    if let Some(status) = &params.status {
        changes.push(format!("Status: {status}"));
    }
    if let Some(progress) = params.progress {
        changes.push(format!("Progress: {progress}%"));
    }
    if let Some(start) = &params.start_date {
        changes.push(format!("Start: {start}"));
    }
    if let Some(end) = &params.end_date {
        changes.push(format!("End: {end}"));
    }
    if let Some(weight) = params.weight {
        changes.push(format!("Weight: {weight}"));
    }
    changes
}
