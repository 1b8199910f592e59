//! Project operations for the Engine.

use log::info;

use super::Engine;
use crate::{
    error::{Result, WbsError},
    models::{Project, ProjectStatistics},
    params::{CreateProject, DeleteProject, Id},
};

impl Engine {
    /// Creates a new, empty project.
    pub async fn create_project(&self, params: &CreateProject) -> Result<Project> {
        let name = params.name.clone();
        let description = params.description.clone();

        let project = self
            .run(move |db| db.create_project(&name, description.as_deref()))
            .await?;
        info!("created project {} '{}'", project.id, project.name);
        Ok(project)
    }

    /// Retrieves a project by its ID.
    pub async fn get_project(&self, params: &Id) -> Result<Option<Project>> {
        let id = params.id;
        self.run(move |db| db.get_project(id)).await
    }

    /// Lists all projects.
    pub async fn list_projects(&self) -> Result<Vec<Project>> {
        self.run(|db| db.list_projects()).await
    }

    /// Permanently deletes a project, its whole tree and every assignment in
    /// it.
    ///
    /// Requires explicit confirmation via the `confirmed` field. Returns the
    /// deleted project, or `None` if it did not exist.
    ///
    /// # Errors
    ///
    /// Returns `WbsError::InvalidInput` if `confirmed` is false
    pub async fn delete_project(&self, params: &DeleteProject) -> Result<Option<Project>> {
        if !params.confirmed {
            return Err(WbsError::invalid_input("confirmed").with_reason(
                "Project deletion requires explicit confirmation. Set 'confirmed' to true to proceed with permanent deletion.",
            ));
        }

        let id = params.id;
        let deleted = self.run(move |db| db.delete_project(id)).await?;
        if let Some(project) = &deleted {
            info!("deleted project {} '{}'", project.id, project.name);
        }
        Ok(deleted)
    }

    /// Node counts, leaf status breakdown, delayed leaves and overall
    /// progress of a project, from one bulk read of its tree.
    pub async fn project_statistics(&self, params: &Id) -> Result<ProjectStatistics> {
        let project_id = params.id;
        let delays = self.delay_evaluator();

        let nodes = self.run(move |db| db.get_project_nodes(project_id)).await?;
        Ok(ProjectStatistics::from_nodes(project_id, &nodes, &delays))
    }
}
