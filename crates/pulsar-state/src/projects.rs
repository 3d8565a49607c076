//! Keeps the session's `projects` and `current_project` cells in step with the
//! host's [`ProjectRegistry`].

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use pulsar_core::{Cell, Project, ProjectId, SessionState};
use pulsar_storage::ProjectRegistry;

use crate::blocking::run_blocking;
use crate::error::ProjectError;

pub struct ProjectCatalog {
    registry: Arc<dyn ProjectRegistry>,
    projects: Cell<Vec<Project>>,
    current_project: Cell<Option<Project>>,
    persist_timeout: Option<Duration>,
}

impl ProjectCatalog {
    /// Binds the catalog to the project cells of `session`.
    pub fn new(registry: Arc<dyn ProjectRegistry>, session: &SessionState) -> Self {
        ProjectCatalog {
            registry,
            projects: session.projects.clone(),
            current_project: session.current_project.clone(),
            persist_timeout: None,
        }
    }

    pub fn with_persist_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.persist_timeout = timeout;
        self
    }

    /// Replaces the project list with the registry's.
    ///
    /// The current selection is refreshed to the registry's copy, or cleared
    /// if the project is gone.
    pub async fn refresh(&self) -> Result<Vec<Project>, ProjectError> {
        let registry = Arc::clone(&self.registry);
        let projects = run_blocking(self.persist_timeout, move || registry.list_projects()).await?;
        self.projects.set(projects.clone());

        if let Some(current) = self.current_project.get() {
            match projects.iter().find(|p| p.id == current.id) {
                Some(fresh) if *fresh != current => self.current_project.set(Some(fresh.clone())),
                Some(_) => {}
                None => self.current_project.set(None),
            }
        }
        Ok(projects)
    }

    /// Registers the Laravel project at `path`.
    ///
    /// The directory must contain an `artisan` file.
    pub async fn add(&self, name: &str, path: impl AsRef<Path>) -> Result<Project, ProjectError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ProjectError::EmptyName);
        }
        let path = path.as_ref().to_path_buf();
        if tokio::fs::metadata(path.join("artisan")).await.is_err() {
            return Err(ProjectError::NotLaravelProject { path });
        }

        let registry = Arc::clone(&self.registry);
        let name = name.to_string();
        let project =
            run_blocking(self.persist_timeout, move || registry.add_project(&name, &path)).await?;
        info!(id = %project.id, name = %project.name, "project added");

        self.refresh().await?;
        Ok(project)
    }

    /// Unregisters a project, clearing the selection if it was the open one.
    pub async fn remove(&self, id: &ProjectId) -> Result<(), ProjectError> {
        let registry = Arc::clone(&self.registry);
        let target = id.clone();
        run_blocking(self.persist_timeout, move || registry.remove_project(&target)).await?;
        info!(%id, "project removed");

        self.refresh().await?;
        Ok(())
    }

    /// Opens the project with `id` from the current list.
    pub fn select(&self, id: &ProjectId) -> Result<Project, ProjectError> {
        let project = self
            .projects
            .with(|projects| projects.iter().find(|p| &p.id == id).cloned())
            .ok_or_else(|| ProjectError::NotFound(id.clone()))?;
        self.current_project.set(Some(project.clone()));
        Ok(project)
    }

    /// Closes the open project.
    pub fn deselect(&self) {
        self.current_project.set(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulsar_storage::InMemoryStore;

    #[test]
    fn test_select_requires_known_project() {
        let session = SessionState::new();
        let catalog = ProjectCatalog::new(Arc::new(InMemoryStore::new()), &session);

        let err = catalog.select(&ProjectId::from("ghost")).unwrap_err();
        assert!(matches!(err, ProjectError::NotFound(_)));
        assert_eq!(session.current_project.get(), None);

        let shop = Project {
            id: ProjectId::from("1"),
            name: "shop".into(),
            path: "/srv/shop".into(),
        };
        session.projects.set(vec![shop.clone()]);
        assert_eq!(catalog.select(&shop.id).unwrap(), shop);
        assert_eq!(session.current_project.get(), Some(shop));

        catalog.deselect();
        assert_eq!(session.current_project.get(), None);
    }
}
