use super::remote::{NetworkStatus, RemoteStore};
use crate::error::{PorticoError, Result};
use crate::model::{NewProject, Project, ProjectId, RowPatch};
use crate::query::{ProjectQuery, Selection};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

/// In-process remote store.
///
/// Implements the full [`RemoteStore`] contract, including the monotonic id
/// counter (ids of deleted rows are never handed out again). Failure knobs
/// make the offline, transport and partial-write paths testable.
///
/// Uses `RefCell`/`Cell` for interior mutability since the repository is
/// single-threaded.
pub struct InMemoryRemote {
    rows: RefCell<BTreeMap<ProjectId, Project>>,
    next_id: Cell<ProjectId>,
    network: NetworkStatus,
    simulate_transport_error: Cell<bool>,
    writes_before_failure: Cell<Option<usize>>,
    selects: Cell<usize>,
}

impl Default for InMemoryRemote {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRemote {
    pub fn new() -> Self {
        Self::with_network(NetworkStatus::online())
    }

    pub fn with_network(network: NetworkStatus) -> Self {
        Self {
            rows: RefCell::new(BTreeMap::new()),
            next_id: Cell::new(1),
            network,
            simulate_transport_error: Cell::new(false),
            writes_before_failure: Cell::new(None),
            selects: Cell::new(0),
        }
    }

    pub fn network(&self) -> &NetworkStatus {
        &self.network
    }

    /// Stores rows with their existing ids, bypassing validation.
    pub fn seed<I: IntoIterator<Item = Project>>(&self, projects: I) {
        let mut rows = self.rows.borrow_mut();
        for project in projects {
            if project.id >= self.next_id.get() {
                self.next_id.set(project.id + 1);
            }
            rows.insert(project.id, project);
        }
    }

    /// Every stored row, archived included, ascending id.
    pub fn snapshot(&self) -> Vec<Project> {
        self.rows.borrow().values().cloned().collect()
    }

    /// Makes every request fail as if the connection dropped mid-flight.
    pub fn set_simulate_transport_error(&self, simulate: bool) {
        self.simulate_transport_error.set(simulate);
    }

    /// Lets `n` more writes succeed, then fails every write after them.
    pub fn fail_writes_after(&self, n: usize) {
        self.writes_before_failure.set(Some(n));
    }

    pub fn clear_write_failures(&self) {
        self.writes_before_failure.set(None);
    }

    /// Number of `select` calls that reached the store.
    pub fn select_count(&self) -> usize {
        self.selects.get()
    }

    fn check_reachable(&self) -> Result<()> {
        if !self.network.is_online() {
            return Err(PorticoError::NetworkOffline);
        }
        if self.simulate_transport_error.get() {
            return Err(PorticoError::Transport("Simulated connection reset".into()));
        }
        Ok(())
    }

    fn check_write(&self) -> Result<()> {
        self.check_reachable()?;
        match self.writes_before_failure.get() {
            Some(0) => Err(PorticoError::Transport("Simulated write failure".into())),
            Some(n) => {
                self.writes_before_failure.set(Some(n - 1));
                Ok(())
            }
            None => Ok(()),
        }
    }
}

impl RemoteStore for InMemoryRemote {
    fn select(&self, query: &ProjectQuery) -> Result<Selection> {
        self.check_reachable()?;
        self.selects.set(self.selects.get() + 1);
        Ok(query.apply(self.rows.borrow().values()))
    }

    fn insert(&self, row: &NewProject) -> Result<Project> {
        self.check_write()?;
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        let project = row.clone().with_id(id);
        self.rows.borrow_mut().insert(id, project.clone());
        Ok(project)
    }

    fn update(&self, id: ProjectId, patch: &RowPatch) -> Result<Project> {
        self.check_write()?;
        let mut rows = self.rows.borrow_mut();
        let project = rows.get_mut(&id).ok_or(PorticoError::NotFound(id))?;
        patch.apply(project);
        Ok(project.clone())
    }

    fn delete(&self, id: ProjectId) -> Result<Project> {
        self.check_write()?;
        self.rows
            .borrow_mut()
            .remove(&id)
            .ok_or(PorticoError::NotFound(id))
    }

    fn probe(&self) -> Result<usize> {
        if self.simulate_transport_error.get() {
            return Err(PorticoError::Transport("Simulated connection reset".into()));
        }
        self.network.set_online(true);
        Ok(self.rows.borrow().len())
    }

    fn is_online(&self) -> bool {
        self.network.is_online()
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::{MainCategory, SubCategories};

    /// A complete row with placeholder display fields.
    pub fn project(id: ProjectId, main: MainCategory, subs: &[&str]) -> Project {
        Project {
            id,
            title: format!("Project {}", id),
            category: None,
            main_category: main,
            sub_category: SubCategories::new(subs.iter().copied()),
            year: "2023".to_string(),
            image_url: format!("/uploads/project-{}.png", id),
            gallery_images: Vec::new(),
            description: String::new(),
            location: "Lisbon, Portugal".to_string(),
            architect: "Studio".to_string(),
            area: String::new(),
            status: "Completed".to_string(),
            client: String::new(),
            featured: false,
            archived: false,
        }
    }

    pub struct RemoteFixture {
        pub remote: InMemoryRemote,
        next: ProjectId,
    }

    impl Default for RemoteFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl RemoteFixture {
        pub fn new() -> Self {
            Self {
                remote: InMemoryRemote::new(),
                next: 1,
            }
        }

        fn push(&mut self, mut project: Project) {
            project.id = self.next;
            self.next += 1;
            self.remote.seed([project]);
        }

        pub fn with_projects(mut self, count: usize) -> Self {
            for _ in 0..count {
                self.push(project(
                    0,
                    MainCategory::ArchitecturalDesign,
                    &["Cultural Architecture"],
                ));
            }
            self
        }

        pub fn with_featured(mut self, count: usize) -> Self {
            for _ in 0..count {
                let mut p = project(0, MainCategory::ArchitecturalDesign, &["Cultural Architecture"]);
                p.featured = true;
                self.push(p);
            }
            self
        }

        pub fn with_archived(mut self, count: usize) -> Self {
            for _ in 0..count {
                let mut p = project(0, MainCategory::InteriorDesign, &["Exhibition"]);
                p.archived = true;
                self.push(p);
            }
            self
        }

        pub fn with_project(mut self, project: Project) -> Self {
            self.push(project);
            self
        }
    }
}
