use crate::error::Result;
use crate::model::{NewProject, Project, ProjectId, RowPatch};
use crate::query::{ProjectQuery, Selection};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Request/response CRUD over the single `projects` table.
///
/// Implementations translate [`ProjectQuery`] and the write shapes into the
/// backend's dialect and map failures onto the crate's error taxonomy:
/// `NetworkOffline` before any request when offline, `Transport` when a
/// request could not complete, `NotFound` for missing ids and
/// `ConstraintViolation` for rows the backend rejected.
pub trait RemoteStore {
    /// Filtered rows in ascending id order, plus the exact filtered count.
    fn select(&self, query: &ProjectQuery) -> Result<Selection>;

    /// Inserts a row and returns it with its assigned id.
    fn insert(&self, row: &NewProject) -> Result<Project>;

    /// Applies `patch` to the row with `id` and returns the updated row.
    fn update(&self, id: ProjectId, patch: &RowPatch) -> Result<Project>;

    /// Hard-deletes the row and returns what was removed.
    fn delete(&self, id: ProjectId) -> Result<Project>;

    /// Round trip that ignores the offline flag; returns the table's row
    /// count and marks the store online on success.
    fn probe(&self) -> Result<usize>;

    fn is_online(&self) -> bool;
}

/// Shared network-presence flag. Hosts flip it from their own connectivity
/// events; remote clients consult it before every request.
#[derive(Debug, Clone)]
pub struct NetworkStatus(Arc<AtomicBool>);

impl Default for NetworkStatus {
    fn default() -> Self {
        Self::online()
    }
}

impl NetworkStatus {
    pub fn online() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    pub fn is_online(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn set_online(&self, online: bool) {
        self.0.store(online, Ordering::SeqCst);
    }
}
