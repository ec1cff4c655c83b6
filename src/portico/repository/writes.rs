use super::{ChangeKind, Destructive, ProjectRepository};
use crate::error::Result;
use crate::model::{Project, ProjectDraft, ProjectId, ProjectPatch, RowPatch};
use crate::store::backend::MirrorBackend;
use crate::store::remote::RemoteStore;
use tracing::info;

impl<R: RemoteStore, B: MirrorBackend> ProjectRepository<R, B> {
    /// Creates a project. The remote store assigns the id.
    pub fn add(&self, draft: ProjectDraft) -> Result<Project> {
        let row = draft.into_new_project()?;
        let created = self.remote.insert(&row)?;
        info!(id = created.id, title = %created.title, "project added");
        self.commit(ChangeKind::Mutated { id: created.id }, |m| m.upsert(&created));
        Ok(created)
    }

    /// Merges `patch` into the project. Archived projects can be edited.
    pub fn update(&self, id: ProjectId, patch: ProjectPatch) -> Result<Project> {
        patch.validate()?;
        let updated = self.remote.update(id, &RowPatch::fields(patch))?;
        info!(id, "project updated");
        self.commit(ChangeKind::Mutated { id }, |m| m.upsert(&updated));
        Ok(updated)
    }

    /// Hides a project from every public read and clears its featured flag
    /// in the same write. Never blocked by the featured floor.
    pub fn archive(&self, id: ProjectId) -> Result<Destructive> {
        let before = self.fetch_row(id)?;
        let patch = RowPatch {
            archived: Some(true),
            featured: Some(false),
            ..Default::default()
        };
        let updated = self.remote.update(id, &patch)?;
        info!(id, was_featured = before.featured, "project archived");
        self.commit(ChangeKind::Mutated { id }, |m| m.upsert(&updated));

        Ok(Destructive {
            shortfall: self.shortfall_after(&before),
            project: updated,
        })
    }

    /// Makes an archived project public again. It comes back unfeatured.
    pub fn unarchive(&self, id: ProjectId) -> Result<Project> {
        let updated = self.remote.update(id, &RowPatch::archived(false))?;
        info!(id, "project unarchived");
        self.commit(ChangeKind::Mutated { id }, |m| m.upsert(&updated));
        Ok(updated)
    }

    /// Removes the row for good. Never blocked by the featured floor.
    pub fn delete(&self, id: ProjectId) -> Result<Destructive> {
        let before = self.fetch_row(id)?;
        let removed = self.remote.delete(id)?;
        info!(id, "project deleted");
        self.commit(ChangeKind::Deleted { id }, |m| m.remove(id).map(|_| ()));

        Ok(Destructive {
            shortfall: self.shortfall_after(&before),
            project: removed,
        })
    }
}
