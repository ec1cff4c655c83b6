//! # Local Mirror
//!
//! A durable, denormalized copy of the remote collection plus the site
//! settings that only ever lived on the client. Used as:
//!
//! 1. the offline fallback for reads,
//! 2. the seed for first paint before a remote fetch resolves,
//! 3. a same-device change signal: every write stamps `changed_at` with the
//!    writer's id so other instances sharing the storage can notice.
//!
//! Last writer wins. There is no versioning and no merge.
//!
//! ## Keys
//!
//! | Key | Value |
//! |-----|-------|
//! | `projects` | `Vec<Project>`, active and archived, ascending id |
//! | `social_links` | [`SocialLinks`] |
//! | `use_random_selection` | `bool` ([`DisplayMode`]) |
//! | `changed_at` | [`ChangeSignal`] |

use super::backend::MirrorBackend;
use crate::error::{PorticoError, Result};
use crate::model::{DisplayMode, Project, ProjectId, SocialLinks};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

pub const PROJECTS_KEY: &str = "projects";
pub const SOCIAL_LINKS_KEY: &str = "social_links";
pub const DISPLAY_MODE_KEY: &str = "use_random_selection";
pub const CHANGED_AT_KEY: &str = "changed_at";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSignal {
    pub writer: Uuid,
    pub at: DateTime<Utc>,
}

pub struct LocalMirror<B: MirrorBackend> {
    backend: B,
    writer: Uuid,
}

impl<B: MirrorBackend> LocalMirror<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            writer: Uuid::new_v4(),
        }
    }

    /// Identity stamped into change signals written by this instance.
    pub fn writer_id(&self) -> Uuid {
        self.writer
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.backend.get(key)? {
            None => Ok(None),
            Some(raw) => {
                let value = serde_json::from_str(&raw).map_err(PorticoError::Serialization)?;
                Ok(Some(value))
            }
        }
    }

    fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value).map_err(PorticoError::Serialization)?;
        self.backend.set(key, &raw)
    }

    // --- Projects ---

    /// True once any project list has been written, even an empty one.
    pub fn is_seeded(&self) -> Result<bool> {
        Ok(self.backend.get(PROJECTS_KEY)?.is_some())
    }

    /// The stored collection, or `None` if the mirror was never seeded.
    pub fn load_projects(&self) -> Result<Option<Vec<Project>>> {
        self.read(PROJECTS_KEY)
    }

    pub fn projects(&self) -> Result<Vec<Project>> {
        Ok(self.load_projects()?.unwrap_or_default())
    }

    fn save_projects(&self, mut projects: Vec<Project>) -> Result<()> {
        projects.sort_by_key(|p| p.id);
        self.write(PROJECTS_KEY, &projects)
    }

    /// Replaces every stored project whose `archived` flag equals `archived`
    /// with `rows`. Rows of the other partition are kept unless `rows` carries
    /// the same id, which means the project moved between partitions.
    pub fn replace_partition(&self, archived: bool, rows: &[Project]) -> Result<()> {
        let incoming: HashSet<ProjectId> = rows.iter().map(|p| p.id).collect();
        let mut projects = self.projects()?;
        projects.retain(|p| p.archived != archived && !incoming.contains(&p.id));
        projects.extend(rows.iter().cloned());
        self.save_projects(projects)
    }

    pub fn upsert(&self, project: &Project) -> Result<()> {
        let mut projects = self.projects()?;
        match projects.iter_mut().find(|p| p.id == project.id) {
            Some(existing) => *existing = project.clone(),
            None => projects.push(project.clone()),
        }
        self.save_projects(projects)
    }

    /// Returns whether a project was removed.
    pub fn remove(&self, id: ProjectId) -> Result<bool> {
        let mut projects = self.projects()?;
        let before = projects.len();
        projects.retain(|p| p.id != id);
        let removed = projects.len() != before;
        self.save_projects(projects)?;
        Ok(removed)
    }

    // --- Site settings ---

    pub fn social_links(&self) -> Result<SocialLinks> {
        Ok(self.read(SOCIAL_LINKS_KEY)?.unwrap_or_default())
    }

    pub fn set_social_links(&self, links: &SocialLinks) -> Result<()> {
        self.write(SOCIAL_LINKS_KEY, links)
    }

    pub fn display_mode(&self) -> Result<DisplayMode> {
        let random: Option<bool> = self.read(DISPLAY_MODE_KEY)?;
        Ok(DisplayMode::from_random_flag(random.unwrap_or(false)))
    }

    pub fn set_display_mode(&self, mode: DisplayMode) -> Result<()> {
        self.write(DISPLAY_MODE_KEY, &mode.is_random())
    }

    // --- Change signal ---

    pub fn change_signal(&self) -> Result<Option<ChangeSignal>> {
        self.read(CHANGED_AT_KEY)
    }

    pub fn mark_changed(&self) -> Result<ChangeSignal> {
        let signal = ChangeSignal {
            writer: self.writer,
            at: Utc::now(),
        };
        self.write(CHANGED_AT_KEY, &signal)?;
        Ok(signal)
    }

    /// Removes every key, including settings.
    pub fn clear(&self) -> Result<()> {
        for key in self.backend.keys()? {
            self.backend.remove(&key)?;
        }
        Ok(())
    }
}
