//! # Commands
//!
//! Business-facing operations built on the repository. Each command returns
//! a [`CmdResult`]: the projects it listed or touched plus user-facing
//! messages. Commands never print; the CLI renders the result.

use crate::model::{DisplayMode, MainCategory, Project, SocialLinks};
use crate::store::mirror::ChangeSignal;

pub mod archive;
pub mod categories;
pub mod create;
pub mod delete;
pub mod featuring;
pub mod import;
pub mod list;
pub mod site;
pub mod status;
pub mod sync;
pub mod update;
pub mod view;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// Position of a listed gallery row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowInfo {
    pub page: usize,
    pub total_count: usize,
    pub has_more: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteSettings {
    pub social_links: SocialLinks,
    pub display_mode: DisplayMode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub online: bool,
    pub stored_projects: Option<usize>,
    pub featured: Option<usize>,
    pub featured_minimum: usize,
    pub mirror_seeded: bool,
    pub mirrored_projects: usize,
    pub last_change: Option<ChangeSignal>,
    pub display_mode: DisplayMode,
}

#[derive(Debug, Default)]
pub struct CmdResult {
    /// Projects listed or affected, in display order.
    pub projects: Vec<Project>,
    pub related: Vec<Project>,
    pub row: Option<RowInfo>,
    pub settings: Option<SiteSettings>,
    pub status: Option<StatusReport>,
    pub categories: Vec<(MainCategory, &'static [&'static str])>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_projects(mut self, projects: Vec<Project>) -> Self {
        self.projects = projects;
        self
    }

    pub fn with_related(mut self, related: Vec<Project>) -> Self {
        self.related = related;
        self
    }

    pub fn with_row(mut self, row: RowInfo) -> Self {
        self.row = Some(row);
        self
    }

    pub fn with_settings(mut self, settings: SiteSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    pub fn with_status(mut self, status: StatusReport) -> Self {
        self.status = Some(status);
        self
    }

    pub fn has_level(&self, level: MessageLevel) -> bool {
        self.messages.iter().any(|m| m.level == level)
    }
}

/// Advisory warnings for subcategories outside the main category's
/// vocabulary.
pub(crate) fn pairing_warnings(project: &Project) -> Vec<CmdMessage> {
    crate::categories::validate_pairing(project.main_category, &project.sub_category)
        .into_iter()
        .map(|sub| {
            CmdMessage::warning(format!(
                "\"{}\" is not a {} subcategory",
                sub, project.main_category
            ))
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod test_support {
    pub use crate::repository::test_support::{ids, live_featured, repository, TestRepository};
    pub use crate::store::memory::fixtures::{project, RemoteFixture};
}
