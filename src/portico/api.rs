//! # API Facade
//!
//! A thin facade over the command layer and the single entry point for UI
//! clients. It dispatches to `commands::*`, normalizes inputs (id selectors
//! become project ids) and returns structured [`CmdResult`]s. No business
//! logic and no printing lives here.
//!
//! ## Id Selectors
//!
//! Batch commands take selectors as typed on a command line:
//!
//! - a single id: `7`
//! - an inclusive range: `3-5`
//!
//! Selectors are expanded in order and de-duplicated, so `3-5 4 9` yields
//! `[3, 4, 5, 9]`. Reversed ranges and non-numeric input are rejected.
//!
//! ## Generic Over Stores
//!
//! `PorticoApi<R, B>` is generic over the remote store and the mirror
//! backend: the CLI runs `PorticoApi<RestRemote, FsBackend>`, tests run
//! `PorticoApi<InMemoryRemote, MemBackend>`.

use crate::commands::{self, CmdResult};
use crate::error::{PorticoError, Result};
use crate::model::{DisplayMode, MainCategory, ProjectDraft, ProjectId, ProjectPatch, SocialLinks};
use crate::query::RowFilters;
use crate::repository::{ChangeEvent, ProjectRepository, Subscription};
use crate::store::backend::MirrorBackend;
use crate::store::remote::RemoteStore;
use std::collections::HashSet;
use std::path::Path;

pub struct PorticoApi<R: RemoteStore, B: MirrorBackend> {
    repo: ProjectRepository<R, B>,
}

impl<R: RemoteStore, B: MirrorBackend> PorticoApi<R, B> {
    pub fn new(repo: ProjectRepository<R, B>) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &ProjectRepository<R, B> {
        &self.repo
    }

    pub fn on_change<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&ChangeEvent) + 'static,
    {
        self.repo.on_change(callback)
    }

    // --- Browsing ---

    pub fn list_projects(&self, archived: bool) -> Result<CmdResult> {
        commands::list::run(&self.repo, archived)
    }

    pub fn project_row(&self, page: usize, filters: &RowFilters) -> Result<CmdResult> {
        commands::list::row(&self.repo, page, filters)
    }

    pub fn view_project(&self, id: ProjectId) -> Result<CmdResult> {
        commands::view::run(&self.repo, id)
    }

    pub fn featured_projects(&self, mode: Option<DisplayMode>) -> Result<CmdResult> {
        commands::featuring::featured(&self.repo, mode)
    }

    pub fn categories(&self, main: Option<MainCategory>) -> CmdResult {
        commands::categories::run(main)
    }

    // --- Editing ---

    pub fn create_project(&self, draft: ProjectDraft) -> Result<CmdResult> {
        commands::create::run(&self.repo, draft)
    }

    pub fn update_project(&self, id: ProjectId, patch: ProjectPatch) -> Result<CmdResult> {
        commands::update::run(&self.repo, id, patch)
    }

    pub fn archive_projects<I: AsRef<str>>(&self, selectors: &[I]) -> Result<CmdResult> {
        commands::archive::archive(&self.repo, &parse_selectors(selectors)?)
    }

    pub fn unarchive_projects<I: AsRef<str>>(&self, selectors: &[I]) -> Result<CmdResult> {
        commands::archive::unarchive(&self.repo, &parse_selectors(selectors)?)
    }

    pub fn delete_projects<I: AsRef<str>>(&self, selectors: &[I]) -> Result<CmdResult> {
        commands::delete::run(&self.repo, &parse_selectors(selectors)?)
    }

    pub fn feature_projects<I: AsRef<str>>(&self, selectors: &[I]) -> Result<CmdResult> {
        commands::featuring::feature(&self.repo, &parse_selectors(selectors)?)
    }

    pub fn unfeature_projects<I: AsRef<str>>(&self, selectors: &[I]) -> Result<CmdResult> {
        commands::featuring::unfeature(&self.repo, &parse_selectors(selectors)?)
    }

    pub fn replace_featured(&self, outgoing: ProjectId, incoming: ProjectId) -> Result<CmdResult> {
        commands::featuring::replace(&self.repo, outgoing, incoming)
    }

    // --- Site ---

    pub fn social_links(&self, links: Option<SocialLinks>) -> Result<CmdResult> {
        commands::site::social(&self.repo, links)
    }

    pub fn display_mode(&self, mode: Option<DisplayMode>) -> Result<CmdResult> {
        commands::site::mode(&self.repo, mode)
    }

    // --- Data ---

    pub fn import_projects(&self, path: &Path, append: bool) -> Result<CmdResult> {
        commands::import::run(&self.repo, path, append)
    }

    pub fn sync(&self) -> Result<CmdResult> {
        commands::sync::run(&self.repo)
    }

    pub fn status(&self) -> Result<CmdResult> {
        commands::status::run(&self.repo)
    }
}

/// Widest `a-b` selector accepted.
const MAX_RANGE_LEN: ProjectId = 1000;

fn parse_selectors<I: AsRef<str>>(inputs: &[I]) -> Result<Vec<ProjectId>> {
    let mut ids = Vec::new();
    for input in inputs {
        ids.extend(parse_id_or_range(input.as_ref())?);
    }

    let mut seen = HashSet::new();
    ids.retain(|id| seen.insert(*id));
    Ok(ids)
}

fn parse_id_or_range(s: &str) -> Result<Vec<ProjectId>> {
    let s = s.trim();
    match s.split_once('-') {
        Some((start, end)) => {
            let start = parse_id(start)?;
            let end = parse_id(end)?;
            if start > end {
                return Err(PorticoError::Validation(format!(
                    "Invalid range {}: start is after end",
                    s
                )));
            }
            if end - start >= MAX_RANGE_LEN {
                return Err(PorticoError::Validation(format!(
                    "Invalid range {}: spans more than {} ids",
                    s, MAX_RANGE_LEN
                )));
            }
            Ok((start..=end).collect())
        }
        None => Ok(vec![parse_id(s)?]),
    }
}

fn parse_id(s: &str) -> Result<ProjectId> {
    s.trim()
        .parse()
        .map_err(|_| PorticoError::Validation(format!("Not a project id: {}", s)))
}
