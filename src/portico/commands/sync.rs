use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::repository::ProjectRepository;
use crate::store::backend::MirrorBackend;
use crate::store::remote::RemoteStore;

/// One polling tick: picks up changes other processes made to the mirror,
/// then reloads the active list from the remote store.
pub fn run<R: RemoteStore, B: MirrorBackend>(repo: &ProjectRepository<R, B>) -> Result<CmdResult> {
    let mut result = CmdResult::default();

    if repo.poll_external_changes()? {
        result.add_message(CmdMessage::info("Local mirror was changed by another process"));
    }

    let projects = repo.refresh()?;
    if repo.remote().is_online() {
        result.add_message(CmdMessage::success(format!(
            "Synced {} active project(s)",
            projects.len()
        )));
    } else {
        result.add_message(CmdMessage::warning(format!(
            "Offline; showing {} mirrored project(s)",
            projects.len()
        )));
    }
    Ok(result.with_projects(projects))
}
