use crate::commands::{pairing_warnings, CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::ProjectDraft;
use crate::repository::ProjectRepository;
use crate::store::backend::MirrorBackend;
use crate::store::remote::RemoteStore;
use std::fs;
use std::path::Path;
use tracing::info;

/// Seeds the remote store from a JSON array of project rows. Source ids are
/// ignored; the store assigns new ones. Skipped when the store already has
/// projects, unless `append` is set.
pub fn run<R: RemoteStore, B: MirrorBackend>(
    repo: &ProjectRepository<R, B>,
    path: &Path,
    append: bool,
) -> Result<CmdResult> {
    let content = fs::read_to_string(path)?;
    import_content(repo, &content, append)
}

fn import_content<R: RemoteStore, B: MirrorBackend>(
    repo: &ProjectRepository<R, B>,
    content: &str,
    append: bool,
) -> Result<CmdResult> {
    let drafts: Vec<ProjectDraft> = serde_json::from_str(content)?;
    let mut result = CmdResult::default();

    let existing = repo.stored_count()?;
    if existing > 0 && !append {
        result.add_message(CmdMessage::info(format!(
            "Store already holds {} project(s); nothing imported (use --append to add anyway)",
            existing
        )));
        return Ok(result);
    }

    for draft in drafts {
        let project = repo.add(draft)?;
        result.messages.extend(pairing_warnings(&project));
        result.projects.push(project);
    }
    info!(count = result.projects.len(), "seed import finished");

    result.add_message(CmdMessage::success(format!(
        "Total imported: {}",
        result.projects.len()
    )));
    Ok(result)
}
