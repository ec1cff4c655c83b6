use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::ProjectId;
use crate::repository::{Destructive, ProjectRepository};
use crate::store::backend::MirrorBackend;
use crate::store::remote::RemoteStore;

/// Hard delete. Irreversible; the id is never handed out again.
pub fn run<R: RemoteStore, B: MirrorBackend>(
    repo: &ProjectRepository<R, B>,
    ids: &[ProjectId],
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    for &id in ids {
        let Destructive { project, shortfall } = repo.delete(id)?;
        result.add_message(CmdMessage::success(format!(
            "Project deleted ({}): {}",
            project.id, project.title
        )));
        if let Some(shortfall) = shortfall {
            result.add_message(CmdMessage::warning(format!(
                "Featured set is short: {}",
                shortfall
            )));
        }
        result.projects.push(project);
    }
    Ok(result)
}
