use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::ProjectId;
use crate::repository::{Destructive, ProjectRepository};
use crate::store::backend::MirrorBackend;
use crate::store::remote::RemoteStore;

pub fn archive<R: RemoteStore, B: MirrorBackend>(
    repo: &ProjectRepository<R, B>,
    ids: &[ProjectId],
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    for &id in ids {
        let Destructive { project, shortfall } = repo.archive(id)?;
        result.add_message(CmdMessage::success(format!(
            "Project archived ({}): {}",
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

pub fn unarchive<R: RemoteStore, B: MirrorBackend>(
    repo: &ProjectRepository<R, B>,
    ids: &[ProjectId],
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    for &id in ids {
        let project = repo.unarchive(id)?;
        result.add_message(CmdMessage::success(format!(
            "Project restored ({}): {}",
            project.id, project.title
        )));
        result.projects.push(project);
    }
    Ok(result)
}
