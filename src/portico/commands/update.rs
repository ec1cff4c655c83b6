use crate::commands::{pairing_warnings, CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::{ProjectId, ProjectPatch};
use crate::repository::ProjectRepository;
use crate::store::backend::MirrorBackend;
use crate::store::remote::RemoteStore;

pub fn run<R: RemoteStore, B: MirrorBackend>(
    repo: &ProjectRepository<R, B>,
    id: ProjectId,
    patch: ProjectPatch,
) -> Result<CmdResult> {
    let touches_categories = patch.main_category.is_some() || patch.sub_category.is_some();
    let project = repo.update(id, patch)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Project updated ({}): {}",
        project.id, project.title
    )));
    if touches_categories {
        for warning in pairing_warnings(&project) {
            result.add_message(warning);
        }
    }
    Ok(result.with_projects(vec![project]))
}
