use crate::commands::CmdResult;
use crate::error::{PorticoError, Result};
use crate::model::ProjectId;
use crate::repository::ProjectRepository;
use crate::store::backend::MirrorBackend;
use crate::store::remote::RemoteStore;

/// A single public project with its related projects.
pub fn run<R: RemoteStore, B: MirrorBackend>(
    repo: &ProjectRepository<R, B>,
    id: ProjectId,
) -> Result<CmdResult> {
    let project = repo.get_by_id(id)?.ok_or(PorticoError::NotFound(id))?;
    let related = repo.get_related(id, &project)?;
    Ok(CmdResult::default()
        .with_projects(vec![project])
        .with_related(related))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{ids, repository, RemoteFixture};

    #[test]
    fn shows_project_and_related() {
        let repo = repository(RemoteFixture::new().with_projects(5));
        let result = run(&repo, 2).unwrap();
        assert_eq!(ids(&result.projects), vec![2]);
        assert_eq!(ids(&result.related), vec![1, 3, 4]);
    }

    #[test]
    fn archived_projects_are_not_found() {
        let repo = repository(RemoteFixture::new().with_projects(1).with_archived(1));
        assert!(matches!(run(&repo, 2), Err(PorticoError::NotFound(2))));
    }
}
