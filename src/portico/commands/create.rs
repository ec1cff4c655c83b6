use crate::commands::{pairing_warnings, CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::ProjectDraft;
use crate::repository::ProjectRepository;
use crate::store::backend::MirrorBackend;
use crate::store::remote::RemoteStore;

pub fn run<R: RemoteStore, B: MirrorBackend>(
    repo: &ProjectRepository<R, B>,
    draft: ProjectDraft,
) -> Result<CmdResult> {
    let project = repo.add(draft)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Project added ({}): {}",
        project.id, project.title
    )));
    for warning in pairing_warnings(&project) {
        result.add_message(warning);
    }
    Ok(result.with_projects(vec![project]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{repository, RemoteFixture};
    use crate::commands::MessageLevel;
    use crate::error::PorticoError;
    use crate::model::{MainCategory, SubCategories};

    #[test]
    fn creates_with_next_id() {
        let repo = repository(RemoteFixture::new().with_projects(3));
        let draft = ProjectDraft::new(
            "Reading Room",
            MainCategory::InteriorDesign,
            SubCategories::new(["Public Spaces"]),
        );
        let result = run(&repo, draft).unwrap();
        assert_eq!(result.projects[0].id, 4);
        assert!(result.has_level(MessageLevel::Success));
        assert!(!result.has_level(MessageLevel::Warning));
    }

    #[test]
    fn off_vocabulary_subcategory_warns_but_saves() {
        let repo = repository(RemoteFixture::new());
        let draft = ProjectDraft::new(
            "Dune Walk",
            MainCategory::LandscapeArchitecture,
            SubCategories::new(["Gardens", "Exhibition"]),
        );
        let result = run(&repo, draft).unwrap();
        let warnings: Vec<_> = result
            .messages
            .iter()
            .filter(|m| m.level == MessageLevel::Warning)
            .collect();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].content.contains("Exhibition"));
        assert_eq!(repo.remote().snapshot().len(), 1);
    }

    #[test]
    fn missing_subcategories_are_rejected() {
        let repo = repository(RemoteFixture::new());
        let draft = ProjectDraft::new("Void", MainCategory::InteriorDesign, SubCategories::default());
        assert!(matches!(run(&repo, draft), Err(PorticoError::Validation(_))));
    }
}
