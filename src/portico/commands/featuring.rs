use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::{DisplayMode, ProjectId};
use crate::repository::{ProjectRepository, Replacement};
use crate::store::backend::MirrorBackend;
use crate::store::remote::RemoteStore;

/// The homepage selection. Without an explicit mode the stored display mode
/// decides.
pub fn featured<R: RemoteStore, B: MirrorBackend>(
    repo: &ProjectRepository<R, B>,
    mode: Option<DisplayMode>,
) -> Result<CmdResult> {
    let mode = match mode {
        Some(mode) => mode,
        None => repo.display_mode()?,
    };
    let projects = repo.get_featured_set(mode.is_random())?;

    let mut result = CmdResult::default();
    if !mode.is_random() {
        let flagged = projects.iter().filter(|p| p.featured).count();
        let slots = repo.options().featured_slots;
        if flagged < slots && flagged < projects.len() {
            result.add_message(CmdMessage::info(format!(
                "{} featured project(s); padded with {} more",
                flagged,
                projects.len() - flagged
            )));
        }
    }
    Ok(result.with_projects(projects))
}

pub fn feature<R: RemoteStore, B: MirrorBackend>(
    repo: &ProjectRepository<R, B>,
    ids: &[ProjectId],
) -> Result<CmdResult> {
    set_state(repo, ids, true)
}

pub fn unfeature<R: RemoteStore, B: MirrorBackend>(
    repo: &ProjectRepository<R, B>,
    ids: &[ProjectId],
) -> Result<CmdResult> {
    set_state(repo, ids, false)
}

fn set_state<R: RemoteStore, B: MirrorBackend>(
    repo: &ProjectRepository<R, B>,
    ids: &[ProjectId],
    featured: bool,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    for &id in ids {
        let project = repo.set_featured(id, featured)?;
        let verb = if featured { "featured" } else { "unfeatured" };
        result.add_message(CmdMessage::success(format!(
            "Project {} ({}): {}",
            verb, project.id, project.title
        )));
        result.projects.push(project);
    }
    Ok(result)
}

pub fn replace<R: RemoteStore, B: MirrorBackend>(
    repo: &ProjectRepository<R, B>,
    outgoing: ProjectId,
    incoming: ProjectId,
) -> Result<CmdResult> {
    let Replacement {
        outgoing,
        incoming,
        changed,
    } = repo.replace_featured(outgoing, incoming)?;

    let mut result = CmdResult::default();
    if changed {
        result.add_message(CmdMessage::success(format!(
            "Featured: {} ({}) replaces {} ({})",
            incoming.title, incoming.id, outgoing.title, outgoing.id
        )));
    } else {
        result.add_message(CmdMessage::info("Featured set already up to date"));
    }
    Ok(result.with_projects(vec![incoming, outgoing]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{ids, live_featured, repository, RemoteFixture};
    use crate::commands::MessageLevel;
    use crate::error::PorticoError;

    #[test]
    fn curated_homepage_reports_padding() {
        let repo = repository(RemoteFixture::new().with_featured(2).with_projects(6));
        let result = featured(&repo, Some(DisplayMode::Featured)).unwrap();
        assert_eq!(ids(&result.projects), vec![1, 2, 3, 4, 5, 6]);
        assert!(result.has_level(MessageLevel::Info));
        assert_eq!(live_featured(&repo), 2);
    }

    #[test]
    fn stored_mode_is_used_by_default() {
        let repo = repository(RemoteFixture::new().with_projects(10));
        repo.set_display_mode(DisplayMode::Random).unwrap();
        let result = featured(&repo, None).unwrap();
        assert_eq!(result.projects.len(), 6);
        assert!(result.messages.is_empty());
    }

    #[test]
    fn unfeature_at_floor_fails_and_replace_works() {
        let repo = repository(RemoteFixture::new().with_featured(6).with_projects(2));
        assert!(matches!(
            unfeature(&repo, &[1]),
            Err(PorticoError::Invariant(_))
        ));

        let result = replace(&repo, 1, 7).unwrap();
        assert!(result.has_level(MessageLevel::Success));
        assert_eq!(live_featured(&repo), 6);

        let again = replace(&repo, 1, 7).unwrap();
        assert!(again.has_level(MessageLevel::Info));
    }

    #[test]
    fn feature_then_unfeature_above_floor() {
        let repo = repository(RemoteFixture::new().with_featured(6).with_projects(2));
        feature(&repo, &[7, 8]).unwrap();
        assert_eq!(live_featured(&repo), 8);
        unfeature(&repo, &[7, 8]).unwrap();
        assert_eq!(live_featured(&repo), 6);
    }
}
