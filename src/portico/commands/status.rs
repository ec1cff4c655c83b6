use crate::commands::{CmdMessage, CmdResult, StatusReport};
use crate::error::Result;
use crate::repository::ProjectRepository;
use crate::store::backend::MirrorBackend;
use crate::store::remote::RemoteStore;

/// Connectivity, featured floor and mirror health in one report. Remote
/// counts are left empty when the store cannot be reached.
pub fn run<R: RemoteStore, B: MirrorBackend>(repo: &ProjectRepository<R, B>) -> Result<CmdResult> {
    let mut result = CmdResult::default();

    let counts = repo
        .stored_count()
        .and_then(|stored| Ok((stored, repo.featured_count()?)));
    let (stored_projects, featured) = match counts {
        Ok((stored, featured)) => (Some(stored), Some(featured)),
        Err(e) if e.is_connectivity() => {
            result.add_message(CmdMessage::warning(format!(
                "Remote store unreachable: {}",
                e
            )));
            (None, None)
        }
        Err(e) => return Err(e),
    };

    let minimum = repo.options().featured_minimum;
    if let Some(count) = featured {
        if count < minimum {
            result.add_message(CmdMessage::warning(format!(
                "Only {} featured project(s); at least {} expected",
                count, minimum
            )));
        }
    }

    let mirror = repo.mirror();
    let report = StatusReport {
        online: repo.remote().is_online(),
        stored_projects,
        featured,
        featured_minimum: minimum,
        mirror_seeded: mirror.is_seeded()?,
        mirrored_projects: mirror.projects()?.len(),
        last_change: mirror.change_signal()?,
        display_mode: mirror.display_mode()?,
    };
    Ok(result.with_status(report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{repository, RemoteFixture};
    use crate::commands::MessageLevel;

    #[test]
    fn healthy_store_reports_counts() {
        let repo = repository(RemoteFixture::new().with_featured(6).with_archived(2));
        repo.list_all().unwrap();

        let result = run(&repo).unwrap();
        let status = result.status.unwrap();
        assert!(status.online);
        assert_eq!(status.stored_projects, Some(8));
        assert_eq!(status.featured, Some(6));
        assert!(status.mirror_seeded);
        assert_eq!(status.mirrored_projects, 6);
        assert!(result.messages.is_empty());
    }

    #[test]
    fn shortfall_is_a_warning() {
        let repo = repository(RemoteFixture::new().with_featured(4));
        let result = run(&repo).unwrap();
        assert!(result.has_level(MessageLevel::Warning));
        assert_eq!(result.status.unwrap().featured, Some(4));
    }

    #[test]
    fn offline_store_still_reports_mirror() {
        let repo = repository(RemoteFixture::new().with_projects(3));
        repo.list_all().unwrap();
        repo.remote().network().set_online(false);

        let result = run(&repo).unwrap();
        let status = result.status.unwrap();
        assert!(!status.online);
        assert_eq!(status.stored_projects, None);
        assert_eq!(status.mirrored_projects, 3);
        assert!(status.last_change.is_none());
    }
}
