use super::{ChangeKind, ProjectRepository};
use crate::error::Result;
use crate::model::{DisplayMode, Project, SocialLinks};
use crate::store::backend::MirrorBackend;
use crate::store::remote::RemoteStore;
use tracing::{info, warn};

/// Site settings live only in the local mirror. Writes stamp the change
/// signal so other instances pick them up.
impl<R: RemoteStore, B: MirrorBackend> ProjectRepository<R, B> {
    pub fn social_links(&self) -> Result<SocialLinks> {
        self.mirror.social_links()
    }

    /// Replaces the whole record; absent fields are cleared.
    pub fn set_social_links(&self, links: SocialLinks) -> Result<SocialLinks> {
        self.mirror.set_social_links(&links)?;
        self.settings_changed();
        info!("social links saved");
        Ok(links)
    }

    pub fn display_mode(&self) -> Result<DisplayMode> {
        self.mirror.display_mode()
    }

    pub fn set_display_mode(&self, mode: DisplayMode) -> Result<DisplayMode> {
        self.mirror.set_display_mode(mode)?;
        self.settings_changed();
        info!(%mode, "display mode saved");
        Ok(mode)
    }

    /// The homepage selection for the stored display mode.
    pub fn homepage(&self) -> Result<Vec<Project>> {
        let mode = self.display_mode()?;
        self.get_featured_set(mode.is_random())
    }

    fn settings_changed(&self) {
        match self.mirror.mark_changed() {
            Ok(signal) => *self.last_signal.borrow_mut() = Some(signal),
            Err(e) => warn!(error = %e, "cannot write change signal"),
        }
        self.notify(ChangeKind::Settings);
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::repository;
    use super::*;
    use crate::store::memory::fixtures::RemoteFixture;

    #[test]
    fn settings_persist_in_the_mirror() {
        let repo = repository(RemoteFixture::new());
        assert_eq!(repo.display_mode().unwrap(), DisplayMode::Featured);

        repo.set_display_mode(DisplayMode::Random).unwrap();
        repo.set_social_links(SocialLinks {
            instagram: Some("@atelier".into()),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(repo.mirror().display_mode().unwrap(), DisplayMode::Random);
        assert_eq!(
            repo.social_links().unwrap().instagram.as_deref(),
            Some("@atelier")
        );
        assert!(repo.mirror().change_signal().unwrap().is_some());
    }

    #[test]
    fn homepage_follows_display_mode() {
        let repo = repository(RemoteFixture::new().with_projects(3).with_featured(1));
        let curated = repo.homepage().unwrap();
        assert_eq!(curated[0].id, 4);

        repo.set_display_mode(DisplayMode::Random).unwrap();
        assert_eq!(repo.homepage().unwrap().len(), 4);
    }
}
