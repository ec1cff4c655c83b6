use crate::commands::{CmdMessage, CmdResult, SiteSettings};
use crate::error::Result;
use crate::model::{DisplayMode, SocialLinks};
use crate::repository::ProjectRepository;
use crate::store::backend::MirrorBackend;
use crate::store::remote::RemoteStore;

/// Shows the social links, or replaces them when `links` is given.
pub fn social<R: RemoteStore, B: MirrorBackend>(
    repo: &ProjectRepository<R, B>,
    links: Option<SocialLinks>,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    if let Some(links) = links {
        repo.set_social_links(links)?;
        result.add_message(CmdMessage::success("Social links saved"));
    }
    Ok(result.with_settings(settings(repo)?))
}

/// Shows the display mode, or stores `mode` when given.
pub fn mode<R: RemoteStore, B: MirrorBackend>(
    repo: &ProjectRepository<R, B>,
    mode: Option<DisplayMode>,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    if let Some(mode) = mode {
        repo.set_display_mode(mode)?;
        result.add_message(CmdMessage::success(format!("Display mode set to {}", mode)));
    }
    Ok(result.with_settings(settings(repo)?))
}

fn settings<R: RemoteStore, B: MirrorBackend>(
    repo: &ProjectRepository<R, B>,
) -> Result<SiteSettings> {
    Ok(SiteSettings {
        social_links: repo.social_links()?,
        display_mode: repo.display_mode()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{repository, RemoteFixture};

    #[test]
    fn social_links_replace_whole_record() {
        let repo = repository(RemoteFixture::new());
        social(
            &repo,
            Some(SocialLinks {
                instagram: Some("@studio".into()),
                twitter: Some("@studio".into()),
                linkedin: None,
            }),
        )
        .unwrap();
        let result = social(
            &repo,
            Some(SocialLinks {
                linkedin: Some("company/studio".into()),
                ..Default::default()
            }),
        )
        .unwrap();

        let links = result.settings.unwrap().social_links;
        assert_eq!(links.instagram, None);
        assert_eq!(links.linkedin.as_deref(), Some("company/studio"));
    }

    #[test]
    fn mode_defaults_to_featured_and_persists() {
        let repo = repository(RemoteFixture::new());
        let shown = mode(&repo, None).unwrap();
        assert_eq!(shown.settings.unwrap().display_mode, DisplayMode::Featured);
        assert!(shown.messages.is_empty());

        mode(&repo, Some(DisplayMode::Random)).unwrap();
        assert_eq!(
            mode(&repo, None).unwrap().settings.unwrap().display_mode,
            DisplayMode::Random
        );
    }
}
