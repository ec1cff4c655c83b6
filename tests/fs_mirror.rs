//! The local mirror on disk: survives restarts, is shared between processes
//! through its change signal, and answers reads when the remote store is
//! unreachable.

use portico::model::{DisplayMode, MainCategory, ProjectDraft, SocialLinks, SubCategories};
use portico::repository::{ProjectRepository, RepositoryOptions};
use portico::store::fs_backend::FsBackend;
use portico::store::memory::InMemoryRemote;
use portico::store::mirror::LocalMirror;
use tempfile::TempDir;

fn draft(title: &str) -> ProjectDraft {
    ProjectDraft::new(
        title,
        MainCategory::LandscapeArchitecture,
        SubCategories::new(["Public Landscape"]),
    )
}

fn repository(dir: &TempDir, remote: InMemoryRemote) -> ProjectRepository<InMemoryRemote, FsBackend> {
    ProjectRepository::new(
        remote,
        LocalMirror::new(FsBackend::new(dir.path().join("mirror"))),
        RepositoryOptions::default(),
    )
}

#[test]
fn mirror_serves_reads_after_a_restart() {
    let dir = TempDir::new().unwrap();
    let remote = InMemoryRemote::new();
    let first = repository(&dir, remote);
    first.add(draft("Riverside Park")).unwrap();
    first.add(draft("Plaza Steps")).unwrap();
    first.list_all().unwrap();
    drop(first);

    let offline = InMemoryRemote::new();
    offline.network().set_online(false);
    offline.set_simulate_transport_error(true);
    let second = repository(&dir, offline);

    let titles: Vec<String> = second
        .list_all()
        .unwrap()
        .into_iter()
        .map(|p| p.title)
        .collect();
    assert_eq!(titles, vec!["Riverside Park", "Plaza Steps"]);
    assert_eq!(second.get_by_id(2).unwrap().unwrap().title, "Plaza Steps");
}

#[test]
fn unseeded_mirror_lists_nothing_offline() {
    let dir = TempDir::new().unwrap();
    let remote = InMemoryRemote::new();
    remote.network().set_online(false);
    let repo = repository(&dir, remote);

    assert!(repo.list_all().unwrap().is_empty());
    assert!(repo.get_by_id(1).is_err());
}

#[test]
fn settings_persist_on_disk() {
    let dir = TempDir::new().unwrap();
    let repo = repository(&dir, InMemoryRemote::new());
    repo.set_display_mode(DisplayMode::Random).unwrap();
    repo.set_social_links(SocialLinks {
        instagram: Some("@landscape.studio".into()),
        ..Default::default()
    })
    .unwrap();
    drop(repo);

    let reopened = repository(&dir, InMemoryRemote::new());
    assert_eq!(reopened.display_mode().unwrap(), DisplayMode::Random);
    assert_eq!(
        reopened.social_links().unwrap().instagram.as_deref(),
        Some("@landscape.studio")
    );
}

#[test]
fn writes_from_another_process_are_detected() {
    let dir = TempDir::new().unwrap();
    let ours = repository(&dir, InMemoryRemote::new());
    let theirs = repository(&dir, InMemoryRemote::new());

    assert!(!ours.poll_external_changes().unwrap());
    ours.add(draft("Courtyard")).unwrap();
    assert!(!ours.poll_external_changes().unwrap());

    theirs.add(draft("Terrace")).unwrap();
    assert!(ours.poll_external_changes().unwrap());
    assert!(!ours.poll_external_changes().unwrap());
}

#[test]
fn clearing_the_mirror_removes_everything() {
    let dir = TempDir::new().unwrap();
    let repo = repository(&dir, InMemoryRemote::new());
    repo.add(draft("Canal Walk")).unwrap();
    repo.set_display_mode(DisplayMode::Random).unwrap();

    repo.mirror().clear().unwrap();
    assert!(!repo.mirror().is_seeded().unwrap());
    assert_eq!(repo.mirror().display_mode().unwrap(), DisplayMode::Featured);
    assert!(repo.mirror().change_signal().unwrap().is_none());
}
