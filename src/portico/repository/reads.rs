use super::featured::{pick_curated, pick_random};
use super::{ChangeKind, Fetched, ProjectRepository, ProjectRow};
use crate::cache::CacheKey;
use crate::error::{PorticoError, Result};
use crate::model::{Project, ProjectId};
use crate::query::{ProjectQuery, RowFilters, Selection};
use crate::store::backend::MirrorBackend;
use crate::store::remote::RemoteStore;
use std::iter;
use tracing::{debug, info, warn};

impl<R: RemoteStore, B: MirrorBackend> ProjectRepository<R, B> {
    /// Non-archived projects, ascending id.
    pub fn list_all(&self) -> Result<Vec<Project>> {
        self.list_partition(false)
    }

    /// Archived projects, ascending id.
    pub fn list_archived(&self) -> Result<Vec<Project>> {
        self.list_partition(true)
    }

    /// Non-archived projects straight from the mirror, without touching the
    /// network. Used to paint something before the first fetch resolves.
    pub fn local_projects(&self) -> Result<Vec<Project>> {
        Ok(ProjectQuery::active().apply(&self.mirror.projects()?).rows)
    }

    fn list_partition(&self, archived: bool) -> Result<Vec<Project>> {
        match self.partition(archived) {
            Err(e) if e.is_connectivity() => {
                warn!(error = %e, archived, "remote unavailable and mirror empty");
                Ok(Vec::new())
            }
            other => other.map(|fetched| fetched.value),
        }
    }

    /// One partition of the collection. A remote answer replaces the same
    /// partition of the mirror and notifies listeners.
    fn partition(&self, archived: bool) -> Result<Fetched<Vec<Project>>> {
        let (key, query) = if archived {
            (CacheKey::archived_projects(), ProjectQuery::archived_only())
        } else {
            (CacheKey::all_projects(), ProjectQuery::active())
        };

        self.cached(&key, || {
            let fetched = self.select_or_mirror(&query)?;
            if fetched.from_remote {
                match self.mirror.replace_partition(archived, &fetched.value.rows) {
                    Ok(()) => self.notify(ChangeKind::Synced),
                    Err(e) => warn!(error = %e, "cannot update mirror"),
                }
            }
            Ok(fetched.map(|selection| selection.rows))
        })
    }

    /// `None` when no non-archived project has `id`.
    pub fn get_by_id(&self, id: ProjectId) -> Result<Option<Project>> {
        let query = ProjectQuery::active().with_id(id);
        let fetched = self.cached(&CacheKey::project(id), || {
            Ok(self
                .select_or_mirror(&query)?
                .map(|selection| selection.rows.into_iter().next()))
        })?;
        Ok(fetched.value)
    }

    /// Homepage selection of up to `featured_slots` projects.
    ///
    /// Random mode draws without replacement from the non-archived pool.
    /// Curated mode takes flagged projects by ascending id and pads with
    /// unflagged ones when there are too few; padding never writes flags.
    pub fn get_featured_set(&self, randomize: bool) -> Result<Vec<Project>> {
        let slots = self.options.featured_slots;
        let fetched = self.cached(&CacheKey::featured(randomize), || {
            let pool = self.partition(false)?;
            Ok(pool.map(|pool| {
                if randomize {
                    pick_random(&pool, slots, &mut rand::rng())
                } else {
                    pick_curated(&pool, slots)
                }
            }))
        })?;
        Ok(fetched.value)
    }

    /// 1-based page of non-archived projects matching `filters`.
    pub fn get_paginated_row(&self, page: usize, filters: &RowFilters) -> Result<ProjectRow> {
        if page == 0 {
            return Err(PorticoError::Validation("Page numbers start at 1".into()));
        }
        let size = self.options.page_size;
        let (Some(offset), Some(end)) = ((page - 1).checked_mul(size), page.checked_mul(size))
        else {
            return Err(PorticoError::Validation(format!(
                "Page {} is out of range",
                page
            )));
        };
        let query = filters.to_query().range(offset, size);

        let fetched = self.cached(&CacheKey::row(page, filters), || {
            Ok(self.select_or_mirror(&query)?.map(|selection| ProjectRow {
                has_more: end < selection.total,
                total_count: selection.total,
                data: selection.rows,
            }))
        })?;
        Ok(fetched.value)
    }

    /// Warms the cache for a page the caller is about to show. Failures are
    /// logged and dropped.
    pub fn prefetch_row(&self, page: usize, filters: &RowFilters) {
        match self.get_paginated_row(page, filters) {
            Ok(row) => debug!(page, rows = row.data.len(), "prefetched row"),
            Err(e) => debug!(page, error = %e, "prefetch failed"),
        }
    }

    /// Up to `related_limit` non-archived projects other than `id`, ranked
    /// by shared subcategory, then main category, then location.
    pub fn get_related(&self, id: ProjectId, project: &Project) -> Result<Vec<Project>> {
        let limit = self.options.related_limit;
        let fetched = self.cached(&CacheKey::related(id), || {
            match related_tiers(id, project, limit, |q| self.remote.select(q)) {
                Ok(rows) => Ok(Fetched::remote(rows)),
                Err(e) if e.is_connectivity() => {
                    let pool = self.mirror_pool(e)?;
                    let rows = related_tiers(id, project, limit, |q| Ok(q.apply(&pool)))?;
                    Ok(Fetched::mirror(rows))
                }
                Err(e) => Err(e),
            }
        })?;
        Ok(fetched.value)
    }

    /// Live `featured && !archived` count from the remote store. Never
    /// cached and never answered from the mirror.
    pub fn featured_count(&self) -> Result<usize> {
        let query = ProjectQuery::active().featured(true).limit(0);
        Ok(self.remote.select(&query)?.total)
    }

    /// Rows in the remote table, archived included.
    pub fn stored_count(&self) -> Result<usize> {
        Ok(self.remote.select(&ProjectQuery::all().limit(0))?.total)
    }

    /// Polling hook: drops cached project reads, re-probes the remote store
    /// when it is marked offline, and reloads the active list.
    pub fn refresh(&self) -> Result<Vec<Project>> {
        self.cache.borrow_mut().invalidate_project_related();
        if !self.remote.is_online() {
            match self.remote.probe() {
                Ok(rows) => info!(rows, "remote store reachable again"),
                Err(e) => debug!(error = %e, "remote store still unreachable"),
            }
        }
        self.list_all()
    }

    /// Checks whether another writer sharing the mirror changed it since the
    /// last look. If so, drops cached project reads and notifies listeners
    /// with [`ChangeKind::External`].
    pub fn poll_external_changes(&self) -> Result<bool> {
        let current = self.mirror.change_signal()?;
        let external = {
            let mut last = self.last_signal.borrow_mut();
            if current == *last {
                return Ok(false);
            }
            let external = match &current {
                Some(signal) => signal.writer != self.mirror.writer_id(),
                None => true,
            };
            *last = current;
            external
        };

        if external {
            info!("mirror changed by another writer");
            self.cache.borrow_mut().invalidate_project_related();
            self.notify(ChangeKind::External);
        }
        Ok(external)
    }
}

/// Fills up to `limit` slots tier by tier. Each tier excludes `id` and
/// everything already picked, so results never repeat.
fn related_tiers<F>(
    id: ProjectId,
    project: &Project,
    limit: usize,
    mut select: F,
) -> Result<Vec<Project>>
where
    F: FnMut(&ProjectQuery) -> Result<Selection>,
{
    let tiers = [
        (!project.sub_category.is_empty())
            .then(|| ProjectQuery::active().any_sub_category(project.sub_category.as_slice())),
        Some(ProjectQuery::active().main_category(project.main_category)),
        (!project.location.is_empty())
            .then(|| ProjectQuery::active().location(project.location.clone())),
    ];

    let mut picked: Vec<Project> = Vec::new();
    for tier in tiers.into_iter().flatten() {
        let remaining = limit.saturating_sub(picked.len());
        if remaining == 0 {
            break;
        }
        let seen: Vec<ProjectId> = iter::once(id).chain(picked.iter().map(|p| p.id)).collect();
        let selection = select(&tier.excluding(seen).limit(remaining))?;
        picked.extend(selection.rows);
    }
    Ok(picked)
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{ids, repository};
    use super::super::ChangeKind;
    use crate::error::PorticoError;
    use crate::model::{MainCategory, ProjectId};
    use crate::query::RowFilters;
    use crate::store::memory::fixtures::{project, RemoteFixture};
    use crate::store::remote::RemoteStore;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn list_all_skips_archived_and_syncs_mirror() {
        let repo = repository(RemoteFixture::new().with_projects(3).with_archived(2));
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        let _sub = repo.on_change(move |e| sink.borrow_mut().push(e.kind));

        assert_eq!(ids(&repo.list_all().unwrap()), vec![1, 2, 3]);
        assert_eq!(ids(&repo.list_archived().unwrap()), vec![4, 5]);
        assert_eq!(repo.mirror().projects().unwrap().len(), 5);
        assert_eq!(*events.borrow(), vec![ChangeKind::Synced, ChangeKind::Synced]);
    }

    #[test]
    fn repeated_reads_hit_the_cache() {
        let repo = repository(RemoteFixture::new().with_projects(3));
        repo.list_all().unwrap();
        repo.list_all().unwrap();
        repo.get_by_id(2).unwrap();
        repo.get_by_id(2).unwrap();
        assert_eq!(repo.remote().select_count(), 2);
    }

    #[test]
    fn offline_reads_fall_back_to_mirror() {
        let repo = repository(RemoteFixture::new().with_projects(4));
        repo.list_all().unwrap();
        repo.remote().network().set_online(false);

        let offline = repo.get_paginated_row(1, &RowFilters::none()).unwrap();
        assert_eq!(offline.total_count, 4);
        assert_eq!(ids(&offline.data), vec![1, 2, 3]);
        assert_eq!(repo.get_by_id(4).unwrap().map(|p| p.id), Some(4));
        assert_eq!(repo.cached_entries(), 1);
    }

    #[test]
    fn unseeded_mirror_lists_empty_but_lookups_fail() {
        let repo = repository(RemoteFixture::new().with_projects(2));
        repo.remote().network().set_online(false);

        assert!(repo.list_all().unwrap().is_empty());
        assert!(repo.list_archived().unwrap().is_empty());
        assert!(matches!(repo.get_by_id(1), Err(PorticoError::NetworkOffline)));
        assert!(matches!(
            repo.get_featured_set(false),
            Err(PorticoError::NetworkOffline)
        ));
    }

    #[test]
    fn get_by_id_hides_archived() {
        let repo = repository(RemoteFixture::new().with_projects(1).with_archived(1));
        assert!(repo.get_by_id(1).unwrap().is_some());
        assert!(repo.get_by_id(2).unwrap().is_none());
        assert!(repo.get_by_id(99).unwrap().is_none());
    }

    #[test]
    fn curated_set_pads_without_writing_flags() {
        let repo = repository(RemoteFixture::new().with_projects(4).with_featured(2).with_archived(3));
        let set = repo.get_featured_set(false).unwrap();
        assert_eq!(ids(&set), vec![5, 6, 1, 2, 3, 4]);
        assert_eq!(
            repo.remote().snapshot().iter().filter(|p| p.featured).count(),
            2
        );
    }

    #[test]
    fn random_set_is_a_subset_of_the_pool() {
        let repo = repository(RemoteFixture::new().with_projects(9).with_archived(2));
        let set = repo.get_featured_set(true).unwrap();
        assert_eq!(set.len(), 6);
        let mut picked = ids(&set);
        picked.sort();
        picked.dedup();
        assert_eq!(picked.len(), 6);
        assert!(picked.iter().all(|id| *id <= 9));
    }

    #[test]
    fn landscape_rows_paginate() {
        let mut fixture = RemoteFixture::new().with_projects(2);
        for _ in 0..5 {
            fixture = fixture.with_project(project(0, MainCategory::LandscapeArchitecture, &["Gardens"]));
        }
        let repo = repository(fixture);
        let filters = RowFilters::main_category(MainCategory::LandscapeArchitecture);

        let first = repo.get_paginated_row(1, &filters).unwrap();
        assert_eq!(first.data.len(), 3);
        assert_eq!(first.total_count, 5);
        assert!(first.has_more);

        let second = repo.get_paginated_row(2, &filters).unwrap();
        assert_eq!(ids(&second.data), vec![6, 7]);
        assert!(!second.has_more);

        assert!(matches!(
            repo.get_paginated_row(0, &filters),
            Err(PorticoError::Validation(_))
        ));
    }

    #[test]
    fn pages_past_the_end() {
        let repo = repository(RemoteFixture::new().with_projects(5));

        let empty = repo.get_paginated_row(1000, &RowFilters::none()).unwrap();
        assert!(empty.data.is_empty());
        assert_eq!(empty.total_count, 5);
        assert!(!empty.has_more);

        assert!(matches!(
            repo.get_paginated_row(usize::MAX, &RowFilters::none()),
            Err(PorticoError::Validation(_))
        ));
    }

    #[test]
    fn prefetch_warms_the_cache_and_swallows_errors() {
        let repo = repository(RemoteFixture::new().with_projects(5));
        repo.prefetch_row(2, &RowFilters::none());
        let before = repo.remote().select_count();
        let row = repo.get_paginated_row(2, &RowFilters::none()).unwrap();
        assert_eq!(ids(&row.data), vec![4, 5]);
        assert_eq!(repo.remote().select_count(), before);

        repo.remote().network().set_online(false);
        repo.prefetch_row(3, &RowFilters::none());
    }

    #[test]
    fn related_fills_tiers_in_order() {
        let mut subject = project(0, MainCategory::LandscapeArchitecture, &["Gardens"]);
        subject.location = "Porto".into();
        let mut other_place = project(0, MainCategory::InteriorDesign, &["Exhibition"]);
        other_place.location = "Porto".into();
        let mut archived_match = project(0, MainCategory::LandscapeArchitecture, &["Gardens"]);
        archived_match.archived = true;

        let fixture = RemoteFixture::new()
            .with_project(subject) // 1
            .with_project(project(0, MainCategory::InteriorDesign, &["Exhibition"])) // 2
            .with_project(project(0, MainCategory::LandscapeArchitecture, &["Urban Design"])) // 3: main
            .with_project(other_place) // 4: location
            .with_project(archived_match) // 5: archived
            .with_project(project(0, MainCategory::ArchitecturalDesign, &["Gardens"])); // 6: sub
        let repo = repository(fixture);

        let subject = repo.get_by_id(1).unwrap().unwrap();
        let related = repo.get_related(1, &subject).unwrap();
        assert_eq!(ids(&related), vec![6, 3, 4]);
    }

    #[test]
    fn related_never_repeats_or_includes_self() {
        let fixture = RemoteFixture::new().with_projects(2);
        let repo = repository(fixture);
        let subject = repo.get_by_id(1).unwrap().unwrap();
        let related: Vec<ProjectId> = ids(&repo.get_related(1, &subject).unwrap());
        assert_eq!(related, vec![2]);
    }

    #[test]
    fn external_writer_invalidates_cache() {
        let fixture = RemoteFixture::new().with_projects(2);
        let repo = repository(fixture);
        repo.list_all().unwrap();
        assert!(!repo.poll_external_changes().unwrap());

        let other = crate::store::mirror::LocalMirror::new(repo.mirror().backend().clone());
        other.mark_changed().unwrap();

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let _sub = repo.on_change(move |e| sink.borrow_mut().push(e.kind));

        assert!(repo.poll_external_changes().unwrap());
        assert_eq!(repo.cached_entries(), 0);
        assert_eq!(*seen.borrow(), vec![ChangeKind::External]);
        assert!(!repo.poll_external_changes().unwrap());
    }

    #[test]
    fn refresh_reprobes_after_outage() {
        let repo = repository(RemoteFixture::new().with_projects(2));
        repo.list_all().unwrap();
        repo.remote().network().set_online(false);
        assert_eq!(ids(&repo.refresh().unwrap()), vec![1, 2]);
        assert!(repo.remote().is_online());
    }
}
