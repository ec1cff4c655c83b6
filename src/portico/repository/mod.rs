//! # Project Repository
//!
//! The single abstraction every surface reads and mutates projects through.
//!
//! ```text
//! caller ─▶ ProjectRepository ─▶ QueryCache (hit?) ─▶ RemoteStore
//!                    │                                    │
//!                    └──────── LocalMirror ◀──────────────┘
//!                       (offline fallback, change signal)
//! ```
//!
//! ## Reads
//!
//! Cache first, then the remote store. A successful full-list read replaces
//! the matching partition of the local mirror. When the remote store is
//! unreachable (`NetworkOffline` or `Transport`) reads are answered from the
//! mirror with the same query evaluator, so online and offline results agree
//! in shape. An unseeded mirror surfaces the connectivity error, except for
//! the list reads which degrade to an empty list.
//!
//! ## Writes
//!
//! Remote first. Only after the remote store accepted the write does the
//! repository touch local state, in this order: mirror, change signal, cache
//! invalidation, listener notification. A failed remote write changes
//! nothing locally.
//!
//! ## Featured floor
//!
//! At least `featured_minimum` non-archived projects stay featured through
//! the toggle paths. There is no ceiling. Swapping at the floor goes through
//! [`ProjectRepository::replace_featured`]. Archive and delete may drop below
//! the floor and report a [`FeaturedShortfall`] instead of failing.
//!
//! All methods take `&self`; internal state uses `RefCell`/`Cell` since the
//! repository is single-threaded. Reads return owned copies.

mod featured;
pub mod listeners;
mod reads;
mod site;
mod writes;

pub use featured::{pick_curated, pick_random, Destructive, FeaturedShortfall, Replacement};
pub use listeners::{ChangeEvent, ChangeKind, Subscription};

use crate::cache::{QueryCache, DEFAULT_TTL};
use crate::error::{PorticoError, Result};
use crate::model::{Project, ProjectId};
use crate::query::{ProjectQuery, Selection};
use crate::store::backend::MirrorBackend;
use crate::store::mirror::{ChangeSignal, LocalMirror};
use crate::store::remote::RemoteStore;
use listeners::Listeners;
use std::cell::RefCell;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_FEATURED_MINIMUM: usize = 6;
pub const DEFAULT_FEATURED_SLOTS: usize = 6;
pub const DEFAULT_PAGE_SIZE: usize = 3;
pub const DEFAULT_RELATED_LIMIT: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryOptions {
    /// Floor for `featured && !archived` enforced on toggles.
    pub featured_minimum: usize,
    /// Size of the homepage selection.
    pub featured_slots: usize,
    /// Projects per gallery row.
    pub page_size: usize,
    pub related_limit: usize,
    pub cache_ttl: Duration,
}

impl Default for RepositoryOptions {
    fn default() -> Self {
        Self {
            featured_minimum: DEFAULT_FEATURED_MINIMUM,
            featured_slots: DEFAULT_FEATURED_SLOTS,
            page_size: DEFAULT_PAGE_SIZE,
            related_limit: DEFAULT_RELATED_LIMIT,
            cache_ttl: DEFAULT_TTL,
        }
    }
}

/// One page of the gallery grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRow {
    pub data: Vec<Project>,
    pub total_count: usize,
    pub has_more: bool,
}

#[derive(Debug, Clone)]
enum CachedRead {
    List(Vec<Project>),
    One(Option<Project>),
    Row(ProjectRow),
}

/// Values the repository memoizes, one [`CachedRead`] variant each.
trait Cacheable: Clone + Sized {
    fn wrap(self) -> CachedRead;
    fn unwrap(cached: CachedRead) -> Option<Self>;
}

impl Cacheable for Vec<Project> {
    fn wrap(self) -> CachedRead {
        CachedRead::List(self)
    }

    fn unwrap(cached: CachedRead) -> Option<Self> {
        match cached {
            CachedRead::List(v) => Some(v),
            _ => None,
        }
    }
}

impl Cacheable for Option<Project> {
    fn wrap(self) -> CachedRead {
        CachedRead::One(self)
    }

    fn unwrap(cached: CachedRead) -> Option<Self> {
        match cached {
            CachedRead::One(v) => Some(v),
            _ => None,
        }
    }
}

impl Cacheable for ProjectRow {
    fn wrap(self) -> CachedRead {
        CachedRead::Row(self)
    }

    fn unwrap(cached: CachedRead) -> Option<Self> {
        match cached {
            CachedRead::Row(v) => Some(v),
            _ => None,
        }
    }
}

/// A read result and whether it came from the remote store (or a cache
/// entry that did). Mirror answers are never cached.
struct Fetched<T> {
    value: T,
    from_remote: bool,
}

impl<T> Fetched<T> {
    fn remote(value: T) -> Self {
        Self {
            value,
            from_remote: true,
        }
    }

    fn mirror(value: T) -> Self {
        Self {
            value,
            from_remote: false,
        }
    }

    fn map<U>(self, f: impl FnOnce(T) -> U) -> Fetched<U> {
        Fetched {
            value: f(self.value),
            from_remote: self.from_remote,
        }
    }
}

pub struct ProjectRepository<R: RemoteStore, B: MirrorBackend> {
    remote: R,
    mirror: LocalMirror<B>,
    cache: RefCell<QueryCache<CachedRead>>,
    listeners: Listeners,
    options: RepositoryOptions,
    last_signal: RefCell<Option<ChangeSignal>>,
}

impl<R: RemoteStore, B: MirrorBackend> ProjectRepository<R, B> {
    pub fn new(remote: R, mirror: LocalMirror<B>, options: RepositoryOptions) -> Self {
        let last_signal = match mirror.change_signal() {
            Ok(signal) => signal,
            Err(e) => {
                warn!(error = %e, "cannot read mirror change signal");
                None
            }
        };
        Self {
            remote,
            cache: RefCell::new(QueryCache::new(options.cache_ttl)),
            mirror,
            listeners: Listeners::new(),
            options,
            last_signal: RefCell::new(last_signal),
        }
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    pub fn mirror(&self) -> &LocalMirror<B> {
        &self.mirror
    }

    pub fn options(&self) -> &RepositoryOptions {
        &self.options
    }

    /// Number of live cache entries (expired ones included until touched).
    pub fn cached_entries(&self) -> usize {
        self.cache.borrow().len()
    }

    /// Registers a callback fired after every mirror write.
    pub fn on_change<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&ChangeEvent) + 'static,
    {
        self.listeners.subscribe(callback)
    }

    // --- Shared plumbing for reads ---

    fn cached<T, F>(&self, key: &str, fetch: F) -> Result<Fetched<T>>
    where
        T: Cacheable,
        F: FnOnce() -> Result<Fetched<T>>,
    {
        let hit = self.cache.borrow_mut().get(key).and_then(T::unwrap);
        if let Some(value) = hit {
            debug!(key, "cache hit");
            return Ok(Fetched::remote(value));
        }
        debug!(key, "cache miss");
        let fetched = fetch()?;
        if fetched.from_remote {
            self.cache
                .borrow_mut()
                .set(key, fetched.value.clone().wrap());
        }
        Ok(fetched)
    }

    /// Runs `query` remotely. On a connectivity failure the same query is
    /// evaluated over the mirror; an unseeded mirror returns the original
    /// error.
    fn select_or_mirror(&self, query: &ProjectQuery) -> Result<Fetched<Selection>> {
        match self.remote.select(query) {
            Ok(selection) => Ok(Fetched::remote(selection)),
            Err(e) if e.is_connectivity() => {
                let pool = self.mirror_pool(e)?;
                Ok(Fetched::mirror(query.apply(&pool)))
            }
            Err(e) => Err(e),
        }
    }

    /// Mirror contents for an offline read, or `cause` if never seeded.
    fn mirror_pool(&self, cause: PorticoError) -> Result<Vec<Project>> {
        match self.mirror.load_projects()? {
            Some(pool) => {
                warn!(error = %cause, "remote unavailable, reading local mirror");
                Ok(pool)
            }
            None => Err(cause),
        }
    }

    /// Fetches a row regardless of its archived flag; `NotFound` if absent.
    fn fetch_row(&self, id: ProjectId) -> Result<Project> {
        self.remote
            .select(&ProjectQuery::all().with_id(id))?
            .rows
            .into_iter()
            .next()
            .ok_or(PorticoError::NotFound(id))
    }

    // --- Shared plumbing for writes ---

    /// Local bookkeeping after a remote write succeeded. A failed mirror
    /// write is logged, not returned: the remote store already changed.
    fn commit<F>(&self, kind: ChangeKind, write_mirror: F)
    where
        F: FnOnce(&LocalMirror<B>) -> Result<()>,
    {
        if let Err(e) = write_mirror(&self.mirror) {
            warn!(error = %e, "mirror write failed after remote write");
        }
        match self.mirror.mark_changed() {
            Ok(signal) => *self.last_signal.borrow_mut() = Some(signal),
            Err(e) => warn!(error = %e, "cannot write change signal"),
        }
        let dropped = self.cache.borrow_mut().invalidate_project_related();
        debug!(dropped, "invalidated project cache");
        self.listeners.notify(&ChangeEvent::now(kind));
    }

    fn notify(&self, kind: ChangeKind) {
        self.listeners.notify(&ChangeEvent::now(kind));
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::store::mem_backend::MemBackend;
    use crate::store::memory::fixtures::RemoteFixture;
    use crate::store::memory::InMemoryRemote;

    pub type TestRepository = ProjectRepository<InMemoryRemote, MemBackend>;

    pub fn repository(fixture: RemoteFixture) -> TestRepository {
        ProjectRepository::new(
            fixture.remote,
            LocalMirror::new(MemBackend::new()),
            RepositoryOptions::default(),
        )
    }

    pub fn ids(projects: &[Project]) -> Vec<ProjectId> {
        projects.iter().map(|p| p.id).collect()
    }

    pub fn live_featured(repo: &TestRepository) -> usize {
        repo.remote()
            .snapshot()
            .iter()
            .filter(|p| p.is_live_featured())
            .count()
    }
}
