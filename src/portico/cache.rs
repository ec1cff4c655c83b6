//! # Query Cache
//!
//! Short-lived memoization in front of the remote store. Entries are keyed by
//! a canonical string (operation name plus serialized parameters, see
//! [`CacheKey`]) and expire after a fixed TTL. Expired entries are evicted
//! lazily when they are looked up; nothing runs in the background.
//!
//! Every successful repository write calls
//! [`QueryCache::invalidate_project_related`], which drops all keys in the
//! project namespaces. The cache is never persisted: a new process starts
//! cold.

use crate::model::ProjectId;
use crate::query::RowFilters;
use std::collections::HashMap;
use std::time::{Duration, Instant};

pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Key prefixes whose entries derive from project-list or project-identity
/// queries.
pub const PROJECT_NAMESPACES: [&str; 5] = ["projects:", "project:", "featured:", "related:", "row:"];

pub struct CacheKey;

impl CacheKey {
    pub fn all_projects() -> String {
        "projects:all".to_string()
    }

    pub fn archived_projects() -> String {
        "projects:archived".to_string()
    }

    pub fn project(id: ProjectId) -> String {
        format!("project:id={}", id)
    }

    pub fn featured(randomize: bool) -> String {
        format!("featured:random={}", randomize)
    }

    pub fn related(id: ProjectId) -> String {
        format!("related:id={}", id)
    }

    pub fn row(page: usize, filters: &RowFilters) -> String {
        format!("row:page={}:{}", page, filters.canonical())
    }
}

struct Entry<V> {
    value: V,
    stored_at: Instant,
}

pub struct QueryCache<V> {
    ttl: Duration,
    entries: HashMap<String, Entry<V>>,
}

impl<V: Clone> Default for QueryCache<V> {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl<V: Clone> QueryCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns a copy of the cached value, or `None` on a miss or expiry.
    pub fn get(&mut self, key: &str) -> Option<V> {
        let expired = match self.entries.get(key) {
            None => return None,
            Some(entry) => entry.stored_at.elapsed() >= self.ttl,
        };

        if expired {
            self.entries.remove(key);
            return None;
        }
        self.entries.get(key).map(|e| e.value.clone())
    }

    pub fn set(&mut self, key: impl Into<String>, value: V) {
        self.entries.insert(
            key.into(),
            Entry {
                value,
                stored_at: Instant::now(),
            },
        );
    }

    pub fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }

    /// Drops every entry in the project namespaces. Returns how many went.
    pub fn invalidate_project_related(&mut self) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|key, _| !PROJECT_NAMESPACES.iter().any(|ns| key.starts_with(ns)));
        before - self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of stored entries, including expired ones not yet evicted.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MainCategory;

    #[test]
    fn hit_within_ttl() {
        let mut cache = QueryCache::new(Duration::from_secs(60));
        cache.set(CacheKey::project(7), "seven".to_string());
        assert_eq!(cache.get(&CacheKey::project(7)), Some("seven".to_string()));
        assert_eq!(cache.get(&CacheKey::project(8)), None);
    }

    #[test]
    fn expired_entries_are_evicted_on_access() {
        let mut cache = QueryCache::new(Duration::ZERO);
        cache.set(CacheKey::all_projects(), 1);
        assert_eq!(cache.len(), 1);

        assert_eq!(cache.get(&CacheKey::all_projects()), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn invalidation_only_touches_project_namespaces() {
        let mut cache = QueryCache::new(Duration::from_secs(60));
        cache.set(CacheKey::all_projects(), 1);
        cache.set(CacheKey::archived_projects(), 2);
        cache.set(CacheKey::featured(false), 3);
        cache.set(CacheKey::related(4), 4);
        cache.set(
            CacheKey::row(2, &RowFilters::main_category(MainCategory::InteriorDesign)),
            5,
        );
        cache.set(CacheKey::project(4), 6);
        cache.set("settings:theme", 7);

        assert_eq!(cache.invalidate_project_related(), 6);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("settings:theme"), Some(7));
    }

    #[test]
    fn row_keys_distinguish_pages_and_filters() {
        let none = RowFilters::none();
        let interior = RowFilters::main_category(MainCategory::InteriorDesign);
        assert_ne!(CacheKey::row(1, &none), CacheKey::row(2, &none));
        assert_ne!(CacheKey::row(1, &none), CacheKey::row(1, &interior));
        assert_ne!(CacheKey::featured(true), CacheKey::featured(false));
    }
}
