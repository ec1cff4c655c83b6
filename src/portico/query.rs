//! # Query Model
//!
//! [`ProjectQuery`] describes one `select` against the `projects` table:
//! equality filters, an id exclusion list, a subcategory overlap filter, the
//! fixed ascending-id order and an optional offset/limit range.
//!
//! The same value is:
//! - translated to PostgREST parameters by the REST client,
//! - evaluated in process by [`ProjectQuery::apply`] for the in-memory store
//!   and for the offline fallback over the local mirror.
//!
//! Keeping one evaluator means the online and offline paths agree on filter
//! semantics. Subcategory filtering is **overlap**: a project matches when it
//! carries at least one of the requested subcategories.

use crate::model::{MainCategory, Project, ProjectId};

/// Rows returned by a select plus the exact count of the filtered set
/// (ignoring offset/limit).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub rows: Vec<Project>,
    pub total: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectQuery {
    pub id: Option<ProjectId>,
    pub archived: Option<bool>,
    pub featured: Option<bool>,
    pub main_category: Option<MainCategory>,
    pub location: Option<String>,
    pub sub_categories_any: Vec<String>,
    pub exclude_ids: Vec<ProjectId>,
    pub offset: usize,
    pub limit: Option<usize>,
}

impl ProjectQuery {
    /// Every row, archived or not.
    pub fn all() -> Self {
        Self::default()
    }

    /// Non-archived rows.
    pub fn active() -> Self {
        Self {
            archived: Some(false),
            ..Self::default()
        }
    }

    pub fn archived_only() -> Self {
        Self {
            archived: Some(true),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: ProjectId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn featured(mut self, featured: bool) -> Self {
        self.featured = Some(featured);
        self
    }

    pub fn main_category(mut self, main: MainCategory) -> Self {
        self.main_category = Some(main);
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn any_sub_category(mut self, subs: &[String]) -> Self {
        self.sub_categories_any = subs.to_vec();
        self
    }

    pub fn excluding<I: IntoIterator<Item = ProjectId>>(mut self, ids: I) -> Self {
        self.exclude_ids.extend(ids);
        self
    }

    pub fn range(mut self, offset: usize, limit: usize) -> Self {
        self.offset = offset;
        self.limit = Some(limit);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn matches(&self, project: &Project) -> bool {
        if let Some(id) = self.id {
            if project.id != id {
                return false;
            }
        }
        if let Some(archived) = self.archived {
            if project.archived != archived {
                return false;
            }
        }
        if let Some(featured) = self.featured {
            if project.featured != featured {
                return false;
            }
        }
        if let Some(main) = self.main_category {
            if project.main_category != main {
                return false;
            }
        }
        if let Some(location) = &self.location {
            if &project.location != location {
                return false;
            }
        }
        if !self.sub_categories_any.is_empty()
            && !project.sub_category.overlaps(&self.sub_categories_any)
        {
            return false;
        }
        !self.exclude_ids.contains(&project.id)
    }

    /// Evaluates the query over an in-process collection.
    pub fn apply<'a, I>(&self, pool: I) -> Selection
    where
        I: IntoIterator<Item = &'a Project>,
    {
        let mut matched: Vec<&Project> = pool.into_iter().filter(|p| self.matches(p)).collect();
        matched.sort_by_key(|p| p.id);
        let total = matched.len();

        let rows = matched
            .into_iter()
            .skip(self.offset)
            .take(self.limit.unwrap_or(usize::MAX))
            .cloned()
            .collect();

        Selection { rows, total }
    }
}

/// Gallery filters for paginated rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowFilters {
    pub main_category: Option<MainCategory>,
    pub sub_categories: Vec<String>,
}

impl RowFilters {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn main_category(main: MainCategory) -> Self {
        Self {
            main_category: Some(main),
            sub_categories: Vec::new(),
        }
    }

    pub fn with_sub_categories<I, S>(mut self, subs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sub_categories = subs.into_iter().map(Into::into).collect();
        self
    }

    pub fn to_query(&self) -> ProjectQuery {
        let mut query = ProjectQuery::active().any_sub_category(&self.sub_categories);
        query.main_category = self.main_category;
        query
    }

    /// Canonical form for cache keys: order of subcategories does not matter.
    pub fn canonical(&self) -> String {
        let mut subs = self.sub_categories.clone();
        subs.sort();
        subs.dedup();
        format!(
            "main={}:subs={}",
            self.main_category.map(|m| m.as_str()).unwrap_or("*"),
            subs.join("|")
        )
    }
}
