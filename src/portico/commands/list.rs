use crate::commands::{CmdMessage, CmdResult, RowInfo};
use crate::error::Result;
use crate::query::RowFilters;
use crate::repository::ProjectRepository;
use crate::store::backend::MirrorBackend;
use crate::store::remote::RemoteStore;

pub fn run<R: RemoteStore, B: MirrorBackend>(
    repo: &ProjectRepository<R, B>,
    archived: bool,
) -> Result<CmdResult> {
    let projects = if archived {
        repo.list_archived()?
    } else {
        repo.list_all()?
    };
    let mut result = CmdResult::default();
    if !repo.remote().is_online() {
        result.add_message(CmdMessage::warning(
            "Remote store unreachable; showing the local mirror.",
        ));
    }
    Ok(result.with_projects(projects))
}

/// One gallery row. When more rows follow, the next one is prefetched.
pub fn row<R: RemoteStore, B: MirrorBackend>(
    repo: &ProjectRepository<R, B>,
    page: usize,
    filters: &RowFilters,
) -> Result<CmdResult> {
    let row = repo.get_paginated_row(page, filters)?;
    if row.has_more {
        repo.prefetch_row(page + 1, filters);
    }
    Ok(CmdResult::default()
        .with_row(RowInfo {
            page,
            total_count: row.total_count,
            has_more: row.has_more,
        })
        .with_projects(row.data))
}
