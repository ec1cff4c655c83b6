//! Featured-set selection and the toggle paths that guard the floor.

use super::{ChangeKind, ProjectRepository};
use crate::error::{PorticoError, Result};
use crate::model::{Project, ProjectId, RowPatch};
use crate::store::backend::MirrorBackend;
use crate::store::remote::RemoteStore;
use rand::seq::IndexedRandom;
use rand::Rng;
use std::fmt;
use tracing::{info, warn};

/// Up to `slots` projects drawn uniformly without replacement.
pub fn pick_random<G: Rng + ?Sized>(pool: &[Project], slots: usize, rng: &mut G) -> Vec<Project> {
    pool.choose_multiple(rng, slots).cloned().collect()
}

/// Flagged projects by ascending id, padded with unflagged ones by ascending
/// id when fewer than `slots` are flagged.
pub fn pick_curated(pool: &[Project], slots: usize) -> Vec<Project> {
    let mut sorted: Vec<&Project> = pool.iter().collect();
    sorted.sort_by_key(|p| p.id);

    let (flagged, rest): (Vec<&Project>, Vec<&Project>) =
        sorted.into_iter().partition(|p| p.featured);
    flagged
        .into_iter()
        .chain(rest)
        .take(slots)
        .cloned()
        .collect()
}

/// Advisory raised when a destructive operation leaves fewer featured
/// projects than the configured floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeaturedShortfall {
    pub remaining: usize,
    pub minimum: usize,
}

impl fmt::Display for FeaturedShortfall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "only {} featured project(s) remain; at least {} should be featured",
            self.remaining, self.minimum
        )
    }
}

/// Outcome of archive and delete: the affected row as it was written or
/// removed, plus a shortfall advisory when the floor was crossed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destructive {
    pub project: Project,
    pub shortfall: Option<FeaturedShortfall>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    pub outgoing: Project,
    pub incoming: Project,
    /// False when there was nothing left to do.
    pub changed: bool,
}

impl<R: RemoteStore, B: MirrorBackend> ProjectRepository<R, B> {
    /// Flags or unflags a project while keeping at least `featured_minimum`
    /// non-archived projects featured.
    ///
    /// Featuring an archived project is an `Invariant` error. Unfeaturing at
    /// or below the floor is an `Invariant` error too; swap with
    /// [`replace_featured`](Self::replace_featured) instead. Setting the
    /// value a project already has is a no-op.
    pub fn set_featured(&self, id: ProjectId, featured: bool) -> Result<Project> {
        let row = self.fetch_row(id)?;
        if row.featured == featured {
            return Ok(row);
        }

        if featured && row.archived {
            return Err(PorticoError::Invariant(format!(
                "Project {} is archived and cannot be featured",
                id
            )));
        }
        if !featured && !row.archived {
            self.ensure_above_floor(id)?;
        }

        let updated = self.remote.update(id, &RowPatch::featured(featured))?;
        info!(id, featured, "featured flag changed");
        self.commit(ChangeKind::Mutated { id }, |m| m.upsert(&updated));
        Ok(updated)
    }

    /// Moves the featured flag from `outgoing` to `incoming` without changing
    /// the featured count.
    ///
    /// Incoming is flagged first, then outgoing cleared, so an interrupted
    /// swap leaves one extra featured project rather than one too few. That
    /// case is reported as `PartialReplace`; calling again with the same ids
    /// finishes the job, and a call after a completed swap does nothing.
    ///
    /// When both projects are already featured the call is treated as that
    /// resumption: only `outgoing` is unflagged, so the count drops by one.
    /// It still refuses to go below the floor.
    pub fn replace_featured(&self, outgoing: ProjectId, incoming: ProjectId) -> Result<Replacement> {
        let out_row = self.fetch_row(outgoing)?;
        if outgoing == incoming {
            return Ok(Replacement {
                incoming: out_row.clone(),
                outgoing: out_row,
                changed: false,
            });
        }
        let in_row = self.fetch_row(incoming)?;

        if in_row.archived {
            return Err(PorticoError::Invariant(format!(
                "Project {} is archived and cannot be featured",
                incoming
            )));
        }

        match (out_row.featured, in_row.featured) {
            (false, true) => {
                return Ok(Replacement {
                    outgoing: out_row,
                    incoming: in_row,
                    changed: false,
                })
            }
            (false, false) => {
                return Err(PorticoError::Invariant(format!(
                    "Project {} is not featured",
                    outgoing
                )))
            }
            (true, true) => {
                // Resuming an interrupted swap: only the unflag is left.
                self.ensure_above_floor(outgoing)?;
            }
            (true, false) => {}
        }

        let incoming_row = if in_row.featured {
            in_row
        } else {
            let updated = self.remote.update(incoming, &RowPatch::featured(true))?;
            self.commit(ChangeKind::Mutated { id: incoming }, |m| m.upsert(&updated));
            updated
        };

        let outgoing_row = match self.remote.update(outgoing, &RowPatch::featured(false)) {
            Ok(updated) => updated,
            Err(e) => {
                warn!(outgoing, incoming, error = %e, "featured swap interrupted");
                return Err(PorticoError::PartialReplace {
                    outgoing,
                    incoming,
                    source: Box::new(e),
                });
            }
        };
        self.commit(ChangeKind::Mutated { id: outgoing }, |m| m.upsert(&outgoing_row));
        info!(outgoing, incoming, "featured project replaced");

        Ok(Replacement {
            outgoing: outgoing_row,
            incoming: incoming_row,
            changed: true,
        })
    }

    fn ensure_above_floor(&self, id: ProjectId) -> Result<()> {
        let count = self.featured_count()?;
        let minimum = self.options.featured_minimum;
        if count <= minimum {
            return Err(PorticoError::Invariant(format!(
                "Cannot unfeature project {}: {} featured, at least {} required. Replace it instead",
                id, count, minimum
            )));
        }
        Ok(())
    }

    /// Shortfall advisory after a featured project left the live set.
    pub(super) fn shortfall_after(&self, removed: &Project) -> Option<FeaturedShortfall> {
        if !removed.is_live_featured() {
            return None;
        }
        let minimum = self.options.featured_minimum;
        match self.featured_count() {
            Ok(remaining) if remaining < minimum => {
                warn!(id = removed.id, remaining, minimum, "featured set below minimum");
                Some(FeaturedShortfall { remaining, minimum })
            }
            Ok(_) => None,
            Err(e) => {
                warn!(error = %e, "cannot recount featured projects");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{ids, live_featured, repository};
    use super::*;
    use crate::model::MainCategory;
    use crate::store::memory::fixtures::{project, RemoteFixture};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn flagged(id: ProjectId, featured: bool) -> Project {
        let mut p = project(id, MainCategory::InteriorDesign, &["Exhibition"]);
        p.featured = featured;
        p
    }

    #[test]
    fn curated_takes_first_flagged_by_id() {
        let pool: Vec<Project> = (1..=8).rev().map(|id| flagged(id, true)).collect();
        assert_eq!(ids(&pick_curated(&pool, 6)), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn curated_pads_and_stops_at_pool_size() {
        let pool = vec![flagged(4, false), flagged(2, true), flagged(1, false)];
        assert_eq!(ids(&pick_curated(&pool, 6)), vec![2, 1, 4]);
    }

    #[test]
    fn random_draws_without_replacement() {
        let pool: Vec<Project> = (1..=10).map(|id| flagged(id, false)).collect();
        let mut rng = StdRng::seed_from_u64(7);
        let mut picked = ids(&pick_random(&pool, 6, &mut rng));
        picked.sort();
        picked.dedup();
        assert_eq!(picked.len(), 6);

        let small = &pool[..3];
        assert_eq!(pick_random(small, 6, &mut rng).len(), 3);
    }

    #[test]
    fn unfeature_at_floor_is_rejected() {
        let repo = repository(RemoteFixture::new().with_featured(6).with_projects(1));
        let before = repo.remote().snapshot();

        assert!(matches!(
            repo.set_featured(2, false),
            Err(PorticoError::Invariant(_))
        ));
        assert_eq!(repo.remote().snapshot(), before);
    }

    #[test]
    fn unfeature_above_floor_and_feature_without_ceiling() {
        let repo = repository(RemoteFixture::new().with_featured(7).with_projects(2));
        repo.set_featured(1, false).unwrap();
        assert_eq!(live_featured(&repo), 6);

        repo.set_featured(8, true).unwrap();
        repo.set_featured(9, true).unwrap();
        assert_eq!(live_featured(&repo), 8);
        // Already featured.
        repo.set_featured(9, true).unwrap();
        assert_eq!(live_featured(&repo), 8);
    }

    #[test]
    fn archived_projects_cannot_be_featured() {
        let repo = repository(RemoteFixture::new().with_featured(6).with_archived(1));
        assert!(matches!(
            repo.set_featured(7, true),
            Err(PorticoError::Invariant(_))
        ));
        assert!(matches!(
            repo.replace_featured(1, 7),
            Err(PorticoError::Invariant(_))
        ));
    }

    #[test]
    fn replace_preserves_count() {
        let repo = repository(RemoteFixture::new().with_featured(6).with_projects(1));
        let swap = repo.replace_featured(3, 7).unwrap();
        assert!(swap.changed);
        assert!(!swap.outgoing.featured);
        assert!(swap.incoming.featured);
        assert_eq!(live_featured(&repo), 6);
        assert!(repo.get_featured_set(false).unwrap().iter().any(|p| p.id == 7));
    }

    #[test]
    fn replace_edge_cases() {
        let repo = repository(RemoteFixture::new().with_featured(6).with_projects(2));
        assert!(!repo.replace_featured(2, 2).unwrap().changed);
        assert!(matches!(
            repo.replace_featured(1, 99),
            Err(PorticoError::NotFound(99))
        ));
        assert!(matches!(
            repo.replace_featured(7, 8),
            Err(PorticoError::Invariant(_))
        ));
    }

    #[test]
    fn interrupted_replace_converges_on_retry() {
        let repo = repository(RemoteFixture::new().with_featured(6).with_projects(1));
        repo.remote().fail_writes_after(1);

        match repo.replace_featured(1, 7) {
            Err(PorticoError::PartialReplace { outgoing, incoming, .. }) => {
                assert_eq!((outgoing, incoming), (1, 7));
            }
            other => panic!("expected partial replace, got {:?}", other),
        }
        // Over-full, never under the floor.
        assert_eq!(live_featured(&repo), 7);

        repo.remote().clear_write_failures();
        assert!(repo.replace_featured(1, 7).unwrap().changed);
        assert_eq!(live_featured(&repo), 6);

        assert!(!repo.replace_featured(1, 7).unwrap().changed);
        assert_eq!(live_featured(&repo), 6);
    }

    #[test]
    fn replace_with_both_featured_only_unflags_outgoing() {
        let repo = repository(RemoteFixture::new().with_featured(7));
        let swap = repo.replace_featured(2, 5).unwrap();
        assert!(swap.changed);
        assert!(!swap.outgoing.featured);
        assert!(swap.incoming.featured);
        assert_eq!(live_featured(&repo), 6);

        assert!(matches!(
            repo.replace_featured(3, 5),
            Err(PorticoError::Invariant(_))
        ));
        assert_eq!(live_featured(&repo), 6);
    }
}
