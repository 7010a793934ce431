// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Census driver: every face pairing, then every gluing of each.
//!
//! The face pairing enumerator hands each canonical pairing, with its
//! automorphisms, to a fresh [`GluingSearcher`]. Pairings that cannot give
//! a minimal prime triangulation are dropped first when the purge flags
//! ask for it.

use tracing::{debug, info, trace};

use crate::engine::{CancelFlag, GluingSearcher, PurgeFlags, SearchOptions, SearchOutcome};
use crate::error::{CensusError, Result};
use crate::pairing::{BoundaryOption, FacePairing, PairingEnumeration};
use crate::state::Statistics;

/// What to enumerate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CensusOptions {
    pub n_tetrahedra: usize,
    pub boundary: BoundaryOption,
    /// Exact number of boundary faces, or `None` for any.
    pub n_bdry_faces: Option<usize>,
    pub search: SearchOptions,
}

impl Default for CensusOptions {
    /// One-tetrahedron closed 3-manifolds.
    fn default() -> Self {
        Self {
            n_tetrahedra: 1,
            boundary: BoundaryOption::Forbidden,
            n_bdry_faces: None,
            search: SearchOptions::default(),
        }
    }
}

impl CensusOptions {
    pub fn new(n_tetrahedra: usize) -> Self {
        Self {
            n_tetrahedra,
            ..Self::default()
        }
    }

    pub fn with_boundary(mut self, boundary: BoundaryOption) -> Self {
        self.boundary = boundary;
        self
    }

    pub fn with_bdry_faces(mut self, n_bdry_faces: Option<usize>) -> Self {
        self.n_bdry_faces = n_bdry_faces;
        self
    }

    pub fn with_search(mut self, search: SearchOptions) -> Self {
        self.search = search;
        self
    }
}

/// Totals of a census run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CensusSummary {
    /// Canonical face pairings handed to a searcher.
    pub pairings: u64,
    /// Canonical face pairings dropped by the subgraph tests.
    pub skipped: u64,
    /// Triangulations found.
    pub triangulations: u64,
    pub outcome: SearchOutcome,
    /// Search counters summed over every pairing.
    pub statistics: Statistics,
}

/// A census of triangulations on a fixed number of tetrahedra.
#[derive(Debug, Clone)]
pub struct Census {
    options: CensusOptions,
}

impl Census {
    pub fn new(options: CensusOptions) -> Result<Self> {
        if options.n_tetrahedra == 0 {
            return Err(CensusError::InvalidOptions {
                reason: "a census needs at least one tetrahedron".into(),
            });
        }
        if options.search.target_euler > 2 {
            return Err(CensusError::InvalidOptions {
                reason: format!("target Euler characteristic {} exceeds 2", options.search.target_euler),
            });
        }
        if options.n_bdry_faces.is_some() && !options.boundary.allows_boundary() {
            return Err(CensusError::InvalidOptions {
                reason: "boundary faces requested but boundary is forbidden".into(),
            });
        }
        Ok(Self { options })
    }

    pub fn options(&self) -> &CensusOptions {
        &self.options
    }

    /// Whether `pairing` is dropped before any gluing is tried.
    pub fn skips(&self, pairing: &FacePairing) -> bool {
        let search = &self.options.search;
        pairing.is_closed()
            && pairing.size() >= 3
            && search.purge.contains(PurgeFlags::NON_MINIMAL | PurgeFlags::NON_PRIME)
            && (search.orientable_only || search.purge.contains(PurgeFlags::P2_REDUCIBLE))
            && pairing.has_bad_subgraph()
    }

    /// Search every pairing, calling `on_triangulation` with each complete
    /// searcher found.
    ///
    /// Cancellation is checked by both the enumerator and every searcher.
    pub fn run<F>(&self, cancel: &CancelFlag, mut on_triangulation: F) -> Result<CensusSummary>
    where
        F: FnMut(&GluingSearcher),
    {
        let opts = &self.options;
        info!(
            n = opts.n_tetrahedra,
            boundary = ?opts.boundary,
            orientable_only = opts.search.orientable_only,
            purge = %opts.search.purge,
            "census started"
        );

        let mut summary = CensusSummary {
            pairings: 0,
            skipped: 0,
            triangulations: 0,
            outcome: SearchOutcome::Completed,
            statistics: Statistics::new(),
        };
        let mut failure: Option<CensusError> = None;

        let enumeration = PairingEnumeration::new(opts.n_tetrahedra)
            .with_boundary(opts.boundary)
            .with_bdry_faces(opts.n_bdry_faces);
        let pairing_outcome = enumeration.run(cancel, |item| {
            let Some((pairing, autos)) = item else {
                return;
            };
            if failure.is_some() || cancel.is_cancelled() {
                return;
            }
            if self.skips(pairing) {
                trace!(%pairing, "face pairing skipped");
                summary.skipped += 1;
                return;
            }
            summary.pairings += 1;
            trace!(%pairing, autos = autos.len(), "face pairing searched");

            let mut searcher = match GluingSearcher::new(pairing.clone(), autos.to_vec(), opts.search) {
                Ok(searcher) => searcher,
                Err(err) => {
                    failure = Some(err);
                    return;
                }
            };
            let outcome = searcher.run(cancel, |found| {
                if let Some(found) = found {
                    summary.triangulations += 1;
                    on_triangulation(found);
                }
            });
            summary.statistics.absorb(searcher.statistics());
            if outcome == SearchOutcome::Cancelled {
                summary.outcome = SearchOutcome::Cancelled;
            }
        });
        if let Some(err) = failure {
            return Err(err);
        }
        if pairing_outcome == SearchOutcome::Cancelled {
            summary.outcome = SearchOutcome::Cancelled;
        }

        debug!(stats = %summary.statistics, "census counters");
        info!(
            pairings = summary.pairings,
            skipped = summary.skipped,
            triangulations = summary.triangulations,
            outcome = ?summary.outcome,
            "census finished"
        );
        Ok(summary)
    }
}
