// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Backtracking search for gluing permutations.
//!
//! A [`GluingSearcher`] owns one face pairing and walks its matched face
//! pairs in a fixed order, choosing a gluing permutation for each. Every
//! choice is pushed into the vertex link and edge class trackers, which
//! report at once when the partial triangulation can no longer succeed.
//!
//! # Architecture
//!
//! The search is a single iterative loop over `order_elt`, the position in
//! the gluing order:
//!
//! 1. Advance the permutation of the current face to its next candidate.
//! 2. If the candidates are used up, reset the face and step back one level,
//!    splitting the trackers for the gluing made there.
//! 3. Merge edges; an edge identified with itself in reverse is rejected.
//! 4. Merge vertex links; a link that can no longer reach the target Euler
//!    characteristic is rejected.
//! 5. Otherwise step forward. A full assignment is emitted if it is
//!    canonical under the pairing's automorphisms; a partial search emits
//!    itself on reaching its depth limit. Either way it steps back again.
//!
//! Each level writes only into its own undo log slots, so stepping back is
//! exact and the trackers are back in their initial state when the search
//! ends. That is audited after every full search.
//!
//! # Example
//!
//! ```
//! use tricensus::engine::{CancelFlag, GluingSearcher, SearchOptions, SearchOutcome};
//! use tricensus::pairing::FacePairing;
//!
//! let pairing = FacePairing::from_text_rep("0 1 0 0 0 3 0 2").unwrap();
//! let mut searcher = GluingSearcher::for_pairing(pairing, SearchOptions::default()).unwrap();
//! let mut found = 0;
//! let outcome = searcher.run(&CancelFlag::new(), |s| {
//!     if s.is_some() {
//!         found += 1;
//!     }
//! });
//! assert_eq!(outcome, SearchOutcome::Completed);
//! assert!(found > 0);
//! ```

pub mod cancel;
pub mod dump;
pub mod options;
pub mod perms;

pub use cancel::CancelFlag;
pub use options::{PurgeFlags, SearchOptions};
pub use perms::GluingPerms;

use std::collections::VecDeque;

use tracing::{debug, warn};

use crate::error::{CensusError, Result};
use crate::geometry::{FaceSpec, INV_S3, TET_VERTICES};
use crate::pairing::FacePairing;
use crate::state::{Counters, EdgeClassTracker, GluingStep, LinkStatus, Statistics, VertexLinkTracker};
use crate::symmetry::Isomorphism;

/// How a search or enumeration ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Every branch was explored and the completion signal was sent.
    Completed,
    /// The cancel flag was raised; no completion signal was sent.
    Cancelled,
}

/// Search for all gluing permutations of one face pairing.
#[derive(Debug, Clone)]
pub struct GluingSearcher {
    perms: GluingPerms,
    autos: Vec<Isomorphism>,
    options: SearchOptions,
    /// Matched faces in the order they are glued, each from the side
    /// reached first.
    order: Vec<FaceSpec>,
    /// Whether the partner tetrahedron of `order[i]` is first reached there.
    fresh: Vec<bool>,
    order_elt: usize,
    /// Orientation of each tetrahedron (`1`, `-1`, or `0` if not yet known)
    /// in orientable-only searches.
    orientation: Vec<i8>,
    started: bool,
    vertices: VertexLinkTracker,
    edges: EdgeClassTracker,
    stats: Statistics,
}

impl GluingSearcher {
    /// A searcher for `pairing`, rejecting assignments that are not
    /// canonical under `autos`.
    ///
    /// The pairing must be connected and every automorphism must preserve
    /// it. Nothing is searched until [`GluingSearcher::run`] is called.
    pub fn new(pairing: FacePairing, autos: Vec<Isomorphism>, options: SearchOptions) -> Result<Self> {
        pairing.require_connected()?;
        if options.target_euler > 2 {
            return Err(CensusError::InvalidOptions {
                reason: format!("target Euler characteristic {} exceeds 2", options.target_euler),
            });
        }
        for (index, iso) in autos.iter().enumerate() {
            if iso.size() != pairing.size() || !iso.preserves(&pairing) {
                return Err(CensusError::InvalidAutomorphism { index });
            }
        }

        let n = pairing.size();
        let (order, fresh) = gluing_order(&pairing);
        debug!(
            n,
            gluings = order.len(),
            autos = autos.len(),
            orientable_only = options.orientable_only,
            target_euler = options.target_euler,
            "gluing searcher constructed"
        );
        Ok(Self {
            perms: GluingPerms::new(pairing),
            autos,
            options,
            order,
            fresh,
            order_elt: 0,
            orientation: vec![0; n],
            started: false,
            vertices: VertexLinkTracker::new(n, options.target_euler),
            edges: EdgeClassTracker::new(n),
            stats: Statistics::new(),
        })
    }

    /// A searcher for `pairing` using its automorphism group.
    ///
    /// A pairing that is not canonical gets only the identity, which keeps
    /// every assignment.
    pub fn for_pairing(pairing: FacePairing, options: SearchOptions) -> Result<Self> {
        let autos = default_automorphisms(&pairing);
        Self::new(pairing, autos, options)
    }

    /// Reassemble a searcher from loaded parts.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        perms: GluingPerms,
        options: SearchOptions,
        order: Vec<FaceSpec>,
        order_elt: usize,
        orientation: Vec<i8>,
        started: bool,
        vertices: VertexLinkTracker,
        edges: EdgeClassTracker,
    ) -> Self {
        let autos = default_automorphisms(perms.pairing());
        let fresh = freshness(perms.pairing(), &order);
        Self {
            perms,
            autos,
            options,
            order,
            fresh,
            order_elt,
            orientation,
            started,
            vertices,
            edges,
            stats: Statistics::new(),
        }
    }

    pub fn perms(&self) -> &GluingPerms {
        &self.perms
    }

    pub fn pairing(&self) -> &FacePairing {
        self.perms.pairing()
    }

    pub fn automorphisms(&self) -> &[Isomorphism] {
        &self.autos
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// The faces in the order they are glued.
    pub fn order(&self) -> &[FaceSpec] {
        &self.order
    }

    /// Number of gluings currently fixed.
    pub fn order_elt(&self) -> usize {
        self.order_elt
    }

    pub fn orientation(&self) -> &[i8] {
        &self.orientation
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Whether every gluing is fixed, as when a complete triangulation is
    /// being emitted.
    pub fn is_complete(&self) -> bool {
        self.started && self.order_elt == self.order.len()
    }

    pub fn vertices(&self) -> &VertexLinkTracker {
        &self.vertices
    }

    pub fn edges(&self) -> &EdgeClassTracker {
        &self.edges
    }

    pub fn statistics(&self) -> &Statistics {
        &self.stats
    }

    /// Run the whole search.
    ///
    /// `emit` is called with every canonical triangulation found, then once
    /// with `None`. If `cancel` is raised the search unwinds and returns
    /// [`SearchOutcome::Cancelled`] without the final `None`.
    pub fn run<F>(&mut self, cancel: &CancelFlag, mut emit: F) -> SearchOutcome
    where
        F: FnMut(Option<&GluingSearcher>),
    {
        self.search(None, cancel, &mut emit)
    }

    /// Search at most `max_depth` levels below the current position.
    ///
    /// Every state reached at that depth is emitted as a paused searcher,
    /// which can be dumped and resumed elsewhere. Complete triangulations
    /// found above the limit are emitted as in [`GluingSearcher::run`].
    pub fn partial_search<F>(&mut self, max_depth: usize, cancel: &CancelFlag, mut emit: F) -> SearchOutcome
    where
        F: FnMut(Option<&GluingSearcher>),
    {
        self.search(Some(max_depth), cancel, &mut emit)
    }

    fn search<F>(&mut self, max_depth: Option<usize>, cancel: &CancelFlag, emit: &mut F) -> SearchOutcome
    where
        F: FnMut(Option<&GluingSearcher>),
    {
        let order_size = self.order.len();

        if !self.started {
            self.started = true;
            if max_depth == Some(0) || order_size == 0 {
                emit(Some(&*self));
                emit(None);
                return SearchOutcome::Completed;
            }
            self.order_elt = 0;
            self.orientation[0] = 1;
            self.seed_orientable(0);
        } else if max_depth == Some(0) {
            emit(Some(&*self));
            emit(None);
            return SearchOutcome::Completed;
        }

        if self.order_elt == order_size {
            if self.perms.is_canonical(&self.autos, cancel) {
                self.stats.increment(Counters::Emitted);
                emit(Some(&*self));
            }
            if cancel.is_cancelled() {
                return SearchOutcome::Cancelled;
            }
            emit(None);
            return SearchOutcome::Completed;
        }

        let min_order = self.order_elt;
        let max_order = max_depth.map(|d| min_order + d);
        debug!(min_order, ?max_order, order_size, "gluing search started");

        loop {
            if cancel.is_cancelled() {
                self.unwind(min_order);
                debug!(stats = %self.stats, "gluing search cancelled");
                if min_order == 0 {
                    self.audit();
                }
                return SearchOutcome::Cancelled;
            }

            let elt = self.order_elt;
            let face = self.order[elt];
            let adj = self.pairing().dest(face);
            let stride = if self.options.orientable_only && !self.fresh[elt] {
                2
            } else {
                1
            };
            *self.perms.perm_index_mut(face) += stride;

            if self.perms.perm_index(face) >= 6 {
                *self.perms.perm_index_mut(face) = -1;
                *self.perms.perm_index_mut(adj) = -1;
                if !self.step_back(min_order) {
                    break;
                }
                continue;
            }

            self.stats.increment(Counters::Nodes);
            let idx = self.perms.perm_index(face) as usize;
            *self.perms.perm_index_mut(adj) = INV_S3[idx] as i8;
            let step = GluingStep::new(face, adj, idx, elt);

            if self.edges.merge(&step) {
                self.stats.increment(Counters::InvalidEdges);
                self.edges.split(&step);
                continue;
            }
            let status = self.vertices.merge(&step, self.perms.perm_indices());
            if status.contains(LinkStatus::BAD_EULER) {
                self.stats.increment(Counters::BadEuler);
                self.vertices.split(&step);
                self.edges.split(&step);
                continue;
            }

            if self.options.orientable_only && self.fresh[elt] {
                let parity = idx + facet_parity(face) + facet_parity(adj);
                let o = self.orientation[face.simp];
                self.orientation[adj.simp] = if parity % 2 == 0 { -o } else { o };
            }

            self.order_elt += 1;
            if self.order_elt == order_size {
                self.stats.increment(Counters::CompleteAssignments);
                if self.perms.is_canonical(&self.autos, cancel) {
                    self.stats.increment(Counters::Emitted);
                    emit(Some(&*self));
                } else {
                    self.stats.increment(Counters::CanonicalRejects);
                }
                self.order_elt -= 1;
                self.split_level(self.order_elt);
            } else {
                self.seed_orientable(self.order_elt);
                if Some(self.order_elt) == max_order {
                    self.stats.increment(Counters::PartialEmitted);
                    emit(Some(&*self));
                    let next = self.order[self.order_elt];
                    *self.perms.perm_index_mut(next) = -1;
                    self.order_elt -= 1;
                    self.split_level(self.order_elt);
                }
            }
        }

        debug!(stats = %self.stats, "gluing search finished");
        if min_order == 0 {
            self.audit();
        }
        emit(None);
        SearchOutcome::Completed
    }

    /// Move back one level, undoing the gluing made there.
    ///
    /// Returns `false` when already at the level the search started from.
    fn step_back(&mut self, min_order: usize) -> bool {
        if self.order_elt == min_order {
            return false;
        }
        self.order_elt -= 1;
        self.split_level(self.order_elt);
        true
    }

    /// Undo the tracker merges for the gluing fixed at level `elt`.
    fn split_level(&mut self, elt: usize) {
        let face = self.order[elt];
        let adj = self.pairing().dest(face);
        let idx = self.perms.perm_index(face) as usize;
        let step = GluingStep::new(face, adj, idx, elt);
        self.vertices.split(&step);
        self.edges.split(&step);
    }

    /// Back out every level above `min_order` after cancellation.
    fn unwind(&mut self, min_order: usize) {
        let order_size = self.order.len();
        for elt in (min_order..order_size.min(self.order_elt + 1)).rev() {
            if elt < self.order_elt {
                self.split_level(elt);
            }
            let face = self.order[elt];
            let adj = self.pairing().dest(face);
            *self.perms.perm_index_mut(face) = -1;
            *self.perms.perm_index_mut(adj) = -1;
        }
        self.order_elt = min_order;
    }

    /// Set the first candidate of a face whose partner is already oriented,
    /// so that stepping by two visits only orientation-preserving gluings.
    fn seed_orientable(&mut self, elt: usize) {
        if !self.options.orientable_only || self.fresh[elt] {
            return;
        }
        let face = self.order[elt];
        let adj = self.pairing().dest(face);
        let mut p: i8 = if self.orientation[face.simp] == self.orientation[adj.simp] {
            1
        } else {
            0
        };
        if facet_parity(face) + facet_parity(adj) == 1 {
            p = (p + 1) % 2;
        }
        *self.perms.perm_index_mut(face) = p - 2;
    }

    /// Differences from the initial state, as found after a full search.
    pub fn rewind_violations(&self) -> Vec<String> {
        let mut violations = self.vertices.rewind_violations();
        violations.extend(self.edges.rewind_violations());
        for face in self.pairing().faces() {
            let idx = self.perms.perm_index(face);
            if idx != -1 {
                violations.push(format!("face {} left with permutation index {}", face, idx));
            }
        }
        violations
    }

    fn audit(&self) {
        for violation in self.rewind_violations() {
            warn!(%violation, "search state not restored");
        }
    }
}

/// `1` unless the face is face 3, whose vertices 012 appear in natural order.
#[inline]
fn facet_parity(face: FaceSpec) -> usize {
    usize::from(face.facet != 3)
}

fn default_automorphisms(pairing: &FacePairing) -> Vec<Isomorphism> {
    pairing
        .find_automorphisms()
        .unwrap_or_else(|| vec![Isomorphism::identity(pairing.size())])
}

/// Breadth-first order of the matched faces from tetrahedron 0.
///
/// Each matched pair appears once, from the face met first. The flag is set
/// where the partner's tetrahedron is reached for the first time.
fn gluing_order(pairing: &FacePairing) -> (Vec<FaceSpec>, Vec<bool>) {
    let n = pairing.size();
    let mut seen = vec![false; n];
    let mut included = vec![false; n * TET_VERTICES];
    let mut order = Vec::with_capacity(2 * n);
    let mut fresh = Vec::with_capacity(2 * n);
    let mut queue = VecDeque::from([0]);
    seen[0] = true;
    while let Some(tet) = queue.pop_front() {
        for facet in 0..TET_VERTICES {
            let face = FaceSpec::new(tet, facet);
            if pairing.is_unmatched(face) || included[face.index()] {
                continue;
            }
            let dest = pairing.dest(face);
            included[face.index()] = true;
            included[dest.index()] = true;
            order.push(face);
            fresh.push(!seen[dest.simp]);
            if !seen[dest.simp] {
                seen[dest.simp] = true;
                queue.push_back(dest.simp);
            }
        }
    }
    (order, fresh)
}

/// Fresh flags for an arbitrary gluing order starting inside a connected
/// pairing.
fn freshness(pairing: &FacePairing, order: &[FaceSpec]) -> Vec<bool> {
    let mut seen = vec![false; pairing.size()];
    if let Some(first) = order.first() {
        seen[first.simp] = true;
    }
    order
        .iter()
        .map(|&face| {
            let dest = pairing.dest(face);
            seen[face.simp] = true;
            let fresh = !seen[dest.simp];
            seen[dest.simp] = true;
            fresh
        })
        .collect()
}
