// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Enumeration of face pairings up to isomorphism.
//!
//! Faces are matched in lexicographic order. Each face is joined to a later
//! free face or to the boundary, trying destinations in increasing order and
//! stepping back when none is left. Several rules cut the tree before a
//! pairing is complete:
//!
//! - a set of tetrahedra is never closed off while other tetrahedra remain
//!   unused, so every pairing found is connected;
//! - a new tetrahedron is only entered at its face 0, and only after the
//!   previous tetrahedron has been entered;
//! - destinations within a tetrahedron are non-decreasing;
//! - the number of boundary faces respects the requested quota.
//!
//! Each complete pairing is then tested for canonicality, which also yields
//! its automorphisms, and only canonical pairings are reported.

use tracing::{debug, trace};

use crate::engine::{CancelFlag, SearchOutcome};
use crate::geometry::{FaceSpec, TET_VERTICES};
use crate::pairing::FacePairing;
use crate::symmetry::Isomorphism;

/// Whether enumerated pairings may or must leave faces unmatched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum BoundaryOption {
    /// Every face matched.
    #[default]
    Forbidden,
    /// At least one face unmatched.
    Required,
    /// Either.
    Either,
}

impl BoundaryOption {
    pub fn allows_boundary(self) -> bool {
        matches!(self, BoundaryOption::Required | BoundaryOption::Either)
    }

    pub fn allows_closed(self) -> bool {
        matches!(self, BoundaryOption::Forbidden | BoundaryOption::Either)
    }
}

/// Parameters of a face pairing enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairingEnumeration {
    /// Number of tetrahedra.
    pub n_tetrahedra: usize,
    pub boundary: BoundaryOption,
    /// Exact number of unmatched faces, when boundary is allowed.
    pub n_bdry_faces: Option<usize>,
}

impl PairingEnumeration {
    /// Closed pairings on `n_tetrahedra` tetrahedra.
    pub fn new(n_tetrahedra: usize) -> Self {
        Self {
            n_tetrahedra,
            boundary: BoundaryOption::Forbidden,
            n_bdry_faces: None,
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

    /// Whether the parameters obviously admit no pairing at all.
    fn is_hopeless(&self) -> bool {
        let n = self.n_tetrahedra;
        if n == 0 {
            return true;
        }
        match self.n_bdry_faces {
            Some(k) if self.boundary.allows_boundary() => {
                k % 2 == 1 || k > 2 * n + 2 || (k == 0 && !self.boundary.allows_closed())
            }
            _ => false,
        }
    }

    /// Report every canonical pairing with its automorphisms, then `None`.
    ///
    /// A cancelled enumeration returns [`SearchOutcome::Cancelled`] without
    /// the final `None`.
    pub fn run<F>(&self, cancel: &CancelFlag, mut use_pairing: F) -> SearchOutcome
    where
        F: FnMut(Option<(&FacePairing, &[Isomorphism])>),
    {
        debug!(
            n = self.n_tetrahedra,
            boundary = ?self.boundary,
            n_bdry_faces = ?self.n_bdry_faces,
            "face pairing enumeration started"
        );
        if self.is_hopeless() {
            use_pairing(None);
            return SearchOutcome::Completed;
        }

        let n = self.n_tetrahedra;
        let n_faces = n * TET_VERTICES;
        let boundary_allowed = self.boundary.allows_boundary();
        let closed_allowed = self.boundary.allows_closed();

        let mut p = FacePairing::blank(n);
        let mut autos: Vec<Isomorphism> = Vec::new();
        let mut trying = FaceSpec::new(0, 0);
        let mut used = 0usize;
        let mut bdry = 0usize;
        let mut found = 0u64;

        loop {
            if cancel.is_cancelled() {
                debug!(found, "face pairing enumeration cancelled");
                return SearchOutcome::Cancelled;
            }

            // INVARIANT: trying needs a destination; dest(trying) is the last
            // one tried and is not yet matched back.
            p.dest_mut(trying).inc();

            // Never tie together the last two free faces of a set of
            // tetrahedra while unused tetrahedra remain.
            if used % 4 == 2
                && used + 2 < n_faces
                && p.no_dest(FaceSpec::new(used / 4 + 1, 0))
                && p.dest(trying).simp <= used / 4
            {
                *p.dest_mut(trying) = FaceSpec::new(used / 4 + 1, 0);
            }

            // Leave room for the boundary faces still owed.
            if boundary_allowed && p.dest(trying).simp < n {
                let owe_boundary = match self.n_bdry_faces {
                    None => !closed_allowed && bdry == 0 && used + 2 == n_faces,
                    Some(k) => used - bdry + k == n_faces,
                };
                if owe_boundary {
                    *p.dest_mut(trying) = FaceSpec::boundary(n);
                }
            }

            // Move on to a free destination, skipping tetrahedra whose
            // earlier faces are still free.
            loop {
                while p.dest(trying).simp < n && !p.no_dest(p.dest(trying)) {
                    p.dest_mut(trying).inc();
                }
                let d = p.dest(trying);
                if d.simp < n && d.facet > 0 && p.no_dest(FaceSpec::new(d.simp, d.facet - 1)) {
                    *p.dest_mut(trying) = FaceSpec::new(d.simp + 1, 0);
                    continue;
                }
                break;
            }

            // Face 0 of a tetrahedron after an unused one: go to the boundary.
            let d = p.dest(trying);
            if d.simp < n && d.facet == 0 && p.no_dest(FaceSpec::new(d.simp - 1, 0)) {
                *p.dest_mut(trying) = FaceSpec::boundary(n);
            }

            // Never send the last free face of a set of tetrahedra to the
            // boundary while unused tetrahedra remain.
            if used % 4 == 3
                && used + 1 < n_faces
                && p.no_dest(FaceSpec::new(used / 4 + 1, 0))
                && p.is_unmatched(trying)
            {
                p.dest_mut(trying).inc();
            }

            let boundary_ok = boundary_allowed && self.n_bdry_faces != Some(bdry);
            if p.dest(trying).is_past_end(n, boundary_ok) {
                // Nothing left for trying. Step back to the last face that
                // chose a forward or boundary destination.
                *p.dest_mut(trying) = trying;
                let mut exhausted = !trying.dec();
                while !exhausted && p.dest(trying) < trying {
                    exhausted = !trying.dec();
                }
                if exhausted {
                    break;
                }
                unmatch(&mut p, trying, &mut used, &mut bdry);
                continue;
            }

            // Match it and find the next free face.
            if p.is_unmatched(trying) {
                used += 1;
                bdry += 1;
            } else {
                used += 2;
                let d = p.dest(trying);
                *p.dest_mut(d) = trying;
            }
            let old_trying = trying;
            trying.inc();
            while trying.simp < n && !p.no_dest(trying) {
                trying.inc();
            }

            if trying.simp == n {
                if p.is_canonical_internal(&mut autos) {
                    found += 1;
                    trace!(pairing = %p, autos = autos.len(), "canonical face pairing");
                    use_pairing(Some((&p, &autos)));
                }
                trying = old_trying;
                unmatch(&mut p, trying, &mut used, &mut bdry);
            } else {
                // Start just before the first sensible destination: no
                // earlier than the last forward destination in this
                // tetrahedron.
                if trying.facet > 0 {
                    let mut tmp = trying;
                    while tmp.dec() && tmp.simp == trying.simp {
                        if tmp < p.dest(tmp) {
                            if p.dest(trying) < p.dest(tmp) {
                                *p.dest_mut(trying) = p.dest(tmp);
                                // Boundary is reached by the next increment.
                                if p.is_unmatched(trying) {
                                    p.dest_mut(trying).dec();
                                }
                            }
                            break;
                        }
                    }
                }
                // Only tetrahedron 0 may be glued to itself unless it is not.
                let d = p.dest(trying);
                if d.simp == trying.simp
                    && d.facet < 3
                    && trying.simp > 0
                    && p.dest_of(0, 0).simp != 0
                {
                    p.dest_mut(trying).facet = 3;
                }
            }
        }

        debug!(found, "face pairing enumeration finished");
        use_pairing(None);
        SearchOutcome::Completed
    }
}

/// Undo the destination chosen for `face`.
fn unmatch(p: &mut FacePairing, face: FaceSpec, used: &mut usize, bdry: &mut usize) {
    if p.is_unmatched(face) {
        *used -= 1;
        *bdry -= 1;
    } else {
        *used -= 2;
        let d = p.dest(face);
        *p.dest_mut(d) = d;
    }
}

/// Enumerate the canonical face pairings on `n_tetrahedra` tetrahedra.
///
/// See [`PairingEnumeration::run`].
pub fn find_all_pairings<F>(
    n_tetrahedra: usize,
    boundary: BoundaryOption,
    n_bdry_faces: Option<usize>,
    cancel: &CancelFlag,
    use_pairing: F,
) -> SearchOutcome
where
    F: FnMut(Option<(&FacePairing, &[Isomorphism])>),
{
    PairingEnumeration::new(n_tetrahedra)
        .with_boundary(boundary)
        .with_bdry_faces(n_bdry_faces)
        .run(cancel, use_pairing)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(n: usize, boundary: BoundaryOption, n_bdry: Option<usize>) -> Vec<FacePairing> {
        let mut found = Vec::new();
        let mut finished = 0;
        let outcome = find_all_pairings(n, boundary, n_bdry, &CancelFlag::new(), |item| match item {
            Some((p, _)) => found.push(p.clone()),
            None => finished += 1,
        });
        assert_eq!(outcome, SearchOutcome::Completed);
        assert_eq!(finished, 1);
        found
    }

    #[test]
    fn test_closed_counts() {
        assert_eq!(collect(1, BoundaryOption::Forbidden, None).len(), 1);
        assert_eq!(collect(2, BoundaryOption::Forbidden, None).len(), 2);
        assert_eq!(collect(3, BoundaryOption::Forbidden, None).len(), 4);
    }

    #[test]
    fn test_single_closed_pairing_on_one_tetrahedron() {
        let found = collect(1, BoundaryOption::Forbidden, None);
        assert_eq!(found[0].to_text_rep(), "0 1 0 0 0 3 0 2");
    }

    #[test]
    fn test_boundary_quota() {
        for p in collect(2, BoundaryOption::Required, Some(2)) {
            assert_eq!(p.n_boundary_faces(), 2);
        }
        for p in collect(2, BoundaryOption::Required, None) {
            assert!(!p.is_closed());
        }
        // Odd quotas and quotas above 2n+2 are refused.
        assert!(collect(2, BoundaryOption::Required, Some(3)).is_empty());
        assert!(collect(2, BoundaryOption::Required, Some(8)).is_empty());
        assert!(collect(2, BoundaryOption::Required, Some(0)).is_empty());
    }

    #[test]
    fn test_either_is_closed_plus_bounded() {
        let closed = collect(2, BoundaryOption::Forbidden, None).len();
        let bounded = collect(2, BoundaryOption::Required, None).len();
        let either = collect(2, BoundaryOption::Either, None).len();
        assert_eq!(either, closed + bounded);
    }

    #[test]
    fn test_lone_tetrahedron_with_boundary() {
        let found = collect(1, BoundaryOption::Required, Some(4));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].n_boundary_faces(), 4);
    }

    #[test]
    fn test_zero_tetrahedra_reports_only_completion() {
        assert!(collect(0, BoundaryOption::Forbidden, None).is_empty());
    }

    #[test]
    fn test_cancelled_enumeration_reports_nothing() {
        let cancel = CancelFlag::new();
        cancel.cancel();
        let mut calls = 0;
        let outcome = find_all_pairings(2, BoundaryOption::Forbidden, None, &cancel, |_| calls += 1);
        assert_eq!(outcome, SearchOutcome::Cancelled);
        assert_eq!(calls, 0);
    }
}
