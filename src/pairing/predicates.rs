// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Subgraph tests on the face pairing graph.
//!
//! Each test looks for a small configuration of tetrahedra that is known
//! never to occur in a minimal, prime, P2-irreducible closed triangulation
//! with three or more tetrahedra. A census that purges those
//! triangulations can skip any pairing for which one of these holds.
//!
//! A *chain* is a run of tetrahedra joined to each other along two faces.
//! A *one-ended chain* starts at a tetrahedron with two of its faces glued
//! together (the end edge) and ends where the pair of faces being followed
//! stops leading to a single new tetrahedron.

use crate::geometry::{FacePair, FaceSpec, TET_VERTICES};
use crate::pairing::FacePairing;

impl FacePairing {
    /// Whether some pair of tetrahedra is joined along three faces.
    pub fn has_triple_edge(&self) -> bool {
        (0..self.size()).any(|tet| {
            let mut equal = 0;
            for i in 0..TET_VERTICES {
                let di = self.dest_of(tet, i);
                if self.is_unmatched_at(tet, i) || di.simp <= tet {
                    continue;
                }
                equal += (i + 1..TET_VERTICES)
                    .filter(|&j| self.dest_of(tet, j).simp == di.simp)
                    .count();
            }
            // Three equal pairs among the faces to one later tetrahedron
            // can only come from three faces.
            equal >= 3
        })
    }

    /// Follow a chain from `tet` through the two faces `faces`.
    ///
    /// Stops at the first tetrahedron whose two working faces do not both
    /// lead to one other tetrahedron, and returns that tetrahedron with the
    /// faces that were about to be followed.
    pub fn follow_chain(&self, mut tet: usize, mut faces: FacePair) -> (usize, FacePair) {
        loop {
            if self.is_unmatched_at(tet, faces.lower()) {
                return (tet, faces);
            }
            let d1 = self.dest_of(tet, faces.lower());
            let d2 = self.dest_of(tet, faces.upper());
            if d1.simp != d2.simp || d1.simp == tet {
                return (tet, faces);
            }
            tet = d1.simp;
            faces = FacePair::new(d1.facet, d2.facet).complement();
        }
    }

    /// Run `test` from the end edge of every one-ended chain.
    ///
    /// `skip_last` tetrahedra at the end are not tried as starting points;
    /// configurations with several chains are found from any of them.
    fn any_chain_end(&self, skip_last: usize, test: impl Fn(usize, usize) -> bool) -> bool {
        for base_tet in 0..self.size().saturating_sub(skip_last) {
            for base_face in 0..3 {
                if self.dest_of(base_tet, base_face).simp == base_tet {
                    if test(base_tet, base_face) {
                        return true;
                    }
                    // A second self-gluing here would make a one
                    // tetrahedron component.
                    break;
                }
            }
        }
        false
    }

    /// The tetrahedron and face pair where the chain from an end edge stops.
    fn chain_exit(&self, base_tet: usize, base_face: usize) -> (usize, FacePair) {
        let faces = FacePair::new(base_face, self.dest_of(base_tet, base_face).facet).complement();
        self.follow_chain(base_tet, faces)
    }

    fn is_chain_end(&self, tet: usize, faces: FacePair) -> bool {
        self.dest_of(tet, faces.lower()).simp == tet
    }

    /// Whether two one-ended chains are joined by a single edge at their
    /// loose ends, making a double-ended chain with one link removed.
    pub fn has_broken_double_ended_chain(&self) -> bool {
        self.any_chain_end(1, |t, f| self.broken_double_ended_chain_from(t, f))
    }

    fn broken_double_ended_chain_from(&self, base_tet: usize, base_face: usize) -> bool {
        let (bdry_tet, bdry_faces) = self.chain_exit(base_tet, base_face);
        if self.is_chain_end(bdry_tet, bdry_faces) {
            return false;
        }
        for face in [bdry_faces.lower(), bdry_faces.upper()] {
            let dest = self.dest_of(bdry_tet, face);
            if dest.is_boundary(self.size()) {
                continue;
            }
            for ignore in 0..TET_VERTICES {
                if ignore == dest.facet {
                    continue;
                }
                let faces = FacePair::new(dest.facet, ignore).complement();
                let (chain_tet, chain_faces) = self.follow_chain(dest.simp, faces);
                if self.is_chain_end(chain_tet, chain_faces) {
                    return true;
                }
            }
        }
        false
    }

    /// Whether a one-ended chain ends in two tetrahedra joined to each
    /// other along two faces.
    pub fn has_one_ended_chain_with_double_handle(&self) -> bool {
        self.any_chain_end(0, |t, f| self.double_handle_from(t, f))
    }

    fn double_handle_from(&self, base_tet: usize, base_face: usize) -> bool {
        let (bdry_tet, bdry_faces) = self.chain_exit(base_tet, base_face);
        let d1 = self.dest_of(bdry_tet, bdry_faces.lower());
        let d2 = self.dest_of(bdry_tet, bdry_faces.upper());
        let n = self.size();
        if d1.simp == d2.simp || d1.is_boundary(n) || d2.is_boundary(n) {
            return false;
        }
        let handle = (0..TET_VERTICES)
            .filter(|&i| self.dest_of(d1.simp, i).simp == d2.simp)
            .count();
        handle >= 2
    }

    /// Whether a one-ended chain leads into two tetrahedra that are joined
    /// to each other and then both into a second one-ended chain.
    pub fn has_wedged_double_ended_chain(&self) -> bool {
        self.any_chain_end(1, |t, f| self.wedged_double_ended_chain_from(t, f))
    }

    fn wedged_double_ended_chain_from(&self, base_tet: usize, base_face: usize) -> bool {
        let n = self.size();
        let (bdry_tet, bdry_faces) = self.chain_exit(base_tet, base_face);
        let d1 = self.dest_of(bdry_tet, bdry_faces.lower());
        let d2 = self.dest_of(bdry_tet, bdry_faces.upper());
        if d1.is_boundary(n) || d2.is_boundary(n) || d1.simp == d2.simp {
            return false;
        }

        let mut through: [Vec<FaceSpec>; 2] = [Vec::with_capacity(3), Vec::with_capacity(3)];
        let mut cross_edge = false;
        for i in 0..TET_VERTICES {
            if i != d1.facet {
                let next = self.dest_of(d1.simp, i);
                if next.simp == d2.simp {
                    cross_edge = true;
                } else if next.simp != d1.simp && !next.is_boundary(n) {
                    through[0].push(next);
                }
            }
            if i != d2.facet {
                let next = self.dest_of(d2.simp, i);
                if next.simp != d1.simp && next.simp != d2.simp && !next.is_boundary(n) {
                    through[1].push(next);
                }
            }
        }
        if !cross_edge {
            return false;
        }

        for a in &through[0] {
            for b in through[1].iter().filter(|b| b.simp == a.simp) {
                let faces = FacePair::new(a.facet, b.facet).complement();
                let (chain_tet, chain_faces) = self.follow_chain(a.simp, faces);
                if self.is_chain_end(chain_tet, chain_faces) {
                    return true;
                }
            }
        }
        false
    }

    /// Whether a one-ended chain is followed by a bigon (two tetrahedra
    /// joined along two faces) hanging off one side, outside a small
    /// number of exceptional configurations.
    pub fn has_one_ended_chain_with_stray_bigon(&self) -> bool {
        self.any_chain_end(0, |t, f| self.stray_bigon_from(t, f))
    }

    fn stray_bigon_from(&self, base_tet: usize, base_face: usize) -> bool {
        let n = self.size();
        let (bdry_tet, bdry_faces) = self.chain_exit(base_tet, base_face);
        if self.is_chain_end(bdry_tet, bdry_faces) {
            return false;
        }
        let sides = [
            (bdry_faces.lower(), bdry_faces.upper()),
            (bdry_faces.upper(), bdry_faces.lower()),
        ];
        for (face, other) in sides {
            let dest = self.dest_of(bdry_tet, face);
            if dest.is_boundary(n) {
                continue;
            }
            let bigon_tet = dest.simp;
            for ignore in 0..TET_VERTICES {
                if ignore == dest.facet {
                    continue;
                }
                let bigon_faces = FacePair::new(dest.facet, ignore).complement();
                let far_upper = self.dest_of(bigon_tet, bigon_faces.upper());
                let far_lower = self.dest_of(bigon_tet, bigon_faces.lower());
                let far_tet = far_upper.simp;
                if far_tet == bigon_tet || far_tet >= n || far_tet != far_lower.simp {
                    continue;
                }
                // The bigon is bigon_tet and far_tet. bdry_tet is neither.
                let extra_tet = self.dest_of(bdry_tet, other).simp;
                if extra_tet == far_tet || extra_tet >= n {
                    return true;
                }
                if extra_tet == self.dest_of(bigon_tet, ignore).simp {
                    // Exception: extra_tet meets bdry_tet, bigon_tet and far_tet.
                    if (0..TET_VERTICES).all(|i| self.dest_of(far_tet, i).simp != extra_tet) {
                        return true;
                    }
                } else {
                    // Exception: extra_tet meets far_tet twice.
                    let far_faces = FacePair::new(far_upper.facet, far_lower.facet).complement();
                    if extra_tet != self.dest_of(far_tet, far_faces.upper()).simp
                        || extra_tet != self.dest_of(far_tet, far_faces.lower()).simp
                    {
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Whether three one-ended chains all end at the same two tetrahedra.
    pub fn has_triple_one_ended_chain(&self) -> bool {
        self.any_chain_end(2, |t, f| self.triple_one_ended_chain_from(t, f))
    }

    fn triple_one_ended_chain_from(&self, base_tet: usize, base_face: usize) -> bool {
        let n = self.size();
        let (bdry_tet, bdry_faces) = self.chain_exit(base_tet, base_face);
        if self.is_chain_end(bdry_tet, bdry_faces) {
            return false;
        }
        let axis1 = self.dest_of(bdry_tet, bdry_faces.lower());
        let axis2 = self.dest_of(bdry_tet, bdry_faces.upper());
        if axis1.is_boundary(n) || axis2.is_boundary(n) || axis1.simp == axis2.simp {
            return false;
        }

        let mut n_chains = 1;
        for exit1 in (0..TET_VERTICES).filter(|&f| f != axis1.facet) {
            let arrive1 = self.dest_of(axis1.simp, exit1);
            if arrive1.simp == bdry_tet
                || arrive1.simp == axis1.simp
                || arrive1.simp == axis2.simp
                || arrive1.is_boundary(n)
            {
                continue;
            }
            for exit2 in (0..TET_VERTICES).filter(|&f| f != axis2.facet) {
                let arrive2 = self.dest_of(axis2.simp, exit2);
                if arrive2.simp != arrive1.simp {
                    continue;
                }
                let faces = FacePair::new(arrive1.facet, arrive2.facet).complement();
                let (chain_tet, chain_faces) = self.follow_chain(arrive1.simp, faces);
                if self.is_chain_end(chain_tet, chain_faces) {
                    n_chains += 1;
                    if n_chains == 3 {
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Whether any of the subgraph tests above holds.
    pub fn has_bad_subgraph(&self) -> bool {
        self.has_triple_edge()
            || self.has_broken_double_ended_chain()
            || self.has_one_ended_chain_with_double_handle()
            || self.has_wedged_double_ended_chain()
            || self.has_one_ended_chain_with_stray_bigon()
            || self.has_triple_one_ended_chain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairing(rep: &str) -> FacePairing {
        FacePairing::from_text_rep(rep).unwrap()
    }

    #[test]
    fn test_triple_edge() {
        // Tetrahedra 0 and 1 glued along all four faces.
        let p = pairing("1 0 1 1 1 2 1 3 0 0 0 1 0 2 0 3");
        assert!(p.has_triple_edge());

        // Chain of two: 0 and 1 share only two faces.
        let q = pairing("0 1 0 0 1 0 1 1 0 2 0 3 1 3 1 2");
        assert!(!q.has_triple_edge());
    }

    #[test]
    fn test_follow_chain() {
        // End edges on 0 (faces 0,1) and 1 (faces 2,3), joined by a bigon.
        let q = pairing("0 1 0 0 1 0 1 1 0 2 0 3 1 3 1 2");
        let (tet, faces) = q.follow_chain(0, FacePair::new(2, 3));
        assert_eq!(tet, 1);
        assert_eq!(faces, FacePair::new(2, 3));
    }

    #[test]
    fn test_follow_chain_stops_at_boundary() {
        let p = pairing("0 1 0 0 1 0 1 0");
        let (tet, faces) = p.follow_chain(0, FacePair::new(2, 3));
        assert_eq!((tet, faces), (0, FacePair::new(2, 3)));
    }

    #[test]
    fn test_double_handle() {
        // 0: end edge on faces 0,1; faces 2,3 go to tetrahedra 1 and 2,
        // which are joined to each other along two faces. The last face of
        // each is boundary.
        let p = pairing("0 1 0 0 1 0 2 0 0 2 2 1 2 2 3 0 0 3 1 1 1 2 3 0");
        assert!(p.has_one_ended_chain_with_double_handle());
        assert!(!p.has_triple_edge());
    }

    #[test]
    fn test_broken_double_ended_chain() {
        // Two lone end edges joined along one face, the other faces boundary.
        let p = pairing("0 1 0 0 1 2 2 0 1 1 1 0 0 2 2 0");
        assert!(p.has_broken_double_ended_chain());
        assert!(p.has_bad_subgraph());

        // Joining the loose faces as well completes the chain.
        let q = pairing("0 1 0 0 1 2 1 3 1 1 1 0 0 2 0 3");
        assert!(!q.has_broken_double_ended_chain());
        assert!(!q.has_bad_subgraph());
    }

    #[test]
    fn test_wedged_double_ended_chain() {
        // End edges 0 and 3, each joined once to 1 and once to 2; 1 and 2
        // share a face and have one boundary face each.
        let p = pairing("0 1 0 0 1 0 2 0 0 2 2 1 3 2 4 0 0 3 1 1 3 3 4 0 3 1 3 0 1 2 2 2");
        assert!(p.has_wedged_double_ended_chain());
        assert!(!p.has_broken_double_ended_chain());
        assert!(!p.has_triple_edge());

        // Without the face between 1 and 2 there is no wedge.
        let q = pairing("0 1 0 0 1 0 2 0 0 2 4 0 3 2 4 0 0 3 4 0 3 3 4 0 3 1 3 0 1 2 2 2");
        assert!(!q.has_wedged_double_ended_chain());
    }

    #[test]
    fn test_one_ended_chain_with_stray_bigon() {
        // End edge 0 runs into 1, which meets 2 along two faces.
        let p = pairing("0 1 0 0 1 0 3 0 0 2 2 0 2 1 3 0 1 1 1 2 3 0 3 0");
        assert!(p.has_one_ended_chain_with_stray_bigon());
        assert!(!p.has_one_ended_chain_with_double_handle());

        // The same bigon, but tetrahedron 3 closes it off by meeting the
        // end of the chain once and the far side of the bigon twice.
        let q = pairing("0 1 0 0 1 0 3 0 0 2 2 0 2 1 4 0 1 1 1 2 3 1 3 2 0 3 2 2 2 3 4 0");
        assert!(!q.has_one_ended_chain_with_stray_bigon());
        assert!(!q.has_bad_subgraph());
    }

    #[test]
    fn test_triple_one_ended_chain() {
        // End edges 0, 1 and 2, each joined once to 3 and once to 4.
        let p = pairing("0 1 0 0 3 0 4 0 1 1 1 0 3 1 4 1 2 1 2 0 3 2 4 2 0 2 1 2 2 2 5 0 0 3 1 3 2 3 5 0");
        assert!(p.has_triple_one_ended_chain());
        assert!(!p.has_wedged_double_ended_chain());

        // Opening the end edge of 2 leaves only two chains.
        let q = pairing("0 1 0 0 3 0 4 0 1 1 1 0 3 1 4 1 5 0 5 0 3 2 4 2 0 2 1 2 2 2 5 0 0 3 1 3 2 3 5 0");
        assert!(!q.has_triple_one_ended_chain());
        assert!(!q.has_bad_subgraph());
    }
}
