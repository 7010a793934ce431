// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Canonical form of face pairings.
//!
//! A pairing is canonical when no relabelling of its tetrahedra and faces
//! gives a lexicographically smaller destination list. The test builds
//! candidate relabellings one face at a time, choosing the preimage of each
//! face in turn and deriving the preimage of its partner. A branch is
//! abandoned as soon as the relabelled pairing is larger than the original
//! at some face, and the whole test fails as soon as it is smaller.
//! Branches that run to the end are the automorphisms of the pairing.

use crate::geometry::{FaceSpec, Perm4, TET_VERTICES};
use crate::pairing::FacePairing;
use crate::symmetry::Isomorphism;

/// Partial relabelling under construction.
struct Relabelling {
    /// `image[f]` is where face `f` is sent.
    image: Vec<Option<FaceSpec>>,
    /// `pre[f]` is the face sent to `f`.
    pre: Vec<Option<FaceSpec>>,
}

impl Relabelling {
    fn new(n: usize) -> Self {
        Self {
            image: vec![None; n * TET_VERTICES],
            pre: vec![None; n * TET_VERTICES],
        }
    }

    fn image(&self, face: FaceSpec) -> Option<FaceSpec> {
        self.image[face.index()]
    }

    fn pre(&self, face: FaceSpec) -> Option<FaceSpec> {
        self.pre[face.index()]
    }

    fn set(&mut self, from: FaceSpec, to: FaceSpec) {
        self.image[from.index()] = Some(to);
        self.pre[to.index()] = Some(from);
    }

    fn to_isomorphism(&self, n: usize) -> Option<Isomorphism> {
        let mut tet_image = Vec::with_capacity(n);
        let mut face_perm = Vec::with_capacity(n);
        for t in 0..n {
            let faces: Vec<FaceSpec> = (0..TET_VERTICES)
                .map(|f| self.image[TET_VERTICES * t + f])
                .collect::<Option<_>>()?;
            tet_image.push(faces[0].simp);
            face_perm.push(Perm4::from_images([
                faces[0].facet as u8,
                faces[1].facet as u8,
                faces[2].facet as u8,
                faces[3].facet as u8,
            ])?);
        }
        Some(Isomorphism::from_parts(tet_image, face_perm))
    }
}

impl FacePairing {
    /// Whether this pairing is in canonical form.
    ///
    /// Canonical pairings have every face matched no earlier than itself
    /// apart from faces glued to each other, have face 0 of every later
    /// tetrahedron glued into an earlier one, and have strictly increasing
    /// partners for face 0. Those conditions are checked first.
    pub fn is_canonical(&self) -> bool {
        let n = self.size();
        for t in 0..n {
            for f in 0..3 {
                if self.dest_of(t, f + 1) < self.dest_of(t, f)
                    && self.dest_of(t, f + 1) != FaceSpec::new(t, f)
                {
                    return false;
                }
            }
            if t > 0 && self.dest_of(t, 0).simp >= t {
                return false;
            }
            if t > 1 && self.dest_of(t, 0) <= self.dest_of(t - 1, 0) {
                return false;
            }
        }
        let mut autos = Vec::new();
        self.is_canonical_internal(&mut autos)
    }

    /// The automorphisms of a canonical pairing, or `None` if the pairing
    /// is not canonical.
    pub fn find_automorphisms(&self) -> Option<Vec<Isomorphism>> {
        let mut autos = Vec::new();
        self.is_canonical_internal(&mut autos).then_some(autos)
    }

    /// Canonicality test assuming the structural conditions of
    /// [`FacePairing::is_canonical`]. Collects automorphisms into `autos`,
    /// which is left empty when the answer is `false`.
    pub(crate) fn is_canonical_internal(&self, autos: &mut Vec<Isomorphism>) -> bool {
        autos.clear();
        let n = self.size();
        let first = FaceSpec::new(0, 0);

        if self.is_unmatched(first) {
            // Only a lone tetrahedron with no gluings gets here; every
            // relabelling of its faces preserves it.
            for p in Perm4::all() {
                let mut face_perm = vec![Perm4::IDENTITY; n];
                face_perm[0] = p;
                autos.push(Isomorphism::from_parts((0..n).collect(), face_perm));
            }
            return true;
        }

        let first_dest = self.dest(first);
        let mut r = Relabelling::new(n);

        for start in self.faces() {
            if self.is_unmatched(start) {
                continue;
            }
            let start_dest = self.dest(start);
            // Face 0 of tetrahedron 0 decides whether some tetrahedron is
            // glued to itself.
            if first_dest.simp == 0 && start_dest.simp != start.simp {
                continue;
            }
            if first_dest.simp != 0 && start_dest.simp == start.simp {
                autos.clear();
                return false;
            }

            r.set(start, first);
            r.set(start_dest, first_dest);

            let mut trying = first.next();
            if trying == first_dest {
                trying.inc();
            }
            while trying != first {
                let mut step_down = false;

                if trying.simp >= n {
                    if let Some(iso) = r.to_isomorphism(n) {
                        autos.push(iso);
                    }
                    step_down = true;
                } else {
                    match self.next_preimage(&r, trying) {
                        Err(()) => {
                            autos.clear();
                            return false;
                        }
                        Ok(None) => {
                            r.pre[trying.index()] = None;
                            step_down = true;
                        }
                        Ok(Some(p)) => {
                            r.pre[trying.index()] = Some(p);
                            r.image[p.index()] = Some(trying);
                            self.derive_partner(&mut r, p, trying);

                            // Compare forwards until a face with no preimage.
                            loop {
                                let Some(p) = r.pre(trying) else { break };
                                let original = self.dest(trying);
                                let mut relabelled = self.dest(p);
                                if !relabelled.is_boundary(n) {
                                    relabelled = r.image(relabelled).unwrap_or(relabelled);
                                }
                                if original < relabelled {
                                    step_down = true;
                                } else if relabelled < original {
                                    autos.clear();
                                    return false;
                                }
                                trying.inc();
                                if step_down || trying.simp >= n || r.pre(trying).is_none() {
                                    break;
                                }
                            }
                        }
                    }
                }

                if step_down {
                    trying.dec();
                    // Skip back over faces whose preimage was derived from
                    // an earlier choice.
                    while let Some(p) = r.pre(trying) {
                        if self.is_unmatched(p) {
                            break;
                        }
                        match r.image(self.dest(p)) {
                            Some(img) if img < trying => {
                                trying.dec();
                            }
                            _ => break,
                        }
                    }
                    if let Some(p) = r.pre(trying) {
                        r.image[p.index()] = None;
                        if !self.is_unmatched(p) {
                            let partner = self.dest(p);
                            if let Some(img) = r.image(partner) {
                                r.pre[img.index()] = None;
                            }
                            r.image[partner.index()] = None;
                        }
                    }
                }
            }
        }
        true
    }

    /// Next candidate preimage for `trying` after the current one.
    ///
    /// `Ok(None)` when the candidates are used up; `Err(())` when an
    /// unmatched face would have to take a matched preimage, which shows
    /// the pairing is not canonical.
    fn next_preimage(&self, r: &Relabelling, trying: FaceSpec) -> Result<Option<FaceSpec>, ()> {
        let mut p = match r.pre(trying) {
            Some(p) if p.facet == TET_VERTICES - 1 => return Ok(None),
            Some(p) => FaceSpec::new(p.simp, p.facet + 1),
            None => match r.pre(FaceSpec::new(trying.simp, 0)) {
                // The tetrahedron is fixed by its face 0.
                Some(base) => FaceSpec::new(base.simp, 0),
                None => return Ok(None),
            },
        };
        let trying_unmatched = self.is_unmatched(trying);
        while p.facet < TET_VERTICES {
            if r.image(p).is_none() {
                let p_unmatched = self.is_unmatched(p);
                if trying_unmatched && !p_unmatched {
                    return Err(());
                }
                if trying_unmatched || !p_unmatched {
                    return Ok(Some(p));
                }
            }
            p.facet += 1;
        }
        Ok(None)
    }

    /// Having sent `p` to `trying`, send the partner of `p` too if it has
    /// no image yet: into the tetrahedron its own tetrahedron already maps
    /// to, or else to face 0 of the first unused tetrahedron after
    /// `trying`'s.
    fn derive_partner(&self, r: &mut Relabelling, p: FaceSpec, trying: FaceSpec) {
        if self.is_unmatched(p) {
            return;
        }
        let partner = self.dest(p);
        if r.image(partner).is_some() {
            return;
        }
        let n = self.size();
        let known = (0..TET_VERTICES).find_map(|f| r.image(FaceSpec::new(partner.simp, f)));
        let target = match known {
            Some(k) => (0..TET_VERTICES)
                .find(|&f| r.pre(FaceSpec::new(k.simp, f)).is_none())
                .map(|f| FaceSpec::new(k.simp, f)),
            None => (trying.simp + 1..n)
                .find(|&t| r.pre(FaceSpec::new(t, 0)).is_none())
                .map(|t| FaceSpec::new(t, 0)),
        };
        if let Some(target) = target {
            r.set(partner, target);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairing(rep: &str) -> FacePairing {
        FacePairing::from_text_rep(rep).unwrap()
    }

    #[test]
    fn test_lone_tetrahedron_without_gluings_has_all_automorphisms() {
        let p = pairing("1 0 1 0 1 0 1 0");
        let autos = p.find_automorphisms().unwrap();
        assert_eq!(autos.len(), 24);
    }

    #[test]
    fn test_one_tetrahedron_closed_pairing() {
        let p = pairing("0 1 0 0 0 3 0 2");
        assert!(p.is_canonical());
        let autos = p.find_automorphisms().unwrap();
        // Permutations preserving {{0,1},{2,3}}.
        assert_eq!(autos.len(), 8);
        for iso in &autos {
            assert!(iso.preserves(&p));
        }
        assert!(autos.iter().any(Isomorphism::is_identity));
    }

    #[test]
    fn test_non_canonical_relabelling_rejected() {
        // Same shape as 0:1 0:0 0:3 0:2, written with {0,2} and {1,3}.
        let p = pairing("0 2 0 3 0 0 0 1");
        assert!(!p.is_canonical());
    }

    #[test]
    fn test_two_tetrahedra_chain() {
        let p = pairing("0 1 0 0 1 0 1 1 0 2 0 3 1 3 1 2");
        assert!(p.is_canonical());
        let autos = p.find_automorphisms().unwrap();
        for iso in &autos {
            assert!(iso.preserves(&p));
        }
        // Swap the tetrahedra, and swap faces within each loop and each
        // bigon consistently.
        assert!(autos.iter().any(|iso| iso.tet_image(0) == 1));
    }

    #[test]
    fn test_four_parallel_gluings() {
        // Tetrahedra 0 and 1 glued along all four faces; only the matching
        // of face i with face i is canonical.
        let p = pairing("1 0 1 1 1 2 1 3 0 0 0 1 0 2 0 3");
        assert!(p.is_canonical());
        let q = pairing("1 0 1 1 1 3 1 2 0 0 0 1 0 3 0 2");
        assert!(!q.is_canonical());
    }
}
