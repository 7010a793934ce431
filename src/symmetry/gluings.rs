// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Canonical form of gluing permutations under the automorphisms of their
//! face pairing.
//!
//! Gluings are compared face by face in lexicographic order, visiting each
//! matched pair once from its smaller face. An automorphism relabels the
//! gluings; the assignment is canonical when no automorphism makes it
//! smaller.

use crate::engine::{CancelFlag, GluingPerms};
use crate::symmetry::Isomorphism;

impl GluingPerms {
    /// Whether these gluings are canonical under `autos`.
    ///
    /// Every face must be decided. A cancelled check answers `false`.
    pub fn is_canonical(&self, autos: &[Isomorphism], cancel: &CancelFlag) -> bool {
        let pairing = self.pairing();
        'autos: for iso in autos {
            if cancel.is_cancelled() {
                return false;
            }
            for face in pairing.faces() {
                let dest = pairing.dest(face);
                if pairing.is_unmatched(face) || dest < face {
                    continue;
                }
                let (Some(ours), Some(image)) =
                    (self.gluing_perm(face), self.gluing_perm(iso.apply_to_face(face)))
                else {
                    continue;
                };
                let theirs = iso.pull_back_gluing(face, dest, image);
                if ours < theirs {
                    continue 'autos;
                }
                if theirs < ours {
                    return false;
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{FaceSpec, INV_S3};
    use crate::pairing::FacePairing;

    fn assign(perms: &mut GluingPerms, face: FaceSpec, idx: usize) {
        let dest = perms.pairing().dest(face);
        *perms.perm_index_mut(face) = idx as i8;
        *perms.perm_index_mut(dest) = INV_S3[idx] as i8;
    }

    #[test]
    fn test_identity_only_accepts_everything() {
        let pairing = FacePairing::from_text_rep("0 1 0 0 0 3 0 2").unwrap();
        let mut perms = GluingPerms::new(pairing);
        assign(&mut perms, FaceSpec::new(0, 0), 4);
        assign(&mut perms, FaceSpec::new(0, 2), 5);
        let cancel = CancelFlag::new();
        assert!(perms.is_canonical(&[Isomorphism::identity(1)], &cancel));
    }

    #[test]
    fn test_exactly_one_of_an_orbit_is_canonical() {
        let pairing = FacePairing::from_text_rep("0 1 0 0 0 3 0 2").unwrap();
        let autos = pairing.find_automorphisms().unwrap();
        let cancel = CancelFlag::new();
        // Each orbit of the automorphism group on assignments must contain
        // exactly one canonical assignment.
        let mut canonical = 0;
        let mut total = 0;
        for a in 0..6 {
            for b in 0..6 {
                let mut perms = GluingPerms::new(pairing.clone());
                assign(&mut perms, FaceSpec::new(0, 0), a);
                assign(&mut perms, FaceSpec::new(0, 2), b);
                total += 1;
                if perms.is_canonical(&autos, &cancel) {
                    canonical += 1;
                }
            }
        }
        assert_eq!(total, 36);
        assert!(canonical > 0 && canonical < total);
    }

    #[test]
    fn test_cancelled_check_rejects() {
        let pairing = FacePairing::from_text_rep("0 1 0 0 0 3 0 2").unwrap();
        let autos = pairing.find_automorphisms().unwrap();
        let mut perms = GluingPerms::new(pairing);
        assign(&mut perms, FaceSpec::new(0, 0), 0);
        assign(&mut perms, FaceSpec::new(0, 2), 0);
        let cancel = CancelFlag::new();
        cancel.cancel();
        assert!(!perms.is_canonical(&autos, &cancel));
    }
}
