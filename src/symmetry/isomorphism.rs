// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Relabellings of tetrahedra and their faces.

use std::fmt;

use crate::error::{CensusError, Result};
use crate::geometry::{FaceSpec, Perm4, TET_VERTICES};
use crate::pairing::FacePairing;

/// Sends tetrahedron `t` to `tet_image[t]`, with face `f` of `t` going to
/// face `face_perm[t][f]` of the image.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Isomorphism {
    tet_image: Vec<usize>,
    face_perm: Vec<Perm4>,
}

impl Isomorphism {
    /// Build an isomorphism, checking that the tetrahedron images are a
    /// permutation of `0..n`.
    pub fn new(tet_image: Vec<usize>, face_perm: Vec<Perm4>) -> Result<Self> {
        let n = tet_image.len();
        let mut seen = vec![false; n];
        let bijective = face_perm.len() == n
            && tet_image.iter().all(|&t| t < n && !std::mem::replace(&mut seen[t], true));
        if !bijective {
            return Err(CensusError::InvalidAutomorphism { index: 0 });
        }
        Ok(Self {
            tet_image,
            face_perm,
        })
    }

    /// Unchecked constructor for images built by the canonicality search.
    pub(crate) fn from_parts(tet_image: Vec<usize>, face_perm: Vec<Perm4>) -> Self {
        debug_assert_eq!(tet_image.len(), face_perm.len());
        Self {
            tet_image,
            face_perm,
        }
    }

    pub fn identity(n: usize) -> Self {
        Self {
            tet_image: (0..n).collect(),
            face_perm: vec![Perm4::IDENTITY; n],
        }
    }

    /// Number of tetrahedra.
    pub fn size(&self) -> usize {
        self.tet_image.len()
    }

    #[inline]
    pub fn tet_image(&self, tet: usize) -> usize {
        self.tet_image[tet]
    }

    #[inline]
    pub fn face_perm(&self, tet: usize) -> Perm4 {
        self.face_perm[tet]
    }

    pub fn is_identity(&self) -> bool {
        self.tet_image.iter().enumerate().all(|(i, &t)| i == t)
            && self.face_perm.iter().all(|&p| p == Perm4::IDENTITY)
    }

    /// Image of a face. The boundary sentinel is fixed.
    #[inline]
    pub fn apply_to_face(&self, face: FaceSpec) -> FaceSpec {
        if face.simp >= self.size() {
            return face;
        }
        FaceSpec::new(self.tet_image[face.simp], self.face_perm[face.simp].apply(face.facet))
    }

    /// The pairing in which `iso(f)` is matched with `iso(dest(f))`.
    pub fn apply_to_pairing(&self, pairing: &FacePairing) -> FacePairing {
        let n = pairing.size();
        let mut image = FacePairing::blank(n);
        for face in pairing.faces() {
            *image.dest_mut(self.apply_to_face(face)) = self.apply_to_face(pairing.dest(face));
        }
        image
    }

    /// Whether this maps `pairing` onto itself.
    pub fn preserves(&self, pairing: &FacePairing) -> bool {
        self.size() == pairing.size() && self.apply_to_pairing(pairing) == *pairing
    }

    /// Conjugate of a gluing permutation across the face pair
    /// `(face, dest)`, given the gluing at the image face.
    ///
    /// The result glues `face` to `dest` in the original labelling.
    pub fn pull_back_gluing(&self, face: FaceSpec, dest: FaceSpec, image_gluing: Perm4) -> Perm4 {
        self.face_perm[dest.simp].inverse() * image_gluing * self.face_perm[face.simp]
    }

    pub fn inverse(&self) -> Self {
        let n = self.size();
        let mut tet_image = vec![0; n];
        let mut face_perm = vec![Perm4::IDENTITY; n];
        for t in 0..n {
            tet_image[self.tet_image[t]] = t;
            face_perm[self.tet_image[t]] = self.face_perm[t].inverse();
        }
        Self {
            tet_image,
            face_perm,
        }
    }
}

impl fmt::Display for Isomorphism {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for t in 0..self.size() {
            if t > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} -> {} (", t, self.tet_image[t])?;
            for facet in 0..TET_VERTICES {
                write!(f, "{}", self.face_perm[t].apply(facet))?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}
