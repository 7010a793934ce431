// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Gluing permutations on top of a face pairing.
//!
//! Each matched face stores an index into S3 saying how the three vertices
//! of the face are sent to the three vertices of its partner. The full
//! gluing of the two tetrahedra is recovered with [`Perm4::gluing`].
//! Negative indices mark faces not yet decided: `-1` before the first
//! choice, `-2` before the first choice in orientable-only searches.

use std::fmt;

use crate::geometry::{FaceSpec, Perm4, S3_TABLE};
use crate::pairing::FacePairing;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GluingPerms {
    pairing: FacePairing,
    perm_index: Vec<i8>,
}

impl GluingPerms {
    /// Every face undecided.
    pub fn new(pairing: FacePairing) -> Self {
        let faces = pairing.size() * 4;
        Self {
            pairing,
            perm_index: vec![-1; faces],
        }
    }

    pub(crate) fn from_parts(pairing: FacePairing, perm_index: Vec<i8>) -> Self {
        debug_assert_eq!(perm_index.len(), pairing.size() * 4);
        Self {
            pairing,
            perm_index,
        }
    }

    pub fn pairing(&self) -> &FacePairing {
        &self.pairing
    }

    /// Number of tetrahedra.
    pub fn size(&self) -> usize {
        self.pairing.size()
    }

    #[inline]
    pub fn perm_index(&self, face: FaceSpec) -> i8 {
        self.perm_index[face.index()]
    }

    #[inline]
    pub(crate) fn perm_index_mut(&mut self, face: FaceSpec) -> &mut i8 {
        &mut self.perm_index[face.index()]
    }

    pub(crate) fn perm_indices(&self) -> &[i8] {
        &self.perm_index
    }

    /// Full gluing of `face` onto its partner, if the face is matched and
    /// decided.
    pub fn gluing_perm(&self, face: FaceSpec) -> Option<Perm4> {
        let index = usize::try_from(self.perm_index(face)).ok()?;
        if self.pairing.is_unmatched(face) || index >= S3_TABLE.len() {
            return None;
        }
        Some(Perm4::gluing(face.facet, self.pairing.dest(face).facet, index))
    }

    /// `(face, partner, gluing)` for every matched, decided face.
    ///
    /// Each gluing appears twice, once from each side, with inverse
    /// permutations.
    pub fn gluings(&self) -> Vec<(FaceSpec, FaceSpec, Perm4)> {
        self.pairing
            .faces()
            .filter_map(|face| {
                self.gluing_perm(face)
                    .map(|perm| (face, self.pairing.dest(face), perm))
            })
            .collect()
    }
}

/// One line per tetrahedron: the partner and gluing of each face, or `bdry`.
impl fmt::Display for GluingPerms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for simp in 0..self.size() {
            if simp > 0 {
                writeln!(f)?;
            }
            write!(f, "{}:", simp)?;
            for facet in 0..4 {
                let face = FaceSpec::new(simp, facet);
                match self.gluing_perm(face) {
                    Some(perm) => write!(f, " {} {}", self.pairing.dest(face), perm)?,
                    None if self.pairing.is_unmatched(face) => write!(f, " bdry")?,
                    None => write!(f, " ?")?,
                }
            }
        }
        Ok(())
    }
}
