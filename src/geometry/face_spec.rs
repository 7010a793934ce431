// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Tetrahedron faces as `(simplex, facet)` pairs.
//!
//! Faces are ordered lexicographically: by simplex, then by facet. For a
//! triangulation with `n` tetrahedra the real faces are `(0,0)..=(n-1,3)`,
//! the boundary sentinel is `(n,0)`, and anything beyond `(n,0)` is past the
//! end. The position before `(0,0)` is represented by the absence of a face
//! (`dec` returns `false` instead of stepping there).

use std::fmt;

use crate::geometry::constants::TET_VERTICES;

/// A face of a tetrahedron, or the boundary sentinel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FaceSpec {
    /// Tetrahedron index; equal to `n` for the boundary sentinel.
    pub simp: usize,
    /// Face of the tetrahedron, 0..4.
    pub facet: usize,
}

impl FaceSpec {
    pub const fn new(simp: usize, facet: usize) -> Self {
        Self { simp, facet }
    }

    /// The boundary sentinel for a triangulation with `n` tetrahedra.
    pub const fn boundary(n: usize) -> Self {
        Self { simp: n, facet: 0 }
    }

    pub fn is_boundary(&self, n: usize) -> bool {
        self.simp == n && self.facet == 0
    }

    /// Whether this face lies past every usable value.
    ///
    /// With `boundary_allowed` the boundary sentinel still counts as usable.
    pub fn is_past_end(&self, n: usize, boundary_allowed: bool) -> bool {
        self.simp > n || (self.simp == n && (!boundary_allowed || self.facet > 0))
    }

    /// Dense index `4 * simp + facet`.
    #[inline]
    pub fn index(&self) -> usize {
        TET_VERTICES * self.simp + self.facet
    }

    #[inline]
    pub fn from_index(index: usize) -> Self {
        Self {
            simp: index / TET_VERTICES,
            facet: index % TET_VERTICES,
        }
    }

    /// Step to the next face in lexicographic order.
    #[inline]
    pub fn inc(&mut self) {
        self.facet += 1;
        if self.facet == TET_VERTICES {
            self.facet = 0;
            self.simp += 1;
        }
    }

    /// Step to the previous face in lexicographic order.
    ///
    /// Returns `false`, leaving the face unchanged, if this is `(0,0)`.
    #[inline]
    pub fn dec(&mut self) -> bool {
        if self.facet > 0 {
            self.facet -= 1;
        } else if self.simp > 0 {
            self.simp -= 1;
            self.facet = TET_VERTICES - 1;
        } else {
            return false;
        }
        true
    }

    /// The face following this one.
    pub fn next(self) -> Self {
        let mut f = self;
        f.inc();
        f
    }
}

impl fmt::Display for FaceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.simp, self.facet)
    }
}
