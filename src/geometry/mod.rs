// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Combinatorial primitives for tetrahedra.
//!
//! - FaceSpec: a `(simplex, facet)` face, with boundary and past-end sentinels
//! - FacePair: an unordered pair of faces of one tetrahedron
//! - Perm4: a permutation of the four vertices of a tetrahedron
//! - constants: edge numbering, vertex link walks and permutation tables

pub mod constants;
pub mod face_pair;
pub mod face_spec;
pub mod perm;

pub use constants::*;
pub use face_pair::FacePair;
pub use face_spec::FaceSpec;
pub use perm::Perm4;
