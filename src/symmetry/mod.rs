// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Symmetry: isomorphisms and canonical forms.
//!
//! ## Module Structure
//!
//! - `isomorphism`: relabellings of tetrahedra and faces
//! - `pairings`: canonicality and automorphisms of face pairings
//! - `gluings`: canonicality of gluing permutations under those automorphisms

pub mod gluings;
pub mod isomorphism;
pub mod pairings;

pub use isomorphism::Isomorphism;
