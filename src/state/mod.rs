// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Mutable search state, rolled back through the undo logs.
//!
//! - `union_find`: twisted union-find shared by both trackers
//! - `vertex`: vertex link classes with boundary cycles and Euler counts
//! - `edge`: edge classes with orientation checks and face tallies
//! - `tally`: per-face counters modulo 4
//! - `statistics`: search counters
//!
//! All arrays are sized once from the number of tetrahedra. A step of the
//! search merges the state for one face gluing and, on the way back,
//! splits it again in exactly the reverse order.

pub mod edge;
pub mod statistics;
pub mod tally;
pub mod union_find;
pub mod vertex;

pub use edge::{EdgeClassTracker, TetEdgeState};
pub use statistics::{Counters, Statistics};
pub use tally::FaceTally;
pub use union_find::UnionLink;
pub use vertex::{LinkStatus, TetVertexState, VertexJoin, VertexLinkTracker};

use crate::geometry::{FaceSpec, Perm4};

/// The face gluing made at one search depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GluingStep {
    /// Face being glued.
    pub face: FaceSpec,
    /// Its partner.
    pub adj: FaceSpec,
    /// Full gluing from the vertices of `face`'s tetrahedron to `adj`'s.
    pub perm: Perm4,
    /// Search depth, which selects the undo log slots.
    pub depth: usize,
}

impl GluingStep {
    pub fn new(face: FaceSpec, adj: FaceSpec, s3_index: usize, depth: usize) -> Self {
        Self {
            face,
            adj,
            perm: Perm4::gluing(face.facet, adj.facet, s3_index),
            depth,
        }
    }
}
