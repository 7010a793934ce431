// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Census enumeration of 3-manifold triangulations.
//!
//! A triangulation on `n` tetrahedra is built in two stages. First its
//! *face pairing* says which faces are glued to which; then a *gluing
//! permutation* for each pair says how. This crate enumerates both, each up
//! to relabelling, and prunes the second stage as early as possible.
//!
//! # Architecture
//!
//! ## Tier 1: Constants
//!
//! Precomputed tables that never change: permutations of three and four
//! elements, edge numbering, vertex link walks (`geometry`).
//!
//! ## Tier 2: Search state
//!
//! State that changes during a search and is rolled back on the way out:
//! - vertex link classes, with boundary cycles and Euler characteristics
//! - edge classes, with orientation checks and face tallies
//! - fixed-size undo logs, one slot per identification (`trail`)
//!
//! # Search Algorithm
//!
//! 1. **Face pairings** (`pairing`): all connected pairings, in a normal
//!    form, each tested for canonicality. The test also yields the
//!    pairing's automorphisms.
//! 2. **Gluings** (`engine`): for each pairing, a depth-first search over
//!    the gluing permutations. Each choice merges vertex links and edges
//!    (`state`), rejecting at once any edge glued to itself backwards and
//!    any vertex link that can no longer be a surface of the required Euler
//!    characteristic. Complete assignments are kept only if canonical under
//!    the automorphisms (`symmetry`).
//! 3. **Census** (`census`): drives both, with optional subgraph tests that
//!    discard pairings before any gluing is tried.
//!
//! # Parallelization
//!
//! Every searcher owns its state. Work can be split by face pairing, or a
//! single search can be paused at a fixed depth with
//! [`GluingSearcher::partial_search`], dumped to text, and resumed
//! elsewhere.

pub mod census;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod pairing;
pub mod state;
pub mod symmetry;
pub mod trail;

// Re-export commonly used types
pub use census::{Census, CensusOptions, CensusSummary};
pub use engine::{CancelFlag, GluingPerms, GluingSearcher, PurgeFlags, SearchOptions, SearchOutcome};
pub use error::{CensusError, Result};
pub use geometry::{FaceSpec, Perm4};
pub use pairing::{find_all_pairings, BoundaryOption, FacePairing};
pub use symmetry::Isomorphism;
