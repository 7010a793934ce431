// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Face pairings: how the 4n faces of n tetrahedra are matched.
//!
//! A [`FacePairing`] is an involution on faces. A face sent to the boundary
//! sentinel `(n,0)` is left unmatched. Every other face is matched with a
//! different face, and that face is matched back.
//!
//! # Module Structure
//!
//! - `mod`: the pairing itself, validation, text representation
//! - `predicates`: subgraph tests used to discard unpromising pairings
//! - `enumerate`: canonical enumeration of all pairings on n tetrahedra

pub mod enumerate;
pub mod predicates;

pub use enumerate::{find_all_pairings, BoundaryOption, PairingEnumeration};

use std::collections::VecDeque;
use std::fmt;

use crate::error::{CensusError, Result};
use crate::geometry::{FaceSpec, TET_VERTICES};

/// A matching of the faces of `n` tetrahedra, possibly with boundary.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FacePairing {
    /// Number of tetrahedra.
    n: usize,
    /// `pairs[f.index()]` is the partner of face `f`.
    pairs: Vec<FaceSpec>,
}

impl FacePairing {
    /// A pairing on `n` tetrahedra in which every face points at itself.
    ///
    /// This is not a valid pairing; it is the blank slate the enumerator
    /// fills in, with "points at itself" meaning "not yet decided".
    pub(crate) fn blank(n: usize) -> Self {
        Self {
            n,
            pairs: (0..n * TET_VERTICES).map(FaceSpec::from_index).collect(),
        }
    }

    /// Build a pairing from the partner of every face, in face order.
    ///
    /// `dests[4*t + f]` is the partner of face `f` of tetrahedron `t`, with
    /// `FaceSpec::boundary(n)` marking an unmatched face.
    pub fn from_destinations(dests: Vec<FaceSpec>) -> Result<Self> {
        if dests.is_empty() || dests.len() % TET_VERTICES != 0 {
            return Err(CensusError::PairingArity { len: dests.len() });
        }
        let pairing = Self {
            n: dests.len() / TET_VERTICES,
            pairs: dests,
        };
        pairing.validate()?;
        Ok(pairing)
    }

    fn validate(&self) -> Result<()> {
        let n = self.n;
        for (i, &dest) in self.pairs.iter().enumerate() {
            let face = FaceSpec::from_index(i);
            if dest.is_boundary(n) {
                continue;
            }
            if dest.simp >= n || dest.facet >= TET_VERTICES || dest == face {
                return Err(CensusError::PairingOutOfRange {
                    face: face.to_string(),
                    dest: dest.to_string(),
                });
            }
            let back = self.dest(dest);
            if back != face {
                return Err(CensusError::PairingNotReciprocal {
                    face: face.to_string(),
                    dest: dest.to_string(),
                    back: back.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Number of tetrahedra.
    #[inline]
    pub fn size(&self) -> usize {
        self.n
    }

    /// Partner of `face`, or the boundary sentinel.
    #[inline]
    pub fn dest(&self, face: FaceSpec) -> FaceSpec {
        self.pairs[face.index()]
    }

    /// Partner of face `facet` of tetrahedron `simp`.
    #[inline]
    pub fn dest_of(&self, simp: usize, facet: usize) -> FaceSpec {
        self.pairs[TET_VERTICES * simp + facet]
    }

    #[inline]
    pub(crate) fn dest_mut(&mut self, face: FaceSpec) -> &mut FaceSpec {
        &mut self.pairs[face.index()]
    }

    /// Whether `face` is sent to the boundary.
    #[inline]
    pub fn is_unmatched(&self, face: FaceSpec) -> bool {
        self.dest(face).is_boundary(self.n)
    }

    #[inline]
    pub fn is_unmatched_at(&self, simp: usize, facet: usize) -> bool {
        self.dest_of(simp, facet).is_boundary(self.n)
    }

    /// Whether `face` still points at itself (undecided during enumeration).
    #[inline]
    pub(crate) fn no_dest(&self, face: FaceSpec) -> bool {
        self.dest(face) == face
    }

    /// All faces in lexicographic order.
    pub fn faces(&self) -> impl Iterator<Item = FaceSpec> {
        (0..self.n * TET_VERTICES).map(FaceSpec::from_index)
    }

    /// Whether no face is left unmatched.
    pub fn is_closed(&self) -> bool {
        self.faces().all(|f| !self.is_unmatched(f))
    }

    pub fn n_boundary_faces(&self) -> usize {
        self.faces().filter(|&f| self.is_unmatched(f)).count()
    }

    /// Whether every tetrahedron is reachable from tetrahedron 0.
    pub fn is_connected(&self) -> bool {
        self.reachable_count() == self.n
    }

    fn reachable_count(&self) -> usize {
        let mut seen = vec![false; self.n];
        let mut queue = VecDeque::from([0]);
        seen[0] = true;
        let mut count = 1;
        while let Some(t) = queue.pop_front() {
            for facet in 0..TET_VERTICES {
                let d = self.dest_of(t, facet);
                if d.simp < self.n && !seen[d.simp] {
                    seen[d.simp] = true;
                    count += 1;
                    queue.push_back(d.simp);
                }
            }
        }
        count
    }

    /// Error unless every tetrahedron is reachable from tetrahedron 0.
    pub(crate) fn require_connected(&self) -> Result<()> {
        let reached = self.reachable_count();
        if reached == self.n {
            Ok(())
        } else {
            Err(CensusError::PairingDisconnected {
                reached,
                total: self.n,
            })
        }
    }

    /// Whitespace separated `simp facet` partners of every face in order.
    pub fn to_text_rep(&self) -> String {
        self.pairs
            .iter()
            .map(|d| format!("{} {}", d.simp, d.facet))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Parse the output of [`FacePairing::to_text_rep`].
    pub fn from_text_rep(rep: &str) -> Result<Self> {
        let tokens: Vec<&str> = rep.split_whitespace().collect();
        if tokens.is_empty() || tokens.len() % (2 * TET_VERTICES) != 0 {
            return Err(CensusError::InvalidTextRep {
                reason: format!("{} tokens is not a positive multiple of 8", tokens.len()),
            });
        }
        let n = tokens.len() / (2 * TET_VERTICES);
        let parse = |token: &str, bound: usize| -> Result<usize> {
            match token.parse::<usize>() {
                Ok(v) if v <= bound => Ok(v),
                _ => Err(CensusError::InvalidTextRep {
                    reason: format!("bad value {:?}", token),
                }),
            }
        };
        let mut dests = Vec::with_capacity(n * TET_VERTICES);
        for pair in tokens.chunks(2) {
            let simp = parse(pair[0], n)?;
            let facet = parse(pair[1], TET_VERTICES - 1)?;
            if simp == n && facet != 0 {
                return Err(CensusError::InvalidTextRep {
                    reason: format!("boundary destination {}:{}", simp, facet),
                });
            }
            dests.push(FaceSpec::new(simp, facet));
        }
        Self::from_destinations(dests).map_err(|err| CensusError::InvalidTextRep {
            reason: err.to_string(),
        })
    }
}

impl fmt::Display for FacePairing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for face in self.faces() {
            if face.facet == 0 && face.simp > 0 {
                write!(f, " | ")?;
            } else if face.index() > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", self.dest(face))?;
        }
        Ok(())
    }
}
