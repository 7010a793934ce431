// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Search options.

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

/// Categories of triangulation a caller wants removed downstream.
///
/// The searcher records these and passes them on; it does not act on them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PurgeFlags(u8);

impl PurgeFlags {
    pub const NONE: PurgeFlags = PurgeFlags(0);
    /// Triangulations that are not minimal.
    pub const NON_MINIMAL: PurgeFlags = PurgeFlags(1);
    /// Triangulations of non-prime manifolds.
    pub const NON_PRIME: PurgeFlags = PurgeFlags(2);
    pub const NON_MINIMAL_PRIME: PurgeFlags = PurgeFlags(3);
    /// Triangulations of P2-reducible manifolds.
    pub const P2_REDUCIBLE: PurgeFlags = PurgeFlags(4);
    /// Ideal triangulations that are not minimal among hyperbolic ones.
    pub const NON_MINIMAL_HYP: PurgeFlags = PurgeFlags(8);

    const ALL_BITS: u8 = 0x0f;

    pub fn from_bits(bits: u8) -> Option<Self> {
        (bits & !Self::ALL_BITS == 0).then_some(PurgeFlags(bits))
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    /// Whether every flag in `other` is set.
    pub fn contains(self, other: PurgeFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for PurgeFlags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        PurgeFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for PurgeFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for PurgeFlags {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        PurgeFlags(self.0 & rhs.0)
    }
}

impl fmt::Display for PurgeFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a gluing search prunes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    /// Only build orientable triangulations.
    pub orientable_only: bool,
    /// Euler characteristic every closed vertex link must have.
    pub target_euler: i64,
    pub purge: PurgeFlags,
}

impl Default for SearchOptions {
    /// Closed 3-manifolds: every vertex link a sphere.
    fn default() -> Self {
        Self {
            orientable_only: false,
            target_euler: 2,
            purge: PurgeFlags::NONE,
        }
    }
}

impl SearchOptions {
    pub fn with_orientable_only(mut self, orientable_only: bool) -> Self {
        self.orientable_only = orientable_only;
        self
    }

    pub fn with_target_euler(mut self, target_euler: i64) -> Self {
        self.target_euler = target_euler;
        self
    }

    pub fn with_purge(mut self, purge: PurgeFlags) -> Self {
        self.purge = purge;
        self
    }
}
