// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Unordered pairs of distinct faces of a single tetrahedron.

/// Two distinct faces of one tetrahedron, stored smaller first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FacePair {
    lower: usize,
    upper: usize,
}

impl FacePair {
    /// The pair `{a, b}`; `a` and `b` must differ.
    pub fn new(a: usize, b: usize) -> Self {
        debug_assert!(a != b && a < 4 && b < 4, "invalid face pair {{{}, {}}}", a, b);
        if a < b {
            Self { lower: a, upper: b }
        } else {
            Self { lower: b, upper: a }
        }
    }

    #[inline]
    pub fn lower(&self) -> usize {
        self.lower
    }

    #[inline]
    pub fn upper(&self) -> usize {
        self.upper
    }

    /// The two faces not in this pair.
    pub fn complement(&self) -> Self {
        let mut rest = (0..4).filter(|&f| f != self.lower && f != self.upper);
        let lower = rest.next().unwrap_or(0);
        let upper = rest.next().unwrap_or(0);
        Self { lower, upper }
    }
}
