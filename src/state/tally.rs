// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Per-face counters modulo 4, packed as two bit planes.
//!
//! Entry `i` of a [`FaceTally`] is the number of times face `i` (dense face
//! index `4 * tet + facet`) has been counted, modulo 4. Bit `i` of `low`
//! and bit `i` of `high` hold the two binary digits, so addition and
//! subtraction of whole tallies are a handful of word operations.

use std::fmt;
use std::ops::{AddAssign, SubAssign};

const WORD_BITS: usize = 64;

/// A vector of counters in `0..4`, one per tetrahedron face.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FaceTally {
    len: usize,
    low: Vec<u64>,
    high: Vec<u64>,
}

impl FaceTally {
    /// A tally of `len` zero counters.
    pub fn new(len: usize) -> Self {
        let words = len.div_ceil(WORD_BITS);
        Self {
            len,
            low: vec![0; words],
            high: vec![0; words],
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Counter `i`, in `0..4`.
    #[inline]
    pub fn get(&self, i: usize) -> u8 {
        debug_assert!(i < self.len);
        let (w, b) = (i / WORD_BITS, i % WORD_BITS);
        (((self.low[w] >> b) & 1) | (((self.high[w] >> b) & 1) << 1)) as u8
    }

    /// Set counter `i` to `value` (taken modulo 4).
    #[inline]
    pub fn set(&mut self, i: usize, value: u8) {
        debug_assert!(i < self.len);
        let (w, b) = (i / WORD_BITS, i % WORD_BITS);
        let bit = 1u64 << b;
        self.low[w] = (self.low[w] & !bit) | (u64::from(value & 1) << b);
        self.high[w] = (self.high[w] & !bit) | (u64::from((value >> 1) & 1) << b);
    }

    pub fn is_zero(&self) -> bool {
        self.low.iter().chain(&self.high).all(|&w| w == 0)
    }

    /// Whether some counter has reached 3.
    pub fn has_three(&self) -> bool {
        self.low.iter().zip(&self.high).any(|(l, h)| l & h != 0)
    }

    /// Whether some face has a non-zero counter in both tallies.
    pub fn has_nonzero_match(&self, other: &FaceTally) -> bool {
        (0..self.low.len()).any(|w| {
            (self.low[w] | self.high[w]) & (other.low[w] | other.high[w]) != 0
        })
    }

    /// Parse `len` digits `'0'..='3'`.
    pub fn from_digits(digits: &str) -> Option<Self> {
        let mut tally = Self::new(digits.len());
        for (i, c) in digits.bytes().enumerate() {
            match c {
                b'0'..=b'3' => tally.set(i, c - b'0'),
                _ => return None,
            }
        }
        Some(tally)
    }
}

impl AddAssign<&FaceTally> for FaceTally {
    fn add_assign(&mut self, rhs: &FaceTally) {
        debug_assert_eq!(self.len, rhs.len);
        for w in 0..self.low.len() {
            self.high[w] ^= rhs.high[w] ^ (self.low[w] & rhs.low[w]);
            self.low[w] ^= rhs.low[w];
        }
    }
}

impl SubAssign<&FaceTally> for FaceTally {
    fn sub_assign(&mut self, rhs: &FaceTally) {
        debug_assert_eq!(self.len, rhs.len);
        for w in 0..self.low.len() {
            self.high[w] ^= rhs.high[w] ^ (rhs.low[w] & !self.low[w]);
            self.low[w] ^= rhs.low[w];
        }
    }
}

/// Digits `'0'..='3'`, one per face.
impl fmt::Display for FaceTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.len {
            write!(f, "{}", self.get(i))?;
        }
        Ok(())
    }
}
