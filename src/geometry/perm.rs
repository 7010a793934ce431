// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Permutations of the four vertices of a tetrahedron.
//!
//! A [`Perm4`] is stored as its image array. Composition follows the usual
//! convention `(p * q)[x] = p[q[x]]`, and the derived ordering is
//! lexicographic on image arrays, which is the ordering used when comparing
//! gluing assignments for canonicality.
//!
//! Gluings themselves are stored as indices into the S3 table; see
//! [`Perm4::s3`].

use std::fmt;
use std::ops::{Index, Mul};

use crate::geometry::constants::{INV_S4, S3_IN_S4, S4_TABLE};

/// A permutation of {0,1,2,3}.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Perm4([u8; 4]);

impl Perm4 {
    /// The identity permutation.
    pub const IDENTITY: Perm4 = Perm4([0, 1, 2, 3]);

    /// Build a permutation from its images, returning `None` unless the
    /// images are exactly 0, 1, 2, 3 in some order.
    pub fn from_images(images: [u8; 4]) -> Option<Self> {
        let mut seen = [false; 4];
        for &x in &images {
            let slot = seen.get_mut(x as usize)?;
            if *slot {
                return None;
            }
            *slot = true;
        }
        Some(Perm4(images))
    }

    /// The transposition swapping `a` and `b` (the identity if `a == b`).
    pub fn transposition(a: usize, b: usize) -> Self {
        let mut images = [0, 1, 2, 3];
        images.swap(a, b);
        Perm4(images)
    }

    /// The permutation at position `index` of [`S4_TABLE`].
    #[inline]
    pub fn s4(index: usize) -> Self {
        Perm4(S4_TABLE[index])
    }

    /// The permutation of {0,1,2} at position `index` of the S3 table,
    /// extended to fix 3.
    #[inline]
    pub fn s3(index: usize) -> Self {
        Perm4(S4_TABLE[S3_IN_S4[index]])
    }

    /// The gluing from face `from_facet` to face `to_facet` selected by
    /// S3 index `s3_index`.
    ///
    /// The S3 permutation acts on the three vertices of each face after
    /// the missing vertex has been swapped into position 3.
    pub fn gluing(from_facet: usize, to_facet: usize, s3_index: usize) -> Self {
        Self::transposition(to_facet, 3) * Self::s3(s3_index) * Self::transposition(from_facet, 3)
    }

    /// All 24 permutations, in [`S4_TABLE`] order.
    pub fn all() -> impl Iterator<Item = Perm4> {
        S4_TABLE.iter().map(|&images| Perm4(images))
    }

    /// The image array.
    #[inline]
    pub fn images(&self) -> [u8; 4] {
        self.0
    }

    /// Image of `x`.
    #[inline]
    pub fn apply(&self, x: usize) -> usize {
        self.0[x] as usize
    }

    pub fn inverse(&self) -> Self {
        let mut images = [0u8; 4];
        for (x, &y) in self.0.iter().enumerate() {
            images[y as usize] = x as u8;
        }
        Perm4(images)
    }

    /// +1 for even permutations, -1 for odd ones.
    pub fn sign(&self) -> i8 {
        let mut inversions = 0;
        for i in 0..4 {
            for j in (i + 1)..4 {
                if self.0[i] > self.0[j] {
                    inversions += 1;
                }
            }
        }
        if inversions % 2 == 0 {
            1
        } else {
            -1
        }
    }

    /// Position of this permutation in [`S4_TABLE`].
    pub fn s4_index(&self) -> usize {
        S4_TABLE
            .iter()
            .position(|images| *images == self.0)
            .unwrap_or_else(|| unreachable!("Perm4 always holds a permutation"))
    }

    /// Position of the inverse in [`S4_TABLE`], via the precomputed table.
    pub fn inverse_index(&self) -> usize {
        INV_S4[self.s4_index()]
    }
}

impl Default for Perm4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Perm4 {
    type Output = Perm4;

    fn mul(self, rhs: Perm4) -> Perm4 {
        let mut images = [0u8; 4];
        for (x, image) in images.iter_mut().enumerate() {
            *image = self.0[rhs.0[x] as usize];
        }
        Perm4(images)
    }
}

impl Index<usize> for Perm4 {
    type Output = u8;

    fn index(&self, x: usize) -> &u8 {
        &self.0[x]
    }
}

impl fmt::Display for Perm4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for x in self.0 {
            write!(f, "{}", x)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_and_inverse() {
        for p in Perm4::all() {
            assert_eq!(p * p.inverse(), Perm4::IDENTITY);
            assert_eq!(p.inverse() * p, Perm4::IDENTITY);
            assert_eq!(Perm4::s4(p.inverse_index()), p.inverse());
        }
    }

    #[test]
    fn test_composition_convention() {
        let p = Perm4::from_images([1, 2, 3, 0]).unwrap();
        let q = Perm4::transposition(0, 1);
        // (p * q)[0] = p[q[0]] = p[1] = 2
        assert_eq!((p * q).apply(0), 2);
        assert_eq!((q * p).apply(0), 0);
    }

    #[test]
    fn test_sign_matches_table_parity() {
        for (i, p) in Perm4::all().enumerate() {
            assert_eq!(p.sign(), if i % 2 == 0 { 1 } else { -1 });
        }
        for i in 0..6 {
            assert_eq!(Perm4::s3(i).sign(), if i % 2 == 0 { 1 } else { -1 });
        }
    }

    #[test]
    fn test_from_images_rejects_non_permutations() {
        assert!(Perm4::from_images([0, 0, 1, 2]).is_none());
        assert!(Perm4::from_images([0, 1, 2, 4]).is_none());
        assert!(Perm4::from_images([3, 2, 1, 0]).is_some());
    }

    #[test]
    fn test_transposition_with_itself_is_identity() {
        assert_eq!(Perm4::transposition(3, 3), Perm4::IDENTITY);
        assert_eq!(Perm4::transposition(1, 3).images(), [0, 3, 2, 1]);
    }

    #[test]
    fn test_gluing_maps_face_to_face() {
        for from in 0..4 {
            for to in 0..4 {
                for idx in 0..6 {
                    let g = Perm4::gluing(from, to, idx);
                    assert_eq!(g.apply(from), to);
                    let back = Perm4::gluing(to, from, crate::geometry::INV_S3[idx]);
                    assert_eq!(back * g, Perm4::IDENTITY);
                }
            }
        }
    }

    #[test]
    fn test_ordering_is_lexicographic() {
        let mut sorted: Vec<Perm4> = Perm4::all().collect();
        sorted.sort();
        assert_eq!(sorted[0], Perm4::IDENTITY);
        assert_eq!(sorted[23].images(), [3, 2, 1, 0]);
        assert!(Perm4::from_images([1, 0, 3, 2]).unwrap() < Perm4::from_images([1, 2, 0, 3]).unwrap());
    }
}
