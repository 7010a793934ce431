// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Fixed combinatorial tables for a single tetrahedron.
//!
//! Every table here is a pure constant: the numbering of the six edges, the
//! arrangement of the vertex linking triangles, and the permutation tables
//! used to store gluings by index.
//!
//! # Edges
//!
//! The edges of a tetrahedron are numbered 0..6 as 01, 02, 03, 12, 13, 23.
//! The edge opposite edge `e` is `5 - e`.
//!
//! # Vertex links
//!
//! The link of vertex `v` of a tetrahedron is a triangle whose three edges
//! lie in the three faces of the tetrahedron that contain `v`. Walking
//! around that triangle, the face following face `f` is
//! [`VERTEX_LINK_NEXT_FACE`]`[v][f]` and the face preceding it is
//! [`VERTEX_LINK_PREV_FACE`]`[v][f]`.

/// Number of vertices (and faces) of a tetrahedron.
pub const TET_VERTICES: usize = 4;

/// Number of edges of a tetrahedron.
pub const TET_EDGES: usize = 6;

/// Edge number joining vertices `i` and `j` (`-1` on the diagonal).
pub const EDGE_NUMBER: [[i8; 4]; 4] = [
    [-1, 0, 1, 2],
    [0, -1, 3, 4],
    [1, 3, -1, 5],
    [2, 4, 5, -1],
];

/// The two endpoints of each edge, smaller vertex first.
///
/// The natural orientation of an edge runs from `EDGE_VERTEX[e][0]` to
/// `EDGE_VERTEX[e][1]`.
pub const EDGE_VERTEX: [[usize; 2]; 6] = [[0, 1], [0, 2], [0, 3], [1, 2], [1, 3], [2, 3]];

/// Next face around the vertex linking triangle of vertex `v`.
pub const VERTEX_LINK_NEXT_FACE: [[i8; 4]; 4] = [
    [-1, 2, 3, 1],
    [3, -1, 0, 2],
    [1, 3, -1, 0],
    [1, 2, 0, -1],
];

/// Previous face around the vertex linking triangle of vertex `v`.
pub const VERTEX_LINK_PREV_FACE: [[i8; 4]; 4] = [
    [-1, 3, 1, 2],
    [2, -1, 3, 0],
    [3, 0, -1, 1],
    [2, 0, 1, -1],
];

/// Images of the six permutations of {0,1,2}.
///
/// Even indices hold even permutations and odd indices hold odd ones.
pub const S3_TABLE: [[u8; 3]; 6] = [
    [0, 1, 2],
    [0, 2, 1],
    [1, 2, 0],
    [1, 0, 2],
    [2, 0, 1],
    [2, 1, 0],
];

/// `INV_S3[i]` is the index of the inverse of `S3_TABLE[i]`.
pub const INV_S3: [usize; 6] = [0, 1, 4, 3, 2, 5];

/// Images of the 24 permutations of {0,1,2,3}.
///
/// Even indices hold even permutations and odd indices hold odd ones.
pub const S4_TABLE: [[u8; 4]; 24] = [
    [0, 1, 2, 3],
    [0, 1, 3, 2],
    [0, 2, 3, 1],
    [0, 2, 1, 3],
    [0, 3, 1, 2],
    [0, 3, 2, 1],
    [1, 0, 3, 2],
    [1, 0, 2, 3],
    [1, 2, 0, 3],
    [1, 2, 3, 0],
    [1, 3, 2, 0],
    [1, 3, 0, 2],
    [2, 0, 1, 3],
    [2, 0, 3, 1],
    [2, 1, 3, 0],
    [2, 1, 0, 3],
    [2, 3, 0, 1],
    [2, 3, 1, 0],
    [3, 0, 2, 1],
    [3, 0, 1, 2],
    [3, 1, 0, 2],
    [3, 1, 2, 0],
    [3, 2, 1, 0],
    [3, 2, 0, 1],
];

/// `INV_S4[i]` is the index of the inverse of `S4_TABLE[i]`.
pub const INV_S4: [usize; 24] = [
    0, 1, 4, 3, 2, 5, 6, 7, 12, 19, 18, 13, 8, 11, 20, 15, 16, 23, 10, 9, 14, 21, 22, 17,
];

/// Positions in [`S4_TABLE`] of the permutations fixing 3, in [`S3_TABLE`] order.
pub const S3_IN_S4: [usize; 6] = [0, 3, 8, 7, 12, 15];

/// Edge of a tetrahedron opposite the edge joining `i` and `j`.
#[inline]
pub fn opposite_edge(i: usize, j: usize) -> usize {
    (5 - EDGE_NUMBER[i][j]) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_tables_agree() {
        for (e, ends) in EDGE_VERTEX.iter().enumerate() {
            assert_eq!(EDGE_NUMBER[ends[0]][ends[1]] as usize, e);
            assert_eq!(EDGE_NUMBER[ends[1]][ends[0]] as usize, e);
        }
    }

    #[test]
    fn test_opposite_edge_is_disjoint() {
        for i in 0..4 {
            for j in 0..4 {
                if i == j {
                    continue;
                }
                let opp = EDGE_VERTEX[opposite_edge(i, j)];
                assert!(!opp.contains(&i) && !opp.contains(&j));
            }
        }
    }

    #[test]
    fn test_inverse_tables() {
        for i in 0..6 {
            let p = S3_TABLE[i];
            let q = S3_TABLE[INV_S3[i]];
            for x in 0..3 {
                assert_eq!(q[p[x] as usize] as usize, x);
            }
        }
        for i in 0..24 {
            let p = S4_TABLE[i];
            let q = S4_TABLE[INV_S4[i]];
            for x in 0..4 {
                assert_eq!(q[p[x] as usize] as usize, x);
            }
        }
    }

    #[test]
    fn test_s3_embeds_in_s4() {
        for (i, &s4) in S3_IN_S4.iter().enumerate() {
            let p3 = S3_TABLE[i];
            let p4 = S4_TABLE[s4];
            assert_eq!(&p4[..3], &p3[..]);
            assert_eq!(p4[3], 3);
        }
    }

    #[test]
    fn test_vertex_link_faces_cycle() {
        // Next and previous are inverse walks around each linking triangle.
        for v in 0..4 {
            for f in 0..4 {
                if f == v {
                    continue;
                }
                let next = VERTEX_LINK_NEXT_FACE[v][f];
                assert!(next >= 0 && next as usize != v && next as usize != f);
                assert_eq!(VERTEX_LINK_PREV_FACE[v][next as usize] as usize, f);
            }
        }
    }
}
