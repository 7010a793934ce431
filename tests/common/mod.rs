// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Common test utilities shared across integration tests.
//!
//! The oracles here work from scratch on complete objects, without the
//! incremental trackers, so they can check what the searches report.

#![allow(dead_code)]

use std::collections::HashSet;

use tricensus::{find_all_pairings, BoundaryOption, CancelFlag, FacePairing, FaceSpec, Isomorphism, Perm4};

/// Send log output to the test harness. Safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_target(false)
        .try_init();
}

/// Canonical pairings with their automorphisms.
pub fn pairings(n: usize, boundary: BoundaryOption, n_bdry: Option<usize>) -> Vec<(FacePairing, Vec<Isomorphism>)> {
    let mut found = Vec::new();
    find_all_pairings(n, boundary, n_bdry, &CancelFlag::new(), |item| {
        if let Some((p, autos)) = item {
            found.push((p.clone(), autos.to_vec()));
        }
    });
    found
}

fn permutations(n: usize) -> Vec<Vec<usize>> {
    if n == 0 {
        return vec![Vec::new()];
    }
    let mut out = Vec::new();
    for smaller in permutations(n - 1) {
        for pos in 0..n {
            let mut p = smaller.clone();
            p.insert(pos, n - 1);
            out.push(p);
        }
    }
    out
}

/// Every relabelling of `n` tetrahedra: a permutation of the tetrahedra and
/// a vertex permutation for each.
pub fn all_relabellings(n: usize) -> Vec<Isomorphism> {
    let perms: Vec<Perm4> = Perm4::all().collect();
    let mut face_choices: Vec<Vec<Perm4>> = vec![Vec::new()];
    for _ in 0..n {
        face_choices = face_choices
            .into_iter()
            .flat_map(|prefix| {
                perms.iter().map(move |&p| {
                    let mut v = prefix.clone();
                    v.push(p);
                    v
                })
            })
            .collect();
    }
    let mut out = Vec::new();
    for tets in permutations(n) {
        for faces in &face_choices {
            out.push(Isomorphism::new(tets.clone(), faces.clone()).unwrap());
        }
    }
    out
}

/// The destinations of a pairing in face order, for lexicographic comparison.
pub fn dests(p: &FacePairing) -> Vec<FaceSpec> {
    p.faces().map(|f| p.dest(f)).collect()
}

/// Every connected pairing of `n` tetrahedra with every face matched.
pub fn all_closed_pairings(n: usize) -> Vec<FacePairing> {
    fn extend(dests: &mut Vec<Option<FaceSpec>>, out: &mut Vec<FacePairing>) {
        let Some(first) = dests.iter().position(Option::is_none) else {
            let p = FacePairing::from_destinations(dests.iter().map(|d| d.unwrap()).collect()).unwrap();
            if p.is_connected() {
                out.push(p);
            }
            return;
        };
        for other in first + 1..dests.len() {
            if dests[other].is_none() {
                dests[first] = Some(FaceSpec::from_index(other));
                dests[other] = Some(FaceSpec::from_index(first));
                extend(dests, out);
                dests[other] = None;
            }
        }
        dests[first] = None;
    }
    let mut out = Vec::new();
    extend(&mut vec![None; 4 * n], &mut out);
    out
}

/// A complete assignment of gluings: the full permutation on each matched face.
pub type Gluings = Vec<Option<Perm4>>;

/// Every gluing assignment for a pairing, with matched faces glued both ways.
pub fn all_gluings(p: &FacePairing) -> Vec<Gluings> {
    let pairs: Vec<(FaceSpec, FaceSpec)> = p
        .faces()
        .filter(|&f| !p.is_unmatched(f) && f < p.dest(f))
        .map(|f| (f, p.dest(f)))
        .collect();
    let mut out = vec![vec![None; 4 * p.size()]];
    for &(face, dest) in &pairs {
        out = out
            .into_iter()
            .flat_map(|g| {
                (0..6).map(move |idx| {
                    let perm = Perm4::gluing(face.facet, dest.facet, idx);
                    let mut g = g.clone();
                    g[face.index()] = Some(perm);
                    g[dest.index()] = Some(perm.inverse());
                    g
                })
            })
            .collect();
    }
    out
}

/// Assignments as emitted by a searcher, in the same shape.
pub fn gluings_of(n: usize, list: &[(FaceSpec, FaceSpec, Perm4)]) -> Gluings {
    let mut g = vec![None; 4 * n];
    for &(face, _, perm) in list {
        g[face.index()] = Some(perm);
    }
    g
}

fn find(parent: &mut [usize], mut x: usize) -> usize {
    while parent[x] != x {
        parent[x] = parent[parent[x]];
        x = parent[x];
    }
    x
}

fn union(parent: &mut [usize], a: usize, b: usize) {
    let (ra, rb) = (find(parent, a), find(parent, b));
    if ra != rb {
        parent[ra] = rb;
    }
}

/// Index of the directed tetrahedron edge from `v` to `w` in tetrahedron `t`.
fn directed(t: usize, v: usize, w: usize) -> usize {
    16 * t + 4 * v + w
}

/// Topological facts about a complete gluing, computed from scratch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topology {
    /// Some edge is identified with itself in reverse.
    pub invalid_edge: bool,
    /// Euler characteristic of each closed vertex link.
    pub closed_link_euler: Vec<i64>,
    /// Number of vertex links with boundary.
    pub bounded_links: usize,
    pub orientable: bool,
}

pub fn analyse(p: &FacePairing, g: &Gluings) -> Topology {
    let n = p.size();
    let mut vparent: Vec<usize> = (0..4 * n).collect();
    let mut dparent: Vec<usize> = (0..16 * n).collect();
    for face in p.faces() {
        let Some(perm) = g[face.index()] else {
            continue;
        };
        let dest = p.dest(face);
        for v in (0..4).filter(|&v| v != face.facet) {
            union(&mut vparent, 4 * face.simp + v, 4 * dest.simp + perm.apply(v));
            for w in (0..4).filter(|&w| w != face.facet && w != v) {
                union(
                    &mut dparent,
                    directed(face.simp, v, w),
                    directed(dest.simp, perm.apply(v), perm.apply(w)),
                );
            }
        }
    }

    let mut invalid_edge = false;
    for t in 0..n {
        for v in 0..4 {
            for w in (0..4).filter(|&w| w != v) {
                if find(&mut dparent, directed(t, v, w)) == find(&mut dparent, directed(t, w, v)) {
                    invalid_edge = true;
                }
            }
        }
    }

    // Link of each vertex class: one triangle per tetrahedron vertex, one
    // link vertex per class of directed edges leaving it.
    let mut closed_link_euler = Vec::new();
    let mut bounded_links = 0;
    let roots: HashSet<usize> = (0..4 * n).map(|x| find(&mut vparent, x)).collect();
    for root in roots {
        let members: Vec<usize> = (0..4 * n).filter(|&x| find(&mut vparent, x) == root).collect();
        let faces = members.len() as i64;
        let mut bdry = 0i64;
        let mut link_vertices = HashSet::new();
        for &x in &members {
            let (t, v) = (x / 4, x % 4);
            for f in (0..4).filter(|&f| f != v) {
                if g[4 * t + f].is_none() {
                    bdry += 1;
                }
            }
            for w in (0..4).filter(|&w| w != v) {
                link_vertices.insert(find(&mut dparent, directed(t, v, w)));
            }
        }
        let edges = (3 * faces + bdry) / 2;
        if bdry == 0 {
            closed_link_euler.push(link_vertices.len() as i64 - edges + faces);
        } else {
            bounded_links += 1;
        }
    }

    Topology {
        invalid_edge,
        closed_link_euler,
        bounded_links,
        orientable: is_orientable(p, g),
    }
}

/// Two-colour the tetrahedra so every gluing is odd between equal colours.
fn is_orientable(p: &FacePairing, g: &Gluings) -> bool {
    let n = p.size();
    let mut orientation = vec![0i8; n];
    orientation[0] = 1;
    let mut stack = vec![0];
    while let Some(t) = stack.pop() {
        for f in 0..4 {
            let face = FaceSpec::new(t, f);
            let Some(perm) = g[face.index()] else {
                continue;
            };
            let d = p.dest(face).simp;
            let want = -perm.sign() * orientation[t];
            if orientation[d] == 0 {
                orientation[d] = want;
                stack.push(d);
            } else if orientation[d] != want {
                return false;
            }
        }
    }
    true
}

/// Image of an assignment under an automorphism of its pairing.
pub fn relabel(p: &FacePairing, iso: &Isomorphism, g: &Gluings) -> Gluings {
    let mut out = vec![None; g.len()];
    for face in p.faces() {
        if let Some(perm) = g[face.index()] {
            let dest = p.dest(face);
            let image = iso.face_perm(dest.simp) * perm * iso.face_perm(face.simp).inverse();
            out[iso.apply_to_face(face).index()] = Some(image);
        }
    }
    out
}

fn key(g: &Gluings) -> Vec<[u8; 4]> {
    g.iter().map(|p| p.map_or([4; 4], |p| p.images())).collect()
}

/// Number of orbits of `assignments` under the group `autos`.
pub fn count_orbits(p: &FacePairing, autos: &[Isomorphism], assignments: &[Gluings]) -> usize {
    let orbits: HashSet<Vec<[u8; 4]>> = assignments
        .iter()
        .map(|g| autos.iter().map(|iso| key(&relabel(p, iso, g))).min().unwrap_or_else(|| key(g)))
        .collect();
    orbits.len()
}
