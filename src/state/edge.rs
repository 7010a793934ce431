// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Incremental edge classes.
//!
//! Each of the `6n` tetrahedron edges starts in its own class. Gluing two
//! faces identifies three pairs of edges. An identification inside a single
//! class closes up a cycle of edges; if it does so with the orientation
//! reversed, the edge would be glued to itself backwards and the gluing is
//! rejected.
//!
//! Every edge also carries two [`FaceTally`] counters of the faces lying
//! along it, split by which side of the edge's natural orientation they
//! sit on.

use crate::geometry::{opposite_edge, EDGE_VERTEX, TET_EDGES, TET_VERTICES};
use crate::state::tally::FaceTally;
use crate::state::union_find::{detach, find, unite, Linked, UnionLink};
use crate::state::GluingStep;
use crate::trail::UndoLog;

/// State of one tetrahedron edge, `e + 6 * tet`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TetEdgeState {
    pub link: UnionLink,
    /// Number of tetrahedron edges in the class (roots only).
    pub size: usize,
    /// False while the class is closed up into a cycle of edges (roots only).
    pub bounded: bool,
    /// Faces on the positive side of the class (roots only).
    pub faces_pos: FaceTally,
    /// Faces on the negative side of the class (roots only).
    pub faces_neg: FaceTally,
}

impl TetEdgeState {
    /// Edge `id` before any gluing, with its two faces tallied.
    pub fn new(id: usize, n_tets: usize) -> Self {
        let mut faces_pos = FaceTally::new(n_tets * TET_VERTICES);
        let mut faces_neg = FaceTally::new(n_tets * TET_VERTICES);
        let base = TET_VERTICES * (id / TET_EDGES);
        // Faces are named by their missing vertex: face 3 is 012, and so on.
        let (pos, neg): (&[usize], &[usize]) = match id % TET_EDGES {
            0 => (&[3, 2], &[]),
            1 => (&[1], &[3]),
            2 => (&[], &[2, 1]),
            3 => (&[3, 0], &[]),
            4 => (&[2], &[0]),
            _ => (&[1, 0], &[]),
        };
        for &f in pos {
            faces_pos.set(base + f, 1);
        }
        for &f in neg {
            faces_neg.set(base + f, 1);
        }
        Self {
            link: UnionLink::default(),
            size: 1,
            bounded: true,
            faces_pos,
            faces_neg,
        }
    }

    /// Whether some face lies on both sides of this class.
    pub fn has_cone(&self) -> bool {
        self.faces_pos.has_nonzero_match(&self.faces_neg)
    }

    /// Whether some face lies three times on one side of this class.
    pub fn has_l31(&self) -> bool {
        self.faces_pos.has_three() || self.faces_neg.has_three()
    }
}

impl Linked for TetEdgeState {
    fn link(&self) -> &UnionLink {
        &self.link
    }
    fn link_mut(&mut self) -> &mut UnionLink {
        &mut self.link
    }
}

/// Mutable references to two distinct elements.
fn pair_mut<T>(items: &mut [T], a: usize, b: usize) -> (&mut T, &mut T) {
    debug_assert!(a != b);
    if a < b {
        let (lo, hi) = items.split_at_mut(b);
        (&mut lo[a], &mut hi[0])
    } else {
        let (lo, hi) = items.split_at_mut(a);
        (&mut hi[0], &mut lo[b])
    }
}

/// Edge classes for a partial gluing of `n` tetrahedra.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeClassTracker {
    states: Vec<TetEdgeState>,
    log: UndoLog<Option<usize>>,
    n_classes: usize,
}

impl EdgeClassTracker {
    pub fn new(n_tets: usize) -> Self {
        let n_states = n_tets * TET_EDGES;
        Self {
            states: (0..n_states).map(|id| TetEdgeState::new(id, n_tets)).collect(),
            log: UndoLog::new(2 * n_tets),
            n_classes: n_states,
        }
    }

    pub(crate) fn from_parts(
        states: Vec<TetEdgeState>,
        log: UndoLog<Option<usize>>,
        n_classes: usize,
    ) -> Self {
        Self {
            states,
            log,
            n_classes,
        }
    }

    pub fn states(&self) -> &[TetEdgeState] {
        &self.states
    }

    pub fn log(&self) -> &UndoLog<Option<usize>> {
        &self.log
    }

    /// Number of edge classes.
    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    /// Root of tetrahedron edge `id` and its twist relative to that root.
    pub fn find(&self, id: usize) -> (usize, bool) {
        find(&self.states, id)
    }

    /// Apply the three edge identifications of one face gluing.
    ///
    /// Returns `true` if some edge is now identified with itself in reverse.
    pub fn merge(&mut self, step: &GluingStep) -> bool {
        let GluingStep {
            face,
            adj,
            perm,
            depth,
        } = *step;
        let v1 = face.facet;
        let w1 = perm.apply(v1);
        let mut invalid = false;
        for v2 in 0..TET_VERTICES {
            if v2 == v1 {
                continue;
            }
            let w2 = perm.apply(v2);
            // The edges opposite v1-v2 and w1-w2 lie in the glued faces.
            let e = opposite_edge(v1, v2);
            let f = opposite_edge(w1, w2);
            let slot = UndoLog::<Option<usize>>::slot(v2, depth);

            // Natural orientation runs from the smaller vertex to the larger.
            let [a, b] = EDGE_VERTEX[e];
            let has_twist = perm.apply(a) > perm.apply(b);

            let (e_rep, e_twist) = find(&self.states, e + TET_EDGES * face.simp);
            let (f_rep, f_twist) = find(&self.states, f + TET_EDGES * adj.simp);

            if e_rep == f_rep {
                self.states[e_rep].bounded = false;
                if has_twist ^ e_twist ^ f_twist {
                    invalid = true;
                }
                self.log.record(slot, None);
            } else {
                let (root, child) = unite(&mut self.states, e_rep, f_rep, has_twist ^ e_twist ^ f_twist);
                let (r, c) = pair_mut(&mut self.states, root, child);
                r.size += c.size;
                if c.link.twist_up {
                    r.faces_pos += &c.faces_neg;
                    r.faces_neg += &c.faces_pos;
                } else {
                    r.faces_pos += &c.faces_pos;
                    r.faces_neg += &c.faces_neg;
                }
                self.log.record(slot, Some(child));
                self.n_classes -= 1;
            }
        }
        invalid
    }

    /// Undo [`EdgeClassTracker::merge`] for the same step.
    pub fn split(&mut self, step: &GluingStep) {
        let v1 = step.face.facet;
        for v2 in (0..TET_VERTICES).rev() {
            if v2 == v1 {
                continue;
            }
            let e = opposite_edge(v1, v2);
            let slot = UndoLog::<Option<usize>>::slot(v2, step.depth);
            match self.log.take(slot) {
                None => {
                    let (root, _) = find(&self.states, e + TET_EDGES * step.face.simp);
                    self.states[root].bounded = true;
                }
                Some(child) => {
                    // The twist decides which sides were added; read it
                    // before detaching clears it.
                    let twisted = self.states[child].link.twist_up;
                    let root = detach(&mut self.states, child);
                    let (r, c) = pair_mut(&mut self.states, root, child);
                    r.size -= c.size;
                    if twisted {
                        r.faces_pos -= &c.faces_neg;
                        r.faces_neg -= &c.faces_pos;
                    } else {
                        r.faces_pos -= &c.faces_pos;
                        r.faces_neg -= &c.faces_neg;
                    }
                    self.n_classes += 1;
                }
            }
        }
    }

    fn roots(&self) -> impl Iterator<Item = &TetEdgeState> {
        self.states.iter().filter(|s| s.link.parent.is_none())
    }

    /// Whether some edge class has a face on both of its sides.
    pub fn has_cone(&self) -> bool {
        self.roots().any(TetEdgeState::has_cone)
    }

    /// Whether some edge class meets one face three times on one side.
    pub fn has_l31(&self) -> bool {
        self.roots().any(TetEdgeState::has_l31)
    }

    /// Tetrahedron edges in the class of edge `e` of tetrahedron `tet`.
    pub fn class_size(&self, tet: usize, e: usize) -> usize {
        let (root, _) = find(&self.states, e + TET_EDGES * tet);
        self.states[root].size
    }

    /// Differences from the freshly constructed state.
    pub fn rewind_violations(&self) -> Vec<String> {
        let n_tets = self.states.len() / TET_EDGES;
        let mut violations = Vec::new();
        if self.n_classes != self.states.len() {
            violations.push(format!("{} edge classes, expected {}", self.n_classes, self.states.len()));
        }
        for (id, s) in self.states.iter().enumerate() {
            if *s != TetEdgeState::new(id, n_tets) {
                violations.push(format!(
                    "edge state {} not restored: parent {:?}, rank {}, size {}, bounded {}",
                    id, s.link.parent, s.link.rank, s.size, s.bounded
                ));
            }
        }
        for (slot, value) in self.log.dirty_slots() {
            violations.push(format!("edge undo slot {} holds {:?}", slot, value));
        }
        violations
    }
}
