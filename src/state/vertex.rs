// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Incremental vertex links.
//!
//! Before any gluing, the link of each of the `4n` tetrahedron vertices is a
//! single triangle with three boundary edges. Gluing two faces identifies
//! three pairs of link edges, and [`VertexLinkTracker::merge`] applies those
//! identifications one at a time, keeping for every class of tetrahedron
//! vertices:
//!
//! - the number of boundary edges `bdry` of the link surface;
//! - its Euler characteristic `euler`, counted as if every boundary cycle
//!   were capped off with a disc;
//! - the boundary cycles themselves, as circular doubly-linked lists
//!   threaded through the tetrahedron vertices that still have boundary
//!   edges, with a twist bit on every link.
//!
//! A tetrahedron vertex whose link triangle has two boundary edges left is a
//! single node covering both edges, so its neighbours are the far ends of
//! that run. When a gluing takes it from two boundary edges straight to none
//! its neighbour slots are overwritten; they are saved in the `*_old` slots
//! first, and only then.
//!
//! # Euler bookkeeping
//!
//! | join | effect on the link | `euler` |
//! |------|--------------------|---------|
//! | two classes | surfaces glued along an edge | sum − 2 |
//! | bridge | cycle split or closed, orientation kept | unchanged |
//! | twist | cross-cap added | − 1 |
//! | handle | two cycles merged | − 2 |

use std::fmt::Write as _;
use std::ops::{BitOr, BitOrAssign};

use tracing::warn;

use crate::geometry::{FaceSpec, TET_VERTICES, VERTEX_LINK_NEXT_FACE, VERTEX_LINK_PREV_FACE};
use crate::state::union_find::{detach, find, unite, Linked, UnionLink};
use crate::state::GluingStep;
use crate::trail::{LogEntry, UndoLog};

/// What one vertex identification did, as recorded in the undo log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexJoin {
    /// Nothing recorded.
    Init,
    /// Two boundary cycles of one link merged.
    Handle,
    /// Orientation-preserving join within one boundary cycle.
    Bridge,
    /// Orientation-reversing join within one boundary cycle.
    Twist,
    /// Two classes merged; the payload is the root that was absorbed.
    Absorbed(usize),
}

impl LogEntry for VertexJoin {
    const INIT: Self = VertexJoin::Init;
}

impl VertexJoin {
    /// Integer code used in saved searches: class indices are non-negative,
    /// the markers are `-1..=-4`.
    pub fn code(self) -> i64 {
        match self {
            VertexJoin::Init => -1,
            VertexJoin::Handle => -2,
            VertexJoin::Bridge => -3,
            VertexJoin::Twist => -4,
            VertexJoin::Absorbed(child) => child as i64,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            -1 => Some(VertexJoin::Init),
            -2 => Some(VertexJoin::Handle),
            -3 => Some(VertexJoin::Bridge),
            -4 => Some(VertexJoin::Twist),
            c if c >= 0 => Some(VertexJoin::Absorbed(c as usize)),
            _ => None,
        }
    }

    fn within_cycle(twisted: u8) -> Self {
        if twisted != 0 {
            VertexJoin::Twist
        } else {
            VertexJoin::Bridge
        }
    }
}

/// Outcome flags of a vertex merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkStatus(u8);

impl LinkStatus {
    pub const NONE: LinkStatus = LinkStatus(0);
    /// Some link was closed off.
    pub const CLOSED: LinkStatus = LinkStatus(1);
    /// Some link can no longer reach the target Euler characteristic.
    pub const BAD_EULER: LinkStatus = LinkStatus(2);

    #[inline]
    pub fn contains(self, other: LinkStatus) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn bits(self) -> u8 {
        self.0
    }
}

impl BitOr for LinkStatus {
    type Output = LinkStatus;
    fn bitor(self, rhs: LinkStatus) -> LinkStatus {
        LinkStatus(self.0 | rhs.0)
    }
}

impl BitOrAssign for LinkStatus {
    fn bitor_assign(&mut self, rhs: LinkStatus) {
        self.0 |= rhs.0;
    }
}

/// State of one tetrahedron vertex, `v + 4 * tet`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TetVertexState {
    pub link: UnionLink,
    /// Boundary edges of the whole link surface (roots only).
    pub bdry: usize,
    /// Euler characteristic of the capped link surface (roots only).
    pub euler: i64,
    /// Edges of this vertex's own link triangle still on the boundary.
    pub bdry_edges: u8,
    /// Neighbours along the boundary cycle, at ends 0 and 1.
    pub bdry_next: [usize; 2],
    /// Whether each neighbour is traversed in the opposite direction.
    pub bdry_twist: [u8; 2],
    pub bdry_next_old: [Option<usize>; 2],
    pub bdry_twist_old: [u8; 2],
}

impl TetVertexState {
    /// A lone link triangle.
    pub fn new(id: usize) -> Self {
        Self {
            link: UnionLink::default(),
            bdry: 3,
            euler: 2,
            bdry_edges: 3,
            bdry_next: [id, id],
            bdry_twist: [0, 0],
            bdry_next_old: [None, None],
            bdry_twist_old: [0, 0],
        }
    }
}

impl Linked for TetVertexState {
    fn link(&self) -> &UnionLink {
        &self.link
    }
    fn link_mut(&mut self) -> &mut UnionLink {
        &mut self.link
    }
}

/// Vertex link classes for a partial gluing of `n` tetrahedra.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexLinkTracker {
    states: Vec<TetVertexState>,
    log: UndoLog<VertexJoin>,
    n_classes: usize,
    target_euler: i64,
}

impl VertexLinkTracker {
    /// `4n` lone link triangles, with every link required to end up with
    /// Euler characteristic `target_euler`.
    pub fn new(n_tets: usize, target_euler: i64) -> Self {
        let n_states = n_tets * TET_VERTICES;
        Self {
            states: (0..n_states).map(TetVertexState::new).collect(),
            log: UndoLog::new(2 * n_tets),
            n_classes: n_states,
            target_euler,
        }
    }

    pub(crate) fn from_parts(
        states: Vec<TetVertexState>,
        log: UndoLog<VertexJoin>,
        n_classes: usize,
        target_euler: i64,
    ) -> Self {
        Self {
            states,
            log,
            n_classes,
            target_euler,
        }
    }

    pub fn states(&self) -> &[TetVertexState] {
        &self.states
    }

    pub fn log(&self) -> &UndoLog<VertexJoin> {
        &self.log
    }

    /// Number of vertex classes.
    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    pub fn target_euler(&self) -> i64 {
        self.target_euler
    }

    /// Root of tetrahedron vertex `id` and its twist relative to that root.
    pub fn find(&self, id: usize) -> (usize, bool) {
        find(&self.states, id)
    }

    /// Apply the three vertex identifications of one face gluing.
    ///
    /// `perm_index` holds the current gluing index of every face, negative
    /// for faces not yet glued.
    pub fn merge(&mut self, step: &GluingStep, perm_index: &[i8]) -> LinkStatus {
        let GluingStep {
            face,
            adj,
            perm,
            depth,
        } = *step;
        let mut status = LinkStatus::NONE;
        for v in 0..TET_VERTICES {
            if v == face.facet {
                continue;
            }
            let w = perm.apply(v);
            let v_idx = v + TET_VERTICES * face.simp;
            let w_idx = w + TET_VERTICES * adj.simp;
            let slot = UndoLog::<VertexJoin>::slot(v, depth);

            // Do the natural 012 orientations of the two link edges disagree?
            let mut has_twist: u8 = if perm.sign() < 0 { 0 } else { 1 };
            if (v == 3) != (w == 3) {
                has_twist ^= 1;
            }

            let (v_rep, v_twist) = find(&self.states, v_idx);
            let (w_rep, w_twist) = find(&self.states, w_idx);

            if v_rep == w_rep {
                self.states[v_rep].bdry -= 2;
                let join = if v_idx == w_idx {
                    self.fold(v_idx, has_twist)
                } else {
                    self.join_within(v_idx, w_idx, has_twist, step, v, w, perm_index)
                };
                match join {
                    VertexJoin::Twist => self.states[v_rep].euler -= 1,
                    VertexJoin::Handle => self.states[v_rep].euler -= 2,
                    _ => {}
                }
                self.log.record(slot, join);
                status |= self.status_of(v_rep);
            } else {
                let twist = (has_twist != 0) ^ v_twist ^ w_twist;
                let (root, child) = unite(&mut self.states, v_rep, w_rep, twist);
                let (child_bdry, child_euler) = (self.states[child].bdry, self.states[child].euler);
                let r = &mut self.states[root];
                r.bdry = r.bdry + child_bdry - 2;
                r.euler = r.euler + child_euler - 2;
                status |= self.status_of(root);
                self.log.record(slot, VertexJoin::Absorbed(child));
                self.n_classes -= 1;

                self.join_across(v_idx, w_idx, has_twist, step, v, w, perm_index);
            }
        }
        status
    }

    /// Undo [`VertexLinkTracker::merge`] for the same step.
    pub fn split(&mut self, step: &GluingStep) {
        let GluingStep {
            face,
            adj,
            perm,
            depth,
        } = *step;
        for v in (0..TET_VERTICES).rev() {
            if v == face.facet {
                continue;
            }
            let w = perm.apply(v);
            let v_idx = v + TET_VERTICES * face.simp;
            let w_idx = w + TET_VERTICES * adj.simp;
            let slot = UndoLog::<VertexJoin>::slot(v, depth);

            match self.log.take(slot) {
                VertexJoin::Absorbed(child) => {
                    let root = detach(&mut self.states, child);
                    let (child_bdry, child_euler) =
                        (self.states[child].bdry, self.states[child].euler);
                    let r = &mut self.states[root];
                    r.bdry = r.bdry + 2 - child_bdry;
                    r.euler = r.euler + 2 - child_euler;
                    self.n_classes += 1;
                }
                join => {
                    let (root, _) = find(&self.states, v_idx);
                    let r = &mut self.states[root];
                    r.bdry += 2;
                    match join {
                        VertexJoin::Handle => r.euler += 2,
                        VertexJoin::Twist => r.euler += 1,
                        _ => {}
                    }
                }
            }

            if v_idx == w_idx {
                self.states[v_idx].bdry_edges += 2;
                if self.states[v_idx].bdry_edges == 2 {
                    self.fix_adjacent(v_idx);
                }
            } else {
                self.states[w_idx].bdry_edges += 1;
                self.states[v_idx].bdry_edges += 1;
                self.restore_cycle(w_idx);
                self.restore_cycle(v_idx);
            }
        }
    }

    fn status_of(&self, root: usize) -> LinkStatus {
        let r = &self.states[root];
        if r.bdry == 0 {
            if r.euler != self.target_euler {
                LinkStatus::CLOSED | LinkStatus::BAD_EULER
            } else {
                LinkStatus::CLOSED
            }
        } else if r.euler < self.target_euler {
            LinkStatus::BAD_EULER
        } else {
            LinkStatus::NONE
        }
    }

    /// Two adjacent edges of a single link triangle are glued together.
    fn fold(&mut self, id: usize, has_twist: u8) -> VertexJoin {
        let s = self.states[id];
        // Going from two edges to none never overwrites the neighbour
        // slots, so no backup is needed.
        if s.bdry_edges < 3 && s.bdry_next[0] != id {
            self.excise(id);
        }
        self.states[id].bdry_edges -= 2;
        VertexJoin::within_cycle(has_twist)
    }

    /// Two different tetrahedron vertices of the same link class.
    #[allow(clippy::too_many_arguments)]
    fn join_within(
        &mut self,
        v_idx: usize,
        w_idx: usize,
        has_twist: u8,
        step: &GluingStep,
        v: usize,
        w: usize,
        perm_index: &[i8],
    ) -> VertexJoin {
        self.backup_if_two(v_idx);
        self.backup_if_two(w_idx);

        let join = if self.is_length_one(v_idx) {
            if !self.is_length_one(w_idx) && self.states[w_idx].bdry_edges == 1 {
                self.excise(w_idx);
            }
            VertexJoin::Handle
        } else if self.is_length_one(w_idx) {
            if self.states[v_idx].bdry_edges == 1 {
                self.excise(v_idx);
            }
            VertexJoin::Handle
        } else if self.is_length_two(v_idx, w_idx) {
            VertexJoin::within_cycle(has_twist ^ self.states[v_idx].bdry_twist[0])
        } else {
            let (v_next, v_tw) = self.neighbours(v_idx, step.face.simp, v, step.face.facet, step, perm_index);
            let (w_next, w_tw) = self.neighbours(w_idx, step.adj.simp, w, step.adj.facet, step, perm_index);

            if v_next[0] == w_idx && w_next[(1 ^ v_tw[0]) as usize] == v_idx {
                // Adjacent along end 0 of v: the two edges simply vanish.
                let e = v_tw[0] as usize;
                self.join(v_next[1], v_tw[1], w_next[e], (v_tw[0] ^ w_tw[e]) ^ v_tw[1]);
                VertexJoin::within_cycle(has_twist ^ v_tw[0])
            } else if v_next[1] == w_idx && w_next[v_tw[1] as usize] == v_idx {
                let e = (1 ^ v_tw[1]) as usize;
                self.join(v_next[0], 1 ^ v_tw[0], w_next[e], (v_tw[1] ^ w_tw[e]) ^ v_tw[0]);
                VertexJoin::within_cycle(has_twist ^ v_tw[1])
            } else {
                let (reached, twist) = self.walk_cycle(v_idx, w_idx);
                let join = if reached == v_idx {
                    VertexJoin::Handle
                } else {
                    VertexJoin::within_cycle(has_twist ^ twist)
                };
                self.splice(v_next, v_tw, w_next, w_tw, has_twist);
                join
            }
        };

        self.states[v_idx].bdry_edges -= 1;
        self.states[w_idx].bdry_edges -= 1;
        join
    }

    /// Boundary cycles of two different link classes meet at the glued edge.
    #[allow(clippy::too_many_arguments)]
    fn join_across(
        &mut self,
        v_idx: usize,
        w_idx: usize,
        has_twist: u8,
        step: &GluingStep,
        v: usize,
        w: usize,
        perm_index: &[i8],
    ) {
        self.backup_if_two(v_idx);
        self.backup_if_two(w_idx);

        if self.is_length_one(v_idx) {
            if !self.is_length_one(w_idx) && self.states[w_idx].bdry_edges == 1 {
                self.excise(w_idx);
            }
        } else if self.is_length_one(w_idx) {
            if self.states[v_idx].bdry_edges == 1 {
                self.excise(v_idx);
            }
        } else {
            let (v_next, v_tw) = self.neighbours(v_idx, step.face.simp, v, step.face.facet, step, perm_index);
            let (w_next, w_tw) = self.neighbours(w_idx, step.adj.simp, w, step.adj.facet, step, perm_index);
            self.splice(v_next, v_tw, w_next, w_tw, has_twist);
        }

        self.states[v_idx].bdry_edges -= 1;
        self.states[w_idx].bdry_edges -= 1;
    }

    /// Put back the neighbour links of `id` after its count was incremented.
    fn restore_cycle(&mut self, id: usize) {
        match self.states[id].bdry_edges {
            3 => {
                let s = &mut self.states[id];
                s.bdry_next = [id, id];
                s.bdry_twist = [0, 0];
            }
            2 => {
                let s = &mut self.states[id];
                s.bdry_next = [
                    s.bdry_next_old[0].unwrap_or(id),
                    s.bdry_next_old[1].unwrap_or(id),
                ];
                s.bdry_twist = s.bdry_twist_old;
                self.fix_adjacent(id);
            }
            1 => self.fix_adjacent(id),
            _ => {}
        }
    }

    /// Link `id` at `end` to `adj`, and `adj` back to `id`.
    #[inline]
    fn join(&mut self, id: usize, end: u8, adj: usize, twist: u8) {
        self.states[id].bdry_next[end as usize] = adj;
        self.states[id].bdry_twist[end as usize] = twist;
        let back = ((end ^ 1) ^ twist) as usize;
        self.states[adj].bdry_next[back] = id;
        self.states[adj].bdry_twist[back] = twist;
    }

    /// Remove `id` from its cycle by joining its two neighbours.
    fn excise(&mut self, id: usize) {
        let s = self.states[id];
        self.join(
            s.bdry_next[0],
            1 ^ s.bdry_twist[0],
            s.bdry_next[1],
            s.bdry_twist[0] ^ s.bdry_twist[1],
        );
    }

    /// Point both neighbours of `id` back at `id`.
    fn fix_adjacent(&mut self, id: usize) {
        let s = self.states[id];
        if s.bdry_next[0] == id {
            return;
        }
        let e0 = (1 ^ s.bdry_twist[0]) as usize;
        self.states[s.bdry_next[0]].bdry_next[e0] = id;
        self.states[s.bdry_next[0]].bdry_twist[e0] = s.bdry_twist[0];
        let e1 = s.bdry_twist[1] as usize;
        self.states[s.bdry_next[1]].bdry_next[e1] = id;
        self.states[s.bdry_next[1]].bdry_twist[e1] = s.bdry_twist[1];
    }

    /// Join the cycles through `v` and `w` at the glued edge, in both directions.
    fn splice(&mut self, v_next: [usize; 2], v_tw: [u8; 2], w_next: [usize; 2], w_tw: [u8; 2], has_twist: u8) {
        let h = has_twist as usize;
        self.join(v_next[0], 1 ^ v_tw[0], w_next[1 ^ h], v_tw[0] ^ (has_twist ^ w_tw[1 ^ h]));
        self.join(v_next[1], v_tw[1], w_next[h], v_tw[1] ^ (has_twist ^ w_tw[h]));
    }

    fn backup_if_two(&mut self, id: usize) {
        let s = &mut self.states[id];
        if s.bdry_edges == 2 {
            s.bdry_next_old = [Some(s.bdry_next[0]), Some(s.bdry_next[1])];
            s.bdry_twist_old = s.bdry_twist;
        }
    }

    fn is_length_one(&self, id: usize) -> bool {
        let s = &self.states[id];
        s.bdry_next[0] == id && s.bdry_edges == 1
    }

    fn is_length_two(&self, a: usize, b: usize) -> bool {
        let (sa, sb) = (&self.states[a], &self.states[b]);
        sa.bdry_next == [b, b] && sa.bdry_edges == 1 && sb.bdry_edges == 1
    }

    /// Follow the cycle from end 0 of `v` until it meets `v` or `w`,
    /// returning where it stopped and the accumulated twist.
    fn walk_cycle(&self, v: usize, w: usize) -> (usize, u8) {
        let mut at = self.states[v].bdry_next[0];
        let mut twist = self.states[v].bdry_twist[0];
        while at != v && at != w {
            let s = &self.states[at];
            let next = s.bdry_next[twist as usize];
            twist ^= s.bdry_twist[twist as usize];
            at = next;
        }
        (at, twist)
    }

    /// Neighbours of the link edge of `id` lying in face `bdry_face` of
    /// tetrahedron `tet`, as seen from that single edge.
    fn neighbours(
        &self,
        id: usize,
        tet: usize,
        vertex: usize,
        bdry_face: usize,
        step: &GluingStep,
        perm_index: &[i8],
    ) -> ([usize; 2], [u8; 2]) {
        let s = &self.states[id];
        let next_face = VERTEX_LINK_NEXT_FACE[vertex][bdry_face] as usize;
        let prev_face = VERTEX_LINK_PREV_FACE[vertex][bdry_face] as usize;
        let glued = |facet: usize| perm_index[FaceSpec::new(tet, facet).index()] >= 0;
        let forward = ([s.bdry_next[0], id], [s.bdry_twist[0], 0]);
        let backward = ([id, s.bdry_next[1]], [0, s.bdry_twist[1]]);
        match s.bdry_edges {
            3 => ([id, id], [0, 0]),
            2 => {
                if !glued(next_face) {
                    forward
                } else if !glued(prev_face) {
                    backward
                } else {
                    // A tetrahedron glued to itself: the missing boundary
                    // edge belongs to the other face of the current gluing.
                    let ghost = if bdry_face == step.face.facet {
                        step.adj.facet
                    } else {
                        step.face.facet
                    };
                    if next_face == ghost {
                        forward
                    } else {
                        if prev_face != ghost {
                            warn!(id, "inconsistent vertex link boundary information");
                        }
                        backward
                    }
                }
            }
            _ => (s.bdry_next, s.bdry_twist),
        }
    }

    /// Every inconsistency in the boundary cycles, as text.
    pub fn consistency_errors(&self) -> Vec<String> {
        let mut errors = Vec::new();
        for (id, s) in self.states.iter().enumerate() {
            if s.bdry_edges == 0 {
                continue;
            }
            for end in 0..2 {
                let adj = s.bdry_next[end];
                let back = (1 ^ end) ^ s.bdry_twist[end] as usize;
                if self.states[adj].bdry_edges == 0 {
                    errors.push(format!("vertex link boundary {}/{} runs into an internal vertex", id, end));
                }
                if self.states[adj].bdry_next[back] != id {
                    errors.push(format!("vertex link boundary {}/{} has a mismatched adjacency", id, end));
                }
                if self.states[adj].bdry_twist[back] != s.bdry_twist[end] {
                    errors.push(format!("vertex link boundary {}/{} has a mismatched twist", id, end));
                }
            }
        }
        errors
    }

    /// The boundary cycles as `prev-id-next [edges]`, `~` marking a twist.
    pub fn vtx_bdry_dump(&self) -> String {
        let mark = |t: u8| if t != 0 { '~' } else { '-' };
        let mut out = String::new();
        for (id, s) in self.states.iter().enumerate() {
            if id > 0 {
                out.push(' ');
            }
            let _ = write!(
                out,
                "{}{}{}{}{} [{}]",
                s.bdry_next[0],
                mark(s.bdry_twist[0]),
                id,
                mark(s.bdry_twist[1]),
                s.bdry_next[1],
                s.bdry_edges
            );
        }
        out
    }

    /// Differences from the freshly constructed state.
    pub fn rewind_violations(&self) -> Vec<String> {
        let mut violations = Vec::new();
        if self.n_classes != self.states.len() {
            violations.push(format!("{} vertex classes, expected {}", self.n_classes, self.states.len()));
        }
        for (id, s) in self.states.iter().enumerate() {
            let fresh = TetVertexState::new(id);
            if s.link != fresh.link
                || s.bdry != fresh.bdry
                || s.euler != fresh.euler
                || s.bdry_edges != fresh.bdry_edges
                || s.bdry_next != fresh.bdry_next
                || s.bdry_twist != fresh.bdry_twist
            {
                violations.push(format!("vertex state {} not restored: {:?}", id, s));
            }
        }
        for (slot, value) in self.log.dirty_slots() {
            violations.push(format!("vertex undo slot {} holds {:?}", slot, value));
        }
        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Perm4;

    /// Gluing with perm index `idx` from `face` to `adj`, as the searcher builds it.
    fn step(face: FaceSpec, adj: FaceSpec, idx: usize, depth: usize) -> GluingStep {
        GluingStep::new(face, adj, idx, depth)
    }

    fn indices(n: usize, set: &[(FaceSpec, i8)]) -> Vec<i8> {
        let mut v = vec![-1; 4 * n];
        for &(f, i) in set {
            v[f.index()] = i;
        }
        v
    }

    #[test]
    fn test_join_codes() {
        for join in [
            VertexJoin::Init,
            VertexJoin::Handle,
            VertexJoin::Bridge,
            VertexJoin::Twist,
            VertexJoin::Absorbed(7),
        ] {
            assert_eq!(VertexJoin::from_code(join.code()), Some(join));
        }
        assert_eq!(VertexJoin::from_code(-5), None);
    }

    #[test]
    fn test_fresh_tracker() {
        let t = VertexLinkTracker::new(2, 2);
        assert_eq!(t.n_classes(), 8);
        assert!(t.consistency_errors().is_empty());
        assert!(t.rewind_violations().is_empty());
        assert!(t.vtx_bdry_dump().starts_with("0-0-0 [3] 1-1-1 [3]"));
    }

    #[test]
    fn test_gluing_two_tetrahedra_merges_three_classes() {
        let mut t = VertexLinkTracker::new(2, 2);
        let face = FaceSpec::new(0, 0);
        let adj = FaceSpec::new(1, 0);
        let s = step(face, adj, 0, 0);
        let perm_index = indices(2, &[(face, 0), (adj, 0)]);
        let status = t.merge(&s, &perm_index);
        assert_eq!(status, LinkStatus::NONE);
        assert_eq!(t.n_classes(), 5);
        assert!(t.consistency_errors().is_empty());
        for v in 1..4 {
            let (root, _) = t.find(v);
            assert_eq!(t.states()[root].bdry, 4);
            assert_eq!(t.states()[root].euler, 2);
        }
        t.split(&s);
        assert!(t.rewind_violations().is_empty());
    }

    #[test]
    fn test_orientable_self_gluing_merges_every_vertex() {
        // Face 0 to face 1 of one tetrahedron by the odd gluing 0123 -> 1230.
        let mut t = VertexLinkTracker::new(1, 2);
        let face = FaceSpec::new(0, 0);
        let adj = FaceSpec::new(0, 1);
        let s = step(face, adj, 1, 0);
        assert_eq!(s.perm, Perm4::from_images([1, 2, 3, 0]).unwrap());
        let perm_index = indices(1, &[(face, 1), (adj, 1)]);
        assert_eq!(t.merge(&s, &perm_index), LinkStatus::NONE);
        assert_eq!(t.n_classes(), 1);
        assert!(t.consistency_errors().is_empty());
        t.split(&s);
        assert!(t.rewind_violations().is_empty());
    }

    #[test]
    fn test_twisted_fold_breaks_sphere_links() {
        // The even gluing 0123 -> 1320 folds the link of vertex 2 onto
        // itself with a twist, leaving a cross-cap.
        let mut t = VertexLinkTracker::new(1, 2);
        let face = FaceSpec::new(0, 0);
        let adj = FaceSpec::new(0, 1);
        let s = step(face, adj, 0, 0);
        assert_eq!(s.perm, Perm4::from_images([1, 3, 2, 0]).unwrap());
        let perm_index = indices(1, &[(face, 0), (adj, 0)]);
        let status = t.merge(&s, &perm_index);
        assert!(status.contains(LinkStatus::BAD_EULER));
        assert_eq!(t.states()[2].euler, 1);
        assert_eq!(t.log().get(2), VertexJoin::Twist);
        assert!(t.consistency_errors().is_empty());
        t.split(&s);
        assert!(t.rewind_violations().is_empty());
        assert!(t.consistency_errors().is_empty());
    }

    #[test]
    fn test_status_flags_combine() {
        let s = LinkStatus::CLOSED | LinkStatus::BAD_EULER;
        assert!(s.contains(LinkStatus::CLOSED));
        assert!(s.contains(LinkStatus::BAD_EULER));
        assert!(!LinkStatus::CLOSED.contains(LinkStatus::BAD_EULER));
        assert_eq!(s.bits(), 3);
    }
}
