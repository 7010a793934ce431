// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Saving and restoring a searcher in mid-search.
//!
//! A paused searcher (see [`GluingSearcher::partial_search`]) is written as
//! plain text, one record per line, so that another process can load it and
//! search the subtree below it.
//!
//! # Layout
//!
//! ```text
//! e                                  tag
//! <face pairing text>
//! <4n permutation indices>
//! <o|.><s|.> <purge>                 orientable only, started, purge flags
//! <n orientations>
//! <order_elt> <order size>
//! <order as simp facet pairs>
//! <target Euler characteristic>
//! <vertex classes>
//! <4n vertex lines>                  15 integers each
//! <8n vertex undo codes>
//! <edge classes>
//! <6n edge lines>                    6 integers and two face tallies
//! <8n edge undo entries>
//! ```
//!
//! A vertex line is `parent rank bdry euler twist_up had_equal_rank
//! bdry_edges next0 next1 twist0 twist1 next_old0 next_old1 twist_old0
//! twist_old1`, with `-1` for an absent index. An edge line is `parent rank
//! size bounded twist_up had_equal_rank` followed by the positive and
//! negative face tallies as `4n` digits `0..3` each. Counters are not saved
//! and the automorphisms are recomputed from the pairing.

use std::fmt;
use std::str::Lines;

use crate::engine::{GluingPerms, GluingSearcher, PurgeFlags, SearchOptions};
use crate::error::{CensusError, Result};
use crate::geometry::{FaceSpec, TET_EDGES, TET_VERTICES};
use crate::pairing::FacePairing;
use crate::state::union_find::{Linked, UnionLink};
use crate::state::{EdgeClassTracker, FaceTally, TetEdgeState, TetVertexState, VertexJoin, VertexLinkTracker};
use crate::trail::UndoLog;

/// First line of a saved searcher.
pub const DUMP_TAG: &str = "e";

fn signed(index: Option<usize>) -> i64 {
    index.map_or(-1, |i| i as i64)
}

impl GluingSearcher {
    /// The searcher as text, in the layout described in this module.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.dump_to(&mut out);
        out
    }

    pub fn dump_to<W: fmt::Write>(&self, out: &mut W) -> fmt::Result {
        writeln!(out, "{}", DUMP_TAG)?;
        writeln!(out, "{}", self.pairing().to_text_rep())?;
        let perms: Vec<String> = self.perms().perm_indices().iter().map(i8::to_string).collect();
        writeln!(out, "{}", perms.join(" "))?;
        writeln!(
            out,
            "{}{} {}",
            if self.options().orientable_only { 'o' } else { '.' },
            if self.is_started() { 's' } else { '.' },
            self.options().purge
        )?;
        let orientation: Vec<String> = self.orientation().iter().map(i8::to_string).collect();
        writeln!(out, "{}", orientation.join(" "))?;
        writeln!(out, "{} {}", self.order_elt(), self.order().len())?;
        let order: Vec<String> = self
            .order()
            .iter()
            .map(|f| format!("{} {}", f.simp, f.facet))
            .collect();
        writeln!(out, "{}", order.join(" "))?;

        let vertices = self.vertices();
        writeln!(out, "{}", vertices.target_euler())?;
        writeln!(out, "{}", vertices.n_classes())?;
        for s in vertices.states() {
            let l = &s.link;
            writeln!(
                out,
                "{} {} {} {} {} {} {} {} {} {} {} {} {} {} {}",
                signed(l.parent),
                l.rank,
                s.bdry,
                s.euler,
                u8::from(l.twist_up),
                u8::from(l.had_equal_rank),
                s.bdry_edges,
                s.bdry_next[0],
                s.bdry_next[1],
                s.bdry_twist[0],
                s.bdry_twist[1],
                signed(s.bdry_next_old[0]),
                signed(s.bdry_next_old[1]),
                s.bdry_twist_old[0],
                s.bdry_twist_old[1]
            )?;
        }
        let codes: Vec<String> = vertices.log().iter().map(|j| j.code().to_string()).collect();
        writeln!(out, "{}", codes.join(" "))?;

        let edges = self.edges();
        writeln!(out, "{}", edges.n_classes())?;
        for s in edges.states() {
            let l = &s.link;
            writeln!(
                out,
                "{} {} {} {} {} {} {} {}",
                signed(l.parent),
                l.rank,
                s.size,
                u8::from(s.bounded),
                u8::from(l.twist_up),
                u8::from(l.had_equal_rank),
                s.faces_pos,
                s.faces_neg
            )?;
        }
        let entries: Vec<String> = edges.log().iter().map(|e| signed(e).to_string()).collect();
        writeln!(out, "{}", entries.join(" "))
    }

    /// Load a searcher written by [`GluingSearcher::dump`].
    ///
    /// Every value is range checked; the first bad one is reported and
    /// nothing is built.
    pub fn from_dump(text: &str) -> Result<Self> {
        let mut r = Reader {
            lines: text.lines(),
        };

        let tag = r.line("tag")?.trim();
        if tag != DUMP_TAG {
            return Err(CensusError::UnknownTag {
                tag: tag.to_string(),
            });
        }

        let pairing = FacePairing::from_text_rep(r.line("face pairing")?)
            .map_err(|err| invalid("face pairing", err.to_string()))?;
        pairing
            .require_connected()
            .map_err(|err| invalid("face pairing", err.to_string()))?;
        let n = pairing.size();
        let n_vertices = n * TET_VERTICES;
        let n_edges = n * TET_EDGES;
        let log_len = 2 * n * UndoLog::<VertexJoin>::SLOTS_PER_STEP;

        let perm_index = r
            .tokens("permutation indices", n_vertices)?
            .into_iter()
            .map(|t| int(t, "permutation indices", -2, 5).map(|v| v as i8))
            .collect::<Result<Vec<_>>>()?;

        let flags = r.tokens("flags", 2)?;
        let (orientable_only, started) = match flags[0] {
            "o." => (true, false),
            "os" => (true, true),
            ".." => (false, false),
            ".s" => (false, true),
            other => return Err(invalid("flags", format!("unknown flags {:?}", other))),
        };
        let purge = PurgeFlags::from_bits(int(flags[1], "purge flags", 0, 255)? as u8)
            .ok_or_else(|| invalid("purge flags", format!("unknown bits in {}", flags[1])))?;

        let orientation = r
            .tokens("orientation", n)?
            .into_iter()
            .map(|t| int(t, "orientation", -1, 1).map(|v| v as i8))
            .collect::<Result<Vec<_>>>()?;

        let header = r.tokens("order", 2)?;
        let order_size = int(header[1], "order", 0, 2 * n as i64)? as usize;
        let order_elt = int(header[0], "order", 0, order_size as i64)? as usize;
        let order_tokens = r.tokens("order", 2 * order_size)?;
        let mut order = Vec::with_capacity(order_size);
        for pair in order_tokens.chunks(2) {
            let face = FaceSpec::new(
                int(pair[0], "order", 0, n as i64 - 1)? as usize,
                int(pair[1], "order", 0, TET_VERTICES as i64 - 1)? as usize,
            );
            if pairing.is_unmatched(face) {
                return Err(invalid("order", format!("face {} is not matched", face)));
            }
            order.push(face);
        }

        let target_euler = int(r.line("target Euler characteristic")?.trim(), "target Euler characteristic", i64::MIN, 2)?;
        let n_vertex_classes = int(r.line("vertex classes")?.trim(), "vertex classes", 0, n_vertices as i64)? as usize;
        let mut vertex_states = Vec::with_capacity(n_vertices);
        for _ in 0..n_vertices {
            vertex_states.push(read_vertex(&r.tokens("vertex state", 15)?, n_vertices)?);
        }
        check_forest(&vertex_states, "vertex state")?;
        let mut vertex_log = UndoLog::new(2 * n);
        for (slot, t) in r.tokens("vertex undo log", log_len)?.into_iter().enumerate() {
            let join = VertexJoin::from_code(int(t, "vertex undo log", -4, n_vertices as i64 - 1)?)
                .ok_or_else(|| invalid("vertex undo log", format!("bad code {}", t)))?;
            vertex_log.set_raw(slot, join);
        }

        let n_edge_classes = int(r.line("edge classes")?.trim(), "edge classes", 0, n_edges as i64)? as usize;
        let mut edge_states = Vec::with_capacity(n_edges);
        for _ in 0..n_edges {
            edge_states.push(read_edge(&r.tokens("edge state", 8)?, n_edges, n_vertices)?);
        }
        check_forest(&edge_states, "edge state")?;
        let mut edge_log = UndoLog::new(2 * n);
        for (slot, t) in r.tokens("edge undo log", log_len)?.into_iter().enumerate() {
            let entry = int(t, "edge undo log", -1, n_edges as i64 - 1)?;
            edge_log.set_raw(slot, usize::try_from(entry).ok());
        }

        let options = SearchOptions {
            orientable_only,
            target_euler,
            purge,
        };
        Ok(GluingSearcher::from_parts(
            GluingPerms::from_parts(pairing, perm_index),
            options,
            order,
            order_elt,
            orientation,
            started,
            VertexLinkTracker::from_parts(vertex_states, vertex_log, n_vertex_classes, target_euler),
            EdgeClassTracker::from_parts(edge_states, edge_log, n_edge_classes),
        ))
    }
}

struct Reader<'a> {
    lines: Lines<'a>,
}

impl<'a> Reader<'a> {
    fn line(&mut self, field: &'static str) -> Result<&'a str> {
        self.lines.next().ok_or(CensusError::UnexpectedEnd { field })
    }

    /// The next line, which must hold exactly `count` tokens.
    fn tokens(&mut self, field: &'static str, count: usize) -> Result<Vec<&'a str>> {
        let tokens: Vec<&str> = self.line(field)?.split_whitespace().collect();
        if tokens.len() < count {
            return Err(CensusError::UnexpectedEnd { field });
        }
        if tokens.len() > count {
            return Err(invalid(field, format!("{} values, expected {}", tokens.len(), count)));
        }
        Ok(tokens)
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> CensusError {
    CensusError::InvalidData {
        field,
        reason: reason.into(),
    }
}

/// An integer in `lo..=hi`.
fn int(token: &str, field: &'static str, lo: i64, hi: i64) -> Result<i64> {
    match token.parse::<i64>() {
        Ok(v) if (lo..=hi).contains(&v) => Ok(v),
        Ok(v) => Err(invalid(field, format!("{} out of range {}..={}", v, lo, hi))),
        Err(_) => Err(invalid(field, format!("{:?} is not an integer", token))),
    }
}

fn bit(token: &str, field: &'static str) -> Result<u8> {
    int(token, field, 0, 1).map(|v| v as u8)
}

/// An index below `len`, or `-1` for none.
fn index(token: &str, field: &'static str, len: usize) -> Result<Option<usize>> {
    int(token, field, -1, len as i64 - 1).map(|v| usize::try_from(v).ok())
}

fn read_vertex(t: &[&str], n_vertices: usize) -> Result<TetVertexState> {
    const F: &str = "vertex state";
    let required = |token: &str| -> Result<usize> { int(token, F, 0, n_vertices as i64 - 1).map(|v| v as usize) };
    Ok(TetVertexState {
        link: UnionLink {
            parent: index(t[0], F, n_vertices)?,
            rank: required(t[1])?,
            twist_up: bit(t[4], F)? != 0,
            had_equal_rank: bit(t[5], F)? != 0,
        },
        bdry: int(t[2], F, 0, 3 * n_vertices as i64)? as usize,
        euler: int(t[3], F, i64::MIN, 2)?,
        bdry_edges: int(t[6], F, 0, 3)? as u8,
        bdry_next: [required(t[7])?, required(t[8])?],
        bdry_twist: [bit(t[9], F)?, bit(t[10], F)?],
        bdry_next_old: [index(t[11], F, n_vertices)?, index(t[12], F, n_vertices)?],
        bdry_twist_old: [bit(t[13], F)?, bit(t[14], F)?],
    })
}

fn read_edge(t: &[&str], n_edges: usize, n_faces: usize) -> Result<TetEdgeState> {
    const F: &str = "edge state";
    let tally = |token: &str| -> Result<FaceTally> {
        if token.len() != n_faces {
            return Err(invalid(F, format!("face tally {:?} should have {} digits", token, n_faces)));
        }
        FaceTally::from_digits(token).ok_or_else(|| invalid(F, format!("bad face tally {:?}", token)))
    };
    Ok(TetEdgeState {
        link: UnionLink {
            parent: index(t[0], F, n_edges)?,
            rank: int(t[1], F, 0, n_edges as i64 - 1)? as usize,
            twist_up: bit(t[4], F)? != 0,
            had_equal_rank: bit(t[5], F)? != 0,
        },
        size: int(t[2], F, 1, n_edges as i64)? as usize,
        bounded: bit(t[3], F)? != 0,
        faces_pos: tally(t[6])?,
        faces_neg: tally(t[7])?,
    })
}

/// Every parent chain must reach a root.
fn check_forest<S: Linked>(states: &[S], field: &'static str) -> Result<()> {
    for start in 0..states.len() {
        let mut x = start;
        let mut steps = 0;
        while let Some(parent) = states[x].link().parent {
            steps += 1;
            if parent == x || steps > states.len() {
                return Err(invalid(field, format!("parent chain from {} never reaches a root", start)));
            }
            x = parent;
        }
    }
    Ok(())
}
