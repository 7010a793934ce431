// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Statistics
//!
//! Counters kept by a gluing search. They are readable after a run and are
//! logged when the search finishes.

use std::fmt;

use strum::{EnumCount, IntoEnumIterator};
use strum_macros::{EnumCount as EnumCountMacro, EnumIter, IntoStaticStr};

#[derive(Debug, EnumCountMacro, EnumIter, IntoStaticStr, Copy, Clone, PartialEq, Eq)]
#[strum(serialize_all = "snake_case")]
#[repr(u8)]
pub enum Counters {
    /// Gluing permutations tried.
    Nodes,
    /// Gluings rejected for identifying an edge with itself in reverse.
    InvalidEdges,
    /// Gluings rejected because a vertex link missed its Euler characteristic.
    BadEuler,
    /// Complete assignments reached.
    CompleteAssignments,
    /// Complete assignments rejected as non-canonical.
    CanonicalRejects,
    /// Triangulations passed to the callback.
    Emitted,
    /// Paused partial searches passed to the callback.
    PartialEmitted,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Statistics {
    stats: [u64; Counters::COUNT],
}

impl Statistics {
    pub fn new() -> Self {
        Statistics::default()
    }

    /// Increment the specified counter by 1.
    #[inline]
    pub fn increment(&mut self, counter: Counters) {
        self.stats[counter as usize] += 1;
    }

    /// Get the current value of the specified counter.
    pub fn get(&self, counter: Counters) -> u64 {
        self.stats[counter as usize]
    }

    /// Fold another set of counters into this one.
    pub fn absorb(&mut self, other: &Statistics) {
        for (mine, theirs) in self.stats.iter_mut().zip(other.stats) {
            *mine += theirs;
        }
    }
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, counter) in Counters::iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            let name: &'static str = counter.into();
            write!(f, "{}={}", name, self.get(counter))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_start_at_zero() {
        let stats = Statistics::new();
        for counter in Counters::iter() {
            assert_eq!(stats.get(counter), 0);
        }
    }

    #[test]
    fn test_increment_and_absorb() {
        let mut a = Statistics::new();
        a.increment(Counters::Nodes);
        a.increment(Counters::Nodes);
        let mut b = Statistics::new();
        b.increment(Counters::Emitted);
        b.absorb(&a);
        assert_eq!(b.get(Counters::Nodes), 2);
        assert_eq!(b.get(Counters::Emitted), 1);
    }

    #[test]
    fn test_display_names_counters() {
        let mut stats = Statistics::new();
        stats.increment(Counters::BadEuler);
        let text = stats.to_string();
        assert!(text.starts_with("nodes=0 invalid_edges=0 bad_euler=1"));
    }
}
