// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Depth-indexed undo logs for O(1) backtracking.
//!
//! Each search step glues one pair of faces and performs three vertex
//! identifications and three edge identifications. Every identification
//! writes exactly one entry into its log at slot `v + 4 * depth`, where `v`
//! is the vertex of the glued face that drove it. Rolling a step back reads
//! each slot, undoes what it describes, and resets the slot to its initial
//! marker.
//!
//! # Memory Model
//!
//! - Slots are allocated once, `8n` per log for `n` tetrahedra (at most `2n`
//!   search steps, four slots per step), and never reallocated.
//! - After a full rewind every slot is back at [`LogEntry::INIT`], which is
//!   what the end-of-search audit checks.

use std::fmt::Debug;

/// A value stored in an [`UndoLog`] slot.
pub trait LogEntry: Copy + Eq + Debug {
    /// Marker for "nothing recorded here".
    const INIT: Self;
}

impl LogEntry for Option<usize> {
    const INIT: Self = None;
}

/// Fixed-size log of what each search step changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoLog<T: LogEntry> {
    slots: Vec<T>,
}

impl<T: LogEntry> UndoLog<T> {
    /// Slots used per search step.
    pub const SLOTS_PER_STEP: usize = 4;

    /// A log for `steps` search steps, every slot initial.
    pub fn new(steps: usize) -> Self {
        Self {
            slots: vec![T::INIT; steps * Self::SLOTS_PER_STEP],
        }
    }

    /// Slot index for vertex `v` at search depth `depth`.
    #[inline]
    pub fn slot(v: usize, depth: usize) -> usize {
        v + Self::SLOTS_PER_STEP * depth
    }

    /// Record `value` in `slot`.
    ///
    /// # Panics
    ///
    /// Panics if `slot` lies past the end of the log (the search went deeper
    /// than the number of face gluings).
    #[inline]
    pub fn record(&mut self, slot: usize, value: T) {
        if slot >= self.slots.len() {
            panic!("Undo log overflow: slot {} of {}", slot, self.slots.len());
        }
        debug_assert!(
            self.slots[slot] == T::INIT,
            "undo log slot {} recorded twice",
            slot
        );
        self.slots[slot] = value;
    }

    #[inline]
    pub fn get(&self, slot: usize) -> T {
        self.slots[slot]
    }

    /// Read `slot` and reset it to the initial marker.
    #[inline]
    pub fn take(&mut self, slot: usize) -> T {
        std::mem::replace(&mut self.slots[slot], T::INIT)
    }

    /// Overwrite a slot directly, bypassing the double-record check.
    ///
    /// Used only when reloading a saved search.
    pub(crate) fn set_raw(&mut self, slot: usize, value: T) {
        self.slots[slot] = value;
    }

    /// Slots that still hold something other than the initial marker.
    pub fn dirty_slots(&self) -> impl Iterator<Item = (usize, T)> + '_ {
        self.slots
            .iter()
            .copied()
            .enumerate()
            .filter(|(_, v)| *v != T::INIT)
    }

    pub fn is_clear(&self) -> bool {
        self.dirty_slots().next().is_none()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.slots.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_log_is_clear() {
        let log: UndoLog<Option<usize>> = UndoLog::new(4);
        assert_eq!(log.len(), 16);
        assert!(log.is_clear());
    }

    #[test]
    fn test_record_and_take() {
        let mut log: UndoLog<Option<usize>> = UndoLog::new(2);
        let slot = UndoLog::<Option<usize>>::slot(3, 1);
        assert_eq!(slot, 7);

        log.record(slot, Some(11));
        assert!(!log.is_clear());
        assert_eq!(log.get(slot), Some(11));
        assert_eq!(log.dirty_slots().collect::<Vec<_>>(), vec![(7, Some(11))]);

        assert_eq!(log.take(slot), Some(11));
        assert!(log.is_clear());
        assert_eq!(log.take(slot), None);
    }

    #[test]
    fn test_nested_steps_rewind_in_reverse() {
        let mut log: UndoLog<Option<usize>> = UndoLog::new(3);
        for depth in 0..3 {
            for v in 1..4 {
                log.record(UndoLog::<Option<usize>>::slot(v, depth), Some(10 * depth + v));
            }
        }
        for depth in (0..3).rev() {
            for v in (1..4).rev() {
                let slot = UndoLog::<Option<usize>>::slot(v, depth);
                assert_eq!(log.take(slot), Some(10 * depth + v));
            }
        }
        assert!(log.is_clear());
    }

    #[test]
    #[should_panic(expected = "Undo log overflow")]
    fn test_undo_log_overflow() {
        let mut log: UndoLog<Option<usize>> = UndoLog::new(1);
        log.record(4, Some(0));
    }
}
