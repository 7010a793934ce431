// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Rank-balanced union-find with a Z/2 twist on every parent link.
//!
//! Classes are stored as flat arrays of states indexed by element. There is
//! no path compression: every union is undone by detaching exactly the root
//! it attached, so parent chains must survive untouched until then.
//!
//! The twist of an element relative to its root is the XOR of `twist_up`
//! along the parent chain. It records whether the element's natural
//! orientation agrees with the root's.

/// Union-find bookkeeping shared by vertex and edge states.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnionLink {
    /// Parent in the union-find forest, `None` for a root.
    pub parent: Option<usize>,
    /// Upper bound on the height of the tree below this root.
    pub rank: usize,
    /// Orientation of this element relative to its parent.
    pub twist_up: bool,
    /// Set on a child whose union bumped its new parent's rank.
    pub had_equal_rank: bool,
}

/// A state that carries union-find bookkeeping.
pub trait Linked {
    fn link(&self) -> &UnionLink;
    fn link_mut(&mut self) -> &mut UnionLink;
}

/// Root of `x`, and the twist of `x` relative to that root.
#[inline]
pub fn find<S: Linked>(states: &[S], mut x: usize) -> (usize, bool) {
    let mut twist = false;
    while let Some(parent) = states[x].link().parent {
        twist ^= states[x].link().twist_up;
        x = parent;
    }
    (x, twist)
}

/// Join two distinct roots by rank, returning `(survivor, absorbed)`.
///
/// The first root absorbs the second unless it has strictly smaller rank.
/// `twist` becomes the absorbed root's `twist_up`.
#[inline]
pub fn unite<S: Linked>(states: &mut [S], a: usize, b: usize, twist: bool) -> (usize, usize) {
    debug_assert!(a != b, "unite called on a single class");
    let (root, child) = if states[a].link().rank < states[b].link().rank {
        (b, a)
    } else {
        (a, b)
    };
    if states[root].link().rank == states[child].link().rank {
        states[root].link_mut().rank += 1;
        states[child].link_mut().had_equal_rank = true;
    }
    let link = states[child].link_mut();
    link.parent = Some(root);
    link.twist_up = twist;
    (root, child)
}

/// Undo the [`unite`] that made `child` a child, returning its former parent.
///
/// # Panics
///
/// Panics if `child` is a root, which means the undo log is out of step
/// with the forest.
#[inline]
pub fn detach<S: Linked>(states: &mut [S], child: usize) -> usize {
    let link = states[child].link_mut();
    let root = match link.parent.take() {
        Some(root) => root,
        None => panic!("Undo log names root {} as an absorbed class", child),
    };
    link.twist_up = false;
    if std::mem::take(&mut link.had_equal_rank) {
        states[root].link_mut().rank -= 1;
    }
    root
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, Clone)]
    struct Node(UnionLink);

    impl Linked for Node {
        fn link(&self) -> &UnionLink {
            &self.0
        }
        fn link_mut(&mut self) -> &mut UnionLink {
            &mut self.0
        }
    }

    fn forest(n: usize) -> Vec<Node> {
        vec![Node::default(); n]
    }

    #[test]
    fn test_singletons_are_roots() {
        let f = forest(3);
        assert_eq!(find(&f, 2), (2, false));
    }

    #[test]
    fn test_union_by_rank_and_twists() {
        let mut f = forest(4);
        // Equal ranks: the first root survives and its rank grows.
        assert_eq!(unite(&mut f, 0, 1, true), (0, 1));
        assert_eq!(f[0].0.rank, 1);
        assert!(f[1].0.had_equal_rank);
        // Lower rank first: it is absorbed.
        assert_eq!(unite(&mut f, 2, 0, false), (0, 2));
        assert_eq!(f[0].0.rank, 1);
        assert_eq!(find(&f, 1), (0, true));
        assert_eq!(find(&f, 2), (0, false));

        assert_eq!(unite(&mut f, 3, 0, true), (0, 3));
        assert_eq!(find(&f, 3), (0, true));
    }

    #[test]
    fn test_twist_accumulates_along_chain() {
        let mut f = forest(4);
        unite(&mut f, 0, 1, true);
        unite(&mut f, 2, 3, true);
        // Both rank 1; 2 goes under 0 with a twist.
        assert_eq!(unite(&mut f, 0, 2, true), (0, 2));
        // 3 -> 2 -> 0: twist true ^ true.
        assert_eq!(find(&f, 3), (0, false));
    }

    #[test]
    fn test_detach_restores_forest() {
        let mut f = forest(3);
        let (_, c1) = unite(&mut f, 0, 1, true);
        let (_, c2) = unite(&mut f, 2, 0, false);
        assert_eq!(detach(&mut f, c2), 0);
        assert_eq!(detach(&mut f, c1), 0);
        for node in &f {
            assert_eq!(node.0, UnionLink::default());
        }
    }

    #[test]
    #[should_panic(expected = "absorbed class")]
    fn test_detach_root_panics() {
        let mut f = forest(2);
        detach(&mut f, 0);
    }
}
