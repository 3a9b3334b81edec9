/*
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! The read-only decoded automaton and the navigator operations over it:
//! membership, prefix traversal, indexed (perfect-hash) traversal, and
//! lexicographic enumeration.
//!
//! Once built, a [`ReadGraph`] has no interior mutability and can be shared
//! by reference across threads without synchronization.

/// Index into a [`ReadGraph`]'s node arena.
pub(crate) type NodeId = usize;

/// An immutable node in a decoded automaton.
#[derive(Debug, Clone)]
pub(crate) struct ReadNode {
    pub(crate) is_final: bool,
    /// Outgoing edges, sorted by character.
    pub(crate) edges: Vec<(char, NodeId)>,
    /// Number of accepted strings reachable from this node, populated by
    /// [`ReadGraph::compute_counts`] right after decoding.
    pub(crate) count: u64,
}

impl ReadNode {
    pub(crate) fn leaf(is_final: bool) -> Self {
        Self {
            is_final,
            edges: Vec::new(),
            count: 0,
        }
    }

    pub(crate) fn branch(is_final: bool, edges: Vec<(char, NodeId)>) -> Self {
        Self {
            is_final,
            edges,
            count: 0,
        }
    }

    fn find_child(&self, c: char) -> Option<NodeId> {
        self.edges
            .binary_search_by_key(&c, |&(ch, _)| ch)
            .ok()
            .map(|i| self.edges[i].1)
    }
}

/// A decoded, read-only minimal acyclic finite-state automaton.
///
/// Produced by [`crate::decoder::decode`]. Supports membership tests,
/// prefix traversal, indexed (perfect-hash) traversal, and lexicographic
/// enumeration; it cannot be mutated.
#[derive(Debug, Clone)]
pub struct ReadGraph {
    pub(crate) arena: Vec<ReadNode>,
    pub(crate) root: NodeId,
}

impl ReadGraph {
    pub(crate) fn from_parts(arena: Vec<ReadNode>, root: NodeId) -> Self {
        Self { arena, root }
    }

    /// Memoized post-order walk computing `count(n) = (1 if final) +
    /// sum(count(child))` for every node. Safe to call more than once
    /// (idempotent): `decode` calls it exactly once, right after parsing.
    pub(crate) fn compute_counts(&mut self) {
        let mut memo = vec![None; self.arena.len()];
        fn visit(arena: &[ReadNode], memo: &mut [Option<u64>], id: NodeId) -> u64 {
            if let Some(c) = memo[id] {
                return c;
            }
            let node = &arena[id];
            let mut total: u64 = if node.is_final { 1 } else { 0 };
            for &(_, child) in &node.edges {
                total += visit(arena, memo, child);
            }
            memo[id] = Some(total);
            total
        }
        let root = self.root;
        visit(&self.arena, &mut memo, root);
        for (id, node) in self.arena.iter_mut().enumerate() {
            if let Some(count) = memo[id] {
                node.count = count;
            }
        }
    }

    /// Returns `true` iff `key` is accepted by the automaton.
    pub fn contains(&self, key: &str) -> bool {
        self.traverse(key)
            .map(|node| node.is_final())
            .unwrap_or(false)
    }

    /// Walks from the root consuming `prefix`, returning the reached node,
    /// or `None` if some step has no matching edge. An empty prefix returns
    /// the root.
    pub fn traverse(&self, prefix: &str) -> Option<Node<'_>> {
        let mut id = self.root;
        for c in prefix.chars() {
            id = self.arena[id].find_child(c)?;
        }
        Some(Node { graph: self, id })
    }

    /// As [`ReadGraph::traverse`], but also returns the number of accepted
    /// strings strictly less than any string having `prefix` as a prefix.
    ///
    /// If `prefix` itself is accepted, `index - 1` is its 0-based rank in
    /// lexicographic order.
    pub fn indexed_traverse(&self, prefix: &str) -> (Option<Node<'_>>, u64) {
        let mut id = self.root;
        let mut index: u64 = 0;
        for c in prefix.chars() {
            let node = &self.arena[id];
            if node.is_final {
                index += 1;
            }
            let mut found = None;
            for &(ch, child) in &node.edges {
                match ch.cmp(&c) {
                    std::cmp::Ordering::Less => index += self.arena[child].count,
                    std::cmp::Ordering::Equal => {
                        found = Some(child);
                        break;
                    }
                    std::cmp::Ordering::Greater => break,
                }
            }
            match found {
                Some(child) => id = child,
                None => return (None, index),
            }
        }
        // The walk's final node is never the source of a "before
        // descending" step above (there is no further character to
        // consume), but its own finality still counts: if the prefix
        // itself is an accepted string, it is one more element than every
        // string strictly less than it.
        if self.arena[id].is_final {
            index += 1;
        }
        (Some(Node { graph: self, id }), index)
    }

    /// Lexicographic enumeration of every accepted string, in ascending
    /// order. The returned iterator borrows the graph for its lifetime and
    /// cannot be restarted.
    pub fn enumerate(&self) -> Enumerate<'_> {
        Enumerate {
            graph: self,
            stack: vec![(self.root, 0, '\0')],
        }
    }
}

/// A handle to a single node reached by [`ReadGraph::traverse`] or
/// [`ReadGraph::indexed_traverse`].
#[derive(Debug, Clone, Copy)]
pub struct Node<'g> {
    graph: &'g ReadGraph,
    id: NodeId,
}

impl<'g> Node<'g> {
    /// Whether a string ends at this node.
    pub fn is_final(&self) -> bool {
        self.graph.arena[self.id].is_final
    }

    /// The number of accepted strings reachable from this node (its
    /// perfect-hash "bucket size"), counting itself if it is final.
    pub fn count(&self) -> u64 {
        self.graph.arena[self.id].count
    }
}

/// Lazy, finite, non-restartable lexicographic enumeration produced by
/// [`ReadGraph::enumerate`].
///
/// Holds an explicit depth-first stack rather than recursing, so each call
/// to `next` performs bounded work: at most one descent or backtrack step
/// per stack frame visited, amortized to one per yielded string.
pub struct Enumerate<'g> {
    graph: &'g ReadGraph,
    stack: Vec<(NodeId, usize, char)>,
}

impl<'g> Iterator for Enumerate<'g> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            let frame = self.stack.len() - 1;
            let (node_id, idx, _) = self.stack[frame];
            let node = &self.graph.arena[node_id];
            if idx < node.edges.len() {
                let (c, child_id) = node.edges[idx];
                self.stack[frame].1 += 1;
                self.stack.push((child_id, 0, c));
                if self.graph.arena[child_id].is_final {
                    let s: String = self.stack[1..].iter().map(|f| f.2).collect();
                    return Some(s);
                }
            } else if self.stack.len() == 1 {
                return None;
            } else {
                self.stack.pop();
            }
        }
    }
}
