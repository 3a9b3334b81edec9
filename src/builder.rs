/*
 * SPDX-FileCopyrightText: 2023 Inria
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Online, Daciuk-Mihov-style construction of a minimal acyclic
//! finite-state automaton: keys must arrive in strictly ascending
//! lexicographic order, and minimization of the previous key's spine
//! happens incrementally as each new key arrives.

use crate::encoder::{self, DEFAULT_POINTER_WIDTH};
use crate::error::{EncodeError, InsertError};
use crate::node::{BuildNode, NodeId, Register};

/// Arena index of the automaton's root. Stable for the lifetime of a
/// [`Builder`]: the root is created once in [`Builder::new`] and never
/// replaced, only ever given more outgoing edges.
const ROOT: NodeId = 0;

/// Incrementally builds and minimizes a MA-FSA as keys arrive in sorted
/// order.
///
/// ```
/// use mafsa_mph::Builder;
///
/// let mut builder = Builder::new();
/// builder.insert("city").unwrap();
/// builder.insert("pity").unwrap();
/// builder.finish().unwrap();
/// let bytes = builder.encode().unwrap();
/// let graph = mafsa_mph::decode(&bytes).unwrap();
/// assert!(graph.contains("city"));
/// assert!(!graph.contains("pit"));
/// ```
#[derive(Debug)]
pub struct Builder {
    arena: Vec<BuildNode>,
    register: Register,
    previous_key: Vec<char>,
    /// Nodes from the root to the deepest node of `previous_key`,
    /// inclusive. `spine[0] == ROOT`; everything strictly below index `p`
    /// (the previous insert's common-prefix depth) is not yet minimal.
    spine: Vec<NodeId>,
    finished: bool,
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder {
    /// Creates an empty builder with a single non-final root.
    pub fn new() -> Self {
        Self {
            arena: vec![BuildNode::new()],
            register: Register::new(),
            previous_key: Vec::new(),
            spine: vec![ROOT],
            finished: false,
        }
    }

    /// Appends `key`. Keys must be inserted in strictly ascending
    /// lexicographic order over their code-point sequences.
    pub fn insert(&mut self, key: &str) -> Result<(), InsertError> {
        if self.finished {
            return Err(InsertError::AlreadyFinished);
        }
        if key.is_empty() {
            return Err(InsertError::EmptyKey);
        }
        let key_chars: Vec<char> = key.chars().collect();
        if !self.previous_key.is_empty() && key_chars <= self.previous_key {
            return Err(InsertError::OutOfOrder {
                previous: self.previous_key.iter().collect(),
                attempted: key.to_string(),
            });
        }

        let p = common_prefix_len(&self.previous_key, &key_chars);
        self.minimize_spine_above(p);
        self.extend_spine(p, &key_chars);
        self.previous_key = key_chars;
        Ok(())
    }

    /// Finalizes minimization of the whole spine and computes every node's
    /// suffix count. Idempotent: calling it again is a no-op.
    pub fn finish(&mut self) -> Result<(), InsertError> {
        if self.finished {
            return Ok(());
        }
        self.minimize_spine_above(0);
        self.compute_counts();
        self.finished = true;
        Ok(())
    }

    /// Encodes the finished automaton using the crate's default pointer
    /// width (4 bytes).
    pub fn encode(&self) -> Result<Vec<u8>, EncodeError> {
        self.encode_with_pointer_width(DEFAULT_POINTER_WIDTH)
    }

    /// Encodes the finished automaton with an explicit pointer width, in
    /// bytes (must address every offset the stream can contain; `1..=8`).
    pub fn encode_with_pointer_width(&self, pointer_width: u8) -> Result<Vec<u8>, EncodeError> {
        if !self.finished {
            return Err(EncodeError::Unfinished);
        }
        encoder::encode(&self.arena, ROOT, pointer_width)
    }

    /// Minimizes every spine node strictly below depth `p`, bottom-up:
    /// the deepest node is checked against the register first, since a
    /// node's signature depends on its children already having stable
    /// register ids.
    fn minimize_spine_above(&mut self, p: usize) {
        for i in (p + 1..self.spine.len()).rev() {
            let child = self.spine[i];
            let parent = self.spine[i - 1];
            let c = self.previous_key[i - 1];
            if let Some(canonical) = self.register.find_or_insert(&mut self.arena, child) {
                log::trace!("minimize: folding spine node {child} into register entry {canonical}");
                let node = &mut self.arena[parent];
                let idx = node
                    .edges
                    .binary_search_by_key(&c, |&(ch, _)| ch)
                    .expect("spine parent must still carry the edge for its own spine char");
                node.edges[idx].1 = canonical;
            }
        }
        self.spine.truncate(p + 1);
    }

    /// Appends a fresh chain of nodes from `spine[p]` for the remaining
    /// characters of `key`, marking the last one final.
    fn extend_spine(&mut self, p: usize, key: &[char]) {
        let mut current = self.spine[p];
        for &c in &key[p..] {
            let new_id = self.arena.len();
            self.arena.push(BuildNode::new());
            self.arena[current].push_edge(c, new_id);
            self.spine.push(new_id);
            current = new_id;
        }
        self.arena[current].is_final = true;
    }

    /// Memoized post-order walk over the (now fully minimal) DAG setting
    /// `count(n) = (1 if final) + sum(count(child))`.
    fn compute_counts(&mut self) {
        let mut memo: Vec<Option<u64>> = vec![None; self.arena.len()];
        fn visit(arena: &[BuildNode], memo: &mut [Option<u64>], id: NodeId) -> u64 {
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
        visit(&self.arena, &mut memo, ROOT);
        for (id, node) in self.arena.iter_mut().enumerate() {
            if let Some(count) = memo[id] {
                node.count = count;
            }
        }
    }
}

fn common_prefix_len(a: &[char], b: &[char]) -> usize {
    a.iter().zip(b.iter()).take_while(|(x, y)| x == y).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_and_out_of_order_keys() {
        let mut b = Builder::new();
        assert_eq!(b.insert(""), Err(InsertError::EmptyKey));
        b.insert("city").unwrap();
        assert_eq!(
            b.insert("city"),
            Err(InsertError::OutOfOrder {
                previous: "city".into(),
                attempted: "city".into(),
            })
        );
        assert_eq!(
            b.insert("ant"),
            Err(InsertError::OutOfOrder {
                previous: "city".into(),
                attempted: "ant".into(),
            })
        );
        // the builder is left usable with only "city" present.
        b.insert("pity").unwrap();
        b.finish().unwrap();
        assert_eq!(b.insert("zoo"), Err(InsertError::AlreadyFinished));
    }

    #[test]
    fn encode_before_finish_is_rejected() {
        let mut b = Builder::new();
        b.insert("a").unwrap();
        assert_eq!(b.encode(), Err(EncodeError::Unfinished));
    }

    #[test]
    fn register_deduplicates_shared_suffixes() {
        // "hello" and "jello" share the suffix "ello"; after finish, the
        // register should hold far fewer nodes than the naive trie would.
        let mut b = Builder::new();
        for k in ["hello", "jello"] {
            b.insert(k).unwrap();
        }
        b.finish().unwrap();
        // h,e,l,l,o + j (root already exists) -> shared suffix collapses
        // "ello" into one chain reused by both branches, well under the
        // 10 nodes a non-minimized trie would need.
        assert!(b.register.len() < 8);
    }

    #[test]
    fn counts_match_number_of_accepted_strings() {
        let mut b = Builder::new();
        for k in ["ab", "ac", "ad"] {
            b.insert(k).unwrap();
        }
        b.finish().unwrap();
        assert_eq!(b.arena[ROOT].count, 3);
    }
}
