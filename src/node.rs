/*
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Arena-backed build-time node representation and the register used for
//! online minimization.
//!
//! Nodes live in an arena (`Vec<BuildNode>`) owned by the
//! [`Builder`](crate::builder::Builder); edges and the register refer to
//! them by [`NodeId`], never by direct reference, so that minimization can
//! let several parents share one child.

use std::collections::HashMap;

/// Index into a builder's node arena.
pub(crate) type NodeId = usize;

/// A mutable node used while the automaton is under construction.
#[derive(Debug, Clone)]
pub(crate) struct BuildNode {
    pub(crate) is_final: bool,
    /// Outgoing edges, kept sorted by character.
    pub(crate) edges: Vec<(char, NodeId)>,
    /// Number of accepted strings reachable from this node (including
    /// itself if final). Populated by `Builder::finish`.
    pub(crate) count: u64,
    /// Stable id assigned when this node enters the register. `None` while
    /// the node is still on the insertion spine.
    pub(crate) reg_id: Option<u64>,
}

impl BuildNode {
    pub(crate) fn new() -> Self {
        Self {
            is_final: false,
            edges: Vec::new(),
            count: 0,
            reg_id: None,
        }
    }

    /// Appends a new outgoing edge. Insertion is lexicographically ordered,
    /// so edges always arrive in ascending character order and this never
    /// has to re-sort.
    pub(crate) fn push_edge(&mut self, c: char, target: NodeId) {
        debug_assert!(self.edges.last().map(|&(last, _)| last < c).unwrap_or(true));
        self.edges.push((c, target));
    }

    pub(crate) fn find_child(&self, c: char) -> Option<NodeId> {
        self.edges
            .binary_search_by_key(&c, |&(ch, _)| ch)
            .ok()
            .map(|i| self.edges[i].1)
    }
}

/// The structural signature of a [`BuildNode`]: `(is_final, [(char,
/// child.id)])`. Two nodes are interchangeable iff their signatures are
/// equal. `child.id` must already be assigned for every child, which is
/// why minimization proceeds bottom-up: a signature computed before all
/// descendants are registered would be unstable.
type Signature = (bool, Vec<(char, u64)>);

fn signature_of(node: &BuildNode, arena: &[BuildNode]) -> Signature {
    let edges = node
        .edges
        .iter()
        .map(|&(c, target)| {
            let id = arena[target]
                .reg_id
                .expect("signature requested before child was registered");
            (c, id)
        })
        .collect();
    (node.is_final, edges)
}

/// Maps structural signatures to the canonical, already-minimal node that
/// has that signature.
#[derive(Debug, Default)]
pub(crate) struct Register {
    by_signature: HashMap<Signature, NodeId>,
    next_id: u64,
}

impl Register {
    pub(crate) fn new() -> Self {
        Self {
            by_signature: HashMap::new(),
            next_id: 0,
        }
    }

    /// Looks up a node in the register equivalent to `arena[id]`. If one
    /// exists, returns its id (the caller should redirect the edge that
    /// pointed at `id` to point there instead, and may discard `id`). If
    /// none exists, `arena[id]` is registered under a fresh stable id and
    /// `None` is returned.
    pub(crate) fn find_or_insert(&mut self, arena: &mut [BuildNode], id: NodeId) -> Option<NodeId> {
        let sig = signature_of(&arena[id], arena);
        if let Some(&existing) = self.by_signature.get(&sig) {
            log::trace!("register hit: node {id} folded into {existing}");
            return Some(existing);
        }
        let fresh = self.next_id;
        self.next_id += 1;
        arena[id].reg_id = Some(fresh);
        self.by_signature.insert(sig, id);
        None
    }

    pub(crate) fn len(&self) -> usize {
        self.by_signature.len()
    }
}
