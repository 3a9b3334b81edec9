/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Binary serialization of a finished [`Builder`](crate::builder::Builder)
//! into the word-oriented stream described by the crate's format: a header
//! word followed by one edge word per outgoing edge, nodes laid out as
//! contiguous edge runs in BFS order.

use crate::error::EncodeError;
use crate::node::{BuildNode, NodeId};
use bitflags::bitflags;
use std::collections::{HashMap, HashSet, VecDeque};

bitflags! {
    /// Per-edge flag byte. Bits 2..4 (not modeled here, packed in by hand)
    /// carry the UTF-8 byte length of the edge's character.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub(crate) struct EdgeFlags: u8 {
        /// Target node is final ("End of Word").
        const EOW = 0b0000_0001;
        /// Last edge in its source node's edge run ("End of Node").
        const EON = 0b0000_0010;
    }
}

/// Current on-disk format version.
const VERSION: u8 = 2;

/// Default pointer width in bytes used by [`crate::builder::Builder::encode`].
pub(crate) const DEFAULT_POINTER_WIDTH: u8 = 4;

fn word_len(char_len: u8, pointer_width: u8) -> usize {
    1 + char_len as usize + pointer_width as usize
}

/// Encodes the minimal DAG rooted at `root` with pointers of width
/// `pointer_width` bytes.
pub(crate) fn encode(
    arena: &[BuildNode],
    root: NodeId,
    pointer_width: u8,
) -> Result<Vec<u8>, EncodeError> {
    if pointer_width == 0 || pointer_width > 8 {
        return Err(EncodeError::PointerWidth {
            width: pointer_width,
        });
    }
    let header_len = 2 + pointer_width as usize;

    // Pass 1: BFS from the root, assigning a byte offset to every node that
    // is actually referenced by some edge and has outgoing edges of its
    // own. A node with no outgoing edges is never visited here: its
    // pointer, wherever it appears, stays 0.
    let mut offsets: HashMap<NodeId, usize> = HashMap::new();
    let mut order: Vec<NodeId> = Vec::new();
    let mut queue: VecDeque<NodeId> = VecDeque::new();
    let mut seen: HashSet<NodeId> = HashSet::new();
    let mut cursor = header_len;

    if !arena[root].edges.is_empty() {
        queue.push_back(root);
        seen.insert(root);
    }
    while let Some(id) = queue.pop_front() {
        let node = &arena[id];
        offsets.insert(id, cursor);
        order.push(id);
        for &(c, _) in &node.edges {
            cursor += word_len(c.len_utf8() as u8, pointer_width);
        }
        for &(_, child) in &node.edges {
            if !arena[child].edges.is_empty() && seen.insert(child) {
                queue.push_back(child);
            }
        }
    }

    // Pass 2: emit the header and then every node's edge run, in the exact
    // order established above, so the pointers recorded in pass 1 are
    // correct byte offsets into the stream being built right now.
    let mut out = Vec::with_capacity(cursor);
    out.push(VERSION);
    out.push(pointer_width);
    out.extend(std::iter::repeat(0u8).take(pointer_width as usize));
    debug_assert_eq!(out.len(), header_len);

    for &id in &order {
        let node = &arena[id];
        let last = node.edges.len().saturating_sub(1);
        for (i, &(c, child)) in node.edges.iter().enumerate() {
            let mut flags = EdgeFlags::empty();
            if arena[child].is_final {
                flags |= EdgeFlags::EOW;
            }
            if i == last {
                flags |= EdgeFlags::EON;
            }
            let char_len = c.len_utf8() as u8;
            out.push(flags.bits() | (char_len << 2));
            let mut buf = [0u8; 4];
            out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            let pointer = offsets.get(&child).copied().unwrap_or(0) as u64;
            let be = pointer.to_be_bytes();
            out.extend_from_slice(&be[8 - pointer_width as usize..]);
        }
    }
    Ok(out)
}
