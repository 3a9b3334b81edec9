/*
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Parses the byte stream produced by [`crate::encoder`] back into a
//! [`ReadGraph`].

use crate::error::DecodeError;
use crate::graph::{NodeId, ReadGraph, ReadNode};
use std::collections::HashMap;

struct EdgeRaw {
    ch: char,
    pointer: u64,
    pointer_at: usize,
    eow: bool,
}

struct NodeRecord {
    offset: usize,
    edges: Vec<EdgeRaw>,
}

/// Decodes a byte stream into a read-only [`ReadGraph`].
///
/// Eagerly materializes every node: the navigator needs random access for
/// `indexed_traverse` and repeated enumeration, so there is nothing to gain
/// from a lazy, zero-copy view here.
pub fn decode(bytes: &[u8]) -> Result<ReadGraph, DecodeError> {
    if bytes.len() < 2 {
        return Err(DecodeError::Truncated { at: bytes.len() });
    }
    let version = bytes[0];
    if version != 2 {
        return Err(DecodeError::BadHeader { version });
    }
    let pointer_width = bytes[1];
    if pointer_width == 0 || pointer_width > 8 {
        return Err(DecodeError::UnsupportedPointerWidth {
            width: pointer_width,
        });
    }
    let header_len = 2 + pointer_width as usize;
    if bytes.len() < header_len {
        return Err(DecodeError::Truncated { at: bytes.len() });
    }

    let records = scan_nodes(bytes, header_len, pointer_width)?;
    log::debug!("decoded {} node record(s) from {} bytes", records.len(), bytes.len());

    // A node's finality is a property of the edges that point to it, not of
    // itself: record, for every non-zero pointer seen anywhere, whether the
    // edge that carries it sets EOW.
    let mut final_by_offset: HashMap<u64, bool> = HashMap::new();
    for record in &records {
        for e in &record.edges {
            if e.pointer != 0 {
                final_by_offset.insert(e.pointer, e.eow);
            }
        }
    }

    // Pointers only ever point forward (to a strictly larger offset than
    // their source node's own offset), because offsets are assigned during
    // encoding in the same BFS order that discovers each node from its
    // parent. Building nodes from the highest offset down to the root
    // therefore always has a child's `ReadNode` ready before its parent
    // needs to reference it, with no recursion required.
    let mut arena: Vec<ReadNode> = Vec::with_capacity(records.len() + 1);
    let mut built_at_offset: HashMap<u64, usize> = HashMap::new();

    for record in records.iter().rev() {
        let mut edges = Vec::with_capacity(record.edges.len());
        for e in &record.edges {
            let target: NodeId = if e.pointer == 0 {
                let id = arena.len();
                arena.push(ReadNode::leaf(e.eow));
                id
            } else {
                *built_at_offset
                    .get(&e.pointer)
                    .ok_or(DecodeError::BadPointer {
                        at: e.pointer_at,
                        pointer: e.pointer,
                    })?
            };
            edges.push((e.ch, target));
        }
        let is_final = final_by_offset
            .get(&(record.offset as u64))
            .copied()
            .unwrap_or(false);
        let id = arena.len();
        arena.push(ReadNode::branch(is_final, edges));
        built_at_offset.insert(record.offset as u64, id);
    }

    let root = if records.is_empty() {
        arena.push(ReadNode::leaf(false));
        arena.len() - 1
    } else {
        built_at_offset[&(records[0].offset as u64)]
    };

    let mut graph = ReadGraph::from_parts(arena, root);
    graph.compute_counts();
    Ok(graph)
}

/// Scans the stream linearly from `header_len` to the end, splitting it
/// into node records purely by watching for the End-of-Node flag. Node
/// boundaries found this way land at strictly increasing offsets, which is
/// what the BFS-ordered encoder guarantees for any stream it produced.
fn scan_nodes(
    bytes: &[u8],
    header_len: usize,
    pointer_width: u8,
) -> Result<Vec<NodeRecord>, DecodeError> {
    let mut records = Vec::new();
    let mut pos = header_len;
    while pos < bytes.len() {
        let node_start = pos;
        let mut edges = Vec::new();
        loop {
            if pos >= bytes.len() {
                return Err(DecodeError::Truncated { at: pos });
            }
            let flag = bytes[pos];
            let len = (flag >> 2) & 0b111;
            let char_start = pos + 1;
            let char_end = char_start + len as usize;
            if char_end > bytes.len() {
                return Err(DecodeError::Truncated { at: char_start });
            }
            if len == 0 || len > 4 {
                return Err(DecodeError::BadUtf8 {
                    at: char_start,
                    len,
                });
            }
            let ch = std::str::from_utf8(&bytes[char_start..char_end])
                .ok()
                .and_then(|s| {
                    let mut chars = s.chars();
                    let c = chars.next()?;
                    if chars.next().is_some() || c.len_utf8() != len as usize {
                        None
                    } else {
                        Some(c)
                    }
                })
                .ok_or(DecodeError::BadUtf8 {
                    at: char_start,
                    len,
                })?;

            let pointer_start = char_end;
            let pointer_end = pointer_start + pointer_width as usize;
            if pointer_end > bytes.len() {
                return Err(DecodeError::Truncated { at: pointer_start });
            }
            let mut pointer: u64 = 0;
            for &b in &bytes[pointer_start..pointer_end] {
                pointer = (pointer << 8) | b as u64;
            }

            let eow = flag & 0x01 != 0;
            let eon = flag & 0x02 != 0;
            edges.push(EdgeRaw {
                ch,
                pointer,
                pointer_at: pointer_start,
                eow,
            });
            pos = pointer_end;
            if eon {
                break;
            }
        }
        records.push(NodeRecord {
            offset: node_start,
            edges,
        });
    }
    Ok(records)
}
