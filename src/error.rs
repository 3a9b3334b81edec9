/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Error types returned by the builder, encoder, and decoder.
//!
//! Navigation (`contains`, `traverse`, `indexed_traverse`, `enumerate`) is
//! infallible: a missing path is represented by the absence of a node, not
//! by an error.

use thiserror::Error;

/// Errors that can occur while incrementally inserting keys into a
/// [`Builder`](crate::builder::Builder).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InsertError {
    /// The key is not strictly greater than the previously inserted key.
    #[error("key {attempted:?} is not strictly greater than the previous key {previous:?}")]
    OutOfOrder { previous: String, attempted: String },

    /// An empty key was inserted.
    #[error("the empty key cannot be inserted: a final root is not representable")]
    EmptyKey,

    /// `insert` was called after `finish`.
    #[error("insert called after the builder was finished")]
    AlreadyFinished,
}

/// Errors that can occur while encoding a finished [`Builder`](crate::builder::Builder).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// `encode` was called on a builder that has not been `finish`ed.
    #[error("encode called on a builder that has not been finished")]
    Unfinished,

    /// The requested pointer width cannot address any possible offset, or
    /// does not fit in a byte-aligned word.
    #[error("pointer width {width} is not supported (must be 1..=8)")]
    PointerWidth { width: u8 },
}

/// Errors that can occur while decoding a byte stream into a [`ReadGraph`](crate::graph::ReadGraph).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The header's version byte or pointer-width byte is not supported.
    #[error("unsupported file version {version}")]
    BadHeader { version: u8 },

    /// The header declares a pointer width this decoder cannot handle.
    #[error("unsupported pointer width {width}")]
    UnsupportedPointerWidth { width: u8 },

    /// The stream ended in the middle of a word.
    #[error("stream truncated at byte offset {at}")]
    Truncated { at: usize },

    /// A character field's declared byte length does not decode as valid UTF-8.
    #[error("invalid UTF-8 character of declared length {len} at byte offset {at}")]
    BadUtf8 { at: usize, len: u8 },

    /// A pointer's value is outside the stream or does not land on an edge-word boundary.
    #[error("pointer {pointer} at byte offset {at} is out of bounds or misaligned")]
    BadPointer { at: usize, pointer: u64 },
}
