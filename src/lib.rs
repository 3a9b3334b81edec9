/*
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 * SPDX-FileCopyrightText: 2024 Stefano Zacchiroli
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! A minimal acyclic finite-state automaton (MA-FSA) over Unicode strings,
//! augmented with minimal perfect hashing (MPH).
//!
//! Strings are inserted in strictly ascending lexicographic order into a
//! [`Builder`], which performs Daciuk-Mihov online minimization as they
//! arrive. Once [`Builder::finish`] is called, the automaton can be
//! [`Builder::encode`]d into a compact byte stream and later
//! [`decode`]d back into a read-only [`ReadGraph`] supporting membership
//! tests, prefix traversal, indexed (perfect-hash) traversal, and
//! lexicographic enumeration.
//!
//! ```
//! use mafsa_mph::Builder;
//!
//! let mut builder = Builder::new();
//! for key in ["cities", "city", "pities", "pity"] {
//!     builder.insert(key).unwrap();
//! }
//! builder.finish().unwrap();
//!
//! let bytes = builder.encode().unwrap();
//! let graph = mafsa_mph::decode(&bytes).unwrap();
//!
//! assert!(graph.contains("city"));
//! assert!(!graph.contains("pitiful"));
//! assert_eq!(
//!     graph.enumerate().collect::<Vec<_>>(),
//!     vec!["cities", "city", "pities", "pity"],
//! );
//! ```
#![deny(unreachable_code)]
#![deny(unconditional_recursion)]
#![deny(clippy::empty_loop)]

mod builder;
mod decoder;
mod encoder;
mod error;
mod graph;
mod node;

pub use crate::builder::Builder;
pub use crate::decoder::decode;
pub use crate::error::{DecodeError, EncodeError, InsertError};
pub use crate::graph::{Enumerate, Node, ReadGraph};

/// Re-exports the crate's public API for glob-importing.
pub mod prelude {
    pub use crate::builder::Builder;
    pub use crate::decoder::decode;
    pub use crate::error::{DecodeError, EncodeError, InsertError};
    pub use crate::graph::{Enumerate, Node, ReadGraph};
}
