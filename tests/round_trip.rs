/*
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use mafsa_mph::Builder;

fn build_and_encode(keys: &[&str]) -> anyhow::Result<Vec<u8>> {
    let mut b = Builder::new();
    for k in keys {
        b.insert(k)?;
    }
    b.finish()?;
    Ok(b.encode()?)
}

#[test]
fn round_trip_preserves_the_sorted_deduplicated_set() -> anyhow::Result<()> {
    let keys = ["cities", "city", "pities", "pity"];
    let bytes = build_and_encode(&keys)?;
    let graph = mafsa_mph::decode(&bytes)?;

    let enumerated: Vec<String> = graph.enumerate().collect();
    assert_eq!(enumerated, keys.iter().map(|s| s.to_string()).collect::<Vec<_>>());

    assert!(graph.contains("city"));
    assert!(!graph.contains("pitiful"));
    Ok(())
}

#[test]
fn round_trip_with_multi_byte_utf8_keys() -> anyhow::Result<()> {
    let keys = ["dog", "dogs", "hello", "jello", "été", "あello"];
    let bytes = build_and_encode(&keys)?;
    let graph = mafsa_mph::decode(&bytes)?;

    let enumerated: Vec<String> = graph.enumerate().collect();
    let mut expected: Vec<&str> = keys.to_vec();
    expected.sort();
    assert_eq!(enumerated, expected);

    for k in keys {
        assert!(graph.contains(k), "missing key {k:?}");
    }
    Ok(())
}

#[test]
fn empty_automaton_round_trips_to_nothing() -> anyhow::Result<()> {
    let bytes = build_and_encode(&[])?;
    assert_eq!(bytes, vec![0x02, 0x04, 0x00, 0x00, 0x00, 0x00]);

    let graph = mafsa_mph::decode(&bytes)?;
    assert!(!graph.contains(""));
    assert_eq!(graph.enumerate().count(), 0);
    Ok(())
}

#[test]
fn byte_encoding_is_deterministic_across_runs() -> anyhow::Result<()> {
    let keys = ["dog", "dogs", "hello", "jello", "été", "あello"];
    let first = build_and_encode(&keys)?;
    let second = build_and_encode(&keys)?;
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn shared_suffix_nodes_decode_to_the_same_offset() -> anyhow::Result<()> {
    // "hello" and "jello" share the suffix "ello"; the edges labeled 'l'
    // immediately after 'he' and 'je' must point at the same node.
    let bytes = build_and_encode(&["hello", "jello"])?;
    let graph = mafsa_mph::decode(&bytes)?;

    for (he_prefix, je_prefix) in [
        ("he", "je"),
        ("hel", "jel"),
        ("hell", "jell"),
        ("hello", "jello"),
    ] {
        let after_he = graph.traverse(he_prefix).expect("valid prefix");
        let after_je = graph.traverse(je_prefix).expect("valid prefix");
        assert_eq!(after_he.count(), after_je.count());
        assert_eq!(after_he.is_final(), after_je.is_final());
    }

    // header is version 2 with 4-byte pointers.
    assert_eq!(&bytes[0..6], &[0x02, 0x04, 0x00, 0x00, 0x00, 0x00]);
    Ok(())
}
