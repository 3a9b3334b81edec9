/*
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use mafsa_mph::{Builder, DecodeError};

fn build(keys: &[&str]) -> anyhow::Result<Builder> {
    let mut b = Builder::new();
    for k in keys {
        b.insert(k)?;
    }
    b.finish()?;
    Ok(b)
}

#[test]
fn unknown_version_is_bad_header() -> anyhow::Result<()> {
    let mut bytes = build(&["a"])?.encode()?;
    bytes[0] = 99;
    assert_eq!(
        mafsa_mph::decode(&bytes).unwrap_err(),
        DecodeError::BadHeader { version: 99 }
    );
    Ok(())
}

#[test]
fn truncated_stream_is_rejected() -> anyhow::Result<()> {
    let bytes = build(&["a", "b"])?.encode()?;
    let truncated = &bytes[..bytes.len() - 1];
    assert!(matches!(
        mafsa_mph::decode(truncated).unwrap_err(),
        DecodeError::Truncated { .. }
    ));
    Ok(())
}

#[test]
fn out_of_bounds_pointer_is_bad_pointer() -> anyhow::Result<()> {
    let mut bytes = build(&["a", "b"])?.encode()?;
    // The first edge word's pointer field: flag(1) + char(1) bytes in, 4
    // bytes wide. Flip it to an offset well past the end of the stream.
    let pointer_start = 2 /* header prefix */ + 4 /* zero padding */ + 1 /* flag */ + 1 /* char */;
    bytes[pointer_start..pointer_start + 4].copy_from_slice(&0xFFFF_FFFFu32.to_be_bytes());
    assert!(matches!(
        mafsa_mph::decode(&bytes).unwrap_err(),
        DecodeError::BadPointer { .. }
    ));
    Ok(())
}

#[test]
fn unsupported_pointer_width_is_rejected() -> anyhow::Result<()> {
    let bytes = vec![0x02, 0x00, 0x00, 0x00];
    assert_eq!(
        mafsa_mph::decode(&bytes).unwrap_err(),
        DecodeError::UnsupportedPointerWidth { width: 0 }
    );
    Ok(())
}

#[test]
fn header_word_has_the_expected_shape() -> anyhow::Result<()> {
    let bytes = build(&["a"])?.encode()?;
    assert_eq!(bytes[0], 0x02);
    assert_eq!(bytes[1], 0x04);
    assert_eq!(&bytes[2..6], &[0, 0, 0, 0]);
    Ok(())
}
