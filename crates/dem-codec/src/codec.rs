//! Primitive binary encode/decode for the demo format.
//!
//! All integers are little-endian. Running out of input inside a
//! primitive is reported as [`DemoError::Truncated`], never as a raw
//! I/O error, so the orchestrator can tell a short capture apart from
//! a failing source.

use std::io::{self, Read, Write};

use dem_core::{AngleVector, FixVector};
use tracing::debug;

use crate::error::DemoError;
use crate::options::WireLayout;

/// Largest canonical string length, NUL included.
pub const MAX_STRING_LEN: usize = u8::MAX as usize;

// ── Primitive writers ───────────────────────────────────────────

/// Write a single byte.
pub fn write_u8(w: &mut dyn Write, v: u8) -> Result<(), DemoError> {
    w.write_all(&[v])?;
    Ok(())
}

/// Write a little-endian i16.
pub fn write_i16_le(w: &mut dyn Write, v: i16) -> Result<(), DemoError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Write a little-endian i32.
pub fn write_i32_le(w: &mut dyn Write, v: i32) -> Result<(), DemoError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Write a little-endian u32.
pub fn write_u32_le(w: &mut dyn Write, v: u32) -> Result<(), DemoError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Write a fixed-point vector as three i32s.
pub fn write_fix_vector(w: &mut dyn Write, v: &FixVector) -> Result<(), DemoError> {
    write_i32_le(w, v.x)?;
    write_i32_le(w, v.y)?;
    write_i32_le(w, v.z)?;
    Ok(())
}

/// Write an angle vector as three i16s.
pub fn write_angle_vector(w: &mut dyn Write, a: &AngleVector) -> Result<(), DemoError> {
    write_i16_le(w, a.pitch)?;
    write_i16_le(w, a.bank)?;
    write_i16_le(w, a.heading)?;
    Ok(())
}

/// Write a string in the given layout.
///
/// Canonical strings carry a one-byte length that counts the trailing
/// NUL; legacy strings are just NUL-terminated. Characters map to bytes
/// one-for-one, so only `U+0000..=U+00FF` is encodable.
pub fn write_string(w: &mut dyn Write, s: &str, layout: WireLayout) -> Result<(), DemoError> {
    let bytes = string_bytes(s)?;
    if layout == WireLayout::Canonical {
        let len = bytes.len() + 1;
        if len > MAX_STRING_LEN {
            return Err(DemoError::StringTooLong {
                len,
                max: MAX_STRING_LEN,
            });
        }
        write_u8(w, len as u8)?;
    }
    w.write_all(&bytes)?;
    write_u8(w, 0)
}

fn string_bytes(s: &str) -> Result<Vec<u8>, DemoError> {
    s.chars()
        .map(|ch| match u8::try_from(u32::from(ch)) {
            Ok(0) => Err(DemoError::EmbeddedNul),
            Ok(b) => Ok(b),
            Err(_) => Err(DemoError::UnencodableChar { ch }),
        })
        .collect()
}

// ── Primitive readers ───────────────────────────────────────────

fn read_array<const N: usize>(
    r: &mut dyn Read,
    context: &'static str,
) -> Result<[u8; N], DemoError> {
    let mut buf = [0u8; N];
    r.read_exact(&mut buf).map_err(|e| eof_as_truncation(e, context))?;
    Ok(buf)
}

fn eof_as_truncation(e: io::Error, context: &'static str) -> DemoError {
    if e.kind() == io::ErrorKind::UnexpectedEof {
        DemoError::Truncated { context }
    } else {
        DemoError::Io(e)
    }
}

/// Read a single byte.
pub fn read_u8(r: &mut dyn Read) -> Result<u8, DemoError> {
    Ok(read_array::<1>(r, "u8")?[0])
}

/// Read a little-endian i16.
pub fn read_i16_le(r: &mut dyn Read) -> Result<i16, DemoError> {
    Ok(i16::from_le_bytes(read_array(r, "i16")?))
}

/// Read a little-endian i32.
pub fn read_i32_le(r: &mut dyn Read) -> Result<i32, DemoError> {
    Ok(i32::from_le_bytes(read_array(r, "i32")?))
}

/// Read a little-endian u32.
pub fn read_u32_le(r: &mut dyn Read) -> Result<u32, DemoError> {
    Ok(u32::from_le_bytes(read_array(r, "u32")?))
}

/// Read a fixed-size byte blob.
pub fn read_blob<const N: usize>(r: &mut dyn Read) -> Result<[u8; N], DemoError> {
    read_array(r, "byte blob")
}

/// Read a fixed-point vector.
pub fn read_fix_vector(r: &mut dyn Read) -> Result<FixVector, DemoError> {
    Ok(FixVector {
        x: read_i32_le(r)?,
        y: read_i32_le(r)?,
        z: read_i32_le(r)?,
    })
}

/// Read an angle vector.
pub fn read_angle_vector(r: &mut dyn Read) -> Result<AngleVector, DemoError> {
    Ok(AngleVector {
        pitch: read_i16_le(r)?,
        bank: read_i16_le(r)?,
        heading: read_i16_le(r)?,
    })
}

/// Read a string in the given layout.
///
/// A canonical string ends at its first NUL even if the length prefix
/// claims more bytes; the remainder is consumed and dropped. The last
/// byte under the prefix is the terminator slot and never part of the
/// value, so every decoded string fits a length byte again.
pub fn read_string(r: &mut dyn Read, layout: WireLayout) -> Result<String, DemoError> {
    match layout {
        WireLayout::Canonical => {
            let len = read_u8(r)? as usize;
            let mut buf = vec![0u8; len];
            r.read_exact(&mut buf)
                .map_err(|e| eof_as_truncation(e, "string"))?;
            let body = &buf[..len.saturating_sub(1)];
            let value: String = body
                .iter()
                .take_while(|&&b| b != 0)
                .map(|&b| char::from(b))
                .collect();
            let kept = value.chars().count();
            if len > 0 && (kept + 1 != len || buf[len - 1] != 0) {
                debug!(
                    declared = len,
                    kept,
                    "dropping string bytes past the terminator"
                );
            }
            Ok(value)
        }
        WireLayout::Legacy => {
            let mut s = String::new();
            loop {
                match read_array::<1>(r, "string")?[0] {
                    0 => return Ok(s),
                    b => s.push(char::from(b)),
                }
            }
        }
    }
}

/// Read the next event discriminator.
///
/// Returns `Ok(None)` when the input is cleanly exhausted.
pub fn read_discriminator(r: &mut dyn Read) -> Result<Option<u8>, DemoError> {
    let mut buf = [0u8; 1];
    loop {
        match r.read(&mut buf) {
            Ok(0) => return Ok(None),
            Ok(_) => return Ok(Some(buf[0])),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(DemoError::Io(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn roundtrip_i16(v in any::<i16>()) {
            let mut buf = Vec::new();
            write_i16_le(&mut buf, v).unwrap();
            prop_assert_eq!(read_i16_le(&mut buf.as_slice()).unwrap(), v);
        }

        #[test]
        fn roundtrip_string_both_layouts(s in "[ -~]{0,200}") {
            for layout in [WireLayout::Canonical, WireLayout::Legacy] {
                let mut buf = Vec::new();
                write_string(&mut buf, &s, layout).unwrap();
                let got = read_string(&mut buf.as_slice(), layout).unwrap();
                prop_assert_eq!(&got, &s);
            }
        }
    }

    #[test]
    fn canonical_string_counts_the_nul() {
        let mut buf = Vec::new();
        write_string(&mut buf, "abc", WireLayout::Canonical).unwrap();
        assert_eq!(buf, [4, b'a', b'b', b'c', 0]);
    }

    #[test]
    fn legacy_string_is_nul_terminated() {
        let mut buf = Vec::new();
        write_string(&mut buf, "abc", WireLayout::Legacy).unwrap();
        assert_eq!(buf, [b'a', b'b', b'c', 0]);
    }

    #[test]
    fn canonical_string_stops_at_first_nul() {
        let data = [6u8, b'h', b'i', 0, b'x', b'y', 0, 0xAA];
        let mut cursor = data.as_slice();
        assert_eq!(read_string(&mut cursor, WireLayout::Canonical).unwrap(), "hi");
        assert_eq!(cursor, [0xAA]);
    }

    #[test]
    fn canonical_string_without_nul_loses_terminator_slot() {
        let mut data = vec![u8::MAX];
        data.extend([b'a'; 255]);
        data.push(0xAA);
        let mut cursor = data.as_slice();
        let s = read_string(&mut cursor, WireLayout::Canonical).unwrap();
        assert_eq!(s, "a".repeat(254));
        assert_eq!(cursor, [0xAA]);

        let mut buf = Vec::new();
        write_string(&mut buf, &s, WireLayout::Canonical).unwrap();
        assert_eq!(buf.len(), 256);
        assert_eq!(buf[0], u8::MAX);
        assert_eq!(buf[255], 0);
    }

    #[test]
    fn canonical_empty_prefix_reads_empty_string() {
        let data = [0u8, 0xAA];
        let mut cursor = data.as_slice();
        assert_eq!(read_string(&mut cursor, WireLayout::Canonical).unwrap(), "");
        assert_eq!(cursor, [0xAA]);
    }

    #[test]
    fn high_bytes_map_to_latin1() {
        let s = "caf\u{e9}";
        let mut buf = Vec::new();
        write_string(&mut buf, s, WireLayout::Canonical).unwrap();
        assert_eq!(buf, [5, b'c', b'a', b'f', 0xE9, 0]);
        assert_eq!(read_string(&mut buf.as_slice(), WireLayout::Canonical).unwrap(), s);
    }

    #[test]
    fn unencodable_strings_rejected() {
        let mut buf = Vec::new();
        assert!(matches!(
            write_string(&mut buf, "\u{263a}", WireLayout::Canonical),
            Err(DemoError::UnencodableChar { ch: '\u{263a}' })
        ));
        assert!(matches!(
            write_string(&mut buf, "a\0b", WireLayout::Legacy),
            Err(DemoError::EmbeddedNul)
        ));
        let long = "x".repeat(MAX_STRING_LEN);
        assert!(matches!(
            write_string(&mut buf, &long, WireLayout::Canonical),
            Err(DemoError::StringTooLong { len: 256, max: 255 })
        ));
        assert!(buf.is_empty(), "rejected strings must not write anything");
    }

    #[test]
    fn short_input_is_truncation_not_io() {
        let data = [1u8, 2];
        let err = read_i32_le(&mut data.as_slice()).unwrap_err();
        assert!(err.is_truncation(), "got {err:?}");

        let data = [5u8, b'a'];
        let err = read_string(&mut data.as_slice(), WireLayout::Canonical).unwrap_err();
        assert!(err.is_truncation(), "got {err:?}");

        let data = [b'a', b'b'];
        let err = read_string(&mut data.as_slice(), WireLayout::Legacy).unwrap_err();
        assert!(err.is_truncation(), "got {err:?}");
    }

    #[test]
    fn discriminator_distinguishes_clean_end() {
        let mut empty: &[u8] = &[];
        assert_eq!(read_discriminator(&mut empty).unwrap(), None);
        let data = [7u8];
        assert_eq!(read_discriminator(&mut data.as_slice()).unwrap(), Some(7));
    }

    #[test]
    fn vectors_are_little_endian() {
        let mut buf = Vec::new();
        write_fix_vector(&mut buf, &FixVector::new(1, -1, 0x0102_0304)).unwrap();
        assert_eq!(
            buf,
            [1, 0, 0, 0, 0xFF, 0xFF, 0xFF, 0xFF, 4, 3, 2, 1]
        );
        let mut buf = Vec::new();
        write_angle_vector(&mut buf, &AngleVector::new(1, 2, -2)).unwrap();
        assert_eq!(read_angle_vector(&mut buf.as_slice()).unwrap(), AngleVector::new(1, 2, -2));
    }
}
