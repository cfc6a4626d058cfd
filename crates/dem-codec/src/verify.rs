//! Byte-exact round-trip verification.
//!
//! Decodes a capture, encodes the result again and compares the two byte
//! strings. A capture written in the wrong [`WireLayout`], one with
//! skipped discriminators, or one cut short will not reproduce; the
//! report points at the first differing byte and the event it falls in.
//!
//! [`WireLayout`]: crate::WireLayout

use dem_core::GameData;

use crate::error::DemoError;
use crate::options::CodecOptions;
use crate::reader::DemoReader;
use crate::writer::DemoWriter;

/// First point where a re-encoded capture departs from the original.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Divergence {
    /// Offset of the first differing byte.
    pub byte_offset: usize,
    /// Index of the re-encoded event covering that offset, or `None` if
    /// it lies in the trailing bytes or past the re-encoded output.
    pub event_index: Option<usize>,
    /// Original byte at the offset, `None` past the end of the input.
    pub original: Option<u8>,
    /// Re-encoded byte at the offset, `None` past the end of the output.
    pub reencoded: Option<u8>,
}

/// Decode `bytes`, re-encode, and report the first divergence.
///
/// Returns `Ok(None)` when the capture reproduces exactly.
///
/// # Examples
///
/// ```
/// use dem_codec::{verify_roundtrip, CodecOptions};
/// use dem_core::NoGameData;
///
/// let exact = [23u8, 0, 1, 2];
/// assert_eq!(verify_roundtrip(&exact, &NoGameData, CodecOptions::default()).unwrap(), None);
///
/// // A sound event cut short after two body bytes.
/// let cut = [23u8, 5, 1, 2];
/// let report = verify_roundtrip(&cut, &NoGameData, CodecOptions::default())
///     .unwrap()
///     .unwrap();
/// assert_eq!(report.byte_offset, 1);
/// assert_eq!(report.reencoded, None);
/// ```
pub fn verify_roundtrip(
    bytes: &[u8],
    game_data: &dyn GameData,
    options: CodecOptions,
) -> Result<Option<Divergence>, DemoError> {
    let file = DemoReader::new(bytes, game_data, options).finish()?;

    let mut writer = DemoWriter::new(Vec::new(), game_data, options);
    let mut event_ends = Vec::with_capacity(file.events.len());
    for event in &file.events {
        writer.write_event(event)?;
        event_ends.push(writer.get_ref().len());
    }
    let reencoded = writer.finish(&file.trailing_bytes)?;

    let byte_offset = match bytes.iter().zip(&reencoded).position(|(a, b)| a != b) {
        Some(offset) => offset,
        None if bytes.len() == reencoded.len() => return Ok(None),
        None => bytes.len().min(reencoded.len()),
    };
    let event_index = event_ends.iter().position(|&end| byte_offset < end);

    Ok(Some(Divergence {
        byte_offset,
        event_index,
        original: bytes.get(byte_offset).copied(),
        reencoded: reencoded.get(byte_offset).copied(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::*;
    use dem_core::NoGameData;

    #[test]
    fn skipped_discriminator_is_located() {
        let bytes = [EVENT_LETTERBOX, EVENT_SECRET_THINGY, EVENT_REARVIEW, EVENT_EOF];
        let report = verify_roundtrip(&bytes, &NoGameData, CodecOptions::default())
            .unwrap()
            .unwrap();
        assert_eq!(
            report,
            Divergence {
                byte_offset: 1,
                event_index: Some(1),
                original: Some(EVENT_SECRET_THINGY),
                reencoded: Some(EVENT_REARVIEW),
            }
        );
    }

    #[test]
    fn trailing_bytes_reproduce() {
        let bytes = [EVENT_EOF, 9, 8, 7];
        assert_eq!(
            verify_roundtrip(&bytes, &NoGameData, CodecOptions::legacy()).unwrap(),
            None
        );
    }
}
