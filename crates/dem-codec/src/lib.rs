//! Binary codec for recorded game-session demos.
//!
//! A demo is a flat stream of one-byte-discriminated events. Most events
//! have a layout that depends on the session established earlier in the
//! same stream (the release that made the capture and its game-mode
//! bits), so decoding and encoding are both a single forward pass that
//! threads a [`StreamState`] from event to event.
//!
//! # Architecture
//!
//! - [`DemoReader`] decodes events from any `Read` source
//! - [`DemoWriter`] encodes events to any `Write` sink
//! - [`decode`] and [`encode`] convert whole captures
//! - [`verify_roundtrip`] checks that a capture reproduces byte for byte
//! - [`object`] holds the nested object record shared by three events
//!
//! # Format
//!
//! ```text
//! [StartDemo] [Event] [Event] ... [Eof 0x00] [trailing bytes...]
//! ```
//!
//! All integers are little-endian. Truncated captures are common in the
//! wild; the whole-file decoder keeps every event completed before the
//! input ran out instead of failing.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod codec;
pub mod error;
pub mod event;
pub mod object;
pub mod options;
pub mod reader;
pub mod state;
pub mod types;
pub mod verify;
pub mod writer;

pub use error::DemoError;
pub use object::{
    AnimAngles, Control, GameObject, Lifeleft, ModelRef, Movement, ObjectRecord, Render, ShortPos,
};
pub use options::{CodecOptions, WireLayout};
pub use reader::{DemoReader, Events};
pub use state::{CodecContext, StreamState};
pub use types::*;
pub use verify::{verify_roundtrip, Divergence};
pub use writer::DemoWriter;

use dem_core::GameData;

/// Decode a whole capture in the canonical layout.
///
/// Never fails: unknown or gated discriminators are skipped and a
/// truncated capture yields the events completed before the cut.
///
/// # Examples
///
/// ```
/// use dem_codec::{decode, Event};
/// use dem_core::NoGameData;
///
/// let file = decode(&[23, 0, 0xAA], &NoGameData);
/// assert_eq!(file.events, vec![Event::Letterbox, Event::Eof]);
/// assert_eq!(file.trailing_bytes, [0xAA]);
/// ```
pub fn decode(bytes: &[u8], game_data: &dyn GameData) -> DemoFile {
    decode_with(bytes, game_data, CodecOptions::default())
}

/// Decode a whole capture with explicit options.
pub fn decode_with(bytes: &[u8], game_data: &dyn GameData, options: CodecOptions) -> DemoFile {
    DemoReader::new(bytes, game_data, options).finish_lossy()
}

/// Encode a whole capture in the canonical layout.
pub fn encode(file: &DemoFile, game_data: &dyn GameData) -> Result<Vec<u8>, DemoError> {
    encode_with(file, game_data, CodecOptions::default())
}

/// Encode a whole capture with explicit options.
///
/// Besides the per-event checks of [`DemoWriter`], the file's `edition`
/// and `game_type` must match the session its events establish.
pub fn encode_with(
    file: &DemoFile,
    game_data: &dyn GameData,
    options: CodecOptions,
) -> Result<Vec<u8>, DemoError> {
    let mut writer = DemoWriter::new(Vec::new(), game_data, options);
    for event in &file.events {
        writer.write_event(event)?;
    }
    let state = *writer.state();
    if (state.edition, state.game_type) != (file.edition, file.game_type) {
        return Err(DemoError::SessionMismatch {
            declared_edition: file.edition,
            declared_game_type: file.game_type,
            stream_edition: state.edition,
            stream_game_type: state.game_type,
        });
    }
    writer.finish(&file.trailing_bytes)
}
