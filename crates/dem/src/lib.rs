//! Dem: reader and writer for recorded game-session demos.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the dem sub-crates. Most users only need this one dependency.
//!
//! # Quick start
//!
//! ```rust
//! use dem::prelude::*;
//!
//! let file = DemoFile {
//!     events: vec![Event::Letterbox, Event::Eof],
//!     trailing_bytes: vec![0x42],
//!     ..DemoFile::default()
//! };
//! let bytes = encode(&file, &NoGameData).unwrap();
//! assert_eq!(bytes, [23, 0, 0x42]);
//! assert_eq!(decode(&bytes, &NoGameData), file);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `dem-core` | Tags, fixed-point vectors, the game-data provider |
//! | [`codec`] | `dem-codec` | Events, object records, streaming reader and writer |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Tags, fixed-point vectors and the game-data provider (`dem-core`).
///
/// Implement [`types::GameData`] to supply submodel counts and boss
/// flags from the game's asset files, or use [`types::GameDataTable`].
pub use dem_core as types;

/// Event model and codec (`dem-codec`).
///
/// Stream with [`codec::DemoReader`] and [`codec::DemoWriter`], or
/// convert whole captures with [`codec::decode`] and [`codec::encode`].
pub use dem_codec as codec;

/// Common imports for typical use.
///
/// ```rust
/// use dem::prelude::*;
/// ```
pub mod prelude {
    // Core types and traits
    pub use dem_core::{
        GameData, GameDataTable, GameMode, GameType, NoGameData, ObjectType, RenderType,
    };

    // Model
    pub use dem_codec::{DemoFile, Event, GameObject, ObjectRecord, StartDemo};

    // Codec
    pub use dem_codec::{
        decode, decode_with, encode, encode_with, verify_roundtrip, CodecOptions, DemoReader,
        DemoWriter, WireLayout,
    };

    // Errors
    pub use dem_codec::DemoError;
}
