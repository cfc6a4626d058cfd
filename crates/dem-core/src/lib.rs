//! Core types and traits for the demo codec.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the value types shared by every layer of the codec: fixed-point
//! vectors, the tag newtypes that drive conditional record layout, the
//! game-mode flag sets, and the [`GameData`] lookup provider.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod fixed;
pub mod game_data;
pub mod tags;

pub use fixed::{AngleVector, FixVector};
pub use game_data::{GameData, GameDataTable, NoGameData};
pub use tags::{
    ControlType, GameMode, GameModeFlags, GameType, MovementType, ObjectType, RenderType,
};

/// Number of primary weapon slots recorded in a session header.
pub const MAX_PRIMARY_WEAPONS: usize = 5;

/// Number of secondary weapon slots recorded in a session header.
pub const MAX_SECONDARY_WEAPONS: usize = 5;

/// Upper bound on polygon-model submodels.
///
/// The legacy wire layout always records this many animation angles.
pub const MAX_SUBMODELS: usize = 10;

/// Robot id reserved for the second edition's reactor robot, which never moves.
pub const REACTOR_ROBOT_ID: u8 = 53;
