//! Tag newtypes that drive conditional record layout.
//!
//! Every tag is a transparent wrapper over the raw byte found on the
//! wire. Named constants cover the values the codec branches on; any
//! other byte is still representable, so decoding never has to reject
//! an unfamiliar tag.

use std::fmt;

macro_rules! byte_tag {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub u8);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u8> for $name {
            fn from(v: u8) -> Self {
                Self(v)
            }
        }

        impl From<$name> for u8 {
            fn from(v: $name) -> u8 {
                v.0
            }
        }
    };
}

byte_tag!(
    /// Which game release produced a capture.
    ///
    /// Ordered, so `game_type >= GameType::FULL` reads the way the
    /// feature gates are phrased.
    GameType
);

impl GameType {
    /// No session has been established yet.
    pub const UNSET: Self = Self(0);
    /// First edition, shareware release.
    pub const SHAREWARE: Self = Self(1);
    /// First edition, full release.
    pub const FULL: Self = Self(2);
    /// Second edition.
    pub const SECOND_EDITION: Self = Self(3);

    /// `true` for the shareware release.
    pub fn is_shareware(self) -> bool {
        self == Self::SHAREWARE
    }

    /// `true` for the full first edition or anything later.
    pub fn is_registered(self) -> bool {
        self >= Self::FULL
    }

    /// `true` for the second edition.
    pub fn is_second_edition(self) -> bool {
        self == Self::SECOND_EDITION
    }
}

byte_tag!(
    /// Kind of in-game object.
    ObjectType
);

impl ObjectType {
    /// A wall (never recorded as a live object, listed for completeness).
    pub const WALL: Self = Self(0);
    /// An explosion fireball.
    pub const FIREBALL: Self = Self(1);
    /// An AI-controlled robot.
    pub const ROBOT: Self = Self(2);
    /// A rescuable hostage.
    pub const HOSTAGE: Self = Self(3);
    /// A player ship.
    pub const PLAYER: Self = Self(4);
    /// A weapon projectile.
    pub const WEAPON: Self = Self(5);
    /// A camera; the one exception to the unrendered-object shortcut.
    pub const CAMERA: Self = Self(6);
    /// A collectible powerup.
    pub const POWERUP: Self = Self(7);
    /// A piece of debris.
    pub const DEBRIS: Self = Self(8);
    /// The reactor.
    pub const CNTRLCEN: Self = Self(9);
    /// A flare.
    pub const FLARE: Self = Self(10);
    /// Static clutter.
    pub const CLUTTER: Self = Self(11);
    /// A ghost (dead player placeholder).
    pub const GHOST: Self = Self(12);
    /// A light source.
    pub const LIGHT: Self = Self(13);
    /// A co-op player start.
    pub const COOP: Self = Self(14);
    /// A level marker.
    pub const MARKER: Self = Self(15);
}

byte_tag!(
    /// How an object is drawn.
    RenderType
);

impl RenderType {
    /// Not drawn.
    pub const NONE: Self = Self(0);
    /// A polygon model.
    pub const POLYOBJ: Self = Self(1);
    /// An animated fireball.
    pub const FIREBALL: Self = Self(2);
    /// A laser bolt.
    pub const LASER: Self = Self(3);
    /// A hostage sprite.
    pub const HOSTAGE: Self = Self(4);
    /// A powerup sprite.
    pub const POWERUP: Self = Self(5);
    /// A polygon model mid-morph.
    pub const MORPH: Self = Self(6);
    /// A weapon drawn as an animated clip.
    pub const WEAPON_VCLIP: Self = Self(7);

    /// Render types drawn from a polygon model.
    pub fn is_polygon(self) -> bool {
        matches!(self, Self::POLYOBJ | Self::MORPH)
    }

    /// Render types drawn from an animated clip.
    pub fn is_vclip(self) -> bool {
        matches!(
            self,
            Self::POWERUP | Self::WEAPON_VCLIP | Self::FIREBALL | Self::HOSTAGE
        )
    }
}

byte_tag!(
    /// What drives an object's behaviour.
    ControlType
);

impl ControlType {
    /// No controller.
    pub const NONE: Self = Self(0);
    /// Robot AI.
    pub const AI: Self = Self(1);
    /// A timed explosion.
    pub const EXPLOSION: Self = Self(2);
    /// Powerup or hostage pickup logic.
    pub const POWERUP: Self = Self(13);
    /// A light source.
    pub const LIGHT: Self = Self(14);
}

byte_tag!(
    /// How an object moves.
    MovementType
);

impl MovementType {
    /// Stationary.
    pub const NONE: Self = Self(0);
    /// Simulated velocity and thrust.
    pub const PHYSICS: Self = Self(1);
    /// Constant spin.
    pub const SPINNING: Self = Self(3);
}

/// Session game-mode bitmask recorded in the session header.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct GameMode(pub u32);

impl GameMode {
    /// `true` if any bit of `mask` is set.
    pub fn intersects(self, mask: u32) -> bool {
        self.0 & mask != 0
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#06x}", self.0)
    }
}

impl From<u32> for GameMode {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Masks for the game-mode bits the session header branches on.
///
/// Two flag sets are in circulation: the game's own constants, where
/// "multiplayer" is any of the serial, network, or modem bits, and an
/// older compact set.
///
/// # Examples
///
/// ```
/// use dem_core::{GameMode, GameModeFlags};
///
/// let flags = GameModeFlags::CANONICAL;
/// let mode = GameMode(0x04 | 0x10); // network + cooperative
/// assert!(flags.is_multiplayer(mode));
/// assert!(flags.is_cooperative(mode));
/// assert!(!flags.is_team(mode));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameModeFlags {
    /// Any bit here marks a multiplayer session.
    pub multiplayer: u32,
    /// Team play.
    pub team: u32,
    /// Cooperative play.
    pub cooperative: u32,
}

impl GameModeFlags {
    /// The game's own constants.
    pub const CANONICAL: Self = Self {
        multiplayer: 0x02 | 0x04 | 0x20,
        team: 0x100,
        cooperative: 0x10,
    };

    /// The older compact flag set.
    pub const LEGACY: Self = Self {
        multiplayer: 0x01,
        team: 0x02,
        cooperative: 0x04,
    };

    /// `true` if `mode` describes a multiplayer session.
    pub fn is_multiplayer(&self, mode: GameMode) -> bool {
        mode.intersects(self.multiplayer)
    }

    /// `true` if `mode` describes team play.
    pub fn is_team(&self, mode: GameMode) -> bool {
        mode.intersects(self.team)
    }

    /// `true` if `mode` describes cooperative play.
    pub fn is_cooperative(&self, mode: GameMode) -> bool {
        mode.intersects(self.cooperative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_type_ordering_matches_feature_gates() {
        assert!(!GameType::UNSET.is_registered());
        assert!(!GameType::SHAREWARE.is_registered());
        assert!(GameType::FULL.is_registered());
        assert!(GameType::SECOND_EDITION.is_registered());
        assert!(GameType::SECOND_EDITION.is_second_edition());
        assert!(!GameType::FULL.is_second_edition());
    }

    #[test]
    fn render_type_groups_are_disjoint() {
        for raw in 0..=u8::MAX {
            let rt = RenderType(raw);
            assert!(!(rt.is_polygon() && rt.is_vclip()), "render type {raw}");
        }
        assert!(RenderType::MORPH.is_polygon());
        assert!(RenderType::HOSTAGE.is_vclip());
        assert!(!RenderType::LASER.is_polygon());
        assert!(!RenderType::LASER.is_vclip());
    }

    #[test]
    fn legacy_flags_are_single_bits() {
        let flags = GameModeFlags::LEGACY;
        assert!(flags.is_multiplayer(GameMode(1)));
        assert!(flags.is_team(GameMode(2)));
        assert!(flags.is_cooperative(GameMode(4)));
        assert!(!flags.is_multiplayer(GameMode(0x100)));
    }

    #[test]
    fn unknown_tags_survive_conversion() {
        let t = ObjectType::from(200);
        assert_eq!(u8::from(t), 200);
        assert_eq!(t.to_string(), "200");
    }
}
