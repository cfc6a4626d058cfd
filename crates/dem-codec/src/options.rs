//! Codec configuration.
//!
//! [`CodecOptions`] selects the wire layout. Two layouts of the same
//! event grammar exist in the wild; the codec never guesses which one a
//! capture uses, so the caller picks.

use dem_core::{GameModeFlags, GameType, MAX_SUBMODELS};

/// Byte layout variant of the demo format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum WireLayout {
    /// Length-prefixed strings, orientation matrix in compact positions,
    /// boss-gated cloak byte, submodel counts from game data.
    #[default]
    Canonical,
    /// NUL-terminated strings, trailing pitch/bank/heading in compact
    /// positions, cloak byte on every robot, fixed submodel count.
    Legacy,
}

impl WireLayout {
    /// Game-mode masks this layout's session header is written with.
    pub fn mode_flags(self) -> GameModeFlags {
        match self {
            Self::Canonical => GameModeFlags::CANONICAL,
            Self::Legacy => GameModeFlags::LEGACY,
        }
    }

    /// Fixed animation-angle count, or `None` when game data decides.
    pub fn fixed_submodel_count(self) -> Option<usize> {
        match self {
            Self::Canonical => None,
            Self::Legacy => Some(MAX_SUBMODELS),
        }
    }

    /// Whether laser levels are stored as single bytes for `game_type`.
    pub fn laser_level_is_byte(self, game_type: GameType) -> bool {
        match self {
            Self::Canonical => !game_type.is_second_edition(),
            Self::Legacy => false,
        }
    }
}

/// Options shared by [`DemoReader`](crate::DemoReader) and
/// [`DemoWriter`](crate::DemoWriter).
///
/// # Examples
///
/// ```
/// use dem_codec::{CodecOptions, WireLayout};
///
/// assert_eq!(CodecOptions::default().layout, WireLayout::Canonical);
/// assert_eq!(CodecOptions::legacy().layout, WireLayout::Legacy);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CodecOptions {
    /// Byte layout to read and write.
    pub layout: WireLayout,
}

impl CodecOptions {
    /// Options for the legacy layout.
    pub fn legacy() -> Self {
        Self {
            layout: WireLayout::Legacy,
        }
    }

    /// Replace the wire layout.
    pub fn with_layout(mut self, layout: WireLayout) -> Self {
        self.layout = layout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn laser_level_width_follows_edition() {
        let canonical = WireLayout::Canonical;
        assert!(canonical.laser_level_is_byte(GameType::FULL));
        assert!(!canonical.laser_level_is_byte(GameType::SECOND_EDITION));
        assert!(!WireLayout::Legacy.laser_level_is_byte(GameType::FULL));
    }

    #[test]
    fn legacy_fixes_the_submodel_count() {
        assert_eq!(WireLayout::Canonical.fixed_submodel_count(), None);
        assert_eq!(WireLayout::Legacy.fixed_submodel_count(), Some(MAX_SUBMODELS));
    }
}
