//! Data types for demo captures.
//!
//! Optional fields are present or absent as a function of tags that
//! appear earlier in the stream (the session's game type and game mode,
//! or a tag byte inside the same event). Where the choice is between
//! genuinely different shapes the model uses an enum, so the variant
//! that was constructed *is* the presence decision. The remaining
//! `Option` fields are checked against the tags when written.

use dem_core::{FixVector, GameMode, GameType, MAX_PRIMARY_WEAPONS, MAX_SECONDARY_WEAPONS};

use crate::object::GameObject;

/// A decoded demo capture.
///
/// # Examples
///
/// ```
/// use dem_codec::{DemoFile, Event};
///
/// let file = DemoFile {
///     events: vec![Event::Eof],
///     trailing_bytes: vec![0xDE, 0xAD],
///     ..DemoFile::default()
/// };
/// assert!(file.is_terminated());
/// assert!(file.start_demo().is_none());
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DemoFile {
    /// Edition byte of the release that produced the capture.
    pub edition: u8,
    /// Game type established by the session-start event.
    pub game_type: GameType,
    /// Events in stream order.
    pub events: Vec<Event>,
    /// Raw bytes found after the end-of-stream marker.
    pub trailing_bytes: Vec<u8>,
}

impl DemoFile {
    /// The first session-start event, if any.
    pub fn start_demo(&self) -> Option<&StartDemo> {
        self.events.iter().find_map(|e| match e {
            Event::StartDemo(start) => Some(start.as_ref()),
            _ => None,
        })
    }

    /// `true` if the last event is the end-of-stream marker.
    pub fn is_terminated(&self) -> bool {
        matches!(self.events.last(), Some(Event::Eof))
    }

    /// Number of frame-start events, i.e. recorded frames.
    pub fn frame_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, Event::StartFrame { .. }))
            .count()
    }
}

/// One recorded event.
///
/// Each variant has a fixed one-byte discriminator on the wire; see the
/// `EVENT_*` constants.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// End-of-stream marker. Anything after it is trailing data.
    Eof,
    /// Session start; establishes edition and game type.
    StartDemo(Box<StartDemo>),
    /// Start of a recorded frame.
    StartFrame {
        /// Duration of the previous frame.
        last_frame_length: i16,
        /// Running frame counter.
        frame_count: i32,
        /// Game time at the start of the frame.
        recorded_time: i32,
    },
    /// The object the view is rendered from.
    ViewerObject {
        /// Which view window (second edition only).
        window: Option<u8>,
        /// The viewer.
        object: GameObject,
    },
    /// An object drawn this frame.
    RenderObject {
        /// The drawn object.
        object: GameObject,
    },
    /// A non-positional sound.
    Sound {
        /// Sound number.
        sound: i32,
    },
    /// A non-positional sound that plays once.
    SoundOnce {
        /// Sound number.
        sound: i32,
    },
    /// A positional sound.
    Sound3D(Sound3D),
    /// A wall took damage.
    WallHitProcess {
        /// Segment of the wall.
        segment: i32,
        /// Side of the segment.
        side: i32,
        /// Damage dealt.
        damage: i32,
        /// Player responsible.
        player: i32,
    },
    /// A trigger fired.
    Trigger {
        /// Segment of the trigger.
        segment: i32,
        /// Side of the segment.
        side: i32,
        /// Object that tripped it.
        object: i32,
        /// Shot flag (second edition only).
        shot: Option<i32>,
    },
    /// A hostage was rescued.
    HostageRescued {
        /// Hostage number.
        hostage: i32,
    },
    /// A positional sound that plays once.
    Sound3DOnce(Sound3D),
    /// One frame of a morphing robot.
    MorphFrame {
        /// The morphing object.
        object: GameObject,
    },
    /// A wall was toggled.
    WallToggle {
        /// Segment of the wall.
        segment: i32,
        /// Side of the segment.
        side: i32,
    },
    /// A HUD message was shown.
    HudMessage {
        /// Message text.
        message: String,
    },
    /// The reactor was destroyed; countdown running.
    ControlCenterDestroyed {
        /// Seconds left on the countdown.
        countdown_seconds_left: i32,
    },
    /// A palette flash.
    PaletteEffect {
        /// Red component.
        red: i16,
        /// Green component.
        green: i16,
        /// Blue component.
        blue: i16,
    },
    /// Player energy changed.
    PlayerEnergy {
        /// Previous value (absent in shareware captures).
        old: Option<u8>,
        /// New value.
        energy: u8,
    },
    /// Player shield changed.
    PlayerShield {
        /// Previous value (absent in shareware captures).
        old: Option<u8>,
        /// New value.
        shield: u8,
    },
    /// Player flags changed.
    PlayerFlags {
        /// Previous flags.
        old_flags: i16,
        /// New flags.
        flags: i16,
    },
    /// Player switched weapon.
    PlayerWeapon {
        /// 0 = primary, 1 = secondary.
        weapon_type: u8,
        /// Newly selected weapon.
        weapon: u8,
        /// Previously selected weapon (absent in shareware captures).
        old_weapon: Option<u8>,
    },
    /// A wall effect blew up.
    EffectBlowup {
        /// Segment of the effect.
        segment: i16,
        /// Side of the segment.
        side: u8,
        /// Impact point.
        point: FixVector,
    },
    /// Homing missile lock distance.
    HomingDistance {
        /// Distance to the tracking missile.
        distance: i16,
    },
    /// Letterbox view on.
    Letterbox,
    /// Cockpit view restored.
    RestoreCockpit,
    /// Rear view on.
    Rearview,
    /// A wall's primary texture changed.
    WallSetTmapNum1(WallTexture),
    /// A wall's overlay texture changed.
    WallSetTmapNum2(WallTexture),
    /// A new level started.
    NewLevel {
        /// Level entered.
        new_level: u8,
        /// Level left.
        old_level: u8,
        /// Wall state snapshot, present in second-edition captures only
        /// for the first level change after the session starts.
        walls: Option<Vec<WallState>>,
    },
    /// A player cloaked.
    MultiCloak {
        /// Player number.
        player: u8,
    },
    /// A player decloaked.
    MultiDecloak {
        /// Player number.
        player: u8,
    },
    /// Rear view restored.
    RestoreRearview,
    /// A player died.
    MultiDeath {
        /// Player number.
        player: u8,
    },
    /// A player scored a kill.
    MultiKill {
        /// Player number.
        player: u8,
        /// 1 for a kill, 255 for a suicide.
        kills: u8,
    },
    /// A player connected.
    MultiConnect(MultiConnect),
    /// A player reconnected.
    MultiReconnect {
        /// Player number.
        player: u8,
    },
    /// A player disconnected.
    MultiDisconnect {
        /// Player number.
        player: u8,
    },
    /// A player's score changed.
    MultiScore {
        /// Player number.
        player: u8,
        /// New score.
        score: i32,
    },
    /// The local player's score changed.
    PlayerScore {
        /// New score.
        score: i32,
    },
    /// Primary ammo changed.
    PrimaryAmmo {
        /// Previous count.
        old: i16,
        /// New count.
        new: i16,
    },
    /// Secondary ammo changed.
    SecondaryAmmo {
        /// Previous count.
        old: i16,
        /// New count.
        new: i16,
    },
    /// A door started opening.
    DoorOpening {
        /// Segment of the door.
        segment: i16,
        /// Side of the segment.
        side: u8,
    },
    /// Laser level changed.
    ///
    /// Stored as a byte in first-edition captures, so values there must
    /// fit `0..=255`.
    LaserLevel {
        /// Previous level.
        old: i16,
        /// New level.
        new: i16,
    },
    /// Afterburner charge changed.
    PlayerAfterburner {
        /// Previous charge.
        old: i16,
        /// New charge.
        afterburner: i16,
    },
    /// A cloaking wall changed state.
    CloakingWall(CloakingWall),
    /// Cockpit mode changed.
    ChangeCockpit {
        /// New cockpit mode.
        cockpit: i32,
    },
    /// Guided-missile view started.
    StartGuided,
    /// Guided-missile view ended.
    EndGuided,
    /// Secret-level transition flag.
    SecretThingy {
        /// Flag value.
        truth: i32,
    },
    /// A looping sound was attached to an object.
    LinkSoundToObject {
        /// Sound number.
        sound: i32,
        /// Signature of the object.
        signature: i32,
        /// Maximum volume.
        max_volume: i32,
        /// Maximum audible distance.
        max_distance: i32,
        /// Loop start sample.
        loop_start: i32,
        /// Loop end sample.
        loop_end: i32,
    },
    /// A looping sound was detached from an object.
    KillSoundToObject {
        /// Signature of the object.
        signature: i32,
    },
}

impl Event {
    /// The one-byte wire discriminator of this event.
    pub fn discriminator(&self) -> u8 {
        match self {
            Self::Eof => EVENT_EOF,
            Self::StartDemo(_) => EVENT_START_DEMO,
            Self::StartFrame { .. } => EVENT_START_FRAME,
            Self::ViewerObject { .. } => EVENT_VIEWER_OBJECT,
            Self::RenderObject { .. } => EVENT_RENDER_OBJECT,
            Self::Sound { .. } => EVENT_SOUND,
            Self::SoundOnce { .. } => EVENT_SOUND_ONCE,
            Self::Sound3D(_) => EVENT_SOUND_3D,
            Self::WallHitProcess { .. } => EVENT_WALL_HIT_PROCESS,
            Self::Trigger { .. } => EVENT_TRIGGER,
            Self::HostageRescued { .. } => EVENT_HOSTAGE_RESCUED,
            Self::Sound3DOnce(_) => EVENT_SOUND_3D_ONCE,
            Self::MorphFrame { .. } => EVENT_MORPH_FRAME,
            Self::WallToggle { .. } => EVENT_WALL_TOGGLE,
            Self::HudMessage { .. } => EVENT_HUD_MESSAGE,
            Self::ControlCenterDestroyed { .. } => EVENT_CONTROL_CENTER_DESTROYED,
            Self::PaletteEffect { .. } => EVENT_PALETTE_EFFECT,
            Self::PlayerEnergy { .. } => EVENT_PLAYER_ENERGY,
            Self::PlayerShield { .. } => EVENT_PLAYER_SHIELD,
            Self::PlayerFlags { .. } => EVENT_PLAYER_FLAGS,
            Self::PlayerWeapon { .. } => EVENT_PLAYER_WEAPON,
            Self::EffectBlowup { .. } => EVENT_EFFECT_BLOWUP,
            Self::HomingDistance { .. } => EVENT_HOMING_DISTANCE,
            Self::Letterbox => EVENT_LETTERBOX,
            Self::RestoreCockpit => EVENT_RESTORE_COCKPIT,
            Self::Rearview => EVENT_REARVIEW,
            Self::WallSetTmapNum1(_) => EVENT_WALL_SET_TMAP_NUM1,
            Self::WallSetTmapNum2(_) => EVENT_WALL_SET_TMAP_NUM2,
            Self::NewLevel { .. } => EVENT_NEW_LEVEL,
            Self::MultiCloak { .. } => EVENT_MULTI_CLOAK,
            Self::MultiDecloak { .. } => EVENT_MULTI_DECLOAK,
            Self::RestoreRearview => EVENT_RESTORE_REARVIEW,
            Self::MultiDeath { .. } => EVENT_MULTI_DEATH,
            Self::MultiKill { .. } => EVENT_MULTI_KILL,
            Self::MultiConnect(_) => EVENT_MULTI_CONNECT,
            Self::MultiReconnect { .. } => EVENT_MULTI_RECONNECT,
            Self::MultiDisconnect { .. } => EVENT_MULTI_DISCONNECT,
            Self::MultiScore { .. } => EVENT_MULTI_SCORE,
            Self::PlayerScore { .. } => EVENT_PLAYER_SCORE,
            Self::PrimaryAmmo { .. } => EVENT_PRIMARY_AMMO,
            Self::SecondaryAmmo { .. } => EVENT_SECONDARY_AMMO,
            Self::DoorOpening { .. } => EVENT_DOOR_OPENING,
            Self::LaserLevel { .. } => EVENT_LASER_LEVEL,
            Self::PlayerAfterburner { .. } => EVENT_PLAYER_AFTERBURNER,
            Self::CloakingWall(_) => EVENT_CLOAKING_WALL,
            Self::ChangeCockpit { .. } => EVENT_CHANGE_COCKPIT,
            Self::StartGuided => EVENT_START_GUIDED,
            Self::EndGuided => EVENT_END_GUIDED,
            Self::SecretThingy { .. } => EVENT_SECRET_THINGY,
            Self::LinkSoundToObject { .. } => EVENT_LINK_SOUND_TO_OBJECT,
            Self::KillSoundToObject { .. } => EVENT_KILL_SOUND_TO_OBJECT,
        }
    }

    /// Display name of this event.
    pub fn name(&self) -> &'static str {
        event_name(self.discriminator())
    }
}

/// Display name for a discriminator, `"Unknown"` outside `0..=50`.
pub fn event_name(discriminator: u8) -> &'static str {
    EVENT_NAMES
        .get(discriminator as usize)
        .copied()
        .unwrap_or("Unknown")
}

const EVENT_NAMES: [&str; 51] = [
    "Eof",
    "StartDemo",
    "StartFrame",
    "ViewerObject",
    "RenderObject",
    "Sound",
    "SoundOnce",
    "Sound3D",
    "WallHitProcess",
    "Trigger",
    "HostageRescued",
    "Sound3DOnce",
    "MorphFrame",
    "WallToggle",
    "HudMessage",
    "ControlCenterDestroyed",
    "PaletteEffect",
    "PlayerEnergy",
    "PlayerShield",
    "PlayerFlags",
    "PlayerWeapon",
    "EffectBlowup",
    "HomingDistance",
    "Letterbox",
    "RestoreCockpit",
    "Rearview",
    "WallSetTmapNum1",
    "WallSetTmapNum2",
    "NewLevel",
    "MultiCloak",
    "MultiDecloak",
    "RestoreRearview",
    "MultiDeath",
    "MultiKill",
    "MultiConnect",
    "MultiReconnect",
    "MultiDisconnect",
    "MultiScore",
    "PlayerScore",
    "PrimaryAmmo",
    "SecondaryAmmo",
    "DoorOpening",
    "LaserLevel",
    "PlayerAfterburner",
    "CloakingWall",
    "ChangeCockpit",
    "StartGuided",
    "EndGuided",
    "SecretThingy",
    "LinkSoundToObject",
    "KillSoundToObject",
];

/// Session-start event.
#[derive(Clone, Debug, PartialEq)]
pub struct StartDemo {
    /// Edition byte of the producing release.
    pub edition: u8,
    /// Game type of the session.
    pub game_type: GameType,
    /// Game time at recording start.
    pub game_time: i32,
    /// Game-mode bitmask.
    pub game_mode: GameMode,
    /// Edition-specific session block.
    pub session: Session,
    /// Starting energy.
    pub energy: u8,
    /// Starting shield.
    pub shield: u8,
    /// Player flags.
    pub flags: i32,
    /// Selected primary weapon.
    pub primary_weapon: u8,
    /// Selected secondary weapon.
    pub secondary_weapon: u8,
}

/// Edition-specific part of the session header.
#[derive(Clone, Debug, PartialEq)]
pub enum Session {
    /// Shareware sessions record only a team vector, and only in multiplayer.
    Shareware {
        /// Team assignment bits (present iff multiplayer).
        team_vector: Option<u8>,
    },
    /// Full and second-edition sessions.
    Registered(RegisteredSession),
}

/// Session block of full and second-edition captures.
#[derive(Clone, Debug, PartialEq)]
pub struct RegisteredSession {
    /// Team setup (present iff the team bit is set).
    pub teams: Option<Teams>,
    /// Score block.
    pub scoring: Scoring,
    /// Primary ammo counts.
    pub primary_ammo: [i16; MAX_PRIMARY_WEAPONS],
    /// Secondary ammo counts.
    pub secondary_ammo: [i16; MAX_SECONDARY_WEAPONS],
    /// Laser level.
    pub laser_level: u8,
    /// Mission name.
    pub current_mission: String,
}

/// Team setup of a team game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Teams {
    /// Team assignment bits.
    pub team_vector: u8,
    /// Names of the two teams.
    pub names: [String; 2],
}

/// Score block of a registered session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Scoring {
    /// Single-player score.
    Solo {
        /// Score.
        score: i32,
    },
    /// Per-player records of a multiplayer game.
    Multiplayer {
        /// Player records, at most 255.
        players: Vec<PlayerInfo>,
    },
}

/// One player record of a multiplayer session header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerInfo {
    /// Player callsign.
    pub callsign: String,
    /// Connection state.
    pub connected: u8,
    /// Score or kill tally, by game mode.
    pub tally: PlayerTally,
}

/// Per-player tally; the cooperative bit decides which.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerTally {
    /// Cooperative games track score.
    Cooperative {
        /// Score.
        score: i32,
    },
    /// Competitive games track kills.
    Competitive {
        /// Times killed.
        killed_total: i16,
        /// Kills made.
        kills_total: i16,
    },
}

/// Positional sound payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sound3D {
    /// Sound number.
    pub sound: i32,
    /// Stereo angle.
    pub angle: i32,
    /// Volume.
    pub volume: i32,
}

/// Wall texture change payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WallTexture {
    /// Segment of the wall.
    pub segment: i16,
    /// Side of the segment.
    pub side: u8,
    /// Connected segment.
    pub connected_segment: i16,
    /// Side of the connected segment.
    pub connected_side: u8,
    /// New texture number.
    pub tmap: i16,
}

/// Saved state of one wall in a new-level snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WallState {
    /// Wall type.
    pub wall_type: u8,
    /// Wall flags.
    pub flags: u8,
    /// Wall state.
    pub state: u8,
    /// Primary texture of the wall's side.
    pub tmap_num1: i16,
    /// Overlay texture of the wall's side.
    pub tmap_num2: i16,
}

/// Player-connect payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MultiConnect {
    /// Player slot.
    pub player: u8,
    /// Zero when the slot was previously held by someone else.
    pub new_player: u8,
    /// Previous holder of the slot (present iff `new_player == 0`).
    pub previous: Option<PreviousOccupant>,
    /// Callsign of the connecting player.
    pub callsign: String,
}

/// Previous holder of a reused player slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreviousOccupant {
    /// Their callsign.
    pub callsign: String,
    /// Times they were killed.
    pub killed_total: i32,
    /// Kills they made.
    pub kills_total: i32,
}

/// Cloaking wall payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CloakingWall {
    /// Front wall number.
    pub front_wall: u8,
    /// Back wall number.
    pub back_wall: u8,
    /// Wall type.
    pub wall_type: u8,
    /// Wall state.
    pub state: u8,
    /// Cloak amount.
    pub cloak_value: u8,
    /// Per-corner light values.
    pub light: [i16; 4],
}

// ── Event discriminator constants ───────────────────────────────

/// Discriminator for [`Event::Eof`].
pub const EVENT_EOF: u8 = 0;
/// Discriminator for [`Event::StartDemo`].
pub const EVENT_START_DEMO: u8 = 1;
/// Discriminator for [`Event::StartFrame`].
pub const EVENT_START_FRAME: u8 = 2;
/// Discriminator for [`Event::ViewerObject`].
pub const EVENT_VIEWER_OBJECT: u8 = 3;
/// Discriminator for [`Event::RenderObject`].
pub const EVENT_RENDER_OBJECT: u8 = 4;
/// Discriminator for [`Event::Sound`].
pub const EVENT_SOUND: u8 = 5;
/// Discriminator for [`Event::SoundOnce`].
pub const EVENT_SOUND_ONCE: u8 = 6;
/// Discriminator for [`Event::Sound3D`].
pub const EVENT_SOUND_3D: u8 = 7;
/// Discriminator for [`Event::WallHitProcess`].
pub const EVENT_WALL_HIT_PROCESS: u8 = 8;
/// Discriminator for [`Event::Trigger`].
pub const EVENT_TRIGGER: u8 = 9;
/// Discriminator for [`Event::HostageRescued`].
pub const EVENT_HOSTAGE_RESCUED: u8 = 10;
/// Discriminator for [`Event::Sound3DOnce`].
pub const EVENT_SOUND_3D_ONCE: u8 = 11;
/// Discriminator for [`Event::MorphFrame`].
pub const EVENT_MORPH_FRAME: u8 = 12;
/// Discriminator for [`Event::WallToggle`].
pub const EVENT_WALL_TOGGLE: u8 = 13;
/// Discriminator for [`Event::HudMessage`].
pub const EVENT_HUD_MESSAGE: u8 = 14;
/// Discriminator for [`Event::ControlCenterDestroyed`].
pub const EVENT_CONTROL_CENTER_DESTROYED: u8 = 15;
/// Discriminator for [`Event::PaletteEffect`].
pub const EVENT_PALETTE_EFFECT: u8 = 16;
/// Discriminator for [`Event::PlayerEnergy`].
pub const EVENT_PLAYER_ENERGY: u8 = 17;
/// Discriminator for [`Event::PlayerShield`].
pub const EVENT_PLAYER_SHIELD: u8 = 18;
/// Discriminator for [`Event::PlayerFlags`].
pub const EVENT_PLAYER_FLAGS: u8 = 19;
/// Discriminator for [`Event::PlayerWeapon`].
pub const EVENT_PLAYER_WEAPON: u8 = 20;
/// Discriminator for [`Event::EffectBlowup`].
pub const EVENT_EFFECT_BLOWUP: u8 = 21;
/// Discriminator for [`Event::HomingDistance`].
pub const EVENT_HOMING_DISTANCE: u8 = 22;
/// Discriminator for [`Event::Letterbox`].
pub const EVENT_LETTERBOX: u8 = 23;
/// Discriminator for [`Event::RestoreCockpit`].
pub const EVENT_RESTORE_COCKPIT: u8 = 24;
/// Discriminator for [`Event::Rearview`].
pub const EVENT_REARVIEW: u8 = 25;
/// Discriminator for [`Event::WallSetTmapNum1`].
pub const EVENT_WALL_SET_TMAP_NUM1: u8 = 26;
/// Discriminator for [`Event::WallSetTmapNum2`].
pub const EVENT_WALL_SET_TMAP_NUM2: u8 = 27;
/// Discriminator for [`Event::NewLevel`].
pub const EVENT_NEW_LEVEL: u8 = 28;
/// Discriminator for [`Event::MultiCloak`].
pub const EVENT_MULTI_CLOAK: u8 = 29;
/// Discriminator for [`Event::MultiDecloak`].
pub const EVENT_MULTI_DECLOAK: u8 = 30;
/// Discriminator for [`Event::RestoreRearview`].
pub const EVENT_RESTORE_REARVIEW: u8 = 31;
/// Discriminator for [`Event::MultiDeath`].
pub const EVENT_MULTI_DEATH: u8 = 32;
/// Discriminator for [`Event::MultiKill`].
pub const EVENT_MULTI_KILL: u8 = 33;
/// Discriminator for [`Event::MultiConnect`].
pub const EVENT_MULTI_CONNECT: u8 = 34;
/// Discriminator for [`Event::MultiReconnect`].
pub const EVENT_MULTI_RECONNECT: u8 = 35;
/// Discriminator for [`Event::MultiDisconnect`].
pub const EVENT_MULTI_DISCONNECT: u8 = 36;
/// Discriminator for [`Event::MultiScore`].
pub const EVENT_MULTI_SCORE: u8 = 37;
/// Discriminator for [`Event::PlayerScore`].
pub const EVENT_PLAYER_SCORE: u8 = 38;
/// Discriminator for [`Event::PrimaryAmmo`].
pub const EVENT_PRIMARY_AMMO: u8 = 39;
/// Discriminator for [`Event::SecondaryAmmo`].
pub const EVENT_SECONDARY_AMMO: u8 = 40;
/// Discriminator for [`Event::DoorOpening`].
pub const EVENT_DOOR_OPENING: u8 = 41;
/// Discriminator for [`Event::LaserLevel`].
pub const EVENT_LASER_LEVEL: u8 = 42;
/// Discriminator for [`Event::PlayerAfterburner`].
pub const EVENT_PLAYER_AFTERBURNER: u8 = 43;
/// Discriminator for [`Event::CloakingWall`].
pub const EVENT_CLOAKING_WALL: u8 = 44;
/// Discriminator for [`Event::ChangeCockpit`].
pub const EVENT_CHANGE_COCKPIT: u8 = 45;
/// Discriminator for [`Event::StartGuided`].
pub const EVENT_START_GUIDED: u8 = 46;
/// Discriminator for [`Event::EndGuided`].
pub const EVENT_END_GUIDED: u8 = 47;
/// Discriminator for [`Event::SecretThingy`].
pub const EVENT_SECRET_THINGY: u8 = 48;
/// Discriminator for [`Event::LinkSoundToObject`].
pub const EVENT_LINK_SOUND_TO_OBJECT: u8 = 49;
/// Discriminator for [`Event::KillSoundToObject`].
pub const EVENT_KILL_SOUND_TO_OBJECT: u8 = 50;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_line_up_with_discriminators() {
        assert_eq!(event_name(EVENT_EOF), "Eof");
        assert_eq!(event_name(EVENT_NEW_LEVEL), "NewLevel");
        assert_eq!(event_name(EVENT_LASER_LEVEL), "LaserLevel");
        assert_eq!(event_name(EVENT_KILL_SOUND_TO_OBJECT), "KillSoundToObject");
        assert_eq!(event_name(51), "Unknown");
        assert_eq!(Event::StartGuided.name(), "StartGuided");
        assert_eq!(
            Event::Sound3DOnce(Sound3D {
                sound: 1,
                angle: 2,
                volume: 3
            })
            .discriminator(),
            EVENT_SOUND_3D_ONCE
        );
    }

    #[test]
    fn frame_count_counts_frame_starts() {
        let frame = Event::StartFrame {
            last_frame_length: 1,
            frame_count: 1,
            recorded_time: 0,
        };
        let file = DemoFile {
            events: vec![frame.clone(), Event::Letterbox, frame, Event::Eof],
            ..DemoFile::default()
        };
        assert_eq!(file.frame_count(), 2);
        assert!(file.is_terminated());
    }
}
