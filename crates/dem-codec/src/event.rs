//! Per-event encode/decode, dispatched on the discriminator byte.
//!
//! Three discriminator ranges exist: `0..=31` are valid in every session,
//! `32..=42` need a registered (full or second-edition) session, and
//! `43..=50` need a second-edition session. Anything above 50 is unknown.

use std::io::{Read, Write};

use dem_core::{GameModeFlags, GameType, MAX_PRIMARY_WEAPONS, MAX_SECONDARY_WEAPONS};

use crate::codec::{
    read_fix_vector, read_i16_le, read_i32_le, read_string, read_u32_le, read_u8,
    write_fix_vector, write_i16_le, write_i32_le, write_string, write_u32_le, write_u8,
};
use crate::error::DemoError;
use crate::object::{read_object, write_object};
use crate::state::CodecContext;
use crate::types::*;

/// Upper bound on entries reserved up front for a count read from the stream.
const PREALLOC_CAP: usize = 64;

/// Whether events with `discriminator` may appear in a session of `game_type`.
///
/// # Examples
///
/// ```
/// use dem_codec::event::is_applicable;
/// use dem_codec::EVENT_PLAYER_AFTERBURNER;
/// use dem_core::GameType;
///
/// assert!(!is_applicable(EVENT_PLAYER_AFTERBURNER, GameType::SHAREWARE));
/// assert!(is_applicable(EVENT_PLAYER_AFTERBURNER, GameType::SECOND_EDITION));
/// ```
pub fn is_applicable(discriminator: u8, game_type: GameType) -> bool {
    match discriminator {
        EVENT_EOF..=EVENT_RESTORE_REARVIEW => true,
        EVENT_MULTI_DEATH..=EVENT_LASER_LEVEL => game_type.is_registered(),
        EVENT_PLAYER_AFTERBURNER..=EVENT_KILL_SOUND_TO_OBJECT => game_type.is_second_edition(),
        _ => false,
    }
}

// ── Decoding ────────────────────────────────────────────────────

/// Decode the body of one event whose discriminator was already read.
///
/// Returns `Ok(None)` if the discriminator is unknown or not applicable
/// to the session; no body bytes are consumed in that case.
pub fn read_event(
    r: &mut dyn Read,
    discriminator: u8,
    ctx: &CodecContext<'_>,
) -> Result<Option<Event>, DemoError> {
    if !is_applicable(discriminator, ctx.game_type()) {
        return Ok(None);
    }
    let second_edition = ctx.game_type().is_second_edition();
    let shareware = ctx.game_type().is_shareware();

    let event = match discriminator {
        EVENT_EOF => Event::Eof,
        EVENT_START_DEMO => Event::StartDemo(Box::new(read_start_demo(r, ctx)?)),
        EVENT_START_FRAME => Event::StartFrame {
            last_frame_length: read_i16_le(r)?,
            frame_count: read_i32_le(r)?,
            recorded_time: read_i32_le(r)?,
        },
        EVENT_VIEWER_OBJECT => Event::ViewerObject {
            window: if second_edition {
                Some(read_u8(r)?)
            } else {
                None
            },
            object: read_object(r, ctx)?,
        },
        EVENT_RENDER_OBJECT => Event::RenderObject {
            object: read_object(r, ctx)?,
        },
        EVENT_SOUND => Event::Sound {
            sound: read_i32_le(r)?,
        },
        EVENT_SOUND_ONCE => Event::SoundOnce {
            sound: read_i32_le(r)?,
        },
        EVENT_SOUND_3D => Event::Sound3D(read_sound_3d(r)?),
        EVENT_WALL_HIT_PROCESS => Event::WallHitProcess {
            segment: read_i32_le(r)?,
            side: read_i32_le(r)?,
            damage: read_i32_le(r)?,
            player: read_i32_le(r)?,
        },
        EVENT_TRIGGER => Event::Trigger {
            segment: read_i32_le(r)?,
            side: read_i32_le(r)?,
            object: read_i32_le(r)?,
            shot: if second_edition {
                Some(read_i32_le(r)?)
            } else {
                None
            },
        },
        EVENT_HOSTAGE_RESCUED => Event::HostageRescued {
            hostage: read_i32_le(r)?,
        },
        EVENT_SOUND_3D_ONCE => Event::Sound3DOnce(read_sound_3d(r)?),
        EVENT_MORPH_FRAME => Event::MorphFrame {
            object: read_object(r, ctx)?,
        },
        EVENT_WALL_TOGGLE => Event::WallToggle {
            segment: read_i32_le(r)?,
            side: read_i32_le(r)?,
        },
        EVENT_HUD_MESSAGE => Event::HudMessage {
            message: read_string(r, ctx.layout)?,
        },
        EVENT_CONTROL_CENTER_DESTROYED => Event::ControlCenterDestroyed {
            countdown_seconds_left: read_i32_le(r)?,
        },
        EVENT_PALETTE_EFFECT => Event::PaletteEffect {
            red: read_i16_le(r)?,
            green: read_i16_le(r)?,
            blue: read_i16_le(r)?,
        },
        EVENT_PLAYER_ENERGY => {
            let old = if shareware { None } else { Some(read_u8(r)?) };
            Event::PlayerEnergy {
                old,
                energy: read_u8(r)?,
            }
        }
        EVENT_PLAYER_SHIELD => {
            let old = if shareware { None } else { Some(read_u8(r)?) };
            Event::PlayerShield {
                old,
                shield: read_u8(r)?,
            }
        }
        EVENT_PLAYER_FLAGS => Event::PlayerFlags {
            old_flags: read_i16_le(r)?,
            flags: read_i16_le(r)?,
        },
        EVENT_PLAYER_WEAPON => Event::PlayerWeapon {
            weapon_type: read_u8(r)?,
            weapon: read_u8(r)?,
            old_weapon: if shareware { None } else { Some(read_u8(r)?) },
        },
        EVENT_EFFECT_BLOWUP => Event::EffectBlowup {
            segment: read_i16_le(r)?,
            side: read_u8(r)?,
            point: read_fix_vector(r)?,
        },
        EVENT_HOMING_DISTANCE => Event::HomingDistance {
            distance: read_i16_le(r)?,
        },
        EVENT_LETTERBOX => Event::Letterbox,
        EVENT_RESTORE_COCKPIT => Event::RestoreCockpit,
        EVENT_REARVIEW => Event::Rearview,
        EVENT_WALL_SET_TMAP_NUM1 => Event::WallSetTmapNum1(read_wall_texture(r)?),
        EVENT_WALL_SET_TMAP_NUM2 => Event::WallSetTmapNum2(read_wall_texture(r)?),
        EVENT_NEW_LEVEL => read_new_level(r, ctx)?,
        EVENT_MULTI_CLOAK => Event::MultiCloak {
            player: read_u8(r)?,
        },
        EVENT_MULTI_DECLOAK => Event::MultiDecloak {
            player: read_u8(r)?,
        },
        EVENT_RESTORE_REARVIEW => Event::RestoreRearview,
        EVENT_MULTI_DEATH => Event::MultiDeath {
            player: read_u8(r)?,
        },
        EVENT_MULTI_KILL => Event::MultiKill {
            player: read_u8(r)?,
            kills: read_u8(r)?,
        },
        EVENT_MULTI_CONNECT => Event::MultiConnect(read_multi_connect(r, ctx)?),
        EVENT_MULTI_RECONNECT => Event::MultiReconnect {
            player: read_u8(r)?,
        },
        EVENT_MULTI_DISCONNECT => Event::MultiDisconnect {
            player: read_u8(r)?,
        },
        EVENT_MULTI_SCORE => Event::MultiScore {
            player: read_u8(r)?,
            score: read_i32_le(r)?,
        },
        EVENT_PLAYER_SCORE => Event::PlayerScore {
            score: read_i32_le(r)?,
        },
        EVENT_PRIMARY_AMMO => Event::PrimaryAmmo {
            old: read_i16_le(r)?,
            new: read_i16_le(r)?,
        },
        EVENT_SECONDARY_AMMO => Event::SecondaryAmmo {
            old: read_i16_le(r)?,
            new: read_i16_le(r)?,
        },
        EVENT_DOOR_OPENING => Event::DoorOpening {
            segment: read_i16_le(r)?,
            side: read_u8(r)?,
        },
        EVENT_LASER_LEVEL => {
            if ctx.layout.laser_level_is_byte(ctx.game_type()) {
                Event::LaserLevel {
                    old: i16::from(read_u8(r)?),
                    new: i16::from(read_u8(r)?),
                }
            } else {
                Event::LaserLevel {
                    old: read_i16_le(r)?,
                    new: read_i16_le(r)?,
                }
            }
        }
        EVENT_PLAYER_AFTERBURNER => Event::PlayerAfterburner {
            old: read_i16_le(r)?,
            afterburner: read_i16_le(r)?,
        },
        EVENT_CLOAKING_WALL => Event::CloakingWall(CloakingWall {
            front_wall: read_u8(r)?,
            back_wall: read_u8(r)?,
            wall_type: read_u8(r)?,
            state: read_u8(r)?,
            cloak_value: read_u8(r)?,
            light: [
                read_i16_le(r)?,
                read_i16_le(r)?,
                read_i16_le(r)?,
                read_i16_le(r)?,
            ],
        }),
        EVENT_CHANGE_COCKPIT => Event::ChangeCockpit {
            cockpit: read_i32_le(r)?,
        },
        EVENT_START_GUIDED => Event::StartGuided,
        EVENT_END_GUIDED => Event::EndGuided,
        EVENT_SECRET_THINGY => Event::SecretThingy {
            truth: read_i32_le(r)?,
        },
        EVENT_LINK_SOUND_TO_OBJECT => Event::LinkSoundToObject {
            sound: read_i32_le(r)?,
            signature: read_i32_le(r)?,
            max_volume: read_i32_le(r)?,
            max_distance: read_i32_le(r)?,
            loop_start: read_i32_le(r)?,
            loop_end: read_i32_le(r)?,
        },
        EVENT_KILL_SOUND_TO_OBJECT => Event::KillSoundToObject {
            signature: read_i32_le(r)?,
        },
        _ => return Ok(None),
    };
    Ok(Some(event))
}

/// The session header's shape follows its own game type and mode bits,
/// not the state of any earlier session.
fn read_start_demo(r: &mut dyn Read, ctx: &CodecContext<'_>) -> Result<StartDemo, DemoError> {
    let layout = ctx.layout;
    let flags = layout.mode_flags();
    let edition = read_u8(r)?;
    let game_type = GameType(read_u8(r)?);
    let game_time = read_i32_le(r)?;
    let game_mode = read_u32_le(r)?.into();

    let session = if game_type.is_shareware() {
        Session::Shareware {
            team_vector: if flags.is_multiplayer(game_mode) {
                Some(read_u8(r)?)
            } else {
                None
            },
        }
    } else {
        let teams = if flags.is_team(game_mode) {
            Some(Teams {
                team_vector: read_u8(r)?,
                names: [read_string(r, layout)?, read_string(r, layout)?],
            })
        } else {
            None
        };
        let scoring = if flags.is_multiplayer(game_mode) {
            let count = read_u8(r)? as usize;
            let mut players = Vec::with_capacity(count);
            for _ in 0..count {
                let callsign = read_string(r, layout)?;
                let connected = read_u8(r)?;
                let tally = if flags.is_cooperative(game_mode) {
                    PlayerTally::Cooperative {
                        score: read_i32_le(r)?,
                    }
                } else {
                    PlayerTally::Competitive {
                        killed_total: read_i16_le(r)?,
                        kills_total: read_i16_le(r)?,
                    }
                };
                players.push(PlayerInfo {
                    callsign,
                    connected,
                    tally,
                });
            }
            Scoring::Multiplayer { players }
        } else {
            Scoring::Solo {
                score: read_i32_le(r)?,
            }
        };
        let mut primary_ammo = [0i16; MAX_PRIMARY_WEAPONS];
        for slot in &mut primary_ammo {
            *slot = read_i16_le(r)?;
        }
        let mut secondary_ammo = [0i16; MAX_SECONDARY_WEAPONS];
        for slot in &mut secondary_ammo {
            *slot = read_i16_le(r)?;
        }
        Session::Registered(RegisteredSession {
            teams,
            scoring,
            primary_ammo,
            secondary_ammo,
            laser_level: read_u8(r)?,
            current_mission: read_string(r, layout)?,
        })
    };

    Ok(StartDemo {
        edition,
        game_type,
        game_time,
        game_mode,
        session,
        energy: read_u8(r)?,
        shield: read_u8(r)?,
        flags: read_i32_le(r)?,
        primary_weapon: read_u8(r)?,
        secondary_weapon: read_u8(r)?,
    })
}

fn read_sound_3d(r: &mut dyn Read) -> Result<Sound3D, DemoError> {
    Ok(Sound3D {
        sound: read_i32_le(r)?,
        angle: read_i32_le(r)?,
        volume: read_i32_le(r)?,
    })
}

fn read_wall_texture(r: &mut dyn Read) -> Result<WallTexture, DemoError> {
    Ok(WallTexture {
        segment: read_i16_le(r)?,
        side: read_u8(r)?,
        connected_segment: read_i16_le(r)?,
        connected_side: read_u8(r)?,
        tmap: read_i16_le(r)?,
    })
}

fn read_new_level(r: &mut dyn Read, ctx: &CodecContext<'_>) -> Result<Event, DemoError> {
    let new_level = read_u8(r)?;
    let old_level = read_u8(r)?;
    let walls = if ctx.state.expects_wall_snapshot() {
        // A negative count records no walls.
        let count = usize::try_from(read_i32_le(r)?).unwrap_or(0);
        let mut walls = Vec::with_capacity(count.min(PREALLOC_CAP));
        for _ in 0..count {
            walls.push(WallState {
                wall_type: read_u8(r)?,
                flags: read_u8(r)?,
                state: read_u8(r)?,
                tmap_num1: read_i16_le(r)?,
                tmap_num2: read_i16_le(r)?,
            });
        }
        Some(walls)
    } else {
        None
    };
    Ok(Event::NewLevel {
        new_level,
        old_level,
        walls,
    })
}

fn read_multi_connect(
    r: &mut dyn Read,
    ctx: &CodecContext<'_>,
) -> Result<MultiConnect, DemoError> {
    let player = read_u8(r)?;
    let new_player = read_u8(r)?;
    let previous = if new_player == 0 {
        Some(PreviousOccupant {
            callsign: read_string(r, ctx.layout)?,
            killed_total: read_i32_le(r)?,
            kills_total: read_i32_le(r)?,
        })
    } else {
        None
    };
    Ok(MultiConnect {
        player,
        new_player,
        previous,
        callsign: read_string(r, ctx.layout)?,
    })
}

// ── Encoding ────────────────────────────────────────────────────

/// Encode one event, discriminator included.
///
/// Fails with [`DemoError::EventNotApplicable`] if the session's game
/// type does not allow the event, and with [`DemoError::Inconsistent`]
/// if an optional field disagrees with the session or the event's tags.
pub fn write_event(
    w: &mut dyn Write,
    event: &Event,
    ctx: &CodecContext<'_>,
) -> Result<(), DemoError> {
    let game_type = ctx.game_type();
    let discriminator = event.discriminator();
    if !is_applicable(discriminator, game_type) {
        return Err(DemoError::EventNotApplicable {
            event: event.name(),
            game_type,
        });
    }
    let second_edition = game_type.is_second_edition();
    let has_old_value = !game_type.is_shareware();
    let layout = ctx.layout;

    write_u8(w, discriminator)?;
    match event {
        Event::Eof
        | Event::Letterbox
        | Event::RestoreCockpit
        | Event::Rearview
        | Event::RestoreRearview
        | Event::StartGuided
        | Event::EndGuided => {}
        Event::StartDemo(start) => write_start_demo(w, start, ctx)?,
        Event::StartFrame {
            last_frame_length,
            frame_count,
            recorded_time,
        } => {
            write_i16_le(w, *last_frame_length)?;
            write_i32_le(w, *frame_count)?;
            write_i32_le(w, *recorded_time)?;
        }
        Event::ViewerObject { window, object } => {
            DemoError::check_presence(
                "ViewerObject",
                "window",
                second_edition,
                window.is_some(),
            )?;
            if let Some(window) = window {
                write_u8(w, *window)?;
            }
            write_object(w, object, ctx)?;
        }
        Event::RenderObject { object } | Event::MorphFrame { object } => {
            write_object(w, object, ctx)?;
        }
        Event::Sound { sound } | Event::SoundOnce { sound } => write_i32_le(w, *sound)?,
        Event::Sound3D(s) | Event::Sound3DOnce(s) => {
            write_i32_le(w, s.sound)?;
            write_i32_le(w, s.angle)?;
            write_i32_le(w, s.volume)?;
        }
        Event::WallHitProcess {
            segment,
            side,
            damage,
            player,
        } => {
            write_i32_le(w, *segment)?;
            write_i32_le(w, *side)?;
            write_i32_le(w, *damage)?;
            write_i32_le(w, *player)?;
        }
        Event::Trigger {
            segment,
            side,
            object,
            shot,
        } => {
            DemoError::check_presence("Trigger", "shot", second_edition, shot.is_some())?;
            write_i32_le(w, *segment)?;
            write_i32_le(w, *side)?;
            write_i32_le(w, *object)?;
            if let Some(shot) = shot {
                write_i32_le(w, *shot)?;
            }
        }
        Event::HostageRescued { hostage } => write_i32_le(w, *hostage)?,
        Event::WallToggle { segment, side } => {
            write_i32_le(w, *segment)?;
            write_i32_le(w, *side)?;
        }
        Event::HudMessage { message } => write_string(w, message, layout)?,
        Event::ControlCenterDestroyed {
            countdown_seconds_left,
        } => write_i32_le(w, *countdown_seconds_left)?,
        Event::PaletteEffect { red, green, blue } => {
            write_i16_le(w, *red)?;
            write_i16_le(w, *green)?;
            write_i16_le(w, *blue)?;
        }
        Event::PlayerEnergy { old, energy: value }
        | Event::PlayerShield { old, shield: value } => {
            DemoError::check_presence(event.name(), "old value", has_old_value, old.is_some())?;
            if let Some(old) = old {
                write_u8(w, *old)?;
            }
            write_u8(w, *value)?;
        }
        Event::PlayerFlags { old_flags, flags } => {
            write_i16_le(w, *old_flags)?;
            write_i16_le(w, *flags)?;
        }
        Event::PlayerWeapon {
            weapon_type,
            weapon,
            old_weapon,
        } => {
            DemoError::check_presence(
                "PlayerWeapon",
                "old weapon",
                has_old_value,
                old_weapon.is_some(),
            )?;
            write_u8(w, *weapon_type)?;
            write_u8(w, *weapon)?;
            if let Some(old) = old_weapon {
                write_u8(w, *old)?;
            }
        }
        Event::EffectBlowup {
            segment,
            side,
            point,
        } => {
            write_i16_le(w, *segment)?;
            write_u8(w, *side)?;
            write_fix_vector(w, point)?;
        }
        Event::HomingDistance { distance } => write_i16_le(w, *distance)?,
        Event::WallSetTmapNum1(t) | Event::WallSetTmapNum2(t) => {
            write_i16_le(w, t.segment)?;
            write_u8(w, t.side)?;
            write_i16_le(w, t.connected_segment)?;
            write_u8(w, t.connected_side)?;
            write_i16_le(w, t.tmap)?;
        }
        Event::NewLevel {
            new_level,
            old_level,
            walls,
        } => {
            DemoError::check_presence(
                "NewLevel",
                "wall snapshot",
                ctx.state.expects_wall_snapshot(),
                walls.is_some(),
            )?;
            write_u8(w, *new_level)?;
            write_u8(w, *old_level)?;
            if let Some(walls) = walls {
                let count = i32::try_from(walls.len()).map_err(|_| DemoError::CountOverflow {
                    context: "wall snapshot",
                    len: walls.len(),
                    max: i32::MAX as usize,
                })?;
                write_i32_le(w, count)?;
                for wall in walls {
                    write_u8(w, wall.wall_type)?;
                    write_u8(w, wall.flags)?;
                    write_u8(w, wall.state)?;
                    write_i16_le(w, wall.tmap_num1)?;
                    write_i16_le(w, wall.tmap_num2)?;
                }
            }
        }
        Event::MultiCloak { player }
        | Event::MultiDecloak { player }
        | Event::MultiDeath { player }
        | Event::MultiReconnect { player }
        | Event::MultiDisconnect { player } => write_u8(w, *player)?,
        Event::MultiKill { player, kills } => {
            write_u8(w, *player)?;
            write_u8(w, *kills)?;
        }
        Event::MultiConnect(connect) => {
            DemoError::check_presence(
                "MultiConnect",
                "previous occupant",
                connect.new_player == 0,
                connect.previous.is_some(),
            )?;
            write_u8(w, connect.player)?;
            write_u8(w, connect.new_player)?;
            if let Some(previous) = &connect.previous {
                write_string(w, &previous.callsign, layout)?;
                write_i32_le(w, previous.killed_total)?;
                write_i32_le(w, previous.kills_total)?;
            }
            write_string(w, &connect.callsign, layout)?;
        }
        Event::MultiScore { player, score } => {
            write_u8(w, *player)?;
            write_i32_le(w, *score)?;
        }
        Event::PlayerScore { score } => write_i32_le(w, *score)?,
        Event::PrimaryAmmo { old, new } | Event::SecondaryAmmo { old, new } => {
            write_i16_le(w, *old)?;
            write_i16_le(w, *new)?;
        }
        Event::DoorOpening { segment, side } => {
            write_i16_le(w, *segment)?;
            write_u8(w, *side)?;
        }
        Event::LaserLevel { old, new } => {
            if layout.laser_level_is_byte(game_type) {
                write_u8(w, laser_level_byte(*old)?)?;
                write_u8(w, laser_level_byte(*new)?)?;
            } else {
                write_i16_le(w, *old)?;
                write_i16_le(w, *new)?;
            }
        }
        Event::PlayerAfterburner { old, afterburner } => {
            write_i16_le(w, *old)?;
            write_i16_le(w, *afterburner)?;
        }
        Event::CloakingWall(c) => {
            write_u8(w, c.front_wall)?;
            write_u8(w, c.back_wall)?;
            write_u8(w, c.wall_type)?;
            write_u8(w, c.state)?;
            write_u8(w, c.cloak_value)?;
            for light in c.light {
                write_i16_le(w, light)?;
            }
        }
        Event::ChangeCockpit { cockpit } => write_i32_le(w, *cockpit)?,
        Event::SecretThingy { truth } => write_i32_le(w, *truth)?,
        Event::LinkSoundToObject {
            sound,
            signature,
            max_volume,
            max_distance,
            loop_start,
            loop_end,
        } => {
            for v in [
                sound,
                signature,
                max_volume,
                max_distance,
                loop_start,
                loop_end,
            ] {
                write_i32_le(w, *v)?;
            }
        }
        Event::KillSoundToObject { signature } => write_i32_le(w, *signature)?,
    }
    Ok(())
}

fn laser_level_byte(level: i16) -> Result<u8, DemoError> {
    u8::try_from(level).map_err(|_| {
        DemoError::inconsistent(
            "LaserLevel",
            format!("level {level} does not fit the single-byte field"),
        )
    })
}

fn validate_session(start: &StartDemo, flags: GameModeFlags) -> Result<(), DemoError> {
    let mode = start.game_mode;
    match &start.session {
        Session::Shareware { team_vector } => {
            if !start.game_type.is_shareware() {
                return Err(DemoError::inconsistent(
                    "StartDemo",
                    format!("shareware session block with game type {}", start.game_type),
                ));
            }
            DemoError::check_presence(
                "StartDemo",
                "team vector",
                flags.is_multiplayer(mode),
                team_vector.is_some(),
            )
        }
        Session::Registered(session) => {
            if start.game_type.is_shareware() {
                return Err(DemoError::inconsistent(
                    "StartDemo",
                    "registered session block with the shareware game type",
                ));
            }
            DemoError::check_presence(
                "StartDemo",
                "team setup",
                flags.is_team(mode),
                session.teams.is_some(),
            )?;
            let players = match &session.scoring {
                Scoring::Multiplayer { players } => Some(players),
                Scoring::Solo { .. } => None,
            };
            DemoError::check_presence(
                "StartDemo",
                "player list",
                flags.is_multiplayer(mode),
                players.is_some(),
            )?;
            let coop = flags.is_cooperative(mode);
            for player in players.into_iter().flatten() {
                let is_coop_tally = matches!(player.tally, PlayerTally::Cooperative { .. });
                if is_coop_tally != coop {
                    return Err(DemoError::inconsistent(
                        "StartDemo",
                        format!(
                            "player {:?} has a {} tally in a {} game",
                            player.callsign,
                            if is_coop_tally { "cooperative" } else { "competitive" },
                            if coop { "cooperative" } else { "competitive" },
                        ),
                    ));
                }
            }
            Ok(())
        }
    }
}

fn write_start_demo(
    w: &mut dyn Write,
    start: &StartDemo,
    ctx: &CodecContext<'_>,
) -> Result<(), DemoError> {
    let layout = ctx.layout;
    validate_session(start, layout.mode_flags())?;

    write_u8(w, start.edition)?;
    write_u8(w, start.game_type.0)?;
    write_i32_le(w, start.game_time)?;
    write_u32_le(w, start.game_mode.0)?;

    match &start.session {
        Session::Shareware { team_vector } => {
            if let Some(team_vector) = team_vector {
                write_u8(w, *team_vector)?;
            }
        }
        Session::Registered(session) => {
            if let Some(teams) = &session.teams {
                write_u8(w, teams.team_vector)?;
                for name in &teams.names {
                    write_string(w, name, layout)?;
                }
            }
            match &session.scoring {
                Scoring::Multiplayer { players } => {
                    let count = u8::try_from(players.len()).map_err(|_| DemoError::CountOverflow {
                        context: "player list",
                        len: players.len(),
                        max: u8::MAX as usize,
                    })?;
                    write_u8(w, count)?;
                    for player in players {
                        write_string(w, &player.callsign, layout)?;
                        write_u8(w, player.connected)?;
                        match player.tally {
                            PlayerTally::Cooperative { score } => write_i32_le(w, score)?,
                            PlayerTally::Competitive {
                                killed_total,
                                kills_total,
                            } => {
                                write_i16_le(w, killed_total)?;
                                write_i16_le(w, kills_total)?;
                            }
                        }
                    }
                }
                Scoring::Solo { score } => write_i32_le(w, *score)?,
            }
            for ammo in session.primary_ammo {
                write_i16_le(w, ammo)?;
            }
            for ammo in session.secondary_ammo {
                write_i16_le(w, ammo)?;
            }
            write_u8(w, session.laser_level)?;
            write_string(w, &session.current_mission, layout)?;
        }
    }

    write_u8(w, start.energy)?;
    write_u8(w, start.shield)?;
    write_i32_le(w, start.flags)?;
    write_u8(w, start.primary_weapon)?;
    write_u8(w, start.secondary_weapon)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::WireLayout;
    use crate::state::StreamState;
    use dem_core::{GameData, GameMode, NoGameData};

    fn ctx(game_type: GameType, layout: WireLayout) -> CodecContext<'static> {
        static DATA: NoGameData = NoGameData;
        let data: &'static dyn GameData = &DATA;
        let state = StreamState {
            edition: 1,
            game_type,
            just_started_playback: true,
        };
        CodecContext::new(state, data, layout)
    }

    fn encode_one(event: &Event, ctx: &CodecContext<'_>) -> Vec<u8> {
        let mut buf = Vec::new();
        write_event(&mut buf, event, ctx).unwrap();
        buf
    }

    fn decode_one(bytes: &[u8], ctx: &CodecContext<'_>) -> Option<Event> {
        let mut cursor = bytes;
        let disc = read_u8(&mut cursor).unwrap();
        let event = read_event(&mut cursor, disc, ctx).unwrap();
        assert!(cursor.is_empty(), "{} bytes left over", cursor.len());
        event
    }

    #[test]
    fn gated_ranges() {
        for d in 0..=31 {
            assert!(is_applicable(d, GameType::UNSET), "discriminator {d}");
        }
        for d in 32..=42 {
            assert!(!is_applicable(d, GameType::SHAREWARE));
            assert!(is_applicable(d, GameType::FULL));
            assert!(is_applicable(d, GameType::SECOND_EDITION));
        }
        for d in 43..=50 {
            assert!(!is_applicable(d, GameType::FULL));
            assert!(is_applicable(d, GameType::SECOND_EDITION));
        }
        assert!(!is_applicable(51, GameType::SECOND_EDITION));
        assert!(!is_applicable(u8::MAX, GameType::SECOND_EDITION));
    }

    #[test]
    fn inapplicable_discriminator_consumes_no_body() {
        let c = ctx(GameType::SHAREWARE, WireLayout::Canonical);
        let body = [1u8, 2, 3, 4];
        let mut cursor = body.as_slice();
        assert_eq!(
            read_event(&mut cursor, EVENT_PLAYER_AFTERBURNER, &c).unwrap(),
            None
        );
        assert_eq!(cursor.len(), 4);
    }

    #[test]
    fn writing_gated_event_is_an_error() {
        let c = ctx(GameType::FULL, WireLayout::Canonical);
        let err = write_event(&mut Vec::new(), &Event::StartGuided, &c).unwrap_err();
        assert!(matches!(
            err,
            DemoError::EventNotApplicable {
                event: "StartGuided",
                game_type: GameType::FULL
            }
        ));
    }

    #[test]
    fn energy_old_value_follows_edition() {
        let event = Event::PlayerEnergy {
            old: Some(90),
            energy: 100,
        };
        let c = ctx(GameType::FULL, WireLayout::Canonical);
        assert_eq!(encode_one(&event, &c), [EVENT_PLAYER_ENERGY, 90, 100]);

        let sw = ctx(GameType::SHAREWARE, WireLayout::Canonical);
        let err = write_event(&mut Vec::new(), &event, &sw).unwrap_err();
        assert!(err.to_string().contains("old value"), "{err}");
        assert_eq!(
            decode_one(&[EVENT_PLAYER_ENERGY, 100], &sw),
            Some(Event::PlayerEnergy {
                old: None,
                energy: 100
            })
        );
    }

    #[test]
    fn laser_level_width() {
        let event = Event::LaserLevel { old: 1, new: 2 };
        let full = ctx(GameType::FULL, WireLayout::Canonical);
        assert_eq!(encode_one(&event, &full), [EVENT_LASER_LEVEL, 1, 2]);

        let second = ctx(GameType::SECOND_EDITION, WireLayout::Canonical);
        assert_eq!(encode_one(&event, &second), [EVENT_LASER_LEVEL, 1, 0, 2, 0]);

        let legacy = ctx(GameType::FULL, WireLayout::Legacy);
        assert_eq!(encode_one(&event, &legacy), [EVENT_LASER_LEVEL, 1, 0, 2, 0]);

        let err = write_event(
            &mut Vec::new(),
            &Event::LaserLevel { old: 1, new: 300 },
            &full,
        )
        .unwrap_err();
        assert!(err.to_string().contains("300"), "{err}");
    }

    #[test]
    fn wall_snapshot_only_right_after_session_start() {
        let mut c = ctx(GameType::SECOND_EDITION, WireLayout::Canonical);
        let with_walls = Event::NewLevel {
            new_level: 2,
            old_level: 1,
            walls: Some(vec![WallState {
                wall_type: 1,
                flags: 2,
                state: 3,
                tmap_num1: 4,
                tmap_num2: -5,
            }]),
        };
        let bytes = encode_one(&with_walls, &c);
        assert_eq!(bytes.len(), 1 + 2 + 4 + 7);
        assert_eq!(decode_one(&bytes, &c), Some(with_walls.clone()));

        c.state.just_started_playback = false;
        assert!(write_event(&mut Vec::new(), &with_walls, &c).is_err());
    }

    #[test]
    fn negative_wall_count_reads_as_empty() {
        let c = ctx(GameType::SECOND_EDITION, WireLayout::Canonical);
        let mut bytes = vec![EVENT_NEW_LEVEL, 3, 2];
        bytes.extend_from_slice(&(-7i32).to_le_bytes());
        assert_eq!(
            decode_one(&bytes, &c),
            Some(Event::NewLevel {
                new_level: 3,
                old_level: 2,
                walls: Some(Vec::new()),
            })
        );
    }

    #[test]
    fn huge_wall_count_truncates_without_allocating() {
        let c = ctx(GameType::SECOND_EDITION, WireLayout::Canonical);
        let mut bytes = vec![3u8, 2];
        bytes.extend_from_slice(&i32::MAX.to_le_bytes());
        let err = read_event(&mut bytes.as_slice(), EVENT_NEW_LEVEL, &c).unwrap_err();
        assert!(err.is_truncation());
    }

    #[test]
    fn multi_connect_previous_occupant() {
        let c = ctx(GameType::FULL, WireLayout::Canonical);
        let reused = Event::MultiConnect(MultiConnect {
            player: 2,
            new_player: 0,
            previous: Some(PreviousOccupant {
                callsign: "old".into(),
                killed_total: 3,
                kills_total: 4,
            }),
            callsign: "new".into(),
        });
        let bytes = encode_one(&reused, &c);
        assert_eq!(decode_one(&bytes, &c), Some(reused));

        let bad = Event::MultiConnect(MultiConnect {
            player: 2,
            new_player: 1,
            previous: Some(PreviousOccupant {
                callsign: "old".into(),
                killed_total: 0,
                kills_total: 0,
            }),
            callsign: "new".into(),
        });
        assert!(write_event(&mut Vec::new(), &bad, &c).is_err());
    }

    fn registered_start(game_mode: u32, scoring: Scoring, teams: Option<Teams>) -> Event {
        Event::StartDemo(Box::new(StartDemo {
            edition: 5,
            game_type: GameType::FULL,
            game_time: 1000,
            game_mode: GameMode(game_mode),
            session: Session::Registered(RegisteredSession {
                teams,
                scoring,
                primary_ammo: [1, 2, 3, 4, 5],
                secondary_ammo: [0, 0, 0, 0, 1],
                laser_level: 2,
                current_mission: "Descent: First Strike".into(),
            }),
            energy: 100,
            shield: 100,
            flags: 0,
            primary_weapon: 0,
            secondary_weapon: 0,
        }))
    }

    #[test]
    fn start_demo_team_and_multiplayer_blocks() {
        let c = ctx(GameType::UNSET, WireLayout::Canonical);
        let flags = WireLayout::Canonical.mode_flags();
        let players = vec![
            PlayerInfo {
                callsign: "alpha".into(),
                connected: 1,
                tally: PlayerTally::Competitive {
                    killed_total: 2,
                    kills_total: 7,
                },
            },
            PlayerInfo {
                callsign: "bravo".into(),
                connected: 0,
                tally: PlayerTally::Competitive {
                    killed_total: 7,
                    kills_total: 2,
                },
            },
        ];
        let teams = Teams {
            team_vector: 0b10,
            names: ["red".into(), "blue".into()],
        };
        let event = registered_start(
            0x04 | flags.team,
            Scoring::Multiplayer { players },
            Some(teams),
        );
        let bytes = encode_one(&event, &c);
        assert_eq!(decode_one(&bytes, &c), Some(event));
    }

    #[test]
    fn start_demo_rejects_mismatched_blocks() {
        let c = ctx(GameType::UNSET, WireLayout::Canonical);
        let coop_tally_in_anarchy = registered_start(
            0x04,
            Scoring::Multiplayer {
                players: vec![PlayerInfo {
                    callsign: "alpha".into(),
                    connected: 1,
                    tally: PlayerTally::Cooperative { score: 5 },
                }],
            },
            None,
        );
        let err = write_event(&mut Vec::new(), &coop_tally_in_anarchy, &c).unwrap_err();
        assert!(err.to_string().contains("cooperative tally"), "{err}");

        let solo_in_multiplayer = registered_start(0x04, Scoring::Solo { score: 0 }, None);
        let err = write_event(&mut Vec::new(), &solo_in_multiplayer, &c).unwrap_err();
        assert!(err.to_string().contains("player list"), "{err}");
    }

    #[test]
    fn shareware_session_header() {
        let c = ctx(GameType::UNSET, WireLayout::Legacy);
        let event = Event::StartDemo(Box::new(StartDemo {
            edition: 1,
            game_type: GameType::SHAREWARE,
            game_time: 0,
            game_mode: GameMode(GameModeFlags::LEGACY.multiplayer),
            session: Session::Shareware {
                team_vector: Some(3),
            },
            energy: 1,
            shield: 2,
            flags: 3,
            primary_weapon: 4,
            secondary_weapon: 5,
        }));
        let bytes = encode_one(&event, &c);
        assert_eq!(
            bytes,
            [
                EVENT_START_DEMO,
                1,
                1,
                0,
                0,
                0,
                0,
                1,
                0,
                0,
                0,
                3,
                1,
                2,
                3,
                0,
                0,
                0,
                4,
                5
            ]
        );
        assert_eq!(decode_one(&bytes, &c), Some(event));
    }
}
