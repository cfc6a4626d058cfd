//! Reusable demo fixtures.
//!
//! Every builder takes a [`Profile`] (game type plus wire layout) and,
//! where the layout depends on static data, a [`GameData`] provider, and
//! returns values whose optional fields agree with the encoder's rules
//! for that profile. [`sample_events`] strings them into a capture that
//! touches every event kind the profile allows.

use dem_codec::{
    AnimAngles, CloakingWall, Control, DemoFile, Event, GameObject, Lifeleft, ModelRef,
    MultiConnect, Movement, ObjectRecord, PlayerInfo, PlayerTally, PreviousOccupant,
    RegisteredSession, Render, Scoring, Session, ShortPos, Sound3D, StartDemo, Teams,
    WallState, WallTexture, WireLayout,
};
use dem_core::{
    AngleVector, ControlType, FixVector, GameData, GameMode, GameType, MovementType,
    ObjectType, RenderType, REACTOR_ROBOT_ID,
};

/// Robot id the standard provider flags as a boss.
pub const BOSS_ROBOT: u8 = 1;
/// Ordinary robot id known to the standard provider.
pub const GRUNT_ROBOT: u8 = 2;
/// Polygon model stored explicitly by generic objects.
pub const GENERIC_MODEL: i32 = 20;

/// Trailing bytes appended by [`sample_file`].
pub const TRAILER: [u8; 5] = [0xDE, 0xAD, 0xBE, 0xEF, 0x01];

/// Game type and wire layout a fixture is built for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Profile {
    pub game_type: GameType,
    pub layout: WireLayout,
}

impl Profile {
    pub fn new(game_type: GameType, layout: WireLayout) -> Self {
        Self { game_type, layout }
    }

    /// Every real game type in both layouts.
    pub fn all() -> Vec<Profile> {
        let mut out = Vec::new();
        for layout in [WireLayout::Canonical, WireLayout::Legacy] {
            for game_type in [
                GameType::SHAREWARE,
                GameType::FULL,
                GameType::SECOND_EDITION,
            ] {
                out.push(Profile::new(game_type, layout));
            }
        }
        out
    }

    /// Edition byte recorded for this game type.
    pub fn edition(&self) -> u8 {
        if self.game_type.is_second_edition() {
            13
        } else {
            5
        }
    }

    fn second_edition(&self) -> bool {
        self.game_type.is_second_edition()
    }
}

// ── Objects ─────────────────────────────────────────────────────

fn short_pos(profile: Profile, render_type: RenderType, object_type: ObjectType) -> ShortPos {
    let oriented = matches!(
        render_type,
        RenderType::POLYOBJ | RenderType::HOSTAGE | RenderType::MORPH
    ) || object_type == ObjectType::CAMERA;
    let canonical = profile.layout == WireLayout::Canonical;
    ShortPos {
        orientation: (canonical && oriented).then_some([0x7F, 0, 0, 0, 0x7F, 0, 0, 0, 0x7F]),
        position: [100, -200, 300],
        segment: 7,
        velocity: [1, -1, 0],
        angles: (!canonical).then_some(AngleVector::new(10, 20, 30)),
    }
}

fn anim_angles(count: usize) -> AnimAngles {
    (0..count)
        .map(|i| AngleVector::new(i as i16 * 64, -(i as i16), 0))
        .collect()
}

fn angle_count(
    profile: Profile,
    data: &dyn GameData,
    object_type: ObjectType,
    id: u8,
    stored: Option<i32>,
) -> usize {
    profile
        .layout
        .fixed_submodel_count()
        .unwrap_or_else(|| data.submodel_count(data.model_number_for(object_type, id, stored)))
}

fn physics() -> Movement {
    Movement::Physics {
        velocity: FixVector::new(0x1_0000, 0, -0x8000),
        thrust: FixVector::new(0, 0x100, 0),
    }
}

fn base(profile: Profile, render_type: RenderType, object_type: ObjectType, id: u8) -> ObjectRecord {
    ObjectRecord {
        render_type,
        object_type,
        id,
        flags: 0,
        signature: 1000 + i16::from(id),
        position: short_pos(profile, render_type, object_type),
        control: Control::None,
        movement: Movement::None,
        size: None,
        last_position: FixVector::new(0x10_0000, 0x20_0000, -0x30_0000),
        lifeleft: Lifeleft::Byte(0x3F),
        cloaked: None,
        render: Render::None,
    }
}

/// A robot drawn as a polygon model.
pub fn robot(profile: Profile, data: &dyn GameData, id: u8) -> GameObject {
    robot_with(profile, data, id, RenderType::POLYOBJ)
}

/// A robot mid-morph.
pub fn morphing_robot(profile: Profile, data: &dyn GameData, id: u8) -> GameObject {
    robot_with(profile, data, id, RenderType::MORPH)
}

fn robot_with(profile: Profile, data: &dyn GameData, id: u8, render_type: RenderType) -> GameObject {
    let mut rec = base(profile, render_type, ObjectType::ROBOT, id);
    rec.control = Control::Ai;
    rec.movement = if profile.second_edition() && id == REACTOR_ROBOT_ID {
        Movement::None
    } else {
        physics()
    };
    let cloak_recorded = match profile.layout {
        WireLayout::Canonical => data.is_boss_robot(id),
        WireLayout::Legacy => true,
    };
    rec.cloaked = (profile.game_type.is_registered() && cloak_recorded).then_some(1);
    rec.render = Render::Polygon {
        model: None,
        anim_angles: Some(anim_angles(angle_count(
            profile,
            data,
            ObjectType::ROBOT,
            id,
            None,
        ))),
        tmo: -1,
    };
    rec.into()
}

/// The local player's ship.
pub fn player_ship(profile: Profile) -> GameObject {
    let mut rec = base(profile, RenderType::POLYOBJ, ObjectType::PLAYER, 0);
    rec.movement = physics();
    rec.render = Render::Polygon {
        model: None,
        anim_angles: None,
        tmo: 0,
    };
    rec.into()
}

/// Debris from a destroyed model; stores its model but no angles.
pub fn debris(profile: Profile) -> GameObject {
    let mut rec = base(profile, RenderType::POLYOBJ, ObjectType::DEBRIS, 4);
    rec.movement = physics();
    rec.size = Some(0x2_0000);
    rec.render = Render::Polygon {
        model: Some(ModelRef {
            model_number: GENERIC_MODEL,
            subobject_flags: 0b101,
        }),
        anim_angles: None,
        tmo: 0,
    };
    rec.into()
}

/// Static clutter; its id doubles as its model number.
pub fn clutter(profile: Profile, data: &dyn GameData, id: u8) -> GameObject {
    let mut rec = base(profile, RenderType::POLYOBJ, ObjectType::CLUTTER, id);
    rec.render = Render::Polygon {
        model: None,
        anim_angles: Some(anim_angles(angle_count(
            profile,
            data,
            ObjectType::CLUTTER,
            id,
            None,
        ))),
        tmo: 0,
    };
    rec.into()
}

/// The reactor, drawn from an explicitly stored model.
pub fn reactor(profile: Profile, data: &dyn GameData) -> GameObject {
    let mut rec = base(profile, RenderType::POLYOBJ, ObjectType::CNTRLCEN, 0);
    rec.control = Control::Other(ControlType(6));
    rec.size = Some(0x10_0000);
    rec.render = Render::Polygon {
        model: Some(ModelRef {
            model_number: GENERIC_MODEL,
            subobject_flags: -1,
        }),
        anim_angles: Some(anim_angles(angle_count(
            profile,
            data,
            ObjectType::CNTRLCEN,
            0,
            Some(GENERIC_MODEL),
        ))),
        tmo: 0,
    };
    rec.into()
}

/// A spinning powerup.
pub fn powerup(profile: Profile) -> GameObject {
    let mut rec = base(profile, RenderType::POWERUP, ObjectType::POWERUP, 3);
    rec.control = Control::Powerup;
    rec.movement = Movement::Spinning {
        spin_rate: FixVector::new(0, 0x4000, 0),
    };
    rec.render = Render::Vclip {
        vclip: 36,
        frame_time: 0x1000,
        frame_number: 2,
    };
    rec.into()
}

/// A hostage sprite.
pub fn hostage(profile: Profile) -> GameObject {
    let mut rec = base(profile, RenderType::HOSTAGE, ObjectType::HOSTAGE, 0);
    rec.control = Control::Powerup;
    rec.render = Render::Vclip {
        vclip: 33,
        frame_time: 0,
        frame_number: 0,
    };
    rec.into()
}

/// A weapon drawn as a clip, which keeps its full lifetime.
pub fn weapon_clip(profile: Profile) -> GameObject {
    let mut rec = base(profile, RenderType::WEAPON_VCLIP, ObjectType::WEAPON, 9);
    rec.movement = physics();
    rec.size = Some(0x8000);
    rec.lifeleft = Lifeleft::Fixed(0x3_0000);
    rec.render = Render::Vclip {
        vclip: 12,
        frame_time: 0x800,
        frame_number: 5,
    };
    rec.into()
}

/// A laser bolt: no render block, an unnamed control type.
pub fn laser_bolt(profile: Profile) -> GameObject {
    let mut rec = base(profile, RenderType::LASER, ObjectType::WEAPON, 0);
    rec.control = Control::Other(ControlType(5));
    rec.movement = physics();
    rec.size = Some(0x4000);
    rec.into()
}

/// An explosion.
pub fn fireball(profile: Profile) -> GameObject {
    let mut rec = base(profile, RenderType::FIREBALL, ObjectType::FIREBALL, 1);
    rec.control = Control::Explosion {
        spawn_time: 0x10_0000,
        delete_time: 0x12_0000,
        delete_object: -1,
    };
    rec.size = Some(0x5_0000);
    rec.render = Render::Vclip {
        vclip: 3,
        frame_time: 0x200,
        frame_number: 1,
    };
    rec.into()
}

/// A flare carrying a light controller.
pub fn flare(profile: Profile) -> GameObject {
    let mut rec = base(profile, RenderType::WEAPON_VCLIP, ObjectType::FLARE, 0);
    rec.control = Control::Light {
        intensity: 0x2_0000,
    };
    rec.movement = Movement::Other(MovementType(2));
    rec.size = Some(0x1000);
    rec.render = Render::Vclip {
        vclip: 7,
        frame_time: 0,
        frame_number: 0,
    };
    rec.into()
}

/// A camera, which is never recorded as a minimal record.
pub fn camera(profile: Profile) -> GameObject {
    let mut rec = base(profile, RenderType::NONE, ObjectType::CAMERA, 0);
    rec.size = Some(0);
    rec.into()
}

/// The minimal record for an undrawn object.
pub fn unrendered(object_type: ObjectType) -> GameObject {
    GameObject::Unrendered { object_type }
}

/// One of every object shape the profile can record.
pub fn sample_objects(profile: Profile, data: &dyn GameData) -> Vec<GameObject> {
    let mut objects = vec![
        robot(profile, data, BOSS_ROBOT),
        robot(profile, data, GRUNT_ROBOT),
        player_ship(profile),
        debris(profile),
        clutter(profile, data, 11),
        reactor(profile, data),
        powerup(profile),
        hostage(profile),
        weapon_clip(profile),
        laser_bolt(profile),
        fireball(profile),
        flare(profile),
        camera(profile),
        unrendered(ObjectType::LIGHT),
        unrendered(ObjectType::GHOST),
    ];
    if profile.second_edition() {
        objects.push(robot(profile, data, REACTOR_ROBOT_ID));
    }
    objects
}

// ── Session headers ─────────────────────────────────────────────

fn registered(scoring: Scoring, teams: Option<Teams>) -> Session {
    Session::Registered(RegisteredSession {
        teams,
        scoring,
        primary_ammo: [0, 1000, 0, 0, 0],
        secondary_ammo: [3, 0, 0, 0, 0],
        laser_level: 0,
        current_mission: "Descent: First Strike".into(),
    })
}

fn start(profile: Profile, game_mode: u32, session: Session) -> Event {
    Event::StartDemo(Box::new(StartDemo {
        edition: profile.edition(),
        game_type: profile.game_type,
        game_time: 0x0123_4567,
        game_mode: GameMode(game_mode),
        session,
        energy: 100,
        shield: 100,
        flags: 0x400,
        primary_weapon: 0,
        secondary_weapon: 0,
    }))
}

/// Single-player session start.
pub fn solo_start(profile: Profile) -> Event {
    let session = if profile.game_type.is_shareware() {
        Session::Shareware { team_vector: None }
    } else {
        registered(Scoring::Solo { score: 4200 }, None)
    };
    start(profile, 0, session)
}

/// Multiplayer session start with `players` records.
pub fn multiplayer_start(profile: Profile, players: usize, team: bool, coop: bool) -> Event {
    let flags = profile.layout.mode_flags();
    // Lowest multiplayer bit; any of them marks a multiplayer game.
    let mut mode = flags.multiplayer & flags.multiplayer.wrapping_neg();
    if team {
        mode |= flags.team;
    }
    if coop {
        mode |= flags.cooperative;
    }
    if profile.game_type.is_shareware() {
        return start(
            profile,
            mode,
            Session::Shareware {
                team_vector: Some(0b0101),
            },
        );
    }
    let players = (0..players)
        .map(|i| PlayerInfo {
            callsign: format!("pilot{i}"),
            connected: 1,
            tally: if coop {
                PlayerTally::Cooperative {
                    score: 100 * i as i32,
                }
            } else {
                PlayerTally::Competitive {
                    killed_total: i as i16,
                    kills_total: 2 * i as i16,
                }
            },
        })
        .collect();
    let teams = team.then(|| Teams {
        team_vector: 0b0101,
        names: ["Blue".into(), "Red".into()],
    });
    start(profile, mode, registered(Scoring::Multiplayer { players }, teams))
}

// ── Whole captures ──────────────────────────────────────────────

fn frame(n: i32) -> Event {
    Event::StartFrame {
        last_frame_length: 0x0888,
        frame_count: n,
        recorded_time: n * 0x0888,
    }
}

fn walls() -> Vec<WallState> {
    (0..3)
        .map(|i| WallState {
            wall_type: i,
            flags: 0x10,
            state: 0,
            tmap_num1: 100 + i16::from(i),
            tmap_num2: 0,
        })
        .collect()
}

/// A capture touching every event kind `profile` allows, from the
/// session start to the end marker.
pub fn sample_events(profile: Profile, data: &dyn GameData) -> Vec<Event> {
    let se = profile.second_edition();
    let registered = profile.game_type.is_registered();
    let old = |v: u8| (!profile.game_type.is_shareware()).then_some(v);
    let texture = WallTexture {
        segment: 12,
        side: 3,
        connected_segment: 13,
        connected_side: 1,
        tmap: 270,
    };

    let mut events = vec![multiplayer_start(profile, 4, false, false)];
    events.push(Event::NewLevel {
        new_level: 1,
        old_level: 0,
        walls: se.then(walls),
    });
    events.push(frame(1));
    events.push(Event::ViewerObject {
        window: se.then_some(0),
        object: player_ship(profile),
    });
    for object in sample_objects(profile, data) {
        events.push(Event::RenderObject { object });
    }
    events.push(Event::MorphFrame {
        object: morphing_robot(profile, data, GRUNT_ROBOT),
    });

    events.push(frame(2));
    events.extend([
        Event::Sound { sound: 42 },
        Event::SoundOnce { sound: 43 },
        Event::Sound3D(Sound3D {
            sound: 11,
            angle: 0x4000,
            volume: 0x8000,
        }),
        Event::Sound3DOnce(Sound3D {
            sound: 12,
            angle: -0x4000,
            volume: 0x1_0000,
        }),
        Event::WallHitProcess {
            segment: 5,
            side: 2,
            damage: 0x3_0000,
            player: 0,
        },
        Event::Trigger {
            segment: 9,
            side: 4,
            object: 1,
            shot: se.then_some(0),
        },
        Event::HostageRescued { hostage: 1 },
        Event::WallToggle {
            segment: 20,
            side: 5,
        },
        Event::HudMessage {
            message: "Hostage rescued!".into(),
        },
        Event::ControlCenterDestroyed {
            countdown_seconds_left: 45,
        },
        Event::PaletteEffect {
            red: 10,
            green: -5,
            blue: 0,
        },
        Event::PlayerEnergy {
            old: old(100),
            energy: 98,
        },
        Event::PlayerShield {
            old: old(100),
            shield: 80,
        },
        Event::PlayerFlags {
            old_flags: 0x400,
            flags: 0x402,
        },
        Event::PlayerWeapon {
            weapon_type: 0,
            weapon: 1,
            old_weapon: old(0),
        },
        Event::EffectBlowup {
            segment: 30,
            side: 1,
            point: FixVector::new(1, 2, 3),
        },
        Event::HomingDistance { distance: 0x1000 },
        Event::Letterbox,
        Event::RestoreCockpit,
        Event::Rearview,
        Event::RestoreRearview,
        Event::WallSetTmapNum1(texture),
        Event::WallSetTmapNum2(WallTexture {
            tmap: 0x4005,
            ..texture
        }),
        Event::MultiCloak { player: 1 },
        Event::MultiDecloak { player: 1 },
    ]);

    if registered {
        events.extend([
            Event::MultiDeath { player: 2 },
            Event::MultiKill {
                player: 3,
                kills: 1,
            },
            Event::MultiConnect(MultiConnect {
                player: 2,
                new_player: 1,
                previous: None,
                callsign: "newcomer".into(),
            }),
            Event::MultiConnect(MultiConnect {
                player: 3,
                new_player: 0,
                previous: Some(PreviousOccupant {
                    callsign: "pilot3".into(),
                    killed_total: 3,
                    kills_total: 6,
                }),
                callsign: "returning".into(),
            }),
            Event::MultiReconnect { player: 2 },
            Event::MultiDisconnect { player: 2 },
            Event::MultiScore {
                player: 3,
                score: 7,
            },
            Event::PlayerScore { score: 4500 },
            Event::PrimaryAmmo { old: 1000, new: 990 },
            Event::SecondaryAmmo { old: 3, new: 2 },
            Event::DoorOpening {
                segment: 40,
                side: 0,
            },
            Event::LaserLevel { old: 0, new: 1 },
        ]);
    }

    if se {
        events.extend([
            Event::PlayerAfterburner {
                old: 0x1000,
                afterburner: 0x7FFF,
            },
            Event::CloakingWall(CloakingWall {
                front_wall: 4,
                back_wall: 5,
                wall_type: 6,
                state: 1,
                cloak_value: 16,
                light: [0x100, 0x200, 0x300, 0x400],
            }),
            Event::ChangeCockpit { cockpit: 2 },
            Event::StartGuided,
            Event::EndGuided,
            Event::SecretThingy { truth: 1 },
            Event::LinkSoundToObject {
                sound: 121,
                signature: 1001,
                max_volume: 0x1_0000,
                max_distance: 0x100_0000,
                loop_start: 0,
                loop_end: -1,
            },
            Event::KillSoundToObject { signature: 1001 },
        ]);
    }

    events.push(frame(3));
    events.push(Event::NewLevel {
        new_level: 2,
        old_level: 1,
        walls: None,
    });
    events.push(Event::Eof);
    events
}

/// [`sample_events`] wrapped in a file with [`TRAILER`] after the end
/// marker.
pub fn sample_file(profile: Profile, data: &dyn GameData) -> DemoFile {
    DemoFile {
        edition: profile.edition(),
        game_type: profile.game_type,
        events: sample_events(profile, data),
        trailing_bytes: TRAILER.to_vec(),
    }
}
