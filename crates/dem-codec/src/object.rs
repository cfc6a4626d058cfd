//! The nested object record embedded in viewer, render and morph events.
//!
//! An object's layout branches on four tags: its render type, its object
//! type, and a control and movement type that are either implied by the
//! object type or stored as bytes. Nothing on the wire says whether an
//! optional block follows; reader and writer both re-derive it from the
//! tags through the same helper functions below.

use std::io::{Read, Write};

use dem_core::{
    AngleVector, ControlType, FixVector, GameType, MovementType, ObjectType, RenderType,
    MAX_SUBMODELS, REACTOR_ROBOT_ID,
};
use smallvec::SmallVec;

use crate::codec::{
    read_angle_vector, read_blob, read_fix_vector, read_i16_le, read_i32_le, read_u8,
    write_angle_vector, write_fix_vector, write_i16_le, write_i32_le, write_u8,
};
use crate::error::DemoError;
use crate::options::WireLayout;
use crate::state::CodecContext;

/// Size of the packed orientation matrix in a canonical [`ShortPos`].
pub const ORIENTATION_LEN: usize = 9;

/// Animation angles of a polygon model, one per submodel.
pub type AnimAngles = SmallVec<[AngleVector; MAX_SUBMODELS]>;

// ── Model ───────────────────────────────────────────────────────

/// An in-game object as recorded in a demo.
#[derive(Clone, Debug, PartialEq)]
pub enum GameObject {
    /// The minimal record: an undrawn, non-camera object. Only the two
    /// header bytes are stored.
    Unrendered {
        /// Object type.
        object_type: ObjectType,
    },
    /// A full record.
    Rendered(Box<ObjectRecord>),
}

impl GameObject {
    /// Object type, whichever form the record takes.
    pub fn object_type(&self) -> ObjectType {
        match self {
            Self::Unrendered { object_type } => *object_type,
            Self::Rendered(record) => record.object_type,
        }
    }

    /// Render type; the minimal record is always [`RenderType::NONE`].
    pub fn render_type(&self) -> RenderType {
        match self {
            Self::Unrendered { .. } => RenderType::NONE,
            Self::Rendered(record) => record.render_type,
        }
    }
}

impl From<ObjectRecord> for GameObject {
    fn from(record: ObjectRecord) -> Self {
        Self::Rendered(Box::new(record))
    }
}

/// Full object record.
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectRecord {
    /// How the object is drawn.
    pub render_type: RenderType,
    /// Kind of object.
    pub object_type: ObjectType,
    /// Subtype id (robot type, powerup type, ...).
    pub id: u8,
    /// Object flags.
    pub flags: u8,
    /// Object signature.
    pub signature: i16,
    /// Compact position.
    pub position: ShortPos,
    /// Controller block.
    pub control: Control,
    /// Movement block.
    pub movement: Movement,
    /// Collision size; absent for types whose size is implied.
    pub size: Option<i32>,
    /// Position in the previous frame.
    pub last_position: FixVector,
    /// Remaining lifetime.
    pub lifeleft: Lifeleft,
    /// Cloak state of a robot, when recorded.
    pub cloaked: Option<u8>,
    /// Render block.
    pub render: Render,
}

/// Compact position record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ShortPos {
    /// Packed orientation matrix (canonical layout, oriented objects only).
    pub orientation: Option<[u8; ORIENTATION_LEN]>,
    /// Position relative to the segment.
    pub position: [i16; 3],
    /// Segment number.
    pub segment: i16,
    /// Velocity.
    pub velocity: [i16; 3],
    /// Orientation as angles (legacy layout only).
    pub angles: Option<AngleVector>,
}

/// Remaining lifetime; weapons drawn as clips keep the full value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifeleft {
    /// Full fixed-point lifetime.
    Fixed(i32),
    /// Truncated single byte.
    Byte(u8),
}

/// Movement block; the variant is the movement type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Movement {
    /// Stationary.
    None,
    /// Physics-driven.
    Physics {
        /// Velocity.
        velocity: FixVector,
        /// Thrust.
        thrust: FixVector,
    },
    /// Spinning in place.
    Spinning {
        /// Spin rate.
        spin_rate: FixVector,
    },
    /// Any other movement type; carries no block.
    Other(MovementType),
}

impl Movement {
    /// The movement type this block stands for.
    pub fn tag(&self) -> MovementType {
        match self {
            Self::None => MovementType::NONE,
            Self::Physics { .. } => MovementType::PHYSICS,
            Self::Spinning { .. } => MovementType::SPINNING,
            Self::Other(tag) => *tag,
        }
    }
}

/// Controller block; the variant is the control type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    /// No controller.
    None,
    /// Robot AI.
    Ai,
    /// Timed explosion.
    Explosion {
        /// When the explosion spawned.
        spawn_time: i32,
        /// When it is removed.
        delete_time: i32,
        /// Object removed along with it.
        delete_object: i16,
    },
    /// Powerup pickup logic.
    Powerup,
    /// Light source.
    Light {
        /// Light intensity.
        intensity: i32,
    },
    /// Any other control type; carries no block.
    Other(ControlType),
}

impl Control {
    /// The control type this block stands for.
    pub fn tag(&self) -> ControlType {
        match self {
            Self::None => ControlType::NONE,
            Self::Ai => ControlType::AI,
            Self::Explosion { .. } => ControlType::EXPLOSION,
            Self::Powerup => ControlType::POWERUP,
            Self::Light { .. } => ControlType::LIGHT,
            Self::Other(tag) => *tag,
        }
    }
}

/// Render block, shaped by the render type.
#[derive(Clone, Debug, PartialEq)]
pub enum Render {
    /// Render types without a block.
    None,
    /// Polygon and morph models.
    Polygon {
        /// Model reference; implied for robots, players and clutter.
        model: Option<ModelRef>,
        /// Per-submodel angles; absent for players and debris.
        anim_angles: Option<AnimAngles>,
        /// Texture override.
        tmo: i32,
    },
    /// Animated clips.
    Vclip {
        /// Clip number.
        vclip: i32,
        /// Time within the current frame.
        frame_time: i32,
        /// Current frame.
        frame_number: u8,
    },
}

/// Explicit polygon model reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModelRef {
    /// Polygon model number.
    pub model_number: i32,
    /// Which submodels are drawn.
    pub subobject_flags: i32,
}

// ── Layout rules ────────────────────────────────────────────────

fn is_minimal(render_type: RenderType, object_type: ObjectType) -> bool {
    render_type == RenderType::NONE && object_type != ObjectType::CAMERA
}

fn has_orientation(layout: WireLayout, render_type: RenderType, object_type: ObjectType) -> bool {
    layout == WireLayout::Canonical
        && (matches!(
            render_type,
            RenderType::POLYOBJ | RenderType::HOSTAGE | RenderType::MORPH
        ) || object_type == ObjectType::CAMERA)
}

/// Control type implied by the object type, `None` when it is stored.
fn implied_control(object_type: ObjectType) -> Option<ControlType> {
    match object_type {
        ObjectType::HOSTAGE | ObjectType::POWERUP => Some(ControlType::POWERUP),
        ObjectType::ROBOT => Some(ControlType::AI),
        ObjectType::PLAYER | ObjectType::CLUTTER => Some(ControlType::NONE),
        _ => None,
    }
}

/// Movement type implied by the object type, `None` when it is stored.
fn implied_movement(object_type: ObjectType, id: u8, game_type: GameType) -> Option<MovementType> {
    match object_type {
        ObjectType::HOSTAGE | ObjectType::CLUTTER => Some(MovementType::NONE),
        ObjectType::ROBOT if game_type.is_second_edition() && id == REACTOR_ROBOT_ID => {
            Some(MovementType::NONE)
        }
        ObjectType::ROBOT | ObjectType::PLAYER => Some(MovementType::PHYSICS),
        _ => None,
    }
}

fn has_size(object_type: ObjectType) -> bool {
    !matches!(
        object_type,
        ObjectType::ROBOT
            | ObjectType::HOSTAGE
            | ObjectType::PLAYER
            | ObjectType::POWERUP
            | ObjectType::CLUTTER
    )
}

fn has_fixed_lifeleft(render_type: RenderType, object_type: ObjectType) -> bool {
    object_type == ObjectType::WEAPON && render_type == RenderType::WEAPON_VCLIP
}

fn has_cloak(ctx: &CodecContext<'_>, object_type: ObjectType, id: u8) -> bool {
    if !(ctx.game_type().is_registered() && object_type == ObjectType::ROBOT) {
        return false;
    }
    match ctx.layout {
        WireLayout::Canonical => ctx.game_data.is_boss_robot(id),
        WireLayout::Legacy => true,
    }
}

fn has_model_ref(object_type: ObjectType) -> bool {
    !matches!(
        object_type,
        ObjectType::ROBOT | ObjectType::PLAYER | ObjectType::CLUTTER
    )
}

fn has_anim_angles(object_type: ObjectType) -> bool {
    !matches!(object_type, ObjectType::PLAYER | ObjectType::DEBRIS)
}

fn anim_angle_count(
    ctx: &CodecContext<'_>,
    object_type: ObjectType,
    id: u8,
    model: Option<&ModelRef>,
) -> usize {
    ctx.layout.fixed_submodel_count().unwrap_or_else(|| {
        let model_number = ctx.game_data.model_number_for(
            object_type,
            id,
            model.map(|m| m.model_number),
        );
        ctx.game_data.submodel_count(model_number)
    })
}

// ── Decoding ────────────────────────────────────────────────────

/// Decode one object record.
pub fn read_object(r: &mut dyn Read, ctx: &CodecContext<'_>) -> Result<GameObject, DemoError> {
    let render_type = RenderType(read_u8(r)?);
    let object_type = ObjectType(read_u8(r)?);
    if is_minimal(render_type, object_type) {
        return Ok(GameObject::Unrendered { object_type });
    }

    let id = read_u8(r)?;
    let flags = read_u8(r)?;
    let signature = read_i16_le(r)?;
    let position = read_short_pos(r, ctx.layout, render_type, object_type)?;

    let control_type = match implied_control(object_type) {
        Some(tag) => tag,
        None => ControlType(read_u8(r)?),
    };
    let movement_type = match implied_movement(object_type, id, ctx.game_type()) {
        Some(tag) => tag,
        None => MovementType(read_u8(r)?),
    };

    let size = if has_size(object_type) {
        Some(read_i32_le(r)?)
    } else {
        None
    };
    let last_position = read_fix_vector(r)?;
    let lifeleft = if has_fixed_lifeleft(render_type, object_type) {
        Lifeleft::Fixed(read_i32_le(r)?)
    } else {
        Lifeleft::Byte(read_u8(r)?)
    };
    let cloaked = if has_cloak(ctx, object_type, id) {
        Some(read_u8(r)?)
    } else {
        None
    };

    let movement = read_movement(r, movement_type)?;
    let control = read_control(r, control_type)?;
    let render = read_render(r, ctx, render_type, object_type, id)?;

    Ok(ObjectRecord {
        render_type,
        object_type,
        id,
        flags,
        signature,
        position,
        control,
        movement,
        size,
        last_position,
        lifeleft,
        cloaked,
        render,
    }
    .into())
}

fn read_short_pos(
    r: &mut dyn Read,
    layout: WireLayout,
    render_type: RenderType,
    object_type: ObjectType,
) -> Result<ShortPos, DemoError> {
    let orientation = if has_orientation(layout, render_type, object_type) {
        Some(read_blob::<ORIENTATION_LEN>(r)?)
    } else {
        None
    };
    let position = [read_i16_le(r)?, read_i16_le(r)?, read_i16_le(r)?];
    let segment = read_i16_le(r)?;
    let velocity = [read_i16_le(r)?, read_i16_le(r)?, read_i16_le(r)?];
    let angles = match layout {
        WireLayout::Legacy => Some(read_angle_vector(r)?),
        WireLayout::Canonical => None,
    };
    Ok(ShortPos {
        orientation,
        position,
        segment,
        velocity,
        angles,
    })
}

fn read_movement(r: &mut dyn Read, tag: MovementType) -> Result<Movement, DemoError> {
    Ok(match tag {
        MovementType::NONE => Movement::None,
        MovementType::PHYSICS => Movement::Physics {
            velocity: read_fix_vector(r)?,
            thrust: read_fix_vector(r)?,
        },
        MovementType::SPINNING => Movement::Spinning {
            spin_rate: read_fix_vector(r)?,
        },
        other => Movement::Other(other),
    })
}

fn read_control(r: &mut dyn Read, tag: ControlType) -> Result<Control, DemoError> {
    Ok(match tag {
        ControlType::NONE => Control::None,
        ControlType::AI => Control::Ai,
        ControlType::POWERUP => Control::Powerup,
        ControlType::EXPLOSION => Control::Explosion {
            spawn_time: read_i32_le(r)?,
            delete_time: read_i32_le(r)?,
            delete_object: read_i16_le(r)?,
        },
        ControlType::LIGHT => Control::Light {
            intensity: read_i32_le(r)?,
        },
        other => Control::Other(other),
    })
}

fn read_render(
    r: &mut dyn Read,
    ctx: &CodecContext<'_>,
    render_type: RenderType,
    object_type: ObjectType,
    id: u8,
) -> Result<Render, DemoError> {
    if render_type.is_polygon() {
        let model = if has_model_ref(object_type) {
            Some(ModelRef {
                model_number: read_i32_le(r)?,
                subobject_flags: read_i32_le(r)?,
            })
        } else {
            None
        };
        let anim_angles = if has_anim_angles(object_type) {
            let count = anim_angle_count(ctx, object_type, id, model.as_ref());
            // The count comes from caller data; don't trust it for allocation.
            let mut angles = AnimAngles::with_capacity(count.min(MAX_SUBMODELS));
            for _ in 0..count {
                angles.push(read_angle_vector(r)?);
            }
            Some(angles)
        } else {
            None
        };
        let tmo = read_i32_le(r)?;
        Ok(Render::Polygon {
            model,
            anim_angles,
            tmo,
        })
    } else if render_type.is_vclip() {
        Ok(Render::Vclip {
            vclip: read_i32_le(r)?,
            frame_time: read_i32_le(r)?,
            frame_number: read_u8(r)?,
        })
    } else {
        Ok(Render::None)
    }
}

// ── Encoding ────────────────────────────────────────────────────

/// Encode one object record.
///
/// Every optional block is checked against the presence the tags imply
/// before anything is written for it; a mismatch is reported as
/// [`DemoError::Inconsistent`].
pub fn write_object(
    w: &mut dyn Write,
    object: &GameObject,
    ctx: &CodecContext<'_>,
) -> Result<(), DemoError> {
    let record = match object {
        GameObject::Unrendered { object_type } => {
            if *object_type == ObjectType::CAMERA {
                return Err(DemoError::inconsistent(
                    "object",
                    "cameras always carry a full record",
                ));
            }
            write_u8(w, RenderType::NONE.0)?;
            return write_u8(w, object_type.0);
        }
        GameObject::Rendered(record) => &**record,
    };
    validate_record(record, ctx)?;

    let ObjectRecord {
        render_type,
        object_type,
        id,
        ..
    } = *record;

    write_u8(w, render_type.0)?;
    write_u8(w, object_type.0)?;
    write_u8(w, id)?;
    write_u8(w, record.flags)?;
    write_i16_le(w, record.signature)?;
    write_short_pos(w, &record.position)?;

    if implied_control(object_type).is_none() {
        write_u8(w, record.control.tag().0)?;
    }
    if implied_movement(object_type, id, ctx.game_type()).is_none() {
        write_u8(w, record.movement.tag().0)?;
    }
    if let Some(size) = record.size {
        write_i32_le(w, size)?;
    }
    write_fix_vector(w, &record.last_position)?;
    match record.lifeleft {
        Lifeleft::Fixed(v) => write_i32_le(w, v)?,
        Lifeleft::Byte(v) => write_u8(w, v)?,
    }
    if let Some(cloaked) = record.cloaked {
        write_u8(w, cloaked)?;
    }

    match &record.movement {
        Movement::Physics { velocity, thrust } => {
            write_fix_vector(w, velocity)?;
            write_fix_vector(w, thrust)?;
        }
        Movement::Spinning { spin_rate } => write_fix_vector(w, spin_rate)?,
        Movement::None | Movement::Other(_) => {}
    }

    match &record.control {
        Control::Explosion {
            spawn_time,
            delete_time,
            delete_object,
        } => {
            write_i32_le(w, *spawn_time)?;
            write_i32_le(w, *delete_time)?;
            write_i16_le(w, *delete_object)?;
        }
        Control::Light { intensity } => write_i32_le(w, *intensity)?,
        Control::None | Control::Ai | Control::Powerup | Control::Other(_) => {}
    }

    match &record.render {
        Render::Polygon {
            model,
            anim_angles,
            tmo,
        } => {
            if let Some(model) = model {
                write_i32_le(w, model.model_number)?;
                write_i32_le(w, model.subobject_flags)?;
            }
            for angle in anim_angles.iter().flatten() {
                write_angle_vector(w, angle)?;
            }
            write_i32_le(w, *tmo)?;
        }
        Render::Vclip {
            vclip,
            frame_time,
            frame_number,
        } => {
            write_i32_le(w, *vclip)?;
            write_i32_le(w, *frame_time)?;
            write_u8(w, *frame_number)?;
        }
        Render::None => {}
    }
    Ok(())
}

fn write_short_pos(w: &mut dyn Write, pos: &ShortPos) -> Result<(), DemoError> {
    if let Some(orientation) = &pos.orientation {
        w.write_all(orientation)?;
    }
    for v in pos.position {
        write_i16_le(w, v)?;
    }
    write_i16_le(w, pos.segment)?;
    for v in pos.velocity {
        write_i16_le(w, v)?;
    }
    if let Some(angles) = &pos.angles {
        write_angle_vector(w, angles)?;
    }
    Ok(())
}

fn validate_record(record: &ObjectRecord, ctx: &CodecContext<'_>) -> Result<(), DemoError> {
    let ObjectRecord {
        render_type,
        object_type,
        id,
        ..
    } = *record;

    if is_minimal(render_type, object_type) {
        return Err(DemoError::inconsistent(
            "object",
            format!("render type 0 with object type {object_type} only has a minimal record"),
        ));
    }

    DemoError::check_presence(
        "object",
        "orientation matrix",
        has_orientation(ctx.layout, render_type, object_type),
        record.position.orientation.is_some(),
    )?;
    DemoError::check_presence(
        "object",
        "short-position angles",
        ctx.layout == WireLayout::Legacy,
        record.position.angles.is_some(),
    )?;

    let control = record.control.tag();
    if let Control::Other(tag) = record.control {
        if matches!(
            tag,
            ControlType::NONE
                | ControlType::AI
                | ControlType::EXPLOSION
                | ControlType::POWERUP
                | ControlType::LIGHT
        ) {
            return Err(DemoError::inconsistent(
                "object",
                format!("control type {tag} has a dedicated variant"),
            ));
        }
    }
    if let Some(implied) = implied_control(object_type) {
        if control != implied {
            return Err(DemoError::inconsistent(
                "object",
                format!("object type {object_type} implies control type {implied}, found {control}"),
            ));
        }
    }

    let movement = record.movement.tag();
    if let Movement::Other(tag) = record.movement {
        if matches!(
            tag,
            MovementType::NONE | MovementType::PHYSICS | MovementType::SPINNING
        ) {
            return Err(DemoError::inconsistent(
                "object",
                format!("movement type {tag} has a dedicated variant"),
            ));
        }
    }
    if let Some(implied) = implied_movement(object_type, id, ctx.game_type()) {
        if movement != implied {
            return Err(DemoError::inconsistent(
                "object",
                format!(
                    "object type {object_type} id {id} implies movement type {implied}, found {movement}"
                ),
            ));
        }
    }

    DemoError::check_presence(
        "object",
        "size",
        has_size(object_type),
        record.size.is_some(),
    )?;
    DemoError::check_presence(
        "object",
        "full lifeleft",
        has_fixed_lifeleft(render_type, object_type),
        matches!(record.lifeleft, Lifeleft::Fixed(_)),
    )?;
    DemoError::check_presence(
        "object",
        "cloak byte",
        has_cloak(ctx, object_type, id),
        record.cloaked.is_some(),
    )?;

    match &record.render {
        Render::Polygon {
            model, anim_angles, ..
        } => {
            if !render_type.is_polygon() {
                return Err(DemoError::inconsistent(
                    "object",
                    format!("polygon render block with render type {render_type}"),
                ));
            }
            DemoError::check_presence(
                "object",
                "model reference",
                has_model_ref(object_type),
                model.is_some(),
            )?;
            DemoError::check_presence(
                "object",
                "animation angles",
                has_anim_angles(object_type),
                anim_angles.is_some(),
            )?;
            if let Some(angles) = anim_angles {
                let expected = anim_angle_count(ctx, object_type, id, model.as_ref());
                if angles.len() != expected {
                    return Err(DemoError::inconsistent(
                        "object",
                        format!(
                            "{} animation angles stored, model has {expected} submodels",
                            angles.len()
                        ),
                    ));
                }
            }
        }
        Render::Vclip { .. } if !render_type.is_vclip() => {
            return Err(DemoError::inconsistent(
                "object",
                format!("clip render block with render type {render_type}"),
            ));
        }
        Render::None if render_type.is_polygon() || render_type.is_vclip() => {
            return Err(DemoError::inconsistent(
                "object",
                format!("render type {render_type} requires a render block"),
            ));
        }
        Render::Vclip { .. } | Render::None => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::StreamState;
    use dem_core::{GameData, GameDataTable, NoGameData};

    fn ctx<'a>(game_type: GameType, data: &'a dyn GameData, layout: WireLayout) -> CodecContext<'a> {
        let state = StreamState {
            edition: 1,
            game_type,
            just_started_playback: false,
        };
        CodecContext::new(state, data, layout)
    }

    fn roundtrip(object: &GameObject, ctx: &CodecContext<'_>) -> Vec<u8> {
        let mut buf = Vec::new();
        write_object(&mut buf, object, ctx).unwrap();
        let mut cursor = buf.as_slice();
        let decoded = read_object(&mut cursor, ctx).unwrap();
        assert!(cursor.is_empty(), "{} bytes left over", cursor.len());
        assert_eq!(&decoded, object);
        buf
    }

    fn robot(id: u8, angles: usize) -> ObjectRecord {
        ObjectRecord {
            render_type: RenderType::POLYOBJ,
            object_type: ObjectType::ROBOT,
            id,
            flags: 0,
            signature: 77,
            position: ShortPos {
                orientation: Some([1, 2, 3, 4, 5, 6, 7, 8, 9]),
                position: [10, -20, 30],
                segment: 4,
                velocity: [0, 1, 0],
                angles: None,
            },
            control: Control::Ai,
            movement: Movement::Physics {
                velocity: FixVector::new(1, 2, 3),
                thrust: FixVector::ZERO,
            },
            size: None,
            last_position: FixVector::new(5, 5, 5),
            lifeleft: Lifeleft::Byte(0x3F),
            cloaked: None,
            render: Render::Polygon {
                model: None,
                anim_angles: Some((0..angles).map(|i| AngleVector::new(i as i16, 0, 0)).collect()),
                tmo: -1,
            },
        }
    }

    #[test]
    fn unrendered_object_is_two_bytes() {
        let data = NoGameData;
        let c = ctx(GameType::FULL, &data, WireLayout::Canonical);
        let bytes = [0u8, ObjectType::DEBRIS.0, 0xFF, 0xFF];
        let mut cursor = bytes.as_slice();
        let obj = read_object(&mut cursor, &c).unwrap();
        assert_eq!(
            obj,
            GameObject::Unrendered {
                object_type: ObjectType::DEBRIS
            }
        );
        assert_eq!(cursor, [0xFF, 0xFF]);
    }

    #[test]
    fn camera_without_render_type_reads_full_record() {
        let data = NoGameData;
        let c = ctx(GameType::FULL, &data, WireLayout::Canonical);
        let camera = GameObject::from(ObjectRecord {
            render_type: RenderType::NONE,
            object_type: ObjectType::CAMERA,
            id: 0,
            flags: 1,
            signature: 2,
            position: ShortPos {
                orientation: Some([0; ORIENTATION_LEN]),
                ..ShortPos::default()
            },
            control: Control::None,
            movement: Movement::Spinning {
                spin_rate: FixVector::new(0, 65536, 0),
            },
            size: Some(1),
            last_position: FixVector::ZERO,
            lifeleft: Lifeleft::Byte(0),
            cloaked: None,
            render: Render::None,
        });
        let bytes = roundtrip(&camera, &c);
        // header 6, matrix 9, pos 14, control+movement 2, size 4, last pos 12,
        // lifeleft 1, spin rate 12
        assert_eq!(bytes.len(), 6 + 9 + 14 + 2 + 4 + 12 + 1 + 12);

        let truncated = &bytes[..2];
        assert!(read_object(&mut &truncated[..], &c)
            .unwrap_err()
            .is_truncation());
    }

    #[test]
    fn unrendered_camera_is_rejected() {
        let data = NoGameData;
        let c = ctx(GameType::FULL, &data, WireLayout::Canonical);
        let err = write_object(
            &mut Vec::new(),
            &GameObject::Unrendered {
                object_type: ObjectType::CAMERA,
            },
            &c,
        )
        .unwrap_err();
        assert!(matches!(err, DemoError::Inconsistent { .. }));
    }

    #[test]
    fn robot_uses_game_data_for_angles_and_cloak() {
        let data = GameDataTable::new()
            .with_robot_model(17, 40)
            .with_submodels(40, 3)
            .with_boss(17);
        let c = ctx(GameType::FULL, &data, WireLayout::Canonical);

        let mut boss = robot(17, 3);
        boss.cloaked = Some(1);
        roundtrip(&boss.clone().into(), &c);

        boss.cloaked = None;
        let err = write_object(&mut Vec::new(), &boss.into(), &c).unwrap_err();
        assert!(err.to_string().contains("cloak byte"), "{err}");

        let mut wrong_count = robot(17, 10);
        wrong_count.cloaked = Some(0);
        let err = write_object(&mut Vec::new(), &wrong_count.into(), &c).unwrap_err();
        assert!(err.to_string().contains("animation angles"), "{err}");
    }

    #[test]
    fn shareware_robots_never_carry_cloak() {
        let data = GameDataTable::new().with_boss(3);
        let c = ctx(GameType::SHAREWARE, &data, WireLayout::Canonical);
        roundtrip(&robot(3, 0).into(), &c);
    }

    #[test]
    fn reactor_robot_is_stationary_in_second_edition() {
        let data = NoGameData;
        let mut reactor = robot(REACTOR_ROBOT_ID, 0);
        reactor.movement = Movement::None;

        let c = ctx(GameType::SECOND_EDITION, &data, WireLayout::Canonical);
        roundtrip(&reactor.clone().into(), &c);

        let c = ctx(GameType::FULL, &data, WireLayout::Canonical);
        let err = write_object(&mut Vec::new(), &reactor.into(), &c).unwrap_err();
        assert!(err.to_string().contains("implies movement type 1"), "{err}");
    }

    #[test]
    fn legacy_layout_uses_angles_fixed_count_and_unconditional_cloak() {
        let data = NoGameData;
        let c = ctx(GameType::FULL, &data, WireLayout::Legacy);
        let mut legacy = robot(5, MAX_SUBMODELS);
        legacy.position.orientation = None;
        legacy.position.angles = Some(AngleVector::new(1, 2, 3));
        legacy.cloaked = Some(0);
        roundtrip(&legacy.clone().into(), &c);

        legacy.position.orientation = Some([0; ORIENTATION_LEN]);
        let err = write_object(&mut Vec::new(), &legacy.into(), &c).unwrap_err();
        assert!(err.to_string().contains("orientation matrix"), "{err}");
    }

    #[test]
    fn weapon_clip_keeps_full_lifeleft_and_stored_tags() {
        let data = NoGameData;
        let c = ctx(GameType::SECOND_EDITION, &data, WireLayout::Canonical);
        let weapon = GameObject::from(ObjectRecord {
            render_type: RenderType::WEAPON_VCLIP,
            object_type: ObjectType::WEAPON,
            id: 9,
            flags: 0,
            signature: 300,
            position: ShortPos::default(),
            control: Control::Explosion {
                spawn_time: 10,
                delete_time: 20,
                delete_object: -1,
            },
            movement: Movement::Other(MovementType(2)),
            size: Some(0x8000),
            last_position: FixVector::ZERO,
            lifeleft: Lifeleft::Fixed(0x0003_0000),
            cloaked: None,
            render: Render::Vclip {
                vclip: 12,
                frame_time: 100,
                frame_number: 3,
            },
        });
        roundtrip(&weapon, &c);
    }

    #[test]
    fn dedicated_tags_cannot_hide_in_other() {
        let data = NoGameData;
        let c = ctx(GameType::FULL, &data, WireLayout::Canonical);
        let mut light = robot(1, 0);
        light.object_type = ObjectType::LIGHT;
        light.render_type = RenderType::LASER;
        light.position.orientation = None;
        light.size = Some(0);
        light.render = Render::None;
        light.movement = Movement::None;
        light.control = Control::Other(ControlType::LIGHT);
        let err = write_object(&mut Vec::new(), &light.clone().into(), &c).unwrap_err();
        assert!(err.to_string().contains("dedicated variant"), "{err}");

        light.control = Control::Light { intensity: 99 };
        roundtrip(&light.into(), &c);
    }
}
