//! Fixed-point vector primitives.

use std::fmt;

/// Scale of a 16.16 fixed-point value.
const FIX_SCALE: f32 = 65536.0;

/// Degrees per angle unit (a full revolution is 65536 units).
const ANGLE_SCALE: f32 = 360.0 / 65536.0;

/// A 3-component vector in 16.16 fixed point.
///
/// # Examples
///
/// ```
/// use dem_core::FixVector;
///
/// let v = FixVector::new(65536, -32768, 0);
/// assert_eq!(v.to_f32(), (1.0, -0.5, 0.0));
/// assert_eq!(FixVector::from_f32(1.0, -0.5, 0.0), v);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FixVector {
    /// X component.
    pub x: i32,
    /// Y component.
    pub y: i32,
    /// Z component.
    pub z: i32,
}

impl FixVector {
    /// The zero vector.
    pub const ZERO: Self = Self { x: 0, y: 0, z: 0 };

    /// Build a vector from raw fixed-point components.
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Convert to floating-point world units.
    pub fn to_f32(self) -> (f32, f32, f32) {
        (
            self.x as f32 / FIX_SCALE,
            self.y as f32 / FIX_SCALE,
            self.z as f32 / FIX_SCALE,
        )
    }

    /// Convert from floating-point world units, truncating toward zero.
    pub fn from_f32(x: f32, y: f32, z: f32) -> Self {
        Self {
            x: (x * FIX_SCALE) as i32,
            y: (y * FIX_SCALE) as i32,
            z: (z * FIX_SCALE) as i32,
        }
    }
}

impl fmt::Display for FixVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// A 3-component angle vector, 65536 units per revolution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct AngleVector {
    /// Rotation around the X axis.
    pub pitch: i16,
    /// Rotation around the Z axis.
    pub bank: i16,
    /// Rotation around the Y axis.
    pub heading: i16,
}

impl AngleVector {
    /// Build an angle vector from raw units.
    pub const fn new(pitch: i16, bank: i16, heading: i16) -> Self {
        Self {
            pitch,
            bank,
            heading,
        }
    }

    /// Convert to `(pitch, bank, heading)` in degrees.
    pub fn to_degrees(self) -> (f32, f32, f32) {
        (
            self.pitch as f32 * ANGLE_SCALE,
            self.bank as f32 * ANGLE_SCALE,
            self.heading as f32 * ANGLE_SCALE,
        )
    }
}

impl fmt::Display for AngleVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(P:{}, B:{}, H:{})", self.pitch, self.bank, self.heading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn quarter_turn_is_ninety_degrees() {
        let a = AngleVector::new(16384, -16384, 0);
        assert_eq!(a.to_degrees(), (90.0, -90.0, 0.0));
    }

    #[test]
    fn display_formats() {
        assert_eq!(FixVector::new(1, -2, 3).to_string(), "(1, -2, 3)");
        assert_eq!(AngleVector::new(1, 2, 3).to_string(), "(P:1, B:2, H:3)");
    }

    proptest! {
        #[test]
        fn whole_units_convert_exactly(x in -32000i32..32000, y in -32000i32..32000, z in -32000i32..32000) {
            let v = FixVector::new(x << 16, y << 16, z << 16);
            let (fx, fy, fz) = v.to_f32();
            prop_assert_eq!(FixVector::from_f32(fx, fy, fz), v);
        }
    }
}
