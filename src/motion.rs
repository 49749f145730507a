use std::f64::consts::TAU;

use crate::{vec3, CelestialBody, Num, Quat, Time, Vec3, LABEL_OFFSET, TWO_PI};

/// A circle of `radius` in the horizontal (x/z) plane centered at the origin,
/// traversed at `angular_speed` radians per second.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CircularOrbit {
    pub radius: Num,
    pub angular_speed: Num,
}

impl CircularOrbit {
    pub const fn new(radius: Num, angular_speed: Num) -> Self {
        Self {
            radius,
            angular_speed,
        }
    }

    pub fn is_stationary(&self) -> bool {
        self.radius == 0.0
    }

    /// Angle along the orbit at `time`, in `[0, 2π)`.
    ///
    /// The product and the reduction happen in `f64`, only the reduced angle
    /// is narrowed to [`Num`].
    pub fn phase(&self, time: Time) -> Num {
        let phase = reduce_angle(self.angular_speed as f64 * time);

        // Narrowing can round up onto 2π
        if phase >= TWO_PI {
            0.0
        } else {
            phase
        }
    }

    /// x = r * cos(θ), z = r * sin(θ)
    pub fn position_at(&self, time: Time) -> Vec3 {
        if self.is_stationary() {
            return Vec3::ZERO;
        }

        let (sin, cos) = self.phase(time).sin_cos();

        vec3(self.radius * cos, 0.0, self.radius * sin)
    }

    /// Time of one full revolution, `None` when the body never goes around.
    pub fn period(&self) -> Option<Num> {
        if self.is_stationary() || self.angular_speed == 0.0 {
            return None;
        }

        Some(TWO_PI / self.angular_speed.abs())
    }

    /// Evenly spaced points along the circle, starting at +X.
    /// The last point is not repeated, callers close the loop themselves.
    pub fn path(&self, subdivisions: u32) -> Vec<Vec3> {
        let subdivisions = subdivisions.max(3);
        let step = TWO_PI / subdivisions as Num;

        (0..subdivisions)
            .map(|i| {
                let (sin, cos) = (i as Num * step).sin_cos();

                vec3(self.radius * cos, 0.0, self.radius * sin)
            })
            .collect()
    }
}

/// Rotation of a body about its vertical axis at `time`.
///
/// The angle grows without bound. It stays in `f64` and is only reduced when
/// turned into a rotation, see [`BodyPose::rotation`].
#[inline]
pub fn spin_angle(rotate_speed: Num, time: Time) -> f64 {
    time * rotate_speed as f64
}

fn reduce_angle(angle: f64) -> Num {
    angle.rem_euclid(TAU) as Num
}

/// Where the label of a body of `radius` sitting at `position` floats.
#[inline]
pub fn label_position(position: Vec3, radius: Num) -> Vec3 {
    vec3(position.x, radius + LABEL_OFFSET, position.z)
}

/// Transform of a body and its label at a given moment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyPose {
    pub position: Vec3,
    /// Angle about +Y, in radians, unreduced
    pub spin: f64,
    pub label: Vec3,
}

impl BodyPose {
    pub fn at(body: &CelestialBody, time: Time) -> Self {
        let position = body.orbit().position_at(time);

        Self {
            position,
            spin: spin_angle(body.rotate_speed, time),
            label: label_position(position, body.radius),
        }
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(reduce_angle(self.spin))
    }
}
