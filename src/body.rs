use crate::{BodyPose, CircularOrbit, ConfigError, Num, Rgb, Time};

/// A sun or planet: its looks, its orbit and its spin.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CelestialBody {
    pub name: String,
    pub radius: Num,
    /// Orbit radius, zero for a body resting at the origin
    pub distance: Num,
    /// Surface tint, used whenever no texture is available
    pub color: Rgb,
    /// Orbital angular rate in radians per second
    pub speed: Num,
    /// Rate of rotation about the vertical axis in radians per second
    pub rotate_speed: Num,
    #[cfg_attr(feature = "serde", serde(default))]
    pub texture: Option<String>,
}

impl CelestialBody {
    pub fn new(name: impl Into<String>, radius: Num, distance: Num, color: Rgb) -> Self {
        Self {
            name: name.into(),
            radius,
            distance,
            color,
            speed: 0.0,
            rotate_speed: 0.0,
            texture: None,
        }
    }

    pub fn with_speed(mut self, speed: Num) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_rotate_speed(mut self, rotate_speed: Num) -> Self {
        self.rotate_speed = rotate_speed;
        self
    }

    pub fn with_texture(mut self, texture: impl Into<String>) -> Self {
        self.texture = Some(texture.into());
        self
    }

    pub fn is_stationary(&self) -> bool {
        self.distance == 0.0
    }

    pub fn orbit(&self) -> CircularOrbit {
        CircularOrbit::new(self.distance, self.speed)
    }

    pub fn pose_at(&self, time: Time) -> BodyPose {
        BodyPose::at(self, time)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::EmptyName);
        }

        for (field, value) in [
            ("radius", self.radius),
            ("distance", self.distance),
            ("speed", self.speed),
            ("rotate speed", self.rotate_speed),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite {
                    name: self.name.clone(),
                    field,
                });
            }
        }

        if self.radius <= 0.0 {
            return Err(ConfigError::NonPositiveRadius {
                name: self.name.clone(),
                radius: self.radius,
            });
        }

        if self.distance < 0.0 {
            return Err(ConfigError::NegativeDistance {
                name: self.name.clone(),
                distance: self.distance,
            });
        }

        if self.is_stationary() && self.speed != 0.0 {
            return Err(ConfigError::StationaryBodyOrbits {
                name: self.name.clone(),
                speed: self.speed,
            });
        }

        Ok(())
    }
}
