use std::collections::HashSet;

use crate::{CelestialBody, ConfigError, Num, Rgb};

/// The static, ordered list of bodies a scene is composed from.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolarSystem {
    pub bodies: Vec<CelestialBody>,
}

impl SolarSystem {
    pub fn new(bodies: Vec<CelestialBody>) -> Self {
        Self { bodies }
    }

    /// The sun and the four rocky planets.
    ///
    /// Sizes and distances are picked to look good on screen, they are not to scale.
    pub fn inner_planets() -> Self {
        Self::new(vec![
            CelestialBody::new("Sun", 2.0, 0.0, Rgb::from_u32(0xffd700))
                .with_rotate_speed(0.002)
                .with_texture("textures/sun.jpg"),
            CelestialBody::new("Mercury", 0.2, 6.0, Rgb::from_u32(0xcd7f32))
                .with_speed(0.1)
                .with_rotate_speed(0.25)
                .with_texture("textures/mercury.jpg"),
            CelestialBody::new("Venus", 0.4, 11.0, Rgb::from_u32(0xf2aa61))
                .with_speed(0.09)
                .with_rotate_speed(0.25)
                .with_texture("textures/venus.jpg"),
            CelestialBody::new("Earth", 0.5, 16.0, Rgb::from_u32(0x117a65))
                .with_speed(0.08)
                .with_rotate_speed(0.25)
                .with_texture("textures/earth.jpg"),
            CelestialBody::new("Mars", 0.3, 21.0, Rgb::from_u32(0xb7410e))
                .with_speed(0.07)
                .with_rotate_speed(0.25)
                .with_texture("textures/mars.jpg"),
        ])
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut names = HashSet::with_capacity(self.bodies.len());

        for body in &self.bodies {
            body.validate()?;

            if !names.insert(body.name.as_str()) {
                return Err(ConfigError::DuplicateName(body.name.clone()));
            }
        }

        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&CelestialBody> {
        self.bodies.iter().find(|body| body.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CelestialBody> {
        self.bodies.iter()
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Largest orbit radius, including the radius of the body on it.
    pub fn max_orbit_radius(&self) -> Num {
        self.bodies
            .iter()
            .map(|body| body.distance + body.radius)
            .fold(0.0, Num::max)
    }
}

impl Default for SolarSystem {
    fn default() -> Self {
        Self::inner_planets()
    }
}
