//! A small decorative solar system.
//!
//! Bodies follow perfect circles in the horizontal plane around the origin,
//! spin about their vertical axis and carry a floating name label. Nothing
//! here depends on a renderer: [`Orrery`] is the scene graph a host render
//! loop composes once and then drives with [`Orrery::update`].

pub mod body;
pub mod color;
pub mod constants;
pub mod error;
pub mod motion;
pub mod scene;
pub mod starfield;
pub mod system;

#[cfg(all(feature = "f32", feature = "f64"))]
compile_error!("features `f32` and `f64` are mutually exclusive");

#[cfg(not(any(feature = "f32", feature = "f64")))]
compile_error!("either the `f32` or the `f64` feature must be enabled");

#[cfg(feature = "f32")]
pub type Num = f32;
#[cfg(feature = "f32")]
pub use glam::{vec3, Quat, Vec3};

#[cfg(all(feature = "f64", not(feature = "f32")))]
pub type Num = f64;
#[cfg(all(feature = "f64", not(feature = "f32")))]
pub use glam::{dvec3 as vec3, DQuat as Quat, DVec3 as Vec3};

/// Seconds of scene time. Double precision regardless of [`Num`], angles
/// derived from it are reduced before they are narrowed.
pub type Time = f64;

pub use self::body::CelestialBody;
pub use self::color::Rgb;
pub use self::constants::*;
pub use self::error::ConfigError;
pub use self::motion::{BodyPose, CircularOrbit};
pub use self::scene::{BodyNode, CameraPose, Lighting, Orrery, PointLight};
pub use self::starfield::{Star, StarField};
pub use self::system::SolarSystem;
