use crate::Num;

#[cfg(feature = "f32")]
pub use std::f32::consts::PI;
#[cfg(all(feature = "f64", not(feature = "f32")))]
pub use std::f64::consts::PI;

pub const TWO_PI: Num = 2.0 * PI;

/// Font size of the floating name labels, in world units
pub const LABEL_TEXT_SIZE: Num = 0.4;

/// Gap between the top of a body and the bottom of its label
pub const LABEL_GAP: Num = 0.1;

/// Height of a label above the surface of its body
pub const LABEL_OFFSET: Num = LABEL_TEXT_SIZE + LABEL_GAP;

/// Longitude and latitude segments of the body spheres
pub const SPHERE_SEGMENTS: usize = 32;
