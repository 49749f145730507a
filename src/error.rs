use thiserror::Error;

use crate::Num;

/// Rejections raised while validating a body configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("body name must not be empty")]
    EmptyName,

    #[error("duplicate body name `{0}`")]
    DuplicateName(String),

    #[error("body `{name}` has a non-finite {field}")]
    NonFinite { name: String, field: &'static str },

    #[error("body `{name}` has a non-positive radius ({radius})")]
    NonPositiveRadius { name: String, radius: Num },

    #[error("body `{name}` has a negative orbit radius ({distance})")]
    NegativeDistance { name: String, distance: Num },

    #[error("body `{name}` sits at the origin but has an orbital speed of {speed}")]
    StationaryBodyOrbits { name: String, speed: Num },

    #[error("invalid color `{0}`, expected `#rrggbb`")]
    InvalidColor(String),
}
