use tracing::{debug, warn};

use crate::{vec3, BodyPose, CelestialBody, Num, Rgb, SolarSystem, StarField, Time, Vec3};

/// Horizontal-to-vertical ratio assumed when the viewport size isn't known yet
pub const DEFAULT_ASPECT: Num = 16.0 / 9.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub intensity: Num,
}

/// A flat ambient fill plus a single point light for highlights
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lighting {
    pub ambient_intensity: Num,
    pub point: PointLight,
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            ambient_intensity: 1.0,
            point: PointLight {
                position: vec3(5.0, 5.0, 5.0),
                intensity: 1.0,
            },
        }
    }
}

/// Initial pose of the camera. The user takes over from here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub eye: Vec3,
    pub target: Vec3,
    /// Vertical field of view
    pub fov_degrees: Num,
}

impl Default for CameraPose {
    /// Slightly above and behind the origin, looking at the sun
    fn default() -> Self {
        Self {
            eye: vec3(0.0, 5.0, 30.0),
            target: Vec3::ZERO,
            fov_degrees: 60.0,
        }
    }
}

impl CameraPose {
    /// Half of the horizontal extent visible at the target
    pub fn half_width_at_target(&self, aspect: Num) -> Num {
        let half_fov = self.fov_degrees.to_radians() / 2.0;

        (self.eye - self.target).length() * half_fov.tan() * aspect
    }

    /// Whether a circle of `radius` around the target fits horizontally.
    pub fn frames(&self, radius: Num, aspect: Num) -> bool {
        self.half_width_at_target(aspect) >= radius
    }

    /// Pulls the eye back along the view direction until `radius` fits.
    pub fn framing(self, radius: Num, aspect: Num) -> Self {
        if self.frames(radius, aspect) {
            return self;
        }

        let half_fov = self.fov_degrees.to_radians() / 2.0;
        let required = radius / (half_fov.tan() * aspect);
        let direction = (self.eye - self.target).normalize_or_zero();

        warn!(radius, required, "Moving the camera back to frame every orbit");

        Self {
            eye: self.target + direction * required,
            ..self
        }
    }
}

/// One body of a composed scene together with its current pose
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyNode<'a> {
    pub index: usize,
    pub body: &'a CelestialBody,
    pub pose: BodyPose,
}

/// The whole scene: static surroundings plus one posed node per body.
///
/// Built once with [`Orrery::compose`], then advanced by the render loop
/// through [`Orrery::update`]. Nodes are never added or removed.
#[derive(Debug, Clone)]
pub struct Orrery {
    system: SolarSystem,
    poses: Vec<BodyPose>,
    elapsed: Time,

    pub background: Rgb,
    pub star_field: StarField,
    pub lighting: Lighting,
    pub camera: CameraPose,
}

impl Orrery {
    /// Lays out the scene for a viewport of the given `aspect` ratio.
    ///
    /// The configuration is taken as is; see [`SolarSystem::validate`].
    pub fn compose(system: SolarSystem, aspect: Num) -> Self {
        let poses = system.iter().map(|body| body.pose_at(0.0)).collect();
        let camera = CameraPose::default().framing(system.max_orbit_radius(), aspect);

        debug!(bodies = system.len(), ?camera, "Composed scene");

        Self {
            system,
            poses,
            elapsed: 0.0,
            background: Rgb::BLACK,
            star_field: StarField::default(),
            lighting: Lighting::default(),
            camera,
        }
    }

    pub fn with_star_field(self, star_field: StarField) -> Self {
        Self { star_field, ..self }
    }

    /// Moves every body to where it is `elapsed` seconds after the scene started.
    pub fn update(&mut self, elapsed: Time) {
        for (body, pose) in self.system.iter().zip(self.poses.iter_mut()) {
            *pose = body.pose_at(elapsed);
        }

        self.elapsed = elapsed;
    }

    pub fn elapsed(&self) -> Time {
        self.elapsed
    }

    pub fn system(&self) -> &SolarSystem {
        &self.system
    }

    pub fn len(&self) -> usize {
        self.poses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }

    pub fn node(&self, index: usize) -> Option<BodyNode<'_>> {
        let body = self.system.bodies.get(index)?;
        let pose = *self.poses.get(index)?;

        Some(BodyNode { index, body, pose })
    }

    pub fn nodes(&self) -> impl Iterator<Item = BodyNode<'_>> {
        (0..self.len()).filter_map(|index| self.node(index))
    }

    pub fn find(&self, name: &str) -> Option<BodyNode<'_>> {
        self.nodes().find(|node| node.body.name == name)
    }
}
