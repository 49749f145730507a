use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{vec3, Num, Vec3, TWO_PI};

/// A decorative shell of stars around the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StarField {
    /// Inner radius of the shell
    pub radius: Num,
    /// Thickness of the shell
    pub depth: Num,
    pub count: usize,
    /// Size of the largest star, in world units
    pub size: Num,
    pub seed: u64,
}

impl Default for StarField {
    fn default() -> Self {
        Self {
            radius: 100.0,
            depth: 50.0,
            count: 5000,
            size: 0.15,
            seed: 0x5747_4152,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    pub position: Vec3,
    pub size: Num,
}

impl StarField {
    pub fn with_count(self, count: usize) -> Self {
        Self { count, ..self }
    }

    /// Scatters `count` stars, starting at the outer edge of the shell and
    /// drifting inwards so the whole depth gets filled.
    pub fn generate(&self) -> Vec<Star> {
        let mut rng = StdRng::seed_from_u64(self.seed);

        let increment = self.depth / self.count.max(1) as Num;
        let mut r = self.radius + self.depth;

        (0..self.count)
            .map(|_| {
                r -= increment * rng.gen::<Num>();

                Star {
                    position: random_direction(&mut rng) * r,
                    size: self.size * (0.5 + 0.5 * rng.gen::<Num>()),
                }
            })
            .collect()
    }
}

/// Uniformly distributed unit vector
fn random_direction(rng: &mut impl Rng) -> Vec3 {
    let y: Num = 1.0 - 2.0 * rng.gen::<Num>();
    let phi = TWO_PI * rng.gen::<Num>();
    let s = (1.0 - y * y).max(0.0).sqrt();

    vec3(s * phi.cos(), y, s * phi.sin())
}
