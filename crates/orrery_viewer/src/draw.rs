use bevy::prelude::*;

use crate::body::SceneGraph;
use crate::setup::to_color;
use crate::Settings;

pub fn orbits(mut lines: Gizmos, scene: Option<Res<SceneGraph>>, settings: Res<Settings>) {
    if !settings.draw_orbits {
        return;
    }

    let Some(scene) = scene else {
        return;
    };

    for node in scene.nodes() {
        let orbit = node.body.orbit();
        if orbit.is_stationary() {
            continue;
        }

        let color = to_color(node.body.color);
        let path = orbit.path(settings.orbit_subdivisions);

        let Some((&first_position, rest)) = path.split_first() else {
            continue;
        };
        let mut prev_position = first_position;

        for &position in rest {
            lines.line(prev_position, position, color);

            prev_position = position;
        }

        // Close the loop
        lines.line(prev_position, first_position, color);
    }
}

pub fn axis(mut lines: Gizmos, settings: Res<Settings>) {
    if !settings.draw_axis {
        return;
    }

    const ORIGIN: Vec3 = Vec3::ZERO;

    lines.line(ORIGIN, ORIGIN + settings.axis_scale * Vec3::X, Color::RED);
    lines.line(ORIGIN, ORIGIN + settings.axis_scale * Vec3::Y, Color::GREEN);
    lines.line(ORIGIN, ORIGIN + settings.axis_scale * Vec3::Z, Color::BLUE);
}
