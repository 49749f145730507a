use bevy::log::{Level, LogPlugin};
use bevy::prelude::*;
use bevy_egui::EguiPlugin;
use smooth_bevy_cameras::controllers::orbit::OrbitCameraPlugin;
use smooth_bevy_cameras::LookTransformPlugin;

mod body;
mod draw;
mod input;
mod setup;
mod ui;
mod update;

const LOG_FILTER: &str = "info,wgpu=error,naga=warn,orrery=debug";
const STAR_COUNT: usize = 5000;

fn main() {
    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Orrery".to_string(),
                        fit_canvas_to_parent: true,
                        ..default()
                    }),
                    ..default()
                })
                .set(LogPlugin {
                    filter: LOG_FILTER.to_string(),
                    level: Level::INFO,
                    ..default()
                }),
        )
        .add_plugins(LookTransformPlugin)
        .add_plugins(OrbitCameraPlugin::new(true))
        .add_plugins(EguiPlugin)
        .init_resource::<Settings>()
        .init_resource::<setup::BodyConfig>()
        .init_resource::<update::SceneClock>()
        .init_resource::<ui::UiState>()
        .init_resource::<input::PointerOverUi>()
        .add_event::<setup::ResetScene>()
        .add_systems(Startup, setup::compose)
        .add_systems(Update, ui::render)
        .add_systems(
            Update,
            (input::track_ui_pointer, input::camera_input)
                .chain()
                .after(ui::render),
        )
        .add_systems(Update, setup::reset.before(update::clock))
        .add_systems(
            Update,
            (
                update::clock,
                update::bodies,
                update::labels,
                update::camera_focus,
            )
                .chain(),
        )
        .add_systems(Update, update::textures)
        .add_systems(Update, draw::orbits)
        .add_systems(Update, draw::axis)
        .run();
}

#[derive(Resource)]
pub struct Settings {
    time_scale: f32,
    paused: bool,

    draw_orbits: bool,
    orbit_subdivisions: u32,

    show_labels: bool,

    draw_axis: bool,
    axis_scale: f32,

    star_count: usize,
    focus_mode: FocusMode,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            paused: false,
            draw_orbits: true,
            orbit_subdivisions: 128,
            show_labels: true,
            draw_axis: false,
            axis_scale: 5.0,
            star_count: STAR_COUNT,
            focus_mode: FocusMode::Free,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FocusMode {
    /// The camera goes wherever the user pans it
    Free,
    // By name, same as the labels
    Body(String),
}
