use bevy::prelude::*;
use bevy_egui::egui::{ComboBox, DragValue, Ui};
use bevy_egui::{egui, EguiContexts};
use smooth_bevy_cameras::controllers::orbit::OrbitCameraController;

use super::{FocusMode, Settings};
use crate::body::SceneGraph;
use crate::setup::ResetScene;
use crate::update::SceneClock;

#[derive(Resource, Debug, Clone, Default)]
pub struct UiState {
    selected_body: Option<usize>,
    settings_visible: bool,
    about_visible: bool,
    focus_visible: bool,
}

pub fn render(
    mut ui_state: ResMut<UiState>,
    mut egui_context: EguiContexts,
    mut settings: ResMut<Settings>,
    clock: Res<SceneClock>,
    scene: Option<Res<SceneGraph>>,
    mut camera: Query<&mut OrbitCameraController>,
    camera_transform: Query<&GlobalTransform, With<OrbitCameraController>>,
    mut reset_event_writer: EventWriter<ResetScene>,
) {
    let ctx = egui_context.ctx_mut();

    egui::TopBottomPanel::top("Top").show(ctx, |ui| {
        ui.horizontal(|ui| {
            if ui.button("Settings").clicked() {
                ui_state.settings_visible = !ui_state.settings_visible;
            }

            if ui.button("About").clicked() {
                ui_state.about_visible = !ui_state.about_visible;
            }

            if ui.button("Focus").clicked() {
                ui_state.focus_visible = !ui_state.focus_visible;
            }

            if ui.button("Reset").clicked() {
                ui_state.selected_body = None;
                reset_event_writer.send(ResetScene);
            }
        });
    });

    egui::TopBottomPanel::bottom("Bottom").show(ctx, |ui| {
        ui.horizontal(|ui| {
            if let Ok(camera_transform) = camera_transform.get_single() {
                let translation = camera_transform.translation();
                ui.label(format!("Camera Position: {translation}"));
            }

            ui.label(format!("Elapsed: {:.1}s", clock.elapsed));

            if settings.paused {
                ui.label("(paused)");
            }
        });
    });

    let body_names: Vec<String> = scene
        .as_ref()
        .map(|scene| scene.nodes().map(|node| node.body.name.clone()).collect())
        .unwrap_or_default();

    egui::SidePanel::left("Left").show(ctx, |ui| {
        ui.heading("Bodies:");
        for (idx, name) in body_names.iter().enumerate() {
            let selected = ui_state.selected_body == Some(idx);

            if ui.selectable_label(selected, name.as_str()).clicked() {
                if selected {
                    ui_state.selected_body = None;
                } else {
                    ui_state.selected_body = Some(idx);
                }
            }
        }

        ui.separator();

        let Some(node) = ui_state
            .selected_body
            .zip(scene.as_ref())
            .and_then(|(idx, scene)| scene.node(idx))
        else {
            return;
        };

        let body = node.body;
        ui.heading(body.name.as_str());

        if ui.button("Focus").clicked() {
            settings.focus_mode = FocusMode::Body(body.name.clone());
        }

        ui.label("Readouts:");
        ui.label(format!("Radius: {}", body.radius));
        ui.label(format!("Orbit radius: {}", body.distance));
        ui.label(format!("Orbital speed: {} rad/s", body.speed));
        ui.label(format!("Spin: {} rad/s", body.rotate_speed));

        match body.orbit().period() {
            Some(period) => ui.label(format!("Period: {period:.1}s")),
            None => ui.label("Period: -"),
        };

        ui.label(format!("Position: {}", node.pose.position));
        ui.label(format!(
            "Texture: {}",
            body.texture.as_deref().unwrap_or("none")
        ));
    });

    egui::Window::new("Settings")
        .open(&mut ui_state.settings_visible)
        .show(ctx, |ui| {
            ui.heading("Time");
            value_slider_min_max(ui, "Time scale", &mut settings.time_scale, 0.0, 100.0);
            ui.checkbox(&mut settings.paused, "Pause");

            ui.heading("Display");
            ui.checkbox(&mut settings.draw_orbits, "Draw orbits");
            if settings.draw_orbits {
                value_slider_u32(ui, "Orbit subdivisions", &mut settings.orbit_subdivisions);
            }

            ui.checkbox(&mut settings.show_labels, "Show labels");

            ui.checkbox(&mut settings.draw_axis, "Draw axis");
            if settings.draw_axis {
                value_slider(ui, "Axis scale", &mut settings.axis_scale);
            }

            let mut star_count = settings.star_count as u32;
            value_slider_u32(ui, "Stars (applied on reset)", &mut star_count);
            settings.star_count = star_count as usize;

            if let Ok(mut camera) = camera.get_single_mut() {
                ui.heading("Camera");

                ui.label("Mouse rotate sensitivity");
                ui.horizontal(|ui| {
                    ui.label("x");
                    ui.add(DragValue::new(&mut camera.mouse_rotate_sensitivity.x).speed(0.01));
                    ui.label("y");
                    ui.add(DragValue::new(&mut camera.mouse_rotate_sensitivity.y).speed(0.01));
                });

                ui.label("Mouse translate sensitivity");
                ui.horizontal(|ui| {
                    ui.label("x");
                    ui.add(DragValue::new(&mut camera.mouse_translate_sensitivity.x).speed(0.01));
                    ui.label("y");
                    ui.add(DragValue::new(&mut camera.mouse_translate_sensitivity.y).speed(0.01));
                });
            }
        });

    egui::Window::new("About").open(&mut ui_state.about_visible).show(ctx, |ui| {
        ui.heading("Hello!");

        ui.label("This is a decorative model of the inner solar system.");

        ui.label("Nothing here is to scale: orbits are perfect circles and every body moves at a made up pace.");

        ui.heading("Controls");
        ui.label("Scroll or pinch to zoom in & out");
        ui.label("Drag to rotate the viewport");
        ui.label("Right click and drag, or drag with two fingers, to pan");

        ui.label("Use the focus window to follow a body");
    });

    egui::Window::new("Focus")
        .open(&mut ui_state.focus_visible)
        .show(ctx, |ui| {
            let current = match &settings.focus_mode {
                FocusMode::Free => "Free".to_string(),
                FocusMode::Body(name) => name.clone(),
            };

            ComboBox::from_label("Choose focus")
                .selected_text(&current)
                .show_ui(ui, |ui| {
                    if ui.selectable_label(current == "Free", "Free").clicked() {
                        settings.focus_mode = FocusMode::Free;
                    }

                    for name in &body_names {
                        if ui.selectable_label(&current == name, name.as_str()).clicked() {
                            settings.focus_mode = FocusMode::Body(name.clone());
                        }
                    }
                });
        });
}

fn value_slider(ui: &mut Ui, name: &str, value: &mut f32) {
    value_slider_min_max(ui, name, value, f32::MIN, f32::MAX)
}

fn value_slider_min_max(ui: &mut Ui, name: &str, value: &mut f32, min: f32, max: f32) {
    ui.horizontal(|ui| {
        ui.label(name);
        ui.add(DragValue::new(value).speed(0.01).clamp_range(min..=max));
    });
}

fn value_slider_u32(ui: &mut Ui, name: &str, value: &mut u32) {
    ui.horizontal(|ui| {
        ui.label(name);
        ui.add(DragValue::new(value).speed(1).clamp_range(u32::MIN..=u32::MAX));
    });
}
