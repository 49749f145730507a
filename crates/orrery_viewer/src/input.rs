use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::input::touch::Touches;
use bevy::prelude::*;
use bevy_egui::EguiContexts;
use smooth_bevy_cameras::controllers::orbit::{ControlEvent, OrbitCameraController};

/// Set while the pointer is busy with the egui overlay
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct PointerOverUi(pub bool);

pub fn track_ui_pointer(mut egui_context: EguiContexts, mut over_ui: ResMut<PointerOverUi>) {
    let ctx = egui_context.ctx_mut();

    over_ui.0 = ctx.wants_pointer_input() || ctx.is_pointer_over_area();
}

/// Drag to orbit, secondary drag to pan, wheel to zoom. On touch screens one
/// finger orbits, two fingers pan and pinch to zoom.
pub fn camera_input(
    mut events: EventWriter<ControlEvent>,
    mut mouse_wheel_reader: EventReader<MouseWheel>,
    mut mouse_motion_events: EventReader<MouseMotion>,
    mouse_buttons: Res<Input<MouseButton>>,
    touches: Res<Touches>,
    over_ui: Res<PointerOverUi>,
    controllers: Query<&OrbitCameraController>,
) {
    let cursor_delta: Vec2 = mouse_motion_events.read().map(|event| event.delta).sum();
    let scroll_events: Vec<MouseWheel> = mouse_wheel_reader.read().cloned().collect();

    let Some(controller) = controllers.iter().find(|controller| controller.enabled) else {
        return;
    };

    if over_ui.0 {
        return;
    }

    if mouse_buttons.pressed(MouseButton::Left) {
        events.send(ControlEvent::Orbit(
            controller.mouse_rotate_sensitivity * cursor_delta,
        ));
    }

    if mouse_buttons.pressed(MouseButton::Right) {
        events.send(ControlEvent::TranslateTarget(
            controller.mouse_translate_sensitivity * cursor_delta,
        ));
    }

    let mut zoom = scroll_events.iter().fold(1.0, |scalar, event| {
        let scroll_amount = match event.unit {
            MouseScrollUnit::Line => event.y,
            MouseScrollUnit::Pixel => event.y / controller.pixels_per_line,
        };

        scalar * (1.0 - scroll_amount * controller.mouse_wheel_zoom_sensitivity)
    });

    let active = touches.iter().collect::<Vec<_>>();
    match active.as_slice() {
        [touch] => {
            events.send(ControlEvent::Orbit(
                controller.mouse_rotate_sensitivity * touch.delta(),
            ));
        }
        [a, b] => {
            let before = a.previous_position().distance(b.previous_position());
            let after = a.position().distance(b.position());
            if before > 0.0 && after > 0.0 {
                zoom *= before / after;
            }

            let midpoint_delta = (a.delta() + b.delta()) / 2.0;
            events.send(ControlEvent::TranslateTarget(
                controller.mouse_translate_sensitivity * midpoint_delta,
            ));
        }
        _ => {}
    }

    if zoom != 1.0 {
        events.send(ControlEvent::Zoom(zoom));
    }
}

#[cfg(test)]
mod tests {
    use bevy::ecs::event::Events;

    use super::*;

    fn app() -> App {
        let mut app = App::new();

        app.add_event::<MouseMotion>()
            .add_event::<MouseWheel>()
            .add_event::<ControlEvent>()
            .init_resource::<Input<MouseButton>>()
            .init_resource::<Touches>()
            .init_resource::<PointerOverUi>()
            .add_systems(Update, camera_input);

        app.world.spawn(OrbitCameraController::default());

        app
    }

    fn drag(app: &mut App, button: MouseButton, delta: Vec2) {
        app.world.resource_mut::<Input<MouseButton>>().press(button);
        app.world.send_event(MouseMotion { delta });
        app.update();
    }

    fn sent(app: &App) -> Vec<ControlEvent> {
        let events = app.world.resource::<Events<ControlEvent>>();
        let mut reader = events.get_reader();

        reader
            .read(events)
            .map(|event| match event {
                ControlEvent::Orbit(delta) => ControlEvent::Orbit(*delta),
                ControlEvent::TranslateTarget(delta) => ControlEvent::TranslateTarget(*delta),
                ControlEvent::Zoom(scalar) => ControlEvent::Zoom(*scalar),
            })
            .collect()
    }

    #[test]
    fn plain_drag_orbits() {
        let mut app = app();

        drag(&mut app, MouseButton::Left, Vec2::new(10.0, 0.0));

        let events = sent(&app);
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], ControlEvent::Orbit(delta) if delta.x > 0.0 && delta.y == 0.0));
    }

    #[test]
    fn secondary_drag_pans() {
        let mut app = app();

        drag(&mut app, MouseButton::Right, Vec2::new(0.0, 4.0));

        let events = sent(&app);
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], ControlEvent::TranslateTarget(delta) if delta.y > 0.0));
    }

    #[test]
    fn wheel_zooms() {
        let mut app = app();

        app.world.send_event(MouseWheel {
            unit: MouseScrollUnit::Line,
            x: 0.0,
            y: 1.0,
            window: Entity::PLACEHOLDER,
        });
        app.update();

        let events = sent(&app);
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], ControlEvent::Zoom(scalar) if scalar < 1.0));
    }

    #[test]
    fn moving_without_buttons_does_nothing() {
        let mut app = app();

        app.world.send_event(MouseMotion {
            delta: Vec2::new(3.0, 3.0),
        });
        app.update();

        assert!(sent(&app).is_empty());
    }

    #[test]
    fn ignored_while_over_the_overlay() {
        let mut app = app();
        app.world.resource_mut::<PointerOverUi>().0 = true;

        drag(&mut app, MouseButton::Left, Vec2::new(10.0, 0.0));

        assert!(sent(&app).is_empty());
    }
}
