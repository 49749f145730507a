use bevy::asset::LoadState;
use bevy::prelude::*;
use bevy::render::camera::CameraProjection;
use bevy::window::PrimaryWindow;
use orrery::{Time, LABEL_TEXT_SIZE};
use smooth_bevy_cameras::LookTransform;

use super::{FocusMode, Settings};
use crate::body::{BodyLabel, LabelAnchor, LabelText, NodeIndex, PendingTexture, SceneGraph};

const MIN_LABEL_FONT_SIZE: f32 = 8.0;
const MAX_LABEL_FONT_SIZE: f32 = 48.0;

/// Seconds since the scene was composed, as seen by the animation
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct SceneClock {
    pub elapsed: f64,
}

impl SceneClock {
    pub fn advance(&mut self, delta_seconds: f64, settings: &Settings) {
        if settings.paused {
            return;
        }

        self.elapsed += delta_seconds * settings.time_scale.max(0.0) as f64;
    }

    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }

    pub fn seconds(&self) -> Time {
        self.elapsed
    }
}

pub fn clock(time: Res<Time>, mut clock: ResMut<SceneClock>, settings: Res<Settings>) {
    clock.advance(time.delta_seconds_f64(), &settings);
}

pub fn bodies(
    clock: Res<SceneClock>,
    scene: Option<ResMut<SceneGraph>>,
    mut bodies: Query<(&NodeIndex, &LabelAnchor, &mut Transform), Without<BodyLabel>>,
    mut anchors: Query<&mut Transform, With<BodyLabel>>,
) {
    // Not composed yet, or torn down
    let Some(mut scene) = scene else {
        return;
    };

    scene.update(clock.seconds());

    for (index, anchor, mut transform) in bodies.iter_mut() {
        let Some(node) = scene.node(index.0) else {
            continue;
        };

        let Ok(mut label) = anchors.get_mut(anchor.0) else {
            continue;
        };

        transform.translation = node.pose.position;
        transform.rotation = node.pose.rotation();

        label.translation = node.pose.label;
    }
}

/// Keeps every label's text centered on its anchor, sized as if it were
/// `LABEL_TEXT_SIZE` world units tall.
pub fn labels(
    settings: Res<Settings>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&GlobalTransform, &Projection), With<Camera>>,
    anchors: Query<(&Transform, &BodyLabel)>,
    bodies: Query<(), With<NodeIndex>>,
    mut texts: Query<(&LabelText, &Node, &mut Style, &mut Text, &mut Visibility)>,
) {
    let Ok((camera_transform, projection)) = cameras.get_single() else {
        return;
    };

    let viewport = windows
        .get_single()
        .map(|window| Vec2::new(window.width(), window.height()))
        .unwrap_or_default();

    let world_to_ndc =
        projection.get_projection_matrix() * camera_transform.compute_matrix().inverse();

    let fov = match projection {
        Projection::Perspective(perspective) => perspective.fov,
        Projection::Orthographic(_) => std::f32::consts::FRAC_PI_3,
    };

    for (label, node, mut style, mut text, mut visibility) in texts.iter_mut() {
        let anchor = anchors
            .get(label.anchor)
            .ok()
            .filter(|(_, body_label)| settings.show_labels && bodies.contains(body_label.body))
            .map(|(anchor, _)| anchor.translation);

        let Some((anchor, screen)) = anchor.and_then(|anchor| {
            world_to_viewport(world_to_ndc, viewport, anchor).map(|screen| (anchor, screen))
        }) else {
            visibility.set_if_neq(Visibility::Hidden);
            continue;
        };

        visibility.set_if_neq(Visibility::Visible);

        let depth = camera_transform.translation().distance(anchor).max(f32::EPSILON);
        let font_size = (LABEL_TEXT_SIZE * viewport.y / (2.0 * (fov / 2.0).tan() * depth))
            .clamp(MIN_LABEL_FONT_SIZE, MAX_LABEL_FONT_SIZE);

        let current = text.sections.first().map(|section| section.style.font_size);
        if current.is_some_and(|current| (current - font_size).abs() > 0.5) {
            text.sections[0].style.font_size = font_size;
        }

        let size = node.size();
        style.left = Val::Px(screen.x - size.x / 2.0);
        style.top = Val::Px(screen.y - size.y / 2.0);
    }
}

/// Logical pixel position of `point`, origin at the top left of the window.
/// `None` for points behind the camera or beyond its depth range.
fn world_to_viewport(world_to_ndc: Mat4, viewport: Vec2, point: Vec3) -> Option<Vec2> {
    if viewport.cmple(Vec2::ZERO).any() {
        return None;
    }

    let ndc = world_to_ndc.project_point3(point);
    if ndc.is_nan() || !(0.0..=1.0).contains(&ndc.z) {
        return None;
    }

    let screen = (ndc.truncate() + Vec2::ONE) / 2.0 * viewport;

    Some(Vec2::new(screen.x, viewport.y - screen.y))
}

/// Swaps loaded images into body materials. Bodies whose image can't be
/// loaded keep their fallback color.
pub fn textures(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    images: Res<Assets<Image>>,
    pending: Query<(Entity, &Name, &PendingTexture, &Handle<StandardMaterial>)>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for (entity, name, texture, material) in pending.iter() {
        if images.contains(&texture.image) {
            if let Some(material) = materials.get_mut(material) {
                material.base_color = Color::WHITE;
                material.base_color_texture = Some(texture.image.clone());
            }

            debug!(body = name.as_str(), path = %texture.path, "Texture loaded");
            commands.entity(entity).remove::<PendingTexture>();
            continue;
        }

        match asset_server.get_load_state(texture.image.id()) {
            Some(LoadState::Failed) | None => {
                warn!(
                    body = name.as_str(),
                    path = %texture.path,
                    "Failed to load texture, keeping the fallback color"
                );
                commands.entity(entity).remove::<PendingTexture>();
            }
            Some(LoadState::NotLoaded | LoadState::Loading | LoadState::Loaded) => {}
        }
    }
}

pub fn camera_focus(
    mut look_transform: Query<&mut LookTransform>,
    settings: Res<Settings>,
    bodies: Query<(&Transform, &Name), With<NodeIndex>>,
) {
    let Ok(mut look) = look_transform.get_single_mut() else {
        return;
    };

    match &settings.focus_mode {
        FocusMode::Free => {}
        FocusMode::Body(focused_name) => {
            for (transform, name) in bodies.iter() {
                if focused_name == name.as_str() {
                    look.target = transform.translation;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use orrery::scene::DEFAULT_ASPECT;
    use orrery::{Orrery, SolarSystem, LABEL_OFFSET};
    use test_case::test_case;

    use super::*;

    const TOLERANCE: f32 = 1e-3;

    #[test_case(1.0, false, 0.5, 0.5 ; "real time")]
    #[test_case(10.0, false, 0.5, 5.0 ; "fast forward")]
    #[test_case(10.0, true, 0.5, 0.0 ; "paused")]
    #[test_case(-3.0, false, 0.5, 0.0 ; "never runs backwards")]
    fn clock_advances(time_scale: f32, paused: bool, delta: f64, expected: f64) {
        let settings = Settings {
            time_scale,
            paused,
            ..Default::default()
        };
        let mut clock = SceneClock::default();

        clock.advance(delta, &settings);

        assert!((clock.elapsed - expected).abs() < 1e-9);
    }

    #[test]
    fn clock_resets() {
        let mut clock = SceneClock { elapsed: 42.0 };

        clock.reset();

        assert_eq!(clock.seconds(), 0.0);
    }

    struct Spawned {
        earth: Entity,
        earth_label: Entity,
        sun: Entity,
    }

    fn app(elapsed: f64) -> (App, Spawned) {
        let mut app = App::new();

        app.insert_resource(SceneClock { elapsed })
            .add_systems(Update, bodies);

        let orrery = Orrery::compose(SolarSystem::default(), DEFAULT_ASPECT);
        let earth_index = orrery.find("Earth").unwrap().index;
        let sun_index = orrery.find("Sun").unwrap().index;
        app.insert_resource(SceneGraph(orrery));

        let spawned = spawn_pair(&mut app, earth_index);
        let sun = spawn_pair(&mut app, sun_index);

        (
            app,
            Spawned {
                earth: spawned.0,
                earth_label: spawned.1,
                sun: sun.0,
            },
        )
    }

    fn spawn_pair(app: &mut App, index: usize) -> (Entity, Entity) {
        let label = app.world.spawn(Transform::default()).id();
        let body = app
            .world
            .spawn((Transform::default(), NodeIndex(index), LabelAnchor(label)))
            .id();
        app.world.entity_mut(label).insert(BodyLabel { body });

        (body, label)
    }

    #[test]
    fn moves_bodies_and_labels() {
        let (mut app, spawned) = app(PI / 0.08);

        app.update();

        let earth = app.world.get::<Transform>(spawned.earth).unwrap();
        assert!((earth.translation - Vec3::new(-16.0, 0.0, 0.0)).length() < TOLERANCE);

        let label = app.world.get::<Transform>(spawned.earth_label).unwrap();
        assert_eq!(label.translation.x, earth.translation.x);
        assert_eq!(label.translation.z, earth.translation.z);
        assert_eq!(label.translation.y, 0.5 + LABEL_OFFSET);

        let sun = app.world.get::<Transform>(spawned.sun).unwrap();
        assert_eq!(sun.translation, Vec3::ZERO);
        assert_ne!(sun.rotation, Quat::IDENTITY);
    }

    #[test]
    fn follows_the_clock() {
        let (mut app, spawned) = app(0.0);

        app.update();
        let start = app.world.get::<Transform>(spawned.earth).unwrap().translation;
        assert!((start - Vec3::new(16.0, 0.0, 0.0)).length() < TOLERANCE);

        app.world.resource_mut::<SceneClock>().elapsed = 10.0;
        app.update();
        let later = app.world.get::<Transform>(spawned.earth).unwrap().translation;

        assert!(later.z > 0.0);
        assert!((later.length() - 16.0).abs() < TOLERANCE);
        assert_eq!(app.world.resource::<SceneGraph>().elapsed(), 10.0);
    }

    #[test]
    fn skips_body_without_label() {
        let (mut app, _) = app(20.0);

        let gone = app.world.spawn_empty().id();
        app.world.despawn(gone);

        let orphan = app
            .world
            .spawn((Transform::default(), NodeIndex(1), LabelAnchor(gone)))
            .id();

        app.update();

        assert_eq!(
            app.world.get::<Transform>(orphan).unwrap().translation,
            Vec3::ZERO
        );
    }

    #[test]
    fn skips_unknown_node() {
        let (mut app, _) = app(20.0);

        let (body, label) = spawn_pair(&mut app, 99);

        app.update();

        assert_eq!(app.world.get::<Transform>(body).unwrap().translation, Vec3::ZERO);
        assert_eq!(app.world.get::<Transform>(label).unwrap().translation, Vec3::ZERO);
    }

    #[test]
    fn idle_before_the_scene_exists() {
        let mut app = App::new();
        app.init_resource::<SceneClock>().add_systems(Update, bodies);

        let (body, _) = spawn_pair(&mut app, 0);

        app.update();

        assert_eq!(app.world.get::<Transform>(body).unwrap().translation, Vec3::ZERO);
    }

    #[test]
    fn focus_tracks_the_chosen_body() {
        let mut app = App::new();

        app.insert_resource(Settings {
            focus_mode: FocusMode::Body("Earth".to_string()),
            ..Default::default()
        })
        .add_systems(Update, camera_focus);

        app.world.spawn((
            Transform::from_xyz(3.0, 0.0, 4.0),
            Name::new("Earth"),
            NodeIndex(3),
        ));
        let camera = app
            .world
            .spawn(LookTransform::new(Vec3::new(0.0, 5.0, 30.0), Vec3::ZERO, Vec3::Y))
            .id();

        app.update();

        let look = app.world.get::<LookTransform>(camera).unwrap();
        assert_eq!(look.target, Vec3::new(3.0, 0.0, 4.0));
    }

    #[test]
    fn free_focus_leaves_the_camera_alone() {
        let mut app = App::new();

        app.init_resource::<Settings>()
            .add_systems(Update, camera_focus);

        let camera = app
            .world
            .spawn(LookTransform::new(Vec3::new(0.0, 5.0, 30.0), Vec3::X, Vec3::Y))
            .id();

        app.update();

        assert_eq!(app.world.get::<LookTransform>(camera).unwrap().target, Vec3::X);
    }

    #[test_case(1.0e6 ; "a million seconds")]
    #[test_case(8.64e6 ; "a hundred days")]
    fn bodies_keep_moving_in_long_sessions(elapsed: f64) {
        let (mut app, spawned) = app(elapsed);

        let mut positions = Vec::new();
        for _ in 0..3 {
            app.update();
            positions.push(app.world.get::<Transform>(spawned.earth).unwrap().translation);
            app.world.resource_mut::<SceneClock>().elapsed += 1.0 / 60.0;
        }

        // 16 units of radius at 0.08 rad/s
        let expected = 16.0 * 0.08 / 60.0;
        for pair in positions.windows(2) {
            let step = pair[0].distance(pair[1]);
            assert!(
                (step - expected).abs() < expected * 0.05,
                "moved {step} in one frame, expected {expected}"
            );
        }
    }

    fn texture_app() -> App {
        let mut app = App::new();

        app.add_plugins((MinimalPlugins, AssetPlugin::default()))
            .init_asset::<Image>()
            .init_asset::<StandardMaterial>()
            .add_systems(Update, textures);

        app
    }

    fn spawn_textured(app: &mut App, image: Handle<Image>) -> (Entity, Handle<StandardMaterial>) {
        let material = app
            .world
            .resource_mut::<Assets<StandardMaterial>>()
            .add(StandardMaterial {
                base_color: Color::rgb_u8(0x11, 0x7a, 0x65),
                ..default()
            });

        let entity = app
            .world
            .spawn((
                Name::new("Earth"),
                PendingTexture {
                    path: "textures/earth.jpg".to_string(),
                    image,
                },
                material.clone(),
            ))
            .id();

        (entity, material)
    }

    #[test]
    fn missing_texture_keeps_the_fallback_color() {
        let mut app = texture_app();
        let (entity, material) = spawn_textured(&mut app, Handle::default());

        app.update();

        assert!(app.world.get::<PendingTexture>(entity).is_none());

        let material = app
            .world
            .resource::<Assets<StandardMaterial>>()
            .get(&material)
            .unwrap();
        assert_eq!(material.base_color, Color::rgb_u8(0x11, 0x7a, 0x65));
        assert!(material.base_color_texture.is_none());
    }

    #[test]
    fn loaded_texture_replaces_the_color() {
        let mut app = texture_app();
        let image = app.world.resource_mut::<Assets<Image>>().add(Image::default());
        let (entity, material) = spawn_textured(&mut app, image.clone());

        app.update();

        assert!(app.world.get::<PendingTexture>(entity).is_none());

        let material = app
            .world
            .resource::<Assets<StandardMaterial>>()
            .get(&material)
            .unwrap();
        assert_eq!(material.base_color, Color::WHITE);
        assert_eq!(material.base_color_texture, Some(image));
    }

    #[test_case(true, Vec3::ZERO, Visibility::Visible ; "in front of the camera")]
    #[test_case(false, Vec3::ZERO, Visibility::Hidden ; "labels switched off")]
    #[test_case(true, Vec3::new(0.0, 0.0, 20.0), Visibility::Hidden ; "behind the camera")]
    fn label_visibility(show_labels: bool, anchor: Vec3, expected: Visibility) {
        let mut app = App::new();

        app.insert_resource(Settings {
            show_labels,
            ..Default::default()
        })
        .add_systems(Update, labels);

        app.world.spawn((Window::default(), PrimaryWindow));
        app.world.spawn((
            Camera::default(),
            GlobalTransform::from(Transform::from_xyz(0.0, 0.0, 10.0).looking_at(Vec3::ZERO, Vec3::Y)),
            Projection::Perspective(PerspectiveProjection {
                aspect_ratio: 1280.0 / 720.0,
                ..default()
            }),
        ));

        let body = app.world.spawn(NodeIndex(0)).id();
        let anchor = app
            .world
            .spawn((Transform::from_translation(anchor), BodyLabel { body }))
            .id();
        let text = app
            .world
            .spawn((
                LabelText { anchor },
                Node::default(),
                Style::default(),
                Text::from_section("Earth", TextStyle::default()),
                Visibility::Inherited,
            ))
            .id();

        app.update();

        assert_eq!(*app.world.get::<Visibility>(text).unwrap(), expected);

        if expected == Visibility::Visible {
            let style = app.world.get::<Style>(text).unwrap();
            assert!(matches!(style.left, Val::Px(x) if (x - 640.0).abs() < 0.5));
            assert!(matches!(style.top, Val::Px(y) if (y - 360.0).abs() < 0.5));
        }
    }

    #[test]
    fn nothing_projects_without_a_viewport() {
        let world_to_ndc = Mat4::perspective_infinite_reverse_rh(1.0, 1.0, 0.1);

        assert_eq!(
            world_to_viewport(world_to_ndc, Vec2::ZERO, Vec3::new(0.0, 0.0, -5.0)),
            None
        );
        assert!(world_to_viewport(world_to_ndc, Vec2::splat(100.0), Vec3::new(0.0, 0.0, -5.0)).is_some());
    }
}
