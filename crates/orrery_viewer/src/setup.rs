use bevy::ecs::system::SystemParam;
use bevy::pbr::NotShadowCaster;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use orrery::scene::DEFAULT_ASPECT;
use orrery::{Orrery, Rgb, SolarSystem, StarField, SPHERE_SEGMENTS};
use smooth_bevy_cameras::controllers::orbit::{OrbitCameraBundle, OrbitCameraController};

use crate::body::{
    BodyLabel, LabelAnchor, LabelText, NodeIndex, PendingTexture, SceneGraph, SceneMember, Star,
};
use crate::update::SceneClock;
use crate::Settings;

/// Bevy's point light intensity is in lumens, the scene's in multiples of this
const POINT_LIGHT_LUMENS: f32 = 1600.0;
const POINT_LIGHT_RANGE: f32 = 100.0;

/// Font size labels are spawned with, the layout system rescales it with distance
const LABEL_FONT_SIZE: f32 = 16.0;

#[derive(Debug, Clone, Copy, Default, Event)]
pub struct ResetScene;

/// The bodies the scene is composed from
#[derive(Resource, Debug, Clone, Default, Deref)]
pub struct BodyConfig(pub SolarSystem);

pub fn to_color(rgb: Rgb) -> Color {
    Color::rgb_u8(rgb.r, rgb.g, rgb.b)
}

/// Everything composing a scene needs, shared by startup and reset
#[derive(SystemParam)]
pub struct SceneBuilder<'w, 's> {
    commands: Commands<'w, 's>,
    meshes: ResMut<'w, Assets<Mesh>>,
    materials: ResMut<'w, Assets<StandardMaterial>>,
    settings: Res<'w, Settings>,
    config: Res<'w, BodyConfig>,
    windows: Query<'w, 's, &'static Window, With<PrimaryWindow>>,
}

impl SceneBuilder<'_, '_> {
    pub fn build(&mut self, load_texture: impl FnMut(&str) -> Handle<Image>) {
        let aspect = viewport_aspect(&self.windows);

        compose_scene(
            &mut self.commands,
            &mut self.meshes,
            &mut self.materials,
            &self.settings,
            &self.config,
            aspect,
            load_texture,
        );
    }
}

pub fn compose(mut scene: SceneBuilder, asset_server: Res<AssetServer>) {
    scene.build(|path| asset_server.load(path.to_owned()));
}

pub fn reset(
    mut reset_event_reader: EventReader<ResetScene>,
    members: Query<Entity, With<SceneMember>>,
    mut clock: ResMut<SceneClock>,
    mut scene: SceneBuilder,
    asset_server: Res<AssetServer>,
) {
    reset_scene(
        &mut reset_event_reader,
        &members,
        &mut clock,
        &mut scene,
        |path| asset_server.load(path.to_owned()),
    );
}

/// Tears the scene down and composes it again from scratch, once per batch
/// of [`ResetScene`] events.
pub fn reset_scene(
    reset_event_reader: &mut EventReader<ResetScene>,
    members: &Query<Entity, With<SceneMember>>,
    clock: &mut SceneClock,
    scene: &mut SceneBuilder,
    load_texture: impl FnMut(&str) -> Handle<Image>,
) {
    if reset_event_reader.read().count() == 0 {
        return;
    }

    info!("Resetting scene");

    teardown(&mut scene.commands, members);
    clock.reset();

    scene.build(load_texture);
}

/// Despawns every scene entity. Dropping their handles releases meshes,
/// materials and textures.
pub fn teardown(commands: &mut Commands, members: &Query<Entity, With<SceneMember>>) {
    for entity in members.iter() {
        commands.entity(entity).despawn_recursive();
    }

    commands.remove_resource::<SceneGraph>();
}

fn viewport_aspect(windows: &Query<&Window, With<PrimaryWindow>>) -> f32 {
    windows
        .get_single()
        .ok()
        .filter(|window| window.height() > 0.0)
        .map(|window| window.width() / window.height())
        .unwrap_or(DEFAULT_ASPECT)
}

fn compose_scene(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    settings: &Settings,
    config: &BodyConfig,
    aspect: f32,
    mut load_texture: impl FnMut(&str) -> Handle<Image>,
) {
    if let Err(err) = config.validate() {
        error!(%err, "Invalid solar system configuration, nothing to show");
        return;
    }

    let orrery = Orrery::compose(config.0.clone(), aspect)
        .with_star_field(StarField::default().with_count(settings.star_count));

    commands.insert_resource(ClearColor(to_color(orrery.background)));

    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: orrery.lighting.ambient_intensity,
    });

    commands.spawn((
        PointLightBundle {
            point_light: PointLight {
                intensity: POINT_LIGHT_LUMENS * orrery.lighting.point.intensity,
                range: POINT_LIGHT_RANGE,
                ..default()
            },
            transform: Transform::from_translation(orrery.lighting.point.position),
            ..default()
        },
        SceneMember,
    ));

    let camera = orrery.camera;
    commands.spawn((
        Camera3dBundle {
            projection: PerspectiveProjection {
                fov: camera.fov_degrees.to_radians(),
                ..default()
            }
            .into(),
            transform: Transform::from_translation(camera.eye)
                .looking_at(camera.target, Vec3::Y),
            ..default()
        },
        OrbitCameraBundle::new(
            {
                let mut controller = OrbitCameraController::default();

                controller.mouse_rotate_sensitivity = Vec2::ONE * 0.5;
                controller.mouse_translate_sensitivity = Vec2::ONE * 2.0;

                controller
            },
            camera.eye,
            camera.target,
            Vec3::Y,
        ),
        SceneMember,
    ));

    spawn_star_field(commands, meshes, materials, &orrery.star_field);

    for node in orrery.nodes() {
        let body = node.body;

        let anchor = commands
            .spawn((
                SpatialBundle::from_transform(Transform::from_translation(node.pose.label)),
                Name::new(format!("{} label", body.name)),
                SceneMember,
            ))
            .id();

        let mut entity = commands.spawn((
            PbrBundle {
                mesh: meshes.add(Mesh::from(shape::UVSphere {
                    radius: body.radius,
                    sectors: SPHERE_SEGMENTS,
                    stacks: SPHERE_SEGMENTS,
                })),
                material: materials.add(StandardMaterial {
                    base_color: to_color(body.color),
                    perceptual_roughness: 1.0,
                    ..default()
                }),
                transform: Transform::from_translation(node.pose.position)
                    .with_rotation(node.pose.rotation()),
                ..default()
            },
            Name::new(body.name.clone()),
            NodeIndex(node.index),
            LabelAnchor(anchor),
            SceneMember,
        ));

        if let Some(path) = &body.texture {
            entity.insert(PendingTexture {
                path: path.clone(),
                image: load_texture(path),
            });
        }

        let body_entity = entity.id();
        commands.entity(anchor).insert(BodyLabel { body: body_entity });

        commands.spawn((
            TextBundle::from_section(
                body.name.clone(),
                TextStyle {
                    font_size: LABEL_FONT_SIZE,
                    color: Color::WHITE,
                    ..default()
                },
            )
            .with_style(Style {
                position_type: PositionType::Absolute,
                ..default()
            }),
            LabelText { anchor },
            SceneMember,
        ));
    }

    info!(bodies = orrery.len(), stars = settings.star_count, "Scene composed");

    commands.insert_resource(SceneGraph(orrery));
}

fn spawn_star_field(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    star_field: &StarField,
) {
    let mesh = meshes.add(Mesh::from(shape::UVSphere {
        radius: 1.0,
        sectors: 6,
        stacks: 4,
    }));

    let material = materials.add(StandardMaterial {
        base_color: Color::WHITE,
        unlit: true,
        ..default()
    });

    let stars = star_field.generate();

    commands.spawn_batch(stars.into_iter().map(move |star| {
        (
            PbrBundle {
                mesh: mesh.clone(),
                material: material.clone(),
                transform: Transform::from_translation(star.position)
                    .with_scale(Vec3::splat(star.size)),
                ..default()
            },
            NotShadowCaster,
            Star,
            SceneMember,
        )
    }));
}
