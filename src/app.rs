//! Bevy host: keyboard in, one locomotion step per frame, mesh out.

use crate::config::{Config, Palette};
use crate::input::{Controls, InputFrame};
use crate::locomotion::{AnimationState, Locomotion};
use crate::probe::Colliders;
use crate::scene::{Figure, FrameMesh};
use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use bevy::sprite::MaterialMesh2dBundle;

const KEYMAP: [(KeyCode, Controls); 5] = [
    (KeyCode::A, Controls::LEFT),
    (KeyCode::D, Controls::RIGHT),
    (KeyCode::W, Controls::JUMP_UP),
    (KeyCode::S, Controls::JUMP_FORWARD),
    (KeyCode::Z, Controls::FALL),
];

pub struct LampPlugin {
    config: Config,
}

impl LampPlugin {
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

impl Plugin for LampPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(Color::rgb(0.1, 0.1, 0.12)))
            .insert_resource(Lamp::new(&self.config))
            .add_startup_system(setup)
            .add_system(step_lamp);
    }
}

/// Everything the simulation owns between frames.
pub struct Lamp {
    figure: Figure,
    state: AnimationState,
    locomotion: Locomotion,
    colliders: Colliders,
    palette: Palette,
    pixels_per_unit: f32,
    scratch: FrameMesh,
}

impl Lamp {
    pub fn new(config: &Config) -> Self {
        Self {
            figure: Figure::new(),
            state: AnimationState::default(),
            locomotion: Locomotion::new(config.locomotion.clone()),
            colliders: config.probe(),
            palette: config.palette.clone(),
            pixels_per_unit: config.pixels_per_unit,
            scratch: FrameMesh::default(),
        }
    }
}

struct FigureMesh(Handle<Mesh>);

fn setup(
    mut commands: Commands,
    mut lamp: ResMut<Lamp>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    let lamp = &mut *lamp;
    let scale = lamp.pixels_per_unit;

    commands.spawn_bundle(Camera2dBundle::default());

    lamp.figure.write_mesh(&lamp.palette, &mut lamp.scratch);
    let mut mesh = Mesh::new(PrimitiveTopology::TriangleList);
    upload(&mut mesh, &lamp.scratch);
    let handle = meshes.add(mesh);

    commands.spawn_bundle(MaterialMesh2dBundle {
        mesh: handle.clone().into(),
        material: materials.add(ColorMaterial::from(Color::WHITE)),
        transform: Transform::from_scale(Vec3::splat(scale)),
        ..default()
    });
    commands.insert_resource(FigureMesh(handle));

    for collider in &lamp.colliders.boxes {
        commands.spawn_bundle(SpriteBundle {
            sprite: Sprite {
                color: Color::rgb(0.35, 0.35, 0.4),
                custom_size: Some(collider.half_extents * 2.0 * scale),
                ..default()
            },
            transform: Transform::from_translation((collider.center * scale).extend(-1.0)),
            ..default()
        });
    }

    tracing::info!(
        "spawned figure ({} vertices) and {} colliders",
        lamp.figure.vertex_count(),
        lamp.colliders.boxes.len()
    );
}

fn step_lamp(
    time: Res<Time>,
    keys: Res<Input<KeyCode>>,
    handle: Res<FigureMesh>,
    mut lamp: ResMut<Lamp>,
    mut meshes: ResMut<Assets<Mesh>>,
) {
    let lamp = &mut *lamp;
    let input = read_input(&keys);

    lamp.locomotion.step(
        &mut lamp.figure,
        &mut lamp.state,
        &input,
        &lamp.colliders,
        time.delta_seconds(),
    );

    lamp.figure.write_mesh(&lamp.palette, &mut lamp.scratch);
    if let Some(mesh) = meshes.get_mut(&handle.0) {
        upload(mesh, &lamp.scratch);
    }
}

fn read_input(keys: &Input<KeyCode>) -> InputFrame {
    let mut input = InputFrame::default();
    for (key, control) in KEYMAP {
        input.held.set(control, keys.pressed(key));
        input.pressed.set(control, keys.just_pressed(key));
    }
    input
}

fn upload(mesh: &mut Mesh, frame: &FrameMesh) {
    let count = frame.positions.len();
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, frame.positions.clone());
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, vec![[0.0, 0.0, 1.0]; count]);
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, vec![[0.0, 0.0]; count]);
    mesh.insert_attribute(Mesh::ATTRIBUTE_COLOR, frame.colors.clone());
    mesh.set_indices(Some(Indices::U32(frame.indices.clone())));
}
