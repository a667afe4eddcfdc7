use avian3d::prelude::*;
use bevy::prelude::*;
use bevy_surface_scatter::prelude::*;
use glam::Affine3A;

/// Edit `assets/meadow.scatter_preset` while this runs; the session picks up changes.
fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(AssetPlugin {
            watch_for_changes_override: Some(true),
            ..default()
        }))
        .add_plugins(PhysicsPlugins::default())
        .add_plugins(SurfaceScatterPlugin)
        .insert_resource(ScatterEventFilter::all())
        .add_systems(Startup, setup)
        .add_systems(Update, log_regenerations)
        .run();
}

fn setup(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut library: ResMut<ScatterTemplateLibrary>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(30.0, 30.0))),
        MeshMaterial3d(materials.add(Color::srgb(0.35, 0.5, 0.3))),
        RigidBody::Static,
        Collider::half_space(Vec3::Y),
    ));
    commands.spawn((
        PointLight {
            intensity: 2_000_000.0,
            range: 60.0,
            ..default()
        },
        Transform::from_xyz(0.0, 12.0, 0.0),
    ));
    commands.spawn((
        Camera3d::default(),
        ScatterCamera,
        Transform::from_xyz(0.0, 14.0, 12.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    library.push(ScatterTemplate::new("flower").with_part(
        meshes.add(Sphere::new(0.15)),
        materials.add(Color::srgb(0.9, 0.8, 0.2)),
        Affine3A::from_translation(Vec3::Y * 0.15),
    ));

    commands.insert_resource(ActiveScatterPreset(asset_server.load("meadow.scatter_preset")));
    commands.insert_resource(ScatterSession::with_disc(2.0, 8, Some(42)));
}

fn log_regenerations(mut reader: MessageReader<ScatterMessage>) {
    for msg in reader.read() {
        if let ScatterEvent::SamplesRegenerated { count, reason, .. } = &msg.event {
            info!("{count} samples ({reason:?})");
        }
    }
}
