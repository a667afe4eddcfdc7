use avian3d::prelude::*;
use bevy::prelude::*;
use bevy_surface_scatter::prelude::*;
use glam::Affine3A;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins)
        .add_plugins(PhysicsPlugins::default())
        .add_plugins(SurfaceScatterPlugin)
        .add_systems(Startup, (setup_scene, setup_templates))
        .add_systems(Update, log_scatter_messages)
        .run();
}

/// Ground, a mound to scatter over, a light and the scatter camera.
fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn((
        Name::new("Ground"),
        Mesh3d(meshes.add(Cuboid::new(40.0, 0.2, 40.0))),
        MeshMaterial3d(materials.add(Color::srgb(0.3, 0.45, 0.25))),
        Transform::from_xyz(0.0, -0.1, 0.0),
        RigidBody::Static,
        Collider::cuboid(40.0, 0.2, 40.0),
    ));
    commands.spawn((
        Name::new("Mound"),
        Mesh3d(meshes.add(Sphere::new(4.0))),
        MeshMaterial3d(materials.add(Color::srgb(0.45, 0.4, 0.3))),
        Transform::from_xyz(6.0, -1.5, -4.0),
        RigidBody::Static,
        Collider::sphere(4.0),
    ));
    commands.spawn((
        DirectionalLight {
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(8.0, 16.0, 8.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
    commands.spawn((
        Camera3d::default(),
        ScatterCamera,
        Transform::from_xyz(0.0, 18.0, 18.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    // Scroll to resize, Space to place, Tab to switch template, Ctrl+Z to undo.
    commands.insert_resource(ScatterSession::with_disc(2.0, 8, None));
}

fn setup_templates(
    mut library: ResMut<ScatterTemplateLibrary>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let trunk = materials.add(Color::srgb(0.4, 0.25, 0.1));
    let leaves = materials.add(Color::srgb(0.1, 0.5, 0.15));
    let stone = materials.add(Color::srgb(0.55, 0.55, 0.6));

    library.push(
        ScatterTemplate::new("tree")
            .with_part(
                meshes.add(Cylinder::new(0.1, 1.0)),
                trunk,
                Affine3A::from_translation(Vec3::Y * 0.5),
            )
            .with_part(
                meshes.add(Cone::new(0.5, 1.2)),
                leaves,
                Affine3A::from_translation(Vec3::Y * 1.4),
            ),
    );
    library.push(
        ScatterTemplate::new("rock")
            .with_root_scale(Vec3::new(1.0, 0.6, 0.8))
            .with_part(
                meshes.add(Sphere::new(0.3)),
                stone,
                Affine3A::from_translation(Vec3::Y * 0.1),
            ),
    );
}

fn log_scatter_messages(mut reader: MessageReader<ScatterMessage>) {
    for msg in reader.read() {
        match &msg.event {
            ScatterEvent::CommitFinished { placed, label } => {
                info!("{label}: placed {placed} object(s)");
            }
            ScatterEvent::CommitSkipped { reason } => {
                info!("Nothing placed: {reason:?}");
            }
            ScatterEvent::ParameterClamped {
                parameter, applied, ..
            } => {
                info!("{parameter:?} held at {applied}");
            }
            ScatterEvent::Warning { context, message } => {
                warn!("{context}: {message}");
            }
            _ => {}
        }
    }
}
