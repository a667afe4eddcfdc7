//! Preview drawing: gizmos for markers and outlines, pooled ghost entities for meshes.
use bevy::prelude::*;
use glam::Affine3A;
use surface_scatter::preview::{DrawSink, Rgba};

/// Entity showing one preview mesh. Ghosts are reused frame to frame; surplus ones
/// are despawned.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct ScatterGhost;

/// One mesh the preview asked for this frame.
#[derive(Debug, Clone)]
pub struct GhostInstance {
    pub mesh: Handle<Mesh>,
    pub material: Handle<StandardMaterial>,
    pub transform: Transform,
}

/// [`DrawSink`] that draws through [`Gizmos`] and collects mesh requests.
pub struct GizmoDraw<'a, 'w, 's> {
    gizmos: &'a mut Gizmos<'w, 's>,
    ghosts: Vec<GhostInstance>,
}

impl<'a, 'w, 's> GizmoDraw<'a, 'w, 's> {
    pub fn new(gizmos: &'a mut Gizmos<'w, 's>) -> Self {
        Self {
            gizmos,
            ghosts: Vec::new(),
        }
    }

    pub fn into_ghosts(self) -> Vec<GhostInstance> {
        self.ghosts
    }
}

pub(crate) fn to_color(c: Rgba) -> Color {
    Color::linear_rgba(c.r, c.g, c.b, c.a)
}

pub(crate) fn to_transform(affine: Affine3A) -> Transform {
    Transform::from_matrix(Mat4::from(affine))
}

impl DrawSink<Handle<Mesh>, Handle<StandardMaterial>> for GizmoDraw<'_, '_, '_> {
    fn line(&mut self, start: Vec3, end: Vec3, color: Rgba) {
        self.gizmos.line(start, end, to_color(color));
    }

    fn polyline(&mut self, points: &[Vec3], color: Rgba) {
        self.gizmos.linestrip(points.iter().copied(), to_color(color));
    }

    fn sphere(&mut self, center: Vec3, radius: f32, color: Rgba) {
        self.gizmos
            .sphere(Isometry3d::from_translation(center), radius, to_color(color));
    }

    fn mesh(
        &mut self,
        mesh: &Handle<Mesh>,
        material: &Handle<StandardMaterial>,
        transform: Affine3A,
    ) {
        self.ghosts.push(GhostInstance {
            mesh: mesh.clone(),
            material: material.clone(),
            transform: to_transform(transform),
        });
    }
}

/// Shows `instances` on the ghost pool, spawning ghosts as needed and despawning the rest.
pub(crate) fn sync_ghosts(
    commands: &mut Commands,
    ghosts: &mut Query<
        (
            Entity,
            &mut Mesh3d,
            &mut MeshMaterial3d<StandardMaterial>,
            &mut Transform,
            &mut Visibility,
        ),
        With<ScatterGhost>,
    >,
    instances: Vec<GhostInstance>,
) {
    let mut instances = instances.into_iter();
    for (entity, mut mesh, mut material, mut transform, mut visibility) in ghosts.iter_mut() {
        match instances.next() {
            Some(instance) => {
                if mesh.0 != instance.mesh {
                    mesh.0 = instance.mesh;
                }
                if material.0 != instance.material {
                    material.0 = instance.material;
                }
                *transform = instance.transform;
                *visibility = Visibility::Visible;
            }
            None => commands.entity(entity).despawn(),
        }
    }
    for instance in instances {
        commands.spawn((
            Name::new("Scatter Ghost"),
            ScatterGhost,
            Mesh3d(instance.mesh),
            MeshMaterial3d(instance.material),
            instance.transform,
            Visibility::Visible,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn affine_converts_to_transform() {
        let affine = Affine3A::from_scale_rotation_translation(
            Vec3::new(2.0, 1.0, 1.0),
            Quat::from_rotation_y(0.5),
            Vec3::new(1.0, 2.0, 3.0),
        );
        let transform = to_transform(affine);
        assert!((transform.translation - Vec3::new(1.0, 2.0, 3.0)).length() < 1e-5);
        assert!((transform.scale - Vec3::new(2.0, 1.0, 1.0)).length() < 1e-4);
        assert!(transform.rotation.abs_diff_eq(Quat::from_rotation_y(0.5), 1e-4));
    }

    #[derive(Resource)]
    struct Wanted(usize);

    fn show_wanted(
        mut commands: Commands,
        wanted: Res<Wanted>,
        mut ghosts: Query<
            (
                Entity,
                &mut Mesh3d,
                &mut MeshMaterial3d<StandardMaterial>,
                &mut Transform,
                &mut Visibility,
            ),
            With<ScatterGhost>,
        >,
    ) {
        let instances = (0..wanted.0)
            .map(|i| GhostInstance {
                mesh: Handle::default(),
                material: Handle::default(),
                transform: Transform::from_xyz(i as f32, 0.0, 0.0),
            })
            .collect();
        sync_ghosts(&mut commands, &mut ghosts, instances);
    }

    fn ghost_count(app: &mut App) -> usize {
        app.world_mut()
            .query_filtered::<Entity, With<ScatterGhost>>()
            .iter(app.world())
            .count()
    }

    #[test]
    fn ghost_pool_follows_instance_count() {
        let mut app = App::new();
        app.insert_resource(Wanted(5))
            .add_systems(Update, show_wanted);

        app.update();
        assert_eq!(ghost_count(&mut app), 5);

        app.world_mut().resource_mut::<Wanted>().0 = 2;
        app.update();
        assert_eq!(ghost_count(&mut app), 2);

        app.world_mut().resource_mut::<Wanted>().0 = 3;
        app.update();
        assert_eq!(ghost_count(&mut app), 3);
    }

    #[test]
    fn color_keeps_components() {
        let color = to_color(Rgba::new(0.1, 0.2, 0.3, 0.4)).to_linear();
        assert_eq!(color.red, 0.1);
        assert_eq!(color.alpha, 0.4);
    }
}
