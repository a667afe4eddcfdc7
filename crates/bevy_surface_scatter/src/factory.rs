use bevy::prelude::*;
use surface_scatter::commit::ObjectFactory;
use surface_scatter::pose::ResolvedPose;
use surface_scatter::template::Template;

use crate::draw::to_transform;
use crate::history::{ScatterUndoHistory, UndoGroup};

/// Component on every root entity the tool placed.
#[derive(Component, Debug, Clone)]
pub struct ScatterPlaced {
    /// Name of the template the entity was copied from.
    pub template: String,
}

/// [`ObjectFactory`] spawning entity hierarchies through [`Commands`].
///
/// Entities registered during one commit form one undo group; call
/// [`EntityFactory::finish`] once the commit is done to record it.
pub struct EntityFactory<'a, 'w, 's> {
    commands: &'a mut Commands<'w, 's>,
    history: &'a mut ScatterUndoHistory,
    group: Option<UndoGroup>,
    root_scale: Vec3,
}

impl<'a, 'w, 's> EntityFactory<'a, 'w, 's> {
    pub fn new(commands: &'a mut Commands<'w, 's>, history: &'a mut ScatterUndoHistory) -> Self {
        Self {
            commands,
            history,
            group: None,
            root_scale: Vec3::ONE,
        }
    }

    /// Records the open undo group, if any.
    pub fn finish(self) {
        if let Some(group) = self.group {
            self.history.push(group);
        }
    }
}

impl ObjectFactory<Handle<Mesh>, Handle<StandardMaterial>> for EntityFactory<'_, '_, '_> {
    type Handle = Entity;

    fn instantiate(
        &mut self,
        template: &Template<Handle<Mesh>, Handle<StandardMaterial>>,
    ) -> Entity {
        self.root_scale = template.root_scale;
        self.commands
            .spawn((
                Name::new(template.name.clone()),
                ScatterPlaced {
                    template: template.name.clone(),
                },
                Transform::from_scale(template.root_scale),
                Visibility::default(),
            ))
            .with_children(|parent| {
                for part in &template.parts {
                    parent.spawn((
                        Mesh3d(part.mesh.clone()),
                        MeshMaterial3d(part.material.clone()),
                        to_transform(part.local),
                    ));
                }
            })
            .id()
    }

    fn register_undo(&mut self, handle: &Entity, label: &str) {
        if let Some(group) = self.group.as_mut().filter(|g| g.label == label) {
            group.entities.push(*handle);
            return;
        }
        if let Some(previous) = self.group.take() {
            self.history.push(previous);
        }
        self.group = Some(UndoGroup {
            label: label.to_owned(),
            entities: vec![*handle],
        });
    }

    fn set_pose(&mut self, handle: &Entity, pose: &ResolvedPose) {
        self.commands.entity(*handle).insert(Transform {
            translation: pose.position,
            rotation: pose.rotation,
            scale: self.root_scale,
        });
    }
}

#[cfg(test)]
mod tests {
    use glam::Affine3A;
    use surface_scatter::events::VecSink;
    use surface_scatter::prelude::commit_poses;

    use super::*;

    #[test]
    fn commit_spawns_posed_hierarchies_in_one_undo_group() {
        let mut world = World::new();
        let mut history = ScatterUndoHistory::default();
        let template = Template::new("tree")
            .with_root_scale(Vec3::splat(2.0))
            .with_part(
                Handle::<Mesh>::default(),
                Handle::<StandardMaterial>::default(),
                Affine3A::IDENTITY,
            )
            .with_part(
                Handle::<Mesh>::default(),
                Handle::<StandardMaterial>::default(),
                Affine3A::from_translation(Vec3::Y),
            );
        let poses = [
            ResolvedPose::new(Vec3::new(1.0, 0.0, 0.0), Quat::IDENTITY),
            ResolvedPose::new(Vec3::new(0.0, 0.0, 1.0), Quat::from_rotation_y(1.0)),
        ];

        let entities = {
            let mut commands = world.commands();
            let mut factory = EntityFactory::new(&mut commands, &mut history);
            let entities = commit_poses(
                &poses,
                &template,
                "Spawn Objects",
                &mut factory,
                &mut VecSink::new(),
            );
            factory.finish();
            entities
        };
        world.flush();

        assert_eq!(entities.len(), 2);
        assert_eq!(history.len(), 1);
        assert_eq!(history.undo_label(), Some("Spawn Objects"));
        for (entity, pose) in entities.iter().zip(&poses) {
            let transform = world.get::<Transform>(*entity).expect("root transform");
            assert_eq!(transform.translation, pose.position);
            assert_eq!(transform.rotation, pose.rotation);
            assert_eq!(transform.scale, Vec3::splat(2.0));
            let children = world.get::<Children>(*entity).expect("children");
            assert_eq!(children.len(), 2);
            assert_eq!(
                world.get::<ScatterPlaced>(*entity).map(|p| p.template.as_str()),
                Some("tree")
            );
        }
    }
}
