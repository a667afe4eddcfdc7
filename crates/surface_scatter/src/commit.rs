//! Turning resolved poses into persistent objects.
use crate::events::{EventSink, ScatterEvent, ScatterEventKind};
use crate::pose::ResolvedPose;
use crate::template::Template;

/// Host service that creates and registers scene objects.
///
/// Calls arrive in a fixed order per pose: [`instantiate`](Self::instantiate), then
/// [`register_undo`](Self::register_undo), then [`set_pose`](Self::set_pose).
/// Failures inside the factory belong to the host.
pub trait ObjectFactory<M, Mat> {
    type Handle;

    /// Creates a copy of `template`, keeping its root scale.
    fn instantiate(&mut self, template: &Template<M, Mat>) -> Self::Handle;

    /// Records the creation of `handle` under the undo group `label`.
    fn register_undo(&mut self, handle: &Self::Handle, label: &str);

    /// Moves the root of `handle` to `pose`.
    fn set_pose(&mut self, handle: &Self::Handle, pose: &ResolvedPose);
}

impl<M, Mat, F: ObjectFactory<M, Mat> + ?Sized> ObjectFactory<M, Mat> for &mut F {
    type Handle = F::Handle;

    fn instantiate(&mut self, template: &Template<M, Mat>) -> Self::Handle {
        (**self).instantiate(template)
    }

    fn register_undo(&mut self, handle: &Self::Handle, label: &str) {
        (**self).register_undo(handle, label);
    }

    fn set_pose(&mut self, handle: &Self::Handle, pose: &ResolvedPose) {
        (**self).set_pose(handle, pose);
    }
}

/// Places one copy of `template` at every pose, in order.
///
/// Returns the created handles. Regeneration of the sample set is the caller's job.
pub fn commit_poses<'a, M, Mat, F, I>(
    poses: I,
    template: &Template<M, Mat>,
    label: &str,
    factory: &mut F,
    sink: &mut dyn EventSink,
) -> Vec<F::Handle>
where
    F: ObjectFactory<M, Mat> + ?Sized,
    I: IntoIterator<Item = &'a ResolvedPose>,
{
    let poses = poses.into_iter();
    let mut handles = Vec::with_capacity(poses.size_hint().0);
    for (index, pose) in poses.enumerate() {
        let handle = factory.instantiate(template);
        factory.register_undo(&handle, label);
        factory.set_pose(&handle, pose);
        if sink.wants(ScatterEventKind::PlacementCommitted) {
            sink.send(ScatterEvent::PlacementCommitted { index, pose: *pose });
        }
        handles.push(handle);
    }
    handles
}

#[cfg(test)]
pub(crate) mod tests {
    use glam::{Quat, Vec3};

    use super::*;
    use crate::events::VecSink;

    /// Records factory calls in order.
    #[derive(Default)]
    pub(crate) struct RecordingFactory {
        pub(crate) calls: Vec<String>,
        pub(crate) placed: Vec<(String, ResolvedPose)>,
        next: usize,
    }

    impl ObjectFactory<&'static str, &'static str> for RecordingFactory {
        type Handle = usize;

        fn instantiate(&mut self, template: &Template<&'static str, &'static str>) -> usize {
            let handle = self.next;
            self.next += 1;
            self.calls.push(format!("instantiate {handle}"));
            self.placed
                .push((template.name.clone(), ResolvedPose::new(Vec3::ZERO, Quat::IDENTITY)));
            handle
        }

        fn register_undo(&mut self, handle: &usize, label: &str) {
            self.calls.push(format!("undo {handle} {label}"));
        }

        fn set_pose(&mut self, handle: &usize, pose: &ResolvedPose) {
            self.calls.push(format!("pose {handle}"));
            self.placed[*handle].1 = *pose;
        }
    }

    #[test]
    fn places_each_pose_in_call_order() {
        let template = Template::new("rock").with_part("m", "mat", glam::Affine3A::IDENTITY);
        let poses = [
            ResolvedPose::new(Vec3::X, Quat::IDENTITY),
            ResolvedPose::new(Vec3::Z, Quat::from_rotation_y(1.0)),
        ];
        let mut factory = RecordingFactory::default();
        let mut sink = VecSink::new();

        let handles = commit_poses(&poses, &template, "Spawn Objects", &mut factory, &mut sink);

        assert_eq!(handles, vec![0, 1]);
        assert_eq!(
            factory.calls,
            vec![
                "instantiate 0",
                "undo 0 Spawn Objects",
                "pose 0",
                "instantiate 1",
                "undo 1 Spawn Objects",
                "pose 1",
            ]
        );
        assert_eq!(factory.placed[1].1, poses[1]);
        assert_eq!(factory.placed[0].0, "rock");
        assert_eq!(sink.count(ScatterEventKind::PlacementCommitted), 2);
    }

    #[test]
    fn no_poses_creates_nothing() {
        let template: Template<&'static str, &'static str> = Template::new("rock");
        let mut factory = RecordingFactory::default();
        let handles = commit_poses([], &template, "Spawn Objects", &mut factory, &mut ());
        assert!(handles.is_empty());
        assert!(factory.calls.is_empty());
    }
}
