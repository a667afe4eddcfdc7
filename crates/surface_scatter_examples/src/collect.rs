use surface_scatter::commit::ObjectFactory;
use surface_scatter::events::ScatterEvent;
use surface_scatter::pose::ResolvedPose;
use surface_scatter::template::Template;
use tracing::{debug, info, warn};

/// One object "placed" by [`PoseCollector`].
#[derive(Clone, Debug)]
pub struct CollectedObject {
    pub template: String,
    pub pose: Option<ResolvedPose>,
    pub undo_label: Option<String>,
}

/// Headless [`ObjectFactory`] that only records what would have been spawned.
#[derive(Default, Debug)]
pub struct PoseCollector {
    pub objects: Vec<CollectedObject>,
}

impl PoseCollector {
    pub fn poses(&self) -> impl Iterator<Item = &ResolvedPose> {
        self.objects.iter().filter_map(|o| o.pose.as_ref())
    }
}

impl<M, Mat> ObjectFactory<M, Mat> for PoseCollector {
    type Handle = usize;

    fn instantiate(&mut self, template: &Template<M, Mat>) -> usize {
        self.objects.push(CollectedObject {
            template: template.name.clone(),
            pose: None,
            undo_label: None,
        });
        self.objects.len() - 1
    }

    fn register_undo(&mut self, handle: &usize, label: &str) {
        if let Some(object) = self.objects.get_mut(*handle) {
            object.undo_label = Some(label.to_owned());
        }
    }

    fn set_pose(&mut self, handle: &usize, pose: &ResolvedPose) {
        if let Some(object) = self.objects.get_mut(*handle) {
            object.pose = Some(*pose);
        }
    }
}

/// Logs a tool event at a level matching its importance.
pub fn log_event(event: ScatterEvent) {
    match event {
        ScatterEvent::SamplesRegenerated {
            count,
            generation,
            reason,
        } => info!("Samples regenerated ({reason:?}): {count} samples, generation {generation}"),
        ScatterEvent::FrameResolved {
            anchor,
            hits,
            misses,
        } => debug!("Frame at {anchor}: {hits} hit(s), {misses} miss(es)"),
        ScatterEvent::PrimaryMiss => debug!("Cursor ray missed every surface"),
        ScatterEvent::ParameterClamped {
            parameter,
            requested,
            applied,
        } => info!("{parameter:?} clamped: {requested} -> {applied}"),
        ScatterEvent::PlacementCommitted { index, pose } => {
            debug!("Placed #{index} at {}", pose.position)
        }
        ScatterEvent::CommitFinished { placed, label } => info!("'{label}': {placed} object(s)"),
        ScatterEvent::CommitSkipped { reason } => warn!("Commit skipped: {reason:?}"),
        ScatterEvent::Warning { context, message } => warn!("{context}: {message}"),
        other => debug!("{other:?}"),
    }
}
