use std::collections::HashSet;

use bevy::prelude::*;
use surface_scatter::events::{EventSink, ScatterEvent, ScatterEventKind};

/// Bevy message wrapping a core [`ScatterEvent`].
#[derive(Message, Debug, Clone)]
pub struct ScatterMessage {
    pub event: ScatterEvent,
}

/// Which event kinds are forwarded as [`ScatterMessage`]s.
///
/// Defaults to everything except the per-frame `FrameResolved` and `PrimaryMiss` reports.
#[derive(Resource, Debug, Clone)]
pub struct ScatterEventFilter {
    kinds: Option<HashSet<ScatterEventKind>>,
}

impl Default for ScatterEventFilter {
    fn default() -> Self {
        Self::only([
            ScatterEventKind::SamplesRegenerated,
            ScatterEventKind::ParameterClamped,
            ScatterEventKind::PlacementCommitted,
            ScatterEventKind::CommitFinished,
            ScatterEventKind::CommitSkipped,
            ScatterEventKind::Warning,
        ])
    }
}

impl ScatterEventFilter {
    /// Forwards every kind.
    pub fn all() -> Self {
        Self { kinds: None }
    }

    pub fn only(kinds: impl IntoIterator<Item = ScatterEventKind>) -> Self {
        Self {
            kinds: Some(kinds.into_iter().collect()),
        }
    }

    pub fn allows(&self, kind: ScatterEventKind) -> bool {
        self.kinds.as_ref().is_none_or(|k| k.contains(&kind))
    }
}

/// Event sink writing [`ScatterMessage`]s.
pub struct MessageSink<'a, 'w> {
    pub writer: &'a mut MessageWriter<'w, ScatterMessage>,
    pub filter: &'a ScatterEventFilter,
}

impl EventSink for MessageSink<'_, '_> {
    #[inline]
    fn send(&mut self, event: ScatterEvent) {
        self.writer.write(ScatterMessage { event });
    }

    #[inline]
    fn wants(&self, kind: ScatterEventKind) -> bool {
        self.filter.allows(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_skips_per_frame_reports() {
        let filter = ScatterEventFilter::default();
        assert!(!filter.allows(ScatterEventKind::FrameResolved));
        assert!(!filter.allows(ScatterEventKind::PrimaryMiss));
        assert!(filter.allows(ScatterEventKind::CommitFinished));
        assert!(ScatterEventFilter::all().allows(ScatterEventKind::FrameResolved));
    }
}
