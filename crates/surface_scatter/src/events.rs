//! Event types and sinks for observing a scatter session.
//!
//! [`crate::tool::ScatterTool`] reports regenerations, frame resolution, clamps and
//! commits as [`ScatterEvent`]s. Pass `&mut ()` to ignore them, a [`VecSink`] to
//! collect them, or any other [`EventSink`]. Sinks can skip building events they do
//! not care about by overriding [`EventSink::wants`].
use glam::Vec3;

use crate::pose::ResolvedPose;

/// Why the sample set was regenerated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegenerateReason {
    RadiusChanged,
    CountChanged,
    TemplateChanged,
    SettingsChanged,
    PresetApplied,
    AfterCommit,
}

/// Which parameter a setter clamped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClampedParameter {
    DiscRadius,
    SampleCount,
}

/// Why a commit produced nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommitSkipReason {
    NoTemplate,
    NoPrimaryHit,
    /// The frame was resolved from an older sample layout.
    StaleFrame,
}

/// Describes events emitted by a scatter session.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub enum ScatterEvent {
    /// The sample set was replaced.
    SamplesRegenerated {
        count: usize,
        generation: u64,
        reason: RegenerateReason,
    },

    /// A frame was resolved around a cursor hit.
    FrameResolved {
        anchor: Vec3,
        hits: usize,
        misses: usize,
    },

    /// The cursor ray hit nothing; the frame was cleared.
    PrimaryMiss,

    /// A setter received a value below its minimum.
    ParameterClamped {
        parameter: ClampedParameter,
        requested: f64,
        applied: f64,
    },

    /// One object was placed.
    PlacementCommitted { index: usize, pose: ResolvedPose },

    /// A commit finished.
    CommitFinished { placed: usize, label: String },

    /// A commit was requested but did nothing.
    CommitSkipped { reason: CommitSkipReason },

    /// Non-fatal warning.
    Warning {
        /// Context string (e.g. the operation).
        context: String,
        /// Human-readable message.
        message: String,
    },
}

/// Discriminant of [`ScatterEvent`], used for filtering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScatterEventKind {
    SamplesRegenerated,
    FrameResolved,
    PrimaryMiss,
    ParameterClamped,
    PlacementCommitted,
    CommitFinished,
    CommitSkipped,
    Warning,
}

impl ScatterEvent {
    pub fn kind(&self) -> ScatterEventKind {
        match self {
            ScatterEvent::SamplesRegenerated { .. } => ScatterEventKind::SamplesRegenerated,
            ScatterEvent::FrameResolved { .. } => ScatterEventKind::FrameResolved,
            ScatterEvent::PrimaryMiss => ScatterEventKind::PrimaryMiss,
            ScatterEvent::ParameterClamped { .. } => ScatterEventKind::ParameterClamped,
            ScatterEvent::PlacementCommitted { .. } => ScatterEventKind::PlacementCommitted,
            ScatterEvent::CommitFinished { .. } => ScatterEventKind::CommitFinished,
            ScatterEvent::CommitSkipped { .. } => ScatterEventKind::CommitSkipped,
            ScatterEvent::Warning { .. } => ScatterEventKind::Warning,
        }
    }

    pub(crate) fn warning(context: impl Into<String>, message: impl Into<String>) -> Self {
        ScatterEvent::Warning {
            context: context.into(),
            message: message.into(),
        }
    }
}

/// A generic event sink that accepts [`ScatterEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: ScatterEvent);

    /// Whether events of `kind` should be built and sent at all.
    #[inline]
    fn wants(&self, _kind: ScatterEventKind) -> bool {
        true
    }

    fn send_many<I>(&mut self, events: I)
    where
        Self: Sized,
        I: IntoIterator<Item = ScatterEvent>,
    {
        for e in events {
            self.send(e);
        }
    }
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: ScatterEvent) {}

    #[inline]
    fn wants(&self, _kind: ScatterEventKind) -> bool {
        false
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    #[inline]
    fn send(&mut self, event: ScatterEvent) {
        (**self).send(event);
    }

    #[inline]
    fn wants(&self, kind: ScatterEventKind) -> bool {
        (**self).wants(kind)
    }
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(ScatterEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(ScatterEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(ScatterEvent),
{
    #[inline]
    fn send(&mut self, event: ScatterEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects events in a `Vec`, optionally filtered by kind.
#[derive(Default)]
pub struct VecSink {
    events: Vec<ScatterEvent>,
    only: Option<Vec<ScatterEventKind>>,
}

impl VecSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            events: Vec::with_capacity(cap),
            only: None,
        }
    }

    /// Collects only events of the given kinds.
    pub fn only(kinds: impl IntoIterator<Item = ScatterEventKind>) -> Self {
        Self {
            events: Vec::new(),
            only: Some(kinds.into_iter().collect()),
        }
    }

    pub fn into_inner(self) -> Vec<ScatterEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[ScatterEvent] {
        &self.events
    }

    pub fn count(&self, kind: ScatterEventKind) -> usize {
        self.events.iter().filter(|e| e.kind() == kind).count()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: ScatterEvent) {
        if self.wants(event.kind()) {
            self.events.push(event);
        }
    }

    fn wants(&self, kind: ScatterEventKind) -> bool {
        self.only.as_ref().is_none_or(|kinds| kinds.contains(&kind))
    }
}

/// Fan-out sink that forwards each event to all contained sinks.
pub struct MultiSink<S: EventSink> {
    pub(crate) sinks: Vec<S>,
}

impl<S: EventSink> MultiSink<S> {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn with_sinks(sinks: Vec<S>) -> Self {
        Self { sinks }
    }

    pub fn push(&mut self, sink: S) {
        self.sinks.push(sink);
    }

    pub fn sinks(&self) -> &[S] {
        &self.sinks
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }
}

impl<S: EventSink> Default for MultiSink<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: EventSink> EventSink for MultiSink<S> {
    fn send(&mut self, event: ScatterEvent) {
        let kind = event.kind();
        let mut targets: Vec<&mut S> = self.sinks.iter_mut().filter(|s| s.wants(kind)).collect();
        let Some(last) = targets.pop() else {
            return;
        };
        for sink in targets {
            sink.send(event.clone());
        }
        last.send(event);
    }

    fn wants(&self, kind: ScatterEventKind) -> bool {
        self.sinks.iter().any(|s| s.wants(kind))
    }
}

/// Minimal adapter trait for types that can expose an [`EventSink`].
pub trait AsEventSink {
    fn as_event_sink(&mut self) -> &mut dyn EventSink;
}

impl AsEventSink for VecSink {
    fn as_event_sink(&mut self) -> &mut dyn EventSink {
        self
    }
}
