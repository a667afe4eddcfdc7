//! The scatter tool session.
//!
//! [`ScatterTool`] owns everything a running tool needs: settings, parameters, the
//! sample set, the session RNG and the per-frame buffers. The host feeds it
//! [`ToolEvent`]s together with a [`ViewState`] and a [`SurfaceQuery`] over its scene,
//! draws the preview through a [`DrawSink`] and places objects through an
//! [`ObjectFactory`].
//!
//! Phases follow the cursor: `Idle` without a surface hit, `Previewing` with one, and
//! `Committing` for the duration of a synchronous commit.
use rand::RngCore;
use tracing::{debug, info, warn};

use crate::commit::{commit_poses, ObjectFactory};
use crate::error::Result;
use crate::events::{
    ClampedParameter, CommitSkipReason, EventSink, RegenerateReason, ScatterEvent,
    ScatterEventKind,
};
use crate::input::{EventResponse, ToolEvent, ToolKey, ViewState};
use crate::params::{ParamUpdate, ScatterParameters, ScatterPreset, MIN_RADIUS};
use crate::preview::{render_preview, DrawSink, PreviewStats};
use crate::resolve::{FrameAnchor, ScatterFrame};
use crate::sampling::{DiscSampling, SampleSet};
use crate::settings::ScatterSettings;
use crate::surface::SurfaceQuery;
use crate::template::Template;

/// Where the tool is in its interaction cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ToolPhase {
    /// No surface under the cursor.
    #[default]
    Idle,
    /// A frame is resolved and previewed.
    Previewing,
    /// Objects are being placed.
    Committing,
}

pub struct ScatterTool<M, Mat, R: RngCore> {
    settings: ScatterSettings,
    params: ScatterParameters<M, Mat>,
    sampler: Box<dyn DiscSampling>,
    samples: SampleSet,
    frame: ScatterFrame,
    rng: R,
    phase: ToolPhase,
}

impl<M, Mat, R: RngCore> ScatterTool<M, Mat, R> {
    /// Validates `settings` and starts a session with a fresh sample set.
    pub fn try_new(
        settings: ScatterSettings,
        params: ScatterParameters<M, Mat>,
        rng: R,
    ) -> Result<Self> {
        settings.validate()?;
        Ok(Self::start(settings, params, rng))
    }

    pub fn new(settings: ScatterSettings, params: ScatterParameters<M, Mat>, rng: R) -> Self {
        debug_assert!(settings.ring_segments >= 3, "ring_segments must be >= 3");
        debug_assert!(settings.ray_offset > 0.0, "ray_offset must be > 0");
        debug_assert!(
            settings.scroll_step > 0.0 && settings.scroll_step < 1.0,
            "scroll_step must be in (0, 1)"
        );

        Self::start(settings, params, rng)
    }

    fn start(settings: ScatterSettings, params: ScatterParameters<M, Mat>, mut rng: R) -> Self {
        let sampler = settings.disc_method.sampler();
        let samples = SampleSet::generate(params.sample_count(), sampler.as_ref(), &mut rng);
        info!(
            "Scatter session started: radius {}, {} samples.",
            params.disc_radius(),
            samples.len()
        );
        Self {
            settings,
            params,
            sampler,
            samples,
            frame: ScatterFrame::new(),
            rng,
            phase: ToolPhase::Idle,
        }
    }

    pub fn settings(&self) -> &ScatterSettings {
        &self.settings
    }

    pub fn params(&self) -> &ScatterParameters<M, Mat> {
        &self.params
    }

    pub fn samples(&self) -> &SampleSet {
        &self.samples
    }

    /// The frame resolved by the last event.
    pub fn frame(&self) -> &ScatterFrame {
        &self.frame
    }

    pub fn phase(&self) -> ToolPhase {
        self.phase
    }

    /// Replaces every sample and notifies `sink`.
    pub fn regenerate(&mut self, reason: RegenerateReason, sink: &mut dyn EventSink) {
        self.samples.regenerate(
            self.params.sample_count(),
            self.sampler.as_ref(),
            &mut self.rng,
        );
        debug!(
            "Regenerated {} samples ({:?}), generation {}.",
            self.samples.len(),
            reason,
            self.samples.generation()
        );
        if sink.wants(ScatterEventKind::SamplesRegenerated) {
            sink.send(ScatterEvent::SamplesRegenerated {
                count: self.samples.len(),
                generation: self.samples.generation(),
                reason,
            });
        }
    }

    /// Sets the disc radius (clamped to at least 1) and regenerates if it changed.
    pub fn set_disc_radius(&mut self, radius: f32, sink: &mut dyn EventSink) -> ParamUpdate {
        let update = self.params.set_disc_radius(radius);
        if update.clamped {
            report_clamp(
                ClampedParameter::DiscRadius,
                radius as f64,
                self.params.disc_radius() as f64,
                sink,
            );
        }
        if update.changed {
            self.regenerate(RegenerateReason::RadiusChanged, sink);
        }
        update
    }

    /// Sets the sample count (clamped to at least 1) and regenerates if it changed.
    pub fn set_sample_count(&mut self, count: i64, sink: &mut dyn EventSink) -> ParamUpdate {
        let update = self.params.set_sample_count(count);
        if update.clamped {
            report_clamp(
                ClampedParameter::SampleCount,
                count as f64,
                self.params.sample_count() as f64,
                sink,
            );
        }
        if update.changed {
            self.regenerate(RegenerateReason::CountChanged, sink);
        }
        update
    }

    /// Replaces the template and regenerates.
    pub fn set_template(&mut self, template: Option<Template<M, Mat>>, sink: &mut dyn EventSink) {
        match &template {
            Some(t) => debug!("Scatter template set to '{}'.", t.name),
            None => debug!("Scatter template cleared."),
        }
        self.params.set_template(template);
        self.regenerate(RegenerateReason::TemplateChanged, sink);
    }

    /// Replaces the preview material override and regenerates.
    pub fn set_preview_material(&mut self, material: Option<Mat>, sink: &mut dyn EventSink) {
        self.params.set_preview_material(material);
        self.regenerate(RegenerateReason::TemplateChanged, sink);
    }

    /// Validates and replaces the settings, then regenerates.
    pub fn set_settings(
        &mut self,
        settings: ScatterSettings,
        sink: &mut dyn EventSink,
    ) -> Result<()> {
        settings.validate()?;
        self.replace_settings(settings);
        self.regenerate(RegenerateReason::SettingsChanged, sink);
        Ok(())
    }

    /// Applies a preset: settings, radius and count, with a single regeneration.
    ///
    /// Invalid preset settings leave the session untouched.
    pub fn apply_preset(
        &mut self,
        preset: &ScatterPreset,
        sink: &mut dyn EventSink,
    ) -> Result<()> {
        preset.settings.validate()?;
        self.replace_settings(preset.settings.clone());

        let radius = self.params.set_disc_radius(preset.disc_radius);
        if radius.clamped {
            report_clamp(
                ClampedParameter::DiscRadius,
                preset.disc_radius as f64,
                MIN_RADIUS as f64,
                sink,
            );
        }
        let count = self.params.set_sample_count(preset.sample_count);
        if count.clamped {
            report_clamp(
                ClampedParameter::SampleCount,
                preset.sample_count as f64,
                self.params.sample_count() as f64,
                sink,
            );
        }
        self.regenerate(RegenerateReason::PresetApplied, sink);
        Ok(())
    }

    fn replace_settings(&mut self, settings: ScatterSettings) {
        if settings.disc_method != self.settings.disc_method {
            self.sampler = settings.disc_method.sampler();
        }
        self.settings = settings;
    }

    /// Resolves the current frame for `view`.
    ///
    /// Returns the anchor on a cursor hit; on a miss the frame is cleared and the tool
    /// goes idle.
    pub fn resolve_frame<S: SurfaceQuery + ?Sized>(
        &mut self,
        surface: &S,
        view: &ViewState,
        sink: &mut dyn EventSink,
    ) -> Option<&FrameAnchor> {
        let resolved = self
            .frame
            .resolve(
                surface,
                view.cursor_ray.as_ref(),
                view.viewer_up,
                &self.samples,
                self.params.disc_radius(),
                &self.settings,
            )
            .copied();

        let Some(anchor) = resolved else {
            self.phase = ToolPhase::Idle;
            if sink.wants(ScatterEventKind::PrimaryMiss) {
                sink.send(ScatterEvent::PrimaryMiss);
            }
            return None;
        };

        self.phase = ToolPhase::Previewing;
        if anchor.degenerate {
            warn!(
                "Surface normal {} is parallel to the view up axis; using a fallback tangent.",
                anchor.hit.normal
            );
            if sink.wants(ScatterEventKind::Warning) {
                sink.send(ScatterEvent::warning(
                    "frame",
                    "surface normal parallel to view up, fallback tangent used",
                ));
            }
        }
        if sink.wants(ScatterEventKind::FrameResolved) {
            sink.send(ScatterEvent::FrameResolved {
                anchor: anchor.hit.point,
                hits: self.frame.hit_count(),
                misses: self.frame.miss_count(),
            });
        }
        self.frame.anchor()
    }

    /// Draws the preview of the last resolved frame.
    pub fn render<D: DrawSink<M, Mat> + ?Sized>(&self, draw: &mut D) -> PreviewStats {
        render_preview(
            &self.frame,
            &self.samples,
            self.params.template(),
            self.params.preview_material(),
            &self.settings,
            draw,
        )
    }

    /// Places the template at every pose of the last resolved frame.
    ///
    /// Skips (and reports why) without a template, without a cursor hit or when the
    /// frame predates the current samples. A successful commit regenerates the samples
    /// exactly once, which leaves the frame stale until the next resolve.
    pub fn commit<F: ObjectFactory<M, Mat> + ?Sized>(
        &mut self,
        factory: &mut F,
        sink: &mut dyn EventSink,
    ) -> Vec<F::Handle> {
        let skip = if self.params.template().is_none() {
            Some(CommitSkipReason::NoTemplate)
        } else if !self.frame.has_anchor() {
            Some(CommitSkipReason::NoPrimaryHit)
        } else if !self.frame.is_current_for(&self.samples) {
            Some(CommitSkipReason::StaleFrame)
        } else {
            None
        };
        let template = match (skip, self.params.template()) {
            (None, Some(template)) => template,
            (reason, _) => {
                let reason = reason.unwrap_or(CommitSkipReason::NoTemplate);
                debug!("Commit skipped: {:?}.", reason);
                if sink.wants(ScatterEventKind::CommitSkipped) {
                    sink.send(ScatterEvent::CommitSkipped { reason });
                }
                return Vec::new();
            }
        };

        self.phase = ToolPhase::Committing;
        let label = self.settings.undo_label.as_str();
        let handles = commit_poses(self.frame.poses(), template, label, factory, sink);
        info!("Placed {} x '{}' under '{}'.", handles.len(), template.name, label);
        if sink.wants(ScatterEventKind::CommitFinished) {
            sink.send(ScatterEvent::CommitFinished {
                placed: handles.len(),
                label: label.to_owned(),
            });
        }

        self.regenerate(RegenerateReason::AfterCommit, sink);
        self.phase = ToolPhase::Previewing;
        handles
    }

    /// Handles one host event.
    ///
    /// Pointer moves and redraws re-resolve the frame. Scrolling without Alt resizes
    /// the disc by one `scroll_step` per event (direction from the sign of `delta`,
    /// zero counts as positive) and consumes the event. The commit key resolves the
    /// frame for this event, commits it and resolves again with the new samples.
    pub fn handle_event<S, F>(
        &mut self,
        event: ToolEvent,
        view: &ViewState,
        surface: &S,
        factory: &mut F,
        sink: &mut dyn EventSink,
    ) -> EventResponse
    where
        S: SurfaceQuery + ?Sized,
        F: ObjectFactory<M, Mat> + ?Sized,
    {
        match event {
            ToolEvent::PointerMoved | ToolEvent::Redraw => {
                self.resolve_frame(surface, view, sink);
                EventResponse::repaint()
            }
            ToolEvent::Scroll { alt: true, .. } => EventResponse::IGNORED,
            ToolEvent::Scroll { delta, alt: false } => {
                let direction = if delta < 0.0 { -1.0 } else { 1.0 };
                let radius =
                    self.params.disc_radius() * (1.0 + direction * self.settings.scroll_step);
                self.set_disc_radius(radius, sink);
                self.resolve_frame(surface, view, sink);
                EventResponse::consumed()
            }
            ToolEvent::KeyDown(ToolKey::Commit) => {
                if self.resolve_frame(surface, view, sink).is_none() {
                    debug!("Commit key pressed without a surface under the cursor.");
                }
                let placed = self.commit(factory, sink);
                if placed.is_empty() {
                    return EventResponse::repaint();
                }
                self.resolve_frame(surface, view, sink);
                EventResponse::consumed()
            }
        }
    }
}

fn report_clamp(
    parameter: ClampedParameter,
    requested: f64,
    applied: f64,
    sink: &mut dyn EventSink,
) {
    debug!("{:?} {} clamped to {}.", parameter, requested, applied);
    if sink.wants(ScatterEventKind::ParameterClamped) {
        sink.send(ScatterEvent::ParameterClamped {
            parameter,
            requested,
            applied,
        });
    }
}
