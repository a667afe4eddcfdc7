#![forbid(unsafe_code)]
//! surface_scatter: surface-projected random scatter placement with live preview.
//!
//! Modules:
//! - sampling: unit-disc sample sets (polar and rejection samplers) with spin angles
//! - surface: ray/hit types, the `SurfaceQuery` seam and analytic surfaces
//! - frame, projector, pose: tangent frames, sample projection and surface-aligned poses
//! - resolve, preview, commit: per-frame resolution, draw-sink preview, object placement
//! - tool: the interactive session tying it together, driven by `input` events
//!
//! For examples and docs, see README and docs.rs.
pub mod commit;
pub mod error;
pub mod events;
pub mod frame;
pub mod input;
pub mod params;
pub mod pose;
pub mod preview;
pub mod projector;
pub mod resolve;
pub mod sampling;
pub mod settings;
pub mod surface;
pub mod template;
pub mod tool;

/// Convenient re-exports for common types. Import with `use surface_scatter::prelude::*;`.
pub mod prelude {
    pub use crate::commit::{commit_poses, ObjectFactory};
    pub use crate::error::{Error, Result};
    pub use crate::events::{
        AsEventSink, ClampedParameter, CommitSkipReason, EventSink, FnSink, MultiSink,
        RegenerateReason, ScatterEvent, ScatterEventKind, VecSink,
    };
    pub use crate::frame::{build_frame, build_frame_checked, TangentFrame};
    pub use crate::input::{EventResponse, ToolEvent, ToolKey, ViewState};
    pub use crate::params::{ParamUpdate, ScatterParameters, ScatterPreset};
    pub use crate::pose::{look_rotation, resolve_pose, ResolvedPose};
    pub use crate::preview::{render_preview, DrawSink, PreviewStats, PreviewStyle, Rgba};
    pub use crate::projector::{project_sample, ring_outline, tangent_ray};
    pub use crate::resolve::{FrameAnchor, Projection, ScatterFrame};
    pub use crate::sampling::{
        DiscMethod, DiscSampling, PolarDiscSampling, RejectionDiscSampling, SampleRecord,
        SampleSet,
    };
    pub use crate::settings::ScatterSettings;
    pub use crate::surface::{
        FnSurface, HeightField, Plane, Ray, Sphere, SurfaceGroup, SurfaceHit, SurfaceQuery,
    };
    pub use crate::template::{MeshPart, Template};
    pub use crate::tool::{ScatterTool, ToolPhase};
}
