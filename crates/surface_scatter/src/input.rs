//! Host-independent input events for [`crate::tool::ScatterTool::handle_event`].
use glam::Vec3;

use crate::surface::Ray;

/// Keys the tool reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ToolKey {
    /// Place objects at the current preview poses.
    Commit,
}

/// An interactive event forwarded by the host.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ToolEvent {
    PointerMoved,
    /// Mouse wheel. `alt` set means the host's own camera zoom should get it.
    Scroll {
        delta: f32,
        alt: bool,
    },
    KeyDown(ToolKey),
    Redraw,
}

/// Snapshot of the view an event happened in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewState {
    /// Ray from the camera through the cursor, if the cursor is over the viewport.
    pub cursor_ray: Option<Ray>,
    /// Camera up axis in world space.
    pub viewer_up: Vec3,
}

impl ViewState {
    pub fn new(cursor_ray: Option<Ray>, viewer_up: Vec3) -> Self {
        Self {
            cursor_ray,
            viewer_up,
        }
    }

    /// A view with the cursor outside the viewport.
    pub fn without_cursor(viewer_up: Vec3) -> Self {
        Self::new(None, viewer_up)
    }
}

/// What the host should do after an event was handled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EventResponse {
    /// The preview changed and the view should be redrawn.
    pub repaint: bool,
    /// The tool used the event; the host must not forward it further.
    pub consumed: bool,
}

impl EventResponse {
    pub const IGNORED: Self = Self {
        repaint: false,
        consumed: false,
    };

    pub fn repaint() -> Self {
        Self {
            repaint: true,
            consumed: false,
        }
    }

    pub fn consumed() -> Self {
        Self {
            repaint: true,
            consumed: true,
        }
    }
}
