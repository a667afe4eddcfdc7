#![forbid(unsafe_code)]

mod camera;
mod collect;
mod rendering;

pub use camera::look_at_view;
pub use collect::{log_event, CollectedObject, PoseCollector};
pub use rendering::{init_tracing, Canvas, RenderConfig};
