use glam::Vec3;
use surface_scatter::error::Result;
use surface_scatter::input::ViewState;
use surface_scatter::surface::Ray;

/// View of a camera at `eye` looking at `target` with world +Y as its rough up.
///
/// The viewer up passed to the tool is the camera's own up axis, perpendicular to
/// the view direction, so a ground hit never gets a degenerate tangent frame.
pub fn look_at_view(eye: Vec3, target: Vec3) -> Result<ViewState> {
    let ray = Ray::new(eye, target - eye)?;
    let right = ray
        .direction
        .cross(Vec3::Y)
        .try_normalize()
        .unwrap_or(Vec3::X);
    let up = right.cross(ray.direction).normalize_or(Vec3::Z);
    Ok(ViewState::new(Some(ray), up))
}
