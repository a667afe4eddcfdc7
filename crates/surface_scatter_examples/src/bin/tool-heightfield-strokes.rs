use glam::{Affine3A, Vec2, Vec3};
use rand::rngs::StdRng;
use rand::SeedableRng;
use surface_scatter::prelude::*;
use surface_scatter_examples::{
    init_tracing, log_event, look_at_view, Canvas, PoseCollector, RenderConfig,
};

fn main() -> anyhow::Result<()> {
    init_tracing();

    // Rolling hills, 40 x 40 world units.
    let terrain = HeightField::from_fn(0.5, 81, 81, |x, z| {
        1.5 * (x * 0.25).sin() * (z * 0.2).cos() + 0.3 * (x * 0.9 + z * 0.7).sin()
    })?;
    let (low, high) = terrain.height_range();

    let template = Template::new("rock").with_part("rock", "stone", Affine3A::IDENTITY);
    let mut params = ScatterParameters::with_disc(2.5, 12);
    params.set_template(Some(template));
    let settings = ScatterSettings::default().with_undo_label("Paint Rocks");

    let mut tool = ScatterTool::try_new(settings, params, StdRng::seed_from_u64(2025))?;
    let mut sink = FnSink::new(log_event);
    let mut factory = PoseCollector::default();

    // A stroke across the terrain: commit at each stop.
    let stops = 9;
    for i in 0..stops {
        let t = i as f32 / (stops - 1) as f32;
        let target = Vec3::new(-15.0 + 30.0 * t, 0.0, 8.0 * (t * std::f32::consts::TAU).sin());
        let eye = target + Vec3::new(0.0, 25.0, 4.0);
        let view = look_at_view(eye, target)?;
        tool.handle_event(
            ToolEvent::KeyDown(ToolKey::Commit),
            &view,
            &terrain,
            &mut factory,
            &mut sink,
        );
    }
    tracing::info!("{} rocks placed over {} commits", factory.objects.len(), stops);

    let mut canvas = Canvas::new(RenderConfig::new((1000, 1000), Vec2::splat(40.0)));
    canvas.shade(|p| {
        let h = terrain.height_at(p.x, p.y).unwrap_or(low);
        let t = ((h - low) / (high - low).max(f32::EPSILON)).clamp(0.0, 1.0);
        let v = (40.0 + 120.0 * t) as u8;
        [v / 2, v, v / 2]
    });
    for pose in factory.poses() {
        canvas.draw_pose(pose, 0.5, [230, 230, 230]);
    }
    tool.render(&mut canvas);
    canvas.save("tool-heightfield-strokes.png")?;

    Ok(())
}
