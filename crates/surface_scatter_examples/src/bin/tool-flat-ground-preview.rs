use glam::{Affine3A, Vec2, Vec3};
use rand::rngs::StdRng;
use rand::SeedableRng;
use surface_scatter::prelude::*;
use surface_scatter_examples::{
    init_tracing, log_event, look_at_view, Canvas, PoseCollector, RenderConfig,
};

fn main() -> anyhow::Result<()> {
    init_tracing();

    // One "mesh" per part; the headless renderer only needs names.
    let template = Template::new("fern")
        .with_part("stem", "green", Affine3A::IDENTITY)
        .with_part("frond", "green", Affine3A::from_translation(Vec3::Y * 0.5));
    let mut params = ScatterParameters::with_disc(3.0, 24);
    params.set_template(Some(template));

    let settings = ScatterSettings::default();
    let mut tool = ScatterTool::try_new(settings, params, StdRng::seed_from_u64(7))?;
    let mut sink = FnSink::new(log_event);
    let ground = Plane::ground();
    let mut factory = PoseCollector::default();

    // Camera above and behind the origin, looking down at a slant.
    let eye = Vec3::new(0.0, 8.0, 6.0);
    let view = look_at_view(eye, Vec3::ZERO)?;

    tool.handle_event(ToolEvent::PointerMoved, &view, &ground, &mut factory, &mut sink);
    // Two scroll ticks grow the disc by 5% each.
    for _ in 0..2 {
        tool.handle_event(
            ToolEvent::Scroll { delta: 1.0, alt: false },
            &view,
            &ground,
            &mut factory,
            &mut sink,
        );
    }

    let config = RenderConfig::new((800, 800), Vec2::splat(10.0)).with_background([28, 32, 28]);
    let mut canvas = Canvas::new(config.clone());
    let stats = tool.render(&mut canvas);
    tracing::info!(
        "Preview: {} markers, {} meshes, radius {:.3}",
        stats.markers,
        stats.meshes,
        tool.params().disc_radius()
    );
    canvas.save("tool-flat-ground-preview.png")?;

    tool.handle_event(
        ToolEvent::KeyDown(ToolKey::Commit),
        &view,
        &ground,
        &mut factory,
        &mut sink,
    );

    let mut placed = Canvas::new(config);
    for pose in factory.poses() {
        placed.draw_pose(pose, 0.3, [120, 220, 120]);
    }
    tool.render(&mut placed);
    placed.save("tool-flat-ground-committed.png")?;

    Ok(())
}
