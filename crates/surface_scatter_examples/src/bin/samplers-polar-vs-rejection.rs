use glam::{Vec2, Vec3};
use rand::rngs::StdRng;
use rand::SeedableRng;
use surface_scatter::prelude::*;
use surface_scatter_examples::{init_tracing, Canvas, RenderConfig};

fn main() -> anyhow::Result<()> {
    init_tracing();

    let count = 4000;
    for method in [DiscMethod::Polar, DiscMethod::Rejection] {
        let mut rng = StdRng::seed_from_u64(17);
        let samples = SampleSet::generate(count, method.sampler().as_ref(), &mut rng);

        // For a uniform disc E[r^2] = 1/2 and the inner half radius holds a quarter.
        let mean_r2 = samples
            .iter()
            .map(|s| s.disc_point.length_squared())
            .sum::<f32>()
            / count as f32;
        let inner = samples
            .iter()
            .filter(|s| s.disc_point.length() < 0.5)
            .count() as f32
            / count as f32;
        tracing::info!("{method:?}: E[r^2] = {mean_r2:.3}, inner share = {inner:.3}");

        let mut canvas = Canvas::new(RenderConfig::new((600, 600), Vec2::splat(2.2)));
        let ring: Vec<Vec3> = (0..=128)
            .map(|i| {
                let a = i as f32 / 128.0 * std::f32::consts::TAU;
                Vec3::new(a.cos(), 0.0, a.sin())
            })
            .collect();
        for pair in ring.windows(2) {
            canvas.draw_line(pair[0], pair[1], [200, 200, 60]);
        }
        for s in samples.iter() {
            let p = Vec3::new(s.disc_point.x, 0.0, s.disc_point.y);
            canvas.draw_disc(p, 0.0, [235, 235, 235]);
        }
        canvas.save(format!("samplers-{}.png", format!("{method:?}").to_lowercase()))?;
    }

    Ok(())
}
