use criterion::{Criterion, black_box, criterion_group, criterion_main};
use field_core::{config::Settings, sim::Simulator};
use glam::Vec2;

fn bench_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame");

    for count in [100usize, 500, 1000] {
        let settings = Settings {
            num_points: count,
            ..Settings::default()
        };
        let mut sim = Simulator::with_seed(settings, Vec2::new(1280.0, 720.0), 1);

        group.bench_function(format!("tick_{count}"), |b| {
            b.iter(|| {
                sim.tick();
                black_box(sim.links().len());
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_frame);
criterion_main!(benches);
