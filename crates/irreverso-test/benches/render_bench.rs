//! Benchmarks for the neural-mesh renderer

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use irreverso_core::{Phase, SeqTime};
use irreverso_visual::{ShaderRenderer, SoftwareBackend, Viewport};

fn bench_draw_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("draw_frame");
    for (width, height) in [(64.0, 36.0), (160.0, 90.0), (320.0, 180.0)] {
        let viewport = Viewport::new(width, height, 1.0);
        let mut renderer = ShaderRenderer::mount(&SoftwareBackend::new(), &viewport, SeqTime::ZERO);
        let mut t = 0;

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{width}x{height}")),
            &(),
            |b, _| {
                b.iter(|| {
                    t += 16;
                    black_box(renderer.draw_frame(SeqTime::from_millis(t)))
                })
            },
        );
    }
    group.finish();
}

fn bench_phase_regimes(c: &mut Criterion) {
    let viewport = Viewport::new(96.0, 54.0, 1.0);
    let mut renderer = ShaderRenderer::mount(&SoftwareBackend::new(), &viewport, SeqTime::ZERO);

    for phase in Phase::ALL {
        c.bench_function(&format!("draw_{}", phase.label().to_lowercase()), |b| {
            renderer.set_inputs(phase.as_value(), phase == Phase::Breach);
            b.iter(|| black_box(renderer.draw_frame(SeqTime::from_millis(5_000))))
        });
    }
}

criterion_group!(benches, bench_draw_frame, bench_phase_regimes);
criterion_main!(benches);
