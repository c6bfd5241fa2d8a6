//! Benchmarks for script generation, the log drip and a full sequence

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use irreverso_core::{Language, Seed, SeqTime};
use irreverso_runtime::{BootConfig, BootSequencer};
use irreverso_script::{generate, DripConfig, LogDrip, ScriptConfig};
use irreverso_visual::{UnavailableBackend, Viewport};

fn bench_generate(c: &mut Criterion) {
    let config = ScriptConfig::default();
    let mut i = 0u64;

    c.bench_function("script_generate", |b| {
        b.iter(|| {
            i += 1;
            black_box(generate(&Seed::from_value(i), Language::En, &config))
        })
    });
}

fn bench_drip_to_exhaustion(c: &mut Criterion) {
    c.bench_function("drip_exhaust_42", |b| {
        b.iter(|| {
            let mut drip = LogDrip::new(DripConfig::default(), 7);
            drip.start(42, Duration::from_millis(6_500));
            while drip.is_running() {
                black_box(drip.tick());
            }
            drip.window()
        })
    });
}

fn bench_sequence_headless(c: &mut Criterion) {
    let viewport = Viewport::new(16.0, 9.0, 1.0);

    c.bench_function("sequence_headless_16ms", |b| {
        b.iter(|| {
            let config = BootConfig::default().with_seed(Seed::from_label("BENCH01"));
            let mut seq = BootSequencer::mount(config, &UnavailableBackend::default(), &viewport, Box::new(|| {}));
            let mut t = 0;
            while seq.is_running() {
                t += 16;
                black_box(seq.advance_to(SeqTime::from_millis(t)));
            }
        })
    });
}

criterion_group!(benches, bench_generate, bench_drip_to_exhaustion, bench_sequence_headless);
criterion_main!(benches);
