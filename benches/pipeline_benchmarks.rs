//! Benchmarks for the per-frame motion pipeline

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use headmouse::{
    config::{Config, PointerConfig},
    engine::{EngineStateMachine, MotionSample, OperationMode},
    filters::create_filter,
    gamepad::{AbsoluteGamepadProjector, RelativeGamepadProjector},
    motion_scaler::MotionScaler,
    orientation::{correct, DeviceRotation, FlipDirection},
};

/// Noisy head motion: a slow sweep plus jitter
fn synthetic_motion(n: usize) -> Vec<(f32, f32)> {
    (0..n)
        .map(|i| {
            let t = i as f32 * 0.1;
            let dx = 2.0 * t.sin() + 0.3 * (rand::random::<f32>() - 0.5);
            let dy = 1.5 * t.cos() + 0.3 * (rand::random::<f32>() - 0.5);
            (dx, dy)
        })
        .collect()
}

fn benchmark_filters(c: &mut Criterion) {
    let mut group = c.benchmark_group("filters");
    let data = synthetic_motion(1000);

    for name in ["none", "low_pass", "kalman"] {
        let Ok(mut filter) = create_filter(name, 0.3) else {
            continue;
        };
        group.bench_with_input(BenchmarkId::new("sequence_1000", name), &data, |b, data| {
            b.iter(|| {
                filter.reset();
                for &(dx, dy) in data {
                    black_box(filter.apply(black_box(dx), black_box(dy)));
                }
            });
        });
    }
    group.finish();
}

fn benchmark_stages(c: &mut Criterion) {
    let mut group = c.benchmark_group("stages");
    let data = synthetic_motion(1000);

    group.bench_function("orientation", |b| {
        b.iter(|| {
            for &(dx, dy) in &data {
                black_box(correct(dx, dy, FlipDirection::Horizontal, DeviceRotation::Deg90));
            }
        });
    });

    for preset in [0, 2, 5] {
        let config = PointerConfig {
            acceleration: preset,
            ..PointerConfig::default()
        };
        let Ok(mut scaler) = MotionScaler::new(&config) else {
            continue;
        };
        group.bench_with_input(BenchmarkId::new("scaler", preset), &data, |b, data| {
            b.iter(|| {
                for &(dx, dy) in data {
                    black_box(scaler.process(dx, dy));
                }
            });
        });
    }

    group.bench_function("absolute_gamepad", |b| {
        let mut projector = AbsoluteGamepadProjector::new(0.05);
        b.iter(|| {
            for &(dx, dy) in &data {
                black_box(projector.update_motion(dx, dy));
            }
        });
    });

    group.bench_function("relative_gamepad", |b| {
        let mut projector = RelativeGamepadProjector::new(0.2);
        b.iter(|| {
            for (i, &(dx, dy)) in data.iter().enumerate() {
                black_box(projector.update_motion(dx, dy, i as i64 * 33));
            }
        });
    });

    group.finish();
}

fn benchmark_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine");
    let data = synthetic_motion(1000);

    for (label, mode) in [
        ("mouse", OperationMode::Mouse),
        ("gamepad_abs", OperationMode::GamepadAbsolute),
        ("gamepad_rel", OperationMode::GamepadRelative),
    ] {
        let mut config = Config::default();
        config.power.sleep_slices = 0;
        config.face_detection.timeout_secs = 0;
        let Ok(engine) = EngineStateMachine::new(config, mode) else {
            continue;
        };
        engine.start();
        engine.start();
        engine.dependency_ready();

        let mut t = 0;
        group.bench_with_input(BenchmarkId::new("on_frame_1000", label), &data, |b, data| {
            b.iter(|| {
                for &(dx, dy) in data {
                    t += 33;
                    black_box(engine.on_frame(&MotionSample::new(dx, dy, true, t)));
                }
            });
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_filters, benchmark_stages, benchmark_engine);
criterion_main!(benches);
