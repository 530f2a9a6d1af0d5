//! Benchmarks for full map generation.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use maze_core::controller::{MapController, NullEvents};
use maze_core::navigation::GridNavigator;
use maze_test_utils::fixtures::{test_config, RecordingFactory};

/// Build a fully active square maze layout of the given side length.
fn dense_layout(side: u32) -> String {
    let mut text = format!("{side},{side},2");
    for _ in 0..side {
        text.push('\n');
        let row: Vec<&str> = (0..side).map(|_| "1").collect();
        text.push_str(&row.join(","));
    }
    text
}

fn bench_generation(c: &mut Criterion) {
    for side in [8u32, 16, 32] {
        let text = dense_layout(side);
        c.bench_function(&format!("generate_{side}x{side}"), |b| {
            b.iter(|| {
                let mut controller = MapController::new(
                    test_config(&text, 42),
                    RecordingFactory::default(),
                    GridNavigator,
                    NullEvents,
                );
                black_box(controller.initialize_grid().unwrap())
            });
        });
    }
}

criterion_group!(benches, bench_generation);
criterion_main!(benches);
