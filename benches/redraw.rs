//! Benchmarks for buffer repaint and per-frame CPU work.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pointzero::prelude::*;
use pointzero::raster::{draw_object, Raster};
use rand::rngs::SmallRng;
use rand::SeedableRng;

fn startup_canvas(width: u32, height: u32) -> CanvasController {
    CanvasController::new(width, height, CanvasConfig::default().with_seed(42)).unwrap()
}

fn bench_redraw(c: &mut Criterion) {
    let mut group = c.benchmark_group("redraw");
    group.sample_size(20);

    for (w, h) in [(320, 240), (640, 480)] {
        let mut canvas = startup_canvas(w, h);
        group.bench_with_input(BenchmarkId::new("startup_world", format!("{}x{}", w, h)), &(), |b, _| {
            b.iter(|| black_box(canvas.redraw()))
        });
    }

    group.finish();
}

fn bench_rasterizers(c: &mut Criterion) {
    let mut group = c.benchmark_group("rasterize");
    let mut canvas = startup_canvas(480, 360);
    let centre = canvas.viewport().offset();
    let mut raster = Raster::new(1024, 1024).unwrap();
    let mut rng = SmallRng::seed_from_u64(7);

    for kind in ObjectKind::ALL {
        let id = canvas.add(kind, centre, false);
        let Some(obj) = canvas.get(id).cloned() else {
            continue;
        };
        group.bench_function(kind.label(), |b| {
            b.iter(|| black_box(draw_object(&obj, &mut raster, &mut rng)))
        });
    }

    group.finish();
}

fn bench_frame(c: &mut Criterion) {
    let mut canvas = startup_canvas(640, 480);
    canvas.set_key_pan(Vec2::new(1.0, 0.5));
    let mut now = 0.0;

    c.bench_function("frame_plan", |b| {
        b.iter(|| {
            now += 16.0;
            black_box(canvas.frame(now))
        })
    });

    c.bench_function("render_view", |b| {
        b.iter(|| {
            black_box(
                canvas
                    .viewport()
                    .render_view(canvas.compositor().raster(), canvas.compositor().background()),
            )
        })
    });
}

criterion_group!(benches, bench_redraw, bench_rasterizers, bench_frame);
criterion_main!(benches);
