//! # Sky Tour
//!
//! Flies a virtual camera once around the world with the same drag, momentum
//! and zoom controls the window uses, saving a PNG snapshot of the viewport
//! every few frames. The last frame matches the first because the world
//! wraps.
//!
//! Run with: `cargo run --example sky_tour -- [out_dir]`

use std::path::PathBuf;

use pointzero::prelude::*;

const WIDTH: u32 = 480;
const HEIGHT: u32 = 320;
const FRAME_MS: f64 = 1000.0 / 60.0;
const SNAPSHOT_EVERY: usize = 20;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let out_dir = PathBuf::from(std::env::args().nth(1).unwrap_or_else(|| "sky_tour".to_owned()));
    std::fs::create_dir_all(&out_dir)?;

    let config = CanvasConfig::default().with_seed(99).with_initial_population(4, 3, 3);
    let mut canvas = CanvasController::new(WIDTH, HEIGHT, config)?;
    let centre = canvas.viewport().offset();
    canvas.add(ObjectKind::StarCluster, centre + Vec2::new(150.0, 40.0), false);
    canvas.add(ObjectKind::Quasar, centre + Vec2::new(-200.0, -60.0), false);
    canvas.add(ObjectKind::Pulsar, centre + Vec2::new(320.0, 90.0), true);

    // Fling the view left, then hold the right key for a full lap
    let mut now = 0.0;
    canvas.pointer_down(Vec2::new(300.0, 160.0), now);
    for i in 1..=5 {
        now += FRAME_MS;
        canvas.pointer_move(Vec2::new(300.0 - 25.0 * i as f32, 160.0));
        canvas.frame(now);
    }
    canvas.pointer_up();
    canvas.step_zoom(-2.0);

    let start = canvas.viewport().offset();
    canvas.set_key_pan(Vec2::new(1.0, 0.0));
    let lap = (canvas.world().size().x / canvas.config().pan_step).ceil() as usize;

    let mut saved = 0;
    for frame in 0..lap {
        now += FRAME_MS;
        let plan = canvas.frame(now);
        if frame % SNAPSHOT_EVERY == 0 {
            let image = canvas
                .viewport()
                .render_view(canvas.compositor().raster(), canvas.compositor().background());
            let path = out_dir.join(format!("frame_{:04}.png", frame));
            image.save(&path)?;
            saved += 1;
            let (lon, lat) = plan.pointer_geo;
            log::info!(
                "frame {:4}: offset ({:7.1}, {:6.1}) zoom {:.2} lon {:7.2} lat {:6.2}",
                frame,
                plan.offset.x,
                plan.offset.y,
                plan.zoom,
                lon,
                lat
            );
        }
    }

    println!("=== Point Zer0 Sky Tour ===");
    println!("Start offset: ({:.1}, {:.1})", start.x, start.y);
    println!("Frames:       {}", lap);
    println!("Snapshots:    {} in {}", saved, out_dir.display());
    Ok(())
}
