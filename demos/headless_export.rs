//! # Headless Export
//!
//! Builds a seeded sky without opening a window, adds one of every kind,
//! tweaks a few of them and writes the full map plus its JSON legend.
//!
//! Run with: `cargo run --example headless_export -- [seed] [out.png]`

use pointzero::prelude::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let seed: u64 = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(2024);
    let out = std::env::args()
        .nth(2)
        .unwrap_or_else(|| "galaxy_map_full.png".to_owned());

    let config = CanvasConfig::default().with_seed(seed).with_export_path(&out);
    let mut canvas = CanvasController::new(640, 400, config)?;

    let centre = canvas.viewport().offset();
    for (i, kind) in ObjectKind::ALL.into_iter().enumerate() {
        let at = centre + Vec2::new(i as f32 * 180.0 - 450.0, (i % 2) as f32 * 140.0 - 70.0);
        let id = canvas.add(kind, at, false);
        if i % 2 == 0 {
            canvas.cycle_hue(id);
        }
    }
    canvas.redraw();

    let summary = canvas.export()?;
    println!("=== Point Zer0 Export ===");
    println!("Seed:    {}", seed);
    println!("World:   {}x{}", canvas.world().width(), canvas.world().height());
    println!("Objects: {}", summary.objects);
    println!("Image:   {}", summary.image_path.display());
    println!("Legend:  {}", summary.legend_path.display());
    Ok(())
}
