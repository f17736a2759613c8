//! Example: pick transmitter sites over terrain.
//!
//! Usage: cargo run --example plan_sites -- [dem.tif gsd_meters [config.yaml]]
//!
//! Without a DEM a synthetic ridge-and-valley raster is used. Set `RUST_LOG`
//! (e.g. `RUST_LOG=debug`) for planner events.

use meshrf_dem::{ElevationGrid, GridPoint};
use meshrf_planner::{CoveragePlanner, PlannerConfig};
use std::env;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

fn synthetic_terrain() -> ElevationGrid {
    let (width, height) = (256usize, 256usize);
    let data = (0..width * height)
        .map(|i| {
            let x = (i % width) as f32;
            let y = (i / width) as f32;
            let ridge = 150.0 * (-((x - 128.0) / 25.0).powi(2)).exp();
            let hills = 40.0 * (x / 17.0).sin() * (y / 23.0).cos();
            300.0 + ridge + hills
        })
        .collect();
    ElevationGrid::try_new(width, height, 30.0, data).expect("synthetic raster is consistent")
}

fn main() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let args: Vec<String> = env::args().collect();

    let grid = if args.len() >= 3 {
        let gsd: f64 = args[2].parse().expect("Invalid ground-sample distance");
        ElevationGrid::from_geotiff(&args[1], gsd).expect("Failed to load DEM")
    } else {
        synthetic_terrain()
    };

    let config = match args.get(3) {
        Some(path) => PlannerConfig::from_file(path).expect("Failed to load config"),
        None => PlannerConfig {
            max_range_pixels: 60,
            max_sites: Some(5),
            ..Default::default()
        },
    };

    println!(
        "Grid: {} x {} cells at {} m",
        grid.width(),
        grid.height(),
        grid.gsd_meters()
    );

    let planner = CoveragePlanner::new(&grid, config).expect("Invalid planner config");

    // Candidates on a coarse lattice, targets on a fine one
    let (w, h) = (grid.width() as i32, grid.height() as i32);
    let lattice = |step: usize| -> Vec<GridPoint> {
        (step as i32 / 2..h)
            .step_by(step)
            .flat_map(|y| (step as i32 / 2..w).step_by(step).map(move |x| GridPoint::new(x, y)))
            .collect()
    };
    let candidates = planner.sites_at(&lattice(32));
    let targets = lattice(8);

    println!(
        "Evaluating {} candidates against {} targets...",
        candidates.len(),
        targets.len()
    );
    let start = Instant::now();
    let plan = planner.plan(&candidates, &targets);
    println!("Planned in {:.3}s", start.elapsed().as_secs_f64());

    for (round, site) in plan.sites.iter().enumerate() {
        println!(
            "  {}. candidate {:>3} at ({:>4}, {:>4}), ground {:.1} m: +{:>4} targets, viewshed {:.2} km²",
            round + 1,
            site.candidate,
            site.site.position.x,
            site.site.position.y,
            site.ground_elevation_m,
            site.gain,
            site.coverage_area_km2
        );
    }
    println!(
        "Covered {} / {} targets ({:.1}%)",
        plan.selection.covered_targets,
        targets.len(),
        plan.coverage_fraction() * 100.0
    );

    let selected: Vec<_> = plan.sites.iter().map(|s| s.site).collect();
    match planner.composite_visibility(&selected) {
        Ok(composite) => println!(
            "Composite viewshed: {:.2} km²",
            composite.coverage_area_km2(grid.gsd_meters())
        ),
        Err(e) => eprintln!("Composite failed: {}", e),
    }
}
