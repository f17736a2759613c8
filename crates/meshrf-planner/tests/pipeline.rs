//! End-to-end planning over synthetic terrain.

use meshrf_dem::{ElevationGrid, GridPoint};
use meshrf_itm::{ItmError, ItmResult, LinkParameters, PathLoss, PropagationOracle, NO_DATA_LOSS_DB};
use meshrf_planner::{
    boundary, site_radial_loss, CoverageMatrixBuilder, CoveragePlanner, CoverageStrategy,
    GreedySiteSelector, PlannerConfig, PlannerError, Site,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Rolling hills with random roughness on top.
fn hilly_terrain(width: usize, height: usize, seed: u64) -> ElevationGrid {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let data = (0..width * height)
        .map(|i| {
            let x = (i % width) as f32;
            let y = (i / width) as f32;
            200.0 + 80.0 * (x / 9.0).sin() * (y / 7.0).cos() + rng.gen_range(0.0f32..15.0)
        })
        .collect();
    ElevationGrid::try_new(width, height, 30.0, data).unwrap()
}

fn random_points(count: usize, width: i32, height: i32, seed: u64) -> Vec<GridPoint> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|_| GridPoint::new(rng.gen_range(0..width), rng.gen_range(0..height)))
        .collect()
}

#[test]
fn test_strategies_build_identical_matrices() {
    let grid = hilly_terrain(80, 60, 1);
    let candidates: Vec<Site> = random_points(12, 80, 60, 2)
        .into_iter()
        .map(|p| Site {
            position: p,
            antenna_height_m: 8.0,
        })
        .collect();
    let mut targets = random_points(40, 80, 60, 3);
    targets.push(GridPoint::new(-3, 10));
    targets.push(GridPoint::new(10, 60));

    let builder = CoverageMatrixBuilder::new(&grid, 30, 30.0);
    let full = builder
        .clone()
        .with_strategy(CoverageStrategy::FullMask)
        .build(&candidates, &targets);
    let direct = builder
        .clone()
        .with_strategy(CoverageStrategy::DirectRay)
        .build(&candidates, &targets);
    let auto = builder.build(&candidates, &targets);

    assert_eq!(direct, full);
    assert_eq!(auto, full);
    for c in 0..candidates.len() {
        assert!(!full.covers(c, 40), "target off the west edge");
        assert!(!full.covers(c, 41), "target off the south edge");
    }
}

#[test]
fn test_parallel_build_matches_sequential() {
    let grid = hilly_terrain(70, 70, 4);
    let candidates: Vec<Site> = random_points(16, 70, 70, 5)
        .into_iter()
        .map(|p| Site {
            position: p,
            antenna_height_m: 15.0,
        })
        .collect();
    let targets = random_points(100, 70, 70, 6);

    let builder = CoverageMatrixBuilder::new(&grid, 25, 30.0);
    let parallel = builder.clone().with_parallel(true).build(&candidates, &targets);
    let sequential = builder.with_parallel(false).build(&candidates, &targets);
    assert_eq!(parallel, sequential);

    let greedy_parallel = GreedySiteSelector::new().with_parallel(true).select(&parallel);
    let greedy_sequential = GreedySiteSelector::new().select(&sequential);
    assert_eq!(greedy_parallel, greedy_sequential);
}

#[test]
fn test_selection_properties() {
    let grid = hilly_terrain(90, 90, 7);
    let config = PlannerConfig {
        max_range_pixels: 20,
        ..Default::default()
    };
    let planner = CoveragePlanner::new(&grid, config).unwrap();
    let candidates = planner.sites_at(&random_points(25, 90, 90, 8));
    let targets = random_points(150, 90, 90, 9);

    let plan = planner.plan(&candidates, &targets);
    let selected = plan.selected_indices();

    let mut unique = selected.to_vec();
    unique.sort_unstable();
    unique.dedup();
    assert_eq!(unique.len(), selected.len());
    assert!(selected.iter().all(|&c| c < candidates.len()));

    // Gains never increase from one round to the next
    assert!(plan.selection.gains.windows(2).all(|w| w[0] >= w[1]));
    assert_eq!(
        plan.selection.gains.iter().sum::<usize>(),
        plan.selection.covered_targets
    );

    // The selection covers every target any candidate covers
    let reachable = (0..targets.len())
        .filter(|&t| (0..candidates.len()).any(|c| plan.matrix.covers(c, t)))
        .count();
    assert_eq!(plan.selection.covered_targets, reachable);
    assert_eq!(plan.sites.len(), selected.len());
}

#[test]
fn test_budget_from_config() {
    let grid = hilly_terrain(60, 60, 10);
    let config = PlannerConfig::from_yaml_str("max_range_pixels: 15\nmax_sites: 2\nparallel: false")
        .unwrap();
    let planner = CoveragePlanner::new(&grid, config).unwrap();
    let candidates = planner.sites_at(&[
        GridPoint::new(10, 10),
        GridPoint::new(50, 10),
        GridPoint::new(10, 50),
        GridPoint::new(50, 50),
    ]);
    let targets: Vec<GridPoint> = candidates.iter().map(|s| s.position).collect();

    let plan = planner.plan(&candidates, &targets);
    assert_eq!(plan.selected_indices(), &[0, 1]);
}

#[test]
fn test_boundary_matches_engine() {
    let grid = hilly_terrain(50, 40, 11);
    let flags = boundary::compute_visibility(grid.as_slice(), 50, 40, 20, 18, 6.0, 22, 30.0)
        .unwrap();
    let mask = meshrf_viewshed::compute_visibility(&grid, 20, 18, 6.0, 22, 30.0);
    assert_eq!(flags, mask.as_slice());
}

#[test]
fn test_boundary_shape_errors() {
    assert!(matches!(
        boundary::select_sites(&[1.0, 0.0, 1.0], 2, 2),
        Err(PlannerError::MatrixShape {
            expected: 4,
            actual: 3
        })
    ));
    assert!(matches!(
        boundary::compute_visibility(&[1.0; 5], 2, 2, 0, 0, 1.0, 3, 30.0),
        Err(PlannerError::InvalidArgument(_))
    ));
}

/// Fails every third query.
struct EveryThirdFails;

impl PropagationOracle for EveryThirdFails {
    fn estimate_path_loss(&self, pfl: &[f64], _link: &LinkParameters) -> ItmResult<PathLoss> {
        let intervals = pfl[0] as usize;
        if intervals % 3 == 0 {
            Err(ItmError::DistanceOutOfRange)
        } else {
            Ok(PathLoss::new(90.0 + intervals as f64))
        }
    }
}

#[test]
fn test_radial_loss_survives_oracle_failures() {
    let grid = hilly_terrain(40, 40, 12);
    let site = Site::new(5, 20, 10.0);
    let radial =
        site_radial_loss(&EveryThirdFails, &grid, &site, 0.0, 9, &LinkParameters::default())
            .unwrap();

    assert_eq!(radial.losses_db.len(), 10);
    assert_eq!(radial.losses_db[0], 0.0);
    for i in 1..10 {
        if i % 3 == 0 {
            assert_eq!(radial.losses_db[i], NO_DATA_LOSS_DB);
        } else {
            assert_eq!(radial.losses_db[i], 90.0 + i as f32);
        }
    }
    assert_eq!(radial.stats.failed, 3);
    assert_eq!(radial.stats.succeeded, 6);
}
