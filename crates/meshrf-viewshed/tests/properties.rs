//! Behavioral properties of the viewshed sweep.

use meshrf_dem::{ElevationGrid, GridPoint, EFFECTIVE_EARTH_RADIUS_M};
use meshrf_viewshed::{compute_visibility, is_point_visible, Site, Viewshed, VisibilityMask};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn random_terrain(width: usize, height: usize, gsd: f64, seed: u64) -> ElevationGrid {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let data = (0..width * height)
        .map(|_| rng.gen_range(0.0f32..300.0))
        .collect();
    ElevationGrid::try_new(width, height, gsd, data).unwrap()
}

fn assert_disk_visible(width: usize, height: usize, tx: (i32, i32), range: u32) {
    let grid = ElevationGrid::flat(width, height, 30.0, 100.0).unwrap();
    let mask = compute_visibility(&grid, tx.0, tx.1, 10.0, range, 30.0);
    let r2 = (range as i64) * (range as i64);

    for y in 0..height as i32 {
        for x in 0..width as i32 {
            let dx = (x - tx.0) as i64;
            let dy = (y - tx.1) as i64;
            if dx * dx + dy * dy <= r2 {
                assert!(
                    mask.is_visible(x, y),
                    "({x}, {y}) within range {range} of {tx:?} should be visible"
                );
            }
        }
    }
}

#[test]
fn test_flat_terrain_sees_whole_disk() {
    assert_disk_visible(41, 41, (20, 20), 20);
    assert_disk_visible(101, 101, (50, 50), 40);
    assert_disk_visible(64, 48, (10, 30), 25);
}

#[test]
fn test_nothing_visible_far_beyond_range() {
    let grid = ElevationGrid::flat(101, 101, 30.0, 100.0).unwrap();
    let mask = compute_visibility(&grid, 50, 50, 10.0, 30, 30.0);
    for point in mask.iter_visible() {
        let r = ((point.x - 50) as f64).hypot((point.y - 50) as f64);
        assert!(r <= 31.0, "{point:?} at {r} cells");
    }
}

#[test]
fn test_curvature_limits_flat_horizon() {
    // 1 km cells put the radio horizon of a 10 m mast about 13 cells out.
    let gsd = 1000.0;
    let grid = ElevationGrid::flat(81, 81, gsd, 50.0).unwrap();
    let mask = compute_visibility(&grid, 40, 40, 10.0, 40, gsd);
    let horizon_m = (2.0 * EFFECTIVE_EARTH_RADIUS_M * 10.0).sqrt();

    for y in 0..81 {
        for x in 0..81 {
            let d = ((x - 40) as f64).hypot((y - 40) as f64) * gsd;
            if d > 0.0 && d < horizon_m - 1.5 * gsd {
                assert!(mask.is_visible(x, y), "({x}, {y}) inside horizon");
            }
            if d > 2.0 * horizon_m {
                assert!(!mask.is_visible(x, y), "({x}, {y}) beyond horizon");
            }
        }
    }
}

#[test]
fn test_spike_blocks_cells_behind_it() {
    let width = 100;
    let mut data = vec![100.0f32; width * width];
    data[50 * width + 60] = 500.0;
    let grid = ElevationGrid::try_new(width, width, 30.0, data).unwrap();

    let mask = compute_visibility(&grid, 50, 50, 10.0, 40, 30.0);
    assert!(mask.is_visible(60, 50));
    assert!(!mask.is_visible(65, 50));
    assert!(!mask.is_visible(70, 50));
    assert!(!mask.is_visible(89, 50));
    // The shadow is narrow; the other side stays open
    assert!(mask.is_visible(40, 50));
}

#[test]
fn test_transmitter_always_visible() {
    let grid = random_terrain(30, 30, 30.0, 7);
    for (x, y) in [(0, 0), (29, 29), (15, 3), (4, 22)] {
        for range in [0, 1, 5, 50] {
            let mask = compute_visibility(&grid, x, y, 0.0, range, 30.0);
            assert!(mask.is_visible(x, y));
        }
    }
}

#[test]
fn test_zero_range_marks_only_transmitter() {
    let grid = random_terrain(12, 9, 30.0, 3);
    let mask = compute_visibility(&grid, 5, 4, 10.0, 0, 30.0);
    assert_eq!(mask.visible_count(), 1);
    assert_eq!(mask.iter_visible().next(), Some(GridPoint::new(5, 4)));
}

#[test]
fn test_transmitter_outside_grid_sees_nothing() {
    let grid = ElevationGrid::flat(20, 20, 30.0, 0.0).unwrap();
    for (x, y) in [(-1, 5), (20, 5), (5, -3), (5, 25)] {
        let mask = compute_visibility(&grid, x, y, 100.0, 30, 30.0);
        assert_eq!(mask.visible_count(), 0);
        assert_eq!(mask.width(), 20);
        assert_eq!(mask.height(), 20);

        let site = Site::new(x, y, 100.0);
        assert!(!is_point_visible(&grid, &site, 30, GridPoint::new(10, 10)));
    }
}

#[test]
fn test_ray_order_does_not_matter() {
    let grid = random_terrain(60, 50, 30.0, 11);
    let viewshed = Viewshed::new(&grid, GridPoint::new(28, 22), 8.0, 25, 30.0);
    let canonical = viewshed.compute();

    let mut endpoints = viewshed.ray_endpoints();
    endpoints.reverse();
    assert_eq!(viewshed.compute_with_endpoints(endpoints.clone()), canonical);

    let mut rng = ChaCha8Rng::seed_from_u64(99);
    endpoints.shuffle(&mut rng);
    assert_eq!(viewshed.compute_with_endpoints(endpoints), canonical);
}

#[test]
fn test_cast_ray_only_adds_cells() {
    let grid = random_terrain(40, 40, 30.0, 5);
    let viewshed = Viewshed::new(&grid, GridPoint::new(20, 20), 5.0, 15, 30.0);

    let mut mask = viewshed.empty_mask();
    let mut previous = mask.visible_count();
    for endpoint in viewshed.ray_endpoints() {
        viewshed.cast_ray(&mut mask, endpoint).unwrap();
        assert!(mask.visible_count() >= previous);
        previous = mask.visible_count();
    }
    assert_eq!(mask, viewshed.compute());
}

#[test]
fn test_parallel_sweep_matches_sequential() {
    for seed in 0..4 {
        let grid = random_terrain(70, 55, 30.0, seed);
        let viewshed = Viewshed::new(&grid, GridPoint::new(30, 25), 12.0, 35, 30.0);
        assert_eq!(viewshed.compute_parallel(), viewshed.compute(), "seed {seed}");
    }
}

#[test]
fn test_point_probe_matches_full_mask() {
    let cases = [
        (0u64, (20, 16), 15u32, 30.0),
        (1, (0, 0), 20, 30.0),
        (2, (39, 5), 12, 90.0),
        (3, (10, 30), 25, 5.0),
        (4, (22, 18), 8, 0.5),
    ];

    for (seed, (tx, ty), range, gsd) in cases {
        let grid = random_terrain(40, 32, gsd, seed);
        let site = Site::new(tx, ty, 6.0);
        let mask: VisibilityMask = compute_visibility(&grid, tx, ty, 6.0, range, gsd);

        for y in 0..32 {
            for x in 0..40 {
                assert_eq!(
                    is_point_visible(&grid, &site, range, GridPoint::new(x, y)),
                    mask.is_visible(x, y),
                    "seed {seed}, cell ({x}, {y})"
                );
            }
        }
    }
}
