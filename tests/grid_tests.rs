//! Grid tests - occupancy, fill counters and plane collapse

use std::collections::BTreeSet;

use proptest::prelude::*;
use tetris3d::core::{Grid, Placement};
use tetris3d::types::{CellIndex, CubeId, GameEvent, SoundCue};

fn fill_plane(engine: &mut Placement, plane: i32) {
    for row in 0..5 {
        for col in 0..5 {
            engine.place_cube(CellIndex::new(plane, row, col));
        }
    }
}

fn arb_cells() -> impl Strategy<Value = BTreeSet<(usize, usize, usize)>> {
    prop::collection::btree_set((0usize..15, 0usize..5, 0usize..5), 0..200)
}

fn grid_with(cells: &BTreeSet<(usize, usize, usize)>) -> Grid {
    let mut grid = Grid::new(15, 5, 5);
    for (i, &(plane, row, col)) in cells.iter().enumerate() {
        grid.occupy(plane, row, col, CubeId(i as u32));
    }
    grid
}

#[test]
fn test_new_grid_is_empty() {
    let grid = Grid::default();
    assert_eq!((grid.planes(), grid.rows(), grid.cols()), (15, 5, 5));
    assert_eq!(grid.cube_count(), 0);
    assert_eq!(grid.full_plane_count(), 0);
    for plane in 0..15 {
        assert_eq!(grid.fill_count(plane), 0);
    }
}

#[test]
fn test_bounds_are_signed() {
    let grid = Grid::default();
    assert!(grid.in_bounds(CellIndex::new(0, 0, 0)));
    assert!(grid.in_bounds(CellIndex::new(14, 4, 4)));
    assert!(!grid.in_bounds(CellIndex::new(-1, 0, 0)));
    assert!(!grid.in_bounds(CellIndex::new(15, 0, 0)));
    assert!(!grid.in_bounds(CellIndex::new(0, 5, 0)));
    assert!(!grid.in_bounds(CellIndex::new(0, 0, -1)));
}

#[test]
#[should_panic(expected = "already holds")]
fn test_double_occupy_panics() {
    let mut grid = Grid::default();
    grid.occupy(3, 1, 1, CubeId(1));
    grid.occupy(3, 1, 1, CubeId(2));
}

#[test]
fn test_three_adjacent_full_planes_collapse() {
    let mut engine = Placement::default();
    let mut events = Vec::new();
    fill_plane(&mut engine, 3);
    fill_plane(&mut engine, 4);
    fill_plane(&mut engine, 5);
    let below = engine.place_cube(CellIndex::new(2, 1, 1));
    let just_above = engine.place_cube(CellIndex::new(6, 0, 0));
    let far_above = engine.place_cube(CellIndex::new(9, 4, 4));

    let report = engine.process_full_planes(&mut events);
    assert_eq!(report.planes, 3);
    assert_eq!(report.score, 90);

    let grid = engine.grid();
    assert_eq!(grid.cube_count(), 3);
    assert_eq!(grid.occupant(2, 1, 1), Some(below));
    assert_eq!(grid.occupant(3, 0, 0), Some(just_above));
    assert_eq!(grid.occupant(6, 4, 4), Some(far_above));
    for plane in 7..15 {
        assert_eq!(grid.fill_count(plane), 0, "plane {plane} should be empty");
    }

    let exploded = events
        .iter()
        .filter(|e| matches!(e, GameEvent::CubeExploded { .. }))
        .count();
    let cleared = events
        .iter()
        .filter(|e| **e == GameEvent::Sound(SoundCue::PlaneCleared))
        .count();
    assert_eq!(exploded, 75);
    assert_eq!(cleared, 3);
}

#[test]
fn test_clear_then_collapse_shifts_cube_handles() {
    let mut grid = Grid::default();
    let mut events = Vec::new();
    for row in 0..5 {
        for col in 0..5 {
            grid.occupy(0, row, col, CubeId(100 + (row * 5 + col) as u32));
        }
    }
    grid.occupy(1, 2, 3, CubeId(7));

    grid.clear_plane(0, &mut events);
    grid.collapse_above(0, &mut events);

    assert_eq!(grid.occupant(0, 2, 3), Some(CubeId(7)));
    assert!(events.contains(&GameEvent::CubeShifted {
        cube: CubeId(7),
        to: CellIndex::new(0, 2, 3),
    }));
    assert!(events.contains(&GameEvent::CubeExploded {
        cube: CubeId(100),
        cell: CellIndex::new(0, 0, 0),
    }));
}

proptest! {
    #[test]
    fn prop_fill_counters_match_contents(cells in arb_cells()) {
        let grid = grid_with(&cells);

        for plane in 0..15 {
            let expected = cells.iter().filter(|c| c.0 == plane).count();
            prop_assert_eq!(grid.fill_count(plane), expected);
            prop_assert_eq!(grid.scan_plane(plane), expected);
            prop_assert_eq!(grid.is_plane_full(plane), expected == 25);
        }
        prop_assert_eq!(grid.cube_count(), cells.len());
        prop_assert_eq!(grid.occupied_cells().count(), cells.len());
    }

    #[test]
    fn prop_collapse_moves_every_upper_plane_down(cells in arb_cells(), target in 0usize..15) {
        let mut grid = grid_with(&cells);
        let before: Vec<usize> = (0..15).map(|p| grid.fill_count(p)).collect();
        let mut events = Vec::new();

        grid.clear_plane(target, &mut events);
        grid.collapse_above(target, &mut events);

        for plane in 0..target {
            prop_assert_eq!(grid.fill_count(plane), before[plane]);
        }
        for plane in target..14 {
            prop_assert_eq!(grid.fill_count(plane), before[plane + 1]);
        }
        prop_assert_eq!(grid.fill_count(14), 0);
        for plane in 0..15 {
            prop_assert_eq!(grid.fill_count(plane), grid.scan_plane(plane));
        }
        prop_assert_eq!(grid.cube_count(), cells.len() - before[target]);
    }
}
