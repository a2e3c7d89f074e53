//! Property tests for direction resolution over random grids.

use proptest::prelude::*;

use gridstep::core::position::Cell;
use gridstep::movement::resolve;
use gridstep::{Direction, GameModeRules, GridPosition, LevelGrid, Obstacle, ObstacleKind, ObstacleScanner};

fn direction() -> impl Strategy<Value = Direction> {
    prop_oneof![
        Just(Direction::Up),
        Just(Direction::Down),
        Just(Direction::Left),
        Just(Direction::Right),
    ]
}

fn rules() -> impl Strategy<Value = GameModeRules> {
    (any::<bool>(), 1u32..12, any::<bool>()).prop_map(|(bounded, distance, ignored)| {
        if bounded {
            GameModeRules::bounded(distance, ignored)
        } else {
            GameModeRules::unbounded(ignored)
        }
    })
}

/// A grid, a free start cell on it, and the obstacle layout.
fn scenario() -> impl Strategy<Value = (LevelGrid, Cell)> {
    (1u32..16, 1u32..16)
        .prop_flat_map(|(w, d)| {
            let obstacles = prop::collection::vec((0..w as i32, 0..d as i32), 0..24);
            (Just(w), Just(d), obstacles, 0..w as i32, 0..d as i32)
        })
        .prop_map(|(w, d, obstacles, sx, sz)| {
            let mut grid = LevelGrid::new(w, d);
            let start = Cell::new(sx, sz);
            for (x, z) in obstacles {
                let cell = Cell::new(x, z);
                if cell != start {
                    grid.place_obstacle(cell, Obstacle::new(ObstacleKind::Rock)).unwrap();
                }
            }
            (grid, start)
        })
}

/// Cells strictly after `from` up to and including `to`, along one axis.
fn walked(from: Cell, to: Cell) -> Vec<Cell> {
    let mut cells = Vec::new();
    let step_x = (to.x - from.x).signum();
    let step_z = (to.z - from.z).signum();
    let mut c = from;
    while c != to {
        c = Cell::new(c.x + step_x, c.z + step_z);
        cells.push(c);
    }
    cells
}

proptest! {
    #[test]
    fn destination_stays_in_bounds((grid, start) in scenario(), d in direction(), rules in rules()) {
        let origin = GridPosition::from_cell(start, 0.0);
        let dest = resolve(d, origin, &rules, &grid);
        prop_assert!(dest.is_on_grid());
        prop_assert!(grid.boundary().contains(dest.cell()));
        prop_assert_eq!(dest.y, origin.y);
    }

    #[test]
    fn destination_stays_on_axis((grid, start) in scenario(), d in direction(), rules in rules()) {
        let dest = resolve(d, GridPosition::from_cell(start, 0.0), &rules, &grid).cell();
        let (dx, dz) = d.delta();
        if dx == 0 {
            prop_assert_eq!(dest.x, start.x);
            prop_assert!((dest.z - start.z) * dz >= 0);
        } else {
            prop_assert_eq!(dest.z, start.z);
            prop_assert!((dest.x - start.x) * dx >= 0);
        }
    }

    #[test]
    fn obstacle_aware_path_is_clear((grid, start) in scenario(), d in direction(), bounded in any::<bool>(), distance in 1u32..12) {
        let rules = if bounded {
            GameModeRules::bounded(distance, false)
        } else {
            GameModeRules::unbounded(false)
        };
        let dest = resolve(d, GridPosition::from_cell(start, 0.0), &rules, &grid).cell();

        for cell in walked(start, dest) {
            prop_assert!(grid.is_passable(cell), "walked through blocked cell {}", cell);
        }

        // Stopped for a reason: next cell is blocked, or the step cap was hit.
        let steps = start.manhattan(dest);
        let capped = bounded && steps == distance;
        prop_assert!(capped || !grid.is_passable(dest.step(d)));
    }

    #[test]
    fn bounded_moves_respect_cap((grid, start) in scenario(), d in direction(), distance in 1u32..12, ignored in any::<bool>()) {
        let rules = GameModeRules::bounded(distance, ignored);
        let dest = resolve(d, GridPosition::from_cell(start, 0.0), &rules, &grid).cell();
        prop_assert!(start.manhattan(dest) <= distance);
    }

    #[test]
    fn resolution_is_deterministic((grid, start) in scenario(), d in direction(), rules in rules()) {
        let origin = GridPosition::from_cell(start, 0.0);
        prop_assert_eq!(resolve(d, origin, &rules, &grid), resolve(d, origin, &rules, &grid));
    }
}
