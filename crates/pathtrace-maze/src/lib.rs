//! Randomized maze generation for obstacle grids.
//!
//! [`MazeGen`] carves corridors out of an all-wall layout with a randomized
//! depth-first carve, then verifies start→end solvability by driving a BFS
//! stepper over the candidate layout. An unconnected carve is thrown away
//! and redone with fresh randomness, up to [`MAX_ATTEMPTS`] times; past the
//! bound generation fails with [`MazeError::AttemptsExhausted`] instead of
//! spinning.

use std::fmt;

use log::debug;
use rand::Rng;
use rand::seq::SliceRandom;

use pathtrace_core::{Grid, ObstacleMap, Point};
use pathtrace_search::{Algorithm, Status, Stepper};

/// Upper bound on whole-carve retries before generation gives up.
pub const MAX_ATTEMPTS: usize = 100;

/// Maze generator carving into a grid's obstacle layout.
pub struct MazeGen<R: Rng> {
    rng: R,
}

impl<R: Rng> MazeGen<R> {
    /// Create a generator drawing randomness from `rng`.
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Replace `grid`'s terrain with a randomly carved maze in which `end`
    /// is guaranteed reachable from `start`.
    ///
    /// Returns the number of carved (traversable) cells. The grid's terrain
    /// must still be editable: generation happens before any stepper is
    /// constructed and fails with [`MazeError::ObstaclesFrozen`] if
    /// neighbour lists were already computed.
    pub fn generate(
        &mut self,
        grid: &mut Grid,
        start: Point,
        end: Point,
    ) -> Result<usize, MazeError> {
        if grid.neighbors_ready() {
            return Err(MazeError::ObstaclesFrozen);
        }
        if !grid.contains(start) {
            return Err(MazeError::InvalidEndpoint(start));
        }
        if !grid.contains(end) {
            return Err(MazeError::InvalidEndpoint(end));
        }

        for attempt in 1..=MAX_ATTEMPTS {
            let map = self.carve(grid.width(), grid.height(), start);
            if is_solvable(&map, start, end) {
                grid.set_obstacles(&map).map_err(|_| MazeError::ObstaclesFrozen)?;
                let carved = grid.len() - map.obstacle_count();
                debug!("maze carved on attempt {attempt}: {carved} open cells");
                return Ok(carved);
            }
            debug!("maze carve attempt {attempt} left {end} unreachable, recarving");
        }
        Err(MazeError::AttemptsExhausted(MAX_ATTEMPTS))
    }

    /// One randomized depth-first carve over an all-wall layout.
    ///
    /// A popped cell is carved only when no carved 8-neighbour other than
    /// its recorded predecessor exists, which keeps corridors one cell wide;
    /// its neighbours are then pushed in shuffled order. The carved region
    /// grows from `start` and is connected by construction — whether `end`
    /// ends up inside it is what the caller checks.
    fn carve(&mut self, width: i32, height: i32, start: Point) -> ObstacleMap {
        let mut map = ObstacleMap::new(width, height);
        map.fill(true);

        let len = (width.max(0) * height.max(0)) as usize;
        let mut predecessor: Vec<Option<Point>> = vec![None; len];
        let idx = |p: Point| (p.y * width + p.x) as usize;

        let mut stack = vec![start];
        let mut scratch: Vec<Point> = Vec::with_capacity(8);

        while let Some(current) = stack.pop() {
            if !map.is_obstacle(current)
                || has_carved_neighbor_besides(&map, current, predecessor[idx(current)])
            {
                continue;
            }
            map.set(current, false);

            scratch.clear();
            scratch.extend(current.neighbors_8().into_iter().filter(|n| map.contains(*n)));
            scratch.shuffle(&mut self.rng);

            for &n in scratch.iter() {
                if map.is_obstacle(n) && !has_carved_neighbor_besides(&map, n, Some(current)) {
                    predecessor[idx(n)] = Some(current);
                    stack.push(n);
                }
            }
        }
        map
    }
}

/// Whether `p` has any carved 8-neighbour other than `predecessor`.
fn has_carved_neighbor_besides(map: &ObstacleMap, p: Point, predecessor: Option<Point>) -> bool {
    p.neighbors_8()
        .into_iter()
        .filter(|n| map.contains(*n))
        .any(|n| !map.is_obstacle(n) && Some(n) != predecessor)
}

/// Reachability check: drive the engine's own BFS stepper over the layout.
fn is_solvable(map: &ObstacleMap, start: Point, end: Point) -> bool {
    let probe = Grid::with_obstacles(map);
    // Construction fails when an endpoint is still a wall — not solvable.
    let Ok(mut stepper) = Stepper::new(Algorithm::Bfs, &probe, start, end) else {
        return false;
    };
    while !stepper.is_done() {
        if stepper.step().is_err() {
            return false;
        }
    }
    stepper.status() == Status::Found
}

/// Errors from maze generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MazeError {
    /// Start or end lies outside the grid.
    InvalidEndpoint(Point),
    /// The grid's terrain is frozen (neighbour lists already computed).
    ObstaclesFrozen,
    /// No connected carve was produced within the retry bound.
    AttemptsExhausted(usize),
}

impl fmt::Display for MazeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEndpoint(p) => write!(f, "maze endpoint {p} is out of bounds"),
            Self::ObstaclesFrozen => {
                write!(f, "grid terrain is frozen: neighbour lists already computed")
            }
            Self::AttemptsExhausted(n) => {
                write!(f, "no solvable maze produced within {n} carve attempts")
            }
        }
    }
}

impl std::error::Error for MazeError {}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn solve(grid: &Grid, start: Point, end: Point) -> Status {
        let mut stepper = Stepper::new(Algorithm::Bfs, grid, start, end).unwrap();
        while !stepper.is_done() {
            stepper.step().unwrap();
        }
        stepper.status()
    }

    #[test]
    fn every_generated_maze_is_solvable() {
        let start = Point::new(0, 0);
        let end = Point::new(29, 29);
        for seed in 0..50u64 {
            let mut grid = Grid::default();
            let mut generator = MazeGen::new(SmallRng::seed_from_u64(seed));
            let carved = generator
                .generate(&mut grid, start, end)
                .unwrap_or_else(|e| panic!("seed {seed}: {e}"));
            assert!(carved > 0, "seed {seed}: nothing carved");
            assert_eq!(solve(&grid, start, end), Status::Found, "seed {seed}");
        }
    }

    #[test]
    fn mazes_contain_walls() {
        let mut grid = Grid::default();
        let mut generator = MazeGen::new(SmallRng::seed_from_u64(1));
        let carved = generator
            .generate(&mut grid, Point::new(0, 0), Point::new(29, 29))
            .unwrap();
        let walls = grid.obstacle_cells().len();
        assert_eq!(carved + walls, grid.len());
        assert!(walls > 0, "a maze with no walls is no maze");
    }

    #[test]
    fn same_seed_reproduces_the_same_maze() {
        let start = Point::new(0, 0);
        let end = Point::new(19, 19);
        let mut a = Grid::new(20, 20);
        let mut b = Grid::new(20, 20);
        MazeGen::new(SmallRng::seed_from_u64(9))
            .generate(&mut a, start, end)
            .unwrap();
        MazeGen::new(SmallRng::seed_from_u64(9))
            .generate(&mut b, start, end)
            .unwrap();
        assert_eq!(a.clone_obstacle_map(), b.clone_obstacle_map());
    }

    #[test]
    fn endpoints_must_be_in_bounds() {
        let mut grid = Grid::new(8, 8);
        let mut generator = MazeGen::new(SmallRng::seed_from_u64(0));
        let oob = Point::new(8, 0);
        assert_eq!(
            generator.generate(&mut grid, oob, Point::new(7, 7)),
            Err(MazeError::InvalidEndpoint(oob))
        );
        assert_eq!(
            generator.generate(&mut grid, Point::new(0, 0), oob),
            Err(MazeError::InvalidEndpoint(oob))
        );
    }

    #[test]
    fn frozen_terrain_is_rejected() {
        let mut grid = Grid::new(8, 8);
        grid.init_neighbors();
        let mut generator = MazeGen::new(SmallRng::seed_from_u64(0));
        assert_eq!(
            generator.generate(&mut grid, Point::new(0, 0), Point::new(7, 7)),
            Err(MazeError::ObstaclesFrozen)
        );
    }

    #[test]
    fn tiny_grids_still_generate() {
        let start = Point::new(0, 0);
        let end = Point::new(1, 1);
        for seed in 0..10u64 {
            let mut grid = Grid::new(2, 2);
            MazeGen::new(SmallRng::seed_from_u64(seed))
                .generate(&mut grid, start, end)
                .unwrap_or_else(|e| panic!("seed {seed}: {e}"));
            assert_eq!(solve(&grid, start, end), Status::Found, "seed {seed}");
        }
    }
}
