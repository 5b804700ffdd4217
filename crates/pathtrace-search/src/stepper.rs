//! The steppable search state machine.
//!
//! A [`Stepper`] binds one algorithm to one grid and one start/end pair for
//! the duration of a single run. Each [`step`](Stepper::step) performs
//! exactly one unit of work — one node expansion, or one alternating
//! half-step for the bidirectional variant — so an external driver can
//! render progress between calls. Snapshots ([`visited`](Stepper::visited),
//! [`obstacles`](Stepper::obstacles)) are owned copies, safe to hand to a
//! renderer while the driver keeps stepping.

use std::fmt;
use std::str::FromStr;

use pathtrace_core::{CellState, Grid, Point};

use crate::astar::{self, AStarState};
use crate::bfs::{self, BfsState};
use crate::bidirectional::{self, BidiState};
use crate::dfs::{self, DfsState};
use crate::dijkstra::{self, DijkstraState};
use crate::error::{ParseAlgorithmError, SearchError};

// ---------------------------------------------------------------------------
// Algorithm / Status
// ---------------------------------------------------------------------------

/// Selector for the search variant a [`Stepper`] runs.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Algorithm {
    Dijkstra,
    AStar,
    Bfs,
    Dfs,
    BidirectionalDijkstra,
}

impl Algorithm {
    /// Every selectable algorithm, in display order.
    pub const ALL: [Algorithm; 5] = [
        Algorithm::Dijkstra,
        Algorithm::AStar,
        Algorithm::Bfs,
        Algorithm::Dfs,
        Algorithm::BidirectionalDijkstra,
    ];

    /// Canonical lowercase name, accepted back by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            Self::Dijkstra => "dijkstra",
            Self::AStar => "astar",
            Self::Bfs => "bfs",
            Self::Dfs => "dfs",
            Self::BidirectionalDijkstra => "bidirectional",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = ParseAlgorithmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dijkstra" => Ok(Self::Dijkstra),
            "astar" | "a*" => Ok(Self::AStar),
            "bfs" => Ok(Self::Bfs),
            "dfs" => Ok(Self::Dfs),
            "bidirectional" | "bidirectional-dijkstra" => Ok(Self::BidirectionalDijkstra),
            _ => Err(ParseAlgorithmError(s.to_string())),
        }
    }
}

/// Run state of a stepper.
///
/// Both terminal states are ordinary data: an unreachable destination
/// surfaces as [`Exhausted`](Status::Exhausted), never as an error.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Status {
    /// More work remains; keep calling `step`.
    Running,
    /// The destination was reached; path and distance are available.
    Found,
    /// The frontier emptied before the destination was reached.
    Exhausted,
}

impl Status {
    /// Whether the run is over, successfully or not.
    #[inline]
    pub fn is_terminal(self) -> bool {
        self != Status::Running
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Running => "running",
            Self::Found => "path found",
            Self::Exhausted => "unreachable",
        })
    }
}

// ---------------------------------------------------------------------------
// Stepper
// ---------------------------------------------------------------------------

enum StepperKind {
    Dijkstra(DijkstraState),
    AStar(AStarState),
    Bfs(BfsState),
    Dfs(DfsState),
    Bidirectional(BidiState),
}

/// A single search run, advanced one expansion at a time.
pub struct Stepper {
    grid: Grid,
    algorithm: Algorithm,
    start: usize,
    goal: usize,
    status: Status,
    kind: StepperKind,
}

impl Stepper {
    /// Bind `algorithm` to the terrain of `source` and a start/end pair.
    ///
    /// The source grid's obstacle layout is cloned into a freshly built grid
    /// so every run starts from pristine search state; `source` itself is
    /// left untouched. Endpoints outside the grid or on an obstacle fail
    /// with [`SearchError::InvalidCoordinate`]. A run whose endpoints
    /// coincide completes immediately with a single-cell path of length 0.
    pub fn new(
        algorithm: Algorithm,
        source: &Grid,
        start: Point,
        goal: Point,
    ) -> Result<Self, SearchError> {
        let map = source.clone_obstacle_map();
        let mut grid = Grid::with_obstacles(&map);

        let start_idx = grid.idx(start).ok_or(SearchError::InvalidCoordinate(start))?;
        let goal_idx = grid.idx(goal).ok_or(SearchError::InvalidCoordinate(goal))?;
        if grid.cell(start_idx).state == CellState::Obstacle {
            return Err(SearchError::InvalidCoordinate(start));
        }
        if grid.cell(goal_idx).state == CellState::Obstacle {
            return Err(SearchError::InvalidCoordinate(goal));
        }

        grid.init_neighbors();
        grid.cell_mut(start_idx).distance = 0.0;

        let kind = match algorithm {
            Algorithm::Dijkstra => StepperKind::Dijkstra(DijkstraState::new(start_idx)),
            Algorithm::AStar => {
                StepperKind::AStar(AStarState::new(&mut grid, start_idx, goal_idx))
            }
            Algorithm::Bfs => StepperKind::Bfs(BfsState::new(start_idx)),
            Algorithm::Dfs => StepperKind::Dfs(DfsState::new(start_idx)),
            Algorithm::BidirectionalDijkstra => {
                grid.cell_mut(goal_idx).distance = 0.0;
                StepperKind::Bidirectional(BidiState::new(grid.len(), start_idx, goal_idx))
            }
        };

        let status = if start_idx == goal_idx {
            Status::Found
        } else {
            Status::Running
        };

        Ok(Self {
            grid,
            algorithm,
            start: start_idx,
            goal: goal_idx,
            status,
            kind,
        })
    }

    /// The algorithm this stepper runs.
    #[inline]
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// The start coordinate.
    #[inline]
    pub fn start(&self) -> Point {
        self.grid.point(self.start)
    }

    /// The destination coordinate.
    #[inline]
    pub fn goal(&self) -> Point {
        self.grid.point(self.goal)
    }

    /// Perform exactly one unit of work.
    ///
    /// Returns the status after the step. Calling again once the status is
    /// terminal fails with [`SearchError::InvalidState`]; poll
    /// [`is_done`](Stepper::is_done) instead.
    pub fn step(&mut self) -> Result<Status, SearchError> {
        if self.status.is_terminal() {
            return Err(SearchError::InvalidState);
        }

        let status = match &mut self.kind {
            StepperKind::Dijkstra(s) => dijkstra::step(s, &mut self.grid, self.goal),
            StepperKind::AStar(s) => astar::step(s, &mut self.grid, self.goal),
            StepperKind::Bfs(s) => bfs::step(s, &mut self.grid, self.goal),
            StepperKind::Dfs(s) => dfs::step(s, &mut self.grid, self.goal),
            StepperKind::Bidirectional(s) => bidirectional::step(s, &mut self.grid),
        };

        if status.is_terminal() {
            log::debug!(
                "{} terminated: {status} after {} expansions",
                self.algorithm,
                self.expansions()
            );
        } else {
            log::trace!("{}: {} cells visited", self.algorithm, self.expansions());
        }
        self.status = status;
        Ok(status)
    }

    /// Whether the run has terminated (found or exhausted).
    #[inline]
    pub fn is_done(&self) -> bool {
        self.status.is_terminal()
    }

    /// Current run status.
    #[inline]
    pub fn status(&self) -> Status {
        self.status
    }

    /// The start→end path, available once the status is
    /// [`Status::Found`].
    ///
    /// Reconstructed by walking predecessor links from the destination (or
    /// outward from the meeting pair for the bidirectional variant).
    pub fn path(&self) -> Option<Vec<Point>> {
        if self.status != Status::Found {
            return None;
        }
        if self.start == self.goal {
            return Some(vec![self.grid.point(self.start)]);
        }
        match &self.kind {
            StepperKind::Bidirectional(s) => {
                let (fwd, bwd) = s.meeting?;
                let mut path = self.chain_to_root(fwd);
                path.reverse();
                path.extend(self.chain_to_root(bwd));
                Some(path)
            }
            _ => {
                let mut path = self.chain_to_root(self.goal);
                path.reverse();
                Some(path)
            }
        }
    }

    /// Total cost of the found path, available once the status is
    /// [`Status::Found`].
    ///
    /// For BFS/DFS this is the weighted cost along the first-discovered
    /// path, which may exceed the true optimum (see the module docs of those
    /// variants).
    pub fn total_distance(&self) -> Option<f64> {
        if self.status != Status::Found {
            return None;
        }
        if self.start == self.goal {
            return Some(0.0);
        }
        match &self.kind {
            StepperKind::Bidirectional(s) => Some(s.best),
            StepperKind::AStar(_) => Some(self.grid.cell(self.goal).g_cost),
            _ => Some(self.grid.cell(self.goal).distance),
        }
    }

    /// Snapshot of all visited cells, for the renderer.
    pub fn visited(&self) -> Vec<Point> {
        self.grid.visited_cells()
    }

    /// Snapshot of all obstacle cells, for the renderer.
    pub fn obstacles(&self) -> Vec<Point> {
        self.grid.obstacle_cells()
    }

    /// Number of cells visited so far (the expansion statistic).
    pub fn expansions(&self) -> usize {
        self.grid
            .cells()
            .iter()
            .filter(|c| c.state == CellState::Visited)
            .count()
    }

    /// The run's private grid, for read-only inspection between steps.
    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    fn chain_to_root(&self, from: usize) -> Vec<Point> {
        let mut chain = Vec::new();
        let mut cur = Some(from);
        while let Some(i) = cur {
            chain.push(self.grid.point(i));
            cur = self.grid.cell(i).predecessor;
        }
        chain
    }
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn algorithm_round_trip() {
        for algorithm in Algorithm::ALL {
            let json = serde_json::to_string(&algorithm).unwrap();
            let back: Algorithm = serde_json::from_str(&json).unwrap();
            assert_eq!(algorithm, back);
        }
    }

    #[test]
    fn status_round_trip() {
        for status in [Status::Running, Status::Found, Status::Exhausted] {
            let json = serde_json::to_string(&status).unwrap();
            let back: Status = serde_json::from_str(&json).unwrap();
            assert_eq!(status, back);
        }
    }
}
