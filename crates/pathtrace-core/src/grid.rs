//! Obstacle grid and per-cell search state.
//!
//! [`Grid`] owns a dense, row-major arena of [`Cell`]s. Cells reference each
//! other exclusively through arena indices (`usize`): predecessor pointers
//! and neighbour lists are indices, never live references, so search state
//! stays free of aliasing hazards.
//!
//! Terrain and search state have different lifetimes: obstacles are fixed
//! input to a run, everything else resets per run. [`Grid::clone_obstacle_map`]
//! and [`Grid::with_obstacles`] transplant a terrain layout into a freshly
//! constructed grid for that purpose.

use std::fmt;

use crate::geom::Point;

/// Default grid width.
pub const DEFAULT_WIDTH: i32 = 30;
/// Default grid height.
pub const DEFAULT_HEIGHT: i32 = 30;

// ---------------------------------------------------------------------------
// CellState / Cell
// ---------------------------------------------------------------------------

/// Search status of a single cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellState {
    /// Not yet settled by a search.
    #[default]
    Unvisited,
    /// Settled. A cell never leaves this state within one run.
    Visited,
    /// Impassable terrain. Never appears in a neighbour list.
    Obstacle,
}

/// One grid position's search state.
///
/// Carries the superset of fields every algorithm needs: plain searches use
/// `distance` and `predecessor`; heuristic search additionally uses `g_cost`
/// and `h_cost` (`f = g + h` is derived, and mirrored into `distance` so the
/// frontier ordering is uniform).
#[derive(Clone, Debug)]
pub struct Cell {
    pos: Point,
    /// Visitation status.
    pub state: CellState,
    /// Best known cost from the search root; `f64::INFINITY` until discovered.
    pub distance: f64,
    /// Arena index of the cell this one was reached from.
    pub predecessor: Option<usize>,
    /// Cost from the root along the best known path (heuristic search only).
    pub g_cost: f64,
    /// Heuristic estimate to the goal, fixed at stepper construction.
    pub h_cost: f64,
    neighbors: Vec<usize>,
}

impl Cell {
    fn new(pos: Point) -> Self {
        Self {
            pos,
            state: CellState::Unvisited,
            distance: f64::INFINITY,
            predecessor: None,
            g_cost: f64::INFINITY,
            h_cost: 0.0,
            neighbors: Vec::new(),
        }
    }

    /// The cell's grid coordinate.
    #[inline]
    pub fn pos(&self) -> Point {
        self.pos
    }

    /// Combined priority `g + h` used by heuristic search.
    #[inline]
    pub fn f_cost(&self) -> f64 {
        self.g_cost + self.h_cost
    }

    /// Arena indices of the traversable neighbours, populated by
    /// [`Grid::init_neighbors`].
    #[inline]
    pub fn neighbors(&self) -> &[usize] {
        &self.neighbors
    }

    fn reset_search_state(&mut self) {
        if self.state != CellState::Obstacle {
            self.state = CellState::Unvisited;
        }
        self.distance = f64::INFINITY;
        self.predecessor = None;
        self.g_cost = f64::INFINITY;
        self.h_cost = 0.0;
        self.neighbors.clear();
    }
}

// ---------------------------------------------------------------------------
// ObstacleMap
// ---------------------------------------------------------------------------

/// A clonable obstacle bitmap, detached from any grid.
///
/// Used to transplant one terrain layout into a freshly constructed [`Grid`]
/// when a run needs fresh search state over identical terrain.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObstacleMap {
    width: i32,
    height: i32,
    cells: Vec<bool>,
}

impl ObstacleMap {
    /// Create an all-clear map of the given size.
    pub fn new(width: i32, height: i32) -> Self {
        let w = width.max(0);
        let h = height.max(0);
        Self {
            width: w,
            height: h,
            cells: vec![false; (w * h) as usize],
        }
    }

    /// Map width.
    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Map height.
    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Whether `p` lies inside the map.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= 0 && p.x < self.width && p.y >= 0 && p.y < self.height
    }

    #[inline]
    fn idx(&self, p: Point) -> Option<usize> {
        if !self.contains(p) {
            return None;
        }
        Some((p.y * self.width + p.x) as usize)
    }

    /// Whether `p` is marked as an obstacle. Out-of-map positions read as
    /// obstacles.
    #[inline]
    pub fn is_obstacle(&self, p: Point) -> bool {
        match self.idx(p) {
            Some(i) => self.cells[i],
            None => true,
        }
    }

    /// Mark or clear an obstacle. Does nothing out of bounds.
    pub fn set(&mut self, p: Point, obstacle: bool) {
        if let Some(i) = self.idx(p) {
            self.cells[i] = obstacle;
        }
    }

    /// Mark every cell as an obstacle or clear them all.
    pub fn fill(&mut self, obstacle: bool) {
        self.cells.fill(obstacle);
    }

    /// Number of obstacle cells.
    pub fn obstacle_count(&self) -> usize {
        self.cells.iter().filter(|&&o| o).count()
    }
}

// ---------------------------------------------------------------------------
// Grid
// ---------------------------------------------------------------------------

/// A fixed-size obstacle grid with per-cell search state.
#[derive(Clone, Debug)]
pub struct Grid {
    width: i32,
    height: i32,
    cells: Vec<Cell>,
    neighbors_ready: bool,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }
}

impl Grid {
    /// Create an obstacle-free grid of the given size.
    pub fn new(width: i32, height: i32) -> Self {
        let w = width.max(0);
        let h = height.max(0);
        let mut cells = Vec::with_capacity((w * h) as usize);
        for y in 0..h {
            for x in 0..w {
                cells.push(Cell::new(Point::new(x, y)));
            }
        }
        Self {
            width: w,
            height: h,
            cells,
            neighbors_ready: false,
        }
    }

    /// Create a grid with the terrain of an [`ObstacleMap`] and fresh search
    /// state everywhere.
    pub fn with_obstacles(map: &ObstacleMap) -> Self {
        let mut grid = Self::new(map.width(), map.height());
        for cell in grid.cells.iter_mut() {
            if map.is_obstacle(cell.pos) {
                cell.state = CellState::Obstacle;
            }
        }
        grid
    }

    /// Grid width.
    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Grid height.
    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the grid has no cells.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Whether `(x, y)` lies outside the grid.
    #[inline]
    pub fn is_out_of_bounds(&self, x: i32, y: i32) -> bool {
        x < 0 || x >= self.width || y < 0 || y >= self.height
    }

    /// Whether `p` lies inside the grid.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        !self.is_out_of_bounds(p.x, p.y)
    }

    /// Convert a point to its arena index. `None` if out of bounds.
    #[inline]
    pub fn idx(&self, p: Point) -> Option<usize> {
        if !self.contains(p) {
            return None;
        }
        Some((p.y * self.width + p.x) as usize)
    }

    /// Convert an arena index back to its point.
    #[inline]
    pub fn point(&self, idx: usize) -> Point {
        let w = self.width as usize;
        Point::new((idx % w) as i32, (idx / w) as i32)
    }

    /// The cell at `p`, or `None` if `p` is out of bounds.
    pub fn cell_at(&self, p: Point) -> Option<&Cell> {
        self.idx(p).map(|i| &self.cells[i])
    }

    /// The cell at an arena index.
    #[inline]
    pub fn cell(&self, idx: usize) -> &Cell {
        &self.cells[idx]
    }

    /// Mutable access to the cell at an arena index.
    #[inline]
    pub fn cell_mut(&mut self, idx: usize) -> &mut Cell {
        &mut self.cells[idx]
    }

    /// All cells, in row-major order.
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Whether neighbour lists have been computed for the current terrain.
    #[inline]
    pub fn neighbors_ready(&self) -> bool {
        self.neighbors_ready
    }

    /// Mark `p` as an obstacle.
    ///
    /// Obstacles are input to a run and must be finalized before
    /// [`init_neighbors`](Self::init_neighbors); mutating them afterwards
    /// fails with [`GridError::ObstaclesFrozen`].
    pub fn mark_obstacle(&mut self, p: Point) -> Result<(), GridError> {
        if self.neighbors_ready {
            return Err(GridError::ObstaclesFrozen);
        }
        let idx = self
            .idx(p)
            .ok_or(GridError::OutOfBounds { x: p.x, y: p.y })?;
        self.cells[idx].state = CellState::Obstacle;
        Ok(())
    }

    /// Replace the grid's entire terrain with the layout of `map`.
    pub fn set_obstacles(&mut self, map: &ObstacleMap) -> Result<(), GridError> {
        if self.neighbors_ready {
            return Err(GridError::ObstaclesFrozen);
        }
        if map.width() != self.width || map.height() != self.height {
            return Err(GridError::SizeMismatch {
                expected: (self.width, self.height),
                got: (map.width(), map.height()),
            });
        }
        for cell in self.cells.iter_mut() {
            cell.state = if map.is_obstacle(cell.pos) {
                CellState::Obstacle
            } else if cell.state == CellState::Obstacle {
                CellState::Unvisited
            } else {
                cell.state
            };
        }
        Ok(())
    }

    /// Compute the 8-connected neighbour list of every traversable cell.
    ///
    /// Neighbour lists exclude out-of-bounds positions, the cell itself and
    /// obstacle cells. Call exactly once per run, after the terrain is
    /// finalized and before any traversal; a repeat call or a call on an
    /// empty grid is a silent no-op.
    pub fn init_neighbors(&mut self) {
        if self.cells.is_empty() || self.neighbors_ready {
            return;
        }
        let mut lists: Vec<Vec<usize>> = Vec::with_capacity(self.cells.len());
        for cell in self.cells.iter() {
            if cell.state == CellState::Obstacle {
                lists.push(Vec::new());
                continue;
            }
            let mut list = Vec::with_capacity(8);
            for n in cell.pos.neighbors_8() {
                if let Some(ni) = self.idx(n) {
                    if self.cells[ni].state != CellState::Obstacle {
                        list.push(ni);
                    }
                }
            }
            lists.push(list);
        }
        for (cell, list) in self.cells.iter_mut().zip(lists) {
            cell.neighbors = list;
        }
        self.neighbors_ready = true;
    }

    /// Arena indices of the traversable neighbours of `idx`.
    #[inline]
    pub fn neighbors(&self, idx: usize) -> &[usize] {
        &self.cells[idx].neighbors
    }

    /// Snapshot of the current terrain as a detached bitmap.
    pub fn clone_obstacle_map(&self) -> ObstacleMap {
        let mut map = ObstacleMap::new(self.width, self.height);
        for cell in self.cells.iter() {
            if cell.state == CellState::Obstacle {
                map.set(cell.pos, true);
            }
        }
        map
    }

    /// Positions of all obstacle cells, in row-major order.
    pub fn obstacle_cells(&self) -> Vec<Point> {
        self.cells
            .iter()
            .filter(|c| c.state == CellState::Obstacle)
            .map(|c| c.pos)
            .collect()
    }

    /// Positions of all visited cells, in row-major order.
    pub fn visited_cells(&self) -> Vec<Point> {
        self.cells
            .iter()
            .filter(|c| c.state == CellState::Visited)
            .map(|c| c.pos)
            .collect()
    }

    /// Reset every cell's search state, keeping the terrain.
    ///
    /// Neighbour lists are dropped as well, so terrain may be edited again
    /// and [`init_neighbors`](Self::init_neighbors) re-run for the next run.
    pub fn reset_search_state(&mut self) {
        for cell in self.cells.iter_mut() {
            cell.reset_search_state();
        }
        self.neighbors_ready = false;
    }
}

// ---------------------------------------------------------------------------
// GridError
// ---------------------------------------------------------------------------

/// Errors from terrain mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// The coordinate lies outside the grid.
    OutOfBounds { x: i32, y: i32 },
    /// Neighbour lists were already computed; the terrain is frozen for this
    /// run. Reset the search state (or build a new grid) to edit it.
    ObstaclesFrozen,
    /// An obstacle map of a different size was applied to the grid.
    SizeMismatch {
        expected: (i32, i32),
        got: (i32, i32),
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds { x, y } => write!(f, "coordinate ({x}, {y}) is out of bounds"),
            Self::ObstaclesFrozen => {
                write!(f, "terrain is frozen: neighbour lists already computed")
            }
            Self::SizeMismatch { expected, got } => write!(
                f,
                "obstacle map is {}x{} but the grid is {}x{}",
                got.0, got.1, expected.0, expected.1
            ),
        }
    }
}

impl std::error::Error for GridError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_round_trip() {
        let g = Grid::new(7, 5);
        for idx in 0..g.len() {
            let p = g.point(idx);
            assert_eq!(g.idx(p), Some(idx));
        }
        assert_eq!(g.idx(Point::new(7, 0)), None);
        assert_eq!(g.idx(Point::new(0, 5)), None);
        assert_eq!(g.idx(Point::new(-1, 0)), None);
    }

    #[test]
    fn cell_at_bounds() {
        let g = Grid::new(4, 4);
        let cell = g.cell_at(Point::new(3, 2)).unwrap();
        assert_eq!(cell.pos(), Point::new(3, 2));
        assert_eq!(cell.state, CellState::Unvisited);
        assert!(g.cell_at(Point::new(4, 2)).is_none());
    }

    #[test]
    fn default_grid_is_30_by_30() {
        let g = Grid::default();
        assert_eq!(g.width(), 30);
        assert_eq!(g.height(), 30);
        assert_eq!(g.len(), 900);
    }

    #[test]
    fn neighbor_lists_exclude_bounds_self_and_obstacles() {
        let mut g = Grid::new(5, 5);
        g.mark_obstacle(Point::new(1, 1)).unwrap();
        g.init_neighbors();

        for idx in 0..g.len() {
            let cell = g.cell(idx);
            for &ni in cell.neighbors() {
                assert_ne!(ni, idx);
                let n = g.cell(ni);
                assert!(g.contains(n.pos()));
                assert_ne!(n.state, CellState::Obstacle);
            }
        }
        // Corner cell has 3 in-bounds neighbours, one of which is the obstacle.
        let corner = g.idx(Point::new(0, 0)).unwrap();
        assert_eq!(g.neighbors(corner).len(), 2);
        // Obstacles get no neighbour list at all.
        let obstacle = g.idx(Point::new(1, 1)).unwrap();
        assert!(g.neighbors(obstacle).is_empty());
    }

    #[test]
    fn interior_cell_has_eight_neighbors() {
        let mut g = Grid::new(5, 5);
        g.init_neighbors();
        let center = g.idx(Point::new(2, 2)).unwrap();
        assert_eq!(g.neighbors(center).len(), 8);
    }

    #[test]
    fn obstacle_mutation_after_init_is_rejected() {
        let mut g = Grid::new(4, 4);
        g.init_neighbors();
        assert_eq!(
            g.mark_obstacle(Point::new(1, 1)),
            Err(GridError::ObstaclesFrozen)
        );
        // Resetting search state unfreezes the terrain.
        g.reset_search_state();
        assert!(g.mark_obstacle(Point::new(1, 1)).is_ok());
    }

    #[test]
    fn mark_obstacle_out_of_bounds() {
        let mut g = Grid::new(4, 4);
        assert_eq!(
            g.mark_obstacle(Point::new(9, 0)),
            Err(GridError::OutOfBounds { x: 9, y: 0 })
        );
    }

    #[test]
    fn obstacle_map_round_trip() {
        let mut g = Grid::new(6, 4);
        g.mark_obstacle(Point::new(2, 1)).unwrap();
        g.mark_obstacle(Point::new(5, 3)).unwrap();

        let map = g.clone_obstacle_map();
        assert_eq!(map.obstacle_count(), 2);
        assert!(map.is_obstacle(Point::new(2, 1)));
        assert!(!map.is_obstacle(Point::new(0, 0)));
        // Out-of-map positions read as obstacles.
        assert!(map.is_obstacle(Point::new(-1, 0)));

        let g2 = Grid::with_obstacles(&map);
        assert_eq!(g2.obstacle_cells(), g.obstacle_cells());
        // Transplanted grid has fresh search state.
        assert!(g2.cells().iter().all(|c| c.predecessor.is_none()));
    }

    #[test]
    fn set_obstacles_replaces_terrain() {
        let mut g = Grid::new(3, 3);
        g.mark_obstacle(Point::new(0, 0)).unwrap();

        let mut map = ObstacleMap::new(3, 3);
        map.set(Point::new(2, 2), true);
        g.set_obstacles(&map).unwrap();

        assert_eq!(g.obstacle_cells(), vec![Point::new(2, 2)]);

        let wrong = ObstacleMap::new(4, 3);
        assert!(matches!(
            g.set_obstacles(&wrong),
            Err(GridError::SizeMismatch { .. })
        ));
    }

    #[test]
    fn reset_keeps_obstacles_and_clears_search_state() {
        let mut g = Grid::new(3, 3);
        g.mark_obstacle(Point::new(1, 1)).unwrap();
        g.init_neighbors();

        let idx = g.idx(Point::new(0, 0)).unwrap();
        g.cell_mut(idx).state = CellState::Visited;
        g.cell_mut(idx).distance = 3.0;
        g.cell_mut(idx).predecessor = Some(1);

        g.reset_search_state();
        let cell = g.cell(idx);
        assert_eq!(cell.state, CellState::Unvisited);
        assert!(cell.distance.is_infinite());
        assert_eq!(cell.predecessor, None);
        assert!(cell.neighbors().is_empty());
        assert_eq!(g.obstacle_cells(), vec![Point::new(1, 1)]);
        assert!(!g.neighbors_ready());
    }

    #[test]
    fn visited_snapshot() {
        let mut g = Grid::new(3, 3);
        let a = g.idx(Point::new(1, 0)).unwrap();
        let b = g.idx(Point::new(2, 2)).unwrap();
        g.cell_mut(a).state = CellState::Visited;
        g.cell_mut(b).state = CellState::Visited;
        assert_eq!(g.visited_cells(), vec![Point::new(1, 0), Point::new(2, 2)]);
    }

    #[test]
    fn empty_grid_init_neighbors_is_a_noop() {
        let mut g = Grid::new(0, 0);
        g.init_neighbors();
        assert!(g.is_empty());
        assert!(!g.neighbors_ready());
    }
}
