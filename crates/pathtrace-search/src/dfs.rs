//! Depth-first expansion: LIFO twin of the BFS stepper.
//!
//! Shares the first-discovery settlement semantics of the BFS variant —
//! and the same caveat, amplified: stack order strays even further from
//! shortest-path order, so the reported distance is simply the cost of
//! whatever path discovered the cell first.

use pathtrace_core::{CellState, Grid};

use crate::Status;
use crate::cost::step_cost;

pub(crate) struct DfsState {
    stack: Vec<usize>,
    nbuf: Vec<usize>,
}

impl DfsState {
    pub(crate) fn new(start: usize) -> Self {
        Self {
            stack: vec![start],
            nbuf: Vec::with_capacity(8),
        }
    }
}

/// Expand the top of the stack.
pub(crate) fn step(state: &mut DfsState, grid: &mut Grid, goal: usize) -> Status {
    let Some(current) = state.stack.pop() else {
        return Status::Exhausted;
    };

    let current_dist = grid.cell(current).distance;
    let current_pos = grid.point(current);

    state.nbuf.clear();
    state.nbuf.extend_from_slice(grid.neighbors(current));

    for &ni in state.nbuf.iter() {
        if grid.cell(ni).state != CellState::Unvisited {
            continue;
        }
        let cost = step_cost(current_pos, grid.point(ni));
        let n = grid.cell_mut(ni);
        n.distance = current_dist + cost;
        n.predecessor = Some(current);
        n.state = CellState::Visited;
        state.stack.push(ni);
    }

    grid.cell_mut(current).state = CellState::Visited;
    if grid.cell(goal).state == CellState::Visited {
        Status::Found
    } else {
        Status::Running
    }
}
