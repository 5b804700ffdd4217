//! Breadth-first expansion: FIFO frontier, first-discovery settlement.
//!
//! Distance, predecessor and the `Visited` mark are written once, at first
//! discovery, and never relaxed. Expansion order is plain FIFO while edge
//! costs are not uniform (diagonal √2 vs orthogonal 1), so the reported
//! distance is the weighted cost along the *first-discovered* path — not
//! necessarily the minimum when diagonal shortcuts exist. This divergence
//! from Dijkstra/A* is deliberate, preserved behaviour.

use std::collections::VecDeque;

use pathtrace_core::{CellState, Grid};

use crate::Status;
use crate::cost::step_cost;

pub(crate) struct BfsState {
    queue: VecDeque<usize>,
    nbuf: Vec<usize>,
}

impl BfsState {
    pub(crate) fn new(start: usize) -> Self {
        let mut queue = VecDeque::new();
        queue.push_back(start);
        Self {
            queue,
            nbuf: Vec::with_capacity(8),
        }
    }
}

/// Expand the front of the queue.
pub(crate) fn step(state: &mut BfsState, grid: &mut Grid, goal: usize) -> Status {
    let Some(current) = state.queue.pop_front() else {
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
        state.queue.push_back(ni);
    }

    grid.cell_mut(current).state = CellState::Visited;
    if grid.cell(goal).state == CellState::Visited {
        Status::Found
    } else {
        Status::Running
    }
}
