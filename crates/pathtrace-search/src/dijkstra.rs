//! Dijkstra expansion: min-frontier ordered by settled distance.

use std::collections::BinaryHeap;

use pathtrace_core::{CellState, Grid};

use crate::Status;
use crate::cost::step_cost;
use crate::frontier::FrontierEntry;

pub(crate) struct DijkstraState {
    open: BinaryHeap<FrontierEntry>,
    nbuf: Vec<usize>,
}

impl DijkstraState {
    pub(crate) fn new(start: usize) -> Self {
        let mut open = BinaryHeap::new();
        open.push(FrontierEntry {
            idx: start,
            priority: 0.0,
        });
        Self {
            open,
            nbuf: Vec::with_capacity(8),
        }
    }
}

/// Expand the minimum-distance frontier cell.
pub(crate) fn step(state: &mut DijkstraState, grid: &mut Grid, goal: usize) -> Status {
    // Pop until a live entry turns up; stale pops are not expansions.
    let current = loop {
        let Some(entry) = state.open.pop() else {
            return Status::Exhausted;
        };
        let cell = grid.cell(entry.idx);
        if cell.state == CellState::Visited || entry.priority > cell.distance {
            continue;
        }
        break entry.idx;
    };

    let current_dist = grid.cell(current).distance;
    let current_pos = grid.point(current);

    state.nbuf.clear();
    state.nbuf.extend_from_slice(grid.neighbors(current));

    for &ni in state.nbuf.iter() {
        let neighbor = grid.cell(ni);
        if neighbor.state == CellState::Visited {
            continue;
        }
        let candidate = current_dist + step_cost(current_pos, grid.point(ni));
        if candidate < neighbor.distance {
            let n = grid.cell_mut(ni);
            n.distance = candidate;
            n.predecessor = Some(current);
            state.open.push(FrontierEntry {
                idx: ni,
                priority: candidate,
            });
        }
    }

    grid.cell_mut(current).state = CellState::Visited;
    if current == goal {
        Status::Found
    } else {
        Status::Running
    }
}
