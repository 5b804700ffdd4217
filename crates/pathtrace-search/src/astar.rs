//! A* expansion: min-frontier ordered by `f = g + h`.
//!
//! Identical to the Dijkstra skeleton except for the priority: relaxation
//! updates `g` and recomputes `f`; `h` stays fixed from construction. With
//! the Euclidean heuristic (admissible and consistent for the √2/1 cost
//! table) the first pop of the goal is optimal.

use std::collections::BinaryHeap;

use pathtrace_core::{CellState, Grid};

use crate::Status;
use crate::cost::{euclidean, step_cost};
use crate::frontier::FrontierEntry;

pub(crate) struct AStarState {
    open: BinaryHeap<FrontierEntry>,
    nbuf: Vec<usize>,
}

impl AStarState {
    /// Seed the frontier and fix every traversable cell's heuristic cost.
    pub(crate) fn new(grid: &mut Grid, start: usize, goal: usize) -> Self {
        let goal_pos = grid.point(goal);
        for idx in 0..grid.len() {
            let pos = grid.point(idx);
            let cell = grid.cell_mut(idx);
            if cell.state == CellState::Obstacle {
                continue;
            }
            cell.h_cost = euclidean(pos, goal_pos);
        }
        // h(goal) is exactly zero, so the goal's settled f equals its g.
        let start_cell = grid.cell_mut(start);
        start_cell.g_cost = 0.0;
        start_cell.distance = start_cell.h_cost;

        let mut open = BinaryHeap::new();
        open.push(FrontierEntry {
            idx: start,
            priority: grid.cell(start).distance,
        });
        Self {
            open,
            nbuf: Vec::with_capacity(8),
        }
    }
}

/// Expand the minimum-`f` frontier cell.
pub(crate) fn step(state: &mut AStarState, grid: &mut Grid, goal: usize) -> Status {
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

    let current_g = grid.cell(current).g_cost;
    let current_pos = grid.point(current);

    state.nbuf.clear();
    state.nbuf.extend_from_slice(grid.neighbors(current));

    for &ni in state.nbuf.iter() {
        let neighbor = grid.cell(ni);
        if neighbor.state == CellState::Visited {
            continue;
        }
        let tentative_g = current_g + step_cost(current_pos, grid.point(ni));
        if tentative_g < neighbor.g_cost {
            let n = grid.cell_mut(ni);
            n.g_cost = tentative_g;
            n.distance = n.f_cost();
            n.predecessor = Some(current);
            state.open.push(FrontierEntry {
                idx: ni,
                priority: tentative_g + n.h_cost,
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
