//! Bidirectional Dijkstra: two frontiers advancing from both endpoints.
//!
//! A forward search from the start and a backward search from the end each
//! run ordinary Dijkstra expansion, strictly alternating one expansion per
//! `step`. Every cell belongs to at most one side: expansion never relaxes a
//! cell the opposite side has touched — instead the touch is a *clash*, a
//! candidate connection `dist(u) + dist(v) + step_cost(u, v)` that updates
//! the best known total and records the meeting pair. Once the two frontier
//! minima sum to at least the best total, no better connection can exist and
//! the search terminates.
//!
//! Open/closed membership is tracked with per-cell flag vectors, so clash
//! detection and stale-entry pruning are O(1) per cell.

use std::collections::BinaryHeap;

use pathtrace_core::{CellState, Grid};

use crate::Status;
use crate::cost::step_cost;
use crate::frontier::FrontierEntry;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Side {
    Forward,
    Backward,
}

impl Side {
    fn flip(self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
        }
    }
}

/// One direction's frontier and membership flags.
struct SideState {
    open: BinaryHeap<FrontierEntry>,
    in_open: Vec<bool>,
    closed: Vec<bool>,
}

impl SideState {
    fn new(len: usize, root: usize) -> Self {
        let mut open = BinaryHeap::new();
        open.push(FrontierEntry {
            idx: root,
            priority: 0.0,
        });
        let mut in_open = vec![false; len];
        in_open[root] = true;
        Self {
            open,
            in_open,
            closed: vec![false; len],
        }
    }

    /// Drop stale heap entries so the top, if any, is authoritative.
    fn prune(&mut self, grid: &Grid) {
        while let Some(&e) = self.open.peek() {
            if self.in_open[e.idx] && e.priority <= grid.cell(e.idx).distance {
                break;
            }
            self.open.pop();
        }
    }
}

pub(crate) struct BidiState {
    forward: SideState,
    backward: SideState,
    side: Side,
    /// Best known total length of a connected start→end path.
    pub(crate) best: f64,
    /// Meeting pair behind `best`: (forward-side cell, backward-side cell).
    pub(crate) meeting: Option<(usize, usize)>,
    nbuf: Vec<usize>,
}

impl BidiState {
    /// Both roots must already hold distance 0 in the grid.
    pub(crate) fn new(len: usize, start: usize, goal: usize) -> Self {
        Self {
            forward: SideState::new(len, start),
            backward: SideState::new(len, goal),
            side: Side::Forward,
            best: f64::INFINITY,
            meeting: None,
            nbuf: Vec::with_capacity(8),
        }
    }
}

/// Perform one half-step: a single expansion on the side whose turn it is,
/// or a terminal transition if the termination inequality holds.
pub(crate) fn step(state: &mut BidiState, grid: &mut Grid) -> Status {
    state.forward.prune(grid);
    state.backward.prune(grid);

    let (Some(fmin), Some(bmin)) = (
        state.forward.open.peek().map(|e| e.priority),
        state.backward.open.peek().map(|e| e.priority),
    ) else {
        // A frontier ran dry. With a meeting on record every remaining
        // candidate is worse than `best`, so the connection stands; without
        // one the endpoints lie in different components.
        return if state.meeting.is_some() {
            Status::Found
        } else {
            Status::Exhausted
        };
    };

    if fmin + bmin >= state.best {
        return Status::Found;
    }

    match state.side {
        Side::Forward => expand(
            grid,
            &mut state.forward,
            &state.backward,
            &mut state.best,
            &mut state.meeting,
            &mut state.nbuf,
            true,
        ),
        Side::Backward => expand(
            grid,
            &mut state.backward,
            &state.forward,
            &mut state.best,
            &mut state.meeting,
            &mut state.nbuf,
            false,
        ),
    }
    state.side = state.side.flip();
    Status::Running
}

fn expand(
    grid: &mut Grid,
    own: &mut SideState,
    opp: &SideState,
    best: &mut f64,
    meeting: &mut Option<(usize, usize)>,
    nbuf: &mut Vec<usize>,
    forward: bool,
) {
    let Some(entry) = own.open.pop() else {
        return;
    };
    let u = entry.idx;
    own.in_open[u] = false;

    let u_dist = grid.cell(u).distance;
    let u_pos = grid.point(u);

    nbuf.clear();
    nbuf.extend_from_slice(grid.neighbors(u));

    for &vi in nbuf.iter() {
        // The other side touched this cell: candidate connection, never a
        // relaxation (each cell's distance belongs to exactly one side).
        if opp.closed[vi] || opp.in_open[vi] {
            let v = grid.cell(vi);
            let candidate = u_dist + v.distance + step_cost(u_pos, v.pos());
            if candidate < *best {
                *best = candidate;
                *meeting = Some(if forward { (u, vi) } else { (vi, u) });
            }
            continue;
        }
        if grid.cell(vi).state == CellState::Visited {
            continue;
        }
        let candidate = u_dist + step_cost(u_pos, grid.point(vi));
        if candidate < grid.cell(vi).distance {
            let v = grid.cell_mut(vi);
            v.distance = candidate;
            v.predecessor = Some(u);
            own.open.push(FrontierEntry {
                idx: vi,
                priority: candidate,
            });
            own.in_open[vi] = true;
        }
    }

    grid.cell_mut(u).state = CellState::Visited;
    own.closed[u] = true;
}
