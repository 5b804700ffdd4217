//! Core grid model for step-by-step pathfinding.
//!
//! This crate provides the terrain and search-state model shared by the
//! `pathtrace` engine:
//!
//! - [`Point`] — immutable integer grid coordinates
//! - [`Grid`] / [`Cell`] — a dense, index-addressed arena of per-cell search
//!   state over a fixed-size obstacle grid
//! - [`ObstacleMap`] — a detached terrain bitmap for transplanting a layout
//!   into a fresh grid between runs
//!
//! Search algorithms live in `pathtrace-search`; maze generation in
//! `pathtrace-maze`.

mod geom;
mod grid;

pub use geom::Point;
pub use grid::{Cell, CellState, DEFAULT_HEIGHT, DEFAULT_WIDTH, Grid, GridError, ObstacleMap};
