//! Incrementally steppable shortest-path search on obstacle grids.
//!
//! This crate provides the search half of the `pathtrace` engine: a family
//! of algorithms over `pathtrace-core` grids, each exposing a single-step
//! execution contract so an external driver can render progress between
//! expansions.
//!
//! | Algorithm | Frontier | Distance semantics |
//! |---|---|---|
//! | [`Algorithm::Dijkstra`] | min-heap on distance | optimal |
//! | [`Algorithm::AStar`] | min-heap on `g + h` | optimal (Euclidean heuristic) |
//! | [`Algorithm::Bfs`] | FIFO queue | first-discovery cost (documented divergence) |
//! | [`Algorithm::Dfs`] | LIFO stack | first-discovery cost |
//! | [`Algorithm::BidirectionalDijkstra`] | two alternating min-heaps | optimal |
//!
//! A run is one [`Stepper`]: construct it with an [`Algorithm`], a terrain
//! grid and the endpoints, call [`Stepper::step`] until
//! [`Stepper::is_done`], then read [`Stepper::path`] and
//! [`Stepper::total_distance`]. "No path exists" is the ordinary
//! [`Status::Exhausted`] terminal state, not an error.

mod astar;
mod bfs;
mod bidirectional;
mod cost;
mod dfs;
mod dijkstra;
mod error;
mod frontier;
mod stepper;

pub use cost::{euclidean, step_cost};
pub use error::{ParseAlgorithmError, SearchError};
pub use stepper::{Algorithm, Status, Stepper};
