//! ASCII demo driver: carve a maze, run a stepper to completion, print the
//! result.
//!
//! Usage: `pathtrace-demo [algorithm] [seed]` where algorithm is one of
//! dijkstra, astar, bfs, dfs, bidirectional (default dijkstra) and seed is
//! an optional u64 for reproducible mazes.

use std::collections::HashSet;
use std::env;

use rand::rngs::SmallRng;
use rand::{RngExt, SeedableRng};

use pathtrace_core::{Grid, Point};
use pathtrace_maze::MazeGen;
use pathtrace_search::{Algorithm, Status, Stepper};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = env::args().skip(1);
    let algorithm: Algorithm = match args.next() {
        Some(name) => name.parse()?,
        None => Algorithm::Dijkstra,
    };
    let seed: u64 = match args.next() {
        Some(s) => s.parse()?,
        None => rand::rng().random(),
    };

    let mut grid = Grid::default();
    let start = Point::new(0, 0);
    let end = Point::new(grid.width() - 1, grid.height() - 1);

    let carved = MazeGen::new(SmallRng::seed_from_u64(seed)).generate(&mut grid, start, end)?;

    let mut stepper = Stepper::new(algorithm, &grid, start, end)?;
    let mut steps = 0usize;
    while !stepper.is_done() {
        stepper.step()?;
        steps += 1;
    }

    render(&stepper, start, end);

    println!();
    println!("algorithm:  {algorithm}");
    println!("seed:       {seed}");
    println!("carved:     {carved} open cells");
    println!("steps:      {steps}");
    println!("expansions: {}", stepper.expansions());
    match stepper.status() {
        Status::Found => {
            let path = stepper.path().unwrap_or_default();
            let distance = stepper.total_distance().unwrap_or_default();
            println!("status:     path found ({} cells, length {distance:.3})", path.len());
        }
        status => println!("status:     {status}"),
    }
    Ok(())
}

fn render(stepper: &Stepper, start: Point, end: Point) {
    let grid = stepper.grid();
    let obstacles: HashSet<Point> = stepper.obstacles().into_iter().collect();
    let visited: HashSet<Point> = stepper.visited().into_iter().collect();
    let path: HashSet<Point> = stepper.path().unwrap_or_default().into_iter().collect();

    for y in 0..grid.height() {
        let mut line = String::with_capacity(grid.width() as usize);
        for x in 0..grid.width() {
            let p = Point::new(x, y);
            line.push(if p == start {
                'S'
            } else if p == end {
                'E'
            } else if path.contains(&p) {
                '*'
            } else if obstacles.contains(&p) {
                '#'
            } else if visited.contains(&p) {
                'o'
            } else {
                '.'
            });
        }
        println!("{line}");
    }
}
