//! Diagonal (zig-zag) serialization of the working grid.
//!
//! The classic JPEG zig-zag order generalized to the 128-sided grid: start at
//! (0,0), walk anti-diagonals, reverse direction at every grid edge, finish at
//! (127,127). [`linearize`] and [`delinearize`] are exact inverses.

use std::sync::OnceLock;

use crate::grid::{Grid, GRID_CELLS, GRID_SIZE};

/// The zig-zag traversal of an n×n grid as row-major cell indices.
///
/// The walk has four turning cases: leaving via row 0 or the last column while
/// moving up-right, and leaving via column 0 or the last row while moving
/// down-left.
pub fn scan_order(n: usize) -> Vec<usize> {
    let mut order = Vec::with_capacity(n * n);
    let mut row = 0usize;
    let mut col = 0usize;
    let mut upward = true;
    for _ in 0..n * n {
        order.push(row * n + col);
        if upward {
            if col == n - 1 {
                row += 1;
                upward = false;
            } else if row == 0 {
                col += 1;
                upward = false;
            } else {
                row -= 1;
                col += 1;
            }
        } else if row == n - 1 {
            col += 1;
            upward = true;
        } else if col == 0 {
            row += 1;
            upward = true;
        } else {
            row += 1;
            col -= 1;
        }
    }
    order
}

fn working_order() -> &'static [usize] {
    static ORDER: OnceLock<Vec<usize>> = OnceLock::new();
    ORDER.get_or_init(|| scan_order(GRID_SIZE))
}

/// Serialize the 128×128 working grid into its 16384-element diagonal stream.
pub fn linearize(grid: &Grid) -> Vec<i32> {
    debug_assert_eq!(grid.cells().len(), GRID_CELLS);
    let cells = grid.cells();
    working_order().iter().map(|&i| cells[i]).collect()
}

/// Rebuild the 128×128 working grid from a diagonal stream.
///
/// Streams shorter than 16384 fill the remaining tail with zeros; this is how
/// a carrier too small to hold the full coefficient field extracts.
pub fn delinearize(stream: &[i32]) -> Grid {
    let mut cells = vec![0i32; GRID_CELLS];
    for (&value, &cell) in stream.iter().zip(working_order().iter()) {
        cells[cell] = value;
    }
    Grid::from_cells(GRID_SIZE, GRID_SIZE, cells)
}
