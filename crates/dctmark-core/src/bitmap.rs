//! Bit box rendering on the working grid.
//!
//! Each payload bit occupies a `box_size`×`box_size` square of the 128×128
//! grid, written in raster (row-major box) order. Recovery averages every box
//! and thresholds at the midpoint, which soaks up the rounding noise of the
//! two transform round trips.

use crate::bits::BitSequence;
use crate::grid::{Grid, GRID_SIZE};

/// Render `bits` as a black/white working grid.
///
/// Cells outside the boxed `(128/box_size)·box_size` area stay zero, as do
/// boxes past the end of `bits`.
pub fn to_bitmap(bits: &BitSequence, box_size: usize) -> Grid {
    let boxes = GRID_SIZE / box_size;
    let mut grid = Grid::working();
    for y in 0..boxes * box_size {
        for x in 0..boxes * box_size {
            let bit = x / box_size + y / box_size * boxes;
            if bit < bits.len() && bits.get(bit) {
                grid.set(y, x, 255);
            }
        }
    }
    grid
}

/// Force every box of the grid to all-255 or all-0 by its own average.
pub fn denoise(grid: &mut Grid, box_size: usize) {
    let boxes = GRID_SIZE / box_size;
    for by in 0..boxes {
        for bx in 0..boxes {
            let value = if box_average(grid, by, bx, box_size) > 127 {
                255
            } else {
                0
            };
            for y in by * box_size..(by + 1) * box_size {
                for x in bx * box_size..(bx + 1) * box_size {
                    grid.set(y, x, value);
                }
            }
        }
    }
}

/// Read one bit per box in raster order, truncated to `total_bits`.
///
/// A box counts as a one bit when its average exceeds the midpoint, so the
/// grid does not need a prior [`denoise`] pass.
pub fn from_bitmap(grid: &Grid, box_size: usize, total_bits: usize) -> BitSequence {
    let boxes = GRID_SIZE / box_size;
    let mut bits = BitSequence::new();
    'boxes: for by in 0..boxes {
        for bx in 0..boxes {
            if bits.len() == total_bits {
                break 'boxes;
            }
            bits.add_bit(box_average(grid, by, bx, box_size) > 127);
        }
    }
    bits
}

fn box_average(grid: &Grid, by: usize, bx: usize, box_size: usize) -> i32 {
    let mut sum = 0i64;
    for y in by * box_size..(by + 1) * box_size {
        for x in bx * box_size..(bx + 1) * box_size {
            sum += i64::from(grid.get(y, x));
        }
    }
    (sum / (box_size * box_size) as i64) as i32
}
