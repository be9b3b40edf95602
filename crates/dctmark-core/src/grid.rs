//! Integer sample planes.
//!
//! [`Grid`] backs both the 128×128 watermark working grid and the carrier
//! brightness plane, stored row-major as `i32` so frequency-domain values
//! can go negative without a separate type.

/// Side length of the square watermark working grid.
pub const GRID_SIZE: usize = 128;

/// Number of cells in the working grid, the domain of both keyed permutations.
pub const GRID_CELLS: usize = GRID_SIZE * GRID_SIZE;

/// A rectangular plane of `i32` samples in row-major order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<i32>,
}

impl Grid {
    /// Create a zeroed plane.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![0; width * height],
        }
    }

    /// Create the square 128×128 working grid.
    pub fn working() -> Self {
        Self::new(GRID_SIZE, GRID_SIZE)
    }

    /// Rebuild a plane from its row-major cells.
    ///
    /// # Panics
    /// Panics if `cells.len() != width * height`.
    pub fn from_cells(width: usize, height: usize, cells: Vec<i32>) -> Self {
        assert_eq!(cells.len(), width * height);
        Self {
            width,
            height,
            cells,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, y: usize, x: usize) -> i32 {
        self.cells[y * self.width + x]
    }

    pub fn set(&mut self, y: usize, x: usize, value: i32) {
        self.cells[y * self.width + x] = value;
    }

    /// Row-major view of all cells.
    pub fn cells(&self) -> &[i32] {
        &self.cells
    }

    /// Copy the n×n block whose top-left corner is (`y`, `x`) into `block`.
    pub fn read_block(&self, y: usize, x: usize, n: usize, block: &mut [i32]) {
        debug_assert_eq!(block.len(), n * n);
        for i in 0..n {
            let row = (y + i) * self.width + x;
            block[i * n..(i + 1) * n].copy_from_slice(&self.cells[row..row + n]);
        }
    }

    /// Write `block` back to the n×n region whose top-left corner is (`y`, `x`).
    pub fn write_block(&mut self, y: usize, x: usize, n: usize, block: &[i32]) {
        debug_assert_eq!(block.len(), n * n);
        for i in 0..n {
            let row = (y + i) * self.width + x;
            self.cells[row..row + n].copy_from_slice(&block[i * n..(i + 1) * n]);
        }
    }
}
