//! Dense row-major 2D storage shared by vector fields and altitude matrices.

/// A `height x width` matrix stored row-major, indexed `(row, col)`.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    cells: Vec<T>,
}

impl<T: Clone> Grid<T> {
    /// Create a grid with every cell set to `value`.
    pub fn filled(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            cells: vec![value; width * height],
        }
    }
}

impl<T> Grid<T> {
    /// Build a grid by calling `f(row, col)` for every cell in row-major order.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut cells = Vec::with_capacity(width * height);
        for row in 0..height {
            for col in 0..width {
                cells.push(f(row, col));
            }
        }
        Self {
            width,
            height,
            cells,
        }
    }

    /// Wrap an existing row-major buffer. Returns `None` if the length does not match.
    pub fn from_cells(width: usize, height: usize, cells: Vec<T>) -> Option<Self> {
        (cells.len() == width * height).then_some(Self {
            width,
            height,
            cells,
        })
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns `(width, height)`.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Cell at `(row, col)`, or `None` when out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        if row < self.height && col < self.width {
            self.cells.get(row * self.width + col)
        } else {
            None
        }
    }

    /// Mutable cell at `(row, col)`, or `None` when out of bounds.
    pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut T> {
        if row < self.height && col < self.width {
            self.cells.get_mut(row * self.width + col)
        } else {
            None
        }
    }

    /// One full row.
    ///
    /// # Panics
    ///
    /// Panics if `row >= height`.
    pub fn row(&self, row: usize) -> &[T] {
        let start = row * self.width;
        &self.cells[start..start + self.width]
    }

    /// Mutable access to one full row.
    ///
    /// # Panics
    ///
    /// Panics if `row >= height`.
    pub fn row_mut(&mut self, row: usize) -> &mut [T] {
        let start = row * self.width;
        &mut self.cells[start..start + self.width]
    }

    /// Iterate over one column from top to bottom.
    pub fn column(&self, col: usize) -> impl Iterator<Item = &T> + '_ {
        self.cells.iter().skip(col).step_by(self.width.max(1)).take(self.height)
    }

    /// The underlying row-major cells.
    pub fn cells(&self) -> &[T] {
        &self.cells
    }

    /// Mutable row-major cells.
    pub fn cells_mut(&mut self) -> &mut [T] {
        &mut self.cells
    }

    /// Iterate over rows.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> + '_ {
        self.cells.chunks(self.width.max(1)).take(self.height)
    }
}

impl<T: Copy> Grid<T> {
    /// Copy `values` into column `col`, top to bottom.
    ///
    /// # Panics
    ///
    /// Panics if `col >= width` or `values` is shorter than `height`.
    pub fn set_column(&mut self, col: usize, values: impl IntoIterator<Item = T>) {
        for (row, value) in values.into_iter().take(self.height).enumerate() {
            self.cells[row * self.width + col] = value;
        }
    }
}

impl Grid<f64> {
    /// Smallest and largest value, or `None` for an empty grid.
    pub fn min_max(&self) -> Option<(f64, f64)> {
        let mut iter = self.cells.iter().copied();
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }
}
