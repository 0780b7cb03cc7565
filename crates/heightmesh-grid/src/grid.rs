use crate::error::DataError;

/// Immutable `rows x cols` grid of finite heights, stored row-major.
///
/// `row` is the y axis and grows to the south, `col` is the x axis and grows
/// to the east. Every transform in [`crate::preprocess`] returns a new grid.
#[derive(Clone, Debug, PartialEq)]
pub struct HeightGrid {
    rows: usize,
    cols: usize,
    data: Vec<f32>,
}

impl HeightGrid {
    /// Validates shape and values; the first non-finite sample is reported with its cell.
    pub fn new(rows: usize, cols: usize, data: Vec<f32>) -> Result<Self, DataError> {
        if rows == 0 || cols == 0 {
            return Err(DataError::Empty { rows, cols });
        }
        if data.len() != rows * cols {
            return Err(DataError::ShapeMismatch {
                rows,
                cols,
                len: data.len(),
            });
        }
        if let Some(i) = data.iter().position(|v| !v.is_finite()) {
            return Err(DataError::NonFinite {
                row: i / cols,
                col: i % cols,
                value: data[i],
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// Builds a grid from nested rows; ragged input is a shape mismatch.
    pub fn from_rows<R: AsRef<[f32]>>(rows: &[R]) -> Result<Self, DataError> {
        let cols = rows.first().map_or(0, |r| r.as_ref().len());
        let mut data = Vec::with_capacity(rows.len() * cols);
        for r in rows {
            data.extend_from_slice(r.as_ref());
        }
        Self::new(rows.len(), cols, data)
    }

    pub fn filled(rows: usize, cols: usize, height: f32) -> Result<Self, DataError> {
        Self::new(rows, cols, vec![height; rows * cols])
    }

    pub fn from_fn(
        rows: usize,
        cols: usize,
        mut f: impl FnMut(usize, usize) -> f32,
    ) -> Result<Self, DataError> {
        let mut data = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                data.push(f(row, col));
            }
        }
        Self::new(rows, cols, data)
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of cells; never zero.
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn idx(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    /// Height at `(row, col)`. Panics when out of bounds.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        assert!(row < self.rows && col < self.cols, "cell ({row}, {col}) out of bounds");
        self.data[self.idx(row, col)]
    }

    #[inline]
    pub fn height(&self, row: usize, col: usize) -> Option<f32> {
        if row < self.rows && col < self.cols {
            Some(self.data[self.idx(row, col)])
        } else {
            None
        }
    }

    #[inline]
    pub fn values(&self) -> &[f32] {
        &self.data
    }

    pub fn row(&self, row: usize) -> &[f32] {
        let start = row * self.cols;
        &self.data[start..start + self.cols]
    }

    /// `(row, col, height)` in row-major order, column fastest.
    pub fn iter_cells(&self) -> impl Iterator<Item = (usize, usize, f32)> + '_ {
        let cols = self.cols;
        self.data
            .iter()
            .enumerate()
            .map(move |(i, &h)| (i / cols, i % cols, h))
    }

    pub fn min(&self) -> f32 {
        self.data.iter().copied().fold(f32::INFINITY, f32::min)
    }

    pub fn max(&self) -> f32 {
        self.data.iter().copied().fold(f32::NEG_INFINITY, f32::max)
    }

    pub fn mean(&self) -> f64 {
        self.data.iter().map(|&v| v as f64).sum::<f64>() / self.data.len() as f64
    }

    /// Population standard deviation.
    pub fn std_dev(&self) -> f64 {
        let m = self.mean();
        let var = self
            .data
            .iter()
            .map(|&v| {
                let d = v as f64 - m;
                d * d
            })
            .sum::<f64>()
            / self.data.len() as f64;
        var.sqrt()
    }

    /// Applies `f` per value into a new grid of the same shape, revalidating the result.
    pub fn map(&self, f: impl FnMut(f32) -> f32) -> Result<HeightGrid, DataError> {
        Self::new(self.rows, self.cols, self.data.iter().copied().map(f).collect())
    }

    pub fn into_values(self) -> Vec<f32> {
        self.data
    }
}
