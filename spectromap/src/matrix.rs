use std::ops::{Index, IndexMut};

/// Dense row-major matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix<T> {
    rows: usize,
    columns: usize,
    data: Vec<T>,
}

impl<T: Copy> Matrix<T> {
    pub fn filled(rows: usize, columns: usize, value: T) -> Self {
        Self {
            rows,
            columns,
            data: vec![value; rows * columns],
        }
    }

    /// Builds a matrix from its columns. All columns must have `rows` elements.
    pub(crate) fn from_columns(rows: usize, columns: &[Vec<T>]) -> Self {
        let mut data = Vec::with_capacity(rows * columns.len());
        for row in 0..rows {
            for column in columns {
                data.push(column[row]);
            }
        }

        Self {
            rows,
            columns: columns.len(),
            data,
        }
    }

    /// Copies elements column by column, so the row index varies fastest.
    pub fn to_column_major(&self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.data.len());
        for column in 0..self.columns {
            for row in 0..self.rows {
                out.push(self[(row, column)]);
            }
        }
        out
    }

    /// Inverse of [Matrix::to_column_major].
    pub fn from_column_major(rows: usize, columns: usize, values: &[T]) -> Self {
        assert_eq!(rows * columns, values.len());

        let mut data = Vec::with_capacity(values.len());
        for row in 0..rows {
            for column in 0..columns {
                data.push(values[column * rows + row]);
            }
        }

        Self { rows, columns, data }
    }

    /// Applies `f` to every element, keeping the shape.
    pub fn map<U, F: FnMut(T) -> U>(&self, f: F) -> Matrix<U> {
        Matrix {
            rows: self.rows,
            columns: self.columns,
            data: self.data.iter().copied().map(f).collect(),
        }
    }
}

impl<T> Matrix<T> {
    /// Wraps row-major data.
    pub fn from_row_major(rows: usize, columns: usize, data: Vec<T>) -> Self {
        assert_eq!(rows * columns, data.len());
        Self { rows, columns, data }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// `(rows, columns)`
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.columns)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn row(&self, i: usize) -> &[T] {
        &self.data[i * self.columns..][..self.columns]
    }

    pub fn row_mut(&mut self, i: usize) -> &mut [T] {
        &mut self.data[i * self.columns..][..self.columns]
    }

    /// Elements in row-major order, so the column index varies fastest.
    pub fn as_row_major(&self) -> &[T] {
        &self.data
    }

    pub fn into_row_major(self) -> Vec<T> {
        self.data
    }
}

impl<T> Index<(usize, usize)> for Matrix<T> {
    type Output = T;

    fn index(&self, (row, column): (usize, usize)) -> &Self::Output {
        assert!(column < self.columns);
        &self.data[row * self.columns + column]
    }
}

impl<T> IndexMut<(usize, usize)> for Matrix<T> {
    fn index_mut(&mut self, (row, column): (usize, usize)) -> &mut Self::Output {
        assert!(column < self.columns);
        &mut self.data[row * self.columns + column]
    }
}
