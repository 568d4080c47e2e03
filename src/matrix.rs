use std::ops::{Add, AddAssign, Div, DivAssign, Index, IndexMut, Mul, MulAssign, Sub, SubAssign};

/// Dynamically sized row-major matrix. Doubles as a 3x3 rotation basis and
/// as a pixel channel buffer, so the element type stays generic while the
/// linear-algebra operations are provided for `f32`.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix<T> {
    rows: usize,
    columns: usize,
    data: Vec<T>,
}

impl<T> Default for Matrix<T> {
    fn default() -> Self {
        Self {
            rows: 0,
            columns: 0,
            data: Vec::new(),
        }
    }
}

impl<T: Default + Clone> Matrix<T> {
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            rows,
            columns,
            data: vec![T::default(); rows * columns],
        }
    }
}

impl<T: Clone> Matrix<T> {
    pub fn filled(value: T, rows: usize, columns: usize) -> Self {
        Self {
            rows,
            columns,
            data: vec![value; rows * columns],
        }
    }
}

impl<T> Matrix<T> {
    pub fn from_vec(data: Vec<T>, rows: usize, columns: usize) -> Self {
        assert_eq!(data.len(), rows * columns, "data length must match dimensions");
        Self { rows, columns, data }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn area(&self) -> usize {
        self.rows * self.columns
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.columns
    }

    pub fn row_of_index(&self, index: usize) -> usize {
        index / self.columns
    }

    pub fn column_of_index(&self, index: usize) -> usize {
        index % self.columns
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }
}

impl<T: Copy> Matrix<T> {
    pub fn get(&self, row: usize, column: usize) -> T {
        self.data[self.columns * row + column]
    }

    pub fn set(&mut self, row: usize, column: usize, value: T) {
        self.data[self.columns * row + column] = value;
    }

    pub fn row(&self, row: usize) -> Vec<T> {
        (0..self.columns).map(|c| self.get(row, c)).collect()
    }

    pub fn column(&self, column: usize) -> Vec<T> {
        (0..self.rows).map(|r| self.get(r, column)).collect()
    }

    pub fn transposed(&self) -> Self {
        let mut data = Vec::with_capacity(self.area());
        for c in 0..self.columns {
            for r in 0..self.rows {
                data.push(self.get(r, c));
            }
        }
        Self {
            rows: self.columns,
            columns: self.rows,
            data,
        }
    }
}

impl<T> Index<usize> for Matrix<T> {
    type Output = T;

    fn index(&self, i: usize) -> &T {
        &self.data[i]
    }
}

impl<T> IndexMut<usize> for Matrix<T> {
    fn index_mut(&mut self, i: usize) -> &mut T {
        &mut self.data[i]
    }
}

macro_rules! matrix_op {
    ($trait:ident, $fn:ident, $assign_trait:ident, $assign_fn:ident, $op:tt) => {
        impl<T> $trait for &Matrix<T>
        where
            T: Copy + $trait<Output = T>,
        {
            type Output = Matrix<T>;

            fn $fn(self, rhs: Self) -> Matrix<T> {
                assert_eq!(self.rows, rhs.rows, "matrix dimensions must match");
                assert_eq!(self.columns, rhs.columns, "matrix dimensions must match");
                Matrix {
                    rows: self.rows,
                    columns: self.columns,
                    data: self
                        .data
                        .iter()
                        .zip(rhs.data.iter())
                        .map(|(a, b)| *a $op *b)
                        .collect(),
                }
            }
        }

        impl<T> $trait<T> for &Matrix<T>
        where
            T: Copy + $trait<Output = T>,
        {
            type Output = Matrix<T>;

            fn $fn(self, rhs: T) -> Matrix<T> {
                Matrix {
                    rows: self.rows,
                    columns: self.columns,
                    data: self.data.iter().map(|a| *a $op rhs).collect(),
                }
            }
        }

        impl<T> $assign_trait<&Matrix<T>> for Matrix<T>
        where
            T: Copy + $trait<Output = T>,
        {
            fn $assign_fn(&mut self, rhs: &Matrix<T>) {
                assert_eq!(self.rows, rhs.rows, "matrix dimensions must match");
                assert_eq!(self.columns, rhs.columns, "matrix dimensions must match");
                for (a, b) in self.data.iter_mut().zip(rhs.data.iter()) {
                    *a = *a $op *b;
                }
            }
        }

        impl<T> $assign_trait<T> for Matrix<T>
        where
            T: Copy + $trait<Output = T>,
        {
            fn $assign_fn(&mut self, rhs: T) {
                for a in self.data.iter_mut() {
                    *a = *a $op rhs;
                }
            }
        }
    };
}

matrix_op!(Add, add, AddAssign, add_assign, +);
matrix_op!(Sub, sub, SubAssign, sub_assign, -);
matrix_op!(Mul, mul, MulAssign, mul_assign, *);
matrix_op!(Div, div, DivAssign, div_assign, /);

impl Matrix<f32> {
    pub fn identity(size: usize) -> Self {
        let mut identity = Self::new(size, size);
        for i in 0..size {
            identity.set(i, i, 1.0);
        }
        identity
    }

    pub fn sum(&self) -> f32 {
        self.data.iter().sum()
    }

    /// Standard matrix product, as opposed to the elementwise `*` operator.
    pub fn multiply(&self, other: &Self) -> Self {
        assert_eq!(
            self.columns, other.rows,
            "left columns must match right rows"
        );
        let mut result = Self::new(self.rows, other.columns);
        for r in 0..self.rows {
            for c in 0..other.columns {
                let mut sum = 0.0;
                for k in 0..self.columns {
                    sum += self.get(r, k) * other.get(k, c);
                }
                result.set(r, c, sum);
            }
        }
        result
    }

    /// Gauss-Jordan inverse. The pivot is nudged by a small epsilon so
    /// near-singular rotation bases invert instead of exploding.
    pub fn inversed(&self) -> Self {
        assert!(self.is_square(), "only square matrices can be inverted");

        let size = self.columns;
        let mut coefficient = self.clone();
        let mut result = Self::identity(size);

        let mut pivot_row = vec![0.0f32; size];
        let mut result_pivot_row = vec![0.0f32; size];

        for i in 0..size {
            let pivot = coefficient[size * i + i] + 1e-6;
            for c in 0..size {
                let offset = size * i + c;
                pivot_row[c] = coefficient[offset] / pivot;
                result_pivot_row[c] = result[offset] / pivot;
            }

            for r in 0..size {
                if r == i {
                    continue;
                }
                let first = coefficient[size * r + i];
                for c in 0..size {
                    let index = size * r + c;
                    coefficient[index] -= first * pivot_row[c];
                    result[index] -= first * result_pivot_row[c];
                }
            }

            for c in 0..size {
                let offset = size * i + c;
                coefficient[offset] = pivot_row[c];
                result[offset] = result_pivot_row[c];
            }
        }

        result
    }

    /// Same-size convolution with zero padding at the borders.
    pub fn convolution_2d(&self, kernel: &Self) -> Self {
        let mut result = Self::new(self.rows, self.columns);
        let half_kr = (kernel.rows / 2) as isize;
        let half_kc = (kernel.columns / 2) as isize;

        for r in 0..self.rows as isize {
            for c in 0..self.columns as isize {
                let mut sum = 0.0;
                for kr in 0..kernel.rows as isize {
                    for kc in 0..kernel.columns as isize {
                        let sr = r + kr - half_kr;
                        let sc = c + kc - half_kc;
                        if sr < 0 || sc < 0 || sr >= self.rows as isize || sc >= self.columns as isize {
                            continue;
                        }
                        sum += self.get(sr as usize, sc as usize)
                            * kernel.get(kr as usize, kc as usize);
                    }
                }
                result.set(r as usize, c as usize, sum);
            }
        }
        result
    }
}
