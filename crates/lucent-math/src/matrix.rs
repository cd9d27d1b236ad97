//! Fixed-dimension matrices over `f64`.
//!
//! Determinants use cofactor expansion over submatrices and inversion
//! goes through the adjugate, as the small fixed sizes here make the
//! closed-form route both exact and cheap. Square-only operations are
//! implemented only on the square aliases, so rectangular matrices
//! cannot reach them.

use std::ops::{Add, Div, Index, Mul, Sub};

use crate::error::{MathError, Result};
use crate::tuple::Tuple;
use crate::{approx_eq, EPSILON};

/// An immutable `R`×`C` matrix of `f64`.
#[derive(Debug, Clone, Copy)]
pub struct Matrix<const R: usize, const C: usize> {
    data: [[f64; C]; R],
}

/// A 2×2 matrix.
pub type Matrix2 = Matrix<2, 2>;
/// A 3×3 matrix.
pub type Matrix3 = Matrix<3, 3>;
/// A 4×4 matrix.
pub type Matrix4 = Matrix<4, 4>;

impl<const R: usize, const C: usize> Matrix<R, C> {
    /// Create a matrix from row-major contents.
    pub const fn new(data: [[f64; C]; R]) -> Self {
        Self { data }
    }

    /// Number of rows.
    pub const fn row_count(&self) -> usize {
        R
    }

    /// Number of columns.
    pub const fn column_count(&self) -> usize {
        C
    }

    /// Checked element access.
    pub fn get(&self, row: usize, col: usize) -> Result<f64> {
        if row >= R {
            return Err(MathError::IndexOutOfRange { index: row, len: R });
        }
        if col >= C {
            return Err(MathError::IndexOutOfRange { index: col, len: C });
        }
        Ok(self.data[row][col])
    }

    /// Transposed copy.
    pub fn transpose(&self) -> Matrix<C, R> {
        let mut out = [[0.0; R]; C];
        for (r, row) in self.data.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                out[c][r] = *value;
            }
        }
        Matrix::new(out)
    }
}

impl<const N: usize> Matrix<N, N> {
    /// The identity matrix.
    pub fn identity() -> Self {
        let mut out = [[0.0; N]; N];
        for (i, row) in out.iter_mut().enumerate() {
            row[i] = 1.0;
        }
        Self::new(out)
    }
}

impl<const R: usize, const C: usize> PartialEq for Matrix<R, C> {
    fn eq(&self, other: &Self) -> bool {
        self.data
            .iter()
            .zip(other.data.iter())
            .all(|(a, b)| a.iter().zip(b.iter()).all(|(x, y)| approx_eq(*x, *y)))
    }
}

impl<const R: usize, const C: usize> Index<(usize, usize)> for Matrix<R, C> {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        &self.data[row][col]
    }
}

impl<const R: usize, const C: usize> Add for Matrix<R, C> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        let mut out = self.data;
        for (r, row) in out.iter_mut().enumerate() {
            for (c, value) in row.iter_mut().enumerate() {
                *value += rhs.data[r][c];
            }
        }
        Self::new(out)
    }
}

impl<const R: usize, const C: usize> Sub for Matrix<R, C> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        let mut out = self.data;
        for (r, row) in out.iter_mut().enumerate() {
            for (c, value) in row.iter_mut().enumerate() {
                *value -= rhs.data[r][c];
            }
        }
        Self::new(out)
    }
}

impl<const R: usize, const C: usize> Mul<f64> for Matrix<R, C> {
    type Output = Self;

    fn mul(self, factor: f64) -> Self {
        let mut out = self.data;
        for row in out.iter_mut() {
            for value in row.iter_mut() {
                *value *= factor;
            }
        }
        Self::new(out)
    }
}

impl<const R: usize, const C: usize> Div<f64> for Matrix<R, C> {
    type Output = Self;

    fn div(self, denom: f64) -> Self {
        self * (1.0 / denom)
    }
}

impl<const R: usize, const C: usize, const K: usize> Mul<Matrix<C, K>> for Matrix<R, C> {
    type Output = Matrix<R, K>;

    fn mul(self, rhs: Matrix<C, K>) -> Matrix<R, K> {
        let mut out = [[0.0; K]; R];
        for (r, row) in out.iter_mut().enumerate() {
            for (k, value) in row.iter_mut().enumerate() {
                *value = (0..C).map(|c| self.data[r][c] * rhs.data[c][k]).sum();
            }
        }
        Matrix::new(out)
    }
}

/// Matrix × tuple, with the tuple as a column.
impl Mul<Tuple> for Matrix4 {
    type Output = Tuple;

    fn mul(self, t: Tuple) -> Tuple {
        let row = |r: usize| {
            self.data[r][0] * t.x + self.data[r][1] * t.y + self.data[r][2] * t.z
                + self.data[r][3] * t.w
        };
        Tuple::new(row(0), row(1), row(2), row(3))
    }
}

impl Matrix2 {
    /// Determinant of a 2×2 matrix.
    pub fn determinant(&self) -> f64 {
        self.data[0][0] * self.data[1][1] - self.data[0][1] * self.data[1][0]
    }
}

impl Matrix3 {
    /// Submatrix obtained by omitting one row and one column.
    pub fn submatrix(&self, row: usize, col: usize) -> Matrix2 {
        let mut out = [[0.0; 2]; 2];
        copy_omitting(&self.data, &mut out, row, col);
        Matrix2::new(out)
    }

    /// The determinant of `submatrix(row, col)`.
    pub fn minor(&self, row: usize, col: usize) -> f64 {
        self.submatrix(row, col).determinant()
    }

    /// Signed minor: `(-1)^(row+col) * minor(row, col)`.
    pub fn cofactor(&self, row: usize, col: usize) -> f64 {
        let sign = if (row + col) % 2 == 0 { 1.0 } else { -1.0 };
        sign * self.minor(row, col)
    }

    /// Determinant by cofactor expansion along the first row.
    pub fn determinant(&self) -> f64 {
        (0..3).map(|c| self.data[0][c] * self.cofactor(0, c)).sum()
    }
}

impl Matrix4 {
    /// Submatrix obtained by omitting one row and one column.
    pub fn submatrix(&self, row: usize, col: usize) -> Matrix3 {
        let mut out = [[0.0; 3]; 3];
        copy_omitting(&self.data, &mut out, row, col);
        Matrix3::new(out)
    }

    /// The determinant of `submatrix(row, col)`.
    pub fn minor(&self, row: usize, col: usize) -> f64 {
        self.submatrix(row, col).determinant()
    }

    /// Signed minor: `(-1)^(row+col) * minor(row, col)`.
    pub fn cofactor(&self, row: usize, col: usize) -> f64 {
        let sign = if (row + col) % 2 == 0 { 1.0 } else { -1.0 };
        sign * self.minor(row, col)
    }

    /// Determinant by cofactor expansion along the first row.
    pub fn determinant(&self) -> f64 {
        (0..4).map(|c| self.data[0][c] * self.cofactor(0, c)).sum()
    }

    /// Inverse via the adjugate over the determinant.
    ///
    /// Fails when the determinant is effectively zero.
    pub fn invert(&self) -> Result<Matrix4> {
        let det = self.determinant();
        if det.abs() < EPSILON {
            return Err(MathError::SingularMatrix);
        }
        let mut out = [[0.0; 4]; 4];
        for row in 0..4 {
            for col in 0..4 {
                // Transposed placement turns the cofactor matrix into the adjugate.
                out[col][row] = self.cofactor(row, col) / det;
            }
        }
        Ok(Matrix4::new(out))
    }
}

fn copy_omitting<const N: usize, const M: usize>(
    src: &[[f64; N]; N],
    dst: &mut [[f64; M]; M],
    skip_row: usize,
    skip_col: usize,
) {
    let mut r_out = 0;
    for (r, row) in src.iter().enumerate() {
        if r == skip_row {
            continue;
        }
        let mut c_out = 0;
        for (c, value) in row.iter().enumerate() {
            if c == skip_col {
                continue;
            }
            dst[r_out][c_out] = *value;
            c_out += 1;
        }
        r_out += 1;
    }
}
