//! Interpolating B-splines
//!
//! Fits a spline of degree `k` that passes through every known sample. Knots
//! follow the not-a-knot placement: for odd `k` the interior knots are the
//! data sites minus `(k - 1) / 2` at each end, for even `k` they are the
//! midpoints between sites minus `k / 2` at each end. Both ends carry `k + 1`
//! repeated boundary knots. The collocation matrix is banded and totally
//! positive, so it is solved by banded elimination without pivoting.

use crate::{Error, Result};

/// A fitted interpolating B-spline
#[derive(Debug, Clone)]
pub struct InterpolatingSpline {
    knots: Vec<f64>,
    coefficients: Vec<f64>,
    degree: usize,
}

impl InterpolatingSpline {
    /// Fit a spline of the given degree through `(x[i], y[i])`
    ///
    /// `x` must be strictly increasing and hold at least `degree + 1` sites.
    pub fn fit(x: &[f64], y: &[f64], degree: usize) -> Result<Self> {
        let n = x.len();
        if degree == 0 {
            return Err(Error::interpolation("spline degree must be at least 1"));
        }
        if y.len() != n {
            return Err(Error::interpolation(format!(
                "{} sites but {} values",
                n,
                y.len()
            )));
        }
        if n < degree + 1 {
            return Err(Error::interpolation(format!(
                "a degree {} spline needs at least {} known samples, found {}",
                degree,
                degree + 1,
                n
            )));
        }
        if x.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(Error::interpolation("spline sites must be strictly increasing"));
        }

        let knots = knot_vector(x, degree);
        let mut matrix = BandMatrix::new(n, degree, degree);

        for (row, &site) in x.iter().enumerate() {
            let span = find_span(&knots, n, degree, site);
            let basis = basis_functions(&knots, span, site, degree);
            for (offset, value) in basis.into_iter().enumerate() {
                matrix.set(row, span - degree + offset, value)?;
            }
        }

        let coefficients = matrix.solve(y.to_vec())?;

        Ok(Self {
            knots,
            coefficients,
            degree,
        })
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Evaluate the spline; values outside the fitted range are extrapolated
    /// from the boundary polynomial pieces
    pub fn evaluate(&self, at: f64) -> f64 {
        let n = self.coefficients.len();
        let span = find_span(&self.knots, n, self.degree, at);
        basis_functions(&self.knots, span, at, self.degree)
            .into_iter()
            .enumerate()
            .map(|(offset, b)| b * self.coefficients[span - self.degree + offset])
            .sum()
    }
}

fn knot_vector(x: &[f64], degree: usize) -> Vec<f64> {
    let n = x.len();
    let mut knots = Vec::with_capacity(n + degree + 1);
    knots.extend(std::iter::repeat_n(x[0], degree + 1));

    if degree % 2 == 1 {
        let trim = (degree - 1) / 2;
        knots.extend_from_slice(&x[trim + 1..n - trim - 1]);
    } else {
        let trim = degree / 2;
        knots.extend((trim..n - 1 - trim).map(|i| 0.5 * (x[i] + x[i + 1])));
    }

    knots.extend(std::iter::repeat_n(x[n - 1], degree + 1));
    knots
}

/// Largest span `l` in `[degree, n - 1]` with `knots[l] <= at`
fn find_span(knots: &[f64], n: usize, degree: usize, at: f64) -> usize {
    knots
        .partition_point(|&knot| knot <= at)
        .saturating_sub(1)
        .clamp(degree, n - 1)
}

/// Values of the `degree + 1` basis functions that are non-zero on `span`
fn basis_functions(knots: &[f64], span: usize, at: f64, degree: usize) -> Vec<f64> {
    let mut values = vec![0.0; degree + 1];
    let mut left = vec![0.0; degree + 1];
    let mut right = vec![0.0; degree + 1];
    values[0] = 1.0;

    for j in 1..=degree {
        left[j] = at - knots[span + 1 - j];
        right[j] = knots[span + j] - at;
        let mut saved = 0.0;
        for r in 0..j {
            let denominator = right[r + 1] + left[j - r];
            let temp = if denominator == 0.0 {
                0.0
            } else {
                values[r] / denominator
            };
            values[r] = saved + right[r + 1] * temp;
            saved = left[j - r] * temp;
        }
        values[j] = saved;
    }

    values
}

/// Square band matrix with `lower` sub- and `upper` super-diagonals
#[derive(Debug)]
struct BandMatrix {
    n: usize,
    lower: usize,
    upper: usize,
    data: Vec<f64>,
}

impl BandMatrix {
    fn new(n: usize, lower: usize, upper: usize) -> Self {
        Self {
            n,
            lower,
            upper,
            data: vec![0.0; n * (lower + upper + 1)],
        }
    }

    fn index(&self, row: usize, col: usize) -> Option<usize> {
        if row >= self.n || col >= self.n || col + self.lower < row || col > row + self.upper {
            return None;
        }
        Some(row * (self.lower + self.upper + 1) + col + self.lower - row)
    }

    fn get(&self, row: usize, col: usize) -> f64 {
        self.index(row, col).map_or(0.0, |i| self.data[i])
    }

    fn set(&mut self, row: usize, col: usize, value: f64) -> Result<()> {
        let i = self.index(row, col).ok_or_else(|| {
            Error::interpolation(format!(
                "collocation entry ({}, {}) falls outside the band",
                row, col
            ))
        })?;
        self.data[i] = value;
        Ok(())
    }

    fn solve(mut self, mut rhs: Vec<f64>) -> Result<Vec<f64>> {
        let n = self.n;

        for p in 0..n {
            let pivot = self.get(p, p);
            if !pivot.is_finite() || pivot.abs() < 1e-12 {
                return Err(Error::interpolation(format!(
                    "singular spline system at row {}",
                    p
                )));
            }

            let last_row = (p + self.lower).min(n - 1);
            let last_col = (p + self.upper).min(n - 1);
            for row in p + 1..=last_row {
                let factor = self.get(row, p) / pivot;
                if factor == 0.0 {
                    continue;
                }
                for col in p..=last_col {
                    let source = self.get(p, col);
                    if let Some(i) = self.index(row, col) {
                        self.data[i] -= factor * source;
                    }
                }
                rhs[row] -= factor * rhs[p];
            }
        }

        let mut solution = vec![0.0; n];
        for row in (0..n).rev() {
            let last_col = (row + self.upper).min(n - 1);
            let tail: f64 = (row + 1..=last_col)
                .map(|col| self.get(row, col) * solution[col])
                .sum();
            solution[row] = (rhs[row] - tail) / self.get(row, row);
        }

        Ok(solution)
    }
}
