//! Cubic spline interpolation
//!
//! Not-a-knot cubic spline: the third derivative is continuous across the
//! second and second-to-last knots, so four knots give the single
//! interpolating cubic and any cubic polynomial is reproduced exactly.
//! The interior second derivatives solve a tridiagonal system (Thomas
//! algorithm) once the two end conditions are folded into its first and last
//! rows.

use gait_core::{GaitError, GaitResult};

/// Minimum number of knots for a not-a-knot cubic spline
pub const MIN_KNOTS: usize = 4;

/// Pivot magnitude below which the system is treated as singular
const PIVOT_EPSILON: f64 = 1e-12;

/// Piecewise cubic interpolant through `(x, y)` knots
#[derive(Debug, Clone)]
pub struct CubicSpline {
    x: Vec<f64>,
    y: Vec<f64>,
    /// Second derivative at each knot
    m: Vec<f64>,
}

impl CubicSpline {
    /// Build a not-a-knot spline. `x` must be strictly increasing.
    pub fn not_a_knot(x: &[f64], y: &[f64]) -> GaitResult<Self> {
        if x.len() != y.len() {
            return Err(GaitError::LengthMismatch {
                channel: "spline knots".to_string(),
                expected: x.len(),
                actual: y.len(),
            });
        }
        let n = x.len();
        if n < MIN_KNOTS {
            return Err(GaitError::InsufficientData {
                reason: format!("cubic spline needs {} knots, got {}", MIN_KNOTS, n),
            });
        }
        if let Some(bad) = x.iter().chain(y).find(|v| !v.is_finite()) {
            return Err(GaitError::NumericalFailure {
                reason: format!("non-finite knot value {}", bad),
            });
        }

        let h: Vec<f64> = x.windows(2).map(|w| w[1] - w[0]).collect();
        if let Some(k) = h.iter().position(|&step| step <= 0.0) {
            return Err(GaitError::NumericalFailure {
                reason: format!("knot axis not strictly increasing at {}", k + 1),
            });
        }

        // Unknowns M_1..M_{n-2}; row j holds the continuity equation at knot j+1
        let size = n - 2;
        let mut sub = vec![0.0; size];
        let mut diag = vec![0.0; size];
        let mut sup = vec![0.0; size];
        let mut rhs = vec![0.0; size];

        for j in 0..size {
            let i = j + 1;
            sub[j] = h[i - 1];
            diag[j] = 2.0 * (h[i - 1] + h[i]);
            sup[j] = h[i];
            rhs[j] = 6.0 * ((y[i + 1] - y[i]) / h[i] - (y[i] - y[i - 1]) / h[i - 1]);
        }

        // M_0 = (1 + h0/h1) M_1 - (h0/h1) M_2
        let (h0, h1) = (h[0], h[1]);
        diag[0] = 3.0 * h0 + 2.0 * h1 + h0 * h0 / h1;
        sup[0] = h1 - h0 * h0 / h1;

        // M_{n-1} = (1 + b/a) M_{n-2} - (b/a) M_{n-3}
        let (a, b) = (h[n - 3], h[n - 2]);
        let last = size - 1;
        sub[last] = a - b * b / a;
        diag[last] = 2.0 * a + 3.0 * b + b * b / a;

        let interior = solve_tridiagonal(&sub, &diag, &sup, &rhs)?;

        let mut m = Vec::with_capacity(n);
        m.push((1.0 + h0 / h1) * interior[0] - (h0 / h1) * interior[1]);
        m.extend_from_slice(&interior);
        m.push((1.0 + b / a) * interior[last] - (b / a) * interior[last - 1]);

        Ok(Self {
            x: x.to_vec(),
            y: y.to_vec(),
            m,
        })
    }

    /// Knot range covered by the interpolant
    pub fn domain(&self) -> (f64, f64) {
        (self.x[0], self.x[self.x.len() - 1])
    }

    /// Evaluate at `t`; points outside the knot range are an error.
    pub fn evaluate(&self, t: f64) -> GaitResult<f64> {
        let (lo, hi) = self.domain();
        if !(lo..=hi).contains(&t) {
            return Err(GaitError::NumericalFailure {
                reason: format!("{} outside interpolation range [{}, {}]", t, lo, hi),
            });
        }

        let seg = self.x.partition_point(|&v| v <= t).saturating_sub(1).min(self.x.len() - 2);
        let (x0, x1) = (self.x[seg], self.x[seg + 1]);
        let (y0, y1) = (self.y[seg], self.y[seg + 1]);
        let (m0, m1) = (self.m[seg], self.m[seg + 1]);
        let h = x1 - x0;
        let left = x1 - t;
        let right = t - x0;

        Ok(m0 * left.powi(3) / (6.0 * h)
            + m1 * right.powi(3) / (6.0 * h)
            + (y0 / h - m0 * h / 6.0) * left
            + (y1 / h - m1 * h / 6.0) * right)
    }

    pub fn evaluate_many(&self, points: &[f64]) -> GaitResult<Vec<f64>> {
        points.iter().map(|&t| self.evaluate(t)).collect()
    }
}

/// `n` evenly spaced values from `start` to `end`, both ends exact
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            let mut points: Vec<f64> = (0..n).map(|i| start + step * i as f64).collect();
            points[n - 1] = end;
            points
        }
    }
}

fn solve_tridiagonal(sub: &[f64], diag: &[f64], sup: &[f64], rhs: &[f64]) -> GaitResult<Vec<f64>> {
    let n = diag.len();
    let mut c = vec![0.0; n];
    let mut d = vec![0.0; n];

    let singular = |row: usize| GaitError::NumericalFailure {
        reason: format!("singular spline system at row {}", row),
    };

    if diag[0].abs() < PIVOT_EPSILON {
        return Err(singular(0));
    }
    c[0] = sup[0] / diag[0];
    d[0] = rhs[0] / diag[0];

    for i in 1..n {
        let denom = diag[i] - sub[i] * c[i - 1];
        if denom.abs() < PIVOT_EPSILON || !denom.is_finite() {
            return Err(singular(i));
        }
        c[i] = sup[i] / denom;
        d[i] = (rhs[i] - sub[i] * d[i - 1]) / denom;
    }

    let mut solution = vec![0.0; n];
    solution[n - 1] = d[n - 1];
    for i in (0..n - 1).rev() {
        solution[i] = d[i] - c[i] * solution[i + 1];
    }
    Ok(solution)
}
