use std::f64::consts::PI;

use linfa::dataset::Dataset;
use linfa::traits::Fit;
use linfa_linear::LinearRegression;
use ndarray::{Array1, Array2, Axis};

use crate::defaults::CHOLESKY_EPS;
use crate::design::build_var_design;
use crate::types::{LagError, LagOrder, Trend, VarFit};

/// A VAR estimator: given time-ordered observations and a lag order, report
/// the statistics needed to score the fit.
///
/// The lag search only depends on this trait, so any estimator (or a stub in
/// tests) can be plugged in.
pub trait VarEstimator {
    /// Fit a VAR with exactly `lags` autoregressive terms.
    ///
    /// `data` is `(n_obs x k_vars)` with rows in time order.
    fn fit(&self, data: &Array2<f64>, lags: LagOrder) -> Result<VarFit, LagError>;
}

/// Equation-by-equation least-squares VAR estimator.
///
/// Every equation shares the same regressors, so fitting each column of the
/// target matrix separately gives the multivariate least-squares solution.
#[derive(Clone, Debug, Default)]
pub struct OlsVar {
    pub trend: Trend,
}

impl OlsVar {
    pub fn new(trend: Trend) -> Self {
        Self { trend }
    }
}

impl VarEstimator for OlsVar {
    fn fit(&self, data: &Array2<f64>, lags: LagOrder) -> Result<VarFit, LagError> {
        fit_var(data, lags, self.trend)
    }
}

/// Fit a VAR(`lags`) by ordinary least squares and compute its Gaussian
/// log-likelihood.
///
/// The log-likelihood uses the maximum-likelihood residual covariance
/// `Σ = UᵀU / n`:
///
/// `L = -(n/2) · (K·ln(2π) + ln|Σ| + K)`
///
/// # Arguments
/// * `data` - `(n_obs x k_vars)` observations in time order
/// * `lags` - Autoregressive order
/// * `trend` - Deterministic terms per equation
///
/// # Errors
/// * `InsufficientData` when the series is too short for `lags`
/// * `Linalg` if a least-squares solve fails
/// * `Singular` if the residual covariance is not positive definite, or an
///   equation's target is constant or fitted exactly
pub fn fit_var(data: &Array2<f64>, lags: LagOrder, trend: Trend) -> Result<VarFit, LagError> {
    let (z, y) = build_var_design(data, lags, trend.n_terms())?;
    let (nobs, k_vars) = y.dim();

    let residuals = fit_residuals(&z, &y, trend)?;
    let sigma = residuals.t().dot(&residuals) / nobs as f64;
    if has_degenerate_equation(&sigma, &y) {
        return Err(LagError::Singular { lags });
    }
    let log_det = log_det_spd(&sigma).ok_or(LagError::Singular { lags })?;

    let n = nobs as f64;
    let k = k_vars as f64;
    let log_likelihood = -(n / 2.0) * (k * (2.0 * PI).ln() + log_det + k);

    Ok(VarFit {
        log_likelihood,
        nobs,
        k_ar: lags,
        k_vars,
    })
}

/// Regress each column of `y` on `z` and return the residual matrix.
fn fit_residuals(z: &Array2<f64>, y: &Array2<f64>, trend: Trend) -> Result<Array2<f64>, LagError> {
    let intercept = trend == Trend::Constant;
    let mut residuals = Array2::<f64>::zeros(y.dim());

    for (eq, target) in y.axis_iter(Axis(1)).enumerate() {
        let target: Array1<f64> = target.to_owned();
        let dataset = Dataset::new(z.clone(), target.clone());
        let fitted = LinearRegression::new()
            .with_intercept(intercept)
            .fit(&dataset)
            .map_err(|e| LagError::Linalg(format!("{:?}", e)))?;

        let offset = if intercept { fitted.intercept() } else { 0.0 };
        let y_hat = z.dot(fitted.params()) + offset;
        residuals.column_mut(eq).assign(&(&target - &y_hat));
    }

    Ok(residuals)
}

/// An equation is degenerate when its target never varies or its residual
/// variance is negligible next to the target's own variance.
fn has_degenerate_equation(sigma: &Array2<f64>, y: &Array2<f64>) -> bool {
    y.axis_iter(Axis(1)).enumerate().any(|(j, target)| {
        let n = target.len() as f64;
        let mean = target.sum() / n;
        let spread = target.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let constant = target.iter().all(|&v| v == target[0]);
        constant || !(spread > 0.0) || sigma[[j, j]] <= CHOLESKY_EPS * spread
    })
}

/// Log-determinant of a symmetric positive-definite matrix via Cholesky.
///
/// Returns `None` if a diagonal entry is not strictly positive, or if a pivot
/// is not finite or falls to `CHOLESKY_EPS` relative to its diagonal entry.
pub(crate) fn log_det_spd(a: &Array2<f64>) -> Option<f64> {
    let n = a.nrows();
    if n == 0 || a.ncols() != n {
        return None;
    }

    let mut l = Array2::<f64>::zeros((n, n));
    let mut log_det = 0.0;

    for j in 0..n {
        let diag = a[[j, j]];
        if !(diag > 0.0) {
            return None;
        }
        let mut d = diag;
        for k in 0..j {
            d -= l[[j, k]] * l[[j, k]];
        }
        if !d.is_finite() || d <= CHOLESKY_EPS * diag {
            return None;
        }
        let pivot = d.sqrt();
        l[[j, j]] = pivot;
        log_det += 2.0 * pivot.ln();

        for i in (j + 1)..n {
            let mut s = a[[i, j]];
            for k in 0..j {
                s -= l[[i, k]] * l[[j, k]];
            }
            l[[i, j]] = s / pivot;
        }
    }

    Some(log_det)
}
