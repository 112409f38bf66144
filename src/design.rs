use ndarray::{s, Array2};

use crate::types::{LagError, LagOrder};

/// Number of rows needed to estimate a VAR of order `lags`.
///
/// After dropping the first `lags` rows, each equation needs one observation
/// per regressor plus `k_vars` residual degrees of freedom so that the
/// residual covariance can be full rank.
pub fn required_observations(lags: LagOrder, k_vars: usize, trend_terms: usize) -> usize {
    lags + k_vars * lags + trend_terms + k_vars
}

/// Build the lagged regressor matrix Z and aligned targets Y for a VAR.
///
/// Columns of Z are blocks `[y_{t-1}, y_{t-2}, ..., y_{t-lags}]`, each block
/// holding all variables in dataset order. Row `r` of both matrices
/// corresponds to time index `lags + r`.
///
/// # Arguments
/// * `data` - `(n_obs x k_vars)` observations in time order
/// * `lags` - Autoregressive order
/// * `trend_terms` - Deterministic regressors the estimator will add
///
/// # Returns
/// Tuple of `(z, y)` with `n_obs - lags` rows each.
///
/// # Errors
/// Returns `LagError::InvalidConfig` for `lags == 0` and
/// `LagError::InsufficientData` when the series is too short.
pub fn build_var_design(
    data: &Array2<f64>,
    lags: LagOrder,
    trend_terms: usize,
) -> Result<(Array2<f64>, Array2<f64>), LagError> {
    if lags == 0 {
        return Err(LagError::InvalidConfig(
            "lag order must be at least 1".to_string(),
        ));
    }

    let (len, k_vars) = data.dim();
    let required = required_observations(lags, k_vars, trend_terms);
    if len < required {
        return Err(LagError::InsufficientData {
            lags,
            required,
            available: len,
        });
    }

    let rows = len - lags;
    let mut z = Array2::<f64>::zeros((rows, k_vars * lags));

    for j in 1..=lags {
        // Block j = y_{t-j} for t in lags..len
        let col = (j - 1) * k_vars;
        z.slice_mut(s![.., col..col + k_vars])
            .assign(&data.slice(s![lags - j..len - j, ..]));
    }

    let y = data.slice(s![lags.., ..]).to_owned();
    Ok((z, y))
}
