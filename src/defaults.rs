//! Default constants for lag order search and reporting.

pub const DEFAULT_MAX_LAGS: usize = 5;
pub const MAX_LAGS_LIMIT: usize = 10;
pub const DEFAULT_PREVIEW_ROWS: usize = 5;
/// Cholesky pivots at or below this fraction of their diagonal entry are
/// treated as a singular residual covariance.
pub const CHOLESKY_EPS: f64 = 1e-12;
