use std::collections::BTreeMap;

use crate::defaults::{DEFAULT_MAX_LAGS, MAX_LAGS_LIMIT};

/// Autoregressive order of a VAR model.
pub type LagOrder = usize;

/// Deterministic terms included in every VAR equation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Trend {
    /// Intercept per equation.
    #[default]
    Constant,
    /// No deterministic terms.
    None,
}

impl Trend {
    /// Number of deterministic regressors per equation.
    pub fn n_terms(self) -> usize {
        match self {
            Trend::Constant => 1,
            Trend::None => 0,
        }
    }
}

/// Normalisation applied to the information criteria.
///
/// Both conventions rank lag orders identically within one search, since every
/// score is derived from the same `(L, n, k)` triple.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Scaling {
    /// Criteria divided by the effective sample size, e.g. `-2L/n + 2k/n`.
    #[default]
    PerObservation,
    /// Unnormalised criteria, e.g. `-2L + 2k`.
    Total,
}

/// Information-criterion variants.
#[derive(Clone, Debug, Copy, PartialEq, Eq)]
pub enum IcKind {
    Aic,
    Bic,
    Hqic,
}

impl IcKind {
    pub const ALL: [IcKind; 3] = [IcKind::Aic, IcKind::Bic, IcKind::Hqic];

    pub fn label(self) -> &'static str {
        match self {
            IcKind::Aic => "AIC",
            IcKind::Bic => "BIC",
            IcKind::Hqic => "HQIC",
        }
    }
}

/// Options for a lag order search.
///
/// # Example
/// ```
/// use var_lags::{Scaling, SearchOptions, Trend};
/// let opts = SearchOptions {
///     max_lags: 8,
///     trend: Trend::Constant,
///     scaling: Scaling::PerObservation,
/// };
/// assert!(opts.validated().is_ok());
/// ```
#[derive(Clone, Debug)]
pub struct SearchOptions {
    /// Largest lag order to evaluate; every order in `1..=max_lags` is fit.
    pub max_lags: LagOrder,
    /// Deterministic terms used by the default estimator.
    pub trend: Trend,
    /// Criterion normalisation.
    pub scaling: Scaling,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_lags: DEFAULT_MAX_LAGS,
            trend: Trend::default(),
            scaling: Scaling::default(),
        }
    }
}

impl SearchOptions {
    /// Checks that `max_lags` lies in `1..=MAX_LAGS_LIMIT`.
    pub fn validated(self) -> Result<Self, LagError> {
        if self.max_lags == 0 || self.max_lags > MAX_LAGS_LIMIT {
            return Err(LagError::InvalidConfig(format!(
                "max_lags must be between 1 and {MAX_LAGS_LIMIT}, got {}",
                self.max_lags
            )));
        }
        Ok(self)
    }
}

/// Statistics extracted from one VAR estimation.
#[derive(Clone, Debug, PartialEq)]
pub struct VarFit {
    /// Gaussian log-likelihood of the fitted model.
    pub log_likelihood: f64,
    /// Observations used after dropping the first `k_ar` rows.
    pub nobs: usize,
    /// Number of autoregressive lags.
    pub k_ar: LagOrder,
    /// Number of modelled variables.
    pub k_vars: usize,
}

impl VarFit {
    /// Parameter count used by the information criteria: `k_ar * k_vars`.
    pub fn n_params(&self) -> usize {
        self.k_ar * self.k_vars
    }
}

/// AIC, BIC and HQIC computed from the same fit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CriterionScores {
    pub aic: f64,
    pub bic: f64,
    pub hqic: f64,
}

impl CriterionScores {
    pub fn get(&self, kind: IcKind) -> f64 {
        match kind {
            IcKind::Aic => self.aic,
            IcKind::Bic => self.bic,
            IcKind::Hqic => self.hqic,
        }
    }
}

/// One successfully evaluated lag order.
#[derive(Clone, Debug, PartialEq)]
pub struct LagEntry {
    pub lags: LagOrder,
    pub nobs: usize,
    pub log_likelihood: f64,
    pub n_params: usize,
    pub scores: CriterionScores,
}

/// A lag order that could not be evaluated.
#[derive(Debug)]
pub struct LagFailure {
    pub lags: LagOrder,
    pub error: LagError,
}

/// Outcome of a lag order search.
///
/// `entries` is keyed by lag order in ascending order; orders that failed are
/// absent from it and listed in `failures` instead.
#[derive(Debug)]
pub struct LagSearch {
    pub max_lags: LagOrder,
    pub entries: BTreeMap<LagOrder, LagEntry>,
    pub failures: Vec<LagFailure>,
}

/// Library error type for estimation and search.
#[derive(thiserror::Error, Debug)]
pub enum LagError {
    #[error("empty input")]
    EmptyInput,
    #[error("input lengths mismatch")]
    LengthMismatch,
    #[error("VAR needs at least two variables, found {found}")]
    TooFewVariables { found: usize },
    #[error("column '{column}' is not numeric")]
    NonNumeric { column: String },
    #[error("column '{column}' has a non-finite value at row {row}")]
    NonFinite { column: String, row: usize },
    #[error(
        "insufficient data for {lags} lags (need {required} observations, have {available})"
    )]
    InsufficientData {
        lags: LagOrder,
        required: usize,
        available: usize,
    },
    #[error("residual covariance is singular for {lags} lags")]
    Singular { lags: LagOrder },
    #[error("linear algebra failure: {0}")]
    Linalg(String),
    #[error("invalid fit: {0}")]
    InvalidFit(String),
    #[error("non-finite information criterion for {lags} lags")]
    NonFiniteCriterion { lags: LagOrder },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(
        "no lag order between 1 and {max_lags} could be fit{}",
        first_failure(.failures)
    )]
    NoLagOrderFitted {
        max_lags: LagOrder,
        failures: Vec<LagFailure>,
    },
}

fn first_failure(failures: &[LagFailure]) -> String {
    match failures.first() {
        Some(f) => format!(" (first failure at {} lags: {})", f.lags, f.error),
        None => String::new(),
    }
}

/// Errors raised while reading a dataset from disk.
#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("unsupported format '{extension}' (expected csv, xlsx, xlsm, xls or ods)")]
    UnsupportedFormat { extension: String },
    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("unreadable spreadsheet: {0}")]
    Spreadsheet(String),
    #[error("row {row} has {found} fields, expected {expected}")]
    Ragged {
        row: usize,
        found: usize,
        expected: usize,
    },
    #[error("dataset is empty")]
    Empty,
}
