use std::collections::BTreeMap;

use ndarray::Array2;
use tracing::{debug, info, warn};

use crate::data::Dataset;
use crate::types::{
    CriterionScores, IcKind, LagEntry, LagError, LagFailure, LagOrder, LagSearch, Scaling,
    SearchOptions, VarFit,
};
use crate::var::{OlsVar, VarEstimator};

/// Score every lag order in `1..=max_lags` with the default least-squares
/// estimator (intercept per equation, criteria per observation).
pub fn search_lags(dataset: &Dataset, max_lags: LagOrder) -> Result<LagSearch, LagError> {
    let opts = SearchOptions {
        max_lags,
        ..SearchOptions::default()
    };
    search_lags_opts(dataset, &opts)
}

/// Like [`search_lags`], with trend and scaling taken from `opts`.
pub fn search_lags_opts(dataset: &Dataset, opts: &SearchOptions) -> Result<LagSearch, LagError> {
    let estimator = OlsVar::new(opts.trend);
    search_lags_with(dataset, &estimator, opts)
}

/// Fit `estimator` at every lag order in `1..=opts.max_lags`, in ascending
/// order, and compute AIC/BIC/HQIC for each fit.
///
/// A lag order that fails is logged, recorded in `LagSearch::failures` and
/// skipped; the remaining orders are still evaluated.
///
/// # Errors
/// The whole search fails when:
/// * `opts.max_lags` is outside `1..=MAX_LAGS_LIMIT`
/// * the dataset has fewer than two variables, text columns or non-finite values
/// * lag order 1 lacks data
/// * no lag order could be fit at all
pub fn search_lags_with<E>(
    dataset: &Dataset,
    estimator: &E,
    opts: &SearchOptions,
) -> Result<LagSearch, LagError>
where
    E: VarEstimator + ?Sized,
{
    let opts = opts.clone().validated()?;
    let data = dataset.to_matrix()?;

    let mut entries = BTreeMap::new();
    let mut failures = Vec::new();

    for lags in 1..=opts.max_lags {
        match evaluate_lag(estimator, &data, lags, opts.scaling) {
            Ok(entry) => {
                debug!(
                    lags,
                    nobs = entry.nobs,
                    llf = entry.log_likelihood,
                    aic = entry.scores.aic,
                    bic = entry.scores.bic,
                    hqic = entry.scores.hqic,
                    "fitted lag order"
                );
                entries.insert(lags, entry);
            }
            // Too short for the smallest order: nothing larger can fit either.
            Err(error @ LagError::InsufficientData { .. }) if lags == 1 => return Err(error),
            Err(error) => {
                warn!(lags, error = %error, "Error fitting model with {} lags", lags);
                failures.push(LagFailure { lags, error });
            }
        }
    }

    if entries.is_empty() {
        return Err(LagError::NoLagOrderFitted {
            max_lags: opts.max_lags,
            failures,
        });
    }

    info!(
        max_lags = opts.max_lags,
        fitted = entries.len(),
        failed = failures.len(),
        "lag order search finished"
    );

    Ok(LagSearch {
        max_lags: opts.max_lags,
        entries,
        failures,
    })
}

/// Fit one lag order and score it. The fitted model is dropped on return.
fn evaluate_lag<E>(
    estimator: &E,
    data: &Array2<f64>,
    lags: LagOrder,
    scaling: Scaling,
) -> Result<LagEntry, LagError>
where
    E: VarEstimator + ?Sized,
{
    let fit: VarFit = estimator.fit(data, lags)?;
    if fit.k_ar != lags {
        return Err(LagError::InvalidFit(format!(
            "estimator returned {} lags, expected {lags}",
            fit.k_ar
        )));
    }

    let n_params = fit.n_params();
    let scores = CriterionScores::from_fit(fit.log_likelihood, fit.nobs, n_params, scaling)?;
    if !scores.is_finite() {
        return Err(LagError::NonFiniteCriterion { lags });
    }

    Ok(LagEntry {
        lags,
        nobs: fit.nobs,
        log_likelihood: fit.log_likelihood,
        n_params,
        scores,
    })
}

impl LagSearch {
    /// Lag orders that were fit, ascending.
    pub fn lag_orders(&self) -> Vec<LagOrder> {
        self.entries.keys().copied().collect()
    }

    pub fn get(&self, lags: LagOrder) -> Option<&CriterionScores> {
        self.entries.get(&lags).map(|e| &e.scores)
    }

    /// True when every order in `1..=max_lags` was fit.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && self.entries.len() == self.max_lags
    }

    /// Lag order minimising `kind`; ties go to the smaller order.
    pub fn best(&self, kind: IcKind) -> Option<LagOrder> {
        let mut best: Option<(LagOrder, f64)> = None;
        for (&lags, entry) in &self.entries {
            let value = entry.scores.get(kind);
            match best {
                Some((_, v)) if value >= v => {}
                _ => best = Some((lags, value)),
            }
        }
        best.map(|(lags, _)| lags)
    }

    /// Preferred lag order under each criterion.
    pub fn selected_orders(&self) -> Vec<(IcKind, LagOrder)> {
        IcKind::ALL
            .iter()
            .filter_map(|&kind| self.best(kind).map(|lags| (kind, lags)))
            .collect()
    }

    /// One message per failed lag order, ascending.
    pub fn diagnostics(&self) -> Vec<String> {
        self.failures
            .iter()
            .map(|f| format!("Error fitting model with {} lags: {}", f.lags, f.error))
            .collect()
    }
}
