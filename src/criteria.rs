use crate::types::{CriterionScores, IcKind, LagError, Scaling};

impl CriterionScores {
    /// Compute AIC, BIC and HQIC from one `(L, n, k)` triple.
    ///
    /// With `Scaling::PerObservation`:
    /// * AIC  = -2L/n + 2k/n
    /// * BIC  = -2L/n + k·ln(n)/n
    /// * HQIC = -2L/n + 2k·ln(ln(n))/n
    ///
    /// `Scaling::Total` drops the division by `n`.
    ///
    /// # Errors
    /// Returns `LagError::InvalidFit` when `nobs < 2`, where `ln(ln(n))` is
    /// undefined.
    pub fn from_fit(
        log_likelihood: f64,
        nobs: usize,
        n_params: usize,
        scaling: Scaling,
    ) -> Result<Self, LagError> {
        if nobs < 2 {
            return Err(LagError::InvalidFit(format!(
                "effective sample size {nobs} is too small for information criteria"
            )));
        }

        let scores = Self {
            aic: ic_value(log_likelihood, nobs, n_params, IcKind::Aic, scaling),
            bic: ic_value(log_likelihood, nobs, n_params, IcKind::Bic, scaling),
            hqic: ic_value(log_likelihood, nobs, n_params, IcKind::Hqic, scaling),
        };
        Ok(scores)
    }

    pub fn is_finite(&self) -> bool {
        self.aic.is_finite() && self.bic.is_finite() && self.hqic.is_finite()
    }
}

/// Single information criterion for a fit.
pub fn ic_value(
    log_likelihood: f64,
    nobs: usize,
    n_params: usize,
    criterion: IcKind,
    scaling: Scaling,
) -> f64 {
    let n = nobs as f64;
    let k = n_params as f64;

    let penalty = match criterion {
        IcKind::Aic => 2.0 * k,
        IcKind::Bic => n.ln() * k,
        IcKind::Hqic => 2.0 * n.ln().ln() * k,
    };
    let total = -2.0 * log_likelihood + penalty;

    match scaling {
        Scaling::PerObservation => total / n,
        Scaling::Total => total,
    }
}
