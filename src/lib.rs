//! # var_lags
//!
//! Lag order selection for vector autoregressions (VAR).
//!
//! For every lag order `1..=max_lags` the crate fits a VAR by least squares,
//! takes the fit's log-likelihood `L`, effective sample size `n` and parameter
//! count `k = lags × variables`, and scores it with AIC, BIC and HQIC.
//! Lag orders that cannot be fit are reported individually and do not stop
//! the search.
//!
//! ## Example
//!
//! ```
//! use var_lags::{search_lags, Dataset, IcKind};
//!
//! // Two series that feed into each other with a one-period delay
//! let len = 60;
//! let mut a = vec![0.0; len];
//! let mut b = vec![0.0; len];
//! for t in 1..len {
//!     let shock_a = ((t * 37 % 17) as f64 - 8.0) / 8.0;
//!     let shock_b = ((t * 53 % 23) as f64 - 11.0) / 11.0;
//!     a[t] = 0.5 * a[t - 1] + 0.2 * b[t - 1] + shock_a;
//!     b[t] = 0.3 * a[t - 1] + 0.4 * b[t - 1] + shock_b;
//! }
//!
//! let ds = Dataset::from_numeric(vec!["a".into(), "b".into()], vec![a, b]).unwrap();
//! let result = search_lags(&ds, 4).unwrap();
//!
//! for (lags, entry) in &result.entries {
//!     println!("{lags}: AIC={:.4} BIC={:.4} HQIC={:.4}",
//!         entry.scores.aic, entry.scores.bic, entry.scores.hqic);
//! }
//! println!("BIC prefers {:?} lags", result.best(IcKind::Bic));
//! ```

// Module declarations
pub mod criteria;
pub mod data;
mod defaults;
pub mod design;
pub mod loader;
pub mod report;
mod select;
mod types;
pub mod var;

// Re-export public types
pub use data::{Column, DataPreview, Dataset};
pub use defaults::{DEFAULT_MAX_LAGS, DEFAULT_PREVIEW_ROWS, MAX_LAGS_LIMIT};
pub use types::{
    CriterionScores, IcKind, LagEntry, LagError, LagFailure, LagOrder, LagSearch, LoadError,
    Scaling, SearchOptions, Trend, VarFit,
};

// Re-export main public functions
pub use loader::{load_dataset, DataFormat};
pub use report::write_results_csv;
pub use select::{search_lags, search_lags_opts, search_lags_with};
pub use var::{fit_var, OlsVar, VarEstimator};

#[cfg(test)]
mod integration_tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    /// Two linearly related series with noise: b follows a with one lag.
    fn related_series(len: usize, seed: u64) -> Dataset {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut a = Vec::with_capacity(len);
        let mut b = Vec::with_capacity(len);
        let mut prev_a = 0.0;
        for _ in 0..len {
            let x = 0.6 * prev_a + rng.gen_range(-1.0..1.0);
            let y = 2.0 + 0.8 * prev_a + 0.5 * rng.gen_range(-1.0..1.0);
            a.push(x);
            b.push(y);
            prev_a = x;
        }
        Dataset::from_numeric(vec!["a".into(), "b".into()], vec![a, b]).unwrap()
    }

    #[test]
    fn test_well_conditioned_search_fits_every_order() {
        let ds = related_series(50, 7);
        let result = search_lags(&ds, 5).unwrap();

        assert_eq!(result.lag_orders(), vec![1, 2, 3, 4, 5]);
        assert!(result.failures.is_empty());
        assert!(result.diagnostics().is_empty());
        for entry in result.entries.values() {
            assert!(entry.scores.is_finite());
            assert_eq!(entry.nobs, 50 - entry.lags);
            assert_eq!(entry.n_params, 2 * entry.lags);
        }
    }

    #[test]
    fn test_three_rows_fail_globally() {
        let ds = Dataset::from_numeric(
            vec!["a".into(), "b".into()],
            vec![vec![1.0, 2.0, 4.0], vec![3.0, 1.0, 2.0]],
        )
        .unwrap();
        let result = search_lags(&ds, 5);
        assert!(matches!(
            result,
            Err(LagError::InsufficientData { lags: 1, .. })
        ));
    }

    #[test]
    fn test_txt_upload_rejected_before_search() {
        let result = load_dataset(std::path::Path::new("upload.txt"));
        assert!(matches!(result, Err(LoadError::UnsupportedFormat { .. })));
    }

    #[test]
    fn test_effective_sample_size_round_trip() {
        let ds = related_series(100, 21);
        let result = search_lags(&ds, 3).unwrap();
        assert_eq!(result.entries[&3].nobs, 97);
    }

    #[test]
    fn test_short_series_drops_only_large_orders() {
        // 2 variables with intercept: order p needs 3p + 3 rows, so 20 rows
        // support p <= 5.
        let ds = related_series(20, 3);
        let result = search_lags(&ds, 8).unwrap();

        assert_eq!(result.lag_orders(), vec![1, 2, 3, 4, 5]);
        let failed: Vec<_> = result.failures.iter().map(|f| f.lags).collect();
        assert_eq!(failed, vec![6, 7, 8]);
        assert!(result
            .failures
            .iter()
            .all(|f| matches!(f.error, LagError::InsufficientData { .. })));
    }

    #[test]
    fn test_keys_are_ascending_subset_of_range() {
        for max_lags in 1..=MAX_LAGS_LIMIT {
            let ds = related_series(30, max_lags as u64);
            let result = search_lags(&ds, max_lags).unwrap();
            let keys = result.lag_orders();
            assert!(keys.windows(2).all(|w| w[0] < w[1]));
            assert!(keys.iter().all(|&k| (1..=max_lags).contains(&k)));
            assert_eq!(keys.len() + result.failures.len(), max_lags);
        }
    }

    #[test]
    fn test_search_is_idempotent() {
        let ds = related_series(60, 99);
        let before = ds.clone();
        let first = search_lags(&ds, 4).unwrap();
        let second = search_lags(&ds, 4).unwrap();
        assert_eq!(first.entries, second.entries);
        assert_eq!(ds, before);
    }

    #[test]
    fn test_criteria_ordering_on_real_fits() {
        let ds = related_series(80, 13);
        let result = search_lags(&ds, 4).unwrap();
        for entry in result.entries.values() {
            // n >= 76 here, so ln(n) > 2 and ln(ln(n)) > 1
            assert!(entry.scores.aic <= entry.scores.bic);
            assert!(entry.scores.aic <= entry.scores.hqic);
        }
    }

    #[test]
    fn test_csv_to_results_end_to_end() {
        let ds = related_series(40, 5);
        let mut csv = String::from("date,a,b\n");
        let m = ds.to_matrix().unwrap();
        for t in 0..m.nrows() {
            csv.push_str(&format!("t{t},{},{}\n", m[[t, 0]], m[[t, 1]]));
        }

        let loaded = loader::read_csv(csv.as_bytes()).unwrap();
        assert!(matches!(
            search_lags(&loaded, 2),
            Err(LagError::NonNumeric { .. })
        ));

        let numeric = loaded.numeric_only().unwrap();
        let from_csv = search_lags(&numeric, 2).unwrap();
        let direct = search_lags(&ds, 2).unwrap();
        for lags in [1, 2] {
            let (a, b) = (from_csv.get(lags).unwrap(), direct.get(lags).unwrap());
            assert!((a.aic - b.aic).abs() < 1e-9);
        }
    }

    #[test]
    fn test_small_units_fit_like_original_units() {
        let ds = related_series(80, 31);
        let base = search_lags(&ds, 5).unwrap();

        let m = ds.to_matrix().unwrap();
        for c in [1e-6, 1e-7, 1e6] {
            let series = m.columns().into_iter().map(|col| col.mapv(|v| v * c).to_vec());
            let scaled =
                Dataset::from_numeric(vec!["a".into(), "b".into()], series.collect()).unwrap();
            let result = search_lags(&scaled, 5).unwrap();

            assert_eq!(result.lag_orders(), base.lag_orders());
            assert!(result.failures.is_empty());
            assert!(result.entries.values().all(|e| e.scores.is_finite()));
            assert_eq!(result.best(IcKind::Bic), base.best(IcKind::Bic));
        }
    }

    #[test]
    fn test_constant_column_failure_reason_is_kept() {
        let mut rng = StdRng::seed_from_u64(4);
        let a: Vec<f64> = (0..40).map(|_| rng.gen_range(-1.0..1.0)).collect();
        let ds = Dataset::from_numeric(vec!["a".into(), "c".into()], vec![a, vec![5.0; 40]])
            .unwrap();

        let err = search_lags(&ds, 3).unwrap_err();
        assert!(err.to_string().contains("first failure at 1 lags"), "{err}");
        match err {
            LagError::NoLagOrderFitted { failures, .. } => {
                let failed: Vec<_> = failures.iter().map(|f| f.lags).collect();
                assert_eq!(failed, vec![1, 2, 3]);
                assert!(failures
                    .iter()
                    .all(|f| matches!(f.error, LagError::Singular { .. } | LagError::Linalg(_))));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_strong_lag_two_dynamics_are_detected() {
        let mut rng = StdRng::seed_from_u64(42);
        let len = 300;
        let mut a = vec![0.0; len];
        let mut b = vec![0.0; len];
        for t in 2..len {
            a[t] = 0.1 * a[t - 1] + 0.7 * b[t - 2] + rng.gen_range(-0.5..0.5);
            b[t] = -0.6 * a[t - 2] + 0.1 * b[t - 1] + rng.gen_range(-0.5..0.5);
        }
        let ds = Dataset::from_numeric(vec!["a".into(), "b".into()], vec![a, b]).unwrap();
        let result = search_lags(&ds, 6).unwrap();
        assert_eq!(result.best(IcKind::Bic), Some(2));
    }
}
