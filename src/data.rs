use ndarray::Array2;

use crate::types::LagError;

/// Values of one dataset column.
#[derive(Clone, Debug, PartialEq)]
pub enum Column {
    Numeric(Vec<f64>),
    Text(Vec<String>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(v) => v.len(),
            Column::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Column::Numeric(_))
    }

    /// Builds a column from raw cells, numeric iff every cell parses as `f64`.
    pub fn infer(cells: Vec<String>) -> Self {
        let parsed: Option<Vec<f64>> = cells
            .iter()
            .map(|c| c.trim().parse::<f64>().ok())
            .collect();
        match parsed {
            Some(values) => Column::Numeric(values),
            None => Column::Text(cells),
        }
    }

    fn cell(&self, row: usize) -> String {
        match self {
            Column::Numeric(v) => v[row].to_string(),
            Column::Text(v) => v[row].clone(),
        }
    }
}

/// Time-ordered table of named variables.
///
/// Rows are observations in the order they were read; columns are variables.
///
/// # Example
/// ```
/// use var_lags::Dataset;
/// let ds = Dataset::from_numeric(
///     vec!["gdp".into(), "cpi".into()],
///     vec![vec![1.0, 2.0, 3.0], vec![0.5, 0.7, 0.9]],
/// ).unwrap();
/// assert_eq!(ds.n_obs(), 3);
/// assert_eq!(ds.n_vars(), 2);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Dataset {
    names: Vec<String>,
    columns: Vec<Column>,
}

impl Dataset {
    /// Creates a dataset, checking that headers and column lengths agree.
    ///
    /// # Errors
    /// Returns `LagError::EmptyInput` when there are no columns and
    /// `LagError::LengthMismatch` when names and columns disagree or columns
    /// have different lengths.
    pub fn new(names: Vec<String>, columns: Vec<Column>) -> Result<Self, LagError> {
        if columns.is_empty() {
            return Err(LagError::EmptyInput);
        }
        if names.len() != columns.len() {
            return Err(LagError::LengthMismatch);
        }

        let len = columns[0].len();
        for column in columns.iter().skip(1) {
            if column.len() != len {
                return Err(LagError::LengthMismatch);
            }
        }

        Ok(Self { names, columns })
    }

    /// Convenience constructor for purely numeric series.
    pub fn from_numeric(names: Vec<String>, series: Vec<Vec<f64>>) -> Result<Self, LagError> {
        Self::new(names, series.into_iter().map(Column::Numeric).collect())
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn n_obs(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    pub fn n_vars(&self) -> usize {
        self.columns.len()
    }

    /// Names of the columns that are not numeric.
    pub fn text_columns(&self) -> Vec<&str> {
        self.names
            .iter()
            .zip(self.columns.iter())
            .filter(|(_, c)| !c.is_numeric())
            .map(|(n, _)| n.as_str())
            .collect()
    }

    /// Drops every text column, keeping order of the remaining ones.
    ///
    /// # Errors
    /// `EmptyInput` if no numeric column is left.
    pub fn numeric_only(self) -> Result<Self, LagError> {
        let (names, columns): (Vec<String>, Vec<Column>) = self
            .names
            .into_iter()
            .zip(self.columns)
            .filter(|(_, c)| c.is_numeric())
            .unzip();
        Self::new(names, columns)
    }

    /// First `n` rows as display strings.
    pub fn head(&self, n: usize) -> DataPreview {
        let rows = (0..n.min(self.n_obs()))
            .map(|r| self.columns.iter().map(|c| c.cell(r)).collect())
            .collect();
        DataPreview {
            names: self.names.clone(),
            rows,
            total_rows: self.n_obs(),
        }
    }

    /// Checks the dataset can be handed to a VAR estimator and returns the
    /// observations as an `(n_obs x n_vars)` matrix.
    ///
    /// # Errors
    /// * `TooFewVariables` if fewer than two columns are present
    /// * `NonNumeric` for the first text column
    /// * `NonFinite` for the first NaN or infinite value
    /// * `EmptyInput` if there are no rows
    pub fn to_matrix(&self) -> Result<Array2<f64>, LagError> {
        if self.n_vars() < 2 {
            return Err(LagError::TooFewVariables {
                found: self.n_vars(),
            });
        }

        let rows = self.n_obs();
        if rows == 0 {
            return Err(LagError::EmptyInput);
        }

        let mut x = Array2::<f64>::zeros((rows, self.n_vars()));
        for (j, (name, column)) in self.names.iter().zip(self.columns.iter()).enumerate() {
            let values = match column {
                Column::Numeric(v) => v,
                Column::Text(_) => {
                    return Err(LagError::NonNumeric {
                        column: name.clone(),
                    })
                }
            };
            for (r, &v) in values.iter().enumerate() {
                if !v.is_finite() {
                    return Err(LagError::NonFinite {
                        column: name.clone(),
                        row: r,
                    });
                }
                x[[r, j]] = v;
            }
        }

        Ok(x)
    }
}

/// Leading rows of a dataset, rendered by `report`.
#[derive(Clone, Debug, PartialEq)]
pub struct DataPreview {
    pub names: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub total_rows: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(n: &[&str]) -> Vec<String> {
        n.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_new_empty() {
        let result = Dataset::new(vec![], vec![]);
        assert!(matches!(result, Err(LagError::EmptyInput)));
    }

    #[test]
    fn test_new_length_mismatch_columns() {
        let result = Dataset::from_numeric(names(&["a", "b"]), vec![vec![1.0, 2.0], vec![3.0]]);
        assert!(matches!(result, Err(LagError::LengthMismatch)));
    }

    #[test]
    fn test_new_length_mismatch_names() {
        let result = Dataset::from_numeric(names(&["a"]), vec![vec![1.0], vec![3.0]]);
        assert!(matches!(result, Err(LagError::LengthMismatch)));
    }

    #[test]
    fn test_infer_column_types() {
        let numeric = Column::infer(vec!["1.5".into(), " 2 ".into(), "-3e2".into()]);
        assert_eq!(numeric, Column::Numeric(vec![1.5, 2.0, -300.0]));

        let text = Column::infer(vec!["2020-01".into(), "2020-02".into()]);
        assert!(!text.is_numeric());

        let with_gap = Column::infer(vec!["1.0".into(), "".into()]);
        assert!(!with_gap.is_numeric());
    }

    #[test]
    fn test_to_matrix_layout() {
        let ds = Dataset::from_numeric(
            names(&["a", "b"]),
            vec![vec![1.0, 2.0, 3.0], vec![10.0, 20.0, 30.0]],
        )
        .unwrap();
        let x = ds.to_matrix().unwrap();
        assert_eq!(x.shape(), &[3, 2]);
        assert_eq!(x[[0, 0]], 1.0);
        assert_eq!(x[[2, 1]], 30.0);
    }

    #[test]
    fn test_to_matrix_rejects_single_variable() {
        let ds = Dataset::from_numeric(names(&["a"]), vec![vec![1.0, 2.0, 3.0]]).unwrap();
        assert!(matches!(
            ds.to_matrix(),
            Err(LagError::TooFewVariables { found: 1 })
        ));
    }

    #[test]
    fn test_to_matrix_rejects_text_column() {
        let ds = Dataset::new(
            names(&["date", "a"]),
            vec![
                Column::Text(vec!["jan".into(), "feb".into()]),
                Column::Numeric(vec![1.0, 2.0]),
            ],
        )
        .unwrap();
        match ds.to_matrix() {
            Err(LagError::NonNumeric { column }) => assert_eq!(column, "date"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_to_matrix_rejects_nan() {
        let ds = Dataset::from_numeric(
            names(&["a", "b"]),
            vec![vec![1.0, f64::NAN], vec![3.0, 4.0]],
        )
        .unwrap();
        assert!(matches!(
            ds.to_matrix(),
            Err(LagError::NonFinite { row: 1, .. })
        ));
    }

    #[test]
    fn test_numeric_only_drops_text() {
        let ds = Dataset::new(
            names(&["date", "a", "b"]),
            vec![
                Column::Text(vec!["jan".into(), "feb".into()]),
                Column::Numeric(vec![1.0, 2.0]),
                Column::Numeric(vec![3.0, 4.0]),
            ],
        )
        .unwrap();
        assert_eq!(ds.text_columns(), vec!["date"]);

        let numeric = ds.numeric_only().unwrap();
        assert_eq!(numeric.names(), &["a".to_string(), "b".to_string()]);
        assert!(numeric.to_matrix().is_ok());
    }

    #[test]
    fn test_numeric_only_on_all_text_is_empty() {
        let ds = Dataset::new(
            names(&["date", "label"]),
            vec![
                Column::Text(vec!["jan".into(), "feb".into()]),
                Column::Text(vec!["x".into(), "y".into()]),
            ],
        )
        .unwrap();
        assert!(matches!(ds.numeric_only(), Err(LagError::EmptyInput)));
    }

    #[test]
    fn test_head_truncates() {
        let ds = Dataset::from_numeric(
            names(&["a", "b"]),
            vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]],
        )
        .unwrap();
        let preview = ds.head(2);
        assert_eq!(preview.rows.len(), 2);
        assert_eq!(preview.rows[1], vec!["2".to_string(), "5".to_string()]);
        assert_eq!(preview.total_rows, 3);

        assert_eq!(ds.head(10).rows.len(), 3);
    }
}
