//! Text and CSV rendering of previews and search results.

use std::fmt;
use std::io::Write;

use serde::Serialize;

use crate::data::DataPreview;
use crate::types::{IcKind, LagSearch};

/// One CSV row of a lag order search.
#[derive(Debug, Serialize)]
struct ResultRow {
    lags: usize,
    nobs: usize,
    log_likelihood: f64,
    aic: f64,
    bic: f64,
    hqic: f64,
}

/// Write `search` as CSV with header `lags,nobs,log_likelihood,aic,bic,hqic`.
///
/// Only fitted lag orders are written, ascending.
pub fn write_results_csv<W: Write>(search: &LagSearch, writer: W) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    for entry in search.entries.values() {
        wtr.serialize(ResultRow {
            lags: entry.lags,
            nobs: entry.nobs,
            log_likelihood: entry.log_likelihood,
            aic: entry.scores.aic,
            bic: entry.scores.bic,
            hqic: entry.scores.hqic,
        })?;
    }
    wtr.flush()?;
    Ok(())
}

/// Right-align a grid of cells under `header`, with `index` as row labels.
///
/// Rows shorter than `header` leave their trailing columns blank; cells past
/// the last header column are not shown.
fn write_grid(
    f: &mut fmt::Formatter<'_>,
    header: &[String],
    index: &[String],
    rows: &[Vec<String>],
) -> fmt::Result {
    let index_width = index.iter().map(String::len).max().unwrap_or(0);
    let widths: Vec<usize> = header
        .iter()
        .enumerate()
        .map(|(j, h)| {
            rows.iter()
                .filter_map(|r| r.get(j).map(String::len))
                .chain(std::iter::once(h.len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    write!(f, "{:index_width$}", "")?;
    for (h, &w) in header.iter().zip(&widths) {
        write!(f, "  {h:>w$}")?;
    }
    writeln!(f)?;

    for (label, row) in index.iter().zip(rows) {
        write!(f, "{label:>index_width$}")?;
        for (cell, &w) in row.iter().zip(&widths) {
            write!(f, "  {cell:>w$}")?;
        }
        writeln!(f)?;
    }
    Ok(())
}

impl fmt::Display for DataPreview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let index: Vec<String> = (0..self.rows.len()).map(|i| i.to_string()).collect();
        write_grid(f, &self.names, &index, &self.rows)?;
        if self.total_rows > self.rows.len() {
            writeln!(
                f,
                "[{} of {} rows x {} columns]",
                self.rows.len(),
                self.total_rows,
                self.names.len()
            )?;
        }
        Ok(())
    }
}

impl fmt::Display for LagSearch {
    /// Lag order as row index, one column per criterion.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header: Vec<String> = IcKind::ALL.iter().map(|k| k.label().to_string()).collect();
        let index: Vec<String> = self.entries.keys().map(|l| l.to_string()).collect();
        let rows: Vec<Vec<String>> = self
            .entries
            .values()
            .map(|e| {
                IcKind::ALL
                    .iter()
                    .map(|&k| format!("{:.6}", e.scores.get(k)))
                    .collect()
            })
            .collect();
        write_grid(f, &header, &index, &rows)
    }
}
