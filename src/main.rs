// var-lags: lag order selection for VAR models from the command line
use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::Level;

use var_lags::{
    load_dataset, search_lags_opts, write_results_csv, LagError, Scaling, SearchOptions, Trend,
    DEFAULT_MAX_LAGS, DEFAULT_PREVIEW_ROWS, MAX_LAGS_LIMIT,
};

#[derive(Parser)]
#[command(name = "var-lags")]
#[command(version)]
#[command(about = "Optimal lag selection for multivariate time series (AIC, BIC, HQIC)", long_about = None)]
struct Cli {
    /// Input dataset (.csv, .xlsx, .xlsm, .xls or .ods), one column per series
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Maximum number of lags to evaluate
    #[arg(short = 'm', long, default_value_t = DEFAULT_MAX_LAGS, value_parser = parse_max_lags)]
    max_lags: usize,

    /// Number of rows shown in the data preview
    #[arg(long, default_value_t = DEFAULT_PREVIEW_ROWS)]
    preview_rows: usize,

    /// Drop non-numeric columns (e.g. dates) before fitting
    #[arg(long)]
    numeric_only: bool,

    /// Deterministic terms in each VAR equation
    #[arg(long, value_enum, default_value_t = TrendArg::Constant)]
    trend: TrendArg,

    /// Normalisation of the information criteria
    #[arg(long, value_enum, default_value_t = ScalingArg::PerObservation)]
    scaling: ScalingArg,

    /// Also write the results table to this CSV file
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Log progress to stderr (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, ValueEnum)]
enum TrendArg {
    Constant,
    None,
}

impl From<TrendArg> for Trend {
    fn from(arg: TrendArg) -> Self {
        match arg {
            TrendArg::Constant => Trend::Constant,
            TrendArg::None => Trend::None,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ScalingArg {
    PerObservation,
    Total,
}

impl From<ScalingArg> for Scaling {
    fn from(arg: ScalingArg) -> Self {
        match arg {
            ScalingArg::PerObservation => Scaling::PerObservation,
            ScalingArg::Total => Scaling::Total,
        }
    }
}

fn parse_max_lags(s: &str) -> Result<usize, String> {
    let value: usize = s.parse().map_err(|_| format!("'{s}' is not a number"))?;
    if (1..=MAX_LAGS_LIMIT).contains(&value) {
        Ok(value)
    } else {
        Err(format!("must be between 1 and {MAX_LAGS_LIMIT}"))
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::ERROR,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut dataset = load_dataset(&cli.input)
        .with_context(|| format!("Failed to load dataset: {}", cli.input.display()))?;

    println!("Data preview:");
    println!("{}", dataset.head(cli.preview_rows));

    if cli.numeric_only {
        dataset = dataset
            .numeric_only()
            .context("No numeric columns left after dropping text columns")?;
    }
    let text_columns: Vec<String> = dataset
        .text_columns()
        .into_iter()
        .map(str::to_string)
        .collect();

    let opts = SearchOptions {
        max_lags: cli.max_lags,
        trend: cli.trend.into(),
        scaling: cli.scaling.into(),
    };
    let searched = search_lags_opts(&dataset, &opts);
    if let Err(LagError::NoLagOrderFitted { failures, .. }) = &searched {
        for f in failures {
            eprintln!("Error fitting model with {} lags: {}", f.lags, f.error);
        }
    }
    let result = searched.with_context(|| {
        if text_columns.is_empty() {
            "Lag order search failed".to_string()
        } else {
            format!(
                "Lag order search failed; non-numeric columns {text_columns:?} can be dropped with --numeric-only"
            )
        }
    })?;

    println!("Optimal lags results:");
    println!("{result}");

    let selected: Vec<String> = result
        .selected_orders()
        .into_iter()
        .map(|(kind, lags)| format!("{}={lags}", kind.label()))
        .collect();
    println!("Selected lag order: {}", selected.join("  "));

    let diagnostics = result.diagnostics();
    if !diagnostics.is_empty() {
        println!();
        for line in &diagnostics {
            println!("{line}");
        }
    }

    if let Some(path) = &cli.output {
        let file = File::create(path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        write_results_csv(&result, file)
            .with_context(|| format!("Failed to write results: {}", path.display()))?;
        println!("Results written to {}", path.display());
    }

    Ok(())
}
