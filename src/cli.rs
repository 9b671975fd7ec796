//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, warn};

use crate::adapters::console_report_adapter::ConsoleReportAdapter;
use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_report_adapter::JsonReportAdapter;
use crate::adapters::svg_chart_adapter::SvgChartAdapter;
use crate::domain::backtest::{self as backtest_engine, BacktestConfig, BacktestResult};
use crate::domain::config_validation::{parse_optional_date, validate_all, validate_report_format};
use crate::domain::error::TurtleError;
use crate::domain::metrics::MetricsParams;
use crate::domain::strategy::{
    SignalPriority, TurtleParams, DEFAULT_ATR_PERIOD, DEFAULT_ENTRY_WINDOW, DEFAULT_EXIT_WINDOW,
};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;
use chrono::NaiveDate;

#[derive(Parser, Debug)]
#[command(name = "turtletrader", about = "Turtle breakout strategy backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        /// Overrides [data] symbol
        #[arg(long)]
        symbol: Option<String>,
        /// Overrides [report] output
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// svg, json or none; overrides [report] format
        #[arg(short, long)]
        format: Option<String>,
        #[arg(long)]
        dry_run: bool,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let outcome = match cli.command {
        Command::Backtest {
            config,
            symbol,
            output,
            format,
            dry_run,
        } => {
            if dry_run {
                run_validate(&config)
            } else {
                run_backtest(&config, symbol.as_deref(), output, format.as_deref())
            }
        }
        Command::Validate { config } => run_validate(&config),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DataSettings {
    pub source: String,
    pub symbol: String,
    pub path: Option<PathBuf>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, TurtleError> {
    info!(path = %path.display(), "loading config");
    FileConfigAdapter::from_file(path)
}

fn window(config: &dyn ConfigPort, key: &str, default: usize) -> usize {
    usize::try_from(config.get_int("turtle", key, default as i64)).unwrap_or(default)
}

pub fn build_backtest_config(config: &dyn ConfigPort) -> Result<BacktestConfig, TurtleError> {
    let priority = match config.get_string("turtle", "priority") {
        Some(p) => p
            .parse::<SignalPriority>()
            .map_err(|reason| TurtleError::config_invalid("turtle", "priority", reason))?,
        None => SignalPriority::default(),
    };

    let defaults = MetricsParams::default();

    Ok(BacktestConfig {
        turtle: TurtleParams {
            entry_window: window(config, "entry_window", DEFAULT_ENTRY_WINDOW),
            exit_window: window(config, "exit_window", DEFAULT_EXIT_WINDOW),
            atr_period: window(config, "atr_period", DEFAULT_ATR_PERIOD),
            priority,
        },
        metrics: MetricsParams {
            trading_days_per_year: config.get_double(
                "metrics",
                "trading_days_per_year",
                defaults.trading_days_per_year,
            ),
            calendar_days_per_year: config.get_double(
                "metrics",
                "calendar_days_per_year",
                defaults.calendar_days_per_year,
            ),
        },
    })
}

pub fn build_data_settings(
    config: &dyn ConfigPort,
    symbol_override: Option<&str>,
) -> Result<DataSettings, TurtleError> {
    let symbol = match symbol_override {
        Some(s) => s.trim().to_string(),
        None => config
            .get_string("data", "symbol")
            .ok_or_else(|| TurtleError::ConfigMissing {
                section: "data".into(),
                key: "symbol".into(),
            })?,
    };

    Ok(DataSettings {
        source: config
            .get_string("data", "source")
            .unwrap_or_else(|| "csv".to_string())
            .to_lowercase(),
        symbol,
        path: config.get_string("data", "path").map(PathBuf::from),
        start: parse_optional_date(config, "start_date")?,
        end: parse_optional_date(config, "end_date")?,
    })
}

pub fn build_data_port(
    settings: &DataSettings,
    config: &dyn ConfigPort,
) -> Result<Box<dyn DataPort>, TurtleError> {
    match settings.source.as_str() {
        "csv" => {
            let path = settings
                .path
                .clone()
                .ok_or_else(|| TurtleError::ConfigMissing {
                    section: "data".into(),
                    key: "path".into(),
                })?;
            Ok(Box::new(CsvAdapter::new(path)))
        }
        "eodhd" => {
            #[cfg(feature = "eodhd")]
            {
                use crate::adapters::eodhd_adapter::EodhdAdapter;
                Ok(Box::new(EodhdAdapter::from_config(config)?))
            }

            #[cfg(not(feature = "eodhd"))]
            {
                let _ = config;
                Err(TurtleError::DataSource {
                    reason: "eodhd feature is required for source = eodhd".into(),
                })
            }
        }
        other => Err(TurtleError::config_invalid(
            "data",
            "source",
            format!("unknown source '{other}'"),
        )),
    }
}

/// Console summary unless `[report] quiet` is set, plus an SVG chart or JSON
/// file unless the format is `none`.
pub fn build_report_ports(
    config: &dyn ConfigPort,
    output_override: Option<PathBuf>,
    format_override: Option<&str>,
) -> Result<Vec<Box<dyn ReportPort>>, TurtleError> {
    let format = format_override
        .map(str::to_string)
        .or_else(|| config.get_string("report", "format"))
        .unwrap_or_else(|| "svg".to_string())
        .to_lowercase();
    validate_report_format(&format)?;

    let output = output_override
        .or_else(|| config.get_string("report", "output").map(PathBuf::from));

    let mut ports: Vec<Box<dyn ReportPort>> = Vec::new();
    if !config.get_bool("report", "quiet", false) {
        ports.push(Box::new(ConsoleReportAdapter));
    }
    match format.as_str() {
        "svg" => ports.push(Box::new(SvgChartAdapter::new(
            output.unwrap_or_else(|| PathBuf::from("report.svg")),
        ))),
        "json" => ports.push(Box::new(JsonReportAdapter::new(
            output.unwrap_or_else(|| PathBuf::from("report.json")),
        ))),
        _ => {
            if let Some(path) = output {
                warn!(path = %path.display(), "output ignored for format none");
            }
        }
    }
    Ok(ports)
}

/// Fetch → backtest → report.
pub fn run_backtest_pipeline(
    data_port: &dyn DataPort,
    settings: &DataSettings,
    bt_config: &BacktestConfig,
    reports: &[Box<dyn ReportPort>],
) -> Result<BacktestResult, TurtleError> {
    info!(
        symbol = %settings.symbol,
        source = %settings.source,
        start = ?settings.start,
        end = ?settings.end,
        "fetching prices"
    );
    let records = data_port.fetch_prices(&settings.symbol, settings.start, settings.end)?;
    info!(records = records.len(), "fetched price records");

    let result = backtest_engine::run(records, bt_config)?;

    for report in reports {
        report.write(&result, &settings.symbol)?;
    }
    Ok(result)
}

fn run_backtest(
    config_path: &Path,
    symbol: Option<&str>,
    output: Option<PathBuf>,
    format: Option<&str>,
) -> Result<(), TurtleError> {
    // Stage 1: Load and validate config
    let config = load_config(config_path)?;
    validate_all(&config)?;

    // Stage 2: Build parameters and ports
    let bt_config = build_backtest_config(&config)?;
    let settings = build_data_settings(&config, symbol)?;
    let data_port = build_data_port(&settings, &config)?;
    let reports = build_report_ports(&config, output, format)?;

    eprintln!(
        "Running turtle backtest on {} (entry {}, exit {}, ATR {}, {})",
        settings.symbol,
        bt_config.turtle.entry_window,
        bt_config.turtle.exit_window,
        bt_config.turtle.atr_period,
        bt_config.turtle.priority,
    );

    // Stage 3: Fetch, run, report
    run_backtest_pipeline(data_port.as_ref(), &settings, &bt_config, &reports)?;
    Ok(())
}

fn run_validate(config_path: &Path) -> Result<(), TurtleError> {
    let config = load_config(config_path)?;
    validate_all(&config)?;

    let bt_config = build_backtest_config(&config)?;
    let settings = build_data_settings(&config, None)?;

    eprintln!("Data:");
    eprintln!("  source: {}", settings.source);
    eprintln!("  symbol: {}", settings.symbol);
    if let Some(path) = &settings.path {
        eprintln!("  path:   {}", path.display());
    }
    eprintln!(
        "  range:  {} to {}",
        settings.start.map_or_else(|| "start".to_string(), |d| d.to_string()),
        settings.end.map_or_else(|| "end".to_string(), |d| d.to_string()),
    );

    eprintln!("\nTurtle system:");
    eprintln!("  entry window: {}", bt_config.turtle.entry_window);
    eprintln!("  exit window:  {}", bt_config.turtle.exit_window);
    eprintln!("  ATR period:   {}", bt_config.turtle.atr_period);
    eprintln!("  priority:     {}", bt_config.turtle.priority);
    eprintln!("  minimum bars: {}", bt_config.turtle.min_bars());

    eprintln!("\nConfiguration is valid.");
    Ok(())
}
