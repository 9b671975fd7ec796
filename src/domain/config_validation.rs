//! Configuration validation.
//!
//! Validates all config fields before a backtest runs.

use crate::domain::error::TurtleError;
use crate::domain::strategy::SignalPriority;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub const DATA_SOURCES: &[&str] = &["csv", "eodhd"];
pub const REPORT_FORMATS: &[&str] = &["svg", "json", "none"];

pub fn validate_data_config(config: &dyn ConfigPort) -> Result<(), TurtleError> {
    validate_source(config)?;
    validate_symbol(config)?;
    validate_dates(config)?;
    Ok(())
}

pub fn validate_turtle_config(config: &dyn ConfigPort) -> Result<(), TurtleError> {
    for key in ["entry_window", "exit_window", "atr_period"] {
        validate_positive_int(config, "turtle", key)?;
    }
    if let Some(p) = config.get_string("turtle", "priority") {
        p.parse::<SignalPriority>()
            .map_err(|reason| TurtleError::config_invalid("turtle", "priority", reason))?;
    }
    Ok(())
}

pub fn validate_metrics_config(config: &dyn ConfigPort) -> Result<(), TurtleError> {
    for key in ["trading_days_per_year", "calendar_days_per_year"] {
        if let Some(raw) = config.get_string("metrics", key) {
            match raw.parse::<f64>() {
                Ok(v) if v > 0.0 && v.is_finite() => {}
                _ => {
                    return Err(TurtleError::config_invalid(
                        "metrics",
                        key,
                        format!("{key} must be a positive number"),
                    ));
                }
            }
        }
    }
    Ok(())
}

pub fn validate_report_config(config: &dyn ConfigPort) -> Result<(), TurtleError> {
    if let Some(format) = config.get_string("report", "format") {
        validate_report_format(&format)?;
    }
    Ok(())
}

pub fn validate_report_format(format: &str) -> Result<(), TurtleError> {
    if REPORT_FORMATS.contains(&format.to_lowercase().as_str()) {
        Ok(())
    } else {
        Err(TurtleError::config_invalid(
            "report",
            "format",
            format!("unknown format '{format}' (expected svg, json or none)"),
        ))
    }
}

/// All sections, in the order a run consumes them.
pub fn validate_all(config: &dyn ConfigPort) -> Result<(), TurtleError> {
    validate_data_config(config)?;
    validate_turtle_config(config)?;
    validate_metrics_config(config)?;
    validate_report_config(config)?;
    Ok(())
}

fn validate_source(config: &dyn ConfigPort) -> Result<(), TurtleError> {
    let source = config
        .get_string("data", "source")
        .unwrap_or_else(|| "csv".to_string())
        .to_lowercase();

    if !DATA_SOURCES.contains(&source.as_str()) {
        return Err(TurtleError::config_invalid(
            "data",
            "source",
            format!("unknown source '{source}' (expected csv or eodhd)"),
        ));
    }

    if source == "csv" && config.get_string("data", "path").is_none() {
        return Err(TurtleError::ConfigMissing {
            section: "data".to_string(),
            key: "path".to_string(),
        });
    }
    Ok(())
}

fn validate_symbol(config: &dyn ConfigPort) -> Result<(), TurtleError> {
    match config.get_string("data", "symbol") {
        Some(_) => Ok(()),
        None => Err(TurtleError::ConfigMissing {
            section: "data".to_string(),
            key: "symbol".to_string(),
        }),
    }
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), TurtleError> {
    let start = parse_optional_date(config, "start_date")?;
    let end = parse_optional_date(config, "end_date")?;

    if let (Some(s), Some(e)) = (start, end) {
        if s >= e {
            return Err(TurtleError::config_invalid(
                "data",
                "start_date",
                "start_date must be before end_date",
            ));
        }
    }
    Ok(())
}

/// `[data] <key>` as a date, if present.
pub fn parse_optional_date(
    config: &dyn ConfigPort,
    key: &str,
) -> Result<Option<NaiveDate>, TurtleError> {
    config
        .get_string("data", key)
        .map(|s| {
            NaiveDate::parse_from_str(&s, "%Y-%m-%d").map_err(|_| {
                TurtleError::config_invalid(
                    "data",
                    key,
                    format!("invalid {key} format, expected YYYY-MM-DD"),
                )
            })
        })
        .transpose()
}

fn validate_positive_int(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<(), TurtleError> {
    if let Some(raw) = config.get_string(section, key) {
        match raw.parse::<i64>() {
            Ok(v) if v >= 1 => {}
            _ => {
                return Err(TurtleError::config_invalid(
                    section,
                    key,
                    format!("{key} must be a positive integer"),
                ));
            }
        }
    }
    Ok(())
}
