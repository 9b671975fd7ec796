//! Core domain types and logic.

pub mod price;
pub mod series;
pub mod strategy;
pub mod indicator;
pub mod signal;
pub mod position;
pub mod metrics;
pub mod backtest;
pub mod config_validation;
pub mod error;
