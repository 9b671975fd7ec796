//! Port traits connecting the domain to data sources, report sinks and configuration.

pub mod config_port;
pub mod data_port;
pub mod report_port;
