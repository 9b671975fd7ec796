//! Domain error types.

/// Top-level error type for turtletrader.
#[derive(Debug, thiserror::Error)]
pub enum TurtleError {
    #[error("data integrity error at record {index}{}: {reason}", fmt_date(.date))]
    DataIntegrity {
        index: usize,
        date: Option<String>,
        reason: String,
    },

    #[error("insufficient data: have {bars} bars, need {minimum}")]
    InsufficientData { bars: usize, minimum: usize },

    #[error("degenerate series: {reason}")]
    DegenerateSeries { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data source error: {reason}")]
    DataSource { reason: String },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn fmt_date(date: &Option<String>) -> String {
    match date {
        Some(d) => format!(" ({d})"),
        None => String::new(),
    }
}

impl TurtleError {
    pub(crate) fn integrity(index: usize, date: Option<String>, reason: impl Into<String>) -> Self {
        TurtleError::DataIntegrity {
            index,
            date,
            reason: reason.into(),
        }
    }

    pub(crate) fn config_invalid(section: &str, key: &str, reason: impl Into<String>) -> Self {
        TurtleError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

impl TurtleError {
    /// Process exit status for this error category.
    pub fn exit_status(&self) -> u8 {
        match self {
            TurtleError::Io(_) | TurtleError::Report { .. } => 1,
            TurtleError::ConfigParse { .. }
            | TurtleError::ConfigMissing { .. }
            | TurtleError::ConfigInvalid { .. } => 2,
            TurtleError::DataSource { .. } => 3,
            TurtleError::DataIntegrity { .. }
            | TurtleError::InsufficientData { .. }
            | TurtleError::DegenerateSeries { .. } => 5,
        }
    }
}

impl From<&TurtleError> for std::process::ExitCode {
    fn from(err: &TurtleError) -> Self {
        std::process::ExitCode::from(err.exit_status())
    }
}
