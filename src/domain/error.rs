//! Domain error types.

/// Failure raised by a user strategy while deciding on an observation.
///
/// Never escapes the decision guard: it is logged and downgraded to a hold.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("strategy error: {message}")]
pub struct StrategyError {
    pub message: String,
}

impl StrategyError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<&str> for StrategyError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for StrategyError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

/// Top-level error type for simtrader.
#[derive(Debug, thiserror::Error)]
pub enum SimtraderError {
    #[error("schema error: required column '{column}' is missing")]
    Schema { column: String },

    #[error("empty input: no observations to simulate")]
    EmptyInput,

    #[error("invalid value in row {row}, column '{column}': {reason}")]
    InvalidValue {
        row: usize,
        column: String,
        reason: String,
    },

    #[error("invalid balance: {field} cannot be set to {value}")]
    NegativeBalance { field: &'static str, value: f64 },

    #[error("invalid {side} fraction {fraction}")]
    InvalidFraction { side: &'static str, fraction: f64 },

    #[error("invalid execution price {price}")]
    InvalidPrice { price: f64 },

    #[error("observation feed is exhausted")]
    Exhausted,

    #[error("simulation engine has already run; build a new engine from a fresh series")]
    Reuse,

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

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&SimtraderError> for std::process::ExitCode {
    fn from(err: &SimtraderError) -> Self {
        let code: u8 = match err {
            SimtraderError::Io(_) => 1,
            SimtraderError::ConfigParse { .. }
            | SimtraderError::ConfigMissing { .. }
            | SimtraderError::ConfigInvalid { .. } => 2,
            SimtraderError::Schema { .. }
            | SimtraderError::EmptyInput
            | SimtraderError::InvalidValue { .. }
            | SimtraderError::Data { .. } => 3,
            SimtraderError::NegativeBalance { .. }
            | SimtraderError::InvalidFraction { .. }
            | SimtraderError::InvalidPrice { .. } => 4,
            SimtraderError::Exhausted | SimtraderError::Reuse => 5,
        };
        std::process::ExitCode::from(code)
    }
}
