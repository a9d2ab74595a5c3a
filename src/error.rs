use thiserror::Error;

/// Failures surfaced by the estimation pipeline.
///
/// None of these are retried inside the library; the caller decides whether a
/// second attempt makes sense.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EstimatorError {
    /// The reference dataset could not be fetched, read or parsed.
    #[error("Reference dataset unavailable: {0}")]
    DataUnavailable(String),

    /// The reference dataset is too small or contains unusable values.
    #[error("Model fit failed: {0}")]
    Fit(String),

    /// A currency key that is not in the currency table.
    #[error("Unknown currency '{0}'. Expected one of: usd, eur, tnd.")]
    InvalidCurrency(String),

    /// A non-finite feature value, or an amount too large to represent.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl EstimatorError {
    /// Process exit code used by the `hv` binary for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            EstimatorError::InvalidCurrency(_) | EstimatorError::InvalidInput(_) => 2,
            EstimatorError::Fit(_) => 3,
            EstimatorError::DataUnavailable(_) => 4,
        }
    }
}

/// Failure reported by the `hv` binary: a message for stderr and the exit code.
#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<EstimatorError> for AppError {
    fn from(err: EstimatorError) -> Self {
        AppError::new(err.exit_code(), err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
