use std::fmt;

/// Result type for chargetrace-runtime operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the runtime layer
#[derive(Debug)]
pub enum Error {
    /// IO operation failed
    Io(std::io::Error),

    /// CSV decoding failed
    Csv(csv::Error),

    /// Configuration error
    Config(String),

    /// Unsupported input file kind
    UnsupportedInput(String),

    /// Every file of a multi-file batch failed processing. The only
    /// batch-level failure surfaced to callers; individual file failures are
    /// logged and excluded.
    EmptyBatch { attempted: usize },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "IO error: {}", err),
            Error::Csv(err) => write!(f, "CSV error: {}", err),
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
            Error::UnsupportedInput(path) => write!(f, "Unsupported input file: {}", path),
            Error::EmptyBatch { attempted } => write!(
                f,
                "No file could be processed (0 of {} succeeded)",
                attempted
            ),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Csv(err) => Some(err),
            Error::Config(_) | Error::UnsupportedInput(_) | Error::EmptyBatch { .. } => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Csv(err)
    }
}
