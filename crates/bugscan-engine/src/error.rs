use std::fmt;
use std::path::PathBuf;

/// Result type for bugscan-engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the engine layer
#[derive(Debug)]
pub enum Error {
    /// Pattern or endpoint source could not be read
    ConfigLoad { path: PathBuf, source: std::io::Error },

    /// A log file could not be opened or read
    FileRead { path: PathBuf, source: std::io::Error },

    /// The report file could not be written
    SinkWrite { path: PathBuf, source: std::io::Error },

    /// A pattern line is blank
    EmptyPattern,

    /// A pattern line is not a valid expression
    Pattern {
        pattern: String,
        source: regex::Error,
    },

    /// The HTTP client could not be constructed
    HttpClient(reqwest::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ConfigLoad { path, source } => {
                write!(f, "Could not load {}: {}", path.display(), source)
            }
            Error::FileRead { path, source } => {
                write!(f, "Could not read {}: {}", path.display(), source)
            }
            Error::SinkWrite { path, source } => {
                write!(f, "Could not save report to {}: {}", path.display(), source)
            }
            Error::EmptyPattern => write!(f, "Pattern is empty"),
            Error::Pattern { pattern, source } => {
                write!(f, "Invalid pattern '{}': {}", pattern, source)
            }
            Error::HttpClient(err) => write!(f, "HTTP client error: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::ConfigLoad { source, .. }
            | Error::FileRead { source, .. }
            | Error::SinkWrite { source, .. } => Some(source),
            Error::Pattern { source, .. } => Some(source),
            Error::HttpClient(err) => Some(err),
            Error::EmptyPattern => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::HttpClient(err)
    }
}
