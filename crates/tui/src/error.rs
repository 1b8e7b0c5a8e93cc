use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot read records fixture {}: {source}", path.display())]
    FixtureRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid records fixture {}: {source}", path.display())]
    FixtureParse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid value for {flag}: {value:?}")]
    InvalidArgument { flag: &'static str, value: String },
    #[error("missing value for {0}")]
    MissingArgument(&'static str),
    #[error("cannot open log file {}: {source}", path.display())]
    LogFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("logging already initialized: {0}")]
    Logging(String),
}
