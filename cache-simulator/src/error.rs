use std::io;

use thiserror::Error;

/// Errors raised while generating, reading or replaying traces.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("cannot read trace path: {0}")]
    Glob(#[from] glob::GlobError),

    #[error("no trace files match `{0}`")]
    NoInput(String),

    #[error("unknown algorithm `{0}`")]
    UnknownAlgorithm(String),

    #[error("invalid request on record {record}: {reason}")]
    InvalidRequest { record: u64, reason: &'static str },
}
