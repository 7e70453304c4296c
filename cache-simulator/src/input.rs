//! Trace input for cache simulation
//!
//! Traces are CSV files with a `key,size,cost` header. A glob pattern selects
//! the files, which are replayed in lexicographic path order.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::SimError;
use crate::models::Request;

/// Reader for request traces matching a glob pattern
#[derive(Debug)]
pub struct TraceReader {
    pattern: String,
}

impl TraceReader {
    /// Create a reader for the files matching `pattern`
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
        }
    }

    /// Get all matching trace files, sorted by path
    pub fn trace_files(&self) -> Result<Vec<PathBuf>, SimError> {
        let mut files = Vec::new();
        for entry in glob::glob(&self.pattern)? {
            let path = entry?;
            if path.is_file() {
                files.push(path);
            }
        }

        if files.is_empty() {
            return Err(SimError::NoInput(self.pattern.clone()));
        }
        files.sort();
        Ok(files)
    }

    /// Read every matching file into one request sequence
    pub fn read_all(&self) -> Result<Vec<Request>, SimError> {
        let mut requests = Vec::new();
        for path in self.trace_files()? {
            let file_requests = read_file(&path)?;
            debug!(path = %path.display(), requests = file_requests.len(), "loaded trace");
            requests.extend(file_requests);
        }
        Ok(requests)
    }
}

/// Parse a single trace file
pub fn read_file(path: &Path) -> Result<Vec<Request>, SimError> {
    let file = File::open(path)?;
    // 1MB buffer, traces are read front to back once
    read_from(BufReader::with_capacity(1024 * 1024, file))
}

/// Parse a trace from any reader
pub fn read_from<R: Read>(reader: R) -> Result<Vec<Request>, SimError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_reader(reader);

    let mut requests = Vec::new();
    for (record, result) in reader.deserialize::<Request>().enumerate() {
        let request = result?;
        validate(&request, record as u64 + 1)?;
        requests.push(request);
    }
    Ok(requests)
}

fn validate(request: &Request, record: u64) -> Result<(), SimError> {
    let reason = if request.key.is_empty() {
        "empty key"
    } else if request.size == 0 {
        "size must be non-zero"
    } else if !request.cost.is_finite() || request.cost < 0.0 {
        "cost must be finite and non-negative"
    } else {
        return Ok(());
    };
    Err(SimError::InvalidRequest { record, reason })
}
