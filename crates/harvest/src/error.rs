// ABOUTME: Error types for the harvester including ErrorCode enum and HarvestError struct.
// ABOUTME: Provides categorized errors with convenience constructors and boolean helpers.

use std::fmt;

/// Error codes representing different categories of harvest failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    InvalidUrl,
    Fetch,
    Timeout,
    Io,
    Json,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::InvalidUrl => "invalid URL",
            ErrorCode::Fetch => "fetch error",
            ErrorCode::Timeout => "timeout",
            ErrorCode::Io => "I/O error",
            ErrorCode::Json => "JSON error",
        };
        write!(f, "{}", s)
    }
}

/// The main error type for harvest operations.
///
/// `target` is the URL or file path the operation was working on.
#[derive(Debug, thiserror::Error)]
pub struct HarvestError {
    pub code: ErrorCode,
    pub target: String,
    pub op: String,
    #[source]
    pub source: Option<anyhow::Error>,
}

/// Result alias used throughout the crate.
pub type Result<T, E = HarvestError> = std::result::Result<T, E>;

impl fmt::Display for HarvestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "harvest: {} {}: {}", self.op, self.target, self.code)?;
        if let Some(ref src) = self.source {
            write!(f, ": {}", src)?;
        }
        Ok(())
    }
}

impl HarvestError {
    fn with_code(
        code: ErrorCode,
        target: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self {
            code,
            target: target.into(),
            op: op.into(),
            source,
        }
    }

    /// Create an InvalidUrl error.
    pub fn invalid_url(
        target: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::with_code(ErrorCode::InvalidUrl, target, op, source)
    }

    /// Create a Fetch error.
    pub fn fetch(
        target: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::with_code(ErrorCode::Fetch, target, op, source)
    }

    /// Create a Timeout error.
    pub fn timeout(
        target: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::with_code(ErrorCode::Timeout, target, op, source)
    }

    /// Create an Io error.
    pub fn io(target: impl Into<String>, op: impl Into<String>, source: std::io::Error) -> Self {
        Self::with_code(ErrorCode::Io, target, op, Some(source.into()))
    }

    /// Create a Json error.
    pub fn json(
        target: impl Into<String>,
        op: impl Into<String>,
        source: serde_json::Error,
    ) -> Self {
        Self::with_code(ErrorCode::Json, target, op, Some(source.into()))
    }

    /// Returns true if this is a Timeout error.
    pub fn is_timeout(&self) -> bool {
        self.code == ErrorCode::Timeout
    }

    /// Returns true if this is a Fetch error.
    pub fn is_fetch(&self) -> bool {
        self.code == ErrorCode::Fetch
    }

    /// Returns true if this is an InvalidUrl error.
    pub fn is_invalid_url(&self) -> bool {
        self.code == ErrorCode::InvalidUrl
    }

    /// Returns true if this is an Io error.
    pub fn is_io(&self) -> bool {
        self.code == ErrorCode::Io
    }

    /// Returns true if this is a Json error.
    pub fn is_json(&self) -> bool {
        self.code == ErrorCode::Json
    }

    /// Returns true for failures worth another attempt (transport and timeouts).
    pub fn is_retryable(&self) -> bool {
        matches!(self.code, ErrorCode::Fetch | ErrorCode::Timeout)
    }
}
