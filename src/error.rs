//! Errors raised while configuring the rewriter.
//!
//! Rewriting itself never fails: missing hashes and malformed tags degrade to "leave the text
//! alone". Only rule registration and configuration loading can be rejected.

use std::path::PathBuf;

/// Errors that can occur while building an [`crate::AssetRewriter`].
#[derive(Debug, thiserror::Error)]
pub enum RewriterError {
  /// A custom rule pattern is not a valid regular expression.
  #[error("invalid rule pattern `{pattern}`: {source}")]
  InvalidPattern {
    /// Pattern as supplied by the caller.
    pattern: String,
    /// Underlying compilation error.
    source: regex::Error,
  },
  /// A configuration file could not be read.
  #[error("failed to read {}: {source}", path.display())]
  ConfigRead {
    /// Path that caused the error.
    path: PathBuf,
    /// Source I/O error.
    source: std::io::Error,
  },
  /// A configuration file could not be parsed.
  #[error("failed to parse {}: {reason}", path.display())]
  ConfigParse {
    /// Path that caused the error.
    path: PathBuf,
    /// Parser message.
    reason: String,
  },
}

/// Result alias used by the library's fallible entry points.
pub type RewriterResult<T> = Result<T, RewriterError>;
