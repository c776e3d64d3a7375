//! Data structures shared by the rewrite passes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Build environment selected once per build and threaded through every rewrite decision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
  /// Assets are served from the configured static origin.
  #[default]
  Production,
  /// Assets are served from the local development server under `/static/`.
  Development,
}

impl Environment {
  /// Lowercase name used in configuration files and on the command line.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Production => "production",
      Self::Development => "development",
    }
  }
}

impl fmt::Display for Environment {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Environment {
  type Err = String;

  fn from_str(value: &str) -> Result<Self, Self::Err> {
    match value.trim().to_ascii_lowercase().as_str() {
      "production" | "prod" => Ok(Self::Production),
      "development" | "dev" => Ok(Self::Development),
      other => Err(format!("unknown environment `{other}`")),
    }
  }
}

/// Outcome of running the rewriter over one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
  /// Whether any rule fired. Custom rules over-report: a match counts even if the text is unchanged.
  pub changed: bool,
  /// Final document text.
  pub text: String,
}

/// Context handed to computed custom replacements.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
  /// Output-relative path of the document being processed.
  pub file_path: &'a str,
  /// Every match of the rule pattern in the current document text, in document order.
  pub matches: &'a [regex::Match<'a>],
}

/// Summary of one build pass over a set of output assets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildReport {
  /// Number of script/style assets whose content hash was recorded.
  pub hashed_assets: usize,
  /// Output paths of HTML documents that were rewritten.
  pub rewritten_documents: Vec<String>,
  /// Output paths of HTML documents that could not be decoded as UTF-8.
  pub skipped_documents: Vec<String>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_environment_names() {
    assert_eq!("production".parse::<Environment>(), Ok(Environment::Production));
    assert_eq!(" Dev ".parse::<Environment>(), Ok(Environment::Development));
    assert!("staging".parse::<Environment>().is_err());
  }

  #[test]
  fn environment_round_trips_through_serde() {
    let env: Environment = serde_json::from_str("\"development\"").unwrap();
    assert_eq!(env, Environment::Development);
    assert_eq!(serde_json::to_string(&Environment::Production).unwrap(), "\"production\"");
  }
}
