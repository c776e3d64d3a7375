//! Caller-registered pattern replacements.

use std::fmt;

use regex::{Captures, NoExpand, Regex};

use crate::error::{RewriterError, RewriterResult};
use crate::models::RuleContext;

type ComputeFn = dyn Fn(&RuleContext<'_>) -> String + Send + Sync;

/// Replacement applied to every occurrence of a rule's pattern.
pub enum Replacement {
  /// Fixed text with `$`-substitutions expanded per occurrence, as in JavaScript's
  /// `String.prototype.replace`: `$$`, `$&`, `` $` ``, `$'`, `$1`..`$99` and `$<name>`.
  /// A reference to a group the pattern lacks stays literal.
  Literal(String),
  /// Computed once per document from the file path and all matches, then inserted verbatim.
  Computed(Box<ComputeFn>),
}

impl Replacement {
  /// Wrap a closure as a computed replacement.
  pub fn computed<F>(f: F) -> Self
  where
    F: Fn(&RuleContext<'_>) -> String + Send + Sync + 'static,
  {
    Self::Computed(Box::new(f))
  }
}

impl fmt::Debug for Replacement {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Literal(text) => f.debug_tuple("Literal").field(text).finish(),
      Self::Computed(_) => f.write_str("Computed(..)"),
    }
  }
}

impl From<&str> for Replacement {
  fn from(text: &str) -> Self {
    Self::Literal(text.to_string())
  }
}

impl From<String> for Replacement {
  fn from(text: String) -> Self {
    Self::Literal(text)
  }
}

/// A pattern and what to replace it with.
#[derive(Debug)]
pub struct CustomRule {
  pattern: Regex,
  replacement: Replacement,
}

impl CustomRule {
  /// Compile `pattern` into a rule.
  pub fn new(pattern: &str, replacement: impl Into<Replacement>) -> RewriterResult<Self> {
    let pattern = Regex::new(pattern).map_err(|source| RewriterError::InvalidPattern {
      pattern: pattern.to_string(),
      source,
    })?;
    Ok(Self::from_regex(pattern, replacement))
  }

  /// Build a rule from an already compiled pattern.
  pub fn from_regex(pattern: Regex, replacement: impl Into<Replacement>) -> Self {
    Self {
      pattern,
      replacement: replacement.into(),
    }
  }

  /// The rule's pattern.
  pub fn pattern(&self) -> &Regex {
    &self.pattern
  }

  /// Apply the rule to `text`. Returns `true` whenever the pattern matched, even when the
  /// replacement reproduces the matched text.
  pub fn apply(&self, file_path: &str, text: &mut String) -> bool {
    let matches: Vec<_> = self.pattern.find_iter(text.as_str()).collect();
    if matches.is_empty() {
      return false;
    }
    tracing::debug!(
      "rule {} matched {} time(s) in {file_path}",
      self.pattern.as_str(),
      matches.len()
    );

    let rewritten = match &self.replacement {
      Replacement::Literal(template) => {
        let named = self.pattern.capture_names().flatten().next().is_some();
        let haystack = text.as_str();
        self
          .pattern
          .replace_all(haystack, |caps: &Captures<'_>| {
            expand_template(template, caps, haystack, named)
          })
          .into_owned()
      }
      Replacement::Computed(compute) => {
        let context = RuleContext {
          file_path,
          matches: &matches,
        };
        let replacement = compute(&context);
        self
          .pattern
          .replace_all(text.as_str(), NoExpand(&replacement))
          .into_owned()
      }
    };
    *text = rewritten;
    true
  }
}

/// Expand the `$`-substitutions of `template` for one match.
fn expand_template(template: &str, caps: &Captures<'_>, haystack: &str, named: bool) -> String {
  let whole = caps.get(0).map_or(0..0, |m| m.range());
  let groups = caps.len() - 1;
  let group = |index: usize| caps.get(index).map_or("", |m| m.as_str());

  let mut out = String::with_capacity(template.len());
  let mut rest = template;
  while let Some(at) = rest.find('$') {
    out.push_str(&rest[..at]);
    let tail = &rest[at + 1..];
    let bytes = tail.as_bytes();
    // Bytes of `tail` consumed by the substitution; 0 keeps the `$` literal.
    let consumed = match bytes.first() {
      Some(b'$') => {
        out.push('$');
        1
      }
      Some(b'&') => {
        out.push_str(&haystack[whole.clone()]);
        1
      }
      Some(b'`') => {
        out.push_str(&haystack[..whole.start]);
        1
      }
      Some(b'\'') => {
        out.push_str(&haystack[whole.end..]);
        1
      }
      Some(digit) if digit.is_ascii_digit() => {
        let one = usize::from(digit - b'0');
        let two = bytes
          .get(1)
          .filter(|next| next.is_ascii_digit())
          .map(|next| one * 10 + usize::from(next - b'0'));
        match two {
          Some(index) if (1..=groups).contains(&index) => {
            out.push_str(group(index));
            2
          }
          _ if (1..=groups).contains(&one) => {
            out.push_str(group(one));
            1
          }
          _ => {
            out.push('$');
            0
          }
        }
      }
      Some(b'<') if named => match tail.find('>') {
        Some(close) => {
          out.push_str(caps.name(&tail[1..close]).map_or("", |m| m.as_str()));
          close + 1
        }
        None => {
          out.push('$');
          0
        }
      },
      _ => {
        out.push('$');
        0
      }
    };
    rest = &tail[consumed..];
  }
  out.push_str(rest);
  out
}

/// Apply rules in registration order; later rules observe the output of earlier ones.
pub fn apply_custom_rules(rules: &[CustomRule], file_path: &str, text: &mut String) -> bool {
  let mut changed = false;
  for rule in rules {
    changed |= rule.apply(file_path, text);
  }
  changed
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn literal_replacement_applies_to_every_occurrence() {
    let rule = CustomRule::new(r"</head>", "<meta name=\"x\"></head>").unwrap();
    let mut text = "<head></head><head></head>".to_string();
    assert!(rule.apply("index.html", &mut text));
    assert_eq!(text, "<head><meta name=\"x\"></head><head><meta name=\"x\"></head>");
  }

  #[test]
  fn literal_replacement_expands_captures() {
    let rule = CustomRule::new(r"\{\{(\w+)\}\}", "<b>$1</b>").unwrap();
    let mut text = "{{one}} {{two}}".to_string();
    rule.apply("a.html", &mut text);
    assert_eq!(text, "<b>one</b> <b>two</b>");
  }

  #[test]
  fn capture_reference_followed_by_text() {
    let rule = CustomRule::new(r"v(\d)", "$1a").unwrap();
    let mut text = "v1 v2".to_string();
    assert!(rule.apply("a.html", &mut text));
    assert_eq!(text, "1a 2a");
  }

  #[test]
  fn literal_replacement_special_sequences() {
    let apply = |pattern: &str, replacement: &str, input: &str| {
      let mut text = input.to_string();
      CustomRule::new(pattern, replacement).unwrap().apply("a.html", &mut text);
      text
    };

    assert_eq!(apply(r"b+", "[$&]", "abbc"), "a[bb]c");
    assert_eq!(apply(r"b", "$$1", "abc"), "a$1c");
    assert_eq!(apply(r"b", "<$`|$'>", "abc"), "a<a|c>c");
    assert_eq!(apply(r"(b)", "$2$0", "abc"), "a$2$0c");
    assert_eq!(apply(r"(b)", "$10", "abc"), "ab0c");
    assert_eq!(apply(r"(?<word>b)", "<$<word>>", "abc"), "a<b>c");
    assert_eq!(apply(r"b", "$<word>", "abc"), "a$<word>c");
    assert_eq!(apply(r"(x)?b", "[$1]", "abc"), "a[]c");
    assert_eq!(apply(r"b", "cost: $", "abc"), "acost: $c");
  }

  #[test]
  fn computed_replacement_sees_path_and_all_matches() {
    let rule = CustomRule::new(
      r"@@",
      Replacement::computed(|ctx| format!("{}:{}$1", ctx.file_path, ctx.matches.len())),
    )
    .unwrap();
    let mut text = "@@ and @@".to_string();
    assert!(rule.apply("sub/page.html", &mut text));
    assert_eq!(text, "sub/page.html:2$1 and sub/page.html:2$1");
  }

  #[test]
  fn identity_replacement_still_reports_change() {
    let rule = CustomRule::new("same", "same").unwrap();
    let mut text = "same".to_string();
    assert!(rule.apply("x.html", &mut text));
    assert_eq!(text, "same");
  }

  #[test]
  fn later_rules_observe_earlier_output() {
    let rules = vec![
      CustomRule::new("a", "b").unwrap(),
      CustomRule::new("b", "c").unwrap(),
    ];
    let mut text = "a".to_string();
    assert!(apply_custom_rules(&rules, "x.html", &mut text));
    assert_eq!(text, "c");
  }

  #[test]
  fn rejects_invalid_patterns() {
    let err = CustomRule::new("(unclosed", "x").unwrap_err();
    assert!(err.to_string().contains("(unclosed"));
  }

  #[test]
  fn unmatched_rule_is_a_no_op() {
    let rule = CustomRule::new("missing", "x").unwrap();
    let mut text = "present".to_string();
    assert!(!rule.apply("x.html", &mut text));
    assert_eq!(text, "present");
  }
}
