//! Expansion of the placeholder comments authored into HTML templates.

use std::sync::OnceLock;

use regex::{NoExpand, Regex};

use crate::config::RewriterConfig;
use crate::models::Environment;

/// `<!-- favicon -->`
fn favicon_marker() -> &'static Regex {
  static PATTERN: OnceLock<Regex> = OnceLock::new();
  PATTERN.get_or_init(|| Regex::new(r"(?i)<!--\s*favicon\s*-->").expect("invalid favicon regex"))
}

/// `<!-- menu-import -->`
fn menu_marker() -> &'static Regex {
  static PATTERN: OnceLock<Regex> = OnceLock::new();
  PATTERN.get_or_init(|| Regex::new(r"(?i)<!--\s*menu-import\s*-->").expect("invalid menu regex"))
}

/// `<!-- iconify-import -->`
fn iconify_marker() -> &'static Regex {
  static PATTERN: OnceLock<Regex> = OnceLock::new();
  PATTERN
    .get_or_init(|| Regex::new(r"(?i)<!--\s*iconify-import\s*-->").expect("invalid iconify regex"))
}

const MENU_FRAGMENT: &str = r#"<script src="static:dist/menu.bundle.js"></script><link rel="stylesheet" href="static:dist/menu.bundle.css" />"#;

fn favicon_fragment(config: &RewriterConfig) -> String {
  match config.environment {
    Environment::Production => format!(
      r#"<link rel="icon" href="{}/favicon.webp" />"#,
      config.static_base_url
    ),
    Environment::Development => r#"<link rel="icon" href="/static/favicon.webp" />"#.to_string(),
  }
}

fn iconify_fragment(config: &RewriterConfig) -> String {
  format!(
    r#"<script src="{}/iconify-icon@{}/dist/iconify-icon.min.js"></script>"#,
    config.iconify_cdn_base, config.iconify_version
  )
}

/// Replace the first occurrence of each placeholder marker. Returns whether any marker was found.
///
/// The menu fragment still carries `static:` paths; they are resolved by the script/style pass.
pub fn expand_placeholders(config: &RewriterConfig, text: &mut String) -> bool {
  let replacements = [
    (favicon_marker(), favicon_fragment(config)),
    (menu_marker(), MENU_FRAGMENT.to_string()),
    (iconify_marker(), iconify_fragment(config)),
  ];

  let mut changed = false;
  for (marker, fragment) in replacements {
    if !marker.is_match(text.as_str()) {
      continue;
    }
    tracing::debug!("expanding placeholder {}", marker.as_str());
    *text = marker.replace(text.as_str(), NoExpand(&fragment)).into_owned();
    changed = true;
  }
  changed
}
