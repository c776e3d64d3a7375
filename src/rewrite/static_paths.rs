//! Resolution of `static:` virtual asset paths.

use crate::config::RewriterConfig;
use crate::models::Environment;
use crate::tags::{TagMatch, find_anchor_tags, find_image_tags, find_meta_content_tags};

/// Prefix marking a path as a virtual static asset.
pub const STATIC_PREFIX: &str = "static:";

/// Resolve a `static:` path for the configured environment, or `None` when the path is not virtual.
///
/// Production paths point at the static origin, development paths at the dev server's `/static/`.
pub fn resolve_static_path(config: &RewriterConfig, path: &str) -> Option<String> {
  let relative = path.strip_prefix(STATIC_PREFIX)?;
  Some(match config.environment {
    Environment::Production => format!("{}/{relative}", config.static_base_url),
    Environment::Development => format!("/static/{relative}"),
  })
}

/// Rewrite the collected tags whose path is virtual, replacing each tag's text in `text`.
///
/// Matches must be collected before the first mutation. Each replacement targets the first
/// remaining occurrence of the literal tag text, so earlier edits shifting offsets do no harm.
pub fn apply_static_replacements(
  config: &RewriterConfig,
  text: &mut String,
  matches: &[TagMatch],
) -> bool {
  let mut changed = false;
  for tag in matches {
    let Some(resolved) = resolve_static_path(config, &tag.path) else {
      continue;
    };
    let rewritten = tag.with_path(&resolved);
    tracing::debug!("resolved {} to {resolved}", tag.path);
    *text = text.replacen(&tag.full_match, &rewritten, 1);
    changed = true;
  }
  changed
}

/// Resolve virtual paths inside `<img src>`, `<a href>` and `<meta content>` tags.
pub fn resolve_static_tags(config: &RewriterConfig, text: &mut String) -> bool {
  let mut changed = false;
  let finders: [fn(&str) -> Vec<TagMatch>; 3] =
    [find_image_tags, find_anchor_tags, find_meta_content_tags];
  for finder in finders {
    let matches = finder(text.as_str());
    if matches.is_empty() {
      continue;
    }
    changed |= apply_static_replacements(config, text, &matches);
  }
  changed
}
