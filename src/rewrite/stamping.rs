//! Script and stylesheet resolution followed by content-hash stamping.

use crate::config::RewriterConfig;
use crate::hashing::AssetHashTable;
use crate::rewrite::static_paths::resolve_static_path;
use crate::tags::find_script_and_style_tags;

/// Marker appended after the hash; a later pipeline stage consumes it.
pub const HASH_MARKER: &str = "__hash__";

/// Path with the hash query appended: `{path}?{hash}__hash__`.
pub fn stamped_path(path: &str, hash: &str) -> String {
  format!("{path}?{hash}{HASH_MARKER}")
}

/// Keys tried, in order, when looking up the hash of a resolved path under the output root.
///
/// Returns nothing when the path does not live under the root.
pub fn hash_lookup_keys(output_root: &str, path: &str) -> Vec<String> {
  let root = output_root.trim_end_matches('/');
  let Some(rest) = path.strip_prefix(root) else {
    return Vec::new();
  };
  // Skip the separating slash; a different character means the path only shares a prefix.
  let Some(relative) = rest.strip_prefix('/') else {
    return Vec::new();
  };

  let mut keys = vec![relative.to_string()];
  let full = path.trim_start_matches('/');
  if full != relative {
    keys.push(full.to_string());
  }
  keys
}

fn lookup_hash<'a>(config: &RewriterConfig, hashes: &'a AssetHashTable, path: &str) -> Option<&'a str> {
  hash_lookup_keys(&config.build_output_root, path)
    .iter()
    .find_map(|key| hashes.get(key))
}

/// Resolve `static:` script/style references and stamp those under the output root with their
/// content hash. Tags are processed in document order; missing hashes are logged and skipped.
pub fn stamp_scripts_and_styles(
  config: &RewriterConfig,
  hashes: &AssetHashTable,
  text: &mut String,
) -> bool {
  let mut changed = false;

  for tag in find_script_and_style_tags(text.as_str()) {
    let mut path = tag.path.clone();
    let mut rewritten = false;

    if let Some(resolved) = resolve_static_path(config, &path) {
      path = resolved;
      rewritten = true;
    }

    if config.stamps_hashes() && !hash_lookup_keys(&config.build_output_root, &path).is_empty() {
      match lookup_hash(config, hashes, &path) {
        Some(hash) => {
          path = stamped_path(&path, hash);
          rewritten = true;
        }
        None => tracing::warn!("no hash found for {path}"),
      }
    }

    if rewritten {
      let new_tag = tag.with_path(&path);
      tracing::debug!("rewrote {} to {path}", tag.path);
      *text = text.replacen(&tag.full_match, &new_tag, 1);
      changed = true;
    }
  }

  changed
}
