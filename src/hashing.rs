//! Content hashes of finished script and style assets.

use std::collections::BTreeMap;

use md5::{Digest as _, Md5};

/// Lowercase hex MD5 digest of an asset's final bytes (32 characters).
pub fn content_hash(content: &[u8]) -> String {
  hex::encode(Md5::digest(content))
}

/// Whether an output path names a script or stylesheet that can be hash-stamped.
pub fn is_hashable_asset(path: &str) -> bool {
  path.ends_with(".js") || path.ends_with(".css")
}

/// Build-scoped mapping from output-relative asset path to content hash.
///
/// Populated before any HTML is processed and discarded with the rewriter at the end of the build.
#[derive(Debug, Clone, Default)]
pub struct AssetHashTable {
  hashes: BTreeMap<String, String>,
}

impl AssetHashTable {
  /// Create an empty table.
  pub fn new() -> Self {
    Self::default()
  }

  /// Hash `content` and store it under `output_path`, returning the hash.
  ///
  /// Paths are stored with forward slashes and without a leading slash. Entries are
  /// write-once: a second recording for the same path keeps the first hash.
  pub fn record(&mut self, output_path: &str, content: &[u8]) -> String {
    let key = normalise_key(output_path);
    if let Some(existing) = self.hashes.get(&key) {
      tracing::debug!("hash for {key} already recorded, keeping {existing}");
      return existing.clone();
    }
    let hash = content_hash(content);
    tracing::debug!("recorded hash {hash} for {key}");
    self.hashes.insert(key, hash.clone());
    hash
  }

  /// Look up the hash recorded for an output path.
  pub fn get(&self, output_path: &str) -> Option<&str> {
    self.hashes.get(&normalise_key(output_path)).map(String::as_str)
  }

  /// Number of recorded assets.
  pub fn len(&self) -> usize {
    self.hashes.len()
  }

  /// Whether no asset has been recorded yet.
  pub fn is_empty(&self) -> bool {
    self.hashes.is_empty()
  }
}

fn normalise_key(path: &str) -> String {
  path.replace('\\', "/").trim_start_matches('/').to_string()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn hashes_are_lowercase_md5_hex() {
    assert_eq!(content_hash(b""), "d41d8cd98f00b204e9800998ecf8427e");
    assert_eq!(content_hash(b"hello world"), "5eb63bbbe01eeed093cb22bb8f5acdc3");
  }

  #[test]
  fn recognises_scripts_and_styles_only() {
    assert!(is_hashable_asset("dist/app.bundle.js"));
    assert!(is_hashable_asset("menu.bundle.css"));
    assert!(!is_hashable_asset("index.html"));
    assert!(!is_hashable_asset("app.js.map"));
  }

  #[test]
  fn normalises_keys_on_record_and_lookup() {
    let mut table = AssetHashTable::new();
    let hash = table.record("dist\\app.bundle.js", b"console.log(1)");
    assert_eq!(table.get("/dist/app.bundle.js"), Some(hash.as_str()));
    assert_eq!(table.get("dist/app.bundle.js"), Some(hash.as_str()));
    assert_eq!(table.get("app.bundle.js"), None);
  }

  #[test]
  fn entries_are_write_once() {
    let mut table = AssetHashTable::new();
    let first = table.record("app.js", b"one");
    let second = table.record("app.js", b"two");
    assert_eq!(first, second);
    assert_eq!(table.len(), 1);
  }
}
