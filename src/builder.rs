//! Build passes feeding finished assets through an [`AssetRewriter`].

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use walkdir::WalkDir;

use crate::hashing::is_hashable_asset;
use crate::models::BuildReport;
use crate::rewriter::AssetRewriter;

/// Output assets keyed by forward-slash path relative to the output directory.
pub type AssetMap = BTreeMap<String, Vec<u8>>;

/// Hash every script/style asset, then rewrite every HTML document in place.
///
/// Hashing finishes before the first document is touched. It is skipped entirely when stamping is
/// disabled. HTML that is not valid UTF-8 is left alone and listed in the report.
pub fn process_assets(rewriter: &mut AssetRewriter, assets: &mut AssetMap) -> BuildReport {
  let mut report = BuildReport::default();

  if rewriter.config().stamps_hashes() {
    for (path, content) in assets.iter() {
      if is_hashable_asset(path) {
        rewriter.record_asset_hash(path, content);
        report.hashed_assets += 1;
      }
    }
  }

  for (path, content) in assets.iter_mut() {
    if !path.ends_with(".html") {
      continue;
    }
    let Ok(source) = std::str::from_utf8(content) else {
      tracing::debug!("skipping {path}: not valid UTF-8");
      report.skipped_documents.push(path.clone());
      continue;
    };

    let rewrite = rewriter.process_document(source, path);
    if rewrite.changed {
      *content = rewrite.text.into_bytes();
      report.rewritten_documents.push(path.clone());
    }
  }

  tracing::info!(
    "hashed {} asset(s), rewrote {} document(s)",
    report.hashed_assets,
    report.rewritten_documents.len()
  );
  report
}

/// Load every file below `root` into an [`AssetMap`].
pub fn load_output_dir(root: &Path) -> Result<AssetMap> {
  let mut assets = AssetMap::new();
  for entry in WalkDir::new(root).sort_by_file_name() {
    let entry = entry.with_context(|| format!("failed to walk {}", root.display()))?;
    if !entry.file_type().is_file() {
      continue;
    }
    let path = entry.path();
    let relative = path.strip_prefix(root).unwrap_or(path);
    let key = relative.to_string_lossy().replace('\\', "/");
    let content = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    assets.insert(key, content);
  }
  Ok(assets)
}

/// Rewrite the HTML documents of a finished build directory, writing back only changed files.
pub fn rewrite_output_dir(rewriter: &mut AssetRewriter, root: &Path) -> Result<BuildReport> {
  let mut assets = load_output_dir(root)?;
  let report = process_assets(rewriter, &mut assets);

  for relative in &report.rewritten_documents {
    let target = root.join(relative);
    let content = assets
      .get(relative)
      .with_context(|| format!("rewritten document {relative} vanished from the asset map"))?;
    fs::write(&target, content).with_context(|| format!("failed to write {}", target.display()))?;
  }

  Ok(report)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::RewriterConfig;
  use crate::hashing::content_hash;
  use crate::models::Environment;
  use tempfile::tempdir;

  fn production() -> AssetRewriter {
    AssetRewriter::new(RewriterConfig::for_environment(Environment::Production)).unwrap()
  }

  #[test]
  fn hashes_before_rewriting_documents() {
    let mut rewriter = production();
    let mut assets = AssetMap::new();
    // "a.html" sorts before the script, so hashing has to happen in a separate phase.
    assets.insert("a.html".into(), br#"<script src="/dist/z.bundle.js"></script>"#.to_vec());
    assets.insert("z.bundle.js".into(), b"z()".to_vec());
    assets.insert("logo.png".into(), vec![0x89, 0x50]);

    let report = process_assets(&mut rewriter, &mut assets);

    assert_eq!(report.hashed_assets, 1);
    assert_eq!(report.rewritten_documents, vec!["a.html".to_string()]);
    let html = String::from_utf8(assets["a.html"].clone()).unwrap();
    assert_eq!(
      html,
      format!(r#"<script src="/dist/z.bundle.js?{}__hash__"></script>"#, content_hash(b"z()"))
    );
  }

  #[test]
  fn skips_hashing_when_stamping_is_disabled() {
    let mut rewriter =
      AssetRewriter::new(RewriterConfig::for_environment(Environment::Development)).unwrap();
    let mut assets = AssetMap::new();
    assets.insert("app.js".into(), b"x".to_vec());
    assets.insert("index.html".into(), b"<p>plain</p>".to_vec());

    let report = process_assets(&mut rewriter, &mut assets);
    assert_eq!(report.hashed_assets, 0);
    assert!(rewriter.hashes().is_empty());
    assert!(report.rewritten_documents.is_empty());
  }

  #[test]
  fn reports_undecodable_documents() {
    let mut rewriter = production();
    let mut assets = AssetMap::new();
    assets.insert("broken.html".into(), vec![0xff, 0xfe, 0x00]);

    let report = process_assets(&mut rewriter, &mut assets);
    assert_eq!(report.skipped_documents, vec!["broken.html".to_string()]);
  }

  #[test]
  fn rewrites_only_changed_files_on_disk() -> Result<()> {
    let temp = tempdir()?;
    let root = temp.path();
    fs::create_dir_all(root.join("blog"))?;
    fs::write(root.join("app.bundle.js"), b"app")?;
    fs::write(root.join("blog/index.html"), b"<head><!-- favicon --></head>")?;
    fs::write(root.join("plain.html"), b"<p>plain</p>")?;

    let mut rewriter = production();
    let report = rewrite_output_dir(&mut rewriter, root)?;

    assert_eq!(report.rewritten_documents, vec!["blog/index.html".to_string()]);
    let blog = fs::read_to_string(root.join("blog/index.html"))?;
    assert!(blog.contains("/favicon.webp"));
    assert_eq!(fs::read_to_string(root.join("plain.html"))?, "<p>plain</p>");
    assert!(rewriter.hashes().get("app.bundle.js").is_some());
    Ok(())
  }
}
