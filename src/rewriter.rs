//! Build-scoped rewriter tying configuration, hash table and custom rules together.

use crate::config::RewriterConfig;
use crate::error::RewriterResult;
use crate::hashing::AssetHashTable;
use crate::models::Rewrite;
use crate::rewrite::{
  CustomRule, Replacement, apply_custom_rules, expand_placeholders, resolve_static_tags,
  stamp_scripts_and_styles,
};

/// Rewrites generated HTML documents for one build invocation.
///
/// Construct one per build, record every script/style hash, then process documents. Hashes
/// recorded after a document was processed do not affect that document.
#[derive(Debug)]
pub struct AssetRewriter {
  config: RewriterConfig,
  hashes: AssetHashTable,
  rules: Vec<CustomRule>,
}

impl AssetRewriter {
  /// Create a rewriter; literal rules from the configuration are compiled immediately.
  pub fn new(config: RewriterConfig) -> RewriterResult<Self> {
    let rules = config
      .rules
      .iter()
      .map(|rule| CustomRule::new(&rule.pattern, rule.replacement.as_str()))
      .collect::<RewriterResult<Vec<_>>>()?;
    Ok(Self {
      config,
      hashes: AssetHashTable::new(),
      rules,
    })
  }

  /// Configuration the rewriter was built with.
  pub fn config(&self) -> &RewriterConfig {
    &self.config
  }

  /// Hashes recorded so far.
  pub fn hashes(&self) -> &AssetHashTable {
    &self.hashes
  }

  /// Register a custom rule after the ones already registered.
  pub fn add_rule(&mut self, rule: CustomRule) -> &mut Self {
    self.rules.push(rule);
    self
  }

  /// Compile and register a custom rule.
  pub fn add_pattern(
    &mut self,
    pattern: &str,
    replacement: impl Into<Replacement>,
  ) -> RewriterResult<&mut Self> {
    let rule = CustomRule::new(pattern, replacement)?;
    Ok(self.add_rule(rule))
  }

  /// Record the content hash of a finished asset. Returns the hash.
  pub fn record_asset_hash(&mut self, output_path: &str, content: &[u8]) -> String {
    self.hashes.record(output_path, content)
  }

  /// Run every pass over `text` in order and report whether any of them fired.
  pub fn process_document(&self, text: &str, file_path: &str) -> Rewrite {
    let mut text = text.to_string();
    let mut changed = expand_placeholders(&self.config, &mut text);
    changed |= resolve_static_tags(&self.config, &mut text);
    changed |= apply_custom_rules(&self.rules, file_path, &mut text);
    changed |= stamp_scripts_and_styles(&self.config, &self.hashes, &mut text);
    Rewrite { changed, text }
  }
}
