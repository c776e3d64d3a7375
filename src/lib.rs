#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod builder;
pub mod config;
pub mod error;
pub mod hashing;
pub mod models;
pub mod presets;
pub mod rewrite;
pub mod rewriter;
pub mod tags;

pub use builder::{AssetMap, load_output_dir, process_assets, rewrite_output_dir};
pub use config::{RewriterConfig, RuleConfig};
pub use error::{RewriterError, RewriterResult};
pub use hashing::{AssetHashTable, content_hash};
pub use models::{BuildReport, Environment, Rewrite, RuleContext};
pub use rewrite::{CustomRule, Replacement};
pub use rewriter::AssetRewriter;
