//! The individual rewrite passes, applied in a fixed order by [`crate::AssetRewriter`]:
//! placeholders, static tag resolution, custom rules, then script/style stamping.

pub mod placeholders;
pub mod rules;
pub mod stamping;
pub mod static_paths;

pub use placeholders::expand_placeholders;
pub use rules::{CustomRule, Replacement, apply_custom_rules};
pub use stamping::{HASH_MARKER, hash_lookup_keys, stamp_scripts_and_styles, stamped_path};
pub use static_paths::{STATIC_PREFIX, resolve_static_path, resolve_static_tags};
