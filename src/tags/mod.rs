//! Regex-based matchers for the tag shapes the rewriter understands.
//!
//! Each matcher returns structured [`TagMatch`] records so the collect-then-replace passes can be
//! tested independently of the surrounding document. Matching is intentionally textual: tags the
//! patterns do not recognise are simply not candidates.

mod patterns;
mod scan;

pub use scan::{
    TagMatch, find_anchor_tags, find_image_tags, find_meta_content_tags, find_script_tags,
    find_script_and_style_tags, find_style_tags,
};
