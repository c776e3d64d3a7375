use regex::Regex;

use super::patterns;

/// A recognised tag together with the asset path captured from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagMatch {
    /// Complete tag text as it appeared in the document.
    pub full_match: String,
    /// Captured attribute value (`src`, `href` or `content`).
    pub path: String,
    /// Byte offset of the tag in the scanned text.
    pub offset: usize,
    /// Byte offset of the captured path within `full_match`.
    pub path_offset: usize,
}

impl TagMatch {
    /// Tag text with the captured attribute value swapped for `new_path`.
    ///
    /// Only the captured span changes, even when the same text also appears in another attribute.
    pub fn with_path(&self, new_path: &str) -> String {
        let end = self.path_offset + self.path.len();
        match (self.full_match.get(..self.path_offset), self.full_match.get(end..)) {
            (Some(before), Some(after)) => format!("{before}{new_path}{after}"),
            _ => self.full_match.replacen(&self.path, new_path, 1),
        }
    }
}

fn collect(pattern: &Regex, text: &str) -> Vec<TagMatch> {
    pattern
        .captures_iter(text)
        .filter_map(|caps| {
            let full = caps.get(0)?;
            let path = caps.get(1)?;
            if path.as_str().is_empty() {
                return None;
            }
            Some(TagMatch {
                full_match: full.as_str().to_string(),
                path: path.as_str().to_string(),
                offset: full.start(),
                path_offset: path.start() - full.start(),
            })
        })
        .collect()
}

/// `<img src=...>` tags.
pub fn find_image_tags(text: &str) -> Vec<TagMatch> {
    collect(patterns::image_src(), text)
}

/// `<a href=...>` tags.
pub fn find_anchor_tags(text: &str) -> Vec<TagMatch> {
    collect(patterns::anchor_href(), text)
}

/// `<meta name|property=... content=...>` tags.
pub fn find_meta_content_tags(text: &str) -> Vec<TagMatch> {
    collect(patterns::meta_content(), text)
}

/// `<script src="*.js"></script>` tags.
pub fn find_script_tags(text: &str) -> Vec<TagMatch> {
    collect(patterns::script_src(), text)
}

/// `<link href="*.css">` tags.
pub fn find_style_tags(text: &str) -> Vec<TagMatch> {
    collect(patterns::style_href(), text)
}

/// Script and stylesheet tags combined into one list in document order.
pub fn find_script_and_style_tags(text: &str) -> Vec<TagMatch> {
    let mut matches = find_script_tags(text);
    matches.extend(find_style_tags(text));
    matches.sort_by_key(|tag| tag.offset);
    matches
}
