use std::sync::OnceLock;

use regex::Regex;

// Attribute runs are `(?:\s[^>]*?)?` so `<a` never matches `<abbr`, and `[^>]` keeps every match
// inside a single tag.

pub(super) fn script_src() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r#"<script(?:\s[^>]*?)?\ssrc\s*=\s*["']([^"']*\.js)["'][^>]*>\s*</script>"#,
        )
        .expect("invalid script regex")
    })
}

pub(super) fn style_href() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"<link(?:\s[^>]*?)?\shref\s*=\s*["']([^"']*\.css)["'][^>]*>"#)
            .expect("invalid stylesheet regex")
    })
}

pub(super) fn image_src() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"<img(?:\s[^>]*?)?\ssrc\s*=\s*["']([^"']*)["'][^>]*>"#)
            .expect("invalid image regex")
    })
}

pub(super) fn anchor_href() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"<a(?:\s[^>]*?)?\shref\s*=\s*["']([^"']*)["'][^>]*>"#)
            .expect("invalid anchor regex")
    })
}

pub(super) fn meta_content() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r#"<meta\s+(?:name|property)=["'][^"']+["']\s+content=["']([^"']+)["']\s*/?>"#,
        )
        .expect("invalid meta regex")
    })
}
