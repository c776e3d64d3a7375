//! Rewriter configuration, discoverable from a project directory.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{RewriterError, RewriterResult};
use crate::models::Environment;

const DEFAULT_CONFIG_FILE: &str = "rewriter.config.json";
const DEFAULT_TLD: &str = "hxi2.fr";
const TLD_ENV_VAR: &str = "HXI2_TLD";

/// Literal custom rule declared in a configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RuleConfig {
    /// Regular expression searched for in every document.
    pub pattern: String,
    /// Replacement text; `$1`, `$&` and `$<name>` are expanded as in JavaScript's `replace`.
    pub replacement: String,
}

/// Build-wide settings, constant for the lifetime of one rewriter.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RewriterConfig {
    /// Environment driving favicon and `static:` resolution.
    pub environment: Environment,
    /// Whether script/style references under the output root receive a content hash.
    /// Unset means "only in production"; see [`RewriterConfig::stamps_hashes`].
    pub hash_stamping: Option<bool>,
    /// Path prefix under which compiled scripts and styles are served.
    pub build_output_root: String,
    /// Origin used to resolve `static:` paths in production.
    pub static_base_url: String,
    /// Pinned version of the icon-font web component.
    pub iconify_version: String,
    /// CDN prefix the icon-font bundle is loaded from.
    pub iconify_cdn_base: String,
    /// Literal rules, registered before any rule added programmatically.
    pub rules: Vec<RuleConfig>,
}

impl Default for RewriterConfig {
    fn default() -> Self {
        Self {
            environment: Environment::Production,
            hash_stamping: None,
            build_output_root: "/dist".into(),
            static_base_url: default_static_base_url(),
            iconify_version: "2.3.0".into(),
            iconify_cdn_base: "https://cdn.jsdelivr.net/npm".into(),
            rules: Vec::new(),
        }
    }
}

impl RewriterConfig {
    /// Defaults for the given environment, with hash stamping enabled only in production.
    pub fn for_environment(environment: Environment) -> Self {
        Self {
            environment,
            ..Self::default()
        }
    }

    /// Effective hash-stamping switch: the explicit setting, else on in production only.
    pub fn stamps_hashes(&self) -> bool {
        self.hash_stamping
            .unwrap_or(self.environment == Environment::Production)
    }

    /// Attempt to load configuration from the provided directory.
    ///
    /// A missing or unparsable file falls back to the defaults so a build can still proceed.
    pub fn discover(dir: &Path) -> Self {
        let candidate = dir.join(DEFAULT_CONFIG_FILE);
        match Self::from_path(&candidate) {
            Ok(config) => config,
            Err(err) => {
                if candidate.exists() {
                    tracing::warn!("ignoring configuration: {err}");
                }
                Self::default()
            }
        }
    }

    /// Read configuration from a JSON file, or YAML when the extension says so.
    pub fn from_path(path: &Path) -> RewriterResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| RewriterError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;

        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

        let parsed: Result<Self, String> = if is_yaml {
            serde_yaml::from_str(&content).map_err(|err| err.to_string())
        } else {
            serde_json::from_str(&content).map_err(|err| err.to_string())
        };

        parsed
            .map(Self::normalised)
            .map_err(|reason| RewriterError::ConfigParse {
                path: path.to_path_buf(),
                reason,
            })
    }

    /// Strip trailing slashes from the URL and path prefixes.
    pub fn normalised(mut self) -> Self {
        self.static_base_url = self.static_base_url.trim_end_matches('/').to_string();
        self.iconify_cdn_base = self.iconify_cdn_base.trim_end_matches('/').to_string();
        let root = self.build_output_root.trim_end_matches('/');
        self.build_output_root = if root.is_empty() { "/".into() } else { root.into() };
        self
    }
}

/// Static origin derived from `HXI2_TLD`, falling back to the production domain.
pub fn default_static_base_url() -> String {
    static_base_url_from_tld_var(std::env::var(TLD_ENV_VAR).ok().as_deref())
}

/// Static origin for the raw value of `HXI2_TLD`; unset or blank means the production domain.
pub fn static_base_url_from_tld_var(value: Option<&str>) -> String {
    let tld = value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(DEFAULT_TLD);
    static_base_url_for_tld(tld)
}

/// Static origin for a top-level domain.
pub fn static_base_url_for_tld(tld: &str) -> String {
    format!("https://static.{}", tld.trim_matches('.'))
}
