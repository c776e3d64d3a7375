//! html-asset-rewriter - rewrite asset references in a finished build directory.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use html_asset_rewriter::presets::{dist_path_rule, live_reload_rule};
use html_asset_rewriter::{AssetRewriter, Environment, RewriterConfig, rewrite_output_dir};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Rewrite placeholders, static paths and cache-busting hashes in generated HTML.
#[derive(Parser, Debug)]
#[command(name = "html-asset-rewriter")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Build output directory containing the HTML, scripts and stylesheets
    dir: PathBuf,

    /// Build environment (production, development)
    #[arg(long)]
    env: Option<Environment>,

    /// Configuration file (JSON or YAML); defaults to rewriter.config.json in DIR when present
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Force hash stamping on
    #[arg(long, conflicts_with = "no_hash")]
    hash: bool,

    /// Force hash stamping off
    #[arg(long)]
    no_hash: bool,

    /// Path prefix under which scripts and styles are served
    #[arg(long)]
    output_root: Option<String>,

    /// Origin that `static:` paths resolve to in production
    #[arg(long)]
    static_base_url: Option<String>,

    /// Expand `<!-- dist-path -->` to /dist/ plus the document's directory
    #[arg(long)]
    dist_path: bool,

    /// Inject a live-reload script listening on this event-stream endpoint
    #[arg(long, value_name = "ENDPOINT")]
    live_reload: Option<String>,

    /// Extra literal rule, written PATTERN=>REPLACEMENT (repeatable)
    #[arg(long = "rule", value_name = "PATTERN=>REPLACEMENT")]
    rules: Vec<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = resolve_config(cli)?;
    let mut rewriter = AssetRewriter::new(config)?;

    for raw in &cli.rules {
        let (pattern, replacement) = raw
            .split_once("=>")
            .ok_or_else(|| anyhow!("rule `{raw}` is not of the form PATTERN=>REPLACEMENT"))?;
        rewriter.add_pattern(pattern, replacement)?;
    }
    if cli.dist_path {
        rewriter.add_rule(dist_path_rule()?);
    }
    if let Some(endpoint) = &cli.live_reload {
        rewriter.add_rule(live_reload_rule(endpoint)?);
    }

    let report = rewrite_output_dir(&mut rewriter, &cli.dir)
        .with_context(|| format!("failed to rewrite {}", cli.dir.display()))?;

    println!(
        "Rewrote {} document(s), hashed {} asset(s){}",
        report.rewritten_documents.len(),
        report.hashed_assets,
        if report.skipped_documents.is_empty() {
            String::new()
        } else {
            format!(", skipped {} undecodable document(s)", report.skipped_documents.len())
        }
    );
    Ok(())
}

/// Layer command-line overrides over the file configuration.
fn resolve_config(cli: &Cli) -> Result<RewriterConfig> {
    let mut config = match &cli.config {
        Some(path) => RewriterConfig::from_path(path)?,
        None => RewriterConfig::discover(&cli.dir),
    };

    if let Some(env) = cli.env {
        config.environment = env;
    }
    // Left unset, stamping follows the environment (on in production).
    if cli.hash {
        config.hash_stamping = Some(true);
    }
    if cli.no_hash {
        config.hash_stamping = Some(false);
    }
    if let Some(root) = &cli.output_root {
        config.build_output_root = root.clone();
    }
    if let Some(url) = &cli.static_base_url {
        config.static_base_url = url.clone();
    }

    Ok(config.normalised())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("html-asset-rewriter").chain(args.iter().copied()))
    }

    #[test]
    fn stamps_hashes_in_production_without_flags() {
        let dir = tempdir().unwrap();
        let root = dir.path().to_str().unwrap();

        let config = resolve_config(&cli(&[root])).unwrap();
        assert_eq!(config.environment, Environment::Production);
        assert!(config.stamps_hashes());

        let config = resolve_config(&cli(&[root, "--env", "development"])).unwrap();
        assert!(!config.stamps_hashes());

        let config = resolve_config(&cli(&[root, "--env", "development", "--hash"])).unwrap();
        assert!(config.stamps_hashes());

        let config = resolve_config(&cli(&[root, "--no-hash"])).unwrap();
        assert!(!config.stamps_hashes());
    }

    #[test]
    fn config_file_setting_wins_over_environment_default() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("rewriter.config.json"), r#"{ "hashStamping": false }"#).unwrap();
        let root = dir.path().to_str().unwrap();

        let config = resolve_config(&cli(&[root])).unwrap();
        assert!(!config.stamps_hashes());

        let config = resolve_config(&cli(&[root, "--hash"])).unwrap();
        assert!(config.stamps_hashes());
    }

    #[test]
    fn default_run_stamps_scripts_on_disk() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("app.bundle.js"), b"app()").unwrap();
        fs::write(
            dir.path().join("index.html"),
            r#"<script src="/dist/app.bundle.js"></script>"#,
        )
        .unwrap();

        run(&cli(&[dir.path().to_str().unwrap()])).unwrap();

        let html = fs::read_to_string(dir.path().join("index.html")).unwrap();
        assert_eq!(
            html,
            format!(
                r#"<script src="/dist/app.bundle.js?{}__hash__"></script>"#,
                html_asset_rewriter::content_hash(b"app()")
            )
        );
    }
}
