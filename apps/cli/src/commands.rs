//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;
use url::Url;

use patterndocs_core::pipeline::{GenerateConfig, GenerateReport, ProgressReporter};
use patterndocs_shared::{AppConfig, init_config, load_config};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// patterndocs — generate static-analysis pattern documentation.
#[derive(Parser)]
#[command(
    name = "patterndocs",
    version,
    about = "Generate Markdown description files from the bug-pattern metadata feed.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Download the pattern feed and write one description file per pattern.
    Generate {
        /// Feed URL (defaults to the configured metadata feed).
        #[arg(long)]
        url: Option<String>,

        /// Output directory for the description files. Must already exist.
        #[arg(short, long)]
        out: Option<String>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "patterndocs=info",
        1 => "patterndocs=debug",
        _ => "patterndocs=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Generate { url, out } => cmd_generate(url.as_deref(), out.as_deref()).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show().await,
        },
    }
}

// ---------------------------------------------------------------------------
// generate
// ---------------------------------------------------------------------------

/// Resolve the effective generate settings: CLI flags override the config
/// file, which overrides the built-in defaults.
fn resolve_generate_config(
    url: Option<&str>,
    out: Option<&str>,
    config: &AppConfig,
) -> Result<GenerateConfig> {
    let feed_url = url.unwrap_or(&config.feed.url);
    let feed_url =
        Url::parse(feed_url).map_err(|e| eyre!("invalid feed URL '{feed_url}': {e}"))?;

    Ok(GenerateConfig {
        feed_url,
        output_dir: PathBuf::from(out.unwrap_or(&config.output.dir)),
        timeout_secs: config.feed.timeout_secs,
    })
}

async fn cmd_generate(url: Option<&str>, out: Option<&str>) -> Result<()> {
    let config = load_config()?;
    let generate_config = resolve_generate_config(url, out, &config)?;

    info!(
        url = %generate_config.feed_url,
        out = %generate_config.output_dir.display(),
        "generating pattern descriptions"
    );

    let reporter = CliProgress::new();
    let report = patterndocs_core::pipeline::run_generate(&generate_config, &reporter).await?;

    // Print summary
    println!();
    println!("  Descriptions generated!");
    println!("  Patterns: {}", report.patterns_found);
    println!("  Written:  {}", report.files_written);
    if !report.skipped.is_empty() {
        println!("  Skipped:  {}", report.skipped.len());
        for skip in &report.skipped {
            println!("    - {}: {}", skip.label, skip.reason);
        }
    }
    println!("  Output:   {}", report.output_dir.display());
    println!("  Time:     {:.1}s", report.elapsed.as_secs_f64());
    println!();

    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap()
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn pattern_written(&self, id: &str, current: usize, total: usize) {
        self.spinner.set_message(format!(
            "Writing [{current}/{total}] {id}"
        ));
    }

    fn done(&self, _report: &GenerateReport) {
        self.spinner.finish_and_clear();
    }
}

// ---------------------------------------------------------------------------
// config
// ---------------------------------------------------------------------------

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    use patterndocs_shared::{DEFAULT_FEED_URL, DEFAULT_OUTPUT_DIR};

    #[test]
    fn generate_defaults_flow_through() {
        let resolved = resolve_generate_config(None, None, &AppConfig::default()).unwrap();

        assert_eq!(resolved.feed_url.as_str(), DEFAULT_FEED_URL);
        assert_eq!(resolved.output_dir, PathBuf::from(DEFAULT_OUTPUT_DIR));
        assert_eq!(resolved.timeout_secs, 30);
    }

    #[test]
    fn config_file_values_override_defaults() {
        let mut config = AppConfig::default();
        config.feed.url = "https://mirror.internal/metadata/messages.xml".into();
        config.feed.timeout_secs = 5;
        config.output.dir = "/srv/pattern-docs".into();

        let resolved = resolve_generate_config(None, None, &config).unwrap();

        assert_eq!(
            resolved.feed_url.as_str(),
            "https://mirror.internal/metadata/messages.xml"
        );
        assert_eq!(resolved.output_dir, PathBuf::from("/srv/pattern-docs"));
        assert_eq!(resolved.timeout_secs, 5);
    }

    #[test]
    fn flags_override_config_file_values() {
        let mut config = AppConfig::default();
        config.feed.url = "https://mirror.internal/metadata/messages.xml".into();
        config.output.dir = "/srv/pattern-docs".into();

        let resolved = resolve_generate_config(
            Some("https://fork.example.net/messages.xml"),
            Some("/tmp/descriptions"),
            &config,
        )
        .unwrap();

        assert_eq!(
            resolved.feed_url.as_str(),
            "https://fork.example.net/messages.xml"
        );
        assert_eq!(resolved.output_dir, PathBuf::from("/tmp/descriptions"));
    }

    #[test]
    fn invalid_feed_url_flag_is_rejected() {
        let err = resolve_generate_config(Some("not a url"), None, &AppConfig::default())
            .unwrap_err();

        assert!(err.to_string().contains("invalid feed URL"));
    }
}
