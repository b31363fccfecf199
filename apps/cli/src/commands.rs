//! CLI definition, tracing setup, and the run command.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use indicatif::{ProgressBar, ProgressStyle};
use topicgen_core::pipeline::{self, ProgressReporter, RunOutcome};
use topicgen_shared::{RunConfig, load_settings};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// topicgen — generate new essay topics and file them as a GitHub issue.
///
/// Required environment: GEMINI_API_KEY, GITHUB_TOKEN, DOMAIN, NUM_TOPICS,
/// REPO_NAME (owner/name).
#[derive(Parser)]
#[command(
    name = "topicgen",
    version,
    about = "Generate new essay topics for a domain and file them as a GitHub issue.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Settings file (defaults to ./topicgen.toml when present).
    #[arg(long, env = "TOPICGEN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text")]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "topicgen=info",
        1 => "topicgen=debug",
        _ => "topicgen=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Run
// ---------------------------------------------------------------------------

/// Load configuration, run the pipeline, and print the result.
///
/// Configuration is validated before anything touches the network.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let config = RunConfig::from_env().wrap_err("invalid run configuration")?;
    let settings = load_settings(cli.config.as_deref()).wrap_err("invalid settings")?;

    info!(
        domain = %config.domain,
        count = %config.num_topics,
        repo = %config.repo,
        dataset = %settings.dataset.path.display(),
        model = %settings.gemini.model,
        "configuration loaded"
    );

    let reporter = CliProgress::new();
    let result = pipeline::run(&config, &settings, &reporter).await;
    reporter.clear();

    let outcome = result.wrap_err("topic generation workflow failed")?;

    println!();
    println!("  Workflow completed successfully!");
    println!("  Domain:   {}", config.domain);
    println!("  Existing: {}", outcome.existing_topics);
    println!("  Issue:    {}", outcome.issue.html_url);
    println!("  Time:     {:.1}s", outcome.elapsed.as_secs_f64());
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
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        spinner.set_style(style);
        spinner.enable_steady_tick(Duration::from_millis(80));
        Self { spinner }
    }

    fn clear(&self) {
        if !self.spinner.is_finished() {
            self.spinner.finish_and_clear();
        }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn topics_loaded(&self, count: usize) {
        self.spinner
            .set_message(format!("Found {count} existing topic(s)"));
    }

    fn done(&self, _outcome: &RunOutcome) {
        self.spinner.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_parse() {
        let cli = Cli::try_parse_from([
            "topicgen",
            "--config",
            "ci/topicgen.toml",
            "--log-format",
            "json",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("ci/topicgen.toml")));
        assert!(matches!(cli.log_format, LogFormat::Json));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn subcommands_are_rejected() {
        assert!(Cli::try_parse_from(["topicgen", "add"]).is_err());
    }
}
