//! End-to-end run: dataset → existing topics → Gemini → GitHub issue.

use std::time::{Duration, Instant};

use tracing::{info, instrument};

use topicgen_generator::GeminiClient;
use topicgen_publisher::{CreatedIssue, GitHubClient, IssueDraft};
use topicgen_shared::{GenerationRequest, Result, RunConfig, Settings};

/// Result of a successful run.
#[derive(Debug)]
pub struct RunOutcome {
    /// Number of topics already in the dataset for the domain.
    pub existing_topics: usize,
    /// The issue that was filed.
    pub issue: CreatedIssue,
    /// Total elapsed time.
    pub elapsed: Duration,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called once the dataset has been read.
    fn topics_loaded(&self, count: usize);
    /// Called when the pipeline completes successfully.
    fn done(&self, outcome: &RunOutcome);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn topics_loaded(&self, _count: usize) {}
    fn done(&self, _outcome: &RunOutcome) {}
}

/// Run the full pipeline once.
///
/// 1. Read existing topics for the domain
/// 2. Generate new topics
/// 3. File them as an issue
///
/// Each step runs only after the previous one succeeded; the first error
/// ends the run.
#[instrument(skip_all, fields(domain = %config.domain, repo = %config.repo))]
pub async fn run(
    config: &RunConfig,
    settings: &Settings,
    progress: &dyn ProgressReporter,
) -> Result<RunOutcome> {
    let start = Instant::now();

    // Clients first: a malformed token fails here, before the dataset is read.
    let gemini = GeminiClient::new(&settings.gemini, &config.gemini_api_key)?;
    let github = GitHubClient::new(&settings.github, &config.github_token)?;

    info!(count = %config.num_topics, "starting topic generation run");

    // --- Phase 1: Existing topics ---
    progress.phase("Reading existing topics");
    let existing = topicgen_dataset::load_existing_topics(
        &settings.dataset.path,
        &config.domain,
        &settings.dataset.id_prefix,
    )?;
    progress.topics_loaded(existing.len());

    // --- Phase 2: Generation ---
    progress.phase("Generating new topics");
    let request = GenerationRequest {
        domain: &config.domain,
        count: config.num_topics,
        existing: &existing,
    };
    let generated = gemini.generate(&request).await?;

    // --- Phase 3: Publish ---
    progress.phase("Creating GitHub issue");
    let draft = IssueDraft::for_topics(&config.domain, config.num_topics, &generated);
    let issue = github.create_issue(&config.repo, &draft).await?;

    let outcome = RunOutcome {
        existing_topics: existing.len(),
        issue,
        elapsed: start.elapsed(),
    };

    info!(
        issue = %outcome.issue.html_url,
        elapsed_ms = outcome.elapsed.as_millis() as u64,
        "run complete"
    );
    progress.done(&outcome);

    Ok(outcome)
}
