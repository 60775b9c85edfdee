//! Main workflow orchestration logic
//!
//! Separates CLI argument parsing from the release workflow so the workflow
//! can be driven programmatically (and from tests) without clap.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::Config;
use crate::engine::{self, changelog, Executor, ReleasePlan, RunFacts};
use crate::error::Result;
use crate::git::Repository;
use crate::output::OutputSink;
use crate::publish::ReleasePublisher;

/// Arguments for the release workflow
///
/// Mirrors the CLI Args but in a format suitable for orchestration logic.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowArgs {
    /// Root of the work tree; relative changelog paths resolve against it
    pub work_tree: PathBuf,

    /// Plan only, change nothing
    pub dry_run: bool,

    /// Date stamped on changelog entries (`YYYY-MM-DD`)
    pub date: String,
}

impl WorkflowArgs {
    pub fn new(work_tree: impl Into<PathBuf>, date: impl Into<String>) -> Self {
        WorkflowArgs {
            work_tree: work_tree.into(),
            dry_run: false,
            date: date.into(),
        }
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// Result of a successful release workflow
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowResult {
    /// Version reported to CI
    pub output: Option<String>,

    /// What was decided (and, unless dry-run, applied)
    pub plan: ReleasePlan,

    /// Whether the plan was applied
    pub executed: bool,
}

/// Today's date in the changelog format
pub fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

/// Resolve the configured changelog path against the work tree
pub fn changelog_path(config: &Config, work_tree: &Path) -> PathBuf {
    if config.paths.changelog.is_absolute() {
        config.paths.changelog.clone()
    } else {
        work_tree.join(&config.paths.changelog)
    }
}

/// Main release workflow
///
/// 1. Gather facts about HEAD, the branch and the nearest tags
/// 2. Plan the release
/// 3. Apply the plan, unless this is a dry run
pub fn run_release_workflow<R, P>(
    repo: &R,
    publisher: &P,
    args: &WorkflowArgs,
    config: &Config,
) -> Result<WorkflowResult>
where
    R: Repository + ?Sized,
    P: ReleasePublisher + ?Sized,
{
    let facts = RunFacts::gather(repo, config)?;
    let plan = engine::plan(config, &facts)?;

    for warning in &plan.warnings {
        warn!("{}", warning);
    }

    if args.dry_run {
        info!("Dry run, {} planned steps not applied", plan.intents.len());
        return Ok(WorkflowResult {
            output: plan.output.clone(),
            plan,
            executed: false,
        });
    }

    let sink = OutputSink::new(config.output_file.clone());
    let executor = Executor::new(
        repo,
        publisher,
        &sink,
        changelog_path(config, &args.work_tree),
        args.date.clone(),
    );
    executor.execute(&plan)?;

    Ok(WorkflowResult {
        output: plan.output.clone(),
        plan,
        executed: true,
    })
}

/// Changelog entry for the commits between the two newest reachable tags
pub fn latest_changelog_entry<R: Repository + ?Sized>(repo: &R, date: &str) -> Result<String> {
    changelog::entry_for_latest_range(repo, date)
}
