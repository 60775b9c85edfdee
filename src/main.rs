use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, error, info};

use gitflow_release::cli::orchestration::{self, WorkflowArgs};
use gitflow_release::config::{self, Config, LogLevel};
use gitflow_release::git::Git2Repository;
use gitflow_release::logging;
use gitflow_release::publish::GithubReleaseClient;

#[derive(clap::Parser)]
#[command(
    name = "gitflow-release",
    version,
    about = "Decide, tag and publish releases for git-flow style branches"
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(short, long, default_value = ".", help = "Repository to release")]
    repo: PathBuf,

    #[arg(long, help = "Preview what would happen without making changes")]
    dry_run: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Decide and apply the release for the current branch (default)
    Run,
    /// Print the planned steps without changing anything
    Plan,
    /// Print the changelog entry between the two newest tags
    Changelog,
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run(args) {
        // no-op when the configured subscriber is already installed
        logging::init(LogLevel::default());
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = config::load_config(args.config.as_deref()).context("Error loading config")?;
    logging::init(config.log_level);
    debug!("Configuration: {:?}", config);

    config.validate()?;

    let repo = Git2Repository::open(&args.repo)
        .with_context(|| format!("Git repository error at {}", args.repo.display()))?
        .with_identity(&config.git)
        .with_token(config.github.token.clone());
    let work_tree = repo
        .workdir()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| args.repo.clone());

    match args.command.unwrap_or(Command::Run) {
        Command::Changelog => {
            let entry = orchestration::latest_changelog_entry(&repo, &orchestration::today())?;
            println!("{}", entry);
        }
        command => {
            let dry_run = args.dry_run || command == Command::Plan;
            release(&repo, &config, work_tree, dry_run)?;
        }
    }

    Ok(())
}

fn release(repo: &Git2Repository, config: &Config, work_tree: PathBuf, dry_run: bool) -> Result<()> {
    let publisher = GithubReleaseClient::new(&config.github)?;
    let args = WorkflowArgs::new(work_tree, orchestration::today()).dry_run(dry_run);

    let result = orchestration::run_release_workflow(repo, &publisher, &args, config)?;

    if !result.executed {
        println!("Planned steps:");
        for intent in &result.plan.intents {
            println!("  - {}", intent);
        }
    }
    if let Some(version) = &result.output {
        info!("Version: {}", version);
    }

    Ok(())
}
