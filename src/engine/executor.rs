use std::collections::HashSet;
use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::engine::{changelog, Intent, ReleasePlan};
use crate::error::Result;
use crate::git::Repository;
use crate::output::OutputSink;
use crate::publish::ReleasePublisher;

/// Applies a [ReleasePlan] against the repository and release adapters
///
/// Intents run strictly in order and each is attempted once. Release
/// branch creation and push are the only steps whose failure is logged
/// and skipped; every other failure stops the run and leaves whatever was
/// already done in place.
pub struct Executor<'a, R: Repository + ?Sized, P: ReleasePublisher + ?Sized> {
    repo: &'a R,
    publisher: &'a P,
    sink: &'a OutputSink,
    changelog_path: PathBuf,
    date: String,
}

impl<'a, R: Repository + ?Sized, P: ReleasePublisher + ?Sized> Executor<'a, R, P> {
    pub fn new(
        repo: &'a R,
        publisher: &'a P,
        sink: &'a OutputSink,
        changelog_path: PathBuf,
        date: impl Into<String>,
    ) -> Self {
        Executor {
            repo,
            publisher,
            sink,
            changelog_path,
            date: date.into(),
        }
    }

    pub fn execute(&self, plan: &ReleasePlan) -> Result<()> {
        let mut failed_branches = HashSet::new();

        for intent in &plan.intents {
            debug!("Applying: {}", intent);
            self.apply(intent, &mut failed_branches)?;
        }

        Ok(())
    }

    fn apply(&self, intent: &Intent, failed_branches: &mut HashSet<String>) -> Result<()> {
        match intent {
            Intent::WriteChangelog { tag } => {
                changelog::write_full_history(self.repo, &self.changelog_path, tag, &self.date)
            }
            Intent::CommitChange { message } => {
                self.repo.stage_all()?;
                self.repo.commit(message, true)
            }
            Intent::PushBranchHead => {
                self.repo.push_current_branch()?;
                info!("Git branch has been pushed");
                Ok(())
            }
            Intent::CreateTag { name } => {
                self.repo.create_tag(name, "HEAD")?;
                info!("Created tag {}", name);
                Ok(())
            }
            Intent::PushTag { name } => {
                self.repo.push_tag(name)?;
                info!("Pushed tag {}", name);
                Ok(())
            }
            Intent::CreateRemoteRelease { tag } => self.publisher.create_release(tag),
            Intent::CreateBranch { name } => {
                let created = self
                    .repo
                    .create_branch(name)
                    .and_then(|_| self.repo.checkout(name));
                match created {
                    Ok(()) => info!("Release branch {} successfully created", name),
                    Err(e) => {
                        warn!("Failed to create release branch {}: {}", name, e);
                        failed_branches.insert(name.clone());
                    }
                }
                Ok(())
            }
            Intent::PushBranch { name } => {
                if failed_branches.contains(name) {
                    debug!("Skipping push of {}, it was not created", name);
                    return Ok(());
                }
                match self.repo.push_branch(name) {
                    Ok(()) => info!("Release branch {} successfully pushed", name),
                    Err(e) => warn!("Failed to push release branch {}: {}", name, e),
                }
                Ok(())
            }
            Intent::SwitchBranch { name } => self.repo.checkout(name),
            Intent::EmitOutput { version } => self.sink.emit(version),
        }
    }
}
