//! Release decision engine
//!
//! [plan] turns the facts gathered about a run into an ordered list of
//! [Intent]s without touching the repository. The [Executor] then applies
//! those intents against the git and release adapters.
//!
//! The branch paths are evaluated as independent conditionals: the primary
//! path, then the `release/*` path, then the custom-branch path. A primary
//! branch named `release/...` runs both of the first two.

pub mod changelog;
pub mod executor;

pub use executor::Executor;

use std::fmt;

use tracing::{debug, info};

use crate::config::Config;
use crate::domain::branch::release_branch_name;
use crate::domain::{bump, BranchContext, Version, VersionBump};
use crate::error::Result;
use crate::git::Repository;
use crate::warning::PlanWarning;

const CUSTOM_VERSION_PREFIX: &str = "sha/";
const SHORT_HASH_LEN: usize = 7;

/// Everything the engine needs to know about the repository for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunFacts {
    pub active_branch: String,
    pub head_message: String,
    pub head_hash: String,
    /// Tag pointing exactly at HEAD
    pub tag_on_head: Option<String>,
    /// Nearest tag reachable from HEAD
    pub last_tag: Option<String>,
}

impl RunFacts {
    /// Read the run facts from `repo`
    pub fn gather<R: Repository + ?Sized>(repo: &R, config: &Config) -> Result<Self> {
        info!("Gathering information ...");

        let last_tag = repo.describe_latest(config.describe_candidates)?;
        if last_tag.is_none() {
            debug!("No reachable tag found");
        }
        let tag_on_head = repo.describe_exact("HEAD")?;

        let facts = RunFacts {
            active_branch: repo.active_branch()?,
            head_message: repo.head_message()?,
            head_hash: repo.head_hash()?,
            tag_on_head,
            last_tag,
        };

        info!("Git branch: '{}'", facts.active_branch);
        info!("Git commit message: '{}'", facts.head_message);
        info!("Git tag (HEAD): {:?}", facts.tag_on_head);
        info!("Git tag (latest available): {:?}", facts.last_tag);

        Ok(facts)
    }
}

/// One side effect the engine decided on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Prepend the full-history entry for `tag` to the changelog file
    WriteChangelog { tag: String },
    /// Stage everything and commit, allowing an empty commit
    CommitChange { message: String },
    PushBranchHead,
    /// Tag the current HEAD
    CreateTag { name: String },
    PushTag { name: String },
    CreateRemoteRelease { tag: String },
    /// Create a branch at HEAD and switch to it; failure is tolerated
    CreateBranch { name: String },
    /// Push a created branch; failure is tolerated
    PushBranch { name: String },
    SwitchBranch { name: String },
    EmitOutput { version: String },
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Intent::WriteChangelog { tag } => write!(f, "write changelog entry for {}", tag),
            Intent::CommitChange { message } => write!(f, "commit '{}'", message),
            Intent::PushBranchHead => write!(f, "push current branch"),
            Intent::CreateTag { name } => write!(f, "create tag {}", name),
            Intent::PushTag { name } => write!(f, "push tag {}", name),
            Intent::CreateRemoteRelease { tag } => write!(f, "create remote release {}", tag),
            Intent::CreateBranch { name } => write!(f, "create branch {}", name),
            Intent::PushBranch { name } => write!(f, "push branch {}", name),
            Intent::SwitchBranch { name } => write!(f, "switch to {}", name),
            Intent::EmitOutput { version } => write!(f, "output version {}", version),
        }
    }
}

/// The outcome of [plan]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReleasePlan {
    pub intents: Vec<Intent>,
    /// Version reported to CI; the last emitted one wins
    pub output: Option<String>,
    pub warnings: Vec<PlanWarning>,
}

impl ReleasePlan {
    /// True when the plan changes nothing besides reporting a version
    pub fn is_read_only(&self) -> bool {
        self.intents
            .iter()
            .all(|intent| matches!(intent, Intent::EmitOutput { .. }))
    }

    fn push(&mut self, intent: Intent) {
        self.intents.push(intent);
    }

    fn emit(&mut self, version: impl Into<String>) {
        let version = version.into();
        self.output = Some(version.clone());
        self.push(Intent::EmitOutput { version });
    }

    /// Changelog, release commit and the push of the branch head
    fn release_commit(&mut self, config: &Config, tag: &str) {
        self.push(Intent::WriteChangelog {
            tag: tag.to_string(),
        });
        self.push(Intent::CommitChange {
            message: format!(
                "chore(release): version {} {}",
                tag, config.keywords.skip_ci
            ),
        });
        if config.features.enable_git_push {
            self.push(Intent::PushBranchHead);
        } else {
            self.warnings.push(PlanWarning::PushSkipped {
                what: "branch head".to_string(),
            });
        }
    }

    fn tag(&mut self, config: &Config, tag: &str) {
        self.push(Intent::CreateTag {
            name: tag.to_string(),
        });
        if config.features.enable_git_push {
            self.push(Intent::PushTag {
                name: tag.to_string(),
            });
        } else {
            self.warnings.push(PlanWarning::PushSkipped {
                what: format!("tag {}", tag),
            });
        }
    }

    /// Remote releases need the tag on the remote, so they follow the push flag
    fn remote_release(&mut self, config: &Config, tag: &str) {
        if !config.features.enable_github_release {
            return;
        }
        if config.features.enable_git_push {
            self.push(Intent::CreateRemoteRelease {
                tag: tag.to_string(),
            });
        } else {
            self.warnings.push(PlanWarning::RemoteReleaseSkipped {
                tag: tag.to_string(),
            });
        }
    }

    fn release_branch(&mut self, config: &Config, version: &Version) {
        let name = release_branch_name(&version.family());
        self.push(Intent::CreateBranch { name: name.clone() });
        if config.features.enable_git_push {
            self.push(Intent::PushBranch { name });
        } else {
            self.warnings.push(PlanWarning::PushSkipped {
                what: format!("branch {}", name),
            });
        }
    }
}

/// Decide what this run does.
///
/// Pure: reads only `config` and `facts`. Fails when the last tag or the
/// initial version cannot be parsed.
pub fn plan(config: &Config, facts: &RunFacts) -> Result<ReleasePlan> {
    let mut plan = ReleasePlan::default();

    if let Some(tag) = &facts.tag_on_head {
        plan.warnings.push(PlanWarning::AlreadyTagged { tag: tag.clone() });
        plan.emit(tag.clone());
        return Ok(plan);
    }

    let branch = BranchContext::new(&facts.active_branch, &config.primary_branch);
    let last_tag = facts.last_tag.as_deref();

    if branch.is_primary {
        let mut bump_type = bump::classify(
            &facts.head_message,
            &config.keywords.major_bump,
            &config.keywords.patch_bump,
        );
        debug!("Bump type from commit message: {}", bump_type);

        let auto_release = config.is_auto_release_branch(&branch.name)
            || (bump::requests_release(&facts.head_message) && branch.is_primary);

        if auto_release {
            if bump_type == VersionBump::Patch {
                plan.warnings.push(PlanWarning::PatchCoercedToMinor);
                bump_type = VersionBump::Minor;
            }

            let version = Version::base(last_tag, &config.init_version)?.bump(bump_type);
            let tag = format!("{}{}", config.tag_prefix.release, version);
            info!("New tag for primary branch: {}", tag);

            plan.release_commit(config, &tag);
            plan.tag(config, &tag);
            plan.remote_release(config, &tag);
            plan.release_branch(config, &version);
            plan.push(Intent::SwitchBranch {
                name: branch.name.clone(),
            });
            plan.emit(tag);
        } else {
            let version = Version::base(last_tag, &config.init_version)?.bump(bump_type);
            let tag = format!("{}{}", config.tag_prefix.candidate, version);
            info!("New tag: {}", tag);

            plan.release_commit(config, &tag);
            plan.tag(config, &tag);
            plan.emit(tag);
        }
    }

    if branch.is_release {
        plan.warnings.push(PlanWarning::ReleaseBranchPatchOnly);

        let version = Version::base(last_tag, &config.init_version)?.bump(VersionBump::Patch);
        let tag = format!("{}{}", config.tag_prefix.release, version);
        info!("New tag: {}", tag);

        let tag_family = version.family();
        let branch_family = branch.release_family().unwrap_or_default();
        if branch_family != tag_family {
            plan.warnings.push(PlanWarning::ReleaseFamilyMismatch {
                branch_family: branch_family.to_string(),
                tag_family,
            });
        }

        plan.release_commit(config, &tag);
        plan.tag(config, &tag);
        plan.remote_release(config, &tag);
        plan.emit(tag);
    }

    if branch.is_custom() {
        let short = facts
            .head_hash
            .get(..SHORT_HASH_LEN)
            .unwrap_or(&facts.head_hash);
        let version = format!("{}{}", CUSTOM_VERSION_PREFIX, short);
        info!("Custom build version is: {}", version);
        plan.emit(version);
    }

    Ok(plan)
}
