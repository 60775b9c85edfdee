use chrono::{DateTime, TimeZone, Utc};
use git2::build::CheckoutBuilder;
use git2::{
    BranchType, Cred, CredentialType, DescribeFormatOptions, DescribeOptions, ErrorClass, ErrorCode,
    IndexAddOption, Oid, PushOptions, RemoteCallbacks, Repository as Git2Repo, Signature, Sort,
};
use std::path::Path;
use tracing::{debug, info};

use crate::config::GitIdentityConfig;
use crate::domain::{CommitRecord, TagFact};
use crate::error::{GitflowError, Result};
use crate::git::{CommitRange, DEFAULT_REMOTE};

const SHORT_HASH_LEN: usize = 7;

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
    identity: Option<GitIdentityConfig>,
    token: Option<String>,
    remote: String,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Self::from_git2(repo))
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository {
            repo,
            identity: None,
            token: None,
            remote: DEFAULT_REMOTE.to_string(),
        }
    }

    /// Author and commit release commits as `identity` instead of the
    /// repository's configured user
    pub fn with_identity(mut self, identity: &GitIdentityConfig) -> Self {
        self.identity = Some(identity.clone());
        self
    }

    /// Offer `token` as HTTP credentials when pushing
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    /// Root of the work tree (`None` for bare repositories)
    pub fn workdir(&self) -> Option<&Path> {
        self.repo.workdir()
    }

    fn resolve_commit(&self, rev: &str) -> Result<git2::Commit<'_>> {
        let object = self.repo.revparse_single(rev).map_err(|e| {
            GitflowError::vcs(format!("Cannot resolve revision '{}': {}", rev, e))
        })?;
        Ok(object.peel_to_commit()?)
    }

    fn tag_target(&self, tag_name: &str) -> Result<Oid> {
        let reference = self.repo.find_reference(&format!("refs/tags/{}", tag_name))?;
        Ok(reference.peel_to_commit()?.id())
    }

    fn sorted_tag_names(&self) -> Result<Vec<String>> {
        let tags = self.repo.tag_names(None)?;
        let mut names: Vec<String> = tags.iter().flatten().map(|s| s.to_string()).collect();
        names.sort();
        Ok(names)
    }

    fn signature(&self) -> Result<Signature<'static>> {
        match &self.identity {
            Some(identity) => Ok(Signature::now(&identity.name, &identity.email)?),
            None => Ok(self.repo.signature()?),
        }
    }

    fn push_refspec(&self, refspec: &str) -> Result<()> {
        debug!("git push {} {}", self.remote, refspec);

        let mut remote = self.repo.find_remote(&self.remote).map_err(|e| {
            GitflowError::vcs(format!("Cannot find remote '{}': {}", self.remote, e))
        })?;

        let token = self.token.as_deref();
        let mut callbacks = RemoteCallbacks::new();
        callbacks.credentials(move |_url, username_from_url, allowed_types| {
            if let Some(token) = token {
                if allowed_types.contains(CredentialType::USER_PASS_PLAINTEXT) {
                    return Cred::userpass_plaintext("x-access-token", token);
                }
            }
            if allowed_types.contains(CredentialType::SSH_KEY) {
                return Cred::ssh_key_from_agent(username_from_url.unwrap_or("git"));
            }
            Cred::default()
        });
        callbacks.push_update_reference(|refname, status| match status {
            Some(status) => Err(git2::Error::from_str(&format!(
                "remote rejected {}: {}",
                refname, status
            ))),
            None => Ok(()),
        });

        let mut push_options = PushOptions::new();
        push_options.remote_callbacks(callbacks);

        remote
            .push(&[refspec], Some(&mut push_options))
            .map_err(|e| {
                GitflowError::vcs(format!(
                    "Failed to push {} to '{}': {}",
                    refspec, self.remote, e
                ))
            })
    }
}

fn timestamp(seconds: i64) -> Result<DateTime<Utc>> {
    Utc.timestamp_opt(seconds, 0)
        .single()
        .ok_or_else(|| GitflowError::vcs(format!("Invalid git timestamp {}", seconds)))
}

impl super::Repository for Git2Repository {
    fn active_branch(&self) -> Result<String> {
        let head = self.repo.head()?;
        if !head.is_branch() {
            return Err(GitflowError::vcs("HEAD is detached, no active branch"));
        }

        head.shorthand()
            .map(str::to_string)
            .ok_or_else(|| GitflowError::vcs("Branch name is not valid UTF-8"))
    }

    fn head_message(&self) -> Result<String> {
        let commit = self.repo.head()?.peel_to_commit()?;
        let message = String::from_utf8_lossy(commit.message_bytes());
        Ok(message.trim_end_matches('\n').to_string())
    }

    fn head_hash(&self) -> Result<String> {
        Ok(self.repo.head()?.peel_to_commit()?.id().to_string())
    }

    fn describe_exact(&self, reference: &str) -> Result<Option<String>> {
        let target = self.resolve_commit(reference)?.id();

        for name in self.sorted_tag_names()? {
            if self.tag_target(&name)? == target {
                return Ok(Some(name));
            }
        }

        Ok(None)
    }

    fn describe_latest(&self, max_candidates: u32) -> Result<Option<String>> {
        debug!("git describe --tags --abbrev=0 --candidates={}", max_candidates);

        let mut options = DescribeOptions::new();
        options
            .describe_tags()
            .max_candidates_tags(max_candidates);

        let description = match self.repo.describe(&options) {
            Ok(description) => description,
            Err(e) if e.class() == ErrorClass::Describe || e.code() == ErrorCode::NotFound => {
                debug!("describe found nothing: {}", e);
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let mut format = DescribeFormatOptions::new();
        format.abbreviated_size(0);
        Ok(Some(description.format(Some(&format))?))
    }

    fn tags_merged_into(&self, reference: &str) -> Result<Vec<String>> {
        let head = self.resolve_commit(reference)?.id();
        let mut merged = Vec::new();

        for name in self.sorted_tag_names()? {
            let target = self.tag_target(&name)?;
            if target == head || self.repo.graph_descendant_of(head, target)? {
                merged.push(name);
            }
        }

        Ok(merged)
    }

    fn all_tags(&self) -> Result<Vec<TagFact>> {
        let mut facts = Vec::new();

        for name in self.sorted_tag_names()? {
            let reference = self.repo.find_reference(&format!("refs/tags/{}", name))?;
            let commit = reference.peel_to_commit()?;

            // annotated tags carry their own date
            let annotation_time = reference
                .target()
                .and_then(|oid| self.repo.find_tag(oid).ok())
                .and_then(|tag| tag.tagger().map(|tagger| tagger.when().seconds()));

            let seconds = annotation_time.unwrap_or_else(|| commit.time().seconds());
            facts.push(TagFact::new(name, timestamp(seconds)?, commit.id().to_string()));
        }

        Ok(facts)
    }

    fn commits_in_range(&self, range: &CommitRange) -> Result<Vec<CommitRecord>> {
        debug!("git log {}", range);

        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;

        match range {
            CommitRange::Head => revwalk.push_head()?,
            CommitRange::AncestorsOf(rev) => revwalk.push(self.resolve_commit(rev)?.id())?,
            CommitRange::Between { from, to } => {
                revwalk.push(self.resolve_commit(to)?.id())?;
                revwalk.hide(self.resolve_commit(from)?.id())?;
            }
        }

        let mut commits = Vec::new();
        for oid in revwalk {
            let commit = self.repo.find_commit(oid?)?;
            let hash = commit.id().to_string();
            let message = commit.summary().unwrap_or("").to_string();
            commits.push(CommitRecord::new(&hash[..SHORT_HASH_LEN], message));
        }

        Ok(commits)
    }

    fn create_tag(&self, name: &str, target: &str) -> Result<()> {
        debug!("git tag {} {}", name, target);

        let commit = self.resolve_commit(target)?;
        self.repo
            .tag_lightweight(name, commit.as_object(), false)
            .map_err(|e| GitflowError::vcs(format!("Cannot create tag '{}': {}", name, e)))?;

        Ok(())
    }

    fn push_tag(&self, name: &str) -> Result<()> {
        self.push_refspec(&format!("refs/tags/{}:refs/tags/{}", name, name))
    }

    fn create_branch(&self, name: &str) -> Result<()> {
        debug!("git branch {}", name);

        let head = self.repo.head()?.peel_to_commit()?;
        self.repo
            .branch(name, &head, false)
            .map_err(|e| GitflowError::vcs(format!("Cannot create branch '{}': {}", name, e)))?;

        Ok(())
    }

    fn push_branch(&self, name: &str) -> Result<()> {
        self.push_refspec(&format!("refs/heads/{}:refs/heads/{}", name, name))?;

        let mut branch = self.repo.find_branch(name, BranchType::Local)?;
        if let Err(e) = branch.set_upstream(Some(&format!("{}/{}", self.remote, name))) {
            debug!("Could not set upstream for '{}': {}", name, e);
        }

        Ok(())
    }

    fn checkout(&self, branch: &str) -> Result<()> {
        debug!("git checkout {}", branch);

        let refname = format!("refs/heads/{}", branch);
        let target = self.repo.revparse_single(&refname).map_err(|e| {
            GitflowError::vcs(format!("Cannot find branch '{}': {}", branch, e))
        })?;

        let mut checkout = CheckoutBuilder::new();
        checkout.safe();
        self.repo.checkout_tree(&target, Some(&mut checkout))?;
        self.repo.set_head(&refname)?;

        Ok(())
    }

    fn stage_all(&self) -> Result<()> {
        debug!("git add -A");

        let mut index = self.repo.index()?;
        index.add_all(["*"].iter(), IndexAddOption::DEFAULT, None)?;
        index.update_all(["*"].iter(), None)?;
        index.write()?;

        Ok(())
    }

    fn commit(&self, message: &str, allow_empty: bool) -> Result<()> {
        debug!("git commit --allow-empty={} -m '{}'", allow_empty, message);

        let mut index = self.repo.index()?;
        let tree_id = index.write_tree()?;
        let tree = self.repo.find_tree(tree_id)?;
        let parent = self.repo.head()?.peel_to_commit()?;

        if !allow_empty && parent.tree_id() == tree_id {
            return Err(GitflowError::vcs("Nothing to commit, working tree clean"));
        }

        let signature = self.signature()?;
        let oid = self
            .repo
            .commit(Some("HEAD"), &signature, &signature, message, &tree, &[&parent])?;
        info!("Created commit {}", oid);

        Ok(())
    }

    fn push_current_branch(&self) -> Result<()> {
        let branch = super::Repository::active_branch(self)?;
        self.push_branch(&branch)
    }
}
