use std::cell::RefCell;
use std::collections::HashSet;

use crate::domain::{CommitRecord, TagFact};
use crate::error::{GitflowError, Result};
use crate::git::{CommitRange, Repository};

#[derive(Debug, Default)]
struct MockState {
    branch: String,
    head_message: String,
    head_hash: String,
    exact_tag: Option<String>,
    latest_tag: Option<String>,
    merged_tags: Vec<String>,
    tags: Vec<TagFact>,
    commits: Vec<CommitRecord>,
    calls: Vec<String>,
    failing: HashSet<String>,
}

/// Mock repository for testing without actual git operations
///
/// Queries answer from canned facts; every mutating call is recorded as a
/// git-like command line (e.g. `tag v1.0.0 HEAD`) and can be made to fail
/// with [MockRepository::fail_on].
#[derive(Debug, Default)]
pub struct MockRepository {
    state: RefCell<MockState>,
}

impl MockRepository {
    /// Create a mock sitting on `branch` whose HEAD commit has `head_message`
    pub fn new(branch: impl Into<String>, head_message: impl Into<String>) -> Self {
        let repo = MockRepository::default();
        {
            let mut state = repo.state.borrow_mut();
            state.branch = branch.into();
            state.head_message = head_message.into();
            state.head_hash = "0123456789abcdef0123456789abcdef01234567".to_string();
        }
        repo
    }

    pub fn with_head_hash(self, hash: impl Into<String>) -> Self {
        self.state.borrow_mut().head_hash = hash.into();
        self
    }

    /// Tag sitting exactly on HEAD
    pub fn with_exact_tag(self, tag: impl Into<String>) -> Self {
        self.state.borrow_mut().exact_tag = Some(tag.into());
        self
    }

    /// Tag `describe` should report as the nearest one
    pub fn with_latest_tag(self, tag: impl Into<String>) -> Self {
        self.state.borrow_mut().latest_tag = Some(tag.into());
        self
    }

    pub fn with_tag(self, fact: TagFact, merged: bool) -> Self {
        {
            let mut state = self.state.borrow_mut();
            if merged {
                state.merged_tags.push(fact.name.clone());
            }
            state.tags.push(fact);
        }
        self
    }

    pub fn with_commits(self, commits: Vec<CommitRecord>) -> Self {
        self.state.borrow_mut().commits = commits;
        self
    }

    /// Make every recorded call starting with `prefix` fail
    pub fn fail_on(self, prefix: impl Into<String>) -> Self {
        self.state.borrow_mut().failing.insert(prefix.into());
        self
    }

    /// Mutating calls in the order they happened
    pub fn calls(&self) -> Vec<String> {
        self.state.borrow().calls.clone()
    }

    pub fn current_branch(&self) -> String {
        self.state.borrow().branch.clone()
    }

    fn record(&self, call: String) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if state.failing.iter().any(|prefix| call.starts_with(prefix.as_str())) {
            return Err(GitflowError::vcs(format!("mock failure: {}", call)));
        }
        state.calls.push(call);
        Ok(())
    }
}

impl Repository for MockRepository {
    fn active_branch(&self) -> Result<String> {
        Ok(self.state.borrow().branch.clone())
    }

    fn head_message(&self) -> Result<String> {
        Ok(self.state.borrow().head_message.clone())
    }

    fn head_hash(&self) -> Result<String> {
        Ok(self.state.borrow().head_hash.clone())
    }

    fn describe_exact(&self, _reference: &str) -> Result<Option<String>> {
        Ok(self.state.borrow().exact_tag.clone())
    }

    fn describe_latest(&self, _max_candidates: u32) -> Result<Option<String>> {
        Ok(self.state.borrow().latest_tag.clone())
    }

    fn tags_merged_into(&self, _reference: &str) -> Result<Vec<String>> {
        Ok(self.state.borrow().merged_tags.clone())
    }

    fn all_tags(&self) -> Result<Vec<TagFact>> {
        Ok(self.state.borrow().tags.clone())
    }

    fn commits_in_range(&self, _range: &CommitRange) -> Result<Vec<CommitRecord>> {
        Ok(self.state.borrow().commits.clone())
    }

    fn create_tag(&self, name: &str, target: &str) -> Result<()> {
        self.record(format!("tag {} {}", name, target))
    }

    fn push_tag(&self, name: &str) -> Result<()> {
        self.record(format!("push tag {}", name))
    }

    fn create_branch(&self, name: &str) -> Result<()> {
        self.record(format!("branch {}", name))
    }

    fn push_branch(&self, name: &str) -> Result<()> {
        self.record(format!("push branch {}", name))
    }

    fn checkout(&self, branch: &str) -> Result<()> {
        self.record(format!("checkout {}", branch))?;
        self.state.borrow_mut().branch = branch.to_string();
        Ok(())
    }

    fn stage_all(&self) -> Result<()> {
        self.record("add -A".to_string())
    }

    fn commit(&self, message: &str, _allow_empty: bool) -> Result<()> {
        self.record(format!("commit {}", message))
    }

    fn push_current_branch(&self) -> Result<()> {
        let branch = self.current_branch();
        self.record(format!("push branch {}", branch))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_records_calls() {
        let repo = MockRepository::new("main", "feat: x");
        repo.create_tag("v1.0.0", "HEAD").unwrap();
        repo.checkout("release/1.0").unwrap();

        assert_eq!(repo.calls(), vec!["tag v1.0.0 HEAD", "checkout release/1.0"]);
        assert_eq!(repo.active_branch().unwrap(), "release/1.0");
    }

    #[test]
    fn test_mock_failure_injection() {
        let repo = MockRepository::new("main", "feat: x").fail_on("push");

        assert!(repo.push_tag("v1.0.0").is_err());
        assert!(repo.create_tag("v1.0.0", "HEAD").is_ok());
        assert_eq!(repo.calls(), vec!["tag v1.0.0 HEAD"]);
    }
}
