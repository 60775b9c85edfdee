//! Git operations abstraction layer
//!
//! This module provides a trait-based abstraction over the git operations the
//! release engine needs, allowing for multiple implementations including a
//! real repository and an in-memory mock for testing.
//!
//! # Overview
//!
//! The primary abstraction is the [Repository] trait. The concrete
//! implementations include:
//!
//! - [repository::Git2Repository]: A real implementation using the `git2` crate
//! - [mock::MockRepository]: A mock implementation for testing
//!
//! The engine never sees a `git2` type; everything crosses this boundary as
//! plain strings, [CommitRecord]s and [TagFact]s.

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use std::fmt;

use crate::domain::{CommitRecord, TagFact};
use crate::error::Result;

/// Remote every push goes to
pub const DEFAULT_REMOTE: &str = "origin";

/// Which commits to list for a changelog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitRange {
    /// Everything reachable from HEAD
    Head,
    /// Everything reachable from the given revision
    AncestorsOf(String),
    /// Reachable from `to` but not from `from` (`from..to`)
    Between { from: String, to: String },
}

impl fmt::Display for CommitRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommitRange::Head => write!(f, "HEAD"),
            CommitRange::AncestorsOf(rev) => write!(f, "{}", rev),
            CommitRange::Between { from, to } => write!(f, "{}..{}", from, to),
        }
    }
}

/// Common git operation trait for abstraction
///
/// ## Error Handling
///
/// All methods return [crate::error::Result<T>]. Implementations map the
/// underlying failures to [crate::error::GitflowError::Git] or
/// [crate::error::GitflowError::VcsCommand]. Lookups that can legitimately
/// find nothing return `Ok(None)` or an empty list instead of an error.
pub trait Repository {
    /// Name of the checked-out branch
    fn active_branch(&self) -> Result<String>;

    /// Full message of the HEAD commit, trailing newlines removed
    fn head_message(&self) -> Result<String>;

    /// Full hex hash of the HEAD commit
    fn head_hash(&self) -> Result<String>;

    /// Tag pointing exactly at `reference`, if any
    fn describe_exact(&self, reference: &str) -> Result<Option<String>>;

    /// Most recent tag reachable from HEAD, considering at most
    /// `max_candidates` tags
    ///
    /// # Returns
    /// * `Ok(Some(tag))` - The nearest tag
    /// * `Ok(None)` - If no tag is reachable
    fn describe_latest(&self, max_candidates: u32) -> Result<Option<String>>;

    /// Names of tags whose target is `reference` or one of its ancestors
    fn tags_merged_into(&self, reference: &str) -> Result<Vec<String>>;

    /// Every tag with its effective date
    fn all_tags(&self) -> Result<Vec<TagFact>>;

    /// Commits in `range`, newest first
    fn commits_in_range(&self, range: &CommitRange) -> Result<Vec<CommitRecord>>;

    /// Create a lightweight tag on the commit `target` resolves to
    fn create_tag(&self, name: &str, target: &str) -> Result<()>;

    fn push_tag(&self, name: &str) -> Result<()>;

    /// Create a local branch at HEAD
    fn create_branch(&self, name: &str) -> Result<()>;

    fn push_branch(&self, name: &str) -> Result<()>;

    fn checkout(&self, branch: &str) -> Result<()>;

    /// Stage every change in the work tree, deletions included
    fn stage_all(&self) -> Result<()>;

    /// Commit the index on top of HEAD
    fn commit(&self, message: &str, allow_empty: bool) -> Result<()>;

    fn push_current_branch(&self) -> Result<()>;
}
