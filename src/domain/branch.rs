/// Prefix every release branch name starts with
pub const RELEASE_BRANCH_PREFIX: &str = "release/";

/// Represents the active git branch with its classification
///
/// `is_primary` and `is_release` are computed independently; a primary branch
/// named `release/...` is both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchContext {
    pub name: String,
    pub is_primary: bool,
    pub is_release: bool,
}

impl BranchContext {
    /// Classify `name` against the configured primary branch
    pub fn new(name: impl Into<String>, primary_branch: &str) -> Self {
        let name = name.into();
        let is_primary = name == primary_branch;
        let is_release = name.starts_with(RELEASE_BRANCH_PREFIX);

        BranchContext {
            name,
            is_primary,
            is_release,
        }
    }

    /// Neither the primary branch nor a release branch
    pub fn is_custom(&self) -> bool {
        !self.is_primary && !self.is_release
    }

    /// The `MAJOR.MINOR` suffix of a release branch name
    pub fn release_family(&self) -> Option<&str> {
        self.name.strip_prefix(RELEASE_BRANCH_PREFIX)
    }
}

/// Name of the release branch for a `MAJOR.MINOR` family
pub fn release_branch_name(family: &str) -> String {
    format!("{}{}", RELEASE_BRANCH_PREFIX, family)
}
