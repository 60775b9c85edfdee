//! Domain logic - pure release rules independent of git operations

pub mod branch;
pub mod bump;
pub mod changelog;
pub mod commit;
pub mod tag;
pub mod version;

pub use branch::BranchContext;
pub use commit::{group_by_type, Category, CommitGroup, CommitRecord};
pub use tag::{resolve_latest_two, LatestTags, TagFact};
pub use version::{Version, VersionBump};
