use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use tracing::{debug, info};

use crate::domain::changelog::{format_entry, prepend_entry};
use crate::domain::{group_by_type, resolve_latest_two};
use crate::error::Result;
use crate::git::{CommitRange, Repository};

/// Entry for `tag` covering every commit reachable from HEAD
pub fn full_history_entry<R: Repository + ?Sized>(repo: &R, tag: &str, date: &str) -> Result<String> {
    let commits = repo.commits_in_range(&CommitRange::Head)?;
    debug!("Changelog entry for {} covers {} commits", tag, commits.len());

    Ok(format_entry(tag, date, &group_by_type(&commits)))
}

/// Prepend `entry` to the file at `path`, creating it when missing
pub fn update_file(path: &Path, entry: &str) -> Result<()> {
    let existing = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e.into()),
    };

    fs::write(path, prepend_entry(entry, &existing))?;
    info!("Updated changelog {}", path.display());

    Ok(())
}

pub fn write_full_history<R: Repository + ?Sized>(
    repo: &R,
    path: &Path,
    tag: &str,
    date: &str,
) -> Result<()> {
    let entry = full_history_entry(repo, tag, date)?;
    update_file(path, &entry)
}

/// Entry for the commits between the two newest reachable tags.
///
/// With a single tag every ancestor of it is included. When nothing can be
/// listed a one-line notice is returned instead of an entry.
pub fn entry_for_latest_range<R: Repository + ?Sized>(repo: &R, date: &str) -> Result<String> {
    let merged: HashSet<String> = repo.tags_merged_into("HEAD")?.into_iter().collect();
    let all_tags = repo.all_tags()?;

    let Some(latest) = resolve_latest_two(&merged, &all_tags) else {
        return Ok("No tags found in the repository.".to_string());
    };

    let range = match &latest.previous {
        Some(previous) => CommitRange::Between {
            from: previous.name.clone(),
            to: latest.newest.name.clone(),
        },
        None => CommitRange::AncestorsOf(latest.newest.name.clone()),
    };

    let commits = repo.commits_in_range(&range)?;
    if commits.is_empty() {
        return Ok(match &latest.previous {
            Some(previous) => format!(
                "No commits found between {} and {}.",
                previous.name, latest.newest.name
            ),
            None => format!("No commits found up to {}.", latest.newest.name),
        });
    }

    Ok(format_entry(&latest.newest.name, date, &group_by_type(&commits)))
}
