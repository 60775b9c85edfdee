use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// A tag together with the date it counts as created
///
/// For annotated tags the effective date is the tagger timestamp, for
/// lightweight tags it is the target commit's timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagFact {
    pub name: String,
    pub effective_date: DateTime<Utc>,
    pub target: String,
}

impl TagFact {
    pub fn new(name: impl Into<String>, effective_date: DateTime<Utc>, target: impl Into<String>) -> Self {
        TagFact {
            name: name.into(),
            effective_date,
            target: target.into(),
        }
    }
}

/// The newest reachable tag and, when there is one, the tag before it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatestTags {
    pub newest: TagFact,
    pub previous: Option<TagFact>,
}

/// Pick the two most recent tags reachable from HEAD by effective date.
///
/// Tags absent from `merged` are ignored. Equal dates keep input order, so
/// the later of two simultaneous tags counts as newer. Returns `None` when no
/// reachable tag exists.
pub fn resolve_latest_two(merged: &HashSet<String>, all_tags: &[TagFact]) -> Option<LatestTags> {
    let mut reachable: Vec<&TagFact> = all_tags
        .iter()
        .filter(|tag| merged.contains(&tag.name))
        .collect();

    // stable sort
    reachable.sort_by_key(|tag| tag.effective_date);

    let newest = reachable.pop()?.clone();
    let previous = reachable.pop().cloned();

    Some(LatestTags { newest, previous })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn merged(names: &[&str]) -> HashSet<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_newest_by_date_not_name() {
        let tags = vec![
            TagFact::new("v1.10.0", at(3000), "bbb"),
            TagFact::new("v1.9.0", at(2000), "aaa"),
        ];

        let latest = resolve_latest_two(&merged(&["v1.9.0", "v1.10.0"]), &tags).unwrap();
        assert_eq!(latest.newest.name, "v1.10.0");
        assert_eq!(latest.previous.unwrap().name, "v1.9.0");
    }

    #[test]
    fn test_unreachable_tags_are_ignored() {
        let tags = vec![
            TagFact::new("v1.0.0", at(1000), "aaa"),
            TagFact::new("v2.0.0", at(5000), "zzz"),
        ];

        let latest = resolve_latest_two(&merged(&["v1.0.0"]), &tags).unwrap();
        assert_eq!(latest.newest.name, "v1.0.0");
        assert!(latest.previous.is_none());
    }

    #[test]
    fn test_no_reachable_tags() {
        let tags = vec![TagFact::new("v1.0.0", at(1000), "aaa")];
        assert!(resolve_latest_two(&merged(&[]), &tags).is_none());
        assert!(resolve_latest_two(&merged(&["v1.0.0"]), &[]).is_none());
    }

    #[test]
    fn test_ties_keep_input_order() {
        let tags = vec![
            TagFact::new("rc/1.0.0", at(1000), "aaa"),
            TagFact::new("v1.0.0", at(1000), "aaa"),
        ];

        let latest = resolve_latest_two(&merged(&["rc/1.0.0", "v1.0.0"]), &tags).unwrap();
        assert_eq!(latest.newest.name, "v1.0.0");
        assert_eq!(latest.previous.unwrap().name, "rc/1.0.0");
    }

    #[test]
    fn test_three_tags_returns_top_two() {
        let tags = vec![
            TagFact::new("v0.3.0", at(300), "c"),
            TagFact::new("v0.1.0", at(100), "a"),
            TagFact::new("v0.2.0", at(200), "b"),
        ];

        let latest = resolve_latest_two(&merged(&["v0.1.0", "v0.2.0", "v0.3.0"]), &tags).unwrap();
        assert_eq!(latest.newest.name, "v0.3.0");
        assert_eq!(latest.previous.unwrap().name, "v0.2.0");
    }
}
