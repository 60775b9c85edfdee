use crate::domain::VersionBump;

/// Marker that opts a primary-branch commit into the release path
pub const RELEASE_MARKER: &str = "[RELEASE]";

/// Classify the bump a single commit message asks for.
///
/// Defaults to minor. Major keywords are matched case-sensitively, patch
/// keywords case-insensitively, both as plain substrings. The patch check
/// runs last and wins over a major match.
pub fn classify(message: &str, major_keywords: &[String], patch_keywords: &[String]) -> VersionBump {
    let mut result = VersionBump::Minor;

    if major_keywords
        .iter()
        .any(|keyword| message.contains(keyword.as_str()))
    {
        result = VersionBump::Major;
    }

    let lowered = message.to_lowercase();
    if patch_keywords
        .iter()
        .any(|keyword| lowered.contains(&keyword.to_lowercase()))
    {
        result = VersionBump::Patch;
    }

    result
}

/// True when the message carries the literal release marker
pub fn requests_release(message: &str) -> bool {
    message.contains(RELEASE_MARKER)
}
