use crate::domain::CommitGroup;

/// Render one changelog entry.
///
/// ```text
/// ## v1.2.0 - 2024-05-01
/// ### Features
/// - abc1234 feat: add x
///
/// ### Bug Fixes
/// - def5678 fix: y
///
/// ```
///
/// Empty categories are left out entirely.
pub fn format_entry(version: &str, date: &str, group: &CommitGroup) -> String {
    let mut output = format!("## {} - {}\n", version, date);

    for (category, lines) in group.sections() {
        output.push_str(&format!("### {}\n", category.title()));
        for line in lines {
            output.push_str(&format!("- {}\n", line));
        }
        output.push('\n');
    }

    output
}

/// Place a new entry above the existing changelog content
pub fn prepend_entry(entry: &str, existing: &str) -> String {
    let mut content = String::with_capacity(entry.len() + existing.len());
    content.push_str(entry);
    content.push_str(existing);
    content
}
