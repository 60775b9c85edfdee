use std::fmt;

/// A commit as reported by the VCS adapter for changelog generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    /// Abbreviated commit hash
    pub short_hash: String,
    /// Commit subject line
    pub message: String,
}

impl CommitRecord {
    pub fn new(short_hash: impl Into<String>, message: impl Into<String>) -> Self {
        CommitRecord {
            short_hash: short_hash.into(),
            message: message.into(),
        }
    }

    /// The `<hash> <message>` line used in changelog sections
    pub fn line(&self) -> String {
        format!("{} {}", self.short_hash, self.message)
    }
}

/// Changelog bucket a commit is filed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Feature,
    Fix,
    Chore,
    Docs,
    Refactor,
    Perf,
    Test,
    Misc,
}

impl Category {
    /// Fixed rendering order of changelog sections
    pub const ORDER: [Category; 8] = [
        Category::Feature,
        Category::Fix,
        Category::Chore,
        Category::Docs,
        Category::Refactor,
        Category::Perf,
        Category::Test,
        Category::Misc,
    ];

    /// Map a conventional-commit type token; unknown tokens land in `Misc`
    pub fn from_token(token: &str) -> Self {
        match token {
            "feat" | "feature" => Category::Feature,
            "fix" | "bugfix" => Category::Fix,
            "chore" => Category::Chore,
            "docs" => Category::Docs,
            "refactor" => Category::Refactor,
            "perf" => Category::Perf,
            "test" => Category::Test,
            _ => Category::Misc,
        }
    }

    /// Section title used in the changelog
    pub fn title(&self) -> &'static str {
        match self {
            Category::Feature => "Features",
            Category::Fix => "Bug Fixes",
            Category::Chore => "Chores",
            Category::Docs => "Documentation",
            Category::Refactor => "Refactors",
            Category::Perf => "Performance Improvements",
            Category::Test => "Tests",
            Category::Misc => "Miscellaneous",
        }
    }

    fn index(&self) -> usize {
        match self {
            Category::Feature => 0,
            Category::Fix => 1,
            Category::Chore => 2,
            Category::Docs => 3,
            Category::Refactor => 4,
            Category::Perf => 5,
            Category::Test => 6,
            Category::Misc => 7,
        }
    }

    /// Classify a `<hash> <message>` line
    pub fn classify_line(line: &str) -> Self {
        parse_category(line).unwrap_or(Category::Misc)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

fn normalize_token(raw: &str) -> String {
    raw.strip_suffix('!').unwrap_or(raw).to_lowercase()
}

fn parse_category(line: &str) -> Option<Category> {
    let (_hash, message) = line.split_once(' ')?;

    if let Some((type_part, _)) = message.split_once(':') {
        let token = match (type_part.find('('), type_part.contains(')')) {
            (Some(open), true) => &type_part[..open],
            _ => type_part,
        };
        return Some(Category::from_token(&normalize_token(token)));
    }

    let first = message.split_whitespace().next()?;
    if first.ends_with('!') {
        return Some(Category::from_token(&normalize_token(first)));
    }

    Some(Category::Misc)
}

/// Commit lines bucketed by category, preserving commit order within a bucket
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitGroup {
    buckets: [Vec<String>; 8],
}

impl CommitGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, category: Category, line: String) {
        self.buckets[category.index()].push(line);
    }

    pub fn get(&self, category: Category) -> &[String] {
        &self.buckets[category.index()]
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(Vec::is_empty)
    }

    /// Non-empty categories in rendering order
    pub fn sections(&self) -> impl Iterator<Item = (Category, &[String])> + '_ {
        Category::ORDER
            .into_iter()
            .map(move |category| (category, self.get(category)))
            .filter(|(_, lines)| !lines.is_empty())
    }
}

/// Bucket commits by their conventional-commit type
pub fn group_by_type(commits: &[CommitRecord]) -> CommitGroup {
    let mut group = CommitGroup::new();

    for commit in commits {
        let line = commit.line();
        group.push(Category::classify_line(&line), line);
    }

    group
}
