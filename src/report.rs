use serde::Serialize;

/// A repository with the workflow paths that matched, in listing order.
#[derive(Debug, Clone, Serialize)]
pub struct RepoMatches {
    pub repo: String,
    pub files: Vec<String>,
}

/// Aggregated scan results: repository name to matching workflow paths, in
/// the order repositories were scanned. Built once per run, printed, then
/// discarded; repositories without matches are not listed.
#[derive(Debug, Default, Serialize)]
pub struct ScanReport {
    repositories: Vec<RepoMatches>,
}

impl ScanReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a repository's matches. A repository with no matching files is
    /// not recorded.
    pub fn record(&mut self, repo: &str, files: Vec<String>) {
        if files.is_empty() {
            return;
        }
        self.repositories.push(RepoMatches {
            repo: repo.to_string(),
            files,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.repositories.is_empty()
    }

    /// Number of repositories with at least one match.
    pub fn len(&self) -> usize {
        self.repositories.len()
    }

    pub fn repositories(&self) -> &[RepoMatches] {
        &self.repositories
    }

    /// Render the human-readable listing.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("\nRepositories with matching workflow content:\n");

        for matches in &self.repositories {
            out.push_str(&format!("\n{}:\n", matches.repo));
            for file in &matches.files {
                out.push_str(&format!("  - {}\n", file));
            }
        }

        out.push_str(&format!(
            "\nTotal repositories found: {}\n",
            self.repositories.len()
        ));
        out
    }

    /// Render the report as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
