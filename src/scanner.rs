use regex::Regex;

use crate::github::GitHubClientTrait;

/// Fixed directory that holds a repository's workflow definitions.
pub const WORKFLOWS_DIR: &str = ".github/workflows";

/// Workflow files are YAML; anything else in the directory is ignored.
pub fn is_workflow_file(name: &str) -> bool {
    name.ends_with(".yml") || name.ends_with(".yaml")
}

/// Scan one repository's workflow files for the pattern, at an optional ref.
///
/// Returns the matching paths in the remote listing order. A missing or
/// unreadable workflows directory, or an unreadable file, surfaces as an
/// error; the caller reports it against the repository name and moves on to
/// the next repository without retrying.
pub async fn scan_repository(
    client: &dyn GitHubClientTrait,
    org: &str,
    repo: &str,
    pattern: &Regex,
    reference: Option<&str>,
) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    let entries = client
        .list_directory(org, repo, WORKFLOWS_DIR, reference)
        .await?;

    let mut matching = Vec::new();
    for entry in entries {
        if !is_workflow_file(&entry.name) {
            continue;
        }
        let file = client.get_file(org, repo, &entry.path, reference).await?;
        if pattern.is_match(&file.content) {
            matching.push(file.path);
        }
    }

    Ok(matching)
}
