use crate::branch_naming::migration_branch_name;
use crate::github::{GitHubClientTrait, PullRequestInfo};
use crate::rewrite::WorkflowRewrite;
use crate::scanner;

/// Commit message used for every rewritten workflow file.
pub const COMMIT_MESSAGE: &str = "Update build-and-push-image job to use OIDC";

/// Title of the migration pull request.
pub const PR_TITLE: &str = "Update build-and-push-image job to use OIDC";

/// Body of the migration pull request.
pub const PR_BODY: &str = "This PR updates the workflow to use OIDC for AWS authentication.";

/// Terminal state of the per-repository pipeline:
/// `start -> branch-created -> [files-updated]* -> terminal`.
#[derive(Debug, Clone)]
pub enum UpdateOutcome {
    /// At least one workflow file was rewritten and a pull request was opened.
    PullRequestOpened {
        pr: PullRequestInfo,
        updated_files: Vec<String>,
    },
    /// The branch was created but no workflow file contained the legacy job.
    /// The branch is left in place; nothing deletes it.
    NoChangesNeeded,
    /// The repository was skipped before any file was touched, e.g. the
    /// migration branch already exists from an earlier run.
    Skipped { reason: String },
    /// The pipeline stopped at a remote error. Anything already created
    /// (branch, file commits) stays as it is.
    Failed { reason: String },
}

/// Outcome of the pipeline for one repository.
#[derive(Debug, Clone)]
pub struct RepoUpdate {
    pub repo: String,
    pub outcome: UpdateOutcome,
}

/// Drive the update pipeline across the organization, or across a single
/// repository when `only_repo` is given. Repositories are processed strictly
/// one at a time; outcomes are returned in processing order so callers can
/// assert on them instead of parsing log output.
pub async fn run_update(
    client: &dyn GitHubClientTrait,
    org: &str,
    only_repo: Option<&str>,
    rewrite: &WorkflowRewrite,
    base_branch: &str,
) -> Result<Vec<RepoUpdate>, Box<dyn std::error::Error>> {
    let repos = match only_repo {
        Some(name) => vec![client.get_repository(org, name).await?],
        None => client.list_repositories(org).await?,
    };

    let mut results = Vec::new();
    for repo in repos {
        results.push(update_repository(client, org, &repo.name, rewrite, base_branch).await);
    }
    Ok(results)
}

/// Run the pipeline for one repository. Every failure is reported on stdout
/// with repository/file context and reflected in the returned outcome; no
/// step is retried.
pub async fn update_repository(
    client: &dyn GitHubClientTrait,
    org: &str,
    repo: &str,
    rewrite: &WorkflowRewrite,
    base_branch: &str,
) -> RepoUpdate {
    let outcome = run_pipeline(client, org, repo, rewrite, base_branch).await;
    RepoUpdate {
        repo: repo.to_string(),
        outcome,
    }
}

async fn run_pipeline(
    client: &dyn GitHubClientTrait,
    org: &str,
    repo: &str,
    rewrite: &WorkflowRewrite,
    base_branch: &str,
) -> UpdateOutcome {
    let branch = migration_branch_name(repo);

    let head_sha = match client.branch_head_sha(org, repo, base_branch).await {
        Ok(sha) => sha,
        Err(e) => {
            println!("Error creating branch in {}: {}", repo, e);
            return UpdateOutcome::Failed {
                reason: format!("could not read {}: {}", base_branch, e),
            };
        }
    };

    if let Err(e) = client.create_branch(org, repo, &branch, &head_sha).await {
        println!("Error creating branch in {}: {}", repo, e);
        // The branch name is deterministic per repository, so a rerun lands
        // here; GitHub answers the collision with a 422. That is a skip, not
        // a failure.
        let msg = e.to_string();
        if msg.contains("already exists") || msg.contains("422") {
            return UpdateOutcome::Skipped {
                reason: format!("branch {} already exists", branch),
            };
        }
        return UpdateOutcome::Failed {
            reason: format!("branch creation failed: {}", e),
        };
    }

    let entries = match client
        .list_directory(org, repo, scanner::WORKFLOWS_DIR, Some(&branch))
        .await
    {
        Ok(entries) => entries,
        Err(e) => {
            println!("Error processing {}: {}", repo, e);
            return UpdateOutcome::Failed {
                reason: format!("could not list workflows: {}", e),
            };
        }
    };

    let mut updated_files = Vec::new();
    for entry in entries {
        if !scanner::is_workflow_file(&entry.name) {
            continue;
        }
        match update_workflow_file(client, org, repo, &entry.path, rewrite, &branch).await {
            Ok(true) => {
                println!("Updated {}/{}", repo, entry.path);
                updated_files.push(entry.path);
            }
            Ok(false) => {}
            // A conflict on one file does not stop the others.
            Err(e) => println!("Error updating file {} in {}: {}", entry.path, repo, e),
        }
    }

    if updated_files.is_empty() {
        println!("No changes needed in {}", repo);
        return UpdateOutcome::NoChangesNeeded;
    }

    match client
        .create_pull_request(org, repo, PR_TITLE, PR_BODY, &branch, base_branch)
        .await
    {
        Ok(pr) => {
            println!("Created PR: {}", pr.url);
            UpdateOutcome::PullRequestOpened { pr, updated_files }
        }
        Err(e) => {
            println!("Error creating pull request for {}: {}", repo, e);
            UpdateOutcome::Failed {
                reason: format!("pull request creation failed: {}", e),
            }
        }
    }
}

/// One file: fetch it at the branch, rewrite if the legacy job is present,
/// commit conditionally on the fetched sha. Returns whether the file changed.
async fn update_workflow_file(
    client: &dyn GitHubClientTrait,
    org: &str,
    repo: &str,
    path: &str,
    rewrite: &WorkflowRewrite,
    branch: &str,
) -> Result<bool, Box<dyn std::error::Error>> {
    let file = client.get_file(org, repo, path, Some(branch)).await?;

    let Some(updated) = rewrite.apply(&file.content) else {
        return Ok(false);
    };

    client
        .update_file(org, repo, path, COMMIT_MESSAGE, &updated, &file.sha, branch)
        .await?;
    Ok(true)
}
