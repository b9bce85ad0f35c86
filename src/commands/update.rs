use crate::github::GitHubClientTrait;
use crate::rewrite::WorkflowRewrite;
use crate::updater::{self, UpdateOutcome};

pub async fn handle_update(
    client: &dyn GitHubClientTrait,
    org: &str,
    only_repo: Option<&str>,
    base_branch: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let Some(org_info) = super::resolve_organization(client, org).await else {
        return Ok(());
    };

    let rewrite = WorkflowRewrite::new()?;
    let results = updater::run_update(client, &org_info.login, only_repo, &rewrite, base_branch).await?;

    let mut opened = 0;
    let mut unchanged = 0;
    let mut skipped = 0;
    let mut failed = 0;
    for result in &results {
        match &result.outcome {
            UpdateOutcome::PullRequestOpened { .. } => opened += 1,
            UpdateOutcome::NoChangesNeeded => unchanged += 1,
            UpdateOutcome::Skipped { .. } => skipped += 1,
            UpdateOutcome::Failed { .. } => failed += 1,
        }
    }

    println!("Update process completed.");
    println!(
        "{} pull requests opened, {} unchanged, {} skipped, {} failed",
        opened, unchanged, skipped, failed
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::branch_naming::migration_branch_name;
    use crate::mock_github::MockGitHubClient;

    #[tokio::test]
    async fn test_handle_update_with_unknown_org_is_clean() {
        let mock = MockGitHubClient::new();
        assert!(handle_update(&mock, "ghost", None, "main").await.is_ok());
        assert!(mock.created_prs().is_empty());
    }

    #[tokio::test]
    async fn test_handle_update_runs_the_pipeline() {
        let mock = MockGitHubClient::new();
        mock.add_repo("codespark", "api");
        mock.add_workflow_file(
            "api",
            "deploy.yml",
            "jobs:\n  build-and-push-image:\n    uses: LearnWithHomer/infrastructure-public/.github/workflows/build-and-push-image-to-ecr.yml@main\n    secrets:\n      ecr_repo: ${{ secrets.ECR_REPOSITORY }}\n      access_key_id: ${{ secrets.CODESPARK_AWS_ACCESS_KEY_ID }}\n      secret_access_key: ${{ secrets.CODESPARK_AWS_SECRET_ACCESS_KEY }}\n      aws_region: ${{ secrets.CODESPARK_AWS_REGION }}\n      gh_pkg_token: ${{ secrets.GH_PKG_TOKEN }}\n",
        );

        handle_update(&mock, "codespark", None, "main").await.unwrap();

        assert!(mock.was_pr_created_for("api"));
        assert!(mock.branch_exists("api", &migration_branch_name("api")));
    }
}
