use predicates::prelude::*;

use test_utils::{LEGACY_WORKFLOW, MIGRATED_WORKFLOW, MockGitHub, PLAIN_CI_WORKFLOW, oidc_migrate_cmd};

const MAIN_SHA: &str = "aa218f56b14c9653891f9e74264a383fa43fefbd";
const PR_TITLE: &str = "Update build-and-push-image job to use OIDC";

/// Full pipeline: branch from main's tip, rewrite the matching file on the
/// branch with the fetched sha as concurrency token, open one PR with the
/// fixed title. The mock asserts the exact rewritten content that is
/// committed.
#[tokio::test(flavor = "multi_thread")]
async fn test_update_rewrites_file_and_opens_pr() {
    let branch = "update-workflow-oidc-repo-a";

    let gh = MockGitHub::start("codespark").await;
    gh.mock_repo_list(&["repo-a"]).await;
    gh.mock_branch_head("repo-a", "main", MAIN_SHA).await;
    gh.mock_create_ref("repo-a", branch, MAIN_SHA).await;
    gh.mock_workflows_listing(
        "repo-a",
        &[
            (".github/workflows/deploy.yml", "sha-a1"),
            (".github/workflows/ci.yml", "sha-a2"),
        ],
        Some(branch),
    )
    .await;
    gh.mock_file(
        "repo-a",
        ".github/workflows/deploy.yml",
        LEGACY_WORKFLOW,
        "sha-a1",
        Some(branch),
    )
    .await;
    gh.mock_file(
        "repo-a",
        ".github/workflows/ci.yml",
        PLAIN_CI_WORKFLOW,
        "sha-a2",
        Some(branch),
    )
    .await;
    gh.mock_update_file(
        "repo-a",
        ".github/workflows/deploy.yml",
        PR_TITLE,
        MIGRATED_WORKFLOW,
        "sha-a1",
        branch,
    )
    .await;
    // The non-matching file is left alone.
    gh.expect_no_update("repo-a", ".github/workflows/ci.yml").await;
    gh.mock_create_pr("repo-a", 7, PR_TITLE, branch, "main").await;

    oidc_migrate_cmd(&gh)
        .args(["update", "--org", "codespark"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Updated repo-a/.github/workflows/deploy.yml",
        ))
        .stdout(predicate::str::contains(
            "Created PR: https://github.com/codespark/repo-a/pull/7",
        ))
        .stdout(predicate::str::contains("Update process completed."))
        .stdout(predicate::str::contains("1 pull requests opened"));
}

/// Rerunning against an already-migrated repository collides with the
/// deterministic branch name. That is a logged skip, not a crash, and no
/// pull request is opened.
#[tokio::test(flavor = "multi_thread")]
async fn test_rerun_branch_collision_is_skipped() {
    let gh = MockGitHub::start("codespark").await;
    gh.mock_repo_list(&["repo-a"]).await;
    gh.mock_branch_head("repo-a", "main", MAIN_SHA).await;
    gh.mock_create_ref_conflict("repo-a").await;
    gh.expect_no_pr("repo-a").await;

    oidc_migrate_cmd(&gh)
        .args(["update", "--org", "codespark"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Error creating branch in repo-a"))
        .stdout(predicate::str::contains("1 skipped"));
}

/// With no matching workflow on the branch, the branch is created but no
/// commit or PR happens.
#[tokio::test(flavor = "multi_thread")]
async fn test_update_without_matches_reports_no_changes() {
    let branch = "update-workflow-oidc-repo-a";

    let gh = MockGitHub::start("codespark").await;
    gh.mock_repo_list(&["repo-a"]).await;
    gh.mock_branch_head("repo-a", "main", MAIN_SHA).await;
    gh.mock_create_ref("repo-a", branch, MAIN_SHA).await;
    gh.mock_workflows_listing("repo-a", &[(".github/workflows/ci.yml", "sha-a1")], Some(branch))
        .await;
    gh.mock_file(
        "repo-a",
        ".github/workflows/ci.yml",
        PLAIN_CI_WORKFLOW,
        "sha-a1",
        Some(branch),
    )
    .await;
    gh.expect_no_update("repo-a", ".github/workflows/ci.yml").await;
    gh.expect_no_pr("repo-a").await;

    oidc_migrate_cmd(&gh)
        .args(["update", "--org", "codespark"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No changes needed in repo-a"))
        .stdout(predicate::str::contains("1 unchanged"));
}

/// `--repo` restricts the run to the named repository: the organization's
/// repository enumeration endpoint is never called.
#[tokio::test(flavor = "multi_thread")]
async fn test_only_repo_restricts_enumeration() {
    let branch = "update-workflow-oidc-api";

    let gh = MockGitHub::start("codespark").await;
    gh.expect_no_repo_list().await;
    gh.mock_repo("api").await;
    gh.mock_branch_head("api", "main", MAIN_SHA).await;
    gh.mock_create_ref("api", branch, MAIN_SHA).await;
    gh.mock_workflows_listing("api", &[(".github/workflows/deploy.yml", "sha-a1")], Some(branch))
        .await;
    gh.mock_file(
        "api",
        ".github/workflows/deploy.yml",
        LEGACY_WORKFLOW,
        "sha-a1",
        Some(branch),
    )
    .await;
    gh.mock_update_file(
        "api",
        ".github/workflows/deploy.yml",
        PR_TITLE,
        MIGRATED_WORKFLOW,
        "sha-a1",
        branch,
    )
    .await;
    gh.mock_create_pr("api", 3, PR_TITLE, branch, "main").await;

    oidc_migrate_cmd(&gh)
        .args(["update", "--org", "codespark", "--repo", "api"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created PR: https://github.com/codespark/api/pull/3"));
}

/// The base branch is a parameter: branches fork from its tip and the PR
/// targets it.
#[tokio::test(flavor = "multi_thread")]
async fn test_update_with_custom_base_branch() {
    let branch = "update-workflow-oidc-api";
    let develop_sha = "6dcb09b5b57875f334f61aebed695e2e4193db5e";

    let gh = MockGitHub::start("codespark").await;
    gh.expect_no_repo_list().await;
    gh.mock_repo("api").await;
    gh.mock_branch_head("api", "develop", develop_sha).await;
    gh.mock_create_ref("api", branch, develop_sha).await;
    gh.mock_workflows_listing("api", &[(".github/workflows/deploy.yml", "sha-a1")], Some(branch))
        .await;
    gh.mock_file(
        "api",
        ".github/workflows/deploy.yml",
        LEGACY_WORKFLOW,
        "sha-a1",
        Some(branch),
    )
    .await;
    gh.mock_update_file(
        "api",
        ".github/workflows/deploy.yml",
        PR_TITLE,
        MIGRATED_WORKFLOW,
        "sha-a1",
        branch,
    )
    .await;
    gh.mock_create_pr("api", 4, PR_TITLE, branch, "develop").await;

    oidc_migrate_cmd(&gh)
        .args([
            "update",
            "--org",
            "codespark",
            "--repo",
            "api",
            "--base-branch",
            "develop",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created PR:"));
}
