/// Branch naming for workflow migration branches

/// Prefix shared by every migration branch.
pub const MIGRATION_BRANCH_PREFIX: &str = "update-workflow-oidc-";

/// Generate the migration branch name for a repository.
/// The name is deterministic per repository, not per run: rerunning against
/// an already-migrated repository collides with the existing branch, and the
/// updater treats that collision as a skip.
pub fn migration_branch_name(repo: &str) -> String {
    format!("{}{}", MIGRATION_BRANCH_PREFIX, repo)
}

/// Check if a branch name was produced by `migration_branch_name`.
pub fn is_migration_branch(branch_name: &str) -> bool {
    branch_name
        .strip_prefix(MIGRATION_BRANCH_PREFIX)
        .is_some_and(|rest| !rest.is_empty())
}
