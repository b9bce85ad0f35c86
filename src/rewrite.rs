use regex::{NoExpand, Regex};

/// Reference that marks a workflow as still using the legacy ECR push job.
/// Matched unanchored, anywhere in the file.
pub const LEGACY_REFERENCE_PATTERN: &str =
    r"LearnWithHomer/infrastructure-public/\.github/workflows/build-and-push-image-to-ecr\.yml@main";

/// The credentials-based `build-and-push-image` job block. Compiled with
/// `(?ms)` so `^`/`$` are per-line and `.` crosses newlines, matching the
/// substitution semantics the migration was written against.
pub const LEGACY_JOB_PATTERN: &str = r"(?ms)build-and-push-image:\s*
    uses:\s*LearnWithHomer/infrastructure-public/\.github/workflows/build-and-push-image-to-ecr\.yml@main\s*
    secrets:\s*
      ecr_repo:\s*\$\{\{\s*secrets\.ECR_REPOSITORY\s*\}\}\s*
      access_key_id:\s*\$\{\{\s*secrets\.CODESPARK_AWS_ACCESS_KEY_ID\s*\}\}\s*
      secret_access_key:\s*\$\{\{\s*secrets\.CODESPARK_AWS_SECRET_ACCESS_KEY\s*\}\}\s*
      aws_region:\s*\$\{\{\s*secrets\.CODESPARK_AWS_REGION\s*\}\}\s*
      gh_pkg_token:\s*\$\{\{\s*secrets\.GH_PKG_TOKEN\s*\}\}";

/// The OIDC replacement job: role assumption via `role_arn`, static AWS
/// credentials dropped from the secret set.
pub const OIDC_JOB_REPLACEMENT: &str = r"build-and-push-image:
    uses: LearnWithHomer/infrastructure-public/.github/workflows/build-and-push-image-to-ecr.yml@workflows/ecr-oidc
    with:
      role_arn: arn:aws:iam::929871197119:role/gha-ecr-exec
    secrets:
      ecr_repo: ${{ secrets.ECR_REPOSITORY }}
      aws_region: ${{ secrets.CODESPARK_AWS_REGION }}
      gh_pkg_token: ${{ secrets.GH_PKG_TOKEN }}";

/// Compile the scan pattern used to find repositories that still reference
/// the legacy reusable workflow.
pub fn reference_pattern() -> Result<Regex, regex::Error> {
    Regex::new(LEGACY_REFERENCE_PATTERN)
}

/// Rewrites workflow content from the legacy credentials job to the OIDC job.
pub struct WorkflowRewrite {
    pattern: Regex,
}

impl WorkflowRewrite {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(LEGACY_JOB_PATTERN)?,
        })
    }

    /// Whether the content contains the legacy job block.
    pub fn is_match(&self, content: &str) -> bool {
        self.pattern.is_match(content)
    }

    /// Apply the rewrite. Returns `None` when the legacy job is absent, so
    /// callers can tell an untouched file from an updated one. Every
    /// non-overlapping occurrence is replaced. The replacement text contains
    /// `${{ ... }}` expressions and must never be expanded as capture groups,
    /// hence `NoExpand`.
    pub fn apply(&self, content: &str) -> Option<String> {
        if !self.pattern.is_match(content) {
            return None;
        }
        Some(
            self.pattern
                .replace_all(content, NoExpand(OIDC_JOB_REPLACEMENT))
                .into_owned(),
        )
    }
}
