use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use crate::github::{DirEntry, GitHubClientTrait, OrgInfo, PullRequestInfo, RemoteFile, RepoInfo};

/// Branch the mock treats as a repository's default when no ref is given.
const DEFAULT_BRANCH: &str = "main";

/// A file stored by the mock: content plus the blob sha handed out as the
/// concurrency token.
#[derive(Debug, Clone)]
struct MockFile {
    content: String,
    sha: String,
}

/// A pull request recorded by the mock, with the branches it spans.
#[derive(Debug, Clone)]
pub struct CreatedPr {
    pub info: PullRequestInfo,
    pub head: String,
    pub base: String,
    pub body: String,
}

/// Mock GitHub client for testing that stores the remote state in memory
#[derive(Debug, Clone, Default)]
pub struct MockGitHubClient {
    /// Organizations and their repositories, in enumeration order
    org_repos: Arc<Mutex<HashMap<String, Vec<String>>>>,
    /// Branch heads: repo -> branch -> commit sha
    branches: Arc<Mutex<HashMap<String, HashMap<String, String>>>>,
    /// File trees: (repo, branch) -> ordered (path, file). A missing key
    /// means the tree has no listable directory at that ref (remote 404).
    files: Arc<Mutex<HashMap<(String, String), Vec<(String, MockFile)>>>>,
    /// Created pull requests, keyed by repository
    created_prs: Arc<Mutex<HashMap<String, CreatedPr>>>,
    /// Log of successful file updates: (repo, path, branch)
    file_updates: Arc<Mutex<Vec<(String, String, String)>>>,
    /// (repo, path) pairs whose update should fail with a conflict
    update_conflicts: Arc<Mutex<HashSet<(String, String)>>>,
    /// Repositories whose pull request creation should fail
    pr_failures: Arc<Mutex<HashSet<String>>>,
    /// Counter for generating PR numbers
    next_pr_number: Arc<Mutex<u64>>,
    /// Counter for generating blob shas
    next_blob_sha: Arc<Mutex<u64>>,
}

impl MockGitHubClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an organization with no repositories.
    pub fn add_org(&self, org: &str) {
        self.org_repos
            .lock()
            .unwrap()
            .entry(org.to_string())
            .or_default();
    }

    /// Register a repository under an organization. The repository gets a
    /// default branch but no workflows directory.
    pub fn add_repo(&self, org: &str, repo: &str) {
        self.org_repos
            .lock()
            .unwrap()
            .entry(org.to_string())
            .or_default()
            .push(repo.to_string());

        self.branches
            .lock()
            .unwrap()
            .entry(repo.to_string())
            .or_default()
            .insert(DEFAULT_BRANCH.to_string(), format!("{}-{}-head", repo, DEFAULT_BRANCH));
    }

    /// Give a repository an empty `.github/workflows` directory on its
    /// default branch.
    pub fn add_workflows_dir(&self, repo: &str) {
        self.files
            .lock()
            .unwrap()
            .entry((repo.to_string(), DEFAULT_BRANCH.to_string()))
            .or_default();
    }

    /// Store a workflow file on the default branch, creating the directory
    /// if needed. `name` is the bare file name, e.g. `deploy.yml`.
    pub fn add_workflow_file(&self, repo: &str, name: &str, content: &str) {
        let sha = self.fresh_blob_sha();
        self.files
            .lock()
            .unwrap()
            .entry((repo.to_string(), DEFAULT_BRANCH.to_string()))
            .or_default()
            .push((
                format!(".github/workflows/{}", name),
                MockFile {
                    content: content.to_string(),
                    sha,
                },
            ));
    }

    /// Make the next update of (repo, path) fail with a conflict, as if the
    /// file were edited concurrently.
    pub fn fail_update(&self, repo: &str, path: &str) {
        self.update_conflicts
            .lock()
            .unwrap()
            .insert((repo.to_string(), path.to_string()));
    }

    /// Make pull request creation fail for a repository.
    pub fn fail_pull_request(&self, repo: &str) {
        self.pr_failures.lock().unwrap().insert(repo.to_string());
    }

    /// Check if a branch exists in a repository.
    pub fn branch_exists(&self, repo: &str, branch: &str) -> bool {
        self.branches
            .lock()
            .unwrap()
            .get(repo)
            .is_some_and(|heads| heads.contains_key(branch))
    }

    /// Current content of a file at a ref, if present.
    pub fn file_content(&self, repo: &str, branch: &str, path: &str) -> Option<String> {
        self.files
            .lock()
            .unwrap()
            .get(&(repo.to_string(), branch.to_string()))
            .and_then(|entries| {
                entries
                    .iter()
                    .find(|(entry_path, _)| entry_path == path)
                    .map(|(_, file)| file.content.clone())
            })
    }

    /// All created PRs for testing verification
    pub fn created_prs(&self) -> HashMap<String, CreatedPr> {
        self.created_prs.lock().unwrap().clone()
    }

    /// Check if a PR was created for a specific repository.
    pub fn was_pr_created_for(&self, repo: &str) -> bool {
        self.created_prs.lock().unwrap().contains_key(repo)
    }

    /// Log of successful file updates: (repo, path, branch).
    pub fn file_updates(&self) -> Vec<(String, String, String)> {
        self.file_updates.lock().unwrap().clone()
    }

    fn fresh_blob_sha(&self) -> String {
        let mut counter = self.next_blob_sha.lock().unwrap();
        *counter += 1;
        format!("blob-{}", *counter)
    }
}

#[async_trait]
impl GitHubClientTrait for MockGitHubClient {
    async fn get_organization(&self, org: &str) -> Result<OrgInfo, Box<dyn std::error::Error>> {
        if self.org_repos.lock().unwrap().contains_key(org) {
            Ok(OrgInfo {
                login: org.to_string(),
            })
        } else {
            Err(format!("404 Not Found: organization {}", org).into())
        }
    }

    async fn list_repositories(
        &self,
        org: &str,
    ) -> Result<Vec<RepoInfo>, Box<dyn std::error::Error>> {
        let org_repos = self.org_repos.lock().unwrap();
        let names = org_repos
            .get(org)
            .ok_or_else(|| format!("404 Not Found: organization {}", org))?;

        Ok(names
            .iter()
            .map(|name| RepoInfo { name: name.clone() })
            .collect())
    }

    async fn get_repository(
        &self,
        org: &str,
        name: &str,
    ) -> Result<RepoInfo, Box<dyn std::error::Error>> {
        let org_repos = self.org_repos.lock().unwrap();
        let known = org_repos
            .get(org)
            .is_some_and(|names| names.iter().any(|candidate| candidate == name));

        if known {
            Ok(RepoInfo {
                name: name.to_string(),
            })
        } else {
            Err(format!("404 Not Found: repository {}/{}", org, name).into())
        }
    }

    async fn list_directory(
        &self,
        _org: &str,
        repo: &str,
        path: &str,
        reference: Option<&str>,
    ) -> Result<Vec<DirEntry>, Box<dyn std::error::Error>> {
        let branch = reference.unwrap_or(DEFAULT_BRANCH);
        let files = self.files.lock().unwrap();
        let entries = files
            .get(&(repo.to_string(), branch.to_string()))
            .ok_or_else(|| format!("404 Not Found: {} in {}@{}", path, repo, branch))?;

        let prefix = format!("{}/", path);
        Ok(entries
            .iter()
            .filter(|(entry_path, _)| entry_path.starts_with(&prefix))
            .map(|(entry_path, _)| DirEntry {
                name: entry_path
                    .rsplit('/')
                    .next()
                    .unwrap_or(entry_path)
                    .to_string(),
                path: entry_path.clone(),
            })
            .collect())
    }

    async fn get_file(
        &self,
        _org: &str,
        repo: &str,
        path: &str,
        reference: Option<&str>,
    ) -> Result<RemoteFile, Box<dyn std::error::Error>> {
        let branch = reference.unwrap_or(DEFAULT_BRANCH);
        let files = self.files.lock().unwrap();
        let entries = files
            .get(&(repo.to_string(), branch.to_string()))
            .ok_or_else(|| format!("404 Not Found: {} in {}@{}", path, repo, branch))?;

        entries
            .iter()
            .find(|(entry_path, _)| entry_path == path)
            .map(|(entry_path, file)| RemoteFile {
                path: entry_path.clone(),
                content: file.content.clone(),
                sha: file.sha.clone(),
            })
            .ok_or_else(|| format!("404 Not Found: {} in {}@{}", path, repo, branch).into())
    }

    async fn branch_head_sha(
        &self,
        _org: &str,
        repo: &str,
        branch: &str,
    ) -> Result<String, Box<dyn std::error::Error>> {
        self.branches
            .lock()
            .unwrap()
            .get(repo)
            .and_then(|heads| heads.get(branch).cloned())
            .ok_or_else(|| format!("404 Not Found: no branch {} in {}", branch, repo).into())
    }

    async fn create_branch(
        &self,
        _org: &str,
        repo: &str,
        branch: &str,
        sha: &str,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let mut branches = self.branches.lock().unwrap();
        let heads = branches
            .get_mut(repo)
            .ok_or_else(|| format!("404 Not Found: repository {}", repo))?;

        if heads.contains_key(branch) {
            return Err("422 Unprocessable Entity: Reference already exists".into());
        }

        // The new ref points at an existing head; the new branch sees that
        // branch's tree.
        let source = heads
            .iter()
            .find(|(_, head_sha)| head_sha.as_str() == sha)
            .map(|(name, _)| name.clone())
            .ok_or_else(|| format!("422 Unprocessable Entity: unknown sha {}", sha))?;

        heads.insert(branch.to_string(), sha.to_string());

        let mut files = self.files.lock().unwrap();
        if let Some(tree) = files.get(&(repo.to_string(), source)).cloned() {
            files.insert((repo.to_string(), branch.to_string()), tree);
        }

        Ok(())
    }

    async fn update_file(
        &self,
        _org: &str,
        repo: &str,
        path: &str,
        _message: &str,
        content: &str,
        sha: &str,
        branch: &str,
    ) -> Result<(), Box<dyn std::error::Error>> {
        if self
            .update_conflicts
            .lock()
            .unwrap()
            .remove(&(repo.to_string(), path.to_string()))
        {
            return Err(format!("409 Conflict: {} was modified concurrently", path).into());
        }

        let new_sha = self.fresh_blob_sha();
        let mut files = self.files.lock().unwrap();
        let entries = files
            .get_mut(&(repo.to_string(), branch.to_string()))
            .ok_or_else(|| format!("404 Not Found: {} in {}@{}", path, repo, branch))?;
        let (_, file) = entries
            .iter_mut()
            .find(|(entry_path, _)| entry_path == path)
            .ok_or_else(|| format!("404 Not Found: {} in {}@{}", path, repo, branch))?;

        if file.sha != sha {
            return Err(format!("409 Conflict: {} does not match {}", sha, file.sha).into());
        }

        file.content = content.to_string();
        file.sha = new_sha;

        self.file_updates.lock().unwrap().push((
            repo.to_string(),
            path.to_string(),
            branch.to_string(),
        ));

        Ok(())
    }

    async fn create_pull_request(
        &self,
        org: &str,
        repo: &str,
        title: &str,
        body: &str,
        head: &str,
        base: &str,
    ) -> Result<PullRequestInfo, Box<dyn std::error::Error>> {
        if self.pr_failures.lock().unwrap().contains(repo) {
            return Err(format!(
                "422 Validation Failed: a pull request already exists for {}",
                repo
            )
            .into());
        }

        let number = {
            let mut counter = self.next_pr_number.lock().unwrap();
            *counter += 1;
            *counter
        };

        let info = PullRequestInfo {
            number,
            url: format!("https://github.com/{}/{}/pull/{}", org, repo, number),
            title: title.to_string(),
        };

        self.created_prs.lock().unwrap().insert(
            repo.to_string(),
            CreatedPr {
                info: info.clone(),
                head: head.to_string(),
                base: base.to_string(),
                body: body.to_string(),
            },
        );

        Ok(info)
    }
}
