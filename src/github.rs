use async_trait::async_trait;
use octocrab::Octocrab;
use octocrab::models::repos::Object;
use octocrab::params::repos::Reference;
use serde::Serialize;

use crate::config::Config;

/// Resolved organization handle.
#[derive(Debug, Clone)]
pub struct OrgInfo {
    pub login: String,
}

/// A repository as seen by the enumerator. Only the name is carried; the
/// remote owns everything else.
#[derive(Debug, Clone)]
pub struct RepoInfo {
    pub name: String,
}

/// One entry of a remote directory listing, in the order the API returned it.
#[derive(Debug, Clone)]
pub struct DirEntry {
    pub name: String,
    pub path: String,
}

/// A fetched file: decoded text plus the blob sha that serves as the
/// optimistic-concurrency token for conditional updates.
#[derive(Debug, Clone)]
pub struct RemoteFile {
    pub path: String,
    pub content: String,
    pub sha: String,
}

/// Information about a created pull request.
#[derive(Debug, Clone, Serialize)]
pub struct PullRequestInfo {
    pub number: u64,
    pub url: String,
    pub title: String,
}

/// Trait for GitHub API operations to enable dependency injection and mocking
#[async_trait]
pub trait GitHubClientTrait {
    /// Resolve an organization handle, or fail with an access error.
    async fn get_organization(&self, org: &str) -> Result<OrgInfo, Box<dyn std::error::Error>>;

    /// Enumerate every repository visible to the organization, fully paginated.
    async fn list_repositories(&self, org: &str)
    -> Result<Vec<RepoInfo>, Box<dyn std::error::Error>>;

    /// Look up a single repository by name.
    async fn get_repository(
        &self,
        org: &str,
        name: &str,
    ) -> Result<RepoInfo, Box<dyn std::error::Error>>;

    /// List a directory at an optional ref. Listing order is the remote's.
    async fn list_directory(
        &self,
        org: &str,
        repo: &str,
        path: &str,
        reference: Option<&str>,
    ) -> Result<Vec<DirEntry>, Box<dyn std::error::Error>>;

    /// Fetch one file, decoded, at an optional ref.
    async fn get_file(
        &self,
        org: &str,
        repo: &str,
        path: &str,
        reference: Option<&str>,
    ) -> Result<RemoteFile, Box<dyn std::error::Error>>;

    /// Tip commit sha of a branch.
    async fn branch_head_sha(
        &self,
        org: &str,
        repo: &str,
        branch: &str,
    ) -> Result<String, Box<dyn std::error::Error>>;

    /// Create `refs/heads/<branch>` at the given commit. Fails if the ref
    /// already exists.
    async fn create_branch(
        &self,
        org: &str,
        repo: &str,
        branch: &str,
        sha: &str,
    ) -> Result<(), Box<dyn std::error::Error>>;

    /// Commit new content to a file on a branch, conditioned on the prior
    /// blob sha. A sha mismatch means a concurrent edit and is an error.
    async fn update_file(
        &self,
        org: &str,
        repo: &str,
        path: &str,
        message: &str,
        content: &str,
        sha: &str,
        branch: &str,
    ) -> Result<(), Box<dyn std::error::Error>>;

    /// Open a pull request from `head` into `base`.
    async fn create_pull_request(
        &self,
        org: &str,
        repo: &str,
        title: &str,
        body: &str,
        head: &str,
        base: &str,
    ) -> Result<PullRequestInfo, Box<dyn std::error::Error>>;
}

/// GitHub API client wrapper
pub struct GitHubClient {
    octocrab: Octocrab,
}

impl GitHubClient {
    /// Create a client from the resolved configuration.
    pub fn new(config: &Config) -> Result<Self, Box<dyn std::error::Error>> {
        let octocrab = match &config.api_base {
            // A `Url` renders with a trailing slash; octocrab wants the bare
            // authority, e.g. `http://127.0.0.1:8080`.
            Some(base) => Octocrab::builder()
                .personal_token(config.token.clone())
                .base_uri(base.as_str().trim_end_matches('/'))?
                .build()?,
            None => Octocrab::builder()
                .personal_token(config.token.clone())
                .build()?,
        };

        Ok(Self { octocrab })
    }

    async fn content_items(
        &self,
        org: &str,
        repo: &str,
        path: &str,
        reference: Option<&str>,
    ) -> Result<octocrab::models::repos::ContentItems, octocrab::Error> {
        let handler = self.octocrab.repos(org, repo);
        let mut request = handler.get_content().path(path);
        if let Some(reference) = reference {
            request = request.r#ref(reference);
        }
        request.send().await
    }
}

#[async_trait]
impl GitHubClientTrait for GitHubClient {
    async fn get_organization(&self, org: &str) -> Result<OrgInfo, Box<dyn std::error::Error>> {
        let organization = self.octocrab.orgs(org).get().await?;
        Ok(OrgInfo {
            login: organization.login,
        })
    }

    async fn list_repositories(
        &self,
        org: &str,
    ) -> Result<Vec<RepoInfo>, Box<dyn std::error::Error>> {
        let page = self
            .octocrab
            .orgs(org)
            .list_repos()
            .per_page(100)
            .send()
            .await?;
        let repositories = self.octocrab.all_pages(page).await?;

        Ok(repositories
            .into_iter()
            .map(|repository| RepoInfo {
                name: repository.name,
            })
            .collect())
    }

    async fn get_repository(
        &self,
        org: &str,
        name: &str,
    ) -> Result<RepoInfo, Box<dyn std::error::Error>> {
        let repository = self.octocrab.repos(org, name).get().await?;
        Ok(RepoInfo {
            name: repository.name,
        })
    }

    async fn list_directory(
        &self,
        org: &str,
        repo: &str,
        path: &str,
        reference: Option<&str>,
    ) -> Result<Vec<DirEntry>, Box<dyn std::error::Error>> {
        let contents = self.content_items(org, repo, path, reference).await?;

        Ok(contents
            .items
            .into_iter()
            .map(|content| DirEntry {
                name: content.name,
                path: content.path,
            })
            .collect())
    }

    async fn get_file(
        &self,
        org: &str,
        repo: &str,
        path: &str,
        reference: Option<&str>,
    ) -> Result<RemoteFile, Box<dyn std::error::Error>> {
        let contents = self.content_items(org, repo, path, reference).await?;
        let file = contents
            .items
            .into_iter()
            .next()
            .ok_or_else(|| format!("no content returned for {}/{}/{}", org, repo, path))?;

        let sha = file.sha.clone();
        let content = file
            .decoded_content()
            .ok_or_else(|| format!("could not decode content of {}/{}/{}", org, repo, path))?;

        Ok(RemoteFile {
            path: file.path,
            content,
            sha,
        })
    }

    async fn branch_head_sha(
        &self,
        org: &str,
        repo: &str,
        branch: &str,
    ) -> Result<String, Box<dyn std::error::Error>> {
        let reference = self
            .octocrab
            .repos(org, repo)
            .get_ref(&Reference::Branch(branch.to_string()))
            .await?;

        match reference.object {
            Object::Commit { sha, .. } => Ok(sha),
            Object::Tag { sha, .. } => Ok(sha),
            _ => Err(format!("unexpected object type for {}/{}@{}", org, repo, branch).into()),
        }
    }

    async fn create_branch(
        &self,
        org: &str,
        repo: &str,
        branch: &str,
        sha: &str,
    ) -> Result<(), Box<dyn std::error::Error>> {
        self.octocrab
            .repos(org, repo)
            .create_ref(&Reference::Branch(branch.to_string()), sha)
            .await?;
        Ok(())
    }

    async fn update_file(
        &self,
        org: &str,
        repo: &str,
        path: &str,
        message: &str,
        content: &str,
        sha: &str,
        branch: &str,
    ) -> Result<(), Box<dyn std::error::Error>> {
        self.octocrab
            .repos(org, repo)
            .update_file(path, message, content, sha)
            .branch(branch)
            .send()
            .await?;
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
        let pr = self
            .octocrab
            .pulls(org, repo)
            .create(title, head, base)
            .body(body)
            .send()
            .await?;

        Ok(PullRequestInfo {
            number: pr.number,
            url: pr.html_url.map(|u| u.to_string()).unwrap_or_default(),
            title: pr.title.unwrap_or_default(),
        })
    }
}
