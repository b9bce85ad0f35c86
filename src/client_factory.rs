use crate::config::Config;
use crate::github::{GitHubClient, GitHubClientTrait};

/// Build the production GitHub client from an explicit configuration.
pub fn create_github_client(
    config: &Config,
) -> Result<Box<dyn GitHubClientTrait>, Box<dyn std::error::Error>> {
    let client = GitHubClient::new(config)?;
    Ok(Box::new(client))
}
