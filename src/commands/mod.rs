pub mod scan;
pub mod update;

use crate::github::{GitHubClientTrait, OrgInfo};

/// Resolve the organization handle. An access failure is printed and answered
/// with `None`; the caller then returns cleanly without touching any
/// repository.
pub async fn resolve_organization(client: &dyn GitHubClientTrait, org: &str) -> Option<OrgInfo> {
    match client.get_organization(org).await {
        Ok(info) => Some(info),
        Err(e) => {
            println!("Error accessing organization {}: {}", org, e);
            None
        }
    }
}
