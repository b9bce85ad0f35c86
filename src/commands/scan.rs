use crate::github::GitHubClientTrait;
use crate::report::ScanReport;
use crate::rewrite;
use crate::scanner;

/// Scan every repository in the organization and fold the matches into a
/// report. A repository that cannot be scanned is reported on stdout and
/// skipped; the run continues.
pub async fn scan_organization(
    client: &dyn GitHubClientTrait,
    org: &str,
) -> Result<ScanReport, Box<dyn std::error::Error>> {
    let pattern = rewrite::reference_pattern()?;
    let mut report = ScanReport::new();

    for repo in client.list_repositories(org).await? {
        match scanner::scan_repository(client, org, &repo.name, &pattern, None).await {
            Ok(files) => report.record(&repo.name, files),
            Err(e) => println!("Error processing {}: {}", repo.name, e),
        }
    }

    Ok(report)
}

pub async fn handle_scan(
    client: &dyn GitHubClientTrait,
    org: &str,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let Some(org_info) = super::resolve_organization(client, org).await else {
        return Ok(());
    };

    let report = scan_organization(client, &org_info.login).await?;

    if json {
        println!("{}", report.to_json()?);
    } else {
        print!("{}", report.render());
    }
    Ok(())
}
