use clap::Parser;

use oidc_migrate::cli::{Cli, Commands};
use oidc_migrate::client_factory;
use oidc_migrate::commands;
use oidc_migrate::config::Config;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(&cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    // The token is resolved before any network call; a missing token stops
    // the run here.
    let config = Config::from_env()?;
    let client = client_factory::create_github_client(&config)?;

    match &cli.command {
        Commands::Scan { org, json } => commands::scan::handle_scan(client.as_ref(), org, *json).await,
        Commands::Update {
            org,
            repo,
            base_branch,
        } => commands::update::handle_update(client.as_ref(), org, repo.as_deref(), base_branch).await,
    }
}
