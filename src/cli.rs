use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "oidc-migrate")]
#[command(about = "Migrate GitHub workflow files from static AWS credentials to OIDC")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List repositories whose workflows still use the legacy ECR push job
    Scan {
        /// GitHub organization name
        #[arg(long)]
        org: String,
        /// Print the report as JSON instead of the plain listing
        #[arg(long)]
        json: bool,
    },
    /// Rewrite matching workflows to OIDC and open a pull request per repository
    Update {
        /// GitHub organization name
        #[arg(long)]
        org: String,
        /// Restrict the update to a single repository
        #[arg(long)]
        repo: Option<String>,
        /// Branch to base migration branches and pull requests on
        #[arg(long, default_value = "main")]
        base_branch: String,
    },
}
