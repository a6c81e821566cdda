use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use packages_retention::config::{self, Config};
use packages_retention::logging;
use packages_retention::registry::GitHubRegistry;
use packages_retention::retention::{CandidateSelector, Deleter};

#[derive(Parser)]
#[command(name = "packages-retention")]
#[command(
    version,
    about = "Deletes outdated package versions from GitHub Packages",
    long_about = "Deletes outdated package versions from GitHub Packages.\n\n\
        Configuration is read from environment variables (optionally prefixed with INPUT_): \
        GITHUB_USER or GITHUB_ORGANIZATION, PACKAGE_TYPE, PACKAGE_NAME, GITHUB_TOKEN, \
        VERSION_NAME_TO_DELETE, DELETE_SNAPSHOTS, NUMBER_MAJOR_TO_KEEP, NUMBER_MINOR_TO_KEEP, \
        NUMBER_PATCH_TO_KEEP, DRY_RUN (default true), DEBUG_LOGS, REST_TIMEOUT, GITHUB_REST_API_URL."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print the deletion candidates as JSON without deleting anything
    Candidates,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logging::init(config::debug_logs_enabled());

    let config = Config::from_env().context("invalid configuration")?;

    let registry = Arc::new(
        GitHubRegistry::from_config(&config).context("failed to create GitHub client")?,
    );

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(async {
            match cli.command {
                None => {
                    info!("Start packages retention");
                    Deleter::new(registry)
                        .delete_versions(&config.package_name, &config.policy, config.dry_run)
                        .await?;
                    info!("Packages retention done");
                }
                Some(Command::Candidates) => {
                    let candidates = CandidateSelector::new(registry)
                        .determine_candidates(&config.package_name, &config.policy)
                        .await?;
                    println!("{}", serde_json::to_string_pretty(&candidates)?);
                }
            }
            Ok::<(), anyhow::Error>(())
        })
}
