use clap::Parser;
use color_eyre::eyre::Result;
use tracing_subscriber::EnvFilter;

use tfmerge::cli::{Cli, Command};
use tfmerge::state::{detect_schema, parse_flat_state, parse_legacy_state, StateSchema};
use tfmerge::{merge, output, AddressingMode, MultiInstancePolicy, ReleaseClient, TerraformCli};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Merge(args) => {
            let config = args.into_config();
            let tf = TerraformCli::new(
                config.terraform_bin.clone(),
                config.working_dir.clone(),
                config.timeout,
            );

            let report = merge::reconcile(&config, &tf).await?;

            if config.dry_run {
                println!("{}", output::plan_table(&report.plan));
            } else {
                merge::finalize(&config, &tf).await?;
            }

            tracing::info!(
                moved = report.moved,
                skipped = report.skipped,
                rewritten = report.rewritten,
                "merge complete"
            );
        }
        Command::Inspect(args) => {
            let mode = if args.by_id {
                AddressingMode::ById
            } else {
                AddressingMode::ByName
            };
            let resources = match detect_schema(&args.state)? {
                StateSchema::Legacy => parse_legacy_state(&args.state)?,
                StateSchema::Flat => {
                    parse_flat_state(&args.state, mode, MultiInstancePolicy::LastWins)?
                        .resources()
                        .to_vec()
                }
            };
            println!("{}", output::resource_table(&resources));
        }
        Command::Fetch(args) => {
            let client = ReleaseClient::new(args.token.clone())?;
            let release = client.get_release(&args.repo, args.tag.as_deref()).await?;

            if args.download {
                let dir = args.download_dir();
                let paths = client
                    .download_assets(&args.repo, &release.assets, &dir, args.concurrency)
                    .await?;
                for path in paths {
                    println!("{}", path.display());
                }
            } else {
                println!("{}", release.zipball_url);
                for asset in &release.assets {
                    println!("{}", asset.browser_download_url);
                }
            }
        }
    }

    Ok(())
}
