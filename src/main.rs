use clap::Parser;
use log::*;
use std::{process, sync::Arc};

use pigcel_release::{
    Result,
    cli::{self, Command},
    command::{package, publish},
    config::Config,
    error::exit_code_for,
    forge::{gh::GhCli, manager::ForgeManager},
    logging::initialize_logger,
    runner::SystemRunner,
};

async fn run(args: cli::Args) -> Result<()> {
    let config = Config::load(args.config.as_deref()).await?;
    let runner = Arc::new(SystemRunner);

    match &args.command {
        Command::Package(package_args) => {
            let req = package_args.to_request(args.dry_run);
            package::execute(&*runner, &config, &req).await?;
        }
        Command::Publish(publish_args) => {
            let remote = publish_args.remote_config(args.dry_run)?;
            let forge = GhCli::new(remote, &config.release, runner);
            let forge_manager = ForgeManager::new(Box::new(forge));
            publish::execute(&forge_manager, &publish_args.to_request())
                .await?;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli_args = cli::Args::parse();

    initialize_logger(cli_args.debug)?;

    if let Err(err) = run(cli_args).await {
        error!("{err:?}");
        process::exit(exit_code_for(&err));
    }

    Ok(())
}
