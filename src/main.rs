use clap::Parser;
use colored::Colorize;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cli;
mod kube;

fn init_tracing(verbose: bool) {
    let filter = match verbose {
        true => EnvFilter::new("jobify=debug"),
        false => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    init_tracing(cli.verbose);

    // Initialize the kube handler
    let kube_handler = match kube::KubeHandler::new(cli.namespace.as_deref()).await {
        Ok(handler) => handler,
        Err(err) => {
            println!(
                "Unable to create a kubernetes client: {}",
                err.to_string().red()
            );
            return ExitCode::FAILURE;
        }
    };

    // Run the command
    if let Err(err) = cli.run(&kube_handler).await {
        tracing::debug!(error = ?err, "command failed");
        println!("{}", format!("{err:#}").red());
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
