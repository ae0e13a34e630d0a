use crate::demo::{run_demo, run_listing_search, DemoArgs, ListingSearchArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tradirise::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "TradiRise Listings",
    about = "Search and serve TradiRise marketplace listings from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Query a listing source set with the same filters the listing pages use
    Listings {
        #[command(subcommand)]
        command: ListingsCommand,
    },
    /// Walk through filter, search, and sort scenarios over the demo listings
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum ListingsCommand {
    /// Filter, search, and sort one listing kind
    Search(ListingSearchArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Directory holding <kind>.json or <kind>.csv source sets
    #[arg(long)]
    pub(crate) data_dir: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Listings {
            command: ListingsCommand::Search(args),
        } => run_listing_search(args),
        Command::Demo(args) => run_demo(args),
    }
}
