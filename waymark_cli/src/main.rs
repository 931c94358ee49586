use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;

use crate::{groups::GroupsArgs, navigate::NavigateArgs, route::RouteArgs};

mod directions;
mod file_utils;
mod groups;
mod navigate;
mod parsers;
mod route;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show how the waypoints are split into directions requests
    #[command(visible_alias = "g")]
    Groups {
        #[command(flatten)]
        args: GroupsArgs,
    },
    /// Route every group and print the compiled route
    #[command(visible_alias = "r")]
    Route {
        #[command(flatten)]
        args: RouteArgs,
    },
    /// Embed a simulated navigation session and stream its events
    #[command(visible_alias = "n")]
    Navigate {
        #[command(flatten)]
        args: NavigateArgs,
    },
    /// Print the JSON schema of the navigation props
    Schema,
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenvy::from_filename("./.env.local").ok();

    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(Commands::Groups { args }) => groups::run(args)?,
        Some(Commands::Route { args }) => route::run(args).await?,
        Some(Commands::Navigate { args }) => navigate::run(args).await?,
        Some(Commands::Schema) => {
            let schema = schemars::schema_for!(waymark_navigation::view::NavigationProps);
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
        None => {}
    }

    Ok(())
}
