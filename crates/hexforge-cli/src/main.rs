mod cmd;
mod output;
mod prompt;
mod root;

use anyhow::Context;
use clap::{Parser, Subcommand};
use cmd::{
    attach::AttachArgs, handler::HandlerArgs, outbound::OutboundArgs,
    repository::RepositoryArgs, usecase::UsecaseArgs,
};
use hexforge_core::project::Project;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "hexforge",
    about = "Grow a hexagonal Go backend one operation at a time, without regenerating files",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: nearest directory with a go.mod)
    #[arg(long, global = true, env = "HEXFORGE_ROOT")]
    root: Option<PathBuf>,

    /// Output the report as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    /// Write files without running gofmt
    #[arg(long, global = true)]
    no_format: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add an operation to a use-case port and wire the package
    CreateUsecase(UsecaseArgs),

    /// Expose a use-case operation over HTTP, or create a bare handler
    CreateHandler(HandlerArgs),

    /// Add an operation to a Postgres repository
    CreateRepository(RepositoryArgs),

    /// Create an outbound adapter, optionally with an operation
    CreateOutbound(OutboundArgs),

    /// Make a use case depend on a repository operation
    AddRepoToUsecase(AttachArgs),
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());
    let result = Project::open(&root, cli.no_format)
        .with_context(|| format!("cannot open project at {}", root.display()))
        .and_then(|project| match cli.command {
            Commands::CreateUsecase(args) => cmd::usecase::run(&project, args, cli.json),
            Commands::CreateHandler(args) => cmd::handler::run(&project, args, cli.json),
            Commands::CreateRepository(args) => cmd::repository::run(&project, args, cli.json),
            Commands::CreateOutbound(args) => cmd::outbound::run(&project, args, cli.json),
            Commands::AddRepoToUsecase(args) => cmd::attach::run(&project, args, cli.json),
        });

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
