use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

use commands::run::Until;

#[derive(Parser)]
#[command(name = "scriba")]
#[command(about = "Scriba CLI - staged research proposal drafting", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Draft a title, concept paper and proposal from a research idea
    Run {
        /// The research idea; read from stdin when omitted
        #[arg(long)]
        idea: Option<String>,

        /// Title candidate index to select instead of the first one
        #[arg(long)]
        select: Option<usize>,

        /// Stop after this stage
        #[arg(long, value_enum, default_value = "proposal")]
        until: Until,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Artifacts go to stdout; diagnostics stay on stderr.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            idea,
            select,
            until,
        } => commands::run::execute(idea, select, until).await?,
    }

    Ok(())
}
