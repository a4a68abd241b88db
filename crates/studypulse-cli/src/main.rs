//! The `studypulse` command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::DataArgs;

#[derive(Parser)]
#[command(name = "studypulse", version, about = "Learning-progress aggregation")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Full progress snapshot for one student
    Student {
        /// Student id
        #[arg(long)]
        id: String,

        #[command(flatten)]
        data: DataArgs,
    },

    /// Roster progress for one class
    Class {
        /// Class id
        #[arg(long)]
        id: String,

        #[command(flatten)]
        data: DataArgs,
    },

    /// Per-content detail for one student and topic
    Topic {
        /// Student id
        #[arg(long)]
        student: String,

        /// Topic id
        #[arg(long)]
        topic: String,

        #[command(flatten)]
        data: DataArgs,
    },

    /// Check a dataset for dangling references and bad scores
    Validate {
        /// Path to the JSON dataset
        #[arg(long)]
        dataset: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("studypulse=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Student { id, data } => commands::student::execute(id, data).await,
        Commands::Class { id, data } => commands::class::execute(id, data).await,
        Commands::Topic {
            student,
            topic,
            data,
        } => commands::topic::execute(student, topic, data).await,
        Commands::Validate { dataset, config } => commands::validate::execute(dataset, config),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
