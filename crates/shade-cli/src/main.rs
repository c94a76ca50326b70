//! Shade command-line tool
//!
//! Weaves the classes of a class-pool document and prints or writes the
//! result, or shows what weaving would do to each member.

mod commands;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "shade")]
#[command(about = "Weave interception dispatch into classes", long_about = None)]
#[command(version)]
struct Cli {
    /// Log woven members (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Color output: auto, always, never
    #[arg(long, global = true, value_parser = ["auto", "always", "never"])]
    color: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Weave classes and emit the result
    Weave {
        /// Class-pool document (.json or .toml)
        pool: PathBuf,
        /// Class to weave (repeatable; defaults to every class in the document)
        #[arg(short, long = "class", value_name = "NAME")]
        classes: Vec<String>,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = commands::EmitFormat::Java)]
        emit: commands::EmitFormat,
        /// Weave configuration (shade.toml)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Write one file per class under this directory instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Show the weaving action for every member
    Plan {
        /// Class-pool document (.json or .toml)
        pool: PathBuf,
        /// Class to plan (repeatable; defaults to every class in the document)
        #[arg(short, long = "class", value_name = "NAME")]
        classes: Vec<String>,
        /// Weave configuration (shade.toml)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("SHADE_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let choice = output::resolve_color_choice(cli.color.as_deref());
    let mut out = output::StyledOutput::new(choice);

    match cli.command {
        Commands::Weave {
            pool,
            classes,
            emit,
            config,
            out: out_dir,
        } => commands::weave::execute(
            commands::weave::WeaveArgs {
                pool,
                classes,
                emit,
                config,
                out_dir,
            },
            &mut out,
        ),

        Commands::Plan {
            pool,
            classes,
            config,
        } => commands::plan::execute(&pool, &classes, config.as_deref(), &mut out),
    }
}
