//! revise: spaced question practice over a CSV question file.

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};
use revise_core::SortingKey;
use services::RunType;
use tracing_subscriber::EnvFilter;

mod commands;

const DEFAULT_LOG_FILTER: &str = "warn,revise=info,storage=info,services=info";

#[derive(Parser)]
#[command(name = "revise", version, about = "Practise exam questions, weakest first")]
struct Cli {
    /// Settings file (defaults to $REVISE_CONFIG, then ./revise.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Pool selection shared by `list` and `run`.
#[derive(Args, Debug, Default)]
struct PoolArgs {
    /// Keep only questions whose attribute has one of the values (attr=v1,v2)
    #[arg(long, value_name = "ATTR=VALUES")]
    keep: Vec<String>,

    /// Drop questions whose attribute has one of the values (attr=v1,v2)
    #[arg(long, value_name = "ATTR=VALUES")]
    remove: Vec<String>,

    /// Keep questions whose numeric attribute is in an inclusive range (attr=min..max)
    #[arg(long, value_name = "ATTR=MIN..MAX")]
    range: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the questions in a file
    List {
        /// Question file
        file: PathBuf,

        /// Attribute to order by (default: index)
        #[arg(long)]
        sort: Option<SortingKey>,

        /// Reverse the order
        #[arg(long)]
        desc: bool,

        /// Show the wrongness and overdue scores behind each likelihood
        #[arg(long)]
        breakdown: bool,

        #[command(flatten)]
        pool: PoolArgs,
    },

    /// Describe the question attributes, or list the values one accepts
    Attributes {
        /// Attribute name, e.g. "exam board"
        name: Option<String>,
    },

    /// Check a question file without changing it
    Validate {
        /// Question file
        file: PathBuf,

        /// Fail on stored percentages or likelihoods that disagree with the counters
        #[arg(long)]
        strict: bool,
    },

    /// Answer questions and record the results
    Run {
        /// Question file
        file: PathBuf,

        /// revise, test or custom
        #[arg(long)]
        mode: Option<RunType>,

        /// Attribute to order by; implies a custom run
        #[arg(long)]
        sort: Option<SortingKey>,

        /// Reverse the custom order
        #[arg(long)]
        desc: bool,

        #[command(flatten)]
        pool: PoolArgs,

        /// Stop after this many answers
        #[arg(long)]
        rounds: Option<u32>,

        /// Keep file order among equal questions
        #[arg(long)]
        no_shuffle: bool,

        /// Do not write results back to the file
        #[arg(long)]
        dry_run: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::List {
            file,
            sort,
            desc,
            breakdown,
            pool,
        } => commands::list::execute(
            cli.config,
            file,
            commands::list::ListOptions {
                sort,
                desc,
                breakdown,
                pool,
            },
        ),
        Commands::Attributes { name } => commands::attributes::execute(name.as_deref()),
        Commands::Validate { file, strict } => commands::validate::execute(cli.config, file, strict),
        Commands::Run {
            file,
            mode,
            sort,
            desc,
            pool,
            rounds,
            no_shuffle,
            dry_run,
        } => commands::run::execute(
            cli.config,
            file,
            commands::run::RunOptions {
                mode,
                sort,
                desc,
                pool,
                rounds,
                shuffle: no_shuffle.then_some(false),
                dry_run,
            },
        ),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
