mod commands;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "arealanalyse",
    version,
    about = "Classify parcel analysis results into a traffic-light report"
)]
struct Cli {
    /// Log classification details (overridden by RUST_LOG)
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify an analysis batch (JSON) and print the report
    Classify {
        /// Path to the analysis batch JSON file
        input_file: PathBuf,

        /// Custom dataset policy file(s)
        #[arg(short, long = "policy", value_name = "FILE")]
        policy: Vec<PathBuf>,

        /// Predefined dataset policy: dok (default if no --policy/--preset given)
        #[arg(long = "preset", value_name = "NAME")]
        preset: Vec<String>,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Number locale: default or nb-no
        #[arg(short, long, default_value = "default")]
        locale: String,

        /// Planning context of the request (e.g. byggesak)
        #[arg(long)]
        context: Option<String>,

        /// Treat objects beyond search range as uncertain outside building matters
        #[arg(long)]
        beyond_range_uncertain: bool,

        /// Input already carries resultStatus per result; only assemble
        #[arg(long)]
        precomputed: bool,

        /// Show per-result classification reasons
        #[arg(long)]
        reasons: bool,
    },
    /// Manage and inspect dataset policies
    Policies {
        #[command(subcommand)]
        action: PoliciesAction,
    },
}

#[derive(Subcommand)]
enum PoliciesAction {
    /// List predefined dataset policies
    List,
    /// Explain a dataset policy in plain language
    Explain {
        /// Preset name (e.g., "dok")
        preset: String,
    },
    /// Validate a custom dataset policy file
    Validate {
        /// Path to JSON policy file
        file: PathBuf,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Classify {
            input_file,
            policy,
            preset,
            output,
            locale,
            context,
            beyond_range_uncertain,
            precomputed,
            reasons,
        } => commands::classify::run(commands::classify::ClassifyArgs {
            input_file,
            policy_files: policy,
            presets: preset,
            output_format: output,
            locale,
            context,
            beyond_range_uncertain,
            precomputed,
            show_reasons: reasons,
        }),
        Commands::Policies { action } => match action {
            PoliciesAction::List => commands::policies::list(),
            PoliciesAction::Explain { preset } => commands::policies::explain(&preset),
            PoliciesAction::Validate { file } => commands::policies::validate(&file),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
