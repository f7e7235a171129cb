//! SERC Harvest CLI
//!
//! Local execution entry point for harvesting and pseudonymization.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serc_harvest::{
    config::{self, Credentials},
    error::Result,
    pipeline,
    services::SearchClient,
    storage::ResultStore,
};

/// serc - Search-engine result counts for firm domains
#[derive(Parser, Debug)]
#[command(
    name = "serc",
    version,
    about = "Multilingual SERC harvester for archived firm websites"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "serc.toml", global = true)]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Query result counts for firms not yet in the output file
    Harvest {
        /// Input mapping CSV (overrides INPUT_PATH)
        #[arg(long)]
        input: Option<PathBuf>,
        /// Results CSV (overrides OUTPUT_PATH)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Print the run summary as JSON on stdout
        #[arg(long)]
        json: bool,
    },

    /// Show how many firms are harvested and remaining
    Status {
        /// Print the progress report as JSON on stdout
        #[arg(long)]
        json: bool,
    },

    /// Build the public sample and private key from the private table
    Pseudonymize {
        /// Private CSV with `nif` and `archive_url`
        #[arg(long)]
        input: Option<PathBuf>,
        /// Private key output (`nif`, `nif_anon`)
        #[arg(long)]
        key_output: Option<PathBuf>,
        /// Public sample output (`nif_anon`, `archive_url`)
        #[arg(long)]
        public_output: Option<PathBuf>,
        /// Rows kept in the public sample
        #[arg(long)]
        sample_size: Option<usize>,
    },

    /// Validate configuration and credentials
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = config::load_config(&cli.config);
    config.validate()?;

    match cli.command {
        Command::Harvest {
            input,
            output,
            json,
        } => {
            if let Some(path) = input {
                config.harvest.input_path = path;
            }
            if let Some(path) = output {
                config.harvest.output_path = path;
            }

            let credentials = Credentials::from_env()?;
            let client = SearchClient::new(&config.search, credentials)?;
            let stats = pipeline::run_harvest(&config.harvest, &client).await?;

            if stats.quota_stopped {
                log::info!("Quota reached. Run again once the daily quota resets.");
            }
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            }
        }

        Command::Status { json } => {
            let progress = pipeline::run_status(&config.harvest)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&progress)?);
            }
        }

        Command::Pseudonymize {
            input,
            key_output,
            public_output,
            sample_size,
        } => {
            let settings = &mut config.pseudonymize;
            if let Some(path) = input {
                settings.private_input = path;
            }
            if let Some(path) = key_output {
                settings.private_key_output = path;
            }
            if let Some(path) = public_output {
                settings.public_output = path;
            }
            if let Some(size) = sample_size.filter(|&n| n > 0) {
                settings.sample_size = size;
            }

            let summary = pipeline::run_pseudonymize(settings)?;
            log::info!(
                "Pseudonymized {} firms across {} rows",
                summary.distinct_firms,
                summary.input_rows
            );
        }

        Command::Validate => {
            log::info!("Validating configuration...");
            log::info!("✓ Config OK (search endpoint {})", config.search.endpoint);
            log::info!(
                "    timeout {}s, batch {}, delay {}ms, cutoff {}",
                config.search.timeout_secs,
                config.harvest.batch_size,
                config.harvest.request_delay_ms,
                config.search.cutoff_date
            );

            if let Err(e) = Credentials::from_env() {
                log::error!("Credential check failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Credentials present");

            let store = ResultStore::new(&config.harvest.output_path);
            log::info!(
                "Input: {} ({})",
                config.harvest.input_path.display(),
                if config.harvest.input_path.exists() {
                    "exists"
                } else {
                    "not found"
                }
            );
            log::info!(
                "Output: {} ({})",
                store.path().display(),
                if store.exists() { "exists" } else { "not created yet" }
            );

            log::info!("All validations passed!");
        }
    }

    Ok(())
}
