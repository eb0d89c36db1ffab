use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use xrate::core::ConversionRequest;
use xrate::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    /// Use the built-in rates instead of the live source
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for xrate::AppCommand {
    fn from(cmd: Commands) -> xrate::AppCommand {
        match cmd {
            Commands::Convert {
                amount,
                from,
                to,
                json,
            } => xrate::AppCommand::Convert {
                request: ConversionRequest::new(amount, &from, &to),
                json,
            },
            Commands::Rates { refresh } => xrate::AppCommand::Rates { refresh },
            Commands::Popular => xrate::AppCommand::Popular,
            Commands::Currencies => xrate::AppCommand::Currencies,
            Commands::Batch { file } => xrate::AppCommand::Batch { input: file },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Convert an amount between two currencies
    Convert {
        /// Amount in the source currency
        #[arg(allow_negative_numbers = true)]
        amount: f64,
        /// Source currency code
        #[arg(short, long, default_value = "USD")]
        from: String,
        /// Target currency code
        #[arg(short, long, default_value = "EUR")]
        to: String,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Display all exchange rates against USD
    Rates {
        /// Ignore cached rates and fetch again
        #[arg(long)]
        refresh: bool,
    },
    /// Display rates for popular currencies
    Popular,
    /// List supported currencies
    Currencies,
    /// Convert `AMOUNT FROM TO` lines from a file or stdin
    Batch {
        /// Input file, stdin when omitted
        file: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => xrate::cli::setup::setup(),
        Some(cmd) => xrate::run_command(cmd.into(), cli.config_path.as_deref(), cli.offline).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
