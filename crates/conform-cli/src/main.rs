use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use conform::{run_check, run_validate, CompileArgs};

#[derive(Parser)]
#[command(name = "conform")]
#[command(about = "Validate data against JSON Schema with custom error messages", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SchemaArgs {
    /// JSON Schema file (JSON or YAML)
    #[arg(short, long)]
    schema: PathBuf,

    /// Error message configuration (JSON or YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Fail when the schema produces any diagnostic
    #[arg(long)]
    strict: bool,
}

impl From<SchemaArgs> for CompileArgs {
    fn from(args: SchemaArgs) -> Self {
        CompileArgs {
            schema: args.schema,
            config: args.config,
            strict: args.strict,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a data file
    Validate {
        #[command(flatten)]
        schema: SchemaArgs,

        /// Data file to validate (JSON or YAML)
        #[arg(long)]
        data: PathBuf,

        /// Report every failure instead of the first
        #[arg(short, long)]
        all: bool,
    },

    /// Compile a schema and print its diagnostics
    Check {
        #[command(flatten)]
        schema: SchemaArgs,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let level = if cli.debug {
        tracing::Level::TRACE
    } else if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(cli.debug)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Validate { schema, data, all } => {
            let outcome = run_validate(&CompileArgs::from(schema), &data, all).await?;
            println!("{}", outcome.render());
            Ok(if outcome.is_valid() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Commands::Check { schema } => {
            println!("{}", run_check(&CompileArgs::from(schema))?);
            Ok(ExitCode::SUCCESS)
        }
    }
}
