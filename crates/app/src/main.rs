use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use multitype_core::{MultitypeError, OptionStore, Operator, StoreConfig, Value};
use tracing_subscriber::EnvFilter;

fn main() -> multitype_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Parse { text, json } => run_parse(&text, json),
        Commands::Eval { lhs, op, rhs } => run_eval(&lhs, &op, &rhs),
        Commands::Check {
            file,
            allow_redefinition,
        } => run_check(&file, allow_redefinition),
    }
}

fn run_parse(text: &str, json: bool) -> multitype_core::Result<()> {
    let value = Value::parse(text);
    tracing::debug!(tag = %value.tag(), "parsed input");
    if json {
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("{}: {value}", value.tag());
    }
    Ok(())
}

fn run_eval(lhs: &str, op: &str, rhs: &str) -> multitype_core::Result<()> {
    let op: Operator = op.parse()?;
    let lhs = Value::parse(lhs);
    let rhs = Value::parse(rhs);
    tracing::debug!(%op, lhs = %lhs.tag(), rhs = %rhs.tag(), "evaluating");

    let result = op.apply(&lhs, &rhs)?;
    println!("{}: {result}", result.tag());
    Ok(())
}

fn run_check(file: &Path, allow_redefinition: bool) -> multitype_core::Result<()> {
    tracing::info!(?file, "checking option file");
    let config = StoreConfig {
        allow_redefinition,
        ..StoreConfig::default()
    };
    let mut store = OptionStore::with_config(config);
    store.load_file(file)?;

    if store.is_empty() {
        return Err(MultitypeError::msg(format!(
            "no options found in {}",
            file.display()
        )));
    }

    for (key, value) in store.iter() {
        println!("{key} ({}) = {value}", value.tag());
    }
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Inspect Multitype values and option files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse a value and print its tag and rendering.
    Parse {
        /// Text to parse, e.g. `[1, 2, "hi"]`.
        #[arg(allow_hyphen_values = true)]
        text: String,
        /// Print the value as JSON instead.
        #[arg(long)]
        json: bool,
    },
    /// Apply a binary operator to two parsed values.
    Eval {
        #[arg(allow_hyphen_values = true)]
        lhs: String,
        /// One of `+ - * / < <= > >= ==`.
        #[arg(allow_hyphen_values = true)]
        op: String,
        #[arg(allow_hyphen_values = true)]
        rhs: String,
    },
    /// Load an option file and list its entries.
    Check {
        file: PathBuf,
        /// Let later lines override earlier definitions of the same key.
        #[arg(long)]
        allow_redefinition: bool,
    },
}
