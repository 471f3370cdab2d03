//! lakeship: inspect which PostgreSQL built-ins may be pushed down to DuckDB
//!
//! Commands:
//! - `rules`: list the built-in shippability rules
//! - `check`: decide a single call site given as JSON
//! - `format`: compile a `to_char` template into a `strftime` chain

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use lakeship_ir::{CallSite, FunctionKind};
use lakeship_registry::{all_rules, Matcher};
use lakeship_strftime::{FormatTranslator, StrftimeTranslator};
use std::io::Read;
use std::path::PathBuf;
use tracing::Level;

mod config;
mod logging;
mod report;

use config::{Config, ReportFormat};
use report::{CheckReport, FormatReport};

#[derive(Debug, Parser)]
#[command(name = "lakeship", version, about = "DuckDB shippability rules for PostgreSQL built-ins")]
struct Cli {
    /// Configuration file (defaults to ./lakeship.yaml when present)
    #[arg(long, global = true, env = "LAKESHIP_CONFIG")]
    config: Option<PathBuf>,

    /// Output format, overriding the configured one
    #[arg(long, global = true, value_enum)]
    format: Option<ReportFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List built-in rules
    Rules {
        #[arg(long, value_enum)]
        kind: Option<KindArg>,

        /// Only rules for this function name
        #[arg(long)]
        name: Option<String>,
    },
    /// Decide shippability of a call site read as JSON from a file or `-`
    Check { input: String },
    /// Show the DuckDB equivalent of a `to_char` template
    Format { template: String },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum KindArg {
    Scalar,
    Aggregate,
    Window,
}

impl From<KindArg> for FunctionKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Scalar => FunctionKind::Scalar,
            KindArg::Aggregate => FunctionKind::Aggregate,
            KindArg::Window => FunctionKind::Window,
        }
    }
}

fn read_input(input: &str) -> Result<String> {
    let mut contents = String::new();
    if input == "-" {
        std::io::stdin()
            .read_to_string(&mut contents)
            .context("failed to read call site from stdin")?;
    } else {
        contents = std::fs::read_to_string(input)
            .with_context(|| format!("failed to read call site from {}", input))?;
    }
    Ok(contents)
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::discover(cli.config.as_deref()).context("failed to load configuration")?;
    config.apply_logging_env();
    logging::init();

    let format = cli.format.unwrap_or(config.report.format);

    let output = match cli.command {
        Command::Rules { kind, name } => {
            let selected = report::select_rules(all_rules(), kind.map(Into::into), name.as_deref());
            report::rules(&selected, format)?
        }
        Command::Check { input } => {
            let contents = read_input(&input)?;
            let call: CallSite = serde_json::from_str(&contents).context("invalid call site JSON")?;

            let report = CheckReport::new(&Matcher::builtin(), &call);
            crate::log_event!(
                level: Level::INFO,
                event: "call_checked",
                function: report.function,
                fingerprint: report.fingerprint,
                shippable: report.shippable
            );
            report.render(format)?
        }
        Command::Format { template } => {
            let chain = StrftimeTranslator
                .try_compile(&template)
                .with_context(|| format!("template {:?} has no DuckDB equivalent", template))?;
            FormatReport::new(&template, &chain)?.render(format)?
        }
    };

    println!("{}", output);
    Ok(())
}
