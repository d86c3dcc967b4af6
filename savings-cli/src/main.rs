use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use chrono::Local;
use clap::{Parser, Subcommand};
use savings_core::{Period, Profession};
use tracing::{debug, warn};

use savings_cli::app::{App, OutputFormat};
use savings_cli::config::Config;
use savings_cli::models::SimulationForm;
use savings_cli::{csv_loader, logging};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Tax savings simulator for retirement contract contributions.
///
/// Compares income tax with and without a deductible contribution and
/// projects the savings over 1 to 20 years.
#[derive(Debug, Parser)]
#[command(name = "savings-sim", version)]
struct Cli {
    /// TOML configuration file (defaults to `savings-sim.toml` if present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Bracket CSV replacing the built-in schedules.
    #[arg(long, global = true)]
    brackets: Option<PathBuf>,

    /// Log level or EnvFilter directive. RUST_LOG takes precedence.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Also append logs to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Simulate one contribution.
    Simulate {
        /// `employee` or `self_employed`.
        #[arg(long, value_parser = parse_profession)]
        profession: Profession,

        /// Taxable income for the period (salary for employees).
        #[arg(long)]
        income: String,

        /// Proposed contribution for the same period.
        #[arg(long)]
        contribution: String,

        /// Ignored for the self-employed, who are always evaluated annually.
        #[arg(long, value_parser = parse_period, default_value = "monthly")]
        period: Period,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Append a bar chart of the projected savings.
        #[arg(long)]
        chart: bool,

        /// Write a printable document into this directory.
        #[arg(long)]
        export: Option<PathBuf>,
    },

    /// Simulate every row of a CSV file.
    Batch {
        #[arg(long)]
        file: PathBuf,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Print the bracket schedules in use.
    Brackets {
        #[arg(long, value_parser = parse_period)]
        period: Option<Period>,
    },
}

fn parse_profession(value: &str) -> Result<Profession, String> {
    Profession::parse(value)
        .ok_or_else(|| format!("unknown profession '{value}' (employee, self_employed)"))
}

fn parse_period(value: &str) -> Result<Period, String> {
    Period::parse(value).ok_or_else(|| format!("unknown period '{value}' (monthly, annual)"))
}

// ─── logging ─────────────────────────────────────────────────────────────────

/// Apply the configured level and log file; flags win over the config file.
fn configure_logging(
    cli: &Cli,
    config: &Config,
) -> anyhow::Result<()> {
    let level = cli.log_level.as_deref().unwrap_or(&config.logging.level);
    if logging::env_filter_overrides() {
        debug!("RUST_LOG set, ignoring configured level");
    } else {
        logging::set_log_level(level)?;
    }

    if let Some(path) = cli.log_file.as_ref().or(config.logging.file.as_ref()) {
        logging::enable_file_logging(path)?;
    }
    Ok(())
}

// ─── commands ────────────────────────────────────────────────────────────────

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = Config::load(cli.config.as_deref())?;
    configure_logging(&cli, &config)?;

    let app = App::load(&config, cli.brackets.as_deref())?;

    match cli.command {
        Command::Simulate {
            profession,
            income,
            contribution,
            period,
            format,
            chart,
            export,
        } => {
            let form = SimulationForm {
                profession,
                period,
                income,
                contribution,
            };
            let (input, report) = match app.simulate(&form) {
                Ok(result) => result,
                Err(errors) => {
                    for message in &errors.0 {
                        eprintln!("error: {message}");
                    }
                    if let Some(hint) = app.renderer().cap_preview(&form) {
                        eprintln!("{hint}");
                    }
                    return Ok(ExitCode::from(2));
                }
            };

            println!("{}", app.render_report(&report, format, chart)?);

            if let Some(dir) = export {
                let path = app.export(&dir, &input, &report, Local::now().date_naive())?;
                eprintln!("Document written to {}", path.display());
            }
        }
        Command::Batch { file, format } => {
            let inputs = csv_loader::load_from_file(&file)
                .with_context(|| format!("cannot load batch inputs from {}", file.display()))?;
            if inputs.is_empty() {
                warn!(path = %file.display(), "batch file has no rows");
            }
            let reports = app.run_batch(&inputs);
            println!("{}", app.render_batch(&reports, format)?);
        }
        Command::Brackets { period } => {
            println!("{}", app.render_brackets(period));
        }
    }

    Ok(ExitCode::SUCCESS)
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> ExitCode {
    logging::init_default_logging("warn");

    let cli = Cli::parse();
    let result = run(cli);
    logging::disable_file_logging();

    match result {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}
