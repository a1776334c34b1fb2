use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use serde::Serialize;

use abnt_rs::constants::ABNT_TIMESTAMP_FORMAT;
use abnt_rs::layout::{decode_latin1, filter_range};
use abnt_rs::logging::{log_debug, log_error, log_warn};
use abnt_rs::{
    build_confirmation_sheet, extract_client_info, init_logger, log_info, parse_portal_report, summarize,
    AnalyzerConfig, MeterDump, QuantityRole, RawBuffer,
};

#[derive(Parser)]
#[command(name = "abnt-cli")]
#[command(about = "CLI tool for ABNT meter dumps and portal reports")]
struct Cli {
    /// JSON configuration file (defaults to $ABNT_CONFIG, then built-in values)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// General parameters block
    Params { file: PathBuf },
    /// Power-outage log
    Outages { file: PathBuf },
    /// Configuration-change log
    Changes { file: PathBuf },
    /// Mass-memory samples, optionally limited to a range (dd/mm/yy HH:MM:SS)
    MassMemory {
        file: PathBuf,
        #[arg(long, value_parser = parse_timestamp)]
        from: Option<NaiveDateTime>,
        #[arg(long, value_parser = parse_timestamp)]
        to: Option<NaiveDateTime>,
    },
    /// Per-bucket kWh of channel 1 and outages inside the sampled span
    Summary { file: PathBuf },
    /// Portal consumption or demand report
    Report {
        file: PathBuf,
        #[arg(long, default_value = "energy")]
        role: QuantityRole,
    },
    /// Confirmation sheet from the semicolon-separated task export
    Confirm { file: PathBuf },
    /// Raw fixed-width field (1-based position)
    Extract { file: PathBuf, position: usize, length: usize },
}

fn parse_timestamp(s: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(s, ABNT_TIMESTAMP_FORMAT).map_err(|e| format!("expected dd/mm/yy HH:MM:SS: {e}"))
}

fn read_latin1(path: &Path) -> anyhow::Result<String> {
    let bytes = fs::read(path).with_context(|| format!("cannot read {}", path.display()))?;
    Ok(decode_latin1(&bytes))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn load_config(path: Option<&Path>) -> anyhow::Result<AnalyzerConfig> {
    let config = match path {
        Some(p) => AnalyzerConfig::load(p)?,
        None => AnalyzerConfig::from_env()?,
    };
    log_debug(&format!("Using configuration {config:?}"));
    Ok(config)
}

#[derive(Serialize)]
struct Summary<'a> {
    meter: &'a str,
    samples: usize,
    consumption_kwh: Option<abnt_rs::BucketValues>,
    total_kwh: Option<f64>,
    suspect_outages: Vec<&'a abnt_rs::OutageRecord>,
}

#[derive(Serialize)]
struct ReportOutput {
    client: abnt_rs::reports::ClientInfo,
    quantities: Vec<abnt_rs::AggregatedQuantity>,
}

fn main() -> anyhow::Result<()> {
    init_logger();

    let cli = Cli::parse();
    run(cli).map_err(|e| {
        log_error(&format!("{e:#}"));
        e
    })
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Params { file } => {
            print_json(&MeterDump::parse(&read_latin1(&file)?).params)?;
        }
        Commands::Outages { file } => {
            print_json(&MeterDump::parse(&read_latin1(&file)?).outages)?;
        }
        Commands::Changes { file } => {
            print_json(&MeterDump::parse(&read_latin1(&file)?).changes)?;
        }
        Commands::MassMemory { file, from, to } => {
            let dump = MeterDump::parse(&read_latin1(&file)?);
            let samples = match (from, to) {
                (None, None) => dump.mass_memory,
                (from, to) => filter_range(
                    &dump.mass_memory,
                    from.unwrap_or(NaiveDateTime::MIN),
                    to.unwrap_or(NaiveDateTime::MAX),
                ),
            };
            log_info(&format!("{} samples selected", samples.len()));
            print_json(&samples)?;
        }
        Commands::Summary { file } => {
            let dump = MeterDump::parse(&read_latin1(&file)?);
            let consumption_kwh = dump.consumption_kwh(1);
            let suspect_outages = dump.suspect_outages();
            if !suspect_outages.is_empty() {
                log_warn(&format!(
                    "{} outages fall inside the mass memory span; timestamps may be shifted",
                    suspect_outages.len()
                ));
            }
            print_json(&Summary {
                meter: &dump.params.meter_id,
                samples: dump.mass_memory.len(),
                total_kwh: consumption_kwh.map(|c| c.total()),
                consumption_kwh,
                suspect_outages,
            })?;
        }
        Commands::Report { file, role } => {
            let config = load_config(cli.config.as_deref())?;
            let text = read_latin1(&file)?;
            let report = parse_portal_report(&text)?;
            let quantities = summarize(&report, role)
                .iter()
                .map(|q| config.billing.adjust(q, role))
                .collect();
            print_json(&ReportOutput {
                client: extract_client_info(&text),
                quantities,
            })?;
        }
        Commands::Confirm { file } => {
            let config = load_config(cli.config.as_deref())?;
            let rows = build_confirmation_sheet(&read_latin1(&file)?, &config.schedule()?, config.interval_minutes)?;
            print_json(&rows)?;
        }
        Commands::Extract { file, position, length } => {
            let buffer = RawBuffer::from_upload(&read_latin1(&file)?);
            println!("{}", buffer.field(position, length));
        }
    }

    Ok(())
}
