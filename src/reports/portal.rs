//! # Portal Report Parser
//!
//! Reads the consumption and demand reports copied from the meter portal.
//! The text has a header line naming the data columns (TAB separated) and
//! one row per interval:
//!
//! ```text
//! Data        Dia     Postos horários  kWh fornecido  kWh recebido
//! 02/01/2025 18:00  Quinta  Ponta      1.234,5        0,0
//! ```
//!
//! Numbers use Brazilian formatting (`.` thousands, `,` decimals).

use chrono::NaiveDateTime;
use log::{debug, info};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::billing::aggregate::{reduce_by_bucket, select_reducer, AggregatedQuantity, QuantityRole};
use crate::billing::tariff::TariffBucket;
use crate::error::AbntError;

static HEADER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^Data\s+Dia\s+Postos horários\s+(.*)$").expect("valid header regex"));
static CONTRACT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Cliente \(contrato\)\s+(\d+)").expect("valid contract regex"));
static SERIAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Medidor \(serial\)\s+(\d+)").expect("valid serial regex"));
static SERIAL_FALLBACK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"Medidor\s+(\d+)").expect("valid serial regex"));

const ROW_PREFIX: &str =
    r"(?m)^(\d{2}/\d{2}/\d{4}[ \t]+\d{2}:\d{2})[ \t]+([A-Za-zçáéíóúãõâêôü]+)[ \t]+(Fora Ponta|Ponta|Reservado)";
const VALUE_PATTERN: &str = r"[ \t]+([\d.,-]+)";
const ROW_TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M";

/// One data row of a portal report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortalRow {
    pub timestamp: NaiveDateTime,
    pub weekday: String,
    pub bucket: TariffBucket,
    /// One value per report column; NaN where the cell is not a number.
    pub values: Vec<f64>,
}

/// A parsed portal report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortalReport {
    pub columns: Vec<String>,
    pub rows: Vec<PortalRow>,
}

/// Contract and meter serial printed on a report page.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ClientInfo {
    pub contract: Option<String>,
    pub serial: Option<String>,
}

/// `1.234,5` -> `1234.5`; anything else -> NaN.
pub fn parse_brazilian_number(text: &str) -> f64 {
    text.replace('.', "").replace(',', ".").parse().unwrap_or(f64::NAN)
}

fn row_regex(columns: usize) -> Result<Regex, AbntError> {
    let pattern = format!("{ROW_PREFIX}{}$", VALUE_PATTERN.repeat(columns));
    Regex::new(&pattern).map_err(|e| AbntError::Other(e.to_string()))
}

/// Parses a pasted portal report.
pub fn parse_portal_report(text: &str) -> Result<PortalReport, AbntError> {
    let text = text.replace('\r', "");
    let header = HEADER_RE
        .captures(&text)
        .and_then(|c| c.get(1))
        .ok_or_else(|| AbntError::FormatMismatch("report header 'Data Dia Postos horários' not found".into()))?;
    let columns: Vec<String> = header.as_str().trim().split('\t').map(|c| c.trim().to_string()).collect();

    let row_re = row_regex(columns.len())?;
    let mut rows = Vec::new();
    for caps in row_re.captures_iter(&text) {
        let stamp = caps[1].split_whitespace().collect::<Vec<_>>().join(" ");
        let timestamp = match NaiveDateTime::parse_from_str(&stamp, ROW_TIMESTAMP_FORMAT) {
            Ok(t) => t,
            Err(_) => {
                debug!("Skipping report row with invalid timestamp '{stamp}'");
                continue;
            }
        };
        let bucket = caps[3].parse()?;
        let values = (0..columns.len())
            .map(|i| parse_brazilian_number(&caps[4 + i]))
            .collect();
        rows.push(PortalRow {
            timestamp,
            weekday: caps[2].to_string(),
            bucket,
            values,
        });
    }

    if rows.is_empty() {
        return Err(AbntError::FormatMismatch("report has a header but no data rows".into()));
    }
    Ok(PortalReport { columns, rows })
}

/// Like [`parse_portal_report`], logging instead of failing.
pub fn try_parse_portal_report(text: &str) -> Option<PortalReport> {
    parse_portal_report(text)
        .map_err(|e| info!("No portal report: {e}"))
        .ok()
}

impl PortalReport {
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Aggregates one column by tariff bucket.
    pub fn aggregate_column(&self, column: &str, role: QuantityRole) -> Option<AggregatedQuantity> {
        let index = self.column_index(column)?;
        let reducer = select_reducer(column, role);
        let values = reduce_by_bucket(self.rows.iter().map(|r| (r.bucket, r.values[index])), reducer);
        Some(AggregatedQuantity {
            name: column.to_string(),
            reducer,
            values,
        })
    }
}

/// Aggregates every column of a report.
pub fn summarize(report: &PortalReport, role: QuantityRole) -> Vec<AggregatedQuantity> {
    report
        .columns
        .iter()
        .filter_map(|c| report.aggregate_column(c, role))
        .collect()
}

fn first_group(re: &Regex, text: &str) -> Option<String> {
    re.captures(text).map(|c| c[1].to_string())
}

pub fn extract_client_info(text: &str) -> ClientInfo {
    ClientInfo {
        contract: first_group(&CONTRACT_RE, text),
        serial: first_group(&SERIAL_RE, text).or_else(|| first_group(&SERIAL_FALLBACK_RE, text)),
    }
}
