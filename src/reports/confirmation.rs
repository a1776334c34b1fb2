//! # Confirmation Sheet
//!
//! Builds the per-meter billing confirmation from the semicolon-separated
//! task export. The export has a `DATA/Hora` column followed by four columns
//! per meter:
//!
//! | offset | quantity |
//! |---|---|
//! | 0 | active energy delivered (EAE) |
//! | 1 | active energy received (EAR) |
//! | 2 | reactive energy delivered (ERE) |
//! | 3 | reactive energy received (ERR) |
//!
//! The last line is a totals row and is dropped. Only peak and off-peak
//! buckets are produced.

use chrono::NaiveDateTime;
use csv::{ReaderBuilder, StringRecord};
use log::{debug, warn};
use serde::Serialize;

use crate::billing::aggregate::{aggregate_by_role, BucketedRecord, QuantityRole};
use crate::billing::power_factor::{correct_power_factor, EnergyInterval};
use crate::billing::tariff::{TariffBucket, TariffSchedule};
use crate::error::AbntError;

const COLUMNS_PER_METER: usize = 4;
const TIMESTAMP_FORMATS: &[&str] = &["%d/%m/%Y %H:%M:%S", "%d/%m/%Y %H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];

/// Availability reported for every meter; the export carries no outage data.
pub const DEFAULT_AVAILABILITY: f64 = 100.0;

/// Billing totals of one meter in one bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfirmationRow {
    pub meter: String,
    pub bucket: TariffBucket,
    pub kwh: f64,
    pub kwh_injected: f64,
    pub ufer: f64,
    pub kw: f64,
    pub dmcr: f64,
    pub availability: f64,
}

/// One export row of one meter, after power-factor correction.
#[derive(Debug, Clone, Copy)]
struct MeterInterval {
    bucket: TariffBucket,
    kwh: f64,
    kwh_injected: f64,
    ufer: f64,
    kw: f64,
    dmcr: f64,
}

impl BucketedRecord for MeterInterval {
    fn bucket(&self) -> TariffBucket {
        self.bucket
    }

    fn value(&self, column: &str) -> Option<f64> {
        match column {
            "kWh" => Some(self.kwh),
            "kWh injetado" => Some(self.kwh_injected),
            "UFER" => Some(self.ufer),
            "kW" => Some(self.kw),
            "DMCR" => Some(self.dmcr),
            _ => None,
        }
    }
}

fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(text, f).ok())
}

/// Export cell to number: `,` decimals, blank or `-` is zero.
pub fn parse_cell(text: &str) -> f64 {
    let text = text.trim();
    if text.is_empty() || text == "-" {
        return 0.0;
    }
    text.replace(',', ".").parse().unwrap_or_else(|_| {
        debug!("Unreadable cell '{text}', using 0");
        0.0
    })
}

fn round6(v: f64) -> f64 {
    (v * 1e6).round() / 1e6
}

/// Meter name and first column index of every complete column group.
fn meter_groups(headers: &StringRecord) -> Vec<(String, usize)> {
    (1..headers.len())
        .step_by(COLUMNS_PER_METER)
        .take_while(|first| first + COLUMNS_PER_METER <= headers.len())
        .map(|first| {
            let name = headers[first].split_whitespace().next().unwrap_or_default().to_string();
            (name, first)
        })
        .collect()
}

/// Builds the confirmation sheet.
///
/// `interval_minutes` is the integration interval of the export rows.
pub fn build_confirmation_sheet(
    text: &str,
    schedule: &TariffSchedule,
    interval_minutes: u32,
) -> Result<Vec<ConfirmationRow>, AbntError> {
    if interval_minutes == 0 {
        return Err(AbntError::ConfigurationInvalid("integration interval is zero".into()));
    }
    let mut reader = ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .from_reader(text.as_bytes());
    let headers = reader.headers()?.clone();
    if headers.get(0).map(|h| h.trim_start_matches('\u{feff}').trim()) != Some("DATA/Hora") {
        return Err(AbntError::FormatMismatch("first column is not 'DATA/Hora'".into()));
    }

    let mut records = reader.records().collect::<Result<Vec<_>, _>>()?;
    records.pop();

    // Rows with an unreadable timestamp stay in the power-factor windows with
    // zero energy but are left out of the totals.
    let rows: Vec<(Option<TariffBucket>, &StringRecord)> = records
        .iter()
        .map(|r| match parse_timestamp(r.get(0).unwrap_or_default()) {
            Some(ts) => (Some(schedule.classify(ts)), r),
            None => {
                warn!("Export row with invalid timestamp {:?} counted as zero", r.get(0));
                (None, r)
            }
        })
        .collect();

    let per_hour = 60.0 / f64::from(interval_minutes);
    let mut out = Vec::new();
    for (meter, first) in meter_groups(&headers) {
        let cell = |r: &StringRecord, offset: usize| parse_cell(r.get(first + offset).unwrap_or_default());
        let energy: Vec<EnergyInterval> = rows
            .iter()
            .map(|(bucket, r)| match bucket {
                Some(_) => EnergyInterval::new(cell(*r, 0), cell(*r, 2), cell(*r, 3)),
                None => EnergyInterval::default(),
            })
            .collect();
        let corrections = correct_power_factor(&energy, interval_minutes);

        let intervals: Vec<MeterInterval> = rows
            .iter()
            .zip(energy.iter().zip(&corrections))
            .filter_map(|((bucket, r), (e, pf))| {
                Some(MeterInterval {
                    bucket: (*bucket)?,
                    kwh: e.active,
                    kwh_injected: cell(*r, 1),
                    ufer: pf.ufer,
                    kw: e.active * per_hour,
                    dmcr: pf.dmcr,
                })
            })
            .collect();

        let total = |column: &str, role: QuantityRole| aggregate_by_role(&intervals, column, role).values;
        let kwh = total("kWh", QuantityRole::Energy);
        let kwh_injected = total("kWh injetado", QuantityRole::Energy);
        let ufer = total("UFER", QuantityRole::Demand);
        let kw = total("kW", QuantityRole::Demand);
        let dmcr = total("DMCR", QuantityRole::Demand);

        for bucket in [TariffBucket::Peak, TariffBucket::OffPeak] {
            out.push(ConfirmationRow {
                meter: meter.clone(),
                bucket,
                kwh: round6(kwh.get(bucket)),
                kwh_injected: round6(kwh_injected.get(bucket)),
                ufer: round6(ufer.get(bucket)),
                kw: round6(kw.get(bucket)),
                dmcr: round6(dmcr.get(bucket)),
                availability: DEFAULT_AVAILABILITY,
            });
        }
    }

    out.sort_by(|a, b| a.meter.cmp(&b.meter).then(a.bucket.cmp(&b.bucket)));
    Ok(out)
}
