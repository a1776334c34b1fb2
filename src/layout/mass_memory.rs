//! # Mass Memory
//!
//! Interval readings are stored on lines prefixed `SALV` or `CONT`. Each line
//! holds 24 groups of 12 characters starting at position 13, and each group
//! holds one 4-digit reading per channel.
//!
//! The dump does not timestamp individual readings. Timestamps are rebuilt
//! from the mass-memory end timestamp in the general parameters, assuming
//! one reading per interval without gaps:
//!
//! ```text
//! start = end - interval * (n - 1)
//! ```
//!
//! Use [`outages_within`] to find power outages that may break that
//! assumption for a given series.

use chrono::{Duration, NaiveDateTime};
use log::{debug, info, warn};
use serde::Serialize;

use crate::billing::aggregate::{aggregate_by_role, BucketValues, BucketedRecord, QuantityRole};
use crate::billing::tariff::{TariffBucket, TariffSchedule};
use crate::constants::*;
use crate::layout::extract::extract;
use crate::layout::params::GeneralParameters;
use crate::layout::sections::OutageRecord;

/// One sampling interval of the three channels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MassMemorySample {
    pub timestamp: NaiveDateTime,
    pub raw: [u32; 3],
    /// `raw * 12` for energy channels, `None` otherwise.
    pub derived: [Option<f64>; 3],
    pub bucket: TariffBucket,
}

impl BucketedRecord for MassMemorySample {
    fn bucket(&self) -> TariffBucket {
        self.bucket
    }

    /// Columns: `channel_1`..`channel_3` (raw) and `derived_1`..`derived_3`.
    fn value(&self, column: &str) -> Option<f64> {
        let (kind, channel) = column.rsplit_once('_')?;
        let index = channel.parse::<usize>().ok()?.checked_sub(1)?;
        match kind {
            "channel" => self.raw.get(index).map(|v| f64::from(*v)),
            "derived" => self.derived.get(index).copied().flatten(),
            _ => None,
        }
    }
}

/// Whether a line carries mass-memory readings.
pub fn is_mass_memory_line(line: &str) -> bool {
    ABNT_MM_MARKERS.iter().any(|m| line.starts_with(m))
}

fn parse_reading(group: &str, channel: usize) -> u32 {
    let text = extract(group, channel * ABNT_MM_READING_LEN + 1, ABNT_MM_READING_LEN);
    text.trim().parse().unwrap_or_else(|_| {
        debug!("Unreadable channel {} value '{text}', using 0", channel + 1);
        0
    })
}

/// Raw readings of one mass-memory line, in order.
pub fn line_readings(line: &str) -> Vec<[u32; 3]> {
    let mut readings = Vec::with_capacity(ABNT_MM_GROUPS_PER_LINE);
    for g in 0..ABNT_MM_GROUPS_PER_LINE {
        let group = extract(line, ABNT_MM_FIRST_GROUP + g * ABNT_MM_GROUP_LEN, ABNT_MM_GROUP_LEN);
        if group.chars().count() < ABNT_MM_GROUP_LEN {
            if !group.is_empty() || g > 0 {
                warn!("Mass memory line ends after {g} complete groups");
            }
            break;
        }
        readings.push([parse_reading(group, 0), parse_reading(group, 1), parse_reading(group, 2)]);
    }
    readings
}

/// Rebuilds the mass-memory time series.
///
/// Returns an empty list when there are no marker lines, or when the end
/// timestamp or the interval cannot be read. Unusable peak boundaries label
/// every sample off-peak.
pub fn parse_mass_memory(raw_lines: &str, params: &GeneralParameters) -> Vec<MassMemorySample> {
    let readings: Vec<[u32; 3]> = raw_lines
        .lines()
        .filter(|l| is_mass_memory_line(l))
        .flat_map(line_readings)
        .collect();
    if readings.is_empty() {
        info!("No mass memory readings found");
        return Vec::new();
    }

    let end = match params.mass_memory_end() {
        Ok(t) => t,
        Err(e) => {
            warn!("Mass memory skipped: {e}");
            return Vec::new();
        }
    };
    let interval = match params.mass_memory_interval_minutes() {
        Ok(m) => Duration::minutes(i64::from(m)),
        Err(e) => {
            warn!("Mass memory skipped: {e}");
            return Vec::new();
        }
    };
    let schedule = match TariffSchedule::from_parameters(params) {
        Ok(s) => Some(s),
        Err(e) => {
            warn!("Mass memory samples labelled off-peak: {e}");
            None
        }
    };

    let energy: [bool; 3] =
        std::array::from_fn(|c| params.channel_quantity(c + 1).map_or(false, |q| q.is_energy()));
    let start = end - interval * (readings.len() as i32 - 1);

    readings
        .into_iter()
        .enumerate()
        .map(|(i, raw)| {
            let timestamp = start + interval * i as i32;
            MassMemorySample {
                timestamp,
                raw,
                derived: std::array::from_fn(|c| {
                    energy[c].then(|| f64::from(raw[c]) * ABNT_MM_ENERGY_FACTOR)
                }),
                bucket: schedule
                    .as_ref()
                    .map_or(TariffBucket::OffPeak, |s| s.classify(timestamp)),
            }
        })
        .collect()
}

/// Samples with `from <= timestamp <= to`.
pub fn filter_range(samples: &[MassMemorySample], from: NaiveDateTime, to: NaiveDateTime) -> Vec<MassMemorySample> {
    samples
        .iter()
        .filter(|s| from <= s.timestamp && s.timestamp <= to)
        .cloned()
        .collect()
}

/// Per-bucket kWh of an energy channel (1-3).
///
/// `None` when `params` does not declare the channel as an energy quantity.
pub fn channel_consumption_kwh(
    samples: &[MassMemorySample],
    channel: usize,
    params: &GeneralParameters,
) -> Option<BucketValues> {
    if !params.channel_quantity(channel)?.is_energy() {
        return None;
    }
    let wh = aggregate_by_role(samples, &format!("derived_{channel}"), QuantityRole::Energy);
    Some(wh.values.map(|v| v / ABNT_MM_ENERGY_FACTOR / 1000.0))
}

/// Outages that overlap the span covered by `samples`.
pub fn outages_within<'a>(samples: &[MassMemorySample], outages: &'a [OutageRecord]) -> Vec<&'a OutageRecord> {
    let (Some(first), Some(last)) = (samples.first(), samples.last()) else {
        return Vec::new();
    };
    outages
        .iter()
        .filter(|o| match (o.start_datetime(), o.end_datetime()) {
            (Some(start), Some(end)) => start <= last.timestamp && end >= first.timestamp,
            _ => false,
        })
        .collect()
}
