//! Time-of-use classification.
//!
//! A sample belongs to one of three buckets. Rules, first match wins:
//!
//! 1. Saturday or Sunday -> off-peak
//! 2. holiday -> off-peak
//! 3. reserved hours active and `reserved_start < t <= peak_end` -> reserved
//! 4. `peak_start < t <= peak_end` -> peak
//! 5. otherwise off-peak
//!
//! Windows are open on the left and closed on the right.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::AbntError;
use crate::layout::params::GeneralParameters;

/// Regulatory time-of-use bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TariffBucket {
    Peak,
    OffPeak,
    Reserved,
}

impl TariffBucket {
    pub const ALL: [TariffBucket; 3] = [TariffBucket::Peak, TariffBucket::OffPeak, TariffBucket::Reserved];

    /// Short label used in spreadsheets (`P`, `FP`, `R`).
    pub fn short_label(&self) -> &'static str {
        match self {
            TariffBucket::Peak => "P",
            TariffBucket::OffPeak => "FP",
            TariffBucket::Reserved => "R",
        }
    }
}

impl fmt::Display for TariffBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TariffBucket::Peak => "Ponta",
            TariffBucket::OffPeak => "Fora Ponta",
            TariffBucket::Reserved => "Reservado",
        };
        f.write_str(label)
    }
}

impl FromStr for TariffBucket {
    type Err = AbntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Ponta" | "P" => Ok(TariffBucket::Peak),
            "Fora Ponta" | "FP" => Ok(TariffBucket::OffPeak),
            "Reservado" | "R" => Ok(TariffBucket::Reserved),
            other => Err(AbntError::field("tariff_bucket", other)),
        }
    }
}

/// Parses an `HH:MM` boundary.
pub fn parse_boundary(name: &str, value: &str) -> Result<NaiveTime, AbntError> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .map_err(|_| AbntError::ConfigurationInvalid(format!("{name} '{value}' is not a valid HH:MM time")))
}

/// Boundaries and holidays needed to classify a timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TariffSchedule {
    pub peak_start: NaiveTime,
    pub peak_end: NaiveTime,
    /// `None` when reserved hours are inactive or their start is unusable.
    pub reserved_start: Option<NaiveTime>,
    pub holidays: HashSet<NaiveDate>,
}

impl TariffSchedule {
    pub fn new(peak_start: NaiveTime, peak_end: NaiveTime) -> Self {
        Self {
            peak_start,
            peak_end,
            reserved_start: None,
            holidays: HashSet::new(),
        }
    }

    pub fn with_reserved_start(mut self, reserved_start: NaiveTime) -> Self {
        self.reserved_start = Some(reserved_start);
        self
    }

    pub fn with_holidays<I: IntoIterator<Item = NaiveDate>>(mut self, holidays: I) -> Self {
        self.holidays.extend(holidays);
        self
    }

    /// Builds the schedule from the dump's own boundaries.
    ///
    /// Unusable peak boundaries are an error. An unusable reserved-hours start
    /// only disables reserved classification and is logged.
    pub fn from_parameters(params: &GeneralParameters) -> Result<Self, AbntError> {
        let peak_start = parse_boundary("peak_start", &params.peak_start)?;
        let peak_end = parse_boundary("off_peak_start", &params.off_peak_start)?;
        let mut schedule = Self::new(peak_start, peak_end).with_holidays(params.holiday_dates());

        if params.reserved_active {
            match parse_boundary("reserved_start", &params.reserved_start) {
                Ok(t) => schedule.reserved_start = Some(t),
                Err(e) => warn!("Reserved hours disabled: {e}"),
            }
        }
        Ok(schedule)
    }

    pub fn is_weekend_or_holiday(&self, date: NaiveDate) -> bool {
        matches!(date.weekday(), Weekday::Sat | Weekday::Sun) || self.holidays.contains(&date)
    }

    pub fn classify(&self, timestamp: NaiveDateTime) -> TariffBucket {
        if self.is_weekend_or_holiday(timestamp.date()) {
            return TariffBucket::OffPeak;
        }
        let t = timestamp.time();
        if let Some(reserved_start) = self.reserved_start {
            if reserved_start < t && t <= self.peak_end {
                return TariffBucket::Reserved;
            }
        }
        if self.peak_start < t && t <= self.peak_end {
            TariffBucket::Peak
        } else {
            TariffBucket::OffPeak
        }
    }
}

/// Classifies a timestamp with the boundaries of a decoded dump.
///
/// If the peak boundaries cannot be read every timestamp is off-peak.
pub fn classify_tariff_bucket(timestamp: NaiveDateTime, params: &GeneralParameters) -> TariffBucket {
    match TariffSchedule::from_parameters(params) {
        Ok(schedule) => schedule.classify(timestamp),
        Err(e) => {
            warn!("Cannot classify {timestamp}: {e}");
            TariffBucket::OffPeak
        }
    }
}
