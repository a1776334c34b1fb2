//! Analyzer settings that do not come from the dump itself.
//!
//! The confirmation sheet and the billing adjustment need tariff boundaries,
//! a holiday calendar and a billing constant supplied by the operator. They
//! are read from a JSON file; every key is optional.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use log::info;
use serde::{Deserialize, Serialize};

use crate::billing::adjustment::BillingConstant;
use crate::billing::tariff::{parse_boundary, TariffSchedule};
use crate::error::AbntError;

/// Environment variable naming a JSON configuration file.
pub const CONFIG_ENV_VAR: &str = "ABNT_CONFIG";

const HOLIDAY_FORMAT: &str = "%d/%m/%Y";

const DEFAULT_HOLIDAYS: &[&str] = &[
    "01/01/2025", "04/03/2025", "18/04/2025", "21/04/2025", "01/05/2025", "19/06/2025", "07/09/2025",
    "12/10/2025", "02/11/2025", "15/11/2025", "25/12/2025", "01/01/2026", "17/02/2026", "03/04/2026",
    "21/04/2026", "01/05/2026", "04/06/2026", "07/09/2026", "12/10/2026", "02/11/2026", "15/11/2026",
    "25/12/2026",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// `HH:MM`
    pub peak_start: String,
    /// `HH:MM`, start of off-peak.
    pub peak_end: String,
    pub capacitive_start: String,
    pub inductive_start: String,
    /// Integration interval of the task export rows, in minutes.
    pub interval_minutes: u32,
    /// National holidays, `dd/mm/yyyy`.
    pub holidays: Vec<String>,
    pub billing: BillingConstant,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            peak_start: "17:30".into(),
            peak_end: "20:30".into(),
            capacitive_start: "23:30".into(),
            inductive_start: "06:00".into(),
            interval_minutes: 15,
            holidays: DEFAULT_HOLIDAYS.iter().map(|d| d.to_string()).collect(),
            billing: BillingConstant::default(),
        }
    }
}

impl AnalyzerConfig {
    /// Reads and validates a JSON configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, AbntError> {
        let contents = fs::read_to_string(path.as_ref())?;
        let config: AnalyzerConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the file named by `ABNT_CONFIG`, or the defaults when unset.
    pub fn from_env() -> Result<Self, AbntError> {
        match std::env::var(CONFIG_ENV_VAR) {
            Ok(path) => {
                info!("Loading configuration from {path}");
                Self::load(path)
            }
            Err(_) => Ok(Self::default()),
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), AbntError> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), AbntError> {
        parse_boundary("peak_start", &self.peak_start)?;
        parse_boundary("peak_end", &self.peak_end)?;
        parse_boundary("capacitive_start", &self.capacitive_start)?;
        parse_boundary("inductive_start", &self.inductive_start)?;
        if self.interval_minutes == 0 {
            return Err(AbntError::ConfigurationInvalid("interval_minutes must be positive".into()));
        }
        if !(self.billing.k.is_finite() && self.billing.k > 0.0) {
            return Err(AbntError::ConfigurationInvalid(format!(
                "billing constant {} must be positive",
                self.billing.k
            )));
        }
        self.holiday_dates()?;
        Ok(())
    }

    pub fn holiday_dates(&self) -> Result<Vec<NaiveDate>, AbntError> {
        self.holidays
            .iter()
            .map(|h| {
                NaiveDate::parse_from_str(h.trim(), HOLIDAY_FORMAT)
                    .map_err(|_| AbntError::ConfigurationInvalid(format!("holiday '{h}' is not dd/mm/yyyy")))
            })
            .collect()
    }

    /// Peak/off-peak schedule used for the confirmation sheet.
    pub fn schedule(&self) -> Result<TariffSchedule, AbntError> {
        let peak_start = parse_boundary("peak_start", &self.peak_start)?;
        let peak_end = parse_boundary("peak_end", &self.peak_end)?;
        Ok(TariffSchedule::new(peak_start, peak_end).with_holidays(self.holiday_dates()?))
    }
}
