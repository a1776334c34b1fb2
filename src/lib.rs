//! # abnt-rs - A Rust Crate for ABNT Electricity-Meter Dumps
//!
//! The abnt-rs crate decodes the fixed-width memory dump exported by
//! Brazilian-standard (ABNT) electricity meters and turns it into billing
//! quantities per time-of-use bucket.
//!
//! ## Features
//!
//! - Total fixed-width field extraction with 1-based positions
//! - Decode the general parameters block from a declarative offset table
//! - Decode the power-outage and configuration-change logs
//! - Rebuild the mass-memory time series with absolute timestamps
//! - Classify samples as peak, off-peak or reserved
//! - Aggregate energy and demand quantities, with rolling power-factor correction (UFER/DMCR)
//! - Parse portal consumption/demand reports and build the confirmation sheet
//! - Support for logging, configuration and error handling
//!
//! ## Usage
//!
//! ```toml
//! [dependencies]
//! abnt-rs = "0.1.0"
//! ```
//!
//! ```rust
//! use abnt_rs::{parse_general_parameters, parse_outages, MeterDump};
//!
//! let text = "12345678";
//! let params = parse_general_parameters(text);
//! assert_eq!(params.meter_id, "12345678");
//! assert!(parse_outages(text, &params.meter_id).is_empty());
//! assert!(MeterDump::parse(text).mass_memory.is_empty());
//! ```

pub mod billing;
pub mod config;
pub mod constants;
pub mod dump;
pub mod error;
pub mod layout;
pub mod logging;
pub mod reports;

pub use crate::config::AnalyzerConfig;
pub use crate::dump::MeterDump;
pub use crate::error::AbntError;
pub use crate::logging::{init_logger, log_info};

// Dump layout
pub use layout::{
    extract, parse_changes, parse_general_parameters, parse_mass_memory, parse_outages, ChangeRecord,
    GeneralParameters, MassMemorySample, OutageRecord, RawBuffer,
};

// Billing
pub use billing::{
    aggregate, classify_tariff_bucket, correct_power_factor, AggregatedQuantity, BillingConstant, BucketValues,
    EnergyInterval, PowerFactorPoint, QuantityRole, Reducer, TariffBucket, TariffSchedule,
};

// Portal reports
pub use reports::{build_confirmation_sheet, extract_client_info, parse_portal_report, summarize};
