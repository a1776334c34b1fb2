//! Rolling power factor, UFER and DMCR.
//!
//! Each sample is evaluated over a trailing window of five samples (itself
//! and its four predecessors). Below the regulatory minimum of 0.92 the
//! correction factor `k = 0.92 / fp` gives:
//!
//! ```text
//! UFER = (k - 1) * net_active
//! DMCR = mean(active * 60 / interval) * k
//! ```
//!
//! Samples without a full window report zeros.

use serde::{Deserialize, Serialize};

use crate::constants::{MIN_POWER_FACTOR, POWER_FACTOR_WINDOW};
use crate::error::AbntError;

/// Energy registered during one integration interval.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EnergyInterval {
    pub active: f64,
    pub reactive_import: f64,
    pub reactive_export: f64,
}

impl EnergyInterval {
    pub fn new(active: f64, reactive_import: f64, reactive_export: f64) -> Self {
        Self {
            active,
            reactive_import,
            reactive_export,
        }
    }

    pub fn net_reactive(&self) -> f64 {
        self.reactive_import - self.reactive_export
    }
}

/// Point-in-time correction for one sample.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PowerFactorPoint {
    pub power_factor: f64,
    pub ufer: f64,
    pub dmcr: f64,
}

/// `na / sqrt(na² + nr²)`, or 0 when both are 0.
pub fn power_factor(net_active: f64, net_reactive: f64) -> f64 {
    if net_active == 0.0 && net_reactive == 0.0 {
        return 0.0;
    }
    net_active / (net_active * net_active + net_reactive * net_reactive).sqrt()
}

/// Evaluates the window that ends at `index`.
pub fn window_correction(
    intervals: &[EnergyInterval],
    index: usize,
    interval_minutes: u32,
) -> Result<PowerFactorPoint, AbntError> {
    if index + 1 < POWER_FACTOR_WINDOW || index >= intervals.len() {
        return Err(AbntError::InsufficientData {
            needed: POWER_FACTOR_WINDOW,
            available: (index + 1).min(intervals.len()),
        });
    }
    if interval_minutes == 0 {
        return Err(AbntError::ConfigurationInvalid("integration interval is zero".into()));
    }
    let window = &intervals[index + 1 - POWER_FACTOR_WINDOW..=index];
    let net_active: f64 = window.iter().map(|i| i.active).sum();
    let net_reactive: f64 = window.iter().map(EnergyInterval::net_reactive).sum();
    let fp = power_factor(net_active, net_reactive);

    let mut point = PowerFactorPoint {
        power_factor: fp,
        ..Default::default()
    };
    if fp > 0.0 && fp < MIN_POWER_FACTOR {
        let k = MIN_POWER_FACTOR / fp;
        let per_hour = 60.0 / f64::from(interval_minutes);
        let mean_power = window.iter().map(|i| i.active * per_hour).sum::<f64>() / window.len() as f64;
        point.ufer = (k - 1.0) * net_active;
        point.dmcr = mean_power * k;
    }
    Ok(point)
}

/// One [`PowerFactorPoint`] per interval, zeros where the window is incomplete.
pub fn correct_power_factor(intervals: &[EnergyInterval], interval_minutes: u32) -> Vec<PowerFactorPoint> {
    (0..intervals.len())
        .map(|k| window_correction(intervals, k, interval_minutes).unwrap_or_default())
        .collect()
}
