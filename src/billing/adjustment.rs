//! Billing constant and losses applied to aggregated quantities.

use serde::{Deserialize, Serialize};

use crate::billing::aggregate::{AggregatedQuantity, QuantityRole};
use crate::constants::LOSSES_MULTIPLIER;

/// How the meter's billing constant relates to demand readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstantKind {
    /// Readings are the quantity itself: demand uses K.
    #[default]
    Quantity,
    /// Readings are EAC energy per 15 min: demand uses K/4.
    QuantityEac,
    /// Readings are pulses: demand uses K*4.
    Pulse,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BillingConstant {
    pub k: f64,
    #[serde(default)]
    pub kind: ConstantKind,
    /// Adds 2.5% for transformer losses.
    #[serde(default)]
    pub apply_losses: bool,
}

impl Default for BillingConstant {
    fn default() -> Self {
        Self {
            k: 1.0,
            kind: ConstantKind::Quantity,
            apply_losses: false,
        }
    }
}

fn is_corrected_quantity(name: &str) -> bool {
    let name = name.trim();
    name.eq_ignore_ascii_case("UFER") || name.eq_ignore_ascii_case("DMCR")
}

impl BillingConstant {
    /// Multiplier for a quantity, losses included.
    pub fn factor(&self, name: &str, role: QuantityRole) -> f64 {
        let k = match role {
            QuantityRole::Demand if !is_corrected_quantity(name) => match self.kind {
                ConstantKind::Quantity => self.k,
                ConstantKind::QuantityEac => self.k / 4.0,
                ConstantKind::Pulse => self.k * 4.0,
            },
            _ => self.k,
        };
        if self.apply_losses {
            k * LOSSES_MULTIPLIER
        } else {
            k
        }
    }

    /// Final billed values of an aggregated quantity.
    pub fn adjust(&self, quantity: &AggregatedQuantity, role: QuantityRole) -> AggregatedQuantity {
        let factor = self.factor(&quantity.name, role);
        AggregatedQuantity {
            name: quantity.name.clone(),
            reducer: quantity.reducer,
            values: quantity.values.map(|v| v * factor),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::billing::aggregate::{BucketValues, Reducer};

    fn quantity(name: &str) -> AggregatedQuantity {
        AggregatedQuantity {
            name: name.into(),
            reducer: Reducer::Max,
            values: BucketValues {
                peak: 100.0,
                off_peak: 40.0,
                reserved: 0.0,
            },
        }
    }

    #[test]
    fn test_demand_factor_by_kind() {
        let mut c = BillingConstant { k: 8.0, ..Default::default() };
        assert_eq!(c.factor("kW", QuantityRole::Demand), 8.0);
        c.kind = ConstantKind::QuantityEac;
        assert_eq!(c.factor("kW", QuantityRole::Demand), 2.0);
        c.kind = ConstantKind::Pulse;
        assert_eq!(c.factor("kW", QuantityRole::Demand), 32.0);
        assert_eq!(c.factor("kWh", QuantityRole::Energy), 8.0);
        assert_eq!(c.factor("DMCR", QuantityRole::Demand), 8.0);
    }

    #[test]
    fn test_losses() {
        let c = BillingConstant {
            k: 2.0,
            kind: ConstantKind::Quantity,
            apply_losses: true,
        };
        let adjusted = c.adjust(&quantity("kWh"), QuantityRole::Energy);
        assert!((adjusted.values.peak - 205.0).abs() < 1e-9);
        assert!((adjusted.values.off_peak - 82.0).abs() < 1e-9);
        assert_eq!(adjusted.values.reserved, 0.0);
    }
}
