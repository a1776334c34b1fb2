//! Per-bucket aggregation of classified records.
//!
//! Energy quantities are summed, demand quantities take the maximum, and
//! UFER is always summed whatever role it arrives with. Not-a-number inputs
//! are ignored and an empty bucket is `0.0`.

use std::str::FromStr;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::billing::tariff::TariffBucket;
use crate::error::AbntError;

/// A record that has been assigned a tariff bucket and exposes named values.
pub trait BucketedRecord {
    fn bucket(&self) -> TariffBucket;

    /// Value of a column, `None` if the record has no such column.
    fn value(&self, column: &str) -> Option<f64>;
}

/// Semantic role of a quantity, which decides its reducer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuantityRole {
    Energy,
    Demand,
}

impl FromStr for QuantityRole {
    type Err = AbntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "energy" | "consumo" | "sum" => Ok(QuantityRole::Energy),
            "demand" | "demanda" | "max" => Ok(QuantityRole::Demand),
            other => Err(AbntError::field("quantity_role", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Reducer {
    Sum,
    Max,
}

/// UFER is always summed; other demand quantities use the maximum.
pub fn select_reducer(column: &str, role: QuantityRole) -> Reducer {
    if column.trim().eq_ignore_ascii_case("UFER") {
        return Reducer::Sum;
    }
    match role {
        QuantityRole::Demand => Reducer::Max,
        QuantityRole::Energy => Reducer::Sum,
    }
}

/// One value per tariff bucket.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BucketValues {
    pub peak: f64,
    pub off_peak: f64,
    pub reserved: f64,
}

impl BucketValues {
    pub fn get(&self, bucket: TariffBucket) -> f64 {
        match bucket {
            TariffBucket::Peak => self.peak,
            TariffBucket::OffPeak => self.off_peak,
            TariffBucket::Reserved => self.reserved,
        }
    }

    pub fn get_mut(&mut self, bucket: TariffBucket) -> &mut f64 {
        match bucket {
            TariffBucket::Peak => &mut self.peak,
            TariffBucket::OffPeak => &mut self.off_peak,
            TariffBucket::Reserved => &mut self.reserved,
        }
    }

    /// Applies `f` to every bucket.
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            peak: f(self.peak),
            off_peak: f(self.off_peak),
            reserved: f(self.reserved),
        }
    }

    pub fn total(&self) -> f64 {
        self.peak + self.off_peak + self.reserved
    }
}

/// Result of reducing one column over its buckets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedQuantity {
    pub name: String,
    pub reducer: Reducer,
    #[serde(flatten)]
    pub values: BucketValues,
}

/// Reduces `(bucket, value)` pairs. NaN values are skipped; empty buckets are `0.0`.
pub fn reduce_by_bucket<I>(items: I, reducer: Reducer) -> BucketValues
where
    I: IntoIterator<Item = (TariffBucket, f64)>,
{
    let mut acc: [Option<f64>; 3] = [None; 3];
    for (bucket, value) in items {
        if value.is_nan() {
            continue;
        }
        let slot = &mut acc[bucket as usize];
        *slot = Some(match (*slot, reducer) {
            (None, _) => value,
            (Some(a), Reducer::Sum) => a + value,
            (Some(a), Reducer::Max) => a.max(value),
        });
    }
    let [peak, off_peak, reserved] = acc.map(|v| v.filter(|x| !x.is_nan()).unwrap_or(0.0));
    BucketValues {
        peak,
        off_peak,
        reserved,
    }
}

/// Aggregates one column of classified records with an explicit role.
pub fn aggregate_by_role<R: BucketedRecord>(
    records: &[R],
    column: &str,
    role: QuantityRole,
) -> AggregatedQuantity {
    let reducer = select_reducer(column, role);
    let values = reduce_by_bucket(
        records
            .iter()
            .filter_map(|r| r.value(column).map(|v| (r.bucket(), v))),
        reducer,
    );
    AggregatedQuantity {
        name: column.to_string(),
        reducer,
        values,
    }
}

/// Aggregates one column of classified records.
///
/// `reducer_hint` names the quantity's role (`consumo`/`energy` or
/// `demanda`/`demand`); an unknown hint is treated as energy.
pub fn aggregate<R: BucketedRecord>(records: &[R], column: &str, reducer_hint: &str) -> AggregatedQuantity {
    let role = reducer_hint.parse().unwrap_or_else(|e| {
        debug!("{e}; treating '{column}' as energy");
        QuantityRole::Energy
    });
    aggregate_by_role(records, column, role)
}
