//! Tests for per-bucket aggregation and billing adjustment.

use abnt_rs::billing::aggregate::{aggregate_by_role, select_reducer, BucketedRecord};
use abnt_rs::billing::ConstantKind;
use abnt_rs::{aggregate, BillingConstant, BucketValues, MassMemorySample, QuantityRole, Reducer, TariffBucket};

#[derive(Debug)]
struct Reading {
    bucket: TariffBucket,
    kw: f64,
    ufer: f64,
}

impl BucketedRecord for Reading {
    fn bucket(&self) -> TariffBucket {
        self.bucket
    }

    fn value(&self, column: &str) -> Option<f64> {
        match column {
            "kW" => Some(self.kw),
            "UFER" => Some(self.ufer),
            _ => None,
        }
    }
}

fn readings() -> Vec<Reading> {
    vec![
        Reading { bucket: TariffBucket::Peak, kw: 120.0, ufer: 1.5 },
        Reading { bucket: TariffBucket::Peak, kw: 100.0, ufer: 2.5 },
        Reading { bucket: TariffBucket::OffPeak, kw: 80.0, ufer: 0.5 },
        Reading { bucket: TariffBucket::Reserved, kw: f64::NAN, ufer: f64::NAN },
    ]
}

#[test]
fn test_empty_input_yields_zeros() {
    let empty: Vec<MassMemorySample> = Vec::new();
    for column in ["channel_1", "derived_2", "UFER", "anything"] {
        for hint in ["consumo", "demanda", ""] {
            assert_eq!(aggregate(&empty, column, hint).values, BucketValues::default());
        }
    }
}

#[test]
fn test_ufer_is_always_summed() {
    assert_eq!(select_reducer("UFER", QuantityRole::Demand), Reducer::Sum);
    assert_eq!(select_reducer(" ufer ", QuantityRole::Demand), Reducer::Sum);
    assert_eq!(select_reducer("kW", QuantityRole::Demand), Reducer::Max);
    assert_eq!(select_reducer("kWh", QuantityRole::Energy), Reducer::Sum);

    let ufer = aggregate(&readings(), "UFER", "demanda");
    assert_eq!(ufer.reducer, Reducer::Sum);
    assert_eq!(ufer.values.peak, 4.0);
    assert_eq!(ufer.values.off_peak, 0.5);
    assert_eq!(ufer.values.reserved, 0.0);
}

#[test]
fn test_demand_takes_maximum() {
    let kw = aggregate_by_role(&readings(), "kW", QuantityRole::Demand);
    assert_eq!(kw.values, BucketValues { peak: 120.0, off_peak: 80.0, reserved: 0.0 });
}

#[test]
fn test_unknown_hint_is_energy() {
    let kw = aggregate(&readings(), "kW", "???");
    assert_eq!(kw.reducer, Reducer::Sum);
    assert_eq!(kw.values.peak, 220.0);
}

#[test]
fn test_billing_adjustment_of_aggregate() {
    let kw = aggregate_by_role(&readings(), "kW", QuantityRole::Demand);
    let constant = BillingConstant {
        k: 2.0,
        kind: ConstantKind::Pulse,
        apply_losses: false,
    };
    let billed = constant.adjust(&kw, QuantityRole::Demand);
    assert_eq!(billed.values.peak, 960.0);
    assert_eq!(billed.name, "kW");
    assert_eq!(billed.reducer, Reducer::Max);
}

#[test]
fn test_aggregated_quantity_serializes_flat() {
    let kw = aggregate_by_role(&readings(), "kW", QuantityRole::Demand);
    let json = serde_json::to_value(&kw).unwrap();
    assert_eq!(json["name"], "kW");
    assert_eq!(json["reducer"], "Max");
    assert_eq!(json["peak"], 120.0);
    assert_eq!(json["reserved"], 0.0);
}
