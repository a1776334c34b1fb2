//! Time-of-use classification and billing quantities.

pub mod adjustment;
pub mod aggregate;
pub mod power_factor;
pub mod tariff;

pub use adjustment::{BillingConstant, ConstantKind};
pub use aggregate::{
    aggregate, aggregate_by_role, select_reducer, AggregatedQuantity, BucketValues, BucketedRecord, QuantityRole,
    Reducer,
};
pub use power_factor::{correct_power_factor, EnergyInterval, PowerFactorPoint};
pub use tariff::{classify_tariff_bucket, TariffBucket, TariffSchedule};
