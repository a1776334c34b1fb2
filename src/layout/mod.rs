//! ABNT dump layout: fixed-width extraction and the decoders built on it.

pub mod change_codes;
pub mod extract;
pub mod field_map;
pub mod mass_memory;
pub mod params;
pub mod quantity;
pub mod sections;

pub use change_codes::describe_change;
pub use extract::{decode_latin1, extract, RawBuffer};
pub use field_map::{decode_fields, lookup_field, Field, GENERAL_PARAMETER_FIELDS};
pub use mass_memory::{channel_consumption_kwh, filter_range, outages_within, parse_mass_memory, MassMemorySample};
pub use params::{parse_general_parameters, BatteryStatus, ChannelConstant, GeneralParameters};
pub use quantity::{lookup_quantity, ChannelQuantity, QuantityKind};
pub use sections::{parse_changes, parse_outages, ChangeRecord, OutageRecord};
