//! General Parameters Offset Table
//!
//! This module holds the position of every field of the ABNT general
//! parameters block as data: one row per field, `(field, position, length)`,
//! 1-based positions in the line-break-free buffer. The table is the format
//! contract; [`decode_fields`] is the single loop that applies it.

use std::collections::HashMap;

use crate::layout::extract::RawBuffer;

/// Fields of the general parameters block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    MeterId,
    ReadingHour,
    ReadingMinute,
    ReadingSecond,
    ReadingDay,
    ReadingMonth,
    ReadingYear,
    MassMemoryHour,
    MassMemoryMinute,
    MassMemorySecond,
    DemandResetHour,
    DemandResetMinute,
    DemandResetDay,
    DemandResetMonth,
    DemandResetYear,
    DemandResetSecond,
    PeakStartHour,
    PeakStartMinute,
    OffPeakStartHour,
    OffPeakStartMinute,
    ReservedStartHour,
    ReservedStartMinute,
    DemandInterval,
    Channel1Multiplier,
    Channel1Divisor,
    Channel2Multiplier,
    Channel2Divisor,
    Channel3Multiplier,
    Channel3Divisor,
    Battery,
    ReservedActive,
    MemoryLoad,
    HardwareVersion,
    DaylightSavingDay,
    DaylightSavingMonth,
    SegmentSet1Day,
    SegmentSet1Month,
    SegmentSet2Day,
    SegmentSet2Month,
    SegmentSet2PeakHour,
    SegmentSet2PeakMinute,
    SegmentSet2OffPeakHour,
    SegmentSet2OffPeakMinute,
    SegmentSet2ReservedHour,
    SegmentSet2ReservedMinute,
    Channel1Quantity,
    Channel2Quantity,
    Channel3Quantity,
    MassMemoryInterval,
    ReservedSaturday,
    ReservedSunday,
    ReservedHoliday,
    InductiveHour,
    InductiveMinute,
    CapacitiveHour,
    CapacitiveMinute,
}

/// `(field, position, length)` for every general parameter.
pub const GENERAL_PARAMETER_FIELDS: &[(Field, usize, usize)] = &[
    (Field::MeterId, 1, 8),
    (Field::ReadingHour, 15, 2),
    (Field::ReadingMinute, 17, 2),
    (Field::ReadingSecond, 19, 2),
    (Field::ReadingDay, 21, 2),
    (Field::ReadingMonth, 23, 2),
    (Field::ReadingYear, 25, 2),
    (Field::MassMemoryHour, 29, 2),
    (Field::MassMemoryMinute, 31, 2),
    (Field::MassMemorySecond, 33, 2),
    (Field::DemandResetHour, 41, 2),
    (Field::DemandResetMinute, 43, 2),
    (Field::DemandResetDay, 47, 2),
    (Field::DemandResetMonth, 49, 2),
    (Field::DemandResetYear, 51, 2),
    (Field::DemandResetSecond, 55, 2),
    (Field::PeakStartHour, 113, 2),
    (Field::PeakStartMinute, 115, 2),
    (Field::OffPeakStartHour, 121, 2),
    (Field::OffPeakStartMinute, 123, 2),
    (Field::ReservedStartHour, 141, 2),
    (Field::ReservedStartMinute, 143, 2),
    (Field::DemandInterval, 167, 2),
    (Field::Channel1Multiplier, 261, 6),
    (Field::Channel1Divisor, 267, 6),
    (Field::Channel2Multiplier, 273, 6),
    (Field::Channel2Divisor, 279, 6),
    (Field::Channel3Multiplier, 285, 6),
    (Field::Channel3Divisor, 291, 6),
    (Field::Battery, 297, 2),
    (Field::ReservedActive, 303, 2),
    (Field::MemoryLoad, 1741, 4),
    (Field::HardwareVersion, 1751, 4),
    (Field::DaylightSavingDay, 2233, 2),
    (Field::DaylightSavingMonth, 2235, 2),
    (Field::SegmentSet1Day, 2239, 2),
    (Field::SegmentSet1Month, 2241, 2),
    (Field::SegmentSet2Day, 2243, 2),
    (Field::SegmentSet2Month, 2245, 2),
    (Field::SegmentSet2PeakHour, 2255, 2),
    (Field::SegmentSet2PeakMinute, 2257, 2),
    (Field::SegmentSet2OffPeakHour, 2271, 2),
    (Field::SegmentSet2OffPeakMinute, 2273, 2),
    (Field::SegmentSet2ReservedHour, 2287, 2),
    (Field::SegmentSet2ReservedMinute, 2289, 2),
    (Field::Channel1Quantity, 2309, 2),
    (Field::Channel2Quantity, 2311, 2),
    (Field::Channel3Quantity, 2313, 2),
    (Field::MassMemoryInterval, 2317, 2),
    (Field::ReservedSaturday, 2323, 2),
    (Field::ReservedSunday, 2325, 2),
    (Field::ReservedHoliday, 2327, 2),
    (Field::InductiveHour, 2341, 2),
    (Field::InductiveMinute, 2343, 2),
    (Field::CapacitiveHour, 2349, 2),
    (Field::CapacitiveMinute, 2351, 2),
];

/// Looks up the `(position, length)` of a field.
pub fn lookup_field(field: Field) -> Option<(usize, usize)> {
    GENERAL_PARAMETER_FIELDS
        .iter()
        .find(|(f, _, _)| *f == field)
        .map(|(_, pos, len)| (*pos, *len))
}

/// Raw field values of one dump, keyed by [`Field`].
#[derive(Debug, Clone, Default)]
pub struct DecodedFields<'a> {
    values: HashMap<Field, &'a str>,
}

impl<'a> DecodedFields<'a> {
    /// Raw text of a field; empty when the buffer ends before it.
    pub fn get(&self, field: Field) -> &'a str {
        self.values.get(&field).copied().unwrap_or("")
    }

    /// Joins several fields with a separator, e.g. day/month/year.
    pub fn join(&self, fields: &[Field], separator: &str) -> String {
        fields
            .iter()
            .map(|f| self.get(*f))
            .collect::<Vec<_>>()
            .join(separator)
    }
}

/// Applies [`GENERAL_PARAMETER_FIELDS`] to a buffer.
pub fn decode_fields(buffer: &RawBuffer) -> DecodedFields<'_> {
    let values = GENERAL_PARAMETER_FIELDS
        .iter()
        .map(|(field, pos, len)| (*field, buffer.field(*pos, *len)))
        .collect();
    DecodedFields { values }
}
