//! General parameters block.
//!
//! One record per dump: meter identification, timestamps, intervals, channel
//! constants, tariff-hour boundaries, holiday table and hardware status. All
//! values keep the display form the meter uses (`dd/mm/yy`, `HH:MM`), so a
//! truncated dump shows up as empty or partial strings the caller can flag.

use std::collections::HashSet;

use chrono::{NaiveDate, NaiveDateTime};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::AbntError;
use crate::layout::extract::RawBuffer;
use crate::layout::field_map::{decode_fields, DecodedFields, Field};
use crate::layout::quantity::{lookup_quantity, ChannelQuantity};

/// Battery condition reported by the meter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BatteryStatus {
    Good,
    #[default]
    Bad,
}

/// Calibration constant of one channel, kept as the two raw 6-digit fields.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChannelConstant {
    pub multiplier: String,
    pub divisor: String,
}

impl std::fmt::Display for ChannelConstant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.multiplier, self.divisor)
    }
}

/// Decoded general parameters block.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GeneralParameters {
    pub meter_id: String,
    /// `dd/mm/yy HH:MM:SS`
    pub reading_timestamp: String,
    /// Timestamp of the newest mass-memory interval, `dd/mm/yy HH:MM:SS`.
    pub mass_memory_timestamp: String,
    /// Minutes, two digits as stored.
    pub mass_memory_interval: String,
    /// Minutes, two digits as stored.
    pub demand_interval: String,
    pub channel_constants: [ChannelConstant; 3],
    pub battery: BatteryStatus,
    pub memory_load: String,
    pub hardware_version: String,
    pub reserved_active: bool,
    /// `HH:MM`
    pub reserved_start: String,
    pub reserved_saturday: String,
    pub reserved_sunday: String,
    pub reserved_holiday: String,
    /// `dd/mm`, `None` when the meter reports it disabled.
    pub daylight_saving: Option<String>,
    /// `HH:MM`
    pub peak_start: String,
    /// Start of off-peak, i.e. the end of the peak window. `HH:MM`
    pub off_peak_start: String,
    pub inductive_start: String,
    pub capacitive_start: String,
    /// `dd/mm/yy`
    pub demand_reset_date: String,
    /// `HH:MM:SS`
    pub demand_reset_time: String,
    /// `dd/mm/yy`, unset entries removed.
    pub holidays: Vec<String>,
    /// `dd/mm`
    pub segment_set_1_start: String,
    /// `dd/mm`
    pub segment_set_2_start: String,
    pub segment_set_2_peak_start: String,
    pub segment_set_2_off_peak_start: String,
    pub segment_set_2_reserved_start: String,
    /// Two-digit quantity codes of channels 1-3.
    pub channel_quantities: [String; 3],
}

impl GeneralParameters {
    /// End timestamp of the mass-memory series.
    pub fn mass_memory_end(&self) -> Result<NaiveDateTime, AbntError> {
        NaiveDateTime::parse_from_str(&self.mass_memory_timestamp, ABNT_TIMESTAMP_FORMAT)
            .map_err(|_| AbntError::field("mass_memory_timestamp", &self.mass_memory_timestamp))
    }

    /// Mass-memory sampling interval in minutes; zero is rejected.
    pub fn mass_memory_interval_minutes(&self) -> Result<u32, AbntError> {
        parse_minutes("mass_memory_interval", &self.mass_memory_interval)
    }

    /// Demand integration interval in minutes; zero is rejected.
    pub fn demand_interval_minutes(&self) -> Result<u32, AbntError> {
        parse_minutes("demand_interval", &self.demand_interval)
    }

    /// Holiday dates that parse as `dd/mm/yy`; the rest are ignored.
    pub fn holiday_dates(&self) -> HashSet<NaiveDate> {
        self.holidays
            .iter()
            .filter_map(|h| match NaiveDate::parse_from_str(h, ABNT_DATE_FORMAT) {
                Ok(d) => Some(d),
                Err(_) => {
                    debug!("Ignoring holiday with invalid date '{h}'");
                    None
                }
            })
            .collect()
    }

    /// Quantity measured on channel 1-3, if the code is known.
    pub fn channel_quantity(&self, channel: usize) -> Option<&'static ChannelQuantity> {
        let code = self.channel_quantities.get(channel.checked_sub(1)?)?;
        lookup_quantity(code)
    }

    /// True when all three channel constants agree.
    pub fn constants_consistent(&self) -> bool {
        let [c1, c2, c3] = &self.channel_constants;
        c1 == c2 && c2 == c3
    }
}

fn parse_minutes(field: &'static str, raw: &str) -> Result<u32, AbntError> {
    match raw.trim().parse::<u32>() {
        Ok(m) if m > 0 => Ok(m),
        _ => Err(AbntError::field(field, raw)),
    }
}

/// Decodes the general parameters block of an upload.
///
/// Never fails: fields beyond the end of the buffer come back empty.
pub fn parse_general_parameters(raw_text: &str) -> GeneralParameters {
    let buffer = RawBuffer::from_upload(raw_text);
    general_parameters_from_buffer(&buffer)
}

/// As [`parse_general_parameters`], for an already flattened buffer.
pub fn general_parameters_from_buffer(buffer: &RawBuffer) -> GeneralParameters {
    let f = decode_fields(buffer);
    use Field::*;

    let reading_date = f.join(&[ReadingDay, ReadingMonth, ReadingYear], "/");
    let daylight_saving = f.join(&[DaylightSavingDay, DaylightSavingMonth], "/");

    GeneralParameters {
        meter_id: f.get(MeterId).to_string(),
        reading_timestamp: format!(
            "{} {}",
            reading_date,
            f.join(&[ReadingHour, ReadingMinute, ReadingSecond], ":")
        ),
        mass_memory_timestamp: format!(
            "{} {}",
            reading_date,
            f.join(&[MassMemoryHour, MassMemoryMinute, MassMemorySecond], ":")
        ),
        mass_memory_interval: f.get(MassMemoryInterval).to_string(),
        demand_interval: f.get(DemandInterval).to_string(),
        channel_constants: [
            channel_constant(&f, Channel1Multiplier, Channel1Divisor),
            channel_constant(&f, Channel2Multiplier, Channel2Divisor),
            channel_constant(&f, Channel3Multiplier, Channel3Divisor),
        ],
        battery: if f.get(Battery) == ABNT_BATTERY_OK {
            BatteryStatus::Good
        } else {
            BatteryStatus::Bad
        },
        memory_load: f.get(MemoryLoad).to_string(),
        hardware_version: f.get(HardwareVersion).to_string(),
        reserved_active: f.get(ReservedActive) != ABNT_RESERVED_INACTIVE,
        reserved_start: f.join(&[ReservedStartHour, ReservedStartMinute], ":"),
        reserved_saturday: f.get(ReservedSaturday).to_string(),
        reserved_sunday: f.get(ReservedSunday).to_string(),
        reserved_holiday: f.get(ReservedHoliday).to_string(),
        daylight_saving: (daylight_saving != ABNT_DST_DISABLED).then_some(daylight_saving),
        peak_start: f.join(&[PeakStartHour, PeakStartMinute], ":"),
        off_peak_start: f.join(&[OffPeakStartHour, OffPeakStartMinute], ":"),
        inductive_start: f.join(&[InductiveHour, InductiveMinute], ":"),
        capacitive_start: f.join(&[CapacitiveHour, CapacitiveMinute], ":"),
        demand_reset_date: f.join(&[DemandResetDay, DemandResetMonth, DemandResetYear], "/"),
        demand_reset_time: f.join(&[DemandResetHour, DemandResetMinute, DemandResetSecond], ":"),
        holidays: holidays(buffer),
        segment_set_1_start: f.join(&[SegmentSet1Day, SegmentSet1Month], "/"),
        segment_set_2_start: f.join(&[SegmentSet2Day, SegmentSet2Month], "/"),
        segment_set_2_peak_start: f.join(&[SegmentSet2PeakHour, SegmentSet2PeakMinute], ":"),
        segment_set_2_off_peak_start: f.join(&[SegmentSet2OffPeakHour, SegmentSet2OffPeakMinute], ":"),
        segment_set_2_reserved_start: f.join(&[SegmentSet2ReservedHour, SegmentSet2ReservedMinute], ":"),
        channel_quantities: [
            f.get(Channel1Quantity).to_string(),
            f.get(Channel2Quantity).to_string(),
            f.get(Channel3Quantity).to_string(),
        ],
    }
}

fn channel_constant(f: &DecodedFields<'_>, multiplier: Field, divisor: Field) -> ChannelConstant {
    ChannelConstant {
        multiplier: f.get(multiplier).to_string(),
        divisor: f.get(divisor).to_string(),
    }
}

fn holidays(buffer: &RawBuffer) -> Vec<String> {
    (0..ABNT_SECTION_SLOTS)
        .filter_map(|i| {
            let slot = buffer.field(ABNT_HOLIDAY_BASE + i * ABNT_HOLIDAY_SLOT_LEN, ABNT_HOLIDAY_SLOT_LEN);
            if slot.chars().count() < ABNT_HOLIDAY_SLOT_LEN {
                return None;
            }
            let date = format!(
                "{}/{}/{}",
                crate::layout::extract(slot, 1, 2),
                crate::layout::extract(slot, 3, 2),
                crate::layout::extract(slot, 5, 2)
            );
            (date != ABNT_HOLIDAY_UNSET).then_some(date)
        })
        .collect()
}
