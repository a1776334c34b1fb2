//! Tests for decoding the general parameters block.

mod common;

use abnt_rs::layout::params::{BatteryStatus, ChannelConstant};
use abnt_rs::layout::{Field, QuantityKind};
use abnt_rs::parse_general_parameters;
use common::DumpBuilder;

fn full_dump() -> String {
    DumpBuilder::new()
        .field(Field::MeterId, "12345678")
        .field(Field::ReadingHour, "10")
        .field(Field::ReadingMinute, "30")
        .field(Field::ReadingSecond, "05")
        .field(Field::ReadingDay, "02")
        .field(Field::ReadingMonth, "01")
        .field(Field::ReadingYear, "25")
        .field(Field::MassMemoryHour, "10")
        .field(Field::MassMemoryMinute, "15")
        .field(Field::DemandResetHour, "00")
        .field(Field::DemandResetMinute, "01")
        .field(Field::DemandResetSecond, "02")
        .field(Field::DemandResetDay, "01")
        .field(Field::DemandResetMonth, "12")
        .field(Field::DemandResetYear, "24")
        .field(Field::PeakStartHour, "17")
        .field(Field::PeakStartMinute, "30")
        .field(Field::OffPeakStartHour, "20")
        .field(Field::OffPeakStartMinute, "30")
        .field(Field::ReservedStartHour, "21")
        .field(Field::ReservedStartMinute, "30")
        .field(Field::DemandInterval, "15")
        .field(Field::Channel1Multiplier, "000001")
        .field(Field::Channel1Divisor, "000002")
        .field(Field::Channel2Multiplier, "000003")
        .field(Field::Channel2Divisor, "000004")
        .field(Field::Channel3Multiplier, "000005")
        .field(Field::Channel3Divisor, "000006")
        .field(Field::Battery, "01")
        .field(Field::ReservedActive, "01")
        .field(Field::MemoryLoad, "0042")
        .field(Field::HardwareVersion, "0103")
        .field(Field::DaylightSavingDay, "15")
        .field(Field::DaylightSavingMonth, "10")
        .field(Field::SegmentSet1Day, "01")
        .field(Field::SegmentSet1Month, "03")
        .field(Field::SegmentSet2Day, "01")
        .field(Field::SegmentSet2Month, "11")
        .field(Field::SegmentSet2PeakHour, "18")
        .field(Field::SegmentSet2PeakMinute, "00")
        .field(Field::SegmentSet2OffPeakHour, "21")
        .field(Field::SegmentSet2OffPeakMinute, "00")
        .field(Field::SegmentSet2ReservedHour, "22")
        .field(Field::SegmentSet2ReservedMinute, "00")
        .field(Field::Channel1Quantity, "01")
        .field(Field::Channel2Quantity, "10")
        .field(Field::Channel3Quantity, "20")
        .field(Field::MassMemoryInterval, "05")
        .field(Field::ReservedSaturday, "01")
        .field(Field::ReservedSunday, "02")
        .field(Field::ReservedHoliday, "03")
        .field(Field::InductiveHour, "06")
        .field(Field::InductiveMinute, "00")
        .field(Field::CapacitiveHour, "23")
        .field(Field::CapacitiveMinute, "30")
        .holiday(0, "010125")
        .holiday(4, "250325")
        .build()
}

#[test]
fn test_round_trip_recovers_placed_values() {
    let p = parse_general_parameters(&full_dump());

    assert_eq!(p.meter_id, "12345678");
    assert_eq!(p.reading_timestamp, "02/01/25 10:30:05");
    assert_eq!(p.mass_memory_timestamp, "02/01/25 10:15:00");
    assert_eq!(p.mass_memory_interval, "05");
    assert_eq!(p.demand_interval, "15");
    assert_eq!(
        p.channel_constants,
        [
            ChannelConstant { multiplier: "000001".into(), divisor: "000002".into() },
            ChannelConstant { multiplier: "000003".into(), divisor: "000004".into() },
            ChannelConstant { multiplier: "000005".into(), divisor: "000006".into() },
        ]
    );
    assert!(!p.constants_consistent());
    assert_eq!(p.battery, BatteryStatus::Bad);
    assert_eq!(p.memory_load, "0042");
    assert_eq!(p.hardware_version, "0103");
    assert!(p.reserved_active);
    assert_eq!(p.reserved_start, "21:30");
    assert_eq!(p.reserved_saturday, "01");
    assert_eq!(p.reserved_sunday, "02");
    assert_eq!(p.reserved_holiday, "03");
    assert_eq!(p.daylight_saving.as_deref(), Some("15/10"));
    assert_eq!(p.peak_start, "17:30");
    assert_eq!(p.off_peak_start, "20:30");
    assert_eq!(p.inductive_start, "06:00");
    assert_eq!(p.capacitive_start, "23:30");
    assert_eq!(p.demand_reset_date, "01/12/24");
    assert_eq!(p.demand_reset_time, "00:01:02");
    assert_eq!(p.holidays, vec!["01/01/25".to_string(), "25/03/25".to_string()]);
    assert_eq!(p.segment_set_1_start, "01/03");
    assert_eq!(p.segment_set_2_start, "01/11");
    assert_eq!(p.segment_set_2_peak_start, "18:00");
    assert_eq!(p.segment_set_2_off_peak_start, "21:00");
    assert_eq!(p.segment_set_2_reserved_start, "22:00");
    assert_eq!(p.channel_quantities, ["01".to_string(), "10".to_string(), "20".to_string()]);
}

#[test]
fn test_derived_accessors() {
    let p = parse_general_parameters(&full_dump());
    assert_eq!(p.mass_memory_interval_minutes().unwrap(), 5);
    assert_eq!(p.demand_interval_minutes().unwrap(), 15);
    assert_eq!(
        p.mass_memory_end().unwrap().format("%Y-%m-%d %H:%M:%S").to_string(),
        "2025-01-02 10:15:00"
    );
    assert_eq!(p.holiday_dates().len(), 2);
    assert_eq!(p.channel_quantity(1).unwrap().name, "Wh");
    assert_eq!(p.channel_quantity(3).unwrap().kind, QuantityKind::Instantaneous);
    assert!(p.channel_quantity(0).is_none());
    assert!(p.channel_quantity(4).is_none());
}

#[test]
fn test_parsing_is_idempotent() {
    let text = full_dump();
    assert_eq!(parse_general_parameters(&text), parse_general_parameters(&text));
}

#[test]
fn test_sentinels_on_zero_dump() {
    let p = parse_general_parameters(&DumpBuilder::new().build());
    assert_eq!(p.battery, BatteryStatus::Good);
    assert!(!p.reserved_active);
    assert_eq!(p.daylight_saving, None);
    assert!(p.holidays.is_empty());
    assert!(p.mass_memory_interval_minutes().is_err());
}

#[test]
fn test_line_breaks_do_not_shift_offsets() {
    let flat: String = full_dump().chars().filter(|c| *c != '\r' && *c != '\n').collect();
    assert_eq!(parse_general_parameters(&flat), parse_general_parameters(&full_dump()));
}

#[test]
fn test_truncated_dump_yields_partial_fields() {
    let p = parse_general_parameters("12345678000000103");
    assert_eq!(p.meter_id, "12345678");
    assert_eq!(p.reading_timestamp, "// 10:3:");
    assert_eq!(p.peak_start, ":");
    assert!(p.holidays.is_empty());
    assert_eq!(p.channel_quantities, [String::new(), String::new(), String::new()]);
}
