//! # Repeating Sections
//!
//! The dump carries two fixed-size logs of 15 slots each: power outages
//! (24 characters per slot) and configuration changes (20 characters per
//! slot). An all-zero slot is an unused entry. Each slot is decoded with
//! `nom` combinators over the slot text; a slot that does not decode is
//! skipped and the rest of the section still parses.
//!
//! Timestamps inside a slot are stored as `hhmmss` followed by `ddmmyy` and
//! are rendered as `dd/mm/yy HH:MM:SS`.

use chrono::{Duration, NaiveDateTime};
use log::debug;
use nom::{
    bytes::complete::{take, take_while_m_n},
    combinator::{all_consuming, map, map_res},
    sequence::tuple,
    IResult,
};
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::AbntError;
use crate::layout::change_codes::describe_change;
use crate::layout::extract::RawBuffer;

/// One power outage taken from the outage log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutageRecord {
    pub meter: String,
    /// `dd/mm/yy HH:MM:SS`
    pub start: String,
    /// `dd/mm/yy HH:MM:SS`
    pub end: String,
}

impl OutageRecord {
    pub fn start_datetime(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.start, ABNT_TIMESTAMP_FORMAT).ok()
    }

    pub fn end_datetime(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.end, ABNT_TIMESTAMP_FORMAT).ok()
    }

    /// Time without power; `None` if either timestamp is unparsable.
    pub fn duration(&self) -> Option<Duration> {
        Some(self.end_datetime()? - self.start_datetime()?)
    }
}

/// One entry of the configuration-change log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub meter: String,
    /// Serial of the reading device that made the change.
    pub reader: String,
    pub code: u8,
    pub description: String,
    /// `dd/mm/yy HH:MM:SS`
    pub timestamp: String,
}

fn two_chars(input: &str) -> IResult<&str, &str> {
    take(2usize)(input)
}

/// `hhmmss` + `ddmmyy` -> `dd/mm/yy HH:MM:SS`
fn slot_timestamp(input: &str) -> IResult<&str, String> {
    map(
        tuple((two_chars, two_chars, two_chars, two_chars, two_chars, two_chars)),
        |(hh, mi, ss, dd, mo, yy)| format!("{dd}/{mo}/{yy} {hh}:{mi}:{ss}"),
    )(input)
}

fn change_code(input: &str) -> IResult<&str, u8> {
    map_res(take_while_m_n(2, 2, |c: char| c.is_ascii_digit()), str::parse::<u8>)(input)
}

/// Decodes one 24-character outage slot.
pub fn parse_outage_slot(slot: &str, meter: &str) -> Result<OutageRecord, AbntError> {
    let (_, (start, end)) = all_consuming(tuple((slot_timestamp, slot_timestamp)))(slot)
        .map_err(|_| AbntError::field("outage_slot", slot))?;
    Ok(OutageRecord {
        meter: meter.to_string(),
        start,
        end,
    })
}

/// Decodes one 20-character change slot.
pub fn parse_change_slot(slot: &str, meter: &str) -> Result<ChangeRecord, AbntError> {
    let (_, (code, reader, timestamp)) =
        all_consuming(tuple((change_code, take(6usize), slot_timestamp)))(slot)
            .map_err(|_| AbntError::field("change_slot", slot))?;
    Ok(ChangeRecord {
        meter: meter.to_string(),
        reader: reader.to_string(),
        code,
        description: describe_change(code),
        timestamp,
    })
}

fn is_placeholder(slot: &str) -> bool {
    slot.chars().all(|c| c == '0')
}

/// Non-placeholder slots of a section, with their 0-based slot index.
fn occupied_slots(buffer: &RawBuffer, base: usize, slot_len: usize) -> impl Iterator<Item = (usize, &str)> {
    (0..ABNT_SECTION_SLOTS).filter_map(move |i| {
        let slot = buffer.field(base + i * slot_len, slot_len);
        if slot.chars().count() < slot_len {
            if !slot.is_empty() {
                debug!("Slot {i} truncated at end of buffer: '{slot}'");
            }
            return None;
        }
        (!is_placeholder(slot)).then_some((i, slot))
    })
}

fn push_unique<T: PartialEq>(out: &mut Vec<T>, item: T) {
    if !out.contains(&item) {
        out.push(item);
    }
}

/// Decodes the outage log, skipping placeholders and collapsing duplicates.
pub fn parse_outages(raw_text: &str, meter_id: &str) -> Vec<OutageRecord> {
    outages_from_buffer(&RawBuffer::from_upload(raw_text), meter_id)
}

pub fn outages_from_buffer(buffer: &RawBuffer, meter_id: &str) -> Vec<OutageRecord> {
    let mut out = Vec::new();
    for (i, slot) in occupied_slots(buffer, ABNT_OUTAGE_BASE, ABNT_OUTAGE_SLOT_LEN) {
        match parse_outage_slot(slot, meter_id) {
            Ok(record) => push_unique(&mut out, record),
            Err(e) => debug!("Skipping outage slot {i}: {e}"),
        }
    }
    out
}

/// Decodes the change log, skipping placeholders, undecodable codes and duplicates.
pub fn parse_changes(raw_text: &str, meter_id: &str) -> Vec<ChangeRecord> {
    changes_from_buffer(&RawBuffer::from_upload(raw_text), meter_id)
}

pub fn changes_from_buffer(buffer: &RawBuffer, meter_id: &str) -> Vec<ChangeRecord> {
    let mut out = Vec::new();
    for (i, slot) in occupied_slots(buffer, ABNT_CHANGE_BASE, ABNT_CHANGE_SLOT_LEN) {
        match parse_change_slot(slot, meter_id) {
            Ok(record) => push_unique(&mut out, record),
            Err(e) => debug!("Skipping change slot {i}: {e}"),
        }
    }
    out
}
