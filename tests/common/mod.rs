// Synthetic dump builder shared by the integration tests
#![allow(dead_code)]

use abnt_rs::constants::*;
use abnt_rs::layout::{lookup_field, Field};

/// Size of the synthetic parameter area; covers every documented offset.
pub const DUMP_LEN: usize = 2400;

/// Builds a dump of `'0'` characters with values placed at 1-based positions.
pub struct DumpBuilder {
    buf: Vec<char>,
    mass_memory: Vec<String>,
}

impl DumpBuilder {
    pub fn new() -> Self {
        Self {
            buf: vec!['0'; DUMP_LEN],
            mass_memory: Vec::new(),
        }
    }

    pub fn set(mut self, position: usize, value: &str) -> Self {
        for (i, c) in value.chars().enumerate() {
            let idx = position - 1 + i;
            if idx >= self.buf.len() {
                self.buf.resize(idx + 1, '0');
            }
            self.buf[idx] = c;
        }
        self
    }

    pub fn field(self, field: Field, value: &str) -> Self {
        let (position, length) = lookup_field(field).unwrap();
        assert_eq!(value.chars().count(), length, "{field:?} takes {length} chars");
        self.set(position, value)
    }

    /// `slot` is 0-based; `text` is `hhmmssddmmyy` twice.
    pub fn outage(self, slot: usize, text: &str) -> Self {
        self.set(ABNT_OUTAGE_BASE + slot * ABNT_OUTAGE_SLOT_LEN, text)
    }

    /// `slot` is 0-based; `text` is code, reader, `hhmmss`, `ddmmyy`.
    pub fn change(self, slot: usize, text: &str) -> Self {
        self.set(ABNT_CHANGE_BASE + slot * ABNT_CHANGE_SLOT_LEN, text)
    }

    /// `slot` is 0-based; `ddmmyy`.
    pub fn holiday(self, slot: usize, ddmmyy: &str) -> Self {
        self.set(ABNT_HOLIDAY_BASE + slot * ABNT_HOLIDAY_SLOT_LEN, ddmmyy)
    }

    /// Appends mass-memory lines built from `readings` (24 per line).
    pub fn readings(mut self, readings: &[[u32; 3]]) -> Self {
        for chunk in readings.chunks(ABNT_MM_GROUPS_PER_LINE) {
            let mut line = String::from("SALV00000000");
            for r in chunk {
                line.push_str(&format!("{:04}{:04}{:04}", r[0], r[1], r[2]));
            }
            self.mass_memory.push(line);
        }
        self
    }

    /// The upload text: the parameter area broken into CRLF lines, then mass memory.
    pub fn build(&self) -> String {
        let mut out = String::new();
        for chunk in self.buf.chunks(100) {
            out.extend(chunk.iter());
            out.push_str("\r\n");
        }
        for line in &self.mass_memory {
            out.push_str(line);
            out.push('\n');
        }
        out
    }
}

/// Common parameters: 30-minute mass memory ending at `01/01/25 23:30:00`,
/// peak `17:30`-`20:30`, channels Wh / varind / v_a.
pub fn standard_dump() -> DumpBuilder {
    DumpBuilder::new()
        .field(Field::MeterId, "87654321")
        .field(Field::ReadingDay, "01")
        .field(Field::ReadingMonth, "01")
        .field(Field::ReadingYear, "25")
        .field(Field::ReadingHour, "23")
        .field(Field::ReadingMinute, "45")
        .field(Field::MassMemoryHour, "23")
        .field(Field::MassMemoryMinute, "30")
        .field(Field::MassMemoryInterval, "30")
        .field(Field::DemandInterval, "15")
        .field(Field::PeakStartHour, "17")
        .field(Field::PeakStartMinute, "30")
        .field(Field::OffPeakStartHour, "20")
        .field(Field::OffPeakStartMinute, "30")
        .field(Field::Channel1Quantity, "01")
        .field(Field::Channel2Quantity, "10")
        .field(Field::Channel3Quantity, "17")
}
