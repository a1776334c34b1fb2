//! ABNT Dump Format Constants
//!
//! This module defines the section geometry of the ABNT meter memory dump and
//! the regulatory constants used by the billing computations. Per-field
//! offsets of the general parameters block live in
//! [`crate::layout::field_map`].

// ----------------------------------------------------------------------------
// Repeating sections (1-based positions in the line-break-free buffer)
// ----------------------------------------------------------------------------

/// Number of slots in each repeating section
pub const ABNT_SECTION_SLOTS: usize = 15;

/// First position of the power-outage log
pub const ABNT_OUTAGE_BASE: usize = 329;

/// Width of one power-outage slot (start and end timestamp)
pub const ABNT_OUTAGE_SLOT_LEN: usize = 24;

/// First position of the configuration-change log
pub const ABNT_CHANGE_BASE: usize = 1927;

/// Width of one configuration-change slot
pub const ABNT_CHANGE_SLOT_LEN: usize = 20;

/// First position of the holiday table
pub const ABNT_HOLIDAY_BASE: usize = 171;

/// Width of one holiday entry (ddmmyy)
pub const ABNT_HOLIDAY_SLOT_LEN: usize = 6;

// ----------------------------------------------------------------------------
// Mass memory lines
// ----------------------------------------------------------------------------

/// Line prefixes that mark a mass-memory record
pub const ABNT_MM_MARKERS: [&str; 2] = ["SALV", "CONT"];

/// 1-based position of the first reading group inside a mass-memory line
pub const ABNT_MM_FIRST_GROUP: usize = 13;

/// Reading groups per mass-memory line
pub const ABNT_MM_GROUPS_PER_LINE: usize = 24;

/// Width of one reading group (three channels)
pub const ABNT_MM_GROUP_LEN: usize = 12;

/// Width of one channel reading inside a group
pub const ABNT_MM_READING_LEN: usize = 4;

/// Factor applied to energy-channel readings to obtain the derived quantity
pub const ABNT_MM_ENERGY_FACTOR: f64 = 12.0;

// ----------------------------------------------------------------------------
// Sentinels
// ----------------------------------------------------------------------------

/// Battery code meaning "good"
pub const ABNT_BATTERY_OK: &str = "00";

/// Reserved-hours code meaning "inactive"
pub const ABNT_RESERVED_INACTIVE: &str = "00";

/// Daylight-saving value meaning "disabled"
pub const ABNT_DST_DISABLED: &str = "00/00";

/// Holiday value meaning "not set"
pub const ABNT_HOLIDAY_UNSET: &str = "00/00/00";

// ----------------------------------------------------------------------------
// Billing
// ----------------------------------------------------------------------------

/// Regulatory minimum power factor
pub const MIN_POWER_FACTOR: f64 = 0.92;

/// Samples in a power-factor window (current sample plus four predecessors)
pub const POWER_FACTOR_WINDOW: usize = 5;

/// Loss allowance added on request to billed quantities
pub const LOSSES_MULTIPLIER: f64 = 1.025;

/// Timestamp layout used throughout the dump (dd/mm/yy HH:MM:SS)
pub const ABNT_TIMESTAMP_FORMAT: &str = "%d/%m/%y %H:%M:%S";

/// Date layout of holiday entries (dd/mm/yy)
pub const ABNT_DATE_FORMAT: &str = "%d/%m/%y";
