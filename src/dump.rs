//! Whole-dump decoding.
//!
//! [`MeterDump`] runs every decoder over one upload and keeps the results
//! together, which is what the analyzer views and the CLI consume.

use log::info;
use serde::Serialize;

use crate::billing::aggregate::BucketValues;
use crate::layout::extract::RawBuffer;
use crate::layout::mass_memory::{channel_consumption_kwh, outages_within, parse_mass_memory, MassMemorySample};
use crate::layout::params::{general_parameters_from_buffer, GeneralParameters};
use crate::layout::sections::{changes_from_buffer, outages_from_buffer, ChangeRecord, OutageRecord};

/// Everything decoded from one ABNT upload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeterDump {
    pub params: GeneralParameters,
    pub outages: Vec<OutageRecord>,
    pub changes: Vec<ChangeRecord>,
    pub mass_memory: Vec<MassMemorySample>,
}

impl MeterDump {
    /// Decodes an upload. Never fails; missing sections come back empty.
    pub fn parse(raw_text: &str) -> Self {
        let buffer = RawBuffer::from_upload(raw_text);
        let params = general_parameters_from_buffer(&buffer);
        let outages = outages_from_buffer(&buffer, &params.meter_id);
        let changes = changes_from_buffer(&buffer, &params.meter_id);
        let mass_memory = parse_mass_memory(raw_text, &params);
        info!(
            "Meter {}: {} outages, {} changes, {} mass memory samples",
            params.meter_id,
            outages.len(),
            changes.len(),
            mass_memory.len()
        );
        Self {
            params,
            outages,
            changes,
            mass_memory,
        }
    }

    /// Per-bucket kWh of an energy channel over the whole series.
    pub fn consumption_kwh(&self, channel: usize) -> Option<BucketValues> {
        channel_consumption_kwh(&self.mass_memory, channel, &self.params)
    }

    /// Outages inside the mass-memory span, where reconstructed timestamps may drift.
    pub fn suspect_outages(&self) -> Vec<&OutageRecord> {
        outages_within(&self.mass_memory, &self.outages)
    }
}
