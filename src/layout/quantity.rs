//! Channel Quantity Codes
//!
//! Each of the three mass-memory channels declares the physical quantity it
//! records as a two-digit code in the general parameters block. Energy-type
//! quantities get a derived column (raw reading x 12) in the mass-memory
//! table; voltages and currents are kept raw.

use serde::Serialize;

/// Whether a channel quantity accumulates energy or samples an instantaneous value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum QuantityKind {
    Energy,
    Instantaneous,
}

/// Description of a channel quantity code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelQuantity {
    pub code: &'static str,
    pub name: &'static str,
    pub kind: QuantityKind,
}

impl ChannelQuantity {
    pub fn is_energy(&self) -> bool {
        self.kind == QuantityKind::Energy
    }
}

/// Channel quantity codes as stored at positions 2309-2314.
pub const CHANNEL_QUANTITY_CODES: &[(&str, &str, QuantityKind)] = &[
    ("01", "Wh", QuantityKind::Energy),
    ("10", "varind", QuantityKind::Energy),
    ("11", "varcap", QuantityKind::Energy),
    ("14", "-Wh", QuantityKind::Energy),
    ("15", "-varind", QuantityKind::Energy),
    ("16", "-varcap", QuantityKind::Energy),
    ("17", "v_a", QuantityKind::Instantaneous),
    ("18", "v_b", QuantityKind::Instantaneous),
    ("19", "v_c", QuantityKind::Instantaneous),
    ("20", "i_a", QuantityKind::Instantaneous),
    ("21", "i_b", QuantityKind::Instantaneous),
    ("22", "i_c", QuantityKind::Instantaneous),
];

static CHANNEL_QUANTITIES: once_cell::sync::Lazy<Vec<ChannelQuantity>> =
    once_cell::sync::Lazy::new(|| {
        CHANNEL_QUANTITY_CODES
            .iter()
            .map(|(code, name, kind)| ChannelQuantity {
                code: *code,
                name: *name,
                kind: *kind,
            })
            .collect()
    });

/// Looks up a channel quantity code.
pub fn lookup_quantity(code: &str) -> Option<&'static ChannelQuantity> {
    CHANNEL_QUANTITIES.iter().find(|q| q.code == code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_quantity_all_cases() {
        for (code, name, kind) in CHANNEL_QUANTITY_CODES {
            let q = lookup_quantity(code).unwrap();
            assert_eq!(q.name, *name);
            assert_eq!(q.kind, *kind);
        }
    }

    #[test]
    fn test_energy_codes() {
        let energy: Vec<_> = CHANNEL_QUANTITY_CODES
            .iter()
            .filter(|(_, _, k)| *k == QuantityKind::Energy)
            .map(|(c, _, _)| *c)
            .collect();
        assert_eq!(energy, vec!["01", "10", "11", "14", "15", "16"]);
    }

    #[test]
    fn test_unknown_code() {
        assert!(lookup_quantity("99").is_none());
        assert!(lookup_quantity("").is_none());
        assert!(lookup_quantity("1").is_none());
    }
}
