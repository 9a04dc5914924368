//! Capability dump parsing
//!
//! The reply to `\dump_caps` is a free-form list of `key: value` lines
//! describing the rig model and what it supports:
//!
//! ```text
//! Model name:     IC-7300
//! Mfg name:       Icom
//! Backend version:        20230328.0
//! Can set Frequency:      Y
//! Can get Mode:   Y
//! ```
//!
//! Only a handful of keys are understood. Everything else, including lines
//! without a colon, is skipped so a newer or partially understood dump never
//! prevents a connection from being established.

use std::collections::BTreeMap;

/// Prefix of keys that describe a supported operation
const CAN_PREFIX: &str = "can ";

/// Rig description built from a capability dump
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RigCapabilities {
    /// Model name (e.g. `IC-7300`)
    pub model_name: String,
    /// Manufacturer name (e.g. `Icom`)
    pub manufacturer: String,
    /// Daemon backend version string
    pub backend_version: String,
    /// Rig type (e.g. `Transceiver`)
    pub rig_type: String,
    /// Capability flags keyed by lower-cased operation name
    pub can: BTreeMap<String, bool>,
}

impl RigCapabilities {
    /// Parse the lines of a capability dump
    ///
    /// Never fails: unrecognised or malformed lines are ignored.
    pub fn parse<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut caps = RigCapabilities::default();
        for line in lines {
            caps.apply_line(line.as_ref());
        }
        caps
    }

    /// Apply a single dump line
    fn apply_line(&mut self, line: &str) {
        let Some((key, value)) = line.split_once(':') else {
            return;
        };

        let key = key.to_lowercase();
        match key.as_str() {
            "model name" => self.model_name = value.trim().to_string(),
            "mfg name" => self.manufacturer = value.trim().to_string(),
            "backend version" => self.backend_version = value.trim().to_string(),
            "rig type" => self.rig_type = value.trim().to_string(),
            _ => {
                if let Some(flag) = key.strip_prefix(CAN_PREFIX) {
                    let supported = value.ends_with('Y');
                    self.can.insert(flag.trim().to_string(), supported);
                }
            }
        }
    }

    /// Whether the dump declared an operation as supported
    ///
    /// The lookup is case-insensitive. Operations the dump did not mention
    /// are reported as unsupported.
    pub fn can(&self, operation: &str) -> bool {
        self.can
            .get(operation.trim().to_lowercase().as_str())
            .copied()
            .unwrap_or(false)
    }

    /// Iterate over all capability flags in sorted order
    pub fn flags(&self) -> impl Iterator<Item = (&str, bool)> {
        self.can.iter().map(|(k, v)| (k.as_str(), *v))
    }
}
