//! # Configuration and Persisted Site Data
//!
//! `Config` carries the policy knobs from spec.md §6; `SiteData` carries the
//! read-only-at-start `trunk_chan_map`/`group_map` tables. Both are plain
//! `serde` structs, loaded from JSON the way the teacher persists its
//! device/manufacturer caches.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::DmrError;
use crate::policy::PolicyConfig;
use crate::site::GroupEntry;

/// On-disk representation of [`PolicyConfig`] (spec.md §6 configuration knobs).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_true")]
    pub trunk_enabled: bool,
    #[serde(default = "default_true")]
    pub tune_group_calls: bool,
    #[serde(default = "default_true")]
    pub tune_private_calls: bool,
    #[serde(default)]
    pub tune_data_calls: bool,
    #[serde(default)]
    pub use_allow_list: bool,
    #[serde(default = "default_hang_time")]
    pub hang_time: u64,
    #[serde(default)]
    pub setmod_bw: u32,
    #[serde(default)]
    pub dmr_dmrla_is_set: bool,
    #[serde(default)]
    pub dmr_dmrla_n: u8,
}

fn default_true() -> bool {
    true
}

fn default_hang_time() -> u64 {
    5
}

impl Default for Config {
    fn default() -> Self {
        serde_json::from_str("{}").expect("empty object deserializes with field defaults")
    }
}

impl From<Config> for PolicyConfig {
    fn from(c: Config) -> Self {
        PolicyConfig {
            trunk_enabled: c.trunk_enabled,
            tune_group_calls: c.tune_group_calls,
            tune_private_calls: c.tune_private_calls,
            tune_data_calls: c.tune_data_calls,
            use_allow_list: c.use_allow_list,
            hang_time: c.hang_time,
            setmod_bw: c.setmod_bw,
            dmr_dmrla_is_set: c.dmr_dmrla_is_set,
            dmr_dmrla_n: c.dmr_dmrla_n,
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DmrError> {
        let text = std::fs::read_to_string(path.as_ref())
            .map_err(|e| DmrError::InvalidConfig(e.to_string()))?;
        serde_json::from_str(&text).map_err(|e| DmrError::InvalidConfig(e.to_string()))
    }
}

/// On-disk serde mirror of [`GroupEntry`] keyed by talkgroup id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupEntryData {
    pub name: String,
    #[serde(default)]
    pub mode: String,
}

/// Persisted, read-only-at-start site data (spec.md §6 "Persisted state").
/// CSV loading of talkgroup names is out of scope (spec.md §1); this type
/// only covers the in-memory shape the policy engine reads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteData {
    pub trunk_chan_map: HashMap<u16, u64>,
    pub group_map: HashMap<u32, GroupEntryData>,
}

impl SiteData {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DmrError> {
        let text = std::fs::read_to_string(path.as_ref())
            .map_err(|e| DmrError::InvalidConfig(e.to_string()))?;
        serde_json::from_str(&text).map_err(|e| DmrError::InvalidConfig(e.to_string()))
    }

    pub fn group_map(&self) -> HashMap<u32, GroupEntry> {
        self.group_map
            .iter()
            .map(|(tg, entry)| {
                (
                    *tg,
                    GroupEntry {
                        name: entry.name.clone(),
                        mode: entry.mode.clone(),
                    },
                )
            })
            .collect()
    }
}
