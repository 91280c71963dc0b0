//! The library index (`index.json`): one entry per mode naming its
//! record stream and its flat table.

use crate::{
    error::{MathError, MathResult},
    types::ModeName,
};
use serde::{Deserialize, Serialize};
use std::{io::Write, path::Path};

pub const INDEX_VERSION: u32 = 1;
pub const INDEX_FILE: &str = "index.json";
/// Stake per play; every mode currently costs one unit.
pub const MODE_COST: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModeManifestEntry {
    pub name: ModeName,
    pub cost: f64,
    /// Record stream file name, relative to the library directory.
    pub events: String,
    /// Flat table file name, relative to the library directory.
    pub weights: String,
}

impl ModeManifestEntry {
    pub fn new(name: &str, events: String, weights: String) -> Self {
        Self {
            name: name.to_string(),
            cost: MODE_COST,
            events,
            weights,
        }
    }
}

/// A mode entry as listed in the index, decoded on its own.
#[derive(Debug)]
pub enum ListedMode {
    Entry(ModeManifestEntry),
    /// The entry could not be decoded; `name` falls back to its position.
    Malformed {
        name: String,
        error: serde_json::Error,
    },
}

/// index.json with its mode entries left undecoded, so one bad entry
/// does not make the others unreadable.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IndexListing {
    pub version: u32,
    pub modes: Vec<serde_json::Value>,
}

impl IndexListing {
    pub fn from_slice(bytes: &[u8]) -> MathResult<Self> {
        let listing: IndexListing = serde_json::from_slice(bytes)?;
        if listing.version != INDEX_VERSION {
            return Err(MathError::IndexVersion {
                expected: INDEX_VERSION,
                actual: listing.version,
            });
        }
        Ok(listing)
    }

    pub fn read(path: &Path) -> MathResult<Self> {
        let bytes = std::fs::read(path)?;
        Self::from_slice(&bytes)
    }

    /// Decode every entry in listing order.
    pub fn entries(&self) -> Vec<ListedMode> {
        self.modes
            .iter()
            .enumerate()
            .map(|(position, raw)| match ModeManifestEntry::deserialize(raw) {
                Ok(entry) => ListedMode::Entry(entry),
                Err(error) => ListedMode::Malformed {
                    name: raw["name"]
                        .as_str()
                        .map(str::to_string)
                        .unwrap_or_else(|| format!("modes[{position}]")),
                    error,
                },
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Index {
    pub version: u32,
    pub modes: Vec<ModeManifestEntry>,
}

impl Index {
    /// Entries keep the order they are given in (mode processing order).
    pub fn new(modes: Vec<ModeManifestEntry>) -> Self {
        Self {
            version: INDEX_VERSION,
            modes,
        }
    }

    pub fn write_to<W: Write>(&self, mut writer: W) -> MathResult<()> {
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    pub fn to_pretty_json(&self) -> MathResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Strict read: any malformed mode entry is an error.
    pub fn from_slice(bytes: &[u8]) -> MathResult<Self> {
        let listing = IndexListing::from_slice(bytes)?;
        let modes = listing
            .entries()
            .into_iter()
            .map(|listed| match listed {
                ListedMode::Entry(entry) => Ok(entry),
                ListedMode::Malformed { error, .. } => Err(MathError::Serialization(error)),
            })
            .collect::<MathResult<Vec<_>>>()?;
        Ok(Self {
            version: listing.version,
            modes,
        })
    }

    pub fn read(path: &Path) -> MathResult<Self> {
        let bytes = std::fs::read(path)?;
        Self::from_slice(&bytes)
    }
}
