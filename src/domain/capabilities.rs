//! Overdrive capability types
//!
//! The overdrive protocol version decides which ADL function family
//! (Overdrive5 or Overdrive6) may be called for an adapter.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Overdrive protocol version of an adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OverdriveVersion {
    /// `ADL_Overdrive5_*` family
    Five,
    /// `ADL_Overdrive6_*` family
    Six,
}

impl OverdriveVersion {
    /// Decode the version reported by `ADL_Overdrive_Caps`
    ///
    /// Returns `None` for anything other than 5 or 6.
    pub fn from_raw(version: i32) -> Option<Self> {
        match version {
            5 => Some(Self::Five),
            6 => Some(Self::Six),
            _ => None,
        }
    }

    /// The numeric version
    pub const fn as_raw(self) -> i32 {
        match self {
            Self::Five => 5,
            Self::Six => 6,
        }
    }
}

impl fmt::Display for OverdriveVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Overdrive {}", self.as_raw())
    }
}

/// Per-adapter overdrive capabilities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    /// Overdrive supported by the adapter
    pub supported: bool,
    /// Overdrive enabled by the driver
    pub enabled: bool,
    /// Version as reported by ADL
    pub raw_version: i32,
    /// Decoded version, `None` when unsupported
    pub version: Option<OverdriveVersion>,
}

impl Capabilities {
    /// Create capabilities from the raw ADL triple
    pub fn new(supported: bool, enabled: bool, raw_version: i32) -> Self {
        Self {
            supported,
            enabled,
            raw_version,
            version: OverdriveVersion::from_raw(raw_version),
        }
    }

    /// Capabilities of an adapter that could not be queried
    pub fn unsupported() -> Self {
        Self::new(false, false, 0)
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::unsupported()
    }
}

impl fmt::Display for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.version {
            Some(version) => write!(
                f,
                "{} (supported: {}, enabled: {})",
                version, self.supported, self.enabled
            ),
            None => write!(f, "unsupported (reported version {})", self.raw_version),
        }
    }
}
