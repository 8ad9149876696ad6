//! Thermal domain types
//!
//! Provides temperature readings and thermal controller descriptions.

use crate::adl::sys;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Temperature, kept in millidegrees Celsius as ADL reports it
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Temperature(i32);

impl Temperature {
    /// Create a Temperature from millidegrees Celsius
    pub const fn from_millidegrees(millidegrees: i32) -> Self {
        Self(millidegrees)
    }

    /// Create a Temperature from whole degrees Celsius
    pub const fn from_celsius(celsius: i32) -> Self {
        Self(celsius * 1000)
    }

    /// Get the temperature in millidegrees Celsius
    #[inline]
    pub const fn as_millidegrees(&self) -> i32 {
        self.0
    }

    /// Get the temperature in whole degrees Celsius (truncated)
    #[inline]
    pub const fn as_celsius(&self) -> i32 {
        self.0 / 1000
    }

    /// Check if temperature is critical (above 90°C typically)
    pub fn is_critical(&self) -> bool {
        self.as_celsius() >= 90
    }

    /// Check if temperature is high (above 80°C typically)
    pub fn is_high(&self) -> bool {
        self.as_celsius() >= 80
    }
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°C", self.as_celsius())
    }
}

/// Domain a thermal controller belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThermalDomain {
    Gpu,
    Other,
}

impl ThermalDomain {
    /// Decode an ADL thermal domain value
    pub fn from_raw(domain: i32) -> Self {
        if domain == sys::ADL_DL_THERMAL_DOMAIN_GPU {
            Self::Gpu
        } else {
            Self::Other
        }
    }
}

impl fmt::Display for ThermalDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThermalDomain::Gpu => write!(f, "GPU"),
            ThermalDomain::Other => write!(f, "Other"),
        }
    }
}

/// One thermal sensor/fan channel of an adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThermalController {
    /// Channel index used for temperature and fan calls
    pub index: i32,
    pub domain: ThermalDomain,
    pub domain_index: i32,
    /// Raw `ADL_DL_THERMAL_FLAG_*` bits
    pub flags: i32,
}

impl ThermalController {
    /// Controller raises interrupts
    pub fn has_interrupt(&self) -> bool {
        self.flags & sys::ADL_DL_THERMAL_FLAG_INTERRUPT != 0
    }

    /// Controller drives a fan
    pub fn has_fan_control(&self) -> bool {
        self.flags & sys::ADL_DL_THERMAL_FLAG_FANCONTROL != 0
    }
}
