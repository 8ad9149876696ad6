//! Fan-related domain types
//!
//! Provides fan capability flags, speed units and validated speed values.

use crate::adl::sys;
use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fan control capability bits in the Overdrive 5 layout
///
/// Each predicate is an independent bit test.
///
/// # Examples
///
/// ```
/// use adlctl::domain::FanCapabilities;
///
/// let caps = FanCapabilities::from_bits(0b0101);
/// assert!(caps.supports_percent_read());
/// assert!(caps.supports_rpm_read());
/// assert!(!caps.supports_percent_write());
/// assert!(!caps.supports_rpm_write());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FanCapabilities(i32);

impl FanCapabilities {
    /// Wrap raw `ADL_DL_FANCTRL_SUPPORTS_*` bits
    pub const fn from_bits(bits: i32) -> Self {
        Self(bits)
    }

    /// Translate `ADL_OD6_TCCAPS_FANSPEED_*` bits into the Overdrive 5 layout
    pub fn from_od6_bits(bits: i32) -> Self {
        let mapping = [
            (
                sys::ADL_OD6_TCCAPS_FANSPEED_PERCENT_READ,
                sys::ADL_DL_FANCTRL_SUPPORTS_PERCENT_READ,
            ),
            (
                sys::ADL_OD6_TCCAPS_FANSPEED_PERCENT_WRITE,
                sys::ADL_DL_FANCTRL_SUPPORTS_PERCENT_WRITE,
            ),
            (
                sys::ADL_OD6_TCCAPS_FANSPEED_RPM_READ,
                sys::ADL_DL_FANCTRL_SUPPORTS_RPM_READ,
            ),
            (
                sys::ADL_OD6_TCCAPS_FANSPEED_RPM_WRITE,
                sys::ADL_DL_FANCTRL_SUPPORTS_RPM_WRITE,
            ),
        ];

        Self(
            mapping
                .iter()
                .filter(|(od6, _)| bits & od6 != 0)
                .fold(0, |acc, (_, od5)| acc | od5),
        )
    }

    /// Raw bits
    pub const fn bits(&self) -> i32 {
        self.0
    }

    pub fn supports_percent_read(&self) -> bool {
        self.0 & sys::ADL_DL_FANCTRL_SUPPORTS_PERCENT_READ != 0
    }

    pub fn supports_rpm_read(&self) -> bool {
        self.0 & sys::ADL_DL_FANCTRL_SUPPORTS_RPM_READ != 0
    }

    pub fn supports_percent_write(&self) -> bool {
        self.0 & sys::ADL_DL_FANCTRL_SUPPORTS_PERCENT_WRITE != 0
    }

    pub fn supports_rpm_write(&self) -> bool {
        self.0 & sys::ADL_DL_FANCTRL_SUPPORTS_RPM_WRITE != 0
    }

    /// Whether speeds in `unit` can be read
    pub fn can_read(&self, unit: FanSpeedUnit) -> bool {
        match unit {
            FanSpeedUnit::Percent => self.supports_percent_read(),
            FanSpeedUnit::Rpm => self.supports_rpm_read(),
        }
    }

    /// Whether speeds in `unit` can be written
    pub fn can_write(&self, unit: FanSpeedUnit) -> bool {
        match unit {
            FanSpeedUnit::Percent => self.supports_percent_write(),
            FanSpeedUnit::Rpm => self.supports_rpm_write(),
        }
    }
}

impl fmt::Display for FanCapabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = Vec::new();
        if self.supports_percent_read() {
            names.push("percent-read");
        }
        if self.supports_percent_write() {
            names.push("percent-write");
        }
        if self.supports_rpm_read() {
            names.push("rpm-read");
        }
        if self.supports_rpm_write() {
            names.push("rpm-write");
        }

        if names.is_empty() {
            write!(f, "none")
        } else {
            write!(f, "{}", names.join(", "))
        }
    }
}

/// Unit of a fan speed value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FanSpeedUnit {
    Percent,
    Rpm,
}

impl FanSpeedUnit {
    /// ADL speed type tag (identical for Overdrive 5 and 6)
    pub const fn as_raw(self) -> i32 {
        match self {
            FanSpeedUnit::Percent => sys::ADL_DL_FANCTRL_SPEED_TYPE_PERCENT,
            FanSpeedUnit::Rpm => sys::ADL_DL_FANCTRL_SPEED_TYPE_RPM,
        }
    }

    /// Unit suffix for display
    pub const fn suffix(self) -> &'static str {
        match self {
            FanSpeedUnit::Percent => "%",
            FanSpeedUnit::Rpm => " RPM",
        }
    }
}

impl fmt::Display for FanSpeedUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FanSpeedUnit::Percent => write!(f, "percent"),
            FanSpeedUnit::Rpm => write!(f, "RPM"),
        }
    }
}

/// Fan capabilities and speed limits of a thermal channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FanSpeedInfo {
    pub capabilities: FanCapabilities,
    pub min_percent: i32,
    pub max_percent: i32,
    pub min_rpm: i32,
    pub max_rpm: i32,
}

impl FanSpeedInfo {
    /// Valid `(min, max)` speeds in `unit`
    pub fn range(&self, unit: FanSpeedUnit) -> (i32, i32) {
        match unit {
            FanSpeedUnit::Percent => (self.min_percent, self.max_percent),
            FanSpeedUnit::Rpm => (self.min_rpm, self.max_rpm),
        }
    }

    /// Validate a requested speed against the reported limits
    pub fn validate(&self, value: &FanSpeedValue) -> Result<(), DomainError> {
        let (min, max) = self.range(value.unit);
        if value.speed < min || value.speed > max {
            return Err(DomainError::FanSpeedOutOfRange {
                value: value.speed,
                min,
                max,
                unit: value.unit.suffix(),
            });
        }
        Ok(())
    }
}

/// A unit-tagged fan speed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FanSpeedValue {
    pub unit: FanSpeedUnit,
    pub speed: i32,
    /// Speed was set by the user rather than the driver
    pub user_defined: bool,
}

impl FanSpeedValue {
    /// Maximum valid percentage
    pub const MAX_PERCENT: i32 = 100;

    /// Create a percentage speed (0-100)
    ///
    /// # Errors
    /// Returns `DomainError::InvalidFanSpeed` if value is outside 0-100
    pub fn percent(value: i32) -> Result<Self, DomainError> {
        if !(0..=Self::MAX_PERCENT).contains(&value) {
            return Err(DomainError::InvalidFanSpeed(value));
        }
        Ok(Self {
            unit: FanSpeedUnit::Percent,
            speed: value,
            user_defined: true,
        })
    }

    /// Create an RPM speed
    pub fn rpm(value: u32) -> Self {
        Self {
            unit: FanSpeedUnit::Rpm,
            speed: value.min(i32::MAX as u32) as i32,
            user_defined: true,
        }
    }
}

impl fmt::Display for FanSpeedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.speed, self.unit.suffix())
    }
}
