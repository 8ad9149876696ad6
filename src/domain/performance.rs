//! Performance level and clock domain types
//!
//! Types for overdrive clock ranges, performance levels and GPU activity.

use serde::{Deserialize, Serialize};
use std::fmt;

/// GPU clock speed, kept in ADL's native 10 kHz units
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct ClockSpeed(u32);

impl ClockSpeed {
    /// Create a clock speed from ADL units (10 kHz); negative values clamp to zero
    pub fn from_adl_units(units: i32) -> Self {
        Self(units.max(0) as u32)
    }

    /// Create a clock speed from MHz
    pub const fn from_mhz(mhz: u32) -> Self {
        Self(mhz * 100)
    }

    /// Get clock speed in ADL units (10 kHz)
    pub fn as_adl_units(&self) -> i32 {
        self.0 as i32
    }

    /// Get clock speed in MHz
    pub const fn as_mhz(&self) -> u32 {
        self.0 / 100
    }
}

impl fmt::Display for ClockSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} MHz", self.as_mhz())
    }
}

/// Overdrive range for a clock domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClockRange {
    pub min: ClockSpeed,
    pub max: ClockSpeed,
    pub step: ClockSpeed,
}

impl ClockRange {
    /// Build a range from raw ADL units
    pub fn from_adl_units(min: i32, max: i32, step: i32) -> Self {
        Self {
            min: ClockSpeed::from_adl_units(min),
            max: ClockSpeed::from_adl_units(max),
            step: ClockSpeed::from_adl_units(step),
        }
    }

    /// Check if a clock is within the range
    pub fn contains(&self, clock: ClockSpeed) -> bool {
        clock >= self.min && clock <= self.max
    }
}

impl fmt::Display for ClockRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.min, self.max)
    }
}

/// Overdrive range for the core voltage, in millivolts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VoltageRange {
    pub min: i32,
    pub max: i32,
    pub step: i32,
}

impl VoltageRange {
    /// Check if a voltage is within the range
    pub fn contains(&self, millivolts: i32) -> bool {
        millivolts >= self.min && millivolts <= self.max
    }
}

/// Overdrive parameters: level count and adjustable ranges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverdriveParameters {
    /// Number of performance levels
    pub performance_levels: usize,
    /// Adapter reports activity (load) figures
    pub activity_reporting: bool,
    /// Engine clock can be set to discrete values only
    pub discrete_engine_clock: bool,
    /// Engine (core) clock range
    pub engine_clock: ClockRange,
    /// Memory clock range
    pub memory_clock: ClockRange,
    /// Core voltage range (Overdrive 5 only)
    pub voltage: Option<VoltageRange>,
}

/// One discrete clock/voltage operating point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PerformanceLevel {
    /// Engine (core) clock
    pub engine_clock: ClockSpeed,
    /// Memory clock
    pub memory_clock: ClockSpeed,
    /// Core voltage in millivolts (Overdrive 5 only)
    pub voltage: Option<i32>,
}

impl PerformanceLevel {
    /// Create a new performance level
    pub fn new(engine_clock: ClockSpeed, memory_clock: ClockSpeed, voltage: Option<i32>) -> Self {
        Self {
            engine_clock,
            memory_clock,
            voltage,
        }
    }

    /// Copy of this level with one field replaced
    pub fn with_field(mut self, field: LevelField) -> Self {
        match field {
            LevelField::EngineClock(clock) => self.engine_clock = clock,
            LevelField::MemoryClock(clock) => self.memory_clock = clock,
            LevelField::Voltage(mv) => self.voltage = Some(mv),
        }
        self
    }
}

impl fmt::Display for PerformanceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "core {} / memory {}", self.engine_clock, self.memory_clock)?;
        if let Some(mv) = self.voltage {
            write!(f, " @ {} mV", mv)?;
        }
        Ok(())
    }
}

/// A single adjustable field of a performance level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelField {
    EngineClock(ClockSpeed),
    MemoryClock(ClockSpeed),
    /// Millivolts
    Voltage(i32),
}

impl fmt::Display for LevelField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelField::EngineClock(clock) => write!(f, "core clock {}", clock),
            LevelField::MemoryClock(clock) => write!(f, "memory clock {}", clock),
            LevelField::Voltage(mv) => write!(f, "voltage {} mV", mv),
        }
    }
}

/// Stock and current values of one performance level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceLevelPair {
    /// Level index (0 = lowest)
    pub level: usize,
    /// Factory default
    pub stock: PerformanceLevel,
    /// Currently programmed
    pub current: PerformanceLevel,
}

impl PerformanceLevelPair {
    /// Whether the current level differs from stock
    pub fn is_modified(&self) -> bool {
        self.stock != self.current
    }
}

/// Current GPU activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Activity {
    pub engine_clock: ClockSpeed,
    pub memory_clock: ClockSpeed,
    /// Millivolts (Overdrive 5 only)
    pub voltage: Option<i32>,
    /// GPU load (0-100%)
    pub activity_percent: u8,
    pub current_level: i32,
    pub bus_speed: i32,
    pub bus_lanes: i32,
    pub max_bus_lanes: i32,
}
