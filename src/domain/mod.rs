//! Domain models for adlctl
//!
//! Plain value types decoded from ADL records. Unit conversions and
//! range validation live here; nothing in this module calls into ADL.

pub mod adapter;
pub mod capabilities;
pub mod fan;
pub mod performance;
pub mod power;
pub mod thermal;

pub use adapter::AdapterInfo;
pub use capabilities::{Capabilities, OverdriveVersion};
pub use fan::{FanCapabilities, FanSpeedInfo, FanSpeedUnit, FanSpeedValue};
pub use performance::{
    Activity, ClockRange, ClockSpeed, LevelField, OverdriveParameters, PerformanceLevel,
    PerformanceLevelPair, VoltageRange,
};
pub use power::PowerControlInfo;
pub use thermal::{Temperature, ThermalController, ThermalDomain};
