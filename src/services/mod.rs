//! Service layer for Overdrive control operations
//!
//! Services validate requested settings against what the adapter reports
//! and apply them through the binding, honouring dry-run mode.

pub mod clock_service;
pub mod fan_service;
pub mod power_service;

pub use clock_service::{ClockChange, ClockService};
pub use fan_service::FanService;
pub use power_service::PowerService;
