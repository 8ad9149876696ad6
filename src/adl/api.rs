//! Trait definition for the ADL entry-point surface
//!
//! One method per exported ADL function. The real implementation forwards to
//! the loaded library; tests substitute an in-memory double.

use crate::adl::sys::{
    ADLFanSpeedInfo, ADLFanSpeedValue, ADLOD6Capabilities, ADLOD6CurrentStatus,
    ADLOD6FanSpeedInfo, ADLOD6FanSpeedValue, ADLOD6PerformanceLevel, ADLOD6PowerControlInfo,
    ADLOD6ThermalControllerCaps, ADLODParameters, ADLODPerformanceLevel, ADLPMActivity,
    ADLPowerControlInfo, ADLThermalControllerInfo, AdapterInfo,
};
use crate::error::AdlError;

/// Result of a single ADL call
pub type AdlResult<T> = Result<T, AdlError>;

/// Raw overdrive capability triple from `ADL_Overdrive_Caps`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverdriveCaps {
    pub supported: i32,
    pub enabled: i32,
    pub version: i32,
}

/// Raw power control reading: current and default values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PowerControlReading {
    pub current: i32,
    pub default: i32,
}

/// The ADL entry points used by the binding
///
/// Every method maps to exactly one ADL symbol. Implementations return
/// [`AdlError::SymbolUnavailable`] when the symbol cannot be resolved and
/// [`AdlError::CallFailed`] when the call returns anything but `ADL_OK`.
/// Methods take `&mut self`: callers serialize access to the library.
pub trait AdlApi: Send {
    /// `ADL_Main_Control_Create`
    fn main_control_create(&mut self, connected_only: bool) -> AdlResult<()>;

    /// `ADL_Main_Control_Destroy`
    fn main_control_destroy(&mut self) -> AdlResult<()>;

    // Adapters
    /// `ADL_Adapter_NumberOfAdapters_Get`
    fn adapter_count(&mut self) -> AdlResult<i32>;

    /// `ADL_Adapter_AdapterInfo_Get` into a buffer of `count` records
    fn adapter_info(&mut self, count: usize) -> AdlResult<Vec<AdapterInfo>>;

    /// `ADL_Adapter_Active_Get`
    fn adapter_active(&mut self, adapter: i32) -> AdlResult<bool>;

    /// `ADL_Overdrive_Caps`
    fn overdrive_caps(&mut self, adapter: i32) -> AdlResult<OverdriveCaps>;

    // Overdrive 5
    fn od5_power_control_caps(&mut self, adapter: i32) -> AdlResult<bool>;
    fn od5_power_control_info(&mut self, adapter: i32) -> AdlResult<ADLPowerControlInfo>;
    fn od5_power_control_get(&mut self, adapter: i32) -> AdlResult<PowerControlReading>;
    fn od5_power_control_set(&mut self, adapter: i32, value: i32) -> AdlResult<()>;
    fn od5_parameters(&mut self, adapter: i32) -> AdlResult<ADLODParameters>;

    /// `ADL_Overdrive5_ODPerformanceLevels_Get`, stock table when `default` is set
    fn od5_performance_levels(
        &mut self,
        adapter: i32,
        default: bool,
        count: usize,
    ) -> AdlResult<Vec<ADLODPerformanceLevel>>;

    fn od5_set_performance_levels(
        &mut self,
        adapter: i32,
        levels: &[ADLODPerformanceLevel],
    ) -> AdlResult<()>;

    fn od5_current_activity(&mut self, adapter: i32) -> AdlResult<ADLPMActivity>;

    /// `ADL_Overdrive5_ThermalDevices_Enum`; `ADL_WARNING_NO_DATA` past the last channel
    fn od5_thermal_device(
        &mut self,
        adapter: i32,
        channel: i32,
    ) -> AdlResult<ADLThermalControllerInfo>;

    /// Temperature in millidegrees Celsius
    fn od5_temperature(&mut self, adapter: i32, channel: i32) -> AdlResult<i32>;

    fn od5_fan_speed_info(&mut self, adapter: i32, channel: i32) -> AdlResult<ADLFanSpeedInfo>;

    /// `ADL_Overdrive5_FanSpeed_Get` with the request's speed type set to `speed_type`
    fn od5_fan_speed_get(
        &mut self,
        adapter: i32,
        channel: i32,
        speed_type: i32,
    ) -> AdlResult<ADLFanSpeedValue>;

    fn od5_fan_speed_set(
        &mut self,
        adapter: i32,
        channel: i32,
        value: ADLFanSpeedValue,
    ) -> AdlResult<()>;

    fn od5_fan_speed_to_default(&mut self, adapter: i32, channel: i32) -> AdlResult<()>;

    // Overdrive 6
    fn od6_power_control_caps(&mut self, adapter: i32) -> AdlResult<bool>;
    fn od6_power_control_info(&mut self, adapter: i32) -> AdlResult<ADLOD6PowerControlInfo>;
    fn od6_power_control_get(&mut self, adapter: i32) -> AdlResult<PowerControlReading>;
    fn od6_power_control_set(&mut self, adapter: i32, value: i32) -> AdlResult<()>;
    fn od6_capabilities(&mut self, adapter: i32) -> AdlResult<ADLOD6Capabilities>;

    /// `ADL_Overdrive6_StateInfo_Get` for `state_type` (default or custom performance)
    fn od6_state_info(
        &mut self,
        adapter: i32,
        state_type: i32,
        count: usize,
    ) -> AdlResult<Vec<ADLOD6PerformanceLevel>>;

    fn od6_state_set(
        &mut self,
        adapter: i32,
        state_type: i32,
        levels: &[ADLOD6PerformanceLevel],
    ) -> AdlResult<()>;

    fn od6_current_status(&mut self, adapter: i32) -> AdlResult<ADLOD6CurrentStatus>;
    fn od6_thermal_controller_caps(
        &mut self,
        adapter: i32,
    ) -> AdlResult<ADLOD6ThermalControllerCaps>;

    /// Temperature in millidegrees Celsius
    fn od6_temperature(&mut self, adapter: i32) -> AdlResult<i32>;

    fn od6_fan_speed_get(&mut self, adapter: i32) -> AdlResult<ADLOD6FanSpeedInfo>;
    fn od6_fan_speed_set(&mut self, adapter: i32, value: ADLOD6FanSpeedValue) -> AdlResult<()>;
    fn od6_fan_speed_reset(&mut self, adapter: i32) -> AdlResult<()>;
}
