//! Conversions between ADL records and domain types

use crate::adl::api::OverdriveCaps;
use crate::adl::sys;
use crate::domain::{
    Activity, AdapterInfo, Capabilities, ClockRange, ClockSpeed, FanCapabilities, FanSpeedInfo,
    FanSpeedUnit, FanSpeedValue, OverdriveParameters, PerformanceLevel, PowerControlInfo,
    ThermalController, ThermalDomain, VoltageRange,
};

impl From<&sys::AdapterInfo> for AdapterInfo {
    fn from(raw: &sys::AdapterInfo) -> Self {
        Self {
            index: raw.adapter_index,
            name: sys::read_c_string(&raw.adapter_name),
            display_name: sys::read_c_string(&raw.display_name),
            udid: sys::read_c_string(&raw.udid),
            vendor_id: raw.vendor_id,
            bus_number: raw.bus_number,
            device_number: raw.device_number,
            function_number: raw.function_number,
            present: raw.present != 0,
        }
    }
}

impl From<OverdriveCaps> for Capabilities {
    fn from(raw: OverdriveCaps) -> Self {
        Capabilities::new(raw.supported != 0, raw.enabled != 0, raw.version)
    }
}

impl From<sys::ADLPowerControlInfo> for PowerControlInfo {
    fn from(raw: sys::ADLPowerControlInfo) -> Self {
        PowerControlInfo::new(raw.min_value, raw.max_value, raw.step_value)
    }
}

impl From<sys::ADLOD6PowerControlInfo> for PowerControlInfo {
    fn from(raw: sys::ADLOD6PowerControlInfo) -> Self {
        PowerControlInfo::new(raw.min_value, raw.max_value, raw.step_value)
    }
}

fn clock_range(raw: sys::ADLODParameterRange) -> ClockRange {
    ClockRange::from_adl_units(raw.min, raw.max, raw.step)
}

fn od6_clock_range(raw: sys::ADLOD6ParameterRange) -> ClockRange {
    ClockRange::from_adl_units(raw.min, raw.max, raw.step)
}

impl From<sys::ADLODParameters> for OverdriveParameters {
    fn from(raw: sys::ADLODParameters) -> Self {
        Self {
            performance_levels: raw.number_of_performance_levels.max(0) as usize,
            activity_reporting: raw.activity_reporting_supported != 0,
            discrete_engine_clock: raw.discrete_engine_clock_supported != 0,
            engine_clock: clock_range(raw.engine_clock),
            memory_clock: clock_range(raw.memory_clock),
            voltage: Some(VoltageRange {
                min: raw.vddc.min,
                max: raw.vddc.max,
                step: raw.vddc.step,
            }),
        }
    }
}

impl From<sys::ADLOD6Capabilities> for OverdriveParameters {
    fn from(raw: sys::ADLOD6Capabilities) -> Self {
        Self {
            performance_levels: raw.number_of_performance_levels.max(0) as usize,
            activity_reporting: raw.capabilities & sys::ADL_OD6_CAPABILITY_GPU_ACTIVITY_MONITOR
                != 0,
            discrete_engine_clock: false,
            engine_clock: od6_clock_range(raw.engine_clock_range),
            memory_clock: od6_clock_range(raw.memory_clock_range),
            voltage: None,
        }
    }
}

impl From<sys::ADLODPerformanceLevel> for PerformanceLevel {
    fn from(raw: sys::ADLODPerformanceLevel) -> Self {
        PerformanceLevel::new(
            ClockSpeed::from_adl_units(raw.engine_clock),
            ClockSpeed::from_adl_units(raw.memory_clock),
            Some(raw.vddc),
        )
    }
}

impl From<sys::ADLOD6PerformanceLevel> for PerformanceLevel {
    fn from(raw: sys::ADLOD6PerformanceLevel) -> Self {
        PerformanceLevel::new(
            ClockSpeed::from_adl_units(raw.engine_clock),
            ClockSpeed::from_adl_units(raw.memory_clock),
            None,
        )
    }
}

impl From<PerformanceLevel> for sys::ADLODPerformanceLevel {
    fn from(level: PerformanceLevel) -> Self {
        Self {
            engine_clock: level.engine_clock.as_adl_units(),
            memory_clock: level.memory_clock.as_adl_units(),
            vddc: level.voltage.unwrap_or(0),
        }
    }
}

impl From<PerformanceLevel> for sys::ADLOD6PerformanceLevel {
    fn from(level: PerformanceLevel) -> Self {
        Self {
            engine_clock: level.engine_clock.as_adl_units(),
            memory_clock: level.memory_clock.as_adl_units(),
        }
    }
}

fn percent(value: i32) -> u8 {
    value.clamp(0, 100) as u8
}

impl From<sys::ADLPMActivity> for Activity {
    fn from(raw: sys::ADLPMActivity) -> Self {
        Self {
            engine_clock: ClockSpeed::from_adl_units(raw.engine_clock),
            memory_clock: ClockSpeed::from_adl_units(raw.memory_clock),
            voltage: Some(raw.vddc),
            activity_percent: percent(raw.activity_percent),
            current_level: raw.current_performance_level,
            bus_speed: raw.current_bus_speed,
            bus_lanes: raw.current_bus_lanes,
            max_bus_lanes: raw.maximum_bus_lanes,
        }
    }
}

impl From<sys::ADLOD6CurrentStatus> for Activity {
    fn from(raw: sys::ADLOD6CurrentStatus) -> Self {
        Self {
            engine_clock: ClockSpeed::from_adl_units(raw.engine_clock),
            memory_clock: ClockSpeed::from_adl_units(raw.memory_clock),
            voltage: None,
            activity_percent: percent(raw.activity_percent),
            current_level: raw.current_performance_level,
            bus_speed: raw.current_bus_speed,
            bus_lanes: raw.current_bus_lanes,
            max_bus_lanes: raw.maximum_bus_lanes,
        }
    }
}

/// Thermal controller found at `channel`
pub fn thermal_controller(channel: i32, raw: &sys::ADLThermalControllerInfo) -> ThermalController {
    ThermalController {
        index: channel,
        domain: ThermalDomain::from_raw(raw.thermal_domain),
        domain_index: raw.domain_index,
        flags: raw.flags,
    }
}

/// The single Overdrive 6 thermal controller
pub fn od6_thermal_controller(raw: &sys::ADLOD6ThermalControllerCaps) -> ThermalController {
    let flags = if raw.capabilities & sys::ADL_OD6_TCCAPS_FANSPEED_CONTROL != 0 {
        sys::ADL_DL_THERMAL_FLAG_FANCONTROL
    } else {
        0
    };
    ThermalController {
        index: 0,
        domain: ThermalDomain::Gpu,
        domain_index: 0,
        flags,
    }
}

impl From<sys::ADLFanSpeedInfo> for FanSpeedInfo {
    fn from(raw: sys::ADLFanSpeedInfo) -> Self {
        Self {
            capabilities: FanCapabilities::from_bits(raw.flags),
            min_percent: raw.min_percent,
            max_percent: raw.max_percent,
            min_rpm: raw.min_rpm,
            max_rpm: raw.max_rpm,
        }
    }
}

impl From<sys::ADLOD6ThermalControllerCaps> for FanSpeedInfo {
    fn from(raw: sys::ADLOD6ThermalControllerCaps) -> Self {
        Self {
            capabilities: FanCapabilities::from_od6_bits(raw.capabilities),
            min_percent: raw.fan_min_percent,
            max_percent: raw.fan_max_percent,
            min_rpm: raw.fan_min_rpm,
            max_rpm: raw.fan_max_rpm,
        }
    }
}

/// Decode an Overdrive 5 fan speed reading requested in `unit`
pub fn od5_fan_speed(unit: FanSpeedUnit, raw: &sys::ADLFanSpeedValue) -> FanSpeedValue {
    FanSpeedValue {
        unit,
        speed: raw.fan_speed,
        user_defined: raw.flags & sys::ADL_DL_FANCTRL_FLAG_USER_DEFINED_SPEED != 0,
    }
}

/// Decode an Overdrive 6 fan speed reading, picking the field for `unit`
pub fn od6_fan_speed(unit: FanSpeedUnit, raw: &sys::ADLOD6FanSpeedInfo) -> FanSpeedValue {
    let speed = match unit {
        FanSpeedUnit::Percent => raw.fan_speed_percent,
        FanSpeedUnit::Rpm => raw.fan_speed_rpm,
    };
    FanSpeedValue {
        unit,
        speed,
        user_defined: raw.speed_type & sys::ADL_OD6_FANSPEED_USER_DEFINED != 0,
    }
}

/// Overdrive 5 set request; the unit tag goes into `speed_type`
pub fn od5_fan_speed_request(value: &FanSpeedValue) -> sys::ADLFanSpeedValue {
    sys::ADLFanSpeedValue {
        size: 0,
        speed_type: value.unit.as_raw(),
        fan_speed: value.speed,
        flags: if value.user_defined {
            sys::ADL_DL_FANCTRL_FLAG_USER_DEFINED_SPEED
        } else {
            0
        },
    }
}

/// Overdrive 6 set request
pub fn od6_fan_speed_request(value: &FanSpeedValue) -> sys::ADLOD6FanSpeedValue {
    sys::ADLOD6FanSpeedValue {
        speed_type: match value.unit {
            FanSpeedUnit::Percent => sys::ADL_OD6_FANSPEED_TYPE_PERCENT,
            FanSpeedUnit::Rpm => sys::ADL_OD6_FANSPEED_TYPE_RPM,
        },
        fan_speed: value.speed,
        ext_value: 0,
        ext_mask: 0,
    }
}
