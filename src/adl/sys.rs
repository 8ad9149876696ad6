//! Raw ADL binary interface
//!
//! `#[repr(C)]` mirrors of the ADL SDK records, status codes, flag bits and
//! entry-point signatures. Field order and widths must match
//! `adl_structures.h` exactly; names are snake_cased.

#![allow(clippy::upper_case_acronyms)]

use std::ffi::{c_char, c_int, c_void};
use std::mem;

/// Fixed length of ADL string fields
pub const ADL_MAX_PATH: usize = 256;

/// PCI vendor id ADL reports for AMD adapters
pub const AMD_VENDOR_ID: c_int = 1002;

// Status codes
pub const ADL_OK_WAIT: c_int = 4;
pub const ADL_OK_RESTART: c_int = 3;
pub const ADL_OK_MODE_CHANGE: c_int = 2;
pub const ADL_OK_WARNING: c_int = 1;
pub const ADL_OK: c_int = 0;
pub const ADL_ERR: c_int = -1;
pub const ADL_ERR_NOT_INIT: c_int = -2;
pub const ADL_ERR_INVALID_PARAM: c_int = -3;
pub const ADL_ERR_INVALID_PARAM_SIZE: c_int = -4;
pub const ADL_ERR_INVALID_ADL_IDX: c_int = -5;
pub const ADL_ERR_INVALID_CONTROLLER_IDX: c_int = -6;
pub const ADL_ERR_INVALID_DIPLAY_IDX: c_int = -7;
pub const ADL_ERR_NOT_SUPPORTED: c_int = -8;
pub const ADL_ERR_NULL_POINTER: c_int = -9;
pub const ADL_ERR_DISABLED_ADAPTER: c_int = -10;
pub const ADL_ERR_INVALID_CALLBACK: c_int = -11;
pub const ADL_ERR_RESOURCE_CONFLICT: c_int = -12;
pub const ADL_ERR_SET_INCOMPLETE: c_int = -20;
pub const ADL_ERR_NO_XDISPLAY: c_int = -21;
/// Returned by thermal device enumeration past the last controller
pub const ADL_WARNING_NO_DATA: c_int = -100;

// Thermal domains and controller flags
pub const ADL_DL_THERMAL_DOMAIN_OTHER: c_int = 0;
pub const ADL_DL_THERMAL_DOMAIN_GPU: c_int = 1;
pub const ADL_DL_THERMAL_FLAG_INTERRUPT: c_int = 1;
pub const ADL_DL_THERMAL_FLAG_FANCONTROL: c_int = 2;

// Overdrive 5 fan control
pub const ADL_DL_FANCTRL_SUPPORTS_PERCENT_READ: c_int = 1;
pub const ADL_DL_FANCTRL_SUPPORTS_PERCENT_WRITE: c_int = 2;
pub const ADL_DL_FANCTRL_SUPPORTS_RPM_READ: c_int = 4;
pub const ADL_DL_FANCTRL_SUPPORTS_RPM_WRITE: c_int = 8;
pub const ADL_DL_FANCTRL_SPEED_TYPE_PERCENT: c_int = 1;
pub const ADL_DL_FANCTRL_SPEED_TYPE_RPM: c_int = 2;
pub const ADL_DL_FANCTRL_FLAG_USER_DEFINED_SPEED: c_int = 1;

// Overdrive 6 capabilities and fan control
pub const ADL_OD6_CAPABILITY_SCLK_CUSTOMIZATION: c_int = 0x1;
pub const ADL_OD6_CAPABILITY_MCLK_CUSTOMIZATION: c_int = 0x2;
pub const ADL_OD6_CAPABILITY_GPU_ACTIVITY_MONITOR: c_int = 0x4;
pub const ADL_OD6_GETSTATEINFO_DEFAULT_PERFORMANCE: c_int = 0x1;
pub const ADL_OD6_GETSTATEINFO_CUSTOM_PERFORMANCE: c_int = 0x4;
pub const ADL_OD6_SETSTATE_PERFORMANCE: c_int = 0x1;
pub const ADL_OD6_TCCAPS_FANSPEED_CONTROL: c_int = 0x1;
pub const ADL_OD6_TCCAPS_FANSPEED_PERCENT_READ: c_int = 0x100;
pub const ADL_OD6_TCCAPS_FANSPEED_PERCENT_WRITE: c_int = 0x200;
pub const ADL_OD6_TCCAPS_FANSPEED_RPM_READ: c_int = 0x400;
pub const ADL_OD6_TCCAPS_FANSPEED_RPM_WRITE: c_int = 0x800;
pub const ADL_OD6_FANSPEED_TYPE_PERCENT: c_int = 0x1;
pub const ADL_OD6_FANSPEED_TYPE_RPM: c_int = 0x2;
pub const ADL_OD6_FANSPEED_USER_DEFINED: c_int = 0x100;

/// Human-readable name of an ADL status code
pub fn status_name(code: c_int) -> &'static str {
    match code {
        ADL_OK_WAIT => "ADL_OK_WAIT",
        ADL_OK_RESTART => "ADL_OK_RESTART",
        ADL_OK_MODE_CHANGE => "ADL_OK_MODE_CHANGE",
        ADL_OK_WARNING => "ADL_OK_WARNING",
        ADL_OK => "ADL_OK",
        ADL_ERR => "ADL_ERR",
        ADL_ERR_NOT_INIT => "ADL_ERR_NOT_INIT",
        ADL_ERR_INVALID_PARAM => "ADL_ERR_INVALID_PARAM",
        ADL_ERR_INVALID_PARAM_SIZE => "ADL_ERR_INVALID_PARAM_SIZE",
        ADL_ERR_INVALID_ADL_IDX => "ADL_ERR_INVALID_ADL_IDX",
        ADL_ERR_INVALID_CONTROLLER_IDX => "ADL_ERR_INVALID_CONTROLLER_IDX",
        ADL_ERR_INVALID_DIPLAY_IDX => "ADL_ERR_INVALID_DIPLAY_IDX",
        ADL_ERR_NOT_SUPPORTED => "ADL_ERR_NOT_SUPPORTED",
        ADL_ERR_NULL_POINTER => "ADL_ERR_NULL_POINTER",
        ADL_ERR_DISABLED_ADAPTER => "ADL_ERR_DISABLED_ADAPTER",
        ADL_ERR_INVALID_CALLBACK => "ADL_ERR_INVALID_CALLBACK",
        ADL_ERR_RESOURCE_CONFLICT => "ADL_ERR_RESOURCE_CONFLICT",
        ADL_ERR_SET_INCOMPLETE => "ADL_ERR_SET_INCOMPLETE",
        ADL_ERR_NO_XDISPLAY => "ADL_ERR_NO_XDISPLAY",
        ADL_WARNING_NO_DATA => "ADL_WARNING_NO_DATA",
        _ => "unknown status",
    }
}

/// Adapter description returned by `ADL_Adapter_AdapterInfo_Get`
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct AdapterInfo {
    pub size: c_int,
    pub adapter_index: c_int,
    pub udid: [c_char; ADL_MAX_PATH],
    pub bus_number: c_int,
    pub device_number: c_int,
    pub function_number: c_int,
    pub vendor_id: c_int,
    pub adapter_name: [c_char; ADL_MAX_PATH],
    pub display_name: [c_char; ADL_MAX_PATH],
    pub present: c_int,
    #[cfg(windows)]
    pub exist: c_int,
    #[cfg(windows)]
    pub driver_path: [c_char; ADL_MAX_PATH],
    #[cfg(windows)]
    pub driver_path_ext: [c_char; ADL_MAX_PATH],
    #[cfg(windows)]
    pub pnp_string: [c_char; ADL_MAX_PATH],
    #[cfg(windows)]
    pub os_display_index: c_int,
    #[cfg(not(windows))]
    pub x_screen_num: c_int,
    #[cfg(not(windows))]
    pub drv_index: c_int,
    #[cfg(not(windows))]
    pub x_screen_config_name: [c_char; ADL_MAX_PATH],
}

impl Default for AdapterInfo {
    fn default() -> Self {
        // SAFETY: every field is an integer or an integer array, all-zero is valid
        unsafe { mem::zeroed() }
    }
}

/// Write `src` into a fixed ADL string field, truncating and NUL-terminating
pub fn write_c_string(dst: &mut [c_char; ADL_MAX_PATH], src: &str) {
    dst.fill(0);
    for (slot, byte) in dst.iter_mut().zip(src.bytes().take(ADL_MAX_PATH - 1)) {
        *slot = byte as c_char;
    }
}

/// Read a fixed ADL string field up to its first NUL
pub fn read_c_string(src: &[c_char; ADL_MAX_PATH]) -> String {
    let bytes: Vec<u8> = src
        .iter()
        .take_while(|&&c| c != 0)
        .map(|&c| c as u8)
        .collect();
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Min/max/step triple used by Overdrive 5 parameter ranges
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ADLODParameterRange {
    pub min: c_int,
    pub max: c_int,
    pub step: c_int,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ADLODParameters {
    pub size: c_int,
    pub number_of_performance_levels: c_int,
    pub activity_reporting_supported: c_int,
    pub discrete_engine_clock_supported: c_int,
    pub engine_clock: ADLODParameterRange,
    pub memory_clock: ADLODParameterRange,
    pub vddc: ADLODParameterRange,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ADLODPerformanceLevel {
    pub engine_clock: c_int,
    pub memory_clock: c_int,
    pub vddc: c_int,
}

/// Variable-length header: `levels` is really `number_of_performance_levels` long
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct ADLODPerformanceLevels {
    pub size: c_int,
    pub reserved: c_int,
    pub levels: [ADLODPerformanceLevel; 1],
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ADLPMActivity {
    pub size: c_int,
    pub engine_clock: c_int,
    pub memory_clock: c_int,
    pub vddc: c_int,
    pub activity_percent: c_int,
    pub current_performance_level: c_int,
    pub current_bus_speed: c_int,
    pub current_bus_lanes: c_int,
    pub maximum_bus_lanes: c_int,
    pub reserved: c_int,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ADLPowerControlInfo {
    pub min_value: c_int,
    pub max_value: c_int,
    pub step_value: c_int,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ADLThermalControllerInfo {
    pub size: c_int,
    pub thermal_domain: c_int,
    pub domain_index: c_int,
    pub flags: c_int,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ADLTemperature {
    pub size: c_int,
    /// Millidegrees Celsius
    pub temperature: c_int,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ADLFanSpeedInfo {
    pub size: c_int,
    pub flags: c_int,
    pub min_percent: c_int,
    pub max_percent: c_int,
    pub min_rpm: c_int,
    pub max_rpm: c_int,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ADLFanSpeedValue {
    pub size: c_int,
    pub speed_type: c_int,
    pub fan_speed: c_int,
    pub flags: c_int,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ADLOD6ParameterRange {
    pub min: c_int,
    pub max: c_int,
    pub step: c_int,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ADLOD6Capabilities {
    pub capabilities: c_int,
    pub supported_states: c_int,
    pub number_of_performance_levels: c_int,
    pub engine_clock_range: ADLOD6ParameterRange,
    pub memory_clock_range: ADLOD6ParameterRange,
    pub ext_value: c_int,
    pub ext_mask: c_int,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ADLOD6PerformanceLevel {
    pub engine_clock: c_int,
    pub memory_clock: c_int,
}

/// Variable-length header: `levels` is really `number_of_performance_levels` long
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct ADLOD6StateInfo {
    pub number_of_performance_levels: c_int,
    pub ext_value: c_int,
    pub ext_mask: c_int,
    pub levels: [ADLOD6PerformanceLevel; 1],
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ADLOD6CurrentStatus {
    pub engine_clock: c_int,
    pub memory_clock: c_int,
    pub activity_percent: c_int,
    pub current_performance_level: c_int,
    pub current_bus_speed: c_int,
    pub current_bus_lanes: c_int,
    pub maximum_bus_lanes: c_int,
    pub ext_value: c_int,
    pub ext_mask: c_int,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ADLOD6PowerControlInfo {
    pub min_value: c_int,
    pub max_value: c_int,
    pub step_value: c_int,
    pub ext_value: c_int,
    pub ext_mask: c_int,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ADLOD6ThermalControllerCaps {
    pub capabilities: c_int,
    pub fan_min_percent: c_int,
    pub fan_max_percent: c_int,
    pub fan_min_rpm: c_int,
    pub fan_max_rpm: c_int,
    pub ext_value: c_int,
    pub ext_mask: c_int,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ADLOD6FanSpeedInfo {
    pub speed_type: c_int,
    pub fan_speed_percent: c_int,
    pub fan_speed_rpm: c_int,
    pub ext_value: c_int,
    pub ext_mask: c_int,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ADLOD6FanSpeedValue {
    pub speed_type: c_int,
    pub fan_speed: c_int,
    pub ext_value: c_int,
    pub ext_mask: c_int,
}

/// Byte length of a variable-length ADL table holding `count` entries
///
/// The header type already embeds one entry.
pub fn level_table_len<H, L>(count: usize) -> usize {
    mem::size_of::<H>() + count.saturating_sub(1) * mem::size_of::<L>()
}

/// Allocator handed to `ADL_Main_Control_Create`
pub type AdlMainMallocCallback = unsafe extern "system" fn(c_int) -> *mut c_void;

/// Allocate memory on behalf of ADL
///
/// # Safety
/// The returned buffer must be released with [`adl_main_memory_free`].
pub unsafe extern "system" fn adl_main_memory_alloc(size: c_int) -> *mut c_void {
    if size <= 0 {
        return std::ptr::null_mut();
    }
    libc::malloc(size as usize)
}

/// Free a buffer allocated by [`adl_main_memory_alloc`] and null the pointer
///
/// # Safety
/// `buffer` must be null or point to a pointer obtained from
/// [`adl_main_memory_alloc`] (or null).
pub unsafe extern "system" fn adl_main_memory_free(buffer: *mut *mut c_void) {
    if buffer.is_null() || (*buffer).is_null() {
        return;
    }
    libc::free(*buffer);
    *buffer = std::ptr::null_mut();
}

// Entry-point signatures
pub type MainControlCreateFn = unsafe extern "C" fn(AdlMainMallocCallback, c_int) -> c_int;
pub type MainControlDestroyFn = unsafe extern "C" fn() -> c_int;
pub type AdapterNumberOfAdaptersGetFn = unsafe extern "C" fn(*mut c_int) -> c_int;
pub type AdapterAdapterInfoGetFn = unsafe extern "C" fn(*mut AdapterInfo, c_int) -> c_int;
pub type AdapterActiveGetFn = unsafe extern "C" fn(c_int, *mut c_int) -> c_int;
pub type OverdriveCapsFn = unsafe extern "C" fn(c_int, *mut c_int, *mut c_int, *mut c_int) -> c_int;

pub type PowerControlCapsFn = unsafe extern "C" fn(c_int, *mut c_int) -> c_int;
pub type PowerControlGetFn = unsafe extern "C" fn(c_int, *mut c_int, *mut c_int) -> c_int;
pub type PowerControlSetFn = unsafe extern "C" fn(c_int, c_int) -> c_int;

pub type OD5PowerControlInfoGetFn = unsafe extern "C" fn(c_int, *mut ADLPowerControlInfo) -> c_int;
pub type OD5ODParametersGetFn = unsafe extern "C" fn(c_int, *mut ADLODParameters) -> c_int;
pub type OD5ODPerformanceLevelsGetFn =
    unsafe extern "C" fn(c_int, c_int, *mut ADLODPerformanceLevels) -> c_int;
pub type OD5ODPerformanceLevelsSetFn =
    unsafe extern "C" fn(c_int, *mut ADLODPerformanceLevels) -> c_int;
pub type OD5CurrentActivityGetFn = unsafe extern "C" fn(c_int, *mut ADLPMActivity) -> c_int;
pub type OD5ThermalDevicesEnumFn =
    unsafe extern "C" fn(c_int, c_int, *mut ADLThermalControllerInfo) -> c_int;
pub type OD5TemperatureGetFn = unsafe extern "C" fn(c_int, c_int, *mut ADLTemperature) -> c_int;
pub type OD5FanSpeedInfoGetFn = unsafe extern "C" fn(c_int, c_int, *mut ADLFanSpeedInfo) -> c_int;
pub type OD5FanSpeedFn = unsafe extern "C" fn(c_int, c_int, *mut ADLFanSpeedValue) -> c_int;
pub type OD5FanSpeedToDefaultSetFn = unsafe extern "C" fn(c_int, c_int) -> c_int;

pub type OD6PowerControlInfoGetFn =
    unsafe extern "C" fn(c_int, *mut ADLOD6PowerControlInfo) -> c_int;
pub type OD6CapabilitiesGetFn = unsafe extern "C" fn(c_int, *mut ADLOD6Capabilities) -> c_int;
pub type OD6StateInfoGetFn = unsafe extern "C" fn(c_int, c_int, *mut ADLOD6StateInfo) -> c_int;
pub type OD6StateSetFn = unsafe extern "C" fn(c_int, c_int, *mut ADLOD6StateInfo) -> c_int;
pub type OD6CurrentStatusGetFn = unsafe extern "C" fn(c_int, *mut ADLOD6CurrentStatus) -> c_int;
pub type OD6ThermalControllerCapsFn =
    unsafe extern "C" fn(c_int, *mut ADLOD6ThermalControllerCaps) -> c_int;
pub type OD6TemperatureGetFn = unsafe extern "C" fn(c_int, *mut c_int) -> c_int;
pub type OD6FanSpeedGetFn = unsafe extern "C" fn(c_int, *mut ADLOD6FanSpeedInfo) -> c_int;
pub type OD6FanSpeedSetFn = unsafe extern "C" fn(c_int, *mut ADLOD6FanSpeedValue) -> c_int;
pub type OD6FanSpeedResetFn = unsafe extern "C" fn(c_int) -> c_int;

/// Exported symbol names
pub mod symbols {
    pub const MAIN_CONTROL_CREATE: &str = "ADL_Main_Control_Create";
    pub const MAIN_CONTROL_DESTROY: &str = "ADL_Main_Control_Destroy";
    pub const ADAPTER_NUMBER_OF_ADAPTERS_GET: &str = "ADL_Adapter_NumberOfAdapters_Get";
    pub const ADAPTER_ADAPTER_INFO_GET: &str = "ADL_Adapter_AdapterInfo_Get";
    pub const ADAPTER_ACTIVE_GET: &str = "ADL_Adapter_Active_Get";
    pub const OVERDRIVE_CAPS: &str = "ADL_Overdrive_Caps";

    pub const OD5_POWER_CONTROL_CAPS: &str = "ADL_Overdrive5_PowerControl_Caps";
    pub const OD5_POWER_CONTROL_INFO_GET: &str = "ADL_Overdrive5_PowerControlInfo_Get";
    pub const OD5_POWER_CONTROL_GET: &str = "ADL_Overdrive5_PowerControl_Get";
    pub const OD5_POWER_CONTROL_SET: &str = "ADL_Overdrive5_PowerControl_Set";
    pub const OD5_OD_PARAMETERS_GET: &str = "ADL_Overdrive5_ODParameters_Get";
    pub const OD5_OD_PERFORMANCE_LEVELS_GET: &str = "ADL_Overdrive5_ODPerformanceLevels_Get";
    pub const OD5_OD_PERFORMANCE_LEVELS_SET: &str = "ADL_Overdrive5_ODPerformanceLevels_Set";
    pub const OD5_CURRENT_ACTIVITY_GET: &str = "ADL_Overdrive5_CurrentActivity_Get";
    pub const OD5_THERMAL_DEVICES_ENUM: &str = "ADL_Overdrive5_ThermalDevices_Enum";
    pub const OD5_TEMPERATURE_GET: &str = "ADL_Overdrive5_Temperature_Get";
    pub const OD5_FAN_SPEED_INFO_GET: &str = "ADL_Overdrive5_FanSpeedInfo_Get";
    pub const OD5_FAN_SPEED_GET: &str = "ADL_Overdrive5_FanSpeed_Get";
    pub const OD5_FAN_SPEED_SET: &str = "ADL_Overdrive5_FanSpeed_Set";
    pub const OD5_FAN_SPEED_TO_DEFAULT_SET: &str = "ADL_Overdrive5_FanSpeedToDefault_Set";

    pub const OD6_POWER_CONTROL_CAPS: &str = "ADL_Overdrive6_PowerControl_Caps";
    pub const OD6_POWER_CONTROL_INFO_GET: &str = "ADL_Overdrive6_PowerControlInfo_Get";
    pub const OD6_POWER_CONTROL_GET: &str = "ADL_Overdrive6_PowerControl_Get";
    pub const OD6_POWER_CONTROL_SET: &str = "ADL_Overdrive6_PowerControl_Set";
    pub const OD6_CAPABILITIES_GET: &str = "ADL_Overdrive6_Capabilities_Get";
    pub const OD6_STATE_INFO_GET: &str = "ADL_Overdrive6_StateInfo_Get";
    pub const OD6_STATE_SET: &str = "ADL_Overdrive6_State_Set";
    pub const OD6_CURRENT_STATUS_GET: &str = "ADL_Overdrive6_CurrentStatus_Get";
    pub const OD6_THERMAL_CONTROLLER_CAPS: &str = "ADL_Overdrive6_ThermalController_Caps";
    pub const OD6_TEMPERATURE_GET: &str = "ADL_Overdrive6_Temperature_Get";
    pub const OD6_FAN_SPEED_GET: &str = "ADL_Overdrive6_FanSpeed_Get";
    pub const OD6_FAN_SPEED_SET: &str = "ADL_Overdrive6_FanSpeed_Set";
    pub const OD6_FAN_SPEED_RESET: &str = "ADL_Overdrive6_FanSpeed_Reset";
}
