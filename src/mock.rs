//! Mock implementations for testing
//!
//! Provides an in-memory [`AdlApi`] so the binding can be exercised without
//! the vendor library or AMD hardware. Every entry-point call is recorded.

use crate::adl::api::{AdlApi, AdlResult, OverdriveCaps, PowerControlReading};
use crate::adl::sys::{self, symbols};
use crate::adl::sys::{
    ADLFanSpeedInfo, ADLFanSpeedValue, ADLOD6Capabilities, ADLOD6CurrentStatus,
    ADLOD6FanSpeedInfo, ADLOD6FanSpeedValue, ADLOD6ParameterRange, ADLOD6PerformanceLevel,
    ADLOD6PowerControlInfo, ADLOD6ThermalControllerCaps, ADLODParameterRange, ADLODParameters,
    ADLODPerformanceLevel, ADLPMActivity, ADLPowerControlInfo, ADLThermalControllerInfo,
    AdapterInfo,
};
use crate::error::AdlError;

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// State of one mock adapter
#[derive(Debug, Clone)]
pub struct MockAdapter {
    pub index: i32,
    pub name: String,
    pub vendor_id: i32,
    pub bus_number: i32,
    pub active: bool,
    pub caps: OverdriveCaps,
    pub power_control_supported: bool,
    pub power_control_info: ADLPowerControlInfo,
    pub power_control: PowerControlReading,
    pub engine_clock_range: ADLODParameterRange,
    pub memory_clock_range: ADLODParameterRange,
    pub vddc_range: ADLODParameterRange,
    pub stock_levels: Vec<ADLODPerformanceLevel>,
    pub current_levels: Vec<ADLODPerformanceLevel>,
    pub activity: ADLPMActivity,
    /// Channels answered by thermal probing before `ADL_WARNING_NO_DATA`
    pub thermal_channels: i32,
    /// Channel at which thermal probing fails with a generic error
    pub thermal_failure_at: Option<i32>,
    /// Millidegrees Celsius
    pub temperature: i32,
    pub fan_info: ADLFanSpeedInfo,
    pub fan_percent: i32,
    pub fan_rpm: i32,
    pub fan_default_percent: i32,
    pub fan_user_defined: bool,
}

impl MockAdapter {
    /// An Overdrive 5 adapter with three performance levels
    pub fn od5(index: i32) -> Self {
        let levels = vec![
            level(30_000, 15_000, 950),
            level(50_000, 125_000, 1000),
            level(92_500, 137_500, 1170),
        ];

        Self {
            index,
            name: format!("AMD Radeon Mock {}", index),
            vendor_id: sys::AMD_VENDOR_ID,
            bus_number: index + 1,
            active: true,
            caps: OverdriveCaps {
                supported: 1,
                enabled: 1,
                version: 5,
            },
            power_control_supported: true,
            power_control_info: ADLPowerControlInfo {
                min_value: -20,
                max_value: 20,
                step_value: 1,
            },
            power_control: PowerControlReading {
                current: 0,
                default: 0,
            },
            engine_clock_range: ADLODParameterRange {
                min: 30_000,
                max: 120_000,
                step: 500,
            },
            memory_clock_range: ADLODParameterRange {
                min: 15_000,
                max: 160_000,
                step: 500,
            },
            vddc_range: ADLODParameterRange {
                min: 800,
                max: 1300,
                step: 5,
            },
            stock_levels: levels.clone(),
            current_levels: levels,
            activity: ADLPMActivity {
                engine_clock: 92_500,
                memory_clock: 137_500,
                vddc: 1170,
                activity_percent: 37,
                current_performance_level: 2,
                current_bus_speed: 5000,
                current_bus_lanes: 16,
                maximum_bus_lanes: 16,
                ..Default::default()
            },
            thermal_channels: 1,
            thermal_failure_at: None,
            temperature: 55_000,
            fan_info: ADLFanSpeedInfo {
                flags: sys::ADL_DL_FANCTRL_SUPPORTS_PERCENT_READ
                    | sys::ADL_DL_FANCTRL_SUPPORTS_PERCENT_WRITE
                    | sys::ADL_DL_FANCTRL_SUPPORTS_RPM_READ,
                min_percent: 20,
                max_percent: 100,
                min_rpm: 0,
                max_rpm: 4500,
                ..Default::default()
            },
            fan_percent: 35,
            fan_rpm: 1600,
            fan_default_percent: 35,
            fan_user_defined: false,
        }
    }

    /// An Overdrive 6 adapter with two performance levels
    pub fn od6(index: i32) -> Self {
        let levels = vec![level(30_000, 15_000, 0), level(100_000, 125_000, 0)];
        Self {
            caps: OverdriveCaps {
                supported: 1,
                enabled: 1,
                version: 6,
            },
            stock_levels: levels.clone(),
            current_levels: levels,
            power_control_info: ADLPowerControlInfo {
                min_value: -50,
                max_value: 50,
                step_value: 1,
            },
            ..Self::od5(index)
        }
    }

    pub fn with_vendor_id(mut self, vendor_id: i32) -> Self {
        self.vendor_id = vendor_id;
        self
    }

    pub fn with_version(mut self, version: i32) -> Self {
        self.caps.version = version;
        self
    }

    pub fn with_bus_number(mut self, bus_number: i32) -> Self {
        self.bus_number = bus_number;
        self
    }

    pub fn with_thermal_channels(mut self, channels: i32) -> Self {
        self.thermal_channels = channels;
        self
    }

    fn is_version(&self, version: i32) -> bool {
        self.caps.version == version
    }

    fn od6_fan_caps(&self) -> i32 {
        let mapping = [
            (
                sys::ADL_DL_FANCTRL_SUPPORTS_PERCENT_READ,
                sys::ADL_OD6_TCCAPS_FANSPEED_PERCENT_READ,
            ),
            (
                sys::ADL_DL_FANCTRL_SUPPORTS_PERCENT_WRITE,
                sys::ADL_OD6_TCCAPS_FANSPEED_PERCENT_WRITE,
            ),
            (
                sys::ADL_DL_FANCTRL_SUPPORTS_RPM_READ,
                sys::ADL_OD6_TCCAPS_FANSPEED_RPM_READ,
            ),
            (
                sys::ADL_DL_FANCTRL_SUPPORTS_RPM_WRITE,
                sys::ADL_OD6_TCCAPS_FANSPEED_RPM_WRITE,
            ),
        ];
        mapping
            .iter()
            .filter(|(od5, _)| self.fan_info.flags & od5 != 0)
            .fold(sys::ADL_OD6_TCCAPS_FANSPEED_CONTROL, |acc, (_, od6)| {
                acc | od6
            })
    }
}

fn level(engine_clock: i32, memory_clock: i32, vddc: i32) -> ADLODPerformanceLevel {
    ADLODPerformanceLevel {
        engine_clock,
        memory_clock,
        vddc,
    }
}

fn od6_range(range: ADLODParameterRange) -> ADLOD6ParameterRange {
    ADLOD6ParameterRange {
        min: range.min,
        max: range.max,
        step: range.step,
    }
}

#[derive(Debug, Default)]
struct MockState {
    adapters: Vec<MockAdapter>,
    calls: Vec<&'static str>,
    missing: HashSet<&'static str>,
    failures: HashMap<&'static str, i32>,
    control_created: bool,
}

impl MockState {
    fn adapter(&mut self, symbol: &'static str, index: i32) -> AdlResult<&mut MockAdapter> {
        self.adapters
            .iter_mut()
            .find(|a| a.index == index)
            .ok_or(AdlError::CallFailed {
                symbol,
                code: sys::ADL_ERR_INVALID_ADL_IDX,
            })
    }

    /// Adapter that speaks the given overdrive family
    fn family(
        &mut self,
        symbol: &'static str,
        index: i32,
        version: i32,
    ) -> AdlResult<&mut MockAdapter> {
        let adapter = self.adapter(symbol, index)?;
        if !adapter.is_version(version) {
            return Err(AdlError::CallFailed {
                symbol,
                code: sys::ADL_ERR_NOT_SUPPORTED,
            });
        }
        Ok(adapter)
    }
}

/// In-memory ADL entry-point surface
///
/// Clones share state, so a test can keep a handle after moving the mock
/// into an [`Overdrive`](crate::adl::Overdrive).
#[derive(Debug, Clone, Default)]
pub struct MockAdl {
    state: Arc<Mutex<MockState>>,
}

impl MockAdl {
    /// Create a mock with no adapters
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: add an adapter
    pub fn with_adapter(self, adapter: MockAdapter) -> Self {
        self.lock().adapters.push(adapter);
        self
    }

    /// Builder: make a symbol unresolvable
    pub fn with_missing_symbol(self, symbol: &'static str) -> Self {
        self.lock().missing.insert(symbol);
        self
    }

    /// Builder: make a symbol return `code`
    pub fn with_failure(self, symbol: &'static str, code: i32) -> Self {
        self.lock().failures.insert(symbol, code);
        self
    }

    /// Every entry point invoked so far, in order
    pub fn calls(&self) -> Vec<&'static str> {
        self.lock().calls.clone()
    }

    /// Number of times `symbol` was invoked
    pub fn call_count(&self, symbol: &str) -> usize {
        self.lock().calls.iter().filter(|&&s| s == symbol).count()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    /// Snapshot of an adapter's state
    pub fn adapter(&self, index: i32) -> Option<MockAdapter> {
        self.lock().adapters.iter().find(|a| a.index == index).cloned()
    }

    /// Mutate an adapter in place
    pub fn update_adapter(&self, index: i32, f: impl FnOnce(&mut MockAdapter)) {
        if let Some(adapter) = self.lock().adapters.iter_mut().find(|a| a.index == index) {
            f(adapter);
        }
    }

    pub fn control_created(&self) -> bool {
        self.lock().control_created
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record the call and apply injected symbol/status failures
    fn enter(&self, symbol: &'static str) -> AdlResult<MutexGuard<'_, MockState>> {
        let mut state = self.lock();
        state.calls.push(symbol);
        if state.missing.contains(symbol) {
            return Err(AdlError::SymbolUnavailable(symbol));
        }
        if let Some(&code) = state.failures.get(symbol) {
            return Err(AdlError::CallFailed { symbol, code });
        }
        Ok(state)
    }
}

impl AdlApi for MockAdl {
    fn main_control_create(&mut self, _connected_only: bool) -> AdlResult<()> {
        let mut state = self.enter(symbols::MAIN_CONTROL_CREATE)?;
        state.control_created = true;
        Ok(())
    }

    fn main_control_destroy(&mut self) -> AdlResult<()> {
        let mut state = self.enter(symbols::MAIN_CONTROL_DESTROY)?;
        state.control_created = false;
        Ok(())
    }

    fn adapter_count(&mut self) -> AdlResult<i32> {
        let state = self.enter(symbols::ADAPTER_NUMBER_OF_ADAPTERS_GET)?;
        Ok(state.adapters.len() as i32)
    }

    fn adapter_info(&mut self, count: usize) -> AdlResult<Vec<AdapterInfo>> {
        let state = self.enter(symbols::ADAPTER_ADAPTER_INFO_GET)?;
        let infos = state
            .adapters
            .iter()
            .take(count)
            .map(|adapter| {
                let mut info = AdapterInfo {
                    size: std::mem::size_of::<AdapterInfo>() as i32,
                    adapter_index: adapter.index,
                    vendor_id: adapter.vendor_id,
                    bus_number: adapter.bus_number,
                    present: 1,
                    ..Default::default()
                };
                sys::write_c_string(&mut info.adapter_name, &adapter.name);
                sys::write_c_string(&mut info.display_name, &format!(":0.{}", adapter.index));
                sys::write_c_string(&mut info.udid, &format!("MOCK-UDID-{:04}", adapter.index));
                info
            })
            .collect();
        Ok(infos)
    }

    fn adapter_active(&mut self, adapter: i32) -> AdlResult<bool> {
        let mut state = self.enter(symbols::ADAPTER_ACTIVE_GET)?;
        Ok(state.adapter(symbols::ADAPTER_ACTIVE_GET, adapter)?.active)
    }

    fn overdrive_caps(&mut self, adapter: i32) -> AdlResult<OverdriveCaps> {
        let mut state = self.enter(symbols::OVERDRIVE_CAPS)?;
        Ok(state.adapter(symbols::OVERDRIVE_CAPS, adapter)?.caps)
    }

    fn od5_power_control_caps(&mut self, adapter: i32) -> AdlResult<bool> {
        let symbol = symbols::OD5_POWER_CONTROL_CAPS;
        let mut state = self.enter(symbol)?;
        Ok(state.family(symbol, adapter, 5)?.power_control_supported)
    }

    fn od5_power_control_info(&mut self, adapter: i32) -> AdlResult<ADLPowerControlInfo> {
        let symbol = symbols::OD5_POWER_CONTROL_INFO_GET;
        let mut state = self.enter(symbol)?;
        Ok(state.family(symbol, adapter, 5)?.power_control_info)
    }

    fn od5_power_control_get(&mut self, adapter: i32) -> AdlResult<PowerControlReading> {
        let symbol = symbols::OD5_POWER_CONTROL_GET;
        let mut state = self.enter(symbol)?;
        Ok(state.family(symbol, adapter, 5)?.power_control)
    }

    fn od5_power_control_set(&mut self, adapter: i32, value: i32) -> AdlResult<()> {
        let symbol = symbols::OD5_POWER_CONTROL_SET;
        let mut state = self.enter(symbol)?;
        let adapter = state.family(symbol, adapter, 5)?;
        let info = adapter.power_control_info;
        if value < info.min_value || value > info.max_value {
            return Err(AdlError::CallFailed {
                symbol,
                code: sys::ADL_ERR_INVALID_PARAM,
            });
        }
        adapter.power_control.current = value;
        Ok(())
    }

    fn od5_parameters(&mut self, adapter: i32) -> AdlResult<ADLODParameters> {
        let symbol = symbols::OD5_OD_PARAMETERS_GET;
        let mut state = self.enter(symbol)?;
        let adapter = state.family(symbol, adapter, 5)?;
        Ok(ADLODParameters {
            size: std::mem::size_of::<ADLODParameters>() as i32,
            number_of_performance_levels: adapter.current_levels.len() as i32,
            activity_reporting_supported: 1,
            discrete_engine_clock_supported: 0,
            engine_clock: adapter.engine_clock_range,
            memory_clock: adapter.memory_clock_range,
            vddc: adapter.vddc_range,
        })
    }

    fn od5_performance_levels(
        &mut self,
        adapter: i32,
        default: bool,
        count: usize,
    ) -> AdlResult<Vec<ADLODPerformanceLevel>> {
        let symbol = symbols::OD5_OD_PERFORMANCE_LEVELS_GET;
        let mut state = self.enter(symbol)?;
        let adapter = state.family(symbol, adapter, 5)?;
        let table = if default {
            &adapter.stock_levels
        } else {
            &adapter.current_levels
        };
        if count != table.len() {
            return Err(AdlError::CallFailed {
                symbol,
                code: sys::ADL_ERR_INVALID_PARAM_SIZE,
            });
        }
        Ok(table.clone())
    }

    fn od5_set_performance_levels(
        &mut self,
        adapter: i32,
        levels: &[ADLODPerformanceLevel],
    ) -> AdlResult<()> {
        let symbol = symbols::OD5_OD_PERFORMANCE_LEVELS_SET;
        let mut state = self.enter(symbol)?;
        let adapter = state.family(symbol, adapter, 5)?;
        if levels.len() != adapter.current_levels.len() {
            return Err(AdlError::CallFailed {
                symbol,
                code: sys::ADL_ERR_INVALID_PARAM_SIZE,
            });
        }
        adapter.current_levels = levels.to_vec();
        Ok(())
    }

    fn od5_current_activity(&mut self, adapter: i32) -> AdlResult<ADLPMActivity> {
        let symbol = symbols::OD5_CURRENT_ACTIVITY_GET;
        let mut state = self.enter(symbol)?;
        Ok(state.family(symbol, adapter, 5)?.activity)
    }

    fn od5_thermal_device(
        &mut self,
        adapter: i32,
        channel: i32,
    ) -> AdlResult<ADLThermalControllerInfo> {
        let symbol = symbols::OD5_THERMAL_DEVICES_ENUM;
        let mut state = self.enter(symbol)?;
        let adapter = state.family(symbol, adapter, 5)?;
        if adapter.thermal_failure_at == Some(channel) {
            return Err(AdlError::CallFailed {
                symbol,
                code: sys::ADL_ERR,
            });
        }
        if channel >= adapter.thermal_channels {
            return Err(AdlError::CallFailed {
                symbol,
                code: sys::ADL_WARNING_NO_DATA,
            });
        }
        Ok(ADLThermalControllerInfo {
            size: std::mem::size_of::<ADLThermalControllerInfo>() as i32,
            thermal_domain: sys::ADL_DL_THERMAL_DOMAIN_GPU,
            domain_index: channel,
            flags: sys::ADL_DL_THERMAL_FLAG_FANCONTROL,
        })
    }

    fn od5_temperature(&mut self, adapter: i32, channel: i32) -> AdlResult<i32> {
        let symbol = symbols::OD5_TEMPERATURE_GET;
        let mut state = self.enter(symbol)?;
        let adapter = state.family(symbol, adapter, 5)?;
        if channel < 0 || channel >= adapter.thermal_channels {
            return Err(AdlError::CallFailed {
                symbol,
                code: sys::ADL_ERR_INVALID_PARAM,
            });
        }
        Ok(adapter.temperature)
    }

    fn od5_fan_speed_info(&mut self, adapter: i32, _channel: i32) -> AdlResult<ADLFanSpeedInfo> {
        let symbol = symbols::OD5_FAN_SPEED_INFO_GET;
        let mut state = self.enter(symbol)?;
        Ok(state.family(symbol, adapter, 5)?.fan_info)
    }

    fn od5_fan_speed_get(
        &mut self,
        adapter: i32,
        _channel: i32,
        speed_type: i32,
    ) -> AdlResult<ADLFanSpeedValue> {
        let symbol = symbols::OD5_FAN_SPEED_GET;
        let mut state = self.enter(symbol)?;
        let adapter = state.family(symbol, adapter, 5)?;
        let fan_speed = match speed_type {
            sys::ADL_DL_FANCTRL_SPEED_TYPE_PERCENT => adapter.fan_percent,
            sys::ADL_DL_FANCTRL_SPEED_TYPE_RPM => adapter.fan_rpm,
            _ => {
                return Err(AdlError::CallFailed {
                    symbol,
                    code: sys::ADL_ERR_INVALID_PARAM,
                })
            }
        };
        Ok(ADLFanSpeedValue {
            size: std::mem::size_of::<ADLFanSpeedValue>() as i32,
            speed_type,
            fan_speed,
            flags: if adapter.fan_user_defined {
                sys::ADL_DL_FANCTRL_FLAG_USER_DEFINED_SPEED
            } else {
                0
            },
        })
    }

    fn od5_fan_speed_set(
        &mut self,
        adapter: i32,
        _channel: i32,
        value: ADLFanSpeedValue,
    ) -> AdlResult<()> {
        let symbol = symbols::OD5_FAN_SPEED_SET;
        let mut state = self.enter(symbol)?;
        let adapter = state.family(symbol, adapter, 5)?;
        match value.speed_type {
            sys::ADL_DL_FANCTRL_SPEED_TYPE_PERCENT => adapter.fan_percent = value.fan_speed,
            sys::ADL_DL_FANCTRL_SPEED_TYPE_RPM => adapter.fan_rpm = value.fan_speed,
            _ => {
                return Err(AdlError::CallFailed {
                    symbol,
                    code: sys::ADL_ERR_INVALID_PARAM,
                })
            }
        }
        adapter.fan_user_defined = value.flags & sys::ADL_DL_FANCTRL_FLAG_USER_DEFINED_SPEED != 0;
        Ok(())
    }

    fn od5_fan_speed_to_default(&mut self, adapter: i32, _channel: i32) -> AdlResult<()> {
        let symbol = symbols::OD5_FAN_SPEED_TO_DEFAULT_SET;
        let mut state = self.enter(symbol)?;
        let adapter = state.family(symbol, adapter, 5)?;
        adapter.fan_percent = adapter.fan_default_percent;
        adapter.fan_user_defined = false;
        Ok(())
    }

    fn od6_power_control_caps(&mut self, adapter: i32) -> AdlResult<bool> {
        let symbol = symbols::OD6_POWER_CONTROL_CAPS;
        let mut state = self.enter(symbol)?;
        Ok(state.family(symbol, adapter, 6)?.power_control_supported)
    }

    fn od6_power_control_info(&mut self, adapter: i32) -> AdlResult<ADLOD6PowerControlInfo> {
        let symbol = symbols::OD6_POWER_CONTROL_INFO_GET;
        let mut state = self.enter(symbol)?;
        let info = state.family(symbol, adapter, 6)?.power_control_info;
        Ok(ADLOD6PowerControlInfo {
            min_value: info.min_value,
            max_value: info.max_value,
            step_value: info.step_value,
            ..Default::default()
        })
    }

    fn od6_power_control_get(&mut self, adapter: i32) -> AdlResult<PowerControlReading> {
        let symbol = symbols::OD6_POWER_CONTROL_GET;
        let mut state = self.enter(symbol)?;
        Ok(state.family(symbol, adapter, 6)?.power_control)
    }

    fn od6_power_control_set(&mut self, adapter: i32, value: i32) -> AdlResult<()> {
        let symbol = symbols::OD6_POWER_CONTROL_SET;
        let mut state = self.enter(symbol)?;
        let adapter = state.family(symbol, adapter, 6)?;
        let info = adapter.power_control_info;
        if value < info.min_value || value > info.max_value {
            return Err(AdlError::CallFailed {
                symbol,
                code: sys::ADL_ERR_INVALID_PARAM,
            });
        }
        adapter.power_control.current = value;
        Ok(())
    }

    fn od6_capabilities(&mut self, adapter: i32) -> AdlResult<ADLOD6Capabilities> {
        let symbol = symbols::OD6_CAPABILITIES_GET;
        let mut state = self.enter(symbol)?;
        let adapter = state.family(symbol, adapter, 6)?;
        Ok(ADLOD6Capabilities {
            capabilities: sys::ADL_OD6_CAPABILITY_SCLK_CUSTOMIZATION
                | sys::ADL_OD6_CAPABILITY_MCLK_CUSTOMIZATION
                | sys::ADL_OD6_CAPABILITY_GPU_ACTIVITY_MONITOR,
            supported_states: sys::ADL_OD6_SETSTATE_PERFORMANCE,
            number_of_performance_levels: adapter.current_levels.len() as i32,
            engine_clock_range: od6_range(adapter.engine_clock_range),
            memory_clock_range: od6_range(adapter.memory_clock_range),
            ..Default::default()
        })
    }

    fn od6_state_info(
        &mut self,
        adapter: i32,
        state_type: i32,
        count: usize,
    ) -> AdlResult<Vec<ADLOD6PerformanceLevel>> {
        let symbol = symbols::OD6_STATE_INFO_GET;
        let mut state = self.enter(symbol)?;
        let adapter = state.family(symbol, adapter, 6)?;
        let table = match state_type {
            sys::ADL_OD6_GETSTATEINFO_DEFAULT_PERFORMANCE => &adapter.stock_levels,
            sys::ADL_OD6_GETSTATEINFO_CUSTOM_PERFORMANCE => &adapter.current_levels,
            _ => {
                return Err(AdlError::CallFailed {
                    symbol,
                    code: sys::ADL_ERR_INVALID_PARAM,
                })
            }
        };
        if count != table.len() {
            return Err(AdlError::CallFailed {
                symbol,
                code: sys::ADL_ERR_INVALID_PARAM_SIZE,
            });
        }
        Ok(table
            .iter()
            .map(|l| ADLOD6PerformanceLevel {
                engine_clock: l.engine_clock,
                memory_clock: l.memory_clock,
            })
            .collect())
    }

    fn od6_state_set(
        &mut self,
        adapter: i32,
        state_type: i32,
        levels: &[ADLOD6PerformanceLevel],
    ) -> AdlResult<()> {
        let symbol = symbols::OD6_STATE_SET;
        let mut state = self.enter(symbol)?;
        let adapter = state.family(symbol, adapter, 6)?;
        if state_type != sys::ADL_OD6_SETSTATE_PERFORMANCE
            || levels.len() != adapter.current_levels.len()
        {
            return Err(AdlError::CallFailed {
                symbol,
                code: sys::ADL_ERR_INVALID_PARAM,
            });
        }
        for (current, new) in adapter.current_levels.iter_mut().zip(levels) {
            current.engine_clock = new.engine_clock;
            current.memory_clock = new.memory_clock;
        }
        Ok(())
    }

    fn od6_current_status(&mut self, adapter: i32) -> AdlResult<ADLOD6CurrentStatus> {
        let symbol = symbols::OD6_CURRENT_STATUS_GET;
        let mut state = self.enter(symbol)?;
        let activity = state.family(symbol, adapter, 6)?.activity;
        Ok(ADLOD6CurrentStatus {
            engine_clock: activity.engine_clock,
            memory_clock: activity.memory_clock,
            activity_percent: activity.activity_percent,
            current_performance_level: activity.current_performance_level,
            current_bus_speed: activity.current_bus_speed,
            current_bus_lanes: activity.current_bus_lanes,
            maximum_bus_lanes: activity.maximum_bus_lanes,
            ..Default::default()
        })
    }

    fn od6_thermal_controller_caps(
        &mut self,
        adapter: i32,
    ) -> AdlResult<ADLOD6ThermalControllerCaps> {
        let symbol = symbols::OD6_THERMAL_CONTROLLER_CAPS;
        let mut state = self.enter(symbol)?;
        let adapter = state.family(symbol, adapter, 6)?;
        Ok(ADLOD6ThermalControllerCaps {
            capabilities: adapter.od6_fan_caps(),
            fan_min_percent: adapter.fan_info.min_percent,
            fan_max_percent: adapter.fan_info.max_percent,
            fan_min_rpm: adapter.fan_info.min_rpm,
            fan_max_rpm: adapter.fan_info.max_rpm,
            ..Default::default()
        })
    }

    fn od6_temperature(&mut self, adapter: i32) -> AdlResult<i32> {
        let symbol = symbols::OD6_TEMPERATURE_GET;
        let mut state = self.enter(symbol)?;
        Ok(state.family(symbol, adapter, 6)?.temperature)
    }

    fn od6_fan_speed_get(&mut self, adapter: i32) -> AdlResult<ADLOD6FanSpeedInfo> {
        let symbol = symbols::OD6_FAN_SPEED_GET;
        let mut state = self.enter(symbol)?;
        let adapter = state.family(symbol, adapter, 6)?;
        let mut speed_type =
            sys::ADL_OD6_FANSPEED_TYPE_PERCENT | sys::ADL_OD6_FANSPEED_TYPE_RPM;
        if adapter.fan_user_defined {
            speed_type |= sys::ADL_OD6_FANSPEED_USER_DEFINED;
        }
        Ok(ADLOD6FanSpeedInfo {
            speed_type,
            fan_speed_percent: adapter.fan_percent,
            fan_speed_rpm: adapter.fan_rpm,
            ..Default::default()
        })
    }

    fn od6_fan_speed_set(&mut self, adapter: i32, value: ADLOD6FanSpeedValue) -> AdlResult<()> {
        let symbol = symbols::OD6_FAN_SPEED_SET;
        let mut state = self.enter(symbol)?;
        let adapter = state.family(symbol, adapter, 6)?;
        match value.speed_type {
            sys::ADL_OD6_FANSPEED_TYPE_PERCENT => adapter.fan_percent = value.fan_speed,
            sys::ADL_OD6_FANSPEED_TYPE_RPM => adapter.fan_rpm = value.fan_speed,
            _ => {
                return Err(AdlError::CallFailed {
                    symbol,
                    code: sys::ADL_ERR_INVALID_PARAM,
                })
            }
        }
        adapter.fan_user_defined = true;
        Ok(())
    }

    fn od6_fan_speed_reset(&mut self, adapter: i32) -> AdlResult<()> {
        let symbol = symbols::OD6_FAN_SPEED_RESET;
        let mut state = self.enter(symbol)?;
        let adapter = state.family(symbol, adapter, 6)?;
        adapter.fan_percent = adapter.fan_default_percent;
        adapter.fan_user_defined = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_records_calls() {
        let mut mock = MockAdl::new().with_adapter(MockAdapter::od5(0));
        assert_eq!(mock.adapter_count().unwrap(), 1);
        assert!(mock.adapter_active(0).unwrap());
        assert_eq!(
            mock.calls(),
            vec![
                symbols::ADAPTER_NUMBER_OF_ADAPTERS_GET,
                symbols::ADAPTER_ACTIVE_GET
            ]
        );
    }

    #[test]
    fn test_mock_missing_symbol() {
        let mut mock = MockAdl::new().with_missing_symbol(symbols::ADAPTER_NUMBER_OF_ADAPTERS_GET);
        assert_eq!(
            mock.adapter_count(),
            Err(AdlError::SymbolUnavailable(
                symbols::ADAPTER_NUMBER_OF_ADAPTERS_GET
            ))
        );
    }

    #[test]
    fn test_mock_rejects_wrong_family() {
        let mut mock = MockAdl::new().with_adapter(MockAdapter::od6(0));
        assert!(matches!(
            mock.od5_power_control_caps(0),
            Err(AdlError::CallFailed {
                code: sys::ADL_ERR_NOT_SUPPORTED,
                ..
            })
        ));
        assert!(mock.od6_power_control_caps(0).unwrap());
    }

    #[test]
    fn test_mock_thermal_no_data() {
        let mut mock =
            MockAdl::new().with_adapter(MockAdapter::od5(0).with_thermal_channels(2));
        assert!(mock.od5_thermal_device(0, 1).is_ok());
        assert!(mock.od5_thermal_device(0, 2).unwrap_err().is_no_data());
    }

    #[test]
    fn test_mock_clones_share_state() {
        let mock = MockAdl::new().with_adapter(MockAdapter::od5(0));
        let mut handle = mock.clone();
        handle.od5_power_control_set(0, 10).unwrap();
        assert_eq!(mock.adapter(0).unwrap().power_control.current, 10);
    }
}
