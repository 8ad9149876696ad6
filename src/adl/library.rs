//! ADL library loader
//!
//! Loads the vendor shared library with `libloading`, resolves entry points
//! lazily into a per-symbol cache and implements [`AdlApi`] on top of them.

use crate::adl::api::{AdlApi, AdlResult, OverdriveCaps, PowerControlReading};
use crate::adl::sys::{self, symbols};
use crate::adl::sys::{
    ADLFanSpeedInfo, ADLFanSpeedValue, ADLOD6Capabilities, ADLOD6CurrentStatus,
    ADLOD6FanSpeedInfo, ADLOD6FanSpeedValue, ADLOD6PerformanceLevel, ADLOD6PowerControlInfo,
    ADLOD6StateInfo, ADLOD6ThermalControllerCaps, ADLODParameters, ADLODPerformanceLevel,
    ADLODPerformanceLevels, ADLPMActivity, ADLPowerControlInfo, ADLTemperature,
    ADLThermalControllerInfo, AdapterInfo,
};
use crate::error::AdlError;

use libloading::Library;
use std::collections::HashMap;
use std::ffi::{c_int, c_void};
use std::marker::PhantomData;
use std::{mem, slice};

/// Candidate library names, tried in order
///
/// A 32-bit process on 64-bit Windows cannot load `atiadlxx.dll` and needs
/// the `atiadlxy.dll` build instead.
#[cfg(windows)]
pub const LIBRARY_NAMES: &[&str] = &["atiadlxx.dll", "atiadlxy.dll"];

#[cfg(not(windows))]
pub const LIBRARY_NAMES: &[&str] = &["libatiadlxx.so"];

/// Loaded ADL library with a lazily populated symbol cache
pub struct AdlLibrary {
    symbols: HashMap<&'static str, *mut c_void>,
    control_created: bool,
    lib: Library,
}

// SAFETY: the cached addresses point into `lib`, which lives as long as the
// cache. Callers serialize all calls through `&mut self`.
unsafe impl Send for AdlLibrary {}

impl AdlLibrary {
    /// Load the platform's ADL library
    pub fn load() -> Result<Self, AdlError> {
        Self::load_from(LIBRARY_NAMES)
    }

    /// Load the first library from `names` that opens
    pub fn load_from<S: AsRef<str>>(names: &[S]) -> Result<Self, AdlError> {
        for name in names {
            let name = name.as_ref();
            // SAFETY: loading runs the library's initializers; ADL has no
            // initialization requirements beyond ADL_Main_Control_Create.
            match unsafe { open_library(name) } {
                Ok(lib) => {
                    log::debug!("Loaded ADL library");
                    return Ok(Self {
                        symbols: HashMap::new(),
                        control_created: false,
                        lib,
                    });
                }
                Err(e) => log::debug!("Failed to load {}: {}", name, e),
            }
        }

        let tried: Vec<&str> = names.iter().map(AsRef::as_ref).collect();
        Err(AdlError::LibraryNotFound(tried.join(", ")))
    }

    /// Number of entry points resolved so far
    pub fn cached_symbols(&self) -> usize {
        self.symbols.len()
    }

    /// Resolve `name`, consulting the cache first
    ///
    /// # Safety
    /// `F` must be the function pointer type matching the ADL prototype of `name`.
    unsafe fn entry<F: Copy>(&mut self, name: &'static str) -> AdlResult<F> {
        debug_assert_eq!(mem::size_of::<F>(), mem::size_of::<*mut c_void>());

        let address = match self.symbols.get(name) {
            Some(&address) => address,
            None => {
                let address = self
                    .lib
                    .get::<*mut c_void>(name.as_bytes())
                    .map(|symbol| *symbol)
                    .map_err(|e| {
                        log::debug!("Symbol {} not resolved: {}", name, e);
                        AdlError::SymbolUnavailable(name)
                    })?;
                if address.is_null() {
                    return Err(AdlError::SymbolUnavailable(name));
                }
                self.symbols.insert(name, address);
                address
            }
        };

        Ok(mem::transmute_copy::<*mut c_void, F>(&address))
    }
}

impl Drop for AdlLibrary {
    fn drop(&mut self) {
        log::debug!(
            "Releasing ADL library ({} entry points resolved)",
            self.cached_symbols()
        );
        if self.control_created {
            if let Err(e) = self.main_control_destroy() {
                log::warn!("{}", e);
            }
        }
        self.symbols.clear();
    }
}

#[cfg(unix)]
unsafe fn open_library(name: &str) -> Result<Library, libloading::Error> {
    use libloading::os::unix::{Library as UnixLibrary, RTLD_GLOBAL, RTLD_LAZY};
    UnixLibrary::open(Some(name), RTLD_LAZY | RTLD_GLOBAL).map(Library::from)
}

#[cfg(not(unix))]
unsafe fn open_library(name: &str) -> Result<Library, libloading::Error> {
    Library::new(name)
}

fn check(symbol: &'static str, code: c_int) -> AdlResult<()> {
    if code == sys::ADL_OK {
        Ok(())
    } else {
        Err(AdlError::CallFailed { symbol, code })
    }
}

fn record_size<T>() -> c_int {
    mem::size_of::<T>() as c_int
}

/// Buffer for ADL's variable-length level tables
///
/// `H` is the header record embedding the first level at `levels_offset`,
/// `L` the level record. Both must consist solely of `c_int` fields.
struct LevelTable<H, L> {
    words: Vec<c_int>,
    levels_offset: usize,
    count: usize,
    _layout: PhantomData<(H, L)>,
}

impl<H, L: Copy> LevelTable<H, L> {
    fn new(count: usize, levels_offset: usize) -> Self {
        let len = sys::level_table_len::<H, L>(count);
        Self {
            words: vec![0; len.div_ceil(mem::size_of::<c_int>())],
            levels_offset,
            count,
            _layout: PhantomData,
        }
    }

    fn byte_len(&self) -> usize {
        sys::level_table_len::<H, L>(self.count)
    }

    fn header_mut(&mut self) -> &mut H {
        // SAFETY: the buffer is at least size_of::<H>() bytes, c_int aligned
        unsafe { &mut *self.words.as_mut_ptr().cast::<H>() }
    }

    fn as_mut_ptr(&mut self) -> *mut H {
        self.words.as_mut_ptr().cast()
    }

    fn levels(&self) -> &[L] {
        // SAFETY: the buffer holds `count` levels starting at `levels_offset`
        unsafe {
            let start = self.words.as_ptr().cast::<u8>().add(self.levels_offset);
            slice::from_raw_parts(start.cast::<L>(), self.count)
        }
    }

    fn levels_mut(&mut self) -> &mut [L] {
        // SAFETY: as in `levels`
        unsafe {
            let start = self.words.as_mut_ptr().cast::<u8>().add(self.levels_offset);
            slice::from_raw_parts_mut(start.cast::<L>(), self.count)
        }
    }
}

type OD5Table = LevelTable<ADLODPerformanceLevels, ADLODPerformanceLevel>;
type OD6Table = LevelTable<ADLOD6StateInfo, ADLOD6PerformanceLevel>;

fn od5_table(count: usize) -> OD5Table {
    let mut table = OD5Table::new(count, mem::offset_of!(ADLODPerformanceLevels, levels));
    let size = table.byte_len() as c_int;
    table.header_mut().size = size;
    table
}

fn od6_table(count: usize) -> OD6Table {
    let mut table = OD6Table::new(count, mem::offset_of!(ADLOD6StateInfo, levels));
    table.header_mut().number_of_performance_levels = count as c_int;
    table
}

impl AdlApi for AdlLibrary {
    fn main_control_create(&mut self, connected_only: bool) -> AdlResult<()> {
        let f: sys::MainControlCreateFn = unsafe { self.entry(symbols::MAIN_CONTROL_CREATE)? };
        let code = unsafe { f(sys::adl_main_memory_alloc, connected_only as c_int) };
        check(symbols::MAIN_CONTROL_CREATE, code)?;
        self.control_created = true;
        Ok(())
    }

    fn main_control_destroy(&mut self) -> AdlResult<()> {
        let f: sys::MainControlDestroyFn = unsafe { self.entry(symbols::MAIN_CONTROL_DESTROY)? };
        self.control_created = false;
        check(symbols::MAIN_CONTROL_DESTROY, unsafe { f() })
    }

    fn adapter_count(&mut self) -> AdlResult<i32> {
        let f: sys::AdapterNumberOfAdaptersGetFn =
            unsafe { self.entry(symbols::ADAPTER_NUMBER_OF_ADAPTERS_GET)? };
        let mut count: c_int = 0;
        check(symbols::ADAPTER_NUMBER_OF_ADAPTERS_GET, unsafe {
            f(&mut count)
        })?;
        Ok(count)
    }

    fn adapter_info(&mut self, count: usize) -> AdlResult<Vec<AdapterInfo>> {
        let f: sys::AdapterAdapterInfoGetFn =
            unsafe { self.entry(symbols::ADAPTER_ADAPTER_INFO_GET)? };
        if count == 0 {
            return Ok(Vec::new());
        }

        let mut buffer = vec![AdapterInfo::default(); count];
        let len = (count * mem::size_of::<AdapterInfo>()) as c_int;
        check(symbols::ADAPTER_ADAPTER_INFO_GET, unsafe {
            f(buffer.as_mut_ptr(), len)
        })?;
        Ok(buffer)
    }

    fn adapter_active(&mut self, adapter: i32) -> AdlResult<bool> {
        let f: sys::AdapterActiveGetFn = unsafe { self.entry(symbols::ADAPTER_ACTIVE_GET)? };
        let mut status: c_int = 0;
        check(symbols::ADAPTER_ACTIVE_GET, unsafe { f(adapter, &mut status) })?;
        Ok(status != 0)
    }

    fn overdrive_caps(&mut self, adapter: i32) -> AdlResult<OverdriveCaps> {
        let f: sys::OverdriveCapsFn = unsafe { self.entry(symbols::OVERDRIVE_CAPS)? };
        let mut caps = OverdriveCaps::default();
        check(symbols::OVERDRIVE_CAPS, unsafe {
            f(
                adapter,
                &mut caps.supported,
                &mut caps.enabled,
                &mut caps.version,
            )
        })?;
        Ok(caps)
    }

    fn od5_power_control_caps(&mut self, adapter: i32) -> AdlResult<bool> {
        let f: sys::PowerControlCapsFn = unsafe { self.entry(symbols::OD5_POWER_CONTROL_CAPS)? };
        let mut supported: c_int = 0;
        check(symbols::OD5_POWER_CONTROL_CAPS, unsafe {
            f(adapter, &mut supported)
        })?;
        Ok(supported != 0)
    }

    fn od5_power_control_info(&mut self, adapter: i32) -> AdlResult<ADLPowerControlInfo> {
        let f: sys::OD5PowerControlInfoGetFn =
            unsafe { self.entry(symbols::OD5_POWER_CONTROL_INFO_GET)? };
        let mut info = ADLPowerControlInfo::default();
        check(symbols::OD5_POWER_CONTROL_INFO_GET, unsafe {
            f(adapter, &mut info)
        })?;
        Ok(info)
    }

    fn od5_power_control_get(&mut self, adapter: i32) -> AdlResult<PowerControlReading> {
        let f: sys::PowerControlGetFn = unsafe { self.entry(symbols::OD5_POWER_CONTROL_GET)? };
        let mut reading = PowerControlReading::default();
        check(symbols::OD5_POWER_CONTROL_GET, unsafe {
            f(adapter, &mut reading.current, &mut reading.default)
        })?;
        Ok(reading)
    }

    fn od5_power_control_set(&mut self, adapter: i32, value: i32) -> AdlResult<()> {
        let f: sys::PowerControlSetFn = unsafe { self.entry(symbols::OD5_POWER_CONTROL_SET)? };
        check(symbols::OD5_POWER_CONTROL_SET, unsafe { f(adapter, value) })
    }

    fn od5_parameters(&mut self, adapter: i32) -> AdlResult<ADLODParameters> {
        let f: sys::OD5ODParametersGetFn = unsafe { self.entry(symbols::OD5_OD_PARAMETERS_GET)? };
        let mut params = ADLODParameters {
            size: record_size::<ADLODParameters>(),
            ..Default::default()
        };
        check(symbols::OD5_OD_PARAMETERS_GET, unsafe {
            f(adapter, &mut params)
        })?;
        Ok(params)
    }

    fn od5_performance_levels(
        &mut self,
        adapter: i32,
        default: bool,
        count: usize,
    ) -> AdlResult<Vec<ADLODPerformanceLevel>> {
        let f: sys::OD5ODPerformanceLevelsGetFn =
            unsafe { self.entry(symbols::OD5_OD_PERFORMANCE_LEVELS_GET)? };
        let mut table = od5_table(count);
        check(symbols::OD5_OD_PERFORMANCE_LEVELS_GET, unsafe {
            f(adapter, default as c_int, table.as_mut_ptr())
        })?;
        Ok(table.levels().to_vec())
    }

    fn od5_set_performance_levels(
        &mut self,
        adapter: i32,
        levels: &[ADLODPerformanceLevel],
    ) -> AdlResult<()> {
        let f: sys::OD5ODPerformanceLevelsSetFn =
            unsafe { self.entry(symbols::OD5_OD_PERFORMANCE_LEVELS_SET)? };
        let mut table = od5_table(levels.len());
        table.levels_mut().copy_from_slice(levels);
        check(symbols::OD5_OD_PERFORMANCE_LEVELS_SET, unsafe {
            f(adapter, table.as_mut_ptr())
        })
    }

    fn od5_current_activity(&mut self, adapter: i32) -> AdlResult<ADLPMActivity> {
        let f: sys::OD5CurrentActivityGetFn =
            unsafe { self.entry(symbols::OD5_CURRENT_ACTIVITY_GET)? };
        let mut activity = ADLPMActivity {
            size: record_size::<ADLPMActivity>(),
            ..Default::default()
        };
        check(symbols::OD5_CURRENT_ACTIVITY_GET, unsafe {
            f(adapter, &mut activity)
        })?;
        Ok(activity)
    }

    fn od5_thermal_device(
        &mut self,
        adapter: i32,
        channel: i32,
    ) -> AdlResult<ADLThermalControllerInfo> {
        let f: sys::OD5ThermalDevicesEnumFn =
            unsafe { self.entry(symbols::OD5_THERMAL_DEVICES_ENUM)? };
        let mut info = ADLThermalControllerInfo {
            size: record_size::<ADLThermalControllerInfo>(),
            ..Default::default()
        };
        check(symbols::OD5_THERMAL_DEVICES_ENUM, unsafe {
            f(adapter, channel, &mut info)
        })?;
        Ok(info)
    }

    fn od5_temperature(&mut self, adapter: i32, channel: i32) -> AdlResult<i32> {
        let f: sys::OD5TemperatureGetFn = unsafe { self.entry(symbols::OD5_TEMPERATURE_GET)? };
        let mut temperature = ADLTemperature {
            size: record_size::<ADLTemperature>(),
            ..Default::default()
        };
        check(symbols::OD5_TEMPERATURE_GET, unsafe {
            f(adapter, channel, &mut temperature)
        })?;
        Ok(temperature.temperature)
    }

    fn od5_fan_speed_info(&mut self, adapter: i32, channel: i32) -> AdlResult<ADLFanSpeedInfo> {
        let f: sys::OD5FanSpeedInfoGetFn = unsafe { self.entry(symbols::OD5_FAN_SPEED_INFO_GET)? };
        let mut info = ADLFanSpeedInfo {
            size: record_size::<ADLFanSpeedInfo>(),
            ..Default::default()
        };
        check(symbols::OD5_FAN_SPEED_INFO_GET, unsafe {
            f(adapter, channel, &mut info)
        })?;
        Ok(info)
    }

    fn od5_fan_speed_get(
        &mut self,
        adapter: i32,
        channel: i32,
        speed_type: i32,
    ) -> AdlResult<ADLFanSpeedValue> {
        let f: sys::OD5FanSpeedFn = unsafe { self.entry(symbols::OD5_FAN_SPEED_GET)? };
        let mut value = ADLFanSpeedValue {
            size: record_size::<ADLFanSpeedValue>(),
            speed_type,
            ..Default::default()
        };
        check(symbols::OD5_FAN_SPEED_GET, unsafe {
            f(adapter, channel, &mut value)
        })?;
        Ok(value)
    }

    fn od5_fan_speed_set(
        &mut self,
        adapter: i32,
        channel: i32,
        value: ADLFanSpeedValue,
    ) -> AdlResult<()> {
        let f: sys::OD5FanSpeedFn = unsafe { self.entry(symbols::OD5_FAN_SPEED_SET)? };
        let mut value = ADLFanSpeedValue {
            size: record_size::<ADLFanSpeedValue>(),
            ..value
        };
        check(symbols::OD5_FAN_SPEED_SET, unsafe {
            f(adapter, channel, &mut value)
        })
    }

    fn od5_fan_speed_to_default(&mut self, adapter: i32, channel: i32) -> AdlResult<()> {
        let f: sys::OD5FanSpeedToDefaultSetFn =
            unsafe { self.entry(symbols::OD5_FAN_SPEED_TO_DEFAULT_SET)? };
        check(symbols::OD5_FAN_SPEED_TO_DEFAULT_SET, unsafe {
            f(adapter, channel)
        })
    }

    fn od6_power_control_caps(&mut self, adapter: i32) -> AdlResult<bool> {
        let f: sys::PowerControlCapsFn = unsafe { self.entry(symbols::OD6_POWER_CONTROL_CAPS)? };
        let mut supported: c_int = 0;
        check(symbols::OD6_POWER_CONTROL_CAPS, unsafe {
            f(adapter, &mut supported)
        })?;
        Ok(supported != 0)
    }

    fn od6_power_control_info(&mut self, adapter: i32) -> AdlResult<ADLOD6PowerControlInfo> {
        let f: sys::OD6PowerControlInfoGetFn =
            unsafe { self.entry(symbols::OD6_POWER_CONTROL_INFO_GET)? };
        let mut info = ADLOD6PowerControlInfo::default();
        check(symbols::OD6_POWER_CONTROL_INFO_GET, unsafe {
            f(adapter, &mut info)
        })?;
        Ok(info)
    }

    fn od6_power_control_get(&mut self, adapter: i32) -> AdlResult<PowerControlReading> {
        let f: sys::PowerControlGetFn = unsafe { self.entry(symbols::OD6_POWER_CONTROL_GET)? };
        let mut reading = PowerControlReading::default();
        check(symbols::OD6_POWER_CONTROL_GET, unsafe {
            f(adapter, &mut reading.current, &mut reading.default)
        })?;
        Ok(reading)
    }

    fn od6_power_control_set(&mut self, adapter: i32, value: i32) -> AdlResult<()> {
        let f: sys::PowerControlSetFn = unsafe { self.entry(symbols::OD6_POWER_CONTROL_SET)? };
        check(symbols::OD6_POWER_CONTROL_SET, unsafe { f(adapter, value) })
    }

    fn od6_capabilities(&mut self, adapter: i32) -> AdlResult<ADLOD6Capabilities> {
        let f: sys::OD6CapabilitiesGetFn = unsafe { self.entry(symbols::OD6_CAPABILITIES_GET)? };
        let mut caps = ADLOD6Capabilities::default();
        check(symbols::OD6_CAPABILITIES_GET, unsafe { f(adapter, &mut caps) })?;
        Ok(caps)
    }

    fn od6_state_info(
        &mut self,
        adapter: i32,
        state_type: i32,
        count: usize,
    ) -> AdlResult<Vec<ADLOD6PerformanceLevel>> {
        let f: sys::OD6StateInfoGetFn = unsafe { self.entry(symbols::OD6_STATE_INFO_GET)? };
        let mut table = od6_table(count);
        check(symbols::OD6_STATE_INFO_GET, unsafe {
            f(adapter, state_type, table.as_mut_ptr())
        })?;
        Ok(table.levels().to_vec())
    }

    fn od6_state_set(
        &mut self,
        adapter: i32,
        state_type: i32,
        levels: &[ADLOD6PerformanceLevel],
    ) -> AdlResult<()> {
        let f: sys::OD6StateSetFn = unsafe { self.entry(symbols::OD6_STATE_SET)? };
        let mut table = od6_table(levels.len());
        table.levels_mut().copy_from_slice(levels);
        check(symbols::OD6_STATE_SET, unsafe {
            f(adapter, state_type, table.as_mut_ptr())
        })
    }

    fn od6_current_status(&mut self, adapter: i32) -> AdlResult<ADLOD6CurrentStatus> {
        let f: sys::OD6CurrentStatusGetFn =
            unsafe { self.entry(symbols::OD6_CURRENT_STATUS_GET)? };
        let mut status = ADLOD6CurrentStatus::default();
        check(symbols::OD6_CURRENT_STATUS_GET, unsafe {
            f(adapter, &mut status)
        })?;
        Ok(status)
    }

    fn od6_thermal_controller_caps(
        &mut self,
        adapter: i32,
    ) -> AdlResult<ADLOD6ThermalControllerCaps> {
        let f: sys::OD6ThermalControllerCapsFn =
            unsafe { self.entry(symbols::OD6_THERMAL_CONTROLLER_CAPS)? };
        let mut caps = ADLOD6ThermalControllerCaps::default();
        check(symbols::OD6_THERMAL_CONTROLLER_CAPS, unsafe {
            f(adapter, &mut caps)
        })?;
        Ok(caps)
    }

    fn od6_temperature(&mut self, adapter: i32) -> AdlResult<i32> {
        let f: sys::OD6TemperatureGetFn = unsafe { self.entry(symbols::OD6_TEMPERATURE_GET)? };
        let mut temperature: c_int = 0;
        check(symbols::OD6_TEMPERATURE_GET, unsafe {
            f(adapter, &mut temperature)
        })?;
        Ok(temperature)
    }

    fn od6_fan_speed_get(&mut self, adapter: i32) -> AdlResult<ADLOD6FanSpeedInfo> {
        let f: sys::OD6FanSpeedGetFn = unsafe { self.entry(symbols::OD6_FAN_SPEED_GET)? };
        let mut info = ADLOD6FanSpeedInfo::default();
        check(symbols::OD6_FAN_SPEED_GET, unsafe { f(adapter, &mut info) })?;
        Ok(info)
    }

    fn od6_fan_speed_set(&mut self, adapter: i32, value: ADLOD6FanSpeedValue) -> AdlResult<()> {
        let f: sys::OD6FanSpeedSetFn = unsafe { self.entry(symbols::OD6_FAN_SPEED_SET)? };
        let mut value = value;
        check(symbols::OD6_FAN_SPEED_SET, unsafe { f(adapter, &mut value) })
    }

    fn od6_fan_speed_reset(&mut self, adapter: i32) -> AdlResult<()> {
        let f: sys::OD6FanSpeedResetFn = unsafe { self.entry(symbols::OD6_FAN_SPEED_RESET)? };
        check(symbols::OD6_FAN_SPEED_RESET, unsafe { f(adapter) })
    }
}
