//! Overdrive binding façade
//!
//! [`Overdrive`] owns the loaded library and turns each entry-point result
//! into a plain value. Failures are logged with the failing symbol and status
//! and collapse to a sentinel: `-1` for counts, `false` for setters and
//! predicates, an empty `Vec` for lists and `None` for records and readings.
//!
//! Every operation that has an Overdrive 5 and an Overdrive 6 variant first
//! reads the adapter's overdrive version and dispatches on it; adapters that
//! report any other version never reach a family entry point.

use crate::adl::api::{AdlApi, AdlResult, PowerControlReading};
use crate::adl::convert;
use crate::adl::library::AdlLibrary;
use crate::adl::sys;
use crate::domain::{
    Activity, AdapterInfo, Capabilities, ClockSpeed, FanSpeedInfo, FanSpeedUnit, FanSpeedValue,
    LevelField, OverdriveParameters, OverdriveVersion, PerformanceLevel, PerformanceLevelPair,
    PowerControlInfo, Temperature, ThermalController,
};
use crate::error::AdlError;

use std::sync::{Mutex, PoisonError};

/// Thermal channels probed on Overdrive 5 adapters (0..=9)
pub const MAX_THERMAL_CHANNELS: i32 = 10;

/// Typed access to the ADL Overdrive API
///
/// All calls are serialized through one lock; the vendor library is not
/// assumed to be thread-safe.
pub struct Overdrive<A: AdlApi = AdlLibrary> {
    api: Option<Mutex<A>>,
    control_created: bool,
}

impl Overdrive<AdlLibrary> {
    /// Load the platform ADL library and initialize its control layer
    pub fn new() -> Self {
        Self::from_load(AdlLibrary::load())
    }

    /// Load the first library from `names` that opens
    ///
    /// A missing library is not an error: the binding comes up unloaded and
    /// every operation returns its sentinel.
    pub fn with_library_names<S: AsRef<str>>(names: &[S]) -> Self {
        Self::from_load(AdlLibrary::load_from(names))
    }

    fn from_load(result: Result<AdlLibrary, AdlError>) -> Self {
        match result {
            Ok(library) => Self::from_api(library),
            Err(e) => {
                log::debug!("{}", e);
                Self::unloaded()
            }
        }
    }
}

impl Default for Overdrive<AdlLibrary> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: AdlApi> Overdrive<A> {
    /// Wrap an entry-point surface and call `ADL_Main_Control_Create`
    ///
    /// A failed control create is logged; later calls still go through.
    pub fn from_api(mut api: A) -> Self {
        let control_created = match api.main_control_create(true) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("{}", e);
                false
            }
        };

        Self {
            api: Some(Mutex::new(api)),
            control_created,
        }
    }

    /// A binding without a library
    pub fn unloaded() -> Self {
        Self {
            api: None,
            control_created: false,
        }
    }

    /// Whether a vendor library is loaded
    pub fn is_loaded(&self) -> bool {
        self.api.is_some()
    }

    /// Destroy the control layer and release the library
    pub fn unload(&mut self) {
        if let Some(api) = self.api.take() {
            let mut api = api.into_inner().unwrap_or_else(PoisonError::into_inner);
            if self.control_created {
                if let Err(e) = api.main_control_destroy() {
                    log::warn!("{}", e);
                }
                self.control_created = false;
            }
            log::debug!("ADL library released");
        }
    }

    /// Run `op` under the library lock, logging failures
    fn call<T>(&self, op: impl FnOnce(&mut A) -> AdlResult<T>) -> Option<T> {
        let Some(api) = &self.api else {
            log::debug!("ADL library not loaded");
            return None;
        };

        let mut api = api.lock().unwrap_or_else(PoisonError::into_inner);
        match op(&mut *api) {
            Ok(value) => Some(value),
            Err(e) => {
                log_failure(&e);
                None
            }
        }
    }

    // Adapters

    /// Number of adapters known to ADL, `-1` on failure
    pub fn number_of_adapters(&self) -> i32 {
        self.call(|api| api.adapter_count()).unwrap_or(-1)
    }

    /// Every adapter record ADL reports, empty on failure
    pub fn list_adapters(&self) -> Vec<AdapterInfo> {
        self.call(|api| {
            let count = api.adapter_count()?;
            if count <= 0 {
                return Ok(Vec::new());
            }
            let records = api.adapter_info(count as usize)?;
            Ok(records.iter().map(AdapterInfo::from).collect())
        })
        .unwrap_or_default()
    }

    /// Whether the adapter is an active AMD adapter
    ///
    /// Non-AMD adapters are inactive without asking the library.
    pub fn is_adapter_active(&self, adapter: &AdapterInfo) -> bool {
        if !adapter.is_amd() {
            log::debug!(
                "Adapter {} has vendor id {}, not AMD",
                adapter.index,
                adapter.vendor_id
            );
            return false;
        }
        self.call(|api| api.adapter_active(adapter.index))
            .unwrap_or(false)
    }

    /// Overdrive capabilities; [`Capabilities::unsupported`] on failure
    pub fn capabilities(&self, adapter: i32) -> Capabilities {
        self.call(|api| api.overdrive_caps(adapter).map(Capabilities::from))
            .unwrap_or_default()
    }

    // Power control

    pub fn power_control_supported(&self, adapter: i32) -> bool {
        self.call(|api| power_control_version(api, adapter)).is_some()
    }

    pub fn power_control_info(&self, adapter: i32) -> Option<PowerControlInfo> {
        self.call(|api| match power_control_version(api, adapter)? {
            OverdriveVersion::Five => api.od5_power_control_info(adapter).map(Into::into),
            OverdriveVersion::Six => api.od6_power_control_info(adapter).map(Into::into),
        })
    }

    /// Current power control value in percent
    pub fn power_control_current(&self, adapter: i32) -> Option<i32> {
        self.call(|api| power_control_reading(api, adapter))
            .map(|reading| reading.current)
    }

    /// Stock power control value in percent
    pub fn power_control_default(&self, adapter: i32) -> Option<i32> {
        self.call(|api| power_control_reading(api, adapter))
            .map(|reading| reading.default)
    }

    /// Set the power control value; true only when ADL reports success
    pub fn power_control_set(&self, adapter: i32, value: i32) -> bool {
        self.call(|api| match power_control_version(api, adapter)? {
            OverdriveVersion::Five => api.od5_power_control_set(adapter, value),
            OverdriveVersion::Six => api.od6_power_control_set(adapter, value),
        })
        .is_some()
    }

    // Performance levels and clocks

    pub fn overdrive_parameters(&self, adapter: i32) -> Option<OverdriveParameters> {
        self.call(|api| {
            let version = overdrive_version(api, adapter)?;
            read_parameters(api, adapter, version)
        })
    }

    /// Stock and current value of every performance level
    ///
    /// Empty when either table cannot be read.
    pub fn performance_levels(&self, adapter: i32) -> Vec<PerformanceLevelPair> {
        self.call(|api| {
            let version = overdrive_version(api, adapter)?;
            let count = read_parameters(api, adapter, version)?.performance_levels;
            if count == 0 {
                return Ok(Vec::new());
            }

            let stock = read_levels(api, adapter, version, count, true)?;
            let current = read_levels(api, adapter, version, count, false)?;
            Ok(stock
                .into_iter()
                .zip(current)
                .enumerate()
                .map(|(level, (stock, current))| PerformanceLevelPair {
                    level,
                    stock,
                    current,
                })
                .collect())
        })
        .unwrap_or_default()
    }

    pub fn set_core_clock(&self, adapter: i32, level: usize, clock: ClockSpeed) -> bool {
        self.set_level_fields(adapter, level, &[LevelField::EngineClock(clock)])
    }

    pub fn set_memory_clock(&self, adapter: i32, level: usize, clock: ClockSpeed) -> bool {
        self.set_level_fields(adapter, level, &[LevelField::MemoryClock(clock)])
    }

    /// Set a level's core voltage in millivolts (Overdrive 5 only)
    pub fn set_voltage(&self, adapter: i32, level: usize, millivolts: i32) -> bool {
        self.set_level_fields(adapter, level, &[LevelField::Voltage(millivolts)])
    }

    /// Rewrite the current table with `fields` of one level changed
    ///
    /// The table is read once and written once, so either every field lands
    /// or none does. An empty `fields` makes no native call.
    pub fn set_level_fields(&self, adapter: i32, level: usize, fields: &[LevelField]) -> bool {
        if fields.is_empty() {
            return true;
        }

        self.call(|api| {
            let version = overdrive_version(api, adapter)?;
            let has_voltage = fields.iter().any(|f| matches!(f, LevelField::Voltage(_)));
            if has_voltage && version != OverdriveVersion::Five {
                return Err(AdlError::Unsupported(format!(
                    "voltage control on adapter {} ({})",
                    adapter, version
                )));
            }

            let count = read_parameters(api, adapter, version)?.performance_levels;
            let mut levels = read_levels(api, adapter, version, count, false)?;
            let Some(target) = levels.get_mut(level) else {
                return Err(AdlError::InvalidArgument(format!(
                    "performance level {} (adapter {} has {})",
                    level, adapter, count
                )));
            };
            *target = fields
                .iter()
                .fold(*target, |updated, field| updated.with_field(*field));

            write_levels(api, adapter, version, &levels)
        })
        .is_some()
    }

    /// Current clocks, load and bus state
    pub fn current_activity(&self, adapter: i32) -> Option<Activity> {
        self.call(|api| match overdrive_version(api, adapter)? {
            OverdriveVersion::Five => api.od5_current_activity(adapter).map(Into::into),
            OverdriveVersion::Six => api.od6_current_status(adapter).map(Into::into),
        })
    }

    // Thermal and fan control

    /// Thermal controllers of the adapter
    ///
    /// Overdrive 5 channels are probed from 0 up to [`MAX_THERMAL_CHANNELS`].
    /// Probing stops at `ADL_WARNING_NO_DATA`, or at any other failure after
    /// logging it; controllers found before the stop are kept.
    pub fn thermal_controllers(&self, adapter: i32) -> Vec<ThermalController> {
        self.call(|api| match overdrive_version(api, adapter)? {
            OverdriveVersion::Five => {
                let mut controllers = Vec::new();
                for channel in 0..MAX_THERMAL_CHANNELS {
                    match api.od5_thermal_device(adapter, channel) {
                        Ok(raw) => controllers.push(convert::thermal_controller(channel, &raw)),
                        Err(e) if e.is_no_data() => break,
                        Err(e) => {
                            log_failure(&e);
                            break;
                        }
                    }
                }
                Ok(controllers)
            }
            OverdriveVersion::Six => {
                let caps = api.od6_thermal_controller_caps(adapter)?;
                Ok(vec![convert::od6_thermal_controller(&caps)])
            }
        })
        .unwrap_or_default()
    }

    /// Temperature of a thermal channel
    pub fn temperature(&self, adapter: i32, channel: i32) -> Option<Temperature> {
        self.call(|api| {
            let millidegrees = match overdrive_version(api, adapter)? {
                OverdriveVersion::Five => api.od5_temperature(adapter, channel)?,
                OverdriveVersion::Six => {
                    single_channel(channel)?;
                    api.od6_temperature(adapter)?
                }
            };
            Ok(Temperature::from_millidegrees(millidegrees))
        })
    }

    /// Fan capabilities and speed limits of a thermal channel
    pub fn fan_speed_info(&self, adapter: i32, channel: i32) -> Option<FanSpeedInfo> {
        self.call(|api| match overdrive_version(api, adapter)? {
            OverdriveVersion::Five => api.od5_fan_speed_info(adapter, channel).map(Into::into),
            OverdriveVersion::Six => {
                single_channel(channel)?;
                api.od6_thermal_controller_caps(adapter).map(Into::into)
            }
        })
    }

    /// Current fan speed in `unit`
    pub fn fan_speed_value(
        &self,
        adapter: i32,
        channel: i32,
        unit: FanSpeedUnit,
    ) -> Option<FanSpeedValue> {
        self.call(|api| match overdrive_version(api, adapter)? {
            OverdriveVersion::Five => {
                let raw = api.od5_fan_speed_get(adapter, channel, unit.as_raw())?;
                Ok(convert::od5_fan_speed(unit, &raw))
            }
            OverdriveVersion::Six => {
                single_channel(channel)?;
                let raw = api.od6_fan_speed_get(adapter)?;
                Ok(convert::od6_fan_speed(unit, &raw))
            }
        })
    }

    /// Set a fan speed; the value's unit selects percent or RPM mode
    pub fn set_fan_speed_value(&self, adapter: i32, channel: i32, value: FanSpeedValue) -> bool {
        self.call(|api| match overdrive_version(api, adapter)? {
            OverdriveVersion::Five => {
                api.od5_fan_speed_set(adapter, channel, convert::od5_fan_speed_request(&value))
            }
            OverdriveVersion::Six => {
                single_channel(channel)?;
                api.od6_fan_speed_set(adapter, convert::od6_fan_speed_request(&value))
            }
        })
        .is_some()
    }

    /// Return a fan to driver control
    pub fn set_fan_speed_to_default(&self, adapter: i32, channel: i32) -> bool {
        self.call(|api| match overdrive_version(api, adapter)? {
            OverdriveVersion::Five => api.od5_fan_speed_to_default(adapter, channel),
            OverdriveVersion::Six => {
                single_channel(channel)?;
                api.od6_fan_speed_reset(adapter)
            }
        })
        .is_some()
    }
}

impl<A: AdlApi> Drop for Overdrive<A> {
    fn drop(&mut self) {
        self.unload();
    }
}

fn log_failure(error: &AdlError) {
    match error {
        AdlError::Unsupported(_) | AdlError::InvalidArgument(_) => log::info!("{}", error),
        _ => log::warn!("{}", error),
    }
}

fn overdrive_version<A: AdlApi>(api: &mut A, adapter: i32) -> AdlResult<OverdriveVersion> {
    let caps = api.overdrive_caps(adapter)?;
    OverdriveVersion::from_raw(caps.version).ok_or_else(|| {
        AdlError::Unsupported(format!(
            "adapter {} reports overdrive version {}",
            adapter, caps.version
        ))
    })
}

/// Overdrive version of an adapter whose power control is supported
fn power_control_version<A: AdlApi>(api: &mut A, adapter: i32) -> AdlResult<OverdriveVersion> {
    let version = overdrive_version(api, adapter)?;
    let supported = match version {
        OverdriveVersion::Five => api.od5_power_control_caps(adapter)?,
        OverdriveVersion::Six => api.od6_power_control_caps(adapter)?,
    };

    if !supported {
        return Err(AdlError::Unsupported(format!(
            "power control on adapter {}",
            adapter
        )));
    }
    Ok(version)
}

fn power_control_reading<A: AdlApi>(
    api: &mut A,
    adapter: i32,
) -> AdlResult<PowerControlReading> {
    match power_control_version(api, adapter)? {
        OverdriveVersion::Five => api.od5_power_control_get(adapter),
        OverdriveVersion::Six => api.od6_power_control_get(adapter),
    }
}

fn read_parameters<A: AdlApi>(
    api: &mut A,
    adapter: i32,
    version: OverdriveVersion,
) -> AdlResult<OverdriveParameters> {
    match version {
        OverdriveVersion::Five => api.od5_parameters(adapter).map(Into::into),
        OverdriveVersion::Six => api.od6_capabilities(adapter).map(Into::into),
    }
}

fn read_levels<A: AdlApi>(
    api: &mut A,
    adapter: i32,
    version: OverdriveVersion,
    count: usize,
    stock: bool,
) -> AdlResult<Vec<PerformanceLevel>> {
    let levels = match version {
        OverdriveVersion::Five => api
            .od5_performance_levels(adapter, stock, count)?
            .into_iter()
            .map(PerformanceLevel::from)
            .collect(),
        OverdriveVersion::Six => {
            let state = if stock {
                sys::ADL_OD6_GETSTATEINFO_DEFAULT_PERFORMANCE
            } else {
                sys::ADL_OD6_GETSTATEINFO_CUSTOM_PERFORMANCE
            };
            api.od6_state_info(adapter, state, count)?
                .into_iter()
                .map(PerformanceLevel::from)
                .collect()
        }
    };
    Ok(levels)
}

fn write_levels<A: AdlApi>(
    api: &mut A,
    adapter: i32,
    version: OverdriveVersion,
    levels: &[PerformanceLevel],
) -> AdlResult<()> {
    match version {
        OverdriveVersion::Five => {
            let raw: Vec<sys::ADLODPerformanceLevel> =
                levels.iter().copied().map(Into::into).collect();
            api.od5_set_performance_levels(adapter, &raw)
        }
        OverdriveVersion::Six => {
            let raw: Vec<sys::ADLOD6PerformanceLevel> =
                levels.iter().copied().map(Into::into).collect();
            api.od6_state_set(adapter, sys::ADL_OD6_SETSTATE_PERFORMANCE, &raw)
        }
    }
}

/// Overdrive 6 exposes a single thermal controller, channel 0
fn single_channel(channel: i32) -> AdlResult<()> {
    if channel != 0 {
        return Err(AdlError::InvalidArgument(format!(
            "thermal channel {} (Overdrive 6 has channel 0 only)",
            channel
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adl::sys::symbols;
    use crate::mock::{MockAdapter, MockAdl};

    fn overdrive(adapters: Vec<MockAdapter>) -> (Overdrive<MockAdl>, MockAdl) {
        let mock = adapters
            .into_iter()
            .fold(MockAdl::new(), |mock, adapter| mock.with_adapter(adapter));
        let od = Overdrive::from_api(mock.clone());
        mock.clear_calls();
        (od, mock)
    }

    #[test]
    fn test_construction_creates_control() {
        let mock = MockAdl::new();
        let od = Overdrive::from_api(mock.clone());
        assert!(od.is_loaded());
        assert!(mock.control_created());
        assert_eq!(mock.calls(), vec![symbols::MAIN_CONTROL_CREATE]);
    }

    #[test]
    fn test_failed_control_create_is_not_fatal() {
        let mock = MockAdl::new()
            .with_adapter(MockAdapter::od5(0))
            .with_failure(symbols::MAIN_CONTROL_CREATE, sys::ADL_ERR);
        let od = Overdrive::from_api(mock);
        assert!(od.is_loaded());
        assert_eq!(od.number_of_adapters(), 1);
    }

    #[test]
    fn test_unload_destroys_control_once() {
        let (mut od, mock) = overdrive(vec![MockAdapter::od5(0)]);
        od.unload();
        assert!(!od.is_loaded());
        assert!(!mock.control_created());
        assert_eq!(mock.call_count(symbols::MAIN_CONTROL_DESTROY), 1);

        od.unload();
        drop(od);
        assert_eq!(mock.call_count(symbols::MAIN_CONTROL_DESTROY), 1);
    }

    #[test]
    fn test_unloaded_returns_sentinels() {
        let od: Overdrive<MockAdl> = Overdrive::unloaded();
        let adapter = AdapterInfo::new(0, "Radeon");

        assert!(!od.is_loaded());
        assert_eq!(od.number_of_adapters(), -1);
        assert!(od.list_adapters().is_empty());
        assert!(!od.is_adapter_active(&adapter));
        assert_eq!(od.capabilities(0), Capabilities::unsupported());
        assert!(!od.power_control_supported(0));
        assert!(od.power_control_info(0).is_none());
        assert!(!od.power_control_set(0, 10));
        assert!(od.performance_levels(0).is_empty());
        assert!(od.thermal_controllers(0).is_empty());
        assert!(od.temperature(0, 0).is_none());
        assert!(od.fan_speed_info(0, 0).is_none());
        assert!(!od.set_fan_speed_to_default(0, 0));
    }

    #[test]
    fn test_number_of_adapters_failure() {
        let mock = MockAdl::new()
            .with_adapter(MockAdapter::od5(0))
            .with_failure(symbols::ADAPTER_NUMBER_OF_ADAPTERS_GET, sys::ADL_ERR);
        let od = Overdrive::from_api(mock);
        assert_eq!(od.number_of_adapters(), -1);
        assert!(od.list_adapters().is_empty());
    }

    #[test]
    fn test_list_adapters() {
        let (od, mock) = overdrive(vec![MockAdapter::od5(0), MockAdapter::od6(1)]);
        let adapters = od.list_adapters();

        assert_eq!(adapters.len(), 2);
        assert_eq!(adapters[0].index, 0);
        assert_eq!(adapters[1].name, "AMD Radeon Mock 1");
        assert_eq!(
            mock.calls(),
            vec![
                symbols::ADAPTER_NUMBER_OF_ADAPTERS_GET,
                symbols::ADAPTER_ADAPTER_INFO_GET
            ]
        );
    }

    #[test]
    fn test_list_adapters_skips_batch_call_when_empty() {
        let (od, mock) = overdrive(vec![]);
        assert!(od.list_adapters().is_empty());
        assert_eq!(mock.call_count(symbols::ADAPTER_ADAPTER_INFO_GET), 0);
    }

    #[test]
    fn test_list_adapters_batch_failure() {
        let mock = MockAdl::new()
            .with_adapter(MockAdapter::od5(0))
            .with_missing_symbol(symbols::ADAPTER_ADAPTER_INFO_GET);
        let od = Overdrive::from_api(mock);
        assert!(od.list_adapters().is_empty());
    }

    #[test]
    fn test_adapter_active_requires_amd_vendor() {
        let (od, mock) = overdrive(vec![
            MockAdapter::od5(0),
            MockAdapter::od5(1).with_vendor_id(4318),
        ]);
        let adapters = od.list_adapters();
        mock.clear_calls();

        assert!(od.is_adapter_active(&adapters[0]));
        // Reported active by ADL, but not an AMD adapter
        assert!(mock.adapter(1).unwrap().active);
        assert!(!od.is_adapter_active(&adapters[1]));
        assert_eq!(mock.call_count(symbols::ADAPTER_ACTIVE_GET), 1);
    }

    #[test]
    fn test_capabilities_versions() {
        let (od, _) = overdrive(vec![
            MockAdapter::od5(0),
            MockAdapter::od6(1),
            MockAdapter::od5(2).with_version(7),
        ]);

        assert_eq!(od.capabilities(0).version, Some(OverdriveVersion::Five));
        assert_eq!(od.capabilities(1).version, Some(OverdriveVersion::Six));
        assert_eq!(od.capabilities(2).version, None);
        assert_eq!(od.capabilities(2).raw_version, 7);
        assert_eq!(od.capabilities(9), Capabilities::unsupported());
    }

    #[test]
    fn test_unsupported_version_makes_no_power_calls() {
        for version in [0, 4, 7] {
            let (od, mock) = overdrive(vec![MockAdapter::od5(0).with_version(version)]);

            assert!(!od.power_control_supported(0));
            assert!(od.power_control_info(0).is_none());
            assert!(od.power_control_current(0).is_none());
            assert!(od.power_control_default(0).is_none());
            assert!(!od.power_control_set(0, 5));

            assert!(
                mock.calls().iter().all(|&s| s == symbols::OVERDRIVE_CAPS),
                "version {} reached {:?}",
                version,
                mock.calls()
            );
        }
    }

    #[test]
    fn test_power_control_set_od5() {
        let (od, mock) = overdrive(vec![MockAdapter::od5(0)]);

        assert!(od.power_control_supported(0));
        let info = od.power_control_info(0).unwrap();
        assert_eq!(info, PowerControlInfo::new(-20, 20, 1));

        assert!(od.power_control_set(0, info.max));
        assert_eq!(od.power_control_current(0), Some(info.max));
        assert_eq!(od.power_control_default(0), Some(0));
        assert_eq!(mock.call_count(symbols::OD6_POWER_CONTROL_SET), 0);
    }

    #[test]
    fn test_power_control_set_od6_uses_od6_family() {
        let (od, mock) = overdrive(vec![MockAdapter::od6(0)]);

        assert!(od.power_control_set(0, -25));
        assert_eq!(od.power_control_current(0), Some(-25));
        assert!(mock
            .calls()
            .iter()
            .all(|s| !s.starts_with("ADL_Overdrive5_")));
    }

    #[test]
    fn test_power_control_set_failure_is_false() {
        let (od, _) = overdrive(vec![MockAdapter::od5(0)]);
        // Out of range; the mock answers with ADL_ERR_INVALID_PARAM
        assert!(!od.power_control_set(0, 75));
        assert_eq!(od.power_control_current(0), Some(0));
    }

    #[test]
    fn test_power_control_unsupported_short_circuits() {
        let mut adapter = MockAdapter::od5(0);
        adapter.power_control_supported = false;
        let (od, mock) = overdrive(vec![adapter]);

        assert!(!od.power_control_set(0, 5));
        assert!(od.power_control_info(0).is_none());
        assert_eq!(mock.call_count(symbols::OD5_POWER_CONTROL_SET), 0);
        assert_eq!(mock.call_count(symbols::OD5_POWER_CONTROL_INFO_GET), 0);
    }

    #[test]
    fn test_performance_levels_match_parameters() {
        let (od, _) = overdrive(vec![MockAdapter::od5(0), MockAdapter::od6(1)]);

        for adapter in [0, 1] {
            let params = od.overdrive_parameters(adapter).unwrap();
            let levels = od.performance_levels(adapter);
            assert_eq!(levels.len(), params.performance_levels);
            for (i, pair) in levels.iter().enumerate() {
                assert_eq!(pair.level, i);
                assert!(!pair.is_modified());
            }
        }
    }

    #[test]
    fn test_performance_levels_empty_when_a_query_fails() {
        let mock = MockAdl::new()
            .with_adapter(MockAdapter::od5(0))
            .with_failure(symbols::OD5_OD_PERFORMANCE_LEVELS_GET, sys::ADL_ERR);
        let od = Overdrive::from_api(mock);
        assert!(od.performance_levels(0).is_empty());
    }

    #[test]
    fn test_performance_levels_empty_for_zero_levels() {
        let mut adapter = MockAdapter::od5(0);
        adapter.stock_levels.clear();
        adapter.current_levels.clear();
        let (od, mock) = overdrive(vec![adapter]);

        assert!(od.performance_levels(0).is_empty());
        assert_eq!(mock.call_count(symbols::OD5_OD_PERFORMANCE_LEVELS_GET), 0);
    }

    #[test]
    fn test_set_core_clock_rewrites_one_field() {
        let (od, mock) = overdrive(vec![MockAdapter::od5(0)]);
        let before = mock.adapter(0).unwrap().current_levels;

        assert!(od.set_core_clock(0, 2, ClockSpeed::from_mhz(1000)));

        let after = mock.adapter(0).unwrap().current_levels;
        assert_eq!(after[2].engine_clock, 100_000);
        assert_eq!(after[2].memory_clock, before[2].memory_clock);
        assert_eq!(after[2].vddc, before[2].vddc);
        assert_eq!(after[..2], before[..2]);

        let levels = od.performance_levels(0);
        assert!(levels[2].is_modified());
        assert!(!levels[1].is_modified());
    }

    #[test]
    fn test_set_memory_clock_od6() {
        let (od, mock) = overdrive(vec![MockAdapter::od6(0)]);
        assert!(od.set_memory_clock(0, 1, ClockSpeed::from_mhz(1400)));
        assert_eq!(mock.adapter(0).unwrap().current_levels[1].memory_clock, 140_000);
        assert_eq!(mock.call_count(symbols::OD6_STATE_SET), 1);
    }

    #[test]
    fn test_set_voltage_requires_od5() {
        let (od, mock) = overdrive(vec![MockAdapter::od5(0), MockAdapter::od6(1)]);

        assert!(od.set_voltage(0, 1, 1050));
        assert_eq!(mock.adapter(0).unwrap().current_levels[1].vddc, 1050);

        assert!(!od.set_voltage(1, 1, 1050));
        assert_eq!(mock.call_count(symbols::OD6_STATE_SET), 0);
    }

    #[test]
    fn test_set_level_out_of_range() {
        let (od, mock) = overdrive(vec![MockAdapter::od5(0)]);
        assert!(!od.set_core_clock(0, 3, ClockSpeed::from_mhz(1000)));
        assert_eq!(mock.call_count(symbols::OD5_OD_PERFORMANCE_LEVELS_SET), 0);
    }

    #[test]
    fn test_set_level_fields_writes_table_once() {
        let (od, mock) = overdrive(vec![MockAdapter::od5(0)]);
        mock.clear_calls();

        assert!(od.set_level_fields(
            0,
            2,
            &[
                LevelField::EngineClock(ClockSpeed::from_mhz(1000)),
                LevelField::MemoryClock(ClockSpeed::from_mhz(1450)),
                LevelField::Voltage(1200),
            ]
        ));
        assert_eq!(mock.call_count(symbols::OD5_OD_PERFORMANCE_LEVELS_GET), 1);
        assert_eq!(mock.call_count(symbols::OD5_OD_PERFORMANCE_LEVELS_SET), 1);

        let level = mock.adapter(0).unwrap().current_levels[2];
        assert_eq!(level.engine_clock, 100_000);
        assert_eq!(level.memory_clock, 145_000);
        assert_eq!(level.vddc, 1200);
    }

    #[test]
    fn test_set_level_fields_all_or_nothing_on_od6() {
        let (od, mock) = overdrive(vec![MockAdapter::od6(0)]);
        let before = mock.adapter(0).unwrap().current_levels;

        // Voltage is not adjustable on Overdrive 6, so the clock change is dropped too
        assert!(!od.set_level_fields(
            0,
            1,
            &[
                LevelField::EngineClock(ClockSpeed::from_mhz(1000)),
                LevelField::Voltage(1100),
            ]
        ));
        assert_eq!(mock.call_count(symbols::OD6_STATE_SET), 0);
        assert_eq!(mock.adapter(0).unwrap().current_levels, before);
    }

    #[test]
    fn test_set_level_fields_empty_is_noop() {
        let (od, mock) = overdrive(vec![MockAdapter::od5(0)]);
        mock.clear_calls();
        assert!(od.set_level_fields(0, 0, &[]));
        assert!(mock.calls().is_empty());
    }

    #[test]
    fn test_current_activity() {
        let (od, _) = overdrive(vec![MockAdapter::od5(0), MockAdapter::od6(1)]);

        let od5 = od.current_activity(0).unwrap();
        assert_eq!(od5.activity_percent, 37);
        assert_eq!(od5.voltage, Some(1170));

        let od6 = od.current_activity(1).unwrap();
        assert_eq!(od6.engine_clock.as_mhz(), 925);
        assert_eq!(od6.voltage, None);
    }

    #[test]
    fn test_thermal_probing_stops_at_no_data() {
        let (od, mock) = overdrive(vec![MockAdapter::od5(0).with_thermal_channels(3)]);

        let controllers = od.thermal_controllers(0);
        assert_eq!(controllers.len(), 3);
        assert_eq!(
            controllers.iter().map(|c| c.index).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
        // Three hits plus the no-data probe
        assert_eq!(mock.call_count(symbols::OD5_THERMAL_DEVICES_ENUM), 4);
    }

    #[test]
    fn test_thermal_probing_caps_at_ten() {
        let (od, mock) = overdrive(vec![MockAdapter::od5(0).with_thermal_channels(15)]);
        assert_eq!(od.thermal_controllers(0).len(), 10);
        assert_eq!(mock.call_count(symbols::OD5_THERMAL_DEVICES_ENUM), 10);
    }

    #[test]
    fn test_thermal_probing_keeps_results_before_failure() {
        let mut adapter = MockAdapter::od5(0).with_thermal_channels(5);
        adapter.thermal_failure_at = Some(2);
        let (od, mock) = overdrive(vec![adapter]);

        assert_eq!(od.thermal_controllers(0).len(), 2);
        assert_eq!(mock.call_count(symbols::OD5_THERMAL_DEVICES_ENUM), 3);
    }

    #[test]
    fn test_thermal_od6_single_controller() {
        let (od, _) = overdrive(vec![MockAdapter::od6(0)]);
        let controllers = od.thermal_controllers(0);
        assert_eq!(controllers.len(), 1);
        assert!(controllers[0].has_fan_control());
    }

    #[test]
    fn test_temperature() {
        let (od, _) = overdrive(vec![MockAdapter::od5(0), MockAdapter::od6(1)]);

        assert_eq!(od.temperature(0, 0), Some(Temperature::from_celsius(55)));
        assert_eq!(od.temperature(0, 4), None);
        assert_eq!(od.temperature(1, 0), Some(Temperature::from_celsius(55)));
        assert_eq!(od.temperature(1, 1), None);
    }

    #[test]
    fn test_genuine_zero_temperature_is_some() {
        let (od, mock) = overdrive(vec![MockAdapter::od5(0)]);
        mock.update_adapter(0, |a| a.temperature = 0);
        assert_eq!(od.temperature(0, 0), Some(Temperature::from_millidegrees(0)));
    }

    #[test]
    fn test_fan_speed_info_od5_and_od6_agree() {
        let (od, _) = overdrive(vec![MockAdapter::od5(0), MockAdapter::od6(1)]);

        let od5 = od.fan_speed_info(0, 0).unwrap();
        let od6 = od.fan_speed_info(1, 0).unwrap();
        assert_eq!(od5, od6);
        assert!(od5.capabilities.supports_percent_write());
        assert!(!od5.capabilities.supports_rpm_write());
    }

    #[test]
    fn test_fan_speed_set_and_read_back() {
        let (od, mock) = overdrive(vec![MockAdapter::od5(0), MockAdapter::od6(1)]);

        for adapter in [0, 1] {
            let speed = FanSpeedValue::percent(70).unwrap();
            assert!(od.set_fan_speed_value(adapter, 0, speed));

            let value = od
                .fan_speed_value(adapter, 0, FanSpeedUnit::Percent)
                .unwrap();
            assert_eq!(value.speed, 70);
            assert_eq!(value.unit, FanSpeedUnit::Percent);
            assert!(value.user_defined);

            let rpm = od.fan_speed_value(adapter, 0, FanSpeedUnit::Rpm).unwrap();
            assert_eq!(rpm.speed, 1600);
        }
        assert_eq!(mock.adapter(0).unwrap().fan_percent, 70);
    }

    #[test]
    fn test_fan_speed_rpm_sets_unit_tag() {
        let (od, mock) = overdrive(vec![MockAdapter::od5(0)]);
        assert!(od.set_fan_speed_value(0, 0, FanSpeedValue::rpm(2400)));

        let adapter = mock.adapter(0).unwrap();
        assert_eq!(adapter.fan_rpm, 2400);
        assert_eq!(adapter.fan_percent, 35);
    }

    #[test]
    fn test_fan_speed_to_default() {
        let (od, mock) = overdrive(vec![MockAdapter::od5(0), MockAdapter::od6(1)]);

        for adapter in [0, 1] {
            assert!(od.set_fan_speed_value(adapter, 0, FanSpeedValue::percent(90).unwrap()));
            assert!(od.set_fan_speed_to_default(adapter, 0));
            let state = mock.adapter(adapter).unwrap();
            assert_eq!(state.fan_percent, 35);
            assert!(!state.fan_user_defined);
        }
    }

    #[test]
    fn test_missing_fan_symbol() {
        let mock = MockAdl::new()
            .with_adapter(MockAdapter::od5(0))
            .with_missing_symbol(symbols::OD5_FAN_SPEED_SET);
        let od = Overdrive::from_api(mock);
        assert!(!od.set_fan_speed_value(0, 0, FanSpeedValue::percent(50).unwrap()));
        assert!(od.fan_speed_value(0, 0, FanSpeedUnit::Percent).is_some());
    }

    #[test]
    fn test_version_family_never_mixed() {
        let (od, mock) = overdrive(vec![MockAdapter::od6(0)]);

        od.power_control_info(0);
        od.performance_levels(0);
        od.set_core_clock(0, 0, ClockSpeed::from_mhz(300));
        od.current_activity(0);
        od.thermal_controllers(0);
        od.temperature(0, 0);
        od.fan_speed_info(0, 0);
        od.fan_speed_value(0, 0, FanSpeedUnit::Rpm);
        od.set_fan_speed_to_default(0, 0);

        assert!(mock
            .calls()
            .iter()
            .all(|s| !s.starts_with("ADL_Overdrive5_")));
    }

    #[test]
    fn test_poisoned_lock_is_recovered() {
        let (od, _) = overdrive(vec![MockAdapter::od5(0)]);

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            od.call(|_| -> AdlResult<()> { panic!("poison") });
        }));
        assert!(result.is_err());
        assert_eq!(od.number_of_adapters(), 1);
    }
}
