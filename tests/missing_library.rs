//! Behaviour of the binding when no ADL library can be loaded

use adlctl::domain::{AdapterInfo, ClockSpeed, FanSpeedUnit, FanSpeedValue};
use adlctl::Overdrive;

fn unloaded() -> Overdrive {
    Overdrive::with_library_names(&["libadlctl-missing.so", "adlctl-missing.dll"])
}

#[test]
fn adapter_queries_return_sentinels() {
    let od = unloaded();
    assert!(!od.is_loaded());
    assert_eq!(od.number_of_adapters(), -1);
    assert!(od.list_adapters().is_empty());
    assert!(!od.is_adapter_active(&AdapterInfo::new(0, "AMD Radeon")));
}

#[test]
fn overdrive_queries_return_sentinels() {
    let od = unloaded();
    assert!(!od.capabilities(0).supported);
    assert!(!od.power_control_supported(0));
    assert!(od.power_control_info(0).is_none());
    assert!(od.power_control_current(0).is_none());
    assert!(od.power_control_default(0).is_none());
    assert!(od.overdrive_parameters(0).is_none());
    assert!(od.performance_levels(0).is_empty());
    assert!(od.current_activity(0).is_none());
    assert!(od.thermal_controllers(0).is_empty());
    assert!(od.temperature(0, 0).is_none());
    assert!(od.fan_speed_info(0, 0).is_none());
    assert!(od.fan_speed_value(0, 0, FanSpeedUnit::Percent).is_none());
}

#[test]
fn setters_report_failure() {
    let od = unloaded();
    assert!(!od.power_control_set(0, 10));
    assert!(!od.set_core_clock(0, 0, ClockSpeed::from_mhz(900)));
    assert!(!od.set_memory_clock(0, 0, ClockSpeed::from_mhz(1200)));
    assert!(!od.set_voltage(0, 0, 1100));
    assert!(!od.set_fan_speed_value(0, 0, FanSpeedValue::rpm(1500)));
    assert!(!od.set_fan_speed_to_default(0, 0));
}

#[test]
fn unload_is_idempotent() {
    let mut od = unloaded();
    od.unload();
    od.unload();
    assert!(!od.is_loaded());
}

/// Needs an AMD adapter and the vendor driver
#[test]
#[ignore]
fn real_library_enumerates_adapters() {
    let od = Overdrive::new();
    assert!(od.is_loaded());
    assert!(od.number_of_adapters() > 0);

    let active: Vec<_> = od
        .list_adapters()
        .into_iter()
        .filter(|a| od.is_adapter_active(a))
        .collect();
    assert!(!active.is_empty());

    for adapter in active {
        let caps = od.capabilities(adapter.index);
        if caps.version.is_some() {
            assert!(od.overdrive_parameters(adapter.index).is_some());
        }
    }
}
