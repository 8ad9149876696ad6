//! Command handlers
//!
//! Each command handler orchestrates the execution of a CLI command.

pub mod activity;
pub mod apply;
pub mod clocks;
pub mod fan;
pub mod info;
pub mod list;
pub mod power;
pub mod thermal;

pub use activity::run_activity;
pub use apply::run_apply;
pub use clocks::run_clocks;
pub use fan::run_fan;
pub use info::run_info;
pub use list::run_list;
pub use power::run_power;
pub use thermal::run_thermal;

use crate::adl::{AdlApi, Overdrive};
use crate::config::LibraryConfig;
use crate::domain::AdapterInfo;
use crate::error::{AdlError, AppError, Result};

/// Load ADL from the configured library names
pub fn open_overdrive(library: &LibraryConfig) -> Result<Overdrive> {
    let names = library.candidates();
    let od = Overdrive::with_library_names(&names);
    if !od.is_loaded() {
        return Err(AdlError::LibraryNotFound(names.join(", ")).into());
    }
    Ok(od)
}

/// Resolve the adapters a command acts on
///
/// With an explicit index that adapter is returned as-is. Otherwise every
/// active AMD adapter is returned once per PCI bus, since ADL lists one
/// entry per display output.
pub fn target_adapters<A: AdlApi>(od: &Overdrive<A>, index: Option<i32>) -> Result<Vec<AdapterInfo>> {
    let adapters = od.list_adapters();

    if let Some(idx) = index {
        return adapters
            .into_iter()
            .find(|a| a.index == idx)
            .map(|a| vec![a])
            .ok_or(AppError::AdapterNotFound(idx));
    }

    let mut targets: Vec<AdapterInfo> = Vec::new();
    for adapter in adapters {
        if targets.iter().any(|t| t.bus_number == adapter.bus_number) {
            continue;
        }
        if od.is_adapter_active(&adapter) {
            targets.push(adapter);
        }
    }

    if targets.is_empty() {
        return Err(AppError::NoAdaptersFound);
    }
    Ok(targets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockAdapter, MockAdl};

    #[test]
    fn test_targets_dedupe_by_bus() {
        let mock = MockAdl::new()
            .with_adapter(MockAdapter::od5(0).with_bus_number(1))
            .with_adapter(MockAdapter::od5(1).with_bus_number(1))
            .with_adapter(MockAdapter::od6(2).with_bus_number(4));
        let od = Overdrive::from_api(mock);

        let targets = target_adapters(&od, None).unwrap();
        let indices: Vec<i32> = targets.iter().map(|a| a.index).collect();
        assert_eq!(indices, vec![0, 2]);
    }

    #[test]
    fn test_targets_skip_inactive_and_foreign() {
        let mut inactive = MockAdapter::od5(0);
        inactive.active = false;
        let mock = MockAdl::new()
            .with_adapter(inactive)
            .with_adapter(MockAdapter::od5(1).with_vendor_id(0x10de))
            .with_adapter(MockAdapter::od5(2));
        let od = Overdrive::from_api(mock);

        let targets = target_adapters(&od, None).unwrap();
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].index, 2);
    }

    #[test]
    fn test_explicit_index() {
        let mock = MockAdl::new()
            .with_adapter(MockAdapter::od5(0))
            .with_adapter(MockAdapter::od5(1));
        let od = Overdrive::from_api(mock);

        assert_eq!(target_adapters(&od, Some(1)).unwrap()[0].index, 1);
        assert!(matches!(
            target_adapters(&od, Some(7)),
            Err(AppError::AdapterNotFound(7))
        ));
    }

    #[test]
    fn test_no_adapters() {
        let od = Overdrive::from_api(MockAdl::new());
        assert!(matches!(
            target_adapters(&od, None),
            Err(AppError::NoAdaptersFound)
        ));
    }

    #[test]
    fn test_open_missing_library() {
        let library = LibraryConfig {
            names: Some(vec!["libadlctl-missing.so".to_string()]),
        };
        assert!(matches!(
            open_overdrive(&library),
            Err(AppError::Adl(AdlError::LibraryNotFound(_)))
        ));
    }
}
