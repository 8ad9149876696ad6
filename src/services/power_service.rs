//! Power control service
//!
//! Validates and applies the Overdrive power control setting.

use crate::adl::{AdlApi, Overdrive};
use crate::error::{AdlError, ServiceError};

/// Service for managing the power control percentage
pub struct PowerService {
    target: Option<i32>,
    dry_run: bool,
}

impl PowerService {
    /// Create a new power service
    pub fn new(target: Option<i32>, dry_run: bool) -> Self {
        Self { target, dry_run }
    }

    /// Apply the configured power control value to an adapter
    pub fn apply<A: AdlApi>(
        &self,
        od: &Overdrive<A>,
        adapter: i32,
    ) -> Result<Option<i32>, ServiceError> {
        let Some(value) = self.target else {
            return Ok(None);
        };

        if !od.power_control_supported(adapter) {
            return Err(AdlError::Unsupported(format!("power control on adapter {}", adapter)).into());
        }

        let info = od
            .power_control_info(adapter)
            .ok_or(ServiceError::NoData("power control range"))?;
        info.validate(value)?;

        if self.dry_run {
            log::info!(
                "DRY RUN: Would set power control to {:+}% on adapter {}",
                value,
                adapter
            );
            return Ok(Some(value));
        }

        if !od.power_control_set(adapter, value) {
            return Err(ServiceError::Rejected(format!("power control {:+}%", value)));
        }
        log::debug!("Applied power control {:+}% on adapter {}", value, adapter);

        Ok(Some(value))
    }

    /// Get the configured target value
    pub fn target(&self) -> Option<i32> {
        self.target
    }

    /// Check if in dry-run mode
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DomainError;
    use crate::mock::{MockAdapter, MockAdl};

    #[test]
    fn test_power_service_no_target() {
        let mock = MockAdl::new().with_adapter(MockAdapter::od5(0));
        let od = Overdrive::from_api(mock);
        let service = PowerService::new(None, false);
        assert_eq!(service.apply(&od, 0).unwrap(), None);
    }

    #[test]
    fn test_power_service_applies_value() {
        let mock = MockAdl::new().with_adapter(MockAdapter::od5(0));
        let od = Overdrive::from_api(mock.clone());

        let service = PowerService::new(Some(15), false);
        assert_eq!(service.apply(&od, 0).unwrap(), Some(15));
        assert_eq!(mock.adapter(0).unwrap().power_control.current, 15);
    }

    #[test]
    fn test_power_service_dry_run() {
        let mock = MockAdl::new().with_adapter(MockAdapter::od6(0));
        let od = Overdrive::from_api(mock.clone());

        let service = PowerService::new(Some(-10), true);
        assert!(service.is_dry_run());
        assert_eq!(service.apply(&od, 0).unwrap(), Some(-10));
        assert_eq!(mock.adapter(0).unwrap().power_control.current, 0);
    }

    #[test]
    fn test_power_service_out_of_range() {
        let mock = MockAdl::new().with_adapter(MockAdapter::od5(0));
        let od = Overdrive::from_api(mock);

        let service = PowerService::new(Some(30), false);
        assert!(matches!(
            service.apply(&od, 0),
            Err(ServiceError::Domain(DomainError::InvalidPowerControl { value: 30, .. }))
        ));
    }

    #[test]
    fn test_power_service_unsupported_version() {
        let mock = MockAdl::new().with_adapter(MockAdapter::od5(0).with_version(4));
        let od = Overdrive::from_api(mock);

        let service = PowerService::new(Some(5), false);
        assert!(matches!(
            service.apply(&od, 0),
            Err(ServiceError::Adl(AdlError::Unsupported(_)))
        ));
    }
}
