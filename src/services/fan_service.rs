//! Fan control service
//!
//! Sets fixed fan speeds and returns fans to driver control.

use crate::adl::{AdlApi, Overdrive};
use crate::domain::FanSpeedValue;
use crate::error::{AdlError, ServiceError};

/// Service for managing the fan of one thermal channel
pub struct FanService {
    channel: i32,
    dry_run: bool,
}

impl FanService {
    /// Create a new fan service
    pub fn new(channel: i32, dry_run: bool) -> Self {
        Self { channel, dry_run }
    }

    /// Set a fixed fan speed after checking capabilities and limits
    pub fn set_speed<A: AdlApi>(
        &self,
        od: &Overdrive<A>,
        adapter: i32,
        speed: FanSpeedValue,
    ) -> Result<FanSpeedValue, ServiceError> {
        let info = od
            .fan_speed_info(adapter, self.channel)
            .ok_or(ServiceError::NoData("fan speed info"))?;

        if !info.capabilities.can_write(speed.unit) {
            return Err(AdlError::Unsupported(format!(
                "setting fan speed in {} on adapter {} channel {}",
                speed.unit, adapter, self.channel
            ))
            .into());
        }
        info.validate(&speed)?;

        if self.dry_run {
            log::info!(
                "DRY RUN: Would set fan speed to {} on adapter {} channel {}",
                speed,
                adapter,
                self.channel
            );
            return Ok(speed);
        }

        if !od.set_fan_speed_value(adapter, self.channel, speed) {
            return Err(ServiceError::Rejected(format!("fan speed {}", speed)));
        }
        log::debug!(
            "Applied fan speed {} on adapter {} channel {}",
            speed,
            adapter,
            self.channel
        );

        Ok(speed)
    }

    /// Return the fan to automatic control
    pub fn reset<A: AdlApi>(&self, od: &Overdrive<A>, adapter: i32) -> Result<(), ServiceError> {
        if self.dry_run {
            log::info!(
                "DRY RUN: Would reset fan on adapter {} channel {}",
                adapter,
                self.channel
            );
            return Ok(());
        }

        if !od.set_fan_speed_to_default(adapter, self.channel) {
            return Err(ServiceError::Rejected("fan reset".to_string()));
        }
        log::debug!("Reset fan on adapter {} channel {}", adapter, self.channel);
        Ok(())
    }

    pub fn channel(&self) -> i32 {
        self.channel
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
    fn test_set_percent() {
        let mock = MockAdl::new().with_adapter(MockAdapter::od5(0));
        let od = Overdrive::from_api(mock.clone());

        let service = FanService::new(0, false);
        let speed = FanSpeedValue::percent(60).unwrap();
        assert_eq!(service.set_speed(&od, 0, speed).unwrap(), speed);
        assert_eq!(mock.adapter(0).unwrap().fan_percent, 60);
    }

    #[test]
    fn test_rpm_write_not_supported() {
        let mock = MockAdl::new().with_adapter(MockAdapter::od5(0));
        let od = Overdrive::from_api(mock.clone());

        let service = FanService::new(0, false);
        assert!(matches!(
            service.set_speed(&od, 0, FanSpeedValue::rpm(2000)),
            Err(ServiceError::Adl(AdlError::Unsupported(_)))
        ));
        assert_eq!(mock.adapter(0).unwrap().fan_rpm, 1600);
    }

    #[test]
    fn test_below_minimum_rejected() {
        let mock = MockAdl::new().with_adapter(MockAdapter::od6(0));
        let od = Overdrive::from_api(mock);

        let service = FanService::new(0, false);
        assert!(matches!(
            service.set_speed(&od, 0, FanSpeedValue::percent(10).unwrap()),
            Err(ServiceError::Domain(DomainError::FanSpeedOutOfRange { min: 20, .. }))
        ));
    }

    #[test]
    fn test_dry_run_leaves_fan_alone() {
        let mock = MockAdl::new().with_adapter(MockAdapter::od5(0));
        let od = Overdrive::from_api(mock.clone());

        let service = FanService::new(0, true);
        assert!(service.is_dry_run());
        service
            .set_speed(&od, 0, FanSpeedValue::percent(80).unwrap())
            .unwrap();
        service.reset(&od, 0).unwrap();
        assert_eq!(mock.adapter(0).unwrap().fan_percent, 35);
    }

    #[test]
    fn test_reset() {
        let mock = MockAdl::new().with_adapter(MockAdapter::od5(0));
        let od = Overdrive::from_api(mock.clone());

        let service = FanService::new(0, false);
        service
            .set_speed(&od, 0, FanSpeedValue::percent(80).unwrap())
            .unwrap();
        service.reset(&od, 0).unwrap();

        let adapter = mock.adapter(0).unwrap();
        assert_eq!(adapter.fan_percent, 35);
        assert!(!adapter.fan_user_defined);
    }

    #[test]
    fn test_missing_info_is_no_data() {
        let mock = MockAdl::new()
            .with_adapter(MockAdapter::od5(0))
            .with_missing_symbol(crate::adl::sys::symbols::OD5_FAN_SPEED_INFO_GET);
        let od = Overdrive::from_api(mock);

        let service = FanService::new(0, false);
        assert!(matches!(
            service.set_speed(&od, 0, FanSpeedValue::percent(50).unwrap()),
            Err(ServiceError::NoData(_))
        ));
    }
}
