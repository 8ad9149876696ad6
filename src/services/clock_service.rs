//! Clock and voltage service
//!
//! Validates a change to one performance level against the adapter's
//! overdrive ranges and applies it field by field.

use crate::adl::{AdlApi, Overdrive};
use crate::domain::{ClockRange, ClockSpeed, LevelField, OverdriveParameters};
use crate::error::{AdlError, DomainError, ServiceError};

/// Requested changes to one performance level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClockChange {
    pub level: usize,
    pub core: Option<ClockSpeed>,
    pub memory: Option<ClockSpeed>,
    /// Millivolts
    pub voltage: Option<i32>,
}

impl ClockChange {
    /// Fields to write, in core/memory/voltage order
    pub fn fields(&self) -> Vec<LevelField> {
        let mut fields = Vec::new();
        if let Some(clock) = self.core {
            fields.push(LevelField::EngineClock(clock));
        }
        if let Some(clock) = self.memory {
            fields.push(LevelField::MemoryClock(clock));
        }
        if let Some(mv) = self.voltage {
            fields.push(LevelField::Voltage(mv));
        }
        fields
    }

    pub fn is_empty(&self) -> bool {
        self.core.is_none() && self.memory.is_none() && self.voltage.is_none()
    }
}

fn check_clock(kind: &'static str, clock: ClockSpeed, range: &ClockRange) -> Result<(), DomainError> {
    if !range.contains(clock) {
        return Err(DomainError::InvalidClock {
            kind,
            value: clock.as_mhz(),
            min: range.min.as_mhz(),
            max: range.max.as_mhz(),
        });
    }
    Ok(())
}

/// Service for changing performance level clocks and voltage
pub struct ClockService {
    change: ClockChange,
    dry_run: bool,
}

impl ClockService {
    /// Create a new clock service
    pub fn new(change: ClockChange, dry_run: bool) -> Self {
        Self { change, dry_run }
    }

    /// Validate the change against the adapter's overdrive parameters
    pub fn validate(&self, params: &OverdriveParameters) -> Result<(), ServiceError> {
        let change = &self.change;
        if change.is_empty() {
            return Err(DomainError::InvalidValue(
                "no clock or voltage change requested".to_string(),
            )
            .into());
        }
        if change.level >= params.performance_levels {
            return Err(DomainError::InvalidPerformanceLevel {
                level: change.level,
                count: params.performance_levels,
            }
            .into());
        }

        if let Some(clock) = change.core {
            check_clock("core clock", clock, &params.engine_clock)?;
        }
        if let Some(clock) = change.memory {
            check_clock("memory clock", clock, &params.memory_clock)?;
        }
        if let Some(mv) = change.voltage {
            let Some(range) = params.voltage else {
                return Err(
                    AdlError::Unsupported("voltage control requires Overdrive 5".to_string())
                        .into(),
                );
            };
            if !range.contains(mv) {
                return Err(DomainError::InvalidVoltage {
                    value: mv,
                    min: range.min,
                    max: range.max,
                }
                .into());
            }
        }
        Ok(())
    }

    /// Validate and apply the change to an adapter
    ///
    /// Returns the fields written (or that would be written in dry-run mode).
    pub fn apply<A: AdlApi>(
        &self,
        od: &Overdrive<A>,
        adapter: i32,
    ) -> Result<Vec<LevelField>, ServiceError> {
        let params = od
            .overdrive_parameters(adapter)
            .ok_or(ServiceError::NoData("overdrive parameters"))?;
        self.validate(&params)?;

        let fields = self.change.fields();
        if self.dry_run {
            for field in &fields {
                log::info!(
                    "DRY RUN: Would set {} on level {} of adapter {}",
                    field,
                    self.change.level,
                    adapter
                );
            }
            return Ok(fields);
        }

        if !od.set_level_fields(adapter, self.change.level, &fields) {
            let names: Vec<String> = fields.iter().map(ToString::to_string).collect();
            return Err(ServiceError::Rejected(format!(
                "{} on performance level {}",
                names.join(", "),
                self.change.level
            )));
        }
        log::debug!(
            "Applied {} field(s) on level {} of adapter {}",
            fields.len(),
            self.change.level,
            adapter
        );

        Ok(fields)
    }

    pub fn change(&self) -> &ClockChange {
        &self.change
    }

    /// Check if in dry-run mode
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adl::sys::{self, symbols};
    use crate::mock::{MockAdapter, MockAdl};

    fn change(level: usize) -> ClockChange {
        ClockChange {
            level,
            ..Default::default()
        }
    }

    #[test]
    fn test_change_fields_order() {
        let change = ClockChange {
            level: 1,
            core: Some(ClockSpeed::from_mhz(900)),
            memory: None,
            voltage: Some(1100),
        };
        assert_eq!(
            change.fields(),
            vec![
                LevelField::EngineClock(ClockSpeed::from_mhz(900)),
                LevelField::Voltage(1100)
            ]
        );
        assert!(ClockChange::default().is_empty());
    }

    #[test]
    fn test_apply_core_and_memory() {
        let mock = MockAdl::new().with_adapter(MockAdapter::od5(0));
        let od = Overdrive::from_api(mock.clone());

        let service = ClockService::new(
            ClockChange {
                core: Some(ClockSpeed::from_mhz(1000)),
                memory: Some(ClockSpeed::from_mhz(1450)),
                ..change(2)
            },
            false,
        );
        assert_eq!(service.apply(&od, 0).unwrap().len(), 2);

        let level = mock.adapter(0).unwrap().current_levels[2];
        assert_eq!(level.engine_clock, 100_000);
        assert_eq!(level.memory_clock, 145_000);
        assert_eq!(level.vddc, 1170);
    }

    #[test]
    fn test_apply_writes_table_once() {
        let mock = MockAdl::new().with_adapter(MockAdapter::od5(0));
        let od = Overdrive::from_api(mock.clone());
        mock.clear_calls();

        let service = ClockService::new(
            ClockChange {
                core: Some(ClockSpeed::from_mhz(1000)),
                memory: Some(ClockSpeed::from_mhz(1450)),
                ..change(2)
            },
            false,
        );
        service.apply(&od, 0).unwrap();

        assert_eq!(mock.call_count(symbols::OD5_OD_PERFORMANCE_LEVELS_SET), 1);
        assert_eq!(mock.call_count(symbols::OD5_OD_PERFORMANCE_LEVELS_GET), 1);
    }

    #[test]
    fn test_rejected_write_leaves_level_untouched() {
        let mock = MockAdl::new()
            .with_adapter(MockAdapter::od5(0))
            .with_failure(symbols::OD5_OD_PERFORMANCE_LEVELS_SET, sys::ADL_ERR);
        let od = Overdrive::from_api(mock.clone());
        let before = mock.adapter(0).unwrap().current_levels;

        let service = ClockService::new(
            ClockChange {
                core: Some(ClockSpeed::from_mhz(1000)),
                memory: Some(ClockSpeed::from_mhz(1450)),
                ..change(2)
            },
            false,
        );
        assert!(matches!(
            service.apply(&od, 0),
            Err(ServiceError::Rejected(msg)) if msg.contains("core clock") && msg.contains("memory clock")
        ));
        assert_eq!(mock.adapter(0).unwrap().current_levels, before);
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let mock = MockAdl::new().with_adapter(MockAdapter::od5(0));
        let od = Overdrive::from_api(mock.clone());
        let before = mock.adapter(0).unwrap().current_levels;

        let service = ClockService::new(
            ClockChange {
                core: Some(ClockSpeed::from_mhz(1000)),
                ..change(2)
            },
            true,
        );
        assert!(service.apply(&od, 0).is_ok());
        assert_eq!(mock.adapter(0).unwrap().current_levels, before);
    }

    #[test]
    fn test_rejects_clock_out_of_range() {
        let mock = MockAdl::new().with_adapter(MockAdapter::od5(0));
        let od = Overdrive::from_api(mock);

        let service = ClockService::new(
            ClockChange {
                core: Some(ClockSpeed::from_mhz(1500)),
                ..change(2)
            },
            false,
        );
        assert!(matches!(
            service.apply(&od, 0),
            Err(ServiceError::Domain(DomainError::InvalidClock { value: 1500, max: 1200, .. }))
        ));
    }

    #[test]
    fn test_rejects_level_out_of_range() {
        let mock = MockAdl::new().with_adapter(MockAdapter::od5(0));
        let od = Overdrive::from_api(mock);

        let service = ClockService::new(
            ClockChange {
                memory: Some(ClockSpeed::from_mhz(1000)),
                ..change(3)
            },
            false,
        );
        assert!(matches!(
            service.apply(&od, 0),
            Err(ServiceError::Domain(DomainError::InvalidPerformanceLevel { level: 3, count: 3 }))
        ));
    }

    #[test]
    fn test_voltage_unsupported_on_od6() {
        let mock = MockAdl::new().with_adapter(MockAdapter::od6(0));
        let od = Overdrive::from_api(mock);

        let service = ClockService::new(
            ClockChange {
                voltage: Some(1000),
                ..change(0)
            },
            false,
        );
        assert!(matches!(
            service.apply(&od, 0),
            Err(ServiceError::Adl(AdlError::Unsupported(_)))
        ));
    }

    #[test]
    fn test_empty_change_rejected() {
        let mock = MockAdl::new().with_adapter(MockAdapter::od5(0));
        let od = Overdrive::from_api(mock);
        let service = ClockService::new(change(0), false);
        assert!(matches!(
            service.apply(&od, 0),
            Err(ServiceError::Domain(DomainError::InvalidValue(_)))
        ));
    }
}
