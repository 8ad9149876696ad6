//! Fan command implementation
//!
//! Handles fan status, speed and reset commands.

use crate::adl::{AdlApi, Overdrive};
use crate::cli::args::{FanArgs, FanCommands, OutputFormat};
use crate::cli::output::{print_output, FanStatus, Message};
use crate::commands::target_adapters;
use crate::domain::{FanSpeedUnit, FanSpeedValue};
use crate::error::Result;
use crate::services::FanService;

/// Execute fan commands
pub fn run_fan<A: AdlApi>(
    od: &Overdrive<A>,
    args: &FanArgs,
    format: OutputFormat,
    adapter_index: Option<i32>,
    dry_run: bool,
) -> Result<()> {
    match &args.command {
        FanCommands::Status { channel } => run_fan_status(od, *channel, format, adapter_index),
        FanCommands::Speed {
            speed,
            rpm,
            channel,
        } => {
            let value = if *rpm {
                FanSpeedValue::rpm(*speed)
            } else {
                FanSpeedValue::percent(i32::try_from(*speed).unwrap_or(i32::MAX))?
            };
            run_fan_speed(od, value, *channel, format, adapter_index, dry_run)
        }
        FanCommands::Reset { channel } => {
            run_fan_reset(od, *channel, format, adapter_index, dry_run)
        }
    }
}

fn run_fan_status<A: AdlApi>(
    od: &Overdrive<A>,
    channel: i32,
    format: OutputFormat,
    adapter_index: Option<i32>,
) -> Result<()> {
    for adapter in target_adapters(od, adapter_index)? {
        let info = od.fan_speed_info(adapter.index, channel);

        let read = |unit: FanSpeedUnit| {
            info.filter(|i| i.capabilities.can_read(unit))
                .and_then(|_| od.fan_speed_value(adapter.index, channel, unit))
        };
        let percent = read(FanSpeedUnit::Percent);
        let rpm = read(FanSpeedUnit::Rpm);

        let status = FanStatus {
            adapter_index: adapter.index,
            adapter_name: adapter.name.clone(),
            channel,
            info,
            speed_percent: percent.map(|v| v.speed),
            speed_rpm: rpm.map(|v| v.speed),
            user_defined: percent.or(rpm).is_some_and(|v| v.user_defined),
        };

        print_output(&status, format)?;
    }

    Ok(())
}

fn run_fan_speed<A: AdlApi>(
    od: &Overdrive<A>,
    value: FanSpeedValue,
    channel: i32,
    format: OutputFormat,
    adapter_index: Option<i32>,
    dry_run: bool,
) -> Result<()> {
    let service = FanService::new(channel, dry_run);

    for adapter in target_adapters(od, adapter_index)? {
        service.set_speed(od, adapter.index, value)?;

        let message = if dry_run {
            format!(
                "[DRY RUN] Would set fan speed to {} on {} channel {}",
                value, adapter, channel
            )
        } else {
            format!("Set fan speed to {} on {} channel {}", value, adapter, channel)
        };

        print_output(
            &Message {
                message,
                success: true,
            },
            format,
        )?;
    }

    Ok(())
}

fn run_fan_reset<A: AdlApi>(
    od: &Overdrive<A>,
    channel: i32,
    format: OutputFormat,
    adapter_index: Option<i32>,
    dry_run: bool,
) -> Result<()> {
    let service = FanService::new(channel, dry_run);

    for adapter in target_adapters(od, adapter_index)? {
        service.reset(od, adapter.index)?;

        let message = if dry_run {
            format!(
                "[DRY RUN] Would return fan to automatic control on {} channel {}",
                adapter, channel
            )
        } else {
            format!(
                "Fan returned to automatic control on {} channel {}",
                adapter, channel
            )
        };

        print_output(
            &Message {
                message,
                success: true,
            },
            format,
        )?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adl::sys::{self, symbols};
    use crate::error::{AppError, DomainError};
    use crate::mock::{MockAdapter, MockAdl};

    #[test]
    fn test_fan_speed_percent() {
        let mock = MockAdl::new().with_adapter(MockAdapter::od5(0));
        let od = Overdrive::from_api(mock.clone());

        let args = FanArgs {
            command: FanCommands::Speed {
                speed: 70,
                rpm: false,
                channel: 0,
            },
        };
        run_fan(&od, &args, OutputFormat::Compact, None, false).unwrap();

        let adapter = mock.adapter(0).unwrap();
        assert_eq!(adapter.fan_percent, 70);
        assert!(adapter.fan_user_defined);
    }

    #[test]
    fn test_fan_speed_over_100_percent() {
        let mock = MockAdl::new().with_adapter(MockAdapter::od5(0));
        let od = Overdrive::from_api(mock.clone());

        let args = FanArgs {
            command: FanCommands::Speed {
                speed: 150,
                rpm: false,
                channel: 0,
            },
        };
        assert!(matches!(
            run_fan(&od, &args, OutputFormat::Compact, None, false),
            Err(AppError::Domain(DomainError::InvalidFanSpeed(150)))
        ));
        assert_eq!(mock.call_count(symbols::OD5_FAN_SPEED_SET), 0);
    }

    #[test]
    fn test_fan_status_skips_unreadable_units() {
        let mock = MockAdl::new().with_adapter(MockAdapter::od5(0));
        let od = Overdrive::from_api(mock.clone());
        mock.update_adapter(0, |a| a.fan_info.flags = sys::ADL_DL_FANCTRL_SUPPORTS_PERCENT_READ);

        let args = FanArgs {
            command: FanCommands::Status { channel: 0 },
        };
        run_fan(&od, &args, OutputFormat::Json, None, false).unwrap();

        assert_eq!(mock.call_count(symbols::OD5_FAN_SPEED_GET), 1);
    }

    #[test]
    fn test_fan_reset() {
        let mock = MockAdl::new().with_adapter(MockAdapter::od6(0));
        let od = Overdrive::from_api(mock.clone());

        let args = FanArgs {
            command: FanCommands::Reset { channel: 0 },
        };
        run_fan(&od, &args, OutputFormat::Compact, None, false).unwrap();
        assert_eq!(mock.call_count(symbols::OD6_FAN_SPEED_RESET), 1);
    }
}
