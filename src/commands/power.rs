//! Power command implementation
//!
//! Handles power control status and set commands.

use crate::adl::{AdlApi, Overdrive};
use crate::cli::args::{OutputFormat, PowerArgs, PowerCommands};
use crate::cli::output::{print_output, Message, PowerStatus};
use crate::commands::target_adapters;
use crate::error::Result;
use crate::services::PowerService;

/// Execute power commands
pub fn run_power<A: AdlApi>(
    od: &Overdrive<A>,
    args: &PowerArgs,
    format: OutputFormat,
    adapter_index: Option<i32>,
    dry_run: bool,
) -> Result<()> {
    match &args.command {
        PowerCommands::Status => run_power_status(od, format, adapter_index),
        PowerCommands::Set { percent } => {
            run_power_set(od, *percent, format, adapter_index, dry_run)
        }
    }
}

fn run_power_status<A: AdlApi>(
    od: &Overdrive<A>,
    format: OutputFormat,
    adapter_index: Option<i32>,
) -> Result<()> {
    for adapter in target_adapters(od, adapter_index)? {
        let supported = od.power_control_supported(adapter.index);

        let status = PowerStatus {
            adapter_index: adapter.index,
            adapter_name: adapter.name,
            supported,
            range: supported.then(|| od.power_control_info(adapter.index)).flatten(),
            current_percent: supported
                .then(|| od.power_control_current(adapter.index))
                .flatten(),
            default_percent: supported
                .then(|| od.power_control_default(adapter.index))
                .flatten(),
        };

        print_output(&status, format)?;
    }

    Ok(())
}

fn run_power_set<A: AdlApi>(
    od: &Overdrive<A>,
    percent: i32,
    format: OutputFormat,
    adapter_index: Option<i32>,
    dry_run: bool,
) -> Result<()> {
    let service = PowerService::new(Some(percent), dry_run);

    for adapter in target_adapters(od, adapter_index)? {
        service.apply(od, adapter.index)?;

        let message = if dry_run {
            format!(
                "[DRY RUN] Would set power control to {:+}% on {}",
                percent, adapter
            )
        } else {
            format!("Set power control to {:+}% on {}", percent, adapter)
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
    use crate::error::{AppError, DomainError};
    use crate::mock::{MockAdapter, MockAdl};

    #[test]
    fn test_power_set_all_active() {
        let mock = MockAdl::new()
            .with_adapter(MockAdapter::od5(0))
            .with_adapter(MockAdapter::od6(1));
        let od = Overdrive::from_api(mock.clone());

        let args = PowerArgs {
            command: PowerCommands::Set { percent: 10 },
        };
        run_power(&od, &args, OutputFormat::Compact, None, false).unwrap();

        assert_eq!(mock.adapter(0).unwrap().power_control.current, 10);
        assert_eq!(mock.adapter(1).unwrap().power_control.current, 10);
    }

    #[test]
    fn test_power_set_out_of_range() {
        let mock = MockAdl::new().with_adapter(MockAdapter::od5(0));
        let od = Overdrive::from_api(mock.clone());

        let args = PowerArgs {
            command: PowerCommands::Set { percent: 40 },
        };
        assert!(matches!(
            run_power(&od, &args, OutputFormat::Compact, Some(0), false),
            Err(AppError::Domain(DomainError::InvalidPowerControl { .. }))
        ));
        assert_eq!(mock.adapter(0).unwrap().power_control.current, 0);
    }

    #[test]
    fn test_power_status_unsupported_adapter() {
        let mock = MockAdl::new().with_adapter(MockAdapter::od5(0).with_version(7));
        let od = Overdrive::from_api(mock.clone());

        let args = PowerArgs {
            command: PowerCommands::Status,
        };
        run_power(&od, &args, OutputFormat::Compact, None, false).unwrap();
        assert_eq!(
            mock.call_count(crate::adl::sys::symbols::OD5_POWER_CONTROL_GET),
            0
        );
    }
}
