//! Apply command implementation
//!
//! Applies the power and fan profile from the configuration file.

use crate::adl::{AdlApi, Overdrive};
use crate::cli::args::OutputFormat;
use crate::cli::output::{print_output, Message};
use crate::commands::target_adapters;
use crate::config::Config;
use crate::domain::FanSpeedValue;
use crate::error::Result;
use crate::services::{FanService, PowerService};

/// Execute the apply command
pub fn run_apply<A: AdlApi>(od: &Overdrive<A>, config: &Config, format: OutputFormat) -> Result<()> {
    let dry_run = config.general.dry_run;
    let power = PowerService::new(config.power.control_percent, dry_run);
    let fan_speed = config
        .fan
        .speed_percent
        .map(FanSpeedValue::percent)
        .transpose()?;
    let fan = FanService::new(config.fan.channel, dry_run);

    if power.target().is_none() && fan_speed.is_none() {
        print_output(
            &Message {
                message: "Nothing to apply: no power or fan settings configured".to_string(),
                success: false,
            },
            format,
        )?;
        return Ok(());
    }

    let prefix = if dry_run { "[DRY RUN] Would apply" } else { "Applied" };

    for adapter in target_adapters(od, config.adapter.index)? {
        if let Some(value) = power.apply(od, adapter.index)? {
            print_output(
                &Message {
                    message: format!("{} power control {:+}% on {}", prefix, value, adapter),
                    success: true,
                },
                format,
            )?;
        }

        if let Some(speed) = fan_speed {
            fan.set_speed(od, adapter.index, speed)?;
            print_output(
                &Message {
                    message: format!(
                        "{} fan speed {} on {} channel {}",
                        prefix,
                        speed,
                        adapter,
                        fan.channel()
                    ),
                    success: true,
                },
                format,
            )?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockAdapter, MockAdl};

    #[test]
    fn test_apply_profile() {
        let mock = MockAdl::new().with_adapter(MockAdapter::od5(0));
        let od = Overdrive::from_api(mock.clone());

        let mut config = Config::default();
        config.power.control_percent = Some(-5);
        config.fan.speed_percent = Some(45);

        run_apply(&od, &config, OutputFormat::Compact).unwrap();

        let adapter = mock.adapter(0).unwrap();
        assert_eq!(adapter.power_control.current, -5);
        assert_eq!(adapter.fan_percent, 45);
    }

    #[test]
    fn test_apply_dry_run() {
        let mock = MockAdl::new().with_adapter(MockAdapter::od5(0));
        let od = Overdrive::from_api(mock.clone());

        let mut config = Config::default();
        config.general.dry_run = true;
        config.power.control_percent = Some(5);

        run_apply(&od, &config, OutputFormat::Compact).unwrap();
        assert_eq!(mock.adapter(0).unwrap().power_control.current, 0);
    }

    #[test]
    fn test_apply_empty_profile_touches_nothing() {
        let mock = MockAdl::new().with_adapter(MockAdapter::od5(0));
        let od = Overdrive::from_api(mock.clone());
        mock.clear_calls();

        run_apply(&od, &Config::default(), OutputFormat::Compact).unwrap();
        assert!(mock.calls().is_empty());
    }
}
