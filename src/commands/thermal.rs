//! Thermal command implementation
//!
//! Lists thermal controllers with their current temperature.

use crate::adl::{AdlApi, Overdrive};
use crate::cli::args::OutputFormat;
use crate::cli::output::{print_output, SensorReading, ThermalStatus};
use crate::commands::target_adapters;
use crate::error::Result;

/// Execute the thermal command
pub fn run_thermal<A: AdlApi>(
    od: &Overdrive<A>,
    format: OutputFormat,
    adapter_index: Option<i32>,
) -> Result<()> {
    for adapter in target_adapters(od, adapter_index)? {
        let sensors = od
            .thermal_controllers(adapter.index)
            .into_iter()
            .map(|controller| SensorReading {
                channel: controller.index,
                domain: controller.domain,
                fan_control: controller.has_fan_control(),
                temperature: od.temperature(adapter.index, controller.index),
            })
            .collect();

        let status = ThermalStatus {
            adapter_index: adapter.index,
            adapter_name: adapter.name,
            sensors,
        };

        print_output(&status, format)?;
    }

    Ok(())
}
