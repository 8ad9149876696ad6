//! Info command implementation
//!
//! Shows overdrive capabilities and adjustable ranges.

use crate::adl::{AdlApi, Overdrive};
use crate::cli::args::OutputFormat;
use crate::cli::output::{print_output, InfoStatus};
use crate::commands::target_adapters;
use crate::error::Result;

/// Execute the info command
pub fn run_info<A: AdlApi>(
    od: &Overdrive<A>,
    format: OutputFormat,
    adapter_index: Option<i32>,
) -> Result<()> {
    for adapter in target_adapters(od, adapter_index)? {
        let capabilities = od.capabilities(adapter.index);

        let power_control = if od.power_control_supported(adapter.index) {
            od.power_control_info(adapter.index)
        } else {
            None
        };

        let status = InfoStatus {
            adapter_index: adapter.index,
            pci: adapter.pci_location(),
            adapter_name: adapter.name,
            capabilities,
            power_control,
            parameters: od.overdrive_parameters(adapter.index),
        };

        print_output(&status, format)?;
    }

    Ok(())
}
