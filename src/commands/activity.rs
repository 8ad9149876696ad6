//! Activity command implementation
//!
//! Shows current clocks and GPU load.

use crate::adl::{AdlApi, Overdrive};
use crate::cli::args::OutputFormat;
use crate::cli::output::{print_output, ActivityStatus};
use crate::commands::target_adapters;
use crate::error::Result;

/// Execute the activity command
pub fn run_activity<A: AdlApi>(
    od: &Overdrive<A>,
    format: OutputFormat,
    adapter_index: Option<i32>,
) -> Result<()> {
    for adapter in target_adapters(od, adapter_index)? {
        let status = ActivityStatus {
            adapter_index: adapter.index,
            activity: od.current_activity(adapter.index),
            adapter_name: adapter.name,
        };

        print_output(&status, format)?;
    }

    Ok(())
}
