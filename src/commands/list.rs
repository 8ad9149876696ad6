//! List command implementation
//!
//! Lists every adapter ADL reports.

use crate::adl::{AdlApi, Overdrive};
use crate::cli::args::OutputFormat;
use crate::cli::output::{print_output, AdapterList, AdapterListEntry};
use crate::error::{AppError, Result};

/// Execute the list command
pub fn run_list<A: AdlApi>(od: &Overdrive<A>, format: OutputFormat) -> Result<()> {
    let adapter_count = od.number_of_adapters();
    if adapter_count < 0 {
        return Err(AppError::NoData("adapter count".to_string()));
    }

    let adapters = od
        .list_adapters()
        .iter()
        .map(|info| AdapterListEntry::new(info, od.is_adapter_active(info)))
        .collect();

    print_output(
        &AdapterList {
            adapter_count,
            adapters,
        },
        format,
    )?;

    Ok(())
}
