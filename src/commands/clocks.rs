//! Clocks command implementation
//!
//! Shows and changes performance level clocks and voltage.

use crate::adl::{AdlApi, Overdrive};
use crate::cli::args::{ClocksArgs, ClocksCommands, OutputFormat};
use crate::cli::output::{print_output, ClockStatus, Message};
use crate::commands::target_adapters;
use crate::domain::ClockSpeed;
use crate::error::Result;
use crate::services::{ClockChange, ClockService};

/// Execute clock commands
pub fn run_clocks<A: AdlApi>(
    od: &Overdrive<A>,
    args: &ClocksArgs,
    format: OutputFormat,
    adapter_index: Option<i32>,
    dry_run: bool,
) -> Result<()> {
    match &args.command {
        ClocksCommands::Status => run_clocks_status(od, format, adapter_index),
        ClocksCommands::Set {
            level,
            core,
            memory,
            voltage,
        } => {
            let change = ClockChange {
                level: *level,
                core: core.map(ClockSpeed::from_mhz),
                memory: memory.map(ClockSpeed::from_mhz),
                voltage: *voltage,
            };
            run_clocks_set(od, change, format, adapter_index, dry_run)
        }
    }
}

fn run_clocks_status<A: AdlApi>(
    od: &Overdrive<A>,
    format: OutputFormat,
    adapter_index: Option<i32>,
) -> Result<()> {
    for adapter in target_adapters(od, adapter_index)? {
        let status = ClockStatus {
            adapter_index: adapter.index,
            levels: od.performance_levels(adapter.index),
            adapter_name: adapter.name,
        };

        print_output(&status, format)?;
    }

    Ok(())
}

fn run_clocks_set<A: AdlApi>(
    od: &Overdrive<A>,
    change: ClockChange,
    format: OutputFormat,
    adapter_index: Option<i32>,
    dry_run: bool,
) -> Result<()> {
    let service = ClockService::new(change, dry_run);

    for adapter in target_adapters(od, adapter_index)? {
        let fields = service.apply(od, adapter.index)?;

        let prefix = if dry_run { "[DRY RUN] Would set" } else { "Set" };
        for field in fields {
            print_output(
                &Message {
                    message: format!(
                        "{} {} on level {} of {}",
                        prefix, field, change.level, adapter
                    ),
                    success: true,
                },
                format,
            )?;
        }
    }

    Ok(())
}
