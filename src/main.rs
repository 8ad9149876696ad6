//! adlctl - AMD Overdrive control tool
//!
//! A command-line tool for inspecting and tuning AMD GPU power control,
//! clocks and fans through the ADL library.

use adlctl::cli::args::{generate_completions, Cli, Commands};
use adlctl::commands::{
    open_overdrive, run_activity, run_apply, run_clocks, run_fan, run_info, run_list, run_power,
    run_thermal,
};
use adlctl::config::ConfigBuilder;
use adlctl::error::{AdlError, AppError};
use clap::Parser;

fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Set log level based on verbose flag
    if cli.verbose {
        log::set_max_level(log::LevelFilter::Debug);
    }

    // Run the appropriate command
    let result = run(&cli);

    if let Err(e) = result {
        log::error!("{}", e);
        print_error(&e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), AppError> {
    if let Commands::Completions { shell } = &cli.command {
        generate_completions(*shell);
        return Ok(());
    }

    let config = ConfigBuilder::new()
        .with_file(cli.config.as_deref())?
        .with_verbose(cli.verbose.then_some(true))
        .with_dry_run(cli.dry_run.then_some(true))
        .with_adapter_index(cli.adapter)
        .with_library_names(cli.library_override())
        .build();

    if config.general.verbose {
        log::set_max_level(log::LevelFilter::Debug);
    }

    let od = open_overdrive(&config.library)?;
    let adapter = config.adapter.index;
    let dry_run = config.general.dry_run;

    match &cli.command {
        Commands::List => run_list(&od, cli.format),

        Commands::Info => run_info(&od, cli.format, adapter),

        Commands::Power(args) => run_power(&od, args, cli.format, adapter, dry_run),

        Commands::Clocks(args) => run_clocks(&od, args, cli.format, adapter, dry_run),

        Commands::Activity => run_activity(&od, cli.format, adapter),

        Commands::Thermal => run_thermal(&od, cli.format, adapter),

        Commands::Fan(args) => run_fan(&od, args, cli.format, adapter, dry_run),

        Commands::Apply => run_apply(&od, &config, cli.format),

        Commands::Completions { .. } => Ok(()),
    }
}

fn print_error(err: &AppError) {
    eprintln!("Error: {}", err);

    // Print helpful hints for common errors
    match err {
        AppError::Adl(AdlError::LibraryNotFound(_)) => {
            eprintln!();
            eprintln!("Hint: Make sure the AMD Catalyst/fglrx driver is installed.");
            eprintln!("      Use --library or [library] names in the config file to point at a custom path.");
        }
        AppError::Adl(AdlError::SymbolUnavailable(_)) => {
            eprintln!();
            eprintln!("Hint: The installed ADL library is too old for this operation.");
        }
        AppError::NoAdaptersFound => {
            eprintln!();
            eprintln!("Hint: Make sure you have an AMD GPU installed and the X server is running.");
            eprintln!("      Run 'adlctl list' to see every adapter ADL reports.");
        }
        _ => {}
    }
}
