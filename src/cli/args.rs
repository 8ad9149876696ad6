//! CLI argument definitions using clap derive
//!
//! Defines all command-line arguments and subcommands.

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

/// AMD Overdrive control tool
///
/// Inspect and tune AMD GPU power control, clocks and fans through ADL.
#[derive(Parser, Debug)]
#[command(name = "adlctl")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "ADLCTL_CONFIG")]
    pub config: Option<String>,

    /// Target adapter by ADL index
    #[arg(short, long, global = true)]
    pub adapter: Option<i32>,

    /// Dry run mode - don't actually apply changes
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// ADL library name or path to load (repeatable, tried in order)
    #[arg(long = "library", global = true, value_name = "NAME")]
    pub libraries: Vec<String>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Library names given on the command line, if any
    pub fn library_override(&self) -> Option<Vec<String>> {
        (!self.libraries.is_empty()).then(|| self.libraries.clone())
    }
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List all ADL adapters
    List,

    /// Show overdrive capabilities and ranges
    Info,

    /// Control power settings
    Power(PowerArgs),

    /// Show or change performance level clocks
    Clocks(ClocksArgs),

    /// Show current clocks and GPU load
    Activity,

    /// Show thermal controllers and temperatures
    Thermal,

    /// Control fan settings
    Fan(FanArgs),

    /// Apply the power and fan profile from the configuration file
    Apply,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Arguments for power control commands
#[derive(Parser, Debug)]
pub struct PowerArgs {
    #[command(subcommand)]
    pub command: PowerCommands,
}

/// Power subcommands
#[derive(Subcommand, Debug)]
pub enum PowerCommands {
    /// Show current power control status
    Status,

    /// Set power control percentage relative to stock
    Set {
        /// Percentage, e.g. -10 or 20
        #[arg(allow_hyphen_values = true)]
        percent: i32,
    },
}

/// Arguments for clock commands
#[derive(Parser, Debug)]
pub struct ClocksArgs {
    #[command(subcommand)]
    pub command: ClocksCommands,
}

/// Clock subcommands
#[derive(Subcommand, Debug)]
pub enum ClocksCommands {
    /// Show stock and current performance levels
    Status,

    /// Change one performance level
    Set {
        /// Performance level index (0 = lowest)
        #[arg(short, long)]
        level: usize,

        /// Core clock in MHz
        #[arg(long)]
        core: Option<u32>,

        /// Memory clock in MHz
        #[arg(long)]
        memory: Option<u32>,

        /// Core voltage in millivolts (Overdrive 5 only)
        #[arg(long)]
        voltage: Option<i32>,
    },
}

/// Arguments for fan control commands
#[derive(Parser, Debug)]
pub struct FanArgs {
    #[command(subcommand)]
    pub command: FanCommands,
}

/// Fan subcommands
#[derive(Subcommand, Debug)]
pub enum FanCommands {
    /// Show current fan status
    Status {
        /// Thermal channel
        #[arg(long, default_value = "0")]
        channel: i32,
    },

    /// Set a fixed fan speed
    Speed {
        /// Fan speed (percent unless --rpm is given)
        speed: u32,

        /// Interpret the speed as RPM
        #[arg(long)]
        rpm: bool,

        /// Thermal channel
        #[arg(long, default_value = "0")]
        channel: i32,
    },

    /// Return the fan to automatic control
    Reset {
        /// Thermal channel
        #[arg(long, default_value = "0")]
        channel: i32,
    },
}

/// Output format
#[derive(ValueEnum, Debug, Clone, Copy, Default)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format for machine parsing
    Json,
    /// Compact single-line format
    Compact,
}

/// Generate shell completions and print to stdout
pub fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
}
