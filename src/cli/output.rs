//! Output formatting utilities
//!
//! Provides table and JSON output formatting for CLI commands.

use crate::cli::args::OutputFormat;
use crate::domain::{
    Activity, AdapterInfo, Capabilities, FanSpeedInfo, OverdriveParameters, PerformanceLevelPair,
    PowerControlInfo, Temperature, ThermalDomain,
};
use serde::Serialize;
use std::io::{self, Write};

/// Format and print output based on the selected format
pub fn print_output<T: Serialize + TableDisplay>(data: &T, format: OutputFormat) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match format {
        OutputFormat::Table => {
            writeln!(handle, "{}", data.to_table())?;
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(data).unwrap_or_else(|_| "{}".to_string());
            writeln!(handle, "{}", json)?;
        }
        OutputFormat::Compact => {
            writeln!(handle, "{}", data.to_compact())?;
        }
    }

    Ok(())
}

/// Trait for types that can be displayed as a table
pub trait TableDisplay {
    /// Format as a table string
    fn to_table(&self) -> String;

    /// Format as a compact single line
    fn to_compact(&self) -> String {
        self.to_table().trim_end().replace('\n', " | ")
    }
}

fn or_na<T: ToString>(value: Option<T>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

/// Adapter list entry for display
#[derive(Debug, Clone, Serialize)]
pub struct AdapterListEntry {
    pub index: i32,
    pub name: String,
    pub pci: String,
    pub active: bool,
}

impl AdapterListEntry {
    pub fn new(info: &AdapterInfo, active: bool) -> Self {
        Self {
            index: info.index,
            name: info.name.clone(),
            pci: info.pci_location(),
            active,
        }
    }
}

impl TableDisplay for AdapterListEntry {
    fn to_table(&self) -> String {
        format!(
            "[{}] {} (PCI: {}{})",
            self.index,
            self.name,
            self.pci,
            if self.active { ", active" } else { "" }
        )
    }

    fn to_compact(&self) -> String {
        format!("{}:{}", self.index, self.name)
    }
}

/// Adapter list for display
#[derive(Debug, Clone, Serialize)]
pub struct AdapterList {
    pub adapter_count: i32,
    pub adapters: Vec<AdapterListEntry>,
}

impl TableDisplay for AdapterList {
    fn to_table(&self) -> String {
        let mut output = format!("Adapters Found: {}\n\n", self.adapter_count);

        for adapter in &self.adapters {
            output.push_str(&adapter.to_table());
            output.push('\n');
        }

        output
    }

    fn to_compact(&self) -> String {
        self.adapters
            .iter()
            .map(|a| a.to_compact())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Overdrive capability overview
#[derive(Debug, Clone, Serialize)]
pub struct InfoStatus {
    pub adapter_index: i32,
    pub adapter_name: String,
    pub pci: String,
    pub capabilities: Capabilities,
    pub power_control: Option<PowerControlInfo>,
    pub parameters: Option<OverdriveParameters>,
}

impl TableDisplay for InfoStatus {
    fn to_table(&self) -> String {
        let mut output = format!(
            "[{}] {}\n  PCI: {}\n  Overdrive: {}\n",
            self.adapter_index, self.adapter_name, self.pci, self.capabilities
        );

        if let Some(power) = &self.power_control {
            output.push_str(&format!("  Power Control Range: {}\n", power));
        }

        if let Some(params) = &self.parameters {
            output.push_str(&format!(
                "  Performance Levels: {}\n  Core Clock Range: {}\n  Memory Clock Range: {}\n",
                params.performance_levels, params.engine_clock, params.memory_clock
            ));
            if let Some(voltage) = &params.voltage {
                output.push_str(&format!(
                    "  Voltage Range: {} - {} mV\n",
                    voltage.min, voltage.max
                ));
            }
            output.push_str(&format!(
                "  Activity Reporting: {}\n",
                if params.activity_reporting { "yes" } else { "no" }
            ));
        }

        output
    }
}

/// Power control status display
#[derive(Debug, Clone, Serialize)]
pub struct PowerStatus {
    pub adapter_index: i32,
    pub adapter_name: String,
    pub supported: bool,
    pub range: Option<PowerControlInfo>,
    pub current_percent: Option<i32>,
    pub default_percent: Option<i32>,
}

impl TableDisplay for PowerStatus {
    fn to_table(&self) -> String {
        let mut output = format!("[{}] {}\n", self.adapter_index, self.adapter_name);

        if !self.supported {
            output.push_str("  Power Control: Not supported\n");
            return output;
        }

        output.push_str(&format!(
            "  Power Control: {}%\n  Default: {}%\n  Range: {}\n",
            or_na(self.current_percent.map(|v| format!("{:+}", v))),
            or_na(self.default_percent.map(|v| format!("{:+}", v))),
            or_na(self.range)
        ));

        output
    }
}

/// Performance level table display
#[derive(Debug, Clone, Serialize)]
pub struct ClockStatus {
    pub adapter_index: i32,
    pub adapter_name: String,
    pub levels: Vec<PerformanceLevelPair>,
}

impl TableDisplay for ClockStatus {
    fn to_table(&self) -> String {
        let mut output = format!("[{}] {}\n", self.adapter_index, self.adapter_name);

        if self.levels.is_empty() {
            output.push_str("  Performance levels not available\n");
            return output;
        }

        output.push_str("  Level  Core (stock/current)   Memory (stock/current)  Voltage\n");
        output.push_str("  ────────────────────────────────────────────────────────────────\n");

        for pair in &self.levels {
            output.push_str(&format!(
                "  {:<6} {:<22} {:<23} {}{}\n",
                pair.level,
                format!("{}/{}", pair.stock.engine_clock.as_mhz(), pair.current.engine_clock.as_mhz()),
                format!("{}/{}", pair.stock.memory_clock.as_mhz(), pair.current.memory_clock.as_mhz()),
                or_na(pair.current.voltage.map(|mv| format!("{} mV", mv))),
                if pair.is_modified() { " *" } else { "" }
            ));
        }

        output
    }

    fn to_compact(&self) -> String {
        let levels = self
            .levels
            .iter()
            .map(|p| format!("L{}={}", p.level, p.current))
            .collect::<Vec<_>>()
            .join(", ");
        format!("Adapter {}: {}", self.adapter_index, levels)
    }
}

/// Current activity display
#[derive(Debug, Clone, Serialize)]
pub struct ActivityStatus {
    pub adapter_index: i32,
    pub adapter_name: String,
    pub activity: Option<Activity>,
}

impl TableDisplay for ActivityStatus {
    fn to_table(&self) -> String {
        let mut output = format!("[{}] {}\n", self.adapter_index, self.adapter_name);

        let Some(activity) = &self.activity else {
            output.push_str("  Activity: Not available\n");
            return output;
        };

        output.push_str(&format!(
            "  GPU Load: {}%\n  Core Clock: {}\n  Memory Clock: {}\n  Performance Level: {}\n",
            activity.activity_percent,
            activity.engine_clock,
            activity.memory_clock,
            activity.current_level
        ));
        if let Some(mv) = activity.voltage {
            output.push_str(&format!("  Voltage: {} mV\n", mv));
        }
        if activity.max_bus_lanes > 0 {
            output.push_str(&format!(
                "  Bus Lanes: x{} (max x{})\n",
                activity.bus_lanes, activity.max_bus_lanes
            ));
        }

        output
    }
}

/// One thermal channel with its reading
#[derive(Debug, Clone, Serialize)]
pub struct SensorReading {
    pub channel: i32,
    pub domain: ThermalDomain,
    pub fan_control: bool,
    pub temperature: Option<Temperature>,
}

/// Thermal status display
#[derive(Debug, Clone, Serialize)]
pub struct ThermalStatus {
    pub adapter_index: i32,
    pub adapter_name: String,
    pub sensors: Vec<SensorReading>,
}

impl TableDisplay for ThermalStatus {
    fn to_table(&self) -> String {
        let mut output = format!("[{}] {}\n", self.adapter_index, self.adapter_name);

        if self.sensors.is_empty() {
            output.push_str("  No thermal controllers found\n");
            return output;
        }

        for sensor in &self.sensors {
            output.push_str(&format!(
                "  Channel {} ({}{}): {}\n",
                sensor.channel,
                sensor.domain,
                if sensor.fan_control { ", fan" } else { "" },
                or_na(sensor.temperature)
            ));
        }

        output
    }
}

/// Fan status display
#[derive(Debug, Clone, Serialize)]
pub struct FanStatus {
    pub adapter_index: i32,
    pub adapter_name: String,
    pub channel: i32,
    pub info: Option<FanSpeedInfo>,
    pub speed_percent: Option<i32>,
    pub speed_rpm: Option<i32>,
    pub user_defined: bool,
}

impl TableDisplay for FanStatus {
    fn to_table(&self) -> String {
        let mut output = format!(
            "[{}] {}\n  Channel {}\n",
            self.adapter_index, self.adapter_name, self.channel
        );

        let Some(info) = &self.info else {
            output.push_str("  Fan control: Not available\n");
            return output;
        };

        output.push_str(&format!(
            "  Speed: {}% / {} RPM ({})\n  Capabilities: {}\n  Range: {}-{}% / {}-{} RPM\n",
            or_na(self.speed_percent),
            or_na(self.speed_rpm),
            if self.user_defined { "manual" } else { "auto" },
            info.capabilities,
            info.min_percent,
            info.max_percent,
            info.min_rpm,
            info.max_rpm
        ));

        output
    }
}

/// Simple message output
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub message: String,
    pub success: bool,
}

impl TableDisplay for Message {
    fn to_table(&self) -> String {
        if self.success {
            format!("✓ {}", self.message)
        } else {
            format!("✗ {}", self.message)
        }
    }
}
