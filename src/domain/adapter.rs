//! Adapter information domain type
//!
//! Provides the AdapterInfo struct for adapter identification and metadata.

use crate::adl::sys::AMD_VENDOR_ID;
use serde::{Deserialize, Serialize};
use std::fmt;

/// ADL adapter information and identification
///
/// ADL reports one entry per display output, so a single physical GPU
/// usually appears several times with the same bus number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdapterInfo {
    /// ADL adapter index
    pub index: i32,
    /// Adapter name (e.g., "AMD Radeon HD 7900 Series")
    pub name: String,
    /// Display name reported by the driver
    pub display_name: String,
    /// Unique device identifier string
    pub udid: String,
    /// PCI vendor id
    pub vendor_id: i32,
    /// PCI bus number
    pub bus_number: i32,
    /// PCI device number
    pub device_number: i32,
    /// PCI function number
    pub function_number: i32,
    /// Whether the driver reports the adapter as present
    pub present: bool,
}

impl AdapterInfo {
    /// Create new adapter info
    pub fn new(index: i32, name: impl Into<String>) -> Self {
        Self {
            index,
            name: name.into(),
            display_name: String::new(),
            udid: String::new(),
            vendor_id: AMD_VENDOR_ID,
            bus_number: 0,
            device_number: 0,
            function_number: 0,
            present: true,
        }
    }

    /// Set the vendor id
    pub fn with_vendor_id(mut self, vendor_id: i32) -> Self {
        self.vendor_id = vendor_id;
        self
    }

    /// Set the PCI location
    pub fn with_pci_location(mut self, bus: i32, device: i32, function: i32) -> Self {
        self.bus_number = bus;
        self.device_number = device;
        self.function_number = function;
        self
    }

    /// Whether the adapter belongs to AMD
    pub fn is_amd(&self) -> bool {
        self.vendor_id == AMD_VENDOR_ID
    }

    /// PCI location as `bus:device.function`
    pub fn pci_location(&self) -> String {
        format!(
            "{:02x}:{:02x}.{:x}",
            self.bus_number, self.device_number, self.function_number
        )
    }
}

impl fmt::Display for AdapterInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.index, self.name)
    }
}
