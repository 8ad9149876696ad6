//! Unified error types for adlctl
//!
//! This module defines all error types used throughout the application.
//! Uses thiserror for ergonomic error definitions.

use crate::adl::sys;
use thiserror::Error;

/// Top-level application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from the ADL binding
    #[error("ADL error: {0}")]
    Adl(#[from] AdlError),

    /// Error from configuration parsing/validation
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Error from domain type validation
    #[error("Domain validation error: {0}")]
    Domain(#[from] DomainError),

    /// Adapter index not present in the ADL adapter list
    #[error("Adapter not found: {0}")]
    AdapterNotFound(i32),

    /// No active AMD adapters in the system
    #[error("No active AMD adapters detected")]
    NoAdaptersFound,

    /// A binding operation returned no data
    #[error("{0} not available (see log for the failing ADL call)")]
    NoData(String),

    /// The adapter refused a setting
    #[error("Adapter rejected {0} (see log for the failing ADL call)")]
    Rejected(String),

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from the ADL entry-point layer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdlError {
    /// None of the candidate library names could be loaded
    #[error("ADL library not found (tried: {0}). Is the AMD driver installed?")]
    LibraryNotFound(String),

    /// The library is loaded but does not export the symbol
    #[error("function {0} not available")]
    SymbolUnavailable(&'static str),

    /// The entry point was invoked and returned a non-success status
    #[error("{symbol} failed with status {code} ({})", sys::status_name(*.code))]
    CallFailed { symbol: &'static str, code: i32 },

    /// Operation not supported by this adapter or overdrive version
    #[error("Operation not supported: {0}")]
    Unsupported(String),

    /// Invalid argument passed to the binding
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl AdlError {
    /// Whether this is the "no more data" status used to end thermal probing
    pub fn is_no_data(&self) -> bool {
        matches!(
            self,
            AdlError::CallFailed { code, .. } if *code == sys::ADL_WARNING_NO_DATA
        )
    }
}

/// Errors from domain type validation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Invalid fan speed percentage (must be 0-100)
    #[error("Invalid fan speed: {0}% (must be 0-100)")]
    InvalidFanSpeed(i32),

    /// Fan speed outside the range reported by the adapter
    #[error("Invalid fan speed: {value}{unit} (valid range: {min}-{max}{unit})")]
    FanSpeedOutOfRange {
        value: i32,
        min: i32,
        max: i32,
        unit: &'static str,
    },

    /// Invalid power control value
    #[error("Invalid power control value: {value}% (valid range: {min}% to {max}%)")]
    InvalidPowerControl { value: i32, min: i32, max: i32 },

    /// Clock outside the overdrive range
    #[error("Invalid {kind}: {value} MHz (valid range: {min}-{max} MHz)")]
    InvalidClock {
        kind: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },

    /// Voltage outside the overdrive range
    #[error("Invalid voltage: {value} mV (valid range: {min}-{max} mV)")]
    InvalidVoltage { value: i32, min: i32, max: i32 },

    /// Performance level index beyond the adapter's table
    #[error("Invalid performance level {level} (adapter has {count})")]
    InvalidPerformanceLevel { level: usize, count: usize },

    /// Invalid value provided
    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

/// Errors from configuration parsing and validation
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file not found
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    /// Invalid config value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),
}

/// Errors from service operations
#[derive(Error, Debug)]
pub enum ServiceError {
    /// ADL operation failed
    #[error("ADL operation failed: {0}")]
    Adl(#[from] AdlError),

    /// Domain validation failed
    #[error("Validation failed: {0}")]
    Domain(#[from] DomainError),

    /// A binding query returned its failure sentinel
    #[error("{0} not available")]
    NoData(&'static str),

    /// A binding setter reported failure
    #[error("Adapter rejected {0}")]
    Rejected(String),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Adl(e) => AppError::Adl(e),
            ServiceError::Domain(e) => AppError::Domain(e),
            ServiceError::NoData(what) => AppError::NoData(what.to_string()),
            ServiceError::Rejected(what) => AppError::Rejected(what),
        }
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
