//! adlctl - AMD Overdrive control library
//!
//! This library binds the AMD Display Library (ADL) at runtime and exposes
//! its Overdrive 5 and Overdrive 6 power, clock, thermal and fan controls
//! as typed operations.
//!
//! # Modules
//!
//! - [`adl`]: ADL loading and the Overdrive façade
//! - [`cli`]: Command-line interface definitions
//! - [`commands`]: Command handlers
//! - [`config`]: Configuration system
//! - [`domain`]: Domain models with validation
//! - [`error`]: Error types
//! - [`services`]: Business logic services

pub mod adl;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod error;
pub mod services;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use adl::Overdrive;
pub use error::{AppError, Result};
