//! ADL binding layer
//!
//! Loads AMD's ADL library at runtime and exposes its Overdrive API.
//!
//! - [`sys`]: `#[repr(C)]` records, constants and entry-point signatures
//! - [`api`]: the [`AdlApi`] entry-point trait
//! - [`library`]: [`AdlLibrary`], the `libloading`-backed implementation
//! - [`overdrive`]: [`Overdrive`], the typed façade used by the rest of the crate

pub mod api;
mod convert;
pub mod library;
pub mod overdrive;
pub mod sys;

pub use api::{AdlApi, AdlResult};
pub use library::{AdlLibrary, LIBRARY_NAMES};
pub use overdrive::{Overdrive, MAX_THERMAL_CHANNELS};
