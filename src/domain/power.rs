//! Power domain types
//!
//! Provides the power control range and its validation.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Bounds of the power control setting, in percent relative to stock TDP
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerControlInfo {
    /// Minimum value (usually negative)
    pub min: i32,
    /// Maximum value
    pub max: i32,
    /// Step between valid values
    pub step: i32,
}

impl PowerControlInfo {
    /// Create a new power control range
    pub fn new(min: i32, max: i32, step: i32) -> Self {
        Self { min, max, step }
    }

    /// Check if a value is within the range
    pub fn contains(&self, value: i32) -> bool {
        value >= self.min && value <= self.max
    }

    /// Validate a value against the range
    pub fn validate(&self, value: i32) -> Result<(), DomainError> {
        if !self.contains(value) {
            return Err(DomainError::InvalidPowerControl {
                value,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

impl fmt::Display for PowerControlInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+}% to {:+}% (step {}%)", self.min, self.max, self.step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_control_contains() {
        let info = PowerControlInfo::new(-20, 20, 1);

        assert!(info.contains(0));
        assert!(info.contains(-20));
        assert!(info.contains(20));
        assert!(!info.contains(-21));
        assert!(!info.contains(21));
    }

    #[test]
    fn test_power_control_validation() {
        let info = PowerControlInfo::new(-50, 50, 1);
        assert!(info.validate(25).is_ok());
        assert_eq!(
            info.validate(60),
            Err(DomainError::InvalidPowerControl {
                value: 60,
                min: -50,
                max: 50
            })
        );
    }

    #[test]
    fn test_power_control_display() {
        let info = PowerControlInfo::new(-20, 20, 1);
        assert_eq!(info.to_string(), "-20% to +20% (step 1%)");
    }
}
