//! # Equipment wiring
//!
//! The pin and channel assignments of the robot. The map is loaded once at
//! start-up and handed to whatever builds the devices.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Highest PWM channel on the digital sidecar.
pub const MAX_PWM_CHANNEL: u8 = 10;

/// Highest digital IO channel on the digital sidecar.
pub const MAX_DIO_CHANNEL: u8 = 14;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Pin and channel assignments for the arm.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HwConfig {
    /// PWM channel of the roller speed controller.
    pub roller_pwm: u8,

    /// PWM channel of the pivot (arm lift) speed controller.
    pub arm_lift_pwm: u8,

    /// DIO channel of the floor limit switch.
    pub arm_floor_switch_dio: u8,

    /// DIO channel of the top limit switch.
    pub arm_top_switch_dio: u8,

    /// DIO channel of the ball line-break sensor.
    pub arm_line_break_dio: u8,

    /// DIO channels of the pivot encoder, A then B.
    pub arm_encoder_dio: [u8; 2],
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Problems found in a [`HwConfig`].
#[derive(Debug, Error, PartialEq)]
pub enum HwConfigError {
    #[error("PWM channel {channel} ({name}) is outside 1..={max}", max = MAX_PWM_CHANNEL)]
    PwmOutOfRange { name: &'static str, channel: u8 },

    #[error("DIO channel {channel} ({name}) is outside 1..={max}", max = MAX_DIO_CHANNEL)]
    DioOutOfRange { name: &'static str, channel: u8 },

    #[error("PWM channel {channel} is assigned to both {first} and {second}")]
    PwmInUse {
        channel: u8,
        first: &'static str,
        second: &'static str,
    },

    #[error("DIO channel {channel} is assigned to both {first} and {second}")]
    DioInUse {
        channel: u8,
        first: &'static str,
        second: &'static str,
    },
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for HwConfig {
    fn default() -> Self {
        Self {
            roller_pwm: 1,
            arm_lift_pwm: 2,
            arm_floor_switch_dio: 5,
            arm_top_switch_dio: 3,
            arm_line_break_dio: 9,
            arm_encoder_dio: [1, 2],
        }
    }
}

impl HwConfig {
    /// PWM assignments as `(name, channel)` pairs.
    pub fn pwm_channels(&self) -> Vec<(&'static str, u8)> {
        vec![("roller", self.roller_pwm), ("arm_lift", self.arm_lift_pwm)]
    }

    /// DIO assignments as `(name, channel)` pairs.
    pub fn dio_channels(&self) -> Vec<(&'static str, u8)> {
        vec![
            ("arm_floor_switch", self.arm_floor_switch_dio),
            ("arm_top_switch", self.arm_top_switch_dio),
            ("arm_line_break", self.arm_line_break_dio),
            ("arm_encoder_a", self.arm_encoder_dio[0]),
            ("arm_encoder_b", self.arm_encoder_dio[1]),
        ]
    }

    /// Check that every channel is in range and used only once.
    pub fn validate(&self) -> Result<(), HwConfigError> {
        let mut used: HashMap<u8, &'static str> = HashMap::new();
        for (name, channel) in self.pwm_channels() {
            if channel == 0 || channel > MAX_PWM_CHANNEL {
                return Err(HwConfigError::PwmOutOfRange { name, channel });
            }
            if let Some(first) = used.insert(channel, name) {
                return Err(HwConfigError::PwmInUse {
                    channel,
                    first,
                    second: name,
                });
            }
        }

        // DIO and PWM are separate banks
        used.clear();
        for (name, channel) in self.dio_channels() {
            if channel == 0 || channel > MAX_DIO_CHANNEL {
                return Err(HwConfigError::DioOutOfRange { name, channel });
            }
            if let Some(first) = used.insert(channel, name) {
                return Err(HwConfigError::DioInUse {
                    channel,
                    first,
                    second: name,
                });
            }
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_default_map_is_valid() {
        assert_eq!(HwConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_duplicate_channels() {
        let mut cfg = HwConfig::default();
        cfg.arm_lift_pwm = cfg.roller_pwm;
        assert_eq!(
            cfg.validate(),
            Err(HwConfigError::PwmInUse {
                channel: 1,
                first: "roller",
                second: "arm_lift"
            })
        );

        // Encoder channel A shares a number with the roller PWM, which is fine,
        // but not with another DIO.
        let mut cfg = HwConfig::default();
        cfg.arm_line_break_dio = 3;
        assert_eq!(
            cfg.validate(),
            Err(HwConfigError::DioInUse {
                channel: 3,
                first: "arm_top_switch",
                second: "arm_line_break"
            })
        );
    }

    #[test]
    fn test_out_of_range() {
        let mut cfg = HwConfig::default();
        cfg.arm_encoder_dio = [1, 15];
        assert_eq!(
            cfg.validate(),
            Err(HwConfigError::DioOutOfRange {
                name: "arm_encoder_b",
                channel: 15
            })
        );

        let mut cfg = HwConfig::default();
        cfg.roller_pwm = 0;
        assert!(matches!(
            cfg.validate(),
            Err(HwConfigError::PwmOutOfRange { .. })
        ));
    }
}
