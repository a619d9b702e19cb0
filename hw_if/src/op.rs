//! # Operator input
//!
//! A snapshot of the co-pilot gamepad, as sampled once per cycle. Snapshots
//! can be parsed from JSON so that operator input can be scripted.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// State of the co-pilot gamepad.
///
/// Buttons not present in a JSON snapshot default to released and the stick
/// defaults to centred.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpInput {
    /// A button, roller in.
    pub a: bool,

    /// X button, drop ball in.
    pub x: bool,

    /// Y button, roller out.
    pub y: bool,

    /// Left bumper, run the load sequence.
    pub lb: bool,

    /// Back button, abort any automatic arm motion.
    pub back: bool,

    /// Left stick Y axis, positive raises the arm.
    ///
    /// Units: normalised, -1.0 to +1.0
    pub left_y: f64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible parsing errors.
#[derive(Debug, Error)]
pub enum OpInputParseError {
    #[error("Operator input contains invalid JSON: {0}")]
    InvalidJson(serde_json::Error),

    #[error("Stick axis value {0} is outside -1.0..=1.0")]
    AxisOutOfRange(f64),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl OpInput {
    /// Parse an operator input snapshot from a JSON object.
    pub fn from_json(json_str: &str) -> Result<Self, OpInputParseError> {
        let input: OpInput =
            serde_json::from_str(json_str).map_err(OpInputParseError::InvalidJson)?;

        if !input.left_y.is_finite() || input.left_y.abs() > 1.0 {
            return Err(OpInputParseError::AxisOutOfRange(input.left_y));
        }

        Ok(input)
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_from_json() {
        let input = OpInput::from_json(r#"{"a": true, "left_y": 0.5}"#).unwrap();
        assert!(input.a);
        assert!(!input.lb);
        assert_eq!(input.left_y, 0.5);

        assert_eq!(OpInput::from_json("{}").unwrap(), OpInput::default());
    }

    #[test]
    fn test_from_json_errors() {
        assert!(matches!(
            OpInput::from_json(r#"{"a": "yes"}"#),
            Err(OpInputParseError::InvalidJson(_))
        ));
        assert!(matches!(
            OpInput::from_json(r#"{"left_y": 1.5}"#),
            Err(OpInputParseError::AxisOutOfRange(_))
        ));
    }
}
