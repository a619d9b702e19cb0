//! # Robot Executable Parameters
//!
//! This module provide parameters for the robot executable.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use hw_if::eqpt::HwConfig;
use serde::{Deserialize, Serialize};

use crate::sim::SimParams;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExecParams {
    /// Pin and channel assignments
    pub hw: HwConfig,

    /// Simulated arm model
    pub sim: SimParams,

    /// Length of the autonomous period, run when no script is given.
    ///
    /// Units: seconds
    pub auton_duration_s: f64,

    /// Number of consecutive overrunning cycles after which the robot is
    /// made safe.
    pub max_consec_cycle_overruns: u64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for ExecParams {
    fn default() -> Self {
        Self {
            hw: HwConfig::default(),
            sim: SimParams::default(),
            auton_duration_s: 10.0,
            max_consec_cycle_overruns: 25,
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_load() {
        let p: ExecParams = util::params::from_toml_str(
            r#"
            auton_duration_s = 8.0

            [hw]
            roller_pwm = 1
            arm_lift_pwm = 2
            arm_floor_switch_dio = 5
            arm_top_switch_dio = 3
            arm_line_break_dio = 9
            arm_encoder_dio = [1, 2]

            [sim]
            auto_capture_s = 0.5
            "#,
        )
        .unwrap();

        assert_eq!(p.auton_duration_s, 8.0);
        assert_eq!(p.max_consec_cycle_overruns, 25);
        assert_eq!(p.hw, HwConfig::default());
        assert_eq!(p.sim.auto_capture_s, Some(0.5));
        assert_eq!(p.sim.ticks_per_s, 100.0);
    }
}
