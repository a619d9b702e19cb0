//! # Autonomous arm routine
//!
//! Keeps the preloaded ball seated while the robot drives forward, then
//! lowers the arm clear of the catapult.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use crate::arm_ctrl::ArmCmd;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// End of the ball seating phase.
///
/// Units: seconds
pub const SEAT_BALL_END_S: f64 = 5.0;

/// End of the lowering phase.
///
/// Units: seconds
pub const LOWER_ARM_END_S: f64 = 7.0;

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Get the arm commands for the given time since the start of autonomous.
pub fn arm_cmds(elapsed_s: f64) -> Vec<ArmCmd> {
    if elapsed_s < SEAT_BALL_END_S {
        vec![ArmCmd::DropBallIn]
    } else if elapsed_s < LOWER_ARM_END_S {
        vec![ArmCmd::MoveDown]
    } else {
        Vec::new()
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_phases() {
        assert_eq!(arm_cmds(0.0), vec![ArmCmd::DropBallIn]);
        assert_eq!(arm_cmds(4.99), vec![ArmCmd::DropBallIn]);
        assert_eq!(arm_cmds(5.0), vec![ArmCmd::MoveDown]);
        assert_eq!(arm_cmds(6.99), vec![ArmCmd::MoveDown]);
        assert!(arm_cmds(7.0).is_empty());
        assert!(arm_cmds(12.0).is_empty());
    }
}
