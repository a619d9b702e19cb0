//! # Teleoperation
//!
//! Maps a co-pilot gamepad snapshot onto the arm commands for one cycle.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use hw_if::op::OpInput;
use util::maths::deadband;

use crate::arm_ctrl::ArmCmd;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Stick deflections smaller than this are ignored.
pub const STICK_DEADBAND: f64 = 0.05;

/// Stick deflection above which the arm is raised.
pub const MOVE_UP_THRESHOLD: f64 = 0.2;

/// Stick deflection below which the arm is lowered.
pub const MOVE_DOWN_THRESHOLD: f64 = -0.3;

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Get the arm commands for the given operator input, in execution order.
///
/// Roller buttons are prioritised A, Y, X. An abort on the back button is
/// issued last so that it beats a held load sequence.
pub fn arm_cmds(input: &OpInput) -> Vec<ArmCmd> {
    let mut cmds = Vec::new();

    if input.a {
        cmds.push(ArmCmd::RunRollerIn);
    } else if input.y {
        cmds.push(ArmCmd::RunRollerOut);
    } else if input.x {
        cmds.push(ArmCmd::DropBallIn);
    }

    let left_y = deadband(input.left_y, STICK_DEADBAND);
    if left_y > MOVE_UP_THRESHOLD {
        cmds.push(ArmCmd::MoveUp);
    } else if left_y < MOVE_DOWN_THRESHOLD {
        cmds.push(ArmCmd::MoveDown);
    }

    if input.lb {
        cmds.push(ArmCmd::LoadSequence);
    }

    if input.back {
        cmds.push(ArmCmd::Override);
    }

    cmds
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
