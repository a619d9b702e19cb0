//! Commands passed into ArmCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use super::ArmCtrl;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// A single arm command. Several may be issued in one cycle, later roller
/// or pivot commands override earlier ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArmCmd {
    RunRollerIn,
    RunRollerOut,
    DropBallIn,
    MoveUp,
    MoveDown,
    MoveUpCurved,
    MoveDownCurved,
    MoveTowardsLowGoal,
    MoveUpPid,
    MoveDownPid,
    HoldPositionPid,
    MoveToTop,
    MoveToBottom,
    LoadSequence,
    Override,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ArmCtrl {
    /// Execute a command.
    pub fn exec(&mut self, cmd: &ArmCmd) {
        match cmd {
            ArmCmd::RunRollerIn => self.run_roller_in(),
            ArmCmd::RunRollerOut => self.run_roller_out(),
            ArmCmd::DropBallIn => self.drop_ball_in(),
            ArmCmd::MoveUp => self.move_up(),
            ArmCmd::MoveDown => self.move_down(),
            ArmCmd::MoveUpCurved => self.move_up_curved(),
            ArmCmd::MoveDownCurved => self.move_down_curved(),
            ArmCmd::MoveTowardsLowGoal => self.move_towards_low_goal(),
            ArmCmd::MoveUpPid => self.move_up_pid(),
            ArmCmd::MoveDownPid => self.move_down_pid(),
            ArmCmd::HoldPositionPid => self.hold_position_pid(),
            ArmCmd::MoveToTop => self.move_to_top(),
            ArmCmd::MoveToBottom => self.move_to_bottom(),
            ArmCmd::LoadSequence => self.load_sequence(),
            ArmCmd::Override => self.override_auto(),
        }
    }
}
