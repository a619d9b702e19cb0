//! Automatic ball load sequence
//!
//! Lowers the arm to the floor, rolls in until a ball is captured, raises it
//! to the top and pulls the ball fully in. Call once per cycle for as long as
//! the sequence should run. Satisfied exit conditions chain into the next
//! stage within the same call, so no cycle is lost per transition.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::error;

use super::{ArmCtrl, PivotMode, RollerMode, MAX_LOAD_TRANSITIONS};

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Outcome of evaluating one stage of the sequence.
enum Step {
    /// Stay in the current stage until the next call.
    Stay,

    /// Enter the given stage and evaluate it immediately.
    Advance(PivotMode),

    /// Enter the given stage and stop evaluating for this call.
    Reset(PivotMode),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ArmCtrl {
    /// Run one call of the load sequence.
    pub fn load_sequence(&mut self) {
        self.run_load_sequence(MAX_LOAD_TRANSITIONS)
    }

    fn run_load_sequence(&mut self, max_transitions: usize) {
        self.pid.disable();

        for _ in 0..max_transitions {
            match self.load_step() {
                Step::Stay => return,
                Step::Advance(mode) => self.set_pivot_mode(mode),
                Step::Reset(mode) => {
                    self.set_pivot_mode(mode);
                    return;
                }
            }
        }

        error!(
            "Load sequence exceeded {} transitions in one call, restarting from lowering",
            max_transitions
        );
        self.report.load_transition_limit_hit = true;
        self.set_pivot_mode(PivotMode::Lowering);
    }

    fn load_step(&mut self) -> Step {
        match self.pivot_mode {
            PivotMode::Free => Step::Advance(PivotMode::Lowering),
            PivotMode::Lowering => {
                if self.at_bottom() || self.ball_captured() {
                    Step::Advance(PivotMode::WaitingForBall)
                } else {
                    self.roller_mode = RollerMode::Off;
                    Step::Stay
                }
            }
            PivotMode::WaitingForBall => {
                if self.ball_captured() {
                    Step::Advance(PivotMode::Raising)
                } else {
                    self.roller_mode = RollerMode::Intake;
                    Step::Stay
                }
            }
            PivotMode::Raising => {
                if self.at_top() {
                    self.io.load_timer.reset();
                    self.io.load_timer.start();
                    Step::Advance(PivotMode::RollingInBall)
                } else {
                    Step::Stay
                }
            }
            PivotMode::RollingInBall => {
                if self.io.load_timer.get() > self.params.rolling_in_duration_s {
                    self.io.load_timer.stop();
                } else {
                    self.roller_mode = RollerMode::Deploy;
                }
                Step::Stay
            }
            PivotMode::HoldingAtTop | PivotMode::HoldingAtBottom => {
                Step::Reset(PivotMode::Lowering)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::sim::{SimArm, SimParams};

    fn make_arm() -> (SimArm, ArmCtrl) {
        let sim = SimArm::new(SimParams::default());
        let ctrl = ArmCtrl::new(sim.io());
        (sim, ctrl)
    }

    /// One host cycle: the sequence call, the update, then the physics.
    fn cycle(sim: &SimArm, ctrl: &mut ArmCtrl) {
        ctrl.load_sequence();
        ctrl.update().unwrap();
        sim.step(ctrl.params().cycle_period_s);
    }

    #[test]
    fn test_first_call_from_free() {
        let (_sim, mut ctrl) = make_arm();

        ctrl.load_sequence();
        assert_eq!(ctrl.pivot_mode(), PivotMode::Lowering);
        assert_eq!(ctrl.roller_mode(), RollerMode::Off);
    }

    #[test]
    fn test_full_sequence() {
        let (sim, mut ctrl) = make_arm();

        // Down to the floor
        for _ in 0..500 {
            if ctrl.pivot_mode() == PivotMode::WaitingForBall {
                break;
            }
            cycle(&sim, &mut ctrl);
        }
        assert_eq!(ctrl.pivot_mode(), PivotMode::WaitingForBall);
        assert!(ctrl.at_bottom());

        // Intake runs for as long as there is no ball
        for _ in 0..20 {
            ctrl.load_sequence();
            assert_eq!(ctrl.roller_mode(), RollerMode::Intake);
            ctrl.update().unwrap();
            assert_eq!(sim.roller_duty(), 0.3);
            sim.step(0.02);
        }
        assert_eq!(ctrl.pivot_mode(), PivotMode::WaitingForBall);

        // Capture and raise
        sim.set_ball_present(true);
        ctrl.load_sequence();
        assert_eq!(ctrl.pivot_mode(), PivotMode::Raising);

        for _ in 0..500 {
            if ctrl.pivot_mode() != PivotMode::Raising {
                break;
            }
            assert!(!ctrl.at_top());
            ctrl.update().unwrap();
            assert!(sim.pivot_duty() < 0.0);
            sim.step(0.02);
            ctrl.load_sequence();
        }
        assert_eq!(ctrl.pivot_mode(), PivotMode::RollingInBall);
        assert!(ctrl.at_top());
        assert_eq!(ctrl.roller_mode(), RollerMode::Deploy);

        // Roll the ball in for the configured time, then stop
        let t0 = sim.time_s();
        ctrl.update().unwrap();
        sim.step(0.02);

        for _ in 0..100 {
            let elapsed = sim.time_s() - t0;
            ctrl.load_sequence();
            ctrl.update().unwrap();
            assert_eq!(ctrl.pivot_mode(), PivotMode::RollingInBall);
            assert_eq!(sim.pivot_duty(), 0.0);

            if elapsed < 0.99 {
                assert_eq!(sim.roller_duty(), 0.3, "at {} s", elapsed);
            } else if elapsed > 1.01 {
                assert_eq!(sim.roller_duty(), 0.0, "at {} s", elapsed);
            }
            sim.step(0.02);
        }
    }

    #[test]
    fn test_ball_already_captured() {
        let (sim, mut ctrl) = make_arm();
        sim.set_position(30.0);
        sim.set_ball_present(true);

        // Free straight through to raising in one call
        ctrl.load_sequence();
        assert_eq!(ctrl.pivot_mode(), PivotMode::Raising);

        // Already at the top goes all the way to rolling in
        let (sim, mut ctrl) = make_arm();
        sim.set_position(-1.0);
        sim.set_ball_present(true);
        ctrl.load_sequence();
        assert_eq!(ctrl.pivot_mode(), PivotMode::RollingInBall);
        assert_eq!(ctrl.roller_mode(), RollerMode::Deploy);
        assert!(!ctrl.report.load_transition_limit_hit);
    }

    #[test]
    fn test_holding_restarts() {
        let (sim, mut ctrl) = make_arm();
        sim.set_position(-1.0);
        ctrl.update().unwrap();
        assert_eq!(ctrl.pivot_mode(), PivotMode::HoldingAtTop);

        ctrl.load_sequence();
        assert_eq!(ctrl.pivot_mode(), PivotMode::Lowering);
        assert_eq!(ctrl.roller_mode(), RollerMode::Off);
    }

    #[test]
    fn test_transition_limit() {
        let (sim, mut ctrl) = make_arm();
        sim.set_position(-1.0);
        sim.set_ball_present(true);

        ctrl.run_load_sequence(2);
        assert!(ctrl.report.load_transition_limit_hit);
        assert_eq!(ctrl.pivot_mode(), PivotMode::Lowering);
    }

    #[test]
    fn test_disables_pid() {
        let (_sim, mut ctrl) = make_arm();
        ctrl.hold_position_pid();
        ctrl.load_sequence();
        assert!(!ctrl.pid_enabled());
    }
}
