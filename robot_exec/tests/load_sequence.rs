//! Whole-cycle scenarios for the arm, driven through the module interface
//! against the simulated arm.

use hw_if::op::OpInput;
use robot_lib::{
    arm_ctrl::{ArmCmd, ArmCtrl, InputData, PivotMode, RollerMode},
    sim::{SimArm, SimParams},
    teleop,
};
use util::{module::State, script_interpreter::{PendingInput, ScriptInterpreter}};

const CYCLE_PERIOD_S: f64 = 0.02;

/// Run one host cycle with the given commands.
fn cycle(sim: &SimArm, ctrl: &mut ArmCtrl, cmds: Vec<ArmCmd>) {
    ctrl.proc(&InputData { cmds }).unwrap();
    sim.step(CYCLE_PERIOD_S);
}

#[test]
fn test_load_from_rest() {
    let sim = SimArm::new(SimParams::default());
    let mut ctrl = ArmCtrl::new(sim.io());

    // Nothing triggered at rest
    assert!(!ctrl.at_top());
    assert!(!ctrl.at_bottom());
    assert!(!ctrl.floor_switch_triggered());
    assert!(!ctrl.ball_captured());
    assert_eq!(ctrl.position(), 0);

    // First call stops in lowering without touching the roller
    ctrl.load_sequence();
    assert_eq!(ctrl.pivot_mode(), PivotMode::Lowering);
    assert_eq!(ctrl.roller_mode(), RollerMode::Off);
    ctrl.update().unwrap();
    sim.step(CYCLE_PERIOD_S);

    // Updates alone drive the arm down to the floor
    for _ in 0..500 {
        if ctrl.position() >= 67 {
            break;
        }
        assert_eq!(ctrl.pivot_mode(), PivotMode::Lowering);
        ctrl.update().unwrap();
        sim.step(CYCLE_PERIOD_S);
    }
    assert!(ctrl.position() >= 67);

    // Next call waits for the ball with the roller pulling in
    ctrl.load_sequence();
    assert_eq!(ctrl.pivot_mode(), PivotMode::WaitingForBall);
    assert_eq!(ctrl.roller_mode(), RollerMode::Intake);
}

#[test]
fn test_held_load_button_with_auto_capture() {
    let sim = SimArm::new(SimParams {
        auto_capture_s: Some(0.3),
        ..SimParams::default()
    });
    let mut ctrl = ArmCtrl::new(sim.io());

    let held = OpInput {
        lb: true,
        ..OpInput::default()
    };

    let mut seen = Vec::new();
    for _ in 0..1000 {
        cycle(&sim, &mut ctrl, teleop::arm_cmds(&held));
        if seen.last() != Some(&ctrl.pivot_mode()) {
            seen.push(ctrl.pivot_mode());
        }
    }

    assert_eq!(
        seen,
        vec![
            PivotMode::Lowering,
            PivotMode::WaitingForBall,
            PivotMode::Raising,
            PivotMode::RollingInBall
        ]
    );
    assert!(sim.ball_present());
    assert!(ctrl.at_top());
    assert_eq!(ctrl.position(), 0);
    assert_eq!(sim.roller_duty(), 0.0);

    // Releasing the button and aborting hands the arm back
    cycle(
        &sim,
        &mut ctrl,
        teleop::arm_cmds(&OpInput {
            back: true,
            ..OpInput::default()
        }),
    );
    assert_eq!(ctrl.pivot_mode(), PivotMode::HoldingAtTop);
}

#[test]
fn test_scripted_session() {
    let mut si = ScriptInterpreter::from_script(
        r#"
        0.0: {"lb": true};
        3.0: {"lb": true, "y": true};
        3.5: {};
        "#,
    )
    .unwrap();

    let sim = SimArm::new(SimParams::default());
    sim.set_ball_present(true);
    let mut ctrl = ArmCtrl::new(sim.io());
    let mut op_input = OpInput::default();

    for _ in 0..1000 {
        match si.get_pending(sim.time_s()) {
            PendingInput::Some(i) => op_input = i,
            PendingInput::None => (),
            PendingInput::EndOfScript => break,
        }
        cycle(&sim, &mut ctrl, teleop::arm_cmds(&op_input));
    }

    // The preloaded ball went straight up and was then pushed out
    assert!(!sim.ball_present());
    assert!(ctrl.at_top());
}
