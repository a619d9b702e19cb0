//! # Simulated arm
//!
//! A simple kinematic model of the arm used in place of the real hardware.
//! Pivot duty is integrated into a position, the limit switches and encoder
//! are derived from that position, and the ball sensor is either set
//! directly or filled in by an automatic capture model.
//!
//! All device handles share one state through `Rc<RefCell<_>>`, so the
//! simulation must stay on the thread that owns the controller.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod devices;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::debug;
use serde::{Deserialize, Serialize};
use std::{cell::RefCell, rc::Rc};

use crate::arm_ctrl::ArmIo;
pub use devices::*;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters of the simulated arm.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimParams {
    /// Pivot travel rate at full duty.
    ///
    /// Units: encoder ticks/second
    pub ticks_per_s: f64,

    /// Position of the top hard stop. The top switch is pressed when the arm
    /// rests against it.
    ///
    /// Units: encoder ticks
    pub top_stop_ticks: f64,

    /// Position of the floor hard stop.
    ///
    /// Units: encoder ticks
    pub floor_stop_ticks: f64,

    /// Position from which the floor switch is pressed.
    ///
    /// Units: encoder ticks
    pub floor_switch_ticks: f64,

    /// Position from which the roller can reach a ball lying on the floor.
    ///
    /// Units: encoder ticks
    pub capture_from_ticks: f64,

    /// If set, a ball is captured once the roller has been pulling in near
    /// the floor for this long.
    ///
    /// Units: seconds
    pub auto_capture_s: Option<f64>,
}

/// Shared state of the simulated arm.
#[derive(Debug, Default)]
pub struct SimArmState {
    /// Model parameters
    pub params: SimParams,

    /// Simulation time.
    ///
    /// Units: seconds
    pub time_s: f64,

    /// Physical arm position.
    ///
    /// Units: encoder ticks
    pub position_ticks: f64,

    /// Physical position at which the encoder was last reset.
    ///
    /// Units: encoder ticks
    pub encoder_offset_ticks: f64,

    /// Last roller duty demanded.
    pub roller_duty: f64,

    /// Last pivot duty demanded.
    pub pivot_duty: f64,

    /// True if a ball is in the arm.
    pub ball_present: bool,

    /// Time the roller has spent pulling in at the floor.
    ///
    /// Units: seconds
    pub intake_time_s: f64,
}

/// Handle to a simulated arm.
///
/// Cloning the handle shares the same arm.
#[derive(Debug, Clone)]
pub struct SimArm {
    state: Rc<RefCell<SimArmState>>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for SimParams {
    fn default() -> Self {
        Self {
            ticks_per_s: 100.0,
            top_stop_ticks: -1.0,
            floor_stop_ticks: 70.0,
            floor_switch_ticks: 67.0,
            capture_from_ticks: 60.0,
            auto_capture_s: None,
        }
    }
}

impl SimArm {
    /// Create a simulated arm resting at encoder zero with no ball. The
    /// arm starts just clear of the top switch.
    pub fn new(params: SimParams) -> Self {
        Self {
            state: Rc::new(RefCell::new(SimArmState {
                params,
                ..SimArmState::default()
            })),
        }
    }

    /// Build the device set for the arm controller.
    pub fn io(&self) -> ArmIo {
        ArmIo {
            roller: Box::new(SimMotor::new(&self.state, Motor::Roller)),
            pivot: Box::new(SimMotor::new(&self.state, Motor::Pivot)),
            encoder: Box::new(SimEncoder::new(&self.state)),
            floor_switch: Box::new(SimSwitch::new(&self.state, Switch::Floor)),
            top_switch: Box::new(SimSwitch::new(&self.state, Switch::Top)),
            ball_switch: Box::new(SimSwitch::new(&self.state, Switch::Ball)),
            load_timer: Box::new(SimTimer::new(&self.state)),
        }
    }

    /// Advance the simulation by `dt_s` seconds using the current demands.
    pub fn step(&self, dt_s: f64) {
        let mut s = self.state.borrow_mut();

        s.time_s += dt_s;

        let new_pos = s.position_ticks + s.pivot_duty * s.params.ticks_per_s * dt_s;
        s.position_ticks = new_pos
            .max(s.params.top_stop_ticks)
            .min(s.params.floor_stop_ticks);

        // Ball capture model
        if s.roller_duty < 0.0 && s.ball_present {
            debug!("SimArm: ball ejected");
            s.ball_present = false;
        }
        if s.roller_duty > 0.0 && s.position_ticks >= s.params.capture_from_ticks {
            s.intake_time_s += dt_s;
        } else {
            s.intake_time_s = 0.0;
        }
        if let Some(t) = s.params.auto_capture_s {
            if !s.ball_present && s.intake_time_s >= t {
                debug!("SimArm: ball captured");
                s.ball_present = true;
            }
        }
    }

    /// Place a ball in, or take it out of, the arm.
    pub fn set_ball_present(&self, present: bool) {
        self.state.borrow_mut().ball_present = present;
    }

    /// Move the arm to a physical position without changing the encoder
    /// offset.
    pub fn set_position(&self, position_ticks: f64) {
        let mut s = self.state.borrow_mut();
        s.position_ticks = position_ticks
            .max(s.params.top_stop_ticks)
            .min(s.params.floor_stop_ticks);
    }

    /// Shift the encoder reading by `ticks` without moving the arm, as a
    /// slipping encoder would.
    pub fn add_encoder_drift(&self, ticks: f64) {
        self.state.borrow_mut().encoder_offset_ticks -= ticks;
    }

    /// Simulation time.
    ///
    /// Units: seconds
    pub fn time_s(&self) -> f64 {
        self.state.borrow().time_s
    }

    /// Physical position of the arm.
    pub fn position_ticks(&self) -> f64 {
        self.state.borrow().position_ticks
    }

    /// Current encoder reading.
    pub fn encoder_ticks(&self) -> i32 {
        self.state.borrow().encoder_ticks()
    }

    /// Last roller duty demanded.
    pub fn roller_duty(&self) -> f64 {
        self.state.borrow().roller_duty
    }

    /// Last pivot duty demanded.
    pub fn pivot_duty(&self) -> f64 {
        self.state.borrow().pivot_duty
    }

    /// True if a ball is in the arm.
    pub fn ball_present(&self) -> bool {
        self.state.borrow().ball_present
    }
}

impl SimArmState {
    /// Encoder reading for the current position.
    pub fn encoder_ticks(&self) -> i32 {
        (self.position_ticks - self.encoder_offset_ticks).round() as i32
    }

    /// True if the top switch is pressed.
    pub fn top_pressed(&self) -> bool {
        self.position_ticks <= self.params.top_stop_ticks
    }

    /// True if the floor switch is pressed.
    pub fn floor_pressed(&self) -> bool {
        self.position_ticks >= self.params.floor_switch_ticks
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_pivot_integration() {
        let sim = SimArm::new(SimParams::default());
        let mut io = sim.io();

        // Half duty down for a second covers 50 ticks
        io.pivot.set(0.5);
        for _ in 0..50 {
            sim.step(0.02);
        }
        assert!((sim.position_ticks() - 50.0).abs() < 1e-9);
        assert_eq!(io.encoder.get(), 50);

        // Hard stop at the floor
        for _ in 0..100 {
            sim.step(0.02);
        }
        assert_eq!(sim.position_ticks(), 70.0);
        assert!(!io.floor_switch.get(), "floor switch should read triggered");

        // And at the top
        io.pivot.set(-1.0);
        for _ in 0..100 {
            sim.step(0.02);
        }
        assert_eq!(sim.position_ticks(), -1.0);
        assert!(!io.top_switch.get(), "top switch should read triggered");
        assert_eq!(io.encoder.get(), -1);

        io.encoder.reset();
        assert_eq!(io.encoder.get(), 0);
    }

    #[test]
    fn test_switches_idle() {
        let sim = SimArm::new(SimParams::default());
        let io = sim.io();

        // Active-low, nothing triggered at rest
        assert!(io.top_switch.get());
        assert!(io.floor_switch.get());
        assert!(io.ball_switch.get());

        sim.set_ball_present(true);
        assert!(!io.ball_switch.get());
    }

    #[test]
    fn test_encoder_drift() {
        let sim = SimArm::new(SimParams::default());
        let io = sim.io();
        sim.set_position(20.0);
        sim.add_encoder_drift(3.0);
        assert_eq!(io.encoder.get(), 23);
        assert_eq!(sim.position_ticks(), 20.0);
    }

    #[test]
    fn test_auto_capture_and_eject() {
        let sim = SimArm::new(SimParams {
            auto_capture_s: Some(0.09),
            ..SimParams::default()
        });
        let mut io = sim.io();
        sim.set_position(67.0);

        io.roller.set(0.3);
        for _ in 0..4 {
            sim.step(0.02);
        }
        assert!(!sim.ball_present());
        sim.step(0.02);
        assert!(sim.ball_present());

        io.roller.set(-0.3);
        sim.step(0.02);
        assert!(!sim.ball_present());
    }

    #[test]
    fn test_timer_follows_sim_clock() {
        let sim = SimArm::new(SimParams::default());
        let mut timer = sim.io().load_timer;

        timer.start();
        for _ in 0..10 {
            sim.step(0.02);
        }
        assert!((timer.get() - 0.2).abs() < 1e-9);

        timer.stop();
        sim.step(1.0);
        assert!((timer.get() - 0.2).abs() < 1e-9);

        timer.reset();
        assert_eq!(timer.get(), 0.0);
    }
}
