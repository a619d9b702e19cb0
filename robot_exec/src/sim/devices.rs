//! Device handles onto the simulated arm

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use hw_if::dev::{DigitalInput, Encoder, SpeedController, Timer};
use std::{cell::RefCell, rc::Rc};

use super::SimArmState;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// The motors on the arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motor {
    Roller,
    Pivot,
}

/// The switches on the arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Switch {
    Floor,
    Top,
    Ball,
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A simulated speed controller.
#[derive(Debug)]
pub struct SimMotor {
    state: Rc<RefCell<SimArmState>>,
    motor: Motor,
}

/// A simulated active-low switch.
#[derive(Debug)]
pub struct SimSwitch {
    state: Rc<RefCell<SimArmState>>,
    switch: Switch,
}

/// A simulated pivot encoder.
#[derive(Debug)]
pub struct SimEncoder {
    state: Rc<RefCell<SimArmState>>,
}

/// A timer running on simulation time.
#[derive(Debug)]
pub struct SimTimer {
    state: Rc<RefCell<SimArmState>>,
    accumulated_s: f64,
    started_at_s: Option<f64>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SimMotor {
    pub(crate) fn new(state: &Rc<RefCell<SimArmState>>, motor: Motor) -> Self {
        Self {
            state: Rc::clone(state),
            motor,
        }
    }
}

impl SpeedController for SimMotor {
    fn set(&mut self, duty: f64) {
        let mut s = self.state.borrow_mut();
        match self.motor {
            Motor::Roller => s.roller_duty = duty,
            Motor::Pivot => s.pivot_duty = duty,
        }
    }

    fn get(&self) -> f64 {
        let s = self.state.borrow();
        match self.motor {
            Motor::Roller => s.roller_duty,
            Motor::Pivot => s.pivot_duty,
        }
    }
}

impl SimSwitch {
    pub(crate) fn new(state: &Rc<RefCell<SimArmState>>, switch: Switch) -> Self {
        Self {
            state: Rc::clone(state),
            switch,
        }
    }
}

impl DigitalInput for SimSwitch {
    fn get(&self) -> bool {
        let s = self.state.borrow();
        let triggered = match self.switch {
            Switch::Floor => s.floor_pressed(),
            Switch::Top => s.top_pressed(),
            Switch::Ball => s.ball_present,
        };
        !triggered
    }
}

impl SimEncoder {
    pub(crate) fn new(state: &Rc<RefCell<SimArmState>>) -> Self {
        Self {
            state: Rc::clone(state),
        }
    }
}

impl Encoder for SimEncoder {
    fn get(&self) -> i32 {
        self.state.borrow().encoder_ticks()
    }

    fn reset(&mut self) {
        let mut s = self.state.borrow_mut();
        s.encoder_offset_ticks = s.position_ticks;
    }
}

impl SimTimer {
    pub(crate) fn new(state: &Rc<RefCell<SimArmState>>) -> Self {
        Self {
            state: Rc::clone(state),
            accumulated_s: 0.0,
            started_at_s: None,
        }
    }

    fn now(&self) -> f64 {
        self.state.borrow().time_s
    }
}

impl Timer for SimTimer {
    fn start(&mut self) {
        if self.started_at_s.is_none() {
            self.started_at_s = Some(self.now());
        }
    }

    fn stop(&mut self) {
        if let Some(t0) = self.started_at_s.take() {
            self.accumulated_s += self.now() - t0;
        }
    }

    fn reset(&mut self) {
        self.accumulated_s = 0.0;
        if self.started_at_s.is_some() {
            self.started_at_s = Some(self.now());
        }
    }

    fn get(&self) -> f64 {
        self.accumulated_s
            + self
                .started_at_s
                .map(|t0| self.now() - t0)
                .unwrap_or(0.0)
    }
}
