//! Implementations for the ArmCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use hw_if::dev::{self, DigitalInput, Encoder, SpeedController, Timer};
use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};

// Internal
use super::{
    pivot::{self, RatePid},
    ArmCmd, ArmCtrlError, ArmCtrlInitError, Params,
};
use util::{module::State, params, session::Session};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The devices used by the arm.
///
/// Switches are read raw, active-low.
pub struct ArmIo {
    pub roller: Box<dyn SpeedController>,
    pub pivot: Box<dyn SpeedController>,
    pub encoder: Box<dyn Encoder>,
    pub floor_switch: Box<dyn DigitalInput>,
    pub top_switch: Box<dyn DigitalInput>,
    pub ball_switch: Box<dyn DigitalInput>,
    pub load_timer: Box<dyn Timer>,
}

/// Arm control module state
pub struct ArmCtrl {
    pub(crate) params: Params,

    pub(crate) report: StatusReport,

    pub(crate) io: ArmIo,

    pub(crate) pivot_mode: PivotMode,

    /// Roller latch, consumed by every `update`.
    pub(crate) roller_mode: RollerMode,

    /// Roller mode applied by the last `update`, kept for telemetry.
    applied_roller_mode: RollerMode,

    /// Set when a manual pivot command drove the pivot this cycle.
    pub(crate) pivot_override: bool,

    pub(crate) pid: RatePid,

    /// Encoder reading at the previous update, for the rate estimate.
    last_encoder: i32,
}

/// Input data to Arm Control.
#[derive(Debug, Clone, Default)]
pub struct InputData {
    /// Commands issued this cycle, executed in order before the update.
    pub cmds: Vec<ArmCmd>,
}

/// Arm telemetry, sampled after the update.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArmTm {
    pub pivot_mode: PivotMode,
    pub roller_mode: RollerMode,
    pub position: i32,
    pub ball_captured: bool,
    pub at_top: bool,
    pub at_bottom: bool,
    pub floor_switch_triggered: bool,
    pub can_fire: bool,
    pub roller_duty: f64,
    pub pivot_duty: f64,

    /// Units: degrees/second
    pub pid_setpoint_degs: Option<f64>,
}

/// Status report for ArmCtrl processing.
#[derive(Clone, Copy, Default, Serialize, Deserialize, Debug, PartialEq)]
pub struct StatusReport {
    /// The encoder was re-zeroed against the top stop.
    pub encoder_zeroed: bool,

    /// The load sequence hit its transition limit and was snapped back to
    /// lowering.
    pub load_transition_limit_hit: bool,

    /// A non-finite actuator demand was replaced by zero.
    pub non_finite_demand: bool,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Automatic pivot behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PivotMode {
    /// No automatic control, the pivot follows manual commands.
    Free,
    Lowering,
    WaitingForBall,
    Raising,
    /// At the top, pulling the ball fully in. Holds like `HoldingAtTop`.
    RollingInBall,
    HoldingAtTop,
    HoldingAtBottom,
}

/// Roller demand for the current cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RollerMode {
    Off,
    /// Roll inwards to seat a ball already in the arm.
    Deploy,
    Eject,
    /// Roll inwards until a ball is captured.
    Intake,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for PivotMode {
    fn default() -> Self {
        PivotMode::Free
    }
}

impl Default for RollerMode {
    fn default() -> Self {
        RollerMode::Off
    }
}

impl State for ArmCtrl {
    type InitData = &'static str;
    type InitError = ArmCtrlInitError;

    type InputData = InputData;
    type OutputData = ArmTm;
    type StatusReport = StatusReport;
    type ProcError = ArmCtrlError;

    /// Initialise the ArmCtrl module.
    ///
    /// Expected init data is the path to the parameter file
    fn init(
        &mut self,
        init_data: Self::InitData,
        _session: &Session,
    ) -> Result<(), Self::InitError> {
        let params: Params = params::load(init_data)?;
        self.set_params(params)
    }

    /// Perform cyclic processing of Arm Control.
    ///
    /// The status report accumulates everything since the last successful
    /// call, including commands issued outside of `proc`.
    fn proc(
        &mut self,
        input_data: &Self::InputData,
    ) -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError> {
        for cmd in input_data.cmds.iter() {
            self.exec(cmd);
        }

        self.update()?;

        Ok((self.telemetry(), std::mem::take(&mut self.report)))
    }
}

impl ArmCtrl {
    /// Create a new controller over the given devices, using the default
    /// parameters.
    pub fn new(io: ArmIo) -> Self {
        let params = Params::default();
        let last_encoder = io.encoder.get();

        Self {
            pid: RatePid::new(&params),
            params,
            report: StatusReport::default(),
            io,
            pivot_mode: PivotMode::default(),
            roller_mode: RollerMode::default(),
            applied_roller_mode: RollerMode::default(),
            pivot_override: false,
            last_encoder,
        }
    }

    /// Replace the parameters. The rate PID is rebuilt, disabled, with the
    /// new gains.
    pub fn set_params(&mut self, params: Params) -> Result<(), ArmCtrlInitError> {
        params.validate().map_err(ArmCtrlInitError::InvalidParams)?;

        self.pid = RatePid::new(&params);
        self.params = params;

        Ok(())
    }

    // ---- ROLLER COMMANDS ----

    /// Pull a ball in until it is captured.
    pub fn run_roller_in(&mut self) {
        self.roller_mode = RollerMode::Intake;
    }

    /// Push the ball out.
    pub fn run_roller_out(&mut self) {
        self.roller_mode = RollerMode::Eject;
    }

    /// Roll inwards regardless of the ball sensor.
    pub fn drop_ball_in(&mut self) {
        self.roller_mode = RollerMode::Deploy;
    }

    // ---- MANUAL PIVOT COMMANDS ----

    /// Drive the pivot up at a fixed speed, faster when carrying a ball.
    pub fn move_up(&mut self) {
        self.pid.disable();
        let speed = pivot::manual_up_speed(self.ball_captured());
        self.io.pivot.set(speed);
        self.pivot_override = true;
    }

    /// Drive the pivot down at a fixed speed.
    ///
    /// With a ball in the arm and no roller command yet this cycle the
    /// roller is also run inwards to stop the ball dropping out.
    pub fn move_down(&mut self) {
        self.pid.disable();
        self.io.pivot.set(pivot::MANUAL_DOWN);
        self.hold_ball_while_lowering();
        self.pivot_override = true;
    }

    /// Drive the pivot up on the position dependent speed curve.
    pub fn move_up_curved(&mut self) {
        self.pid.disable();
        self.drive_up_curved();
        self.pivot_override = true;
    }

    /// Drive the pivot down on the position dependent speed curve.
    pub fn move_down_curved(&mut self) {
        self.pid.disable();
        self.drive_down_curved();
        self.hold_ball_while_lowering();
        self.pivot_override = true;
    }

    /// Move towards the low goal. Below the goal the arm is left to fall
    /// under its own weight until it is well clear.
    pub fn move_towards_low_goal(&mut self) {
        let pos = self.position();
        if pos > self.params.low_goal_position {
            self.move_up_curved();
        } else if pos < self.params.low_goal_position - 10 {
            self.move_down_curved();
        }
    }

    // ---- RATE PID COMMANDS ----

    /// Raise the arm at the configured movement rate.
    pub fn move_up_pid(&mut self) {
        self.pid.enable(-self.params.movement_rate_degs);
        self.pivot_override = true;
    }

    /// Lower the arm at the configured movement rate.
    pub fn move_down_pid(&mut self) {
        self.pid.enable(self.params.movement_rate_degs);
        self.pivot_override = true;
    }

    /// Hold the arm still.
    pub fn hold_position_pid(&mut self) {
        self.pid.enable(0.0);
        self.pivot_override = true;
    }

    // ---- AUTOMATIC PIVOT COMMANDS ----

    pub fn move_to_top(&mut self) {
        self.pid.disable();
        self.set_pivot_mode(PivotMode::Raising);
    }

    pub fn move_to_bottom(&mut self) {
        self.pid.disable();
        self.set_pivot_mode(PivotMode::Lowering);
    }

    /// Abandon any automatic behaviour and return the pivot to manual
    /// control.
    pub fn override_auto(&mut self) {
        self.pid.disable();
        self.set_pivot_mode(PivotMode::Free);
    }

    /// Function called when entering safe mode.
    ///
    /// Must result in no motion of the arm.
    pub fn make_safe(&mut self) {
        self.pid.disable();
        self.set_pivot_mode(PivotMode::Free);
        self.roller_mode = RollerMode::Off;
        self.applied_roller_mode = RollerMode::Off;
        self.pivot_override = false;
        self.io.load_timer.stop();
        self.io.roller.set(0.0);
        self.io.pivot.set(0.0);
    }

    // ---- QUERIES ----

    /// Current encoder reading.
    pub fn position(&self) -> i32 {
        self.io.encoder.get()
    }

    pub fn ball_captured(&self) -> bool {
        !self.io.ball_switch.get()
    }

    pub fn at_top(&self) -> bool {
        !self.io.top_switch.get()
    }

    /// True once the encoder has reached the floor position.
    pub fn at_bottom(&self) -> bool {
        self.position() >= self.params.floor_position
    }

    /// True if the arm is low enough for the catapult to fire past it.
    pub fn can_fire(&self) -> bool {
        self.position() >= self.params.min_firing_position
    }

    /// Raw floor switch state, for telemetry only. Control uses the encoder.
    pub fn floor_switch_triggered(&self) -> bool {
        !self.io.floor_switch.get()
    }

    pub fn pivot_mode(&self) -> PivotMode {
        self.pivot_mode
    }

    /// The pending roller latch.
    pub fn roller_mode(&self) -> RollerMode {
        self.roller_mode
    }

    pub fn pivot_override(&self) -> bool {
        self.pivot_override
    }

    pub fn pid_enabled(&self) -> bool {
        self.pid.is_enabled()
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Snapshot of the arm state.
    pub fn telemetry(&self) -> ArmTm {
        ArmTm {
            pivot_mode: self.pivot_mode,
            roller_mode: self.applied_roller_mode,
            position: self.position(),
            ball_captured: self.ball_captured(),
            at_top: self.at_top(),
            at_bottom: self.at_bottom(),
            floor_switch_triggered: self.floor_switch_triggered(),
            can_fire: self.can_fire(),
            roller_duty: self.io.roller.get(),
            pivot_duty: self.io.pivot.get(),
            pid_setpoint_degs: self.pid.setpoint(),
        }
    }

    // ---- CYCLE ----

    /// Resolve the roller latch and the pivot mode into actuator demands.
    ///
    /// Must be called exactly once per cycle, after that cycle's commands.
    pub fn update(&mut self) -> Result<(), ArmCtrlError> {
        // ---- ROLLER ----

        let roller_duty = match self.roller_mode {
            RollerMode::Off => 0.0,
            RollerMode::Deploy => pivot::ROLLER_IN,
            RollerMode::Eject => pivot::ROLLER_OUT,
            RollerMode::Intake => {
                if !self.ball_captured() || self.at_top() {
                    pivot::ROLLER_IN
                } else {
                    0.0
                }
            }
        };
        self.io.roller.set(roller_duty);
        self.applied_roller_mode = self.roller_mode;
        self.roller_mode = RollerMode::Off;

        // ---- PIVOT ----

        let pos = self.position();
        let rate_degs = f64::from(pos - self.last_encoder) * self.params.deg_per_tick()
            / self.params.cycle_period_s;
        self.last_encoder = pos;

        let mut result = Ok(());

        match self.pivot_mode {
            PivotMode::Free => {
                if let Some(duty) = self.pid.calculate(rate_degs, self.params.cycle_period_s) {
                    result = self.drive_pivot(duty);
                } else if !self.pivot_override {
                    self.io.pivot.set(0.0);
                    if self.at_top() {
                        self.set_pivot_mode(PivotMode::HoldingAtTop);
                    }
                    if self.at_bottom() {
                        self.set_pivot_mode(PivotMode::HoldingAtBottom);
                    }
                }
            }
            PivotMode::Lowering | PivotMode::HoldingAtBottom => {
                if self.pivot_mode == PivotMode::Lowering && self.at_bottom() {
                    self.set_pivot_mode(PivotMode::Free);
                }
                if self.at_bottom() {
                    self.io.pivot.set(0.0);
                } else {
                    self.drive_down_curved();
                }
            }
            PivotMode::Raising | PivotMode::RollingInBall | PivotMode::HoldingAtTop => {
                if self.pivot_mode == PivotMode::Raising && self.at_top() {
                    self.set_pivot_mode(PivotMode::Free);
                }
                if self.at_top() {
                    self.io.pivot.set(0.0);
                } else {
                    self.drive_up_curved();
                }
            }
            // Nothing drives the pivot while waiting, the arm rests on the
            // floor.
            PivotMode::WaitingForBall => self.io.pivot.set(0.0),
        }

        self.pivot_override = false;

        // Recalibrate against the top stop
        if self.at_top() {
            self.io.encoder.reset();
            self.last_encoder = self.position();
            self.report.encoder_zeroed = true;
        }

        trace!(
            "ArmCtrl output: roller {:.2}, pivot {:.2}, mode {:?}",
            self.io.roller.get(),
            self.io.pivot.get(),
            self.pivot_mode
        );

        result
    }

    // ---- INTERNAL ----

    pub(crate) fn set_pivot_mode(&mut self, mode: PivotMode) {
        if mode != self.pivot_mode {
            debug!("ArmCtrl pivot mode {:?} -> {:?}", self.pivot_mode, mode);
            self.pivot_mode = mode;
        }
    }

    fn drive_up_curved(&mut self) {
        let speed = pivot::curved_up_speed(self.position(), self.ball_captured());
        self.io.pivot.set(speed);
    }

    fn drive_down_curved(&mut self) {
        let speed = pivot::curved_down_speed(self.position());
        self.io.pivot.set(speed);
    }

    fn hold_ball_while_lowering(&mut self) {
        if self.ball_captured() && self.roller_mode == RollerMode::Off {
            self.roller_mode = RollerMode::Deploy;
        }
    }

    /// Write a computed pivot demand, stopping the pivot if it isn't finite.
    fn drive_pivot(&mut self, duty: f64) -> Result<(), ArmCtrlError> {
        let duty = dev::clamp_duty(duty);

        if duty.is_finite() {
            self.io.pivot.set(duty);
            Ok(())
        } else {
            warn!("Non-finite pivot demand ({}), stopping the pivot", duty);
            self.io.pivot.set(0.0);
            self.report.non_finite_demand = true;
            Err(ArmCtrlError::NonFiniteDemand {
                actuator: "pivot",
                duty,
            })
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
