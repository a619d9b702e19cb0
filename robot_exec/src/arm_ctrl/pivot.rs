//! Pivot speed policy
//!
//! Negative duty raises the arm, positive duty lowers it. The automatic
//! modes pick a speed from a few encoder thresholds, which is slower to
//! converge than closed loop control but never overshoots the hard stops.
//! A rate PID is also available for the manual PID commands.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Serialize;

use super::Params;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Manual raise speed with a ball in the arm.
pub const MANUAL_UP_WITH_BALL: f64 = -0.7;

/// Manual raise speed with an empty arm, lower so it doesn't slam the stop.
pub const MANUAL_UP_NO_BALL: f64 = -0.5;

/// Manual lowering speed.
pub const MANUAL_DOWN: f64 = 0.5;

/// Roller duty for pulling a ball in.
pub const ROLLER_IN: f64 = 0.3;

/// Roller duty for pushing a ball out.
pub const ROLLER_OUT: f64 = -0.3;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A PID controller acting on the pivot rotation rate.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RatePid {
    kp: f64,
    ki: f64,
    kd: f64,

    /// Demanded rate, `None` while disabled.
    ///
    /// Units: degrees/second
    setpoint_degs: Option<f64>,

    integral: f64,
    prev_error: Option<f64>,
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Manual raise speed.
pub fn manual_up_speed(ball_captured: bool) -> f64 {
    if ball_captured {
        MANUAL_UP_WITH_BALL
    } else {
        MANUAL_UP_NO_BALL
    }
}

/// Thresholded raise speed for the given encoder position.
///
/// A loaded arm accelerates sooner, an empty one creeps the last stretch to
/// the top.
pub fn curved_up_speed(position: i32, ball_captured: bool) -> f64 {
    if ball_captured {
        if position > 10 {
            -0.8
        } else {
            -0.3
        }
    } else if position > 30 {
        -0.8
    } else if position > 10 {
        -0.6
    } else {
        -0.1
    }
}

/// Thresholded lowering speed for the given encoder position.
pub fn curved_down_speed(position: i32) -> f64 {
    if position < 15 {
        0.5
    } else {
        0.3
    }
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl RatePid {
    /// A disabled controller with the gains from `params`.
    pub fn new(params: &Params) -> Self {
        Self {
            kp: params.pid_kp,
            ki: params.pid_ki,
            kd: params.pid_kd,
            ..Self::default()
        }
    }

    /// Enable the controller with a new rate setpoint.
    ///
    /// Accumulated error is kept if the controller was already running.
    pub fn enable(&mut self, setpoint_degs: f64) {
        if self.setpoint_degs.is_none() {
            self.integral = 0.0;
            self.prev_error = None;
        }
        self.setpoint_degs = Some(setpoint_degs);
    }

    /// Disable the controller.
    pub fn disable(&mut self) {
        self.setpoint_degs = None;
    }

    /// True if the controller is driving the pivot.
    pub fn is_enabled(&self) -> bool {
        self.setpoint_degs.is_some()
    }

    /// Current setpoint, if enabled.
    pub fn setpoint(&self) -> Option<f64> {
        self.setpoint_degs
    }

    /// Run one step of the controller.
    ///
    /// Returns the pivot duty, or `None` if disabled. The output is limited
    /// to the duty range but not otherwise checked.
    pub fn calculate(&mut self, rate_degs: f64, dt_s: f64) -> Option<f64> {
        let setpoint = self.setpoint_degs?;
        let error = setpoint - rate_degs;

        self.integral += error * dt_s;
        // Anti-windup, the integral term alone may not saturate the output
        if self.ki != 0.0 {
            let i_max = 1.0 / self.ki.abs();
            self.integral = util::maths::abs_cap(self.integral, i_max);
        }

        let derivative = match self.prev_error {
            Some(prev) if dt_s > 0.0 => (error - prev) / dt_s,
            _ => 0.0,
        };
        self.prev_error = Some(error);

        let u = self.kp * error + self.ki * self.integral + self.kd * derivative;

        Some(util::maths::abs_cap(u, hw_if::dev::MAX_DUTY))
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_manual_up_speed() {
        assert_eq!(manual_up_speed(true), -0.7);
        assert_eq!(manual_up_speed(false), -0.5);
    }

    #[test]
    fn test_curved_up_speed() {
        // Loaded arm
        assert_eq!(curved_up_speed(67, true), -0.8);
        assert_eq!(curved_up_speed(11, true), -0.8);
        assert_eq!(curved_up_speed(10, true), -0.3);
        assert_eq!(curved_up_speed(0, true), -0.3);

        // Empty arm
        assert_eq!(curved_up_speed(31, false), -0.8);
        assert_eq!(curved_up_speed(30, false), -0.6);
        assert_eq!(curved_up_speed(11, false), -0.6);
        assert_eq!(curved_up_speed(10, false), -0.1);
        assert_eq!(curved_up_speed(-3, false), -0.1);
    }

    #[test]
    fn test_curved_down_speed() {
        assert_eq!(curved_down_speed(0), 0.5);
        assert_eq!(curved_down_speed(14), 0.5);
        assert_eq!(curved_down_speed(15), 0.3);
        assert_eq!(curved_down_speed(66), 0.3);
    }

    #[test]
    fn test_rate_pid() {
        let mut pid = RatePid::new(&Params::default());
        assert_eq!(pid.calculate(0.0, 0.02), None);

        // Proportional only by default: 0.1 * (22.5 - 0.0)
        pid.enable(22.5);
        let u = pid.calculate(0.0, 0.02).unwrap();
        assert!((u - 1.0).abs() < 1e-12, "saturated output, got {}", u);

        pid.enable(-22.5);
        let u = pid.calculate(-20.0, 0.02).unwrap();
        assert!((u + 0.25).abs() < 1e-12, "got {}", u);

        // Holding still gives no output
        pid.enable(0.0);
        assert_eq!(pid.calculate(0.0, 0.02), Some(0.0));

        pid.disable();
        assert!(!pid.is_enabled());
        assert_eq!(pid.calculate(5.0, 0.02), None);
    }

    #[test]
    fn test_rate_pid_integral_limited() {
        let mut params = Params::default();
        params.pid_kp = 0.0;
        params.pid_ki = 0.5;
        let mut pid = RatePid::new(&params);
        pid.enable(100.0);

        let mut u = 0.0;
        for _ in 0..1000 {
            u = pid.calculate(0.0, 0.02).unwrap();
        }
        assert_eq!(u, 1.0);
    }
}
