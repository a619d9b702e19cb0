//! Parameters structure for ArmCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for Arm control.
///
/// The defaults are the calibration of the competition robot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Params {
    // ---- CALIBRATION ----
    /// Encoder reading with the arm fully raised, against the top stop.
    ///
    /// Must be 0, the encoder is zeroed whenever the top switch is pressed.
    ///
    /// Units: encoder ticks
    pub top_position: i32,

    /// Encoder reading with the arm fully lowered onto the floor.
    ///
    /// Units: encoder ticks
    pub floor_position: i32,

    /// Encoder reading at which the ball lines up with the low goal.
    ///
    /// Units: encoder ticks
    pub low_goal_position: i32,

    /// The arm must be at least this far down before the catapult may fire,
    /// otherwise the launcher hits it.
    ///
    /// Units: encoder ticks
    pub min_firing_position: i32,

    /// Angle swept by the arm between the top and floor positions.
    ///
    /// Units: degrees
    pub travel_deg: f64,

    // ---- LOAD SEQUENCE ----
    /// How long the roller keeps pulling the ball in once the arm reaches the
    /// top.
    ///
    /// Units: seconds
    pub rolling_in_duration_s: f64,

    // ---- RATE PID ----
    /// Pivot rate demanded by the PID up/down commands.
    ///
    /// Units: degrees/second
    pub movement_rate_degs: f64,

    /// Proportional gain of the pivot rate PID.
    pub pid_kp: f64,

    /// Integral gain of the pivot rate PID.
    pub pid_ki: f64,

    /// Derivative gain of the pivot rate PID.
    pub pid_kd: f64,

    // ---- CYCLE ----
    /// Period of the host loop, used to turn encoder deltas into rates.
    ///
    /// Units: seconds
    pub cycle_period_s: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Params {
    fn default() -> Self {
        Self {
            top_position: 0,
            floor_position: 67,
            low_goal_position: 20,
            min_firing_position: 10,
            travel_deg: 90.0,
            rolling_in_duration_s: 1.0,
            movement_rate_degs: 90.0 / 4.0,
            pid_kp: 0.1,
            pid_ki: 0.0,
            pid_kd: 0.0,
            cycle_period_s: 0.02,
        }
    }
}

impl Params {
    /// Check the parameters describe a physically sensible arm.
    ///
    /// Returns a description of the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        if self.top_position != 0 {
            return Err(format!(
                "top_position must be 0, found {}",
                self.top_position
            ));
        }

        if self.floor_position <= self.top_position {
            return Err(format!(
                "floor_position ({}) must be greater than top_position ({})",
                self.floor_position, self.top_position
            ));
        }

        for (name, value) in &[
            ("travel_deg", self.travel_deg),
            ("rolling_in_duration_s", self.rolling_in_duration_s),
            ("cycle_period_s", self.cycle_period_s),
        ] {
            if !value.is_finite() || *value <= 0.0 {
                return Err(format!("{} must be positive, found {}", name, value));
            }
        }

        for (name, value) in &[
            ("movement_rate_degs", self.movement_rate_degs),
            ("pid_kp", self.pid_kp),
            ("pid_ki", self.pid_ki),
            ("pid_kd", self.pid_kd),
        ] {
            if !value.is_finite() {
                return Err(format!("{} must be finite, found {}", name, value));
            }
        }

        Ok(())
    }

    /// Angle swept per encoder tick.
    ///
    /// Units: degrees/tick
    pub fn deg_per_tick(&self) -> f64 {
        self.travel_deg / f64::from((self.top_position - self.floor_position).abs())
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_defaults() {
        let p = Params::default();
        assert_eq!(p.validate(), Ok(()));
        assert_eq!(p.movement_rate_degs, 22.5);
        assert!((p.deg_per_tick() - 90.0 / 67.0).abs() < 1e-12);
    }

    #[test]
    fn test_partial_file() {
        // Anything missing from the file keeps its default
        let p: Params = util::params::from_toml_str("min_firing_position = 12\n").unwrap();
        assert_eq!(p.min_firing_position, 12);
        assert_eq!(p.floor_position, 67);
    }

    #[test]
    fn test_validate() {
        let mut p = Params::default();
        p.floor_position = 0;
        assert!(p.validate().is_err());

        // The top stop re-zero pins the top at 0
        let mut p = Params::default();
        p.top_position = 5;
        assert_eq!(
            p.validate(),
            Err(String::from("top_position must be 0, found 5"))
        );

        let mut p = Params::default();
        p.cycle_period_s = 0.0;
        assert!(p.validate().is_err());

        let mut p = Params::default();
        p.pid_kp = f64::NAN;
        assert!(p.validate().is_err());
    }
}
