//! # Device capability traits
//!
//! The control modules never see concrete device types, only these narrow
//! capabilities. Real drivers and the simulated arm both implement them.

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Largest duty cycle magnitude a speed controller accepts.
pub const MAX_DUTY: f64 = 1.0;

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// A motor speed controller driven by a signed duty cycle.
pub trait SpeedController {
    /// Set the duty cycle of the controller.
    ///
    /// ## Arguments
    /// - `duty` - Signed duty cycle between -1.0 and +1.0. Callers are
    ///   expected to clamp to this range, see [`clamp_duty`].
    fn set(&mut self, duty: f64);

    /// The last duty cycle written to the controller.
    fn get(&self) -> f64;
}

/// A boolean digital input, such as a limit switch or a line-break sensor.
///
/// The robot's switches are wired active-low, so a raw `true` means the
/// switch is *not* triggered.
pub trait DigitalInput {
    /// Read the raw state of the input.
    fn get(&self) -> bool;
}

/// An incremental quadrature encoder.
pub trait Encoder {
    /// Current count in encoder ticks.
    fn get(&self) -> i32;

    /// Reset the count to zero.
    fn reset(&mut self);
}

/// An elapsed-time tracker.
pub trait Timer {
    /// Start (or resume) accumulating time.
    fn start(&mut self);

    /// Stop accumulating time, keeping the elapsed value.
    fn stop(&mut self);

    /// Zero the elapsed time. Does not change whether the timer is running.
    fn reset(&mut self);

    /// Elapsed time.
    ///
    /// Units: seconds
    fn get(&self) -> f64;
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Limit a duty cycle to the range accepted by a [`SpeedController`].
///
/// Non-finite values are passed through untouched so that the caller can
/// detect them.
pub fn clamp_duty(duty: f64) -> f64 {
    if duty.is_finite() {
        duty.max(-MAX_DUTY).min(MAX_DUTY)
    } else {
        duty
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_clamp_duty() {
        assert_eq!(clamp_duty(0.3), 0.3);
        assert_eq!(clamp_duty(-0.8), -0.8);
        assert_eq!(clamp_duty(1.7), 1.0);
        assert_eq!(clamp_duty(-3.0), -1.0);
        assert!(clamp_duty(f64::NAN).is_nan());
    }
}
