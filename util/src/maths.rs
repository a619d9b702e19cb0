//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Limit `value` to `[-cap, cap]`.
pub fn abs_cap<T>(value: T, cap: T) -> T
where
    T: Float,
{
    let cap = cap.abs();
    if value > cap {
        cap
    } else if value < -cap {
        -cap
    } else {
        value
    }
}

/// Zero any value whose magnitude is below `min`, used to ignore small
/// joystick deflections.
pub fn deadband<T>(value: T, min: T) -> T
where
    T: Float,
{
    if value.abs() < min.abs() {
        T::zero()
    } else {
        value
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_abs_cap() {
        assert_eq!(abs_cap(0.4f64, 1.0), 0.4);
        assert_eq!(abs_cap(2.5f64, 1.0), 1.0);
        assert_eq!(abs_cap(-2.5f64, -1.0), -1.0);
    }

    #[test]
    fn test_deadband() {
        assert_eq!(deadband(0.04f64, 0.05), 0.0);
        assert_eq!(deadband(-0.04f64, 0.05), 0.0);
        assert_eq!(deadband(0.05f64, 0.05), 0.05);
        assert_eq!(deadband(-0.6f64, 0.05), -0.6);
    }
}
