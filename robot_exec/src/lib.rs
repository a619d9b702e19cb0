//! # Robot library.
//!
//! This library allows the executable and the integration tests to access
//! items defined inside the robot crate.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

/// Arm control module - resolves arm commands into roller and pivot demands
pub mod arm_ctrl;

/// Autonomous arm routine
pub mod auton;

/// Global data store for the executable
pub mod data_store;

/// Executable parameters
pub mod params;

/// Simulated arm - stands in for the hardware
pub mod sim;

/// Teleoperation - maps co-pilot input onto arm commands
pub mod teleop;
