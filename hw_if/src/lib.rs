//! # Hardware Interface Crate
//!
//! Provides the definitions shared between the robot executable and its
//! hardware: the capability traits each device must provide, the pin/channel
//! map of the robot, and the operator input snapshot.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

/// Device capability traits (speed controllers, digital inputs, encoders,
/// timers).
pub mod dev;

/// Equipment wiring definitions.
pub mod eqpt;

/// Operator input snapshots.
pub mod op;
