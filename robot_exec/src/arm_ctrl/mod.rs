//! Arm control module
//!
//! Drives the ball intake arm: a pivot that raises and lowers the arm and a
//! roller on its end that pulls the ball in or pushes it out. Operator
//! commands set modes during the cycle, and [`ArmCtrl::update`] resolves the
//! modes into actuator demands once per cycle.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod cmd;
mod load_seq;
mod params;
pub mod pivot;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use cmd::*;
pub use params::*;
pub use state::*;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Maximum number of pivot mode transitions the load sequence may chain in a
/// single call. The longest legal chain (free to rolling in) is four.
pub const MAX_LOAD_TRANSITIONS: usize = 8;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during ArmCtrl processing.
#[derive(Debug, thiserror::Error)]
pub enum ArmCtrlError {
    #[error("Non-finite {actuator} demand ({duty}), the actuator has been stopped")]
    NonFiniteDemand { actuator: &'static str, duty: f64 },
}

/// Possible errors that can occur while initialising ArmCtrl.
#[derive(Debug, thiserror::Error)]
pub enum ArmCtrlInitError {
    #[error("Could not load the ArmCtrl parameters: {0}")]
    ParamLoad(#[from] util::params::LoadError),

    #[error("Invalid ArmCtrl parameters: {0}")]
    InvalidParams(String),
}
