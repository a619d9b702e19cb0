//! Module interfaces
//!
//! Each cyclic control module in `robot_exec` shall implement the items in
//! this module, so that the executable can initialise and run them all in the
//! same way.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal imports
use crate::session::Session;

// ---------------------------------------------------------------------------
// MODULE STATE
// ---------------------------------------------------------------------------

/// The module's internal state.
pub trait State {
    /// Data required during initialisation, usually a parameter file name.
    type InitData;
    /// An error which can occur during initialisation.
    type InitError;

    /// Commands and data for one cycle.
    type InputData;
    /// Telemetry produced by one cycle.
    type OutputData;
    /// A report on anything unusual that happened during the cycle.
    type StatusReport;
    /// An error which can occur during cyclic processing.
    type ProcError;

    /// Initialise the module.
    ///
    /// # Inputs
    /// - `init_data`: The data required to initialise the module.
    /// - `session`: The current session.
    ///
    /// # Outputs
    /// - On success `Ok(())`.
    /// - On error an `InitError` instance.
    fn init(&mut self, init_data: Self::InitData, session: &Session)
        -> Result<(), Self::InitError>;

    /// Run one cycle of the module.
    ///
    /// Called exactly once per host loop period.
    ///
    /// # Outputs
    /// - On success a tuple of the output data and status report.
    /// - On error a `ProcError` instance. The module must still have left its
    ///   actuators in a defined state.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>;
}
