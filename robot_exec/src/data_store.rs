//! # Data Store

use hw_if::op::OpInput;
use log::{info, warn};

use crate::arm_ctrl::{self, ArmCtrl};

// ---------------------------------------------------------------------------
// ENUMS
// ---------------------------------------------------------------------------

/// Gives the reason the robot has been put into safe mode
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum SafeModeCause {
    /// ArmCtrl reported a processing error
    ArmCtrlFault,

    /// The operator input (script or autonomous routine) has finished
    EndOfInput,

    /// Too many consecutive cycles overran their period
    CycleOverruns,
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Global data store for the executable.
pub struct DataStore {
    // Cycle management
    /// Number of cycles already executed
    pub num_cycles: u128,

    /// True if this cycle falls on a 1Hz boundary
    pub is_1_hz_cycle: bool,

    // Safe mode variables
    /// Determines if the robot is in safe mode.
    pub safe: bool,

    /// Gives the reason for the robot being in safe mode.
    pub safe_cause: Option<SafeModeCause>,

    // Operator input
    /// The operator input held from the script.
    pub op_input: OpInput,

    // ArmCtrl
    pub arm_ctrl: ArmCtrl,
    pub arm_ctrl_input: arm_ctrl::InputData,
    pub arm_ctrl_output: Option<arm_ctrl::ArmTm>,
    pub arm_ctrl_status_rpt: arm_ctrl::StatusReport,

    // Monitoring Counters
    /// Number of consecutive cycle overruns
    pub num_consec_cycle_overruns: u64,
}

// ---------------------------------------------------------------------------
// IMPLS
// ---------------------------------------------------------------------------

impl DataStore {
    /// Create a new store around the arm controller.
    pub fn new(arm_ctrl: ArmCtrl) -> Self {
        Self {
            num_cycles: 0,
            is_1_hz_cycle: false,
            safe: false,
            safe_cause: None,
            op_input: OpInput::default(),
            arm_ctrl,
            arm_ctrl_input: arm_ctrl::InputData::default(),
            arm_ctrl_output: None,
            arm_ctrl_status_rpt: arm_ctrl::StatusReport::default(),
            num_consec_cycle_overruns: 0,
        }
    }

    /// Puts the robot into safe mode with the given cause.
    pub fn make_safe(&mut self, cause: SafeModeCause) {
        if !self.safe {
            warn!("Make safe requested, cause: {:?}", cause);
            self.safe = true;
            self.safe_cause = Some(cause);

            self.arm_ctrl.make_safe();
        }
    }

    /// Attempts to disable the safe mode by clearing the given cause.
    ///
    /// Returns `Ok(())` if this cause was cleared and safe mode was disabled, or `Err(())`
    /// otherwise. To remove safe mode the provided cause must match the initial reason for safe
    /// mode being enabled.
    ///
    /// If safe mode was not enabled `Ok(())` is returned
    pub fn make_unsafe(&mut self, cause: SafeModeCause) -> Result<(), ()> {
        if !self.safe {
            return Ok(());
        }

        match self.safe_cause {
            Some(root_cause) if root_cause == cause => {
                self.safe = false;
                self.safe_cause = None;
                info!("Make unsafe requested, root cause match, safe mode disabled");
                Ok(())
            }
            Some(_) => Err(()),
            None => Ok(()),
        }
    }

    /// Perform actions required at the start of a cycle.
    ///
    /// Clears those items that need clearing at the start of a cycle, and sets the 1Hz cycle flag.
    pub fn cycle_start(&mut self, cycle_frequency_hz: f64) {
        let cycles_per_s = (cycle_frequency_hz.round() as u128).max(1);
        self.is_1_hz_cycle = self.num_cycles % cycles_per_s == 0;

        self.arm_ctrl_input = arm_ctrl::InputData::default();
        self.arm_ctrl_output = None;
        self.arm_ctrl_status_rpt = arm_ctrl::StatusReport::default();
    }

    /// Record a cycle that finished within its period.
    ///
    /// Clears safe mode if it was caused by overruns.
    pub fn cycle_on_time(&mut self) {
        self.num_consec_cycle_overruns = 0;
        self.make_unsafe(SafeModeCause::CycleOverruns).ok();
    }

    /// Record a cycle that overran its period, making the robot safe once
    /// `max_consec` overruns have happened in a row.
    pub fn cycle_overrun(&mut self, max_consec: u64) {
        self.num_consec_cycle_overruns += 1;

        if self.num_consec_cycle_overruns >= max_consec {
            self.make_safe(SafeModeCause::CycleOverruns);
        }
    }

    /// Perform actions required at the end of a cycle.
    pub fn cycle_end(&mut self) {
        self.num_cycles += 1;
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        arm_ctrl::{ArmCmd, PivotMode},
        sim::{SimArm, SimParams},
    };

    fn make_ds() -> (SimArm, DataStore) {
        let sim = SimArm::new(SimParams::default());
        let ds = DataStore::new(ArmCtrl::new(sim.io()));
        (sim, ds)
    }

    #[test]
    fn test_safe_mode() {
        let (sim, mut ds) = make_ds();
        sim.set_position(30.0);

        ds.arm_ctrl.exec(&ArmCmd::MoveToTop);
        ds.arm_ctrl.update().unwrap();
        assert!(sim.pivot_duty() < 0.0);

        ds.make_safe(SafeModeCause::ArmCtrlFault);
        assert!(ds.safe);
        assert_eq!(sim.pivot_duty(), 0.0);
        assert_eq!(ds.arm_ctrl.pivot_mode(), PivotMode::Free);

        // Only the original cause clears it
        assert_eq!(ds.make_unsafe(SafeModeCause::EndOfInput), Err(()));
        assert!(ds.safe);
        assert_eq!(ds.make_unsafe(SafeModeCause::ArmCtrlFault), Ok(()));
        assert!(!ds.safe);
        assert_eq!(ds.make_unsafe(SafeModeCause::ArmCtrlFault), Ok(()));
    }

    #[test]
    fn test_1_hz_cycle() {
        let (_sim, mut ds) = make_ds();
        let mut flags = Vec::new();

        for _ in 0..101 {
            ds.cycle_start(50.0);
            flags.push(ds.is_1_hz_cycle);
            ds.cycle_end();
        }

        let hits: Vec<usize> = flags
            .iter()
            .enumerate()
            .filter(|(_, f)| **f)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(hits, vec![0, 50, 100]);
    }

    #[test]
    fn test_cycle_overruns() {
        let (sim, mut ds) = make_ds();
        sim.set_position(30.0);
        ds.arm_ctrl.exec(&ArmCmd::MoveToBottom);
        ds.arm_ctrl.update().unwrap();
        assert!(sim.pivot_duty() > 0.0);

        // An on-time cycle resets the count
        ds.cycle_overrun(3);
        ds.cycle_overrun(3);
        ds.cycle_on_time();
        assert_eq!(ds.num_consec_cycle_overruns, 0);
        ds.cycle_overrun(3);
        ds.cycle_overrun(3);
        assert!(!ds.safe);

        ds.cycle_overrun(3);
        assert!(ds.safe);
        assert_eq!(ds.safe_cause, Some(SafeModeCause::CycleOverruns));
        assert_eq!(sim.pivot_duty(), 0.0);

        // A fault clear doesn't lift it, catching up does
        assert_eq!(ds.make_unsafe(SafeModeCause::ArmCtrlFault), Err(()));
        ds.cycle_on_time();
        assert!(!ds.safe);
        assert_eq!(ds.num_consec_cycle_overruns, 0);
    }
}
