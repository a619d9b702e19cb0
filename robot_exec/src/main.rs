//! Main robot-side executable entry point.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Initialise all modules
//!     - Main loop:
//!         - Operator input acquisition, from a script or the autonomous
//!           routine
//!         - Arm control processing
//!         - Simulated arm step
//!         - Telemetry
//!
//! # Usage
//!
//! ```text
//! robot_exec [SCRIPT]
//! ```
//!
//! With a script the co-pilot gamepad input is replayed from it, otherwise
//! the autonomous arm routine runs for the configured period.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{
    eyre::{eyre, WrapErr},
    Report,
};
use log::{debug, error, info, warn};
use std::env;
use std::thread;
use std::time::{Duration, Instant};

// Internal
use hw_if::dev::Timer;
use robot_lib::{
    arm_ctrl::ArmCtrl,
    auton,
    data_store::{DataStore, SafeModeCause},
    params::ExecParams,
    sim::SimArm,
    teleop,
};
use util::{
    logger::{logger_init, LevelFilter},
    module::State,
    script_interpreter::{PendingInput, ScriptInterpreter},
    session::Session,
    time::Stopwatch,
};

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Sources of arm commands.
enum InputSource {
    /// Co-pilot input replayed from a script
    Script(ScriptInterpreter),

    /// The autonomous arm routine
    Auton,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    color_eyre::install()?;

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session =
        Session::new("robot_exec", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Debug, &session).wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Aerial Assist Robot Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let exec_params: ExecParams =
        util::params::load("robot_exec.toml").wrap_err("Could not load exec params")?;

    exec_params
        .hw
        .validate()
        .wrap_err("Invalid hardware configuration")?;

    info!("Exec parameters loaded");
    debug!("Pin map: {:#?}", exec_params.hw);

    // ---- INITIALISE INPUT SOURCE ----

    // Collect all arguments
    let args: Vec<String> = env::args().collect();

    debug!("CLI arguments: {:?}", args);

    let mut input_source = match args.len() {
        // If we have a single argument use it as the script path
        2 => {
            info!("Loading script from \"{}\"", &args[1]);

            let si = ScriptInterpreter::new(&args[1]).wrap_err("Failed to load script")?;

            info!(
                "Loaded script lasts {:.02} s and contains {} inputs\n",
                si.get_duration(),
                si.get_num_entries()
            );

            InputSource::Script(si)
        }
        1 => {
            info!(
                "No script provided, running the autonomous routine for {:.02} s\n",
                exec_params.auton_duration_s
            );
            InputSource::Auton
        }
        n => {
            return Err(eyre!(
                "Expected either zero or one argument, found {}",
                n - 1
            ))
        }
    };

    // ---- INITIALISE MODULES ----

    info!("Initialising modules...");

    let sim = SimArm::new(exec_params.sim.clone());

    let mut ds = DataStore::new(ArmCtrl::new(sim.io()));

    ds.arm_ctrl
        .init("arm_ctrl.toml", &session)
        .wrap_err("Failed to initialise ArmCtrl")?;
    info!("ArmCtrl init complete");

    info!("Module initialisation complete\n");

    let cycle_period_s = ds.arm_ctrl.params().cycle_period_s;
    let cycle_frequency_hz = 1.0 / cycle_period_s;

    // ---- MAIN LOOP ----

    info!("Beginning main loop\n");

    let mut match_clock = Stopwatch::new();
    match_clock.start();

    loop {
        // Get cycle start time
        let cycle_start_instant = Instant::now();

        // Clear items that need wiping at the start of the cycle
        ds.cycle_start(cycle_frequency_hz);

        let match_time_s = match_clock.get();

        // ---- OPERATOR INPUT ----

        match input_source {
            InputSource::Script(ref mut si) => match si.get_pending(match_time_s) {
                PendingInput::None => (),
                PendingInput::Some(op_input) => {
                    debug!("New operator input: {:?}", op_input);
                    ds.op_input = op_input;
                }
                // Exit if end of script reached
                PendingInput::EndOfScript => {
                    info!("End of input script reached, stopping");
                    ds.make_safe(SafeModeCause::EndOfInput);
                    break;
                }
            },
            InputSource::Auton => {
                if match_time_s >= exec_params.auton_duration_s {
                    info!("Autonomous period over, stopping");
                    ds.make_safe(SafeModeCause::EndOfInput);
                    break;
                }
            }
        }

        // Commands are withheld while safe
        if !ds.safe {
            ds.arm_ctrl_input.cmds = match input_source {
                InputSource::Script(_) => teleop::arm_cmds(&ds.op_input),
                InputSource::Auton => auton::arm_cmds(match_time_s),
            };
        }

        // ---- CONTROL ALGORITHM PROCESSING ----

        match ds.arm_ctrl.proc(&ds.arm_ctrl_input) {
            Ok((o, r)) => {
                ds.arm_ctrl_output = Some(o);
                ds.arm_ctrl_status_rpt = r;

                ds.make_unsafe(SafeModeCause::ArmCtrlFault).ok();
            }
            Err(e) => {
                error!("Error during ArmCtrl processing: {}", e);
                ds.make_safe(SafeModeCause::ArmCtrlFault);
            }
        };

        if ds.arm_ctrl_status_rpt.load_transition_limit_hit {
            warn!("ArmCtrl load sequence was restarted");
        }

        // ---- SIMULATION ----

        sim.step(cycle_period_s);

        // ---- TELEMETRY ----

        if ds.is_1_hz_cycle {
            if let Some(ref tm) = ds.arm_ctrl_output {
                match serde_json::to_string(tm) {
                    Ok(s) => info!("ArmTm: {}", s),
                    Err(e) => warn!("Could not serialise ArmTm: {}", e),
                }
            }
        }

        // ---- CYCLE MANAGEMENT ----

        let cycle_dur = Instant::now() - cycle_start_instant;

        // Get sleep duration
        match Duration::from_secs_f64(cycle_period_s).checked_sub(cycle_dur) {
            Some(d) => {
                ds.cycle_on_time();
                thread::sleep(d);
            }
            None => {
                warn!(
                    "Cycle overran by {:.06} s",
                    cycle_dur.as_secs_f64() - cycle_period_s
                );
                ds.cycle_overrun(exec_params.max_consec_cycle_overruns);
            }
        }

        ds.cycle_end();
    }

    // ---- SHUTDOWN ----

    info!(
        "End of execution after {} cycles, ball captured: {}",
        ds.num_cycles,
        ds.arm_ctrl.ball_captured()
    );

    Ok(())
}
