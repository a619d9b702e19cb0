//! # Operator input script interpreter
//!
//! Scripts replay co-pilot gamepad input against the simulated robot. Each
//! entry has the form
//!
//! ```text
//! 2.5: {"lb": true};
//! ```
//!
//! meaning "from 2.5 s onwards the gamepad looks like this". The input is
//! held by the caller until the next entry becomes due.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use regex::RegexBuilder;
use std::collections::VecDeque;
use std::fs;
use std::path::Path;
use thiserror::Error;

// Internal
use hw_if::op::{OpInput, OpInputParseError};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// An operator input which is scripted to occur at a specific time.
struct Entry {
    /// The time the input takes effect
    exec_time_s: f64,

    /// The gamepad snapshot
    input: OpInput,
}

/// A script interpreter.
///
/// After initialising with the path to the script use `.get_pending` each
/// cycle to find out whether the held operator input has changed.
pub struct ScriptInterpreter {
    entries: VecDeque<Entry>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Could not find the script at {0}")]
    ScriptNotFound(String),

    #[error("Could not load the script: {0}")]
    ScriptLoadError(std::io::Error),

    #[error("The script is empty (or is so bad it can't be read)")]
    ScriptEmpty,

    #[error(
        "Script contains an invalid timestamp: {0}. \
        Should be a float (like 1.0)"
    )]
    InvalidTimestamp(String),

    #[error("Could not build the script pattern: {0}")]
    BadPattern(regex::Error),

    #[error("Script entry at {0} s is earlier than the entry before it")]
    OutOfOrder(f64),

    #[error("Script contains invalid operator input at {0} s: {1}")]
    InvalidInput(f64, OpInputParseError),
}

/// Result of polling the script.
#[derive(Debug, PartialEq)]
pub enum PendingInput {
    /// Nothing new is due, keep holding the previous input.
    None,

    /// A new input is now in effect.
    Some(OpInput),

    /// All entries have been consumed.
    EndOfScript,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ScriptInterpreter {
    /// Create a new interpreter from the given script path.
    pub fn new<P: AsRef<Path>>(script_path: P) -> Result<Self, ScriptError> {
        let path = script_path.as_ref();

        if !path.exists() {
            return Err(ScriptError::ScriptNotFound(path.display().to_string()));
        }

        let script = fs::read_to_string(path).map_err(ScriptError::ScriptLoadError)?;

        Self::from_script(&script)
    }

    /// Create a new interpreter from the text of a script.
    pub fn from_script(script: &str) -> Result<Self, ScriptError> {
        let mut entries: VecDeque<Entry> = VecDeque::new();

        // Timestamp, colon, JSON payload up to the semicolon.
        let re = RegexBuilder::new(r"^\s*(\d+(\.\d+)?)\s*:\s*([^;]*);")
            .multi_line(true)
            .build()
            .map_err(ScriptError::BadPattern)?;

        for cap in re.captures_iter(script) {
            let (time_str, payload) = match (cap.get(1), cap.get(3)) {
                (Some(t), Some(p)) => (t.as_str(), p.as_str()),
                _ => continue,
            };

            let exec_time_s: f64 = time_str
                .parse()
                .map_err(|e| ScriptError::InvalidTimestamp(format!("{}", e)))?;

            if let Some(prev) = entries.back() {
                if exec_time_s < prev.exec_time_s {
                    return Err(ScriptError::OutOfOrder(exec_time_s));
                }
            }

            let input = OpInput::from_json(payload)
                .map_err(|e| ScriptError::InvalidInput(exec_time_s, e))?;

            entries.push_back(Entry { exec_time_s, input });
        }

        if entries.is_empty() {
            return Err(ScriptError::ScriptEmpty);
        }

        Ok(ScriptInterpreter { entries })
    }

    /// Poll the script at the given time.
    ///
    /// If several entries became due since the last poll only the newest is
    /// returned, as it supersedes the others.
    pub fn get_pending(&mut self, current_time_s: f64) -> PendingInput {
        if self.entries.is_empty() {
            return PendingInput::EndOfScript;
        }

        let mut newest = None;

        while let Some(entry) = self.entries.front() {
            if entry.exec_time_s > current_time_s {
                break;
            }
            newest = self.entries.pop_front().map(|e| e.input);
        }

        match newest {
            Some(i) => PendingInput::Some(i),
            None => PendingInput::None,
        }
    }

    /// Get the number of entries remaining in the script
    pub fn get_num_entries(&self) -> usize {
        self.entries.len()
    }

    /// Get the length of the script in seconds
    pub fn get_duration(&self) -> f64 {
        match self.entries.back() {
            Some(e) => e.exec_time_s,
            None => 0f64,
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    const SCRIPT: &str = r#"
        0.0: {};
        1.0: {"lb": true};
        1.5: {"lb": true, "a": true};
        4.0: {};
    "#;

    #[test]
    fn test_get_pending() {
        let mut si = ScriptInterpreter::from_script(SCRIPT).unwrap();
        assert_eq!(si.get_num_entries(), 4);
        assert_eq!(si.get_duration(), 4.0);

        assert_eq!(si.get_pending(0.0), PendingInput::Some(OpInput::default()));
        assert_eq!(si.get_pending(0.5), PendingInput::None);

        // Two entries due at once, only the newest is reported
        match si.get_pending(2.0) {
            PendingInput::Some(i) => assert!(i.lb && i.a),
            p => panic!("Expected new input, got {:?}", p),
        }

        assert_eq!(si.get_pending(4.0), PendingInput::Some(OpInput::default()));
        assert_eq!(si.get_pending(4.1), PendingInput::EndOfScript);
    }

    #[test]
    fn test_script_errors() {
        assert!(matches!(
            ScriptInterpreter::from_script("nothing to see here"),
            Err(ScriptError::ScriptEmpty)
        ));
        assert!(matches!(
            ScriptInterpreter::from_script("2.0: {};\n1.0: {};"),
            Err(ScriptError::OutOfOrder(_))
        ));
        assert!(matches!(
            ScriptInterpreter::from_script("1.0: {\"left_y\": 3.0};"),
            Err(ScriptError::InvalidInput(_, _))
        ));
        assert!(matches!(
            ScriptInterpreter::new("/definitely/not/a/script.ais"),
            Err(ScriptError::ScriptNotFound(_))
        ));
    }
}
