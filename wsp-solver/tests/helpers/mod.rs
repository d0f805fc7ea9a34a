//! Helpers to run the `wsp-solver` binary from integration tests.
#![allow(
    dead_code,
    reason = "is used in integration tests but unable to find a way to silence these warnings"
)]

use std::fs::File;
use std::path::PathBuf;
use std::process::Command;
use std::process::Stdio;
use std::time::Duration;

use wait_timeout::ChildExt;

const TEST_TIMEOUT: Duration = Duration::from_secs(60);

/// What a run of the solver produced.
#[derive(Debug)]
pub(crate) struct SolverOutput {
    pub(crate) success: bool,
    pub(crate) stdout: String,
    pub(crate) stderr: String,
}

pub(crate) fn instance_path(file_name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("instances")
        .join(file_name)
}

/// A path in the scratch directory of the integration tests.
pub(crate) fn scratch_path(file_name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join(file_name)
}

/// Runs the solver with `args`; `name` must be unique per test to keep the captured output
/// apart.
pub(crate) fn run_solver<I, S>(name: &str, args: I) -> SolverOutput
where
    I: IntoIterator<Item = S>,
    S: AsRef<std::ffi::OsStr>,
{
    let solver = PathBuf::from(env!("CARGO_BIN_EXE_wsp-solver"));

    let log_file_path = scratch_path(&format!("{name}.log"));
    let err_file_path = scratch_path(&format!("{name}.err"));

    let mut child = Command::new(solver)
        .args(args)
        .stdout(File::create(&log_file_path).expect("Failed to create log file."))
        .stderr(File::create(&err_file_path).expect("Failed to create error file."))
        .stdin(Stdio::null())
        .spawn()
        .expect("Failed to run solver.");

    let status = match child.wait_timeout(TEST_TIMEOUT) {
        Ok(None) => panic!("solver took more than {} seconds", TEST_TIMEOUT.as_secs()),
        Ok(Some(status)) => status,
        Err(e) => panic!("error starting solver: {e}"),
    };

    let output = SolverOutput {
        success: status.success(),
        stdout: std::fs::read_to_string(&log_file_path).expect("Failed to read log file."),
        stderr: std::fs::read_to_string(&err_file_path).expect("Failed to read error file."),
    };

    std::fs::remove_file(log_file_path).expect("Failed to remove log file.");
    std::fs::remove_file(err_file_path).expect("Failed to remove error file.");

    output
}
