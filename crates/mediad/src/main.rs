//! Entry point for the `mediad` media daemon.
//!
//! Delegates to [`mediad::run_daemon`]. Errors raised before telemetry is
//! installed would otherwise be lost, so they are also written to stderr.

use std::io::{self, Write};
use std::process::ExitCode;

fn main() -> ExitCode {
    match mediad::run_daemon() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(target: "mediad::process", error = %error, "daemon exited with an error");
            let _ = writeln!(io::stderr().lock(), "mediad: {error}");
            ExitCode::FAILURE
        }
    }
}
