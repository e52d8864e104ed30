//! Binary entrypoint for the `school` CLI.

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    init_tracing();

    // Recording and replay are handled in commands::dispatch via
    // SCHOOL_RECORD=<dir> and SCHOOL_REPLAY=<file>.
    match school_manager::run(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so command output stays pipeable. `SCHOOL_LOG` takes
/// an `EnvFilter` directive and defaults to `warn`.
fn init_tracing() {
    let filter = EnvFilter::try_from_env("SCHOOL_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}
