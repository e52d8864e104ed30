//! Core library entry for the `school` CLI.
//!
//! The heart of the crate is the to-do [`board`] engine with optimistic
//! updates and the weighted [`grades`] aggregation. Everything remote goes
//! through the [`ports::SchoolBackend`] trait so that commands run the same
//! against the live service, a recording proxy, or a replayed cassette.

pub mod adapters;
pub mod announcements;
pub mod board;
pub mod cassette;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod courses;
pub mod forms;
pub mod grades;
pub mod ports;
pub mod questions;
pub mod session;
pub mod tags;
pub mod users;

use clap::error::ErrorKind;
use clap::Parser;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
/// Help and version requests print to stdout and succeed.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match cli::Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            print!("{err}");
            return Ok(());
        }
        Err(err) => return Err(err.to_string()),
    };
    commands::dispatch(&cli.command)
}

#[cfg(test)]
mod tests {
    use super::run;

    #[test]
    fn run_errors_on_unknown_subcommand() {
        let result = run(["school", "unknown"]);
        assert!(result.is_err());
    }

    #[test]
    fn help_is_not_an_error() {
        assert!(run(["school", "--help"]).is_ok());
        assert!(run(["school", "todo", "--help"]).is_ok());
    }

    #[test]
    fn run_errors_on_missing_arguments() {
        let err = run(["school", "todo", "move", "t1"]).unwrap_err();
        assert!(err.contains("LANE") || err.contains("lane"));
    }
}
