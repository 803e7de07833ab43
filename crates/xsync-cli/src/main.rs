//! xsync - estimate the time offset between two audio recordings
//!
//! ## Usage
//!
//! ```bash
//! xsync stereo.wav             # channel 0 vs channel 1 of one file
//! xsync cam.m4a recorder.flac  # channel 0 of each file
//! xsync a.wav b.wav --json     # machine-readable report
//! ```
//!
//! Set RUST_LOG=debug (or pass -vv) for decoder and resampler detail.

mod cli;
mod output;

use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::Parser;

use cli::Cli;
use xsync_core::ReturnCode;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                let _ = e.print();
                return ExitCode::SUCCESS;
            }
            _ => {
                eprintln!("{}", cli::argument_error_line(&e));
                return ExitCode::from(ReturnCode::ArgumentsInvalid.code());
            }
        },
    };

    // Logs go to stderr; stdout carries only the report
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(cli.log_level()),
    )
    .format_timestamp_millis()
    .init();

    log::debug!("xsync {} starting", env!("CARGO_PKG_VERSION"));

    match cli::run(&cli).and_then(|report| output::render(&report, cli.output_format())) {
        Ok(text) => {
            println!("{}", text);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::from(e.return_code().code())
        }
    }
}
