//! Pencil path editing for UFO glyphs, from the command line.
//!
//! Draw it rough, keep it clean.

use bezy_pencil::{core, logging};
use clap::Parser;

fn main() {
    core::platform::init_panic_handling();
    let cli_args = core::cli::CliArgs::parse();

    // Held until exit so buffered log lines reach the file
    let _log_guard = match logging::init_logging(cli_args.verbose, cli_args.log_file) {
        Ok(guard) => guard,
        Err(error) => core::platform::handle_error(error),
    };

    if let Err(error) = core::run_app(cli_args) {
        core::platform::handle_error(error);
    }
}
