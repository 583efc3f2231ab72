//! subsync binary entry point.

use std::process::ExitCode;

fn main() -> ExitCode {
    match subsync::cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            subsync::ui::output::error(format!("{:#}", err));
            ExitCode::FAILURE
        }
    }
}
