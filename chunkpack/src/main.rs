mod application;
mod presentation;

use std::process::ExitCode;

fn main() -> ExitCode {
    match application::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(chunk = ?e.chunk_id(), "{e}");
            eprintln!("error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}
