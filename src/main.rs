//! loopsmith - loop templates for blog post listings

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = loopsmith::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
