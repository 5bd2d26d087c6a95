#![forbid(unsafe_code)]

use std::process::ExitCode;

fn main() -> ExitCode {
    semlink_cli::main_entry()
}
