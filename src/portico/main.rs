//! The `portico` binary is intentionally thin: the CLI lives in `cli/` and
//! this file only invokes `cli::run()` and handles process termination.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
