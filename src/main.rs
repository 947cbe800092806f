//! detype entry point.

fn main() {
    if let Err(e) = detype::cli::run_cli() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
