//! Hydrangea Linux installer builder.
//!
//! This binary builds the `.deb` installer for amd64 or arm64 and exits with
//! the status of the first failing stage.

use env_logger::Env;
use hydrangea_bundler_deb::cli;
use std::process;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize logging
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    // Run CLI and get exit code
    let exit_code = match cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    };

    process::exit(exit_code);
}
