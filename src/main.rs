//! Release Helper - publishes a tagged GitHub release from CI.
//!
//! Exit status reflects the release outcome only; notification problems are
//! logged and never change it.

use release_helper::cli;
use std::process;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match cli::run().await {
        Ok(exit_code) => {
            process::exit(exit_code);
        }
        Err(e) => {
            log::error!("Fatal error: {e}");

            let suggestions = e.recovery_suggestions();
            if !suggestions.is_empty() {
                log::error!("Recovery suggestions:");
                for suggestion in suggestions {
                    log::error!("  {suggestion}");
                }
            }

            process::exit(1);
        }
    }
}
