use std::process::ExitCode;

#[cfg(feature = "cli")]
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    match trip_planner::cli::run().await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

#[cfg(not(feature = "cli"))]
fn main() -> ExitCode {
    eprintln!("CLI feature not enabled. Build with --features cli");
    ExitCode::FAILURE
}
