use clap::Parser;
use re1_processor::cli::{args::Args, commands};
use std::process;

fn main() {
    let args = Args::parse();

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        tokio::select! {
            result = commands::run(args) => result,
            signal = tokio::signal::ctrl_c() => {
                eprintln!("\nReceived CTRL+C, shutting down...");
                let reason = match signal {
                    Ok(()) => "interrupted by user".to_string(),
                    Err(e) => format!("signal handler failed: {}", e),
                };
                Err(re1_processor::Re1Error::Interrupted { reason }.into())
            }
        }
    });

    if let Err(error) = result {
        eprintln!("Error: {:#}", error);
        process::exit(1);
    }
}
