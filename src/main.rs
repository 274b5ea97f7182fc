//! `ws-stdio` - bridge line-oriented stdio to a WebSocket server.
//!
//! Each stdin line becomes one text message; each text message received is
//! printed as one stdout line. Diagnostics go to stderr, filtered by
//! `RUST_LOG` (default `warn`).

use std::process::ExitCode;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use ws_stdio_bridge::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Failed to start async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    let result = runtime.block_on(async { cli.into_bridge()?.run().await });

    // A stdin read may still be parked on the blocking pool.
    runtime.shutdown_background();

    match result {
        Ok(end) => {
            debug!(ended_by = ?end.ended_by, state = ?end.state, "Exiting");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
