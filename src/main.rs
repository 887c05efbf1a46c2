use std::process::ExitCode;

use approvals_seeder::cli::{self, Args};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let result = cli::run(Args::parse()).await;

    for line in &result.output {
        println!("{line}");
    }
    for line in &result.errors {
        eprintln!("{line}");
    }

    ExitCode::from(result.exit_code)
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
