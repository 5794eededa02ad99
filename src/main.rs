use std::net::SocketAddr;

use anyhow::Context;
use clap::Parser;
use retirement_planner::api::{Cli, Command, run_cli_simulation, run_http_server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    retirement_planner::logging::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Simulate(args) => {
            let output = run_cli_simulation(&args)?;
            println!("{output}");
        }
        Command::Serve(args) => {
            let addr = SocketAddr::new(args.host, args.port);
            run_http_server(addr)
                .await
                .with_context(|| format!("HTTP server on {addr} failed"))?;
        }
    }

    Ok(())
}
