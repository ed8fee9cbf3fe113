use std::io;

use clap::Parser;
use todo_cli::{Args, Shell, UreqTransport};
use todo_core::{App, FileTokenStore};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let token_path = args.token_path()?;
    info!(api_url = %args.api_url, token_file = %token_path.display(), "starting");

    let mut app = App::new(&args.api_url, UreqTransport::new(), FileTokenStore::new(token_path));
    app.restore();

    let stdin = io::stdin();
    let mut shell = Shell::new(app, stdin.lock(), io::stdout());
    shell.run()?;
    Ok(())
}
