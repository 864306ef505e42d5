use clap::Parser;

use doorman::cli::{self, Cli};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Errors land on stderr rather than in the log stream: configuration
    // problems surface before logging is initialized, and the container
    // runtime captures stderr either way. A successful run never returns
    // here at all.
    let e = match cli::execute(cli).await {
        Ok(never) => match never {},
        Err(e) => e,
    };
    eprintln!("doorman: {e}");
    std::process::exit(e.exit_code());
}
