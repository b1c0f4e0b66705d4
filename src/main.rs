use clap::Parser;
use physiodx::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Diagnose(args) => cli::diagnose::run(args).await,
    }
}
