use clap::Parser;
use linguacard_client::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    linguacard_client::run(Cli::parse()).await
}
