use clap::Parser;

use stampkit::cli::{self, Cli};
use stampkit::init_logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging()?;

    let cli = Cli::parse();
    cli::run(cli).await
}
