use anyhow::Result;
use clap::Parser;

mod sync;

use self::sync::SyncSubcommand;

#[derive(Debug, Parser)]
#[clap(author, version, about)]
pub struct Cli {
    #[clap(subcommand)]
    pub subcommand: Subcommand,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        self.subcommand.run().await
    }
}

#[derive(Debug, Parser)]
pub enum Subcommand {
    Sync(SyncSubcommand),
}

impl Subcommand {
    pub async fn run(self) -> Result<()> {
        match self {
            Self::Sync(cmd) => cmd.run().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }
}
