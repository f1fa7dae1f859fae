use clap::{Parser, Subcommand};

mod migrate;
mod rate;

#[derive(Debug, Parser)]
#[command(name = "karat-app", about = "Karat CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate(migrate::MigrateArgs),
    Rate(rate::RateCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Migrate(args) => migrate::run(args).await,
            Commands::Rate(command) => rate::run(command).await,
        }
    }
}
