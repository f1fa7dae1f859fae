use clap::{Args, Subcommand};

mod add;

/// Manage commodity rates
#[derive(Debug, Args)]
pub(crate) struct RateCommand {
    #[command(subcommand)]
    command: RateSubcommand,
}

#[derive(Debug, Subcommand)]
enum RateSubcommand {
    /// Record a new rate snapshot
    Add(add::AddRateArgs),
}

pub(crate) async fn run(command: RateCommand) -> Result<(), String> {
    match command.command {
        RateSubcommand::Add(args) => add::run(args).await,
    }
}
