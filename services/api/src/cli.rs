use crate::batch::{run_assignment_preview, run_daily_cron_batch, CronRunArgs, PreviewArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use raydar::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Raydar",
    about = "Run the Raydar lead assignment service and batch jobs from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Scheduled maintenance jobs over a leads/users snapshot
    Cron {
        #[command(subcommand)]
        command: CronCommand,
    },
    /// Auto-assignment utilities over a leads/users snapshot
    Assign {
        #[command(subcommand)]
        command: AssignCommand,
    },
}

#[derive(Subcommand, Debug)]
enum CronCommand {
    /// Run the daily stale-lead pass and print the resulting report
    Daily(CronRunArgs),
}

#[derive(Subcommand, Debug)]
enum AssignCommand {
    /// Preview what an auto-assignment run would do, without committing
    Preview(PreviewArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Cron {
            command: CronCommand::Daily(args),
        } => run_daily_cron_batch(args),
        Command::Assign {
            command: AssignCommand::Preview(args),
        } => run_assignment_preview(args),
    }
}
