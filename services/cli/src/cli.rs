use crate::commands::{run_list, run_submit, ListArgs, SubmitArgs};
use crate::demo::run_demo;
use billed::config::{ApiConfig, AppConfig};
use billed::error::AppError;
use billed::telemetry;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "billed",
    about = "List your expense bills and submit new ones with a receipt",
    version
)]
struct Cli {
    /// Override the configured Billed API base URL
    #[arg(long, global = true)]
    api_url: Option<String>,
    /// Act as this employee (defaults to APP_USER_EMAIL)
    #[arg(long, global = true)]
    email: Option<String>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show submitted bills, newest first (default command)
    List(ListArgs),
    /// Upload a receipt and submit a new bill
    Submit(SubmitArgs),
    /// Walk through listing and submission against an in-memory store
    Demo,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let mut config = AppConfig::load()?;

    if let Some(api_url) = cli.api_url {
        config.api = ApiConfig::new(api_url, config.api.token.take())?;
    }
    if let Some(email) = cli.email {
        config.user.email = Some(email);
    }

    telemetry::init(&config.telemetry)?;

    let command = cli
        .command
        .unwrap_or_else(|| Command::List(ListArgs::default()));

    match command {
        Command::List(args) => run_list(&config, args).await,
        Command::Submit(args) => run_submit(&config, args).await,
        Command::Demo => run_demo(&config).await,
    }
}
