mod cli;
mod commands;
mod demo;
mod infra;

use billed::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
