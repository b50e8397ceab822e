mod cli;
mod demo;
mod infra;
mod routes;
mod server;

use closet_share::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
