mod cli;
mod infra;
mod render;
mod routes;
mod server;

use erw_sites::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
