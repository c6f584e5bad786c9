mod batch;
mod cli;
mod infra;
mod routes;
mod server;

pub use infra::AppState;
pub use routes::router;

use raydar::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
