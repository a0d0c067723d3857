mod cli;
mod commands;
mod infra;
mod render;

use haitaton_tormays::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
