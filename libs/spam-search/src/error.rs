//! Error types for the spam search

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid sort: {0}")]
    InvalidSort(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
