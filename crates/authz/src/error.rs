// Error types for token and password operations

use folio_http::AppError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("missing bearer token")]
    MissingToken,

    #[error("invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    #[error("token expired")]
    TokenExpired,

    #[error("configuration error: {0}")]
    Config(String),

    #[error("password hashing failed: {0}")]
    PasswordHash(String),

    #[error("password verification failed: {0}")]
    PasswordVerify(String),
}

pub type Result<T> = std::result::Result<T, AuthError>;

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingToken | AuthError::InvalidToken(_) | AuthError::TokenExpired => {
                AppError::unauthorized("Could not validate user.")
            }
            other => AppError::Internal(anyhow::Error::new(other)),
        }
    }
}
