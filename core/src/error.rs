use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid configuration: size, count or reveal delay out of range")]
    InvalidConfiguration,
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Pattern does not match the configured size and count")]
    PatternMismatch,
}

pub type Result<T> = core::result::Result<T, GameError>;
