use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid position key {0:?}")]
    InvalidPositionKey(String),
    #[error("Mine probabilities must satisfy 0 <= min <= max <= 1 and the distance cap must be positive")]
    InvalidCurve,
}

pub type Result<T> = core::result::Result<T, GameError>;
