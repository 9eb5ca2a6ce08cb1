//! Единый тип ошибок публичного API.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VeloError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML error: {0}")]
    Xml(String),

    #[error("Parse error: {0}")]
    Parse(String),

    /// Ссылка на несуществующую сущность: `owner` - кто ссылается (например, `booking k1`).
    #[error("{owner} references unknown {kind} '{missing}'")]
    Reference {
        owner: String,
        kind: &'static str,
        missing: String,
    },

    #[error("Invalid window: {0}")]
    InvalidWindow(String),

    #[error("Data invariant violated: {0}")]
    DataInvariant(String),
}

pub type Result<T> = std::result::Result<T, VeloError>;
