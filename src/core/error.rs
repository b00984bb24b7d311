use thiserror::Error;

use crate::core::types::{ConditionId, ItemId};

#[derive(Error, Debug)]
pub enum OutfitterError {
    #[error("Item definition not found: {0}")]
    UnknownItem(ItemId),

    #[error("Condition definition not found: {0}")]
    UnknownCondition(ConditionId),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, OutfitterError>;
