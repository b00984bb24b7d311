//! Core types and errors shared across the crate

pub mod error;
pub mod types;

pub use error::{OutfitterError, Result};
pub use types::{
    BodyPartId, ConditionId, FactionId, ItemId, ItemQuality, MaterialId, PoolTag, TemplateId,
};
