use crate::types::{Day, SupplyKind, UpgradeTrack};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Command rejected: {0}")]
    Rejected(#[from] Rejection),

    #[error("Day {day} finished without a summary")]
    DayIncomplete { day: Day },

    #[error("Session '{session_id}' not found")]
    SessionNotFound { session_id: String },

    #[error("Invalid snapshot: {reason}")]
    InvalidSnapshot { reason: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type SimResult<T> = Result<T, SimError>;

/// A player action that failed validation.
/// Rejections are raised before any state mutation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Rejection {
    #[error("price ${price:.2} must be between ${min:.2} and ${max:.2}")]
    PriceOutOfRange { price: f64, min: f64, max: f64 },

    #[error("{field} ratio {value:.2} must be between {min:.2} and {max:.2}")]
    RecipeOutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("cannot buy {quantity} {item}")]
    InvalidQuantity { item: &'static str, quantity: u32 },

    #[error("not enough cash: need ${needed:.2}, have ${available:.2}")]
    InsufficientCash { needed: f64, available: f64 },

    #[error("{} is already at max tier {tier}", .track.name())]
    MaxTierReached { track: UpgradeTrack, tier: usize },
}

impl Rejection {
    pub(crate) fn invalid_quantity(item: SupplyKind, quantity: u32) -> Self {
        Self::InvalidQuantity { item: item.name(), quantity }
    }
}
