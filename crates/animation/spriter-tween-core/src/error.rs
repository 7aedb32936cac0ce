//! Error types for entity building, playback and tweening.

use thiserror::Error;

/// Configuration errors surfaced by the runtime.
///
/// Every variant describes an invalid call site or malformed rig rather than a
/// transient condition, so callers should fix their setup instead of retrying.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SpriterError {
    /// The two players handed to a tweener animate different entity instances.
    #[error("players have to hold the same entity (got '{first}' and '{second}')")]
    MismatchedSkeleton { first: String, second: String },

    /// The configured base bone does not exist on the primary player's entity.
    #[error("a bone with name \"{name}\" does not exist")]
    BoneNotFound { name: String },

    /// No animation matches the given index or name.
    #[error("animation not found: {key}")]
    AnimationNotFound { key: String },

    /// Entity data failed validation.
    #[error("invalid entity '{entity}': {reason}")]
    InvalidEntity { entity: String, reason: String },

    /// The operation is not supported by this player type.
    #[error("{operation} is not supported by a player tweener")]
    Unsupported { operation: &'static str },
}

impl SpriterError {
    pub(crate) fn invalid_entity(entity: &str, reason: impl Into<String>) -> Self {
        SpriterError::InvalidEntity {
            entity: entity.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result alias used across the crate.
pub type Result<T> = core::result::Result<T, SpriterError>;
