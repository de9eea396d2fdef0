use thiserror::Error;

/// Failures the room sync client can run into.
///
/// Only `MissingField` and `EmptyRoom` stop the client from starting; every
/// other variant is logged where it happens and the offending frame or action
/// is dropped.
#[derive(Error, Debug)]
pub enum SyncError {
    /// A required startup input (room identity, role) was not supplied
    #[error("required field `{0}` is missing")]
    MissingField(&'static str),

    /// The room identity was supplied but is blank
    #[error("room identity must not be empty")]
    EmptyRoom,

    /// The role field is not an integer
    #[error("invalid participant role: {0}")]
    InvalidRole(String),

    /// Attempted to send while the transport is closed
    #[error("transport is not open")]
    NotOpen,

    /// The transport refused the frame
    #[error("send failed: {0}")]
    Send(String),

    /// JSON serialization/deserialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A playback time that is not a finite, non-negative number
    #[error("invalid playback time: {0}")]
    InvalidTime(String),

    /// An action name outside play/pause/seek
    #[error("unknown video action: {0}")]
    UnknownAction(String),

    /// The player adapter rejected a call
    #[error("player error: {0}")]
    Player(String),
}

/// Convenience type alias for `Result<T, SyncError>`.
pub type Result<T> = std::result::Result<T, SyncError>;
