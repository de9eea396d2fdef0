use clap::Parser;

use crate::constants::{DEFAULT_HOST, VIEWER_ROLE};
use crate::error::{Result, SyncError};

/// Command-line surface of the watch-party client
#[derive(Parser, Debug, Clone)]
#[command(name = "watchparty", version, about = "Synchronized video watch-party client")]
pub struct CliArgs {
    /// Room to join
    #[arg(long, env = "WATCHPARTY_ROOM")]
    pub room: Option<String>,

    /// Participant role tag (1 = viewer, read-only)
    #[arg(long, env = "WATCHPARTY_ROLE")]
    pub role: Option<String>,

    /// Server host the room endpoint is derived from
    #[arg(long, env = "WATCHPARTY_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// Full ws:// or wss:// URL used instead of the derived room endpoint
    #[arg(long, env = "WATCHPARTY_ENDPOINT")]
    pub endpoint: Option<String>,
}

/// Immutable identity of the room, never empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomId(String);

impl RoomId {
    pub fn new(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Err(SyncError::EmptyRoom);
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Role tag read once at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParticipantRole(i64);

impl ParticipantRole {
    pub fn new(tag: i64) -> Self {
        Self(tag)
    }

    pub fn parse(raw: &str) -> Result<Self> {
        raw.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|_| SyncError::InvalidRole(raw.to_string()))
    }

    pub fn is_viewer(&self) -> bool {
        self.0 == VIEWER_ROLE
    }

    pub fn tag(&self) -> i64 {
        self.0
    }
}

/// Validated startup configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub room: RoomId,
    pub role: ParticipantRole,
    pub host: String,
    pub endpoint: Option<String>,
}

impl ClientConfig {
    /// Validate the raw inputs. Any error here means the client must not start.
    pub fn from_args(args: CliArgs) -> Result<Self> {
        let room = args.room.ok_or(SyncError::MissingField("room"))?;
        let role = args.role.ok_or(SyncError::MissingField("role"))?;

        Ok(Self {
            room: RoomId::new(&room)?,
            role: ParticipantRole::parse(&role)?,
            host: args.host,
            endpoint: args.endpoint.filter(|e| !e.trim().is_empty()),
        })
    }
}
