/// Host used when neither `--host` nor `WATCHPARTY_HOST` is given
pub const DEFAULT_HOST: &str = "localhost:8000";

/// Path segments in front of the room identity in the socket endpoint
pub const ROOM_PATH_SEGMENTS: [&str; 2] = ["ws", "room"];

/// Role tag of read-only participants
pub const VIEWER_ROLE: i64 = 1;

/// Offset applied by the seek-forward and seek-back controls (seconds)
pub const SEEK_STEP_SECS: f64 = 10.0;

/// Current application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
