//! Watch-party room client.
//!
//! Relays chat and playback-control frames for one room over a WebSocket and
//! mirrors the room's playback actions into a local player.

pub mod config;
pub mod constants;
pub mod error;
pub mod player;
pub mod protocol;
pub mod sync;
pub mod transport;
pub mod ui;
pub mod utils;
pub mod youtube;

pub use config::{ClientConfig, ParticipantRole, RoomId};
pub use error::SyncError;
pub use player::{HeadlessPlayer, HeadlessPlayerFactory, PlayerAdapter, PlayerFactory, PlayerState};
pub use protocol::{InboundEvent, VideoAction};
pub use sync::RoomSyncClient;
pub use transport::{Transport, TransportEvent, WsTransport};
