use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::config::{ParticipantRole, RoomId};
use crate::error::{Result, SyncError};
use crate::player::{PlayerAdapter, PlayerFactory};
use crate::protocol::{encode, InboundEvent, OutboundChatEvent, OutboundControlEvent, VideoAction};
use crate::transport::{Transport, TransportEvent};
use crate::ui::{seek_back_target, seek_forward_target, ChatInput, UiCommand};
use crate::utils::format_time;
use crate::youtube::{extract_video_id, is_youtube_url};

/// Bridges user intents and room events to the transport and the player.
///
/// Local controls never touch the player: they only send a control frame.
/// The player changes when the room echoes that frame back, so every
/// participant, the sender included, applies the same action through
/// [`RoomSyncClient::apply_video_action`].
pub struct RoomSyncClient<T: Transport, F: PlayerFactory> {
    room: RoomId,
    role: ParticipantRole,
    transport: T,
    factory: F,
    player: Option<F::Player>,
    chat_input: ChatInput,
    pending_chat: Vec<String>,
}

impl<T: Transport, F: PlayerFactory> RoomSyncClient<T, F> {
    pub fn new(room: RoomId, role: ParticipantRole, transport: T, factory: F) -> Self {
        info!(
            "Room sync client for room {} (role {}, controls {})",
            room.as_str(),
            role.tag(),
            if role.is_viewer() { "disabled" } else { "enabled" }
        );
        Self {
            room,
            role,
            transport,
            factory,
            player: None,
            chat_input: ChatInput::default(),
            pending_chat: Vec::new(),
        }
    }

    pub fn room(&self) -> &RoomId {
        &self.room
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn player(&self) -> Option<&F::Player> {
        self.player.as_ref()
    }

    pub fn chat_input_mut(&mut self) -> &mut ChatInput {
        &mut self.chat_input
    }

    /// Send and playback controls are only wired for non-viewers
    pub fn controls_enabled(&self) -> bool {
        !self.role.is_viewer()
    }

    /// Chat messages received since the last call
    pub fn take_chat(&mut self) -> Vec<String> {
        std::mem::take(&mut self.pending_chat)
    }

    /// Send the chat input's text to the room and clear the input
    pub fn send_chat(&mut self) {
        let message = self.chat_input.value().trim().to_string();
        if message.is_empty() {
            warn!("No message to send");
            return;
        }

        if let Err(e) = self.send_frame(&OutboundChatEvent { message }) {
            error!("Dropping chat message: {}", e);
        }
        self.chat_input.clear();
    }

    pub fn on_transport_event(&mut self, event: TransportEvent) {
        match event {
            TransportEvent::Message(raw) => self.on_inbound_message(&raw),
            TransportEvent::Error(e) => error!("Transport error: {}", e),
            TransportEvent::Closed(reason) => warn!(
                "Connection to room {} closed ({}); not reconnecting",
                self.room.as_str(),
                reason.as_deref().unwrap_or("no reason")
            ),
        }
    }

    pub fn on_inbound_message(&mut self, raw: &str) {
        let event = match InboundEvent::decode(raw) {
            Ok(event) => event,
            Err(e) => {
                warn!("Dropping inbound frame: {}", e);
                return;
            }
        };
        debug!("Inbound event: {:?}", event);

        match event {
            InboundEvent::Chat { message } => self.handle_chat(message),
            InboundEvent::Control(control) => self.apply_video_action(&control.action, control.time),
            InboundEvent::ChatWithControl { message, control } => {
                warn!("Inbound frame carries both a message and an action; applying both");
                self.handle_chat(message);
                self.apply_video_action(&control.action, control.time);
            }
            InboundEvent::Unrecognized => {
                warn!("Inbound frame has neither a message nor an action");
            }
        }
    }

    fn handle_chat(&mut self, message: String) {
        if is_youtube_url(&message) {
            if let Some(video_id) = extract_video_id(&message) {
                self.load_video(&video_id);
            }
        }
        self.pending_chat.push(message);
    }

    /// Load a video, creating the session's player on first use
    fn load_video(&mut self, video_id: &str) {
        match self.player.as_mut() {
            Some(player) => {
                if let Err(e) = player.load(video_id) {
                    error!("Failed to switch to video {}: {}", video_id, e);
                }
            }
            None => match self.factory.create(video_id) {
                Ok(player) => {
                    info!("Player created for video {}", video_id);
                    self.player = Some(player);
                }
                Err(e) => error!("Failed to create player for video {}: {}", video_id, e),
            },
        }
    }

    /// Apply a room-wide playback action to the local player
    pub fn apply_video_action(&mut self, action: &str, time: Option<f64>) {
        let Some(player) = self.player.as_mut() else {
            warn!("Player not ready; ignoring '{}'", action);
            return;
        };

        let state = player.state();
        if !state.accepts_control() {
            warn!("Player is {}; ignoring '{}'", state.as_str(), action);
            return;
        }

        if let Some(t) = time {
            if !t.is_finite() {
                error!("{}", SyncError::InvalidTime(t.to_string()));
                return;
            }
        }

        let action = match action.parse::<VideoAction>() {
            Ok(action) => action,
            Err(e) => {
                warn!("{}", e);
                return;
            }
        };

        let result = match (action, time) {
            (VideoAction::Play, _) => player.play(),
            (VideoAction::Pause, _) => player.pause(),
            (VideoAction::Seek, Some(t)) => player.seek(t),
            (VideoAction::Seek, None) => {
                warn!("Seek without a time; ignoring");
                return;
            }
        };

        if let Err(e) = result {
            error!("{}", SyncError::Player(format!("{action} failed: {e}")));
        }
    }

    /// Broadcast a playback action to the room. Never fails loudly: a closed
    /// transport or a bad time drops the action with a logged error.
    pub fn send_control_action(&self, action: VideoAction, time: Option<f64>) {
        if let Err(e) = self.try_send_control(action, time) {
            error!("Dropping '{}' control: {}", action, e);
        }
    }

    fn try_send_control(&self, action: VideoAction, time: Option<f64>) -> Result<()> {
        if !self.transport.is_open() {
            return Err(SyncError::NotOpen);
        }
        let event = OutboundControlEvent::new(action, time)?;
        self.send_frame(&event)
    }

    fn send_frame<E: Serialize>(&self, event: &E) -> Result<()> {
        let json = encode(event)?;
        self.transport.send_text(json)
    }

    /// Route a terminal command; viewers only get the read-only surface
    pub fn handle_ui(&mut self, command: UiCommand) {
        if !self.controls_enabled() {
            warn!("Read-only participant; ignoring {:?}", command);
            return;
        }

        match command {
            UiCommand::Chat(text) => {
                self.chat_input.set(text);
                self.send_chat();
            }
            UiCommand::Play => self.play_pressed(),
            UiCommand::Pause => self.pause_pressed(),
            UiCommand::SeekForward => self.seek_forward_pressed(),
            UiCommand::SeekBack => self.seek_back_pressed(),
            UiCommand::Help | UiCommand::Quit | UiCommand::Unknown(_) => {}
        }
    }

    pub fn play_pressed(&self) {
        if let Some(current) = self.current_time() {
            self.send_control_action(VideoAction::Play, Some(current));
        }
    }

    pub fn pause_pressed(&self) {
        if let Some(current) = self.current_time() {
            self.send_control_action(VideoAction::Pause, Some(current));
        }
    }

    pub fn seek_forward_pressed(&self) {
        if let Some(current) = self.current_time() {
            let target = seek_forward_target(current);
            debug!("Seek forward to {}", format_time(target));
            self.send_control_action(VideoAction::Seek, Some(target));
        }
    }

    pub fn seek_back_pressed(&self) {
        if let Some(current) = self.current_time() {
            let target = seek_back_target(current);
            debug!("Seek back to {}", format_time(target));
            self.send_control_action(VideoAction::Seek, Some(target));
        }
    }

    fn current_time(&self) -> Option<f64> {
        let Some(player) = self.player.as_ref() else {
            warn!("No video loaded yet");
            return None;
        };
        match player.get_position() {
            Ok(position) => Some(position),
            Err(e) => {
                warn!("Position unavailable: {}", e);
                None
            }
        }
    }
}
