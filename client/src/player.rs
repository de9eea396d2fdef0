use std::time::Instant;

use crate::utils::format_time;

/// Playback state as reported by a player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    /// The player exists but has not signalled readiness yet
    Unready,
    Unstarted,
    Ended,
    Playing,
    Paused,
    Buffering,
    Cued,
}

impl PlayerState {
    /// Whether play/pause/seek calls are accepted in this state
    pub fn accepts_control(&self) -> bool {
        !matches!(
            self,
            PlayerState::Unready | PlayerState::Unstarted | PlayerState::Buffering
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerState::Unready => "unready",
            PlayerState::Unstarted => "unstarted",
            PlayerState::Ended => "ended",
            PlayerState::Playing => "playing",
            PlayerState::Paused => "paused",
            PlayerState::Buffering => "buffering",
            PlayerState::Cued => "cued",
        }
    }
}

/// Boundary to the embedded video player
pub trait PlayerAdapter {
    /// Switch the player to another video
    fn load(&mut self, video_id: &str) -> Result<(), String>;

    fn play(&mut self) -> Result<(), String>;

    fn pause(&mut self) -> Result<(), String>;

    /// Seek to an absolute timestamp (in seconds)
    fn seek(&mut self, timestamp: f64) -> Result<(), String>;

    /// Current playback position (in seconds)
    fn get_position(&self) -> Result<f64, String>;

    fn state(&self) -> PlayerState;
}

/// Creates the session's player on the first video load
pub trait PlayerFactory {
    type Player: PlayerAdapter;

    fn create(&mut self, video_id: &str) -> Result<Self::Player, String>;
}

/// Clock-driven player used when no video widget is attached.
///
/// Loading a video cues it and starts playback right away, the position
/// advances with wall-clock time while playing.
pub struct HeadlessPlayer {
    video_id: String,
    state: PlayerState,
    position: f64,
    playing_since: Option<Instant>,
}

impl HeadlessPlayer {
    pub fn new(video_id: &str) -> Self {
        let mut player = Self {
            video_id: String::new(),
            state: PlayerState::Unstarted,
            position: 0.0,
            playing_since: None,
        };
        player.cue_and_start(video_id);
        player
    }

    pub fn video_id(&self) -> &str {
        &self.video_id
    }

    fn cue_and_start(&mut self, video_id: &str) {
        self.video_id = video_id.to_string();
        self.position = 0.0;
        self.playing_since = Some(Instant::now());
        self.state = PlayerState::Playing;
        tracing::info!("Loaded video {}", self.video_id);
    }

    fn current_position(&self) -> f64 {
        match self.playing_since {
            Some(since) => self.position + since.elapsed().as_secs_f64(),
            None => self.position,
        }
    }
}

impl PlayerAdapter for HeadlessPlayer {
    fn load(&mut self, video_id: &str) -> Result<(), String> {
        if video_id.is_empty() {
            return Err("Empty video id".to_string());
        }
        self.cue_and_start(video_id);
        Ok(())
    }

    fn play(&mut self) -> Result<(), String> {
        if self.playing_since.is_none() {
            self.playing_since = Some(Instant::now());
        }
        self.state = PlayerState::Playing;
        tracing::info!(
            "Playing {} at {}",
            self.video_id,
            format_time(self.current_position())
        );
        Ok(())
    }

    fn pause(&mut self) -> Result<(), String> {
        self.position = self.current_position();
        self.playing_since = None;
        self.state = PlayerState::Paused;
        tracing::info!("Paused {} at {}", self.video_id, format_time(self.position));
        Ok(())
    }

    fn seek(&mut self, timestamp: f64) -> Result<(), String> {
        if !timestamp.is_finite() || timestamp < 0.0 {
            return Err(format!("Invalid seek target {timestamp}"));
        }
        self.position = timestamp;
        if self.playing_since.is_some() {
            self.playing_since = Some(Instant::now());
        }
        tracing::info!("Seeked {} to {}", self.video_id, format_time(timestamp));
        Ok(())
    }

    fn get_position(&self) -> Result<f64, String> {
        Ok(self.current_position())
    }

    fn state(&self) -> PlayerState {
        self.state
    }
}

/// Factory for [`HeadlessPlayer`]
#[derive(Debug, Default)]
pub struct HeadlessPlayerFactory;

impl PlayerFactory for HeadlessPlayerFactory {
    type Player = HeadlessPlayer;

    fn create(&mut self, video_id: &str) -> Result<HeadlessPlayer, String> {
        if video_id.is_empty() {
            return Err("Empty video id".to_string());
        }
        Ok(HeadlessPlayer::new(video_id))
    }
}
