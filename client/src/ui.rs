use crate::constants::SEEK_STEP_SECS;

/// One line of terminal input, interpreted
#[derive(Debug, Clone, PartialEq)]
pub enum UiCommand {
    Chat(String),
    Play,
    Pause,
    SeekForward,
    SeekBack,
    Help,
    Quit,
    Unknown(String),
}

impl UiCommand {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if !trimmed.starts_with('/') {
            return UiCommand::Chat(line.to_string());
        }

        match trimmed {
            "/play" => UiCommand::Play,
            "/pause" => UiCommand::Pause,
            "/fwd" | "/forward" => UiCommand::SeekForward,
            "/back" | "/rewind" => UiCommand::SeekBack,
            "/help" => UiCommand::Help,
            "/quit" | "/exit" => UiCommand::Quit,
            other => UiCommand::Unknown(other.to_string()),
        }
    }
}

pub const HELP_TEXT: &str = "\
Commands:
  <text>     send a chat message (video links load for everyone)
  /play      resume playback for the room
  /pause     pause playback for the room
  /fwd       seek 10 seconds forward
  /back      seek 10 seconds back
  /quit      leave";

/// Chat input field; cleared whenever non-blank text is submitted
#[derive(Debug, Default, Clone)]
pub struct ChatInput {
    value: String,
}

impl ChatInput {
    pub fn set(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn clear(&mut self) {
        self.value.clear();
    }
}

/// Target of the seek-forward control
pub fn seek_forward_target(current: f64) -> f64 {
    current + SEEK_STEP_SECS
}

/// Target of the seek-back control, never before the start
pub fn seek_back_target(current: f64) -> f64 {
    (current - SEEK_STEP_SECS).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(UiCommand::parse("/play"), UiCommand::Play);
        assert_eq!(UiCommand::parse("  /pause "), UiCommand::Pause);
        assert_eq!(UiCommand::parse("/fwd"), UiCommand::SeekForward);
        assert_eq!(UiCommand::parse("/rewind"), UiCommand::SeekBack);
        assert_eq!(UiCommand::parse("/quit"), UiCommand::Quit);
        assert_eq!(
            UiCommand::parse("/dance"),
            UiCommand::Unknown("/dance".to_string())
        );
        assert_eq!(
            UiCommand::parse("hello room"),
            UiCommand::Chat("hello room".to_string())
        );
        assert_eq!(UiCommand::parse("   "), UiCommand::Chat("   ".to_string()));
    }

    #[test]
    fn test_seek_targets() {
        assert_eq!(seek_forward_target(0.0), 10.0);
        assert_eq!(seek_forward_target(95.5), 105.5);
        assert_eq!(seek_back_target(95.5), 85.5);
        assert_eq!(seek_back_target(10.0), 0.0);
        assert_eq!(seek_back_target(3.0), 0.0);
        assert_eq!(seek_back_target(0.0), 0.0);
    }

    #[test]
    fn test_seek_back_never_negative() {
        let mut t = 0.0;
        while t < 50.0 {
            let target = seek_back_target(t);
            assert_eq!(target, (t - 10.0_f64).max(0.0));
            assert!(target >= 0.0);
            t += 0.25;
        }
    }

    #[test]
    fn test_chat_input() {
        let mut input = ChatInput::default();
        assert_eq!(input.value(), "");
        input.set("hi");
        assert_eq!(input.value(), "hi");
        input.clear();
        assert_eq!(input.value(), "");
        input.set("again");
        assert_eq!(input.value(), "again");
    }
}
