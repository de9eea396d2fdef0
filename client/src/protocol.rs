use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::{fmt, str::FromStr};

use crate::error::{Result, SyncError};
use crate::utils::is_valid_time;

/// Playback actions relayed through the room (must match server protocol)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoAction {
    Play,
    Pause,
    Seek,
}

impl VideoAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoAction::Play => "play",
            VideoAction::Pause => "pause",
            VideoAction::Seek => "seek",
        }
    }
}

impl FromStr for VideoAction {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "play" => Ok(VideoAction::Play),
            "pause" => Ok(VideoAction::Pause),
            "seek" => Ok(VideoAction::Seek),
            other => Err(SyncError::UnknownAction(other.to_string())),
        }
    }
}

impl fmt::Display for VideoAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Client -> Server chat frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutboundChatEvent {
    pub message: String,
}

/// Client -> Server playback frame; `time` is only ever set for `seek`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutboundControlEvent {
    pub action: VideoAction,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_time"
    )]
    pub time: Option<f64>,
}

impl OutboundControlEvent {
    /// Build a control frame. `seek` requires a finite, non-negative time;
    /// any time passed along with `play`/`pause` is discarded.
    pub fn new(action: VideoAction, time: Option<f64>) -> Result<Self> {
        match action {
            VideoAction::Seek => match time {
                Some(t) if is_valid_time(t) => Ok(Self {
                    action,
                    time: Some(t),
                }),
                Some(t) => Err(SyncError::InvalidTime(t.to_string())),
                None => Err(SyncError::InvalidTime("seek without a time".to_string())),
            },
            VideoAction::Play | VideoAction::Pause => Ok(Self { action, time: None }),
        }
    }
}

// Whole seconds go out as JSON integers (`42`, not `42.0`).
fn serialize_time<S>(time: &Option<f64>, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;
    match time {
        Some(t) if t.fract() == 0.0 && t.abs() <= MAX_SAFE_INTEGER => {
            serializer.serialize_i64(*t as i64)
        }
        Some(t) => serializer.serialize_f64(*t),
        None => serializer.serialize_none(),
    }
}

/// Encode any outbound frame as a JSON text frame
pub fn encode<T: Serialize>(event: &T) -> Result<String> {
    Ok(serde_json::to_string(event)?)
}

/// Server -> Client frame as it appears on the wire
#[derive(Debug, Default, Deserialize)]
struct InboundFrame {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    action: Option<String>,
    #[serde(default)]
    time: Option<Value>,
}

/// A control request carried by an inbound frame. The action name is kept
/// raw so unknown names reach the dispatcher and get reported there.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlIntent {
    pub action: String,
    pub time: Option<f64>,
}

/// Decoded inbound frame
#[derive(Debug, Clone, PartialEq)]
pub enum InboundEvent {
    Chat { message: String },
    Control(ControlIntent),
    /// Malformed per protocol, but both halves are still honoured
    ChatWithControl {
        message: String,
        control: ControlIntent,
    },
    Unrecognized,
}

impl InboundEvent {
    pub fn decode(raw: &str) -> Result<Self> {
        let frame: InboundFrame = serde_json::from_str(raw)?;

        let control = match frame.action {
            Some(action) => Some(ControlIntent {
                action,
                time: decode_time(frame.time)?,
            }),
            None => None,
        };

        Ok(match (frame.message, control) {
            (Some(message), Some(control)) => InboundEvent::ChatWithControl { message, control },
            (Some(message), None) => InboundEvent::Chat { message },
            (None, Some(control)) => InboundEvent::Control(control),
            (None, None) => InboundEvent::Unrecognized,
        })
    }
}

// The room server echoes `"time": null` for play/pause.
fn decode_time(value: Option<Value>) -> Result<Option<f64>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_f64()
            .map(Some)
            .ok_or_else(|| SyncError::InvalidTime(n.to_string())),
        Some(other) => Err(SyncError::InvalidTime(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_control_frames() {
        let seek = OutboundControlEvent::new(VideoAction::Seek, Some(42.0)).unwrap();
        assert_eq!(encode(&seek).unwrap(), r#"{"action":"seek","time":42}"#);

        let fractional = OutboundControlEvent::new(VideoAction::Seek, Some(12.5)).unwrap();
        assert_eq!(encode(&fractional).unwrap(), r#"{"action":"seek","time":12.5}"#);

        let play = OutboundControlEvent::new(VideoAction::Play, None).unwrap();
        assert_eq!(encode(&play).unwrap(), r#"{"action":"play"}"#);

        let pause = OutboundControlEvent::new(VideoAction::Pause, Some(30.0)).unwrap();
        assert_eq!(encode(&pause).unwrap(), r#"{"action":"pause"}"#);
    }

    #[test]
    fn test_seek_requires_valid_time() {
        assert!(OutboundControlEvent::new(VideoAction::Seek, None).is_err());
        assert!(OutboundControlEvent::new(VideoAction::Seek, Some(f64::NAN)).is_err());
        assert!(OutboundControlEvent::new(VideoAction::Seek, Some(-1.0)).is_err());
        assert!(OutboundControlEvent::new(VideoAction::Seek, Some(f64::INFINITY)).is_err());
    }

    #[test]
    fn test_encode_chat_frame() {
        let chat = OutboundChatEvent {
            message: "hi".to_string(),
        };
        assert_eq!(encode(&chat).unwrap(), r#"{"message":"hi"}"#);
    }

    #[test]
    fn test_decode_variants() {
        assert_eq!(
            InboundEvent::decode(r#"{"message":"hello"}"#).unwrap(),
            InboundEvent::Chat {
                message: "hello".to_string()
            }
        );
        assert_eq!(
            InboundEvent::decode(r#"{"action":"pause","time":null}"#).unwrap(),
            InboundEvent::Control(ControlIntent {
                action: "pause".to_string(),
                time: None,
            })
        );
        assert_eq!(
            InboundEvent::decode(r#"{"message":"x","action":"seek","time":7}"#).unwrap(),
            InboundEvent::ChatWithControl {
                message: "x".to_string(),
                control: ControlIntent {
                    action: "seek".to_string(),
                    time: Some(7.0),
                },
            }
        );
        assert_eq!(
            InboundEvent::decode(r#"{"other":true}"#).unwrap(),
            InboundEvent::Unrecognized
        );
    }

    #[test]
    fn test_decode_keeps_unknown_action_name() {
        let event = InboundEvent::decode(r#"{"action":"rewind"}"#).unwrap();
        assert_eq!(
            event,
            InboundEvent::Control(ControlIntent {
                action: "rewind".to_string(),
                time: None,
            })
        );
    }

    #[test]
    fn test_decode_rejects_malformed() {
        assert!(matches!(
            InboundEvent::decode("not json"),
            Err(SyncError::Serialization(_))
        ));
        assert!(matches!(
            InboundEvent::decode(r#"{"action":"seek","time":"soon"}"#),
            Err(SyncError::InvalidTime(_))
        ));
    }

    #[test]
    fn test_action_names() {
        assert_eq!("seek".parse::<VideoAction>().unwrap(), VideoAction::Seek);
        assert!(matches!(
            "stop".parse::<VideoAction>(),
            Err(SyncError::UnknownAction(name)) if name == "stop"
        ));
        assert_eq!(VideoAction::Pause.to_string(), "pause");
    }
}
