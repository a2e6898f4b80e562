//! Protocol Messages
//!
//! Payloads exchanged with the chat transport. Serialized as tagged JSON so a
//! bridge process can relay them over any text channel.

use serde::{Serialize, Deserialize};

use crate::game::state::AnswerEvent;

// =============================================================================
// BOT -> CHAT
// =============================================================================

/// Content sent to the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutgoingMessage {
    /// Plain text.
    Text {
        /// Message body
        text: String,
    },

    /// Image referenced by URL.
    Image {
        /// Image location
        url: String,
    },
}

impl OutgoingMessage {
    /// Text message.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Image message.
    pub fn image(url: impl Into<String>) -> Self {
        Self::Image { url: url.into() }
    }

    /// Text body, if this is a text message.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { text } => Some(text),
            Self::Image { .. } => None,
        }
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

// =============================================================================
// CHAT -> BOT
// =============================================================================

/// Content received from the player while a game runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IncomingMessage {
    /// Something the player typed.
    Answer {
        /// Raw text
        text: String,
    },
}

impl IncomingMessage {
    /// Deserialize from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl From<IncomingMessage> for AnswerEvent {
    fn from(message: IncomingMessage) -> Self {
        match message {
            IncomingMessage::Answer { text } => AnswerEvent::new(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outgoing_json() {
        let msg = OutgoingMessage::text("Score: 0");
        let json = msg.to_json().unwrap();
        assert!(json.contains("\"type\":\"text\""));
        assert_eq!(OutgoingMessage::from_json(&json).unwrap(), msg);

        let img = OutgoingMessage::image("https://example.com/banner.jpg");
        assert!(img.as_text().is_none());
        assert!(img.to_json().unwrap().contains("\"type\":\"image\""));
    }

    #[test]
    fn test_incoming_answer() {
        let msg = IncomingMessage::from_json(r#"{"type":"answer","text":" 12 "}"#).unwrap();
        let answer: AnswerEvent = msg.into();
        assert_eq!(answer.value(), Some(12));
    }

    #[test]
    fn test_incoming_rejects_unknown_type() {
        assert!(IncomingMessage::from_json(r#"{"type":"ping"}"#).is_err());
    }
}
