use serde::{Deserialize, Serialize};

/// One connected player's record.
///
/// Owned exclusively by the server's session registry; everything else
/// (broadcast payloads, the client-side mirror) holds copies. The position
/// is whatever the last `move` message reported; the server does no
/// bounds checking on it.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRecord {
    pub session_id: String,
    pub x: f32,
    pub y: f32,
    pub name: String,
}

impl PlayerRecord {
    pub fn new(session_id: impl Into<String>, x: f32, y: f32, name: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            x,
            y,
            name: name.into(),
        }
    }
}

/// Messages a client sends to the room, as JSON text frames tagged by
/// message name.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum ClientMessage {
    /// Position report for the controlled entity. Trusted as-is.
    Move { x: f32, y: f32 },
    /// Portal traversal notice. The room has no handler for it.
    ZoneChange { key: String },
}

/// Events the room fans out to clients.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum ServerEvent {
    /// Session-id assignment, always the first event on a connection.
    #[serde(rename_all = "camelCase")]
    Welcome { session_id: String },
    /// Sent to others when a player joins, and to the new session once per
    /// pre-existing record (never for itself).
    PlayerJoined(PlayerRecord),
    #[serde(rename_all = "camelCase")]
    PlayerMoved { session_id: String, x: f32, y: f32 },
    #[serde(rename_all = "camelCase")]
    PlayerLeft { session_id: String },
}
