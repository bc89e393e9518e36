//! Client-side view of the room: the remote-player mirror.

use log::{debug, info};
use shared::{PlayerRecord, ServerEvent};
use std::collections::HashMap;

/// Mirrors the positions of every other player in the room.
///
/// Pure last-write-wins state fed by server events: no prediction and no
/// interpolation; each frame simply renders the latest known positions.
/// The local session never appears in the mirror.
#[derive(Debug, Default)]
pub struct PlayerMirror {
    session_id: Option<String>,
    remote: HashMap<String, PlayerRecord>,
}

impl PlayerMirror {
    pub fn new() -> Self {
        Self::default()
    }

    /// Our own session id, known once the `welcome` event arrives.
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn len(&self) -> usize {
        self.remote.len()
    }

    pub fn is_empty(&self) -> bool {
        self.remote.is_empty()
    }

    pub fn get(&self, session_id: &str) -> Option<&PlayerRecord> {
        self.remote.get(session_id)
    }

    pub fn players(&self) -> impl Iterator<Item = &PlayerRecord> {
        self.remote.values()
    }

    /// Applies one server event to the mirror.
    pub fn apply(&mut self, event: ServerEvent) {
        match event {
            ServerEvent::Welcome { session_id } => {
                info!("Connected! Session ID: {}", session_id);
                self.session_id = Some(session_id);
            }
            ServerEvent::PlayerJoined(record) => {
                if self.session_id.as_deref() == Some(record.session_id.as_str()) {
                    return;
                }
                if self.remote.contains_key(&record.session_id) {
                    return;
                }
                info!("Player {} ({}) joined", record.name, record.session_id);
                self.remote.insert(record.session_id.clone(), record);
            }
            ServerEvent::PlayerMoved { session_id, x, y } => {
                if let Some(player) = self.remote.get_mut(&session_id) {
                    player.x = x;
                    player.y = y;
                } else {
                    debug!("Move for unknown player {}", session_id);
                }
            }
            ServerEvent::PlayerLeft { session_id } => {
                if self.remote.remove(&session_id).is_some() {
                    info!("Player {} left", session_id);
                }
            }
        }
    }
}
