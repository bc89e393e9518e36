//! Room state and the broadcast relay.
//!
//! A [`Room`] owns the session registry (one [`PlayerRecord`] per connected
//! session) and the per-connection event senders. All mutation goes through
//! [`RoomCommand`]s consumed by a single [`run`] task, so handlers never
//! race: the registry needs no locks by construction, and a joining client
//! is guaranteed to see the full roster before any later move broadcast.

use log::{debug, info};
use rand::distributions::Alphanumeric;
use rand::Rng;
use shared::{PlayerRecord, ServerEvent, DEFAULT_NAME, SPAWN_X, SPAWN_Y};
use std::collections::HashMap;
use tokio::sync::{mpsc, oneshot};

/// Room-framework style session identifier (9 alphanumeric chars).
pub type SessionId = String;

const SESSION_ID_LEN: usize = 9;

/// Sender half of one connection's outbound event queue. Events pushed here
/// are serialized and written to the socket in order by the connection's
/// writer task.
pub type EventSender = mpsc::UnboundedSender<ServerEvent>;

/// Commands sent from connection tasks to the room task.
#[derive(Debug)]
pub enum RoomCommand {
    Join {
        name: Option<String>,
        sender: EventSender,
        reply: oneshot::Sender<Option<SessionId>>,
    },
    Move {
        session_id: SessionId,
        x: f32,
        y: f32,
    },
    ZoneChange {
        session_id: SessionId,
        key: String,
    },
    Leave {
        session_id: SessionId,
    },
}

/// One logical multiplayer room: the authoritative player registry plus the
/// current connection set.
pub struct Room {
    players: HashMap<SessionId, PlayerRecord>,
    connections: HashMap<SessionId, EventSender>,
    max_clients: usize,
}

impl Room {
    pub fn new(max_clients: usize) -> Self {
        Self {
            players: HashMap::new(),
            connections: HashMap::new(),
            max_clients,
        }
    }

    /// Admits a new session, or returns None when the room is full.
    ///
    /// The new session's record is created at the fixed spawn point. Event
    /// order on the new connection is `welcome` first, then one
    /// `playerJoined` per pre-existing record (self excluded); everyone
    /// else gets a single `playerJoined` for the newcomer.
    pub fn join(&mut self, name: Option<String>, sender: EventSender) -> Option<SessionId> {
        if self.players.len() >= self.max_clients {
            info!("Join rejected: room is full ({} clients)", self.max_clients);
            return None;
        }

        let session_id = self.generate_session_id();
        let name = name.unwrap_or_else(|| DEFAULT_NAME.to_string());
        let record = PlayerRecord::new(session_id.clone(), SPAWN_X, SPAWN_Y, name);

        info!(
            "Player {} ({}) joined at ({}, {})",
            record.name, session_id, record.x, record.y
        );

        self.send_to(
            &sender,
            &session_id,
            ServerEvent::Welcome {
                session_id: session_id.clone(),
            },
        );

        self.broadcast(&ServerEvent::PlayerJoined(record.clone()), None);

        for existing in self.players.values() {
            self.send_to(
                &sender,
                &session_id,
                ServerEvent::PlayerJoined(existing.clone()),
            );
        }

        self.players.insert(session_id.clone(), record);
        self.connections.insert(session_id.clone(), sender);

        Some(session_id)
    }

    /// Updates a player's position and relays it to everyone else.
    ///
    /// A move from a session without a record (stale message racing a
    /// disconnect) is silently dropped. Coordinates are trusted as-is.
    pub fn handle_move(&mut self, session_id: &str, x: f32, y: f32) {
        let Some(record) = self.players.get_mut(session_id) else {
            debug!("Dropping move from unknown session {}", session_id);
            return;
        };
        record.x = x;
        record.y = y;

        self.broadcast(
            &ServerEvent::PlayerMoved {
                session_id: session_id.to_string(),
                x,
                y,
            },
            Some(session_id),
        );
    }

    /// Portal traversal notice; the room keeps no zone state for it.
    pub fn handle_zone_change(&self, session_id: &str, key: &str) {
        debug!("Session {} reported zone change to {}", session_id, key);
    }

    /// Removes a session and tells the remaining players.
    pub fn leave(&mut self, session_id: &str) {
        self.connections.remove(session_id);
        if self.players.remove(session_id).is_none() {
            return;
        }

        info!("Player {} left", session_id);
        self.broadcast(
            &ServerEvent::PlayerLeft {
                session_id: session_id.to_string(),
            },
            None,
        );
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn player(&self, session_id: &str) -> Option<&PlayerRecord> {
        self.players.get(session_id)
    }

    /// Fans an event out to every connection except `except`.
    fn broadcast(&self, event: &ServerEvent, except: Option<&str>) {
        for (session_id, sender) in &self.connections {
            if Some(session_id.as_str()) == except {
                continue;
            }
            self.send_to(sender, session_id, event.clone());
        }
    }

    fn send_to(&self, sender: &EventSender, session_id: &str, event: ServerEvent) {
        if sender.send(event).is_err() {
            // The writer task is gone; the pending Leave will clean up.
            debug!("Dropped event for closed connection {}", session_id);
        }
    }

    fn generate_session_id(&self) -> SessionId {
        loop {
            let id: String = rand::thread_rng()
                .sample_iter(&Alphanumeric)
                .take(SESSION_ID_LEN)
                .map(char::from)
                .collect();
            if !self.players.contains_key(&id) {
                return id;
            }
        }
    }
}

/// Drives a room from its command channel, one command at a time.
pub async fn run(mut room: Room, mut commands: mpsc::Receiver<RoomCommand>) {
    while let Some(command) = commands.recv().await {
        match command {
            RoomCommand::Join {
                name,
                sender,
                reply,
            } => {
                let session_id = room.join(name, sender);
                let _ = reply.send(session_id);
            }
            RoomCommand::Move { session_id, x, y } => room.handle_move(&session_id, x, y),
            RoomCommand::ZoneChange { session_id, key } => {
                room.handle_zone_change(&session_id, &key)
            }
            RoomCommand::Leave { session_id } => room.leave(&session_id),
        }
    }
    debug!("Room command channel closed, room task exiting");
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::MAX_CLIENTS;
    use tokio::sync::mpsc::error::TryRecvError;

    type EventReceiver = mpsc::UnboundedReceiver<ServerEvent>;

    fn connection() -> (EventSender, EventReceiver) {
        mpsc::unbounded_channel()
    }

    fn drain(rx: &mut EventReceiver) -> Vec<ServerEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[test]
    fn test_join_assigns_session_and_spawns_at_fixed_point() {
        let mut room = Room::new(MAX_CLIENTS);
        let (tx, mut rx) = connection();

        let id = room.join(Some("Keven".to_string()), tx).unwrap();

        assert_eq!(id.len(), SESSION_ID_LEN);
        let record = room.player(&id).unwrap();
        assert_eq!(record.x, SPAWN_X);
        assert_eq!(record.y, SPAWN_Y);
        assert_eq!(record.name, "Keven");

        let events = drain(&mut rx);
        assert_eq!(
            events,
            vec![ServerEvent::Welcome {
                session_id: id.clone()
            }]
        );
    }

    #[test]
    fn test_join_defaults_name_to_guest() {
        let mut room = Room::new(MAX_CLIENTS);
        let (tx, _rx) = connection();

        let id = room.join(None, tx).unwrap();
        assert_eq!(room.player(&id).unwrap().name, DEFAULT_NAME);
    }

    #[test]
    fn test_new_session_gets_one_joined_per_existing_and_never_itself() {
        let mut room = Room::new(MAX_CLIENTS);
        let (tx_a, _rx_a) = connection();
        let (tx_b, _rx_b) = connection();
        let (tx_c, mut rx_c) = connection();

        let id_a = room.join(Some("Ana".to_string()), tx_a).unwrap();
        let id_b = room.join(Some("Ben".to_string()), tx_b).unwrap();
        let id_c = room.join(Some("Cleo".to_string()), tx_c).unwrap();

        let events = drain(&mut rx_c);
        assert_eq!(
            events[0],
            ServerEvent::Welcome {
                session_id: id_c.clone()
            }
        );

        let joined: Vec<&PlayerRecord> = events[1..]
            .iter()
            .map(|event| match event {
                ServerEvent::PlayerJoined(record) => record,
                other => panic!("Unexpected event during roster replay: {:?}", other),
            })
            .collect();

        assert_eq!(joined.len(), 2);
        assert!(joined.iter().any(|r| r.session_id == id_a));
        assert!(joined.iter().any(|r| r.session_id == id_b));
        assert!(joined.iter().all(|r| r.session_id != id_c));
    }

    #[test]
    fn test_existing_sessions_get_exactly_one_joined_for_newcomer() {
        let mut room = Room::new(MAX_CLIENTS);
        let (tx_a, mut rx_a) = connection();
        let (tx_b, _rx_b) = connection();

        room.join(Some("Ana".to_string()), tx_a).unwrap();
        drain(&mut rx_a);

        let id_b = room.join(Some("Ben".to_string()), tx_b).unwrap();

        let events = drain(&mut rx_a);
        assert_eq!(events.len(), 1);
        match &events[0] {
            ServerEvent::PlayerJoined(record) => {
                assert_eq!(record.session_id, id_b);
                assert_eq!(record.name, "Ben");
            }
            other => panic!("Expected playerJoined, got {:?}", other),
        }
    }

    #[test]
    fn test_join_rejected_when_full() {
        let mut room = Room::new(2);
        let (tx_a, _rx_a) = connection();
        let (tx_b, _rx_b) = connection();
        let (tx_c, mut rx_c) = connection();

        assert!(room.join(None, tx_a).is_some());
        assert!(room.join(None, tx_b).is_some());
        assert!(room.join(None, tx_c).is_none());

        assert_eq!(room.len(), 2);
        assert_eq!(rx_c.try_recv(), Err(TryRecvError::Empty));
    }

    #[test]
    fn test_move_updates_record_and_broadcasts_except_sender() {
        let mut room = Room::new(MAX_CLIENTS);
        let (tx_a, mut rx_a) = connection();
        let (tx_b, mut rx_b) = connection();

        let id_a = room.join(Some("Ana".to_string()), tx_a).unwrap();
        room.join(Some("Ben".to_string()), tx_b).unwrap();
        drain(&mut rx_a);
        drain(&mut rx_b);

        room.handle_move(&id_a, 512.0, 96.0);

        let record = room.player(&id_a).unwrap();
        assert_eq!(record.x, 512.0);
        assert_eq!(record.y, 96.0);

        // the mover hears nothing back
        assert_eq!(rx_a.try_recv(), Err(TryRecvError::Empty));

        let events = drain(&mut rx_b);
        assert_eq!(
            events,
            vec![ServerEvent::PlayerMoved {
                session_id: id_a,
                x: 512.0,
                y: 96.0,
            }]
        );
    }

    #[test]
    fn test_move_from_unknown_session_is_silent_noop() {
        let mut room = Room::new(MAX_CLIENTS);
        let (tx_a, mut rx_a) = connection();

        let id_a = room.join(Some("Ana".to_string()), tx_a).unwrap();
        drain(&mut rx_a);
        let before = room.player(&id_a).cloned();

        room.handle_move("notasessio", 999.0, 999.0);

        assert_eq!(room.len(), 1);
        assert_eq!(room.player(&id_a).cloned(), before);
        assert_eq!(rx_a.try_recv(), Err(TryRecvError::Empty));
    }

    #[test]
    fn test_leave_removes_record_and_broadcasts_to_remaining() {
        let mut room = Room::new(MAX_CLIENTS);
        let (tx_a, mut rx_a) = connection();
        let (tx_b, mut rx_b) = connection();
        let (tx_c, mut rx_c) = connection();

        let id_a = room.join(None, tx_a).unwrap();
        room.join(None, tx_b).unwrap();
        room.join(None, tx_c).unwrap();
        drain(&mut rx_a);
        drain(&mut rx_b);
        drain(&mut rx_c);

        room.leave(&id_a);

        assert_eq!(room.len(), 2);
        assert!(room.player(&id_a).is_none());

        for rx in [&mut rx_b, &mut rx_c] {
            let events = drain(rx);
            assert_eq!(
                events,
                vec![ServerEvent::PlayerLeft {
                    session_id: id_a.clone()
                }]
            );
        }
        // the departed connection hears nothing
        assert!(matches!(
            rx_a.try_recv(),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected)
        ));
    }

    #[test]
    fn test_leave_unknown_session_is_noop() {
        let mut room = Room::new(MAX_CLIENTS);
        let (tx_a, mut rx_a) = connection();

        room.join(None, tx_a).unwrap();
        drain(&mut rx_a);

        room.leave("notasessio");

        assert_eq!(room.len(), 1);
        assert_eq!(rx_a.try_recv(), Err(TryRecvError::Empty));
    }

    #[test]
    fn test_broadcast_survives_closed_connection() {
        let mut room = Room::new(MAX_CLIENTS);
        let (tx_a, rx_a) = connection();
        let (tx_b, mut rx_b) = connection();

        let id_a = room.join(None, tx_a).unwrap();
        room.join(None, tx_b).unwrap();
        drain(&mut rx_b);

        // connection A's writer died without a Leave yet
        drop(rx_a);

        room.handle_move(&id_a, 10.0, 20.0);
        let events = drain(&mut rx_b);
        assert_eq!(events.len(), 1);
    }

    #[tokio::test]
    async fn test_room_task_processes_commands_in_order() {
        let (cmd_tx, cmd_rx) = mpsc::channel(16);
        tokio::spawn(run(Room::new(MAX_CLIENTS), cmd_rx));

        let (tx_a, mut rx_a) = connection();
        let (reply_tx, reply_rx) = oneshot::channel();
        cmd_tx
            .send(RoomCommand::Join {
                name: Some("Ana".to_string()),
                sender: tx_a,
                reply: reply_tx,
            })
            .await
            .unwrap();
        let id_a = reply_rx.await.unwrap().unwrap();

        let (tx_b, mut rx_b) = connection();
        let (reply_tx, reply_rx) = oneshot::channel();
        cmd_tx
            .send(RoomCommand::Join {
                name: None,
                sender: tx_b,
                reply: reply_tx,
            })
            .await
            .unwrap();
        let id_b = reply_rx.await.unwrap().unwrap();

        cmd_tx
            .send(RoomCommand::Move {
                session_id: id_b.clone(),
                x: 64.0,
                y: 128.0,
            })
            .await
            .unwrap();
        cmd_tx
            .send(RoomCommand::Leave {
                session_id: id_b.clone(),
            })
            .await
            .unwrap();

        // roster replay for B happened before B's move was processed
        assert_eq!(
            rx_b.recv().await.unwrap(),
            ServerEvent::Welcome {
                session_id: id_b.clone()
            }
        );
        match rx_b.recv().await.unwrap() {
            ServerEvent::PlayerJoined(record) => assert_eq!(record.session_id, id_a),
            other => panic!("Expected roster replay, got {:?}", other),
        }

        // A sees B join, then move, then leave, in command order
        match rx_a.recv().await.unwrap() {
            ServerEvent::PlayerJoined(record) => assert_eq!(record.session_id, id_b),
            other => panic!("Expected playerJoined, got {:?}", other),
        }
        assert_eq!(
            rx_a.recv().await.unwrap(),
            ServerEvent::PlayerMoved {
                session_id: id_b.clone(),
                x: 64.0,
                y: 128.0,
            }
        );
        assert_eq!(
            rx_a.recv().await.unwrap(),
            ServerEvent::PlayerLeft { session_id: id_b }
        );
    }
}
