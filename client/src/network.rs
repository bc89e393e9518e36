//! WebSocket room connection.

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use log::{info, warn};
use shared::{ClientMessage, ServerEvent};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// A live connection to a room.
///
/// Can be used sequentially through its own methods, or split into sender
/// and event halves so a frame loop can report moves while another branch
/// drains server events.
pub struct RoomClient {
    sender: RoomSender,
    events: RoomEvents,
}

/// Outbound half: reports the controlled entity's state to the room.
pub struct RoomSender {
    sink: SplitSink<WsStream, Message>,
}

/// Inbound half: server events in arrival order.
pub struct RoomEvents {
    stream: SplitStream<WsStream>,
}

impl RoomClient {
    /// Connects and joins the room under the given display name.
    pub async fn connect(server: &str, name: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let url = format!("ws://{}/ws?name={}", server, name);
        info!("Connecting to {}", url);

        let (stream, _) = connect_async(url.as_str()).await?;
        let (sink, stream) = stream.split();

        Ok(Self {
            sender: RoomSender { sink },
            events: RoomEvents { stream },
        })
    }

    pub fn split(self) -> (RoomSender, RoomEvents) {
        (self.sender, self.events)
    }

    pub async fn send_move(&mut self, x: f32, y: f32) -> Result<(), Box<dyn std::error::Error>> {
        self.sender.send_move(x, y).await
    }

    pub async fn send_zone_change(&mut self, key: &str) -> Result<(), Box<dyn std::error::Error>> {
        self.sender.send_zone_change(key).await
    }

    pub async fn next_event(&mut self) -> Option<ServerEvent> {
        self.events.next_event().await
    }

    pub async fn close(self) {
        self.sender.close().await;
    }
}

impl RoomSender {
    pub async fn send_move(&mut self, x: f32, y: f32) -> Result<(), Box<dyn std::error::Error>> {
        self.send(&ClientMessage::Move { x, y }).await
    }

    pub async fn send_zone_change(&mut self, key: &str) -> Result<(), Box<dyn std::error::Error>> {
        self.send(&ClientMessage::ZoneChange {
            key: key.to_string(),
        })
        .await
    }

    async fn send(&mut self, message: &ClientMessage) -> Result<(), Box<dyn std::error::Error>> {
        let frame = serde_json::to_string(message)?;
        self.sink.send(Message::Text(frame)).await?;
        Ok(())
    }

    pub async fn close(mut self) {
        let _ = self.sink.close().await;
    }
}

impl RoomEvents {
    /// Next well-formed server event, or `None` once the connection is
    /// gone. Malformed frames are logged and skipped.
    pub async fn next_event(&mut self) -> Option<ServerEvent> {
        while let Some(result) = self.stream.next().await {
            match result {
                Ok(Message::Text(text)) => match serde_json::from_str::<ServerEvent>(&text) {
                    Ok(event) => return Some(event),
                    Err(e) => warn!("Ignoring malformed server frame: {}", e),
                },
                Ok(Message::Close(_)) => return None,
                Ok(_) => {}
                Err(e) => {
                    warn!("Connection error: {}", e);
                    return None;
                }
            }
        }
        None
    }
}
