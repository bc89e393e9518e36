//! HTTP and WebSocket layer: the room upgrade endpoint, the zone editor
//! CRUD routes and static asset serving.

use axum::body::Bytes;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use futures_util::{SinkExt, StreamExt};
use log::{debug, info, warn};
use serde::Deserialize;
use serde_json::json;
use shared::{ClientMessage, ZoneData};
use std::io;
use tokio::net::TcpListener;
use tokio::sync::{mpsc, oneshot};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use crate::room::{RoomCommand, SessionId};
use crate::zones::ZoneStore;

/// Shared handles every request needs: the room's command channel and the
/// zone store.
#[derive(Clone)]
pub struct AppState {
    pub room_tx: mpsc::Sender<RoomCommand>,
    pub zones: ZoneStore,
}

/// Builds the full router: zone CRUD, WebSocket upgrade, and static client
/// assets as the fallback.
pub fn router(state: AppState, static_dir: impl AsRef<std::path::Path>) -> Router {
    Router::new()
        .route("/editor/zones/{key}", get(get_zone).post(post_zone))
        .route("/ws", get(ws_upgrade))
        .fallback_service(ServeDir::new(static_dir.as_ref()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn serve(listener: TcpListener, app: Router) -> io::Result<()> {
    axum::serve(listener, app).await
}

/// Persisted zone bytes, or the serialized scaffold when the key has never
/// been saved.
pub fn zone_payload(store: &ZoneStore, key: &str) -> io::Result<Vec<u8>> {
    match store.load(key)? {
        Some(bytes) => Ok(bytes),
        None => {
            let scaffold = ZoneData::scaffold(&ZoneStore::sanitize_key(key));
            serde_json::to_vec(&scaffold).map_err(|e| io::Error::new(io::ErrorKind::Other, e))
        }
    }
}

async fn get_zone(State(state): State<AppState>, Path(key): Path<String>) -> Response {
    match zone_payload(&state.zones, &key) {
        Ok(bytes) => ([(header::CONTENT_TYPE, "application/json")], bytes).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": e.to_string() })),
        )
            .into_response(),
    }
}

async fn post_zone(
    State(state): State<AppState>,
    Path(key): Path<String>,
    body: Bytes,
) -> Response {
    match state.zones.save(&key, &body) {
        Ok(()) => (StatusCode::OK, Json(json!({ "ok": true }))).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": e.to_string() })),
        )
            .into_response(),
    }
}

#[derive(Debug, Deserialize)]
struct JoinParams {
    name: Option<String>,
}

async fn ws_upgrade(
    ws: WebSocketUpgrade,
    Query(params): Query<JoinParams>,
    State(state): State<AppState>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, params.name, state.room_tx.clone()))
}

/// Runs one connection: joins the room, forwards room events to the socket
/// from a writer task, and translates inbound frames into room commands
/// until the peer goes away.
async fn handle_socket(socket: WebSocket, name: Option<String>, room_tx: mpsc::Sender<RoomCommand>) {
    let (mut ws_tx, mut ws_rx) = socket.split();

    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let (reply_tx, reply_rx) = oneshot::channel();
    if room_tx
        .send(RoomCommand::Join {
            name,
            sender: event_tx,
            reply: reply_tx,
        })
        .await
        .is_err()
    {
        return;
    }

    let session_id: SessionId = match reply_rx.await {
        Ok(Some(session_id)) => session_id,
        _ => {
            // Room full (or gone): never joined, nothing to clean up.
            let _ = ws_tx.close().await;
            return;
        }
    };

    let writer_session = session_id.clone();
    let writer = tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            match serde_json::to_string(&event) {
                Ok(frame) => {
                    if ws_tx.send(Message::Text(frame.into())).await.is_err() {
                        debug!("Socket write failed for {}", writer_session);
                        break;
                    }
                }
                Err(e) => warn!("Failed to serialize event for {}: {}", writer_session, e),
            }
        }
    });

    info!("Connection {} entered the room", session_id);

    while let Some(result) = ws_rx.next().await {
        let msg = match result {
            Ok(msg) => msg,
            Err(e) => {
                debug!("Socket read error for {}: {}", session_id, e);
                break;
            }
        };

        match msg {
            Message::Text(text) => match serde_json::from_str::<ClientMessage>(&text) {
                Ok(ClientMessage::Move { x, y }) => {
                    let command = RoomCommand::Move {
                        session_id: session_id.clone(),
                        x,
                        y,
                    };
                    if room_tx.send(command).await.is_err() {
                        break;
                    }
                }
                Ok(ClientMessage::ZoneChange { key }) => {
                    let command = RoomCommand::ZoneChange {
                        session_id: session_id.clone(),
                        key,
                    };
                    if room_tx.send(command).await.is_err() {
                        break;
                    }
                }
                Err(e) => warn!("Ignoring malformed frame from {}: {}", session_id, e),
            },
            Message::Close(_) => break,
            _ => {}
        }
    }

    let _ = room_tx
        .send(RoomCommand::Leave {
            session_id: session_id.clone(),
        })
        .await;
    writer.abort();
    info!("Connection {} closed", session_id);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_zone_payload_returns_persisted_bytes_verbatim() {
        let dir = tempdir().unwrap();
        let store = ZoneStore::new(dir.path());

        let body = br#"{"sceneKey":"BR01","custom":true}"#;
        store.save("BR01", body).unwrap();

        let payload = zone_payload(&store, "BR01").unwrap();
        assert_eq!(payload, body.to_vec());
    }

    #[test]
    fn test_zone_payload_scaffolds_missing_zone() {
        let dir = tempdir().unwrap();
        let store = ZoneStore::new(dir.path());

        let payload = zone_payload(&store, "unseen").unwrap();
        let zone: ZoneData = serde_json::from_slice(&payload).unwrap();

        assert_eq!(zone, ZoneData::scaffold("unseen"));
    }

    #[test]
    fn test_zone_payload_scaffold_uses_sanitized_key() {
        let dir = tempdir().unwrap();
        let store = ZoneStore::new(dir.path());

        let payload = zone_payload(&store, "b a d/key").unwrap();
        let zone: ZoneData = serde_json::from_slice(&payload).unwrap();

        assert_eq!(zone.scene_key, "badkey");
    }
}
