//! # Labyrinth Room Server Library
//!
//! Authoritative server for the labyrinth prototype. It hosts a single
//! logical room, relays player join/move/leave events between connected
//! clients, and persists editor-authored zone geometry.
//!
//! ## Core Responsibilities
//!
//! ### Session Registry & Broadcast Relay
//! Each connection joins the room and gets a session id and a player
//! record at the fixed spawn point. Every subsequent `move` message
//! mutates that record in place and is fanned out to every other
//! connection; join and leave produce `playerJoined`/`playerLeft`
//! broadcasts. The server trusts client coordinates as-is; there is no
//! validation or anti-cheat bound checking.
//!
//! ### Zone Persistence
//! The in-browser editor saves zone documents (solids, paths, portals)
//! through plain HTTP. Zones are JSON files keyed by a sanitized name;
//! reading a zone that was never saved yields a default scaffold.
//!
//! ## Architecture Design
//!
//! ### One Task Per Room
//! All room mutation flows through a single command channel consumed by
//! one task, so inbound messages are processed one at a time in arrival
//! order. The registry needs no locks, and per-connection send order is
//! the only delivery guarantee the protocol relies on: a joining client
//! always receives the full roster before any later move broadcast.
//!
//! ### WebSocket + HTTP On One Listener
//! The network layer serves the WebSocket upgrade, the zone CRUD routes
//! and the static client assets from one axum router. Each connection
//! gets an unbounded outbound event queue drained by its own writer task.
//!
//! ## Module Organization
//!
//! - [`room`]: session registry, broadcast relay, room task.
//! - [`zones`]: file-backed zone store with key sanitization.
//! - [`network`]: axum router, WebSocket connection handling.

pub mod network;
pub mod room;
pub mod zones;
