//! # Labyrinth Client Library
//!
//! Headless client-side implementation for the labyrinth prototype:
//! everything the browser build does minus rendering and input devices.
//!
//! ## Architecture Overview
//!
//! ### Remote Player Mirror
//! The client keeps a plain map of every other player's last known
//! position, fed directly by server broadcasts. There is no prediction and
//! no interpolation: each `playerMoved` event overwrites the previous
//! position and the next frame renders whatever is current.
//!
//! ### Path-Sticky Movement
//! The controlled entity is constrained to the editor-authored path
//! rectangles. Rather than colliding with walls, positions off the path
//! are eased back toward the nearest authored rectangle, with velocity
//! damping that stiffens the further the player strays, ending in a hard
//! stop. A free-walk toggle disables the whole mechanism for development.
//!
//! ### Room Connection
//! A single WebSocket carries JSON text frames both ways: the client
//! reports `move` positions, the server relays join/move/leave events of
//! everyone else. Per-connection send order is the only ordering
//! guarantee, and it is all the mirror needs.
//!
//! ## Module Organization
//!
//! - [`game`]: the remote-player mirror.
//! - [`movement`]: avatar state and the path-sticky clamp.
//! - [`network`]: WebSocket room connection.

pub mod game;
pub mod movement;
pub mod network;
