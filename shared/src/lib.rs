pub mod geometry;
pub mod protocol;
pub mod zone;

pub use geometry::{PathRect, PathSet};
pub use protocol::{ClientMessage, PlayerRecord, ServerEvent};
pub use zone::{Camera, Portal, Spawn, ZoneData};

/// Editor grid unit in world pixels.
pub const GRID: f32 = 32.0;
/// Fixed spawn point for every joining player.
pub const SPAWN_X: f32 = 400.0;
pub const SPAWN_Y: f32 = 300.0;
/// Room capacity.
pub const MAX_CLIENTS: usize = 16;
/// Walk speed of the controlled entity in pixels per second.
pub const WALK_SPEED: f32 = 200.0;
/// Fallback player name when none is supplied on join.
pub const DEFAULT_NAME: &str = "Guest";
