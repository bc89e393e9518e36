//! Editor-authored zone documents: the JSON files the zone store persists
//! and the scaffold served when no file exists yet.

use serde::{Deserialize, Serialize};

use crate::geometry::PathRect;
use crate::{SPAWN_X, SPAWN_Y};

pub const DEFAULT_BG: &str = "assets/scenes/BR01.png";
pub const SCENE_WIDTH: f32 = 1536.0;
pub const SCENE_HEIGHT: f32 = 1024.0;
pub const DEFAULT_ZOOM: f32 = 0.8;

/// A complete zone: background, camera framing, spawn point and the three
/// authored rectangle layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneData {
    pub scene_key: String,
    pub bg: String,
    pub camera: Camera,
    pub spawn: Spawn,
    pub solids: Vec<PathRect>,
    pub paths: Vec<PathRect>,
    pub portals: Vec<Portal>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub w: f32,
    pub h: f32,
    pub zoom: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spawn {
    pub x: f32,
    pub y: f32,
}

/// A portal rectangle carrying the key of the zone it leads to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portal {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub target: String,
}

impl ZoneData {
    /// Default document for a zone that has never been saved.
    pub fn scaffold(scene_key: &str) -> Self {
        Self {
            scene_key: scene_key.to_string(),
            bg: DEFAULT_BG.to_string(),
            camera: Camera {
                w: SCENE_WIDTH,
                h: SCENE_HEIGHT,
                zoom: DEFAULT_ZOOM,
            },
            spawn: Spawn {
                x: SPAWN_X,
                y: SPAWN_Y,
            },
            solids: Vec::new(),
            paths: Vec::new(),
            portals: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaffold_defaults() {
        let zone = ZoneData::scaffold("BR01");

        assert_eq!(zone.scene_key, "BR01");
        assert_eq!(zone.bg, DEFAULT_BG);
        assert_eq!(zone.spawn.x, SPAWN_X);
        assert_eq!(zone.spawn.y, SPAWN_Y);
        assert!(zone.solids.is_empty());
        assert!(zone.paths.is_empty());
        assert!(zone.portals.is_empty());
    }

    #[test]
    fn test_scaffold_serializes_camel_case() {
        let zone = ZoneData::scaffold("cavern");
        let json = serde_json::to_value(&zone).unwrap();

        assert_eq!(json["sceneKey"], "cavern");
        assert!(json.get("scene_key").is_none());
        assert!(json["paths"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_zone_roundtrip_with_geometry() {
        let mut zone = ZoneData::scaffold("BR02");
        zone.paths.push(PathRect::new(0.0, 0.0, 64.0, 32.0));
        zone.solids.push(PathRect::new(128.0, 128.0, 32.0, 32.0));
        zone.portals.push(Portal {
            x: 1504.0,
            y: 480.0,
            w: 32.0,
            h: 64.0,
            target: "BR03".to_string(),
        });

        let serialized = serde_json::to_string(&zone).unwrap();
        let deserialized: ZoneData = serde_json::from_str(&serialized).unwrap();
        assert_eq!(zone, deserialized);
    }
}
