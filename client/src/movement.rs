//! Path-sticky movement: clamps the controlled entity toward authored path
//! rectangles instead of blocking it outright, producing a rubber-band
//! pull back onto the path rather than a hard wall.

use shared::{PathRect, PathSet, GRID};

/// Easing used while the foot point is on or near a path.
pub const STICK_EASING: f32 = 0.3;
/// Easing used when recovering from off-path positions.
pub const RECOVER_EASING: f32 = 0.2;
/// Widest search radius before movement is stopped entirely.
pub const NEAR_SEARCH_RADIUS: f32 = GRID * 4.0;

/// The locally controlled entity. Position is the sprite center; the
/// ground-contact point sits half a sprite below it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Avatar {
    pub x: f32,
    pub y: f32,
    pub vel_x: f32,
    pub vel_y: f32,
    pub half_height: f32,
}

impl Avatar {
    pub fn new(x: f32, y: f32, half_height: f32) -> Self {
        Self {
            x,
            y,
            vel_x: 0.0,
            vel_y: 0.0,
            half_height,
        }
    }

    /// Effective ground-contact point of the sprite.
    pub fn foot(&self) -> (f32, f32) {
        (self.x, self.y + self.half_height)
    }

    pub fn scale_velocity(&mut self, factor: f32) {
        self.vel_x *= factor;
        self.vel_y *= factor;
    }

    pub fn stop(&mut self) {
        self.vel_x = 0.0;
        self.vel_y = 0.0;
    }
}

/// Per-frame movement constraint against a [`PathSet`].
///
/// Remembers the last rectangle that held the player so that briefly
/// stepping off a path pulls them back to where they came from, not to
/// whichever rectangle happens to be first in the set.
#[derive(Debug, Default)]
pub struct PathClamp {
    last_active: Option<usize>,
    free_walk: bool,
}

impl PathClamp {
    pub fn new(free_walk: bool) -> Self {
        Self {
            last_active: None,
            free_walk,
        }
    }

    pub fn free_walk(&self) -> bool {
        self.free_walk
    }

    pub fn set_free_walk(&mut self, on: bool) {
        self.free_walk = on;
    }

    pub fn last_active(&self) -> Option<usize> {
        self.last_active
    }

    /// Constrains the avatar for this frame.
    ///
    /// Cascade, first match wins, searches in insertion order:
    /// 1. foot strictly inside a rect: clamp tight, fast easing
    /// 2. inside with half-height tolerance: clamp with 0.8x tolerance
    /// 3. the last active rect still clamps at half tolerance: damp to 50%
    /// 4. any rect within four grid units clamps at full tolerance: damp
    ///    to 40%
    /// 5. nothing near: hard stop, the player cannot leave the paths
    pub fn constrain(&mut self, avatar: &mut Avatar, paths: &PathSet) {
        if self.free_walk {
            self.last_active = None;
            return;
        }
        if paths.is_empty() {
            return;
        }

        let half = avatar.half_height;
        let (fx, fy) = avatar.foot();

        if let Some(index) = paths.find_containing(fx, fy, 0.0) {
            self.last_active = Some(index);
            self.clamp_to(avatar, paths, index, 0.0, STICK_EASING);
        } else if let Some(index) = paths.find_containing(fx, fy, half) {
            self.clamp_to(avatar, paths, index, half * 0.8, STICK_EASING);
        } else if self.clamp_to_last_active(avatar, paths, half * 0.5, RECOVER_EASING) {
            avatar.scale_velocity(0.5);
        } else if self.clamp_to_nearby(avatar, paths, fx, fy, half) {
            avatar.scale_velocity(0.4);
        } else {
            avatar.stop();
        }
    }

    /// Eases the avatar toward the padded bounds of one rectangle.
    /// Returns true (and records the rectangle) only when a correction was
    /// applied on either axis.
    fn clamp_to(
        &mut self,
        avatar: &mut Avatar,
        paths: &PathSet,
        index: usize,
        padding: f32,
        easing: f32,
    ) -> bool {
        let Some(rect) = paths.get(index) else {
            return false;
        };
        if clamp_foot_to_rect(avatar, rect, padding, easing) {
            self.last_active = Some(index);
            true
        } else {
            false
        }
    }

    fn clamp_to_last_active(
        &mut self,
        avatar: &mut Avatar,
        paths: &PathSet,
        padding: f32,
        easing: f32,
    ) -> bool {
        match self.last_active {
            Some(index) => self.clamp_to(avatar, paths, index, padding, easing),
            None => false,
        }
    }

    fn clamp_to_nearby(
        &mut self,
        avatar: &mut Avatar,
        paths: &PathSet,
        fx: f32,
        fy: f32,
        half: f32,
    ) -> bool {
        match paths.find_containing(fx, fy, NEAR_SEARCH_RADIUS) {
            Some(index) => self.clamp_to(avatar, paths, index, half, RECOVER_EASING),
            None => false,
        }
    }
}

/// Per-axis eased clamp of the avatar's foot point into a padded rectangle.
///
/// The position moves a fraction of the overshoot per call, never an
/// instant snap, never past the padded boundary in one step. The foot is
/// sampled once so both axes correct against the same frame's position.
pub fn clamp_foot_to_rect(avatar: &mut Avatar, rect: &PathRect, padding: f32, easing: f32) -> bool {
    let (fx, fy) = avatar.foot();
    let mut clamped = false;

    let min_x = rect.x - padding;
    let max_x = rect.x + rect.w + padding;
    if fx < min_x {
        avatar.x += (min_x - fx) * easing;
        clamped = true;
    } else if fx > max_x {
        avatar.x -= (fx - max_x) * easing;
        clamped = true;
    }

    let min_y = rect.y - padding;
    let max_y = rect.y + rect.h + padding;
    if fy < min_y {
        avatar.y += (min_y - fy) * easing;
        clamped = true;
    } else if fy > max_y {
        avatar.y -= (fy - max_y) * easing;
        clamped = true;
    }

    clamped
}
