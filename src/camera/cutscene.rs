//! Scripted camera track. While active it owns the camera focal point and
//! zoom, and the level runs actors in blocked mode.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// One keyframe of a cutscene. The camera travels to `position` at the
/// previous keyframe's `speed`, then waits `pause` seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraTarget {
    pub position: (f32, f32),
    pub speed: f32,
    pub pause: f32,
    pub zoom: f32,
}

impl CameraTarget {
    /// The resting target a track holds when a map has no cutscene.
    pub const fn null() -> Self {
        Self {
            position: (0.0, 0.0),
            speed: 0.0,
            pause: 0.0,
            zoom: 1.0,
        }
    }

    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.position.0, self.position.1)
    }
}

#[derive(Resource, Debug, Clone)]
pub struct CutsceneTrack {
    targets: Vec<CameraTarget>,
    index: usize,
    position: Vec2,
    pause_left: f32,
    pub active: bool,
}

impl Default for CutsceneTrack {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl CutsceneTrack {
    pub fn new(targets: Vec<CameraTarget>) -> Self {
        let targets = if targets.is_empty() {
            vec![CameraTarget::null()]
        } else {
            targets
        };
        let position = targets[0].pos();
        Self {
            targets,
            index: 0,
            position,
            pause_left: 0.0,
            active: false,
        }
    }

    /// Replace the keyframes. The track is left inactive until `start`.
    pub fn load(&mut self, targets: Vec<CameraTarget>) {
        *self = Self::new(targets);
    }

    /// Rewind to the first keyframe. A single-keyframe track has nowhere to
    /// travel and stays inactive.
    pub fn start(&mut self) {
        self.index = 0;
        self.position = self.targets[0].pos();
        self.pause_left = self.targets[0].pause;
        self.active = self.targets.len() > 1;
    }

    pub fn current_position(&self) -> Vec2 {
        self.position
    }

    /// Zoom of the keyframe the camera is currently travelling from.
    pub fn current_zoom(&self) -> f32 {
        self.targets[self.index].zoom
    }

    pub fn update(&mut self, dt: f32) {
        if !self.active {
            return;
        }
        let mut budget = dt;
        while budget > 0.0 && self.active {
            if self.pause_left > 0.0 {
                let waited = self.pause_left.min(budget);
                self.pause_left -= waited;
                budget -= waited;
                continue;
            }
            let Some(next) = self.targets.get(self.index + 1).copied() else {
                self.active = false;
                break;
            };
            let speed = self.targets[self.index].speed.max(1.0);
            let to_next = next.pos() - self.position;
            let distance = to_next.length();
            let reach = speed * budget;
            if reach >= distance {
                budget -= distance / speed;
                self.position = next.pos();
                self.index += 1;
                self.pause_left = next.pause;
                if self.index + 1 >= self.targets.len() && self.pause_left <= 0.0 {
                    self.active = false;
                }
            } else {
                self.position += to_next / distance * reach;
                budget = 0.0;
            }
        }
    }
}
