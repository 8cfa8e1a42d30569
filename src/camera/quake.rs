//! Screen shake. Produces a camera offset that decays over the quake.

use bevy::prelude::*;

#[derive(Resource, Debug, Clone, Default)]
pub struct ScreenShake {
    remaining: f32,
    duration: f32,
    elapsed: f32,
    pub offset: Vec2,
}

const SHAKE_AMPLITUDE: f32 = 4.0;

impl ScreenShake {
    pub fn start(&mut self, duration: f32) {
        self.duration = duration.max(0.0);
        self.remaining = self.duration;
        self.elapsed = 0.0;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_active(&self) -> bool {
        self.remaining > 0.0
    }

    pub fn update(&mut self, dt: f32) {
        if !self.is_active() {
            self.offset = Vec2::ZERO;
            return;
        }
        self.elapsed += dt;
        self.remaining = (self.remaining - dt).max(0.0);
        let falloff = if self.duration > 0.0 {
            self.remaining / self.duration
        } else {
            0.0
        };
        let amp = SHAKE_AMPLITUDE * falloff;
        self.offset = Vec2::new(
            (self.elapsed * 47.0).sin() * amp,
            (self.elapsed * 31.0).cos() * amp,
        );
    }
}
