//! Rain and the sky clock.

use bevy::prelude::*;
use rand::Rng;

/// Whether today is a rainy day. Rolled once per day transition.
#[derive(Resource, Debug, Clone, Default)]
pub struct Weather {
    pub raining: bool,
}

/// The rain roll: an integer in `[low, high]` above `threshold` means rain.
/// With the defaults (0, 10, 7) that is three days in eleven. An empty
/// range never rains.
pub fn roll_rain(rng: &mut impl Rng, low: i32, high: i32, threshold: i32) -> bool {
    if low > high {
        return false;
    }
    rng.gen_range(low..=high) > threshold
}

const RAIN_DROPS: usize = 120;
const RAIN_FALL_SPEED: f32 = 220.0;

/// Falling drops spread over the current map's floor.
#[derive(Resource, Debug, Clone, Default)]
pub struct RainEffect {
    pub floor: Vec2,
    pub drops: Vec<Vec2>,
}

impl RainEffect {
    /// New floor bounds after a map load. Drops are re-scattered lazily.
    pub fn set_floor_size(&mut self, floor: Vec2) {
        self.floor = floor;
        self.drops.clear();
    }

    pub fn update(&mut self, dt: f32, rng: &mut impl Rng) {
        if self.floor.x <= 0.0 || self.floor.y <= 0.0 {
            return;
        }
        while self.drops.len() < RAIN_DROPS {
            self.drops.push(Vec2::new(
                rng.gen_range(0.0..self.floor.x),
                rng.gen_range(0.0..self.floor.y),
            ));
        }
        for drop in &mut self.drops {
            drop.y -= RAIN_FALL_SPEED * dt;
            drop.x -= RAIN_FALL_SPEED * 0.2 * dt;
            if drop.y < 0.0 || drop.x < 0.0 {
                drop.x = rng.gen_range(0.0..self.floor.x);
                drop.y = self.floor.y;
            }
        }
    }
}

/// In-game time of day that tints the screen. One real second is one
/// game minute.
#[derive(Resource, Debug, Clone)]
pub struct SkyClock {
    pub hour: u32,
    pub minute: u32,
    pub seconds: f32,
    pub minutes_per_second: f32,
}

impl Default for SkyClock {
    fn default() -> Self {
        Self {
            hour: 6,
            minute: 0,
            seconds: 0.0,
            minutes_per_second: 1.0,
        }
    }
}

impl SkyClock {
    pub fn set_time(&mut self, hour: u32, minute: u32) {
        self.hour = hour % 24;
        self.minute = minute % 60;
        self.seconds = 0.0;
    }

    pub fn advance(&mut self, dt: f32) {
        self.seconds += dt * self.minutes_per_second;
        while self.seconds >= 1.0 {
            self.seconds -= 1.0;
            self.minute += 1;
            if self.minute >= 60 {
                self.minute = 0;
                self.hour = (self.hour + 1) % 24;
            }
        }
    }

    /// Darkness of the night tint, 0 during the day up to 0.6 at midnight.
    pub fn darkness(&self) -> f32 {
        let t = self.hour as f32 + self.minute as f32 / 60.0;
        match t {
            t if (6.0..18.0).contains(&t) => 0.0,
            t if t >= 18.0 => ((t - 18.0) / 6.0 * 0.6).min(0.6),
            t => ((6.0 - t) / 6.0 * 0.6).min(0.6),
        }
    }
}

/// Advance the rain effect while it is raining.
pub fn update_rain(time: Res<Time>, weather: Res<Weather>, mut rain: ResMut<RainEffect>) {
    if !weather.raining {
        return;
    }
    rain.update(time.delta_secs(), &mut rand::thread_rng());
}
