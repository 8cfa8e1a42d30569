//! Camera domain: world-bounded follow camera, zoom easing, cutscene track
//! and screen shake. The level decides what the camera targets; this module
//! only moves toward it.

use bevy::prelude::*;

use crate::shared::*;

pub mod cutscene;
pub mod quake;

pub use cutscene::{CameraTarget, CutsceneTrack};
pub use quake::ScreenShake;

/// Camera position clamped to the bounds of the loaded map.
#[derive(Resource, Debug, Clone)]
pub struct LevelCamera {
    pub center: Vec2,
    pub world_size: Vec2,
    /// Visible area in world units at zoom 1.0.
    pub viewport: Vec2,
    pub follow_speed: f32,
}

impl Default for LevelCamera {
    fn default() -> Self {
        Self {
            center: Vec2::ZERO,
            world_size: Vec2::ZERO,
            viewport: Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT) / PIXEL_SCALE,
            follow_speed: 5.0,
        }
    }
}

impl LevelCamera {
    /// New map bounds. The centre is re-clamped immediately.
    pub fn change_size(&mut self, world_size: Vec2) {
        self.world_size = world_size;
        self.center = self.clamp(self.center, 1.0);
    }

    /// Snap to a target, e.g. right after a teleport.
    pub fn snap_to(&mut self, target: Vec2, zoom: f32) {
        self.center = self.clamp(target, zoom);
    }

    /// Ease toward `target`. Far jumps (teleports) snap instead of sliding.
    pub fn update(&mut self, target: Vec2, zoom: f32, dt: f32) {
        let far = (target - self.center).abs();
        let next = if far.x > TILE_SIZE * 8.0 || far.y > TILE_SIZE * 8.0 {
            target
        } else {
            let t = (self.follow_speed * dt).min(1.0);
            self.center.lerp(target, t)
        };
        self.center = self.clamp(next, zoom);
    }

    fn clamp(&self, pos: Vec2, zoom: f32) -> Vec2 {
        let half = self.viewport / zoom.max(0.01) / 2.0;
        let min = half;
        let max = (self.world_size - half).max(min);
        pos.clamp(min, max)
    }
}

/// Eases the camera zoom toward whatever the level asks for.
#[derive(Resource, Debug, Clone)]
pub struct ZoomControl {
    pub current: f32,
    pub speed: f32,
}

impl Default for ZoomControl {
    fn default() -> Self {
        Self {
            current: 1.0,
            speed: 2.0,
        }
    }
}

impl ZoomControl {
    pub fn update(&mut self, target: f32, dt: f32) {
        let t = (self.speed * dt).min(1.0);
        self.current += (target - self.current) * t;
        if (target - self.current).abs() < 0.001 {
            self.current = target;
        }
    }
}

/// Spawn the 2D camera the level drives.
pub fn setup_camera(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        Transform::from_scale(Vec3::splat(1.0 / PIXEL_SCALE)),
    ));
}

/// Apply the level camera, zoom and shake to the render camera.
pub fn apply_camera(
    level_camera: Res<LevelCamera>,
    zoom: Res<ZoomControl>,
    shake: Res<ScreenShake>,
    mut camera_query: Query<&mut Transform, With<Camera2d>>,
) {
    let Ok(mut cam_tf) = camera_query.get_single_mut() else {
        return;
    };
    let pos = level_camera.center + shake.offset;
    cam_tf.translation.x = pos.x.round();
    cam_tf.translation.y = pos.y.round();
    cam_tf.scale = Vec3::splat(1.0 / (PIXEL_SCALE * zoom.current.max(0.01)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camera_stays_inside_the_map() {
        let mut cam = LevelCamera::default();
        cam.change_size(Vec2::new(1000.0, 800.0));
        cam.snap_to(Vec2::new(-50.0, 5000.0), 1.0);
        let half = cam.viewport / 2.0;
        assert_eq!(cam.center.x, half.x);
        assert_eq!(cam.center.y, 800.0 - half.y);
    }

    #[test]
    fn small_map_centres_on_its_lower_bound() {
        let mut cam = LevelCamera::default();
        cam.change_size(Vec2::new(64.0, 64.0));
        cam.update(Vec2::new(32.0, 32.0), 1.0, 0.1);
        assert_eq!(cam.center, cam.viewport / 2.0);
    }

    #[test]
    fn zoom_converges_on_target() {
        let mut zoom = ZoomControl::default();
        for _ in 0..200 {
            zoom.update(1.5, 0.05);
        }
        assert_eq!(zoom.current, 1.5);
    }
}
