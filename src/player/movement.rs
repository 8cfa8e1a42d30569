use bevy::prelude::*;

use crate::camera::CutsceneTrack;
use crate::shared::*;
use crate::world::ActiveMap;

/// True when `rect` overlaps any obstacle other than `me`.
fn is_blocked(rect: Rect, me: Entity, obstacles: &[(Entity, Rect)]) -> bool {
    obstacles
        .iter()
        .any(|(other, obstacle)| *other != me && overlaps(rect, *obstacle))
}

/// Shift `pos` so that `hitbox` stays inside the map.
fn clamp_to_map(pos: Vec2, hitbox: &Hitbox, size: Vec2) -> Vec2 {
    if size == Vec2::ZERO {
        return pos;
    }
    let half = hitbox.size / 2.0;
    let min = half - hitbox.offset;
    let max = (size - half - hitbox.offset).max(min);
    pos.clamp(min, max)
}

/// Move every actor (player and NPCs) along its direction.
///
/// Axis-separated so actors slide along walls. Held actors (their own
/// blocked flag, or any actor while a cutscene runs) keep animating in
/// place; a free actor standing still rests on frame 0.
pub fn move_actors(
    time: Res<Time>,
    cutscene: Res<CutsceneTrack>,
    active: Res<ActiveMap>,
    mut queries: ParamSet<(
        Query<(Entity, &Transform, &Hitbox), With<Collidable>>,
        Query<(Entity, &mut Transform, &Hitbox, &Actor, Option<&mut AnimationClock>)>,
    )>,
) {
    let dt = time.delta_secs();
    let map_size = active.def().map(|d| d.size).unwrap_or(Vec2::ZERO);
    let obstacles: Vec<(Entity, Rect)> = queries
        .p0()
        .iter()
        .map(|(entity, tf, hitbox)| (entity, hitbox.rect_at(tf.translation.truncate())))
        .collect();

    for (entity, mut transform, hitbox, actor, clock) in queries.p1().iter_mut() {
        let held = actor.blocked || cutscene.active;
        if let Some(mut clock) = clock {
            if held || actor.direction != Vec2::ZERO {
                clock.tick(dt);
            } else {
                clock.frame = 0;
            }
        }
        if held || actor.direction == Vec2::ZERO {
            continue;
        }

        let delta = actor.direction.normalize_or_zero() * actor.speed * dt;
        let mut pos = transform.translation.truncate();

        let candidate = Vec2::new(pos.x + delta.x, pos.y);
        if !is_blocked(hitbox.rect_at(candidate), entity, &obstacles) {
            pos = candidate;
        }
        let candidate = Vec2::new(pos.x, pos.y + delta.y);
        if !is_blocked(hitbox.rect_at(candidate), entity, &obstacles) {
            pos = candidate;
        }

        let pos = clamp_to_map(pos, hitbox, map_size);
        transform.translation.x = pos.x;
        transform.translation.y = pos.y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn own_hitbox_never_blocks() {
        let me = Entity::from_raw(1);
        let rect = Rect::from_center_size(Vec2::ZERO, Vec2::splat(10.0));
        assert!(!is_blocked(rect, me, &[(me, rect)]));
        assert!(is_blocked(rect, me, &[(Entity::from_raw(2), rect)]));
    }

    #[test]
    fn actors_are_kept_inside_the_map() {
        let hitbox = Hitbox::new(Vec2::splat(10.0));
        let size = Vec2::new(100.0, 50.0);
        assert_eq!(clamp_to_map(Vec2::new(-20.0, 80.0), &hitbox, size), Vec2::new(5.0, 45.0));
        assert_eq!(clamp_to_map(Vec2::new(30.0, 20.0), &hitbox, size), Vec2::new(30.0, 20.0));
    }
}
