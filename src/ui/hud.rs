use bevy::prelude::*;

use crate::level::DayCounter;
use crate::shared::*;
use crate::world::weather::{SkyClock, Weather};

/// The status bar stays up in every in-level state, overlays included, and
/// is removed only when the level unloads.
pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameState::Playing), spawn_hud)
            .add_systems(OnEnter(GameState::Loading), despawn_hud)
            .add_systems(
                Update,
                (update_time_display, update_tool_display)
                    .in_set(LevelSet::Draw)
                    .run_if(in_level),
            );
    }
}

// ═══════════════════════════════════════════════════════════════════════
// MARKER COMPONENTS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Component)]
pub struct HudRoot;

#[derive(Component)]
pub struct HudTimeText;

#[derive(Component)]
pub struct HudToolText;

#[derive(Component)]
pub struct HudInventoryText;

// ═══════════════════════════════════════════════════════════════════════
// SPAWN / DESPAWN
// ═══════════════════════════════════════════════════════════════════════

fn hud_text(marker: impl Component, initial: &str) -> impl Bundle {
    (
        marker,
        Text::new(initial),
        TextFont {
            font_size: 16.0,
            ..default()
        },
        TextColor(Color::WHITE),
        PickingBehavior::IGNORE,
    )
}

pub fn spawn_hud(mut commands: Commands, existing: Query<Entity, With<HudRoot>>) {
    if !existing.is_empty() {
        return;
    }
    commands
        .spawn((
            HudRoot,
            Node {
                width: Val::Percent(100.0),
                height: Val::Px(32.0),
                flex_direction: FlexDirection::Row,
                justify_content: JustifyContent::SpaceBetween,
                align_items: AlignItems::Center,
                padding: UiRect::axes(Val::Px(12.0), Val::Px(4.0)),
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.6)),
            GlobalZIndex(110),
            PickingBehavior::IGNORE,
        ))
        .with_children(|bar| {
            bar.spawn(hud_text(HudTimeText, "Day 1 - 06:00"));
            bar.spawn(hud_text(HudToolText, ""));
            bar.spawn(hud_text(HudInventoryText, ""));
        });
}

pub fn despawn_hud(mut commands: Commands, query: Query<Entity, With<HudRoot>>) {
    for entity in &query {
        commands.entity(entity).despawn_recursive();
    }
}

// ═══════════════════════════════════════════════════════════════════════
// UPDATE
// ═══════════════════════════════════════════════════════════════════════

pub fn format_clock(day: u32, hour: u32, minute: u32, raining: bool) -> String {
    let weather = if raining { "Rain" } else { "Clear" };
    format!("Day {} - {:02}:{:02} - {}", day + 1, hour, minute, weather)
}

pub fn update_time_display(
    day: Res<DayCounter>,
    sky: Res<SkyClock>,
    weather: Res<Weather>,
    mut query: Query<&mut Text, With<HudTimeText>>,
) {
    for mut text in &mut query {
        **text = format_clock(day.0, sky.hour, sky.minute, weather.raining);
    }
}

pub fn update_tool_display(
    player_query: Query<(&Actor, &ResourceInventory), With<Player>>,
    mut tool_text: Query<&mut Text, (With<HudToolText>, Without<HudInventoryText>)>,
    mut inventory_text: Query<&mut Text, (With<HudInventoryText>, Without<HudToolText>)>,
) {
    let Ok((actor, inventory)) = player_query.get_single() else {
        return;
    };
    let seeds = actor
        .seed
        .seed_resource()
        .map(|resource| inventory.count(resource))
        .unwrap_or(0);
    for mut text in &mut tool_text {
        **text = format!("{:?} | {:?} x{}", actor.tool, actor.seed, seeds);
    }
    for mut text in &mut inventory_text {
        **text = format!(
            "Wood {}  Apple {}  Corn {}  Tomato {}",
            inventory.count(InventoryResource::Wood),
            inventory.count(InventoryResource::Apple),
            inventory.count(InventoryResource::Corn),
            inventory.count(InventoryResource::Tomato),
        );
    }
}
