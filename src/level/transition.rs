//! Timed screen transitions. One controller per concern (map change, day
//! change); each fades to black, fires its reset action while the screen is
//! covered, then fades back and fires its finish action.

use bevy::prelude::*;

use crate::shared::MapId;

/// What a transition asks the level to do when one of its hooks fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionAction {
    SwitchToMap(MapId),
    ReloadCurrentMap,
    StartNewDay,
    ReleasePlayer,
}

/// Sent once per fired hook, in firing order.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelActionEvent(pub TransitionAction);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionState {
    #[default]
    Idle,
    Active,
}

#[derive(Debug, Clone)]
pub struct Transition {
    state: TransitionState,
    elapsed: f32,
    duration: f32,
    reset: TransitionAction,
    /// One-shot replacement for `reset`, cleared when the transition ends.
    reset_override: Option<TransitionAction>,
    finish: TransitionAction,
    reset_fired: bool,
}

impl Transition {
    pub fn new(duration: f32, reset: TransitionAction, finish: TransitionAction) -> Self {
        Self {
            state: TransitionState::Idle,
            elapsed: 0.0,
            duration: duration.max(0.0),
            reset,
            reset_override: None,
            finish,
            reset_fired: false,
        }
    }

    /// Start the transition. Returns false and changes nothing while it is
    /// already running.
    pub fn activate(&mut self) -> bool {
        if self.is_active() {
            return false;
        }
        self.state = TransitionState::Active;
        self.elapsed = 0.0;
        self.reset_fired = false;
        true
    }

    /// Replace the reset action for the next run only.
    pub fn set_reset(&mut self, action: TransitionAction) {
        self.reset_override = Some(action);
    }

    pub fn set_duration(&mut self, duration: f32) {
        self.duration = duration.max(0.0);
    }

    pub fn is_active(&self) -> bool {
        self.state == TransitionState::Active
    }

    pub fn state(&self) -> TransitionState {
        self.state
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn pending_reset(&self) -> TransitionAction {
        self.reset_override.unwrap_or(self.reset)
    }

    /// Fraction of the run completed, 0 when idle.
    pub fn progress(&self) -> f32 {
        if !self.is_active() {
            return 0.0;
        }
        if self.duration <= 0.0 {
            return 1.0;
        }
        (self.elapsed / self.duration).clamp(0.0, 1.0)
    }

    /// Overlay opacity: rises to 1 at the midpoint and falls back to 0.
    pub fn fade_alpha(&self) -> f32 {
        if !self.is_active() {
            return 0.0;
        }
        1.0 - (self.progress() * 2.0 - 1.0).abs()
    }

    /// Advance by `dt` seconds and return the actions that fired, in order.
    pub fn update(&mut self, dt: f32) -> Vec<TransitionAction> {
        let mut fired = Vec::new();
        if !self.is_active() {
            return fired;
        }
        self.elapsed += dt;

        if !self.reset_fired && self.elapsed >= self.duration / 2.0 {
            self.reset_fired = true;
            fired.push(self.pending_reset());
        }
        if self.elapsed >= self.duration {
            self.state = TransitionState::Idle;
            self.elapsed = 0.0;
            self.reset_override = None;
            fired.push(self.finish);
        }
        fired
    }
}

pub const MAP_TRANSITION_SECS: f32 = 2.4;
pub const DAY_TRANSITION_SECS: f32 = 3.2;

/// The two transitions the level runs.
#[derive(Resource, Debug, Clone)]
pub struct LevelTransitions {
    pub map: Transition,
    pub day: Transition,
}

impl Default for LevelTransitions {
    fn default() -> Self {
        Self::new(MAP_TRANSITION_SECS, DAY_TRANSITION_SECS)
    }
}

impl LevelTransitions {
    pub fn new(map_secs: f32, day_secs: f32) -> Self {
        Self {
            map: Transition::new(
                map_secs,
                TransitionAction::ReloadCurrentMap,
                TransitionAction::ReleasePlayer,
            ),
            day: Transition::new(
                day_secs,
                TransitionAction::StartNewDay,
                TransitionAction::ReleasePlayer,
            ),
        }
    }

    pub fn any_active(&self) -> bool {
        self.map.is_active() || self.day.is_active()
    }

    /// Day transition first, then map transition.
    pub fn update(&mut self, dt: f32) -> Vec<TransitionAction> {
        let mut fired = self.day.update(dt);
        fired.extend(self.map.update(dt));
        fired
    }
}
