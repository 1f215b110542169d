//! Presentation hooks.
//!
//! Lane materials and camera masks live outside the crate. The coordinator
//! notifies a [`LaneChangePresenter`] and never depends on what it does.

use crate::lane_change::LaneChangeState;
use crate::types::Lane;

/// Receives visual updates when the target lane changes.
pub trait LaneChangePresenter {
    fn on_lane_change_visual_update(&mut self, state: LaneChangeState, target_lane: Lane);
}

/// Presenter that ignores every update.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPresenter;

impl LaneChangePresenter for NoopPresenter {
    fn on_lane_change_visual_update(&mut self, _state: LaneChangeState, _target_lane: Lane) {}
}

/// Presenter that keeps every update, for headless inspection.
#[derive(Debug, Clone, Default)]
pub struct RecordingPresenter {
    pub updates: Vec<(LaneChangeState, Lane)>,
}

impl LaneChangePresenter for RecordingPresenter {
    fn on_lane_change_visual_update(&mut self, state: LaneChangeState, target_lane: Lane) {
        self.updates.push((state, target_lane));
    }
}
