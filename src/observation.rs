//! Observation encoding.
//!
//! Each agent observes four values:
//! ```text
//! [steer_discretized, changing_lane, current_lane, speed_level]
//! ```

use crate::config::EnvConfig;
use crate::control::VehicleControl;
use crate::lane_change::LaneChangeCycle;
use crate::types::Lane;

/// Builds observation vectors for agents.
pub struct ObservationBuilder;

impl ObservationBuilder {
    /// Encodes one agent's state.
    ///
    /// The steer angle is rounded to whole degrees and shifted by the steering
    /// bound so it is never negative.
    pub fn build(control: &VehicleControl, cycle: &LaneChangeCycle, current_lane: Lane) -> Vec<f32> {
        let obs = vec![
            Self::discretize_steer(control.steer_angle(), control.config().max_steering_angle),
            if cycle.changing_lane() { 1.0 } else { 0.0 },
            current_lane.flag(),
            control.commanded_speed_level() as f32,
        ];
        debug_assert_eq!(obs.len(), EnvConfig::OBSERVATION_DIM);
        obs
    }

    /// `round(round(steer) + max_steering_angle)`.
    pub fn discretize_steer(steer_angle: f32, max_steering_angle: f32) -> f32 {
        (steer_angle.round() + max_steering_angle).round()
    }
}
