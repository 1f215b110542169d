//! Lane-keeping heuristic policy.
//!
//! Steers the wheels back toward center and holds the speed level at the
//! current lane's target. It never initiates a lane change on its own and
//! serves as a baseline a trained policy should beat.

use std::ops::Range;

use super::trait_::Policy;
use crate::config::{ControlConfig, EnvConfig};

/// Baseline that keeps the wheels straight and tracks the lane speed.
pub struct LaneKeepingPolicy {
    turn: Range<usize>,
    motor: Option<Range<usize>>,
    action_dim: usize,
    control: ControlConfig,
    /// Steer offset (degrees) tolerated before correcting.
    deadband: f32,
}

impl LaneKeepingPolicy {
    pub fn new(config: &EnvConfig) -> Self {
        Self {
            turn: config.actions.turn.clone(),
            motor: config.actions.motor.clone(),
            action_dim: config.action_dim(),
            control: config.control.clone(),
            deadband: 1.0,
        }
    }

    fn act(&self, obs: &[f32]) -> Vec<f32> {
        let mut actions = vec![0.0; self.action_dim];
        let (turn_slot, motor_slot) = match obs {
            [steer, _changing, lane, speed, ..] => {
                let offset = steer - self.control.max_steering_angle;
                let turn = if offset > self.deadband {
                    1 // soft left
                } else if offset < -self.deadband {
                    2 // soft right
                } else {
                    0
                };
                let target = if *lane > 0.5 {
                    self.control.high_lane_target
                } else {
                    self.control.low_lane_target
                } as f32;
                let motor = if *speed < target {
                    2 // accelerate
                } else if *speed > target {
                    1 // decelerate
                } else {
                    0
                };
                (turn, motor)
            }
            _ => (0, 0),
        };

        if let Some(v) = actions.get_mut(self.turn.start + turn_slot) {
            *v = 1.0;
        }
        if let Some(motor) = &self.motor {
            if let Some(v) = actions.get_mut(motor.start + motor_slot) {
                *v = 1.0;
            }
        }
        actions
    }
}

impl Policy for LaneKeepingPolicy {
    fn select_actions(&mut self, observations: &[Vec<f32>]) -> Vec<Vec<f32>> {
        observations.iter().map(|obs| self.act(obs)).collect()
    }

    fn name(&self) -> &str {
        "lane_keeping"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{MotorCommand, TurnCommand};

    #[test]
    fn centered_and_on_target_goes_straight() {
        let config = EnvConfig::default();
        let mut policy = LaneKeepingPolicy::new(&config);
        let actions = policy.select_actions(&[vec![30.0, 0.0, 0.0, 6.0]]);
        let decoded = config.actions.decode(&actions[0]);
        assert_eq!(decoded.turn, Some(TurnCommand::Straight));
        assert_eq!(decoded.motor, Some(MotorCommand::Hold));
    }

    #[test]
    fn counters_steer_and_tracks_high_lane() {
        let config = EnvConfig::default();
        let mut policy = LaneKeepingPolicy::new(&config);
        let actions = policy.select_actions(&[
            vec![35.0, 0.0, 1.0, 6.0],
            vec![20.0, 1.0, 0.0, 9.0],
        ]);
        let first = config.actions.decode(&actions[0]);
        assert_eq!(first.turn, Some(TurnCommand::SoftLeft));
        assert_eq!(first.motor, Some(MotorCommand::Accelerate));
        let second = config.actions.decode(&actions[1]);
        assert_eq!(second.turn, Some(TurnCommand::SoftRight));
        assert_eq!(second.motor, Some(MotorCommand::Decelerate));
    }

    #[test]
    fn short_observation_is_neutral() {
        let config = EnvConfig::default();
        let mut policy = LaneKeepingPolicy::new(&config);
        let actions = policy.select_actions(&[vec![]]);
        assert_eq!(actions[0].len(), 6);
        let decoded = config.actions.decode(&actions[0]);
        assert_eq!(decoded.turn, Some(TurnCommand::Straight));
    }
}
