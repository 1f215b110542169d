//! Configuration for the driving environment.
//!
//! Groups control dynamics, lane-change timing, reward magnitudes, the action
//! layout, and episode start poses. Defaults reproduce the reference scene.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::action::ActionLayout;
use crate::error::ConfigError;
use crate::start_pose::{StartPose, StartPoseSelection};
use crate::types::Lane;

/// Speed and steering parameters of the vehicle control interface.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ControlConfig {
    /// Lowest commanded speed level.
    pub min_speed_level: i32,
    /// Highest commanded speed level; also the torque normalizer.
    pub max_speed_level: i32,
    /// Ideal speed level in the low lane.
    pub low_lane_target: i32,
    /// Ideal speed level in the high lane.
    pub high_lane_target: i32,
    /// Speed-tracking reward when exactly on target.
    pub max_speed_reward: f32,
    /// Steer delta per tick for soft turns (degrees).
    pub soft_turn: f32,
    /// Steer delta per tick for hard turns (degrees).
    pub hard_turn: f32,
    /// Steer angle bound (degrees).
    pub max_steering_angle: f32,
    /// Motor torque at the maximum speed level.
    pub motor_force: f32,
    /// Brake torque while the brake is held.
    pub brake_force: f32,
}

impl ControlConfig {
    /// Target speed level for a lane.
    pub fn target_for(&self, lane: Lane) -> i32 {
        match lane {
            Lane::Low => self.low_lane_target,
            Lane::High => self.high_lane_target,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_speed_level > self.max_speed_level {
            return Err(ConfigError::EmptySpeedRange {
                min: self.min_speed_level,
                max: self.max_speed_level,
            });
        }
        if self.max_speed_level <= 0 {
            return Err(ConfigError::NonPositiveMaxSpeed(self.max_speed_level));
        }
        for lane in Lane::all() {
            let target = self.target_for(lane);
            if target < self.min_speed_level || target > self.max_speed_level {
                return Err(ConfigError::TargetOutOfRange {
                    lane: lane.to_string(),
                    target,
                    min: self.min_speed_level,
                    max: self.max_speed_level,
                });
            }
        }
        Ok(())
    }
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            min_speed_level: 4,
            max_speed_level: 12,
            low_lane_target: 6,
            high_lane_target: 10,
            max_speed_reward: 10.0,
            soft_turn: 1.0,
            hard_turn: 3.0,
            max_steering_angle: 30.0,
            motor_force: 500.0,
            brake_force: 3000.0,
        }
    }
}

/// Timing of the lane-change cycle, in ticks.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LaneChangeConfig {
    /// Inclusive lower bound of the sampled trigger threshold.
    pub trigger_min: u32,
    /// Exclusive upper bound of the sampled trigger threshold.
    pub trigger_max: u32,
    /// Ticks allowed between the trigger and reaching the target lane.
    pub permitted_duration: u32,
    /// How far past the threshold a manual override places the counter.
    pub manual_trigger_lead: u32,
}

impl LaneChangeConfig {
    /// Smallest accepted trigger threshold.
    ///
    /// The counter is 1 on the first tick of a cycle, so any threshold of at
    /// least 2 keeps that tick `Restricted`, both at episode begin and right
    /// after a completed lane change.
    pub const MIN_TRIGGER_THRESHOLD: u32 = 2;

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.trigger_min < Self::MIN_TRIGGER_THRESHOLD {
            return Err(ConfigError::TriggerBelowMinimum {
                min: self.trigger_min,
                minimum: Self::MIN_TRIGGER_THRESHOLD,
            });
        }
        if self.trigger_min >= self.trigger_max {
            return Err(ConfigError::EmptyTriggerRange {
                min: self.trigger_min,
                max: self.trigger_max,
            });
        }
        if self.permitted_duration == 0 {
            return Err(ConfigError::ZeroPermittedDuration);
        }
        if self.manual_trigger_lead >= self.permitted_duration {
            return Err(ConfigError::LeadNotBelowDuration {
                lead: self.manual_trigger_lead,
                duration: self.permitted_duration,
            });
        }
        Ok(())
    }
}

impl Default for LaneChangeConfig {
    fn default() -> Self {
        Self {
            trigger_min: 2,
            trigger_max: 150,
            permitted_duration: 50,
            manual_trigger_lead: 10,
        }
    }
}

/// Reward magnitudes for terminal and milestone events.
///
/// Penalties are stored with their sign and added to the step reward as-is.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RewardConfig {
    /// Reward for reaching the target lane during a lane change.
    pub lane_change_success: f32,
    /// Penalty for leaving the road.
    pub off_road_penalty: f32,
    /// Penalty for exceeding the permitted lane-change duration.
    pub lane_change_failure_penalty: f32,
    /// Penalty for any collision with another vehicle.
    pub collision_penalty: f32,
    /// Extra penalty when the collision happens mid lane change.
    pub lane_change_collision_penalty: f32,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            lane_change_success: 1000.0,
            off_road_penalty: -10000.0,
            lane_change_failure_penalty: -10000.0,
            collision_penalty: -10000.0,
            lane_change_collision_penalty: -10000.0,
        }
    }
}

/// Full environment configuration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EnvConfig {
    pub control: ControlConfig,
    pub lane_change: LaneChangeConfig,
    pub reward: RewardConfig,
    pub actions: ActionLayout,
    /// Table of episode start poses.
    pub start_poses: Vec<StartPose>,
    /// How a start pose is chosen at episode begin.
    pub start_selection: StartPoseSelection,
    /// Whether a cohort restarts ended episodes on its own.
    pub auto_reset: bool,
}

impl EnvConfig {
    /// Number of features in an observation vector.
    pub const OBSERVATION_DIM: usize = 4;

    /// Length of the action vector expected from the harness.
    pub fn action_dim(&self) -> usize {
        self.actions.action_dim()
    }

    /// Checks every section for internally consistent values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.control.validate()?;
        self.lane_change.validate()?;
        self.actions.validate()?;
        if self.start_poses.is_empty() {
            return Err(ConfigError::EmptyStartPoses);
        }
        Ok(())
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            control: ControlConfig::default(),
            lane_change: LaneChangeConfig::default(),
            reward: RewardConfig::default(),
            actions: ActionLayout::default(),
            start_poses: StartPose::scene_defaults(),
            start_selection: StartPoseSelection::Random,
            auto_reset: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lane_change::{LaneChangeCycle, LaneChangeState};

    #[test]
    fn default_config_is_valid() {
        let cfg = EnvConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.action_dim(), 6);
        assert_eq!(cfg.start_poses.len(), 10);
    }

    #[test]
    fn lane_targets() {
        let cfg = ControlConfig::default();
        assert_eq!(cfg.target_for(Lane::Low), 6);
        assert_eq!(cfg.target_for(Lane::High), 10);
    }

    #[test]
    fn rejects_target_outside_speed_range() {
        let cfg = ControlConfig {
            high_lane_target: 20,
            ..ControlConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::TargetOutOfRange { target: 20, .. })
        ));
    }

    #[test]
    fn rejects_zero_threshold_that_fails_on_first_tick() {
        let cfg = LaneChangeConfig {
            trigger_min: 0,
            trigger_max: 1,
            permitted_duration: 1,
            manual_trigger_lead: 0,
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::TriggerBelowMinimum { min: 0, minimum: 2 })
        );
    }

    #[test]
    fn rejects_threshold_that_retriggers_after_success() {
        let cfg = LaneChangeConfig {
            trigger_min: 1,
            trigger_max: 2,
            ..LaneChangeConfig::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::TriggerBelowMinimum { min: 1, minimum: 2 })
        );
    }

    #[test]
    fn smallest_valid_cycle_passes_through_controlled_access() {
        let cfg = LaneChangeConfig {
            trigger_min: 2,
            trigger_max: 3,
            permitted_duration: 1,
            manual_trigger_lead: 0,
        };
        assert!(cfg.validate().is_ok());
        let mut cycle = LaneChangeCycle::with_threshold(cfg, 2);
        assert_eq!(cycle.advance(false).state, LaneChangeState::Restricted);
        assert_eq!(cycle.advance(false).state, LaneChangeState::ControlledAccess);
        assert_eq!(cycle.advance(false).state, LaneChangeState::Failed);
    }

    #[test]
    fn rejects_empty_trigger_range() {
        let cfg = LaneChangeConfig {
            trigger_min: 10,
            trigger_max: 10,
            ..LaneChangeConfig::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::EmptyTriggerRange { min: 10, max: 10 })
        );
    }

    #[test]
    fn rejects_lead_past_duration() {
        let cfg = LaneChangeConfig {
            permitted_duration: 5,
            manual_trigger_lead: 5,
            ..LaneChangeConfig::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::LeadNotBelowDuration {
                lead: 5,
                duration: 5
            })
        );
    }

    #[test]
    fn rejects_empty_start_table() {
        let cfg = EnvConfig {
            start_poses: Vec::new(),
            ..EnvConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::EmptyStartPoses));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn config_json_round_trip() {
        let cfg = EnvConfig::default();
        let json = serde_json::to_string_pretty(&cfg).unwrap();
        let restored: EnvConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg, restored);
    }
}
