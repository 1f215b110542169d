//! Per-tick reward policy.
//!
//! Combines the lane-change state with the front-wheel contacts to decide the
//! step reward and whether the tick ends the cohort's episodes.

use std::fmt;

use crate::config::RewardConfig;
use crate::lane_change::LaneChangeState;
use crate::sensors::FrontContacts;
use crate::types::{Lane, Surface};

/// What happened on a tick, as far as reward is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TickEvent {
    /// Normal driving; rewarded by speed tracking.
    Driving,
    /// Both wheels reached the target lane during a lane change.
    LaneChangeCompleted,
    /// A wheel touched terrain during a lane change.
    OffRoad,
    /// Drifted out of the lane while restricted.
    LeftLane,
    /// The permitted lane-change duration elapsed.
    LaneChangeFailed,
}

impl TickEvent {
    /// Whether the event raises the cohort's termination signal.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TickEvent::OffRoad | TickEvent::LeftLane | TickEvent::LaneChangeFailed
        )
    }
}

impl fmt::Display for TickEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TickEvent::Driving => write!(f, "driving"),
            TickEvent::LaneChangeCompleted => write!(f, "lane_change_completed"),
            TickEvent::OffRoad => write!(f, "off_road"),
            TickEvent::LeftLane => write!(f, "left_lane"),
            TickEvent::LaneChangeFailed => write!(f, "lane_change_failed"),
        }
    }
}

/// Reward and event for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickOutcome {
    pub reward: f32,
    pub event: TickEvent,
}

/// Computes rewards for the driving environment.
pub struct RewardComputer;

impl RewardComputer {
    /// Evaluates the tick after the lane-change transition.
    ///
    /// # Rules
    ///
    /// 1. `ControlledAccess` and fully inside the target lane: success bonus.
    /// 2. `ControlledAccess` and touching terrain: off-road penalty.
    /// 3. `Failed`: failure penalty.
    /// 4. `Restricted` and not fully inside the target lane: off-road penalty.
    /// 5. Otherwise: `speed_reward` from the control interface.
    pub fn evaluate(
        state: LaneChangeState,
        contacts: &FrontContacts,
        target_lane: Lane,
        speed_reward: f32,
        config: &RewardConfig,
    ) -> TickOutcome {
        let in_target = contacts.is_only_touching(Surface::Lane(target_lane));
        let (reward, event) = match state {
            LaneChangeState::ControlledAccess if in_target => {
                (config.lane_change_success, TickEvent::LaneChangeCompleted)
            }
            LaneChangeState::ControlledAccess if contacts.is_touching(Surface::Terrain) => {
                (config.off_road_penalty, TickEvent::OffRoad)
            }
            LaneChangeState::ControlledAccess => (speed_reward, TickEvent::Driving),
            LaneChangeState::Failed => {
                (config.lane_change_failure_penalty, TickEvent::LaneChangeFailed)
            }
            LaneChangeState::Restricted if !in_target => {
                (config.off_road_penalty, TickEvent::LeftLane)
            }
            LaneChangeState::Restricted => (speed_reward, TickEvent::Driving),
        };
        TickOutcome { reward, event }
    }

    /// Penalty for a collision with another vehicle in `state`.
    pub fn collision_penalty(state: LaneChangeState, config: &RewardConfig) -> f32 {
        match state {
            LaneChangeState::ControlledAccess => {
                config.collision_penalty + config.lane_change_collision_penalty
            }
            _ => config.collision_penalty,
        }
    }
}
