//! Action decoding for the training harness.
//!
//! The harness emits a continuous action vector per agent. Fixed sub-ranges of
//! that vector are reduced by arg-max to discrete turn and motor commands.

use std::ops::Range;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Value written into the selected slot by [`heuristic_actions`].
const HEURISTIC_ACTION_VALUE: f32 = 10.0;

/// Discrete steering command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TurnCommand {
    Straight,
    SoftLeft,
    SoftRight,
    HardLeft,
    HardRight,
}

impl TurnCommand {
    /// Decodes a slot index within the turn sub-range.
    ///
    /// Returns `None` for unrecognized indices, which callers treat as a no-op.
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(TurnCommand::Straight),
            1 => Some(TurnCommand::SoftLeft),
            2 => Some(TurnCommand::SoftRight),
            3 => Some(TurnCommand::HardLeft),
            4 => Some(TurnCommand::HardRight),
            _ => None,
        }
    }
}

/// Discrete speed command used by dual-control layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MotorCommand {
    Hold,
    Decelerate,
    Accelerate,
}

impl MotorCommand {
    /// Decodes a slot index within the motor sub-range.
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(MotorCommand::Hold),
            1 => Some(MotorCommand::Decelerate),
            2 => Some(MotorCommand::Accelerate),
            _ => None,
        }
    }
}

/// Discrete commands decoded from one action vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecodedAction {
    pub turn: Option<TurnCommand>,
    pub motor: Option<MotorCommand>,
}

/// Placement of the turn and motor sub-ranges inside the action vector.
///
/// When `motor` is `None` the agent runs in speed-tracking mode: the speed
/// level follows the lane target on its own and only steering is learned.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ActionLayout {
    pub turn: Range<usize>,
    pub motor: Option<Range<usize>>,
}

impl ActionLayout {
    /// Steering only: three turn slots.
    pub fn steering_only() -> Self {
        Self {
            turn: 0..3,
            motor: None,
        }
    }

    /// Steering and speed: turn slots `[0, 3)`, motor slots `[3, 6)`.
    pub fn dual() -> Self {
        Self {
            turn: 0..3,
            motor: Some(3..6),
        }
    }

    /// Total length of the action vector.
    pub fn action_dim(&self) -> usize {
        let motor_end = self.motor.as_ref().map(|m| m.end).unwrap_or(0);
        self.turn.end.max(motor_end)
    }

    /// Whether speed is driven by explicit motor commands.
    pub fn is_dual(&self) -> bool {
        self.motor.is_some()
    }

    /// Checks that the turn range is non-empty and does not overlap the motor range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.turn.is_empty() {
            return Err(ConfigError::EmptyTurnRange);
        }
        if let Some(motor) = &self.motor {
            if motor.start < self.turn.end && self.turn.start < motor.end {
                return Err(ConfigError::OverlappingActionRanges);
            }
        }
        Ok(())
    }

    /// Reduces an action vector to discrete commands.
    ///
    /// A sub-range that does not fit inside `actions` decodes to `None`.
    pub fn decode(&self, actions: &[f32]) -> DecodedAction {
        let turn = arg_max(actions, &self.turn).and_then(TurnCommand::from_index);
        let motor = self
            .motor
            .as_ref()
            .and_then(|range| arg_max(actions, range))
            .and_then(MotorCommand::from_index);
        DecodedAction { turn, motor }
    }
}

impl Default for ActionLayout {
    fn default() -> Self {
        Self::dual()
    }
}

/// Index (relative to `range.start`) of the largest value in `actions[range]`.
///
/// Ties resolve to the first maximum. NaN entries never win; a range made
/// only of NaN yields `None`.
pub fn arg_max(actions: &[f32], range: &Range<usize>) -> Option<usize> {
    let slice = actions.get(range.clone())?;
    let mut best: Option<(usize, f32)> = None;
    for (i, &v) in slice.iter().enumerate() {
        if v.is_nan() {
            continue;
        }
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

/// Operator input used in interactive/heuristic mode.
///
/// Replaces direct device polling so runs stay reproducible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ManualInput {
    /// -1 = steer left, 1 = steer right, 0 = none.
    pub horizontal: i8,
    /// -1 = decelerate, 1 = accelerate, 0 = none.
    pub vertical: i8,
    /// Forces an immediate lane-change trigger while restricted.
    pub force_lane_change: bool,
    /// Holds the brake during the physics update.
    pub brake: bool,
}

impl ManualInput {
    /// No keys held.
    pub fn none() -> Self {
        Self::default()
    }
}

/// Builds an action vector that reproduces `input` under `layout`.
pub fn heuristic_actions(layout: &ActionLayout, input: &ManualInput) -> Vec<f32> {
    let mut actions = vec![0.0; layout.action_dim()];
    let turn_slot = match input.horizontal.signum() {
        -1 => Some(1),
        1 => Some(2),
        _ => None,
    };
    if let Some(slot) = turn_slot {
        if let Some(v) = actions.get_mut(layout.turn.start + slot) {
            *v = HEURISTIC_ACTION_VALUE;
        }
    }
    if let Some(motor) = &layout.motor {
        let motor_slot = match input.vertical.signum() {
            -1 => Some(1),
            1 => Some(2),
            _ => None,
        };
        if let Some(slot) = motor_slot {
            if let Some(v) = actions.get_mut(motor.start + slot) {
                *v = HEURISTIC_ACTION_VALUE;
            }
        }
    }
    actions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arg_max_picks_first_maximum() {
        assert_eq!(arg_max(&[0.1, 0.9, 0.9], &(0..3)), Some(1));
        assert_eq!(arg_max(&[0.0, 0.0, 0.0], &(0..3)), Some(0));
    }

    #[test]
    fn arg_max_is_relative_to_range() {
        let actions = [5.0, 0.0, 0.0, 0.1, 0.2, 0.7];
        assert_eq!(arg_max(&actions, &(3..6)), Some(2));
    }

    #[test]
    fn arg_max_ignores_nan() {
        assert_eq!(arg_max(&[f32::NAN, 0.2, 0.1], &(0..3)), Some(1));
        assert_eq!(arg_max(&[f32::NAN, f32::NAN], &(0..2)), None);
    }

    #[test]
    fn arg_max_out_of_bounds_is_none() {
        assert_eq!(arg_max(&[1.0, 2.0], &(0..3)), None);
    }

    #[test]
    fn decode_dual_layout() {
        let layout = ActionLayout::dual();
        let decoded = layout.decode(&[0.0, 1.0, 0.0, 0.0, 0.0, 1.0]);
        assert_eq!(decoded.turn, Some(TurnCommand::SoftLeft));
        assert_eq!(decoded.motor, Some(MotorCommand::Accelerate));
    }

    #[test]
    fn decode_short_vector_is_noop() {
        let layout = ActionLayout::dual();
        let decoded = layout.decode(&[0.0, 1.0, 0.0]);
        assert_eq!(decoded.turn, Some(TurnCommand::SoftLeft));
        assert_eq!(decoded.motor, None);
        assert_eq!(layout.decode(&[]), DecodedAction::default());
    }

    #[test]
    fn unknown_indices_decode_to_none() {
        assert_eq!(TurnCommand::from_index(5), None);
        assert_eq!(MotorCommand::from_index(3), None);
    }

    #[test]
    fn wide_turn_range_reaches_hard_turns() {
        let layout = ActionLayout {
            turn: 0..5,
            motor: None,
        };
        let decoded = layout.decode(&[0.0, 0.0, 0.0, 0.0, 1.0]);
        assert_eq!(decoded.turn, Some(TurnCommand::HardRight));
    }

    #[test]
    fn layout_validation() {
        assert!(ActionLayout::dual().validate().is_ok());
        let overlapping = ActionLayout {
            turn: 0..3,
            motor: Some(2..5),
        };
        assert_eq!(
            overlapping.validate(),
            Err(ConfigError::OverlappingActionRanges)
        );
        let empty = ActionLayout {
            turn: 0..0,
            motor: None,
        };
        assert_eq!(empty.validate(), Err(ConfigError::EmptyTurnRange));
    }

    #[test]
    fn heuristic_actions_round_trip_through_decode() {
        let layout = ActionLayout::dual();
        let input = ManualInput {
            horizontal: -1,
            vertical: 1,
            ..ManualInput::none()
        };
        let actions = heuristic_actions(&layout, &input);
        assert_eq!(actions.len(), 6);
        let decoded = layout.decode(&actions);
        assert_eq!(decoded.turn, Some(TurnCommand::SoftLeft));
        assert_eq!(decoded.motor, Some(MotorCommand::Accelerate));
    }

    #[test]
    fn heuristic_without_keys_goes_straight() {
        let layout = ActionLayout::steering_only();
        let actions = heuristic_actions(&layout, &ManualInput::none());
        assert_eq!(
            layout.decode(&actions).turn,
            Some(TurnCommand::Straight)
        );
    }
}
