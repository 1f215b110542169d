//! Lane-change cycle state machine.
//!
//! A cycle starts `Restricted`. Once the tick counter reaches a randomly
//! sampled trigger threshold the vehicle enters `ControlledAccess` and must
//! reach the other lane within the permitted duration, otherwise the cycle
//! ends `Failed`.

use std::fmt;

use rand::Rng;

use crate::config::LaneChangeConfig;

/// Phase of the current lane-change cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LaneChangeState {
    /// Must stay inside the current lane.
    Restricted,
    /// Changing toward the target lane.
    ControlledAccess,
    /// Permitted duration exceeded. Terminal for the cycle.
    Failed,
}

impl fmt::Display for LaneChangeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LaneChangeState::Restricted => write!(f, "restricted"),
            LaneChangeState::ControlledAccess => write!(f, "controlled_access"),
            LaneChangeState::Failed => write!(f, "failed"),
        }
    }
}

/// Outcome of one [`LaneChangeCycle::advance`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub state: LaneChangeState,
    /// True on the tick the cycle enters `ControlledAccess`.
    pub entered_controlled_access: bool,
}

/// Counters and state of one lane-change cycle.
#[derive(Debug, Clone)]
pub struct LaneChangeCycle {
    config: LaneChangeConfig,
    state: LaneChangeState,
    previous_state: LaneChangeState,
    trigger_threshold: u32,
    counter: u32,
}

impl LaneChangeCycle {
    /// Creates a cycle and samples its first trigger threshold.
    pub fn new<R: Rng + ?Sized>(config: LaneChangeConfig, rng: &mut R) -> Self {
        let mut cycle = Self::with_threshold(config, 0);
        cycle.reset(rng);
        cycle
    }

    /// Creates a cycle with a fixed trigger threshold.
    pub fn with_threshold(config: LaneChangeConfig, trigger_threshold: u32) -> Self {
        Self {
            config,
            state: LaneChangeState::Restricted,
            previous_state: LaneChangeState::Restricted,
            trigger_threshold,
            counter: 0,
        }
    }

    /// Starts a new cycle: fresh threshold, counter at zero, `Restricted`.
    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.trigger_threshold = rng.gen_range(self.config.trigger_min..self.config.trigger_max);
        self.counter = 0;
        self.state = LaneChangeState::Restricted;
        self.previous_state = LaneChangeState::Restricted;
    }

    /// Advances the cycle by one tick.
    ///
    /// `manual_override` forces the trigger while still restricted.
    pub fn advance(&mut self, manual_override: bool) -> Transition {
        self.counter = self.counter.saturating_add(1);

        if self.state == LaneChangeState::Restricted && manual_override {
            self.counter = self
                .trigger_threshold
                .saturating_add(self.config.manual_trigger_lead);
        }

        self.state = if self.timed_out() {
            LaneChangeState::Failed
        } else if self.changing_lane() {
            LaneChangeState::ControlledAccess
        } else {
            LaneChangeState::Restricted
        };

        let entered_controlled_access = self.state == LaneChangeState::ControlledAccess
            && self.previous_state != LaneChangeState::ControlledAccess;
        self.previous_state = self.state;

        Transition {
            state: self.state,
            entered_controlled_access,
        }
    }

    /// `counter >= threshold`.
    pub fn changing_lane(&self) -> bool {
        self.counter >= self.trigger_threshold
    }

    /// `counter >= threshold + permitted_duration`.
    pub fn timed_out(&self) -> bool {
        self.counter >= self.timeout_tick()
    }

    /// Tick count at which the cycle fails.
    pub fn timeout_tick(&self) -> u32 {
        self.trigger_threshold
            .saturating_add(self.config.permitted_duration)
    }

    pub fn state(&self) -> LaneChangeState {
        self.state
    }

    pub fn previous_state(&self) -> LaneChangeState {
        self.previous_state
    }

    pub fn trigger_threshold(&self) -> u32 {
        self.trigger_threshold
    }

    pub fn counter(&self) -> u32 {
        self.counter
    }

    pub fn config(&self) -> &LaneChangeConfig {
        &self.config
    }
}
