//! Episode and lane-change coordinator for a single vehicle.
//!
//! Each tick: decode the action vector, command the vehicle, advance the
//! lane-change cycle, score the tick against the wheel contacts, and check the
//! cohort's termination signal.
//!
//! # Lifecycle
//!
//! 1. Build with [`AgentBuilder`]; the first episode begins immediately.
//! 2. Call [`DrivingAgent::on_action_received`] once per tick.
//! 3. When a [`StepResult`] reports `episode_ended`, call
//!    [`DrivingAgent::on_episode_begin`].


use std::fmt;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use crate::action::{heuristic_actions, ManualInput};
use crate::body::VehicleBody;
use crate::config::EnvConfig;
use crate::control::VehicleControl;
use crate::error::EnvError;
use crate::lane_change::{LaneChangeCycle, LaneChangeState};
use crate::observation::ObservationBuilder;
use crate::presentation::{LaneChangePresenter, NoopPresenter};
use crate::reward::{RewardComputer, TickEvent};
use crate::sensors::FrontContacts;
use crate::signal::{ShutdownSignal, SignalWatcher};
use crate::types::{Lane, Wheel};
use crate::{generate_id, Id};

/// Why an episode ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Termination {
    /// This agent raised the signal on this tick.
    Raised(TickEvent),
    /// This agent collided with another vehicle.
    Collision,
    /// Another cohort member raised the signal.
    Cohort,
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Termination::Raised(event) => write!(f, "{}", event),
            Termination::Collision => write!(f, "collision"),
            Termination::Cohort => write!(f, "cohort"),
        }
    }
}

/// Result of a single agent step.
#[derive(Debug, Clone)]
pub struct StepResult {
    /// Observation after the step.
    pub observation: Vec<f32>,
    /// Reward for this tick, including queued collision penalties.
    pub reward: f32,
    /// Sum of rewards since the episode began.
    pub cumulative_reward: f32,
    /// Lane-change state after the transition.
    pub state: LaneChangeState,
    /// What the reward policy saw on this tick.
    pub event: TickEvent,
    /// Whether the episode ended on this tick.
    pub episode_ended: bool,
    /// Cause of the end, if it ended.
    pub termination: Option<Termination>,
    /// Ticks elapsed in the episode, including this one.
    pub episode_ticks: u32,
}

/// Per-episode counters.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EpisodeStats {
    pub ticks: u32,
    pub cumulative_reward: f32,
    pub lane_changes_completed: u32,
}

/// Builder for [`DrivingAgent`].
///
/// The vehicle body and the shutdown signal are required collaborators;
/// [`AgentBuilder::build`] fails fast when either is missing.
pub struct AgentBuilder<B, P = NoopPresenter> {
    config: EnvConfig,
    body: Option<B>,
    presenter: P,
    signal: Option<ShutdownSignal>,
    seed: Option<u64>,
    index: usize,
}

impl<B: VehicleBody> AgentBuilder<B, NoopPresenter> {
    pub fn new(config: EnvConfig) -> Self {
        Self {
            config,
            body: None,
            presenter: NoopPresenter,
            signal: None,
            seed: None,
            index: 0,
        }
    }
}

impl<B: VehicleBody, P: LaneChangePresenter> AgentBuilder<B, P> {
    pub fn body(mut self, body: B) -> Self {
        self.body = Some(body);
        self
    }

    pub fn signal(mut self, signal: ShutdownSignal) -> Self {
        self.signal = Some(signal);
        self
    }

    /// Seeds the agent's RNG. Without a seed the RNG is seeded from entropy.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Position of the agent in its cohort; used by index-based start poses.
    pub fn index(mut self, index: usize) -> Self {
        self.index = index;
        self
    }

    pub fn presenter<Q: LaneChangePresenter>(self, presenter: Q) -> AgentBuilder<B, Q> {
        AgentBuilder {
            config: self.config,
            body: self.body,
            presenter,
            signal: self.signal,
            seed: self.seed,
            index: self.index,
        }
    }

    /// Validates the configuration, wires the collaborators, and begins the
    /// first episode.
    pub fn build(self) -> Result<DrivingAgent<B, P>, EnvError> {
        self.config.validate()?;
        let body = self
            .body
            .ok_or(EnvError::MissingCollaborator("vehicle body"))?;
        let signal = self
            .signal
            .ok_or(EnvError::MissingCollaborator("shutdown signal"))?;

        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let cycle = LaneChangeCycle::new(self.config.lane_change.clone(), &mut rng);
        let control = VehicleControl::new(self.config.control.clone());
        let watcher = SignalWatcher::attach(&signal);

        let mut agent = DrivingAgent {
            id: generate_id(),
            index: self.index,
            config: self.config,
            body,
            presenter: self.presenter,
            control,
            cycle,
            current_lane: Lane::Low,
            target_lane: Lane::Low,
            signal,
            watcher,
            rng,
            pending_collision_penalty: None,
            unreported_collision: false,
            stats: EpisodeStats::default(),
            episodes_started: 0,
        };
        agent.on_episode_begin();
        Ok(agent)
    }
}

/// One vehicle's lane-change coordinator.
pub struct DrivingAgent<B, P = NoopPresenter> {
    id: Id,
    index: usize,
    config: EnvConfig,
    body: B,
    presenter: P,
    control: VehicleControl,
    cycle: LaneChangeCycle,
    current_lane: Lane,
    target_lane: Lane,
    signal: ShutdownSignal,
    watcher: SignalWatcher,
    rng: StdRng,
    /// Collision penalty queued for the next step.
    pending_collision_penalty: Option<f32>,
    /// Set by a collision until an episode end has been reported for it.
    unreported_collision: bool,
    stats: EpisodeStats,
    episodes_started: u64,
}

impl<B: VehicleBody, P: LaneChangePresenter> DrivingAgent<B, P> {
    /// Reinitializes all per-episode state.
    ///
    /// Places the body at a start pose, resets speed and steering to the start
    /// lane, starts a fresh lane-change cycle, and drops any queued collision
    /// penalty. The remembered signal value is kept, and so is the fact that
    /// this agent collided: the end its collision causes on the next step is
    /// still reported as [`Termination::Collision`], without the penalty.
    pub fn on_episode_begin(&mut self) {
        self.body.reset_velocity();
        for wheel in Wheel::front() {
            self.body.set_steer_angle(wheel, 0.0);
        }

        let selected = self
            .config
            .start_selection
            .select(self.config.start_poses.len(), self.index, &mut self.rng)
            .and_then(|i| self.config.start_poses.get(i).copied());
        let lane = match selected {
            Some(pose) => {
                self.body.set_pose(&pose);
                pose.lane
            }
            None => Lane::Low,
        };

        self.current_lane = lane;
        self.target_lane = lane;
        self.control.reset(lane);
        self.cycle.reset(&mut self.rng);
        self.pending_collision_penalty = None;
        self.stats = EpisodeStats::default();
        self.episodes_started += 1;

        self.presenter
            .on_lane_change_visual_update(self.cycle.state(), self.target_lane);

        info!(
            agent = %self.id,
            episode = self.episodes_started,
            lane = %lane,
            trigger = self.cycle.trigger_threshold(),
            "episode begin"
        );
    }

    /// Processes one action vector against the live signal value.
    pub fn on_action_received(&mut self, actions: &[f32], input: &ManualInput) -> StepResult {
        self.step(actions, input, None)
    }

    /// Processes one action vector against a signal value observed at the
    /// start of the cohort's tick.
    pub(crate) fn on_action_received_at(
        &mut self,
        actions: &[f32],
        input: &ManualInput,
        observed_signal: u64,
    ) -> StepResult {
        self.step(actions, input, Some(observed_signal))
    }

    fn step(
        &mut self,
        actions: &[f32],
        input: &ManualInput,
        observed_signal: Option<u64>,
    ) -> StepResult {
        let decoded = self.config.actions.decode(actions);
        if self.config.actions.is_dual() {
            self.control
                .set_dual_command(decoded.turn, decoded.motor, self.current_lane);
        } else {
            self.control.set_command(decoded.turn, self.current_lane);
        }

        let transition = self.cycle.advance(input.force_lane_change);
        if transition.entered_controlled_access {
            self.target_lane = self.target_lane.other();
            self.presenter
                .on_lane_change_visual_update(transition.state, self.target_lane);
            debug!(
                agent = %self.id,
                tick = self.cycle.counter(),
                target = %self.target_lane,
                "lane change triggered"
            );
        }

        let contacts = FrontContacts::read(&self.body);
        let outcome = RewardComputer::evaluate(
            transition.state,
            &contacts,
            self.target_lane,
            self.control.reward(),
            &self.config.reward,
        );

        let mut raised = None;
        match outcome.event {
            TickEvent::LaneChangeCompleted => {
                self.cycle.reset(&mut self.rng);
                self.current_lane = self.target_lane;
                self.stats.lane_changes_completed += 1;
                info!(
                    agent = %self.id,
                    lane = %self.current_lane,
                    next_trigger = self.cycle.trigger_threshold(),
                    "lane change completed"
                );
            }
            event if event.is_terminal() => {
                let value = self.signal.raise();
                warn!(agent = %self.id, %event, signal = value, "raising shutdown signal");
                raised = Some(value);
            }
            _ => {}
        }

        let collision_penalty = self.pending_collision_penalty.take();
        let reward = outcome.reward + collision_penalty.unwrap_or(0.0);
        self.stats.ticks += 1;
        self.stats.cumulative_reward += reward;

        let termination = match raised {
            Some(value) => {
                self.watcher.observe(value);
                Some(Termination::Raised(outcome.event))
            }
            None => {
                let observed = observed_signal.unwrap_or_else(|| self.signal.value());
                if self.watcher.observe(observed) {
                    Some(if collision_penalty.is_some() || self.unreported_collision {
                        Termination::Collision
                    } else {
                        Termination::Cohort
                    })
                } else {
                    None
                }
            }
        };

        if let Some(cause) = termination {
            self.unreported_collision = false;
            info!(
                agent = %self.id,
                %cause,
                ticks = self.stats.ticks,
                reward = self.stats.cumulative_reward,
                "episode end"
            );
        }

        StepResult {
            observation: self.collect_observations(),
            reward,
            cumulative_reward: self.stats.cumulative_reward,
            state: transition.state,
            event: outcome.event,
            episode_ended: termination.is_some(),
            termination,
            episode_ticks: self.stats.ticks,
        }
    }

    /// Reports a collision with another vehicle.
    ///
    /// Raises the signal at once; the penalty and the episode end land on the
    /// agent's next step, together with the rest of the cohort.
    pub fn on_collision(&mut self) {
        let penalty = RewardComputer::collision_penalty(self.cycle.state(), &self.config.reward);
        let queued = self.pending_collision_penalty.unwrap_or(0.0) + penalty;
        self.pending_collision_penalty = Some(queued);
        self.unreported_collision = true;
        let value = self.signal.raise();
        warn!(agent = %self.id, state = %self.cycle.state(), signal = value, "collision");
    }

    /// Pushes actuator targets to the body for one physics tick.
    pub fn fixed_update(&mut self, brake_held: bool) {
        self.control.physics_update(&mut self.body, brake_held);
    }

    pub fn collect_observations(&self) -> Vec<f32> {
        ObservationBuilder::build(&self.control, &self.cycle, self.current_lane)
    }

    /// Action vector reproducing operator input.
    pub fn heuristic(&self, input: &ManualInput) -> Vec<f32> {
        heuristic_actions(&self.config.actions, input)
    }

    /// Forgets the remembered signal value and resynchronizes with the signal.
    pub(crate) fn resync_signal(&mut self) {
        self.watcher = SignalWatcher::attach(&self.signal);
        self.unreported_collision = false;
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn config(&self) -> &EnvConfig {
        &self.config
    }

    pub fn current_lane(&self) -> Lane {
        self.current_lane
    }

    pub fn target_lane(&self) -> Lane {
        self.target_lane
    }

    pub fn lane_change_state(&self) -> LaneChangeState {
        self.cycle.state()
    }

    pub fn cycle(&self) -> &LaneChangeCycle {
        &self.cycle
    }

    pub fn control(&self) -> &VehicleControl {
        &self.control
    }

    pub fn body(&self) -> &B {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut B {
        &mut self.body
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn signal(&self) -> &ShutdownSignal {
        &self.signal
    }

    /// Last signal value this agent acted on.
    pub fn remembered_signal(&self) -> u64 {
        self.watcher.remembered()
    }

    pub fn episode_stats(&self) -> EpisodeStats {
        self.stats
    }

    pub fn episodes_started(&self) -> u64 {
        self.episodes_started
    }
}
