//! A pool of agents stepped together against one termination signal.
//!
//! Each tick the cohort snapshots the signal once, steps every agent in order
//! against that snapshot, runs their physics updates, and restarts the
//! episodes that ended. A signal raised during tick N therefore ends the
//! other agents' episodes on tick N + 1 regardless of stepping order.

use tracing::{debug, info};

use crate::action::ManualInput;
use crate::agent::{AgentBuilder, DrivingAgent, StepResult};
use crate::body::VehicleBody;
use crate::config::EnvConfig;
use crate::error::EnvError;
use crate::presentation::{LaneChangePresenter, NoopPresenter};
use crate::signal::ShutdownSignal;

/// Agents sharing one [`ShutdownSignal`].
pub struct Cohort<B, P = NoopPresenter> {
    agents: Vec<DrivingAgent<B, P>>,
    signal: ShutdownSignal,
    auto_reset: bool,
    tick: u64,
}

impl<B: VehicleBody> Cohort<B, NoopPresenter> {
    /// Builds one agent per body. Agent `i` is seeded with `seed + i`.
    pub fn new(config: EnvConfig, bodies: Vec<B>, seed: u64) -> Result<Self, EnvError> {
        Self::with_presenters(
            config,
            bodies.into_iter().map(|b| (b, NoopPresenter)).collect(),
            seed,
        )
    }
}

impl<B: VehicleBody, P: LaneChangePresenter> Cohort<B, P> {
    /// Builds one agent per `(body, presenter)` pair.
    pub fn with_presenters(
        config: EnvConfig,
        members: Vec<(B, P)>,
        seed: u64,
    ) -> Result<Self, EnvError> {
        let signal = ShutdownSignal::new();
        let auto_reset = config.auto_reset;
        let agents = members
            .into_iter()
            .enumerate()
            .map(|(i, (body, presenter))| {
                AgentBuilder::new(config.clone())
                    .body(body)
                    .presenter(presenter)
                    .signal(signal.clone())
                    .seed(seed.wrapping_add(i as u64))
                    .index(i)
                    .build()
            })
            .collect::<Result<Vec<_>, _>>()?;

        info!(agents = agents.len(), "cohort ready");
        Ok(Self {
            agents,
            signal,
            auto_reset,
            tick: 0,
        })
    }

    /// Steps every agent without operator input.
    pub fn step(&mut self, actions: &[Vec<f32>]) -> Result<Vec<StepResult>, EnvError> {
        self.step_with_input(actions, &[])
    }

    /// Steps every agent once.
    ///
    /// `inputs[i]` is agent `i`'s operator input; missing entries mean no
    /// keys held.
    pub fn step_with_input(
        &mut self,
        actions: &[Vec<f32>],
        inputs: &[ManualInput],
    ) -> Result<Vec<StepResult>, EnvError> {
        if actions.len() != self.agents.len() {
            return Err(EnvError::ActionCountMismatch {
                expected: self.agents.len(),
                actual: actions.len(),
            });
        }

        let observed = self.signal.value();
        let mut results = Vec::with_capacity(self.agents.len());
        for (i, agent) in self.agents.iter_mut().enumerate() {
            let input = inputs.get(i).copied().unwrap_or_default();
            let result = agent.on_action_received_at(&actions[i], &input, observed);
            agent.fixed_update(input.brake);
            if result.episode_ended && self.auto_reset {
                agent.on_episode_begin();
            }
            results.push(result);
        }

        self.tick += 1;
        let ended = results.iter().filter(|r| r.episode_ended).count();
        if ended > 0 {
            debug!(tick = self.tick, ended, signal = self.signal.value(), "episodes ended");
        }
        Ok(results)
    }

    /// Reports a collision of agent `index` with another vehicle.
    ///
    /// Out-of-range indices are ignored.
    pub fn report_collision(&mut self, index: usize) {
        if let Some(agent) = self.agents.get_mut(index) {
            agent.on_collision();
        }
    }

    /// Current observation of every agent.
    pub fn observations(&self) -> Vec<Vec<f32>> {
        self.agents
            .iter()
            .map(|a| a.collect_observations())
            .collect()
    }

    /// Begins a new episode for every agent and returns the observations.
    ///
    /// The signal is left untouched, so a restart requested earlier still ends
    /// the new episodes on the next tick.
    pub fn reset_all(&mut self) -> Vec<Vec<f32>> {
        for agent in &mut self.agents {
            agent.on_episode_begin();
        }
        self.observations()
    }

    /// Clears the signal, resynchronizes every agent with it, and begins new
    /// episodes. Returns the observations.
    pub fn restart(&mut self) -> Vec<Vec<f32>> {
        self.signal.reset();
        for agent in &mut self.agents {
            agent.resync_signal();
        }
        self.tick = 0;
        info!("cohort restarted");
        self.reset_all()
    }

    pub fn agents(&self) -> &[DrivingAgent<B, P>] {
        &self.agents
    }

    pub fn agents_mut(&mut self) -> &mut [DrivingAgent<B, P>] {
        &mut self.agents
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn signal(&self) -> &ShutdownSignal {
        &self.signal
    }

    /// Ticks stepped since construction or the last restart.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Length of the action vector each agent expects.
    pub fn action_dim(&self) -> usize {
        self.agents
            .first()
            .map(|a| a.config().action_dim())
            .unwrap_or(0)
    }
}
