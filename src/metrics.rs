//! Evaluation metrics for the driving environment.
//!
//! Collects episode-level statistics from step results and aggregates them
//! over an evaluation run.

use std::fmt;

use crate::agent::{StepResult, Termination};
use crate::body::VehicleBody;
use crate::cohort::Cohort;
use crate::error::EnvError;
use crate::policy::Policy;
use crate::presentation::LaneChangePresenter;
use crate::reward::TickEvent;

/// Aggregated metrics over every episode that ended during a run.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationMetrics {
    /// Number of completed episodes.
    pub n_episodes: usize,
    /// Mean cumulative reward per episode.
    pub mean_episode_reward: f64,
    /// Mean episode length in ticks.
    pub mean_episode_ticks: f64,
    /// Lane changes completed across all agents.
    pub lane_changes_completed: u32,
    /// Episodes ended by leaving the road or the lane.
    pub off_road_ends: u32,
    /// Episodes ended by a lane-change timeout.
    pub timeout_ends: u32,
    /// Episodes ended by a collision.
    pub collision_ends: u32,
    /// Episodes ended because another cohort member raised the signal.
    pub cohort_ends: u32,
}

/// Accumulates step results into [`EvaluationMetrics`].
#[derive(Debug, Clone, Default)]
pub struct EpisodeRecorder {
    episode_rewards: Vec<f64>,
    episode_ticks: Vec<u32>,
    lane_changes_completed: u32,
    off_road_ends: u32,
    timeout_ends: u32,
    collision_ends: u32,
    cohort_ends: u32,
}

impl EpisodeRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one agent's step.
    pub fn record(&mut self, result: &StepResult) {
        if result.event == TickEvent::LaneChangeCompleted {
            self.lane_changes_completed += 1;
        }
        let Some(cause) = result.termination else {
            return;
        };
        self.episode_rewards.push(result.cumulative_reward as f64);
        self.episode_ticks.push(result.episode_ticks);
        match cause {
            Termination::Raised(TickEvent::LaneChangeFailed) => self.timeout_ends += 1,
            Termination::Raised(_) => self.off_road_ends += 1,
            Termination::Collision => self.collision_ends += 1,
            Termination::Cohort => self.cohort_ends += 1,
        }
    }

    /// Records a whole cohort tick.
    pub fn record_all(&mut self, results: &[StepResult]) {
        for result in results {
            self.record(result);
        }
    }

    pub fn episodes(&self) -> usize {
        self.episode_rewards.len()
    }

    /// Aggregates what has been recorded so far.
    pub fn summary(&self) -> EvaluationMetrics {
        let n = self.episode_rewards.len();
        let mean = |sum: f64| if n > 0 { sum / n as f64 } else { 0.0 };
        EvaluationMetrics {
            n_episodes: n,
            mean_episode_reward: mean(self.episode_rewards.iter().sum()),
            mean_episode_ticks: mean(self.episode_ticks.iter().map(|&t| t as f64).sum()),
            lane_changes_completed: self.lane_changes_completed,
            off_road_ends: self.off_road_ends,
            timeout_ends: self.timeout_ends,
            collision_ends: self.collision_ends,
            cohort_ends: self.cohort_ends,
        }
    }
}

impl EvaluationMetrics {
    /// Runs `policy` on `cohort` for `ticks` ticks and aggregates the episodes
    /// that ended.
    ///
    /// The cohort should auto-reset; otherwise ended agents keep stepping in
    /// their finished episode.
    pub fn evaluate<B, P>(
        cohort: &mut Cohort<B, P>,
        policy: &mut dyn Policy,
        ticks: usize,
    ) -> Result<Self, EnvError>
    where
        B: VehicleBody,
        P: LaneChangePresenter,
    {
        let mut recorder = EpisodeRecorder::new();
        let mut obs = cohort.observations();
        for _ in 0..ticks {
            let actions = policy.select_actions(&obs);
            let results = cohort.step(&actions)?;
            recorder.record_all(&results);
            obs = cohort.observations();
        }
        Ok(recorder.summary())
    }
}

impl fmt::Display for EvaluationMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "=== Evaluation Metrics ({} episodes) ===",
            self.n_episodes
        )?;
        writeln!(
            f,
            "  Mean episode reward:     {:.2}",
            self.mean_episode_reward
        )?;
        writeln!(
            f,
            "  Mean episode length:     {:.1}",
            self.mean_episode_ticks
        )?;
        writeln!(
            f,
            "  Lane changes completed:  {}",
            self.lane_changes_completed
        )?;
        writeln!(f, "  Off-road ends:           {}", self.off_road_ends)?;
        writeln!(f, "  Timeout ends:            {}", self.timeout_ends)?;
        writeln!(f, "  Collision ends:          {}", self.collision_ends)?;
        writeln!(f, "  Cohort ends:             {}", self.cohort_ends)
    }
}
