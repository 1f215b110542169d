//! lanechange - lane-keeping and lane-change training environment
//!
//! The environment core of a driving simulation used to train an agent to
//! keep its lane, change lanes on cue, and avoid collisions. Vehicle physics
//! and rendering stay outside; this crate owns the command mapping, the
//! lane-change state machine, the reward policy, and cohort-wide episode
//! termination.

pub mod action;
pub mod agent;
pub mod body;
pub mod cohort;
pub mod config;
pub mod control;
pub mod error;
pub mod lane_change;
pub mod metrics;
pub mod observation;
pub mod policy;
pub mod presentation;
pub mod reward;
pub mod sensors;
pub mod signal;
pub mod start_pose;
pub mod types;

pub use action::{ActionLayout, ManualInput, MotorCommand, TurnCommand};
pub use agent::{AgentBuilder, DrivingAgent, EpisodeStats, StepResult, Termination};
pub use body::{GroundHit, ScriptedBody, VehicleBody};
pub use cohort::Cohort;
pub use config::{ControlConfig, EnvConfig, LaneChangeConfig, RewardConfig};
pub use control::VehicleControl;
pub use error::{ConfigError, EnvError};
pub use lane_change::{LaneChangeCycle, LaneChangeState, Transition};
pub use metrics::{EpisodeRecorder, EvaluationMetrics};
pub use policy::{LaneKeepingPolicy, Policy, RandomPolicy};
pub use presentation::{LaneChangePresenter, NoopPresenter};
pub use reward::{RewardComputer, TickEvent};
pub use signal::{ShutdownSignal, SignalWatcher};
pub use start_pose::{StartPose, StartPoseSelection};
pub use types::{Lane, Surface, Vec3, Wheel};

/// Identifier type used for agents.
pub type Id = String;

/// Generates a new unique identifier (UUID v4).
pub fn generate_id() -> Id {
    uuid::Uuid::new_v4().to_string()
}
