//! Episode start poses.

use rand::Rng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::types::{Lane, Vec3};

/// Where and how a vehicle is placed at the start of an episode.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StartPose {
    pub position: Vec3,
    /// Rotation about the vertical axis, in degrees.
    pub yaw_degrees: f32,
    /// Lane the vehicle starts in; also the initial target lane.
    pub lane: Lane,
}

impl StartPose {
    pub const fn new(position: Vec3, yaw_degrees: f32, lane: Lane) -> Self {
        Self {
            position,
            yaw_degrees,
            lane,
        }
    }

    /// The ten start poses placed along the reference track, alternating lanes.
    pub fn scene_defaults() -> Vec<StartPose> {
        vec![
            StartPose::new(Vec3::new(11.552, -8.04, 20.226), 120.0, Lane::Low),
            StartPose::new(Vec3::new(12.262, -8.04, 18.901), 120.0, Lane::High),
            StartPose::new(Vec3::new(15.108, -8.04, 17.932), 120.0, Lane::Low),
            StartPose::new(Vec3::new(15.59, -8.04, 16.499), 150.0, Lane::High),
            StartPose::new(Vec3::new(17.129, -8.04, 15.065), 170.0, Lane::Low),
            StartPose::new(Vec3::new(16.109, -8.04, 12.997), 195.0, Lane::High),
            StartPose::new(Vec3::new(16.066, -8.04, 10.635), 200.0, Lane::Low),
            StartPose::new(Vec3::new(14.76, -8.04, 9.95), 210.0, Lane::High),
            StartPose::new(Vec3::new(14.75, -8.04, 8.45), 210.0, Lane::Low),
            StartPose::new(Vec3::new(13.627, -8.04, 7.775), 205.0, Lane::High),
        ]
    }
}

/// Strategy for picking a start pose at episode begin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StartPoseSelection {
    /// Uniformly random entry every episode.
    #[default]
    Random,
    /// Entry `agent_index % len`, fixed for the agent's lifetime.
    AgentIndex,
}

impl StartPoseSelection {
    /// Returns the index of the chosen pose, or `None` for an empty table.
    pub fn select<R: Rng + ?Sized>(
        &self,
        table_len: usize,
        agent_index: usize,
        rng: &mut R,
    ) -> Option<usize> {
        if table_len == 0 {
            return None;
        }
        Some(match self {
            StartPoseSelection::Random => rng.gen_range(0..table_len),
            StartPoseSelection::AgentIndex => agent_index % table_len,
        })
    }
}
