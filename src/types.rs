//! Core types shared by the control interface and the lane-change coordinator.
//!
//! Defines the two-lane road model, the surfaces a wheel can rest on, wheel
//! positions, and a minimal 3D vector for poses.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One of the two parallel lanes of the road.
///
/// `Low` is the slow lane (scene "lane 1"), `High` the fast lane ("lane 2").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Lane {
    Low,
    High,
}

impl Lane {
    /// Returns the other lane.
    pub fn other(&self) -> Lane {
        match self {
            Lane::Low => Lane::High,
            Lane::High => Lane::Low,
        }
    }

    /// Binary flag used in observations (0 = low, 1 = high).
    pub fn flag(&self) -> f32 {
        match self {
            Lane::Low => 0.0,
            Lane::High => 1.0,
        }
    }

    /// Returns both lanes in order.
    pub fn all() -> [Lane; 2] {
        [Lane::Low, Lane::High]
    }
}

impl fmt::Display for Lane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lane::Low => write!(f, "low"),
            Lane::High => write!(f, "high"),
        }
    }
}

/// Ground region a wheel probe can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Surface {
    /// The paved region of a lane.
    Lane(Lane),
    /// Off-road terrain surrounding the road.
    Terrain,
    /// Any other collider (ramps, props, other vehicles' bodies).
    Other,
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Surface::Lane(lane) => write!(f, "lane:{}", lane),
            Surface::Terrain => write!(f, "terrain"),
            Surface::Other => write!(f, "other"),
        }
    }
}

/// Wheel positions of the vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Wheel {
    FrontLeft,
    FrontRight,
    RearLeft,
    RearRight,
}

impl Wheel {
    /// All four wheels.
    pub fn all() -> [Wheel; 4] {
        [
            Wheel::FrontLeft,
            Wheel::FrontRight,
            Wheel::RearLeft,
            Wheel::RearRight,
        ]
    }

    /// Steered and driven wheels.
    pub fn front() -> [Wheel; 2] {
        [Wheel::FrontLeft, Wheel::FrontRight]
    }

    /// Index into per-wheel arrays, in the order of [`Wheel::all`].
    pub fn index(&self) -> usize {
        match self {
            Wheel::FrontLeft => 0,
            Wheel::FrontRight => 1,
            Wheel::RearLeft => 2,
            Wheel::RearRight => 3,
        }
    }
}

/// A position in scene coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    /// Creates a new vector.
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// The zero vector.
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3}, {:.3})", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lane_other_toggles() {
        assert_eq!(Lane::Low.other(), Lane::High);
        assert_eq!(Lane::High.other(), Lane::Low);
        assert_eq!(Lane::Low.other().other(), Lane::Low);
    }

    #[test]
    fn lane_flags() {
        assert_eq!(Lane::Low.flag(), 0.0);
        assert_eq!(Lane::High.flag(), 1.0);
    }

    #[test]
    fn wheel_indices_are_distinct() {
        let mut seen = [false; 4];
        for w in Wheel::all() {
            assert!(!seen[w.index()]);
            seen[w.index()] = true;
        }
    }

    #[test]
    fn surface_display() {
        assert_eq!(Surface::Lane(Lane::High).to_string(), "lane:high");
        assert_eq!(Surface::Terrain.to_string(), "terrain");
    }
}
