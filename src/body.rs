//! Physics collaborator interface.
//!
//! Wheel dynamics live in an external engine. The coordinator reaches it only
//! through [`VehicleBody`]: ground probes per wheel, actuator setters, and pose
//! resets.

use crate::start_pose::StartPose;
use crate::types::{Surface, Vec3, Wheel};

/// Result of a wheel's ground probe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundHit {
    pub surface: Surface,
    pub normal: Vec3,
}

impl GroundHit {
    /// A hit on `surface` with an upward normal.
    pub fn on(surface: Surface) -> Self {
        Self {
            surface,
            normal: Vec3::new(0.0, 1.0, 0.0),
        }
    }
}

/// The simulated vehicle as seen by the environment.
pub trait VehicleBody {
    /// Ground contact of `wheel`, or `None` while airborne.
    fn ground_hit(&self, wheel: Wheel) -> Option<GroundHit>;

    fn set_motor_torque(&mut self, wheel: Wheel, torque: f32);

    fn set_brake_torque(&mut self, wheel: Wheel, torque: f32);

    fn set_steer_angle(&mut self, wheel: Wheel, degrees: f32);

    /// Current steer angle of `wheel`, in degrees.
    fn steer_angle(&self, wheel: Wheel) -> f32;

    /// Zeroes the rigid body's linear and angular velocity.
    fn reset_velocity(&mut self);

    /// Teleports the body to a start pose.
    fn set_pose(&mut self, pose: &StartPose);
}

/// Headless body with caller-scripted contacts.
///
/// Records every actuator write so tests and replays can inspect what the
/// control interface asked for.
#[derive(Debug, Clone, Default)]
pub struct ScriptedBody {
    contacts: [Option<GroundHit>; 4],
    pub motor_torque: [f32; 4],
    pub brake_torque: [f32; 4],
    pub steer: [f32; 4],
    pub velocity_resets: u32,
    pub pose: Option<StartPose>,
}

impl ScriptedBody {
    pub fn new() -> Self {
        Self::default()
    }

    /// A body with both front wheels resting on `surface`.
    pub fn resting_on(surface: Surface) -> Self {
        let mut body = Self::new();
        body.set_front_contacts(Some(surface), Some(surface));
        body
    }

    /// Scripts the probe result of one wheel.
    pub fn set_contact(&mut self, wheel: Wheel, surface: Option<Surface>) {
        self.contacts[wheel.index()] = surface.map(GroundHit::on);
    }

    /// Scripts both front wheels.
    pub fn set_front_contacts(&mut self, left: Option<Surface>, right: Option<Surface>) {
        self.set_contact(Wheel::FrontLeft, left);
        self.set_contact(Wheel::FrontRight, right);
    }
}

impl VehicleBody for ScriptedBody {
    fn ground_hit(&self, wheel: Wheel) -> Option<GroundHit> {
        self.contacts[wheel.index()]
    }

    fn set_motor_torque(&mut self, wheel: Wheel, torque: f32) {
        self.motor_torque[wheel.index()] = torque;
    }

    fn set_brake_torque(&mut self, wheel: Wheel, torque: f32) {
        self.brake_torque[wheel.index()] = torque;
    }

    fn set_steer_angle(&mut self, wheel: Wheel, degrees: f32) {
        self.steer[wheel.index()] = degrees;
    }

    fn steer_angle(&self, wheel: Wheel) -> f32 {
        self.steer[wheel.index()]
    }

    fn reset_velocity(&mut self) {
        self.velocity_resets += 1;
    }

    fn set_pose(&mut self, pose: &StartPose) {
        self.pose = Some(*pose);
    }
}
