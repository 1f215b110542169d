//! Vehicle control interface.
//!
//! Maps discrete turn/motor commands to actuator targets and scores how
//! closely the commanded speed matches the current lane's ideal speed.

use crate::action::{MotorCommand, TurnCommand};
use crate::body::VehicleBody;
use crate::config::ControlConfig;
use crate::types::{Lane, Wheel};

/// Commanded speed level and steering state of one vehicle.
#[derive(Debug, Clone)]
pub struct VehicleControl {
    config: ControlConfig,
    speed_level: i32,
    target_speed_level: i32,
    turn_offset: f32,
    steer_angle: f32,
}

impl VehicleControl {
    /// Creates a controller resting at the low lane's target speed.
    pub fn new(config: ControlConfig) -> Self {
        let target = config.target_for(Lane::Low);
        Self {
            config,
            speed_level: target,
            target_speed_level: target,
            turn_offset: 0.0,
            steer_angle: 0.0,
        }
    }

    /// Returns the configuration in use.
    pub fn config(&self) -> &ControlConfig {
        &self.config
    }

    /// Clears steering and sets the speed level to the lane's target.
    pub fn reset(&mut self, lane: Lane) {
        self.turn_offset = 0.0;
        self.steer_angle = 0.0;
        self.target_speed_level = self.config.target_for(lane);
        self.speed_level = self.target_speed_level;
    }

    /// Speed-tracking command: steers and moves the speed level one unit
    /// toward `lane`'s target.
    ///
    /// An unrecognized command (`None`) clears the turn offset and leaves the
    /// speed untouched.
    pub fn set_command(&mut self, turn: Option<TurnCommand>, lane: Lane) {
        self.turn_offset = self.turn_offset_for(turn);
        if turn.is_none() {
            return;
        }
        self.target_speed_level = self.config.target_for(lane);
        let step = (self.target_speed_level - self.speed_level).signum();
        self.change_speed(step);
    }

    /// Dual-control command: steering plus an explicit speed change of at most
    /// one unit. An unrecognized turn adds no steering.
    pub fn set_dual_command(
        &mut self,
        turn: Option<TurnCommand>,
        motor: Option<MotorCommand>,
        lane: Lane,
    ) {
        self.turn_offset = self.turn_offset_for(turn);
        self.target_speed_level = self.config.target_for(lane);
        match motor {
            Some(MotorCommand::Accelerate) => self.change_speed(1),
            Some(MotorCommand::Decelerate) => self.change_speed(-1),
            Some(MotorCommand::Hold) | None => {}
        }
    }

    fn turn_offset_for(&self, turn: Option<TurnCommand>) -> f32 {
        match turn {
            Some(TurnCommand::Straight) | None => 0.0,
            Some(TurnCommand::SoftLeft) => -self.config.soft_turn,
            Some(TurnCommand::SoftRight) => self.config.soft_turn,
            Some(TurnCommand::HardLeft) => -self.config.hard_turn,
            Some(TurnCommand::HardRight) => self.config.hard_turn,
        }
    }

    fn change_speed(&mut self, delta: i32) {
        self.speed_level = (self.speed_level + delta.signum())
            .clamp(self.config.min_speed_level, self.config.max_speed_level);
    }

    /// Current discretized speed.
    pub fn commanded_speed_level(&self) -> i32 {
        self.speed_level
    }

    /// Ideal speed of the lane given with the last command.
    pub fn target_speed_level(&self) -> i32 {
        self.target_speed_level
    }

    /// Accumulated steer angle, in degrees.
    pub fn steer_angle(&self) -> f32 {
        self.steer_angle
    }

    /// Speed-tracking reward: `max_speed_reward - |target - speed_level|`.
    ///
    /// Not clamped at zero.
    pub fn reward(&self) -> f32 {
        let distance = (self.target_speed_level - self.speed_level).abs();
        self.config.max_speed_reward - distance as f32
    }

    /// Pushes actuator targets to the body for one physics tick.
    pub fn physics_update<B: VehicleBody + ?Sized>(&mut self, body: &mut B, brake_held: bool) {
        let max = self.config.max_speed_level as f32;
        let torque = self.speed_level as f32 / max * self.config.motor_force;
        for wheel in Wheel::front() {
            body.set_motor_torque(wheel, torque);
        }

        let brake = if brake_held {
            self.config.brake_force
        } else {
            0.0
        };
        for wheel in Wheel::all() {
            body.set_brake_torque(wheel, brake);
        }

        let limit = self.config.max_steering_angle;
        self.steer_angle = (self.steer_angle + self.turn_offset).clamp(-limit, limit);
        for wheel in Wheel::front() {
            body.set_steer_angle(wheel, self.steer_angle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::ScriptedBody;

    fn control() -> VehicleControl {
        VehicleControl::new(ControlConfig::default())
    }

    #[test]
    fn reward_scenario() {
        let mut c = control();
        c.reset(Lane::High);
        c.set_dual_command(None, Some(MotorCommand::Decelerate), Lane::High);
        c.set_dual_command(None, Some(MotorCommand::Decelerate), Lane::High);
        assert_eq!(c.commanded_speed_level(), 8);
        assert_eq!(c.target_speed_level(), 10);
        assert_eq!(c.reward(), 8.0);
    }

    #[test]
    fn reward_is_maximal_only_on_target() {
        let mut c = control();
        c.reset(Lane::Low);
        assert_eq!(c.reward(), c.config().max_speed_reward);
        c.set_dual_command(None, Some(MotorCommand::Accelerate), Lane::Low);
        assert!(c.reward() < c.config().max_speed_reward);
    }

    #[test]
    fn reward_decreases_with_distance() {
        let mut c = control();
        c.reset(Lane::Low);
        let mut previous = c.reward();
        for _ in 0..6 {
            c.set_dual_command(None, Some(MotorCommand::Accelerate), Lane::Low);
            let r = c.reward();
            assert!(r < previous);
            previous = r;
        }
    }

    #[test]
    fn reward_goes_negative_for_large_deviation() {
        let cfg = ControlConfig {
            min_speed_level: 0,
            max_speed_level: 30,
            max_speed_reward: 2.0,
            ..ControlConfig::default()
        };
        let mut c = VehicleControl::new(cfg);
        c.reset(Lane::Low);
        for _ in 0..10 {
            c.set_dual_command(None, Some(MotorCommand::Accelerate), Lane::Low);
        }
        assert_eq!(c.reward(), -8.0);
    }

    #[test]
    fn speed_stays_clamped() {
        let mut c = control();
        c.reset(Lane::Low);
        for _ in 0..100 {
            c.set_dual_command(None, Some(MotorCommand::Accelerate), Lane::Low);
            assert!(c.commanded_speed_level() <= c.config().max_speed_level);
        }
        assert_eq!(c.commanded_speed_level(), 12);
        for _ in 0..100 {
            c.set_dual_command(None, Some(MotorCommand::Decelerate), Lane::Low);
            assert!(c.commanded_speed_level() >= c.config().min_speed_level);
        }
        assert_eq!(c.commanded_speed_level(), 4);
    }

    #[test]
    fn speed_tracking_moves_one_unit_per_call() {
        let mut c = control();
        c.reset(Lane::Low);
        c.set_command(Some(TurnCommand::Straight), Lane::High);
        assert_eq!(c.commanded_speed_level(), 7);
        for _ in 0..10 {
            c.set_command(Some(TurnCommand::Straight), Lane::High);
        }
        assert_eq!(c.commanded_speed_level(), 10);
        c.set_command(Some(TurnCommand::Straight), Lane::Low);
        assert_eq!(c.commanded_speed_level(), 9);
    }

    #[test]
    fn unknown_command_adds_no_steering() {
        let mut c = control();
        c.reset(Lane::Low);
        let mut body = ScriptedBody::new();
        c.set_command(Some(TurnCommand::SoftRight), Lane::Low);
        c.physics_update(&mut body, false);
        assert_eq!(c.steer_angle(), c.config().soft_turn);

        c.set_command(None, Lane::High);
        for _ in 0..5 {
            c.physics_update(&mut body, false);
        }
        assert_eq!(c.steer_angle(), c.config().soft_turn);
        assert_eq!(c.commanded_speed_level(), 6);
        assert_eq!(c.target_speed_level(), 6);
    }

    #[test]
    fn unknown_dual_command_stops_turning() {
        let mut c = control();
        c.reset(Lane::Low);
        let mut body = ScriptedBody::new();
        c.set_dual_command(Some(TurnCommand::HardLeft), None, Lane::Low);
        c.physics_update(&mut body, false);
        assert_eq!(c.steer_angle(), -3.0);

        for _ in 0..5 {
            c.set_dual_command(None, None, Lane::Low);
            c.physics_update(&mut body, false);
        }
        assert_eq!(c.steer_angle(), -3.0);
        assert_eq!(body.steer_angle(Wheel::FrontLeft), -3.0);
        assert_eq!(c.commanded_speed_level(), 6);
    }

    #[test]
    fn steering_accumulates_and_clamps() {
        let mut c = control();
        c.reset(Lane::Low);
        let mut body = ScriptedBody::new();
        c.set_command(Some(TurnCommand::HardLeft), Lane::Low);
        for _ in 0..100 {
            c.physics_update(&mut body, false);
        }
        assert_eq!(c.steer_angle(), -30.0);
        assert_eq!(body.steer_angle(Wheel::FrontLeft), -30.0);
        assert_eq!(body.steer_angle(Wheel::FrontRight), -30.0);
        assert_eq!(body.steer_angle(Wheel::RearLeft), 0.0);
    }

    #[test]
    fn torque_and_brake() {
        let mut c = control();
        c.reset(Lane::Low);
        let mut body = ScriptedBody::new();
        c.physics_update(&mut body, true);
        let expected = 6.0 / 12.0 * 500.0;
        assert_eq!(body.motor_torque[Wheel::FrontLeft.index()], expected);
        assert_eq!(body.motor_torque[Wheel::RearLeft.index()], 0.0);
        assert!(body.brake_torque.iter().all(|&b| b == 3000.0));
        c.physics_update(&mut body, false);
        assert!(body.brake_torque.iter().all(|&b| b == 0.0));
    }

    #[test]
    fn reset_clears_steering() {
        let mut c = control();
        let mut body = ScriptedBody::new();
        c.set_command(Some(TurnCommand::SoftLeft), Lane::Low);
        c.physics_update(&mut body, false);
        c.reset(Lane::High);
        assert_eq!(c.steer_angle(), 0.0);
        assert_eq!(c.commanded_speed_level(), 10);
        c.physics_update(&mut body, false);
        assert_eq!(c.steer_angle(), 0.0);
    }
}
