use crate::bridge::{EncoderTicks, SensorBridge};
use crate::error::NavError;

use super::{MotionConfig, MoveType};

/// drive state machine; a turn-around is two chained 90° pivots, never one
/// continuous rotation, so heading error stays bounded per pivot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveState {
    Idle,
    Forward,
    TurnLeft,
    TurnRight,
    TurnAroundFirst,
    TurnAroundSecond,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    InProgress,
    Complete,
}

/// per-move controller scratch state, reset when a move begins
#[derive(Debug, Clone, Copy, Default)]
pub struct MotionState {
    /// gyro heading integrated since the move began, degrees, CCW positive
    pub heading_deg: f64,
    pub start_ticks: EncoderTicks,
    pub pwm_left: f64,
    pub pwm_right: f64,
    /// side-wall validity; an invalid side contributes no correction
    pub left_valid: bool,
    pub right_valid: bool,
    base_speed: f64,
    prev_error: f64,
    first_tick: bool,
}

/// closed-loop executor of abstract moves: PD wall-follow correction on
/// forward moves, gyro-monitored pivots on turns, linear PWM ramping
pub struct MotionController {
    config: MotionConfig,
    state: DriveState,
    motion: MotionState,
    exit_speed: f64,
    stop_after: bool,
}

impl MotionController {
    pub fn new(config: MotionConfig) -> Self {
        Self {
            config,
            state: DriveState::Idle,
            motion: MotionState::default(),
            exit_speed: 0.0,
            stop_after: true,
        }
    }

    pub fn state(&self) -> DriveState {
        self.state
    }

    pub fn motion(&self) -> &MotionState {
        &self.motion
    }

    /// start executing a move; `stop_after` requests deceleration to a
    /// standstill at the end (last move of a batch, or one before a turn)
    pub fn begin<B: SensorBridge>(&mut self, move_type: MoveType, stop_after: bool, bridge: &mut B) {
        self.motion = MotionState {
            start_ticks: bridge.read_encoder_ticks(),
            base_speed: self.exit_speed,
            first_tick: true,
            ..MotionState::default()
        };
        self.stop_after = stop_after;
        self.state = match move_type {
            MoveType::None => {
                bridge.set_wheel_speeds(0.0, 0.0);
                DriveState::Idle
            }
            MoveType::Forward => DriveState::Forward,
            MoveType::TurnLeft => DriveState::TurnLeft,
            MoveType::TurnRight => DriveState::TurnRight,
            MoveType::TurnAround => DriveState::TurnAroundFirst,
        };
    }

    /// immediately halt and drop back to idle
    pub fn stop<B: SensorBridge>(&mut self, bridge: &mut B) {
        bridge.set_wheel_speeds(0.0, 0.0);
        self.exit_speed = 0.0;
        self.state = DriveState::Idle;
    }

    /// run one control tick; the caller owns the tick cadence
    pub fn tick<B: SensorBridge>(&mut self, bridge: &mut B) -> TickOutcome {
        match self.state {
            DriveState::Idle => TickOutcome::Complete,
            DriveState::Forward => self.forward_tick(bridge),
            DriveState::TurnLeft => self.pivot_tick(bridge, 90.0, 1.0),
            DriveState::TurnRight => self.pivot_tick(bridge, -90.0, -1.0),
            DriveState::TurnAroundFirst => self.pivot_tick(bridge, -90.0, -1.0),
            DriveState::TurnAroundSecond => self.pivot_tick(bridge, -180.0, -1.0),
        }
    }

    fn forward_tick<B: SensorBridge>(&mut self, bridge: &mut B) -> TickOutcome {
        let ticks = bridge.read_encoder_ticks();
        let traveled = ((ticks.left - self.motion.start_ticks.left)
            + (ticks.right - self.motion.start_ticks.right))
            / 2;

        if traveled >= self.config.ticks_per_cell as i32 {
            self.exit_speed = if self.stop_after {
                bridge.set_wheel_speeds(0.0, 0.0);
                0.0
            } else {
                self.motion.base_speed
            };
            self.state = DriveState::Idle;
            return TickOutcome::Complete;
        }

        // gyro keeps integrating even while wall correction is active
        self.motion.heading_deg += bridge.read_gyro();

        let remaining = self.config.ticks_per_cell as i32 - traveled;
        let target_speed = if self.stop_after && remaining <= self.config.decel_window as i32 {
            self.config.min_speed
        } else {
            self.config.cruise_speed
        };
        self.motion.base_speed = ramp_towards(
            self.motion.base_speed,
            target_speed.min(self.config.max_speed),
            self.config.ramp_step,
        );

        let sides = bridge.read_side_sensors();
        self.motion.left_valid = sides.left < self.config.left_wall_dist;
        self.motion.right_valid = sides.right < self.config.right_wall_dist;

        // only valid sides contribute; a lost wall must not steer us
        let error = match (self.motion.left_valid, self.motion.right_valid) {
            (true, true) => (sides.left - sides.right) as f64,
            (true, false) => (sides.left - self.config.left_wall_dist) as f64,
            (false, true) => (self.config.right_wall_dist - sides.right) as f64,
            (false, false) => 0.0,
        };
        if self.motion.first_tick {
            self.motion.prev_error = error;
            self.motion.first_tick = false;
        }
        let correction = self.config.straight_kp * error
            + self.config.kd * (error - self.motion.prev_error);
        self.motion.prev_error = error;

        // symmetric differential: heading changes, the speed sum does not
        let correction = correction.clamp(
            -self.motion.base_speed * 0.5,
            self.motion.base_speed * 0.5,
        );
        self.motion.pwm_left = self.motion.base_speed + correction;
        self.motion.pwm_right = self.motion.base_speed - correction;
        bridge.set_wheel_speeds(self.motion.pwm_left, self.motion.pwm_right);

        TickOutcome::InProgress
    }

    fn pivot_tick<B: SensorBridge>(
        &mut self,
        bridge: &mut B,
        target_deg: f64,
        direction: f64,
    ) -> TickOutcome {
        self.motion.heading_deg += bridge.read_gyro();

        let remaining = (target_deg - self.motion.heading_deg) * direction;
        let tolerance = self.config.turn_tolerance_deg;

        if remaining < -tolerance {
            let err = NavError::TurnOvershoot {
                target_deg,
                excess_deg: -remaining,
            };
            log::warn!("{err}");
            self.motion.heading_deg = target_deg;
            return self.finish_pivot(bridge);
        }
        if remaining <= tolerance {
            return self.finish_pivot(bridge);
        }

        let speed = (self.config.turn_kp * remaining)
            .clamp(self.config.min_turn_speed, self.config.turn_speed);
        self.motion.pwm_left = -direction * speed;
        self.motion.pwm_right = direction * speed;
        bridge.set_wheel_speeds(self.motion.pwm_left, self.motion.pwm_right);

        TickOutcome::InProgress
    }

    fn finish_pivot<B: SensorBridge>(&mut self, bridge: &mut B) -> TickOutcome {
        if self.state == DriveState::TurnAroundFirst {
            log::trace!("turn-around: first pivot done, chaining second");
            self.state = DriveState::TurnAroundSecond;
            return TickOutcome::InProgress;
        }

        bridge.set_wheel_speeds(0.0, 0.0);
        self.exit_speed = 0.0;
        self.state = DriveState::Idle;
        TickOutcome::Complete
    }
}

fn ramp_towards(current: f64, target: f64, step: f64) -> f64 {
    if current < target {
        (current + step).min(target)
    } else {
        (current - step).max(target)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;
    use crate::bridge::{SideSensors, SimBridge, WallReading};
    use crate::maze::{Cell, Heading};

    /// scripted bridge for exercising the controller without the simulator
    struct FakeBridge {
        gyro: VecDeque<f64>,
        sides: SideSensors,
        ticks: EncoderTicks,
        last_speeds: (f64, f64),
    }

    impl FakeBridge {
        fn new() -> Self {
            Self {
                gyro: VecDeque::new(),
                sides: SideSensors {
                    left: 2500,
                    right: 2500,
                },
                ticks: EncoderTicks::default(),
                last_speeds: (0.0, 0.0),
            }
        }
    }

    impl SensorBridge for FakeBridge {
        fn read_walls(&mut self) -> WallReading {
            WallReading::default()
        }

        fn read_gyro(&mut self) -> f64 {
            self.gyro.pop_front().unwrap_or(0.0)
        }

        fn read_encoder_ticks(&mut self) -> EncoderTicks {
            self.ticks
        }

        fn read_side_sensors(&mut self) -> SideSensors {
            self.sides
        }

        fn set_wheel_speeds(&mut self, left: f64, right: f64) {
            self.last_speeds = (left, right);
        }
    }

    #[test]
    fn lost_right_wall_suppresses_right_correction() {
        // left 1850 < 1900 keeps its wall, right 2100 > 2000 has lost it
        let mut bridge = FakeBridge::new();
        bridge.sides = SideSensors {
            left: 1850,
            right: 2100,
        };

        let mut controller = MotionController::new(MotionConfig::default());
        controller.begin(MoveType::Forward, true, &mut bridge);
        controller.tick(&mut bridge);

        assert!(controller.motion().left_valid);
        assert!(!controller.motion().right_valid);
        let first = bridge.last_speeds;

        // an invalid right reading must not influence the correction at all
        let mut other_bridge = FakeBridge::new();
        other_bridge.sides = SideSensors {
            left: 1850,
            right: 2400,
        };
        let mut other = MotionController::new(MotionConfig::default());
        other.begin(MoveType::Forward, true, &mut other_bridge);
        other.tick(&mut other_bridge);

        assert_eq!(first, other_bridge.last_speeds);
    }

    #[test]
    fn correction_keeps_speed_sum_constant() {
        let mut bridge = FakeBridge::new();
        bridge.sides = SideSensors {
            left: 1850,
            right: 1950,
        };

        let mut controller = MotionController::new(MotionConfig::default());
        controller.begin(MoveType::Forward, false, &mut bridge);
        for _ in 0..20 {
            controller.tick(&mut bridge);
            let (left, right) = bridge.last_speeds;
            let base = (left + right) / 2.0;
            assert!((left + right - 2.0 * base).abs() < 1e-9);
        }
    }

    #[test]
    fn forward_ramps_toward_cruise_and_respects_ceiling() {
        let config = MotionConfig::default();
        let cruise = config.cruise_speed;
        let step = config.ramp_step;

        let mut bridge = FakeBridge::new();
        let mut controller = MotionController::new(config);
        controller.begin(MoveType::Forward, false, &mut bridge);

        let mut previous = 0.0;
        for _ in 0..60 {
            controller.tick(&mut bridge);
            let (left, right) = bridge.last_speeds;
            let base = (left + right) / 2.0;
            assert!(base >= previous, "ramp must be monotonic toward cruise");
            assert!(base - previous <= step + 1e-9, "ramp must be gradual");
            assert!(base <= cruise + 1e-9);
            previous = base;
        }
        assert!((previous - cruise).abs() < 1e-9, "ramp must reach cruise");
    }

    #[test]
    fn forward_completes_after_one_cell_of_ticks() {
        let mut bridge = FakeBridge::new();
        let mut controller = MotionController::new(MotionConfig::default());
        controller.begin(MoveType::Forward, true, &mut bridge);

        let mut ticks_taken = 0;
        loop {
            bridge.ticks.left += 100;
            bridge.ticks.right += 100;
            ticks_taken += 1;
            if controller.tick(&mut bridge) == TickOutcome::Complete {
                break;
            }
            assert!(ticks_taken < 50, "forward move never completed");
        }

        assert_eq!(controller.state(), DriveState::Idle);
        assert_eq!(bridge.last_speeds, (0.0, 0.0), "stop_after must halt");
    }

    #[test]
    fn turn_around_is_two_chained_pivots() {
        let mut sim = SimBridge::new(4, 4, Heading::North, 360);
        let mut controller = MotionController::new(MotionConfig::default());
        controller.begin(MoveType::TurnAround, true, &mut sim);

        let mut saw_second_pivot = false;
        let mut ticks = 0;
        loop {
            let outcome = controller.tick(&mut sim);
            if !saw_second_pivot && controller.state() == DriveState::TurnAroundSecond {
                saw_second_pivot = true;
                // the first pivot must have ended near -90, not run through
                assert!(controller.motion().heading_deg > -100.0);
            }
            if outcome == TickOutcome::Complete {
                break;
            }
            ticks += 1;
            assert!(ticks < 1000, "turn-around never completed");
        }

        assert!(saw_second_pivot);
        let final_heading = controller.motion().heading_deg;
        let tolerance = MotionConfig::default().turn_tolerance_deg;
        assert!(
            (final_heading + 180.0).abs() <= tolerance,
            "ended at {final_heading}° instead of -180°"
        );
        assert_eq!(sim.heading(), Heading::South);
        assert_eq!(sim.cell(), Cell::new(0, 0), "pivot must stay in place");
    }

    #[test]
    fn turn_overshoot_is_clamped_to_target() {
        let mut bridge = FakeBridge::new();
        // one wild gyro sample far past the 90° target
        bridge.gyro.push_back(97.0);

        let mut controller = MotionController::new(MotionConfig::default());
        controller.begin(MoveType::TurnLeft, true, &mut bridge);

        assert_eq!(controller.tick(&mut bridge), TickOutcome::Complete);
        assert_eq!(controller.motion().heading_deg, 90.0);
        assert_eq!(bridge.last_speeds, (0.0, 0.0));
    }
}
