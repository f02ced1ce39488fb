use crate::maze::{Cell, Heading};

use super::{EncoderTicks, SensorBridge, SideSensors, WallReading};

/// encoder ticks produced per commanded PWM unit per control tick
const TICKS_PER_PWM: f64 = 0.05;
/// degrees of rotation per PWM unit of wheel-speed differential per tick
const DEG_PER_PWM_DIFF: f64 = 0.01;

/// side sensor value when a wall is present and the robot is aligned
const LEFT_WALL_VALUE: i32 = 1850;
const RIGHT_WALL_VALUE: i32 = 1950;
/// side sensor value with no wall in range
const NO_WALL_VALUE: i32 = 2500;
/// sensor units per degree of yaw misalignment; yawing away from a side
/// wall lengthens that side's reading, closing the correction loop
const YAW_GAIN: f64 = 10.0;

/// kinematic sensor/actuator backend over a ground-truth wall grid; not a
/// physics engine - it integrates commanded wheel speeds into encoder ticks
/// and gyro heading, and answers wall queries from the discrete pose
pub struct SimBridge {
    width: usize,
    height: usize,
    walls: Vec<[bool; 4]>,
    ticks_per_cell: f64,

    cell: Cell,
    initial_heading: Heading,
    heading: Heading,
    heading_deg: f64,
    last_gyro_deg: f64,
    left_ticks: f64,
    right_ticks: f64,
    forward_progress: f64,
    left_speed: f64,
    right_speed: f64,
}

impl SimBridge {
    /// open arena of the given size: boundary walls only, robot at (0, 0)
    pub fn new(width: usize, height: usize, heading: Heading, ticks_per_cell: u32) -> Self {
        let mut walls = vec![[false; 4]; width * height];
        for x in 0..width {
            walls[Cell::new(x, 0).to_index(width)][Heading::South.index()] = true;
            walls[Cell::new(x, height - 1).to_index(width)][Heading::North.index()] = true;
        }
        for y in 0..height {
            walls[Cell::new(0, y).to_index(width)][Heading::West.index()] = true;
            walls[Cell::new(width - 1, y).to_index(width)][Heading::East.index()] = true;
        }

        Self {
            width,
            height,
            walls,
            ticks_per_cell: ticks_per_cell as f64,
            cell: Cell::new(0, 0),
            initial_heading: heading,
            heading,
            heading_deg: 0.0,
            last_gyro_deg: 0.0,
            left_ticks: 0.0,
            right_ticks: 0.0,
            forward_progress: 0.0,
            left_speed: 0.0,
            right_speed: 0.0,
        }
    }

    /// place a ground-truth wall, mirrored onto the adjacent cell
    pub fn add_wall(&mut self, cell: Cell, side: Heading) {
        self.walls[cell.to_index(self.width)][side.index()] = true;
        if let Some(adjacent) = cell.neighbor(side, self.width, self.height) {
            self.walls[adjacent.to_index(self.width)][side.reverse().index()] = true;
        }
    }

    pub fn cell(&self) -> Cell {
        self.cell
    }

    pub fn heading(&self) -> Heading {
        self.heading
    }

    pub fn wheel_speeds(&self) -> (f64, f64) {
        (self.left_speed, self.right_speed)
    }

    fn has_wall(&self, side: Heading) -> bool {
        self.walls[self.cell.to_index(self.width)][side.index()]
    }

    fn step(&mut self) {
        let dl = self.left_speed * TICKS_PER_PWM;
        let dr = self.right_speed * TICKS_PER_PWM;
        self.left_ticks += dl;
        self.right_ticks += dr;
        self.heading_deg += (self.right_speed - self.left_speed) * DEG_PER_PWM_DIFF;

        // discrete heading snaps to the nearest quarter turn
        let quarter_turns = (self.heading_deg / 90.0).round() as i32;
        self.heading = rotated_left(self.initial_heading, quarter_turns);

        // forward motion only accumulates while both wheels drive forward;
        // a pivot or a stop re-zeroes the robot within its cell
        if !(self.left_speed > 0.0 && self.right_speed > 0.0) {
            self.forward_progress = 0.0;
        } else {
            self.forward_progress += (dl + dr) / 2.0;
            while self.forward_progress >= self.ticks_per_cell {
                self.forward_progress -= self.ticks_per_cell;
                if self.has_wall(self.heading) {
                    log::error!(
                        "simulated crash: drove into wall at ({}, {}) facing {:?}",
                        self.cell.x,
                        self.cell.y,
                        self.heading
                    );
                } else if let Some(next) =
                    self.cell.neighbor(self.heading, self.width, self.height)
                {
                    self.cell = next;
                }
            }
        }
    }
}

impl SensorBridge for SimBridge {
    fn read_walls(&mut self) -> WallReading {
        WallReading {
            left: self.has_wall(self.heading.left()),
            front: self.has_wall(self.heading),
            right: self.has_wall(self.heading.right()),
        }
    }

    fn read_gyro(&mut self) -> f64 {
        let delta = self.heading_deg - self.last_gyro_deg;
        self.last_gyro_deg = self.heading_deg;
        delta
    }

    fn read_encoder_ticks(&mut self) -> EncoderTicks {
        EncoderTicks {
            left: self.left_ticks as i32,
            right: self.right_ticks as i32,
        }
    }

    fn read_side_sensors(&mut self) -> SideSensors {
        // yaw misalignment from the nearest quarter turn feeds back into
        // the readings, so wall-follow corrections actually converge
        let misalign = self.heading_deg - 90.0 * (self.heading_deg / 90.0).round();
        SideSensors {
            left: if self.has_wall(self.heading.left()) {
                LEFT_WALL_VALUE + (YAW_GAIN * misalign) as i32
            } else {
                NO_WALL_VALUE
            },
            right: if self.has_wall(self.heading.right()) {
                RIGHT_WALL_VALUE - (YAW_GAIN * misalign) as i32
            } else {
                NO_WALL_VALUE
            },
        }
    }

    fn set_wheel_speeds(&mut self, left: f64, right: f64) {
        self.left_speed = left;
        self.right_speed = right;
        self.step();
    }
}

fn rotated_left(heading: Heading, quarter_turns: i32) -> Heading {
    let mut heading = heading;
    for _ in 0..quarter_turns.rem_euclid(4) {
        heading = heading.left();
    }
    heading
}
