mod sim;

pub use sim::SimBridge;

/// wall presence around the robot, relative to its current heading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WallReading {
    pub left: bool,
    pub front: bool,
    pub right: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EncoderTicks {
    pub left: i32,
    pub right: i32,
}

/// raw side-looking distance sensor values; smaller means closer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SideSensors {
    pub left: i32,
    pub right: i32,
}

/// capability boundary to the robot's sensors and actuators; implemented by
/// hardware on a real mouse or by [`SimBridge`] for tests and the demo run
pub trait SensorBridge {
    fn read_walls(&mut self) -> WallReading;

    /// heading change since the previous call, in degrees, counterclockwise
    /// positive; the motion controller integrates this every tick
    fn read_gyro(&mut self) -> f64;

    fn read_encoder_ticks(&mut self) -> EncoderTicks;

    fn read_side_sensors(&mut self) -> SideSensors;

    /// command wheel PWM; the backend advances its world by one tick
    fn set_wheel_speeds(&mut self, left: f64, right: f64);
}
