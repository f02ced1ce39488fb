/// gains, setpoints and speed limits for the motion controller; the
/// defaults are hand-tuned for a cell pitch of 360 encoder ticks
#[derive(Debug, Clone)]
pub struct MotionConfig {
    /// proportional gain for wall-follow heading correction
    pub straight_kp: f64,
    /// derivative gain for wall-follow heading correction
    pub kd: f64,
    /// proportional gain mapping remaining turn degrees to pivot speed
    pub turn_kp: f64,

    /// left side sensor setpoint; readings at or above it mean the wall is lost
    pub left_wall_dist: i32,
    /// right side sensor setpoint; readings at or above it mean the wall is lost
    pub right_wall_dist: i32,

    /// cruise PWM for forward moves
    pub cruise_speed: f64,
    /// hard PWM ceiling
    pub max_speed: f64,
    /// PWM floor while approaching a required stop
    pub min_speed: f64,
    /// PWM change per control tick while ramping
    pub ramp_step: f64,

    /// encoder ticks spanning one maze cell
    pub ticks_per_cell: u32,
    /// ticks before a required stop at which deceleration begins
    pub decel_window: u32,

    /// pivot wheel speed ceiling
    pub turn_speed: f64,
    /// pivot wheel speed floor, so turns finish instead of stalling
    pub min_turn_speed: f64,
    /// heading band around the turn target counted as done, degrees
    pub turn_tolerance_deg: f64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            straight_kp: 3.0,
            kd: 10.0,
            turn_kp: 16.0,
            left_wall_dist: 1900,
            right_wall_dist: 2000,
            cruise_speed: 240.0,
            max_speed: 500.0,
            min_speed: 40.0,
            ramp_step: 8.0,
            ticks_per_cell: 360,
            decel_window: 120,
            turn_speed: 150.0,
            min_turn_speed: 25.0,
            turn_tolerance_deg: 2.0,
        }
    }
}
