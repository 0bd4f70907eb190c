//! Vehicle state and the per-frame simulation step.
//!
//! [`advance`] is a pure function: it takes the current state, the controls
//! sampled this frame and the elapsed time, and returns the next state.

use crate::config::Color;

/// Top of the speedometer scale, km/h.
pub const MAX_SPEED: f32 = 250.0;
/// Top of the tachometer scale, rpm.
pub const MAX_RPM: f32 = 8000.0;
/// Engine temperature gauge scale, °C.
pub const TEMP_RANGE: (f32, f32) = (60.0, 140.0);

pub const IDLE_RPM: f32 = 800.0;
const REDLINE_RPM: f32 = 7000.0;
const ACCELERATION: f32 = 50.0;
const COAST_DECELERATION: f32 = 30.0;
const RPM_RISE: f32 = 2000.0;
const RPM_FALL: f32 = 1500.0;
const SPEED_SMOOTHING: f32 = 5.0;
const RPM_SMOOTHING: f32 = 3.0;
const BLINK_PERIOD: f32 = 1.0;

/// Drive mode shown on the digital display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    #[default]
    Comfort,
    Sport,
    Eco,
    Individual,
}

impl DisplayMode {
    const ALL: [DisplayMode; 4] = [
        DisplayMode::Comfort,
        DisplayMode::Sport,
        DisplayMode::Eco,
        DisplayMode::Individual,
    ];

    fn index(self) -> usize {
        match self {
            Self::Comfort => 0,
            Self::Sport => 1,
            Self::Eco => 2,
            Self::Individual => 3,
        }
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn previous(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Accent color of the mode indicator.
    pub fn accent(self) -> Color {
        match self {
            Self::Comfort => Color::new(0.0, 0.8, 1.0),
            Self::Sport => Color::new(1.0, 0.3, 0.0),
            Self::Eco => Color::new(0.0, 1.0, 0.3),
            Self::Individual => Color::new(0.8, 0.0, 1.0),
        }
    }

    /// Clear color of the whole cluster.
    pub fn background(self) -> Color {
        match self {
            Self::Comfort => Color::new(0.02, 0.02, 0.05),
            Self::Sport => Color::new(0.05, 0.02, 0.02),
            Self::Eco => Color::new(0.02, 0.05, 0.02),
            Self::Individual => Color::new(0.05, 0.02, 0.05),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Gear {
    #[default]
    Park,
    Drive,
}

/// Controls sampled for one frame. Everything except `throttle` is
/// edge-triggered: true only on the frame the key went down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Controls {
    pub throttle: bool,
    pub mode_previous: bool,
    pub mode_next: bool,
    pub ignition: bool,
    pub air_conditioning: bool,
    pub lights: bool,
    pub left_signal: bool,
    pub right_signal: bool,
    pub hazards: bool,
    pub parking_brake: bool,
    pub seatbelt: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VehicleState {
    /// km/h
    pub speed: f32,
    pub rpm: f32,
    /// percent
    pub fuel: f32,
    /// °C
    pub engine_temp: f32,
    /// psi
    pub oil_pressure: f32,
    /// volts
    pub battery_voltage: f32,
    pub engine_running: bool,
    pub ac_on: bool,
    pub lights_on: bool,
    pub turn_signal_left: bool,
    pub turn_signal_right: bool,
    pub hazards_on: bool,
    pub parking_brake: bool,
    pub seatbelt: bool,
    pub gear: Gear,
    pub display_mode: DisplayMode,
    /// km
    pub odometer: f32,
    /// km
    pub trip_a: f32,
    /// °C
    pub outside_temp: f32,
    pub throttle_pressed: bool,
    pub target_speed: f32,
    pub target_rpm: f32,
    /// Seconds into the current indicator blink period.
    pub blink_timer: f32,
}

impl Default for VehicleState {
    fn default() -> Self {
        Self {
            speed: 0.0,
            rpm: IDLE_RPM,
            fuel: 85.0,
            engine_temp: 90.0,
            oil_pressure: 45.0,
            battery_voltage: 12.6,
            engine_running: false,
            ac_on: false,
            lights_on: false,
            turn_signal_left: false,
            turn_signal_right: false,
            hazards_on: false,
            parking_brake: true,
            seatbelt: false,
            gear: Gear::Park,
            display_mode: DisplayMode::Comfort,
            odometer: 45672.8,
            trip_a: 0.0,
            outside_temp: 22.5,
            throttle_pressed: false,
            target_speed: 0.0,
            target_rpm: IDLE_RPM,
            blink_timer: 0.0,
        }
    }
}

/// Normalized gauge positions. Not clamped; the gauges saturate them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Readings {
    pub speed: f32,
    pub rpm: f32,
    pub fuel: f32,
    pub temperature: f32,
}

impl VehicleState {
    pub fn readings(&self) -> Readings {
        Readings {
            speed: self.speed / MAX_SPEED,
            rpm: self.rpm / MAX_RPM,
            fuel: self.fuel / 100.0,
            temperature: (self.engine_temp - TEMP_RANGE.0) / (TEMP_RANGE.1 - TEMP_RANGE.0),
        }
    }

    /// First half of each blink period.
    pub fn blink_on(&self) -> bool {
        self.blink_timer < BLINK_PERIOD / 2.0
    }

    pub fn is_moving(&self) -> bool {
        self.speed > 0.0
    }
}

/// Advances the simulation by `dt` seconds.
pub fn advance(state: &VehicleState, controls: &Controls, dt: f32) -> VehicleState {
    let mut next = state.clone();
    next.throttle_pressed = controls.throttle;

    // Throttle sets targets; the gauges chase them.
    if controls.throttle && next.engine_running {
        next.target_speed = (next.target_speed + ACCELERATION * dt).min(MAX_SPEED);
        next.target_rpm = (next.target_rpm + RPM_RISE * dt).min(REDLINE_RPM);
    } else {
        next.target_speed = (next.target_speed - COAST_DECELERATION * dt).max(0.0);
        next.target_rpm = if next.engine_running {
            (next.target_rpm - RPM_FALL * dt).max(IDLE_RPM)
        } else {
            0.0
        };
    }
    next.speed += (next.target_speed - next.speed) * SPEED_SMOOTHING * dt;
    next.rpm += (next.target_rpm - next.rpm) * RPM_SMOOTHING * dt;

    if controls.mode_previous {
        next.display_mode = next.display_mode.previous();
    }
    if controls.mode_next {
        next.display_mode = next.display_mode.next();
    }

    if controls.ignition {
        next.engine_running = !next.engine_running;
        if next.engine_running {
            next.target_rpm = IDLE_RPM;
        } else {
            next.target_rpm = 0.0;
            next.target_speed = 0.0;
        }
    }

    if controls.air_conditioning {
        next.ac_on = !next.ac_on;
    }
    if controls.lights {
        next.lights_on = !next.lights_on;
    }
    if controls.left_signal {
        next.turn_signal_left = !next.turn_signal_left;
        if next.turn_signal_left {
            next.turn_signal_right = false;
        }
    }
    if controls.right_signal {
        next.turn_signal_right = !next.turn_signal_right;
        if next.turn_signal_right {
            next.turn_signal_left = false;
        }
    }
    if controls.hazards {
        next.hazards_on = !next.hazards_on;
        if next.hazards_on {
            next.turn_signal_left = false;
            next.turn_signal_right = false;
        }
    }
    if controls.parking_brake {
        next.parking_brake = !next.parking_brake;
    }
    if controls.seatbelt {
        next.seatbelt = !next.seatbelt;
    }

    next.blink_timer += dt;
    if next.blink_timer >= BLINK_PERIOD {
        next.blink_timer = 0.0;
    }

    if next.engine_running && next.speed > 0.0 {
        next.fuel = (next.fuel - 0.5 * dt * (next.speed / 100.0)).max(0.0);
        let distance = next.speed * dt / 3600.0;
        next.trip_a += distance;
        next.odometer += distance;
    }

    let (target_temp, rate) = if next.engine_running {
        (90.0 + (next.rpm - IDLE_RPM) / 100.0, 0.5)
    } else {
        (20.0, 0.1)
    };
    next.engine_temp += (target_temp - next.engine_temp) * rate * dt;

    next.gear = if next.engine_running && (controls.throttle || next.speed > 0.5) {
        Gear::Drive
    } else {
        Gear::Park
    };

    next
}

// ============================================================================
// WARNING LIGHTS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    Engine,
    OilPressure,
    EngineTemperature,
    Battery,
    Fuel,
    AirConditioning,
    Lights,
    LeftSignal,
    RightSignal,
    ParkingBrake,
    Seatbelt,
    Abs,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WarningLight {
    pub kind: WarningKind,
    pub active: bool,
    pub color: Color,
}

const RED: Color = Color::new(1.0, 0.0, 0.0);
const AMBER: Color = Color::new(1.0, 0.5, 0.0);
const YELLOW: Color = Color::new(1.0, 1.0, 0.0);
const GREEN: Color = Color::new(0.0, 1.0, 0.0);
const CYAN: Color = Color::new(0.0, 0.8, 1.0);

/// Warning panel contents, left to right.
pub fn warning_lights(state: &VehicleState) -> [WarningLight; 12] {
    let light = |kind, active, color| WarningLight {
        kind,
        active,
        color,
    };
    let left_blink = state.turn_signal_left || state.hazards_on;
    let right_blink = state.turn_signal_right || state.hazards_on;
    [
        light(WarningKind::Engine, !state.engine_running && state.is_moving(), RED),
        light(WarningKind::OilPressure, state.oil_pressure < 20.0, AMBER),
        light(WarningKind::EngineTemperature, state.engine_temp > 110.0, RED),
        light(WarningKind::Battery, state.battery_voltage < 12.0, YELLOW),
        light(WarningKind::Fuel, state.fuel < 10.0, AMBER),
        light(WarningKind::AirConditioning, state.ac_on, CYAN),
        light(WarningKind::Lights, state.lights_on, GREEN),
        light(WarningKind::LeftSignal, left_blink && state.blink_on(), GREEN),
        light(WarningKind::RightSignal, right_blink && state.blink_on(), GREEN),
        light(WarningKind::ParkingBrake, state.parking_brake, RED),
        light(WarningKind::Seatbelt, !state.seatbelt && state.is_moving(), RED),
        light(WarningKind::Abs, false, YELLOW),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn running() -> VehicleState {
        advance(
            &VehicleState::default(),
            &Controls {
                ignition: true,
                ..Controls::default()
            },
            DT,
        )
    }

    fn run_for(mut state: VehicleState, controls: Controls, seconds: f32) -> VehicleState {
        let frames = (seconds / DT).round() as usize;
        for _ in 0..frames {
            state = advance(&state, &controls, DT);
        }
        state
    }

    fn throttle() -> Controls {
        Controls {
            throttle: true,
            ..Controls::default()
        }
    }

    #[test]
    fn test_defaults() {
        let state = VehicleState::default();
        assert_eq!(state.rpm, 800.0);
        assert_eq!(state.fuel, 85.0);
        assert!(state.parking_brake);
        assert!(!state.engine_running);
        assert_eq!(state.gear, Gear::Park);
    }

    #[test]
    fn test_advance_does_not_mutate_input() {
        let state = VehicleState::default();
        let before = state.clone();
        let _ = advance(&state, &throttle(), DT);
        assert_eq!(state, before);
    }

    #[test]
    fn test_throttle_needs_running_engine() {
        let state = run_for(VehicleState::default(), throttle(), 2.0);
        assert_eq!(state.target_speed, 0.0);
        assert!(state.speed.abs() < 1e-3);
    }

    #[test]
    fn test_throttle_accelerates_and_caps() {
        let state = run_for(running(), throttle(), 2.0);
        assert!(state.speed > 50.0, "speed {}", state.speed);
        assert!(state.rpm > IDLE_RPM);
        assert_eq!(state.gear, Gear::Drive);

        let state = run_for(state, throttle(), 10.0);
        assert_eq!(state.target_speed, MAX_SPEED);
        assert_eq!(state.target_rpm, REDLINE_RPM);
        assert!(state.speed <= MAX_SPEED);
    }

    #[test]
    fn test_coasting_returns_to_idle() {
        let state = run_for(running(), throttle(), 3.0);
        let state = run_for(state, Controls::default(), 20.0);
        assert_eq!(state.target_speed, 0.0);
        assert_eq!(state.target_rpm, IDLE_RPM);
        assert!(state.speed < 1.0);
        assert!((state.rpm - IDLE_RPM).abs() < 5.0);
    }

    #[test]
    fn test_ignition_off_zeroes_targets() {
        let state = run_for(running(), throttle(), 2.0);
        let state = advance(
            &state,
            &Controls {
                ignition: true,
                ..Controls::default()
            },
            DT,
        );
        assert!(!state.engine_running);
        assert_eq!(state.target_speed, 0.0);
        assert_eq!(state.target_rpm, 0.0);
    }

    #[test]
    fn test_toggles_fire_once_per_press() {
        let press = Controls {
            air_conditioning: true,
            ..Controls::default()
        };
        let state = advance(&VehicleState::default(), &press, DT);
        assert!(state.ac_on);
        let state = advance(&state, &Controls::default(), DT);
        assert!(state.ac_on);
        let state = advance(&state, &press, DT);
        assert!(!state.ac_on);
    }

    #[test]
    fn test_signals_are_exclusive_and_hazards_clear_them() {
        let left = Controls {
            left_signal: true,
            ..Controls::default()
        };
        let right = Controls {
            right_signal: true,
            ..Controls::default()
        };
        let hazards = Controls {
            hazards: true,
            ..Controls::default()
        };
        let state = advance(&VehicleState::default(), &left, DT);
        assert!(state.turn_signal_left);
        let state = advance(&state, &right, DT);
        assert!(state.turn_signal_right && !state.turn_signal_left);
        let state = advance(&state, &hazards, DT);
        assert!(state.hazards_on);
        assert!(!state.turn_signal_left && !state.turn_signal_right);
    }

    #[test]
    fn test_display_mode_cycles() {
        assert_eq!(DisplayMode::Comfort.previous(), DisplayMode::Individual);
        assert_eq!(DisplayMode::Individual.next(), DisplayMode::Comfort);
        let next = Controls {
            mode_next: true,
            ..Controls::default()
        };
        let state = advance(&VehicleState::default(), &next, DT);
        assert_eq!(state.display_mode, DisplayMode::Sport);
    }

    #[test]
    fn test_blink_timer_wraps() {
        let mut state = VehicleState::default();
        state.blink_timer = 0.99;
        let state = advance(&state, &Controls::default(), 0.02);
        assert_eq!(state.blink_timer, 0.0);
        assert!(state.blink_on());
    }

    #[test]
    fn test_fuel_and_distance_accumulate() {
        let start = running();
        let state = run_for(start.clone(), throttle(), 5.0);
        assert!(state.fuel < start.fuel);
        assert!(state.trip_a > 0.0);
        assert!(state.odometer > start.odometer);

        let mut empty = state.clone();
        empty.fuel = 0.0;
        let empty = advance(&empty, &throttle(), 1.0);
        assert_eq!(empty.fuel, 0.0);
    }

    #[test]
    fn test_engine_cools_when_off() {
        let state = run_for(VehicleState::default(), Controls::default(), 5.0);
        assert!(state.engine_temp < 90.0);
    }

    #[test]
    fn test_readings_are_normalized() {
        let mut state = VehicleState::default();
        state.speed = 85.0;
        state.rpm = 4000.0;
        state.fuel = 50.0;
        state.engine_temp = 100.0;
        let readings = state.readings();
        assert!((readings.speed - 0.34).abs() < 1e-6);
        assert_eq!(readings.rpm, 0.5);
        assert_eq!(readings.fuel, 0.5);
        assert_eq!(readings.temperature, 0.5);
    }

    #[test]
    fn test_warning_lights() {
        let mut state = VehicleState::default();
        let lights = warning_lights(&state);
        assert_eq!(lights.len(), 12);
        assert_eq!(lights[9].kind, WarningKind::ParkingBrake);
        assert_eq!(lights[11].kind, WarningKind::Abs);
        assert!(lights[9].active, "parking brake on by default");
        assert!(!lights[0].active && !lights[10].active);

        state.speed = 30.0;
        state.fuel = 5.0;
        state.hazards_on = true;
        state.blink_timer = 0.2;
        let lights = warning_lights(&state);
        assert!(lights[0].active, "engine off while moving");
        assert!(lights[4].active, "low fuel");
        assert!(lights[7].active && lights[8].active, "hazards blink both");
        assert!(lights[10].active, "unbuckled while moving");
        assert!(!lights[11].active);

        state.blink_timer = 0.7;
        let lights = warning_lights(&state);
        assert!(!lights[7].active && !lights[8].active);
    }
}
