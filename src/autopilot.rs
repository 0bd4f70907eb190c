//! Random driver for unattended demo runs.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::vehicle::{Controls, VehicleState};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Accelerate,
    Coast,
}

/// Produces [`Controls`] in place of the keyboard: gets the car ready to
/// drive, then alternates throttle bursts and coasting of random length.
#[derive(Debug)]
pub struct Autopilot {
    rng: StdRng,
    phase: Phase,
    remaining: f32,
}

impl Autopilot {
    pub fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let remaining = rng.random_range(2.0..6.0);
        Self {
            rng,
            phase: Phase::Accelerate,
            remaining,
        }
    }

    pub fn controls(&mut self, state: &VehicleState, dt: f32) -> Controls {
        let mut controls = Controls {
            ignition: !state.engine_running,
            parking_brake: state.parking_brake,
            seatbelt: !state.seatbelt,
            ..Controls::default()
        };
        if controls.ignition || controls.parking_brake || controls.seatbelt {
            return controls;
        }

        self.remaining -= dt;
        if self.remaining <= 0.0 {
            let (phase, remaining) = match self.phase {
                Phase::Accelerate => (Phase::Coast, self.rng.random_range(1.0..4.0)),
                Phase::Coast => (Phase::Accelerate, self.rng.random_range(2.0..6.0)),
            };
            log::debug!("Autopilot: {:?} for {:.1}s", phase, remaining);
            self.phase = phase;
            self.remaining = remaining;
        }
        controls.throttle = self.phase == Phase::Accelerate;

        // Roughly one signal change every ten seconds.
        if self.rng.random_bool(f64::from((dt * 0.1).clamp(0.0, 1.0))) {
            if self.rng.random_bool(0.5) {
                controls.left_signal = true;
            } else {
                controls.right_signal = true;
            }
        }
        controls
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vehicle::advance;

    const DT: f32 = 1.0 / 60.0;

    fn drive(seed: u64, seconds: f32) -> (VehicleState, Vec<Controls>) {
        let mut pilot = Autopilot::new(seed);
        let mut state = VehicleState::default();
        let mut history = Vec::new();
        for _ in 0..(seconds / DT) as usize {
            let controls = pilot.controls(&state, DT);
            state = advance(&state, &controls, DT);
            history.push(controls);
        }
        (state, history)
    }

    #[test]
    fn test_prepares_car_first() {
        let mut pilot = Autopilot::new(1);
        let controls = pilot.controls(&VehicleState::default(), DT);
        assert!(controls.ignition && controls.parking_brake && controls.seatbelt);
        assert!(!controls.throttle);
    }

    #[test]
    fn test_drives_off() {
        let (state, _) = drive(7, 3.0);
        assert!(state.engine_running);
        assert!(!state.parking_brake);
        assert!(state.seatbelt);
        assert!(state.speed > 10.0, "speed {}", state.speed);
    }

    #[test]
    fn test_same_seed_same_drive() {
        let (a, history_a) = drive(42, 20.0);
        let (b, history_b) = drive(42, 20.0);
        assert_eq!(history_a, history_b);
        assert_eq!(a, b);
    }

    #[test]
    fn test_alternates_phases() {
        let (_, history) = drive(3, 30.0);
        let settled = &history[1..];
        assert!(settled.iter().any(|c| c.throttle));
        assert!(settled.iter().any(|c| !c.throttle));
    }
}
