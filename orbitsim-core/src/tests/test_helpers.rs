//! Test helper utilities for orbitsim tests

use crate::engine::{Simulator, AU, DAY, G};
use crate::runtime::{run_scenario, RuntimeError, SimulationResult};
use glam::DVec2;
use std::fs;
use std::path::PathBuf;

/// Mass of the reference star used by the fixtures (kg)
pub const SUN_MASS: f64 = 1.98892e30;

/// Mass of the Earth-like planet used by the fixtures (kg)
pub const EARTH_MASS: f64 = 5.9742e24;

/// Check if two floating point values are approximately equal within tolerance
pub fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol
}

/// Speed of a circular orbit of radius `r` around `central_mass`
pub fn circular_speed(central_mass: f64, r: f64) -> f64 {
    (G * central_mass / r).sqrt()
}

/// Fixed Sun plus one planet on a circular orbit at 1 AU, stepping one day
///
/// The Sun is given the opposite momentum so the barycenter stays put.
pub fn sun_and_earth() -> Simulator {
    let mut sim = Simulator::new(DAY);
    let v = circular_speed(SUN_MASS + EARTH_MASS, AU);
    let sun_v = -v * EARTH_MASS / SUN_MASS;
    sim.create_named_body("Sun", DVec2::ZERO, DVec2::new(0.0, sun_v), SUN_MASS, true)
        .expect("valid sun");
    sim.create_named_body("Earth", DVec2::new(AU, 0.0), DVec2::new(0.0, v), EARTH_MASS, false)
        .expect("valid earth");
    sim
}

/// Path to a scenario file under `tests/<dir>/`
pub fn data_path(dir: &str, filename: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push(dir);
    path.push(filename);
    path
}

/// Run a scenario from a file under `tests/data/`
pub fn run_orbit_file(filename: &str) -> Result<SimulationResult, RuntimeError> {
    let path = data_path("data", filename);
    let source = fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read {}: {}", path.display(), e));
    run_scenario(&source)
}

/// Compare two simulation results with a relative tolerance on positions
pub fn results_approx_equal(a: &SimulationResult, b: &SimulationResult, rel_tol: f64) -> bool {
    if a.steps != b.steps || a.bodies.len() != b.bodies.len() {
        return false;
    }

    a.bodies.iter().zip(&b.bodies).all(|(x, y)| {
        let scale = x.position.length().max(y.position.length()).max(1.0);
        x.name == y.name
            && x.trail_len == y.trail_len
            && x.position.distance(y.position) <= rel_tol * scale
    })
}
