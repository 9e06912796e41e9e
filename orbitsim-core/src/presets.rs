//! Built-in scenarios

use crate::ast::{BodyDecl, Scenario, SimulateDecl, TrailDecl};
use crate::engine::AU;
use glam::DVec2;

fn planet(name: &str, distance_au: f64, speed_kms: f64, mass: f64) -> BodyDecl {
    BodyDecl {
        name: name.to_string(),
        position: DVec2::new(distance_au * AU, 0.0),
        velocity: DVec2::new(0.0, speed_kms * 1000.0),
        mass,
        reference: false,
        span: None,
    }
}

/// The Sun and the eight planets, all starting on the x axis
///
/// Inner planets alternate sides of the Sun; each starts with its mean
/// orbital speed perpendicular to the axis.
pub fn solar_system() -> Scenario {
    let sun = BodyDecl {
        name: "Sun".to_string(),
        position: DVec2::ZERO,
        velocity: DVec2::ZERO,
        mass: 1.98892e30,
        reference: true,
        span: None,
    };

    Scenario {
        bodies: vec![
            sun,
            planet("Earth", -1.0, 29.783, 5.9842e24),
            planet("Mars", -1.524, 24.077, 6.39e23),
            planet("Mercury", 0.387, -47.4, 0.330e23),
            planet("Venus", 0.723, -35.02, 4.8685e24),
            planet("Jupiter", -5.203, 13.07, 1.898e27),
            planet("Saturn", -9.582, 9.69, 5.683e26),
            planet("Uranus", -19.22, 6.80, 8.681e25),
            planet("Neptune", -30.05, 5.43, 1.024e26),
        ],
        simulate: SimulateDecl::default(),
        trail: TrailDecl::default(),
    }
}

/// Look up a preset by name
pub fn by_name(name: &str) -> Option<Scenario> {
    match name {
        "solar" | "solar-system" => Some(solar_system()),
        _ => None,
    }
}
