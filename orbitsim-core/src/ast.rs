use crate::diagnostics::Span;
use crate::engine::DAY;
use glam::DVec2;

/// A parsed scenario file
#[derive(Debug, Clone)]
pub struct Scenario {
    pub bodies: Vec<BodyDecl>,
    pub simulate: SimulateDecl,
    pub trail: TrailDecl,
}

/// Body declaration: `body name at (x, y) [velocity (vx, vy)] mass m [reference]`
#[derive(Debug, Clone)]
pub struct BodyDecl {
    pub name: String,
    pub position: DVec2,
    pub velocity: DVec2,
    pub mass: f64,
    pub reference: bool,
    pub span: Option<Span>,
}

/// Simulation configuration: `simulate dt = x steps = n`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulateDecl {
    pub dt: f64,
    pub steps: u64,
}

impl Default for SimulateDecl {
    fn default() -> Self {
        Self {
            dt: DAY,
            steps: 365,
        }
    }
}

/// Trail configuration: `trail max = n`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrailDecl {
    pub max: Option<usize>,
}
