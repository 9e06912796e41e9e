use crate::body::{Body, Trail};
use crate::error::SimError;
use crate::integrator;
use glam::DVec2;

/// Newtonian gravitational constant (m³ kg⁻¹ s⁻²)
pub const G: f64 = 6.67428e-11;

/// One astronomical unit in meters
pub const AU: f64 = 149.6e6 * 1000.0;

/// One simulated day in seconds, the default timestep
pub const DAY: f64 = 3600.0 * 24.0;

/// Separation vector from `a` to `b` and its length
///
/// Fails unless the distance is finite and positive.
fn separation(a: &Body, b: &Body) -> Result<(DVec2, f64), SimError> {
    let delta = b.position - a.position;
    let distance = delta.length();
    if !(distance > 0.0 && distance.is_finite()) {
        return Err(SimError::DegenerateConfiguration {
            a: a.label().to_string(),
            b: b.label().to_string(),
            at: a.position,
            distance,
        });
    }
    Ok((delta, distance))
}

/// Force exerted by `b` on `a`
///
/// The direction is taken from `atan2` of the a→b separation and decomposed
/// into `(F cos θ, F sin θ)`. Fails when the two bodies coincide.
pub fn force_between(a: &Body, b: &Body) -> Result<DVec2, SimError> {
    let (delta, distance) = separation(a, b)?;
    let force = G * a.mass() * b.mass() / (distance * distance);
    let theta = delta.y.atan2(delta.x);
    Ok(DVec2::new(theta.cos() * force, theta.sin() * force))
}

/// Sum of the forces every other body exerts on `bodies[idx]`
pub fn total_force(bodies: &[Body], idx: usize) -> Result<DVec2, SimError> {
    let body = &bodies[idx];
    let mut total = DVec2::ZERO;
    for (j, other) in bodies.iter().enumerate() {
        if j == idx {
            continue;
        }
        total += force_between(body, other)?;
    }
    Ok(total)
}

/// Accelerations of all bodies, computed from the current positions only
pub fn compute_accelerations(bodies: &[Body]) -> Result<Vec<DVec2>, SimError> {
    (0..bodies.len())
        .map(|i| total_force(bodies, i).map(|f| f / bodies[i].mass()))
        .collect()
}

/// Position of the first body flagged as reference, if any
pub fn reference_position(bodies: &[Body]) -> Option<DVec2> {
    bodies.iter().find(|b| b.is_reference).map(|b| b.position)
}

/// Distance from `body` to the reference body
///
/// Zero for the reference body itself and when no reference exists.
pub fn reference_distance(body: &Body, bodies: &[Body]) -> f64 {
    if body.is_reference {
        return 0.0;
    }
    reference_position(bodies)
        .map(|p| body.position.distance(p))
        .unwrap_or(0.0)
}

/// Handle to a body owned by a [`Simulator`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyId(pub usize);

/// Owns the bodies and advances them by a fixed timestep
#[derive(Debug, Clone)]
pub struct Simulator {
    bodies: Vec<Body>,
    dt: f64,
    trail_limit: Option<usize>,
    steps: u64,
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new(DAY)
    }
}

impl Simulator {
    pub fn new(dt: f64) -> Self {
        Self {
            bodies: Vec::new(),
            dt,
            trail_limit: None,
            steps: 0,
        }
    }

    /// Cap every trail created from now on at `limit` points
    pub fn with_trail_limit(mut self, limit: Option<usize>) -> Self {
        self.trail_limit = limit;
        self
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Number of completed steps
    pub fn step_count(&self) -> u64 {
        self.steps
    }

    /// Simulated seconds since the first step
    pub fn elapsed(&self) -> f64 {
        self.steps as f64 * self.dt
    }

    pub fn create_body(
        &mut self,
        position: DVec2,
        velocity: DVec2,
        mass: f64,
        is_reference: bool,
    ) -> Result<BodyId, SimError> {
        let body = Body::new(position, velocity, mass, is_reference)?;
        Ok(self.add_body(body))
    }

    pub fn create_named_body(
        &mut self,
        name: impl Into<String>,
        position: DVec2,
        velocity: DVec2,
        mass: f64,
        is_reference: bool,
    ) -> Result<BodyId, SimError> {
        let body = Body::new(position, velocity, mass, is_reference)?.with_name(name);
        Ok(self.add_body(body))
    }

    /// Take ownership of an already validated body
    pub fn add_body(&mut self, mut body: Body) -> BodyId {
        if let Some(limit) = self.trail_limit {
            let mut trail = Trail::bounded(limit);
            for point in body.trail.iter() {
                trail.push(point);
            }
            body.trail = trail;
        }
        self.bodies.push(body);
        BodyId(self.bodies.len() - 1)
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn body(&self, id: BodyId) -> Result<&Body, SimError> {
        self.bodies.get(id.0).ok_or(SimError::UnknownBody(id.0))
    }

    pub fn body_by_name(&self, name: &str) -> Option<&Body> {
        self.bodies.iter().find(|b| b.name == name)
    }

    /// Force exerted on body `a` by body `b`
    pub fn force_between(&self, a: BodyId, b: BodyId) -> Result<DVec2, SimError> {
        force_between(self.body(a)?, self.body(b)?)
    }

    /// Advance every body by one timestep
    ///
    /// Nothing is mutated when the step fails.
    pub fn step(&mut self) -> Result<(), SimError> {
        if let Err(e) = integrator::step(&mut self.bodies, self.dt) {
            log::warn!("step {} rejected: {}", self.steps + 1, e);
            return Err(e);
        }
        self.steps += 1;
        log::trace!("completed step {}", self.steps);
        Ok(())
    }

    /// Total kinetic plus pairwise potential energy (J)
    ///
    /// Undefined, and reported as an error, when two bodies coincide.
    pub fn total_energy(&self) -> Result<f64, SimError> {
        let kinetic: f64 = self.bodies.iter().map(Body::kinetic_energy).sum();
        let mut potential = 0.0;
        for (i, a) in self.bodies.iter().enumerate() {
            for b in &self.bodies[i + 1..] {
                let (_, distance) = separation(a, b)?;
                potential -= G * a.mass() * b.mass() / distance;
            }
        }
        Ok(kinetic + potential)
    }

    /// Total angular momentum about the origin (z component)
    pub fn angular_momentum(&self) -> f64 {
        self.bodies
            .iter()
            .map(|b| b.mass() * b.position.perp_dot(b.velocity))
            .sum()
    }
}
