use crate::error::SimError;
use glam::DVec2;
use std::collections::VecDeque;

/// Ordered history of a body's past positions, oldest first
///
/// Unbounded unless built with [`Trail::bounded`], in which case the oldest
/// point is dropped once the limit is reached.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trail {
    points: VecDeque<DVec2>,
    limit: Option<usize>,
}

impl Trail {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn bounded(limit: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(limit.min(1024)),
            limit: Some(limit),
        }
    }

    /// Append a point, evicting the oldest one when the trail is full
    pub fn push(&mut self, point: DVec2) {
        if let Some(limit) = self.limit {
            if limit == 0 {
                return;
            }
            while self.points.len() >= limit {
                self.points.pop_front();
            }
        }
        self.points.push_back(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last(&self) -> Option<DVec2> {
        self.points.back().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = DVec2> + '_ {
        self.points.iter().copied()
    }
}

/// A point mass in the simulation
#[derive(Debug, Clone)]
pub struct Body {
    pub name: String,
    pub position: DVec2,
    pub velocity: DVec2,
    mass: f64,
    pub is_reference: bool,
    pub reference_distance: f64,
    pub trail: Trail,
}

impl Body {
    /// Create a body with an empty, unbounded trail
    ///
    /// Fails with [`SimError::InvalidBody`] unless `mass` is finite and positive,
    /// and with [`SimError::NonFiniteState`] if position or velocity is not finite.
    pub fn new(
        position: DVec2,
        velocity: DVec2,
        mass: f64,
        is_reference: bool,
    ) -> Result<Self, SimError> {
        if !mass.is_finite() || mass <= 0.0 {
            return Err(SimError::InvalidBody { mass });
        }
        if !position.is_finite() {
            return Err(SimError::NonFiniteState {
                field: "position",
                value: position,
            });
        }
        if !velocity.is_finite() {
            return Err(SimError::NonFiniteState {
                field: "velocity",
                value: velocity,
            });
        }
        Ok(Self {
            name: String::new(),
            position,
            velocity,
            mass,
            is_reference,
            reference_distance: 0.0,
            trail: Trail::unbounded(),
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Name used in messages; unnamed bodies show as `<unnamed>`
    pub fn label(&self) -> &str {
        if self.name.is_empty() {
            "<unnamed>"
        } else {
            &self.name
        }
    }

    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.velocity.length_squared()
    }
}
