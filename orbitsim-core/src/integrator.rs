use crate::body::Body;
use crate::engine::{compute_accelerations, reference_distance};
use crate::error::SimError;

/// Step the bodies forward by dt using semi-implicit Euler integration
///
/// All accelerations are computed from the start-of-step snapshot before any
/// body moves. Trails and reference distances are updated once every
/// position for the step is final.
pub fn step(bodies: &mut [Body], dt: f64) -> Result<(), SimError> {
    if !dt.is_finite() || dt <= 0.0 {
        return Err(SimError::InvalidTimestep(dt));
    }

    // First, compute all accelerations
    let accelerations = compute_accelerations(bodies)?;

    // Update velocities and positions (semi-implicit Euler: v += a*dt, then x += v*dt)
    for (body, accel) in bodies.iter_mut().zip(&accelerations) {
        body.velocity += *accel * dt;
        body.position += body.velocity * dt;
    }

    // Positions are final; measure against the end-of-step reference position
    let distances: Vec<f64> = bodies
        .iter()
        .map(|body| reference_distance(body, bodies))
        .collect();
    for (body, distance) in bodies.iter_mut().zip(distances) {
        body.trail.push(body.position);
        body.reference_distance = distance;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::force_between;
    use glam::DVec2;

    #[test]
    fn position_uses_updated_velocity() {
        let sun = Body::new(DVec2::ZERO, DVec2::ZERO, 1e30, true).unwrap();
        let planet = Body::new(DVec2::new(1e11, 0.0), DVec2::new(0.0, 3e4), 1e24, false).unwrap();
        let force = force_between(&planet, &sun).unwrap();

        let dt = 10.0;
        let mut bodies = vec![sun, planet.clone()];
        step(&mut bodies, dt).unwrap();

        let v_new = planet.velocity + force / planet.mass() * dt;
        let x_new = planet.position + v_new * dt;
        assert_eq!(bodies[1].velocity, v_new);
        assert_eq!(bodies[1].position, x_new);
        assert_ne!(bodies[1].position, planet.position + planet.velocity * dt);
    }

    #[test]
    fn failed_step_leaves_bodies_untouched() {
        let a = Body::new(DVec2::ZERO, DVec2::X, 1.0, true).unwrap();
        let b = Body::new(DVec2::ZERO, DVec2::Y, 1.0, false).unwrap();
        let mut bodies = vec![a, b];
        assert!(step(&mut bodies, 1.0).is_err());
        assert_eq!(bodies[0].position, DVec2::ZERO);
        assert_eq!(bodies[1].velocity, DVec2::Y);
        assert!(bodies[0].trail.is_empty());
    }

    #[test]
    fn non_finite_timestep_is_rejected() {
        let a = Body::new(DVec2::ZERO, DVec2::X, 1.0, true).unwrap();
        let b = Body::new(DVec2::new(5.0, 0.0), DVec2::Y, 1.0, false).unwrap();
        let mut bodies = vec![a, b];
        for dt in [f64::INFINITY, f64::NAN, 0.0, -1.0] {
            assert!(matches!(
                step(&mut bodies, dt),
                Err(SimError::InvalidTimestep(_))
            ));
        }
        assert_eq!(bodies[0].position, DVec2::ZERO);
        assert!(bodies[1].trail.is_empty());
    }

    #[test]
    fn reference_distances_follow_the_first_reference() {
        let mut bodies = vec![
            Body::new(DVec2::new(3.0, 0.0), DVec2::ZERO, 1.0, false).unwrap(),
            Body::new(DVec2::ZERO, DVec2::ZERO, 1.0, true).unwrap(),
            Body::new(DVec2::new(0.0, 10.0), DVec2::ZERO, 1.0, true).unwrap(),
        ];
        step(&mut bodies, 1e-3).unwrap();

        let expected = bodies[0].position.distance(bodies[1].position);
        assert_eq!(bodies[0].reference_distance, expected);
        assert_eq!(bodies[1].reference_distance, 0.0);
        assert_eq!(bodies[2].reference_distance, 0.0);
    }

    #[test]
    fn empty_slice_is_a_no_op() {
        let mut bodies: Vec<Body> = Vec::new();
        assert!(step(&mut bodies, 1.0).is_ok());
    }
}
