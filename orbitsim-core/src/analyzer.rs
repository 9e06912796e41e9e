//! Static checks for parsed scenarios
//!
//! Catches configurations the physics core would reject (or report
//! meaningless distances for) before any step runs.

use crate::ast::Scenario;
use crate::diagnostics::{Diagnostic, Diagnostics};
use std::collections::HashMap;

/// Analyze a scenario and return diagnostics
pub fn analyze_scenario(scenario: &Scenario) -> Diagnostics {
    let mut diagnostics = Diagnostics::new();

    // Unique names
    let mut names = HashMap::new();
    for (idx, body) in scenario.bodies.iter().enumerate() {
        if names.insert(body.name.as_str(), idx).is_some() {
            diagnostics.push(Diagnostic::error(
                format!("duplicate body name '{}'", body.name),
                body.span,
            ));
        }
    }

    // Positive masses
    for body in &scenario.bodies {
        if !body.mass.is_finite() || body.mass <= 0.0 {
            diagnostics.push(Diagnostic::error(
                format!("body '{}' has non-positive mass {}", body.name, body.mass),
                body.span,
            ));
        }
    }

    for body in &scenario.bodies {
        for (field, value) in [("position", body.position), ("velocity", body.velocity)] {
            if !value.is_finite() {
                diagnostics.push(Diagnostic::error(
                    format!(
                        "body '{}' has non-finite {} ({}, {})",
                        body.name, field, value.x, value.y
                    ),
                    body.span,
                ));
            }
        }
    }

    // Coincident positions make the force law undefined
    for (i, a) in scenario.bodies.iter().enumerate() {
        for b in &scenario.bodies[i + 1..] {
            if a.position == b.position {
                diagnostics.push(Diagnostic::error(
                    format!(
                        "bodies '{}' and '{}' share position ({}, {})",
                        a.name, b.name, a.position.x, a.position.y
                    ),
                    b.span,
                ));
            }
        }
    }

    let references: Vec<_> = scenario.bodies.iter().filter(|b| b.reference).collect();
    match references.len() {
        0 if !scenario.bodies.is_empty() => diagnostics.push(Diagnostic::warning(
            "no reference body; reference distances will stay 0",
            None,
        )),
        0 | 1 => {}
        _ => {
            let names: Vec<_> = references.iter().map(|b| b.name.as_str()).collect();
            diagnostics.push(Diagnostic::warning(
                format!(
                    "multiple reference bodies ({}); distances use '{}'",
                    names.join(", "),
                    names[0]
                ),
                references[1].span,
            ));
        }
    }

    if !scenario.simulate.dt.is_finite() || scenario.simulate.dt <= 0.0 {
        diagnostics.push(Diagnostic::error(
            format!("timestep must be finite and positive, got {}", scenario.simulate.dt),
            None,
        ));
    }

    if scenario.trail.max == Some(0) {
        diagnostics.push(Diagnostic::warning(
            "trail max = 0 disables trails",
            None,
        ));
    }

    for d in diagnostics.iter() {
        log::debug!("{}", d);
    }

    diagnostics
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_scenario;

    fn analyze(source: &str) -> Diagnostics {
        analyze_scenario(&parse_scenario(source).unwrap())
    }

    #[test]
    fn clean_scenario_has_no_diagnostics() {
        let diags = analyze(
            "body sun at (0, 0) mass 1e30 reference\nbody earth at (1 au, 0) mass 6e24",
        );
        assert!(diags.is_empty(), "{:?}", diags);
    }

    #[test]
    fn negative_dt_is_an_error() {
        let diags = analyze("body a at (0, 0) mass 1 reference\nsimulate dt = -1 steps = 3");
        assert!(diags.errors().any(|e| e.message.contains("timestep")));
    }

    #[test]
    fn infinite_dt_is_an_error() {
        let diags = analyze("body a at (0, 0) mass 1 reference\nsimulate dt = inf steps = 3");
        assert!(diags.errors().any(|e| e.message.contains("timestep")));
    }

    #[test]
    fn nan_position_is_an_error() {
        let diags = analyze("body p at (NaN, 0) mass 1 reference");
        assert!(diags.errors().any(|e| e.message.contains("non-finite position")));
    }

    #[test]
    fn zero_trail_is_a_warning() {
        let diags = analyze("body a at (0, 0) mass 1 reference\ntrail max = 0");
        assert!(!diags.has_errors());
        assert!(diags.warnings().any(|w| w.message.contains("trail")));
    }
}
