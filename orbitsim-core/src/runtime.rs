use crate::analyzer::analyze_scenario;
use crate::ast::Scenario;
use crate::body::Body;
use crate::diagnostics::Diagnostics;
use crate::engine::Simulator;
use crate::error::SimError;
use crate::parser::{parse_scenario, ParseError};
use glam::DVec2;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Simulation(#[from] SimError),
    #[error("scenario rejected: {}", .0.join("; "))]
    Analysis(Vec<String>),
}

/// Snapshot of one body for reporting and drawing
#[derive(Debug, Clone)]
pub struct BodyState {
    pub name: String,
    pub position: DVec2,
    pub velocity: DVec2,
    pub mass: f64,
    pub is_reference: bool,
    pub reference_distance: f64,
    pub trail_len: usize,
}

impl From<&Body> for BodyState {
    fn from(body: &Body) -> Self {
        Self {
            name: body.name.clone(),
            position: body.position,
            velocity: body.velocity,
            mass: body.mass(),
            is_reference: body.is_reference,
            reference_distance: body.reference_distance,
            trail_len: body.trail.len(),
        }
    }
}

/// Final result of running a scenario
#[derive(Debug, Clone)]
pub struct SimulationResult {
    pub bodies: Vec<BodyState>,
    pub steps: u64,
    pub elapsed: f64,
}

impl SimulationResult {
    pub fn body(&self, name: &str) -> Option<&BodyState> {
        self.bodies.iter().find(|b| b.name == name)
    }
}

/// Simulator plus step bookkeeping for interactive drivers
#[derive(Debug, Clone)]
pub struct SimulationContext {
    pub simulator: Simulator,
    pub current_step: u64,
    pub max_steps: u64,
}

/// Main entry point: parse, check and run a scenario
pub fn run_scenario(source: &str) -> Result<SimulationResult, RuntimeError> {
    let scenario = parse_scenario(source)?;
    run_parsed(&scenario)
}

/// Run an already parsed scenario to completion
pub fn run_parsed(scenario: &Scenario) -> Result<SimulationResult, RuntimeError> {
    let mut ctx = build_simulation_context(scenario)?;
    while !step_simulation(&mut ctx)? {}

    log::info!(
        "ran {} steps ({:.1} simulated days)",
        ctx.current_step,
        ctx.simulator.elapsed() / crate::engine::DAY
    );

    Ok(SimulationResult {
        bodies: get_body_states(&ctx),
        steps: ctx.current_step,
        elapsed: ctx.simulator.elapsed(),
    })
}

/// Build a Simulator from a parsed Scenario
///
/// Analyzer errors abort the build; warnings are logged.
pub fn build_simulator(scenario: &Scenario) -> Result<Simulator, RuntimeError> {
    let diagnostics = analyze_scenario(scenario);
    check_diagnostics(&diagnostics)?;

    let mut simulator =
        Simulator::new(scenario.simulate.dt).with_trail_limit(scenario.trail.max);
    for decl in &scenario.bodies {
        simulator.create_named_body(
            decl.name.clone(),
            decl.position,
            decl.velocity,
            decl.mass,
            decl.reference,
        )?;
    }

    log::info!(
        "built simulator with {} bodies, dt = {} s",
        simulator.bodies().len(),
        simulator.dt()
    );
    Ok(simulator)
}

pub fn build_simulation_context(scenario: &Scenario) -> Result<SimulationContext, RuntimeError> {
    Ok(SimulationContext {
        simulator: build_simulator(scenario)?,
        current_step: 0,
        max_steps: scenario.simulate.steps,
    })
}

/// Advance the context by one step; returns true once `max_steps` is reached
pub fn step_simulation(ctx: &mut SimulationContext) -> Result<bool, RuntimeError> {
    if ctx.current_step >= ctx.max_steps {
        return Ok(true);
    }
    ctx.simulator.step()?;
    ctx.current_step += 1;
    Ok(ctx.current_step >= ctx.max_steps)
}

pub fn get_body_states(ctx: &SimulationContext) -> Vec<BodyState> {
    ctx.simulator.bodies().iter().map(BodyState::from).collect()
}

fn check_diagnostics(diagnostics: &Diagnostics) -> Result<(), RuntimeError> {
    for warning in diagnostics.warnings() {
        log::warn!("{}", warning);
    }
    if diagnostics.has_errors() {
        let messages = diagnostics.errors().map(|d| d.message.clone()).collect();
        return Err(RuntimeError::Analysis(messages));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_simulation_stops_at_max_steps() {
        let scenario = parse_scenario(
            "body a at (0, 0) mass 1 reference\nbody b at (1, 0) mass 1\nsimulate dt = 0.1 steps = 2",
        )
        .unwrap();
        let mut ctx = build_simulation_context(&scenario).unwrap();
        assert!(!step_simulation(&mut ctx).unwrap());
        assert!(step_simulation(&mut ctx).unwrap());
        assert!(step_simulation(&mut ctx).unwrap());
        assert_eq!(ctx.simulator.step_count(), 2);
    }

    #[test]
    fn analysis_errors_abort_the_run() {
        let err = run_scenario("body a at (0, 0) mass 1\nbody a at (1, 0) mass -2").unwrap_err();
        match err {
            RuntimeError::Analysis(messages) => assert_eq!(messages.len(), 2),
            other => panic!("unexpected error: {other}"),
        }
    }
}
