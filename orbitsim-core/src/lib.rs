pub mod analyzer;
pub mod ast;
pub mod body;
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod integrator;
pub mod parser;
pub mod presets;
pub mod runtime;

pub use analyzer::analyze_scenario;
pub use ast::{BodyDecl, Scenario, SimulateDecl, TrailDecl};
pub use body::{Body, Trail};
pub use diagnostics::{Diagnostic, DiagnosticSeverity, Diagnostics, SourceLocation, Span};
pub use engine::{force_between, reference_distance, BodyId, Simulator, AU, DAY, G};
pub use error::SimError;
pub use parser::{parse_scenario, ParseError};
pub use runtime::{
    build_simulation_context, build_simulator, get_body_states, run_parsed, run_scenario,
    step_simulation, BodyState, RuntimeError, SimulationContext, SimulationResult,
};

// Test helpers module (public for integration tests)
// Always compiled - integration tests are separate crates and need access
pub mod tests;
