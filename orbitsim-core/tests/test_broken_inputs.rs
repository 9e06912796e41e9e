//! Tests for broken/invalid scenario files

use orbitsim_core::tests::test_helpers::data_path;
use orbitsim_core::{analyze_scenario, parse_scenario, run_scenario, RuntimeError};

fn broken_source(filename: &str) -> String {
    std::fs::read_to_string(data_path("broken", filename)).unwrap()
}

#[test]
fn test_coincident_bodies_are_rejected() {
    let source = broken_source("coincident.orbit");

    let scenario = parse_scenario(&source).expect("Should parse");
    let diagnostics = analyze_scenario(&scenario);
    assert!(diagnostics.has_errors(), "Should detect coincident bodies");

    let result = run_scenario(&source);
    assert!(matches!(result, Err(RuntimeError::Analysis(_))));
}

#[test]
fn test_zero_mass_is_rejected() {
    let source = broken_source("zero_mass.orbit");
    let err = run_scenario(&source).unwrap_err();
    assert!(err.to_string().contains("non-positive mass"), "{}", err);
}

#[test]
fn test_syntax_error_produces_parse_error() {
    let source = broken_source("syntax_error.orbit");

    match parse_scenario(&source) {
        Err(e) => {
            assert!(!e.to_string().is_empty(), "Error message should not be empty");
            assert!(e.span().is_some());
        }
        Ok(_) => panic!("Should have failed"),
    }
}

#[test]
fn test_missing_mass_produces_parse_error() {
    let source = broken_source("missing_mass.orbit");
    let err = parse_scenario(&source).unwrap_err();
    assert!(err.to_string().contains("Expected 'mass'"));
}

#[test]
fn test_bad_simulate_produces_parse_error() {
    let source = broken_source("bad_simulate.orbit");
    let result = run_scenario(&source);
    assert!(matches!(result, Err(RuntimeError::Parse(_))));
}

#[test]
fn test_parse_error_formatting_names_the_line() {
    let source = broken_source("syntax_error.orbit");
    let err = parse_scenario(&source).unwrap_err();
    let formatted = orbitsim_core::diagnostics::format_parse_error(&err, &source);
    assert!(formatted.contains("at line 2: planet Earth"), "{}", formatted);
}

#[test]
fn test_infinite_timestep_is_rejected() {
    let source = broken_source("infinite_dt.orbit");
    let err = run_scenario(&source).unwrap_err();
    assert!(matches!(err, RuntimeError::Analysis(_)));
    assert!(err.to_string().contains("timestep"), "{}", err);
}

#[test]
fn test_nan_position_is_rejected() {
    let source = broken_source("nan_position.orbit");
    let err = run_scenario(&source).unwrap_err();
    assert!(matches!(err, RuntimeError::Analysis(_)));
    assert!(err.to_string().contains("non-finite position"), "{}", err);
}
