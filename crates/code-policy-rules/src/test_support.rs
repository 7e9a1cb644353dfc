//! Fixture helpers shared by rule tests.

use code_policy_core::{snapshot, AnalysisRun};

/// Builds an analysis run from JSON compilation units.
pub(crate) fn run(units: &[&str]) -> AnalysisRun {
    let units = units
        .iter()
        .map(|json| snapshot::parse_unit(json).expect("valid unit"));
    let program = snapshot::assemble(units).expect("valid program");
    AnalysisRun::from_program(program).expect("consistent index")
}
