pub mod catalog;

use crate::logic::SimulationPlan;

/// Named plan the logic tester runs for every seed.
#[derive(Debug, Clone)]
pub struct TestScenario {
    pub name: String,
    pub plan: SimulationPlan,
}

impl TestScenario {
    #[must_use]
    pub fn simulation(name: impl Into<String>, plan: SimulationPlan) -> Self {
        Self {
            name: name.into(),
            plan,
        }
    }
}

/// Keys `all` expands to, in run order.
pub const SCENARIO_KEYS: [&str; 8] = [
    "smoke",
    "perfect-run",
    "stumbler-run",
    "saboteur-run",
    "guesser-run",
    "deterministic-replay",
    "choice-invariants",
    "restart-cycle",
];

pub fn get_scenario(name: &str) -> Option<TestScenario> {
    match name.to_lowercase().as_str() {
        "smoke" => Some(catalog::smoke_scenario()),
        "perfect-run" | "perfect" => Some(catalog::perfect_run_scenario()),
        "stumbler-run" | "stumbler" => Some(catalog::stumbler_run_scenario()),
        "saboteur-run" | "saboteur" => Some(catalog::saboteur_run_scenario()),
        "guesser-run" | "guesser" => Some(catalog::guesser_run_scenario()),
        "deterministic-replay" | "deterministic" => {
            Some(catalog::deterministic_replay_scenario())
        }
        "choice-invariants" | "choices" => Some(catalog::choice_invariants_scenario()),
        "restart-cycle" | "restart" => Some(catalog::restart_cycle_scenario()),
        _ => None,
    }
}

pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    vec![
        ("smoke", "Smoke Test"),
        ("perfect-run", "Perfect Player Wins"),
        ("stumbler-run", "One Miss Per Question Still Wins"),
        ("saboteur-run", "Wrong Answers Exhaust Attempts"),
        ("guesser-run", "Random Guesser Reaches An Ending"),
        ("deterministic-replay", "Deterministic Replay Verification"),
        ("choice-invariants", "Answer Choice Invariants"),
        ("restart-cycle", "Restart Cycle"),
    ]
}
