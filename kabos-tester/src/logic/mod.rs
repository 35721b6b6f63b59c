pub mod policy;
pub mod quiz_tester;
pub mod reports;
pub mod seeds;
pub mod simulation;
pub mod tester;
pub mod transcript;

pub use policy::PlayStrategy;
pub use quiz_tester::{QuizTester, SimulationPlan, SimulationSummary};
pub use seeds::resolve_seed_inputs;
pub use tester::*;
