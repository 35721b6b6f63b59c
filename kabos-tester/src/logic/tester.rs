use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::logic::quiz_tester::{QuizTester, SimulationPlan, SimulationSummary};
use crate::scenario::TestScenario;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub seed: u64,
    pub passed: bool,
    pub iterations_run: usize,
    pub successful_iterations: usize,
    pub failures: Vec<String>,
    #[serde(with = "duration_serde")]
    pub average_duration: Duration,
    #[serde(with = "duration_vec_serde")]
    pub performance_data: Vec<Duration>,
}

pub struct LogicTester {
    tester: QuizTester,
}

impl LogicTester {
    pub const fn new(tester: QuizTester) -> Self {
        Self { tester }
    }

    pub fn run_scenario(
        &self,
        scenario: &TestScenario,
        seeds: &[u64],
        iterations: usize,
    ) -> Vec<ScenarioResult> {
        let mut results = Vec::new();

        for &seed in seeds {
            if self.tester.verbose() {
                println!(
                    "🧪 Testing scenario: {} (policy: {} seed: {})",
                    scenario.name.bright_white(),
                    scenario.plan.strategy,
                    seed
                );
            }

            let result = self.run_single_scenario(scenario, seed, iterations);
            results.push(result);
        }

        results
    }

    fn run_single_scenario(
        &self,
        scenario: &TestScenario,
        seed: u64,
        iterations: usize,
    ) -> ScenarioResult {
        let (successes, failures, performance_data) =
            self.run_simulation_iterations(&scenario.plan, seed, iterations);

        let avg_duration = if performance_data.is_empty() {
            Duration::ZERO
        } else {
            performance_data.iter().sum::<Duration>()
                / u32::try_from(performance_data.len()).unwrap_or(1)
        };

        ScenarioResult {
            scenario_name: scenario.name.clone(),
            seed,
            passed: failures.is_empty(),
            iterations_run: iterations,
            successful_iterations: successes,
            failures,
            average_duration: avg_duration,
            performance_data,
        }
    }

    fn run_simulation_iterations(
        &self,
        plan: &SimulationPlan,
        seed: u64,
        iterations: usize,
    ) -> (usize, Vec<String>, Vec<Duration>) {
        let mut successes = 0;
        let mut failures = Vec::new();
        let mut performance_data = Vec::new();

        for i in 0..iterations {
            let start_time = Instant::now();
            let iteration_seed = seed.wrapping_add(u64::try_from(i).unwrap_or(u64::MAX));

            let verdict = self
                .tester
                .run_plan(plan, iteration_seed)
                .map_err(|err| format!("{err:#}"))
                .and_then(|summary| match evaluate_expectations(plan, &summary) {
                    Some(err) => Err(format!("{err} | {}", summarize_run(&summary))),
                    None => Ok(summary),
                });

            match verdict {
                Ok(summary) => {
                    successes += 1;
                    let duration = start_time.elapsed();
                    performance_data.push(duration);

                    if self.tester.verbose() {
                        println!(
                            "  ✅ Iteration {}/{} passed ({duration:?}) {}",
                            i + 1,
                            iterations,
                            summarize_run(&summary)
                        );
                    }
                }
                Err(err) => {
                    log::warn!("seed {iteration_seed} failed: {err}");
                    if self.tester.verbose() {
                        println!(
                            "  ❌ Iteration {}/{} failed: {}",
                            i + 1,
                            iterations,
                            err.as_str().red()
                        );
                    }
                    failures.push(format!(
                        "Iteration {} (policy {}, seed {}): {}",
                        i + 1,
                        plan.strategy.label(),
                        iteration_seed,
                        err
                    ));
                }
            }
        }

        (successes, failures, performance_data)
    }
}

fn evaluate_expectations(plan: &SimulationPlan, summary: &SimulationSummary) -> Option<String> {
    for expectation in &plan.expectations {
        if let Err(err) = expectation.evaluate(summary) {
            return Some(err.to_string());
        }
    }
    None
}

fn summarize_run(summary: &SimulationSummary) -> String {
    let last_answers = summary
        .decisions
        .iter()
        .rev()
        .take(3)
        .map(|entry| {
            format!(
                "step {} [{}] {} picked {} ({:?})",
                entry.step, entry.stage, entry.prompt, entry.choice_value, entry.verdict
            )
        })
        .collect::<Vec<_>>();
    let answers = if last_answers.is_empty() {
        "no answers recorded".to_string()
    } else {
        last_answers.join(" | ")
    };
    format!(
        "ended on {} after {} steps (reached {}), {} correct / {} answers | {}",
        summary.final_screen(),
        summary.steps.len(),
        kabos_game::Stage::from_index(summary.metrics.highest_stage_index)
            .map_or("-", kabos_game::Stage::label),
        summary.metrics.correct,
        summary.metrics.answers,
        answers
    )
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_millis().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u128::deserialize(deserializer)?;
        Ok(Duration::from_millis(u64::try_from(millis).unwrap_or(0)))
    }
}

mod duration_vec_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(durations: &[Duration], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let millis: Vec<u128> = durations.iter().map(Duration::as_millis).collect();
        millis.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis_vec = Vec::<u128>::deserialize(deserializer)?;
        Ok(millis_vec
            .into_iter()
            .map(|m| Duration::from_millis(u64::try_from(m).unwrap_or(0)))
            .collect())
    }
}
