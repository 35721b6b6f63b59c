mod logic;
mod scenario;
mod util;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use kabos_game::QuizConfig;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::{Path, PathBuf};
use std::time::Instant;

use logic::{LogicTester, QuizTester, ScenarioResult, resolve_seed_inputs};
use scenario::{SCENARIO_KEYS, get_scenario, list_scenarios};
use util::split_csv;

#[derive(Debug, Parser)]
#[command(name = "kabos-tester", version = "0.1.0")]
#[command(about = "Automated QA for the Kabos quiz - scripted players over seeded sessions")]
struct Args {
    /// Scenarios to run (comma-separated, or `all`)
    #[arg(long, default_value = "smoke")]
    scenarios: String,

    /// List all available scenarios and exit
    #[arg(long)]
    list_scenarios: bool,

    /// Seeds to run (comma-separated integers or `a..b` ranges)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Number of iterations per scenario and seed
    #[arg(long, default_value_t = 10)]
    iterations: usize,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console"])]
    report: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// JSON file overriding the quiz rules
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if maybe_list_scenarios(&args)? {
        return Ok(());
    }

    announce_banner();

    let start_time = Instant::now();
    let quiz_config = load_quiz_config(args.config.as_deref())?;
    let scenarios = expand_scenarios(&args.scenarios);
    let seeds = resolve_seed_inputs(&split_csv(&args.seeds))?;
    log::info!(
        "running {} scenario(s) over {} seed(s) x {} iteration(s)",
        scenarios.len(),
        seeds.len(),
        args.iterations
    );

    let tester = QuizTester::new(quiz_config, args.verbose);
    let all_results = run_logic_scenarios(&args, &scenarios, &seeds, tester);

    write_reports(&args, &all_results, start_time)?;

    if all_results.iter().any(|r| !r.passed) {
        std::process::exit(1);
    }

    Ok(())
}

fn maybe_list_scenarios(args: &Args) -> Result<bool> {
    if !args.list_scenarios {
        return Ok(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(output_target.writer(), "Available scenarios:")?;
    for (key, description) in list_scenarios() {
        writeln!(output_target.writer(), "  {key:25} - {description}")?;
    }
    output_target.flush_inner()?;
    Ok(true)
}

fn announce_banner() {
    println!("{}", "🎮 Kabos Automated Tester".bright_cyan().bold());
    println!("{}", "=========================".cyan());
}

fn load_quiz_config(path: Option<&Path>) -> Result<QuizConfig> {
    let Some(path) = path else {
        return Ok(QuizConfig::default());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    QuizConfig::from_json(&raw).with_context(|| format!("invalid quiz config {}", path.display()))
}

fn expand_scenarios(scenarios_arg: &str) -> Vec<String> {
    let mut scenarios = split_csv(scenarios_arg);
    if scenarios.iter().any(|s| s == "all") {
        scenarios.retain(|s| s != "all");
        for key in SCENARIO_KEYS {
            if !scenarios.iter().any(|s| s == key) {
                scenarios.push(key.to_string());
            }
        }
    }
    scenarios
}

fn run_logic_scenarios(
    args: &Args,
    scenarios: &[String],
    seeds: &[u64],
    tester: QuizTester,
) -> Vec<ScenarioResult> {
    println!("{}", "🧠 Running Logic Tests".bright_yellow().bold());
    println!("{}", "-".repeat(30).yellow());

    let logic_tester = LogicTester::new(tester);
    let mut results = Vec::new();

    for scenario_name in scenarios {
        if let Some(scenario) = get_scenario(scenario_name) {
            results.extend(logic_tester.run_scenario(&scenario, seeds, args.iterations));
        } else {
            eprintln!("⚠️  Unknown scenario: {}", scenario_name.yellow());
        }
    }

    results
}

fn write_reports(args: &Args, results: &[ScenarioResult], start_time: Instant) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report.as_str() {
        "json" => {
            logic::reports::generate_json_report(&mut output_target, results)?;
        }
        "markdown" => {
            if results.is_empty() {
                writeln!(
                    &mut output_target,
                    "# Kabos Logic Test Results\n\n_No scenarios executed._"
                )?;
            } else {
                logic::reports::generate_markdown_report(&mut output_target, results)?;
            }
        }
        _ => {
            if results.is_empty() {
                writeln!(&mut output_target, "No logic scenarios executed.")?;
            } else {
                logic::reports::generate_console_report(
                    &mut output_target,
                    results,
                    start_time.elapsed(),
                )?;
            }
            writeln!(&mut output_target)?;
            writeln!(
                &mut output_target,
                "🏁 Total time: {:?}",
                start_time.elapsed()
            )?;
        }
    }

    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn base_args() -> Args {
        Args {
            scenarios: "smoke".to_string(),
            list_scenarios: false,
            seeds: "1337".to_string(),
            iterations: 1,
            report: "json".to_string(),
            verbose: false,
            output: None,
            config: None,
        }
    }

    fn temp_file(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("kabos-{}-{name}", std::process::id()))
    }

    fn sample_result(passed: bool) -> ScenarioResult {
        ScenarioResult {
            scenario_name: "Smoke Test".to_string(),
            seed: 1337,
            passed,
            iterations_run: 3,
            successful_iterations: if passed { 3 } else { 2 },
            failures: if passed {
                Vec::new()
            } else {
                vec!["failure".to_string()]
            },
            average_duration: Duration::from_millis(1),
            performance_data: vec![Duration::from_millis(1)],
        }
    }

    #[test]
    fn expands_all_scenarios_keyword() {
        let expanded = expand_scenarios("smoke,all");
        assert_eq!(expanded.len(), SCENARIO_KEYS.len());
        assert_eq!(expanded[0], "smoke");
        assert!(expanded.contains(&"restart-cycle".to_string()));
    }

    #[test]
    fn expand_scenarios_without_all_preserves_order() {
        let expanded = expand_scenarios("restart-cycle,smoke");
        assert_eq!(expanded, vec!["restart-cycle", "smoke"]);
    }

    #[test]
    fn run_logic_scenarios_skips_unknown_names() {
        let args = base_args();
        let tester = QuizTester::new(QuizConfig::default(), false);
        let results = run_logic_scenarios(
            &args,
            &["smoke".to_string(), "nope".to_string()],
            &[42],
            tester,
        );
        assert_eq!(results.len(), 1);
        assert!(results[0].passed, "{:?}", results[0].failures);
    }

    #[test]
    fn loads_quiz_config_from_file() {
        let path = temp_file("config.json");
        std::fs::write(&path, r#"{ "questions_per_stage": 2 }"#).unwrap();
        let config = load_quiz_config(Some(path.as_path())).unwrap();
        assert_eq!(config.questions_per_stage, 2);
        assert_eq!(config.attempts_per_question, 2);
        assert_eq!(load_quiz_config(None).unwrap(), QuizConfig::default());
    }

    #[test]
    fn rejects_invalid_quiz_config() {
        let path = temp_file("bad-config.json");
        std::fs::write(&path, r#"{ "attempts_per_question": 0 }"#).unwrap();
        let err = load_quiz_config(Some(path.as_path())).unwrap_err();
        assert!(format!("{err:#}").contains("attempts_per_question"));
        assert!(load_quiz_config(Some(Path::new("/nonexistent/kabos.json"))).is_err());
    }

    #[test]
    fn maybe_list_scenarios_writes_output() {
        let temp = temp_file("scenarios.txt");
        let args = Args {
            list_scenarios: true,
            output: Some(temp.clone()),
            ..base_args()
        };
        assert!(maybe_list_scenarios(&args).unwrap());
        let content = std::fs::read_to_string(temp).unwrap();
        assert!(content.contains("Available scenarios"));
        assert!(content.contains("deterministic-replay"));
    }

    #[test]
    fn maybe_list_scenarios_returns_false_when_disabled() {
        assert!(!maybe_list_scenarios(&base_args()).unwrap());
    }

    #[test]
    fn write_reports_emits_json_for_results() {
        let temp = temp_file("report.json");
        let args = Args {
            output: Some(temp.clone()),
            ..base_args()
        };
        write_reports(&args, &[sample_result(true)], Instant::now()).unwrap();
        let content = std::fs::read_to_string(temp).unwrap();
        assert!(content.contains("scenario_name"));
    }

    #[test]
    fn write_reports_markdown_empty_results() {
        let temp = temp_file("report.md");
        let args = Args {
            report: "markdown".to_string(),
            output: Some(temp.clone()),
            ..base_args()
        };
        write_reports(&args, &[], Instant::now()).unwrap();
        let content = std::fs::read_to_string(temp).unwrap();
        assert!(content.contains("No scenarios executed"));
    }

    #[test]
    fn write_reports_console_includes_total_time() {
        let temp = temp_file("report.txt");
        let args = Args {
            report: "console".to_string(),
            output: Some(temp.clone()),
            ..base_args()
        };
        write_reports(&args, &[sample_result(false)], Instant::now()).unwrap();
        let content = std::fs::read_to_string(temp).unwrap();
        assert!(content.contains("Total time"));
        assert!(content.contains("failure"));
    }

    #[test]
    fn output_target_stdout_writes() {
        let mut target = OutputTarget::new(None).unwrap();
        target.write_all(b"ok").unwrap();
        target.flush().unwrap();
    }
}
