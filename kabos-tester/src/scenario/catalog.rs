use std::collections::HashSet;

use anyhow::{Result, bail, ensure};
use kabos_game::constants::CHOICES_PER_QUESTION;
use kabos_game::{Intent, Question, QuestionGenerator, Screen, Stage, Verdict};

use crate::logic::simulation::DecisionRecord;
use crate::logic::transcript::MediaCommand;
use crate::logic::{PlayStrategy, QuizTester, SimulationPlan, SimulationSummary};
use crate::scenario::TestScenario;

const GENERATED_PER_STAGE: usize = 500;
const RESTART_ROUNDS: usize = 3;

pub fn smoke_scenario() -> TestScenario {
    TestScenario::simulation(
        "Smoke Test",
        SimulationPlan::new(PlayStrategy::Perfect)
            .with_expectation(ended_expectation)
            .with_expectation(smoke_expectation),
    )
}

pub fn perfect_run_scenario() -> TestScenario {
    TestScenario::simulation(
        "Perfect Player Wins",
        SimulationPlan::new(PlayStrategy::Perfect)
            .with_expectation(ended_expectation)
            .with_expectation(verdicts_expectation)
            .with_expectation(perfect_run_expectation),
    )
}

pub fn stumbler_run_scenario() -> TestScenario {
    TestScenario::simulation(
        "One Miss Per Question Still Wins",
        SimulationPlan::new(PlayStrategy::Stumbler)
            .with_expectation(ended_expectation)
            .with_expectation(verdicts_expectation)
            .with_expectation(stumbler_run_expectation),
    )
}

pub fn saboteur_run_scenario() -> TestScenario {
    TestScenario::simulation(
        "Wrong Answers Exhaust Attempts",
        SimulationPlan::new(PlayStrategy::Saboteur)
            .with_expectation(ended_expectation)
            .with_expectation(verdicts_expectation)
            .with_expectation(saboteur_run_expectation),
    )
}

pub fn guesser_run_scenario() -> TestScenario {
    TestScenario::simulation(
        "Random Guesser Reaches An Ending",
        SimulationPlan::new(PlayStrategy::Guesser)
            .with_expectation(ended_expectation)
            .with_expectation(verdicts_expectation)
            .with_expectation(guesser_run_expectation),
    )
}

pub fn deterministic_replay_scenario() -> TestScenario {
    TestScenario::simulation(
        "Deterministic Replay Verification",
        SimulationPlan::new(PlayStrategy::Guesser)
            .with_expectation(ended_expectation)
            .with_expectation(deterministic_replay_expectation),
    )
}

pub fn choice_invariants_scenario() -> TestScenario {
    TestScenario::simulation(
        "Answer Choice Invariants",
        SimulationPlan::new(PlayStrategy::Perfect).with_expectation(choice_invariants_expectation),
    )
}

pub fn restart_cycle_scenario() -> TestScenario {
    TestScenario::simulation(
        "Restart Cycle",
        SimulationPlan::new(PlayStrategy::Guesser)
            .with_rounds(RESTART_ROUNDS)
            .with_expectation(verdicts_expectation)
            .with_expectation(restart_cycle_expectation),
    )
}

fn ended_expectation(summary: &SimulationSummary) -> Result<()> {
    ensure!(
        summary.game_ended,
        "Game should reach an ending within {} steps, stopped on {}",
        summary.steps.len(),
        summary.final_screen()
    );
    Ok(())
}

/// Every verdict agrees with the value the player picked.
fn verdicts_expectation(summary: &SimulationSummary) -> Result<()> {
    for decision in &summary.decisions {
        let picked_correct = decision.choice_value == decision.correct_value;
        let judged_correct = decision.verdict == Verdict::Correct;
        ensure!(
            picked_correct == judged_correct,
            "Step {}: picked {} for '{}' (answer {}) but verdict was {:?}",
            decision.step,
            decision.choice_value,
            decision.prompt,
            decision.correct_value,
            decision.verdict
        );
    }
    Ok(())
}

fn smoke_expectation(summary: &SimulationSummary) -> Result<()> {
    ensure!(
        summary.final_screen() == Screen::Win,
        "Perfect play should win, ended on {}",
        summary.final_screen()
    );
    ensure!(
        summary.media.first() == Some(&MediaCommand::Unlock),
        "Skipping the intro should unlock audio first, got {:?}",
        summary.media.first()
    );
    ensure!(
        summary.media.last() == Some(&MediaCommand::Enter(Screen::Win)),
        "Last media command should enter the win screen"
    );
    ensure!(
        summary.final_state.question().is_none(),
        "Win screen should not carry a question"
    );
    Ok(())
}

fn perfect_run_expectation(summary: &SimulationSummary) -> Result<()> {
    let per_stage = summary.config.questions_per_stage as usize;
    let expected = summary.questions_per_round();
    ensure!(
        summary.final_screen() == Screen::Win,
        "Perfect play should win"
    );
    ensure!(
        summary.metrics.correct == expected && summary.metrics.answers == expected,
        "Expected {expected} correct answers, got {} of {}",
        summary.metrics.correct,
        summary.metrics.answers
    );
    for stage in Stage::ALL {
        let answered = summary
            .decisions
            .iter()
            .filter(|d| d.stage == stage)
            .count();
        ensure!(
            answered == per_stage,
            "{stage} should have {per_stage} questions, saw {answered}"
        );
    }
    ensure!(
        summary
            .decisions
            .windows(2)
            .all(|pair| pair[0].stage <= pair[1].stage),
        "Stages must be played in order"
    );
    ensure!(
        summary.final_state.question_index() == expected as u64,
        "Question counter should read {expected}, got {}",
        summary.final_state.question_index()
    );
    ensure!(
        summary.final_state.stage_index() == Stage::COUNT,
        "Win leaves the stage index one past the last stage"
    );
    Ok(())
}

fn stumbler_run_expectation(summary: &SimulationSummary) -> Result<()> {
    let attempts = summary.config.attempts_per_question;
    if attempts < 2 {
        ensure!(
            summary.final_screen() == Screen::Lose,
            "A single attempt cannot survive a miss"
        );
        return Ok(());
    }

    let expected = summary.questions_per_round();
    ensure!(
        summary.final_screen() == Screen::Win,
        "One miss per question should still win, ended on {}",
        summary.final_screen()
    );
    ensure!(
        summary.metrics.wrong == expected && summary.metrics.correct == expected,
        "Expected {expected} misses and {expected} hits, got {} and {}",
        summary.metrics.wrong,
        summary.metrics.correct
    );
    for pair in summary.decisions.chunks(2) {
        let [miss, hit] = pair else {
            bail!("Unpaired answer at step {}", pair[0].step);
        };
        ensure!(
            miss.prompt == hit.prompt,
            "Retry should stay on '{}' but moved to '{}'",
            miss.prompt,
            hit.prompt
        );
        ensure!(
            miss.verdict
                == Verdict::Wrong {
                    attempts_left: attempts - 1
                },
            "First miss on '{}' should leave {} attempts, got {:?}",
            miss.prompt,
            attempts - 1,
            miss.verdict
        );
        ensure!(hit.verdict == Verdict::Correct, "Retry should be correct");
    }
    Ok(())
}

fn saboteur_run_expectation(summary: &SimulationSummary) -> Result<()> {
    let attempts = usize::from(summary.config.attempts_per_question);
    ensure!(
        summary.final_screen() == Screen::Lose,
        "Always answering wrong should lose"
    );
    ensure!(
        summary.questions.len() == 1,
        "Lose should come on the first question, saw {} questions",
        summary.questions.len()
    );
    ensure!(
        summary.metrics.answers == attempts,
        "Expected {attempts} answers before losing, got {}",
        summary.metrics.answers
    );
    let verdicts: Vec<Verdict> = summary.decisions.iter().map(|d| d.verdict).collect();
    let mut expected: Vec<Verdict> = (1..attempts)
        .rev()
        .map(|left| Verdict::Wrong {
            attempts_left: u8::try_from(left).unwrap_or(u8::MAX),
        })
        .collect();
    expected.push(Verdict::OutOfAttempts);
    ensure!(
        verdicts == expected,
        "Verdicts {verdicts:?} should count down as {expected:?}"
    );
    ensure!(
        summary.final_state.stage() == Some(Stage::Easy),
        "Lose on the first question stays on Easy"
    );
    Ok(())
}

fn guesser_run_expectation(summary: &SimulationSummary) -> Result<()> {
    let metrics = summary.metrics;
    match summary.final_screen() {
        Screen::Win => {
            ensure!(
                metrics.correct == summary.questions_per_round() && metrics.out_of_attempts == 0,
                "Win needs every question solved and none failed"
            );
        }
        Screen::Lose => {
            ensure!(
                metrics.out_of_attempts == 1,
                "Lose ends on exactly one exhausted question"
            );
            check_exhausted_tail(summary)?;
        }
        other => bail!("Run should end on win or lose, got {other}"),
    }
    Ok(())
}

/// The last `attempts` answers of a lost round are all misses on one prompt.
fn check_exhausted_tail(summary: &SimulationSummary) -> Result<()> {
    let attempts = usize::from(summary.config.attempts_per_question);
    ensure!(
        summary.decisions.len() >= attempts,
        "Lost after only {} answers",
        summary.decisions.len()
    );
    let tail: &[DecisionRecord] = &summary.decisions[summary.decisions.len() - attempts..];
    ensure!(
        tail.iter().all(|d| d.prompt == tail[0].prompt && d.verdict != Verdict::Correct),
        "Losing question '{}' was not missed {attempts} times in a row",
        tail[0].prompt
    );
    Ok(())
}

fn deterministic_replay_expectation(summary: &SimulationSummary) -> Result<()> {
    let replay_tester = QuizTester::new(summary.config.clone(), false);
    let step_budget = u32::try_from(summary.steps.len()).unwrap_or(u32::MAX);
    let replay_plan = SimulationPlan::new(summary.strategy)
        .with_rounds(summary.outcomes.len().max(1))
        .with_max_steps(step_budget);
    let replay = replay_tester.run_plan(&replay_plan, summary.seed)?;

    ensure!(
        replay.fingerprint == summary.fingerprint,
        "Question transcript fingerprint changed: {:016x} vs {:016x}",
        summary.fingerprint,
        replay.fingerprint
    );
    ensure!(
        replay.outcomes == summary.outcomes,
        "Outcomes diverged: {:?} vs {:?}",
        summary.outcomes,
        replay.outcomes
    );
    ensure!(
        replay.generator_draws == summary.generator_draws,
        "Generator consumed {} draws on replay, {} on first run",
        replay.generator_draws,
        summary.generator_draws
    );
    ensure!(
        replay.steps.len() == summary.steps.len(),
        "Replay took {} steps, first run took {}",
        replay.steps.len(),
        summary.steps.len()
    );
    let picks = |s: &SimulationSummary| -> Vec<usize> {
        s.decisions.iter().map(|d| d.choice_index).collect()
    };
    ensure!(
        picks(&replay) == picks(summary),
        "Player decisions diverged on replay"
    );
    Ok(())
}

fn check_question(question: &Question) -> Result<()> {
    let choices = question.choices();
    ensure!(
        choices.len() == CHOICES_PER_QUESTION,
        "'{}' has {} choices",
        question.prompt(),
        choices.len()
    );
    let distinct: HashSet<u32> = choices.iter().copied().collect();
    ensure!(
        distinct.len() == CHOICES_PER_QUESTION,
        "'{}' repeats a choice: {choices:?}",
        question.prompt()
    );
    let hits = choices.iter().filter(|&&c| c == question.correct()).count();
    ensure!(
        hits == 1,
        "'{}' lists the answer {} {hits} times",
        question.prompt(),
        question.correct()
    );
    ensure!(
        question.expression().evaluate() == question.correct(),
        "'{}' evaluates to {} but claims {}",
        question.prompt(),
        question.expression().evaluate(),
        question.correct()
    );
    Ok(())
}

fn choice_invariants_expectation(summary: &SimulationSummary) -> Result<()> {
    for question in &summary.questions {
        check_question(question)?;
    }

    let mut generator = QuestionGenerator::from_seed(summary.seed);
    for stage in Stage::ALL {
        let mut positions = HashSet::new();
        for _ in 0..GENERATED_PER_STAGE {
            let question = generator.next_question(stage);
            ensure!(question.stage() == stage, "Generated the wrong stage");
            check_question(&question)?;
            positions.extend(question.correct_index());
        }
        ensure!(
            positions.len() > 1,
            "{stage} always placed the answer at {positions:?}"
        );
    }
    Ok(())
}

fn restart_cycle_expectation(summary: &SimulationSummary) -> Result<()> {
    ensure!(
        summary.outcomes.len() == RESTART_ROUNDS,
        "Expected {RESTART_ROUNDS} finished rounds, got {:?}",
        summary.outcomes
    );

    let restarts: Vec<_> = summary
        .steps
        .iter()
        .filter(|step| step.intent == Intent::Restart)
        .collect();
    ensure!(
        restarts.len() == RESTART_ROUNDS - 1,
        "Expected {} restarts, saw {}",
        RESTART_ROUNDS - 1,
        restarts.len()
    );
    for step in restarts {
        ensure!(
            step.transition.from.is_terminal() && step.transition.to == Screen::Intro,
            "Restart at step {} went {} -> {}",
            step.step,
            step.transition.from,
            step.transition.to
        );
    }

    let pauses_before_intro = summary
        .media
        .windows(2)
        .filter(|pair| pair[0] == MediaCommand::Pause && pair[1] == MediaCommand::Enter(Screen::Intro))
        .count();
    ensure!(
        pauses_before_intro == RESTART_ROUNDS - 1,
        "Each restart should pause audio before re-entering the intro"
    );
    ensure!(
        summary.final_screen().is_terminal(),
        "Last round should end on a terminal screen"
    );
    Ok(())
}
