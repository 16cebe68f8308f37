//! Interactive round in the terminal.
//!
//! One current-thread runtime drives everything: timer ticks and stdin lines
//! arrive through a single `select!`, so the engine only ever sees one event
//! at a time.

use std::time::Duration;

use clap::Args;
use powerdrill_core::{
    fresh_seed, Config, EndReason, Event, Mode, NextQuestion, RoundEngine, RoundRules, Submission,
    Summary, SystemClock,
};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::time::{sleep, MissedTickBehavior};

use super::ModeArg;
use crate::render;

type Input = Lines<BufReader<Stdin>>;

#[derive(Args)]
pub struct PlayArgs {
    #[arg(value_enum)]
    mode: ModeArg,
    /// Seed for the first round; overrides the configured seed
    #[arg(long)]
    seed: Option<u64>,
    /// Skip the ready prompt and countdown
    #[arg(long)]
    no_countdown: bool,
}

pub fn run(args: PlayArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    let result = runtime.block_on(session(args, config));
    // a pending stdin read cannot be cancelled; don't wait for it
    runtime.shutdown_background();
    result
}

async fn session(args: PlayArgs, config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let seed = match args.seed.or(config.seed) {
        Some(seed) => seed,
        None => fresh_seed()?,
    };
    tracing::debug!(seed, "session seed");

    let mut engine = RoundEngine::new(RoundRules::default(), config.pacing(), SystemClock, seed);
    let mut input = BufReader::new(tokio::io::stdin()).lines();
    let countdown = config.gate.countdown && !args.no_countdown;
    let mut mode = Mode::from(args.mode);

    loop {
        render::gate(mode);
        if countdown {
            println!("Press Enter when you're ready (q to quit).");
            match input.next_line().await? {
                Some(line) if line.trim().eq_ignore_ascii_case("q") => return Ok(()),
                Some(_) => {}
                None => return Ok(()),
            }
            run_countdown(&config).await;
        }

        let summary = play_round(&mut engine, mode, &config, &mut input).await?;
        render::summary(&summary, config.display.show_review);

        println!();
        println!(
            "[r] Retake {}   [s] Switch to {}   [q] Quit",
            mode.display_name(),
            mode.other().display_name()
        );
        match input.next_line().await?.as_deref().map(str::trim) {
            Some("r") | Some("R") => {}
            Some("s") | Some("S") => mode = mode.other(),
            _ => return Ok(()),
        }
    }
}

async fn run_countdown(config: &Config) {
    for step in config.countdown().steps() {
        println!("  {}", step.label);
        if step.go && config.display.celebrate {
            render::celebrate();
        }
        sleep(Duration::from_millis(step.hold_ms)).await;
    }
}

async fn play_round(
    engine: &mut RoundEngine<SystemClock>,
    mode: Mode,
    config: &Config,
    input: &mut Input,
) -> Result<Summary, Box<dyn std::error::Error>> {
    engine.start_round(mode);
    flush_events(engine, config);

    let mut ticker = tokio::time::interval(Duration::from_millis(
        config.pacing.tick_interval_ms.max(10),
    ));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        let question = match engine.next_question()? {
            NextQuestion::Question(q) => q,
            NextQuestion::RoundEnded(summary) => {
                flush_events(engine, config);
                return Ok(summary);
            }
        };
        flush_events(engine, config);
        render::question(&question, engine.progress(), engine.remaining_ms(), mode);

        let chosen = loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Some(summary) = engine.tick() {
                        println!("Time's up!");
                        flush_events(engine, config);
                        return Ok(summary);
                    }
                }
                line = input.next_line() => {
                    let Some(line) = line? else {
                        // stdin closed: nobody left to answer
                        let summary = engine.end_round(EndReason::Done)?;
                        flush_events(engine, config);
                        return Ok(summary);
                    };
                    let line = line.trim();
                    if line.eq_ignore_ascii_case("q") {
                        let summary = engine.end_round(EndReason::Done)?;
                        flush_events(engine, config);
                        return Ok(summary);
                    }
                    match parse_choice(line, &question.options) {
                        Some(value) => break value,
                        None => println!("Pick 1-{} (q to stop).", question.options.len()),
                    }
                }
            }
        };

        match engine.submit_answer(question.number, chosen)? {
            Submission::Recorded(feedback) => {
                if feedback.correct {
                    println!("Correct!");
                } else {
                    println!(
                        "Not quite: {} = {}",
                        mode.term(question.number),
                        feedback.correct_answer
                    );
                }
                flush_events(engine, config);
                sleep(Duration::from_millis(feedback.advance_after_ms)).await;
            }
            Submission::RoundEnded(summary) => {
                println!("Time's up!");
                flush_events(engine, config);
                return Ok(summary);
            }
        }
    }
}

/// 1-based position in the displayed options.
fn parse_choice(line: &str, options: &[u64]) -> Option<u64> {
    let pos: usize = line.parse().ok()?;
    pos.checked_sub(1).and_then(|i| options.get(i)).copied()
}

fn flush_events(engine: &mut RoundEngine<SystemClock>, config: &Config) {
    for event in engine.take_events() {
        match event {
            Event::Celebrate { .. } if config.display.celebrate => render::celebrate(),
            other => tracing::debug!(event = ?other, "round event"),
        }
    }
}
