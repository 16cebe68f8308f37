use clap::Args;
use powerdrill_core::{fresh_seed, simulate_round, Mode, SimulatedPlayer};

use super::ModeArg;
use crate::render;

#[derive(Args)]
pub struct SimulateArgs {
    #[arg(value_enum)]
    mode: ModeArg,
    /// Seed for the round; drawn from the OS when omitted
    #[arg(long)]
    seed: Option<u64>,
    /// Probability of answering correctly (0.0 - 1.0)
    #[arg(long, default_value_t = 0.8, value_parser = parse_accuracy)]
    accuracy: f64,
    /// Milliseconds spent on each question
    #[arg(long, default_value_t = 3_000)]
    think_ms: u64,
    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
    /// Include every emitted event in the JSON output
    #[arg(long, requires = "json")]
    events: bool,
}

fn parse_accuracy(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("{value} is not between 0.0 and 1.0"))
    }
}

pub fn run(args: SimulateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let seed = match args.seed {
        Some(seed) => seed,
        None => fresh_seed()?,
    };
    let mode = Mode::from(args.mode);
    let player = SimulatedPlayer {
        accuracy: args.accuracy,
        think_ms: args.think_ms,
    };
    let result = simulate_round(mode, seed, player)?;

    if args.json {
        let out = if args.events {
            serde_json::to_string_pretty(&result)?
        } else {
            serde_json::to_string_pretty(&serde_json::json!({
                "seed": result.seed,
                "summary": result.summary,
            }))?
        };
        println!("{out}");
    } else {
        println!("{} (seed {seed})", mode.display_name());
        render::summary(&result.summary, true);
    }
    Ok(())
}
