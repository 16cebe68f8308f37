//! Deterministic round simulation.
//!
//! Plays a whole round against a [`ManualClock`] with a scripted player, so
//! the same seed always yields the same questions, answers and summary.
//! Used by `powerdrill simulate` and by regression tests.

use rand::{Rng, SeedableRng};
use rand_pcg::Mcg128Xsl64;
use serde::{Deserialize, Serialize};

use crate::clock::ManualClock;
use crate::error::Result;
use crate::events::Event;
use crate::mode::Mode;
use crate::round::{NextQuestion, Pacing, RoundEngine, RoundRules, Submission, Summary};

/// Scripted player behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulatedPlayer {
    /// Probability of picking the correct choice, 0.0 ..= 1.0.
    pub accuracy: f64,
    /// Time spent on each question before answering.
    pub think_ms: u64,
}

impl Default for SimulatedPlayer {
    fn default() -> Self {
        Self {
            accuracy: 0.8,
            think_ms: 3_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    pub seed: u64,
    pub summary: Summary,
    /// Every event the engine emitted, in order.
    pub events: Vec<Event>,
}

/// Play one round of `mode` with `player`.
///
/// Feedback delays are added to the clock between questions, the same way
/// a real front end would hold the feedback before moving on.
pub fn simulate_round(mode: Mode, seed: u64, player: SimulatedPlayer) -> Result<SimulationResult> {
    let clock = ManualClock::new(0);
    let mut engine = RoundEngine::new(RoundRules::default(), Pacing::default(), clock.clone(), seed);
    let mut player_rng = Mcg128Xsl64::seed_from_u64(seed.rotate_left(17) ^ 0x5eed);
    let accuracy = if player.accuracy.is_nan() {
        0.0
    } else {
        player.accuracy.clamp(0.0, 1.0)
    };
    let mut events = Vec::new();

    engine.start_round(mode);
    let summary = loop {
        let question = match engine.next_question()? {
            NextQuestion::Question(q) => q,
            NextQuestion::RoundEnded(summary) => break summary,
        };
        clock.advance(player.think_ms);
        if let Some(summary) = engine.tick() {
            break summary;
        }

        let chosen = if player_rng.gen_bool(accuracy) {
            question.correct_answer
        } else {
            let wrong: Vec<u64> = question
                .options
                .iter()
                .copied()
                .filter(|&v| v != question.correct_answer)
                .collect();
            wrong[player_rng.gen_range(0..wrong.len())]
        };

        match engine.submit_answer(question.number, chosen)? {
            Submission::Recorded(feedback) => clock.advance(feedback.advance_after_ms),
            Submission::RoundEnded(summary) => break summary,
        }
        events.extend(engine.take_events());
    };
    events.extend(engine.take_events());

    Ok(SimulationResult {
        seed,
        summary,
        events,
    })
}
