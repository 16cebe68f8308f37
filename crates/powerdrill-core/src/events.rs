use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::mode::Mode;
use crate::round::EndReason;
use crate::scheduler::PickSource;

/// Every state change in a round produces an Event.
/// The presentation layer drains them and decides how to show each one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    RoundStarted {
        round_id: Uuid,
        mode: Mode,
        question_cap: usize,
        time_budget_ms: u64,
        at: DateTime<Utc>,
    },
    QuestionPresented {
        index: usize,
        number: u32,
        prompt: String,
        options: Vec<u64>,
        source: PickSource,
        at: DateTime<Utc>,
    },
    AnswerRecorded {
        index: usize,
        number: u32,
        chosen: u64,
        correct_answer: u64,
        correct: bool,
        /// How long the feedback should stay up before the next question.
        advance_after_ms: u64,
        at: DateTime<Utc>,
    },
    /// A correct answer.
    Celebrate {
        at: DateTime<Utc>,
    },
    RetryQueued {
        number: u32,
        eligible_at: usize,
        at: DateTime<Utc>,
    },
    /// The round is over; any periodic timer should be stopped.
    RoundEnded {
        round_id: Uuid,
        reason: EndReason,
        score: u32,
        total: u32,
        elapsed_ms: u64,
        reward_minutes: u32,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn at(&self) -> DateTime<Utc> {
        match self {
            Event::RoundStarted { at, .. }
            | Event::QuestionPresented { at, .. }
            | Event::AnswerRecorded { at, .. }
            | Event::Celebrate { at }
            | Event::RetryQueued { at, .. }
            | Event::RoundEnded { at, .. } => *at,
        }
    }
}
