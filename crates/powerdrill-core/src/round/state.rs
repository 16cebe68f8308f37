use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::choices::CHOICE_COUNT;
use crate::mode::Mode;
use crate::scheduler::{PickSource, QuestionScheduler, RETRY_COOLDOWN};

/// Fixed shape of every round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRules {
    pub question_cap: usize,
    pub time_budget_ms: u64,
    pub retry_cooldown: usize,
    pub choice_count: usize,
}

impl Default for RoundRules {
    fn default() -> Self {
        Self {
            question_cap: 20,
            time_budget_ms: 2 * 60 * 1000,
            retry_cooldown: RETRY_COOLDOWN,
            choice_count: CHOICE_COUNT,
        }
    }
}

/// Feedback hold times handed to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pacing {
    pub correct_delay_ms: u64,
    pub wrong_delay_ms: u64,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            correct_delay_ms: 900,
            wrong_delay_ms: 1600,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndReason {
    /// Cap reached or nothing left to ask.
    Done,
    /// Time budget ran out.
    Time,
}

/// One wrong answer, kept for the end-of-round review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrongRecord {
    pub label: String,
    pub picked: u64,
    pub correct: u64,
}

/// Render data for the question currently awaiting an answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub index: usize,
    pub number: u32,
    pub prompt: String,
    pub correct_answer: u64,
    pub options: Vec<u64>,
    pub source: PickSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    /// 1-based, never above the cap.
    pub question_number: usize,
    pub question_cap: usize,
    /// Share of the cap already answered, 0.0 ..= 100.0.
    pub percent: f64,
}

/// Mutable state of the running round. Built fresh by every start.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundState {
    pub(crate) id: Uuid,
    pub(crate) mode: Mode,
    pub(crate) current: usize,
    pub(crate) score: u32,
    pub(crate) wrong: Vec<WrongRecord>,
    pub(crate) started_at_ms: u64,
    pub(crate) remaining_ms: u64,
    pub(crate) last_asked: Option<u32>,
    pub(crate) scheduler: QuestionScheduler,
    pub(crate) active: Option<Question>,
}

impl RoundState {
    pub(crate) fn new(
        mode: Mode,
        scheduler: QuestionScheduler,
        started_at_ms: u64,
        time_budget_ms: u64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            mode,
            current: 0,
            score: 0,
            wrong: Vec::new(),
            started_at_ms,
            remaining_ms: time_budget_ms,
            last_asked: None,
            scheduler,
            active: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Questions answered so far (0-based index of the next one).
    pub fn current(&self) -> usize {
        self.current
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn wrong(&self) -> &[WrongRecord] {
        &self.wrong
    }

    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }

    pub fn last_asked(&self) -> Option<u32> {
        self.last_asked
    }

    pub fn scheduler(&self) -> &QuestionScheduler {
        &self.scheduler
    }

    pub fn active(&self) -> Option<&Question> {
        self.active.as_ref()
    }

    pub fn progress(&self, question_cap: usize) -> Progress {
        let answered = self.current.min(question_cap);
        let percent = if question_cap == 0 {
            100.0
        } else {
            answered as f64 / question_cap as f64 * 100.0
        };
        Progress {
            question_number: (self.current + 1).min(question_cap),
            question_cap,
            percent,
        }
    }

    pub(crate) fn elapsed_ms(&self, now_ms: u64, time_budget_ms: u64) -> u64 {
        now_ms.saturating_sub(self.started_at_ms).min(time_budget_ms)
    }

    /// Re-sample the clock. Returns true once the budget is spent.
    pub(crate) fn sample(&mut self, now_ms: u64, time_budget_ms: u64) -> bool {
        let elapsed = now_ms.saturating_sub(self.started_at_ms);
        self.remaining_ms = time_budget_ms.saturating_sub(elapsed);
        self.remaining_ms == 0
    }
}

/// End-of-round report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub round_id: Uuid,
    pub mode: Mode,
    pub reason: EndReason,
    pub score: u32,
    /// Questions answered, capped at the question cap.
    pub total: u32,
    pub wrong: Vec<WrongRecord>,
    pub elapsed_ms: u64,
    pub reward_minutes: u32,
    /// Both queues were drained, so nothing was left to repeat.
    pub set_exhausted: bool,
}

impl Summary {
    pub fn note(&self) -> Option<&'static str> {
        match self.reason {
            EndReason::Done if self.set_exhausted => {
                Some("You finished the set with no repeats needed.")
            }
            EndReason::Time => Some("Time's up!"),
            EndReason::Done => None,
        }
    }

    pub fn is_perfect(&self) -> bool {
        self.wrong.is_empty()
    }
}
