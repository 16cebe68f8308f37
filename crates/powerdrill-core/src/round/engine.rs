//! Round controller.
//!
//! A wall-clock state machine. Like a kitchen timer with no thread of its
//! own: the caller invokes `tick()` periodically and feeds answers in
//! between, one event at a time.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> Ended
//!   ^                  |
//!   +-- start_round ---+
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = RoundEngine::new(RoundRules::default(), Pacing::default(), SystemClock, seed);
//! engine.start_round(Mode::Squares);
//! while let NextQuestion::Question(q) = engine.next_question()? {
//!     engine.submit_answer(q.number, q.options[0])?;
//! }
//! ```

use chrono::Utc;
use rand::SeedableRng;
use rand_pcg::Mcg128Xsl64;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::state::{EndReason, Pacing, Progress, Question, RoundRules, RoundState, Summary, WrongRecord};
use crate::choices::{build_choices, check_capacity};
use crate::clock::{Clock, SystemClock};
use crate::error::{Result, RoundError};
use crate::events::Event;
use crate::mode::Mode;
use crate::pool::build_pool;
use crate::reward::compute_reward;
use crate::scheduler::{QuestionScheduler, RetryItem};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundPhase {
    Idle,
    Running,
    Ended,
}

/// Result of asking for the next question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextQuestion {
    Question(Question),
    RoundEnded(Summary),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerFeedback {
    pub correct: bool,
    pub chosen: u64,
    pub correct_answer: u64,
    /// Hold the feedback this long before asking the next question.
    pub advance_after_ms: u64,
    /// Set when a wrong answer put the number back in the retry queue.
    pub retry: Option<RetryItem>,
}

/// Result of submitting an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Recorded(AnswerFeedback),
    /// The time budget ran out before the answer arrived; it was not counted.
    RoundEnded(Summary),
}

/// Draw a fresh seed from the OS.
pub fn fresh_seed() -> Result<u64> {
    let mut buf = [0u8; 8];
    getrandom::getrandom(&mut buf)?;
    Ok(u64::from_le_bytes(buf))
}

pub struct RoundEngine<C: Clock = SystemClock> {
    rules: RoundRules,
    pacing: Pacing,
    clock: C,
    seed: u64,
    rng: Mcg128Xsl64,
    phase: RoundPhase,
    round: Option<RoundState>,
    summary: Option<Summary>,
    outbox: Vec<Event>,
}

impl RoundEngine<SystemClock> {
    pub fn with_system_clock(seed: u64) -> Self {
        Self::new(RoundRules::default(), Pacing::default(), SystemClock, seed)
    }
}

impl<C: Clock> RoundEngine<C> {
    /// Starts `Idle`. All randomness in every round comes from `seed`.
    pub fn new(rules: RoundRules, pacing: Pacing, clock: C, seed: u64) -> Self {
        Self {
            rules,
            pacing,
            clock,
            seed,
            rng: Mcg128Xsl64::seed_from_u64(seed),
            phase: RoundPhase::Idle,
            round: None,
            summary: None,
            outbox: Vec::new(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn rules(&self) -> &RoundRules {
        &self.rules
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// State of the running round; `None` when idle or ended.
    pub fn round(&self) -> Option<&RoundState> {
        self.round.as_ref()
    }

    /// Summary of the most recently ended round.
    pub fn summary(&self) -> Option<&Summary> {
        self.summary.as_ref()
    }

    pub fn progress(&self) -> Option<Progress> {
        self.round.as_ref().map(|r| r.progress(self.rules.question_cap))
    }

    /// Remaining time as of the last sample.
    pub fn remaining_ms(&self) -> u64 {
        self.round.as_ref().map(|r| r.remaining_ms()).unwrap_or(0)
    }

    /// Drain events produced since the last call.
    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.outbox)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Discard any previous round and begin a new one in `mode`.
    pub fn start_round(&mut self, mode: Mode) -> Uuid {
        if self.phase == RoundPhase::Running {
            tracing::debug!("abandoning running round for a restart");
        }
        let base = build_pool(mode, &mut self.rng);
        let scheduler = QuestionScheduler::with_cooldown(base, self.rules.retry_cooldown);
        let round = RoundState::new(mode, scheduler, self.clock.now_ms(), self.rules.time_budget_ms);
        let id = round.id();

        self.round = Some(round);
        self.summary = None;
        self.phase = RoundPhase::Running;

        tracing::info!(%id, %mode, "round started");
        self.outbox.push(Event::RoundStarted {
            round_id: id,
            mode,
            question_cap: self.rules.question_cap,
            time_budget_ms: self.rules.time_budget_ms,
            at: Utc::now(),
        });
        id
    }

    /// Advance the scheduler and return the next question, or the summary
    /// if the round is over (cap, nothing left, or time).
    pub fn next_question(&mut self) -> Result<NextQuestion> {
        let now = self.clock.now_ms();
        let budget = self.rules.time_budget_ms;
        let round = running(self.phase, &mut self.round)?;
        if round.sample(now, budget) {
            return Ok(NextQuestion::RoundEnded(self.finish(EndReason::Time)));
        }
        if let Some(active) = &round.active {
            return Err(RoundError::QuestionPending {
                number: active.number,
            }
            .into());
        }
        if round.current >= self.rules.question_cap {
            return Ok(NextQuestion::RoundEnded(self.finish(EndReason::Done)));
        }
        // the scheduler consumes its pick, so reject impossible choice counts first
        check_capacity(round.mode, self.rules.choice_count)?;
        let Some(pick) = round.scheduler.next(round.current, round.last_asked) else {
            return Ok(NextQuestion::RoundEnded(self.finish(EndReason::Done)));
        };

        let mode = round.mode;
        let options = build_choices(mode, pick.number, self.rules.choice_count, &mut self.rng)?;
        let question = Question {
            index: round.current,
            number: pick.number,
            prompt: mode.prompt(pick.number),
            correct_answer: mode.power(pick.number),
            options,
            source: pick.source,
        };
        round.active = Some(question.clone());

        self.outbox.push(Event::QuestionPresented {
            index: question.index,
            number: question.number,
            prompt: question.prompt.clone(),
            options: question.options.clone(),
            source: question.source,
            at: Utc::now(),
        });
        Ok(NextQuestion::Question(question))
    }

    /// Record the answer `chosen` for the active question about `n`.
    pub fn submit_answer(&mut self, n: u32, chosen: u64) -> Result<Submission> {
        let now = self.clock.now_ms();
        let budget = self.rules.time_budget_ms;
        let round = running(self.phase, &mut self.round)?;
        if round.sample(now, budget) {
            return Ok(Submission::RoundEnded(self.finish(EndReason::Time)));
        }

        let active = round.active.as_ref().ok_or(RoundError::NoActiveQuestion)?;
        if active.number != n {
            return Err(RoundError::StaleQuestion {
                expected: active.number,
                got: n,
            }
            .into());
        }
        if !active.options.contains(&chosen) {
            return Err(RoundError::UnknownOption { value: chosen }.into());
        }
        let Some(question) = round.active.take() else {
            return Err(RoundError::NoActiveQuestion.into());
        };

        let correct = chosen == question.correct_answer;
        let index = round.current;
        let at = Utc::now();
        let mut retry = None;
        if correct {
            round.score += 1;
            self.outbox.push(Event::Celebrate { at });
        } else {
            let item = round.scheduler.requeue(n, index);
            round.wrong.push(WrongRecord {
                label: round.mode.term(n),
                picked: chosen,
                correct: question.correct_answer,
            });
            self.outbox.push(Event::RetryQueued {
                number: n,
                eligible_at: item.eligible_at,
                at,
            });
            retry = Some(item);
        }
        round.last_asked = Some(n);
        round.current += 1;

        let advance_after_ms = if correct {
            self.pacing.correct_delay_ms
        } else {
            self.pacing.wrong_delay_ms
        };
        self.outbox.push(Event::AnswerRecorded {
            index,
            number: n,
            chosen,
            correct_answer: question.correct_answer,
            correct,
            advance_after_ms,
            at,
        });

        Ok(Submission::Recorded(AnswerFeedback {
            correct,
            chosen,
            correct_answer: question.correct_answer,
            advance_after_ms,
            retry,
        }))
    }

    /// Call periodically. Returns the summary when the time budget runs out.
    /// Inert unless a round is running.
    pub fn tick(&mut self) -> Option<Summary> {
        if self.phase != RoundPhase::Running {
            return None;
        }
        let now = self.clock.now_ms();
        let budget = self.rules.time_budget_ms;
        let expired = self.round.as_mut()?.sample(now, budget);
        expired.then(|| self.finish(EndReason::Time))
    }

    /// End the running round. A round ends exactly once.
    pub fn end_round(&mut self, reason: EndReason) -> Result<Summary> {
        running(self.phase, &mut self.round)?;
        Ok(self.finish(reason))
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn finish(&mut self, reason: EndReason) -> Summary {
        let now = self.clock.now_ms();
        let budget = self.rules.time_budget_ms;
        self.phase = RoundPhase::Ended;

        let summary = match self.round.take() {
            Some(round) => {
                let total = round.current.min(self.rules.question_cap) as u32;
                Summary {
                    round_id: round.id,
                    mode: round.mode,
                    reason,
                    score: round.score,
                    total,
                    elapsed_ms: round.elapsed_ms(now, budget),
                    reward_minutes: compute_reward(round.score, total),
                    set_exhausted: reason == EndReason::Done && round.scheduler.is_exhausted(),
                    wrong: round.wrong,
                }
            }
            None => Summary {
                round_id: Uuid::nil(),
                mode: Mode::Squares,
                reason,
                score: 0,
                total: 0,
                wrong: Vec::new(),
                elapsed_ms: 0,
                reward_minutes: 0,
                set_exhausted: false,
            },
        };

        tracing::info!(
            id = %summary.round_id,
            reason = ?reason,
            score = summary.score,
            total = summary.total,
            "round ended"
        );
        self.outbox.push(Event::RoundEnded {
            round_id: summary.round_id,
            reason,
            score: summary.score,
            total: summary.total,
            elapsed_ms: summary.elapsed_ms,
            reward_minutes: summary.reward_minutes,
            at: Utc::now(),
        });
        self.summary = Some(summary.clone());
        summary
    }
}

/// Borrow the round only if it is running.
fn running(phase: RoundPhase, round: &mut Option<RoundState>) -> Result<&mut RoundState> {
    match phase {
        RoundPhase::Idle => Err(RoundError::NotRunning.into()),
        RoundPhase::Ended => Err(RoundError::AlreadyEnded.into()),
        RoundPhase::Running => round.as_mut().ok_or_else(|| RoundError::NotRunning.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::error::{ChoiceError, CoreError};

    fn engine(seed: u64) -> (RoundEngine<ManualClock>, ManualClock) {
        let clock = ManualClock::new(1_000_000);
        let engine = RoundEngine::new(RoundRules::default(), Pacing::default(), clock.clone(), seed);
        (engine, clock)
    }

    fn ask(engine: &mut RoundEngine<ManualClock>) -> Question {
        match engine.next_question().unwrap() {
            NextQuestion::Question(q) => q,
            NextQuestion::RoundEnded(s) => panic!("round ended early: {s:?}"),
        }
    }

    fn wrong_option(q: &Question) -> u64 {
        *q.options.iter().find(|&&v| v != q.correct_answer).unwrap()
    }

    fn round_error(err: CoreError) -> RoundError {
        match err {
            CoreError::Round(e) => e,
            other => panic!("expected round error, got {other}"),
        }
    }

    #[test]
    fn oversized_choice_count_keeps_the_deck_intact() {
        let clock = ManualClock::new(1_000_000);
        let rules = RoundRules {
            choice_count: 13,
            ..RoundRules::default()
        };
        let mut engine = RoundEngine::new(rules, Pacing::default(), clock, 5);
        engine.start_round(Mode::Cubes);

        let err = engine.next_question().unwrap_err();
        assert!(matches!(
            err,
            CoreError::Choice(ChoiceError::PoolExhausted { needed: 12, .. })
        ));
        let round = engine.round().unwrap();
        assert_eq!(round.scheduler.base_remaining(), 12);
        assert!(round.active.is_none());
        assert_eq!(engine.phase(), RoundPhase::Running);
    }

    #[test]
    fn starts_idle_and_rejects_questions() {
        let (mut engine, _) = engine(1);
        assert_eq!(engine.phase(), RoundPhase::Idle);
        let err = engine.next_question().unwrap_err();
        assert_eq!(round_error(err), RoundError::NotRunning);
        assert!(engine.tick().is_none());
    }

    #[test]
    fn correct_answer_scores_and_advances() {
        let (mut engine, _) = engine(2);
        engine.start_round(Mode::Squares);
        let q = ask(&mut engine);
        assert_eq!(q.index, 0);
        assert_eq!(q.correct_answer, u64::from(q.number).pow(2));

        let Submission::Recorded(fb) = engine.submit_answer(q.number, q.correct_answer).unwrap() else {
            panic!("expected feedback");
        };
        assert!(fb.correct);
        assert_eq!(fb.advance_after_ms, 900);
        assert!(fb.retry.is_none());

        let round = engine.round().unwrap();
        assert_eq!(round.score(), 1);
        assert_eq!(round.current(), 1);
        assert_eq!(round.last_asked(), Some(q.number));
    }

    #[test]
    fn wrong_answer_logs_and_requeues() {
        let (mut engine, _) = engine(3);
        engine.start_round(Mode::Cubes);
        let q = ask(&mut engine);
        let picked = wrong_option(&q);

        let Submission::Recorded(fb) = engine.submit_answer(q.number, picked).unwrap() else {
            panic!("expected feedback");
        };
        assert!(!fb.correct);
        assert_eq!(fb.advance_after_ms, 1600);
        assert_eq!(fb.retry, Some(RetryItem { number: q.number, eligible_at: 3 }));

        let round = engine.round().unwrap();
        assert_eq!(round.score(), 0);
        assert_eq!(
            round.wrong(),
            &[WrongRecord {
                label: format!("{}³", q.number),
                picked,
                correct: q.correct_answer,
            }]
        );
    }

    #[test]
    fn precondition_violations_are_typed() {
        let (mut engine, _) = engine(4);
        engine.start_round(Mode::Squares);
        let err = engine.submit_answer(1, 1).unwrap_err();
        assert_eq!(round_error(err), RoundError::NoActiveQuestion);

        let q = ask(&mut engine);
        let err = engine.next_question().unwrap_err();
        assert_eq!(round_error(err), RoundError::QuestionPending { number: q.number });

        let other = if q.number == 1 { 2 } else { 1 };
        let err = engine.submit_answer(other, q.correct_answer).unwrap_err();
        assert_eq!(
            round_error(err),
            RoundError::StaleQuestion { expected: q.number, got: other }
        );

        let err = engine.submit_answer(q.number, 7).unwrap_err();
        assert_eq!(round_error(err), RoundError::UnknownOption { value: 7 });
        // the question is still answerable
        assert!(engine.submit_answer(q.number, q.correct_answer).is_ok());
    }

    #[test]
    fn time_expiry_ends_round_from_tick() {
        let (mut engine, clock) = engine(5);
        engine.start_round(Mode::Squares);
        let _ = ask(&mut engine);
        clock.advance(60_000);
        assert!(engine.tick().is_none());
        assert_eq!(engine.remaining_ms(), 60_000);

        clock.advance(60_000);
        let summary = engine.tick().expect("time should be up");
        assert_eq!(summary.reason, EndReason::Time);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.elapsed_ms, 120_000);
        assert_eq!(engine.phase(), RoundPhase::Ended);
        // timer is inert afterwards
        clock.advance(1_000);
        assert!(engine.tick().is_none());
    }

    #[test]
    fn late_answer_is_not_counted() {
        let (mut engine, clock) = engine(6);
        engine.start_round(Mode::Squares);
        let q = ask(&mut engine);
        clock.advance(130_000);
        match engine.submit_answer(q.number, q.correct_answer).unwrap() {
            Submission::RoundEnded(summary) => {
                assert_eq!(summary.score, 0);
                assert_eq!(summary.reason, EndReason::Time);
                assert_eq!(summary.elapsed_ms, 120_000);
            }
            other => panic!("expected round end, got {other:?}"),
        }
    }

    #[test]
    fn round_ends_exactly_once() {
        let (mut engine, _) = engine(7);
        engine.start_round(Mode::Cubes);
        let summary = engine.end_round(EndReason::Done).unwrap();
        assert_eq!(summary.total, 0);
        assert_eq!(summary.reward_minutes, 0);

        let err = engine.end_round(EndReason::Done).unwrap_err();
        assert_eq!(round_error(err), RoundError::AlreadyEnded);
        let err = engine.next_question().unwrap_err();
        assert_eq!(round_error(err), RoundError::AlreadyEnded);

        let ended = engine
            .take_events()
            .into_iter()
            .filter(|e| matches!(e, Event::RoundEnded { .. }))
            .count();
        assert_eq!(ended, 1);
    }

    #[test]
    fn restart_reinitializes_state() {
        let (mut engine, _) = engine(8);
        let first = engine.start_round(Mode::Squares);
        let q = ask(&mut engine);
        engine.submit_answer(q.number, wrong_option(&q)).unwrap();

        let second = engine.start_round(Mode::Cubes);
        assert_ne!(first, second);
        let round = engine.round().unwrap();
        assert_eq!(round.mode(), Mode::Cubes);
        assert_eq!(round.current(), 0);
        assert!(round.wrong().is_empty());
        assert_eq!(round.scheduler().base_remaining(), 12);
        assert_eq!(round.scheduler().retry_pending(), 0);
    }

    #[test]
    fn events_follow_commands() {
        let (mut engine, _) = engine(9);
        engine.start_round(Mode::Squares);
        let q = ask(&mut engine);
        engine.submit_answer(q.number, q.correct_answer).unwrap();

        let events = engine.take_events();
        assert!(matches!(events[0], Event::RoundStarted { question_cap: 20, .. }));
        assert!(matches!(events[1], Event::QuestionPresented { index: 0, .. }));
        assert!(matches!(events[2], Event::Celebrate { .. }));
        assert!(matches!(
            events[3],
            Event::AnswerRecorded { correct: true, advance_after_ms: 900, .. }
        ));
        assert!(engine.take_events().is_empty());
    }

    #[test]
    fn same_seed_same_questions() {
        let numbers = |seed| {
            let (mut engine, _) = engine(seed);
            engine.start_round(Mode::Squares);
            let mut out = Vec::new();
            for _ in 0..5 {
                let q = ask(&mut engine);
                out.push((q.number, q.options.clone()));
                engine.submit_answer(q.number, q.correct_answer).unwrap();
            }
            out
        };
        assert_eq!(numbers(42), numbers(42));
    }
}
