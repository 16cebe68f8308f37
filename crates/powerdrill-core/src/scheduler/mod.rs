//! Question scheduler.
//!
//! Picks the next number to ask from two sources:
//! - the base queue: a shuffled, never-replenished permutation of the domain
//! - the retry queue: numbers answered wrongly, each with a cooldown
//!
//! ## Selection order
//!
//! ```text
//! base front (rotated once if it repeats the last number)
//!   -> retry past cooldown, not a repeat
//!   -> any retry, preferring a non-repeat (cooldown ignored)
//!   -> None: round is over
//! ```
//!
//! The last step keeps the round live. A cooldown violation is acceptable
//! only when no compliant candidate exists.

mod retry;

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

pub use retry::{RetryItem, RetryQueue};

/// Questions that must pass before a wrong answer may be re-asked.
pub const RETRY_COOLDOWN: usize = 3;

/// Where a picked number came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickSource {
    Base,
    Retry,
    /// Taken from the retry queue before its cooldown elapsed.
    RetryFallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pick {
    pub number: u32,
    pub source: PickSource,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionScheduler {
    base: VecDeque<u32>,
    retry: RetryQueue,
    cooldown: usize,
}

impl QuestionScheduler {
    pub fn new(base: VecDeque<u32>) -> Self {
        Self::with_cooldown(base, RETRY_COOLDOWN)
    }

    pub fn with_cooldown(base: VecDeque<u32>, cooldown: usize) -> Self {
        Self {
            base,
            retry: RetryQueue::new(),
            cooldown,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn cooldown(&self) -> usize {
        self.cooldown
    }

    pub fn base_remaining(&self) -> usize {
        self.base.len()
    }

    pub fn retry_pending(&self) -> usize {
        self.retry.len()
    }

    pub fn retries(&self) -> &[RetryItem] {
        self.retry.items()
    }

    /// Both queues drained.
    pub fn is_exhausted(&self) -> bool {
        self.base.is_empty() && self.retry.is_empty()
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Next number to ask at `current_index`, or `None` when nothing is left.
    pub fn next(&mut self, current_index: usize, last_asked: Option<u32>) -> Option<Pick> {
        if !self.base.is_empty() {
            if self.base.front().copied() == last_asked && self.base.len() > 1 {
                self.base.rotate_left(1);
            }
            let number = self.base.pop_front()?;
            tracing::debug!(number, remaining = self.base.len(), "picked from base queue");
            return Some(Pick {
                number,
                source: PickSource::Base,
            });
        }

        if let Some(item) = self.retry.take_eligible(current_index, last_asked) {
            tracing::debug!(number = item.number, eligible_at = item.eligible_at, "picked retry");
            return Some(Pick {
                number: item.number,
                source: PickSource::Retry,
            });
        }

        let item = self.retry.take_fallback(last_asked)?;
        tracing::debug!(
            number = item.number,
            eligible_at = item.eligible_at,
            current_index,
            "no retry past cooldown, falling back"
        );
        Some(Pick {
            number: item.number,
            source: PickSource::RetryFallback,
        })
    }

    /// Queue `number` again after it was answered wrongly at `answered_index`.
    pub fn requeue(&mut self, number: u32, answered_index: usize) -> RetryItem {
        let item = RetryItem {
            number,
            eligible_at: answered_index + self.cooldown,
        };
        tracing::debug!(number, eligible_at = item.eligible_at, "requeued wrong answer");
        self.retry.push(item);
        item
    }
}
