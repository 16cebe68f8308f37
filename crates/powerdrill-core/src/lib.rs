//! # Powerdrill Core Library
//!
//! This library provides the core logic for Powerdrill, a squares (1–20) and
//! cubes (1–12) drill. Everything a front end needs to run a round lives
//! here; the CLI crate is a thin terminal layer over the same library.
//!
//! ## Architecture
//!
//! - **Round Engine**: A wall-clock-based state machine that requires the caller
//!   to periodically invoke `tick()` and feed answers one at a time
//! - **Scheduler**: Base queue plus retry queue with a cooldown
//! - **Choices**: Distractors drawn from the same power table
//! - **Rewards**: Score percentage to reward minutes
//! - **Config**: TOML-based presentation preferences
//!
//! ## Key Components
//!
//! - [`RoundEngine`]: Core round state machine
//! - [`QuestionScheduler`]: Picks the next number to ask
//! - [`Event`]: What the presentation layer renders
//! - [`Config`]: Application configuration management

pub mod choices;
pub mod clock;
pub mod config;
pub mod error;
pub mod events;
pub mod gate;
pub mod mode;
pub mod pool;
pub mod reward;
pub mod round;
pub mod scheduler;
pub mod simulation;

pub use choices::{build_choices, check_capacity, CHOICE_COUNT};
pub use clock::{format_clock, Clock, ManualClock, SystemClock};
pub use config::Config;
pub use error::{ChoiceError, ConfigError, CoreError, RoundError};
pub use events::Event;
pub use gate::{gate_lines, Countdown, CountdownStep};
pub use mode::Mode;
pub use pool::build_pool;
pub use reward::{compute_reward, RewardTier};
pub use round::{
    fresh_seed, AnswerFeedback, EndReason, NextQuestion, Pacing, Progress, Question, RoundEngine,
    RoundPhase, RoundRules, RoundState, Submission, Summary, WrongRecord,
};
pub use scheduler::{Pick, PickSource, QuestionScheduler, RetryItem, RETRY_COOLDOWN};
pub use simulation::{simulate_round, SimulatedPlayer, SimulationResult};
