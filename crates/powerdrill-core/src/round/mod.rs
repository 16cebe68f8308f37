mod engine;
mod state;

pub use engine::{fresh_seed, AnswerFeedback, NextQuestion, RoundEngine, RoundPhase, Submission};
pub use state::{
    EndReason, Pacing, Progress, Question, RoundRules, RoundState, Summary, WrongRecord,
};
