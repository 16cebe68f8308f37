//! Ready gate shown before a round: reward tiers and a short countdown.

use serde::{Deserialize, Serialize};

use crate::mode::Mode;
use crate::reward::RewardTier;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownStep {
    pub label: String,
    /// How long the label stays up before the next step (or the round).
    pub hold_ms: u64,
    /// Last step; the round starts after it.
    pub go: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countdown {
    steps: Vec<CountdownStep>,
}

impl Countdown {
    /// "3", "2", "1" every `step_ms`, then "LET'S GO!" held for `go_hold_ms`.
    pub fn new(step_ms: u64, go_hold_ms: u64) -> Self {
        let mut steps: Vec<CountdownStep> = ["3", "2", "1"]
            .into_iter()
            .map(|label| CountdownStep {
                label: label.into(),
                hold_ms: step_ms,
                go: false,
            })
            .collect();
        steps.push(CountdownStep {
            label: "LET'S GO!".into(),
            hold_ms: go_hold_ms,
            go: true,
        });
        Self { steps }
    }

    pub fn steps(&self) -> &[CountdownStep] {
        &self.steps
    }

    pub fn total_ms(&self) -> u64 {
        self.steps.iter().map(|s| s.hold_ms).sum()
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new(700, 600)
    }
}

/// Text lines for the "are you ready?" card.
pub fn gate_lines(mode: Mode) -> Vec<String> {
    let mut lines = vec![
        "Are you ready?".to_string(),
        "Earn a reward based on how many you get right!".to_string(),
    ];
    lines.extend(
        RewardTier::ALL
            .iter()
            .map(|tier| format!("  {:>7}  {}", tier.band(), tier.description())),
    );
    lines.push(format!("Mode: {}", mode.display_name()));
    lines
}
