//! Score-to-reward mapping.
//!
//! | correct      | reward     |
//! |--------------|------------|
//! | < 60%        | none       |
//! | 60% – 79%    | 15 minutes |
//! | 80% – 99%    | 30 minutes |
//! | 100%         | 60 minutes |
//!
//! Lower bounds are inclusive. Comparisons are done on integers
//! (`score * 100` against `pct * total`) so 60% exactly lands in the 15
//! minute tier with no float rounding.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardTier {
    None,
    Short,
    Long,
    FullHour,
}

impl RewardTier {
    pub const ALL: [RewardTier; 4] = [
        RewardTier::None,
        RewardTier::Short,
        RewardTier::Long,
        RewardTier::FullHour,
    ];

    pub fn for_score(score: u32, total: u32) -> Self {
        if total == 0 {
            return RewardTier::None;
        }
        let scaled = u64::from(score) * 100;
        let total = u64::from(total);
        if scaled < 60 * total {
            RewardTier::None
        } else if scaled < 80 * total {
            RewardTier::Short
        } else if scaled < 100 * total {
            RewardTier::Long
        } else {
            RewardTier::FullHour
        }
    }

    pub fn minutes(self) -> u32 {
        match self {
            RewardTier::None => 0,
            RewardTier::Short => 15,
            RewardTier::Long => 30,
            RewardTier::FullHour => 60,
        }
    }

    /// Percentage band as shown on the ready gate.
    pub fn band(self) -> &'static str {
        match self {
            RewardTier::None => "< 60%",
            RewardTier::Short => "60–79%",
            RewardTier::Long => "80–99%",
            RewardTier::FullHour => "100%",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            RewardTier::None => "No reward (try again!)",
            RewardTier::Short => "15 minutes",
            RewardTier::Long => "30 minutes",
            RewardTier::FullHour => "1 full hour",
        }
    }
}

/// Reward minutes for `score` correct out of `total` answered.
pub fn compute_reward(score: u32, total: u32) -> u32 {
    RewardTier::for_score(score, total).minutes()
}
