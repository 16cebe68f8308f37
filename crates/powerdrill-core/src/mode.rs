use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which power table a round drills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// n² for n in 1..=20
    Squares,
    /// n³ for n in 1..=12
    Cubes,
}

impl Mode {
    pub const ALL: [Mode; 2] = [Mode::Squares, Mode::Cubes];

    /// Largest base number in the domain.
    pub fn max_n(self) -> u32 {
        match self {
            Mode::Squares => 20,
            Mode::Cubes => 12,
        }
    }

    pub fn exponent(self) -> u32 {
        match self {
            Mode::Squares => 2,
            Mode::Cubes => 3,
        }
    }

    /// The correct answer for `n`.
    pub fn power(self, n: u32) -> u64 {
        u64::from(n).pow(self.exponent())
    }

    pub fn contains(self, n: u32) -> bool {
        (1..=self.max_n()).contains(&n)
    }

    /// Short form used in the review list, e.g. `7²`.
    pub fn term(self, n: u32) -> String {
        match self {
            Mode::Squares => format!("{n}²"),
            Mode::Cubes => format!("{n}³"),
        }
    }

    /// Question prompt, e.g. `7² = ?`.
    pub fn prompt(self, n: u32) -> String {
        format!("{} = ?", self.term(n))
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Mode::Squares => "Squares (1–20)",
            Mode::Cubes => "Cubes (1–12)",
        }
    }

    /// The mode offered by "switch" after a round.
    pub fn other(self) -> Mode {
        match self {
            Mode::Squares => Mode::Cubes,
            Mode::Cubes => Mode::Squares,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Squares => "squares",
            Mode::Cubes => "cubes",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "squares" | "square" | "sq" => Ok(Mode::Squares),
            "cubes" | "cube" | "cu" => Ok(Mode::Cubes),
            other => Err(format!("unknown mode '{other}', expected squares or cubes")),
        }
    }
}
