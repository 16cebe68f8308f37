pub mod config;
pub mod play;
pub mod reward;
pub mod simulate;

use clap::ValueEnum;
use powerdrill_core::Mode;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ModeArg {
    /// n² for n in 1..=20
    Squares,
    /// n³ for n in 1..=12
    Cubes,
}

impl From<ModeArg> for Mode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Squares => Mode::Squares,
            ModeArg::Cubes => Mode::Cubes,
        }
    }
}
