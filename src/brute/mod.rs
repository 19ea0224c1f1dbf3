//! Brute-force candidate space
//!
//! Enumerates every string of a fixed length over an ordered alphabet, in
//! odometer order, with resumable state.

mod alphabet;
mod odometer;
mod state;

pub use alphabet::Alphabet;
pub use odometer::{partition, OdometerGenerator};
pub use state::{BruteState, Checkpointer, RecoveredEntry};

/// Built-in alphabets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Charset {
    /// Digits (0-9)
    Digits,
    /// Lowercase letters (a-z)
    Lower,
    /// Uppercase letters (A-Z)
    Upper,
    /// Digits then lowercase letters (0-9a-z)
    #[default]
    Alnum,
    /// Digits, lowercase and uppercase letters (0-9a-zA-Z)
    Mixed,
    /// Lowercase hex digits (0-9a-f)
    Hex,
}

impl Charset {
    pub fn symbols(&self) -> &'static str {
        match self {
            Charset::Digits => "0123456789",
            Charset::Lower => "abcdefghijklmnopqrstuvwxyz",
            Charset::Upper => "ABCDEFGHIJKLMNOPQRSTUVWXYZ",
            Charset::Alnum => "0123456789abcdefghijklmnopqrstuvwxyz",
            Charset::Mixed => "0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ",
            Charset::Hex => "0123456789abcdef",
        }
    }

    pub fn alphabet(&self) -> Alphabet {
        Alphabet::from_static(self.symbols())
    }

    /// Size of the search space for `length`, `None` if it does not fit in u64
    pub fn total_combinations(&self, length: usize) -> Option<u64> {
        self.alphabet().total_combinations(length)
    }
}
