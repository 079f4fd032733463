//! The two options a voter can choose between.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A vote option. Fixed for the lifetime of a single submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoteOption {
    A,
    B,
}

impl VoteOption {
    /// The contract write method that records a vote for this option.
    pub fn contract_method(&self) -> &'static str {
        match self {
            Self::A => "vote_a",
            Self::B => "vote_b",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
        }
    }
}

impl fmt::Display for VoteOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
