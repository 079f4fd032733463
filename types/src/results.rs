//! Aggregate poll results as last observed on-chain.

use serde::{Deserialize, Serialize};

use crate::option::VoteOption;

/// Vote counts for both options and the ledger height they were read at.
///
/// A snapshot is only ever replaced as a whole.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultsSnapshot {
    pub a: u64,
    pub b: u64,
    pub ledger: u64,
}

impl ResultsSnapshot {
    pub fn new(a: u64, b: u64, ledger: u64) -> Self {
        Self { a, b, ledger }
    }

    pub fn total(&self) -> u64 {
        self.a.saturating_add(self.b)
    }

    /// Percentage shares `(a, b)` rounded half up.
    ///
    /// With no votes both shares are 50. Each share is rounded on its own, so
    /// the pair may sum to 101 (e.g. 3 and 5 votes give 38 and 63).
    pub fn shares(&self) -> (u8, u8) {
        let total = u128::from(self.total());
        if total == 0 {
            return (50, 50);
        }
        let share = |count: u64| -> u8 {
            // round(count / total * 100) == floor((200 * count + total) / (2 * total))
            ((200 * u128::from(count) + total) / (2 * total)) as u8
        };
        (share(self.a), share(self.b))
    }

    /// The option with strictly more votes, if any.
    pub fn leading(&self) -> Option<VoteOption> {
        match self.a.cmp(&self.b) {
            std::cmp::Ordering::Greater => Some(VoteOption::A),
            std::cmp::Ordering::Less => Some(VoteOption::B),
            std::cmp::Ordering::Equal => None,
        }
    }
}
