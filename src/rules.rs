use serde::{Deserialize, Serialize};

/// Payout multiplier applied to a winning bet, as a ratio of the stake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutRatio {
    pub numerator: u32,
    pub denominator: u32,
}

impl PayoutRatio {
    pub const THREE_TO_TWO: Self = Self {
        numerator: 3,
        denominator: 2,
    };
    pub const EVEN_MONEY: Self = Self {
        numerator: 1,
        denominator: 1,
    };

    /// Winnings beyond the returned stake, truncated to whole currency units.
    pub fn winnings(&self, bet: u32) -> u32 {
        bet * self.numerator / self.denominator
    }
}

/// Fixed table configuration: two seats against the dealer, single 52-card
/// shoe, no splits/doubles/insurance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRules {
    /// Balance handed to a player with no recorded history.
    pub starting_balance: u32,

    /// Premium paid on a natural blackjack when the dealer has none.
    pub blackjack_payout: PayoutRatio,

    /// The dealer draws while below this score. Hard rule: a soft total at
    /// the threshold also stands.
    pub dealer_stand_score: u32,
}

impl Default for TableRules {
    fn default() -> Self {
        Self {
            starting_balance: 1000,
            blackjack_payout: PayoutRatio::THREE_TO_TWO,
            dealer_stand_score: 17,
        }
    }
}
