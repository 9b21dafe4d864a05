use serde::{Deserialize, Serialize};

use crate::card::Card;
use crate::error::GameError;
use crate::hand::Hand;

/// A betting seat at the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub balance: u32,
    pub current_bet: u32,
    pub hand: Hand,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub is_busted: bool,
    pub is_standing: bool,
}

impl Player {
    pub fn new(name: impl Into<String>, balance: u32) -> Self {
        Self {
            name: name.into(),
            balance,
            current_bet: 0,
            hand: Hand::new(),
            wins: 0,
            losses: 0,
            draws: 0,
            is_busted: false,
            is_standing: false,
        }
    }

    /// Debit the stake and hold it as the live bet. The bet stays live until
    /// settlement pays it out, refunds it, or forfeits it.
    pub fn place_bet(&mut self, amount: u32) -> Result<(), GameError> {
        if self.current_bet > 0 {
            return Err(GameError::BetAlreadyPlaced);
        }
        if amount == 0 || amount > self.balance {
            return Err(GameError::InvalidBet {
                amount,
                balance: self.balance,
            });
        }
        self.balance -= amount;
        self.current_bet = amount;
        Ok(())
    }

    /// Return the stake plus `winnings` to the balance and close the bet.
    pub fn credit_win(&mut self, winnings: u32) -> u32 {
        let credit = self.current_bet + winnings;
        self.balance += credit;
        self.wins += 1;
        self.current_bet = 0;
        credit
    }

    /// The stake was already debited at placement; only the record changes.
    pub fn forfeit_bet(&mut self) {
        self.losses += 1;
        self.current_bet = 0;
    }

    /// Push: the stake comes back, no winnings.
    pub fn refund_bet(&mut self) {
        self.balance += self.current_bet;
        self.draws += 1;
        self.current_bet = 0;
    }

    pub fn reset_hand(&mut self) {
        self.hand.clear();
        self.is_busted = false;
        self.is_standing = false;
    }

    pub fn score(&self) -> u32 {
        self.hand.score()
    }

    pub fn has_natural_blackjack(&self) -> bool {
        self.hand.is_natural_blackjack()
    }

    pub fn check_bust(&mut self) -> bool {
        if self.hand.is_busted() {
            self.is_busted = true;
        }
        self.is_busted
    }

    pub fn can_act(&self) -> bool {
        !self.is_busted && !self.is_standing
    }
}

/// The dealer holds a hand and a draw policy, nothing else. It never bets,
/// so it shares no state with `Player` beyond the hand evaluator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dealer {
    pub hand: Hand,
    pub is_busted: bool,
}

impl Dealer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw while below the stand score, soft or hard.
    pub fn should_draw(&self, stand_score: u32) -> bool {
        self.hand.score() < stand_score
    }

    /// The face-up card shown while players act.
    pub fn upcard(&self) -> Option<&Card> {
        self.hand.cards.first()
    }

    pub fn score(&self) -> u32 {
        self.hand.score()
    }

    pub fn has_natural_blackjack(&self) -> bool {
        self.hand.is_natural_blackjack()
    }

    pub fn check_bust(&mut self) -> bool {
        if self.hand.is_busted() {
            self.is_busted = true;
        }
        self.is_busted
    }

    pub fn reset_hand(&mut self) {
        self.hand.clear();
        self.is_busted = false;
    }
}
