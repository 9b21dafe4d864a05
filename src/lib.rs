mod card;
mod deck;
mod error;
mod game_state;
mod hand;
mod ledger;
mod participant;
mod rules;

pub use card::{Card, Rank, Suit};
pub use deck::{Shoe, DEAL_REFILL_THRESHOLD, DRAW_REFILL_THRESHOLD};
pub use error::{GameError, LedgerError};
pub use game_state::{
    BlackjackGame, HitOutcome, PlayerResult, RoundPhase, RoundSettlement, Seat,
    DEFAULT_PLAYER_NAMES,
};
pub use hand::{hand_score, is_busted, is_natural_blackjack, is_soft, Hand};
pub use ledger::{
    DealerEntry, PlayerEntry, PlayerStats, RoundOutcome, ScoreLedger, ScoreRecord,
    TIMESTAMP_FORMAT,
};
pub use participant::{Dealer, Player};
pub use rules::{PayoutRatio, TableRules};
