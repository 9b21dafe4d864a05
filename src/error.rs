use thiserror::Error;

use crate::game_state::RoundPhase;

/// Failures of engine commands. Every variant leaves the round state
/// untouched; callers may treat them as no-ops.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("invalid bet of {amount} against a balance of {balance}")]
    InvalidBet { amount: u32, balance: u32 },

    #[error("a bet is already in play for this seat")]
    BetAlreadyPlaced,

    #[error("command not accepted in the {0:?} phase")]
    WrongPhase(RoundPhase),

    #[error("it is not that seat's turn to act")]
    OutOfTurn,

    #[error("both seats need a live bet before the deal")]
    MissingBets,
}

/// Failures of the score ledger. Loading a corrupt or missing file is not
/// one of them: that degrades to an empty history.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("score file access failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("data is not a sequence of score records: {0}")]
    MalformedData(#[from] serde_json::Error),

    #[error("no settled round to record")]
    NoSettledRound,
}
