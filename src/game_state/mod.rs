use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::deck::Shoe;
use crate::error::{GameError, LedgerError};
use crate::ledger::{PlayerEntry, RoundOutcome, ScoreLedger};
use crate::participant::{Dealer, Player};
use crate::rules::{PayoutRatio, TableRules};

/// Seat names match the ledger wire format, so balances recorded under them
/// resume across sessions.
pub const DEFAULT_PLAYER_NAMES: [&str; 2] = ["Joueur 1", "Joueur 2"];

/// Phase of the current round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    Betting,
    Playing,
    DealerTurn,
    Finished,
}

/// One of the two betting seats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Seat {
    One,
    Two,
}

impl Seat {
    pub const BOTH: [Seat; 2] = [Seat::One, Seat::Two];

    pub fn index(self) -> usize {
        match self {
            Seat::One => 0,
            Seat::Two => 1,
        }
    }

    fn next(self) -> Option<Seat> {
        match self {
            Seat::One => Some(Seat::Two),
            Seat::Two => None,
        }
    }
}

/// What a hit did to the acting player's hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Under 21, the player may act again.
    Continue,
    /// Exactly 21, the turn moved on.
    TwentyOne,
    /// Over 21, the hand is dead.
    Busted,
}

/// Outcome and display detail for one seat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerResult {
    pub outcome: RoundOutcome,
    pub detail: String,
}

/// Committed results of a finished round, computed once against a single
/// dealer snapshot and then only read back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSettlement {
    pub players: [PlayerResult; 2],
    pub dealer_score: u32,
    pub dealer_busted: bool,
}

/// The round state machine: betting, alternating deal, player turns, the
/// dealer's automatic turn, and settlement. One instance per table session;
/// the shoe persists across rounds until a threshold reshuffle.
#[derive(Debug)]
pub struct BlackjackGame<R = StdRng> {
    rules: TableRules,
    shoe: Shoe,
    players: [Player; 2],
    dealer: Dealer,
    phase: RoundPhase,
    active_seat: Option<Seat>,
    settlement: Option<RoundSettlement>,
    rng: R,
}

impl BlackjackGame<StdRng> {
    pub fn new(rules: TableRules) -> Self {
        Self::with_rng(rules, StdRng::from_entropy())
    }

    /// Like `new`, but seats resume the balances of the chronologically-last
    /// ledger record when one exists.
    pub fn resuming(rules: TableRules, ledger: &ScoreLedger) -> Self {
        let mut game = Self::new(rules);
        if let Some((balance1, balance2)) = ledger.last_balances() {
            game.players[0].balance = balance1;
            game.players[1].balance = balance2;
        }
        game
    }
}

impl<R: Rng> BlackjackGame<R> {
    /// Build a table with an explicit random source; seeded generators make
    /// every shuffle reproducible.
    pub fn with_rng(rules: TableRules, mut rng: R) -> Self {
        let shoe = Shoe::fresh(&mut rng);
        let players =
            DEFAULT_PLAYER_NAMES.map(|name| Player::new(name, rules.starting_balance));
        Self {
            rules,
            shoe,
            players,
            dealer: Dealer::new(),
            phase: RoundPhase::Betting,
            active_seat: None,
            settlement: None,
            rng,
        }
    }

    /// Debit a stake for one seat. Accepted in the betting phase; a finished
    /// round re-enters betting on the first new bet.
    pub fn place_bet(&mut self, seat: Seat, amount: u32) -> Result<(), GameError> {
        match self.phase {
            RoundPhase::Betting => {}
            RoundPhase::Finished => self.phase = RoundPhase::Betting,
            phase => return Err(GameError::WrongPhase(phase)),
        }
        self.players[seat.index()].place_bet(amount)
    }

    /// Deal the opening hands once both seats hold a live bet: two cards to
    /// each player and the dealer, dealt alternately. A natural blackjack is
    /// marked standing immediately; it still settles at the premium payout.
    pub fn start_round(&mut self) -> Result<(), GameError> {
        if self.phase != RoundPhase::Betting {
            return Err(GameError::WrongPhase(self.phase));
        }
        if self.players.iter().any(|p| p.current_bet == 0) {
            return Err(GameError::MissingBets);
        }

        for player in &mut self.players {
            player.reset_hand();
        }
        self.dealer.reset_hand();
        self.settlement = None;
        self.shoe.ensure_for_deal(&mut self.rng);

        for _ in 0..2 {
            for seat in Seat::BOTH {
                let card = self.shoe.draw(&mut self.rng);
                self.players[seat.index()].hand.push(card);
            }
            let card = self.shoe.draw(&mut self.rng);
            self.dealer.hand.push(card);
        }

        for player in &mut self.players {
            if player.has_natural_blackjack() {
                player.is_standing = true;
            }
        }

        self.phase = RoundPhase::Playing;
        self.active_seat = Some(Seat::One);
        if !self.players[0].can_act() {
            self.advance_turn();
        }
        Ok(())
    }

    fn require_turn(&self, seat: Seat) -> Result<(), GameError> {
        if self.phase != RoundPhase::Playing {
            return Err(GameError::WrongPhase(self.phase));
        }
        if self.active_seat != Some(seat) {
            return Err(GameError::OutOfTurn);
        }
        Ok(())
    }

    /// Draw one card for the acting seat. A bust or an exact 21 ends the
    /// seat's turn on the spot.
    pub fn hit(&mut self, seat: Seat) -> Result<HitOutcome, GameError> {
        self.require_turn(seat)?;
        let card = self.shoe.draw(&mut self.rng);
        let player = &mut self.players[seat.index()];
        player.hand.push(card);

        if player.check_bust() {
            self.advance_turn();
            Ok(HitOutcome::Busted)
        } else if player.score() == 21 {
            player.is_standing = true;
            self.advance_turn();
            Ok(HitOutcome::TwentyOne)
        } else {
            Ok(HitOutcome::Continue)
        }
    }

    /// End the acting seat's turn voluntarily.
    pub fn stand(&mut self, seat: Seat) -> Result<(), GameError> {
        self.require_turn(seat)?;
        self.players[seat.index()].is_standing = true;
        self.advance_turn();
        Ok(())
    }

    /// Move to the next seat that can still act; when none is left the round
    /// enters the dealer's turn. A no-op outside the playing phase.
    pub fn advance_turn(&mut self) {
        if self.phase != RoundPhase::Playing {
            return;
        }
        let mut candidate = self.active_seat.and_then(Seat::next);
        while let Some(seat) = candidate {
            if self.players[seat.index()].can_act() {
                self.active_seat = Some(seat);
                return;
            }
            candidate = seat.next();
        }
        self.active_seat = None;
        self.phase = RoundPhase::DealerTurn;
    }

    /// Play out the dealer's whole turn in one call: draw while below the
    /// stand score, then settle both seats against one dealer snapshot.
    /// Staged card-by-card reveal is the presentation layer's business.
    pub fn run_dealer_turn(&mut self) -> Result<(), GameError> {
        if self.phase != RoundPhase::DealerTurn {
            return Err(GameError::WrongPhase(self.phase));
        }
        while self.dealer.should_draw(self.rules.dealer_stand_score) {
            let card = self.shoe.draw(&mut self.rng);
            self.dealer.hand.push(card);
        }
        self.dealer.check_bust();
        self.settle();
        self.phase = RoundPhase::Finished;
        Ok(())
    }

    /// Commit balances and lifetime counters for both seats. Runs exactly
    /// once per round; `settlement()` only reads the stored result.
    fn settle(&mut self) {
        let dealer_score = self.dealer.score();
        let dealer_busted = self.dealer.is_busted;
        let dealer_natural = self.dealer.has_natural_blackjack();
        let payout = self.rules.blackjack_payout;

        let players = [0, 1].map(|index| {
            settle_seat(
                &mut self.players[index],
                dealer_score,
                dealer_busted,
                dealer_natural,
                payout,
            )
        });

        self.settlement = Some(RoundSettlement {
            players,
            dealer_score,
            dealer_busted,
        });
    }

    /// Snapshot the committed settlement into the score history. Fails when
    /// no round has been settled since the last deal.
    pub fn save_round_results(&self, ledger: &mut ScoreLedger) -> Result<(), LedgerError> {
        let settlement = self.settlement.as_ref().ok_or(LedgerError::NoSettledRound)?;
        let [player1, player2] = [0, 1].map(|index| {
            let player = &self.players[index];
            PlayerEntry {
                name: player.name.clone(),
                outcome: settlement.players[index].outcome,
                score: player.score(),
                balance: player.balance,
            }
        });
        ledger.add(player1, player2, settlement.dealer_score)
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn active_seat(&self) -> Option<Seat> {
        self.active_seat
    }

    pub fn player(&self, seat: Seat) -> &Player {
        &self.players[seat.index()]
    }

    pub fn dealer(&self) -> &Dealer {
        &self.dealer
    }

    pub fn rules(&self) -> &TableRules {
        &self.rules
    }

    pub fn shoe_remaining(&self) -> usize {
        self.shoe.remaining()
    }

    pub fn settlement(&self) -> Option<&RoundSettlement> {
        self.settlement.as_ref()
    }
}

fn settle_seat(
    player: &mut Player,
    dealer_score: u32,
    dealer_busted: bool,
    dealer_natural: bool,
    payout: PayoutRatio,
) -> PlayerResult {
    if player.is_busted {
        player.forfeit_bet();
        return PlayerResult {
            outcome: RoundOutcome::Lose,
            detail: "busted past 21".to_string(),
        };
    }

    let score = player.score();
    let player_natural = player.has_natural_blackjack();

    if player_natural && !dealer_natural {
        let winnings = payout.winnings(player.current_bet);
        player.credit_win(winnings);
        return PlayerResult {
            outcome: RoundOutcome::Blackjack,
            detail: "blackjack!".to_string(),
        };
    }

    if dealer_natural && !player_natural {
        player.forfeit_bet();
        return PlayerResult {
            outcome: RoundOutcome::Lose,
            detail: "dealer has blackjack".to_string(),
        };
    }

    if dealer_busted {
        player.credit_win(player.current_bet);
        return PlayerResult {
            outcome: RoundOutcome::Win,
            detail: "dealer busted".to_string(),
        };
    }

    match score.cmp(&dealer_score) {
        std::cmp::Ordering::Greater => {
            player.credit_win(player.current_bet);
            PlayerResult {
                outcome: RoundOutcome::Win,
                detail: format!("{score} vs {dealer_score}"),
            }
        }
        std::cmp::Ordering::Less => {
            player.forfeit_bet();
            PlayerResult {
                outcome: RoundOutcome::Lose,
                detail: format!("{score} vs {dealer_score}"),
            }
        }
        std::cmp::Ordering::Equal => {
            player.refund_bet();
            PlayerResult {
                outcome: RoundOutcome::Draw,
                detail: format!("push at {score}"),
            }
        }
    }
}
