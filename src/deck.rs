use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::card::{Card, Rank, Suit};

/// Remaining-card count below which `draw` regenerates the shoe before
/// dealing. A regeneration mid-round resets the shoe composition; the same
/// (rank, suit) can then show up twice within one round.
pub const DRAW_REFILL_THRESHOLD: usize = 10;

/// Remaining-card count below which `ensure_for_deal` regenerates the shoe,
/// so the six-card opening deal never straddles a reshuffle.
pub const DEAL_REFILL_THRESHOLD: usize = 20;

/// The live, shuffled 52-card set being dealt from. Cards are drawn from the
/// end, stack style. A fresh shoe holds every (rank, suit) pair exactly once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shoe {
    cards: Vec<Card>,
}

impl Shoe {
    /// Build the standard 52-card set and shuffle it uniformly.
    pub fn fresh<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut shoe = Self { cards: Vec::new() };
        shoe.regenerate(rng);
        shoe
    }

    fn regenerate<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.clear();
        self.cards.reserve(52);
        for suit in Suit::ALL {
            for rank in Rank::ALL {
                self.cards.push(Card::new(rank, suit));
            }
        }
        self.cards.shuffle(rng);
    }

    /// Remove and return the top card, regenerating the shoe first when it
    /// has run low.
    pub fn draw<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Card {
        if self.cards.len() < DRAW_REFILL_THRESHOLD {
            self.regenerate(rng);
        }
        self.cards.pop().expect("shoe holds 52 cards after a regeneration")
    }

    /// Called before the opening deal of a round.
    pub fn ensure_for_deal<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if self.cards.len() < DEAL_REFILL_THRESHOLD {
            self.regenerate(rng);
        }
    }

    pub fn remaining(&self) -> usize {
        self.cards.len()
    }

    #[cfg(test)]
    pub(crate) fn cards_mut(&mut self) -> &mut Vec<Card> {
        &mut self.cards
    }
}
