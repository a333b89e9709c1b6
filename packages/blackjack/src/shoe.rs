use crate::{Card, GameRules};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::VecDeque;

/// A shoe of one or more shuffled decks.
///
/// Before every draw the shoe is rebuilt and reshuffled if fewer than
/// `reshuffle_threshold` cards remain. A stacked shoe deals its given cards
/// in order first and only then falls back to shuffled decks.
#[derive(Debug, Clone)]
pub struct Shoe {
    cards: VecDeque<Card>,
    num_decks: u8,
    reshuffle_threshold: usize,
    rng: ChaCha8Rng,
}

impl Shoe {
    pub fn new(num_decks: u8, reshuffle_threshold: usize, rng: ChaCha8Rng) -> Self {
        let mut shoe = Self {
            cards: VecDeque::new(),
            num_decks: num_decks.max(1),
            reshuffle_threshold,
            rng,
        };
        shoe.rebuild();
        shoe
    }

    pub fn from_rules(rules: &GameRules, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self::new(rules.num_decks, rules.reshuffle_threshold, rng)
    }

    /// Shoe that deals `cards` front to back before shuffling anything.
    pub fn stacked(cards: Vec<Card>) -> Self {
        Self {
            cards: cards.into(),
            num_decks: 1,
            reshuffle_threshold: 0,
            rng: ChaCha8Rng::seed_from_u64(0),
        }
    }

    pub fn draw(&mut self) -> Card {
        if self.cards.is_empty() || self.cards.len() < self.reshuffle_threshold {
            self.rebuild();
        }
        // Non-empty after a rebuild
        match self.cards.pop_front() {
            Some(card) => card,
            None => unreachable!("shoe rebuilt with zero decks"),
        }
    }

    pub fn remaining(&self) -> usize {
        self.cards.len()
    }

    fn rebuild(&mut self) {
        let mut cards: Vec<Card> = (0..self.num_decks).flat_map(|_| Card::deck()).collect();
        cards.shuffle(&mut self.rng);
        log::trace!("Shoe rebuilt with {} cards", cards.len());
        self.cards = cards.into();
    }
}
