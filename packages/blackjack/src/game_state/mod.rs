use crate::{Card, GameError, GameRules, Hand, HandOutcome};
use serde::{Deserialize, Serialize};

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    NotStarted,
    PlayerTurn,
    DealerTurn,
    Settled,
}

/// The player's seat at the table (several hands after splits)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spot {
    pub hands: Vec<Hand>,
    pub active_hand_index: usize,
}

impl Spot {
    pub fn new(bet: f64) -> Self {
        Self {
            hands: vec![Hand::new(bet)],
            active_hand_index: 0,
        }
    }

    pub fn active_hand(&self) -> &Hand {
        &self.hands[self.active_hand_index]
    }

    pub fn active_hand_mut(&mut self) -> &mut Hand {
        &mut self.hands[self.active_hand_index]
    }

    pub fn has_next_hand(&self) -> bool {
        self.active_hand_index + 1 < self.hands.len()
    }

    pub fn move_to_next_hand(&mut self) -> bool {
        if self.has_next_hand() {
            self.active_hand_index += 1;
            true
        } else {
            false
        }
    }

    pub fn splits(&self) -> usize {
        self.hands.len() - 1
    }

    pub fn can_split(&self, rules: &GameRules) -> bool {
        self.splits() < rules.max_splits as usize && self.active_hand().can_split()
    }

    /// Moves the second card of the active pair into a new hand placed right
    /// after it. Both hands keep the original stake and still need a card.
    pub fn split(&mut self, rules: &GameRules) -> Result<(), GameError> {
        let max_reached = self.splits() >= rules.max_splits as usize;
        let hand = self.active_hand_mut();
        if !hand.can_split() {
            return Err(GameError::InvalidAction {
                action: crate::Action::Split,
                reason: "split only on a two-card pair",
            });
        }
        if max_reached {
            return Err(GameError::InvalidAction {
                action: crate::Action::Split,
                reason: "maximum number of splits reached",
            });
        }

        let second_card = hand.cards.pop().ok_or(GameError::InvalidAction {
            action: crate::Action::Split,
            reason: "no second card",
        })?;
        hand.split = true;

        let mut new_hand = Hand::with_cards(vec![second_card], hand.bet);
        new_hand.split = true;
        self.hands.insert(self.active_hand_index + 1, new_hand);

        Ok(())
    }

    /// Hands that still need the dealer to be paid out
    pub fn has_live_hands(&self) -> bool {
        self.hands.iter().any(|h| !h.is_settled())
    }
}

/// Everything on the table for one round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub spot: Spot,
    pub dealer_hand: Vec<Card>,
    pub phase: GamePhase,
    pub rules: GameRules,
}

impl GameState {
    pub fn new(rules: GameRules) -> Self {
        Self {
            spot: Spot::new(rules.base_bet),
            dealer_hand: Vec::new(),
            phase: GamePhase::NotStarted,
            rules,
        }
    }

    pub fn dealer_value(&self) -> u8 {
        crate::calculate_hand_value(&self.dealer_hand)
    }

    /// Dealer draws below 17 and on soft 17 when the rules say so
    pub fn dealer_should_hit(&self) -> bool {
        let value = self.dealer_value();
        if value >= 17 {
            value == 17 && self.rules.dealer_hits_soft_17 && crate::is_soft_hand(&self.dealer_hand)
        } else {
            true
        }
    }

    pub fn dealer_has_blackjack(&self) -> bool {
        crate::is_blackjack(&self.dealer_hand)
    }

    pub fn can_double_current_hand(&self) -> bool {
        self.phase == GamePhase::PlayerTurn && self.spot.active_hand().can_double()
    }

    pub fn can_split_current_hand(&self) -> bool {
        self.phase == GamePhase::PlayerTurn && self.spot.can_split(&self.rules)
    }

    /// Outcome and net result of `hand` against the current dealer hand.
    pub fn resolve(&self, hand: &Hand) -> (HandOutcome, f64) {
        let bet = hand.bet;
        if hand.is_busted() {
            return (HandOutcome::Loss, -bet);
        }

        let dealer_blackjack = self.dealer_has_blackjack();
        if hand.is_blackjack() {
            return if dealer_blackjack {
                (HandOutcome::Push, 0.0)
            } else {
                (
                    HandOutcome::Blackjack,
                    self.rules.blackjack_payout.calculate_payout(bet),
                )
            };
        }
        if dealer_blackjack {
            return (HandOutcome::Loss, -bet);
        }

        let player_value = hand.value();
        let dealer_value = self.dealer_value();
        if dealer_value > 21 || player_value > dealer_value {
            (HandOutcome::Win, bet)
        } else if player_value < dealer_value {
            (HandOutcome::Loss, -bet)
        } else {
            (HandOutcome::Push, 0.0)
        }
    }
}
