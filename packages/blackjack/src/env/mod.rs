use crate::{Card, GameError, GamePhase, GameRules, GameState, Hand, HandOutcome, Shoe};
use serde::{Deserialize, Serialize};

/// The four moves a player can make
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Action {
    /// Draw another card
    Hit,
    /// Stop drawing and finish the hand
    Stand,
    /// Double the bet, draw exactly one card, then stand
    Double,
    /// Split a pair into two hands
    Split,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::Hit, Action::Stand, Action::Double, Action::Split];

    /// Legal actions given the two eligibility flags, in `ALL` order.
    pub fn legal(can_double: bool, can_split: bool) -> Vec<Action> {
        Self::ALL
            .into_iter()
            .filter(|a| match a {
                Action::Double => can_double,
                Action::Split => can_split,
                _ => true,
            })
            .collect()
    }
}

/// Turn order of the round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Variant {
    /// Player acts seeing only the dealer's up-card
    Standard,
    /// Dealer finishes its hand before the player acts
    Reverse,
}

/// What the player knows about the dealer at decision time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DealerView {
    UpCard(Card),
    Resolved { cards: Vec<Card>, total: u8 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub player_cards: Vec<Card>,
    pub player_total: u8,
    pub usable_ace: bool,
    pub can_double: bool,
    pub can_split: bool,
    pub dealer: DealerView,
}

impl Observation {
    /// Up-card value (ace low) in the standard game, final total in the
    /// reverse one.
    pub fn dealer_value(&self) -> u8 {
        match &self.dealer {
            DealerView::UpCard(card) => card.value(),
            DealerView::Resolved { total, .. } => *total,
        }
    }

    pub fn legal_actions(&self) -> Vec<Action> {
        Action::legal(self.can_double, self.can_split)
    }
}

/// Result of one `step`
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    /// `None` once the round is over
    pub observation: Option<Observation>,
    pub reward: f64,
    pub done: bool,
}

/// One player against the dealer, one round per episode.
///
/// Rewards are paid as hands settle: a bust pays out on the step that
/// caused it, every other hand on the final step after the dealer has
/// played. The rewards of an episode add up to the round's net result.
pub struct BlackjackEnv {
    variant: Variant,
    rules: GameRules,
    shoe: Shoe,
    state: GameState,
}

impl BlackjackEnv {
    pub fn new(variant: Variant, rules: GameRules, seed: Option<u64>) -> Result<Self, GameError> {
        rules.validate()?;
        let shoe = Shoe::from_rules(&rules, seed);
        Ok(Self::with_shoe(variant, rules, shoe))
    }

    pub fn with_shoe(variant: Variant, rules: GameRules, shoe: Shoe) -> Self {
        Self {
            variant,
            rules,
            shoe,
            state: GameState::new(rules),
        }
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn rules(&self) -> &GameRules {
        &self.rules
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn is_done(&self) -> bool {
        self.state.phase == GamePhase::Settled
    }

    pub fn dealer_hand(&self) -> &[Card] {
        &self.state.dealer_hand
    }

    pub fn dealer_value(&self) -> u8 {
        self.state.dealer_value()
    }

    pub fn player_hands(&self) -> &[Hand] {
        &self.state.spot.hands
    }

    /// Outcomes of the hands settled so far, in seat order
    pub fn outcomes(&self) -> Vec<HandOutcome> {
        self.state.spot.hands.iter().filter_map(|h| h.outcome).collect()
    }

    /// Deal a new round and return the first observation.
    pub fn reset(&mut self) -> Observation {
        self.state = GameState::new(self.rules);
        for _ in 0..2 {
            let card = self.shoe.draw();
            self.state.spot.active_hand_mut().add_card(card);
            let card = self.shoe.draw();
            self.state.dealer_hand.push(card);
        }

        if self.variant == Variant::Reverse {
            self.play_dealer();
        }
        self.state.phase = GamePhase::PlayerTurn;

        log::trace!(
            "Dealt player {:?} dealer {:?}",
            self.state.spot.active_hand().cards,
            self.state.dealer_hand
        );
        self.active_observation()
    }

    /// Apply `action` to the active hand.
    pub fn step(&mut self, action: Action) -> Result<Step, GameError> {
        if self.state.phase != GamePhase::PlayerTurn {
            return Err(GameError::EpisodeOver);
        }

        let mut reward = 0.0;
        match action {
            Action::Hit => {
                let card = self.shoe.draw();
                self.state.spot.active_hand_mut().add_card(card);
                if self.state.spot.active_hand().is_busted() {
                    reward += self.settle_active_bust();
                    self.advance();
                }
            }
            Action::Stand => {
                self.state.spot.active_hand_mut().stood = true;
                self.advance();
            }
            Action::Double => {
                if !self.state.can_double_current_hand() {
                    return Err(GameError::InvalidAction {
                        action,
                        reason: "double only on the first two cards of a hand",
                    });
                }
                let card = self.shoe.draw();
                let hand = self.state.spot.active_hand_mut();
                hand.bet *= 2.0;
                hand.doubled = true;
                hand.add_card(card);
                hand.stood = true;
                if hand.is_busted() {
                    reward += self.settle_active_bust();
                }
                self.advance();
            }
            Action::Split => {
                self.state.spot.split(&self.rules)?;
                let card = self.shoe.draw();
                self.state.spot.active_hand_mut().add_card(card);
                let card = self.shoe.draw();
                let next = self.state.spot.active_hand_index + 1;
                self.state.spot.hands[next].add_card(card);
            }
        }

        if self.state.phase == GamePhase::DealerTurn {
            reward += self.finish_round();
            return Ok(Step {
                observation: None,
                reward,
                done: true,
            });
        }

        Ok(Step {
            observation: Some(self.active_observation()),
            reward,
            done: false,
        })
    }

    /// Observation for the active hand, `None` outside the player's turn.
    pub fn observation(&self) -> Option<Observation> {
        (self.state.phase == GamePhase::PlayerTurn).then(|| self.active_observation())
    }

    fn active_observation(&self) -> Observation {
        let hand = self.state.spot.active_hand();
        let dealer = match self.variant {
            Variant::Standard => DealerView::UpCard(self.state.dealer_hand[0]),
            Variant::Reverse => DealerView::Resolved {
                cards: self.state.dealer_hand.clone(),
                total: self.state.dealer_value(),
            },
        };
        Observation {
            player_cards: hand.cards.clone(),
            player_total: hand.value(),
            usable_ace: hand.is_soft(),
            can_double: self.state.can_double_current_hand(),
            can_split: self.state.can_split_current_hand(),
            dealer,
        }
    }

    fn settle_active_bust(&mut self) -> f64 {
        let hand = self.state.spot.active_hand_mut();
        hand.outcome = Some(HandOutcome::Loss);
        -hand.bet
    }

    fn advance(&mut self) {
        if !self.state.spot.move_to_next_hand() {
            self.state.phase = GamePhase::DealerTurn;
        }
    }

    fn play_dealer(&mut self) {
        while self.state.dealer_should_hit() {
            let card = self.shoe.draw();
            self.state.dealer_hand.push(card);
        }
    }

    /// Dealer plays out (standard game, unless every hand busted) and the
    /// remaining hands are paid.
    fn finish_round(&mut self) -> f64 {
        let live = self.state.spot.has_live_hands();
        if live && self.variant == Variant::Standard {
            self.play_dealer();
        }

        let mut reward = 0.0;
        for i in 0..self.state.spot.hands.len() {
            if self.state.spot.hands[i].is_settled() {
                continue;
            }
            let (outcome, net) = self.state.resolve(&self.state.spot.hands[i]);
            self.state.spot.hands[i].outcome = Some(outcome);
            reward += net;
        }
        self.state.phase = GamePhase::Settled;

        log::debug!(
            "Round settled: dealer {} ({}), outcomes {:?}, reward {}",
            self.state.dealer_value(),
            self.state.dealer_hand.len(),
            self.outcomes(),
            reward
        );
        reward
    }
}
