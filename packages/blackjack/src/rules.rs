use crate::GameError;
use serde::{Deserialize, Serialize};

/// Blackjack payout multiplier as a ratio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutRatio {
    pub numerator: u16,
    pub denominator: u16,
}

impl PayoutRatio {
    pub const THREE_TO_TWO: Self = Self {
        numerator: 3,
        denominator: 2,
    };
    pub const SIX_TO_FIVE: Self = Self {
        numerator: 6,
        denominator: 5,
    };

    pub fn new(numerator: u16, denominator: u16) -> Result<Self, GameError> {
        if denominator == 0 {
            return Err(GameError::InvalidRules(
                "payout denominator cannot be zero".to_string(),
            ));
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }

    pub fn calculate_payout(&self, bet: f64) -> f64 {
        bet * self.numerator as f64 / self.denominator as f64
    }
}

/// Table rules for a simulated round
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameRules {
    /// Dealer hits on soft 17
    pub dealer_hits_soft_17: bool,

    /// Blackjack payout multiplier
    pub blackjack_payout: PayoutRatio,

    /// Number of decks in the shoe
    pub num_decks: u8,

    /// Shoe is rebuilt when fewer cards than this remain before a draw
    pub reshuffle_threshold: usize,

    /// Maximum number of splits per round
    pub max_splits: u8,

    /// Stake placed on the opening hand
    pub base_bet: f64,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            dealer_hits_soft_17: true,
            blackjack_payout: PayoutRatio::THREE_TO_TWO,
            num_decks: 1,
            reshuffle_threshold: 15,
            max_splits: 3,
            base_bet: 1.0,
        }
    }
}

impl GameRules {
    pub fn validate(&self) -> Result<(), GameError> {
        if self.num_decks == 0 {
            return Err(GameError::InvalidRules(
                "shoe needs at least one deck".to_string(),
            ));
        }
        if self.blackjack_payout.denominator == 0 {
            return Err(GameError::InvalidRules(
                "payout denominator cannot be zero".to_string(),
            ));
        }
        if self.reshuffle_threshold > self.num_decks as usize * 52 {
            return Err(GameError::InvalidRules(format!(
                "reshuffle threshold {} exceeds shoe size {}",
                self.reshuffle_threshold,
                self.num_decks as usize * 52
            )));
        }
        if !(self.base_bet.is_finite() && self.base_bet > 0.0) {
            return Err(GameError::InvalidRules(format!(
                "base bet must be positive, got {}",
                self.base_bet
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payout_ratio_three_to_two() {
        let ratio = PayoutRatio::THREE_TO_TWO;
        assert_eq!(ratio.calculate_payout(1.0), 1.5);
        assert_eq!(ratio.calculate_payout(100.0), 150.0);
    }

    #[test]
    fn test_payout_ratio_six_to_five() {
        assert_eq!(PayoutRatio::SIX_TO_FIVE.calculate_payout(100.0), 120.0);
    }

    #[test]
    fn test_payout_ratio_zero_denominator() {
        assert!(PayoutRatio::new(3, 0).is_err());
        assert_eq!(PayoutRatio::new(2, 1).unwrap().calculate_payout(10.0), 20.0);
    }

    #[test]
    fn test_default_rules() {
        let rules = GameRules::default();
        assert!(rules.dealer_hits_soft_17);
        assert_eq!(rules.blackjack_payout, PayoutRatio::THREE_TO_TWO);
        assert_eq!(rules.num_decks, 1);
        assert_eq!(rules.reshuffle_threshold, 15);
        assert!(rules.validate().is_ok());
    }

    #[test]
    fn test_invalid_rules() {
        let no_decks = GameRules {
            num_decks: 0,
            ..GameRules::default()
        };
        assert!(no_decks.validate().is_err());

        let threshold = GameRules {
            reshuffle_threshold: 60,
            ..GameRules::default()
        };
        assert!(threshold.validate().is_err());

        let bet = GameRules {
            base_bet: 0.0,
            ..GameRules::default()
        };
        assert!(bet.validate().is_err());
    }
}
