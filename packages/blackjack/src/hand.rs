use crate::Card;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandOutcome {
    Win,
    Loss,
    Push,
    Blackjack,
}

/// Sum of the cards with every ace counted as 1
pub fn hard_total(cards: &[Card]) -> u8 {
    cards.iter().map(|c| c.value()).sum()
}

/// Calculate the value of a blackjack hand
pub fn calculate_hand_value(cards: &[Card]) -> u8 {
    let total = hard_total(cards);
    // At most one ace can count as 11 without busting
    if cards.iter().any(|c| c.is_ace()) && total + 10 <= 21 {
        total + 10
    } else {
        total
    }
}

/// Check if a hand is soft (has an ace counted as 11)
pub fn is_soft_hand(cards: &[Card]) -> bool {
    calculate_hand_value(cards) != hard_total(cards)
}

/// Check if a hand is busted
pub fn is_busted(cards: &[Card]) -> bool {
    calculate_hand_value(cards) > 21
}

/// Check if a hand is blackjack (21 with 2 cards)
pub fn is_blackjack(cards: &[Card]) -> bool {
    cards.len() == 2 && calculate_hand_value(cards) == 21
}

/// Check if two cards can be split (same rank)
pub fn can_split_cards(card1: &Card, card2: &Card) -> bool {
    card1.rank == card2.rank
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hand {
    pub cards: Vec<Card>,
    pub bet: f64,
    pub doubled: bool,
    pub stood: bool,
    /// Hand came out of a split; a two-card 21 here is not a natural.
    pub split: bool,
    /// Set once the hand has been paid out.
    pub outcome: Option<HandOutcome>,
}

impl Hand {
    pub fn new(bet: f64) -> Self {
        Self {
            cards: Vec::new(),
            bet,
            doubled: false,
            stood: false,
            split: false,
            outcome: None,
        }
    }

    pub fn with_cards(cards: Vec<Card>, bet: f64) -> Self {
        Self {
            cards,
            ..Self::new(bet)
        }
    }

    pub fn value(&self) -> u8 {
        calculate_hand_value(&self.cards)
    }

    pub fn is_soft(&self) -> bool {
        is_soft_hand(&self.cards)
    }

    pub fn is_busted(&self) -> bool {
        is_busted(&self.cards)
    }

    pub fn is_blackjack(&self) -> bool {
        !self.split && is_blackjack(&self.cards)
    }

    pub fn add_card(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn can_split(&self) -> bool {
        self.cards.len() == 2 && can_split_cards(&self.cards[0], &self.cards[1])
    }

    pub fn can_double(&self) -> bool {
        self.cards.len() == 2 && !self.doubled && !self.stood
    }

    pub fn is_settled(&self) -> bool {
        self.outcome.is_some()
    }
}

impl Default for Hand {
    fn default() -> Self {
        Self::new(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Rank, Suit};

    fn cards(ranks: &[Rank]) -> Vec<Card> {
        ranks.iter().map(|&r| Card::new(r, Suit::Hearts)).collect()
    }

    #[test]
    fn test_calculate_hand_value_simple() {
        assert_eq!(calculate_hand_value(&cards(&[Rank::Two, Rank::Three])), 5);
    }

    #[test]
    fn test_calculate_hand_value_with_face_cards() {
        assert_eq!(calculate_hand_value(&cards(&[Rank::King, Rank::Queen])), 20);
    }

    #[test]
    fn test_calculate_hand_value_soft_ace() {
        let hand = cards(&[Rank::Ace, Rank::Six]);
        assert_eq!(calculate_hand_value(&hand), 17);
        assert!(is_soft_hand(&hand));
    }

    #[test]
    fn test_calculate_hand_value_hard_ace() {
        let hand = cards(&[Rank::Ace, Rank::Six, Rank::Nine]);
        assert_eq!(calculate_hand_value(&hand), 16);
        assert!(!is_soft_hand(&hand));
    }

    #[test]
    fn test_calculate_hand_value_multiple_aces() {
        let hand = cards(&[Rank::Ace, Rank::Ace, Rank::Nine]);
        assert_eq!(calculate_hand_value(&hand), 21);
        assert!(is_soft_hand(&hand));

        let hand = cards(&[Rank::Ace, Rank::Ace, Rank::Ace, Rank::Ace]);
        assert_eq!(calculate_hand_value(&hand), 14);
    }

    #[test]
    fn test_ace_forced_low_then_bust() {
        let hand = cards(&[Rank::Ace, Rank::Nine, Rank::Five, Rank::King]);
        assert_eq!(calculate_hand_value(&hand), 25);
        assert!(is_busted(&hand));
        assert!(!is_soft_hand(&hand));
    }

    #[test]
    fn test_is_busted() {
        assert!(is_busted(&cards(&[Rank::King, Rank::Queen, Rank::Five])));
        assert!(!is_busted(&cards(&[Rank::King, Rank::Queen])));
    }

    #[test]
    fn test_is_blackjack() {
        assert!(is_blackjack(&cards(&[Rank::Ace, Rank::King])));
        assert!(is_blackjack(&cards(&[Rank::Ten, Rank::Ace])));
        assert!(!is_blackjack(&cards(&[Rank::Seven, Rank::Seven, Rank::Seven])));
        assert!(!is_blackjack(&cards(&[Rank::King, Rank::Queen])));
    }

    #[test]
    fn test_can_split_cards() {
        let eights = cards(&[Rank::Eight, Rank::Eight]);
        assert!(can_split_cards(&eights[0], &eights[1]));
        let faces = cards(&[Rank::King, Rank::Queen]);
        assert!(!can_split_cards(&faces[0], &faces[1]));
    }

    #[test]
    fn test_split_hand_is_not_natural() {
        let mut hand = Hand::with_cards(cards(&[Rank::Ace, Rank::King]), 1.0);
        assert!(hand.is_blackjack());
        hand.split = true;
        assert!(!hand.is_blackjack());
        assert_eq!(hand.value(), 21);
    }

    #[test]
    fn test_hand_struct_flags() {
        let mut hand = Hand::new(1.0);
        hand.add_card(Card::new(Rank::Eight, Suit::Hearts));
        hand.add_card(Card::new(Rank::Eight, Suit::Spades));
        assert!(hand.can_split());
        assert!(hand.can_double());
        hand.add_card(Card::new(Rank::Two, Suit::Clubs));
        assert!(!hand.can_split());
        assert!(!hand.can_double());
        hand.add_card(Card::new(Rank::Nine, Suit::Clubs));
        assert!(hand.is_busted());
    }
}
