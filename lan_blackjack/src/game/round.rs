//! Single-round blackjack flow: deal, hit, stand, outcome.

use std::fmt;

use super::entities::{Card, Deck, GameError, Hand};

/// The dealer draws until their total reaches at least this.
pub const DEALER_STAND_TOTAL: u32 = 17;

/// Outcome of a finished round, from the player's perspective.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Outcome {
    Win,
    Loss,
    Tie,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Win => "win",
            Self::Loss => "loss",
            Self::Tie => "tie",
        };
        write!(f, "{repr}")
    }
}

/// The cards everyone sees after the opening deal: both player cards and
/// the dealer's face-up card. The dealer's second card stays hidden until
/// the player stands.
#[derive(Clone, Copy, Debug)]
pub struct OpeningDeal {
    pub player: [Card; 2],
    pub dealer_upcard: Card,
}

/// One round of blackjack: a fresh shuffled deck, a player hand, and a
/// dealer hand. Rounds are independent; a session makes a new `Game` for
/// each one.
#[derive(Debug)]
pub struct Game {
    deck: Deck,
    player_hand: Hand,
    dealer_hand: Hand,
    finished: bool,
}

impl Game {
    pub fn new() -> Self {
        Self {
            deck: Deck::new(),
            player_hand: Hand::new(),
            dealer_hand: Hand::new(),
            finished: false,
        }
    }

    /// Deal the opening hands, alternating player and dealer.
    ///
    /// The dealer's first card is the face-up card.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::EmptyDeck`] if the deck runs out, which cannot
    /// happen on a fresh deck.
    pub fn start(&mut self) -> Result<OpeningDeal, GameError> {
        let player_first = self.deck.draw()?;
        self.player_hand.add_card(player_first);
        let dealer_upcard = self.deck.draw()?;
        self.dealer_hand.add_card(dealer_upcard);
        let player_second = self.deck.draw()?;
        self.player_hand.add_card(player_second);
        let hole_card = self.deck.draw()?;
        self.dealer_hand.add_card(hole_card);
        Ok(OpeningDeal {
            player: [player_first, player_second],
            dealer_upcard,
        })
    }

    /// Draw one card for the player. Busting finishes the round.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::EmptyDeck`] if the deck is exhausted.
    pub fn player_hit(&mut self) -> Result<Card, GameError> {
        let card = self.deck.draw()?;
        self.player_hand.add_card(card);
        if self.player_hand.is_bust() {
            self.finished = true;
        }
        Ok(card)
    }

    /// The player stays put; the dealer draws to [`DEALER_STAND_TOTAL`]
    /// and the round finishes.
    ///
    /// Returns every dealer card after the face-up one: the hole card plus
    /// whatever the dealer drew. The dealer always holds at least two
    /// cards, so the reveal is never empty.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::EmptyDeck`] if the deck is exhausted.
    pub fn player_stand(&mut self) -> Result<Vec<Card>, GameError> {
        while self.dealer_hand.total() < DEALER_STAND_TOTAL {
            let card = self.deck.draw()?;
            self.dealer_hand.add_card(card);
        }
        self.finished = true;
        Ok(self.dealer_hand.cards().iter().skip(1).copied().collect())
    }

    /// Outcome by the house rules: a busted player loses outright, then a
    /// busted dealer loses, then higher total wins and equal totals tie.
    pub fn result(&self) -> Outcome {
        if self.player_hand.is_bust() {
            return Outcome::Loss;
        }
        if self.dealer_hand.is_bust() {
            return Outcome::Win;
        }
        let player = self.player_hand.total();
        let dealer = self.dealer_hand.total();
        if player > dealer {
            Outcome::Win
        } else if player < dealer {
            Outcome::Loss
        } else {
            Outcome::Tie
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn player_hand(&self) -> &Hand {
        &self.player_hand
    }

    pub fn dealer_hand(&self) -> &Hand {
        &self.dealer_hand
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::entities::{DECK_SIZE, Shape};

    fn hand(ranks: &[u8]) -> Hand {
        let mut hand = Hand::new();
        for (i, &rank) in ranks.iter().enumerate() {
            let shape = Shape::ALL[i % Shape::ALL.len()];
            hand.add_card(Card::new(rank, shape).unwrap());
        }
        hand
    }

    fn game_with_hands(player: Hand, dealer: Hand) -> Game {
        Game {
            deck: Deck::new(),
            player_hand: player,
            dealer_hand: dealer,
            finished: true,
        }
    }

    #[test]
    fn test_start_deals_two_cards_each() {
        let mut game = Game::new();
        let deal = game.start().unwrap();
        assert_eq!(game.player_hand().cards().len(), 2);
        assert_eq!(game.dealer_hand().cards().len(), 2);
        assert_eq!(deal.player[0], game.player_hand().cards()[0]);
        assert_eq!(deal.player[1], game.player_hand().cards()[1]);
        assert_eq!(deal.dealer_upcard, game.dealer_hand().cards()[0]);
    }

    #[test]
    fn test_start_consumes_four_cards() {
        let mut game = Game::new();
        game.start().unwrap();
        assert_eq!(game.deck.remaining(), DECK_SIZE - 4);
    }

    #[test]
    fn test_hit_adds_one_card() {
        let mut game = Game::new();
        game.start().unwrap();
        let card = game.player_hit().unwrap();
        assert_eq!(game.player_hand().cards().len(), 3);
        assert_eq!(*game.player_hand().cards().last().unwrap(), card);
    }

    #[test]
    fn test_hit_finishes_round_on_bust() {
        let mut game = Game::new();
        game.start().unwrap();
        while !game.is_finished() {
            game.player_hit().unwrap();
        }
        assert!(game.player_hand().is_bust());
        assert_eq!(game.result(), Outcome::Loss);
    }

    #[test]
    fn test_stand_draws_dealer_to_seventeen() {
        let mut game = Game::new();
        game.start().unwrap();
        let revealed = game.player_stand().unwrap();
        assert!(game.dealer_hand().total() >= DEALER_STAND_TOTAL);
        assert!(game.is_finished());
        // Face-up card stays hidden from the reveal; the hole card leads it.
        assert_eq!(revealed.len(), game.dealer_hand().cards().len() - 1);
        assert!(!revealed.is_empty());
    }

    #[test]
    fn test_result_higher_total_wins() {
        let game = game_with_hands(hand(&[13, 10]), hand(&[13, 9]));
        assert_eq!(game.result(), Outcome::Win);
    }

    #[test]
    fn test_result_lower_total_loses() {
        let game = game_with_hands(hand(&[13, 8]), hand(&[13, 9]));
        assert_eq!(game.result(), Outcome::Loss);
    }

    #[test]
    fn test_result_equal_totals_tie() {
        let game = game_with_hands(hand(&[13, 10]), hand(&[10, 10]));
        assert_eq!(game.result(), Outcome::Tie);
    }

    #[test]
    fn test_result_player_bust_loses_even_if_dealer_busts() {
        let game = game_with_hands(hand(&[13, 10, 5]), hand(&[13, 10, 5]));
        assert_eq!(game.result(), Outcome::Loss);
    }

    #[test]
    fn test_result_dealer_bust_wins_for_live_player() {
        let game = game_with_hands(hand(&[13, 9]), hand(&[13, 10, 5]));
        assert_eq!(game.result(), Outcome::Win);
    }

    #[test]
    fn test_ace_never_softens() {
        // A pair of aces is 22 and bust; there is no 12-count rescue.
        let game = game_with_hands(hand(&[1, 1]), hand(&[10, 9]));
        assert!(game.player_hand().is_bust());
        assert_eq!(game.result(), Outcome::Loss);
    }
}
