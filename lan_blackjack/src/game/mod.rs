//! Blackjack game engine - cards, hands, and round resolution.
//!
//! This module provides the playing-card primitives and the single-round
//! game state the session layer drives:
//! - Validated cards, shuffled 52-card decks, append-only hands
//! - Ace-high scoring (an ace always counts 11)
//! - A round driver covering the opening deal, player hits, and the
//!   dealer's draw-to-seventeen stand rule

pub mod entities;
pub mod round;

pub use entities::{BUST_LIMIT, Card, DECK_SIZE, Deck, GameError, Hand, Shape};
pub use round::{DEALER_STAND_TOTAL, Game, OpeningDeal, Outcome};
