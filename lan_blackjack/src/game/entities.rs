use rand::{rng, seq::SliceRandom};
use std::fmt;
use thiserror::Error;

/// Number of cards in a fresh deck.
pub const DECK_SIZE: usize = 52;

/// Highest hand total that does not bust.
pub const BUST_LIMIT: u32 = 21;

/// Errors from card construction and dealing.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum GameError {
    /// Rank outside 1 (ace) through 13 (king).
    #[error("rank {0} is outside 1-13")]
    InvalidRank(u8),

    /// Shape code outside the four suits.
    #[error("shape code {0} is outside 0-3")]
    InvalidShape(u8),

    /// Drew from a deck with no cards left.
    #[error("deck is empty")]
    EmptyDeck,
}

/// Card suit, in wire-code order.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Shape {
    Heart,
    Diamond,
    Club,
    Spade,
}

impl Shape {
    /// All four shapes in wire-code order.
    pub const ALL: [Shape; 4] = [Shape::Heart, Shape::Diamond, Shape::Club, Shape::Spade];

    /// The single-byte wire code for this shape.
    pub fn code(self) -> u8 {
        match self {
            Self::Heart => 0,
            Self::Diamond => 1,
            Self::Club => 2,
            Self::Spade => 3,
        }
    }

    /// Decode a wire code back into a shape.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidShape`] for codes outside 0-3.
    pub fn from_code(code: u8) -> Result<Self, GameError> {
        match code {
            0 => Ok(Self::Heart),
            1 => Ok(Self::Diamond),
            2 => Ok(Self::Club),
            3 => Ok(Self::Spade),
            other => Err(GameError::InvalidShape(other)),
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Heart => "Heart",
            Self::Diamond => "Diamond",
            Self::Club => "Club",
            Self::Spade => "Spade",
        };
        write!(f, "{repr}")
    }
}

/// A playing card: a rank from 1 (ace) to 13 (king) and a shape.
///
/// Both fields are validated at construction, so a `Card` in hand is
/// always a real card.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Card {
    rank: u8,
    shape: Shape,
}

impl Card {
    /// Build a card, rejecting ranks outside 1-13.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidRank`] if `rank` is not a real rank.
    pub fn new(rank: u8, shape: Shape) -> Result<Self, GameError> {
        if !(1..=13).contains(&rank) {
            return Err(GameError::InvalidRank(rank));
        }
        Ok(Self { rank, shape })
    }

    pub fn rank(&self) -> u8 {
        self.rank
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Blackjack value of this card. Aces always count 11; there is no
    /// soft-hand re-count. Face cards and tens count 10.
    pub fn value(&self) -> u8 {
        match self.rank {
            1 => 11,
            rank if rank >= 10 => 10,
            rank => rank,
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let rank = match self.rank {
            1 => "A",
            11 => "J",
            12 => "Q",
            13 => "K",
            rank => &rank.to_string(),
        };
        write!(f, "{rank} of {}", self.shape)
    }
}

/// A shuffled 52-card deck, drawn from the top until empty.
#[derive(Debug)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Build the 52 distinct cards and shuffle them.
    pub fn new() -> Self {
        let mut cards = Vec::with_capacity(DECK_SIZE);
        for shape in Shape::ALL {
            for rank in 1..=13 {
                cards.push(Card { rank, shape });
            }
        }
        cards.shuffle(&mut rng());
        Self { cards }
    }

    /// Remove and return the top card.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::EmptyDeck`] once all 52 cards are gone.
    pub fn draw(&mut self) -> Result<Card, GameError> {
        self.cards.pop().ok_or(GameError::EmptyDeck)
    }

    pub fn remaining(&self) -> usize {
        self.cards.len()
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}

/// Cards held by one side of the table. Append-only during a round.
#[derive(Debug, Default)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    pub fn new() -> Self {
        Self { cards: Vec::new() }
    }

    pub fn add_card(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Sum of card values, aces always counting 11.
    pub fn total(&self) -> u32 {
        self.cards.iter().map(|card| u32::from(card.value())).sum()
    }

    pub fn is_bust(&self) -> bool {
        self.total() > BUST_LIMIT
    }
}
