//! card: rank/suit values and their canonical two-character form

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

pub type Rank = u8; // 2..14 (A=14)

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Suit {
    Clubs = 0,    // ♣
    Diamonds = 1, // ♦
    Hearts = 2,   // ♥
    Spades = 3,   // ♠
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades];

    pub fn symbol(self) -> char {
        match self {
            Suit::Clubs => '♣',
            Suit::Diamonds => '♦',
            Suit::Hearts => '♥',
            Suit::Spades => '♠',
        }
    }

    /// Accepts both the symbol and the ASCII letter (any case).
    pub fn from_char(value: char) -> Option<Self> {
        match value {
            '♣' | 'c' | 'C' => Some(Suit::Clubs),
            '♦' | 'd' | 'D' => Some(Suit::Diamonds),
            '♥' | 'h' | 'H' => Some(Suit::Hearts),
            '♠' | 's' | 'S' => Some(Suit::Spades),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CardParseError {
    #[error("card string {0:?} must be exactly two characters")]
    Length(String),
    #[error("unknown rank {rank:?} in card {card:?}")]
    Rank { card: String, rank: char },
    #[error("unknown suit {suit:?} in card {card:?}")]
    Suit { card: String, suit: char },
    #[error("rank {0} is outside 2..=14")]
    RankOutOfRange(Rank),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Card {
    rank: Rank, // 2..14
    suit: Suit,
}

impl Card {
    pub fn try_new(rank: Rank, suit: Suit) -> Result<Self, CardParseError> {
        if !(2..=14).contains(&rank) {
            return Err(CardParseError::RankOutOfRange(rank));
        }
        Ok(Self { rank, suit })
    }

    pub fn rank(&self) -> Rank {
        self.rank
    }

    pub fn suit(&self) -> Suit {
        self.suit
    }

    pub fn rank_char(&self) -> char {
        match self.rank {
            2..=9 => (b'0' + self.rank) as char,
            10 => 'T',
            11 => 'J',
            12 => 'Q',
            13 => 'K',
            _ => 'A',
        }
    }
}

fn rank_from_char(value: char) -> Option<Rank> {
    match value.to_ascii_uppercase() {
        c @ '2'..='9' => Some(c as u8 - b'0'),
        'T' => Some(10),
        'J' => Some(11),
        'Q' => Some(12),
        'K' => Some(13),
        'A' => Some(14),
        _ => None,
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank_char(), self.suit.symbol())
    }
}

impl FromStr for Card {
    type Err = CardParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        let (Some(rank), Some(suit), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(CardParseError::Length(s.to_owned()));
        };
        let rank = rank_from_char(rank).ok_or_else(|| CardParseError::Rank {
            card: s.to_owned(),
            rank,
        })?;
        let suit = Suit::from_char(suit).ok_or_else(|| CardParseError::Suit {
            card: s.to_owned(),
            suit,
        })?;
        Ok(Card { rank, suit })
    }
}

impl Serialize for Card {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Card {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
