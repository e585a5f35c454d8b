//! Common test utilities

mod sse;

use crate::card::{Card, Suit};
use crate::snapshot::{PrevAction, SeatState, StateSnapshot};

pub use sse::SseClient;

/// Helpers shared across test modules.
pub mod serde {
    use std::fmt::Debug;

    /// Assert that a value survives a serde_json round-trip using structural equality.
    pub fn assert_round_trip_eq<T>(value: &T)
    where
        T: ::serde::Serialize + ::serde::de::DeserializeOwned + PartialEq + Debug,
    {
        let json = serde_json::to_string(value)
            .expect("serialization should succeed during round-trip testing");
        let restored: T = serde_json::from_str(&json)
            .expect("deserialization should succeed during round-trip testing");
        assert_eq!(restored, *value, "serde_json round-trip altered the value");
    }
}

fn seat(hole: Card, street_commit: u64) -> SeatState {
    SeatState {
        hole_cards: vec![hole],
        stack: 100,
        active: true,
        all_in: false,
        street_commit,
        payout: 0,
    }
}

/// Heads-up hand right after the blinds: seat 0 posted 10, seat 1 posted 20,
/// seat 0 to act.
pub fn two_seat_snapshot() -> StateSnapshot {
    StateSnapshot {
        seats: vec![
            seat(Card::try_new(14, Suit::Hearts).unwrap(), 10),
            seat(Card::try_new(14, Suit::Clubs).unwrap(), 20),
        ],
        community_cards: Vec::new(),
        pot: 10,
        button: 0,
        action: Some(0),
        done: false,
        prev_action: Some(PrevAction {
            seat: 1,
            amount: 10,
            fold: false,
        }),
    }
}
