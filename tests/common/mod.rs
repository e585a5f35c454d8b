#![allow(dead_code)]

use std::time::Duration;

use table_viewer::card::{Card, Suit};
use table_viewer::snapshot::{PrevAction, SeatState, StateSnapshot};
use table_viewer::ViewerConfig;

#[path = "../../src/test_utils/sse.rs"]
mod sse;

pub use sse::SseClient;

pub fn viewer_config(num_players: usize, num_hole_cards: usize) -> ViewerConfig {
    ViewerConfig::new(num_players, num_hole_cards, 5)
        .with_server_binary(env!("CARGO_BIN_EXE_table_viewer_server"))
}

/// Heads-up right after the blinds with seat 0 to act.
pub fn heads_up_snapshot() -> StateSnapshot {
    let seat = |card: Card, street_commit| SeatState {
        hole_cards: vec![card],
        stack: 100,
        active: true,
        all_in: false,
        street_commit,
        payout: 0,
    };
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

/// Poll until nothing accepts connections on `port` any more.
pub async fn wait_until_refused(port: u16) -> bool {
    for _ in 0..200 {
        if tokio::net::TcpStream::connect(("127.0.0.1", port)).await.is_err() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
    false
}
