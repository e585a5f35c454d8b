use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::card::{Card, CardParseError};

pub type Chips = u64;
pub type SeatId = usize;

/// Marker used on the wire when no seat is to act.
pub const NO_ACTION: i64 = -1;

/// One seat at one instant of the hand.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeatState {
    pub hole_cards: Vec<Card>,
    pub stack: Chips,
    pub active: bool,
    pub all_in: bool,
    pub street_commit: Chips, // chips put in on the current street
    pub payout: i64,          // negative for seats that lost chips
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrevAction {
    pub seat: SeatId,
    pub amount: Chips,
    pub fold: bool,
}

/// Complete table state handed to a viewer by the game engine.
///
/// Snapshots are values: a new one replaces the previous one wholesale.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StateSnapshot {
    pub seats: Vec<SeatState>,
    pub community_cards: Vec<Card>,
    pub pot: Chips,
    pub button: SeatId,
    pub action: Option<SeatId>,
    pub done: bool,
    pub prev_action: Option<PrevAction>,
}

impl StateSnapshot {
    pub fn num_players(&self) -> usize {
        self.seats.len()
    }
}

/// Wire form of a [`StateSnapshot`]: per-seat fields as parallel arrays and
/// cards as canonical strings. This is the `config` payload viewers receive.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfig {
    pub action: i64,
    pub active: Vec<bool>,
    pub all_in: Vec<bool>,
    pub community_cards: Vec<String>,
    pub button: SeatId,
    pub done: bool,
    pub hole_cards: Vec<Vec<String>>,
    pub pot: Chips,
    pub payouts: Vec<i64>,
    pub prev_action: Option<(SeatId, Chips, bool)>,
    pub street_commits: Vec<Chips>,
    pub stacks: Vec<Chips>,
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("invalid card in snapshot: {0}")]
    Card(#[from] CardParseError),

    #[error("field {field} has {actual} entries but the table has {expected} seats")]
    SeatCount {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{field} seat {seat} is outside a table of {seats} seats")]
    SeatOutOfRange {
        field: &'static str,
        seat: i64,
        seats: usize,
    },
}

fn card_strings(cards: &[Card]) -> Vec<String> {
    cards.iter().map(Card::to_string).collect()
}

fn parse_cards(cards: &[String]) -> Result<Vec<Card>, CardParseError> {
    cards.iter().map(|card| card.parse()).collect()
}

impl From<&StateSnapshot> for TableConfig {
    fn from(snapshot: &StateSnapshot) -> Self {
        let seats = &snapshot.seats;
        TableConfig {
            action: snapshot
                .action
                .map(|seat| seat as i64)
                .unwrap_or(NO_ACTION),
            active: seats.iter().map(|s| s.active).collect(),
            all_in: seats.iter().map(|s| s.all_in).collect(),
            community_cards: card_strings(&snapshot.community_cards),
            button: snapshot.button,
            done: snapshot.done,
            hole_cards: seats.iter().map(|s| card_strings(&s.hole_cards)).collect(),
            pot: snapshot.pot,
            payouts: seats.iter().map(|s| s.payout).collect(),
            prev_action: snapshot
                .prev_action
                .map(|prev| (prev.seat, prev.amount, prev.fold)),
            street_commits: seats.iter().map(|s| s.street_commit).collect(),
            stacks: seats.iter().map(|s| s.stack).collect(),
        }
    }
}

impl TryFrom<TableConfig> for StateSnapshot {
    type Error = SnapshotError;

    fn try_from(config: TableConfig) -> Result<Self, Self::Error> {
        let seats = config.hole_cards.len();
        let check = |field: &'static str, actual: usize| {
            if actual == seats {
                Ok(())
            } else {
                Err(SnapshotError::SeatCount {
                    field,
                    expected: seats,
                    actual,
                })
            }
        };
        check("active", config.active.len())?;
        check("all_in", config.all_in.len())?;
        check("payouts", config.payouts.len())?;
        check("street_commits", config.street_commits.len())?;
        check("stacks", config.stacks.len())?;

        let action = match config.action {
            NO_ACTION => None,
            seat if seat >= 0 && (seat as usize) < seats => Some(seat as usize),
            seat => {
                return Err(SnapshotError::SeatOutOfRange {
                    field: "action",
                    seat,
                    seats,
                })
            }
        };

        let mut seat_states = Vec::with_capacity(seats);
        for idx in 0..seats {
            seat_states.push(SeatState {
                hole_cards: parse_cards(&config.hole_cards[idx])?,
                stack: config.stacks[idx],
                active: config.active[idx],
                all_in: config.all_in[idx],
                street_commit: config.street_commits[idx],
                payout: config.payouts[idx],
            });
        }

        Ok(StateSnapshot {
            seats: seat_states,
            community_cards: parse_cards(&config.community_cards)?,
            pot: config.pot,
            button: config.button,
            action,
            done: config.done,
            prev_action: config.prev_action.map(|(seat, amount, fold)| PrevAction {
                seat,
                amount,
                fold,
            }),
        })
    }
}
