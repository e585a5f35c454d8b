use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use table_viewer::card::{Card, Suit};
use table_viewer::snapshot::{Chips, PrevAction, SeatId, SeatState, StateSnapshot};
use table_viewer::{GraphicViewer, PokerViewer, ViewerConfig};

const LOG_TARGET: &str = "bin::table_viewer_demo";
const NUM_HOLE_CARDS: usize = 2;
const NUM_COMMUNITY_CARDS: usize = 5;
const SMALL_BLIND: Chips = 1;
const BIG_BLIND: Chips = 2;

#[derive(Debug, Parser)]
#[command(name = "table_viewer_demo")]
#[command(about = "Play random no-limit hands in front of the live table view", long_about = None)]
struct Args {
    /// Number of seats at the table
    #[arg(long, default_value_t = 6)]
    num_players: usize,

    /// Hands to play before closing the viewer
    #[arg(long, default_value_t = 3)]
    hands: usize,

    /// Starting stack for every seat
    #[arg(long, default_value_t = 200)]
    stack: Chips,

    /// Pause between frames in milliseconds
    #[arg(long, default_value_t = 1000)]
    pause_ms: u64,

    /// Fixed HTTP port instead of a free one
    #[arg(long, env = "TABLE_VIEWER_PORT")]
    port: Option<u16>,

    /// Seed for reproducible hands
    #[arg(long)]
    seed: Option<u64>,

    /// Toggle structured (JSON) logs
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.json)?;

    let mut config = ViewerConfig::new(args.num_players, NUM_HOLE_CARDS, NUM_COMMUNITY_CARDS);
    if let Some(port) = args.port {
        config = config.with_port(port);
    }
    let mut viewer = GraphicViewer::spawn(config)
        .await
        .context("failed to start graphic viewer")?;
    info!(target = LOG_TARGET, url = %viewer.url(), "open the table in a browser");

    let mut rng = args
        .seed
        .map(StdRng::seed_from_u64)
        .unwrap_or_else(StdRng::from_entropy);
    let pause = Duration::from_millis(args.pause_ms);
    let mut stacks = vec![args.stack; args.num_players];

    for hand in 0..args.hands {
        let button = hand % args.num_players;
        let result = play_hand(&mut viewer, &mut rng, &stacks, button, pause).await?;
        for (stack, payout) in stacks.iter_mut().zip(&result.payouts) {
            *stack = stack.saturating_add_signed(*payout);
        }
        info!(target = LOG_TARGET, hand, winner = result.winner, pot = result.pot, "hand finished");
        if stacks.iter().filter(|stack| **stack > 0).count() < 2 {
            break;
        }
    }

    viewer.close().await.context("failed to close graphic viewer")
}

struct HandResult {
    winner: SeatId,
    pot: Chips,
    payouts: Vec<i64>,
}

/// Random policy: fold 15%, call 80%, raise 5%. The winner is drawn at
/// random; hand strength is not evaluated.
async fn play_hand<V: PokerViewer>(
    viewer: &mut V,
    rng: &mut StdRng,
    stacks: &[Chips],
    button: SeatId,
    pause: Duration,
) -> Result<HandResult> {
    let num_players = stacks.len();
    let mut deck = Suit::ALL
        .iter()
        .flat_map(|suit| (2..=14).map(move |rank| Card::try_new(rank, *suit)))
        .collect::<Result<Vec<Card>, _>>()?;
    deck.shuffle(rng);

    let mut table = StateSnapshot {
        seats: stacks
            .iter()
            .map(|stack| SeatState {
                hole_cards: deck.split_off(deck.len() - NUM_HOLE_CARDS),
                stack: *stack,
                active: *stack > 0,
                all_in: false,
                street_commit: 0,
                payout: 0,
            })
            .collect(),
        community_cards: Vec::new(),
        pot: 0,
        button,
        action: None,
        done: false,
        prev_action: None,
    };
    let mut contributed = vec![0 as Chips; num_players];

    post(&mut table, &mut contributed, (button + 1) % num_players, SMALL_BLIND);
    post(&mut table, &mut contributed, (button + 2) % num_players, BIG_BLIND);
    viewer.render_with_pause(&table, pause).await?;

    for (street, dealt) in [(0, 0), (1, 3), (2, 1), (3, 1)] {
        if street > 0 {
            collect(&mut table);
            table
                .community_cards
                .extend(deck.split_off(deck.len() - dealt));
            viewer.render_with_pause(&table, pause).await?;
        }
        let first = if street == 0 { button + 3 } else { button + 1 };
        betting_round(viewer, rng, &mut table, &mut contributed, first, pause).await?;
        if active_seats(&table).len() < 2 {
            break;
        }
    }
    collect(&mut table);

    let contenders = active_seats(&table);
    let winner = *contenders
        .choose(rng)
        .ok_or_else(|| anyhow!("every seat folded"))?;
    let pot = table.pot;
    let payouts: Vec<i64> = contributed
        .iter()
        .enumerate()
        .map(|(seat, paid)| {
            let won = if seat == winner { pot } else { 0 };
            won as i64 - *paid as i64
        })
        .collect();
    for (seat, payout) in table.seats.iter_mut().zip(&payouts) {
        seat.payout = *payout;
    }
    table.seats[winner].stack += pot;
    table.pot = 0;
    table.action = None;
    table.done = true;
    viewer.render_with_pause(&table, pause).await?;

    Ok(HandResult {
        winner,
        pot,
        payouts,
    })
}

async fn betting_round<V: PokerViewer>(
    viewer: &mut V,
    rng: &mut StdRng,
    table: &mut StateSnapshot,
    contributed: &mut [Chips],
    first: SeatId,
    pause: Duration,
) -> Result<()> {
    let num_players = table.num_players();
    let mut seat = first % num_players;
    // every seat acts at least once; a raise reopens the action
    let mut to_act = num_players;
    while to_act > 0 && active_seats(table).len() > 1 {
        to_act -= 1;
        let current = &table.seats[seat];
        if !current.active || current.all_in {
            seat = (seat + 1) % num_players;
            continue;
        }

        table.action = Some(seat);
        viewer.render_with_pause(table, pause).await?;

        let highest = table.seats.iter().map(|s| s.street_commit).max().unwrap_or(0);
        let call = highest - table.seats[seat].street_commit;
        let roll: f64 = rng.gen();
        let (amount, fold) = if roll < 0.15 && call > 0 {
            (0, true)
        } else if roll < 0.95 {
            (call, false)
        } else {
            (call + highest.max(BIG_BLIND), false)
        };

        if fold {
            table.seats[seat].active = false;
        } else {
            let paid = post(table, contributed, seat, amount);
            if paid > call {
                to_act = num_players - 1;
            }
        }
        table.prev_action = Some(PrevAction { seat, amount, fold });
        seat = (seat + 1) % num_players;
    }
    table.action = None;
    Ok(())
}

/// Move up to `amount` from the seat's stack into its street commitment.
fn post(table: &mut StateSnapshot, contributed: &mut [Chips], seat: SeatId, amount: Chips) -> Chips {
    let state = &mut table.seats[seat];
    let paid = amount.min(state.stack);
    state.stack -= paid;
    state.street_commit += paid;
    state.all_in = state.stack == 0;
    contributed[seat] += paid;
    paid
}

fn collect(table: &mut StateSnapshot) {
    for seat in &mut table.seats {
        table.pot += seat.street_commit;
        seat.street_commit = 0;
    }
}

fn active_seats(table: &StateSnapshot) -> Vec<SeatId> {
    table
        .seats
        .iter()
        .enumerate()
        .filter(|(_, seat)| seat.active)
        .map(|(idx, _)| idx)
        .collect()
}

fn init_tracing(json: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt::fmt().with_env_filter(filter).with_target(false);

    if json {
        builder
            .json()
            .flatten_event(true)
            .try_init()
            .map_err(|err| anyhow!(err))
    } else {
        builder.compact().try_init().map_err(|err| anyhow!(err))
    }
}
