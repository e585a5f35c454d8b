//! Builds the base SVG scene of the table: one group per seat, one street
//! commitment marker per seat and the shared community area.
//!
//! Every element the browser updates gets a stable id derived from its role
//! and seat label (`card-3-1`, `chips-text-community`, `pot`, ...). The page
//! script addresses elements exclusively through these ids, so they must be
//! unique across the whole document.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::graphic::{AssetStore, GraphicError, Node, Selector};
use crate::layout::{SeatLayout, Stadium};

const LOG_TARGET: &str = "scene";

pub const MAX_PLAYERS: usize = 20;

/// Seat ring grows past the table rim, commitment ring sits on the felt.
const SEAT_RING_GROWTH: (f64, f64) = (100.0, 100.0);
const MARKER_RING_GROWTH: (f64, f64) = (-225.0, -185.0);

const SEAT_PADDING: f64 = 20.0;
const SEAT_BACKGROUND_INSET: f64 = 10.0;
const POT_INSET: f64 = 60.0;
const COMMUNITY_LIFT: f64 = 40.0;
const DECK_NUDGE: f64 = 10.0;

const CARD_BACK: &str = "url(#card-back)";
const CARD_BLANK: &str = "url(#card-blank)";

#[derive(Debug, Error)]
pub enum SceneError {
    #[error(transparent)]
    Graphic(#[from] GraphicError),

    #[error("invalid scene parameters: {0}")]
    InvalidParams(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneParams {
    pub num_players: usize,
    pub num_hole_cards: usize,
    pub num_community_cards: usize,
}

impl SceneParams {
    pub fn new(num_players: usize, num_hole_cards: usize, num_community_cards: usize) -> Self {
        Self {
            num_players,
            num_hole_cards,
            num_community_cards,
        }
    }

    pub fn validate(&self) -> Result<(), SceneError> {
        if !(2..=MAX_PLAYERS).contains(&self.num_players) {
            return Err(SceneError::InvalidParams(format!(
                "num_players must be between 2 and {MAX_PLAYERS}, got {}",
                self.num_players
            )));
        }
        if self.num_hole_cards == 0 {
            return Err(SceneError::InvalidParams(
                "num_hole_cards must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Label embedded in element ids.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SeatLabel {
    Seat(usize),
    Community,
}

impl SeatLabel {
    fn group_id(&self) -> String {
        match self {
            SeatLabel::Seat(idx) => format!("player-{idx}"),
            SeatLabel::Community => "community".to_owned(),
        }
    }
}

impl fmt::Display for SeatLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeatLabel::Seat(idx) => write!(f, "{idx}"),
            SeatLabel::Community => f.write_str("community"),
        }
    }
}

struct Templates {
    base: Node,
    table: Node,
    player: Node,
    card: Node,
    street_commit: Node,
    patterns: Node,
}

impl Templates {
    fn load(store: &AssetStore) -> Result<Self, GraphicError> {
        Ok(Self {
            base: store.load("base")?,
            table: store.load("table")?,
            player: store.load("player")?,
            card: store.load("card")?,
            street_commit: store.load("street_commit")?,
            patterns: store.load("patterns")?,
        })
    }
}

/// The assembled base document served to every viewer.
#[derive(Clone, Debug, PartialEq)]
pub struct TableScene {
    params: SceneParams,
    layout: SeatLayout,
    document: Node,
}

#[derive(Clone, Copy, Debug)]
pub struct SceneBuilder {
    params: SceneParams,
}

impl SceneBuilder {
    pub fn new(params: SceneParams) -> Self {
        Self { params }
    }

    pub fn build(&self, store: &AssetStore) -> Result<TableScene, SceneError> {
        let params = self.params;
        params.validate()?;
        let Templates {
            mut base,
            mut table,
            player,
            card,
            street_commit,
            patterns,
        } = Templates::load(store)?;

        let defs = base.find_one_mut(&Selector::tag("defs"))?;
        defs.extend(
            patterns
                .find_all(&Selector::tag("pattern"))?
                .into_iter()
                .cloned(),
        );

        table.center_on(&base);
        let rim = Stadium::new(table.x(), table.y(), table.width(), table.height());
        let seat_ring = rim.inflate(SEAT_RING_GROWTH.0, SEAT_RING_GROWTH.1);
        let marker_ring = rim.inflate(MARKER_RING_GROWTH.0, MARKER_RING_GROWTH.1);
        let rings = [
            ("table", &rim),
            ("seat ring", &seat_ring),
            ("marker ring", &marker_ring),
        ];
        for (name, ring) in rings {
            if !ring.is_well_formed() {
                return Err(SceneError::InvalidParams(format!(
                    "{name} {}x{} is not a wide stadium",
                    ring.width, ring.height
                )));
            }
        }
        let layout = SeatLayout::new(params.num_players, &seat_ring, &marker_ring);

        let seats = build_seats(&player, &card, &layout, params.num_hole_cards)?;
        let markers = build_markers(&street_commit, &layout)?;
        let mut community = build_community(&player, &card, params.num_community_cards)?;
        community.center_on(&table);
        let (x, y) = (
            community.x() + table.x(),
            community.y() + table.y() - COMMUNITY_LIFT,
        );
        community.set_x(x).set_y(y);

        base.append(table);
        base.extend(seats);
        base.extend(markers);
        base.append(community);

        info!(
            target = LOG_TARGET,
            num_players = params.num_players,
            num_hole_cards = params.num_hole_cards,
            num_community_cards = params.num_community_cards,
            "table scene built"
        );

        Ok(TableScene {
            params,
            layout,
            document: base,
        })
    }
}

impl TableScene {
    pub fn params(&self) -> SceneParams {
        self.params
    }

    pub fn layout(&self) -> &SeatLayout {
        &self.layout
    }

    pub fn document(&self) -> &Node {
        &self.document
    }

    pub fn to_svg_string(&self) -> Result<String, GraphicError> {
        self.document.to_svg_string()
    }
}

/// Clone `template` as the group for `label`, renaming every addressable part
/// and filling its card row with `num_cards` slots.
fn seat_group(
    template: &Node,
    label: SeatLabel,
    card: &Node,
    num_cards: usize,
) -> Result<Node, GraphicError> {
    let mut group = template.clone();
    group.set_id(label.group_id());

    group
        .find_one_mut(&Selector::class("player-background"))?
        .set_id(format!("player-background-{label}"));

    let chips = group.find_one_mut(&Selector::class("chips"))?;
    chips.set_id(format!("chips-{label}"));
    chips
        .find_one_mut(&Selector::class("chips-background"))?
        .set_id(format!("chips-background-{label}"));
    chips
        .find_one_mut(&Selector::class("chips-text"))?
        .set_id(format!("chips-text-{label}"));

    let cards = group.find_one_mut(&Selector::class("cards"))?;
    cards.set_id(format!("cards-{label}"));
    let slots = (0..num_cards)
        .map(|idx| card_slot(card, &*cards, label, idx, num_cards))
        .collect::<Result<Vec<_>, _>>()?;
    cards.extend(slots);

    Ok(group)
}

fn card_slot(
    card: &Node,
    row: &Node,
    label: SeatLabel,
    idx: usize,
    num_cards: usize,
) -> Result<Node, GraphicError> {
    let width = card.width();
    let mut slot = card.clone();
    slot.center_x_on(row);
    let offset = -width * num_cards as f64 / 2.0 + width * (idx as f64 + 0.5);
    let x = slot.x() + offset;
    slot.set_x(x);

    slot.set_id(format!("card-{label}-{idx}"));
    slot.find_one_mut(&Selector::class("card-background"))?
        .set_id(format!("card-background-{label}-{idx}"));
    slot.find_one_mut(&Selector::class("card-text"))?
        .set_id(format!("card-text-{label}-{idx}"));
    Ok(slot)
}

fn build_seats(
    player: &Node,
    card: &Node,
    layout: &SeatLayout,
    num_hole_cards: usize,
) -> Result<Vec<Node>, GraphicError> {
    let mut player = player.clone();
    let mut card = card.clone();

    let width = player
        .width()
        .max(card.width() * num_hole_cards as f64 + SEAT_PADDING);
    player.set_width(width);

    let background = player.find_one_mut(&Selector::class("player-background"))?;
    let height = background.height();
    background
        .set_width(width - SEAT_BACKGROUND_INSET)
        .set_height(height - SEAT_BACKGROUND_INSET);

    let frame = player.frame_width();
    player
        .find_one_mut(&Selector::class("cards"))?
        .set_width(num_hole_cards as f64 * card.width())
        .center_x_in(frame);
    player
        .find_one_mut(&Selector::class("chips"))?
        .set_width(width - SEAT_PADDING)
        .center_x_in(frame);

    card.find_one_mut(&Selector::class("card-background"))?
        .set_attr("fill", CARD_BACK);

    (0..layout.num_players())
        .map(|idx| {
            let anchor = layout.seat(idx);
            let mut seat = seat_group(&player, SeatLabel::Seat(idx), &card, num_hole_cards)?;
            seat.center_at(
                Some(anchor.x.round_ties_even()),
                Some(anchor.y.round_ties_even()),
            );
            Ok(seat)
        })
        .collect()
}

fn build_markers(template: &Node, layout: &SeatLayout) -> Result<Vec<Node>, GraphicError> {
    (0..layout.num_players())
        .map(|idx| {
            let anchor = layout.marker(idx);
            let mut marker = template.clone();
            marker.set_id(format!("street-commit-{idx}"));
            marker
                .find_one_mut(&Selector::class("chips-background"))?
                .set_id(format!("street-commit-background-{idx}"));
            marker
                .find_one_mut(&Selector::class("chips-text"))?
                .set_id(format!("street-commit-text-{idx}"));
            let button = marker.find_one_mut(&Selector::class("button"))?;
            button.set_id(format!("button-{idx}"));
            button
                .find_one_mut(&Selector::class("button-background"))?
                .set_id(format!("button-background-{idx}"));
            marker.center_at(
                Some(anchor.x.round_ties_even()),
                Some(anchor.y.round_ties_even()),
            );
            Ok(marker)
        })
        .collect()
}

/// The community area reuses the seat template with one extra slot in front
/// for the face-down deck.
fn build_community(
    player: &Node,
    card: &Node,
    num_community_cards: usize,
) -> Result<Node, GraphicError> {
    let num_slots = num_community_cards + 1;
    let mut template = player.clone();
    let mut card = card.clone();

    let width = card.width() * num_slots as f64 + SEAT_PADDING;
    template.set_width(width);
    let frame = template.frame_width();
    template
        .find_one_mut(&Selector::class("cards"))?
        .set_width(width)
        .center_x_in(frame);
    card.find_one_mut(&Selector::class("card-background"))?
        .set_attr("fill", CARD_BLANK);

    let mut community = seat_group(&template, SeatLabel::Community, &card, num_slots)?;
    community.remove(&Selector::class("player-background"))?;

    let frame = community.frame_width();
    let pot = community.find_one_mut(&Selector::class("chips"))?;
    pot.set_width(width - POT_INSET).center_x_in(frame).set_id("pot");
    pot.find_one_mut(&Selector::class("chips-background"))?
        .set_id("pot-background");
    pot.find_one_mut(&Selector::class("chips-text"))?
        .set_id("pot-text");
    community.set_attr("class", "community");

    let deck = community.find_one_mut(&Selector::id("card-community-0"))?;
    deck.find_one_mut(&Selector::class("card-background"))?
        .set_attr("fill", CARD_BACK);
    let x = deck.x() - DECK_NUDGE;
    deck.set_x(x);

    Ok(community)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::fs;

    use super::*;

    fn build(num_players: usize, num_hole_cards: usize, num_community_cards: usize) -> TableScene {
        let params = SceneParams::new(num_players, num_hole_cards, num_community_cards);
        SceneBuilder::new(params).build(&AssetStore::bundled()).unwrap()
    }

    fn node<'a>(scene: &'a TableScene, id: &str) -> &'a Node {
        scene
            .document()
            .find_one(&Selector::id(id))
            .unwrap_or_else(|_| panic!("missing element #{id}"))
    }

    #[test]
    fn identifiers_are_unique_for_every_table_size() {
        for num_players in 2..=MAX_PLAYERS {
            for (hole, community) in [(1, 1), (2, 5), (4, 5)] {
                let scene = build(num_players, hole, community);
                let ids = scene.document().ids();
                let unique: HashSet<&str> = ids.iter().copied().collect();
                assert_eq!(
                    unique.len(),
                    ids.len(),
                    "duplicate ids for ({num_players}, {hole}, {community})"
                );
            }
        }
    }

    #[test]
    fn every_contract_identifier_is_present() {
        let scene = build(3, 2, 5);
        for seat in 0..3 {
            for prefix in [
                "player",
                "player-background",
                "cards",
                "chips",
                "chips-background",
                "chips-text",
                "street-commit",
                "street-commit-background",
                "street-commit-text",
                "button",
                "button-background",
            ] {
                node(&scene, &format!("{prefix}-{seat}"));
            }
            for card in 0..2 {
                for prefix in ["card", "card-background", "card-text"] {
                    node(&scene, &format!("{prefix}-{seat}-{card}"));
                }
            }
        }
        for id in ["community", "cards-community", "pot", "pot-background", "pot-text"] {
            node(&scene, id);
        }
        for card in 0..6 {
            node(&scene, &format!("card-community-{card}"));
        }
        assert!(scene
            .document()
            .find_one(&Selector::id("card-community-6"))
            .is_err());
        assert!(scene.document().find_one(&Selector::id("card-2-2")).is_err());
    }

    #[test]
    fn builds_are_deterministic() {
        let first = build(6, 2, 5);
        let second = build(6, 2, 5);
        assert_eq!(first, second);
        assert_eq!(
            first.to_svg_string().unwrap(),
            second.to_svg_string().unwrap()
        );
    }

    #[test]
    fn seats_are_centered_on_their_anchors() {
        let scene = build(2, 1, 5);
        let layout = scene.layout();
        for idx in 0..2 {
            let seat = node(&scene, &format!("player-{idx}"));
            let anchor = layout.seat(idx);
            assert_eq!(seat.x() + seat.width() / 2.0, anchor.x.round_ties_even());
            assert_eq!(seat.y() + seat.height() / 2.0, anchor.y.round_ties_even());

            let marker = node(&scene, &format!("street-commit-{idx}"));
            let anchor = layout.marker(idx);
            assert_eq!(marker.x() + marker.width() / 2.0, anchor.x.round_ties_even());
        }

        // table (200, 350, 600, 300) grown by 100 in each direction
        assert_eq!(layout.seat(0).x, 500.0);
        assert_eq!(layout.seat(0).y, 700.0);
        assert_eq!(layout.seat(1).x, 500.0);
        assert_eq!(layout.seat(1).y, 300.0);
    }

    #[test]
    fn seat_width_grows_with_hole_cards() {
        let scene = build(2, 4, 5);
        let seat = node(&scene, "player-0");
        assert_eq!(seat.width(), 40.0 * 4.0 + 20.0);
        assert_eq!(node(&scene, "player-background-0").width(), 170.0);
        let row = node(&scene, "cards-0");
        assert_eq!(row.width(), 160.0);
        assert_eq!(row.x(), 10.0);

        let xs: Vec<f64> = (0..4).map(|i| node(&scene, &format!("card-0-{i}")).x()).collect();
        assert_eq!(xs, vec![0.0, 40.0, 80.0, 120.0]);
        assert_eq!(
            node(&scene, "card-background-0-0").attr("fill"),
            Some(CARD_BACK)
        );
    }

    #[test]
    fn community_area_has_pot_and_deck_but_no_panel() {
        let scene = build(2, 2, 5);
        let community = node(&scene, "community");
        assert_eq!(community.attr("class"), Some("community"));
        assert_eq!(community.width(), 40.0 * 6.0 + 20.0);
        assert!(scene
            .document()
            .find_one(&Selector::id("player-background-community"))
            .is_err());
        assert_eq!(node(&scene, "pot").width(), 200.0);

        let deck = node(&scene, "card-community-0");
        assert_eq!(deck.x(), 0.0);
        assert_eq!(
            node(&scene, "card-background-community-0").attr("fill"),
            Some(CARD_BACK)
        );
        assert_eq!(
            node(&scene, "card-background-community-1").attr("fill"),
            Some(CARD_BLANK)
        );

        // centered on the 600x300 table at (200, 350), lifted by 40
        assert_eq!(community.x(), 170.0 + 200.0);
        assert_eq!(community.y(), 100.0 + 350.0 - 40.0);
    }

    #[test]
    fn patterns_land_in_the_base_defs() {
        let scene = build(2, 2, 5);
        let defs = scene.document().find_one(&Selector::tag("defs")).unwrap();
        assert_eq!(defs.find_all(&Selector::tag("pattern")).unwrap().len(), 7);
        node(&scene, "card-back");
        node(&scene, "dealer");
    }

    #[test]
    fn rejects_out_of_range_parameters() {
        let store = AssetStore::bundled();
        for params in [
            SceneParams::new(1, 2, 5),
            SceneParams::new(MAX_PLAYERS + 1, 2, 5),
            SceneParams::new(2, 0, 5),
        ] {
            assert!(matches!(
                SceneBuilder::new(params).build(&store),
                Err(SceneError::InvalidParams(_))
            ));
        }
    }

    #[test]
    fn table_template_must_be_a_wide_stadium() {
        let bundled = AssetStore::bundled();
        for (width, height) in [(300, 600), (600, 150)] {
            let dir = tempfile::tempdir().unwrap();
            let store = AssetStore::new(dir.path());
            for name in ["base", "player", "card", "street_commit", "patterns"] {
                fs::copy(bundled.path_of(name), store.path_of(name)).unwrap();
            }
            fs::write(
                store.path_of("table"),
                format!(r#"<svg class="table" width="{width}" height="{height}"/>"#),
            )
            .unwrap();
            assert!(
                matches!(
                    SceneBuilder::new(SceneParams::new(2, 2, 5)).build(&store),
                    Err(SceneError::InvalidParams(_))
                ),
                "{width}x{height} table was accepted"
            );
        }
    }

    #[test]
    fn incomplete_template_set_fails_the_build() {
        let dir = tempfile::tempdir().unwrap();
        let store = AssetStore::new(dir.path());
        assert!(matches!(
            SceneBuilder::new(SceneParams::new(2, 2, 5)).build(&store),
            Err(SceneError::Graphic(GraphicError::AssetNotFound { .. }))
        ));

        let bundled = AssetStore::bundled();
        for name in ["base", "table", "card", "street_commit", "patterns"] {
            fs::copy(bundled.path_of(name), store.path_of(name)).unwrap();
        }
        fs::write(
            store.path_of("player"),
            r#"<svg class="player" width="110" height="100"><svg class="cards"/></svg>"#,
        )
        .unwrap();
        assert!(matches!(
            SceneBuilder::new(SceneParams::new(2, 2, 5)).build(&store),
            Err(SceneError::Graphic(GraphicError::ElementNotFound { .. }))
        ));
    }
}
