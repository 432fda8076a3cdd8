use crate::cards::HoleCards;
use crate::config::ParserConfig;
use crate::position::{clockwise_distance, position_label, relative_position, RelativePosition};
use crate::record::{
    BigBlindSource, ButtonSource, HandLog, HandRecord, Outcome, PotSource, Provenance, StackSource,
};
use crate::segment::split_into_hands_with;
use chrono::NaiveDateTime;
use log::{debug, info, warn};
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

static HAND_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Poker Hand #([A-Za-z0-9_]+):").expect("valid regex"));
static TOURNAMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Tournament #(\d+)").expect("valid regex"));
static LEVEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Level(\d+)\(([\d,]+)/([\d,]+)\)").expect("valid regex"));
static PLAYED_AT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{4}/\d{2}/\d{2} \d{2}:\d{2}:\d{2})").expect("valid regex")
});
static TABLE_SIZE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)-max").expect("valid regex"));
static POSTED_BB_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"posts big blind ([\d,]+)").expect("valid regex"));
static DEALT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Dealt to (\S+) \[([A-Za-z0-9]{2} [A-Za-z0-9]{2})\]").expect("valid regex")
});
static TOTAL_POT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Total pot ([\d,]+)").expect("valid regex"));
static COLLECTED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"collected ([\d,]+) from pot").expect("valid regex"));
static WON_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"won \(([\d,]+)\)").expect("valid regex"));
static BUTTON_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"The button is in seat #(\d+)|Seat #(\d+) is the button").expect("valid regex")
});
static SEAT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Seat (\d+):").expect("valid regex"));
static AGGRESSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(\S+): (?:raises|bets)\b").expect("valid regex"));

pub const FLOP_MARKER: &str = "*** FLOP ***";

pub fn parse_chips(amount: &str) -> Option<u64> {
    amount.replace(',', "").trim().parse().ok()
}

fn player_regex(template: &str, name: &str) -> Option<Regex> {
    Regex::new(&template.replace("{name}", &regex::escape(name))).ok()
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeaderFacts {
    pub tournament_id: Option<String>,
    pub level: Option<u32>,
    pub small_blind: Option<u64>,
    pub played_at: Option<NaiveDateTime>,
    pub table_size: Option<u32>,
}

pub fn hand_id(block: &str) -> Option<String> {
    HAND_ID_RE.captures(block).map(|c| c[1].to_string())
}

pub fn header_facts(block: &str) -> HeaderFacts {
    let header = block.lines().next().unwrap_or_default();
    let level = LEVEL_RE.captures(header);

    HeaderFacts {
        tournament_id: TOURNAMENT_RE.captures(header).map(|c| c[1].to_string()),
        level: level.as_ref().and_then(|c| c[1].parse().ok()),
        small_blind: level.as_ref().and_then(|c| parse_chips(&c[2])),
        played_at: PLAYED_AT_RE
            .captures(header)
            .and_then(|c| NaiveDateTime::parse_from_str(&c[1], "%Y/%m/%d %H:%M:%S").ok()),
        table_size: TABLE_SIZE_RE
            .captures(block)
            .and_then(|c| c[1].parse().ok()),
    }
}

/// Big blind from the level header, else from the posted blind, else `default`.
pub fn big_blind(block: &str, default: u64) -> (u64, BigBlindSource) {
    let from_level = LEVEL_RE
        .captures(block)
        .and_then(|c| parse_chips(&c[3]))
        .filter(|&bb| bb > 0);
    if let Some(bb) = from_level {
        return (bb, BigBlindSource::LevelHeader);
    }

    let posted = POSTED_BB_RE
        .captures(block)
        .and_then(|c| parse_chips(&c[1]))
        .filter(|&bb| bb > 0);
    if let Some(bb) = posted {
        return (bb, BigBlindSource::PostedBlind);
    }

    (default.max(1), BigBlindSource::Default)
}

pub fn hero_cards(block: &str) -> Option<(String, HoleCards)> {
    let caps = DEALT_RE.captures(block)?;
    let cards = HoleCards::parse(&caps[2])?;
    Some((caps[1].to_string(), cards))
}

pub fn hero_stack(block: &str, hero: &str) -> Option<u64> {
    player_regex(r"Seat \d+: {name} \(([\d,]+)(?: in chips)?\)", hero)?
        .captures(block)
        .and_then(|c| parse_chips(&c[1]))
}

pub fn preflop_segment(block: &str) -> &str {
    match block.find(FLOP_MARKER) {
        Some(idx) => &block[..idx],
        None => block,
    }
}

pub fn preflop_flags(preflop: &str, hero: &str) -> (bool, bool) {
    let vpip = player_regex(r"(?m)^{name}: (raises|calls|bets)", hero)
        .is_some_and(|re| re.is_match(preflop));
    let pfr = player_regex(r"(?m)^{name}: raises", hero).is_some_and(|re| re.is_match(preflop));
    (vpip, pfr)
}

pub fn pot_size(block: &str) -> (u64, PotSource) {
    if let Some(pot) = TOTAL_POT_RE.captures(block).and_then(|c| parse_chips(&c[1])) {
        return (pot, PotSource::TotalPot);
    }
    if let Some(pot) = COLLECTED_RE.captures(block).and_then(|c| parse_chips(&c[1])) {
        return (pot, PotSource::Collected);
    }
    if let Some(pot) = WON_RE.captures(block).and_then(|c| parse_chips(&c[1])) {
        return (pot, PotSource::Won);
    }
    (0, PotSource::Missing)
}

pub fn button_seat(block: &str) -> Option<u32> {
    let caps = BUTTON_RE.captures(block)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .and_then(|m| m.as_str().parse().ok())
}

pub fn player_seat(block: &str, name: &str) -> Option<u32> {
    player_regex(r"Seat (\d+): {name}\s", name)?
        .captures(block)
        .and_then(|c| c[1].parse().ok())
}

pub fn occupied_seats(block: &str) -> Vec<u32> {
    SEAT_RE
        .captures_iter(block)
        .filter_map(|c| c[1].parse().ok())
        .collect::<BTreeSet<u32>>()
        .into_iter()
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreflopAggressor {
    Villain(String),
    Hero,
    Nobody,
}

/// First player other than the hero to raise or bet pre-flop.
///
/// Falls back to [`PreflopAggressor::Hero`] when only the hero was
/// aggressive. In a multiway pot with several raisers this picks the
/// earliest one, which is not always the hero's real opponent.
pub fn main_villain(preflop: &str, hero: &str) -> PreflopAggressor {
    let mut hero_aggressed = false;
    for caps in AGGRESSION_RE.captures_iter(preflop) {
        let name = &caps[1];
        if name == hero {
            hero_aggressed = true;
        } else {
            return PreflopAggressor::Villain(name.to_string());
        }
    }
    if hero_aggressed {
        PreflopAggressor::Hero
    } else {
        PreflopAggressor::Nobody
    }
}

/// `win` when the hero's name is followed by collected/won/wins/matches anywhere
/// in the hand, else `loss` if the hero put money in voluntarily, else `fold`.
pub fn outcome(block: &str, hero: &str, is_vpip: bool) -> Outcome {
    let won = player_regex(r"(?i)(?:^|\s){name}\s+(?:collected|won|wins|matches)", hero)
        .is_some_and(|re| re.is_match(block));
    if won {
        Outcome::Win
    } else if is_vpip {
        Outcome::Loss
    } else {
        Outcome::Fold
    }
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

pub fn extract(raw_block: &str) -> Option<HandRecord> {
    extract_with(raw_block, &ParserConfig::default())
}

pub fn extract_with(raw_block: &str, config: &ParserConfig) -> Option<HandRecord> {
    let block = raw_block.trim();
    let (hero, cards) = hero_cards(block)?;

    let header = header_facts(block);
    let (big_blind_size, big_blind_source) = big_blind(block, config.default_big_blind);

    let stack = hero_stack(block, &hero);
    let hero_stack_chips = stack.unwrap_or(0);

    let preflop = preflop_segment(block);
    let (is_vpip, is_pfr) = preflop_flags(preflop, &hero);
    let tags = cards.tags();
    let (pot_size_chips, pot_source) = pot_size(block);

    let button = button_seat(block);
    let hero_seat = player_seat(block, &hero);
    let seats = occupied_seats(block);
    let hero_position_label = position_label(hero_seat, button, &seats);
    let hero_distance = clockwise_distance(hero_seat, button, &seats);

    let mut main_villain_name = None;
    let mut main_villain_seat = None;
    let relative = match main_villain(preflop, &hero) {
        PreflopAggressor::Villain(name) => {
            main_villain_seat = player_seat(block, &name);
            main_villain_name = Some(name);
            let villain_distance = clockwise_distance(main_villain_seat, button, &seats);
            match (hero_distance, villain_distance) {
                (Some(h), Some(v)) => relative_position(h, v),
                _ => RelativePosition::Undetermined,
            }
        }
        PreflopAggressor::Hero => RelativePosition::HeroIsAggressor,
        PreflopAggressor::Nobody => RelativePosition::MultiwayNoRaiser,
    };

    let outcome = outcome(block, &hero, is_vpip);

    Some(HandRecord {
        id: hand_id(block).unwrap_or_else(|| "Unknown".to_string()),
        raw_text: block.to_string(),
        tournament_id: header.tournament_id,
        level: header.level,
        small_blind_size: header.small_blind,
        big_blind_size,
        table_size: header.table_size,
        played_at: header.played_at,
        hero_seat,
        button_seat: button,
        hero_cards_display: cards.to_display(),
        hand_type: Some(cards.hand_type()),
        hole_card_tags: tags,
        hero_hole_cards: Some(cards),
        hero_stack_chips,
        hero_stack_bb: round1(hero_stack_chips as f64 / big_blind_size as f64),
        is_vpip,
        is_pfr,
        pot_size_chips,
        hero_position_label,
        main_villain_name,
        main_villain_seat,
        relative_position: relative,
        outcome,
        provenance: Provenance {
            big_blind: big_blind_source,
            pot: pot_source,
            stack: if stack.is_some() {
                StackSource::SeatLine
            } else {
                StackSource::Missing
            },
            button: if button.is_some() {
                ButtonSource::SeatAnnotation
            } else {
                ButtonSource::Missing
            },
        },
        hero_name: hero,
    })
}

pub fn parse_hands(content: &str) -> HandLog {
    parse_hands_with(content, &ParserConfig::default())
}

pub fn parse_hands_with(content: &str, config: &ParserConfig) -> HandLog {
    debug!("parse_hands called with {} bytes", content.len());

    let mut log = HandLog::default();
    for (idx, block) in split_into_hands_with(content, config).into_iter().enumerate() {
        match extract_with(block, config) {
            Some(hand) => {
                if log.hero.is_none() {
                    log.hero = Some(hand.hero_name.clone());
                }
                log.hands.push(hand);
            }
            None => {
                let preview = block.chars().take(80).collect::<String>();
                warn!("block {}: no hero hole cards, skipped. preview: {}", idx, preview);
            }
        }
    }

    info!(
        "parsed {} hands (hero: {})",
        log.hands.len(),
        log.hero.as_deref().unwrap_or("none")
    );
    log
}
