use crate::cards::{cards_to_display, is_valid_card};
use crate::extract::{button_seat, parse_chips};
use crate::position::position_label;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::LazyLock;

static STREET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\n\s*\*\*\* (HOLE CARDS|FLOP|TURN|RIVER|SHOWDOWN|SUMMARY) \*\*\*\s*\n?")
        .expect("valid regex")
});
static BRACKET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([A-Za-z0-9\s]+)\]").expect("valid regex"));
static SEAT_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Seat (\d+): (\S+)").expect("valid regex"));
static LEVEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Level(\d+)\(([\d,]+)/([\d,]+)\)").expect("valid regex"));
static RAISE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"raises ([\d,]+) to ([\d,]+)( and is all-in)?").expect("valid regex")
});
static BET_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"bets ([\d,]+)").expect("valid regex"));
static CALL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"calls ([\d,]+)( and is all-in)?").expect("valid regex"));

/// Lines containing any of these (case-insensitive) never reach the timeline.
const IGNORED_SUBSTRINGS: [&str; 20] = [
    "posts the ante",
    "in chips",
    "returned to",
    "collected",
    "summary",
    "table",
    "seat",
    "posts small blind",
    "posts big blind",
    "dealt to",
    "uncalled",
    "total pot",
    "board ",
    "seat ",
    "shows ",
    "won (",
    "and lost",
    "and won",
    "folded before",
    "folded on",
];

const ACTIVE_VERBS: [&str; 5] = ["bets", "calls", "raises", "checks", "all-in"];

pub const HERO_LABEL: &str = "Hero";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Street {
    Preflop,
    Flop,
    Turn,
    River,
}

impl Street {
    fn from_marker(marker: &str) -> Option<Street> {
        match marker {
            "HOLE CARDS" => Some(Street::Preflop),
            "FLOP" => Some(Street::Flop),
            "TURN" => Some(Street::Turn),
            "RIVER" => Some(Street::River),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Street::Preflop => "HOLE CARDS",
            Street::Flop => "FLOP",
            Street::Turn => "TURN",
            Street::River => "RIVER",
        }
    }
}

impl fmt::Display for Street {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionLine {
    pub speaker: Option<String>,
    pub text: String,
    pub is_hero: bool,
}

impl fmt::Display for ActionLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.speaker {
            Some(speaker) => write!(f, "{}: {}", speaker, self.text),
            None => f.write_str(&self.text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreetTimeline {
    pub street: Street,
    pub board: Vec<String>,
    /// Cards dealt on this street (the last bracket of the marker line).
    pub new_cards: Vec<String>,
    pub actions: Vec<ActionLine>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeline {
    pub header: String,
    pub big_blind_size: u64,
    pub streets: Vec<StreetTimeline>,
}

impl Timeline {
    pub fn lines(&self) -> Vec<String> {
        let mut out = vec![self.header.clone()];
        for street in &self.streets {
            if !street.board.is_empty() {
                out.push(format!(
                    "*** {} *** {}",
                    street.street,
                    cards_to_display(&street.board.join(" "))
                ));
            }
            out.extend(street.actions.iter().map(ActionLine::to_string));
        }
        out
    }
}

fn is_ignored(line: &str) -> bool {
    let low = line.to_lowercase();
    IGNORED_SUBSTRINGS.iter().any(|sub| low.contains(sub))
}

fn is_active(line: &str, hero_name: &str) -> bool {
    if line.contains("folds") {
        return line.starts_with(&format!("{}:", hero_name));
    }
    ACTIVE_VERBS.iter().any(|verb| line.contains(verb))
}

pub fn format_action_bb(text: &str, big_blind_size: u64) -> String {
    let to_bb = |amount: &str| -> f64 {
        match parse_chips(amount) {
            Some(chips) if big_blind_size > 0 => chips as f64 / big_blind_size as f64,
            _ => 0.0,
        }
    };

    let text = RAISE_RE.replace_all(text, |c: &Captures| {
        format!(
            "raises {:.1} to {:.1} BB{}",
            to_bb(&c[1]),
            to_bb(&c[2]),
            c.get(3).map_or("", |m| m.as_str())
        )
    });
    let text = BET_RE.replace_all(&text, |c: &Captures| format!("bets {:.1} BB", to_bb(&c[1])));
    let text = CALL_RE.replace_all(&text, |c: &Captures| {
        format!(
            "calls {:.1} BB{}",
            to_bb(&c[1]),
            c.get(2).map_or("", |m| m.as_str())
        )
    });
    text.into_owned()
}

fn speaker_labels(hand_text: &str, hero_name: &str) -> HashMap<String, String> {
    let mut seats: BTreeMap<u32, String> = BTreeMap::new();
    for caps in SEAT_NAME_RE.captures_iter(hand_text) {
        if let Ok(seat) = caps[1].parse() {
            seats.entry(seat).or_insert_with(|| caps[2].to_string());
        }
    }

    let button = button_seat(hand_text);
    let occupied: Vec<u32> = seats.keys().copied().collect();
    let mut labels: HashMap<String, String> = seats
        .iter()
        .map(|(&seat, name)| {
            let label = position_label(Some(seat), button, &occupied);
            (name.clone(), label.label().to_string())
        })
        .collect();
    labels.insert(hero_name.to_string(), HERO_LABEL.to_string());
    labels
}

fn header_text(hand_text: &str, big_blind_size: u64) -> String {
    match LEVEL_RE.captures(hand_text) {
        Some(c) => format!(
            "Level: {} | Blinds: {}/{}",
            &c[1],
            c[2].replace(',', ""),
            c[3].replace(',', "")
        ),
        None => format!("Blinds: —/{}", big_blind_size),
    }
}

fn street_bodies(hand_text: &str) -> Vec<(&str, &str)> {
    let markers: Vec<(&str, usize, usize)> = STREET_RE
        .captures_iter(hand_text)
        .filter_map(|c| {
            let whole = c.get(0)?;
            Some((c.get(1)?.as_str(), whole.start(), whole.end()))
        })
        .collect();

    markers
        .iter()
        .enumerate()
        .map(|(idx, &(name, _, body_start))| {
            let body_end = markers
                .get(idx + 1)
                .map_or(hand_text.len(), |&(_, next_start, _)| next_start);
            (name, hand_text[body_start..body_end].trim())
        })
        .collect()
}

fn board_cards(bracket: &str) -> Vec<String> {
    bracket
        .split_whitespace()
        .filter(|card| is_valid_card(card))
        .map(str::to_string)
        .collect()
}

/// Per-street transcript seen from `hero_name`, amounts in multiples of the
/// hand's own `big_blind_size`. `None` for blank input.
pub fn render(hand_text: &str, hero_name: &str, big_blind_size: u64) -> Option<Timeline> {
    if hand_text.trim().is_empty() {
        return None;
    }

    let labels = speaker_labels(hand_text, hero_name);

    let mut streets = Vec::new();
    for (marker, body) in street_bodies(hand_text) {
        let Some(street) = Street::from_marker(marker) else {
            continue;
        };
        let lines: Vec<&str> = body.lines().map(str::trim).filter(|l| !l.is_empty()).collect();

        let mut board = Vec::new();
        let mut new_cards = Vec::new();
        let mut start = 0;
        if street != Street::Preflop {
            let first = lines.first().copied().unwrap_or_default();
            let brackets: Vec<&str> = BRACKET_RE
                .captures_iter(first)
                .filter_map(|c| c.get(1).map(|m| m.as_str()))
                .collect();
            if let Some(last) = brackets.last() {
                board = brackets.iter().flat_map(|b| board_cards(b)).collect();
                new_cards = board_cards(last);
                start = 1;
            }
        }

        let actions = lines
            .iter()
            .skip(start)
            .filter(|line| !is_ignored(line) && is_active(line, hero_name))
            .map(|line| match line.split_once(": ") {
                Some((speaker, rest)) => {
                    let speaker = speaker.trim();
                    ActionLine {
                        speaker: Some(
                            labels
                                .get(speaker)
                                .cloned()
                                .unwrap_or_else(|| speaker.to_string()),
                        ),
                        text: format_action_bb(rest, big_blind_size),
                        is_hero: speaker == hero_name,
                    }
                }
                None => ActionLine {
                    speaker: None,
                    text: format_action_bb(line, big_blind_size),
                    is_hero: false,
                },
            })
            .collect();

        streets.push(StreetTimeline {
            street,
            board,
            new_cards,
            actions,
        });
    }

    Some(Timeline {
        header: header_text(hand_text, big_blind_size),
        big_blind_size,
        streets,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEMO_HAND: &str = include_str!("../fixtures/demo_hands.txt");

    fn first_hand() -> &'static str {
        let end = DEMO_HAND[1..].find("Poker Hand #").map_or(DEMO_HAND.len(), |i| i + 1);
        &DEMO_HAND[..end]
    }

    #[test]
    fn test_demo_hand_timeline() {
        let timeline = render(first_hand(), "Hero", 400).expect("non-empty hand");

        assert_eq!(timeline.header, "Level: 12 | Blinds: 200/400");
        assert_eq!(timeline.big_blind_size, 400);

        let streets: Vec<Street> = timeline.streets.iter().map(|s| s.street).collect();
        assert_eq!(
            streets,
            vec![Street::Preflop, Street::Flop, Street::Turn, Street::River]
        );

        let preflop: Vec<String> = timeline.streets[0]
            .actions
            .iter()
            .map(|a| a.to_string())
            .collect();
        assert_eq!(
            preflop,
            vec!["UTG: raises 1.0 to 2.0 BB", "Hero: calls 1.0 BB"],
            "villain folds and blind posts are dropped"
        );
        assert!(timeline.streets[0].actions[1].is_hero);
        assert!(!timeline.streets[0].actions[0].is_hero);
    }

    #[test]
    fn test_demo_hand_board_and_postflop_actions() {
        let timeline = render(first_hand(), "Hero", 400).unwrap();
        let flop = &timeline.streets[1];

        assert_eq!(flop.board, vec!["Kd", "4s", "8s"]);
        assert_eq!(flop.new_cards, flop.board);
        let actions: Vec<String> = flop.actions.iter().map(|a| a.to_string()).collect();
        assert_eq!(
            actions,
            vec![
                "Hero: checks",
                "UTG: bets 2.3 BB",
                "Hero: raises 10.1 to 12.4 BB and is all-in",
                "UTG: calls 10.1 BB",
            ],
            "showdown reveals are not actions"
        );

        let turn = &timeline.streets[2];
        assert_eq!(turn.board, vec!["Kd", "4s", "8s", "7c"]);
        assert_eq!(turn.new_cards, vec!["7c"]);
        assert!(turn.actions.is_empty());

        assert_eq!(timeline.streets[3].new_cards, vec!["Ts"]);
    }

    #[test]
    fn test_lines_include_badges() {
        let lines = render(first_hand(), "Hero", 400).unwrap().lines();
        assert_eq!(lines[0], "Level: 12 | Blinds: 200/400");
        assert!(lines.contains(&"*** FLOP *** K♦ 4♠ 8♠".to_string()));
        assert!(lines.contains(&"*** RIVER *** K♦ 4♠ 8♠ 7♣ T♠".to_string()));
    }

    #[test]
    fn test_hero_fold_is_shown() {
        let hand = "Poker Hand #X1: Hold'em\nThe button is in seat #3\nSeat 1: A (1,000 in chips)\nSeat 2: B (1,000 in chips)\nSeat 3: Hero (1,000 in chips)\nA: posts small blind 50\nB: posts big blind 100\n*** HOLE CARDS ***\nDealt to Hero [7c 2d]\nHero: folds\nA: folds\nB: checks\n*** SUMMARY ***\nTotal pot 150";
        let timeline = render(hand, "Hero", 100).unwrap();

        assert_eq!(timeline.header, "Blinds: —/100");
        let actions: Vec<String> = timeline.streets[0]
            .actions
            .iter()
            .map(|a| a.to_string())
            .collect();
        assert_eq!(actions, vec!["Hero: folds", "BB: checks"]);
    }

    #[test]
    fn test_invalid_board_tokens_are_dropped() {
        let hand = "Poker Hand #X2: Hold'em\n*** HOLE CARDS ***\nDealt to Hero [Ah Ad]\n*** FLOP *** [Xx 4s 8s]\nHero: checks";
        let timeline = render(hand, "Hero", 100).unwrap();
        assert_eq!(timeline.streets[1].board, vec!["4s", "8s"]);
        assert_eq!(timeline.streets[1].actions.len(), 1);
    }

    #[test]
    fn test_unknown_speaker_keeps_name_without_button() {
        let hand = "Poker Hand #X3: Hold'em\nSeat 1: A (1,000 in chips)\nSeat 2: Hero (1,000 in chips)\n*** HOLE CARDS ***\nDealt to Hero [Ah Ad]\nZed: bets 200";
        let timeline = render(hand, "Hero", 400).unwrap();
        let action = &timeline.streets[0].actions[0];
        assert_eq!(action.speaker.as_deref(), Some("Zed"));
        assert_eq!(action.text, "bets 0.5 BB");
    }

    #[test]
    fn test_settlement_lines_are_not_actions() {
        let hand = "Poker Hand #HD42: Hold'em No Limit\nThe button is in seat #6\nSeat 1: Villain1 (3,000 in chips)\nSeat 2: Hero (2,500 in chips)\nSeat 4: Villain4 (4,000 in chips)\nSeat 6: Villain6 (1,800 in chips)\nVillain1: posts small blind 50\nHero: posts big blind 100\n*** HOLE CARDS ***\nDealt to Hero [Ac Kc]\nVillain4: raises 100 to 200\nVillain6: folds\nVillain1: folds\nHero: folds\nUncalled bet (100) returned to Villain4\nVillain4 collected 250 from pot\n*** SUMMARY ***\nTotal pot 250";
        let timeline = render(hand, "Hero", 100).unwrap();

        assert_eq!(timeline.streets.len(), 1);
        let actions: Vec<String> = timeline.streets[0]
            .actions
            .iter()
            .map(|a| a.to_string())
            .collect();
        assert_eq!(actions, vec!["UTG: raises 1.0 to 2.0 BB", "Hero: folds"]);
    }

    #[test]
    fn test_amounts_follow_configured_big_blind() {
        use crate::config::ParserConfig;
        use crate::extract::extract_with;

        let hand = "Poker Hand #X4: Hold'em No Limit\nThe button is in seat #1\nSeat 1: A (4,000 in chips)\nSeat 2: Hero (4,000 in chips)\n*** HOLE CARDS ***\nDealt to Hero [Ah Kd]\nA: raises 100 to 200\nHero: calls 100";
        let config = ParserConfig {
            default_big_blind: 200,
            ..ParserConfig::default()
        };
        let record = extract_with(hand, &config).expect("hero cards shown");
        assert_eq!(record.big_blind_size, 200);

        let timeline =
            render(&record.raw_text, &record.hero_name, record.big_blind_size).unwrap();
        assert_eq!(timeline.big_blind_size, record.big_blind_size);
        assert_eq!(timeline.header, "Blinds: —/200");
        assert_eq!(timeline.streets[0].actions[0].text, "raises 0.5 to 1.0 BB");
        assert_eq!(timeline.streets[0].actions[1].text, "calls 0.5 BB");
    }

    #[test]
    fn test_format_action_bb() {
        assert_eq!(
            format_action_bb("raises 800 to 1,200 and is all-in", 400),
            "raises 2.0 to 3.0 BB and is all-in"
        );
        assert_eq!(format_action_bb("calls 4,000", 400), "calls 10.0 BB");
        assert_eq!(format_action_bb("checks", 400), "checks");
        assert_eq!(format_action_bb("bets 500", 0), "bets 0.0 BB");
    }

    #[test]
    fn test_blank_input() {
        assert!(render("", "Hero", 400).is_none());
        assert!(render("  \n ", "Hero", 400).is_none());
    }
}
