use crate::cards::{HoleCardTags, HoleCards};
use crate::position::{Position, RelativePosition};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

fn default_hand_id() -> String {
    "Unknown".to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Loss,
    Fold,
}

impl Outcome {
    pub fn label(self) -> &'static str {
        match self {
            Outcome::Win => "Win",
            Outcome::Loss => "Loss",
            Outcome::Fold => "Fold",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BigBlindSource {
    LevelHeader,
    PostedBlind,
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PotSource {
    TotalPot,
    Collected,
    Won,
    Missing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StackSource {
    SeatLine,
    Missing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ButtonSource {
    SeatAnnotation,
    Missing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    pub big_blind: BigBlindSource,
    pub pot: PotSource,
    pub stack: StackSource,
    pub button: ButtonSource,
}

impl Provenance {
    pub fn is_complete(&self) -> bool {
        self.big_blind != BigBlindSource::Default
            && self.pot != PotSource::Missing
            && self.stack != StackSource::Missing
            && self.button != ButtonSource::Missing
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandRecord {
    #[serde(default = "default_hand_id")]
    pub id: String,
    pub raw_text: String,
    pub tournament_id: Option<String>,
    pub level: Option<u32>,
    pub small_blind_size: Option<u64>,
    pub big_blind_size: u64,
    pub table_size: Option<u32>,
    pub played_at: Option<NaiveDateTime>,
    pub hero_name: String,
    pub hero_seat: Option<u32>,
    pub button_seat: Option<u32>,
    pub hero_hole_cards: Option<HoleCards>,
    pub hero_cards_display: String,
    pub hand_type: Option<String>,
    pub hole_card_tags: HoleCardTags,
    pub hero_stack_chips: u64,
    pub hero_stack_bb: f64,
    pub is_vpip: bool,
    pub is_pfr: bool,
    pub pot_size_chips: u64,
    pub hero_position_label: Position,
    pub main_villain_name: Option<String>,
    pub main_villain_seat: Option<u32>,
    pub relative_position: RelativePosition,
    pub outcome: Outcome,
    pub provenance: Provenance,
}

impl HandRecord {
    pub fn is_winner(&self) -> bool {
        self.outcome == Outcome::Win
    }

    pub fn pot_size_bb(&self) -> f64 {
        if self.big_blind_size == 0 {
            return 0.0;
        }
        self.pot_size_chips as f64 / self.big_blind_size as f64
    }
}

/// Result of parsing one log: records in source order (newest first for GG
/// exports) and the first hero alias seen.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HandLog {
    pub hero: Option<String>,
    pub hands: Vec<HandRecord>,
}

impl HandLog {
    pub fn is_empty(&self) -> bool {
        self.hands.is_empty()
    }

    pub fn into_chronological(self) -> Vec<IndexedHand> {
        self.hands
            .into_iter()
            .rev()
            .enumerate()
            .map(|(i, hand)| IndexedHand {
                display_index: i + 1,
                hand,
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedHand {
    pub display_index: usize,
    #[serde(flatten)]
    pub hand: HandRecord,
}

impl std::ops::Deref for IndexedHand {
    type Target = HandRecord;

    fn deref(&self) -> &HandRecord {
        &self.hand
    }
}

impl std::borrow::Borrow<HandRecord> for IndexedHand {
    fn borrow(&self) -> &HandRecord {
        &self.hand
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::parse_hands;

    const DEMO_LOG: &str = include_str!("../fixtures/demo_hands.txt");

    #[test]
    fn test_into_chronological_reverses_and_numbers() {
        let log = parse_hands(DEMO_LOG);
        let newest_id = log.hands[0].id.clone();

        let indexed = log.into_chronological();
        let indices: Vec<usize> = indexed.iter().map(|h| h.display_index).collect();
        assert_eq!(indices, (1..=10).collect::<Vec<_>>());
        assert_eq!(indexed[9].id, newest_id, "display index follows play order");
    }

    #[test]
    fn test_serialized_shape() {
        let hand = parse_hands(DEMO_LOG).into_chronological().pop().unwrap();
        let json = serde_json::to_value(&hand).unwrap();

        assert_eq!(json["display_index"], 10);
        assert_eq!(json["id"], "TM5544469446");
        assert_eq!(json["hero_position_label"], "BB");
        assert_eq!(json["outcome"], "loss");
        assert_eq!(json["hero_hole_cards"], serde_json::json!(["4d", "8d"]));
        assert_eq!(json["played_at"], "2026-02-04T01:07:12");

        let back: IndexedHand = serde_json::from_value(json).unwrap();
        assert_eq!(back, hand);
    }

    #[test]
    fn test_pot_size_bb() {
        let mut hand = parse_hands(DEMO_LOG).hands.remove(0);
        assert_eq!(hand.pot_size_bb(), 30.36);
        hand.big_blind_size = 0;
        assert_eq!(hand.pot_size_bb(), 0.0);
    }

    #[test]
    fn test_provenance_completeness() {
        let complete = Provenance {
            big_blind: BigBlindSource::LevelHeader,
            pot: PotSource::TotalPot,
            stack: StackSource::SeatLine,
            button: ButtonSource::SeatAnnotation,
        };
        assert!(complete.is_complete());
        assert!(!Provenance {
            big_blind: BigBlindSource::Default,
            ..complete
        }
        .is_complete());
    }
}
