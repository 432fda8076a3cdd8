use crate::record::{HandRecord, IndexedHand};
use crate::stats::{key_hands, summarize, Summary};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const REPLY_DELIMITER: &str = "===SPLIT===";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactSheet {
    pub hero_cards: String,
    pub position: String,
    pub stack_bb: f64,
    pub relative_position: String,
}

impl FactSheet {
    pub fn from_hand(hand: &HandRecord) -> Self {
        Self {
            hero_cards: hand.hero_cards_display.clone(),
            position: hand.hero_position_label.to_string(),
            stack_bb: hand.hero_stack_bb,
            relative_position: hand.relative_position.to_string(),
        }
    }
}

impl fmt::Display for FactSheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "- Hero cards: {}", self.hero_cards)?;
        writeln!(f, "- Hero position: {}", self.position)?;
        writeln!(f, "- Stack: {} BB", self.stack_bb)?;
        write!(f, "- Relative position: {} (vs. main villain)", self.relative_position)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoachReply {
    pub verdict: String,
    pub detail: Option<String>,
}

impl CoachReply {
    /// Text before the first delimiter is the verdict, text up to the next
    /// one is the detail. Without a delimiter the whole reply is the verdict.
    pub fn parse(text: &str) -> Self {
        let mut parts = text.split(REPLY_DELIMITER);
        let verdict = parts.next().unwrap_or_default().trim().to_string();
        let detail = parts
            .next()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string);
        Self { verdict, detail }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyHandNote {
    pub display_index: usize,
    pub hero_cards: String,
    pub is_suited: bool,
    pub hand_type: String,
    pub pot_size_chips: u64,
}

impl fmt::Display for KeyHandNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suited = if self.is_suited { "Suited" } else { "Offsuit" };
        write!(
            f,
            "Hand #{}: {} ({}) [{}], pot {}",
            self.display_index, self.hero_cards, suited, self.hand_type, self.pot_size_chips
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionBrief {
    pub summary: Summary,
    pub key_hands: Vec<KeyHandNote>,
}

impl SessionBrief {
    pub fn new(hands: &[IndexedHand], key_hand_count: usize) -> Self {
        let key_hands = key_hands(hands, key_hand_count)
            .into_iter()
            .map(|h| KeyHandNote {
                display_index: h.display_index,
                hero_cards: h.hero_cards_display.clone(),
                is_suited: h.hole_card_tags.is_suited,
                hand_type: h.hand_type.clone().unwrap_or_else(|| "??".to_string()),
                pot_size_chips: h.pot_size_chips,
            })
            .collect();
        Self {
            summary: summarize(hands),
            key_hands,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::parse_hands;

    const DEMO_LOG: &str = include_str!("../fixtures/demo_hands.txt");

    #[test]
    fn test_fact_sheet_for_demo_hand() {
        let log = parse_hands(DEMO_LOG);
        let facts = FactSheet::from_hand(&log.hands[0]);

        assert_eq!(facts.hero_cards, "4♦ 8♦");
        assert_eq!(facts.position, "BB");
        assert_eq!(facts.relative_position, "Out of Position (OOP)");

        let text = facts.to_string();
        assert!(text.starts_with("- Hero cards: 4♦ 8♦\n"));
        assert!(text.contains("- Hero position: BB\n"));
        assert!(text.ends_with("Out of Position (OOP) (vs. main villain)"));
    }

    #[test]
    fn test_reply_with_delimiter() {
        let reply = CoachReply::parse("  Tight fold.  \n===SPLIT===\n### Why\nDominated range.\n");
        assert_eq!(reply.verdict, "Tight fold.");
        assert_eq!(reply.detail.as_deref(), Some("### Why\nDominated range."));
    }

    #[test]
    fn test_reply_without_delimiter() {
        let reply = CoachReply::parse("Just one paragraph.");
        assert_eq!(reply.verdict, "Just one paragraph.");
        assert_eq!(reply.detail, None);

        let empty_detail = CoachReply::parse("Verdict ===SPLIT===   ");
        assert_eq!(empty_detail.detail, None);
    }

    #[test]
    fn test_reply_ignores_text_after_second_delimiter() {
        let reply = CoachReply::parse("a===SPLIT===b===SPLIT===c");
        assert_eq!(reply.verdict, "a");
        assert_eq!(reply.detail.as_deref(), Some("b"));
    }

    #[test]
    fn test_session_brief_uses_display_indices() {
        let hands = parse_hands(DEMO_LOG).into_chronological();
        let brief = SessionBrief::new(&hands, 5);

        assert_eq!(brief.summary.total_hands, 10);
        let indices: Vec<usize> = brief.key_hands.iter().map(|k| k.display_index).collect();
        assert_eq!(indices, vec![10, 2], "newest hand is #10 once in chronological order");
        assert_eq!(
            brief.key_hands[0].to_string(),
            "Hand #10: 4♦ 8♦ (Suited) [84s], pot 12144"
        );
    }
}
