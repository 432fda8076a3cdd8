use serde::{Deserialize, Serialize};

const RANK_ORDER: &str = "AKQJT98765432";
const BROADWAY_RANKS: &str = "AKQJT";

pub fn suit_symbol(suit: char) -> Option<&'static str> {
    match suit.to_ascii_lowercase() {
        'h' => Some("♥"),
        'd' => Some("♦"),
        'c' => Some("♣"),
        's' => Some("♠"),
        _ => None,
    }
}

fn split_token(token: &str) -> Option<(&str, char)> {
    let mut chars = token.chars();
    let suit = chars.next_back()?;
    let rank = chars.as_str();
    if rank.is_empty() {
        return None;
    }
    Some((rank, suit))
}

pub fn to_display(card_token: &str) -> String {
    match split_token(card_token.trim()) {
        Some((rank, suit)) => match suit_symbol(suit) {
            Some(symbol) => format!("{}{}", rank, symbol),
            None => format!("{}{}", rank, suit),
        },
        None => String::new(),
    }
}

pub fn cards_to_display(cards: &str) -> String {
    cards
        .split_whitespace()
        .map(to_display)
        .filter(|c| !c.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn normalize(card_token: &str) -> String {
    match split_token(card_token) {
        Some((rank, suit)) => format!("{}{}", rank.to_uppercase(), suit.to_ascii_lowercase()),
        None => card_token.to_string(),
    }
}

pub fn is_valid_card(card_token: &str) -> bool {
    let bytes = card_token.as_bytes();
    bytes.len() == 2
        && b"AKQJT98765432".contains(&bytes[0].to_ascii_uppercase())
        && b"hdcs".contains(&bytes[1].to_ascii_lowercase())
}

fn rank_of(card: &str) -> String {
    split_token(card)
        .map(|(rank, _)| rank.to_uppercase())
        .unwrap_or_default()
}

fn suit_of(card: &str) -> Option<char> {
    split_token(card).map(|(_, suit)| suit.to_ascii_lowercase())
}

fn rank_index(rank: &str) -> Option<usize> {
    if rank.len() != 1 {
        return None;
    }
    RANK_ORDER.find(rank)
}

fn is_broadway_rank(rank: &str) -> bool {
    rank.len() == 1 && BROADWAY_RANKS.contains(rank)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoleCardTags {
    pub is_suited: bool,
    pub is_pair: bool,
    pub has_ace: bool,
    pub is_broadway: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoleCards(pub String, pub String);

impl HoleCards {
    pub fn parse(cards: &str) -> Option<Self> {
        let mut tokens = cards.split_whitespace();
        let first = tokens.next()?;
        let second = tokens.next()?;
        if first.chars().count() < 2 || second.chars().count() < 2 {
            return None;
        }
        Some(Self(first.to_string(), second.to_string()))
    }

    pub fn tags(&self) -> HoleCardTags {
        let (r1, r2) = (rank_of(&self.0), rank_of(&self.1));
        HoleCardTags {
            is_suited: suit_of(&self.0).is_some() && suit_of(&self.0) == suit_of(&self.1),
            is_pair: !r1.is_empty() && r1 == r2,
            has_ace: r1 == "A" || r2 == "A",
            is_broadway: is_broadway_rank(&r1) && is_broadway_rank(&r2),
        }
    }

    /// Shorthand like `"AKs"` or `"84o"`, higher rank first regardless of input order.
    ///
    /// Pairs keep the offsuit suffix (`"TTo"`). Ranks outside `2-A` are left in
    /// input order.
    pub fn hand_type(&self) -> String {
        let (r1, r2) = (rank_of(&self.0), rank_of(&self.1));
        let suffix = if self.tags().is_suited { 's' } else { 'o' };
        match (rank_index(&r1), rank_index(&r2)) {
            (Some(i1), Some(i2)) if i2 < i1 => format!("{}{}{}", r2, r1, suffix),
            _ => format!("{}{}{}", r1, r2, suffix),
        }
    }

    pub fn to_display(&self) -> String {
        cards_to_display(&format!("{} {}", self.0, self.1))
    }
}

impl std::fmt::Display for HoleCards {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.0, self.1)
    }
}
