use crate::config::ReportConfig;
use crate::position::Position;
use crate::record::{HandRecord, Outcome};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

fn record<T: Borrow<HandRecord>>(hand: &T) -> &HandRecord {
    hand.borrow()
}

fn pct(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round1(count as f64 / total as f64 * 100.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PositionBucket {
    #[serde(rename = "BTN")]
    Button,
    #[serde(rename = "SB")]
    SmallBlind,
    #[serde(rename = "BB")]
    BigBlind,
    #[serde(rename = "EP")]
    Early,
    #[serde(rename = "MP")]
    Middle,
    #[serde(rename = "CO")]
    Cutoff,
}

impl PositionBucket {
    pub const ALL: [PositionBucket; 6] = [
        PositionBucket::Button,
        PositionBucket::SmallBlind,
        PositionBucket::BigBlind,
        PositionBucket::Early,
        PositionBucket::Middle,
        PositionBucket::Cutoff,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PositionBucket::Button => "BTN",
            PositionBucket::SmallBlind => "SB",
            PositionBucket::BigBlind => "BB",
            PositionBucket::Early => "EP",
            PositionBucket::Middle => "MP",
            PositionBucket::Cutoff => "CO",
        }
    }

    pub fn of(position: Position) -> Option<PositionBucket> {
        match position {
            Position::Button => Some(PositionBucket::Button),
            Position::SmallBlind => Some(PositionBucket::SmallBlind),
            Position::BigBlind => Some(PositionBucket::BigBlind),
            Position::UnderTheGun | Position::UnderTheGunPlusOne => Some(PositionBucket::Early),
            Position::Middle | Position::Hijack => Some(PositionBucket::Middle),
            Position::Cutoff => Some(PositionBucket::Cutoff),
            Position::Other => None,
        }
    }
}

impl fmt::Display for PositionBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketStats {
    pub bucket: PositionBucket,
    pub hands: usize,
    pub vpip_pct: Option<f64>,
    pub pfr_pct: Option<f64>,
}

impl fmt::Display for BucketStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.vpip_pct, self.pfr_pct) {
            (Some(vpip), Some(pfr)) => write!(f, "VPIP {:.1}% / PFR {:.1}%", vpip, pfr),
            _ => f.write_str("N/A"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total_hands: usize,
    pub vpip_count: usize,
    pub pfr_count: usize,
    pub vpip_pct: f64,
    pub pfr_pct: f64,
    /// PFR hands as a share of VPIP hands.
    pub aggression_pct: f64,
    pub by_position: Vec<BucketStats>,
}

pub fn summarize<T: Borrow<HandRecord>>(hands: &[T]) -> Summary {
    let total_hands = hands.len();
    let vpip_count = hands.iter().filter(|h| record(*h).is_vpip).count();
    let pfr_count = hands.iter().filter(|h| record(*h).is_pfr).count();

    let by_position = PositionBucket::ALL
        .into_iter()
        .map(|bucket| {
            let in_bucket: Vec<&HandRecord> = hands
                .iter()
                .map(record)
                .filter(|h| PositionBucket::of(h.hero_position_label) == Some(bucket))
                .collect();
            let n = in_bucket.len();
            let (vpip_pct, pfr_pct) = if n == 0 {
                (None, None)
            } else {
                let v = in_bucket.iter().filter(|h| h.is_vpip).count();
                let p = in_bucket.iter().filter(|h| h.is_pfr).count();
                (Some(pct(v, n)), Some(pct(p, n)))
            };
            BucketStats {
                bucket,
                hands: n,
                vpip_pct,
                pfr_pct,
            }
        })
        .collect();

    Summary {
        total_hands,
        vpip_count,
        pfr_count,
        vpip_pct: pct(vpip_count, total_hands),
        pfr_pct: pct(pfr_count, total_hands),
        aggression_pct: pct(pfr_count, vpip_count),
        by_position,
    }
}

fn largest_pots<'a, T, F>(hands: &'a [T], keep: F, count: usize) -> Vec<&'a T>
where
    T: Borrow<HandRecord>,
    F: Fn(&HandRecord) -> bool,
{
    let mut picked: Vec<&T> = hands.iter().filter(|h| keep(record(*h))).collect();
    // Stable: equal pots keep source order.
    picked.sort_by(|a, b| record(*b).pot_size_chips.cmp(&record(*a).pot_size_chips));
    picked.truncate(count);
    picked
}

pub fn leaks<T: Borrow<HandRecord>>(hands: &[T], count: usize) -> Vec<&T> {
    largest_pots(hands, |h| h.is_vpip && !h.is_winner(), count)
}

pub fn key_hands<T: Borrow<HandRecord>>(hands: &[T], count: usize) -> Vec<&T> {
    largest_pots(hands, |h| h.is_vpip, count)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrimaryFilter {
    #[default]
    All,
    Vpip,
    Won,
    Lost,
    BigPot,
}

impl FromStr for PrimaryFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(PrimaryFilter::All),
            "vpip" => Ok(PrimaryFilter::Vpip),
            "won" | "win" => Ok(PrimaryFilter::Won),
            "lost" | "loss" => Ok(PrimaryFilter::Lost),
            "big-pot" | "bigpot" => Ok(PrimaryFilter::BigPot),
            other => Err(format!("unknown filter '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardType {
    Pair,
    Ace,
    Broadway,
}

impl CardType {
    fn matches(self, hand: &HandRecord) -> bool {
        let tags = &hand.hole_card_tags;
        match self {
            CardType::Pair => tags.is_pair,
            CardType::Ace => tags.has_ace,
            CardType::Broadway => tags.is_broadway,
        }
    }
}

/// Hand-table filter. Empty `card_types` or `positions` means no restriction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandFilter {
    pub primary: PrimaryFilter,
    pub card_types: Vec<CardType>,
    pub positions: Vec<Position>,
    pub big_pot_bb: f64,
}

impl Default for HandFilter {
    fn default() -> Self {
        Self::new(&ReportConfig::default())
    }
}

impl HandFilter {
    pub fn new(report: &ReportConfig) -> Self {
        Self {
            primary: PrimaryFilter::All,
            card_types: Vec::new(),
            positions: Vec::new(),
            big_pot_bb: report.big_pot_bb,
        }
    }

    pub fn matches(&self, hand: &HandRecord) -> bool {
        let primary = match self.primary {
            PrimaryFilter::All => true,
            PrimaryFilter::Vpip => hand.is_vpip,
            PrimaryFilter::Won => hand.outcome == Outcome::Win,
            PrimaryFilter::Lost => hand.outcome == Outcome::Loss,
            PrimaryFilter::BigPot => {
                hand.pot_size_chips as f64 > self.big_pot_bb * hand.big_blind_size as f64
            }
        };
        let card_type =
            self.card_types.is_empty() || self.card_types.iter().any(|t| t.matches(hand));
        let position =
            self.positions.is_empty() || self.positions.contains(&hand.hero_position_label);

        primary && card_type && position
    }

    pub fn apply<'a, T: Borrow<HandRecord>>(&self, hands: &'a [T]) -> Vec<&'a T> {
        hands.iter().filter(|h| self.matches(record(*h))).collect()
    }
}
