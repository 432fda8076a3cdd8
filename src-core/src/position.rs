use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    #[serde(rename = "BTN")]
    Button,
    #[serde(rename = "SB")]
    SmallBlind,
    #[serde(rename = "BB")]
    BigBlind,
    #[serde(rename = "UTG")]
    UnderTheGun,
    #[serde(rename = "UTG+1")]
    UnderTheGunPlusOne,
    #[serde(rename = "HJ")]
    Hijack,
    #[serde(rename = "CO")]
    Cutoff,
    #[serde(rename = "MP")]
    Middle,
    Other,
}

impl Position {
    pub const ALL: [Position; 9] = [
        Position::Button,
        Position::SmallBlind,
        Position::BigBlind,
        Position::UnderTheGun,
        Position::UnderTheGunPlusOne,
        Position::Hijack,
        Position::Cutoff,
        Position::Middle,
        Position::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Position::Button => "BTN",
            Position::SmallBlind => "SB",
            Position::BigBlind => "BB",
            Position::UnderTheGun => "UTG",
            Position::UnderTheGunPlusOne => "UTG+1",
            Position::Hijack => "HJ",
            Position::Cutoff => "CO",
            Position::Middle => "MP",
            Position::Other => "Other",
        }
    }

    /// Maps a clockwise distance from the button on an `n`-handed table to a label.
    ///
    /// Rules are checked top to bottom and the first hit wins. On short tables
    /// some rules overlap (4-handed, distance 3 is both UTG and n-1); the
    /// earlier rule takes it.
    pub fn from_distance(distance: usize, n: usize) -> Position {
        match distance {
            0 => Position::Button,
            1 => Position::SmallBlind,
            2 => Position::BigBlind,
            3 => Position::UnderTheGun,
            4 if n >= 6 => Position::UnderTheGunPlusOne,
            d if d + 1 == n => Position::Cutoff,
            d if d + 2 == n => Position::Hijack,
            d if d >= 5 && d + 3 <= n => Position::Middle,
            _ => Position::Other,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl FromStr for Position {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Position::ALL
            .into_iter()
            .find(|p| p.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown position '{}'", wanted))
    }
}

fn sorted_seats(occupied_seats: &[u32]) -> Vec<u32> {
    occupied_seats
        .iter()
        .copied()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn clockwise_distance(
    seat: Option<u32>,
    button_seat: Option<u32>,
    occupied_seats: &[u32],
) -> Option<usize> {
    let (seat, button_seat) = (seat?, button_seat?);
    let seats = sorted_seats(occupied_seats);
    let n = seats.len();
    let seat_idx = seats.iter().position(|&s| s == seat)?;
    let btn_idx = seats.iter().position(|&s| s == button_seat)?;
    Some((seat_idx + n - btn_idx) % n)
}

pub fn position_label(
    hero_seat: Option<u32>,
    button_seat: Option<u32>,
    occupied_seats: &[u32],
) -> Position {
    match clockwise_distance(hero_seat, button_seat, occupied_seats) {
        Some(distance) => Position::from_distance(distance, sorted_seats(occupied_seats).len()),
        None => Position::Other,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelativePosition {
    InPosition,
    OutOfPosition,
    HeroIsAggressor,
    MultiwayNoRaiser,
    Undetermined,
}

impl RelativePosition {
    pub fn label(self) -> &'static str {
        match self {
            RelativePosition::InPosition => "In Position (IP)",
            RelativePosition::OutOfPosition => "Out of Position (OOP)",
            RelativePosition::HeroIsAggressor => "Hero is the pre-flop aggressor",
            RelativePosition::MultiwayNoRaiser => "Multiway pot (no pre-flop raiser)",
            RelativePosition::Undetermined => "Undetermined (villain seat unknown)",
        }
    }
}

impl fmt::Display for RelativePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// Compares clockwise distances: the larger one acts later post-flop.
///
/// The button always acts last. Equal distances resolve to out of position.
pub fn relative_position(hero_distance: usize, villain_distance: usize) -> RelativePosition {
    if hero_distance == 0 {
        RelativePosition::InPosition
    } else if villain_distance == 0 {
        RelativePosition::OutOfPosition
    } else if hero_distance > villain_distance {
        RelativePosition::InPosition
    } else {
        RelativePosition::OutOfPosition
    }
}
