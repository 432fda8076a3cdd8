use hand_coach_lib::coach::{CoachReply, FactSheet};
use hand_coach_lib::config::ParserConfig;
use hand_coach_lib::demo::DEMO_LOG;
use hand_coach_lib::segment::split_into_hands;
use hand_coach_lib::stats::{leaks, summarize};
use hand_coach_lib::timeline::{render, Street};
use hand_coach_lib::{extract, parse_hands, parse_hands_with, Outcome, Position, RelativePosition};

#[test]
fn test_demo_log_end_to_end() {
    let log = parse_hands(DEMO_LOG);
    assert_eq!(log.hero.as_deref(), Some("Hero"));
    assert_eq!(log.hands.len(), 10);

    let hands = log.into_chronological();
    assert_eq!(hands[0].id, "TM5543748810", "oldest hand comes first");
    assert_eq!(hands[9].id, "TM5544469446");
    assert_eq!(hands[9].display_index, 10);

    let summary = summarize(&hands);
    assert_eq!(summary.vpip_pct, 20.0);
    assert_eq!(summary.pfr_pct, 0.0);

    let leak_indices: Vec<usize> = leaks(&hands, 3).iter().map(|h| h.display_index).collect();
    assert_eq!(leak_indices, vec![10, 2]);

    let newest = &hands[9];
    let timeline = render(&newest.raw_text, &newest.hero_name, newest.big_blind_size)
        .expect("hand has content");
    assert_eq!(timeline.streets[0].street, Street::Preflop);
    assert_eq!(timeline.big_blind_size, newest.big_blind_size);

    let facts = FactSheet::from_hand(newest).to_string();
    assert!(facts.contains("4♦ 8♦"));
}

#[test]
fn test_positions_across_demo_log() {
    let positions: Vec<Position> = parse_hands(DEMO_LOG)
        .hands
        .iter()
        .map(|h| h.hero_position_label)
        .collect();
    assert_eq!(
        positions,
        vec![
            Position::BigBlind,
            Position::UnderTheGun,
            Position::UnderTheGunPlusOne,
            Position::Middle,
            Position::Hijack,
            Position::Cutoff,
            Position::Button,
            Position::SmallBlind,
            Position::BigBlind,
            Position::UnderTheGun,
        ]
    );
}

#[test]
fn test_relative_position_across_demo_log() {
    let log = parse_hands(DEMO_LOG);
    let on_button = log
        .hands
        .iter()
        .find(|h| h.hero_position_label == Position::Button)
        .unwrap();
    assert_eq!(on_button.relative_position, RelativePosition::InPosition);

    let no_raise = log.hands.iter().find(|h| h.id == "TM5544469412").unwrap();
    assert_eq!(no_raise.relative_position, RelativePosition::MultiwayNoRaiser);
    assert_eq!(no_raise.outcome, Outcome::Fold);
}

#[test]
fn test_record_invariants_hold_for_every_hand() {
    for hand in parse_hands(DEMO_LOG).hands {
        assert!(!hand.is_pfr || hand.is_vpip, "{}: PFR without VPIP", hand.id);

        let ratio = hand.hero_stack_chips as f64 / hand.big_blind_size as f64;
        assert!(
            (hand.hero_stack_bb - ratio).abs() <= 0.05 + 1e-9,
            "{}: stack {} BB vs {}",
            hand.id,
            hand.hero_stack_bb,
            ratio
        );

        if hand.outcome == Outcome::Win {
            continue;
        }
        let expected = if hand.is_vpip { Outcome::Loss } else { Outcome::Fold };
        assert_eq!(hand.outcome, expected, "{}", hand.id);
    }
}

#[test]
fn test_level_token_sets_big_blind() {
    let log = parse_hands(DEMO_LOG);
    for hand in &log.hands {
        let expected = if hand.level == Some(12) { 400 } else { 350 };
        assert_eq!(hand.big_blind_size, expected, "{}", hand.id);
    }
}

#[test]
fn test_extraction_is_idempotent_per_block() {
    for block in split_into_hands(DEMO_LOG) {
        assert_eq!(extract(block), extract(block));
    }
}

#[test]
fn test_hand_order_does_not_change_records() {
    let blocks = split_into_hands(DEMO_LOG);
    let reversed = blocks.iter().rev().copied().collect::<Vec<_>>().join("\n\n");

    let mut forward = parse_hands(DEMO_LOG).hands;
    let mut backward = parse_hands(&reversed).hands;
    forward.sort_by(|a, b| a.id.cmp(&b.id));
    backward.sort_by(|a, b| a.id.cmp(&b.id));
    assert_eq!(forward, backward);
}

#[test]
fn test_ante_only_blocks_yield_nothing() {
    let block = "Poker Hand #TM1: Tournament #1, Hold'em No Limit - Level1(100/200) - 2026/02/04 00:00:00\n\
                 Seat 1: a (1,000 in chips)\nSeat 2: b (1,000 in chips)\n\
                 a: posts the ante 25\nb: posts the ante 25\n";
    let log = parse_hands(&block.repeat(4));
    assert!(log.is_empty());
    assert!(log.hero.is_none());
}

#[test]
fn test_garbage_input_yields_empty_log() {
    assert!(parse_hands("").is_empty());
    assert!(parse_hands(&"lorem ipsum ".repeat(50)).is_empty());
}

#[test]
fn test_strict_segmenting_still_parses_demo_log() {
    let strict = ParserConfig {
        require_hole_cards_section: true,
        ..ParserConfig::default()
    };
    assert_eq!(parse_hands_with(DEMO_LOG, &strict).hands.len(), 10);
}

#[test]
fn test_coach_reply_roundtrip_shape() {
    let reply = CoachReply::parse("Fold pre.\n===SPLIT===\nUTG range dominates K3o.");
    assert_eq!(reply.verdict, "Fold pre.");
    assert_eq!(reply.detail.as_deref(), Some("UTG range dominates K3o."));
}
