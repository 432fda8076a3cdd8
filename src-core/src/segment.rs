use crate::config::ParserConfig;
use log::debug;

pub const HAND_MARKER: &str = "Poker Hand #";
pub const HOLE_CARDS_MARKER: &str = "*** HOLE CARDS ***";

/// Splits a raw log into hand blocks at each `Poker Hand #` marker.
///
/// The marker stays at the start of its block. Blocks under
/// `min_block_len` characters are dropped as fragments; this is a length
/// heuristic, not a structural check. With `require_hole_cards_section`
/// set, blocks without a `*** HOLE CARDS ***` line are dropped as well.
pub fn split_into_hands_with<'a>(full_text: &'a str, config: &ParserConfig) -> Vec<&'a str> {
    debug!("split_into_hands called with {} bytes", full_text.len());

    let mut starts: Vec<usize> = full_text.match_indices(HAND_MARKER).map(|(i, _)| i).collect();
    if starts.first() != Some(&0) {
        starts.insert(0, 0);
    }

    let mut blocks = Vec::new();
    for (idx, &start) in starts.iter().enumerate() {
        let end = starts.get(idx + 1).copied().unwrap_or(full_text.len());
        let raw = &full_text[start..end];
        let block = raw.trim();

        if block.is_empty() {
            continue;
        }
        if raw.chars().count() < config.min_block_len {
            debug!("block {}: skipped short fragment ({} bytes)", idx, raw.len());
            continue;
        }
        if config.require_hole_cards_section && !block.contains(HOLE_CARDS_MARKER) {
            debug!("block {}: skipped, no hole cards section", idx);
            continue;
        }
        blocks.push(block);
    }

    blocks
}

pub fn split_into_hands(full_text: &str) -> Vec<&str> {
    split_into_hands_with(full_text, &ParserConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn padded_hand(id: &str) -> String {
        format!(
            "Poker Hand #{}: Tournament #1, Hold'em No Limit - Level1(10/20)\n{}\n*** HOLE CARDS ***\nDealt to Hero [Ah Ks]\n",
            id,
            "Seat 1: Hero (1,000 in chips)\n".repeat(4)
        )
    }

    #[test]
    fn test_split_keeps_marker_and_order() {
        let text = format!("{}\n\n{}", padded_hand("A1"), padded_hand("B2"));
        let blocks = split_into_hands(&text);

        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].starts_with("Poker Hand #A1:"));
        assert!(blocks[1].starts_with("Poker Hand #B2:"));
        assert!(!blocks[0].ends_with('\n'), "blocks are trimmed");
    }

    #[test]
    fn test_preamble_and_short_fragments_are_dropped() {
        let text = format!(
            "exported by client v2\n{}Poker Hand #X: truncated\n",
            padded_hand("A1")
        );
        let blocks = split_into_hands(&text);

        assert_eq!(blocks.len(), 1);
        assert!(blocks[0].starts_with("Poker Hand #A1:"));
    }

    #[test]
    fn test_long_preamble_without_marker_is_kept_as_block() {
        let noise = "x".repeat(150);
        let blocks = split_into_hands(&noise);
        assert_eq!(blocks, vec![noise.as_str()]);
    }

    #[test]
    fn test_require_hole_cards_section() {
        let no_cards = format!("Poker Hand #N1: {}", "Seat 1: Hero (1,000 in chips)\n".repeat(5));
        let text = format!("{}{}", no_cards, padded_hand("A1"));

        assert_eq!(split_into_hands(&text).len(), 2);

        let strict = ParserConfig {
            require_hole_cards_section: true,
            ..ParserConfig::default()
        };
        let blocks = split_into_hands_with(&text, &strict);
        assert_eq!(blocks.len(), 1);
        assert!(blocks[0].starts_with("Poker Hand #A1:"));
    }

    #[test]
    fn test_empty_input() {
        assert!(split_into_hands("").is_empty());
        assert!(split_into_hands("   \n\n  ").is_empty());
    }
}
