use crate::config::ParserConfig;
use crate::extract::parse_hands_with;
use crate::record::HandLog;

/// Ten GGPoker tournament hands, newest first, as exported by the client.
pub const DEMO_LOG: &str = include_str!("../fixtures/demo_hands.txt");

pub fn demo_hands(config: &ParserConfig) -> HandLog {
    parse_hands_with(DEMO_LOG, config)
}
