pub mod cards;
pub mod coach;
pub mod config;
pub mod demo;
pub mod error;
pub mod extract;
pub mod position;
pub mod record;
pub mod segment;
pub mod stats;
pub mod timeline;

pub use config::Config;
pub use error::Error;
pub use extract::{extract, extract_with, parse_hands, parse_hands_with};
pub use position::{Position, RelativePosition};
pub use record::{HandLog, HandRecord, IndexedHand, Outcome};

use log::{debug, error, warn};
use std::path::Path;

const BOM: char = '\u{feff}';

/// Decodes a raw export. Invalid UTF-8 is replaced rather than rejected.
pub fn decode_log(bytes: &[u8]) -> String {
    let text = match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(e) => {
            warn!(
                "log is not valid UTF-8 (first bad byte at {}), decoding lossily",
                e.valid_up_to()
            );
            String::from_utf8_lossy(bytes).into_owned()
        }
    };
    match text.strip_prefix(BOM) {
        Some(rest) => rest.to_string(),
        None => text,
    }
}

pub fn read_log(path: &Path) -> Result<String, Error> {
    let bytes = std::fs::read(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("read {} bytes from {}", bytes.len(), path.display());
    Ok(decode_log(&bytes))
}

pub fn analyze_file(path: &Path, config: &Config) -> Result<HandLog, Error> {
    let content = read_log(path)?;
    let log = parse_hands_with(&content, &config.parser);
    if log.is_empty() {
        let err = Error::NoHands;
        error!("{}: {}", path.display(), err);
        return Err(err);
    }
    Ok(log)
}
