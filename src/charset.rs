//! Turns chunk bytes of unknown provenance into valid text.
//!
//! PNG says `tEXt`/`zTXt` are Latin-1 and `iTXt` is UTF-8, but plenty of
//! producers write UTF-8 everywhere. Bytes that already form valid UTF-8 are
//! kept as is, anything else is reinterpreted as Latin-1.

use encoding::all::ISO_8859_1;
use encoding::{DecoderTrap, Encoding};

/// Decode attempts, tried in order.
const DECODERS: &[fn(&[u8]) -> Option<String>] = &[utf8, latin1];

pub fn normalize(raw: &[u8]) -> String {
    DECODERS
        .iter()
        .find_map(|decode| decode(raw))
        .unwrap_or_else(|| String::from_utf8_lossy(raw).into_owned())
}

fn utf8(raw: &[u8]) -> Option<String> {
    std::str::from_utf8(raw).ok().map(str::to_owned)
}

fn latin1(raw: &[u8]) -> Option<String> {
    ISO_8859_1.decode(raw, DecoderTrap::Strict).ok()
}
