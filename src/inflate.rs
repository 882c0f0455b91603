use std::io::Read;

use flate2::read::GzDecoder;
use flate2::{Decompress, FlushDecompress, Status};
use log::debug;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InflateError {
    #[error("corrupt or truncated compressed stream")]
    Corrupt,
    #[error("decompressed text exceeds {0} bytes")]
    TooLarge(usize),
    #[error("no decompression strategy accepted the stream")]
    Exhausted,
}

/// Container formats a compressed text payload is tried against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// RFC 1950, what the PNG format mandates
    Zlib,
    /// RFC 1952, written by some non-conforming producers
    Gzip,
    /// RFC 1951 without any header
    Deflate,
}

// Order matters, first success wins
pub const STRATEGIES: &[Strategy] = &[Strategy::Zlib, Strategy::Gzip, Strategy::Deflate];

impl Strategy {
    pub fn run(self, data: &[u8], limit: usize) -> Result<Vec<u8>, InflateError> {
        match self {
            Strategy::Zlib => inflate_stream(data, true, limit),
            Strategy::Gzip => gunzip(data, limit),
            Strategy::Deflate => inflate_stream(data, false, limit),
        }
    }
}

/// Decompress `data` trying each of [`STRATEGIES`] in turn.
///
/// `limit` caps the decompressed size, hitting it stops the search since no
/// other container would produce less text from the same payload.
pub fn inflate(data: &[u8], limit: usize) -> Result<Vec<u8>, InflateError> {
    for strategy in STRATEGIES {
        match strategy.run(data, limit) {
            Ok(out) => {
                debug!("inflate: {:?} accepted {} -> {} bytes", strategy, data.len(), out.len());
                return Ok(out);
            }
            Err(InflateError::TooLarge(x)) => return Err(InflateError::TooLarge(x)),
            Err(e) => debug!("inflate: {:?} rejected: {}", strategy, e),
        }
    }
    Err(InflateError::Exhausted)
}

// Requires a proper end of stream, a truncated payload is an error rather
// than a silently shortened text. The output buffer grows between calls, the
// decoder picks up where it left off.
fn inflate_stream(data: &[u8], zlib_header: bool, limit: usize) -> Result<Vec<u8>, InflateError> {
    let mut dec = Decompress::new(zlib_header);
    let mut out: Vec<u8> = Vec::with_capacity(data.len().saturating_mul(2).clamp(64, 64 * 1024));

    loop {
        if out.len() == out.capacity() {
            out.reserve(out.capacity().max(256));
        }

        let (before_in, before_out) = (dec.total_in(), dec.total_out());
        let status = dec
            .decompress_vec(&data[before_in as usize..], &mut out, FlushDecompress::None)
            .map_err(|_| InflateError::Corrupt)?;

        if out.len() > limit {
            return Err(InflateError::TooLarge(limit));
        }

        match status {
            Status::StreamEnd => return Ok(out),
            Status::Ok | Status::BufError => {
                // Room left to write and nothing moved, the input ran out
                // before the end marker
                let stalled = dec.total_in() == before_in && dec.total_out() == before_out;
                if stalled && out.len() < out.capacity() {
                    return Err(InflateError::Corrupt);
                }
            }
        }
    }
}

fn gunzip(data: &[u8], limit: usize) -> Result<Vec<u8>, InflateError> {
    let mut out = Vec::new();
    GzDecoder::new(data)
        .take((limit as u64).saturating_add(1))
        .read_to_end(&mut out)
        .map_err(|_| InflateError::Corrupt)?;

    if out.len() > limit {
        Err(InflateError::TooLarge(limit))
    } else {
        Ok(out)
    }
}
