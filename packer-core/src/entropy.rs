//! The entropy stage used at Level 3 (spec §4.5): a generic
//! byte-oriented compressor wrapped around the Level-2 structural
//! payload. Grounded on `oferchen-rsync`'s use of `lz4_flex`'s frame
//! format for the same "compress an already-structured byte stream"
//! role; picked over the teacher's own stack since `graydon-submerge`
//! has no entropy coder of its own to generalize.
//!
//! Only one entropy variant is implemented, so the frame header (see
//! [`crate::frame`]) carries no separate variant byte -- Level 3 always
//! means "LZ4 frame-wrapped". A future second variant would need that
//! byte added; see spec §9's open question on this point.

use std::io::Write;

use lz4_flex::frame::{FrameDecoder, FrameEncoder};

use crate::error::{CodecError, Result};

pub fn wrap(plain: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = FrameEncoder::new(Vec::new());
    encoder
        .write_all(plain)
        .map_err(|e| CodecError::EntropyError {
            reason: e.to_string(),
        })?;
    encoder.finish().map_err(|e| CodecError::EntropyError {
        reason: e.to_string(),
    })
}

pub fn unwrap(framed: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = FrameDecoder::new(framed);
    let mut out = Vec::new();
    std::io::copy(&mut decoder, &mut out).map_err(|e| CodecError::EntropyError {
        reason: e.to_string(),
    })?;
    Ok(out)
}
