//! Wire format and round-trip codec for a self-describing, dynamically
//! typed value (spec §1-§2). This crate performs no I/O: it turns a
//! [`Value`] into bytes and back, and nothing else -- file access and
//! the command-line surface live one layer up, in the `packer` crate.
//!
//! Three compression levels trade CPU for size (spec §4.1):
//! - [`Level::One`]: structural encoding only.
//! - [`Level::Two`]: adds the self-describing string pool (§4.3).
//! - [`Level::Three`]: wraps a level-2 payload in a generic entropy
//!   stage (§4.5).

mod composite;
mod entropy;
mod error;
mod frame;
mod ioutil;
mod pool;
mod primitive;
mod value;
mod walker;

pub use error::CodecError;
pub use frame::Level;
pub use value::{Table, Value};

use error::Result;
use frame::Header;
use ioutil::{ByteReader, ByteWriter};
use walker::Walker;

/// Floor for the recursion-depth guard unless a caller asks for a
/// smaller one with [`compress_with_max_depth`]/[`decompress_with_max_depth`].
/// Chosen well above any table nesting a real save file or network
/// payload would use, while still bounding the decoder's call stack
/// against adversarial input (spec §4.4, §4.6).
pub const DEFAULT_MAX_DEPTH: usize = 64;

pub fn compress(value: &Value, level: Level) -> Result<Vec<u8>> {
    compress_with_max_depth(value, level, DEFAULT_MAX_DEPTH)
}

pub fn compress_with_max_depth(value: &Value, level: Level, max_depth: usize) -> Result<Vec<u8>> {
    if value.is_nil() {
        // Nil exists only as a hash-part value (spec §4.2); it is never
        // a valid top-level input.
        return Err(CodecError::UnsupportedType);
    }

    let mut structural = ByteWriter::new();
    Walker::for_encode(max_depth, level.uses_pool()).encode_value(&mut structural, 0, value)?;
    let structural = structural.into_vec();

    let payload = if level.uses_entropy() {
        entropy::wrap(&structural)?
    } else {
        structural
    };

    let mut out = Vec::with_capacity(payload.len() + 1);
    out.push(Header::new(level).to_byte());
    out.extend_from_slice(&payload);
    Ok(out)
}

pub fn decompress(bytes: &[u8]) -> Result<Value> {
    decompress_with_max_depth(bytes, DEFAULT_MAX_DEPTH)
}

pub fn decompress_with_max_depth(bytes: &[u8], max_depth: usize) -> Result<Value> {
    let (&header_byte, rest) = bytes.split_first().ok_or(CodecError::Truncated)?;
    let header = Header::from_byte(header_byte)?;

    let structural;
    let structural_bytes: &[u8] = if header.level.uses_entropy() {
        structural = entropy::unwrap(rest)?;
        &structural
    } else {
        rest
    };

    let mut r = ByteReader::new(structural_bytes);
    let value = Walker::for_decode(max_depth, header.level.uses_pool()).decode_value(&mut r, 0)?;
    r.expect_exhausted()?;
    Ok(value)
}
