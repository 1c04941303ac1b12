//! Tag bytes and the scalar (non-table, non-pool) wire forms: integers,
//! doubles, booleans, and the raw length + bytes framing shared by
//! strings and buffers. See spec §4.2.
//!
//! Width selection mirrors the teacher's `WordTy::select_min_and_ty`
//! (`submerge-coldb/src/wordty.rs`), generalized from 4 fixed widths to
//! the 13 signed/unsigned widths this format enumerates.

use crate::error::{CodecError, Result};
use crate::ioutil::{ByteReader, ByteWriter};

/// One byte identifying a value's wire form. Values are frozen once
/// published -- see spec §6 -- so these discriminants must never be
/// renumbered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Tag {
    U8 = 0,
    U16 = 1,
    U24 = 2,
    U32 = 3,
    U40 = 4,
    U48 = 5,
    U52 = 6,
    N8 = 7,
    N16 = 8,
    N24 = 9,
    N32 = 10,
    N40 = 11,
    N48 = 12,
    N52 = 13,
    Double = 14,
    BoolFalse = 15,
    BoolTrue = 16,
    StringInline = 17,
    StringRef = 18,
    Buffer = 19,
    Table = 20,
    Nil = 21,
}

impl Tag {
    pub fn from_u8(b: u8) -> Option<Tag> {
        use Tag::*;
        Some(match b {
            0 => U8,
            1 => U16,
            2 => U24,
            3 => U32,
            4 => U40,
            5 => U48,
            6 => U52,
            7 => N8,
            8 => N16,
            9 => N24,
            10 => N32,
            11 => N40,
            12 => N48,
            13 => N52,
            14 => Double,
            15 => BoolFalse,
            16 => BoolTrue,
            17 => StringInline,
            18 => StringRef,
            19 => Buffer,
            20 => Table,
            21 => Nil,
            _ => return None,
        })
    }

    fn is_unsigned(self) -> bool {
        matches!(
            self,
            Tag::U8 | Tag::U16 | Tag::U24 | Tag::U32 | Tag::U40 | Tag::U48 | Tag::U52
        )
    }

    fn is_signed_negative(self) -> bool {
        matches!(
            self,
            Tag::N8 | Tag::N16 | Tag::N24 | Tag::N32 | Tag::N40 | Tag::N48 | Tag::N52
        )
    }
}

fn write_tag(w: &mut ByteWriter, tag: Tag) {
    w.write_u8(tag as u8);
}

fn read_tag(r: &mut ByteReader) -> Result<(Tag, usize)> {
    let offset = r.pos();
    let b = r.read_u8()?;
    let tag = Tag::from_u8(b).ok_or(CodecError::BadTag { tag: b, offset })?;
    Ok((tag, offset))
}

/// Unsigned width classes, narrowest first, paired with the magnitude
/// each one can represent (the `8k`-bit boundary of spec §4.2's table,
/// except the final 7-byte class which only uses the low 52 of its 56
/// bits).
const WIDTH_BITS: [u32; 7] = [8, 16, 24, 32, 40, 48, 52];
const UNSIGNED_TAGS: [Tag; 7] = [
    Tag::U8,
    Tag::U16,
    Tag::U24,
    Tag::U32,
    Tag::U40,
    Tag::U48,
    Tag::U52,
];
const NEGATIVE_TAGS: [Tag; 7] = [
    Tag::N8,
    Tag::N16,
    Tag::N24,
    Tag::N32,
    Tag::N40,
    Tag::N48,
    Tag::N52,
];

fn byte_count_for_width_index(i: usize) -> usize {
    i + 1
}

fn max_unsigned_for_width_index(i: usize) -> u64 {
    if WIDTH_BITS[i] >= 64 {
        u64::MAX
    } else {
        (1_u64 << WIDTH_BITS[i]) - 1
    }
}

fn max_negative_magnitude_for_width_index(i: usize) -> u64 {
    1_u64 << (WIDTH_BITS[i] - 1)
}

/// Picks the narrowest width able to hold `value`, little-endian, and
/// writes `tag + body`.
pub fn encode_unsigned(w: &mut ByteWriter, value: u64) -> Result<()> {
    let idx = unsigned_width_index(value)?;
    write_tag(w, UNSIGNED_TAGS[idx]);
    let bytes = value.to_le_bytes();
    w.write_bytes(&bytes[..byte_count_for_width_index(idx)]);
    Ok(())
}

fn unsigned_width_index(value: u64) -> Result<usize> {
    UNSIGNED_TAGS
        .iter()
        .enumerate()
        .find(|&(i, _)| value <= max_unsigned_for_width_index(i))
        .map(|(i, _)| i)
        .ok_or(CodecError::SizeLimit)
}

/// Total on-wire byte cost (tag + body) of encoding `value` with
/// [`encode_unsigned`]. Used by the string pool (§4.3) to decide
/// whether a back-reference is actually cheaper than re-inlining.
pub fn unsigned_encoded_len(value: u64) -> usize {
    match unsigned_width_index(value) {
        Ok(idx) => 1 + byte_count_for_width_index(idx),
        // SizeLimit is unreachable for pool indices and string lengths,
        // both already bounded to u32 by their callers; fall back to
        // the widest class rather than panicking on a cost estimate.
        Err(_) => 1 + byte_count_for_width_index(UNSIGNED_TAGS.len() - 1),
    }
}

/// Reads a `tag + body` pair written by [`encode_unsigned`].
pub fn decode_unsigned(r: &mut ByteReader) -> Result<u64> {
    let (tag, offset) = read_tag(r)?;
    decode_unsigned_body(r, tag, offset)
}

fn decode_unsigned_body(r: &mut ByteReader, tag: Tag, offset: usize) -> Result<u64> {
    let idx = UNSIGNED_TAGS
        .iter()
        .position(|&t| t == tag)
        .ok_or(CodecError::BadTag {
            tag: tag as u8,
            offset,
        })?;
    read_le_u64(r, byte_count_for_width_index(idx))
}

fn read_le_u64(r: &mut ByteReader, byte_count: usize) -> Result<u64> {
    let bytes = r.read_bytes(byte_count)?;
    let mut buf = [0_u8; 8];
    buf[..byte_count].copy_from_slice(bytes);
    Ok(u64::from_le_bytes(buf))
}

/// The width class an [`i64`] would take on the wire, or `None` if it
/// falls outside the range this format's tagged-integer encoding can
/// address (the caller then falls back to the [`Tag::Double`] path).
pub(crate) fn classify_integer(i: i64) -> Option<(Tag, usize, u64)> {
    if i >= 0 {
        let value = i as u64;
        UNSIGNED_TAGS
            .iter()
            .enumerate()
            .find(|&(idx, _)| value <= max_unsigned_for_width_index(idx))
            .map(|(idx, &tag)| (tag, byte_count_for_width_index(idx), value))
    } else {
        // i64::MIN negated overflows i64, so widen to i128 first.
        let magnitude = -(i as i128);
        if magnitude > u64::MAX as i128 {
            return None;
        }
        let magnitude = magnitude as u64;
        NEGATIVE_TAGS
            .iter()
            .enumerate()
            .find(|&(idx, _)| magnitude <= max_negative_magnitude_for_width_index(idx))
            .map(|(idx, &tag)| (tag, byte_count_for_width_index(idx), magnitude))
    }
}

/// Writes an [`i64`] using the narrowest `u*`/`n*` tag that fits, per
/// the selection rule in spec §4.2. Returns [`CodecError::UnsupportedType`]
/// if `i` falls outside the representable range -- callers should
/// route such values through [`encode_double`] instead; this is only
/// reached if that routing decision was skipped.
pub fn encode_integer(w: &mut ByteWriter, i: i64) -> Result<()> {
    let (tag, byte_count, magnitude) = classify_integer(i).ok_or(CodecError::UnsupportedType)?;
    write_tag(w, tag);
    let bytes = magnitude.to_le_bytes();
    w.write_bytes(&bytes[..byte_count]);
    Ok(())
}

/// Reads an integer value given its tag has already been read by the
/// dispatcher (the walker reads one lookahead byte to decide the
/// value's variant, then routes here for `u*`/`n*` tags).
pub fn decode_integer_body(r: &mut ByteReader, tag: Tag, offset: usize) -> Result<i64> {
    // Every width this format defines tops out at 7 body bytes (56
    // bits), which always fits losslessly in an i64/i128 -- no
    // narrowing check is needed on the way back out.
    if tag.is_unsigned() {
        let idx = UNSIGNED_TAGS.iter().position(|&t| t == tag).unwrap();
        let magnitude = read_le_u64(r, byte_count_for_width_index(idx))?;
        Ok(magnitude as i64)
    } else if tag.is_signed_negative() {
        let idx = NEGATIVE_TAGS.iter().position(|&t| t == tag).unwrap();
        let magnitude = read_le_u64(r, byte_count_for_width_index(idx))?;
        Ok(-(magnitude as i64))
    } else {
        Err(CodecError::BadTag {
            tag: tag as u8,
            offset,
        })
    }
}

pub fn encode_double(w: &mut ByteWriter, d: f64) {
    write_tag(w, Tag::Double);
    w.write_bytes(&d.to_le_bytes());
}

pub fn decode_double_body(r: &mut ByteReader) -> Result<f64> {
    let bytes = r.read_bytes(8)?;
    let mut buf = [0_u8; 8];
    buf.copy_from_slice(bytes);
    Ok(f64::from_le_bytes(buf))
}

pub fn encode_bool(w: &mut ByteWriter, b: bool) {
    write_tag(w, if b { Tag::BoolTrue } else { Tag::BoolFalse });
}

pub fn encode_nil(w: &mut ByteWriter) {
    write_tag(w, Tag::Nil);
}

/// Reads exactly one tag byte and returns it for the caller to
/// dispatch on -- the single point of lookahead the decoder's state
/// machine needs per spec §4.6.
pub fn peek_tag(r: &mut ByteReader) -> Result<(Tag, usize)> {
    read_tag(r)
}

/// Writes a `Tag::StringRef` pointing at `index` in the string pool
/// (spec §4.3): the outer tag, then the index itself nested as its own
/// nested tag+body unsigned encoding.
pub fn write_string_ref(w: &mut ByteWriter, index: u32) {
    write_tag(w, Tag::StringRef);
    // unsigned_width_index never fails for a u32 widened to u64.
    encode_unsigned(w, index as u64).expect("u32 index always fits the widest unsigned class");
}

/// Writes a length-prefixed raw byte buffer: `tag + u*-length + bytes`,
/// shared by [`Tag::StringInline`] and [`Tag::Buffer`] (spec §4.2).
pub fn encode_raw_bytes(w: &mut ByteWriter, tag: Tag, bytes: &[u8]) -> Result<()> {
    if bytes.len() > u32::MAX as usize {
        return Err(CodecError::SizeLimit);
    }
    write_tag(w, tag);
    encode_unsigned(w, bytes.len() as u64)?;
    w.write_bytes(bytes);
    Ok(())
}

/// Reads the length + bytes body written by [`encode_raw_bytes`], given
/// the tag has already been read by the dispatcher.
pub fn decode_raw_bytes<'a>(r: &mut ByteReader<'a>) -> Result<&'a [u8]> {
    let len = decode_unsigned(r)?;
    if len > u32::MAX as u64 {
        return Err(CodecError::SizeLimit);
    }
    r.read_bytes(len as usize)
}
