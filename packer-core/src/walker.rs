//! The recursive traversal that classifies each [`Value`] node and
//! dispatches it to the scalar or table codec (spec §2's "Value
//! Walker", §4.6's state machine). Mirrors the way the teacher threads
//! a builder through nested writes by explicit `self -> Self` passing
//! (`submerge-coldb`'s `BlockWriter`/`TrackWriter` chain) rather than
//! any shared mutable or thread-local context: a `Walker` is created
//! fresh per `compress`/`decompress` call and carries its own depth
//! counter and (at levels 2-3) string pool.

use crate::error::{CodecError, Result};
use crate::ioutil::{ByteReader, ByteWriter};
use crate::pool::{DecodePool, EncodePool};
use crate::primitive::{
    self, decode_double_body, decode_integer_body, decode_raw_bytes, decode_unsigned,
    encode_bool, encode_double, encode_integer, encode_nil, encode_raw_bytes, encode_unsigned,
    peek_tag, Tag,
};
use crate::value::{Table, Value};

pub struct Walker {
    max_depth: usize,
    encode_pool: Option<EncodePool>,
    decode_pool: Option<DecodePool>,
}

impl Walker {
    pub fn for_encode(max_depth: usize, use_pool: bool) -> Self {
        Walker {
            max_depth,
            encode_pool: use_pool.then(EncodePool::new),
            decode_pool: None,
        }
    }

    pub fn for_decode(max_depth: usize, use_pool: bool) -> Self {
        Walker {
            max_depth,
            encode_pool: None,
            decode_pool: use_pool.then(DecodePool::new),
        }
    }

    fn check_depth(&self, depth: usize) -> Result<()> {
        if depth > self.max_depth {
            return Err(CodecError::DepthExceeded {
                depth,
                max: self.max_depth,
            });
        }
        Ok(())
    }

    pub fn encode_value(&mut self, w: &mut ByteWriter, depth: usize, value: &Value) -> Result<()> {
        self.check_depth(depth)?;
        match value {
            Value::Nil => {
                encode_nil(w);
                Ok(())
            }
            Value::Bool(b) => {
                encode_bool(w, *b);
                Ok(())
            }
            Value::Integer(i) => encode_integer(w, *i),
            Value::Double(d) => {
                encode_double(w, *d);
                Ok(())
            }
            Value::String(s) => self.encode_string(w, s),
            Value::Buffer(b) => encode_raw_bytes(w, Tag::Buffer, b),
            Value::Table(t) => self.encode_table(w, depth, t),
        }
    }

    fn encode_string(&mut self, w: &mut ByteWriter, s: &[u8]) -> Result<()> {
        if s.len() > u32::MAX as usize {
            return Err(CodecError::SizeLimit);
        }
        if let Some(pool) = &self.encode_pool {
            if let Some(index) = pool.index_to_reference(s) {
                primitive::write_string_ref(w, index);
                return Ok(());
            }
        }
        encode_raw_bytes(w, Tag::StringInline, s)?;
        if let Some(pool) = &mut self.encode_pool {
            pool.note_inline_emitted(s);
        }
        Ok(())
    }

    fn encode_table(&mut self, w: &mut ByteWriter, depth: usize, t: &Table) -> Result<()> {
        if t.array.len() > u32::MAX as usize || t.hash.len() > u32::MAX as usize {
            return Err(CodecError::SizeLimit);
        }
        w.write_u8(Tag::Table as u8);
        encode_unsigned(w, t.array.len() as u64)?;
        encode_unsigned(w, t.hash.len() as u64)?;
        for v in &t.array {
            self.encode_value(w, depth + 1, v)?;
        }
        for (k, v) in &t.hash {
            if matches!(k, Value::Nil | Value::Table(_)) {
                return Err(CodecError::UnsupportedType);
            }
            self.encode_value(w, depth + 1, k)?;
            self.encode_value(w, depth + 1, v)?;
        }
        Ok(())
    }

    pub fn decode_value(&mut self, r: &mut ByteReader, depth: usize) -> Result<Value> {
        self.check_depth(depth)?;
        let (tag, offset) = peek_tag(r)?;
        match tag {
            Tag::Nil => Ok(Value::Nil),
            Tag::BoolFalse => Ok(Value::Bool(false)),
            Tag::BoolTrue => Ok(Value::Bool(true)),
            Tag::Double => Ok(Value::Double(decode_double_body(r)?)),
            Tag::StringInline => {
                let bytes = decode_raw_bytes(r)?.to_vec();
                if let Some(pool) = &mut self.decode_pool {
                    pool.note_inline_emitted(&bytes);
                }
                Ok(Value::String(bytes))
            }
            Tag::StringRef => {
                let index = decode_unsigned(r)?;
                let pool = self
                    .decode_pool
                    .as_ref()
                    .ok_or(CodecError::BadTag { tag: tag as u8, offset })?;
                // A corrupted stream can claim an index wider than a
                // u32; saturate rather than panic, which `resolve`
                // rejects as out of bounds just the same.
                let index = u32::try_from(index).unwrap_or(u32::MAX);
                Ok(Value::String(pool.resolve(index)?.to_vec()))
            }
            Tag::Buffer => Ok(Value::Buffer(decode_raw_bytes(r)?.to_vec())),
            Tag::Table => self.decode_table(r, depth),
            _ => Ok(Value::Integer(decode_integer_body(r, tag, offset)?)),
        }
    }

    fn decode_table(&mut self, r: &mut ByteReader, depth: usize) -> Result<Value> {
        let n = decode_len(r)?;
        let m = decode_len(r)?;
        let mut array = Vec::new();
        for _ in 0..n {
            array.push(self.decode_value(r, depth + 1)?);
        }
        let mut hash = Vec::new();
        for _ in 0..m {
            let k = self.decode_value(r, depth + 1)?;
            if matches!(k, Value::Nil | Value::Table(_)) {
                return Err(CodecError::UnsupportedType);
            }
            let v = self.decode_value(r, depth + 1)?;
            hash.push((k, v));
        }
        Ok(Value::Table(Table { array, hash }))
    }
}

fn decode_len(r: &mut ByteReader) -> Result<usize> {
    let len = decode_unsigned(r)?;
    if len > u32::MAX as u64 {
        return Err(CodecError::SizeLimit);
    }
    Ok(len as usize)
}

#[cfg(test)]
mod test {
    use super::*;
    use test_log::test;

    fn round_trip(v: Value, use_pool: bool) -> Value {
        let mut w = ByteWriter::new();
        Walker::for_encode(64, use_pool)
            .encode_value(&mut w, 0, &v)
            .unwrap();
        let bytes = w.into_vec();
        let mut r = ByteReader::new(&bytes);
        let decoded = Walker::for_decode(64, use_pool)
            .decode_value(&mut r, 0)
            .unwrap();
        r.expect_exhausted().unwrap();
        decoded
    }

    #[test]
    fn scalars_round_trip_at_every_pool_setting() {
        for use_pool in [false, true] {
            assert_eq!(round_trip(Value::Bool(true), use_pool), Value::Bool(true));
            assert_eq!(round_trip(Value::Integer(42), use_pool), Value::Integer(42));
            assert_eq!(round_trip(Value::Double(1.5), use_pool), Value::Double(1.5));
            assert_eq!(
                round_trip(Value::str("hello"), use_pool),
                Value::str("hello")
            );
            assert_eq!(
                round_trip(Value::Buffer(vec![1, 2, 3]), use_pool),
                Value::Buffer(vec![1, 2, 3])
            );
        }
    }

    #[test]
    fn nested_table_round_trips() {
        let mut inner = Table::new();
        inner.insert(Value::str("d"), Value::Bool(true));
        let mut outer = Table::new();
        outer.insert(Value::str("a"), Value::Integer(1));
        outer.insert(Value::str("b"), Value::str("hi"));
        outer.insert(Value::str("c"), Value::Table(inner));
        let v = Value::Table(outer);
        assert_eq!(round_trip(v.clone(), true), v);
    }

    #[test]
    fn depth_guard_trips_on_deep_nesting() {
        let mut v = Value::Table(Table::new());
        for _ in 0..10_000 {
            let mut t = Table::new();
            t.push(v);
            v = Value::Table(t);
        }
        let mut w = ByteWriter::new();
        let result = Walker::for_encode(64, false).encode_value(&mut w, 0, &v);
        assert!(matches!(result, Err(CodecError::DepthExceeded { .. })));
    }

    #[test]
    fn table_key_cannot_be_nil_or_table() {
        let mut t = Table::new();
        t.hash.push((Value::Nil, Value::Integer(1)));
        let mut w = ByteWriter::new();
        let result = Walker::for_encode(64, false).encode_value(&mut w, 0, &Value::Table(t));
        assert!(matches!(result, Err(CodecError::UnsupportedType)));
    }

    #[test]
    fn repeated_string_is_smaller_with_pool() {
        let mut t = Table::new();
        for i in 0..8 {
            t.insert(Value::str(format!("key_number_{i}")), Value::str("same-repeated-value"));
        }
        let v = Value::Table(t);

        let mut w1 = ByteWriter::new();
        Walker::for_encode(64, false).encode_value(&mut w1, 0, &v).unwrap();
        let mut w2 = ByteWriter::new();
        Walker::for_encode(64, true).encode_value(&mut w2, 0, &v).unwrap();
        assert!(w2.into_vec().len() < w1.into_vec().len());
    }

    #[test]
    fn sparse_table_round_trips() {
        let t = Table::from_flat(vec![
            (Value::Integer(1), Value::str("a")),
            (Value::Integer(3), Value::str("c")),
            (Value::Integer(4), Value::str("d")),
        ]);
        assert_eq!(t.array.len(), 1);
        assert_eq!(t.hash.len(), 2);
        let v = Value::Table(t.clone());
        assert_eq!(round_trip(v, true), Value::Table(t));
    }
}
